//! Flat-row grouping
//!
//! Store queries return one joined row per bread line item; callers want
//! one object per reservation with its line items nested. The grouper is a
//! single left-to-right pass over the row sequence.
//!
//! # Precondition
//!
//! Rows sharing a reservation id must be contiguous (not necessarily
//! sorted by id value). Every [`crate::db::ReservationStore`] row query
//! guarantees this; the grouper does not re-sort, and interleaved ids
//! split into separate groups rather than erroring.

use shared::models::{ReservationBread, ReservationRow, ReservationView};

use super::error::{ReservationError, ReservationResult};

/// Group a contiguously-ordered flat-row sequence into one view per
/// distinct reservation id, each with its line items in original row
/// order.
///
/// Empty input violates the caller contract (callers check for empty
/// results before grouping) and fails with [`ReservationError::EmptyRows`].
pub fn group_rows(rows: &[ReservationRow]) -> ReservationResult<Vec<ReservationView>> {
    let first = rows.first().ok_or(ReservationError::EmptyRows)?;

    let mut views = Vec::new();
    let mut current_id = first.reservation_id;
    let mut breads: Vec<ReservationBread> = Vec::new();
    let mut last_row = first;

    for row in rows {
        if row.reservation_id != current_id {
            // Close out the previous group from its last row
            views.push(ReservationView::build(last_row, std::mem::take(&mut breads)));
            current_id = row.reservation_id;
        }
        breads.push(ReservationBread::from_row(row));
        last_row = row;
    }
    // Flush the final open group
    views.push(ReservationView::build(last_row, breads));
    Ok(views)
}

/// Group rows known by contract to belong to a single reservation and
/// return that one view.
pub fn group_single(rows: &[ReservationRow]) -> ReservationResult<ReservationView> {
    group_rows(rows)?
        .into_iter()
        .next()
        .ok_or(ReservationError::EmptyRows)
}
