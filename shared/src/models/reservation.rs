//! Reservation Models
//!
//! The reservation aggregate (`Reservation` + `ReservationInfo` line items),
//! the flat joined row returned by store queries, and the grouped view
//! returned to callers.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::models::bread::BreadSelection;

/// Reservation lifecycle status.
///
/// `next()` is total: `Pending` advances to `Complete`; `Complete` and
/// `Canceled` are terminal and map to themselves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ReservationStatus {
    Pending,
    Complete,
    Canceled,
}

impl ReservationStatus {
    /// The status this reservation moves to when advanced.
    pub fn next(self) -> Self {
        match self {
            ReservationStatus::Pending => ReservationStatus::Complete,
            ReservationStatus::Complete => ReservationStatus::Complete,
            ReservationStatus::Canceled => ReservationStatus::Canceled,
        }
    }

    /// Terminal statuses never transition.
    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            ReservationStatus::Complete | ReservationStatus::Canceled
        )
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ReservationStatus::Pending => "PENDING",
            ReservationStatus::Complete => "COMPLETE",
            ReservationStatus::Canceled => "CANCELED",
        }
    }
}

impl fmt::Display for ReservationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ReservationStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "PENDING" => Ok(ReservationStatus::Pending),
            "COMPLETE" => Ok(ReservationStatus::Complete),
            "CANCELED" => Ok(ReservationStatus::Canceled),
            other => Err(format!("Unknown reservation status: {}", other)),
        }
    }
}

/// Reservation aggregate root.
///
/// Owns its [`ReservationInfo`] line items: they are written with it in one
/// unit and cascade-deleted with it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Reservation {
    pub id: i64,
    pub member_id: i64,
    /// Requested pickup instant (Unix millis).
    pub pickup_at: i64,
    /// Total price for the whole reservation.
    pub price: f64,
    pub status: ReservationStatus,
    pub created_at: i64,
    pub updated_at: i64,
}

/// One bread line item inside a reservation.
///
/// Name and unit price are snapshotted from the catalog at creation time so
/// later catalog edits do not rewrite history.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReservationInfo {
    pub reservation_id: i64,
    pub bread_id: i64,
    pub bread_name: String,
    pub bread_price: f64,
    pub count: i32,
}

/// Line item input for a draft, before ids are assigned.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LineDraft {
    pub bread_id: i64,
    pub bread_name: String,
    pub bread_price: f64,
    pub count: i32,
}

/// Fully resolved aggregate ready to persist: the manager has already
/// validated the pickup window, resolved breads, and computed the price.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReservationDraft {
    pub member_id: i64,
    pub pickup_at: i64,
    pub price: f64,
    pub items: Vec<LineDraft>,
}

/// Flat joined row: one reservation's fields plus one of its line items,
/// repeated once per line item.
///
/// Store queries return these with all rows of the same reservation
/// contiguous; the grouper depends on that ordering.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReservationRow {
    pub reservation_id: i64,
    pub member_id: i64,
    pub pickup_at: i64,
    pub status: ReservationStatus,
    pub price: f64,
    pub bread_name: String,
    pub bread_price: f64,
    pub bread_count: i32,
}

/// One bread line inside a grouped view.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReservationBread {
    pub name: String,
    pub price: f64,
    pub count: i32,
}

impl ReservationBread {
    /// Project the bread portion out of a flat row.
    pub fn from_row(row: &ReservationRow) -> Self {
        Self {
            name: row.bread_name.clone(),
            price: row.bread_price,
            count: row.bread_count,
        }
    }
}

/// Grouped reservation view: one reservation with its line items nested.
///
/// Constructed fresh per query, never persisted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReservationView {
    pub reservation_id: i64,
    pub member_id: i64,
    pub pickup_at: i64,
    pub status: ReservationStatus,
    pub price: f64,
    pub breads: Vec<ReservationBread>,
}

impl ReservationView {
    /// Build a view from any row of a group plus the group's accumulated
    /// line items.
    pub fn build(row: &ReservationRow, breads: Vec<ReservationBread>) -> Self {
        Self {
            reservation_id: row.reservation_id,
            member_id: row.member_id,
            pickup_at: row.pickup_at,
            status: row.status,
            price: row.price,
            breads,
        }
    }
}

/// Create payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReservationCreate {
    pub member_id: i64,
    /// Requested pickup instant (Unix millis).
    pub pickup_at: i64,
    pub breads: Vec<BreadSelection>,
}

/// Update payload: the replacement aggregate for an existing reservation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReservationUpdate {
    pub reservation_id: i64,
    #[serde(flatten)]
    pub create: ReservationCreate,
}
