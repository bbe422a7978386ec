//! ReservationManager - lifecycle orchestration
//!
//! Coordinates the member directory, bread catalog and reservation store
//! for every lifecycle and query operation. Each operation runs inside one
//! request task; failures are typed and propagate immediately (no internal
//! retries), and cross-entity atomicity is the store's contract, not
//! implemented here.

use std::sync::Arc;

use chrono::NaiveDate;
use chrono_tz::Tz;

use shared::models::{
    LineDraft, Reservation, ReservationCreate, ReservationDraft, ReservationUpdate,
    ReservationStatus, ReservationView,
};
use shared::util::now_millis;

use super::error::{ReservationError, ReservationResult};
use super::{grouping, window};
use crate::db::{RepoError, ReservationStore};
use crate::services::{BreadCatalog, MemberDirectory};
use crate::utils::time;

/// Map a store failure for a specific reservation id: `NotFound` becomes
/// the domain not-found, anything else passes through as a storage error.
fn for_id(id: i64) -> impl Fn(RepoError) -> ReservationError {
    move |err| match err {
        RepoError::NotFound(_) => ReservationError::NotFound(id),
        other => ReservationError::Store(other),
    }
}

#[derive(Clone)]
pub struct ReservationManager {
    store: Arc<dyn ReservationStore>,
    directory: Arc<dyn MemberDirectory>,
    catalog: Arc<dyn BreadCatalog>,
    /// Business timezone for the pickup-hour window and day bounds.
    tz: Tz,
}

impl std::fmt::Debug for ReservationManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReservationManager")
            .field("tz", &self.tz)
            .finish()
    }
}

impl ReservationManager {
    pub fn new(
        store: Arc<dyn ReservationStore>,
        directory: Arc<dyn MemberDirectory>,
        catalog: Arc<dyn BreadCatalog>,
        tz: Tz,
    ) -> Self {
        Self {
            store,
            directory,
            catalog,
            tz,
        }
    }

    // ========================================================================
    // Lifecycle
    // ========================================================================

    /// Create a reservation: validate the pickup window, resolve member and
    /// breads, price the selection, persist the aggregate in one unit.
    pub async fn create(&self, req: ReservationCreate) -> ReservationResult<Reservation> {
        check_selection(&req)?;
        window::validate_pickup(req.pickup_at, now_millis(), self.tz)?;

        let draft = self.resolve(req).await?;
        let reservation = self
            .store
            .create(draft)
            .await
            .map_err(ReservationError::Store)?;

        tracing::info!(
            reservation_id = reservation.id,
            member_id = reservation.member_id,
            price = reservation.price,
            "Reservation created"
        );
        Ok(reservation)
    }

    /// Replace an existing reservation's aggregate with a freshly validated
    /// and resolved one. The swap is one transaction at the store boundary:
    /// a failed replace leaves the original aggregate intact.
    pub async fn update(&self, req: ReservationUpdate) -> ReservationResult<Reservation> {
        let id = req.reservation_id;
        check_selection(&req.create)?;
        window::validate_pickup(req.create.pickup_at, now_millis(), self.tz)?;

        let draft = self.resolve(req.create).await?;
        let reservation = self.store.replace(id, draft).await.map_err(for_id(id))?;

        tracing::info!(
            reservation_id = id,
            price = reservation.price,
            "Reservation replaced"
        );
        Ok(reservation)
    }

    /// Delete a reservation; its line items cascade with it. A missing id
    /// is an error, matching lookup failures everywhere else.
    pub async fn delete(&self, id: i64) -> ReservationResult<()> {
        self.store.delete(id).await.map_err(for_id(id))?;
        tracing::info!(reservation_id = id, "Reservation deleted");
        Ok(())
    }

    /// Advance the reservation to its next status. Terminal statuses stay
    /// put without touching the store.
    pub async fn advance_status(&self, id: i64) -> ReservationResult<Reservation> {
        let reservation = self.find_by_id(id).await?;
        if reservation.status.is_terminal() {
            tracing::debug!(
                reservation_id = id,
                status = %reservation.status,
                "Status already terminal"
            );
            return Ok(reservation);
        }

        let next = reservation.status.next();
        let updated = self.store.set_status(id, next).await.map_err(for_id(id))?;
        tracing::info!(
            reservation_id = id,
            from = %reservation.status,
            to = %next,
            "Reservation status advanced"
        );
        Ok(updated)
    }

    pub async fn find_by_id(&self, id: i64) -> ReservationResult<Reservation> {
        self.store
            .find_by_id(id)
            .await
            .map_err(ReservationError::Store)?
            .ok_or(ReservationError::NotFound(id))
    }

    // ========================================================================
    // Queries
    // ========================================================================

    /// All of a member's reservations in the given status, grouped.
    pub async fn by_member_and_status(
        &self,
        member_id: i64,
        status: ReservationStatus,
    ) -> ReservationResult<Vec<ReservationView>> {
        let rows = self
            .store
            .rows_by_member_and_status(member_id, status)
            .await
            .map_err(ReservationError::Store)?;
        if rows.is_empty() {
            return Ok(Vec::new());
        }
        grouping::group_rows(&rows)
    }

    /// The member's most recent reservation regardless of status.
    pub async fn most_recent_by_member(
        &self,
        member_id: i64,
    ) -> ReservationResult<ReservationView> {
        let rows = self
            .store
            .rows_most_recent(member_id)
            .await
            .map_err(ReservationError::Store)?;
        if rows.is_empty() {
            return Err(ReservationError::NoReservations(member_id));
        }
        grouping::group_single(&rows)
    }

    /// All reservations in the given status picked up on `date`.
    pub async fn by_date(
        &self,
        date: NaiveDate,
        status: ReservationStatus,
    ) -> ReservationResult<Vec<ReservationView>> {
        self.by_date_range(date, date, status).await
    }

    /// All reservations in the given status picked up between the start of
    /// `start` and the end of `end` (both full days, inclusive).
    pub async fn by_date_range(
        &self,
        start: NaiveDate,
        end: NaiveDate,
        status: ReservationStatus,
    ) -> ReservationResult<Vec<ReservationView>> {
        let (range_start, _) = time::day_bounds_millis(start, self.tz);
        let (_, range_end) = time::day_bounds_millis(end, self.tz);

        let rows = self
            .store
            .rows_by_pickup_range(status, range_start, range_end)
            .await
            .map_err(ReservationError::Store)?;
        if rows.is_empty() {
            return Ok(Vec::new());
        }
        grouping::group_rows(&rows)
    }

    // ========================================================================
    // Resolution
    // ========================================================================

    /// Resolve a validated request into a persistable draft: member must
    /// exist, every bread name must resolve (order-preserving, so the i-th
    /// selection pairs with the i-th bread), and the catalog prices the
    /// whole selection.
    async fn resolve(&self, req: ReservationCreate) -> ReservationResult<ReservationDraft> {
        let member = self
            .directory
            .find_by_id(req.member_id)
            .await
            .map_err(|err| match err {
                RepoError::NotFound(_) => ReservationError::MemberNotFound(req.member_id),
                other => ReservationError::Store(other),
            })?;

        let names: Vec<String> = req.breads.iter().map(|s| s.name.clone()).collect();
        let breads = self
            .catalog
            .find_many_by_names(&names)
            .await
            .map_err(|err| match err {
                RepoError::NotFound(msg) => ReservationError::BreadNotFound(msg),
                other => ReservationError::Store(other),
            })?;

        let price = self
            .catalog
            .final_price(&req.breads)
            .await
            .map_err(ReservationError::Store)?;

        let items = breads
            .iter()
            .zip(req.breads.iter())
            .map(|(bread, selection)| LineDraft {
                bread_id: bread.id,
                bread_name: bread.name.clone(),
                bread_price: bread.price,
                count: selection.count,
            })
            .collect();

        Ok(ReservationDraft {
            member_id: member.id,
            pickup_at: req.pickup_at,
            price,
            items,
        })
    }
}

/// Payload sanity: at least one selection, all counts positive.
fn check_selection(req: &ReservationCreate) -> ReservationResult<()> {
    if req.breads.is_empty() {
        return Err(ReservationError::EmptySelection);
    }
    for selection in &req.breads {
        if selection.count <= 0 {
            return Err(ReservationError::InvalidCount(
                selection.name.clone(),
                selection.count,
            ));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::MemoryReservationStore;
    use crate::services::{MemoryBreadCatalog, MemoryMemberDirectory};
    use chrono::{Duration, Timelike, Utc};
    use chrono_tz::UTC;
    use shared::models::BreadSelection;

    struct Fixture {
        manager: ReservationManager,
        store: Arc<MemoryReservationStore>,
    }

    fn fixture() -> Fixture {
        let store = Arc::new(MemoryReservationStore::new());
        let directory = Arc::new(MemoryMemberDirectory::new());
        let catalog = Arc::new(MemoryBreadCatalog::new());

        directory.insert(1, "Young Man");
        catalog.insert("Baguette", 5.0);
        catalog.insert("Rye", 3.0);

        Fixture {
            manager: ReservationManager::new(store.clone(), directory, catalog, UTC),
            store,
        }
    }

    /// Tomorrow at the given hour, always inside the after-now rule.
    fn tomorrow_at(hour: u32) -> i64 {
        (Utc::now() + Duration::days(1))
            .with_hour(hour)
            .unwrap()
            .with_minute(0)
            .unwrap()
            .with_second(0)
            .unwrap()
            .timestamp_millis()
    }

    fn selection(name: &str, count: i32) -> BreadSelection {
        BreadSelection {
            name: name.to_string(),
            count,
        }
    }

    fn create_req(pickup_at: i64, breads: Vec<BreadSelection>) -> ReservationCreate {
        ReservationCreate {
            member_id: 1,
            pickup_at,
            breads,
        }
    }

    #[tokio::test]
    async fn create_prices_and_persists_the_aggregate() {
        let fx = fixture();
        let reservation = fx
            .manager
            .create(create_req(tomorrow_at(10), vec![selection("Baguette", 2)]))
            .await
            .unwrap();

        assert_eq!(reservation.price, 10.0);
        assert_eq!(reservation.status, ReservationStatus::Pending);
        assert_eq!(fx.store.reservation_count(), 1);

        let view = fx.manager.most_recent_by_member(1).await.unwrap();
        assert_eq!(view.breads.len(), 1);
        assert_eq!(view.breads[0].count, 2);
        assert_eq!(view.breads[0].name, "Baguette");
    }

    #[tokio::test]
    async fn create_outside_window_never_touches_the_store() {
        let fx = fixture();
        let err = fx
            .manager
            .create(create_req(tomorrow_at(7), vec![selection("Baguette", 1)]))
            .await
            .unwrap_err();

        assert!(matches!(err, ReservationError::InvalidPickupTime(_)));
        assert_eq!(fx.store.reservation_count(), 0);
    }

    #[tokio::test]
    async fn create_with_unknown_bread_fails_before_persisting() {
        let fx = fixture();
        let err = fx
            .manager
            .create(create_req(tomorrow_at(10), vec![selection("Ciabatta", 1)]))
            .await
            .unwrap_err();

        assert!(matches!(err, ReservationError::BreadNotFound(_)));
        assert_eq!(fx.store.reservation_count(), 0);
    }

    #[tokio::test]
    async fn create_with_unknown_member_fails() {
        let fx = fixture();
        let mut req = create_req(tomorrow_at(10), vec![selection("Rye", 1)]);
        req.member_id = 404;
        let err = fx.manager.create(req).await.unwrap_err();
        assert!(matches!(err, ReservationError::MemberNotFound(404)));
    }

    #[tokio::test]
    async fn create_rejects_empty_and_nonpositive_selections() {
        let fx = fixture();
        let err = fx
            .manager
            .create(create_req(tomorrow_at(10), vec![]))
            .await
            .unwrap_err();
        assert!(matches!(err, ReservationError::EmptySelection));

        let err = fx
            .manager
            .create(create_req(tomorrow_at(10), vec![selection("Rye", 0)]))
            .await
            .unwrap_err();
        assert!(matches!(err, ReservationError::InvalidCount(_, 0)));
    }

    #[tokio::test]
    async fn selection_order_maps_positionally_onto_line_items() {
        let fx = fixture();
        fx.manager
            .create(create_req(
                tomorrow_at(11),
                vec![selection("Rye", 3), selection("Baguette", 1)],
            ))
            .await
            .unwrap();

        let view = fx.manager.most_recent_by_member(1).await.unwrap();
        assert_eq!(view.breads[0].name, "Rye");
        assert_eq!(view.breads[0].count, 3);
        assert_eq!(view.breads[1].name, "Baguette");
        assert_eq!(view.breads[1].count, 1);
        // 3 * 3.0 + 1 * 5.0
        assert_eq!(view.price, 14.0);
    }

    #[tokio::test]
    async fn update_replaces_the_aggregate_in_place() {
        let fx = fixture();
        let created = fx
            .manager
            .create(create_req(tomorrow_at(10), vec![selection("Baguette", 2)]))
            .await
            .unwrap();

        let updated = fx
            .manager
            .update(ReservationUpdate {
                reservation_id: created.id,
                create: create_req(tomorrow_at(12), vec![selection("Rye", 1)]),
            })
            .await
            .unwrap();

        assert_eq!(updated.id, created.id);
        assert_eq!(updated.price, 3.0);
        assert_eq!(fx.store.reservation_count(), 1);

        let view = fx.manager.most_recent_by_member(1).await.unwrap();
        assert_eq!(view.breads.len(), 1);
        assert_eq!(view.breads[0].name, "Rye");
    }

    #[tokio::test]
    async fn update_unknown_id_is_not_found() {
        let fx = fixture();
        let err = fx
            .manager
            .update(ReservationUpdate {
                reservation_id: 12345,
                create: create_req(tomorrow_at(10), vec![selection("Rye", 1)]),
            })
            .await
            .unwrap_err();
        assert!(matches!(err, ReservationError::NotFound(12345)));
    }

    #[tokio::test]
    async fn advance_status_walks_pending_to_complete_and_stops() {
        let fx = fixture();
        let created = fx
            .manager
            .create(create_req(tomorrow_at(10), vec![selection("Rye", 1)]))
            .await
            .unwrap();

        let advanced = fx.manager.advance_status(created.id).await.unwrap();
        assert_eq!(advanced.status, ReservationStatus::Complete);

        // Terminal: advancing again is a no-op
        let again = fx.manager.advance_status(created.id).await.unwrap();
        assert_eq!(again.status, ReservationStatus::Complete);
    }

    #[tokio::test]
    async fn advance_status_unknown_id_mutates_nothing() {
        let fx = fixture();
        let err = fx.manager.advance_status(999).await.unwrap_err();
        assert!(matches!(err, ReservationError::NotFound(999)));
        assert_eq!(fx.store.reservation_count(), 0);
    }

    #[tokio::test]
    async fn delete_unknown_id_is_not_found() {
        let fx = fixture();
        let err = fx.manager.delete(31337).await.unwrap_err();
        assert!(matches!(err, ReservationError::NotFound(31337)));
    }

    #[tokio::test]
    async fn queries_group_rows_and_tolerate_empty_results() {
        let fx = fixture();
        // No data yet: list queries come back empty, not as errors
        let views = fx
            .manager
            .by_member_and_status(1, ReservationStatus::Pending)
            .await
            .unwrap();
        assert!(views.is_empty());

        fx.manager
            .create(create_req(
                tomorrow_at(10),
                vec![selection("Baguette", 1), selection("Rye", 2)],
            ))
            .await
            .unwrap();

        let views = fx
            .manager
            .by_member_and_status(1, ReservationStatus::Pending)
            .await
            .unwrap();
        assert_eq!(views.len(), 1);
        assert_eq!(views[0].breads.len(), 2);
    }

    #[tokio::test]
    async fn by_date_uses_the_full_day_window() {
        let fx = fixture();
        let pickup = tomorrow_at(19);
        fx.manager
            .create(create_req(pickup, vec![selection("Rye", 1)]))
            .await
            .unwrap();

        let date = chrono::DateTime::from_timestamp_millis(pickup)
            .unwrap()
            .date_naive();
        let views = fx
            .manager
            .by_date(date, ReservationStatus::Pending)
            .await
            .unwrap();
        assert_eq!(views.len(), 1);

        let empty = fx
            .manager
            .by_date(date + Duration::days(1), ReservationStatus::Pending)
            .await
            .unwrap();
        assert!(empty.is_empty());
    }

    #[tokio::test]
    async fn most_recent_without_reservations_is_typed() {
        let fx = fixture();
        let err = fx.manager.most_recent_by_member(1).await.unwrap_err();
        assert!(matches!(err, ReservationError::NoReservations(1)));
    }
}
