//! Storage boundary
//!
//! The reservation store is a collaborator interface: the core orchestrates
//! against [`ReservationStore`] and assumes its atomicity guarantees, but
//! never implements persistence itself. [`memory::MemoryReservationStore`]
//! is the in-process reference implementation used by the default wiring
//! and the test suite.

pub mod memory;

// Re-exports
pub use memory::MemoryReservationStore;

use async_trait::async_trait;
use thiserror::Error;

use shared::models::{
    Reservation, ReservationDraft, ReservationRow, ReservationStatus, SalesAggregate,
};

/// Repository error types
#[derive(Debug, Error)]
pub enum RepoError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Duplicate: {0}")]
    Duplicate(String),

    #[error("Storage error: {0}")]
    Database(String),

    #[error("Validation error: {0}")]
    Validation(String),
}

/// Result type for repository operations
pub type RepoResult<T> = Result<T, RepoError>;

/// Reservation aggregate storage.
///
/// The reservation and its line items form one aggregate: `create` and
/// `replace` persist reservation + items as a single unit (a partial write
/// must never be observable), and `delete` cascades to the items. The
/// implementation owns the transaction boundary; callers assume
/// commit-or-rollback semantics and never compensate.
///
/// Every `rows_*` query returns flat joined rows with all rows of the same
/// reservation contiguous. The grouping layer depends on that contiguity
/// and does not re-sort.
#[async_trait]
pub trait ReservationStore: Send + Sync {
    /// Persist a new reservation aggregate. The stored reservation starts
    /// in `Pending` status.
    async fn create(&self, draft: ReservationDraft) -> RepoResult<Reservation>;

    /// Atomically replace the aggregate stored under `id`: the old line
    /// items are deleted and the draft inserted in one transaction, keeping
    /// the id and resetting status to `Pending`. `NotFound` when `id` is
    /// absent, leaving the original aggregate intact.
    async fn replace(&self, id: i64, draft: ReservationDraft) -> RepoResult<Reservation>;

    /// Delete the reservation and cascade-delete its line items.
    /// `NotFound` when `id` is absent.
    async fn delete(&self, id: i64) -> RepoResult<()>;

    async fn find_by_id(&self, id: i64) -> RepoResult<Option<Reservation>>;

    /// Persist a status change. `NotFound` when `id` is absent.
    async fn set_status(&self, id: i64, status: ReservationStatus) -> RepoResult<Reservation>;

    /// All rows of a member's reservations in the given status.
    async fn rows_by_member_and_status(
        &self,
        member_id: i64,
        status: ReservationStatus,
    ) -> RepoResult<Vec<ReservationRow>>;

    /// All rows of the member's most recently created reservation,
    /// regardless of status. Empty when the member has none.
    async fn rows_most_recent(&self, member_id: i64) -> RepoResult<Vec<ReservationRow>>;

    /// All rows of reservations in the given status with pickup inside
    /// `start..=end` (millis, inclusive end).
    async fn rows_by_pickup_range(
        &self,
        status: ReservationStatus,
        start: i64,
        end: i64,
    ) -> RepoResult<Vec<ReservationRow>>;

    /// Count + revenue over reservations in the given status with pickup
    /// inside `start..=end`. `None` when nothing matches.
    async fn sales_aggregate(
        &self,
        status: ReservationStatus,
        start: i64,
        end: i64,
    ) -> RepoResult<Option<SalesAggregate>>;
}
