//! In-memory reference store
//!
//! Implements [`ReservationStore`] with a single `RwLock` around the whole
//! aggregate map, so every mutation is trivially atomic: reservation and
//! line items change together or not at all. Row queries walk the id-keyed
//! map one reservation at a time, so each reservation's rows come out in
//! one unbroken run, which is all the grouping layer requires.

use std::collections::BTreeMap;

use async_trait::async_trait;
use parking_lot::RwLock;
use rust_decimal::prelude::*;

use shared::models::{
    LineDraft, Reservation, ReservationDraft, ReservationInfo, ReservationRow, ReservationStatus,
    SalesAggregate,
};
use shared::util::{now_millis, snowflake_id};

use super::{RepoError, RepoResult, ReservationStore};

#[derive(Default)]
struct StoreInner {
    reservations: BTreeMap<i64, Reservation>,
    /// Line items keyed by owning reservation id; cascade-deleted with it.
    items: BTreeMap<i64, Vec<ReservationInfo>>,
}

/// In-memory reservation store.
#[derive(Default)]
pub struct MemoryReservationStore {
    inner: RwLock<StoreInner>,
}

fn build_items(reservation_id: i64, drafts: &[LineDraft]) -> Vec<ReservationInfo> {
    drafts
        .iter()
        .map(|d| ReservationInfo {
            reservation_id,
            bread_id: d.bread_id,
            bread_name: d.bread_name.clone(),
            bread_price: d.bread_price,
            count: d.count,
        })
        .collect()
}

fn rows_of(reservation: &Reservation, items: &[ReservationInfo]) -> Vec<ReservationRow> {
    items
        .iter()
        .map(|item| ReservationRow {
            reservation_id: reservation.id,
            member_id: reservation.member_id,
            pickup_at: reservation.pickup_at,
            status: reservation.status,
            price: reservation.price,
            bread_name: item.bread_name.clone(),
            bread_price: item.bread_price,
            bread_count: item.count,
        })
        .collect()
}

impl MemoryReservationStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored reservations (test/inspection helper).
    pub fn reservation_count(&self) -> usize {
        self.inner.read().reservations.len()
    }

    fn collect_rows<F>(&self, filter: F) -> Vec<ReservationRow>
    where
        F: Fn(&Reservation) -> bool,
    {
        let inner = self.inner.read();
        let mut rows = Vec::new();
        for reservation in inner.reservations.values().filter(|r| filter(r)) {
            if let Some(items) = inner.items.get(&reservation.id) {
                rows.extend(rows_of(reservation, items));
            }
        }
        rows
    }
}

#[async_trait]
impl ReservationStore for MemoryReservationStore {
    async fn create(&self, draft: ReservationDraft) -> RepoResult<Reservation> {
        let id = snowflake_id();
        let now = now_millis();
        let reservation = Reservation {
            id,
            member_id: draft.member_id,
            pickup_at: draft.pickup_at,
            price: draft.price,
            status: ReservationStatus::Pending,
            created_at: now,
            updated_at: now,
        };
        let items = build_items(id, &draft.items);

        let mut inner = self.inner.write();
        inner.reservations.insert(id, reservation.clone());
        inner.items.insert(id, items);
        Ok(reservation)
    }

    async fn replace(&self, id: i64, draft: ReservationDraft) -> RepoResult<Reservation> {
        let now = now_millis();
        let mut inner = self.inner.write();
        let old = inner
            .reservations
            .get(&id)
            .ok_or_else(|| RepoError::NotFound(format!("Reservation {}", id)))?;

        let reservation = Reservation {
            id,
            member_id: draft.member_id,
            pickup_at: draft.pickup_at,
            price: draft.price,
            status: ReservationStatus::Pending,
            created_at: old.created_at,
            updated_at: now,
        };
        let items = build_items(id, &draft.items);

        inner.reservations.insert(id, reservation.clone());
        inner.items.insert(id, items);
        Ok(reservation)
    }

    async fn delete(&self, id: i64) -> RepoResult<()> {
        let mut inner = self.inner.write();
        if inner.reservations.remove(&id).is_none() {
            return Err(RepoError::NotFound(format!("Reservation {}", id)));
        }
        inner.items.remove(&id);
        Ok(())
    }

    async fn find_by_id(&self, id: i64) -> RepoResult<Option<Reservation>> {
        Ok(self.inner.read().reservations.get(&id).cloned())
    }

    async fn set_status(&self, id: i64, status: ReservationStatus) -> RepoResult<Reservation> {
        let mut inner = self.inner.write();
        let reservation = inner
            .reservations
            .get_mut(&id)
            .ok_or_else(|| RepoError::NotFound(format!("Reservation {}", id)))?;
        reservation.status = status;
        reservation.updated_at = now_millis();
        Ok(reservation.clone())
    }

    async fn rows_by_member_and_status(
        &self,
        member_id: i64,
        status: ReservationStatus,
    ) -> RepoResult<Vec<ReservationRow>> {
        Ok(self.collect_rows(|r| r.member_id == member_id && r.status == status))
    }

    async fn rows_most_recent(&self, member_id: i64) -> RepoResult<Vec<ReservationRow>> {
        let inner = self.inner.read();
        let latest = inner
            .reservations
            .values()
            .filter(|r| r.member_id == member_id)
            .max_by_key(|r| (r.created_at, r.id));

        let rows = match latest {
            Some(reservation) => inner
                .items
                .get(&reservation.id)
                .map(|items| rows_of(reservation, items))
                .unwrap_or_default(),
            None => Vec::new(),
        };
        Ok(rows)
    }

    async fn rows_by_pickup_range(
        &self,
        status: ReservationStatus,
        start: i64,
        end: i64,
    ) -> RepoResult<Vec<ReservationRow>> {
        Ok(self.collect_rows(|r| {
            r.status == status && r.pickup_at >= start && r.pickup_at <= end
        }))
    }

    async fn sales_aggregate(
        &self,
        status: ReservationStatus,
        start: i64,
        end: i64,
    ) -> RepoResult<Option<SalesAggregate>> {
        let inner = self.inner.read();
        let matching: Vec<&Reservation> = inner
            .reservations
            .values()
            .filter(|r| r.status == status && r.pickup_at >= start && r.pickup_at <= end)
            .collect();

        if matching.is_empty() {
            return Ok(None);
        }

        // Sum in Decimal so per-reservation rounding noise never accumulates
        let total: Decimal = matching
            .iter()
            .filter_map(|r| Decimal::from_f64(r.price))
            .sum();
        Ok(Some(SalesAggregate {
            reservation_count: matching.len() as i64,
            total_revenue: total.round_dp(2).to_f64().unwrap_or(0.0),
        }))
    }
}
