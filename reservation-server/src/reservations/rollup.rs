//! Daily sales rollup
//!
//! An explicitly constructed periodic task, registered at process start
//! and configured from [`crate::core::Config`]: once per business day (at
//! the configured fire time, weekdays only by default) it aggregates the
//! day's COMPLETE reservations and forwards count + revenue to the sales
//! collaborator.
//!
//! Each firing is fire-and-forget: a failure is logged and the loop waits
//! for the next fire time; nothing is retried within a firing.

use std::sync::Arc;

use chrono::{Datelike, NaiveDate, NaiveTime, Weekday};
use chrono_tz::Tz;
use tokio_util::sync::CancellationToken;

use shared::models::{ReservationSale, ReservationStatus};

use super::error::{ReservationError, ReservationResult};
use crate::db::ReservationStore;
use crate::services::SalesSink;
use crate::utils::time;

pub struct RollupScheduler {
    store: Arc<dyn ReservationStore>,
    sales: Arc<dyn SalesSink>,
    tz: Tz,
    /// Local fire time, e.g. 23:00.
    fire_time: NaiveTime,
    /// Skip Saturday/Sunday firings.
    weekdays_only: bool,
    shutdown: CancellationToken,
}

impl RollupScheduler {
    pub fn new(
        store: Arc<dyn ReservationStore>,
        sales: Arc<dyn SalesSink>,
        tz: Tz,
        fire_time: NaiveTime,
        weekdays_only: bool,
        shutdown: CancellationToken,
    ) -> Self {
        Self {
            store,
            sales,
            tz,
            fire_time,
            weekdays_only,
            shutdown,
        }
    }

    /// Main loop: sleep until the next fire instant, roll up, repeat.
    pub async fn run(self) {
        tracing::info!(
            fire_time = %self.fire_time,
            weekdays_only = self.weekdays_only,
            "Sales rollup scheduler started"
        );

        loop {
            let wait = self.until_next_fire();
            tokio::select! {
                _ = self.shutdown.cancelled() => break,
                _ = tokio::time::sleep(wait) => {}
            }

            let today = time::today(self.tz);
            if self.weekdays_only && is_weekend(today) {
                tracing::debug!(date = %today, "Skipping weekend rollup");
                continue;
            }

            match self.run_once(today).await {
                Ok(sale) => {
                    tracing::info!(
                        business_date = %sale.business_date,
                        reservations = sale.reservation_count,
                        revenue = sale.total_revenue,
                        "Daily sales rollup saved"
                    );
                }
                Err(e) => {
                    tracing::error!(date = %today, error = %e, "Daily sales rollup failed");
                }
            }
        }

        tracing::info!("Sales rollup scheduler stopped");
    }

    /// Roll up one calendar day: aggregate COMPLETE reservations over the
    /// full-day window and forward to the sales sink. A day without
    /// completed reservations fails with `EmptyAggregate` and the sink is
    /// never invoked.
    pub async fn run_once(&self, date: NaiveDate) -> ReservationResult<ReservationSale> {
        let (start, end) = time::day_bounds_millis(date, self.tz);

        let aggregate = self
            .store
            .sales_aggregate(ReservationStatus::Complete, start, end)
            .await
            .map_err(ReservationError::Store)?
            .ok_or_else(|| ReservationError::EmptyAggregate(date.to_string()))?;

        let sale = ReservationSale::from_aggregate(date.format("%Y-%m-%d").to_string(), aggregate);
        self.sales
            .save_daily_sale(sale.clone())
            .await
            .map_err(ReservationError::Store)?;
        Ok(sale)
    }

    /// Duration until the next occurrence of `fire_time` in the business
    /// timezone.
    fn until_next_fire(&self) -> std::time::Duration {
        let now = chrono::Utc::now().with_timezone(&self.tz).naive_local();
        let mut next = now.date().and_time(self.fire_time);
        if next <= now {
            next = next + chrono::Duration::days(1);
        }
        (next - now)
            .to_std()
            .unwrap_or(std::time::Duration::from_secs(60))
    }
}

fn is_weekend(date: NaiveDate) -> bool {
    matches!(date.weekday(), Weekday::Sat | Weekday::Sun)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::MemoryReservationStore;
    use crate::services::MemorySalesLog;
    use chrono::TimeZone;
    use chrono_tz::UTC;
    use shared::models::{LineDraft, ReservationDraft};

    fn scheduler(
        store: Arc<MemoryReservationStore>,
        sales: Arc<MemorySalesLog>,
    ) -> RollupScheduler {
        RollupScheduler::new(
            store,
            sales,
            UTC,
            NaiveTime::from_hms_opt(23, 0, 0).unwrap(),
            true,
            CancellationToken::new(),
        )
    }

    fn draft_at(pickup_at: i64, price: f64) -> ReservationDraft {
        ReservationDraft {
            member_id: 1,
            pickup_at,
            price,
            items: vec![LineDraft {
                bread_id: 1,
                bread_name: "Baguette".to_string(),
                bread_price: price,
                count: 1,
            }],
        }
    }

    #[tokio::test]
    async fn empty_day_errors_and_never_touches_the_sink() {
        let store = Arc::new(MemoryReservationStore::new());
        let sales = Arc::new(MemorySalesLog::new());
        let rollup = scheduler(store, sales.clone());

        let date = NaiveDate::from_ymd_opt(2026, 6, 10).unwrap();
        let err = rollup.run_once(date).await.unwrap_err();
        assert!(matches!(err, ReservationError::EmptyAggregate(_)));
        assert!(sales.saved().is_empty());
    }

    #[tokio::test]
    async fn completed_reservations_roll_up_into_one_sale() {
        let store = Arc::new(MemoryReservationStore::new());
        let sales = Arc::new(MemorySalesLog::new());

        let date = NaiveDate::from_ymd_opt(2026, 6, 10).unwrap();
        let morning = UTC
            .with_ymd_and_hms(2026, 6, 10, 9, 30, 0)
            .unwrap()
            .timestamp_millis();
        let last_second = UTC
            .with_ymd_and_hms(2026, 6, 10, 23, 59, 59)
            .unwrap()
            .timestamp_millis();

        let a = store.create(draft_at(morning, 10.0)).await.unwrap();
        let b = store.create(draft_at(last_second, 4.5)).await.unwrap();
        // Pending reservation on the same day is excluded
        store.create(draft_at(morning, 99.0)).await.unwrap();

        store
            .set_status(a.id, ReservationStatus::Complete)
            .await
            .unwrap();
        store
            .set_status(b.id, ReservationStatus::Complete)
            .await
            .unwrap();

        let rollup = scheduler(store, sales.clone());
        let sale = rollup.run_once(date).await.unwrap();

        assert_eq!(sale.business_date, "2026-06-10");
        assert_eq!(sale.reservation_count, 2);
        assert_eq!(sale.total_revenue, 14.5);

        let saved = sales.saved();
        assert_eq!(saved.len(), 1);
        assert_eq!(saved[0].reservation_count, 2);
    }

    #[test]
    fn weekend_detection() {
        // 2026-06-13 is a Saturday
        assert!(is_weekend(NaiveDate::from_ymd_opt(2026, 6, 13).unwrap()));
        assert!(!is_weekend(NaiveDate::from_ymd_opt(2026, 6, 10).unwrap()));
    }
}
