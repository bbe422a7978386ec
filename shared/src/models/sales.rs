//! Sales Rollup Models

use serde::{Deserialize, Serialize};

/// Count + revenue aggregate over a status/date window, as returned by the
/// reservation store. Absent (rather than zeroed) when no reservations
/// match the window.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SalesAggregate {
    pub reservation_count: i64,
    pub total_revenue: f64,
}

/// One business day's completed-reservation sales, forwarded to the sales
/// collaborator by the daily rollup.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReservationSale {
    /// Business date label, `YYYY-MM-DD`.
    pub business_date: String,
    pub reservation_count: i64,
    pub total_revenue: f64,
}

impl ReservationSale {
    pub fn from_aggregate(business_date: String, agg: SalesAggregate) -> Self {
        Self {
            business_date,
            reservation_count: agg.reservation_count,
            total_revenue: agg.total_revenue,
        }
    }
}
