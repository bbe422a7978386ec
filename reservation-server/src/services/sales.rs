//! Sales Sink

use async_trait::async_trait;
use parking_lot::RwLock;

use shared::models::ReservationSale;

use crate::db::RepoResult;

/// Sales persistence collaborator: accepts the precomputed daily aggregate.
#[async_trait]
pub trait SalesSink: Send + Sync {
    async fn save_daily_sale(&self, sale: ReservationSale) -> RepoResult<()>;
}

/// In-memory sales log.
#[derive(Default)]
pub struct MemorySalesLog {
    sales: RwLock<Vec<ReservationSale>>,
}

impl MemorySalesLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Everything saved so far (test/inspection helper).
    pub fn saved(&self) -> Vec<ReservationSale> {
        self.sales.read().clone()
    }
}

#[async_trait]
impl SalesSink for MemorySalesLog {
    async fn save_daily_sale(&self, sale: ReservationSale) -> RepoResult<()> {
        tracing::info!(
            business_date = %sale.business_date,
            reservations = sale.reservation_count,
            revenue = sale.total_revenue,
            "Daily sale recorded"
        );
        self.sales.write().push(sale);
        Ok(())
    }
}
