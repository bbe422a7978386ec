//! Server state - shared handles to configuration and collaborators

use std::sync::Arc;

use crate::core::tasks::{BackgroundTasks, TaskKind};
use crate::core::Config;
use crate::db::{MemoryReservationStore, ReservationStore};
use crate::reservations::{ReservationManager, RollupScheduler};
use crate::services::{
    BreadCatalog, MemberDirectory, MemoryBreadCatalog, MemoryMemberDirectory, MemorySalesLog,
    SalesSink,
};

/// Shared server state.
///
/// Holds the configuration and Arc'd collaborator handles; cloning is a
/// shallow copy, so every handler and background task works against the
/// same instances.
#[derive(Clone)]
pub struct ServerState {
    pub config: Config,
    pub store: Arc<dyn ReservationStore>,
    pub directory: Arc<dyn MemberDirectory>,
    pub catalog: Arc<dyn BreadCatalog>,
    pub sales: Arc<dyn SalesSink>,
    pub manager: ReservationManager,
}

impl std::fmt::Debug for ServerState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServerState")
            .field("config", &self.config)
            .field("manager", &self.manager)
            .finish()
    }
}

impl ServerState {
    /// Assemble state from explicit collaborators.
    pub fn new(
        config: Config,
        store: Arc<dyn ReservationStore>,
        directory: Arc<dyn MemberDirectory>,
        catalog: Arc<dyn BreadCatalog>,
        sales: Arc<dyn SalesSink>,
    ) -> Self {
        let manager = ReservationManager::new(
            store.clone(),
            directory.clone(),
            catalog.clone(),
            config.business_tz,
        );
        Self {
            config,
            store,
            directory,
            catalog,
            sales,
            manager,
        }
    }

    /// Default wiring: in-memory reference adapters for every collaborator.
    /// Production deployments call [`ServerState::new`] with their own.
    pub fn with_memory_adapters(config: &Config) -> Self {
        Self::new(
            config.clone(),
            Arc::new(MemoryReservationStore::new()),
            Arc::new(MemoryMemberDirectory::new()),
            Arc::new(MemoryBreadCatalog::new()),
            Arc::new(MemorySalesLog::new()),
        )
    }

    /// Register background tasks. Must run before the server starts
    /// accepting requests.
    pub fn start_background_tasks(&self, tasks: &mut BackgroundTasks) {
        let scheduler = RollupScheduler::new(
            self.store.clone(),
            self.sales.clone(),
            self.config.business_tz,
            self.config.rollup_fire_time,
            self.config.rollup_weekdays_only,
            tasks.shutdown_token(),
        );
        tasks.spawn("sales_rollup", TaskKind::Periodic, scheduler.run());
    }
}
