//! Reservation domain
//!
//! # Structure
//!
//! - [`window`] - pure pickup-window validation
//! - [`grouping`] - flat-row to grouped-view transformation
//! - [`manager`] - lifecycle orchestration over the collaborators
//! - [`rollup`] - daily completed-sales rollup scheduler
//! - [`error`] - domain error type

pub mod error;
pub mod grouping;
pub mod manager;
pub mod rollup;
pub mod window;

// Re-exports
pub use error::{ReservationError, ReservationResult};
pub use grouping::{group_rows, group_single};
pub use manager::ReservationManager;
pub use rollup::RollupScheduler;
pub use window::validate_pickup;
