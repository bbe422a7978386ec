//! Shared types for the Crumb reservation system
//!
//! Model and payload types used across the server crate and its tests,
//! plus small id/time utilities.

pub mod models;
pub mod util;

// Re-exports
pub use serde::{Deserialize, Serialize};
