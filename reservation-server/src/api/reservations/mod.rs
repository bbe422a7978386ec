//! Reservation API Module
//!
//! Lifecycle mutations plus the four query variants, all shaped by the
//! row grouper into nested reservation views.

mod handler;

use axum::{
    Router,
    routing::{get, post},
};

use crate::core::ServerState;

/// Reservation router
pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/reservations", routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        // Lifecycle
        .route("/", post(handler::create).put(handler::update))
        .route("/{id}", get(handler::get_by_id).delete(handler::remove))
        .route("/{id}/status", post(handler::advance_status))
        // Queries (grouped views)
        .route("/member/{member_id}", get(handler::by_member))
        .route("/member/{member_id}/recent", get(handler::most_recent))
        .route("/date/{date}", get(handler::by_date))
        .route("/range", get(handler::by_date_range))
}
