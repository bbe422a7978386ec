//! Reservation API Handlers

use axum::{
    Json,
    extract::{Path, Query, State},
};

use crate::core::ServerState;
use crate::utils::time::parse_date;
use crate::utils::{AppResponse, AppResult, ok};
use shared::models::{
    Reservation, ReservationCreate, ReservationStatus, ReservationUpdate, ReservationView,
};

#[derive(serde::Deserialize)]
pub struct StatusQuery {
    pub status: ReservationStatus,
}

#[derive(serde::Deserialize)]
pub struct RangeQuery {
    pub start: String,
    pub end: String,
    pub status: ReservationStatus,
}

/// POST /api/reservations - create a reservation
pub async fn create(
    State(state): State<ServerState>,
    Json(payload): Json<ReservationCreate>,
) -> AppResult<Json<Reservation>> {
    let reservation = state.manager.create(payload).await?;
    Ok(Json(reservation))
}

/// PUT /api/reservations - replace an existing reservation
pub async fn update(
    State(state): State<ServerState>,
    Json(payload): Json<ReservationUpdate>,
) -> AppResult<Json<Reservation>> {
    let reservation = state.manager.update(payload).await?;
    Ok(Json(reservation))
}

/// DELETE /api/reservations/{id} - delete a reservation and its line items
pub async fn remove(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<AppResponse<i64>>> {
    state.manager.delete(id).await?;
    Ok(ok(id))
}

/// POST /api/reservations/{id}/status - advance to the next status
pub async fn advance_status(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<Reservation>> {
    let reservation = state.manager.advance_status(id).await?;
    Ok(Json(reservation))
}

/// GET /api/reservations/{id}
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<Reservation>> {
    let reservation = state.manager.find_by_id(id).await?;
    Ok(Json(reservation))
}

/// GET /api/reservations/member/{member_id}?status=PENDING
pub async fn by_member(
    State(state): State<ServerState>,
    Path(member_id): Path<i64>,
    Query(query): Query<StatusQuery>,
) -> AppResult<Json<Vec<ReservationView>>> {
    let views = state
        .manager
        .by_member_and_status(member_id, query.status)
        .await?;
    Ok(Json(views))
}

/// GET /api/reservations/member/{member_id}/recent - most recent
/// reservation regardless of status
pub async fn most_recent(
    State(state): State<ServerState>,
    Path(member_id): Path<i64>,
) -> AppResult<Json<ReservationView>> {
    let view = state.manager.most_recent_by_member(member_id).await?;
    Ok(Json(view))
}

/// GET /api/reservations/date/{date}?status=COMPLETE - one full calendar
/// day in the business timezone
pub async fn by_date(
    State(state): State<ServerState>,
    Path(date): Path<String>,
    Query(query): Query<StatusQuery>,
) -> AppResult<Json<Vec<ReservationView>>> {
    let date = parse_date(&date)?;
    let views = state.manager.by_date(date, query.status).await?;
    Ok(Json(views))
}

/// GET /api/reservations/range?start=...&end=...&status=...
pub async fn by_date_range(
    State(state): State<ServerState>,
    Query(query): Query<RangeQuery>,
) -> AppResult<Json<Vec<ReservationView>>> {
    let start = parse_date(&query.start)?;
    let end = parse_date(&query.end)?;
    let views = state.manager.by_date_range(start, end, query.status).await?;
    Ok(Json(views))
}
