//! Domain error type

use thiserror::Error;

use crate::db::RepoError;
use crate::utils::AppError;

/// Reservation domain errors. All are terminal for the current operation;
/// nothing here is retried.
#[derive(Debug, Error)]
pub enum ReservationError {
    #[error("Reservation not found: {0}")]
    NotFound(i64),

    #[error("Member not found: {0}")]
    MemberNotFound(i64),

    #[error("{0}")]
    BreadNotFound(String),

    #[error("No reservations for member {0}")]
    NoReservations(i64),

    #[error("Pickup time not allowed: {0}")]
    InvalidPickupTime(String),

    #[error("Reservation needs at least one bread selection")]
    EmptySelection,

    #[error("Bread count must be positive: {0} x {1}")]
    InvalidCount(String, i32),

    #[error("No reservation rows to group")]
    EmptyRows,

    #[error("No completed reservations for {0}")]
    EmptyAggregate(String),

    #[error("Storage error: {0}")]
    Store(RepoError),
}

pub type ReservationResult<T> = Result<T, ReservationError>;

impl From<ReservationError> for AppError {
    fn from(err: ReservationError) -> Self {
        match err {
            ReservationError::NotFound(id) => {
                AppError::NotFound(format!("Reservation {}", id))
            }
            ReservationError::MemberNotFound(id) => AppError::NotFound(format!("Member {}", id)),
            ReservationError::BreadNotFound(msg) => AppError::NotFound(msg),
            ReservationError::NoReservations(member_id) => {
                AppError::NotFound(format!("No reservations for member {}", member_id))
            }
            ReservationError::InvalidPickupTime(msg) => {
                AppError::Validation(format!("Pickup time not allowed: {}", msg))
            }
            ReservationError::EmptySelection | ReservationError::InvalidCount(..) => {
                AppError::Validation(err.to_string())
            }
            // Caller contract violation, not a client mistake
            ReservationError::EmptyRows => AppError::Internal(err.to_string()),
            ReservationError::EmptyAggregate(date) => {
                AppError::BusinessRule(format!("No completed reservations for {}", date))
            }
            ReservationError::Store(repo) => repo.into(),
        }
    }
}
