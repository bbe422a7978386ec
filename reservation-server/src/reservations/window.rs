//! Pickup window validation
//!
//! Pickups happen between the morning and evening cutoffs of the bakery's
//! business day, and never in the past. The hour bounds are exclusive:
//! hour 8 and hour 20 are both rejected, so valid pickups fall in hours
//! 9..=19 local time. Minutes and seconds are only bounded by the
//! after-now check.

use chrono_tz::Tz;

use super::error::{ReservationError, ReservationResult};
use crate::utils::time::{format_local, local_hour};

/// Earliest hour (exclusive) a pickup may be scheduled.
const OPEN_HOUR: u32 = 8;
/// Latest hour (exclusive) a pickup may be scheduled.
const CLOSE_HOUR: u32 = 20;

/// Validate a candidate pickup instant against `now`.
///
/// Pure: both instants are injected, the hour is evaluated in `tz`.
pub fn validate_pickup(pickup_at: i64, now: i64, tz: Tz) -> ReservationResult<()> {
    let hour = local_hour(pickup_at, tz)
        .ok_or_else(|| ReservationError::InvalidPickupTime(format!("millis {}", pickup_at)))?;

    if pickup_at > now && hour > OPEN_HOUR && hour < CLOSE_HOUR {
        Ok(())
    } else {
        Err(ReservationError::InvalidPickupTime(format_local(
            pickup_at, tz,
        )))
    }
}
