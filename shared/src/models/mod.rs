//! Model Types
//!
//! Serde model types shared between the server layers:
//!
//! - [`Member`] - referenced reservation owner
//! - [`Bread`] - catalog item
//! - [`Reservation`] / [`ReservationInfo`] - the reservation aggregate
//! - [`ReservationRow`] / [`ReservationView`] - flat query row and grouped view
//! - [`ReservationSale`] - daily sales rollup aggregate

pub mod bread;
pub mod member;
pub mod reservation;
pub mod sales;

// Re-exports
pub use bread::{Bread, BreadSelection};
pub use member::Member;
pub use reservation::{
    LineDraft, Reservation, ReservationBread, ReservationCreate, ReservationDraft,
    ReservationInfo, ReservationRow, ReservationStatus, ReservationUpdate, ReservationView,
};
pub use sales::{ReservationSale, SalesAggregate};
