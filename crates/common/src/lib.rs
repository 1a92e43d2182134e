//! Shared identifier types used across the trip booking system.

pub mod types;

pub use types::{BookingId, CustomerId, HotelId, TripId};
