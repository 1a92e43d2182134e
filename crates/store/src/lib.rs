//! Local booking store for the trip booking system.
//!
//! Owns customers, hotels, hotel bookings, and composite trip booking
//! records in one transactional resource. Two implementations are
//! provided: [`InMemoryBookingStore`] for tests and local development,
//! and [`PostgresBookingStore`] backed by sqlx.
//!
//! Unique keys (customer email, hotel phone number, hotel+date booking
//! pair) are enforced here. Application-level uniqueness checks are
//! advisory; the typed duplicate errors raised by the store are the
//! authoritative defense against racing writers.

pub mod error;
pub mod memory;
pub mod postgres;
pub mod records;
pub mod store;

pub use common::{BookingId, CustomerId, HotelId, TripId};
pub use error::{Result, StoreError};
pub use memory::InMemoryBookingStore;
pub use postgres::PostgresBookingStore;
pub use records::{Booking, Customer, Hotel, TripBooking};
pub use store::BookingStore;
