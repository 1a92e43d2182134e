//! Domain layer for the trip booking system.
//!
//! Provides field validation, the advisory uniqueness validator, and
//! the resource services (customers, hotels, bookings, guest bookings)
//! built on a generic [`store::BookingStore`]. The services perform
//! check-then-act uniqueness validation before writing and translate
//! the store's own constraint violations into the same conflict
//! errors, so a lost race produces the identical outcome.

pub mod booking;
pub mod customer;
pub mod error;
pub mod guest;
pub mod hotel;
pub mod unique;
pub mod validate;

pub use booking::{BookingService, NewBooking};
pub use customer::{CustomerService, NewCustomer};
pub use error::{DomainError, FieldViolations};
pub use guest::{GuestBooking, GuestBookingService};
pub use hotel::{HotelService, NewHotel};
pub use unique::UniquenessValidator;
