use async_trait::async_trait;
use chrono::NaiveDate;

use common::{BookingId, CustomerId, HotelId, TripId};

use crate::Result;
use crate::records::{Booking, Customer, Hotel, TripBooking};

/// Core trait for local booking store implementations.
///
/// All implementations must be thread-safe (`Send + Sync`) and must
/// enforce the three unique keys (customer email, hotel phone number,
/// and the `(hotel, date)` booking pair), returning the corresponding
/// `Duplicate*` error when a write would violate one. Deleting a hotel
/// or a customer also deletes the bookings referencing it, matching
/// the cascade behavior of the Postgres schema.
#[async_trait]
pub trait BookingStore: Send + Sync {
    // -- customers --

    /// Persists a new customer. Fails with `DuplicateEmail` if another
    /// customer already holds the email.
    async fn create_customer(&self, customer: Customer) -> Result<Customer>;

    /// Replaces an existing customer record. The email uniqueness check
    /// excludes the record being updated.
    async fn update_customer(&self, customer: Customer) -> Result<Customer>;

    async fn find_customer(&self, id: CustomerId) -> Result<Option<Customer>>;

    /// Exact, case-sensitive email lookup.
    async fn find_customer_by_email(&self, email: &str) -> Result<Option<Customer>>;

    async fn list_customers(&self) -> Result<Vec<Customer>>;

    async fn delete_customer(&self, id: CustomerId) -> Result<()>;

    // -- hotels --

    /// Persists a new hotel. Fails with `DuplicatePhone` if another
    /// hotel already holds the phone number.
    async fn create_hotel(&self, hotel: Hotel) -> Result<Hotel>;

    async fn find_hotel(&self, id: HotelId) -> Result<Option<Hotel>>;

    async fn find_hotel_by_phone(&self, phone_number: &str) -> Result<Option<Hotel>>;

    async fn list_hotels(&self) -> Result<Vec<Hotel>>;

    async fn delete_hotel(&self, id: HotelId) -> Result<()>;

    // -- bookings --

    /// Persists a new booking. Fails with `DuplicateHotelDate` if the
    /// room-day is taken, or `HotelNotFound`/`CustomerNotFound` if a
    /// referenced record does not exist.
    async fn create_booking(&self, booking: Booking) -> Result<Booking>;

    async fn find_booking(&self, id: BookingId) -> Result<Option<Booking>>;

    async fn find_booking_by_hotel_and_date(
        &self,
        hotel_id: HotelId,
        date: NaiveDate,
    ) -> Result<Option<Booking>>;

    async fn list_bookings(&self) -> Result<Vec<Booking>>;

    async fn delete_booking(&self, id: BookingId) -> Result<()>;

    // -- guest booking --

    /// Persists a new customer and their booking as one atomic unit.
    ///
    /// Either both records are written or neither is; any uniqueness or
    /// reference failure from either write rolls the whole unit back.
    /// The booking's `customer_id` must be the new customer's id.
    async fn create_guest_booking(
        &self,
        customer: Customer,
        booking: Booking,
    ) -> Result<(Customer, Booking)>;

    // -- trip bookings --

    async fn create_trip_booking(&self, trip: TripBooking) -> Result<TripBooking>;

    async fn find_trip_booking(&self, id: TripId) -> Result<Option<TripBooking>>;

    async fn list_trip_bookings(&self) -> Result<Vec<TripBooking>>;

    async fn delete_trip_booking(&self, id: TripId) -> Result<()>;
}
