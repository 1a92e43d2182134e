//! Record types persisted by the booking store.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use common::{BookingId, CustomerId, HotelId, TripId};

/// A customer of the local hotel subsystem.
///
/// The flight and taxi subsystems keep their own, entirely separate
/// customer records; the only cross-system correlation is the email
/// address (exact, case-sensitive match).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Customer {
    pub id: CustomerId,
    pub first_name: String,
    pub last_name: String,
    /// Globally unique within the local store.
    pub email: String,
    pub phone_number: String,
}

/// A hotel available for booking.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Hotel {
    pub id: HotelId,
    pub name: String,
    pub postcode: String,
    /// Globally unique within the local store.
    pub phone_number: String,
}

/// A local hotel booking: one reservable room-day.
///
/// Invariant: the pair `(hotel_id, date)` is unique among live bookings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Booking {
    pub id: BookingId,
    pub hotel_id: HotelId,
    pub customer_id: CustomerId,
    pub date: NaiveDate,
}

impl Booking {
    /// Creates a booking with a fresh id.
    pub fn new(hotel_id: HotelId, customer_id: CustomerId, date: NaiveDate) -> Self {
        Self {
            id: BookingId::new(),
            hotel_id,
            customer_id,
            date,
        }
    }
}

/// The composite record linking the three legs of a booked trip.
///
/// Persisted only once all three legs have completed; deleted only
/// after all three legs have been cancelled. The flight and taxi ids
/// are opaque strings minted by the remote subsystems.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TripBooking {
    pub id: TripId,
    pub hotel_customer_id: CustomerId,
    pub hotel_booking_id: BookingId,
    pub flight_customer_id: String,
    pub flight_booking_id: String,
    pub taxi_customer_id: String,
    pub taxi_booking_id: String,
}
