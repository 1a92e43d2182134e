use chrono::NaiveDate;
use thiserror::Error;

use common::{BookingId, CustomerId, HotelId, TripId};

/// Errors raised by booking store implementations.
///
/// The `Duplicate*` variants carry the store's unique-key enforcement:
/// they are produced both by the in-memory store's own checks and by
/// translation of the named Postgres constraints, so callers see the
/// same conflict outcome regardless of backend or of who won a race.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Another live customer already holds this email address.
    #[error("a customer with email {0} already exists")]
    DuplicateEmail(String),

    /// Another live hotel already holds this phone number.
    #[error("a hotel with phone number {0} already exists")]
    DuplicatePhone(String),

    /// The room-day identified by (hotel, date) is already booked.
    #[error("hotel {hotel_id} is already booked on {date}")]
    DuplicateHotelDate { hotel_id: HotelId, date: NaiveDate },

    /// Customer does not exist.
    #[error("customer not found: {0}")]
    CustomerNotFound(CustomerId),

    /// Hotel does not exist.
    #[error("hotel not found: {0}")]
    HotelNotFound(HotelId),

    /// Booking does not exist.
    #[error("booking not found: {0}")]
    BookingNotFound(BookingId),

    /// Trip booking record does not exist.
    #[error("trip booking not found: {0}")]
    TripNotFound(TripId),

    /// A database error occurred.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// A database migration error occurred.
    #[error("migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),
}

/// Result type for store operations.
pub type Result<T> = std::result::Result<T, StoreError>;
