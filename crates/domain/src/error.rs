use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::Serialize;
use thiserror::Error;

use common::{BookingId, CustomerId, HotelId};
use store::StoreError;

/// Per-field validation failures, keyed by field name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FieldViolations(BTreeMap<String, String>);

impl FieldViolations {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a violation for a field. A later violation for the same
    /// field replaces the earlier one.
    pub fn add(&mut self, field: &str, message: impl Into<String>) {
        self.0.insert(field.to_string(), message.into());
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Converts accumulated violations into a validation error, or `Ok`
    /// if none were recorded.
    pub fn into_result(self) -> Result<(), DomainError> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(DomainError::Validation(self))
        }
    }

    pub fn fields(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl std::fmt::Display for FieldViolations {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut first = true;
        for (field, message) in &self.0 {
            if !first {
                write!(f, "; ")?;
            }
            write!(f, "{field}: {message}")?;
            first = false;
        }
        Ok(())
    }
}

/// Errors raised by domain services.
#[derive(Debug, Error)]
pub enum DomainError {
    /// One or more fields failed validation.
    #[error("validation failed: {0}")]
    Validation(FieldViolations),

    /// Another customer already holds this email address.
    #[error("the email {0} is already used by another customer")]
    EmailInUse(String),

    /// Another hotel already holds this phone number.
    #[error("the phone number {0} is already used by another hotel")]
    PhoneInUse(String),

    /// The room-day identified by (hotel, date) is already booked.
    #[error("hotel {hotel_id} is already booked on {date}")]
    HotelDateTaken { hotel_id: HotelId, date: NaiveDate },

    /// Customer does not exist.
    #[error("customer not found: {0}")]
    CustomerNotFound(CustomerId),

    /// Hotel does not exist.
    #[error("hotel not found: {0}")]
    HotelNotFound(HotelId),

    /// Booking does not exist.
    #[error("booking not found: {0}")]
    BookingNotFound(BookingId),

    /// A store failure with no domain meaning.
    #[error("store error: {0}")]
    Store(StoreError),
}

/// Translates store errors into domain errors.
///
/// Unique-constraint violations become the same conflict variants the
/// advisory uniqueness validator produces, closing the race window the
/// check-then-act validation cannot close on its own.
impl From<StoreError> for DomainError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::DuplicateEmail(email) => DomainError::EmailInUse(email),
            StoreError::DuplicatePhone(phone) => DomainError::PhoneInUse(phone),
            StoreError::DuplicateHotelDate { hotel_id, date } => {
                DomainError::HotelDateTaken { hotel_id, date }
            }
            StoreError::CustomerNotFound(id) => DomainError::CustomerNotFound(id),
            StoreError::HotelNotFound(id) => DomainError::HotelNotFound(id),
            StoreError::BookingNotFound(id) => DomainError::BookingNotFound(id),
            other => DomainError::Store(other),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn violations_display_in_field_order() {
        let mut v = FieldViolations::new();
        v.add("phone_number", "must be 11 digits starting with 0");
        v.add("email", "must be a valid email address");

        assert_eq!(
            v.to_string(),
            "email: must be a valid email address; phone_number: must be 11 digits starting with 0"
        );
    }

    #[test]
    fn empty_violations_convert_to_ok() {
        assert!(FieldViolations::new().into_result().is_ok());

        let mut v = FieldViolations::new();
        v.add("email", "required");
        assert!(matches!(
            v.into_result(),
            Err(DomainError::Validation(_))
        ));
    }

    #[test]
    fn store_duplicates_translate_to_conflicts() {
        let e: DomainError = StoreError::DuplicateEmail("a@x.com".to_string()).into();
        assert!(matches!(e, DomainError::EmailInUse(_)));

        let e: DomainError = StoreError::DuplicatePhone("01900000001".to_string()).into();
        assert!(matches!(e, DomainError::PhoneInUse(_)));

        let e: DomainError = StoreError::DuplicateHotelDate {
            hotel_id: HotelId::new(),
            date: NaiveDate::from_ymd_opt(2030, 6, 1).unwrap(),
        }
        .into();
        assert!(matches!(e, DomainError::HotelDateTaken { .. }));
    }
}
