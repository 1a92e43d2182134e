//! Advisory uniqueness checks.
//!
//! Each check answers "would this key collide with another live
//! record", with an optional exclude-id so an in-place update of the
//! record that already holds the key is not reported as a conflict.
//! The checks are best-effort: two racing requests can both pass, and
//! the store's unique constraint then decides the winner. The loser's
//! store error is translated to the same conflict outcome.

use chrono::NaiveDate;

use common::{BookingId, CustomerId, HotelId};
use store::BookingStore;

use crate::error::DomainError;

/// Check-then-act uniqueness validation over a booking store.
pub struct UniquenessValidator<'a, S: BookingStore> {
    store: &'a S,
}

impl<'a, S: BookingStore> UniquenessValidator<'a, S> {
    pub fn new(store: &'a S) -> Self {
        Self { store }
    }

    /// True if another customer already holds `email`.
    ///
    /// With `exclude` set, the record identified by it is fetched and,
    /// if its own email equals the candidate key, the match is the
    /// record being updated in place and is not a conflict.
    pub async fn email_conflicts(
        &self,
        email: &str,
        exclude: Option<CustomerId>,
    ) -> Result<bool, DomainError> {
        if self.store.find_customer_by_email(email).await?.is_none() {
            return Ok(false);
        }
        if let Some(id) = exclude
            && let Some(current) = self.store.find_customer(id).await?
            && current.email == email
        {
            return Ok(false);
        }
        Ok(true)
    }

    /// True if another hotel already holds `phone_number`.
    pub async fn phone_conflicts(
        &self,
        phone_number: &str,
        exclude: Option<HotelId>,
    ) -> Result<bool, DomainError> {
        if self.store.find_hotel_by_phone(phone_number).await?.is_none() {
            return Ok(false);
        }
        if let Some(id) = exclude
            && let Some(current) = self.store.find_hotel(id).await?
            && current.phone_number == phone_number
        {
            return Ok(false);
        }
        Ok(true)
    }

    /// True if another booking already holds the `(hotel, date)` pair.
    pub async fn hotel_date_conflicts(
        &self,
        hotel_id: HotelId,
        date: NaiveDate,
        exclude: Option<BookingId>,
    ) -> Result<bool, DomainError> {
        if self
            .store
            .find_booking_by_hotel_and_date(hotel_id, date)
            .await?
            .is_none()
        {
            return Ok(false);
        }
        if let Some(id) = exclude
            && let Some(current) = self.store.find_booking(id).await?
            && current.hotel_id == hotel_id
            && current.date == date
        {
            return Ok(false);
        }
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use store::{Booking, Customer, Hotel, InMemoryBookingStore};

    fn customer(email: &str) -> Customer {
        Customer {
            id: CustomerId::new(),
            first_name: "Ada".to_string(),
            last_name: "Lovelace".to_string(),
            email: email.to_string(),
            phone_number: "01912345678".to_string(),
        }
    }

    fn hotel(phone: &str) -> Hotel {
        Hotel {
            id: HotelId::new(),
            name: "Grand".to_string(),
            postcode: "NE11AA".to_string(),
            phone_number: phone.to_string(),
        }
    }

    fn date(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2030, 6, day).unwrap()
    }

    #[tokio::test]
    async fn no_record_means_no_conflict() {
        let store = InMemoryBookingStore::new();
        let unique = UniquenessValidator::new(&store);
        assert!(!unique.email_conflicts("a@x.com", None).await.unwrap());
    }

    #[tokio::test]
    async fn existing_record_conflicts_on_create() {
        let store = InMemoryBookingStore::new();
        store.create_customer(customer("a@x.com")).await.unwrap();

        let unique = UniquenessValidator::new(&store);
        assert!(unique.email_conflicts("a@x.com", None).await.unwrap());
    }

    #[tokio::test]
    async fn own_unchanged_key_is_not_a_conflict() {
        let store = InMemoryBookingStore::new();
        let c = store.create_customer(customer("a@x.com")).await.unwrap();

        let unique = UniquenessValidator::new(&store);
        assert!(!unique.email_conflicts("a@x.com", Some(c.id)).await.unwrap());
    }

    #[tokio::test]
    async fn someone_elses_key_conflicts_on_update() {
        let store = InMemoryBookingStore::new();
        store.create_customer(customer("a@x.com")).await.unwrap();
        let other = store.create_customer(customer("b@x.com")).await.unwrap();

        let unique = UniquenessValidator::new(&store);
        assert!(unique.email_conflicts("a@x.com", Some(other.id)).await.unwrap());
    }

    #[tokio::test]
    async fn hotel_phone_exclusion() {
        let store = InMemoryBookingStore::new();
        let h = store.create_hotel(hotel("01900000001")).await.unwrap();

        let unique = UniquenessValidator::new(&store);
        assert!(unique.phone_conflicts("01900000001", None).await.unwrap());
        assert!(!unique.phone_conflicts("01900000001", Some(h.id)).await.unwrap());
        assert!(
            unique
                .phone_conflicts("01900000001", Some(HotelId::new()))
                .await
                .unwrap()
        );
    }

    #[tokio::test]
    async fn hotel_date_exclusion() {
        let store = InMemoryBookingStore::new();
        let h = store.create_hotel(hotel("01900000001")).await.unwrap();
        let c = store.create_customer(customer("a@x.com")).await.unwrap();
        let b = store
            .create_booking(Booking::new(h.id, c.id, date(1)))
            .await
            .unwrap();

        let unique = UniquenessValidator::new(&store);
        assert!(unique.hotel_date_conflicts(h.id, date(1), None).await.unwrap());
        assert!(
            !unique
                .hotel_date_conflicts(h.id, date(1), Some(b.id))
                .await
                .unwrap()
        );
        assert!(!unique.hotel_date_conflicts(h.id, date(2), None).await.unwrap());
    }
}
