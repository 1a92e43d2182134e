//! Guest booking: create a customer and their hotel booking as one
//! all-or-nothing unit.
//!
//! Both writes share the local store's transaction, so no compensation
//! logic is needed here; any failure rolls the whole unit back and is
//! reported as the originating validation or conflict error.

use chrono::{NaiveDate, Utc};
use serde::Deserialize;

use common::{CustomerId, HotelId};
use store::{Booking, BookingStore, Customer};

use crate::customer::NewCustomer;
use crate::error::{DomainError, FieldViolations};
use crate::unique::UniquenessValidator;
use crate::validate;

/// Input for a guest booking: traveller identity plus the requested
/// room-day.
#[derive(Debug, Clone, Deserialize)]
pub struct GuestBooking {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone_number: String,
    pub hotel_id: HotelId,
    pub date: NaiveDate,
}

impl GuestBooking {
    fn validate(&self) -> Result<(), DomainError> {
        let mut v = FieldViolations::new();
        validate::name(&mut v, "first_name", &self.first_name);
        validate::name(&mut v, "last_name", &self.last_name);
        validate::email(&mut v, "email", &self.email);
        validate::phone_number(&mut v, "phone_number", &self.phone_number);
        validate::future_date(&mut v, "date", self.date, Utc::now().date_naive());
        v.into_result()
    }

    fn customer_fields(&self) -> NewCustomer {
        NewCustomer {
            first_name: self.first_name.clone(),
            last_name: self.last_name.clone(),
            email: self.email.clone(),
            phone_number: self.phone_number.clone(),
        }
    }
}

/// Service executing the two-step local guest booking transaction.
pub struct GuestBookingService<S: BookingStore> {
    store: S,
}

impl<S: BookingStore> GuestBookingService<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Validates the request, then creates the customer and booking
    /// atomically.
    ///
    /// Failure modes: `Validation`, `EmailInUse`, `HotelNotFound`,
    /// `HotelDateTaken`, whether raised by the advisory checks here
    /// or by the store's own constraints.
    #[tracing::instrument(skip(self, guest), fields(email = %guest.email))]
    pub async fn create(&self, guest: GuestBooking) -> Result<(Customer, Booking), DomainError> {
        guest.validate()?;

        let unique = UniquenessValidator::new(&self.store);
        if unique.email_conflicts(&guest.email, None).await? {
            return Err(DomainError::EmailInUse(guest.email));
        }

        if self.store.find_hotel(guest.hotel_id).await?.is_none() {
            return Err(DomainError::HotelNotFound(guest.hotel_id));
        }

        if unique
            .hotel_date_conflicts(guest.hotel_id, guest.date, None)
            .await?
        {
            return Err(DomainError::HotelDateTaken {
                hotel_id: guest.hotel_id,
                date: guest.date,
            });
        }

        let customer = guest.customer_fields().into_customer(CustomerId::new());
        let booking = Booking::new(guest.hotel_id, customer.id, guest.date);
        Ok(self.store.create_guest_booking(customer, booking).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use common::HotelId;
    use store::{Hotel, InMemoryBookingStore};

    async fn seed_hotel(store: &InMemoryBookingStore) -> HotelId {
        store
            .create_hotel(Hotel {
                id: HotelId::new(),
                name: "Grand".to_string(),
                postcode: "NE11AA".to_string(),
                phone_number: "01900000001".to_string(),
            })
            .await
            .unwrap()
            .id
    }

    fn guest(email: &str, hotel_id: HotelId) -> GuestBooking {
        GuestBooking {
            first_name: "Ada".to_string(),
            last_name: "Lovelace".to_string(),
            email: email.to_string(),
            phone_number: "01912345678".to_string(),
            hotel_id,
            date: NaiveDate::from_ymd_opt(2030, 6, 1).unwrap(),
        }
    }

    #[tokio::test]
    async fn creates_customer_and_booking_together() {
        let store = InMemoryBookingStore::new();
        let hotel_id = seed_hotel(&store).await;
        let service = GuestBookingService::new(store.clone());

        let (customer, booking) = service.create(guest("a@x.com", hotel_id)).await.unwrap();
        assert_eq!(booking.customer_id, customer.id);
        assert_eq!(booking.hotel_id, hotel_id);
        assert_eq!(store.booking_count().await, 1);
    }

    #[tokio::test]
    async fn unknown_hotel_creates_nothing() {
        let store = InMemoryBookingStore::new();
        seed_hotel(&store).await;
        let service = GuestBookingService::new(store.clone());

        let err = service
            .create(guest("a@x.com", HotelId::new()))
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::HotelNotFound(_)));
        assert!(store.find_customer_by_email("a@x.com").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn taken_room_day_creates_nothing() {
        let store = InMemoryBookingStore::new();
        let hotel_id = seed_hotel(&store).await;
        let service = GuestBookingService::new(store.clone());

        service.create(guest("first@x.com", hotel_id)).await.unwrap();

        let err = service.create(guest("second@x.com", hotel_id)).await.unwrap_err();
        assert!(matches!(err, DomainError::HotelDateTaken { .. }));
        assert!(
            store
                .find_customer_by_email("second@x.com")
                .await
                .unwrap()
                .is_none()
        );
        assert_eq!(store.booking_count().await, 1);
    }

    #[tokio::test]
    async fn existing_email_conflicts() {
        let store = InMemoryBookingStore::new();
        let hotel_id = seed_hotel(&store).await;
        let service = GuestBookingService::new(store.clone());

        service.create(guest("a@x.com", hotel_id)).await.unwrap();

        let mut second = guest("a@x.com", hotel_id);
        second.date = NaiveDate::from_ymd_opt(2030, 6, 2).unwrap();
        let err = service.create(second).await.unwrap_err();
        assert!(matches!(err, DomainError::EmailInUse(_)));
    }
}
