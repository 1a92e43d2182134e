//! Hotel booking resource service.

use chrono::{NaiveDate, Utc};
use serde::Deserialize;

use common::{BookingId, CustomerId, HotelId};
use store::{Booking, BookingStore};

use crate::error::{DomainError, FieldViolations};
use crate::unique::UniquenessValidator;
use crate::validate;

/// Input for creating a hotel booking for an existing customer.
#[derive(Debug, Clone, Deserialize)]
pub struct NewBooking {
    pub hotel_id: HotelId,
    pub customer_id: CustomerId,
    pub date: NaiveDate,
}

/// Service for managing hotel bookings.
pub struct BookingService<S: BookingStore> {
    store: S,
}

impl<S: BookingStore> BookingService<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Validates and persists a new booking.
    ///
    /// The referenced customer and hotel must exist, the date must be
    /// in the future, and the hotel must not already be booked on that
    /// date.
    #[tracing::instrument(skip(self))]
    pub async fn create(&self, new: NewBooking) -> Result<Booking, DomainError> {
        let mut v = FieldViolations::new();
        validate::future_date(&mut v, "date", new.date, Utc::now().date_naive());
        v.into_result()?;

        if self.store.find_customer(new.customer_id).await?.is_none() {
            return Err(DomainError::CustomerNotFound(new.customer_id));
        }
        if self.store.find_hotel(new.hotel_id).await?.is_none() {
            return Err(DomainError::HotelNotFound(new.hotel_id));
        }

        let unique = UniquenessValidator::new(&self.store);
        if unique
            .hotel_date_conflicts(new.hotel_id, new.date, None)
            .await?
        {
            return Err(DomainError::HotelDateTaken {
                hotel_id: new.hotel_id,
                date: new.date,
            });
        }

        let booking = Booking::new(new.hotel_id, new.customer_id, new.date);
        Ok(self.store.create_booking(booking).await?)
    }

    pub async fn get(&self, id: BookingId) -> Result<Option<Booking>, DomainError> {
        Ok(self.store.find_booking(id).await?)
    }

    pub async fn list(&self) -> Result<Vec<Booking>, DomainError> {
        Ok(self.store.list_bookings().await?)
    }

    #[tracing::instrument(skip(self))]
    pub async fn delete(&self, id: BookingId) -> Result<(), DomainError> {
        Ok(self.store.delete_booking(id).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use store::{Customer, Hotel, InMemoryBookingStore};

    async fn seed(store: &InMemoryBookingStore) -> (HotelId, CustomerId) {
        let hotel = store
            .create_hotel(Hotel {
                id: HotelId::new(),
                name: "Grand".to_string(),
                postcode: "NE11AA".to_string(),
                phone_number: "01900000001".to_string(),
            })
            .await
            .unwrap();
        let customer = store
            .create_customer(Customer {
                id: CustomerId::new(),
                first_name: "Ada".to_string(),
                last_name: "Lovelace".to_string(),
                email: "a@x.com".to_string(),
                phone_number: "01912345678".to_string(),
            })
            .await
            .unwrap();
        (hotel.id, customer.id)
    }

    fn future_date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2030, 6, 1).unwrap()
    }

    #[tokio::test]
    async fn create_booking_happy_path() {
        let store = InMemoryBookingStore::new();
        let (hotel_id, customer_id) = seed(&store).await;
        let service = BookingService::new(store);

        let booking = service
            .create(NewBooking {
                hotel_id,
                customer_id,
                date: future_date(),
            })
            .await
            .unwrap();
        assert_eq!(booking.hotel_id, hotel_id);
        assert_eq!(booking.customer_id, customer_id);
    }

    #[tokio::test]
    async fn create_rejects_past_date() {
        let store = InMemoryBookingStore::new();
        let (hotel_id, customer_id) = seed(&store).await;
        let service = BookingService::new(store);

        let err = service
            .create(NewBooking {
                hotel_id,
                customer_id,
                date: NaiveDate::from_ymd_opt(2020, 1, 1).unwrap(),
            })
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
    }

    #[tokio::test]
    async fn create_rejects_unknown_hotel() {
        let store = InMemoryBookingStore::new();
        let (_, customer_id) = seed(&store).await;
        let service = BookingService::new(store);

        let err = service
            .create(NewBooking {
                hotel_id: HotelId::new(),
                customer_id,
                date: future_date(),
            })
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::HotelNotFound(_)));
    }

    #[tokio::test]
    async fn create_rejects_taken_room_day() {
        let store = InMemoryBookingStore::new();
        let (hotel_id, customer_id) = seed(&store).await;
        let service = BookingService::new(store);

        let new = NewBooking {
            hotel_id,
            customer_id,
            date: future_date(),
        };
        service.create(new.clone()).await.unwrap();

        let err = service.create(new).await.unwrap_err();
        assert!(matches!(err, DomainError::HotelDateTaken { .. }));
    }
}
