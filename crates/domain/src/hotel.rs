//! Hotel resource service.

use serde::Deserialize;

use common::HotelId;
use store::{BookingStore, Hotel};

use crate::error::{DomainError, FieldViolations};
use crate::unique::UniquenessValidator;
use crate::validate;

/// Input for creating a hotel.
#[derive(Debug, Clone, Deserialize)]
pub struct NewHotel {
    pub name: String,
    pub postcode: String,
    pub phone_number: String,
}

impl NewHotel {
    fn validate(&self) -> Result<(), DomainError> {
        let mut v = FieldViolations::new();
        validate::name(&mut v, "name", &self.name);
        validate::postcode(&mut v, "postcode", &self.postcode);
        validate::phone_number(&mut v, "phone_number", &self.phone_number);
        v.into_result()
    }
}

/// Service for managing hotels.
pub struct HotelService<S: BookingStore> {
    store: S,
}

impl<S: BookingStore> HotelService<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Validates and persists a new hotel.
    #[tracing::instrument(skip(self, new), fields(name = %new.name))]
    pub async fn create(&self, new: NewHotel) -> Result<Hotel, DomainError> {
        new.validate()?;

        let unique = UniquenessValidator::new(&self.store);
        if unique.phone_conflicts(&new.phone_number, None).await? {
            return Err(DomainError::PhoneInUse(new.phone_number));
        }

        let hotel = Hotel {
            id: HotelId::new(),
            name: new.name,
            postcode: new.postcode,
            phone_number: new.phone_number,
        };
        Ok(self.store.create_hotel(hotel).await?)
    }

    pub async fn get(&self, id: HotelId) -> Result<Option<Hotel>, DomainError> {
        Ok(self.store.find_hotel(id).await?)
    }

    pub async fn list(&self) -> Result<Vec<Hotel>, DomainError> {
        Ok(self.store.list_hotels().await?)
    }

    #[tracing::instrument(skip(self))]
    pub async fn delete(&self, id: HotelId) -> Result<(), DomainError> {
        Ok(self.store.delete_hotel(id).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use store::InMemoryBookingStore;

    fn new_hotel(phone: &str) -> NewHotel {
        NewHotel {
            name: "Grand".to_string(),
            postcode: "NE11AA".to_string(),
            phone_number: phone.to_string(),
        }
    }

    #[tokio::test]
    async fn create_and_list() {
        let service = HotelService::new(InMemoryBookingStore::new());
        service.create(new_hotel("01900000001")).await.unwrap();
        service.create(new_hotel("01900000002")).await.unwrap();

        assert_eq!(service.list().await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn create_rejects_duplicate_phone() {
        let service = HotelService::new(InMemoryBookingStore::new());
        service.create(new_hotel("01900000001")).await.unwrap();

        let err = service.create(new_hotel("01900000001")).await.unwrap_err();
        assert!(matches!(err, DomainError::PhoneInUse(_)));
    }

    #[tokio::test]
    async fn create_rejects_bad_postcode() {
        let service = HotelService::new(InMemoryBookingStore::new());
        let mut bad = new_hotel("01900000001");
        bad.postcode = "NOT A POSTCODE".to_string();

        let err = service.create(bad).await.unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
    }
}
