//! Customer resource service.

use serde::Deserialize;

use common::CustomerId;
use store::{BookingStore, Customer};

use crate::error::{DomainError, FieldViolations};
use crate::unique::UniquenessValidator;
use crate::validate;

/// Input for creating or updating a customer.
#[derive(Debug, Clone, Deserialize)]
pub struct NewCustomer {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone_number: String,
}

impl NewCustomer {
    pub(crate) fn validate(&self) -> Result<(), DomainError> {
        let mut v = FieldViolations::new();
        validate::name(&mut v, "first_name", &self.first_name);
        validate::name(&mut v, "last_name", &self.last_name);
        validate::email(&mut v, "email", &self.email);
        validate::phone_number(&mut v, "phone_number", &self.phone_number);
        v.into_result()
    }

    pub(crate) fn into_customer(self, id: CustomerId) -> Customer {
        Customer {
            id,
            first_name: self.first_name,
            last_name: self.last_name,
            email: self.email,
            phone_number: self.phone_number,
        }
    }
}

/// Service for managing customers of the local hotel subsystem.
pub struct CustomerService<S: BookingStore> {
    store: S,
}

impl<S: BookingStore> CustomerService<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Validates and persists a new customer.
    #[tracing::instrument(skip(self, new), fields(email = %new.email))]
    pub async fn create(&self, new: NewCustomer) -> Result<Customer, DomainError> {
        new.validate()?;

        let unique = UniquenessValidator::new(&self.store);
        if unique.email_conflicts(&new.email, None).await? {
            return Err(DomainError::EmailInUse(new.email));
        }

        let customer = new.into_customer(CustomerId::new());
        Ok(self.store.create_customer(customer).await?)
    }

    /// Validates and updates an existing customer in place.
    ///
    /// The uniqueness check excludes the record being updated, so an
    /// unchanged email is not reported as a conflict.
    #[tracing::instrument(skip(self, new))]
    pub async fn update(&self, id: CustomerId, new: NewCustomer) -> Result<Customer, DomainError> {
        new.validate()?;

        if self.store.find_customer(id).await?.is_none() {
            return Err(DomainError::CustomerNotFound(id));
        }

        let unique = UniquenessValidator::new(&self.store);
        if unique.email_conflicts(&new.email, Some(id)).await? {
            return Err(DomainError::EmailInUse(new.email));
        }

        let customer = new.into_customer(id);
        Ok(self.store.update_customer(customer).await?)
    }

    pub async fn get(&self, id: CustomerId) -> Result<Option<Customer>, DomainError> {
        Ok(self.store.find_customer(id).await?)
    }

    pub async fn find_by_email(&self, email: &str) -> Result<Option<Customer>, DomainError> {
        Ok(self.store.find_customer_by_email(email).await?)
    }

    pub async fn list(&self) -> Result<Vec<Customer>, DomainError> {
        Ok(self.store.list_customers().await?)
    }

    #[tracing::instrument(skip(self))]
    pub async fn delete(&self, id: CustomerId) -> Result<(), DomainError> {
        Ok(self.store.delete_customer(id).await?)
    }
}
