//! In-memory remote gateway for testing and local development.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use async_trait::async_trait;
use chrono::NaiveDate;

use super::remote::{
    GatewayError, RemoteBooking, RemoteBookingGateway, RemoteCustomer, RemoteGuestBooking,
};

#[derive(Debug, Default)]
struct GatewayState {
    /// Remote customers keyed by email (the remote side enforces its
    /// own email uniqueness).
    customers: HashMap<String, RemoteCustomer>,
    bookings: HashMap<String, RemoteBooking>,
    next_customer: u32,
    next_booking: u32,
    cancel_calls: u32,
    fail_on_find: bool,
    fail_on_create: bool,
    fail_on_cancel: bool,
}

/// In-memory remote booking subsystem.
///
/// Ids are prefixed with the subsystem label (`flight-c-1`,
/// `flight-b-1`, ...) so test assertions can tell the two gateways'
/// records apart. Failure toggles let tests fail any of the three
/// call kinds on demand.
#[derive(Debug, Clone)]
pub struct InMemoryRemoteGateway {
    label: &'static str,
    state: Arc<RwLock<GatewayState>>,
}

impl InMemoryRemoteGateway {
    /// Creates a gateway whose minted ids carry `label` as a prefix.
    pub fn new(label: &'static str) -> Self {
        Self {
            label,
            state: Arc::new(RwLock::new(GatewayState::default())),
        }
    }

    /// Makes `find_customer_by_email` fail until cleared.
    pub fn set_fail_on_find(&self, fail: bool) {
        self.state.write().unwrap().fail_on_find = fail;
    }

    /// Makes both booking-creation calls fail until cleared.
    pub fn set_fail_on_create(&self, fail: bool) {
        self.state.write().unwrap().fail_on_create = fail;
    }

    /// Makes `cancel_booking` fail until cleared.
    pub fn set_fail_on_cancel(&self, fail: bool) {
        self.state.write().unwrap().fail_on_cancel = fail;
    }

    /// Number of live remote customers.
    pub fn customer_count(&self) -> usize {
        self.state.read().unwrap().customers.len()
    }

    /// Number of live remote bookings.
    pub fn booking_count(&self) -> usize {
        self.state.read().unwrap().bookings.len()
    }

    /// Number of cancel calls received, including failed ones.
    pub fn cancel_calls(&self) -> u32 {
        self.state.read().unwrap().cancel_calls
    }

    /// True if a booking exists with the given id.
    pub fn has_booking(&self, booking_id: &str) -> bool {
        self.state.read().unwrap().bookings.contains_key(booking_id)
    }
}

impl GatewayState {
    fn mint_customer(&mut self, label: &str, guest: &RemoteGuestBooking) -> RemoteCustomer {
        self.next_customer += 1;
        let customer = RemoteCustomer {
            id: format!("{label}-c-{}", self.next_customer),
            first_name: guest.first_name.clone(),
            last_name: guest.last_name.clone(),
            email: guest.email.clone(),
            phone_number: guest.phone_number.clone(),
        };
        self.customers.insert(customer.email.clone(), customer.clone());
        customer
    }

    fn mint_booking(
        &mut self,
        label: &str,
        customer_id: &str,
        resource_id: i64,
        date: NaiveDate,
    ) -> RemoteBooking {
        self.next_booking += 1;
        let booking = RemoteBooking {
            id: format!("{label}-b-{}", self.next_booking),
            customer_id: customer_id.to_string(),
            resource_id,
            date,
        };
        self.bookings.insert(booking.id.clone(), booking.clone());
        booking
    }
}

#[async_trait]
impl RemoteBookingGateway for InMemoryRemoteGateway {
    async fn find_customer_by_email(
        &self,
        email: &str,
    ) -> Result<Option<RemoteCustomer>, GatewayError> {
        let state = self.state.read().unwrap();
        if state.fail_on_find {
            return Err(GatewayError::Unavailable(format!(
                "{} customer lookup failed",
                self.label
            )));
        }
        Ok(state.customers.get(email).cloned())
    }

    async fn create_guest_booking(
        &self,
        guest: RemoteGuestBooking,
    ) -> Result<RemoteBooking, GatewayError> {
        let mut state = self.state.write().unwrap();
        if state.fail_on_create {
            return Err(GatewayError::Unavailable(format!(
                "{} booking service unavailable",
                self.label
            )));
        }
        if state.customers.contains_key(&guest.email) {
            return Err(GatewayError::Rejected(format!(
                "{} customer with email {} already exists",
                self.label, guest.email
            )));
        }
        let customer = state.mint_customer(self.label, &guest);
        Ok(state.mint_booking(self.label, &customer.id, guest.resource_id, guest.date))
    }

    async fn create_booking(
        &self,
        customer_id: &str,
        resource_id: i64,
        date: NaiveDate,
    ) -> Result<RemoteBooking, GatewayError> {
        let mut state = self.state.write().unwrap();
        if state.fail_on_create {
            return Err(GatewayError::Unavailable(format!(
                "{} booking service unavailable",
                self.label
            )));
        }
        if !state.customers.values().any(|c| c.id == customer_id) {
            return Err(GatewayError::Rejected(format!(
                "{} customer {customer_id} does not exist",
                self.label
            )));
        }
        Ok(state.mint_booking(self.label, customer_id, resource_id, date))
    }

    async fn cancel_booking(&self, booking_id: &str) -> Result<(), GatewayError> {
        let mut state = self.state.write().unwrap();
        state.cancel_calls += 1;
        if state.fail_on_cancel {
            return Err(GatewayError::Unavailable(format!(
                "{} cancel failed",
                self.label
            )));
        }
        if state.bookings.remove(booking_id).is_none() {
            return Err(GatewayError::Rejected(format!(
                "{} booking {booking_id} does not exist",
                self.label
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn guest(email: &str) -> RemoteGuestBooking {
        RemoteGuestBooking {
            first_name: "Ada".to_string(),
            last_name: "Lovelace".to_string(),
            email: email.to_string(),
            phone_number: "01912345678".to_string(),
            resource_id: 77,
            date: NaiveDate::from_ymd_opt(2030, 6, 1).unwrap(),
        }
    }

    #[tokio::test]
    async fn guest_booking_creates_customer_and_booking() {
        let gateway = InMemoryRemoteGateway::new("flight");

        let booking = gateway.create_guest_booking(guest("a@x.com")).await.unwrap();
        assert_eq!(booking.id, "flight-b-1");
        assert_eq!(booking.customer_id, "flight-c-1");
        assert_eq!(gateway.customer_count(), 1);
        assert_eq!(gateway.booking_count(), 1);

        let found = gateway.find_customer_by_email("a@x.com").await.unwrap().unwrap();
        assert_eq!(found.id, "flight-c-1");
    }

    #[tokio::test]
    async fn booking_for_known_customer() {
        let gateway = InMemoryRemoteGateway::new("taxi");
        gateway.create_guest_booking(guest("a@x.com")).await.unwrap();

        let booking = gateway
            .create_booking("taxi-c-1", 3, NaiveDate::from_ymd_opt(2030, 6, 2).unwrap())
            .await
            .unwrap();
        assert_eq!(booking.id, "taxi-b-2");
        assert_eq!(gateway.booking_count(), 2);
    }

    #[tokio::test]
    async fn booking_for_unknown_customer_is_rejected() {
        let gateway = InMemoryRemoteGateway::new("taxi");
        let err = gateway
            .create_booking("taxi-c-9", 3, NaiveDate::from_ymd_opt(2030, 6, 2).unwrap())
            .await
            .unwrap_err();
        assert!(matches!(err, GatewayError::Rejected(_)));
    }

    #[tokio::test]
    async fn cancel_removes_booking_and_counts_calls() {
        let gateway = InMemoryRemoteGateway::new("flight");
        let booking = gateway.create_guest_booking(guest("a@x.com")).await.unwrap();

        gateway.cancel_booking(&booking.id).await.unwrap();
        assert_eq!(gateway.booking_count(), 0);
        assert_eq!(gateway.cancel_calls(), 1);

        // The customer record survives cancellation.
        assert_eq!(gateway.customer_count(), 1);

        let err = gateway.cancel_booking(&booking.id).await.unwrap_err();
        assert!(matches!(err, GatewayError::Rejected(_)));
        assert_eq!(gateway.cancel_calls(), 2);
    }

    #[tokio::test]
    async fn failure_toggles() {
        let gateway = InMemoryRemoteGateway::new("flight");
        gateway.set_fail_on_create(true);

        let err = gateway.create_guest_booking(guest("a@x.com")).await.unwrap_err();
        assert!(matches!(err, GatewayError::Unavailable(_)));
        assert_eq!(gateway.booking_count(), 0);

        gateway.set_fail_on_create(false);
        gateway.create_guest_booking(guest("a@x.com")).await.unwrap();

        gateway.set_fail_on_find(true);
        assert!(gateway.find_customer_by_email("a@x.com").await.is_err());
    }
}
