use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::NaiveDate;
use tokio::sync::RwLock;

use common::{BookingId, CustomerId, HotelId, TripId};

use crate::records::{Booking, Customer, Hotel, TripBooking};
use crate::store::BookingStore;
use crate::{Result, StoreError};

#[derive(Debug, Default)]
struct State {
    customers: HashMap<CustomerId, Customer>,
    hotels: HashMap<HotelId, Hotel>,
    bookings: HashMap<BookingId, Booking>,
    trips: HashMap<TripId, TripBooking>,
}

impl State {
    fn customer_by_email(&self, email: &str) -> Option<&Customer> {
        self.customers.values().find(|c| c.email == email)
    }

    fn hotel_by_phone(&self, phone_number: &str) -> Option<&Hotel> {
        self.hotels.values().find(|h| h.phone_number == phone_number)
    }

    fn booking_by_hotel_and_date(&self, hotel_id: HotelId, date: NaiveDate) -> Option<&Booking> {
        self.bookings
            .values()
            .find(|b| b.hotel_id == hotel_id && b.date == date)
    }

    /// Unique-key and reference checks for a booking insert, matching
    /// the Postgres constraints.
    fn check_booking(&self, booking: &Booking) -> Result<()> {
        if !self.hotels.contains_key(&booking.hotel_id) {
            return Err(StoreError::HotelNotFound(booking.hotel_id));
        }
        if !self.customers.contains_key(&booking.customer_id) {
            return Err(StoreError::CustomerNotFound(booking.customer_id));
        }
        if self
            .booking_by_hotel_and_date(booking.hotel_id, booking.date)
            .is_some()
        {
            return Err(StoreError::DuplicateHotelDate {
                hotel_id: booking.hotel_id,
                date: booking.date,
            });
        }
        Ok(())
    }

    fn check_customer_email(&self, customer: &Customer) -> Result<()> {
        match self.customer_by_email(&customer.email) {
            Some(existing) if existing.id != customer.id => {
                Err(StoreError::DuplicateEmail(customer.email.clone()))
            }
            _ => Ok(()),
        }
    }
}

/// In-memory booking store implementation.
///
/// Provides the same interface and unique-key behavior as the
/// PostgreSQL implementation. Every mutation takes the single write
/// lock, so two racing writers targeting the same key resolve to
/// exactly one winner and one `Duplicate*` error.
#[derive(Clone, Default)]
pub struct InMemoryBookingStore {
    state: Arc<RwLock<State>>,
}

impl InMemoryBookingStore {
    /// Creates a new empty in-memory store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of live bookings.
    pub async fn booking_count(&self) -> usize {
        self.state.read().await.bookings.len()
    }

    /// Returns the number of live trip booking records.
    pub async fn trip_count(&self) -> usize {
        self.state.read().await.trips.len()
    }

    /// Clears all records.
    pub async fn clear(&self) {
        let mut state = self.state.write().await;
        state.customers.clear();
        state.hotels.clear();
        state.bookings.clear();
        state.trips.clear();
    }
}

#[async_trait]
impl BookingStore for InMemoryBookingStore {
    async fn create_customer(&self, customer: Customer) -> Result<Customer> {
        let mut state = self.state.write().await;
        if state.customer_by_email(&customer.email).is_some() {
            return Err(StoreError::DuplicateEmail(customer.email));
        }
        state.customers.insert(customer.id, customer.clone());
        Ok(customer)
    }

    async fn update_customer(&self, customer: Customer) -> Result<Customer> {
        let mut state = self.state.write().await;
        if !state.customers.contains_key(&customer.id) {
            return Err(StoreError::CustomerNotFound(customer.id));
        }
        state.check_customer_email(&customer)?;
        state.customers.insert(customer.id, customer.clone());
        Ok(customer)
    }

    async fn find_customer(&self, id: CustomerId) -> Result<Option<Customer>> {
        Ok(self.state.read().await.customers.get(&id).cloned())
    }

    async fn find_customer_by_email(&self, email: &str) -> Result<Option<Customer>> {
        Ok(self.state.read().await.customer_by_email(email).cloned())
    }

    async fn list_customers(&self) -> Result<Vec<Customer>> {
        let mut customers: Vec<_> = self.state.read().await.customers.values().cloned().collect();
        customers.sort_by(|a, b| a.email.cmp(&b.email));
        Ok(customers)
    }

    async fn delete_customer(&self, id: CustomerId) -> Result<()> {
        let mut state = self.state.write().await;
        if state.customers.remove(&id).is_none() {
            return Err(StoreError::CustomerNotFound(id));
        }
        state.bookings.retain(|_, b| b.customer_id != id);
        Ok(())
    }

    async fn create_hotel(&self, hotel: Hotel) -> Result<Hotel> {
        let mut state = self.state.write().await;
        if state.hotel_by_phone(&hotel.phone_number).is_some() {
            return Err(StoreError::DuplicatePhone(hotel.phone_number));
        }
        state.hotels.insert(hotel.id, hotel.clone());
        Ok(hotel)
    }

    async fn find_hotel(&self, id: HotelId) -> Result<Option<Hotel>> {
        Ok(self.state.read().await.hotels.get(&id).cloned())
    }

    async fn find_hotel_by_phone(&self, phone_number: &str) -> Result<Option<Hotel>> {
        Ok(self.state.read().await.hotel_by_phone(phone_number).cloned())
    }

    async fn list_hotels(&self) -> Result<Vec<Hotel>> {
        let mut hotels: Vec<_> = self.state.read().await.hotels.values().cloned().collect();
        hotels.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(hotels)
    }

    async fn delete_hotel(&self, id: HotelId) -> Result<()> {
        let mut state = self.state.write().await;
        if state.hotels.remove(&id).is_none() {
            return Err(StoreError::HotelNotFound(id));
        }
        state.bookings.retain(|_, b| b.hotel_id != id);
        Ok(())
    }

    async fn create_booking(&self, booking: Booking) -> Result<Booking> {
        let mut state = self.state.write().await;
        state.check_booking(&booking)?;
        state.bookings.insert(booking.id, booking.clone());
        Ok(booking)
    }

    async fn find_booking(&self, id: BookingId) -> Result<Option<Booking>> {
        Ok(self.state.read().await.bookings.get(&id).cloned())
    }

    async fn find_booking_by_hotel_and_date(
        &self,
        hotel_id: HotelId,
        date: NaiveDate,
    ) -> Result<Option<Booking>> {
        Ok(self
            .state
            .read()
            .await
            .booking_by_hotel_and_date(hotel_id, date)
            .cloned())
    }

    async fn list_bookings(&self) -> Result<Vec<Booking>> {
        let mut bookings: Vec<_> = self.state.read().await.bookings.values().cloned().collect();
        bookings.sort_by_key(|b| (b.date, b.id.as_uuid()));
        Ok(bookings)
    }

    async fn delete_booking(&self, id: BookingId) -> Result<()> {
        let mut state = self.state.write().await;
        if state.bookings.remove(&id).is_none() {
            return Err(StoreError::BookingNotFound(id));
        }
        Ok(())
    }

    async fn create_guest_booking(
        &self,
        customer: Customer,
        booking: Booking,
    ) -> Result<(Customer, Booking)> {
        // Single write lock: both checks and both inserts are one
        // atomic unit, nothing is written unless every check passes.
        let mut state = self.state.write().await;

        if state.customer_by_email(&customer.email).is_some() {
            return Err(StoreError::DuplicateEmail(customer.email));
        }
        if !state.hotels.contains_key(&booking.hotel_id) {
            return Err(StoreError::HotelNotFound(booking.hotel_id));
        }
        if state
            .booking_by_hotel_and_date(booking.hotel_id, booking.date)
            .is_some()
        {
            return Err(StoreError::DuplicateHotelDate {
                hotel_id: booking.hotel_id,
                date: booking.date,
            });
        }

        state.customers.insert(customer.id, customer.clone());
        state.bookings.insert(booking.id, booking.clone());
        Ok((customer, booking))
    }

    async fn create_trip_booking(&self, trip: TripBooking) -> Result<TripBooking> {
        let mut state = self.state.write().await;
        state.trips.insert(trip.id, trip.clone());
        Ok(trip)
    }

    async fn find_trip_booking(&self, id: TripId) -> Result<Option<TripBooking>> {
        Ok(self.state.read().await.trips.get(&id).cloned())
    }

    async fn list_trip_bookings(&self) -> Result<Vec<TripBooking>> {
        let mut trips: Vec<_> = self.state.read().await.trips.values().cloned().collect();
        trips.sort_by_key(|t| t.id.as_uuid());
        Ok(trips)
    }

    async fn delete_trip_booking(&self, id: TripId) -> Result<()> {
        let mut state = self.state.write().await;
        if state.trips.remove(&id).is_none() {
            return Err(StoreError::TripNotFound(id));
        }
        Ok(())
    }
}
