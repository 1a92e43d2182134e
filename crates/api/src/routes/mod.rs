//! Route handlers grouped by resource.

pub mod bookings;
pub mod customers;
pub mod guest_bookings;
pub mod health;
pub mod hotels;
pub mod metrics;
pub mod trip_bookings;

use domain::{BookingService, CustomerService, GuestBookingService, HotelService};
use saga::{InMemoryRemoteGateway, TripOrchestrator};
use store::BookingStore;

/// Shared application state accessible from all handlers.
pub struct AppState<S: BookingStore + Clone> {
    pub customers: CustomerService<S>,
    pub hotels: HotelService<S>,
    pub bookings: BookingService<S>,
    pub guest_bookings: GuestBookingService<S>,
    pub orchestrator: TripOrchestrator<S, InMemoryRemoteGateway, InMemoryRemoteGateway>,
    /// Gateway handles, kept for failure injection in tests.
    pub flights: InMemoryRemoteGateway,
    pub taxis: InMemoryRemoteGateway,
}
