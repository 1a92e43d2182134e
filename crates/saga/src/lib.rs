//! Saga pattern implementation for multi-service trip booking.
//!
//! A single "book a trip" operation reserves a hotel room (local
//! store), a flight seat (remote service), and a taxi (remote
//! service). The three reservations are owned by three independent
//! systems with no shared transaction coordinator, so the orchestrator
//! runs a saga:
//!
//! 1. Book the hotel room locally
//! 2. Book the flight remotely
//! 3. Book the taxi remotely
//! 4. Persist the composite trip record
//!
//! If any step fails, previously completed steps are compensated in
//! reverse order (cancel/delete), and the triggering error is reported
//! to the caller. A failed compensating call is never retried; it is
//! surfaced as unrecoverable so an operator can reconcile the
//! cross-system state by hand.

pub mod error;
pub mod orchestrator;
pub mod services;
pub mod state;
pub mod trip;

pub use error::SagaError;
pub use orchestrator::TripOrchestrator;
pub use services::{
    GatewayError, InMemoryRemoteGateway, RemoteBooking, RemoteBookingGateway, RemoteCustomer,
    RemoteGuestBooking,
};
pub use state::SagaState;
pub use trip::{TripRequest, TripSaga, TripStep};
