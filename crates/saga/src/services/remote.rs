//! Remote booking gateway interface.
//!
//! The flight and taxi subsystems expose the same narrow surface, so
//! one trait serves both; the orchestrator carries one gateway
//! instance per subsystem. Remote records are owned and identified
//! entirely by the remote side; only the returned string ids are held
//! locally.

use async_trait::async_trait;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A customer record as held by a remote subsystem.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteCustomer {
    pub id: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone_number: String,
}

/// A booking record as held by a remote subsystem.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteBooking {
    pub id: String,
    /// The remote subsystem's own customer id.
    pub customer_id: String,
    /// The booked resource (flight or taxi id).
    pub resource_id: i64,
    pub date: NaiveDate,
}

/// Input for a remote guest booking, which creates the remote customer
/// and the booking in one call.
#[derive(Debug, Clone, Serialize)]
pub struct RemoteGuestBooking {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone_number: String,
    pub resource_id: i64,
    pub date: NaiveDate,
}

/// Errors raised by remote gateway calls.
#[derive(Debug, Error)]
pub enum GatewayError {
    /// The remote service processed the request and refused it.
    #[error("remote service rejected the request: {0}")]
    Rejected(String),

    /// The remote service could not be reached or the call failed.
    #[error("remote service call failed: {0}")]
    Unavailable(String),
}

/// Trait for remote booking subsystem gateways.
///
/// Calls are synchronous, independent RPCs; there is no cross-call
/// transaction. Callers wanting a bound on a hung remote call must
/// impose their own timeout and treat it as a failed step.
#[async_trait]
pub trait RemoteBookingGateway: Send + Sync {
    /// Looks up the remote customer holding `email` (exact match).
    async fn find_customer_by_email(
        &self,
        email: &str,
    ) -> Result<Option<RemoteCustomer>, GatewayError>;

    /// Atomically creates a remote customer and their booking.
    async fn create_guest_booking(
        &self,
        guest: RemoteGuestBooking,
    ) -> Result<RemoteBooking, GatewayError>;

    /// Creates a booking for an already-known remote customer.
    async fn create_booking(
        &self,
        customer_id: &str,
        resource_id: i64,
        date: NaiveDate,
    ) -> Result<RemoteBooking, GatewayError>;

    /// Cancels a previously created booking by its remote id.
    async fn cancel_booking(&self, booking_id: &str) -> Result<(), GatewayError>;
}
