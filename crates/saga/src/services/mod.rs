//! Remote booking gateway trait and in-memory implementation used for
//! the flight and taxi subsystems.

pub mod memory;
pub mod remote;

pub use memory::InMemoryRemoteGateway;
pub use remote::{
    GatewayError, RemoteBooking, RemoteBookingGateway, RemoteCustomer, RemoteGuestBooking,
};
