//! Trip saga steps, request, and per-invocation context.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use common::{BookingId, CustomerId, HotelId};

use crate::state::SagaState;

/// The forward steps of the trip saga, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TripStep {
    /// Reserve the hotel room in the local store.
    BookHotel,
    /// Reserve the flight seat on the remote flight service.
    BookFlight,
    /// Reserve the taxi on the remote taxi service.
    BookTaxi,
    /// Persist the composite trip record.
    RecordTrip,
}

impl TripStep {
    pub fn as_str(&self) -> &'static str {
        match self {
            TripStep::BookHotel => "book_hotel",
            TripStep::BookFlight => "book_flight",
            TripStep::BookTaxi => "book_taxi",
            TripStep::RecordTrip => "record_trip",
        }
    }
}

impl std::fmt::Display for TripStep {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A "book a trip" request: traveller identity plus the resource and
/// date for each of the three legs.
#[derive(Debug, Clone, Deserialize)]
pub struct TripRequest {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone_number: String,
    pub hotel_id: HotelId,
    pub hotel_date: NaiveDate,
    pub flight_id: i64,
    pub flight_date: NaiveDate,
    pub taxi_id: i64,
    pub taxi_date: NaiveDate,
}

/// Request-scoped saga context.
///
/// Accumulates the identifiers produced by each leg and the list of
/// completed steps the compensation path is generated from. One
/// instance exists per `book_trip` invocation and never outlives it;
/// correlation across the three subsystems happens only through this
/// struct, never through state shared between requests.
#[derive(Debug, Clone, Default)]
pub struct TripSaga {
    state: SagaState,
    completed: Vec<TripStep>,
    compensated: Vec<TripStep>,
    hotel_customer_id: Option<CustomerId>,
    hotel_booking_id: Option<BookingId>,
    flight_customer_id: Option<String>,
    flight_booking_id: Option<String>,
    taxi_customer_id: Option<String>,
    taxi_booking_id: Option<String>,
    failure_reason: Option<String>,
}

impl TripSaga {
    pub fn new() -> Self {
        Self {
            state: SagaState::Running,
            ..Self::default()
        }
    }

    /// Records the hotel leg's ids and marks the step completed.
    pub fn hotel_leg_done(&mut self, customer_id: CustomerId, booking_id: BookingId) {
        self.hotel_customer_id = Some(customer_id);
        self.hotel_booking_id = Some(booking_id);
        self.completed.push(TripStep::BookHotel);
    }

    /// Records the flight leg's remote ids and marks the step completed.
    pub fn flight_leg_done(&mut self, customer_id: String, booking_id: String) {
        self.flight_customer_id = Some(customer_id);
        self.flight_booking_id = Some(booking_id);
        self.completed.push(TripStep::BookFlight);
    }

    /// Records the taxi leg's remote ids and marks the step completed.
    pub fn taxi_leg_done(&mut self, customer_id: String, booking_id: String) {
        self.taxi_customer_id = Some(customer_id);
        self.taxi_booking_id = Some(booking_id);
        self.completed.push(TripStep::BookTaxi);
    }

    /// Marks the composite-record step completed and the saga finished.
    pub fn record_done(&mut self) {
        self.completed.push(TripStep::RecordTrip);
        self.state = SagaState::Completed;
    }

    /// Notes a step failure and enters the compensating state.
    pub fn fail(&mut self, reason: impl Into<String>) {
        self.failure_reason = Some(reason.into());
        self.state = SagaState::Compensating;
    }

    /// Notes one successfully compensated step.
    pub fn step_compensated(&mut self, step: TripStep) {
        self.compensated.push(step);
    }

    /// All compensations completed: the saga is cleanly failed.
    pub fn compensation_done(&mut self) {
        self.state = SagaState::Failed;
    }

    /// A compensating call failed: the saga is stuck and cross-system
    /// state needs manual reconciliation.
    pub fn stuck(&mut self) {
        self.state = SagaState::Stuck;
    }

    pub fn state(&self) -> SagaState {
        self.state
    }

    /// Steps completed so far, in execution order. Compensation walks
    /// this list in reverse.
    pub fn completed(&self) -> &[TripStep] {
        &self.completed
    }

    /// Steps whose compensating action has run and succeeded.
    pub fn compensated(&self) -> &[TripStep] {
        &self.compensated
    }

    pub fn hotel_customer_id(&self) -> Option<CustomerId> {
        self.hotel_customer_id
    }

    pub fn hotel_booking_id(&self) -> Option<BookingId> {
        self.hotel_booking_id
    }

    pub fn flight_booking_id(&self) -> Option<&str> {
        self.flight_booking_id.as_deref()
    }

    pub fn taxi_booking_id(&self) -> Option<&str> {
        self.taxi_booking_id.as_deref()
    }

    pub fn failure_reason(&self) -> Option<&str> {
        self.failure_reason.as_deref()
    }
}
