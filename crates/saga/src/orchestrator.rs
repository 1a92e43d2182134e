//! Trip saga orchestrator.

use std::time::Instant;

use chrono::NaiveDate;

use common::{BookingId, CustomerId, TripId};
use domain::{BookingService, CustomerService, DomainError, NewBooking, NewCustomer};
use store::{BookingStore, TripBooking};

use crate::error::{Result, SagaError};
use crate::services::remote::{RemoteBooking, RemoteBookingGateway, RemoteGuestBooking};
use crate::trip::{TripRequest, TripSaga, TripStep};

/// Orchestrates the three-service trip booking saga.
///
/// Drives hotel (local) → flight (remote) → taxi (remote) → composite
/// record, strictly sequentially: each later step needs identifiers
/// produced by earlier ones. On a step failure every completed step is
/// compensated in reverse order before the error is reported. All
/// correlation state lives in a per-invocation [`TripSaga`]; multiple
/// requests may run this method concurrently and are serialized only
/// by the store's own unique constraints.
pub struct TripOrchestrator<S, F, T>
where
    S: BookingStore + Clone,
    F: RemoteBookingGateway,
    T: RemoteBookingGateway,
{
    store: S,
    customers: CustomerService<S>,
    bookings: BookingService<S>,
    flights: F,
    taxis: T,
}

impl<S, F, T> TripOrchestrator<S, F, T>
where
    S: BookingStore + Clone,
    F: RemoteBookingGateway,
    T: RemoteBookingGateway,
{
    /// Creates a new orchestrator over the local store and the two
    /// remote subsystem gateways.
    pub fn new(store: S, flights: F, taxis: T) -> Self {
        let customers = CustomerService::new(store.clone());
        let bookings = BookingService::new(store.clone());
        Self {
            store,
            customers,
            bookings,
            flights,
            taxis,
        }
    }

    /// Books a hotel room, a flight seat, and a taxi as one saga, then
    /// persists the composite trip record linking all six ids.
    ///
    /// On success exactly one booking exists in each subsystem plus
    /// the trip record. On failure the returned error states which
    /// step failed and which compensations ran; see [`SagaError`].
    #[tracing::instrument(skip(self, request), fields(email = %request.email))]
    pub async fn book_trip(&self, request: TripRequest) -> Result<TripBooking> {
        metrics::counter!("trip_saga_executions_total").increment(1);
        let started = Instant::now();
        let mut saga = TripSaga::new();

        // Step 1: hotel leg. Nothing exists yet, so a failure needs
        // no compensation and surfaces its domain error untouched.
        tracing::info!(step = %TripStep::BookHotel, "trip step started");
        let (hotel_customer_id, hotel_booking_id) = match self.book_hotel_leg(&request).await {
            Ok(ids) => ids,
            Err(e) => {
                metrics::counter!("trip_saga_failed").increment(1);
                metrics::histogram!("trip_saga_duration_seconds")
                    .record(started.elapsed().as_secs_f64());
                return Err(SagaError::Booking(e));
            }
        };
        saga.hotel_leg_done(hotel_customer_id, hotel_booking_id);

        // Step 2: flight leg.
        tracing::info!(step = %TripStep::BookFlight, "trip step started");
        let flight = match self
            .book_remote_leg(
                &self.flights,
                "flight",
                &request,
                request.flight_id,
                request.flight_date,
            )
            .await
        {
            Ok(booking) => booking,
            Err(reason) => {
                return Err(self
                    .fail_and_compensate(&mut saga, TripStep::BookFlight, reason, started)
                    .await);
            }
        };
        saga.flight_leg_done(flight.customer_id.clone(), flight.id.clone());

        // Step 3: taxi leg.
        tracing::info!(step = %TripStep::BookTaxi, "trip step started");
        let taxi = match self
            .book_remote_leg(&self.taxis, "taxi", &request, request.taxi_id, request.taxi_date)
            .await
        {
            Ok(booking) => booking,
            Err(reason) => {
                return Err(self
                    .fail_and_compensate(&mut saga, TripStep::BookTaxi, reason, started)
                    .await);
            }
        };
        saga.taxi_leg_done(taxi.customer_id.clone(), taxi.id.clone());

        // Step 4: composite record. Only now does a TripBooking come
        // into existence; it is never persisted half-populated.
        tracing::info!(step = %TripStep::RecordTrip, "trip step started");
        let trip = TripBooking {
            id: TripId::new(),
            hotel_customer_id,
            hotel_booking_id,
            flight_customer_id: flight.customer_id,
            flight_booking_id: flight.id,
            taxi_customer_id: taxi.customer_id,
            taxi_booking_id: taxi.id,
        };
        let trip = match self.store.create_trip_booking(trip).await {
            Ok(trip) => trip,
            Err(e) => {
                return Err(self
                    .fail_and_compensate(&mut saga, TripStep::RecordTrip, e.to_string(), started)
                    .await);
            }
        };
        saga.record_done();

        let duration = started.elapsed().as_secs_f64();
        metrics::histogram!("trip_saga_duration_seconds").record(duration);
        metrics::counter!("trip_saga_completed").increment(1);
        tracing::info!(trip_id = %trip.id, duration, "trip saga completed");
        Ok(trip)
    }

    /// Tears down a completed trip: cancel taxi, cancel flight, delete
    /// the local booking, delete the trip record.
    ///
    /// Each call is independent and best-effort; the first failure
    /// aborts the remaining steps and reports which leg failed, for an
    /// operator to reconcile by hand. Nothing is retried.
    #[tracing::instrument(skip(self))]
    pub async fn cancel_trip(&self, trip_id: TripId) -> Result<()> {
        let trip = self
            .store
            .find_trip_booking(trip_id)
            .await?
            .ok_or(SagaError::TripNotFound(trip_id))?;

        let mut completed: Vec<TripStep> = Vec::new();

        tracing::info!(step = %TripStep::BookTaxi, "teardown step started");
        self.taxis
            .cancel_booking(&trip.taxi_booking_id)
            .await
            .map_err(|e| SagaError::TeardownFailed {
                step: TripStep::BookTaxi,
                reason: e.to_string(),
                completed: completed.clone(),
            })?;
        completed.push(TripStep::BookTaxi);

        tracing::info!(step = %TripStep::BookFlight, "teardown step started");
        self.flights
            .cancel_booking(&trip.flight_booking_id)
            .await
            .map_err(|e| SagaError::TeardownFailed {
                step: TripStep::BookFlight,
                reason: e.to_string(),
                completed: completed.clone(),
            })?;
        completed.push(TripStep::BookFlight);

        tracing::info!(step = %TripStep::BookHotel, "teardown step started");
        self.store
            .delete_booking(trip.hotel_booking_id)
            .await
            .map_err(|e| SagaError::TeardownFailed {
                step: TripStep::BookHotel,
                reason: e.to_string(),
                completed: completed.clone(),
            })?;
        completed.push(TripStep::BookHotel);

        self.store
            .delete_trip_booking(trip_id)
            .await
            .map_err(|e| SagaError::TeardownFailed {
                step: TripStep::RecordTrip,
                reason: e.to_string(),
                completed: completed.clone(),
            })?;

        tracing::info!(%trip_id, "trip booking torn down");
        Ok(())
    }

    /// Loads a trip booking record by id.
    pub async fn get_trip(&self, trip_id: TripId) -> Result<Option<TripBooking>> {
        Ok(self.store.find_trip_booking(trip_id).await?)
    }

    /// Lists all trip booking records.
    pub async fn list_trips(&self) -> Result<Vec<TripBooking>> {
        Ok(self.store.list_trip_bookings().await?)
    }

    /// Resolves the local customer by email (creating one if absent)
    /// and books the hotel room.
    async fn book_hotel_leg(
        &self,
        request: &TripRequest,
    ) -> std::result::Result<(CustomerId, BookingId), DomainError> {
        let customer = match self.customers.find_by_email(&request.email).await? {
            Some(existing) => existing,
            None => {
                self.customers
                    .create(NewCustomer {
                        first_name: request.first_name.clone(),
                        last_name: request.last_name.clone(),
                        email: request.email.clone(),
                        phone_number: request.phone_number.clone(),
                    })
                    .await?
            }
        };

        let booking = self
            .bookings
            .create(NewBooking {
                hotel_id: request.hotel_id,
                customer_id: customer.id,
                date: request.hotel_date,
            })
            .await?;

        Ok((customer.id, booking.id))
    }

    /// Books one remote leg: look the customer up by email and book
    /// for the known id, or fall back to a guest booking which creates
    /// customer and booking in one remote call.
    ///
    /// A failed lookup is logged and treated as no match; the guest
    /// booking then establishes the remote customer. Only a failure of
    /// the create call itself fails the step.
    async fn book_remote_leg<G: RemoteBookingGateway>(
        &self,
        gateway: &G,
        leg: &'static str,
        request: &TripRequest,
        resource_id: i64,
        date: NaiveDate,
    ) -> std::result::Result<RemoteBooking, String> {
        let existing = match gateway.find_customer_by_email(&request.email).await {
            Ok(found) => found,
            Err(e) => {
                tracing::warn!(leg, error = %e, "remote customer lookup failed");
                None
            }
        };

        let created = match existing {
            Some(customer) => gateway.create_booking(&customer.id, resource_id, date).await,
            None => {
                gateway
                    .create_guest_booking(RemoteGuestBooking {
                        first_name: request.first_name.clone(),
                        last_name: request.last_name.clone(),
                        email: request.email.clone(),
                        phone_number: request.phone_number.clone(),
                        resource_id,
                        date,
                    })
                    .await
            }
        };

        created.map_err(|e| format!("{leg} leg: {e}"))
    }

    /// Marks the saga failed, compensates, and builds the error report.
    async fn fail_and_compensate(
        &self,
        saga: &mut TripSaga,
        step: TripStep,
        reason: String,
        started: Instant,
    ) -> SagaError {
        tracing::warn!(step = %step, %reason, "trip step failed, compensating");
        metrics::counter!("trip_saga_failed").increment(1);
        saga.fail(reason.clone());

        let err = match self.compensate(saga).await {
            Ok(()) => SagaError::StepFailed {
                step,
                reason,
                compensated: saga.compensated().to_vec(),
            },
            Err((compensation_step, compensation_reason)) => {
                saga.stuck();
                SagaError::CompensationFailed {
                    failed_step: step,
                    trigger: reason,
                    compensation_step,
                    reason: compensation_reason,
                    compensated: saga.compensated().to_vec(),
                }
            }
        };

        metrics::histogram!("trip_saga_duration_seconds").record(started.elapsed().as_secs_f64());
        err
    }

    /// Runs compensating actions for the completed steps, newest
    /// first. The walk is generated mechanically from the saga's
    /// completed-step list, so every failure site shares this path.
    ///
    /// Stops at the first failed compensating call: compensations are
    /// never retried or themselves compensated.
    async fn compensate(
        &self,
        saga: &mut TripSaga,
    ) -> std::result::Result<(), (TripStep, String)> {
        metrics::counter!("trip_saga_compensations_total").increment(1);

        let completed: Vec<TripStep> = saga.completed().to_vec();
        for step in completed.into_iter().rev() {
            let outcome = match step {
                TripStep::BookHotel => match saga.hotel_booking_id() {
                    Some(id) => self.store.delete_booking(id).await.map_err(|e| e.to_string()),
                    None => Ok(()),
                },
                TripStep::BookFlight => match saga.flight_booking_id() {
                    Some(id) => self.flights.cancel_booking(id).await.map_err(|e| e.to_string()),
                    None => Ok(()),
                },
                TripStep::BookTaxi => match saga.taxi_booking_id() {
                    Some(id) => self.taxis.cancel_booking(id).await.map_err(|e| e.to_string()),
                    None => Ok(()),
                },
                // The composite record is the final forward action;
                // once it exists the saga has already succeeded.
                TripStep::RecordTrip => Ok(()),
            };

            match outcome {
                Ok(()) => {
                    tracing::info!(step = %step, "compensation step completed");
                    saga.step_compensated(step);
                }
                Err(reason) => {
                    tracing::error!(step = %step, %reason, "compensation step failed");
                    return Err((step, reason));
                }
            }
        }

        saga.compensation_done();
        Ok(())
    }
}
