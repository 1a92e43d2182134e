//! Trip booking endpoints: the saga trigger and teardown.

use std::sync::Arc;

use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use serde::Deserialize;

use common::{CustomerId, TripId};
use saga::TripRequest;
use store::{BookingStore, TripBooking};

use super::AppState;
use crate::error::ApiError;

/// Optional list filters, one per leg's customer id.
#[derive(Debug, Default, Deserialize)]
pub struct TripFilter {
    pub hotel_customer_id: Option<CustomerId>,
    pub flight_customer_id: Option<String>,
    pub taxi_customer_id: Option<String>,
}

/// POST /tripBookings — run the three-service booking saga.
#[tracing::instrument(skip(state, req))]
pub async fn create<S: BookingStore + Clone + 'static>(
    State(state): State<Arc<AppState<S>>>,
    Json(req): Json<TripRequest>,
) -> Result<(StatusCode, Json<TripBooking>), ApiError> {
    let trip = state.orchestrator.book_trip(req).await?;
    Ok((StatusCode::CREATED, Json(trip)))
}

/// GET /tripBookings — list trip bookings, optionally filtered by a
/// leg's customer id.
#[tracing::instrument(skip(state))]
pub async fn list<S: BookingStore + Clone + 'static>(
    State(state): State<Arc<AppState<S>>>,
    Query(filter): Query<TripFilter>,
) -> Result<Json<Vec<TripBooking>>, ApiError> {
    let mut trips = state.orchestrator.list_trips().await?;
    if let Some(id) = filter.hotel_customer_id {
        trips.retain(|t| t.hotel_customer_id == id);
    }
    if let Some(ref id) = filter.flight_customer_id {
        trips.retain(|t| &t.flight_customer_id == id);
    }
    if let Some(ref id) = filter.taxi_customer_id {
        trips.retain(|t| &t.taxi_customer_id == id);
    }
    Ok(Json(trips))
}

/// GET /tripBookings/{id} — load a trip booking by id.
#[tracing::instrument(skip(state))]
pub async fn get<S: BookingStore + Clone + 'static>(
    State(state): State<Arc<AppState<S>>>,
    Path(id): Path<String>,
) -> Result<Json<TripBooking>, ApiError> {
    let id = parse_trip_id(&id)?;
    let trip = state
        .orchestrator
        .get_trip(id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("trip booking {id} not found")))?;
    Ok(Json(trip))
}

/// DELETE /tripBookings/{id} — tear down a trip: cancel the remote
/// legs, delete the local booking and the trip record.
#[tracing::instrument(skip(state))]
pub async fn delete<S: BookingStore + Clone + 'static>(
    State(state): State<Arc<AppState<S>>>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let id = parse_trip_id(&id)?;
    state.orchestrator.cancel_trip(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

fn parse_trip_id(id: &str) -> Result<TripId, ApiError> {
    id.parse()
        .map_err(|e| ApiError::BadRequest(format!("invalid trip booking id: {e}")))
}
