//! Hotel booking CRUD endpoints.

use std::sync::Arc;

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;

use common::BookingId;
use domain::NewBooking;
use store::{Booking, BookingStore};

use super::AppState;
use crate::error::ApiError;

/// POST /bookings — book a room-day for an existing customer.
#[tracing::instrument(skip(state, req))]
pub async fn create<S: BookingStore + Clone + 'static>(
    State(state): State<Arc<AppState<S>>>,
    Json(req): Json<NewBooking>,
) -> Result<(StatusCode, Json<Booking>), ApiError> {
    let booking = state.bookings.create(req).await?;
    Ok((StatusCode::CREATED, Json(booking)))
}

/// GET /bookings — list all bookings.
#[tracing::instrument(skip(state))]
pub async fn list<S: BookingStore + Clone + 'static>(
    State(state): State<Arc<AppState<S>>>,
) -> Result<Json<Vec<Booking>>, ApiError> {
    Ok(Json(state.bookings.list().await?))
}

/// GET /bookings/{id} — load a booking by id.
#[tracing::instrument(skip(state))]
pub async fn get<S: BookingStore + Clone + 'static>(
    State(state): State<Arc<AppState<S>>>,
    Path(id): Path<String>,
) -> Result<Json<Booking>, ApiError> {
    let id = parse_booking_id(&id)?;
    let booking = state
        .bookings
        .get(id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("booking {id} not found")))?;
    Ok(Json(booking))
}

/// DELETE /bookings/{id} — delete a booking.
#[tracing::instrument(skip(state))]
pub async fn delete<S: BookingStore + Clone + 'static>(
    State(state): State<Arc<AppState<S>>>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let id = parse_booking_id(&id)?;
    state.bookings.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

fn parse_booking_id(id: &str) -> Result<BookingId, ApiError> {
    id.parse()
        .map_err(|e| ApiError::BadRequest(format!("invalid booking id: {e}")))
}
