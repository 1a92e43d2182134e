//! Hotel CRUD endpoints.

use std::sync::Arc;

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;

use common::HotelId;
use domain::NewHotel;
use store::{BookingStore, Hotel};

use super::AppState;
use crate::error::ApiError;

/// POST /hotels — create a new hotel.
#[tracing::instrument(skip(state, req))]
pub async fn create<S: BookingStore + Clone + 'static>(
    State(state): State<Arc<AppState<S>>>,
    Json(req): Json<NewHotel>,
) -> Result<(StatusCode, Json<Hotel>), ApiError> {
    let hotel = state.hotels.create(req).await?;
    Ok((StatusCode::CREATED, Json(hotel)))
}

/// GET /hotels — list all hotels.
#[tracing::instrument(skip(state))]
pub async fn list<S: BookingStore + Clone + 'static>(
    State(state): State<Arc<AppState<S>>>,
) -> Result<Json<Vec<Hotel>>, ApiError> {
    Ok(Json(state.hotels.list().await?))
}

/// GET /hotels/{id} — load a hotel by id.
#[tracing::instrument(skip(state))]
pub async fn get<S: BookingStore + Clone + 'static>(
    State(state): State<Arc<AppState<S>>>,
    Path(id): Path<String>,
) -> Result<Json<Hotel>, ApiError> {
    let id = parse_hotel_id(&id)?;
    let hotel = state
        .hotels
        .get(id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("hotel {id} not found")))?;
    Ok(Json(hotel))
}

/// DELETE /hotels/{id} — delete a hotel and its bookings.
#[tracing::instrument(skip(state))]
pub async fn delete<S: BookingStore + Clone + 'static>(
    State(state): State<Arc<AppState<S>>>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let id = parse_hotel_id(&id)?;
    state.hotels.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

fn parse_hotel_id(id: &str) -> Result<HotelId, ApiError> {
    id.parse()
        .map_err(|e| ApiError::BadRequest(format!("invalid hotel id: {e}")))
}
