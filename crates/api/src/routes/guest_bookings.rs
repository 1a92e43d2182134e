//! Guest booking endpoint: customer + booking in one atomic unit.

use std::sync::Arc;

use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use serde::Serialize;

use domain::GuestBooking;
use store::{Booking, BookingStore, Customer};

use super::AppState;
use crate::error::ApiError;

#[derive(Serialize)]
pub struct GuestBookingResponse {
    pub customer: Customer,
    pub booking: Booking,
}

/// POST /guestBookings — create a customer and their booking together.
#[tracing::instrument(skip(state, req))]
pub async fn create<S: BookingStore + Clone + 'static>(
    State(state): State<Arc<AppState<S>>>,
    Json(req): Json<GuestBooking>,
) -> Result<(StatusCode, Json<GuestBookingResponse>), ApiError> {
    let (customer, booking) = state.guest_bookings.create(req).await?;
    Ok((
        StatusCode::CREATED,
        Json(GuestBookingResponse { customer, booking }),
    ))
}
