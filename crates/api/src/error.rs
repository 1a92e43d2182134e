//! API error types with HTTP response mapping.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use domain::DomainError;
use saga::SagaError;

/// API-level error type that maps to HTTP responses.
#[derive(Debug)]
pub enum ApiError {
    /// Resource not found.
    NotFound(String),
    /// Bad request from the client.
    BadRequest(String),
    /// Domain logic error (validation, conflict, missing reference).
    Domain(DomainError),
    /// Saga execution error.
    Saga(SagaError),
    /// Internal server error.
    Internal(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, error_body(&msg)),
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, error_body(&msg)),
            ApiError::Domain(err) => domain_error_to_response(err),
            ApiError::Saga(err) => saga_error_to_response(err),
            ApiError::Internal(msg) => {
                tracing::error!(error = %msg, "internal server error");
                (StatusCode::INTERNAL_SERVER_ERROR, error_body(&msg))
            }
        };

        (status, axum::Json(body)).into_response()
    }
}

fn error_body(message: &str) -> serde_json::Value {
    serde_json::json!({ "error": message })
}

fn domain_error_to_response(err: DomainError) -> (StatusCode, serde_json::Value) {
    match &err {
        DomainError::Validation(fields) => (
            StatusCode::BAD_REQUEST,
            serde_json::json!({ "error": "validation failed", "fields": fields }),
        ),
        DomainError::EmailInUse(_)
        | DomainError::PhoneInUse(_)
        | DomainError::HotelDateTaken { .. } => (StatusCode::CONFLICT, error_body(&err.to_string())),
        DomainError::CustomerNotFound(_)
        | DomainError::HotelNotFound(_)
        | DomainError::BookingNotFound(_) => (StatusCode::NOT_FOUND, error_body(&err.to_string())),
        DomainError::Store(store_err) => {
            tracing::error!(error = %store_err, "store failure");
            (StatusCode::INTERNAL_SERVER_ERROR, error_body(&err.to_string()))
        }
    }
}

/// Saga failures carry a structured report: which step failed, which
/// compensations ran, and whether a compensating call itself failed
/// and left cross-system state for an operator to reconcile.
fn saga_error_to_response(err: SagaError) -> (StatusCode, serde_json::Value) {
    match err {
        SagaError::Booking(inner) => domain_error_to_response(inner),
        SagaError::TripNotFound(id) => (
            StatusCode::NOT_FOUND,
            error_body(&format!("trip booking not found: {id}")),
        ),
        SagaError::StepFailed {
            step,
            reason,
            compensated,
        } => (
            StatusCode::INTERNAL_SERVER_ERROR,
            serde_json::json!({
                "error": reason,
                "failed_step": step,
                "compensated": compensated,
                "compensation_failed": false,
            }),
        ),
        SagaError::CompensationFailed {
            failed_step,
            trigger,
            compensation_step,
            reason,
            compensated,
        } => (
            StatusCode::INTERNAL_SERVER_ERROR,
            serde_json::json!({
                "error": trigger,
                "failed_step": failed_step,
                "failed_compensation_step": compensation_step,
                "compensation_error": reason,
                "compensated": compensated,
                "compensation_failed": true,
                "manual_reconciliation_required": true,
            }),
        ),
        SagaError::TeardownFailed {
            step,
            reason,
            completed,
        } => (
            StatusCode::INTERNAL_SERVER_ERROR,
            serde_json::json!({
                "error": reason,
                "failed_step": step,
                "completed": completed,
            }),
        ),
    }
}

impl From<DomainError> for ApiError {
    fn from(err: DomainError) -> Self {
        ApiError::Domain(err)
    }
}

impl From<SagaError> for ApiError {
    fn from(err: SagaError) -> Self {
        ApiError::Saga(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use common::{HotelId, TripId};
    use saga::TripStep;

    #[test]
    fn conflict_maps_to_409() {
        let response =
            ApiError::Domain(DomainError::EmailInUse("a@x.com".to_string())).into_response();
        assert_eq!(response.status(), StatusCode::CONFLICT);
    }

    #[test]
    fn missing_hotel_maps_to_404() {
        let response =
            ApiError::Domain(DomainError::HotelNotFound(HotelId::new())).into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn trip_not_found_maps_to_404() {
        let response = ApiError::Saga(SagaError::TripNotFound(TripId::new())).into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn step_failure_maps_to_500() {
        let response = ApiError::Saga(SagaError::StepFailed {
            step: TripStep::BookTaxi,
            reason: "unavailable".to_string(),
            compensated: vec![TripStep::BookFlight, TripStep::BookHotel],
        })
        .into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
