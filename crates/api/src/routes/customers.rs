//! Customer CRUD endpoints.

use std::sync::Arc;

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;

use common::CustomerId;
use domain::NewCustomer;
use store::{BookingStore, Customer};

use super::AppState;
use crate::error::ApiError;

/// POST /customers — create a new customer.
#[tracing::instrument(skip(state, req))]
pub async fn create<S: BookingStore + Clone + 'static>(
    State(state): State<Arc<AppState<S>>>,
    Json(req): Json<NewCustomer>,
) -> Result<(StatusCode, Json<Customer>), ApiError> {
    let customer = state.customers.create(req).await?;
    Ok((StatusCode::CREATED, Json(customer)))
}

/// GET /customers — list all customers.
#[tracing::instrument(skip(state))]
pub async fn list<S: BookingStore + Clone + 'static>(
    State(state): State<Arc<AppState<S>>>,
) -> Result<Json<Vec<Customer>>, ApiError> {
    Ok(Json(state.customers.list().await?))
}

/// GET /customers/{id} — load a customer by id.
#[tracing::instrument(skip(state))]
pub async fn get<S: BookingStore + Clone + 'static>(
    State(state): State<Arc<AppState<S>>>,
    Path(id): Path<String>,
) -> Result<Json<Customer>, ApiError> {
    let id = parse_customer_id(&id)?;
    let customer = state
        .customers
        .get(id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("customer {id} not found")))?;
    Ok(Json(customer))
}

/// PUT /customers/{id} — update a customer in place.
#[tracing::instrument(skip(state, req))]
pub async fn update<S: BookingStore + Clone + 'static>(
    State(state): State<Arc<AppState<S>>>,
    Path(id): Path<String>,
    Json(req): Json<NewCustomer>,
) -> Result<Json<Customer>, ApiError> {
    let id = parse_customer_id(&id)?;
    Ok(Json(state.customers.update(id, req).await?))
}

/// DELETE /customers/{id} — delete a customer.
#[tracing::instrument(skip(state))]
pub async fn delete<S: BookingStore + Clone + 'static>(
    State(state): State<Arc<AppState<S>>>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let id = parse_customer_id(&id)?;
    state.customers.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

fn parse_customer_id(id: &str) -> Result<CustomerId, ApiError> {
    id.parse()
        .map_err(|e| ApiError::BadRequest(format!("invalid customer id: {e}")))
}
