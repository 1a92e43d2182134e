//! HTTP API server for the trip booking system.
//!
//! Provides REST endpoints for customers, hotels, bookings, guest
//! bookings, and the trip booking saga, with structured logging
//! (tracing) and Prometheus metrics.

pub mod config;
pub mod error;
pub mod routes;

use std::sync::Arc;

use axum::Router;
use axum::routing::{delete, get, post, put};
use metrics_exporter_prometheus::PrometheusHandle;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use domain::{BookingService, CustomerService, GuestBookingService, HotelService};
use saga::{InMemoryRemoteGateway, TripOrchestrator};
use store::BookingStore;

use routes::AppState;

/// Creates the Axum application router with all routes and shared state.
pub fn create_app<S: BookingStore + Clone + 'static>(
    state: Arc<AppState<S>>,
    metrics_handle: PrometheusHandle,
) -> Router {
    let metrics_router = Router::new()
        .route("/metrics", get(routes::metrics::render))
        .with_state(metrics_handle);

    Router::new()
        .route("/health", get(routes::health::check))
        .route("/customers", post(routes::customers::create::<S>))
        .route("/customers", get(routes::customers::list::<S>))
        .route("/customers/{id}", get(routes::customers::get::<S>))
        .route("/customers/{id}", put(routes::customers::update::<S>))
        .route("/customers/{id}", delete(routes::customers::delete::<S>))
        .route("/hotels", post(routes::hotels::create::<S>))
        .route("/hotels", get(routes::hotels::list::<S>))
        .route("/hotels/{id}", get(routes::hotels::get::<S>))
        .route("/hotels/{id}", delete(routes::hotels::delete::<S>))
        .route("/bookings", post(routes::bookings::create::<S>))
        .route("/bookings", get(routes::bookings::list::<S>))
        .route("/bookings/{id}", get(routes::bookings::get::<S>))
        .route("/bookings/{id}", delete(routes::bookings::delete::<S>))
        .route("/guestBookings", post(routes::guest_bookings::create::<S>))
        .route("/tripBookings", post(routes::trip_bookings::create::<S>))
        .route("/tripBookings", get(routes::trip_bookings::list::<S>))
        .route("/tripBookings/{id}", get(routes::trip_bookings::get::<S>))
        .route(
            "/tripBookings/{id}",
            delete(routes::trip_bookings::delete::<S>),
        )
        .with_state(state)
        .merge(metrics_router)
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(TraceLayer::new_for_http())
}

/// Creates the default application state: domain services and the
/// saga orchestrator over the given store, with in-memory gateways
/// standing in for the flight and taxi subsystems.
pub fn create_default_state<S: BookingStore + Clone + 'static>(store: S) -> Arc<AppState<S>> {
    let flights = InMemoryRemoteGateway::new("flight");
    let taxis = InMemoryRemoteGateway::new("taxi");
    let orchestrator = TripOrchestrator::new(store.clone(), flights.clone(), taxis.clone());

    Arc::new(AppState {
        customers: CustomerService::new(store.clone()),
        hotels: HotelService::new(store.clone()),
        bookings: BookingService::new(store.clone()),
        guest_bookings: GuestBookingService::new(store),
        orchestrator,
        flights,
        taxis,
    })
}
