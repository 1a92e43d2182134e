//! PostgreSQL store integration tests.
//!
//! These tests share one PostgreSQL container. Run with:
//!
//! ```bash
//! cargo test -p store --test postgres_integration
//! ```

use std::sync::Arc;

use chrono::NaiveDate;
use serial_test::serial;
use sqlx::PgPool;
use testcontainers::{ContainerAsync, runners::AsyncRunner};
use testcontainers_modules::postgres::Postgres;
use tokio::sync::OnceCell;

use common::{CustomerId, HotelId, TripId};
use store::{
    Booking, BookingStore, Customer, Hotel, PostgresBookingStore, StoreError, TripBooking,
};

/// Shared container info - container stays alive for all tests
struct ContainerInfo {
    #[allow(dead_code)] // Container must stay alive for tests
    container: ContainerAsync<Postgres>,
    connection_string: String,
}

static CONTAINER: OnceCell<Arc<ContainerInfo>> = OnceCell::const_new();

async fn get_container_info() -> Arc<ContainerInfo> {
    CONTAINER
        .get_or_init(|| async {
            let container = Postgres::default().start().await.unwrap();

            let host = container.get_host().await.unwrap();
            let port = container.get_host_port_ipv4(5432).await.unwrap();

            let connection_string =
                format!("postgres://postgres:postgres@{}:{}/postgres", host, port);

            // Apply the schema once with a temporary pool
            let temp_pool = PgPool::connect(&connection_string).await.unwrap();
            sqlx::raw_sql(include_str!(
                "../../../migrations/001_create_booking_tables.sql"
            ))
            .execute(&temp_pool)
            .await
            .unwrap();
            temp_pool.close().await;

            Arc::new(ContainerInfo {
                container,
                connection_string,
            })
        })
        .await
        .clone()
}

/// Get a fresh store with its own pool and cleared tables
async fn get_test_store() -> PostgresBookingStore {
    let info = get_container_info().await;

    let pool = sqlx::postgres::PgPoolOptions::new()
        .max_connections(5)
        .connect(&info.connection_string)
        .await
        .unwrap();

    sqlx::query("TRUNCATE customers, hotels, bookings, trip_bookings CASCADE")
        .execute(&pool)
        .await
        .unwrap();

    PostgresBookingStore::new(pool)
}

fn customer(email: &str) -> Customer {
    Customer {
        id: CustomerId::new(),
        first_name: "Ada".to_string(),
        last_name: "Lovelace".to_string(),
        email: email.to_string(),
        phone_number: "01912345678".to_string(),
    }
}

fn hotel(phone: &str) -> Hotel {
    Hotel {
        id: HotelId::new(),
        name: "Grand".to_string(),
        postcode: "NE11AA".to_string(),
        phone_number: phone.to_string(),
    }
}

fn date(day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2030, 6, day).unwrap()
}

#[tokio::test]
#[serial]
async fn customer_roundtrip_and_email_constraint() {
    let store = get_test_store().await;

    let created = store.create_customer(customer("a@x.com")).await.unwrap();
    let found = store.find_customer(created.id).await.unwrap().unwrap();
    assert_eq!(found, created);
    let by_email = store
        .find_customer_by_email("a@x.com")
        .await
        .unwrap()
        .unwrap();
    assert_eq!(by_email.id, created.id);

    // The named constraint is translated, not surfaced as a raw
    // database error.
    let err = store.create_customer(customer("a@x.com")).await.unwrap_err();
    assert!(matches!(err, StoreError::DuplicateEmail(e) if e == "a@x.com"));
}

#[tokio::test]
#[serial]
async fn customer_update_constraint_and_missing_record() {
    let store = get_test_store().await;

    let mut a = store.create_customer(customer("a@x.com")).await.unwrap();
    let mut b = store.create_customer(customer("b@x.com")).await.unwrap();

    a.first_name = "Grace".to_string();
    let updated = store.update_customer(a).await.unwrap();
    assert_eq!(updated.first_name, "Grace");

    b.email = "a@x.com".to_string();
    let err = store.update_customer(b).await.unwrap_err();
    assert!(matches!(err, StoreError::DuplicateEmail(_)));

    let err = store
        .update_customer(customer("ghost@x.com"))
        .await
        .unwrap_err();
    assert!(matches!(err, StoreError::CustomerNotFound(_)));
}

#[tokio::test]
#[serial]
async fn hotel_phone_constraint() {
    let store = get_test_store().await;
    store.create_hotel(hotel("01900000001")).await.unwrap();

    let err = store.create_hotel(hotel("01900000001")).await.unwrap_err();
    assert!(matches!(err, StoreError::DuplicatePhone(_)));
}

#[tokio::test]
#[serial]
async fn booking_room_day_constraint_and_foreign_keys() {
    let store = get_test_store().await;
    let h = store.create_hotel(hotel("01900000001")).await.unwrap();
    let c1 = store.create_customer(customer("a@x.com")).await.unwrap();
    let c2 = store.create_customer(customer("b@x.com")).await.unwrap();

    store
        .create_booking(Booking::new(h.id, c1.id, date(1)))
        .await
        .unwrap();

    let err = store
        .create_booking(Booking::new(h.id, c2.id, date(1)))
        .await
        .unwrap_err();
    assert!(matches!(err, StoreError::DuplicateHotelDate { .. }));

    let err = store
        .create_booking(Booking::new(HotelId::new(), c1.id, date(2)))
        .await
        .unwrap_err();
    assert!(matches!(err, StoreError::HotelNotFound(_)));

    let err = store
        .create_booking(Booking::new(h.id, CustomerId::new(), date(2)))
        .await
        .unwrap_err();
    assert!(matches!(err, StoreError::CustomerNotFound(_)));

    let found = store
        .find_booking_by_hotel_and_date(h.id, date(1))
        .await
        .unwrap();
    assert!(found.is_some());
}

#[tokio::test]
#[serial]
async fn guest_booking_rolls_back_the_customer_on_conflict() {
    let store = get_test_store().await;
    let h = store.create_hotel(hotel("01900000001")).await.unwrap();
    let c = store.create_customer(customer("taken@x.com")).await.unwrap();
    store
        .create_booking(Booking::new(h.id, c.id, date(1)))
        .await
        .unwrap();

    let guest = customer("guest@x.com");
    let booking = Booking::new(h.id, guest.id, date(1));
    let err = store.create_guest_booking(guest, booking).await.unwrap_err();
    assert!(matches!(err, StoreError::DuplicateHotelDate { .. }));

    // The transaction rolled back: no customer survived.
    assert!(
        store
            .find_customer_by_email("guest@x.com")
            .await
            .unwrap()
            .is_none()
    );

    // Happy path writes both.
    let guest = customer("guest@x.com");
    let booking = Booking::new(h.id, guest.id, date(2));
    let (created, _) = store.create_guest_booking(guest, booking).await.unwrap();
    assert!(
        store
            .find_customer(created.id)
            .await
            .unwrap()
            .is_some()
    );
}

#[tokio::test]
#[serial]
async fn deleting_a_hotel_cascades_to_its_bookings() {
    let store = get_test_store().await;
    let h = store.create_hotel(hotel("01900000001")).await.unwrap();
    let c = store.create_customer(customer("a@x.com")).await.unwrap();
    let b = store
        .create_booking(Booking::new(h.id, c.id, date(1)))
        .await
        .unwrap();

    store.delete_hotel(h.id).await.unwrap();
    assert!(store.find_booking(b.id).await.unwrap().is_none());
}

#[tokio::test]
#[serial]
async fn trip_booking_roundtrip() {
    let store = get_test_store().await;

    let trip = TripBooking {
        id: TripId::new(),
        hotel_customer_id: CustomerId::new(),
        hotel_booking_id: common::BookingId::new(),
        flight_customer_id: "flight-c-1".to_string(),
        flight_booking_id: "flight-b-1".to_string(),
        taxi_customer_id: "taxi-c-1".to_string(),
        taxi_booking_id: "taxi-b-1".to_string(),
    };

    store.create_trip_booking(trip.clone()).await.unwrap();
    let found = store.find_trip_booking(trip.id).await.unwrap().unwrap();
    assert_eq!(found, trip);
    assert_eq!(store.list_trip_bookings().await.unwrap().len(), 1);

    store.delete_trip_booking(trip.id).await.unwrap();
    let err = store.delete_trip_booking(trip.id).await.unwrap_err();
    assert!(matches!(err, StoreError::TripNotFound(_)));
}
