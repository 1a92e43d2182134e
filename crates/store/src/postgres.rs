use async_trait::async_trait;
use chrono::NaiveDate;
use sqlx::{PgPool, Row, postgres::PgRow};
use uuid::Uuid;

use common::{BookingId, CustomerId, HotelId, TripId};

use crate::records::{Booking, Customer, Hotel, TripBooking};
use crate::store::BookingStore;
use crate::{Result, StoreError};

/// PostgreSQL-backed booking store implementation.
#[derive(Clone)]
pub struct PostgresBookingStore {
    pool: PgPool,
}

impl PostgresBookingStore {
    /// Creates a new PostgreSQL booking store.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Gets a reference to the underlying connection pool.
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Runs the database migrations.
    pub async fn run_migrations(&self) -> std::result::Result<(), sqlx::migrate::MigrateError> {
        sqlx::migrate!("../../migrations").run(&self.pool).await
    }

    fn row_to_customer(row: PgRow) -> Result<Customer> {
        Ok(Customer {
            id: CustomerId::from_uuid(row.try_get::<Uuid, _>("id")?),
            first_name: row.try_get("first_name")?,
            last_name: row.try_get("last_name")?,
            email: row.try_get("email")?,
            phone_number: row.try_get("phone_number")?,
        })
    }

    fn row_to_hotel(row: PgRow) -> Result<Hotel> {
        Ok(Hotel {
            id: HotelId::from_uuid(row.try_get::<Uuid, _>("id")?),
            name: row.try_get("name")?,
            postcode: row.try_get("postcode")?,
            phone_number: row.try_get("phone_number")?,
        })
    }

    fn row_to_booking(row: PgRow) -> Result<Booking> {
        Ok(Booking {
            id: BookingId::from_uuid(row.try_get::<Uuid, _>("id")?),
            hotel_id: HotelId::from_uuid(row.try_get::<Uuid, _>("hotel_id")?),
            customer_id: CustomerId::from_uuid(row.try_get::<Uuid, _>("customer_id")?),
            date: row.try_get("booking_date")?,
        })
    }

    fn row_to_trip(row: PgRow) -> Result<TripBooking> {
        Ok(TripBooking {
            id: TripId::from_uuid(row.try_get::<Uuid, _>("id")?),
            hotel_customer_id: CustomerId::from_uuid(row.try_get::<Uuid, _>("hotel_customer_id")?),
            hotel_booking_id: BookingId::from_uuid(row.try_get::<Uuid, _>("hotel_booking_id")?),
            flight_customer_id: row.try_get("flight_customer_id")?,
            flight_booking_id: row.try_get("flight_booking_id")?,
            taxi_customer_id: row.try_get("taxi_customer_id")?,
            taxi_booking_id: row.try_get("taxi_booking_id")?,
        })
    }
}

/// Maps a customer insert/update failure onto the typed duplicate error
/// when the named email constraint was violated.
fn translate_customer_err(e: sqlx::Error, email: &str) -> StoreError {
    if let sqlx::Error::Database(ref db_err) = e
        && db_err.constraint() == Some("unique_customer_email")
    {
        return StoreError::DuplicateEmail(email.to_string());
    }
    StoreError::Database(e)
}

fn translate_hotel_err(e: sqlx::Error, phone_number: &str) -> StoreError {
    if let sqlx::Error::Database(ref db_err) = e
        && db_err.constraint() == Some("unique_hotel_phone")
    {
        return StoreError::DuplicatePhone(phone_number.to_string());
    }
    StoreError::Database(e)
}

/// Maps a booking insert failure onto the room-day conflict or a
/// missing-reference error, depending on which constraint fired.
fn translate_booking_err(e: sqlx::Error, booking: &Booking) -> StoreError {
    if let sqlx::Error::Database(ref db_err) = e {
        match db_err.constraint() {
            Some("unique_hotel_date") => {
                return StoreError::DuplicateHotelDate {
                    hotel_id: booking.hotel_id,
                    date: booking.date,
                };
            }
            Some("fk_bookings_hotel") => return StoreError::HotelNotFound(booking.hotel_id),
            Some("fk_bookings_customer") => {
                return StoreError::CustomerNotFound(booking.customer_id);
            }
            _ => {}
        }
    }
    StoreError::Database(e)
}

const INSERT_CUSTOMER: &str = r#"
    INSERT INTO customers (id, first_name, last_name, email, phone_number)
    VALUES ($1, $2, $3, $4, $5)
"#;

const INSERT_BOOKING: &str = r#"
    INSERT INTO bookings (id, hotel_id, customer_id, booking_date)
    VALUES ($1, $2, $3, $4)
"#;

#[async_trait]
impl BookingStore for PostgresBookingStore {
    async fn create_customer(&self, customer: Customer) -> Result<Customer> {
        sqlx::query(INSERT_CUSTOMER)
            .bind(customer.id.as_uuid())
            .bind(&customer.first_name)
            .bind(&customer.last_name)
            .bind(&customer.email)
            .bind(&customer.phone_number)
            .execute(&self.pool)
            .await
            .map_err(|e| translate_customer_err(e, &customer.email))?;

        Ok(customer)
    }

    async fn update_customer(&self, customer: Customer) -> Result<Customer> {
        let result = sqlx::query(
            r#"
            UPDATE customers
            SET first_name = $2, last_name = $3, email = $4, phone_number = $5
            WHERE id = $1
            "#,
        )
        .bind(customer.id.as_uuid())
        .bind(&customer.first_name)
        .bind(&customer.last_name)
        .bind(&customer.email)
        .bind(&customer.phone_number)
        .execute(&self.pool)
        .await
        .map_err(|e| translate_customer_err(e, &customer.email))?;

        if result.rows_affected() == 0 {
            return Err(StoreError::CustomerNotFound(customer.id));
        }
        Ok(customer)
    }

    async fn find_customer(&self, id: CustomerId) -> Result<Option<Customer>> {
        let row = sqlx::query("SELECT * FROM customers WHERE id = $1")
            .bind(id.as_uuid())
            .fetch_optional(&self.pool)
            .await?;

        row.map(Self::row_to_customer).transpose()
    }

    async fn find_customer_by_email(&self, email: &str) -> Result<Option<Customer>> {
        let row = sqlx::query("SELECT * FROM customers WHERE email = $1")
            .bind(email)
            .fetch_optional(&self.pool)
            .await?;

        row.map(Self::row_to_customer).transpose()
    }

    async fn list_customers(&self) -> Result<Vec<Customer>> {
        let rows = sqlx::query("SELECT * FROM customers ORDER BY email ASC")
            .fetch_all(&self.pool)
            .await?;

        rows.into_iter().map(Self::row_to_customer).collect()
    }

    async fn delete_customer(&self, id: CustomerId) -> Result<()> {
        let result = sqlx::query("DELETE FROM customers WHERE id = $1")
            .bind(id.as_uuid())
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::CustomerNotFound(id));
        }
        Ok(())
    }

    async fn create_hotel(&self, hotel: Hotel) -> Result<Hotel> {
        sqlx::query(
            r#"
            INSERT INTO hotels (id, name, postcode, phone_number)
            VALUES ($1, $2, $3, $4)
            "#,
        )
        .bind(hotel.id.as_uuid())
        .bind(&hotel.name)
        .bind(&hotel.postcode)
        .bind(&hotel.phone_number)
        .execute(&self.pool)
        .await
        .map_err(|e| translate_hotel_err(e, &hotel.phone_number))?;

        Ok(hotel)
    }

    async fn find_hotel(&self, id: HotelId) -> Result<Option<Hotel>> {
        let row = sqlx::query("SELECT * FROM hotels WHERE id = $1")
            .bind(id.as_uuid())
            .fetch_optional(&self.pool)
            .await?;

        row.map(Self::row_to_hotel).transpose()
    }

    async fn find_hotel_by_phone(&self, phone_number: &str) -> Result<Option<Hotel>> {
        let row = sqlx::query("SELECT * FROM hotels WHERE phone_number = $1")
            .bind(phone_number)
            .fetch_optional(&self.pool)
            .await?;

        row.map(Self::row_to_hotel).transpose()
    }

    async fn list_hotels(&self) -> Result<Vec<Hotel>> {
        let rows = sqlx::query("SELECT * FROM hotels ORDER BY name ASC")
            .fetch_all(&self.pool)
            .await?;

        rows.into_iter().map(Self::row_to_hotel).collect()
    }

    async fn delete_hotel(&self, id: HotelId) -> Result<()> {
        let result = sqlx::query("DELETE FROM hotels WHERE id = $1")
            .bind(id.as_uuid())
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::HotelNotFound(id));
        }
        Ok(())
    }

    async fn create_booking(&self, booking: Booking) -> Result<Booking> {
        sqlx::query(INSERT_BOOKING)
            .bind(booking.id.as_uuid())
            .bind(booking.hotel_id.as_uuid())
            .bind(booking.customer_id.as_uuid())
            .bind(booking.date)
            .execute(&self.pool)
            .await
            .map_err(|e| translate_booking_err(e, &booking))?;

        Ok(booking)
    }

    async fn find_booking(&self, id: BookingId) -> Result<Option<Booking>> {
        let row = sqlx::query("SELECT * FROM bookings WHERE id = $1")
            .bind(id.as_uuid())
            .fetch_optional(&self.pool)
            .await?;

        row.map(Self::row_to_booking).transpose()
    }

    async fn find_booking_by_hotel_and_date(
        &self,
        hotel_id: HotelId,
        date: NaiveDate,
    ) -> Result<Option<Booking>> {
        let row = sqlx::query("SELECT * FROM bookings WHERE hotel_id = $1 AND booking_date = $2")
            .bind(hotel_id.as_uuid())
            .bind(date)
            .fetch_optional(&self.pool)
            .await?;

        row.map(Self::row_to_booking).transpose()
    }

    async fn list_bookings(&self) -> Result<Vec<Booking>> {
        let rows = sqlx::query("SELECT * FROM bookings ORDER BY booking_date ASC, id ASC")
            .fetch_all(&self.pool)
            .await?;

        rows.into_iter().map(Self::row_to_booking).collect()
    }

    async fn delete_booking(&self, id: BookingId) -> Result<()> {
        let result = sqlx::query("DELETE FROM bookings WHERE id = $1")
            .bind(id.as_uuid())
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::BookingNotFound(id));
        }
        Ok(())
    }

    async fn create_guest_booking(
        &self,
        customer: Customer,
        booking: Booking,
    ) -> Result<(Customer, Booking)> {
        // One transaction: the customer insert rolls back if the
        // booking insert violates any constraint.
        let mut tx = self.pool.begin().await?;

        sqlx::query(INSERT_CUSTOMER)
            .bind(customer.id.as_uuid())
            .bind(&customer.first_name)
            .bind(&customer.last_name)
            .bind(&customer.email)
            .bind(&customer.phone_number)
            .execute(&mut *tx)
            .await
            .map_err(|e| translate_customer_err(e, &customer.email))?;

        sqlx::query(INSERT_BOOKING)
            .bind(booking.id.as_uuid())
            .bind(booking.hotel_id.as_uuid())
            .bind(booking.customer_id.as_uuid())
            .bind(booking.date)
            .execute(&mut *tx)
            .await
            .map_err(|e| translate_booking_err(e, &booking))?;

        tx.commit().await?;
        Ok((customer, booking))
    }

    async fn create_trip_booking(&self, trip: TripBooking) -> Result<TripBooking> {
        sqlx::query(
            r#"
            INSERT INTO trip_bookings
                (id, hotel_customer_id, hotel_booking_id,
                 flight_customer_id, flight_booking_id,
                 taxi_customer_id, taxi_booking_id)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            "#,
        )
        .bind(trip.id.as_uuid())
        .bind(trip.hotel_customer_id.as_uuid())
        .bind(trip.hotel_booking_id.as_uuid())
        .bind(&trip.flight_customer_id)
        .bind(&trip.flight_booking_id)
        .bind(&trip.taxi_customer_id)
        .bind(&trip.taxi_booking_id)
        .execute(&self.pool)
        .await?;

        Ok(trip)
    }

    async fn find_trip_booking(&self, id: TripId) -> Result<Option<TripBooking>> {
        let row = sqlx::query("SELECT * FROM trip_bookings WHERE id = $1")
            .bind(id.as_uuid())
            .fetch_optional(&self.pool)
            .await?;

        row.map(Self::row_to_trip).transpose()
    }

    async fn list_trip_bookings(&self) -> Result<Vec<TripBooking>> {
        let rows = sqlx::query("SELECT * FROM trip_bookings ORDER BY id ASC")
            .fetch_all(&self.pool)
            .await?;

        rows.into_iter().map(Self::row_to_trip).collect()
    }

    async fn delete_trip_booking(&self, id: TripId) -> Result<()> {
        let result = sqlx::query("DELETE FROM trip_bookings WHERE id = $1")
            .bind(id.as_uuid())
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::TripNotFound(id));
        }
        Ok(())
    }
}
