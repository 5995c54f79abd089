use crate::db_err;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use marquee_booking::{Booking, BookingStore, Rider};
use marquee_core::{CoreError, CoreResult};
use sqlx::{PgPool, Postgres, Transaction};
use uuid::Uuid;

pub struct PgBookingStore {
    pool: PgPool,
}

impl PgBookingStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn insert_booking(
        tx: &mut Transaction<'_, Postgres>,
        booking: &Booking,
    ) -> Result<(), sqlx::Error> {
        sqlx::query(
            r#"
            INSERT INTO bookings
                (id, event_id, package_id, table_id, full_name, contact_number, email,
                 identity_id, identity_document, seats_booked, payment_status,
                 otp_code, otp_verified, otp_expires_at, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16)
            "#,
        )
        .bind(booking.id)
        .bind(booking.event_id)
        .bind(booking.package_id)
        .bind(booking.table_id)
        .bind(&booking.full_name)
        .bind(&booking.contact_number)
        .bind(&booking.email)
        .bind(&booking.identity_id)
        .bind(&booking.identity_document)
        .bind(booking.seats_booked)
        .bind(booking.payment_status.as_str())
        .bind(&booking.otp_code)
        .bind(booking.otp_verified)
        .bind(booking.otp_expires_at)
        .bind(booking.created_at)
        .bind(booking.updated_at)
        .execute(&mut **tx)
        .await?;
        Ok(())
    }
}

// Internal structs for type-safe querying
#[derive(sqlx::FromRow)]
pub(crate) struct BookingRow {
    id: Uuid,
    event_id: Uuid,
    package_id: Uuid,
    table_id: Option<Uuid>,
    full_name: Option<String>,
    contact_number: Option<String>,
    email: Option<String>,
    identity_id: Option<String>,
    identity_document: Option<String>,
    seats_booked: i32,
    payment_status: String,
    otp_code: Option<String>,
    otp_verified: bool,
    otp_expires_at: Option<DateTime<Utc>>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl BookingRow {
    pub(crate) fn into_booking(self) -> CoreResult<Booking> {
        Ok(Booking {
            id: self.id,
            event_id: self.event_id,
            package_id: self.package_id,
            table_id: self.table_id,
            full_name: self.full_name,
            contact_number: self.contact_number,
            email: self.email,
            identity_id: self.identity_id,
            identity_document: self.identity_document,
            seats_booked: self.seats_booked,
            payment_status: self.payment_status.parse().map_err(CoreError::Internal)?,
            otp_code: self.otp_code,
            otp_verified: self.otp_verified,
            otp_expires_at: self.otp_expires_at,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

pub(crate) const BOOKING_COLUMNS: &str =
    "id, event_id, package_id, table_id, full_name, contact_number, email, identity_id, \
     identity_document, seats_booked, payment_status, otp_code, otp_verified, otp_expires_at, \
     created_at, updated_at";

#[derive(sqlx::FromRow)]
struct RiderRow {
    id: Uuid,
    booking_id: Uuid,
    package_id: Uuid,
    full_name: String,
    identity_id: String,
    email: String,
    contact_number: String,
    identity_document: String,
    created_at: DateTime<Utc>,
}

impl From<RiderRow> for Rider {
    fn from(row: RiderRow) -> Self {
        Rider {
            id: row.id,
            booking_id: row.booking_id,
            package_id: row.package_id,
            full_name: row.full_name,
            identity_id: row.identity_id,
            email: row.email,
            contact_number: row.contact_number,
            identity_document: row.identity_document,
            created_at: row.created_at,
        }
    }
}

#[async_trait]
impl BookingStore for PgBookingStore {
    async fn create_vip_booking(&self, booking: &Booking) -> CoreResult<()> {
        let table_id = booking
            .table_id
            .ok_or_else(|| CoreError::Internal("VIP booking without table reference".into()))?;

        let mut tx = self.pool.begin().await.map_err(db_err)?;

        // Conditional flip is the race arbiter: whoever matches the row wins
        // the table, everyone else sees zero affected rows.
        let claimed = sqlx::query(
            "UPDATE venue_tables SET is_available = FALSE WHERE id = $1 AND is_available = TRUE",
        )
        .bind(table_id)
        .execute(&mut *tx)
        .await
        .map_err(db_err)?;

        if claimed.rows_affected() == 0 {
            return Err(CoreError::Conflict("table not available".into()));
        }

        Self::insert_booking(&mut tx, booking).await.map_err(db_err)?;
        tx.commit().await.map_err(db_err)?;
        Ok(())
    }

    async fn create_rider_booking(&self, booking: &Booking, riders: &[Rider]) -> CoreResult<()> {
        let mut tx = self.pool.begin().await.map_err(db_err)?;

        Self::insert_booking(&mut tx, booking).await.map_err(db_err)?;

        for rider in riders {
            sqlx::query(
                r#"
                INSERT INTO riders
                    (id, booking_id, package_id, full_name, identity_id, email,
                     contact_number, identity_document, created_at)
                VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
                "#,
            )
            .bind(rider.id)
            .bind(rider.booking_id)
            .bind(rider.package_id)
            .bind(&rider.full_name)
            .bind(&rider.identity_id)
            .bind(&rider.email)
            .bind(&rider.contact_number)
            .bind(&rider.identity_document)
            .bind(rider.created_at)
            .execute(&mut *tx)
            .await
            .map_err(db_err)?;
        }

        tx.commit().await.map_err(db_err)?;
        Ok(())
    }

    async fn get_booking(&self, id: Uuid) -> CoreResult<Option<Booking>> {
        let row = sqlx::query_as::<_, BookingRow>(&format!(
            "SELECT {BOOKING_COLUMNS} FROM bookings WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(db_err)?;

        row.map(BookingRow::into_booking).transpose()
    }

    async fn riders_for_booking(&self, booking_id: Uuid) -> CoreResult<Vec<Rider>> {
        let rows = sqlx::query_as::<_, RiderRow>(
            "SELECT id, booking_id, package_id, full_name, identity_id, email, \
             contact_number, identity_document, created_at \
             FROM riders WHERE booking_id = $1 ORDER BY created_at",
        )
        .bind(booking_id)
        .fetch_all(&self.pool)
        .await
        .map_err(db_err)?;

        Ok(rows.into_iter().map(Rider::from).collect())
    }

    async fn set_otp(
        &self,
        booking_id: Uuid,
        code: &str,
        expires_at: DateTime<Utc>,
    ) -> CoreResult<()> {
        let result = sqlx::query(
            "UPDATE bookings SET otp_code = $2, otp_expires_at = $3, otp_verified = FALSE, \
             updated_at = NOW() WHERE id = $1",
        )
        .bind(booking_id)
        .bind(code)
        .bind(expires_at)
        .execute(&self.pool)
        .await
        .map_err(db_err)?;

        if result.rows_affected() == 0 {
            return Err(CoreError::NotFound(format!("booking {booking_id}")));
        }
        Ok(())
    }

    async fn mark_otp_verified(&self, booking_id: Uuid) -> CoreResult<()> {
        let result = sqlx::query(
            "UPDATE bookings SET otp_verified = TRUE, otp_code = NULL, updated_at = NOW() \
             WHERE id = $1",
        )
        .bind(booking_id)
        .execute(&self.pool)
        .await
        .map_err(db_err)?;

        if result.rows_affected() == 0 {
            return Err(CoreError::NotFound(format!("booking {booking_id}")));
        }
        Ok(())
    }
}
