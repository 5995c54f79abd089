use crate::booking_repo::{BookingRow, BOOKING_COLUMNS};
use crate::db_err;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use marquee_core::payment::PaymentStatus;
use marquee_core::{CoreError, CoreResult};
use marquee_payment::{Payment, PaymentStore, TransitionOutcome};
use sqlx::PgPool;
use uuid::Uuid;

pub struct PgPaymentStore {
    pool: PgPool,
}

impl PgPaymentStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

// Internal structs for type-safe querying
#[derive(sqlx::FromRow)]
struct PaymentRow {
    id: Uuid,
    booking_id: Uuid,
    package_id: Uuid,
    amount: i32,
    currency: String,
    transaction_id: String,
    status: String,
    gateway_response: serde_json::Value,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl PaymentRow {
    fn into_payment(self) -> CoreResult<Payment> {
        Ok(Payment {
            id: self.id,
            booking_id: self.booking_id,
            package_id: self.package_id,
            amount: self.amount,
            currency: self.currency,
            transaction_id: self.transaction_id,
            status: self.status.parse().map_err(CoreError::Internal)?,
            gateway_response: self.gateway_response,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

const PAYMENT_COLUMNS: &str = "id, booking_id, package_id, amount, currency, transaction_id, \
                               status, gateway_response, created_at, updated_at";

#[async_trait]
impl PaymentStore for PgPaymentStore {
    async fn create_payment(&self, payment: &Payment) -> CoreResult<()> {
        sqlx::query(
            r#"
            INSERT INTO payments
                (id, booking_id, package_id, amount, currency, transaction_id,
                 status, gateway_response, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            "#,
        )
        .bind(payment.id)
        .bind(payment.booking_id)
        .bind(payment.package_id)
        .bind(payment.amount)
        .bind(&payment.currency)
        .bind(&payment.transaction_id)
        .bind(payment.status.as_str())
        .bind(&payment.gateway_response)
        .bind(payment.created_at)
        .bind(payment.updated_at)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            // Loser of a concurrent open-session race trips the partial
            // unique index on (booking_id) WHERE status = 'PENDING'.
            if let sqlx::Error::Database(db) = &e {
                if db.kind() == sqlx::error::ErrorKind::UniqueViolation {
                    return CoreError::Conflict(
                        "payment already initiated for this booking".into(),
                    );
                }
            }
            db_err(e)
        })?;
        Ok(())
    }

    async fn find_pending_for_booking(&self, booking_id: Uuid) -> CoreResult<Option<Payment>> {
        let row = sqlx::query_as::<_, PaymentRow>(&format!(
            "SELECT {PAYMENT_COLUMNS} FROM payments WHERE booking_id = $1 AND status = 'PENDING'"
        ))
        .bind(booking_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(db_err)?;

        row.map(PaymentRow::into_payment).transpose()
    }

    async fn delete_pending_for_booking(&self, booking_id: Uuid) -> CoreResult<u64> {
        let result =
            sqlx::query("DELETE FROM payments WHERE booking_id = $1 AND status = 'PENDING'")
                .bind(booking_id)
                .execute(&self.pool)
                .await
                .map_err(db_err)?;
        Ok(result.rows_affected())
    }

    async fn transition_if_pending(
        &self,
        transaction_id: &str,
        target: PaymentStatus,
        raw: &serde_json::Value,
    ) -> CoreResult<TransitionOutcome> {
        if !target.is_terminal() {
            return Err(CoreError::Internal(
                "webhook transition target must be terminal".into(),
            ));
        }

        let mut tx = self.pool.begin().await.map_err(db_err)?;

        // Row lock serializes against concurrent deliveries of the same
        // webhook and against a retry deleting the row under us.
        let row = sqlx::query_as::<_, PaymentRow>(&format!(
            "SELECT {PAYMENT_COLUMNS} FROM payments WHERE transaction_id = $1 FOR UPDATE"
        ))
        .bind(transaction_id)
        .fetch_optional(&mut *tx)
        .await
        .map_err(db_err)?;

        let Some(row) = row else {
            return Ok(TransitionOutcome::NotFound);
        };
        let payment = row.into_payment()?;

        if payment.status.is_terminal() {
            return Ok(TransitionOutcome::AlreadyTerminal(payment));
        }

        sqlx::query(
            "UPDATE payments SET status = $2, gateway_response = $3, updated_at = NOW() \
             WHERE id = $1",
        )
        .bind(payment.id)
        .bind(target.as_str())
        .bind(raw)
        .execute(&mut *tx)
        .await
        .map_err(db_err)?;

        sqlx::query("UPDATE bookings SET payment_status = $2, updated_at = NOW() WHERE id = $1")
            .bind(payment.booking_id)
            .bind(target.as_str())
            .execute(&mut *tx)
            .await
            .map_err(db_err)?;

        let booking_row = sqlx::query_as::<_, BookingRow>(&format!(
            "SELECT {BOOKING_COLUMNS} FROM bookings WHERE id = $1"
        ))
        .bind(payment.booking_id)
        .fetch_one(&mut *tx)
        .await
        .map_err(db_err)?;
        let booking = booking_row.into_booking()?;

        tx.commit().await.map_err(db_err)?;

        let payment = Payment {
            status: target,
            gateway_response: raw.clone(),
            ..payment
        };
        Ok(TransitionOutcome::Applied { payment, booking })
    }
}
