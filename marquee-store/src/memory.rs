use async_trait::async_trait;
use chrono::{DateTime, Utc};
use marquee_booking::{Booking, BookingStore, Rider};
use marquee_catalog::{CatalogStore, Package, VenueTable};
use marquee_core::notify::Notifier;
use marquee_core::payment::PaymentStatus;
use marquee_core::{CoreError, CoreResult};
use marquee_payment::{Payment, PaymentStore, TransitionOutcome};
use std::collections::HashMap;
use std::sync::Mutex;
use uuid::Uuid;

#[derive(Default)]
struct Inner {
    packages: HashMap<Uuid, Package>,
    tables: HashMap<Uuid, VenueTable>,
    bookings: HashMap<Uuid, Booking>,
    riders: Vec<Rider>,
    payments: Vec<Payment>,
}

/// In-memory implementation of all three store traits behind one mutex, so
/// check-and-flip operations are as atomic as their SQL counterparts. Used
/// by unit and router tests; never by production wiring.
#[derive(Default)]
pub struct MemoryStore {
    inner: Mutex<Inner>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_package(&self, package: Package) {
        self.inner
            .lock()
            .unwrap()
            .packages
            .insert(package.id, package);
    }

    pub fn add_table(&self, table: VenueTable) {
        self.inner.lock().unwrap().tables.insert(table.id, table);
    }

    pub fn payments(&self) -> Vec<Payment> {
        self.inner.lock().unwrap().payments.clone()
    }
}

#[async_trait]
impl CatalogStore for MemoryStore {
    async fn get_package(&self, id: Uuid) -> CoreResult<Option<Package>> {
        Ok(self.inner.lock().unwrap().packages.get(&id).cloned())
    }

    async fn list_packages(&self, event_id: Option<Uuid>) -> CoreResult<Vec<Package>> {
        let inner = self.inner.lock().unwrap();
        Ok(inner
            .packages
            .values()
            .filter(|p| event_id.is_none() || p.event_id == event_id)
            .cloned()
            .collect())
    }

    async fn list_tables(&self) -> CoreResult<Vec<VenueTable>> {
        let inner = self.inner.lock().unwrap();
        let mut tables: Vec<VenueTable> = inner.tables.values().cloned().collect();
        tables.sort_by_key(|t| t.table_number);
        Ok(tables)
    }
}

#[async_trait]
impl BookingStore for MemoryStore {
    async fn create_vip_booking(&self, booking: &Booking) -> CoreResult<()> {
        let table_id = booking
            .table_id
            .ok_or_else(|| CoreError::Internal("VIP booking without table reference".into()))?;

        let mut inner = self.inner.lock().unwrap();
        let table = inner
            .tables
            .get_mut(&table_id)
            .filter(|t| t.is_available)
            .ok_or_else(|| CoreError::Conflict("table not available".into()))?;
        table.is_available = false;
        inner.bookings.insert(booking.id, booking.clone());
        Ok(())
    }

    async fn create_rider_booking(&self, booking: &Booking, riders: &[Rider]) -> CoreResult<()> {
        let mut inner = self.inner.lock().unwrap();
        inner.bookings.insert(booking.id, booking.clone());
        inner.riders.extend_from_slice(riders);
        Ok(())
    }

    async fn get_booking(&self, id: Uuid) -> CoreResult<Option<Booking>> {
        Ok(self.inner.lock().unwrap().bookings.get(&id).cloned())
    }

    async fn riders_for_booking(&self, booking_id: Uuid) -> CoreResult<Vec<Rider>> {
        Ok(self
            .inner
            .lock()
            .unwrap()
            .riders
            .iter()
            .filter(|r| r.booking_id == booking_id)
            .cloned()
            .collect())
    }

    async fn set_otp(
        &self,
        booking_id: Uuid,
        code: &str,
        expires_at: DateTime<Utc>,
    ) -> CoreResult<()> {
        let mut inner = self.inner.lock().unwrap();
        let booking = inner
            .bookings
            .get_mut(&booking_id)
            .ok_or_else(|| CoreError::NotFound(format!("booking {booking_id}")))?;
        booking.otp_code = Some(code.to_string());
        booking.otp_expires_at = Some(expires_at);
        booking.otp_verified = false;
        booking.updated_at = Utc::now();
        Ok(())
    }

    async fn mark_otp_verified(&self, booking_id: Uuid) -> CoreResult<()> {
        let mut inner = self.inner.lock().unwrap();
        let booking = inner
            .bookings
            .get_mut(&booking_id)
            .ok_or_else(|| CoreError::NotFound(format!("booking {booking_id}")))?;
        booking.otp_verified = true;
        booking.otp_code = None;
        booking.updated_at = Utc::now();
        Ok(())
    }
}

#[async_trait]
impl PaymentStore for MemoryStore {
    async fn create_payment(&self, payment: &Payment) -> CoreResult<()> {
        let mut inner = self.inner.lock().unwrap();
        let duplicate = inner.payments.iter().any(|p| {
            (p.booking_id == payment.booking_id && p.status == PaymentStatus::Pending)
                || p.transaction_id == payment.transaction_id
        });
        if duplicate {
            return Err(CoreError::Conflict(
                "payment already initiated for this booking".into(),
            ));
        }
        inner.payments.push(payment.clone());
        Ok(())
    }

    async fn find_pending_for_booking(&self, booking_id: Uuid) -> CoreResult<Option<Payment>> {
        Ok(self
            .inner
            .lock()
            .unwrap()
            .payments
            .iter()
            .find(|p| p.booking_id == booking_id && p.status == PaymentStatus::Pending)
            .cloned())
    }

    async fn delete_pending_for_booking(&self, booking_id: Uuid) -> CoreResult<u64> {
        let mut inner = self.inner.lock().unwrap();
        let before = inner.payments.len();
        inner
            .payments
            .retain(|p| !(p.booking_id == booking_id && p.status == PaymentStatus::Pending));
        Ok((before - inner.payments.len()) as u64)
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

        let mut inner = self.inner.lock().unwrap();
        let Some(payment) = inner
            .payments
            .iter_mut()
            .find(|p| p.transaction_id == transaction_id)
        else {
            return Ok(TransitionOutcome::NotFound);
        };

        if payment.status.is_terminal() {
            return Ok(TransitionOutcome::AlreadyTerminal(payment.clone()));
        }

        payment.status = target;
        payment.gateway_response = raw.clone();
        payment.updated_at = Utc::now();
        let payment = payment.clone();

        let booking = inner
            .bookings
            .get_mut(&payment.booking_id)
            .ok_or_else(|| CoreError::Internal("payment without booking".into()))?;
        booking.payment_status = target;
        booking.updated_at = Utc::now();

        Ok(TransitionOutcome::Applied {
            payment,
            booking: booking.clone(),
        })
    }
}

/// Test notifier that records what would have been sent.
#[derive(Default)]
pub struct RecordingNotifier {
    sent: Mutex<Vec<(String, String, String)>>,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn sent(&self) -> Vec<(String, String, String)> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl Notifier for RecordingNotifier {
    async fn send_email(&self, to: &str, subject: &str, body: &str) -> CoreResult<()> {
        self.sent
            .lock()
            .unwrap()
            .push((to.to_string(), subject.to_string(), body.to_string()));
        Ok(())
    }
}
