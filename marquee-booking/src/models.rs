use chrono::{DateTime, Utc};
use marquee_core::payment::PaymentStatus;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Aggregate root for a reservation. Owns its Rider children and the Payment
/// attempts made against it; references (never owns) a VenueTable.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Booking {
    pub id: Uuid,
    pub event_id: Uuid,
    pub package_id: Uuid,
    /// Set for VIP bookings only.
    pub table_id: Option<Uuid>,
    pub full_name: Option<String>,
    pub contact_number: Option<String>,
    pub email: Option<String>,
    pub identity_id: Option<String>,
    pub identity_document: Option<String>,
    pub seats_booked: i32,
    pub payment_status: PaymentStatus,
    pub otp_code: Option<String>,
    pub otp_verified: bool,
    pub otp_expires_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Booking {
    /// VIP booking: one exclusive table, contact details on the booking
    /// itself, always a single seat.
    pub fn new_vip(
        event_id: Uuid,
        package_id: Uuid,
        table_id: Uuid,
        full_name: String,
        contact_number: String,
        email: String,
        identity_id: String,
        identity_document: String,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            event_id,
            package_id,
            table_id: Some(table_id),
            full_name: Some(full_name),
            contact_number: Some(contact_number),
            email: Some(email),
            identity_id: Some(identity_id),
            identity_document: Some(identity_document),
            seats_booked: 1,
            payment_status: PaymentStatus::Pending,
            otp_code: None,
            otp_verified: false,
            otp_expires_at: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Rider booking: no table, contact data lives on the Rider children.
    pub fn new_rider(event_id: Uuid, package_id: Uuid, seats_booked: i32) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            event_id,
            package_id,
            table_id: None,
            full_name: None,
            contact_number: None,
            email: None,
            identity_id: None,
            identity_document: None,
            seats_booked,
            payment_status: PaymentStatus::Pending,
            otp_code: None,
            otp_verified: false,
            otp_expires_at: None,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Child record of a RIDER-kind booking, one per seat. Created atomically
/// with the booking and cascade-deleted with it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Rider {
    pub id: Uuid,
    pub booking_id: Uuid,
    pub package_id: Uuid,
    pub full_name: String,
    pub identity_id: String,
    pub email: String,
    pub contact_number: String,
    pub identity_document: String,
    pub created_at: DateTime<Utc>,
}

impl Rider {
    pub fn new(
        booking_id: Uuid,
        package_id: Uuid,
        full_name: String,
        identity_id: String,
        email: String,
        contact_number: String,
        identity_document: String,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            booking_id,
            package_id,
            full_name,
            identity_id,
            email,
            contact_number,
            identity_document,
            created_at: Utc::now(),
        }
    }
}
