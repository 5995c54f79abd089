use axum::{
    extract::{Path, State},
    routing::{get, post},
    Json, Router,
};
use chrono::{DateTime, Utc};
use marquee_booking::{BookingConfirmation, CreateBooking, Rider};
use marquee_core::payment::PaymentStatus;
use marquee_core::CoreError;
use marquee_shared::pii::Masked;
use serde::Serialize;
use uuid::Uuid;

use crate::error::ApiError;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct RiderResponse {
    pub id: Uuid,
    pub booking_id: Uuid,
    pub full_name: String,
    pub email: Masked<String>,
    pub contact_number: String,
    pub identity_document: String,
}

impl From<Rider> for RiderResponse {
    fn from(rider: Rider) -> Self {
        Self {
            id: rider.id,
            booking_id: rider.booking_id,
            full_name: rider.full_name,
            email: Masked(rider.email),
            contact_number: rider.contact_number,
            identity_document: rider.identity_document,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct BookingResponse {
    pub id: Uuid,
    pub full_name: Option<String>,
    pub email: Option<Masked<String>>,
    pub booking_date: DateTime<Utc>,
    pub seats_booked: i32,
    pub amount: i32,
    pub riders: Option<Vec<RiderResponse>>,
}

impl From<BookingConfirmation> for BookingResponse {
    fn from(confirmation: BookingConfirmation) -> Self {
        let riders: Vec<RiderResponse> = confirmation
            .riders
            .into_iter()
            .map(RiderResponse::from)
            .collect();
        Self {
            id: confirmation.booking.id,
            full_name: confirmation.booking.full_name,
            email: confirmation.booking.email.map(Masked),
            booking_date: confirmation.booking.created_at,
            seats_booked: confirmation.booking.seats_booked,
            amount: confirmation.amount,
            riders: if riders.is_empty() { None } else { Some(riders) },
        }
    }
}

#[derive(Debug, Serialize)]
pub struct BookingDetailResponse {
    pub id: Uuid,
    pub full_name: Option<String>,
    pub email: Option<Masked<String>>,
    pub booking_date: DateTime<Utc>,
    pub seats_booked: i32,
    pub payment_status: PaymentStatus,
    pub otp_verified: bool,
    pub riders: Vec<RiderResponse>,
}

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/api/v2/bookings", post(create_booking))
        .route("/api/v2/bookings/{id}", get(get_booking))
}

async fn create_booking(
    State(state): State<AppState>,
    Json(req): Json<CreateBooking>,
) -> Result<Json<BookingResponse>, ApiError> {
    let confirmation = state.allocator.create_booking(req).await?;
    Ok(Json(BookingResponse::from(confirmation)))
}

async fn get_booking(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<BookingDetailResponse>, ApiError> {
    let booking = state
        .bookings
        .get_booking(id)
        .await?
        .ok_or_else(|| CoreError::NotFound(format!("booking {id}")))?;
    let riders = state.bookings.riders_for_booking(id).await?;

    Ok(Json(BookingDetailResponse {
        id: booking.id,
        full_name: booking.full_name,
        email: booking.email.map(Masked),
        booking_date: booking.created_at,
        seats_booked: booking.seats_booked,
        payment_status: booking.payment_status,
        otp_verified: booking.otp_verified,
        riders: riders.into_iter().map(RiderResponse::from).collect(),
    }))
}
