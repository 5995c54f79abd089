use axum::{
    extract::{Path, State},
    routing::post,
    Json, Router,
};
use marquee_booking::OtpVerification;
use serde::Deserialize;
use serde_json::json;
use uuid::Uuid;

use crate::error::ApiError;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct VerifyOtpRequest {
    pub otp: String,
}

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/api/v2/otp/send/{booking_id}", post(send_otp))
        .route("/api/v2/otp/verify/{booking_id}", post(verify_otp))
}

async fn send_otp(
    State(state): State<AppState>,
    Path(booking_id): Path<Uuid>,
) -> Result<Json<serde_json::Value>, ApiError> {
    state.otp.issue(booking_id).await?;
    Ok(Json(json!({ "message": "OTP sent successfully" })))
}

async fn verify_otp(
    State(state): State<AppState>,
    Path(booking_id): Path<Uuid>,
    Json(req): Json<VerifyOtpRequest>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let message = match state.otp.verify(booking_id, &req.otp).await? {
        OtpVerification::Verified => "OTP verified successfully",
        OtpVerification::AlreadyVerified => "OTP already verified",
    };
    Ok(Json(json!({ "message": message })))
}
