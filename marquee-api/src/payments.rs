use axum::{
    extract::{Path, State},
    routing::{get, post},
    Json, Router,
};
use marquee_payment::{OpenedSession, ReconcileOutcome};
use serde::Deserialize;
use serde_json::json;
use uuid::Uuid;

use crate::error::ApiError;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct PaymentInitiateRequest {
    pub booking_id: Uuid,
    pub package_id: Uuid,
    pub amount: i32,
}

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/api/v2/payment/create-session", post(create_session))
        .route("/api/v2/payment/retry/{booking_id}", post(retry_payment))
        .route("/api/v2/payment/verify/{transaction_id}", get(verify_payment))
        .route("/api/v2/payment/webhook", post(handle_webhook))
}

async fn create_session(
    State(state): State<AppState>,
    Json(req): Json<PaymentInitiateRequest>,
) -> Result<Json<OpenedSession>, ApiError> {
    let opened = state
        .sessions
        .open_session(req.booking_id, req.package_id, req.amount)
        .await?;
    Ok(Json(opened))
}

async fn retry_payment(
    State(state): State<AppState>,
    Path(booking_id): Path<Uuid>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let removed = state.sessions.retry_payment(booking_id).await?;
    Ok(Json(json!({
        "message": "Retry allowed. Please create a new payment session.",
        "removed": removed,
    })))
}

async fn verify_payment(
    State(state): State<AppState>,
    Path(transaction_id): Path<String>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let status = state.sessions.verify_payment(&transaction_id).await?;
    Ok(Json(status))
}

/// Gateway callbacks. Unknown transactions and redeliveries are acknowledged
/// with success so the gateway stops resending; only malformed payloads get
/// a 4xx.
async fn handle_webhook(
    State(state): State<AppState>,
    Json(payload): Json<serde_json::Value>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let outcome = state.reconciler.handle(payload).await?;
    let body = match outcome {
        ReconcileOutcome::Applied(_) => json!({ "success": true }),
        ReconcileOutcome::AlreadyProcessed => {
            json!({ "success": true, "message": "Already processed" })
        }
        ReconcileOutcome::UnknownTransaction => {
            json!({ "success": true, "message": "Unknown transaction, ignored" })
        }
    };
    Ok(Json(body))
}
