use axum::{
    extract::{DefaultBodyLimit, Multipart, State},
    routing::post,
    Json, Router,
};
use marquee_core::CoreError;
use serde_json::json;

use crate::error::ApiError;
use crate::state::AppState;

const UPLOAD_BODY_LIMIT: usize = 10 * 1024 * 1024;

pub fn routes() -> Router<AppState> {
    Router::new().route(
        "/api/v2/upload",
        post(upload_file).layer(DefaultBodyLimit::max(UPLOAD_BODY_LIMIT)),
    )
}

/// Accepts one multipart `file` field and hands it to the document store.
/// The returned path token is what booking requests reference.
async fn upload_file(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<serde_json::Value>, ApiError> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| CoreError::Validation(format!("invalid multipart body: {e}")))?
    {
        if field.name() != Some("file") {
            continue;
        }
        let original_name = field
            .file_name()
            .ok_or_else(|| CoreError::Validation("file name is required".into()))?
            .to_string();
        let bytes = field
            .bytes()
            .await
            .map_err(|e| CoreError::Validation(format!("failed to read upload: {e}")))?;

        let path = state.documents.save(&bytes, &original_name).await?;
        return Ok(Json(json!({
            "success": true,
            "path": path,
            "original_name": original_name,
        })));
    }

    Err(CoreError::Validation("file field is required".into()).into())
}
