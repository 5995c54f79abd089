use axum::{
    extract::{Query, State},
    routing::get,
    Json, Router,
};
use marquee_catalog::{Package, VenueTable};
use serde::Deserialize;
use uuid::Uuid;

use crate::error::ApiError;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct PackageQuery {
    pub event_id: Option<Uuid>,
}

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/api/v2/packages", get(list_packages))
        .route("/api/v2/tables", get(list_tables))
}

async fn list_packages(
    State(state): State<AppState>,
    Query(query): Query<PackageQuery>,
) -> Result<Json<Vec<Package>>, ApiError> {
    let packages = state.catalog.list_packages(query.event_id).await?;
    Ok(Json(packages))
}

async fn list_tables(State(state): State<AppState>) -> Result<Json<Vec<VenueTable>>, ApiError> {
    let tables = state.catalog.list_tables().await?;
    Ok(Json(tables))
}
