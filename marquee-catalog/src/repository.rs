use crate::models::{Package, VenueTable};
use async_trait::async_trait;
use marquee_core::CoreResult;
use uuid::Uuid;

/// Read-only lookup of sellable inventory. Writes go through seeding or the
/// upstream catalog, never through the engine.
#[async_trait]
pub trait CatalogStore: Send + Sync {
    async fn get_package(&self, id: Uuid) -> CoreResult<Option<Package>>;

    async fn list_packages(&self, event_id: Option<Uuid>) -> CoreResult<Vec<Package>>;

    async fn list_tables(&self) -> CoreResult<Vec<VenueTable>>;
}
