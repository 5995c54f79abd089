use crate::db_err;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use marquee_catalog::{CatalogStore, Package, VenueTable};
use marquee_core::{CoreError, CoreResult};
use sqlx::PgPool;
use uuid::Uuid;

pub struct PgCatalogStore {
    pool: PgPool,
}

impl PgCatalogStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

// Internal structs for type-safe querying
#[derive(sqlx::FromRow)]
struct PackageRow {
    id: Uuid,
    event_id: Option<Uuid>,
    name: String,
    kind: String,
    price: i32,
    description: Option<String>,
    max_capacity: i32,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl PackageRow {
    fn into_package(self) -> CoreResult<Package> {
        Ok(Package {
            id: self.id,
            event_id: self.event_id,
            name: self.name,
            kind: self.kind.parse().map_err(CoreError::Internal)?,
            price: self.price,
            description: self.description,
            max_capacity: self.max_capacity,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

#[derive(sqlx::FromRow)]
struct TableRow {
    id: Uuid,
    table_number: i32,
    capacity: i32,
    is_available: bool,
    created_at: DateTime<Utc>,
}

impl From<TableRow> for VenueTable {
    fn from(row: TableRow) -> Self {
        VenueTable {
            id: row.id,
            table_number: row.table_number,
            capacity: row.capacity,
            is_available: row.is_available,
            created_at: row.created_at,
        }
    }
}

const PACKAGE_COLUMNS: &str =
    "id, event_id, name, kind, price, description, max_capacity, created_at, updated_at";

#[async_trait]
impl CatalogStore for PgCatalogStore {
    async fn get_package(&self, id: Uuid) -> CoreResult<Option<Package>> {
        let row = sqlx::query_as::<_, PackageRow>(&format!(
            "SELECT {PACKAGE_COLUMNS} FROM packages WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(db_err)?;

        row.map(PackageRow::into_package).transpose()
    }

    async fn list_packages(&self, event_id: Option<Uuid>) -> CoreResult<Vec<Package>> {
        let rows = match event_id {
            Some(event_id) => {
                sqlx::query_as::<_, PackageRow>(&format!(
                    "SELECT {PACKAGE_COLUMNS} FROM packages WHERE event_id = $1 ORDER BY name"
                ))
                .bind(event_id)
                .fetch_all(&self.pool)
                .await
            }
            None => {
                sqlx::query_as::<_, PackageRow>(&format!(
                    "SELECT {PACKAGE_COLUMNS} FROM packages ORDER BY name"
                ))
                .fetch_all(&self.pool)
                .await
            }
        }
        .map_err(db_err)?;

        rows.into_iter().map(PackageRow::into_package).collect()
    }

    async fn list_tables(&self) -> CoreResult<Vec<VenueTable>> {
        let rows = sqlx::query_as::<_, TableRow>(
            "SELECT id, table_number, capacity, is_available, created_at \
             FROM venue_tables ORDER BY table_number",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(db_err)?;

        Ok(rows.into_iter().map(VenueTable::from).collect())
    }
}
