pub mod models;
pub mod repository;

pub use models::{Package, PackageKind, VenueTable};
pub use repository::CatalogStore;
