pub mod app_config;
pub mod booking_repo;
pub mod catalog_repo;
pub mod database;
pub mod file_store;
pub mod memory;
pub mod notifier;
pub mod payment_repo;

pub use booking_repo::PgBookingStore;
pub use catalog_repo::PgCatalogStore;
pub use database::DbClient;
pub use file_store::LocalDocumentStore;
pub use memory::{MemoryStore, RecordingNotifier};
pub use notifier::{ConsoleNotifier, SmtpNotifier};
pub use payment_repo::PgPaymentStore;

use marquee_core::CoreError;

/// Shared sqlx → core error mapping. Anything the repositories do not handle
/// explicitly is an internal failure; the transaction has been rolled back.
pub(crate) fn db_err(e: sqlx::Error) -> CoreError {
    CoreError::Internal(format!("database error: {e}"))
}
