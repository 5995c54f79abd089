use anyhow::Context;
use marquee_api::{app, AppState};
use marquee_booking::{BookingStore, OtpChallenge, ReservationAllocator};
use marquee_catalog::CatalogStore;
use marquee_core::notify::Notifier;
use marquee_payment::{HostedCheckoutClient, PaymentSessionManager, PaymentStore, WebhookReconciler};
use marquee_store::{
    ConsoleNotifier, DbClient, LocalDocumentStore, PgBookingStore, PgCatalogStore, PgPaymentStore,
    SmtpNotifier,
};
use std::net::SocketAddr;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "marquee_api=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = marquee_store::app_config::Config::load().context("Failed to load config")?;
    tracing::info!("Starting Marquee API on port {}", config.server.port);

    let db = DbClient::new(&config.database.url)
        .await
        .context("Failed to connect to Postgres")?;
    db.migrate().await.context("Failed to run migrations")?;

    let catalog: Arc<dyn CatalogStore> = Arc::new(PgCatalogStore::new(db.pool.clone()));
    let bookings: Arc<dyn BookingStore> = Arc::new(PgBookingStore::new(db.pool.clone()));
    let payments: Arc<dyn PaymentStore> = Arc::new(PgPaymentStore::new(db.pool.clone()));

    let gateway = Arc::new(
        HostedCheckoutClient::new(config.gateway.clone())
            .context("Failed to build gateway client")?,
    );
    let notifier: Arc<dyn Notifier> = if config.smtp.enabled {
        Arc::new(SmtpNotifier::new(&config.smtp))
    } else {
        tracing::info!("SMTP disabled, emails go to the log");
        Arc::new(ConsoleNotifier::new())
    };
    let documents = Arc::new(LocalDocumentStore::new(&config.uploads));

    let state = AppState {
        allocator: Arc::new(ReservationAllocator::new(catalog.clone(), bookings.clone())),
        sessions: Arc::new(PaymentSessionManager::new(
            bookings.clone(),
            catalog.clone(),
            payments.clone(),
            gateway,
            config.currency.clone(),
        )),
        reconciler: Arc::new(WebhookReconciler::new(payments, notifier.clone())),
        otp: Arc::new(OtpChallenge::new(bookings.clone(), notifier)),
        catalog,
        bookings,
        documents,
    };

    let app = app(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.server.port));
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .context("Failed to bind listener")?;
    axum::serve(listener, app).await.context("Server error")?;
    Ok(())
}
