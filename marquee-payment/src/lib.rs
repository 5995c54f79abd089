pub mod gateway;
pub mod models;
pub mod reconciler;
pub mod repository;
pub mod session;

pub use gateway::{GatewayConfig, HostedCheckoutClient, MockGateway};
pub use models::Payment;
pub use reconciler::{ReconcileOutcome, WebhookReconciler};
pub use repository::{PaymentStore, TransitionOutcome};
pub use session::{OpenedSession, PaymentSessionManager};
