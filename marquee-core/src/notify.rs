use crate::CoreResult;
use async_trait::async_trait;

/// Outbound notification seam. Delivery is best-effort everywhere it is used:
/// callers log a failure and move on, they never roll back committed state
/// because an email bounced.
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn send_email(&self, to: &str, subject: &str, body: &str) -> CoreResult<()>;
}
