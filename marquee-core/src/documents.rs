use crate::CoreResult;
use async_trait::async_trait;

/// Identity-document storage seam. Returns an opaque path token that booking
/// and rider records reference; the engine never reads the bytes back.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    async fn save(&self, bytes: &[u8], name_hint: &str) -> CoreResult<String>;
}
