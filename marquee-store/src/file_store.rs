use crate::app_config::UploadConfig;
use async_trait::async_trait;
use marquee_core::documents::DocumentStore;
use marquee_core::{CoreError, CoreResult};
use std::path::PathBuf;
use uuid::Uuid;

/// Identity documents on local disk. Files are renamed to a fresh UUID with
/// the original extension; the returned path token is what booking and rider
/// records reference.
pub struct LocalDocumentStore {
    dir: PathBuf,
    max_file_size: usize,
    allowed_types: Vec<String>,
}

impl LocalDocumentStore {
    pub fn new(config: &UploadConfig) -> Self {
        Self {
            dir: PathBuf::from(&config.dir),
            max_file_size: config.max_file_size,
            allowed_types: config
                .allowed_types
                .iter()
                .map(|t| t.to_lowercase())
                .collect(),
        }
    }

    fn extension(&self, name_hint: &str) -> CoreResult<String> {
        let ext = name_hint
            .rsplit_once('.')
            .map(|(_, ext)| ext.to_lowercase())
            .filter(|ext| !ext.is_empty())
            .ok_or_else(|| {
                CoreError::Validation(format!(
                    "file type not allowed, allowed types: {}",
                    self.allowed_types.join(", ")
                ))
            })?;
        if !self.allowed_types.contains(&ext) {
            return Err(CoreError::Validation(format!(
                "file type not allowed, allowed types: {}",
                self.allowed_types.join(", ")
            )));
        }
        Ok(ext)
    }
}

#[async_trait]
impl DocumentStore for LocalDocumentStore {
    async fn save(&self, bytes: &[u8], name_hint: &str) -> CoreResult<String> {
        let ext = self.extension(name_hint)?;

        if bytes.len() > self.max_file_size {
            return Err(CoreError::Validation(format!(
                "file size exceeds maximum of {} bytes",
                self.max_file_size
            )));
        }

        tokio::fs::create_dir_all(&self.dir)
            .await
            .map_err(|e| CoreError::Internal(format!("failed to create upload dir: {e}")))?;

        let path = self.dir.join(format!("{}.{ext}", Uuid::new_v4()));
        tokio::fs::write(&path, bytes)
            .await
            .map_err(|e| CoreError::Internal(format!("failed to store document: {e}")))?;

        Ok(path.to_string_lossy().into_owned())
    }
}
