//! Application state

use anyhow::{Context, Result};
use bookcraft_core::source::{LocalEntitlements, LocalProjectStore};
use bookcraft_core::ExportService;
use std::path::PathBuf;
use std::sync::Arc;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// Export service wired to the project store and purchase ledger
    pub exports: ExportService,
}

impl AppState {
    /// Create state backed by local storage.
    ///
    /// Projects live under `$BOOKCRAFT_STORAGE_PATH/projects`, purchases in
    /// `$BOOKCRAFT_STORAGE_PATH/purchases.json`.
    pub async fn new() -> Result<Self> {
        let storage_path = std::env::var("BOOKCRAFT_STORAGE_PATH")
            .unwrap_or_else(|_| "./bookcraft_data".to_string());
        let storage_path = PathBuf::from(storage_path);

        tokio::fs::create_dir_all(storage_path.join("projects"))
            .await
            .with_context(|| format!("Failed to create {}", storage_path.display()))?;
        tracing::info!(path = %storage_path.display(), "Using local project storage");

        let exports = ExportService::new(
            Arc::new(LocalProjectStore::new(&storage_path)),
            Arc::new(LocalEntitlements::new(&storage_path)),
        );
        Ok(Self::with_service(exports))
    }

    /// Create state around an existing export service
    pub fn with_service(exports: ExportService) -> Self {
        Self { exports }
    }
}
