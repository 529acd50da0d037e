//! Collaborators the export service reads from: the project store and the
//! purchase ledger

use crate::error::{BookcraftError, SourceError};
use crate::types::BookProject;
use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};
use tokio::sync::RwLock;
use uuid::Uuid;

/// Result type for source operations
pub type SourceResult<T> = std::result::Result<T, SourceError>;

/// Read access to book projects, checked against the requesting owner
#[async_trait]
pub trait ProjectStore: Send + Sync {
    /// Fetch a project. A project owned by someone else is reported as
    /// not found.
    async fn get_project(&self, id: Uuid, owner: &str) -> SourceResult<BookProject>;
}

/// Whether a user has ever completed a purchase
#[async_trait]
pub trait EntitlementSource: Send + Sync {
    async fn has_ever_purchased(&self, owner: &str) -> SourceResult<bool>;
}

/// Read a single project record from a JSON file
pub fn load_project(path: &Path) -> crate::Result<BookProject> {
    let bytes = std::fs::read(path)?;
    serde_json::from_slice(&bytes).map_err(|e| {
        BookcraftError::Source(SourceError::Malformed(format!("{}: {}", path.display(), e)))
    })
}

fn check_owner(project: BookProject, id: Uuid, owner: &str) -> SourceResult<BookProject> {
    if project.owner == owner {
        Ok(project)
    } else {
        Err(SourceError::NotFound(id.to_string()))
    }
}

/// Local filesystem project store: one JSON file per project under
/// `<root>/projects/{id}.json`
pub struct LocalProjectStore {
    root: PathBuf,
}

impl LocalProjectStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn project_path(&self, id: Uuid) -> PathBuf {
        self.root.join("projects").join(format!("{}.json", id))
    }

    /// Write a project record (used by tests and tooling)
    pub async fn save_project(&self, project: &BookProject) -> SourceResult<()> {
        let path = self.project_path(project.id);
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| SourceError::BackendError(e.to_string()))?;
        }
        let json = serde_json::to_vec_pretty(project)
            .map_err(|e| SourceError::Malformed(e.to_string()))?;
        tokio::fs::write(path, json)
            .await
            .map_err(|e| SourceError::BackendError(e.to_string()))
    }
}

#[async_trait]
impl ProjectStore for LocalProjectStore {
    async fn get_project(&self, id: Uuid, owner: &str) -> SourceResult<BookProject> {
        let bytes = tokio::fs::read(self.project_path(id))
            .await
            .map_err(|e| match e.kind() {
                std::io::ErrorKind::NotFound => SourceError::NotFound(id.to_string()),
                _ => SourceError::BackendError(e.to_string()),
            })?;
        let project: BookProject = serde_json::from_slice(&bytes)
            .map_err(|e| SourceError::Malformed(format!("{}: {}", id, e)))?;
        check_owner(project, id, owner)
    }
}

/// Purchase ledger kept as a JSON list of owners in `<root>/purchases.json`.
/// A missing file means nobody has purchased yet.
pub struct LocalEntitlements {
    path: PathBuf,
}

impl LocalEntitlements {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            path: root.into().join("purchases.json"),
        }
    }
}

#[async_trait]
impl EntitlementSource for LocalEntitlements {
    async fn has_ever_purchased(&self, owner: &str) -> SourceResult<bool> {
        let bytes = match tokio::fs::read(&self.path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(false),
            Err(e) => return Err(SourceError::BackendError(e.to_string())),
        };
        let owners: Vec<String> =
            serde_json::from_slice(&bytes).map_err(|e| SourceError::Malformed(e.to_string()))?;
        Ok(owners.iter().any(|o| o == owner))
    }
}

/// In-memory project store (for testing)
#[derive(Default)]
pub struct InMemoryProjectStore {
    projects: RwLock<HashMap<Uuid, BookProject>>,
}

impl InMemoryProjectStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn insert(&self, project: BookProject) {
        self.projects.write().await.insert(project.id, project);
    }
}

#[async_trait]
impl ProjectStore for InMemoryProjectStore {
    async fn get_project(&self, id: Uuid, owner: &str) -> SourceResult<BookProject> {
        let project = self
            .projects
            .read()
            .await
            .get(&id)
            .cloned()
            .ok_or_else(|| SourceError::NotFound(id.to_string()))?;
        check_owner(project, id, owner)
    }
}

/// In-memory purchase ledger (for testing)
#[derive(Default)]
pub struct InMemoryEntitlements {
    purchasers: RwLock<HashSet<String>>,
}

impl InMemoryEntitlements {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn record_purchase(&self, owner: impl Into<String>) {
        self.purchasers.write().await.insert(owner.into());
    }
}

#[async_trait]
impl EntitlementSource for InMemoryEntitlements {
    async fn has_ever_purchased(&self, owner: &str) -> SourceResult<bool> {
        Ok(self.purchasers.read().await.contains(owner))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_memory_store_checks_owner() {
        let store = InMemoryProjectStore::new();
        let project = BookProject::new("Arden", 50, 5).with_owner("alice");
        let id = project.id;
        store.insert(project).await;

        assert!(store.get_project(id, "alice").await.is_ok());
        assert!(matches!(
            store.get_project(id, "bob").await,
            Err(SourceError::NotFound(_))
        ));
        assert!(matches!(
            store.get_project(Uuid::new_v4(), "alice").await,
            Err(SourceError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_local_store_roundtrip() {
        let dir = TempDir::new().unwrap();
        let store = LocalProjectStore::new(dir.path());
        let project = BookProject::new("Arden", 50, 5)
            .with_owner("alice")
            .with_chapter(1, "It began.");
        store.save_project(&project).await.unwrap();

        let loaded = store.get_project(project.id, "alice").await.unwrap();
        assert_eq!(loaded, project);
        assert!(store.get_project(project.id, "mallory").await.is_err());
    }

    #[tokio::test]
    async fn test_local_store_malformed_record() {
        let dir = TempDir::new().unwrap();
        let id = Uuid::new_v4();
        std::fs::create_dir_all(dir.path().join("projects")).unwrap();
        std::fs::write(dir.path().join("projects").join(format!("{}.json", id)), "{oops").unwrap();

        let store = LocalProjectStore::new(dir.path());
        assert!(matches!(
            store.get_project(id, "alice").await,
            Err(SourceError::Malformed(_))
        ));
    }

    #[test]
    fn test_load_project_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("book.json");
        let project = BookProject::new("Arden", 10, 2);
        std::fs::write(&path, serde_json::to_string(&project).unwrap()).unwrap();
        assert_eq!(load_project(&path).unwrap(), project);

        std::fs::write(&path, "not json").unwrap();
        assert!(matches!(
            load_project(&path),
            Err(BookcraftError::Source(SourceError::Malformed(_)))
        ));
        assert!(matches!(
            load_project(&dir.path().join("missing.json")),
            Err(BookcraftError::Io(_))
        ));
    }

    #[tokio::test]
    async fn test_local_entitlements() {
        let dir = TempDir::new().unwrap();
        let ledger = LocalEntitlements::new(dir.path());
        assert!(!ledger.has_ever_purchased("alice").await.unwrap());

        std::fs::write(dir.path().join("purchases.json"), r#"["alice"]"#).unwrap();
        assert!(ledger.has_ever_purchased("alice").await.unwrap());
        assert!(!ledger.has_ever_purchased("bob").await.unwrap());
    }

    #[tokio::test]
    async fn test_memory_entitlements() {
        let ledger = InMemoryEntitlements::new();
        ledger.record_purchase("alice").await;
        assert!(ledger.has_ever_purchased("alice").await.unwrap());
        assert!(!ledger.has_ever_purchased("bob").await.unwrap());
    }
}
