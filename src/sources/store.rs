//! File-backed per-identity item store
//!
//! Layout: `{data_dir}/{identity}/calendar.json`, `emails.json` and
//! `token.json`. Documents are small JSON arrays rewritten wholesale on sync.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;
use tracing::{debug, warn};

use super::ItemProvider;
use crate::error::{DashboardError, Result};
use crate::items::{Item, RawItem};

/// One per-identity document
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Document {
    Calendar,
    Emails,
    Token,
}

impl Document {
    pub fn file_name(&self) -> &'static str {
        match self {
            Self::Calendar => "calendar.json",
            Self::Emails => "emails.json",
            Self::Token => "token.json",
        }
    }
}

/// Reject identity keys that could escape the data directory
pub fn validate_identity(identity: &str) -> Result<()> {
    let trimmed = identity.trim();
    if trimmed.is_empty() {
        return Err(DashboardError::MissingIdentity(
            "identity header is empty".to_string(),
        ));
    }
    if trimmed != identity
        || identity == "."
        || identity == ".."
        || identity.contains(['/', '\\', '\0'])
    {
        return Err(DashboardError::InvalidIdentity(format!(
            "'{}' cannot be used as a storage key",
            identity
        )));
    }
    Ok(())
}

#[derive(Debug, Clone)]
pub struct FileItemStore {
    root: PathBuf,
}

impl FileItemStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn identity_dir(&self, identity: &str) -> Result<PathBuf> {
        validate_identity(identity)?;
        Ok(self.root.join(identity))
    }

    fn document_path(&self, identity: &str, document: Document) -> Result<PathBuf> {
        Ok(self.identity_dir(identity)?.join(document.file_name()))
    }

    /// Decode a stored item array, skipping records that cannot be read.
    ///
    /// Missing or corrupt documents yield an empty list.
    async fn read_items(path: &Path) -> Vec<Item> {
        let bytes = match tokio::fs::read(path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Vec::new(),
            Err(e) => {
                warn!("Failed to read {}: {}", path.display(), e);
                return Vec::new();
            }
        };

        let records: Vec<Value> = match serde_json::from_slice(&bytes) {
            Ok(records) => records,
            Err(e) => {
                warn!("Ignoring unreadable document {}: {}", path.display(), e);
                return Vec::new();
            }
        };

        let total = records.len();
        let items: Vec<Item> = records
            .into_iter()
            .filter_map(|record| serde_json::from_value::<RawItem>(record).ok())
            .map(Item::from_raw)
            .collect();

        if items.len() < total {
            warn!(
                "Skipped {} malformed records in {}",
                total - items.len(),
                path.display()
            );
        }
        items
    }

    pub async fn load(&self, identity: &str, document: Document) -> Result<Vec<Item>> {
        let path = self.document_path(identity, document)?;
        Ok(Self::read_items(&path).await)
    }

    /// Replace a document with the given items
    pub async fn save(&self, identity: &str, document: Document, items: &[Item]) -> Result<()> {
        self.write_json(identity, document, items).await
    }

    async fn write_json<T: Serialize + ?Sized>(
        &self,
        identity: &str,
        document: Document,
        value: &T,
    ) -> Result<()> {
        let dir = self.identity_dir(identity)?;
        tokio::fs::create_dir_all(&dir).await?;

        let path = dir.join(document.file_name());
        let bytes = serde_json::to_vec_pretty(value)?;
        tokio::fs::write(&path, bytes).await?;

        debug!("Wrote {}", path.display());
        Ok(())
    }

    pub async fn exists(&self, identity: &str, document: Document) -> Result<bool> {
        let path = self.document_path(identity, document)?;
        Ok(tokio::fs::try_exists(&path).await.unwrap_or(false))
    }

    /// Delete a document; `Ok(false)` when it was not there
    pub async fn remove(&self, identity: &str, document: Document) -> Result<bool> {
        let path = self.document_path(identity, document)?;
        match tokio::fs::remove_file(&path).await {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e.into()),
        }
    }

    /// Modification time of the calendar document
    pub async fn last_sync(&self, identity: &str) -> Result<Option<DateTime<Utc>>> {
        let path = self.document_path(identity, Document::Calendar)?;
        let modified = tokio::fs::metadata(&path)
            .await
            .and_then(|meta| meta.modified())
            .ok()
            .map(DateTime::<Utc>::from);
        Ok(modified)
    }

    pub async fn load_token<T: DeserializeOwned>(&self, identity: &str) -> Result<Option<T>> {
        let path = self.document_path(identity, Document::Token)?;
        let bytes = match tokio::fs::read(&path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };

        match serde_json::from_slice(&bytes) {
            Ok(token) => Ok(Some(token)),
            Err(e) => {
                warn!("Ignoring unreadable token for {}: {}", identity, e);
                Ok(None)
            }
        }
    }

    pub async fn save_token<T: Serialize>(&self, identity: &str, token: &T) -> Result<()> {
        self.write_json(identity, Document::Token, token).await
    }
}

#[async_trait]
impl ItemProvider for FileItemStore {
    async fn list_items(&self, identity: &str) -> Result<Vec<Item>> {
        let mut items = self.load(identity, Document::Calendar).await?;
        items.extend(self.load(identity, Document::Emails).await?);
        Ok(items)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::items::{ItemKind, ItemMeta, ItemSource, ItemStatus};
    use tempfile::TempDir;

    fn email(id: &str) -> Item {
        Item {
            id: id.to_string(),
            source: ItemSource::Email,
            kind: ItemKind::Email,
            title: "Status".to_string(),
            content: "All green".to_string(),
            timestamp: None,
            deadline: None,
            participants: vec!["a@corp.com".to_string()],
            status: ItemStatus::Unread,
            meta: ItemMeta::default(),
        }
    }

    #[test]
    fn test_validate_identity() {
        assert!(validate_identity("user-123").is_ok());
        assert!(matches!(
            validate_identity(""),
            Err(DashboardError::MissingIdentity(_))
        ));
        for bad in ["..", ".", "a/b", "a\\b", " padded"] {
            assert!(
                matches!(validate_identity(bad), Err(DashboardError::InvalidIdentity(_))),
                "{} should be rejected",
                bad
            );
        }
    }

    #[tokio::test]
    async fn test_missing_documents_are_empty() {
        let dir = TempDir::new().unwrap();
        let store = FileItemStore::new(dir.path());
        assert!(store.list_items("nobody").await.unwrap().is_empty());
        assert!(!store.exists("nobody", Document::Calendar).await.unwrap());
        assert_eq!(store.last_sync("nobody").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_save_then_list() {
        let dir = TempDir::new().unwrap();
        let store = FileItemStore::new(dir.path());
        store
            .save("alice", Document::Emails, &[email("e1"), email("e2")])
            .await
            .unwrap();

        let items = store.list_items("alice").await.unwrap();
        assert_eq!(items, vec![email("e1"), email("e2")]);
        assert!(store.last_sync("alice").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_corrupt_document_degrades_to_empty() {
        let dir = TempDir::new().unwrap();
        let store = FileItemStore::new(dir.path());
        std::fs::create_dir_all(dir.path().join("bob")).unwrap();
        std::fs::write(dir.path().join("bob/calendar.json"), b"{not json").unwrap();
        std::fs::write(
            dir.path().join("bob/emails.json"),
            br#"[{"id": "ok", "source": "email"}, {"id": 42}]"#,
        )
        .unwrap();

        let items = store.list_items("bob").await.unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].id, "ok");
    }

    #[tokio::test]
    async fn test_remove_reports_presence() {
        let dir = TempDir::new().unwrap();
        let store = FileItemStore::new(dir.path());
        store.save("carol", Document::Calendar, &[]).await.unwrap();

        assert!(store.last_sync("carol").await.unwrap().is_some());
        assert!(store.remove("carol", Document::Calendar).await.unwrap());
        assert!(!store.remove("carol", Document::Calendar).await.unwrap());
    }

    #[tokio::test]
    async fn test_invalid_identity_never_touches_disk() {
        let dir = TempDir::new().unwrap();
        let store = FileItemStore::new(dir.path());
        assert!(store.list_items("../etc").await.is_err());
    }
}
