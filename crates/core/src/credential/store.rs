//! Credential persistent store
//!
//! File-based persistence for API credentials. Every operation is
//! scoped to the owning organization; the org id always comes from
//! the authenticated session, never from client input.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;

use tokio::sync::RwLock;
use uuid::Uuid;

use crate::error::Error;
use crate::Result;

use super::model::{NewCredential, StoredCredential};

/// Thread-safe credential store with file persistence
#[derive(Clone)]
pub struct CredentialStore {
    /// In-memory cache of credentials
    credentials: Arc<RwLock<HashMap<Uuid, StoredCredential>>>,
    /// Path to the credentials JSON file
    file_path: PathBuf,
}

impl CredentialStore {
    /// Create a new CredentialStore backed by the given file path
    pub async fn new(file_path: PathBuf) -> Result<Self> {
        let credentials = if file_path.exists() {
            let content = tokio::fs::read_to_string(&file_path)
                .await
                .map_err(|e| Error::Storage(format!("Failed to read credentials file: {}", e)))?;
            serde_json::from_str(&content)
                .map_err(|e| Error::Storage(format!("Failed to parse credentials file: {}", e)))?
        } else {
            HashMap::new()
        };

        Ok(Self {
            credentials: Arc::new(RwLock::new(credentials)),
            file_path,
        })
    }

    /// Insert a new credential under `organization_id` and return the
    /// persisted row with its generated id and timestamps.
    pub async fn create(
        &self,
        organization_id: Uuid,
        new: NewCredential,
    ) -> Result<StoredCredential> {
        let now = chrono::Utc::now();
        let credential = StoredCredential {
            id: Uuid::new_v4(),
            organization_id,
            platform: new.platform,
            account_name: new.account_name,
            api_key: new.api_key,
            api_secret: new.api_secret,
            extra_fields: new.extra_fields,
            created_at: now,
            updated_at: now,
        };

        let mut credentials = self.credentials.write().await;
        credentials.insert(credential.id, credential.clone());
        drop(credentials);

        self.persist().await?;
        Ok(credential)
    }

    /// List credentials owned by `organization_id`, oldest first
    pub async fn list(&self, organization_id: Uuid) -> Vec<StoredCredential> {
        let credentials = self.credentials.read().await;
        let mut rows: Vec<StoredCredential> = credentials
            .values()
            .filter(|credential| credential.organization_id == organization_id)
            .cloned()
            .collect();
        rows.sort_by_key(|credential| credential.created_at);
        rows
    }

    /// Delete a credential, but only if `organization_id` owns it.
    /// A foreign or unknown id reads as not found.
    pub async fn delete(&self, organization_id: Uuid, id: Uuid) -> Result<StoredCredential> {
        let mut credentials = self.credentials.write().await;
        let removed = match credentials.get(&id) {
            Some(credential) if credential.organization_id == organization_id => {
                credentials.remove(&id)
            }
            _ => None,
        };
        let removed = removed.ok_or_else(|| Error::CredentialNotFound(id.to_string()))?;
        drop(credentials);

        self.persist().await?;
        Ok(removed)
    }

    /// Persist the current state to file
    async fn persist(&self) -> Result<()> {
        let credentials = self.credentials.read().await;
        let content = serde_json::to_string_pretty(&*credentials)
            .map_err(|e| Error::Storage(format!("Failed to serialize credentials: {}", e)))?;

        // Ensure parent directory exists
        if let Some(parent) = self.file_path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| Error::Storage(format!("Failed to create directory: {}", e)))?;
        }

        tokio::fs::write(&self.file_path, content)
            .await
            .map_err(|e| Error::Storage(format!("Failed to write credentials file: {}", e)))?;

        Ok(())
    }
}
