//! Application state

use std::path::PathBuf;
use std::sync::Arc;

use sd_core::credential::{CredentialStore, IntakeOrchestrator};
use sd_core::crypto::CredentialCodec;
use sd_core::remote::{HttpRemoteChecker, RemoteChecker};

use crate::auth::AuthStore;
use crate::config;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    auth_store: AuthStore,
    credential_store: CredentialStore,
    intake: IntakeOrchestrator,
}

impl AppState {
    /// Create a new AppState with the live HTTP remote checker
    pub async fn new(data_dir: PathBuf) -> sd_core::Result<Self> {
        Self::with_checker(data_dir, Arc::new(HttpRemoteChecker::new())).await
    }

    /// Create a new AppState with a caller-supplied remote checker.
    /// Tests pass stubs here to keep the pipeline off the network.
    pub async fn with_checker(
        data_dir: PathBuf,
        checker: Arc<dyn RemoteChecker>,
    ) -> sd_core::Result<Self> {
        let auth_store = AuthStore::new(data_dir.join("auth"))
            .await
            .map_err(|err| sd_core::Error::Storage(err.to_string()))?;
        let credential_store = CredentialStore::new(data_dir.join("credentials.json")).await?;
        let codec = CredentialCodec::new(&config::encryption_key());
        let intake = IntakeOrchestrator::new(checker, codec, credential_store.clone());

        Ok(Self {
            inner: Arc::new(AppStateInner {
                auth_store,
                credential_store,
                intake,
            }),
        })
    }

    pub fn auth_store(&self) -> &AuthStore {
        &self.inner.auth_store
    }

    pub fn credential_store(&self) -> &CredentialStore {
        &self.inner.credential_store
    }

    pub fn intake(&self) -> &IntakeOrchestrator {
        &self.inner.intake
    }
}
