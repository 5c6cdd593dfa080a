//! Credential intake pipeline
//!
//! Composes shape validation, the remote authentication probe, the
//! encryption codec and the store gateway into one strictly
//! sequential flow per submission:
//!
//! `Idle -> Validating -> RemoteChecking -> Encrypting -> Persisting -> Done`
//!
//! Any stage can end in `Failed(reason)`. Nothing is retried; a failed
//! submission starts over from `Idle` when the caller resubmits.

use std::sync::Arc;

use tracing::{debug, warn};
use uuid::Uuid;

use crate::crypto::CredentialCodec;
use crate::error::Error;
use crate::remote::RemoteChecker;
use crate::Result;

use super::model::{CredentialSubmission, NewCredential, StoredCredential};
use super::store::CredentialStore;
use super::validator;

/// Pipeline stage, logged on every transition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IntakeState {
    Idle,
    Validating,
    RemoteChecking,
    Encrypting,
    Persisting,
    Done,
    Failed(String),
}

/// Drives one submission through the intake states.
#[derive(Clone)]
pub struct IntakeOrchestrator {
    checker: Arc<dyn RemoteChecker>,
    codec: CredentialCodec,
    store: CredentialStore,
}

impl IntakeOrchestrator {
    pub fn new(
        checker: Arc<dyn RemoteChecker>,
        codec: CredentialCodec,
        store: CredentialStore,
    ) -> Self {
        Self {
            checker,
            codec,
            store,
        }
    }

    /// Run a submission end to end for `organization_id`. On success
    /// the returned row carries ciphertext in its key/secret fields.
    pub async fn submit(
        &self,
        organization_id: Uuid,
        submission: CredentialSubmission,
    ) -> Result<StoredCredential> {
        let result = self.run(organization_id, submission).await;
        match &result {
            Ok(credential) => {
                debug!(state = ?IntakeState::Done, credential_id = %credential.id, "credential intake finished");
            }
            Err(err) => {
                warn!(state = ?IntakeState::Failed(err.to_string()), "credential intake failed");
            }
        }
        result
    }

    /// Shape-check the key and secret, then probe the platform,
    /// without persisting anything. Backs the validate-credentials
    /// endpoint; an unknown platform or malformed key reads as
    /// not-valid before any network round trip.
    pub async fn verify(&self, platform: &str, api_key: &str, api_secret: Option<&str>) -> bool {
        let Ok(platform) = validator::validate_key_shape(platform, api_key, api_secret) else {
            return false;
        };
        self.checker.check(platform, api_key, api_secret).await
    }

    async fn run(
        &self,
        organization_id: Uuid,
        submission: CredentialSubmission,
    ) -> Result<StoredCredential> {
        self.transition(IntakeState::Validating);
        let platform = validator::validate_fields(
            &submission.platform,
            &submission.api_key,
            submission.api_secret.as_deref(),
            &submission.extra_fields,
        )?;

        self.transition(IntakeState::RemoteChecking);
        let authenticated = self
            .checker
            .check(
                platform,
                &submission.api_key,
                submission.api_secret.as_deref(),
            )
            .await;
        if !authenticated {
            return Err(Error::CredentialRejected);
        }

        self.transition(IntakeState::Encrypting);
        let api_key = self.codec.encrypt(&submission.api_key)?;
        let api_secret = submission
            .api_secret
            .as_deref()
            .map(|secret| self.codec.encrypt(secret))
            .transpose()?;

        self.transition(IntakeState::Persisting);
        self.store
            .create(
                organization_id,
                NewCredential {
                    platform,
                    account_name: submission.account_name,
                    api_key,
                    api_secret,
                    extra_fields: submission.extra_fields,
                },
            )
            .await
    }

    fn transition(&self, state: IntakeState) {
        debug!(state = ?state, "credential intake transition");
    }
}
