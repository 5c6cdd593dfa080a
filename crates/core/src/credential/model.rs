//! Credential model definitions

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::platform::Platform;

/// A credential submission as received from the client, before any
/// validation or encryption has happened.
///
/// The platform arrives as a free-form string so that unknown
/// identifiers reach the validator and fail closed there, instead of
/// dying in deserialization.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CredentialSubmission {
    pub platform: String,
    pub api_key: String,
    #[serde(default)]
    pub api_secret: Option<String>,
    #[serde(default)]
    pub account_name: String,
    #[serde(default)]
    pub extra_fields: HashMap<String, String>,
}

/// Validated and encrypted payload handed to the store gateway.
/// `api_key` and `api_secret` hold ciphertext at this point.
#[derive(Debug, Clone)]
pub struct NewCredential {
    pub platform: Platform,
    pub account_name: String,
    pub api_key: String,
    pub api_secret: Option<String>,
    pub extra_fields: HashMap<String, String>,
}

/// A persisted credential row, scoped to one organization.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredCredential {
    pub id: Uuid,
    pub organization_id: Uuid,
    pub platform: Platform,
    pub account_name: String,
    pub api_key: String,
    pub api_secret: Option<String>,
    pub extra_fields: HashMap<String, String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn submission_defaults_optional_fields() {
        let submission: CredentialSubmission = serde_json::from_str(
            r#"{"platform":"zalando","apiKey":"abc","accountName":"Main"}"#,
        )
        .unwrap();
        assert_eq!(submission.platform, "zalando");
        assert!(submission.api_secret.is_none());
        assert!(submission.extra_fields.is_empty());
    }

    #[test]
    fn stored_credential_serializes_camel_case() {
        let now = Utc::now();
        let credential = StoredCredential {
            id: Uuid::new_v4(),
            organization_id: Uuid::new_v4(),
            platform: Platform::Bol,
            account_name: "Main".to_string(),
            api_key: "ciphertext".to_string(),
            api_secret: None,
            extra_fields: HashMap::new(),
            created_at: now,
            updated_at: now,
        };
        let json = serde_json::to_value(&credential).unwrap();
        assert_eq!(json["platform"], "bol.com");
        assert!(json.get("accountName").is_some());
        assert!(json.get("organizationId").is_some());
    }
}
