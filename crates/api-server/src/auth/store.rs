use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::sync::Arc;

use bcrypt::{hash, verify, DEFAULT_COST};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::sync::RwLock;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UserRole {
    Admin,
    Standard,
}

impl UserRole {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::Standard => "standard",
        }
    }

    pub fn can_manage_users(self) -> bool {
        matches!(self, Self::Admin)
    }
}

impl FromStr for UserRole {
    type Err = AuthError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_lowercase().as_str() {
            "admin" => Ok(Self::Admin),
            "standard" => Ok(Self::Standard),
            _ => Err(AuthError::InvalidInput(format!(
                "Unsupported role '{}'",
                value
            ))),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrganizationRecord {
    pub id: Uuid,
    pub domain: String,
    pub name: String,
    pub created_at: DateTime<Utc>,
}

/// An authenticated user, as returned by login. Never carries the
/// password hash.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserRecord {
    pub id: Uuid,
    pub organization_id: Uuid,
    pub email: String,
    pub role: UserRole,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserSummary {
    pub id: Uuid,
    pub email: String,
    pub role: UserRole,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("unauthorized: {0}")]
    Unauthorized(String),
    #[error("forbidden: {0}")]
    Forbidden(String),
    #[error("not found: {0}")]
    NotFound(String),
    #[error("conflict: {0}")]
    Conflict(String),
    #[error("storage error: {0}")]
    Storage(String),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct Organization {
    id: Uuid,
    domain: String,
    name: String,
    created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct User {
    id: Uuid,
    organization_id: Uuid,
    email: String,
    password_hash: String,
    role: UserRole,
    created_at: DateTime<Utc>,
}

#[derive(Debug, Default)]
struct AuthState {
    organizations: HashMap<Uuid, Organization>,
    users: HashMap<Uuid, User>,
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct StoredAuthState {
    organizations: Vec<Organization>,
    users: Vec<User>,
}

impl From<StoredAuthState> for AuthState {
    fn from(value: StoredAuthState) -> Self {
        Self {
            organizations: value
                .organizations
                .into_iter()
                .map(|item| (item.id, item))
                .collect(),
            users: value
                .users
                .into_iter()
                .map(|item| (item.id, item))
                .collect(),
        }
    }
}

impl From<&AuthState> for StoredAuthState {
    fn from(value: &AuthState) -> Self {
        Self {
            organizations: value.organizations.values().cloned().collect(),
            users: value.users.values().cloned().collect(),
        }
    }
}

/// File-backed store for organizations and their users.
///
/// Organizations are a tenant boundary: the domain is unique and
/// immutable once created, and every user belongs to exactly one.
#[derive(Clone)]
pub struct AuthStore {
    state: Arc<RwLock<AuthState>>,
    file_path: PathBuf,
}

impl AuthStore {
    pub async fn new(base_dir: PathBuf) -> Result<Self, AuthError> {
        tokio::fs::create_dir_all(&base_dir).await.map_err(|err| {
            AuthError::Storage(format!("Failed to create auth directory: {}", err))
        })?;

        let file_path = base_dir.join("auth.json");
        let state = load_state(&file_path).await?;

        Ok(Self {
            state: Arc::new(RwLock::new(state)),
            file_path,
        })
    }

    /// Find the organization for `domain`, creating it if absent.
    /// Provisioning proper lives outside this service; this covers
    /// seeding and tests.
    pub async fn ensure_organization(
        &self,
        domain: &str,
        name: &str,
    ) -> Result<OrganizationRecord, AuthError> {
        let domain = normalize_domain(domain)?;
        let name = name.trim();
        if name.is_empty() {
            return Err(AuthError::InvalidInput(
                "Organization name cannot be empty".to_string(),
            ));
        }

        let mut state = self.state.write().await;
        if let Some(existing) = state
            .organizations
            .values()
            .find(|org| org.domain == domain)
        {
            return Ok(organization_to_record(existing));
        }

        let organization = Organization {
            id: Uuid::new_v4(),
            domain,
            name: name.to_string(),
            created_at: Utc::now(),
        };
        state
            .organizations
            .insert(organization.id, organization.clone());
        persist_state(&self.file_path, &state).await?;
        Ok(organization_to_record(&organization))
    }

    /// Create a user inside an organization. Email is unique within
    /// the organization, not globally.
    pub async fn create_user(
        &self,
        organization_id: Uuid,
        email: &str,
        password: &str,
        role: UserRole,
    ) -> Result<UserSummary, AuthError> {
        let email = normalize_email(email)?;
        validate_password(password)?;

        let mut state = self.state.write().await;
        if !state.organizations.contains_key(&organization_id) {
            return Err(AuthError::NotFound("Organization not found".to_string()));
        }
        if state
            .users
            .values()
            .any(|user| user.organization_id == organization_id && user.email == email)
        {
            return Err(AuthError::Conflict(format!(
                "User '{}' already exists",
                email
            )));
        }

        let user = User {
            id: Uuid::new_v4(),
            organization_id,
            email,
            password_hash: hash_password(password)?,
            role,
            created_at: Utc::now(),
        };
        state.users.insert(user.id, user.clone());
        persist_state(&self.file_path, &state).await?;
        Ok(user_to_summary(&user))
    }

    /// Authenticate a login against the organization owning `domain`.
    /// Unknown domain, unknown email and wrong password all collapse
    /// into the same error so nothing can be probed.
    pub async fn login(
        &self,
        domain: &str,
        email: &str,
        password: &str,
    ) -> Result<UserRecord, AuthError> {
        let domain = normalize_domain(domain)?;
        let email = normalize_email(email)?;
        let invalid = || AuthError::Unauthorized("Invalid credentials".to_string());

        let state = self.state.read().await;
        let organization = state
            .organizations
            .values()
            .find(|org| org.domain == domain)
            .ok_or_else(invalid)?;
        let user = state
            .users
            .values()
            .find(|user| user.organization_id == organization.id && user.email == email)
            .ok_or_else(invalid)?;

        if !verify_password(&user.password_hash, password) {
            return Err(invalid());
        }

        Ok(user_to_record(user))
    }

    pub async fn get_user(
        &self,
        organization_id: Uuid,
        user_id: Uuid,
    ) -> Result<UserRecord, AuthError> {
        let state = self.state.read().await;
        state
            .users
            .get(&user_id)
            .filter(|user| user.organization_id == organization_id)
            .map(user_to_record)
            .ok_or_else(|| AuthError::NotFound("User not found".to_string()))
    }

    /// List users of one organization, sorted by email.
    pub async fn list_users(&self, organization_id: Uuid) -> Vec<UserSummary> {
        let state = self.state.read().await;
        let mut users: Vec<UserSummary> = state
            .users
            .values()
            .filter(|user| user.organization_id == organization_id)
            .map(user_to_summary)
            .collect();
        users.sort_by(|left, right| left.email.cmp(&right.email));
        users
    }

    /// Delete a user owned by `organization_id`. A foreign or unknown
    /// id reads as not found.
    pub async fn delete_user(
        &self,
        organization_id: Uuid,
        user_id: Uuid,
    ) -> Result<UserSummary, AuthError> {
        let mut state = self.state.write().await;
        let owned = state
            .users
            .get(&user_id)
            .map(|user| user.organization_id == organization_id)
            .unwrap_or(false);
        if !owned {
            return Err(AuthError::NotFound("User not found".to_string()));
        }

        let removed = state
            .users
            .remove(&user_id)
            .ok_or_else(|| AuthError::NotFound("User not found".to_string()))?;
        persist_state(&self.file_path, &state).await?;
        Ok(user_to_summary(&removed))
    }

    /// Change a user's password after verifying the current one.
    pub async fn change_password(
        &self,
        organization_id: Uuid,
        user_id: Uuid,
        current_password: &str,
        new_password: &str,
    ) -> Result<(), AuthError> {
        validate_password(new_password)?;

        let mut state = self.state.write().await;
        let user = state
            .users
            .get_mut(&user_id)
            .filter(|user| user.organization_id == organization_id)
            .ok_or_else(|| AuthError::NotFound("User not found".to_string()))?;

        if !verify_password(&user.password_hash, current_password) {
            return Err(AuthError::Unauthorized(
                "Current password is incorrect".to_string(),
            ));
        }

        user.password_hash = hash_password(new_password)?;
        persist_state(&self.file_path, &state).await?;
        Ok(())
    }
}

fn organization_to_record(organization: &Organization) -> OrganizationRecord {
    OrganizationRecord {
        id: organization.id,
        domain: organization.domain.clone(),
        name: organization.name.clone(),
        created_at: organization.created_at,
    }
}

fn user_to_record(user: &User) -> UserRecord {
    UserRecord {
        id: user.id,
        organization_id: user.organization_id,
        email: user.email.clone(),
        role: user.role,
    }
}

fn user_to_summary(user: &User) -> UserSummary {
    UserSummary {
        id: user.id,
        email: user.email.clone(),
        role: user.role,
        created_at: user.created_at,
    }
}

async fn load_state(path: &Path) -> Result<AuthState, AuthError> {
    if !path.exists() {
        return Ok(AuthState::default());
    }
    let content = tokio::fs::read_to_string(path)
        .await
        .map_err(|err| AuthError::Storage(format!("Failed to read auth state: {}", err)))?;
    if content.trim().is_empty() {
        return Ok(AuthState::default());
    }
    let stored: StoredAuthState = serde_json::from_str(&content)
        .map_err(|err| AuthError::Storage(format!("Failed to parse auth state: {}", err)))?;
    Ok(stored.into())
}

async fn persist_state(path: &Path, state: &AuthState) -> Result<(), AuthError> {
    let content = serde_json::to_string_pretty(&StoredAuthState::from(state))
        .map_err(|err| AuthError::Storage(format!("Failed to serialize auth state: {}", err)))?;
    if let Some(parent) = path.parent() {
        tokio::fs::create_dir_all(parent).await.map_err(|err| {
            AuthError::Storage(format!("Failed to create auth parent dir: {}", err))
        })?;
    }
    tokio::fs::write(path, content)
        .await
        .map_err(|err| AuthError::Storage(format!("Failed to write auth state: {}", err)))?;
    Ok(())
}

fn normalize_domain(domain: &str) -> Result<String, AuthError> {
    let normalized = domain.trim().to_lowercase();
    if normalized.is_empty() {
        return Err(AuthError::InvalidInput("Invalid domain".to_string()));
    }
    Ok(normalized)
}

fn normalize_email(email: &str) -> Result<String, AuthError> {
    let normalized = email.trim().to_lowercase();
    if normalized.is_empty() || !normalized.contains('@') {
        return Err(AuthError::InvalidInput("Invalid email".to_string()));
    }
    Ok(normalized)
}

fn validate_password(password: &str) -> Result<(), AuthError> {
    if password.len() < 8 {
        return Err(AuthError::InvalidInput(
            "Password must be at least 8 characters".to_string(),
        ));
    }
    Ok(())
}

fn hash_password(password: &str) -> Result<String, AuthError> {
    hash(password, DEFAULT_COST)
        .map_err(|err| AuthError::Storage(format!("Failed to hash password: {}", err)))
}

fn verify_password(stored_hash: &str, password: &str) -> bool {
    verify(password, stored_hash).unwrap_or(false)
}
