use axum::{
    extract::{Path, State},
    routing::{delete, get, post},
    Json, Router,
};
use axum_extra::extract::cookie::CookieJar;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    auth::{resolve_identity, AuthError, UserRecord, UserRole, UserSummary},
    state::AppState,
};

use super::{
    bad_request, conflict, forbidden, internal_error, not_found, unauthorized, RouteError,
};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct InviteUserRequest {
    #[serde(default)]
    email: Option<String>,
    #[serde(default)]
    role: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct InviteUserResponse {
    user: UserSummary,
    /// One-time password for the invitee; only the bcrypt hash is kept.
    temporary_password: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ChangePasswordRequest {
    #[serde(default)]
    current_password: Option<String>,
    #[serde(default)]
    new_password: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SuccessResponse {
    success: bool,
}

fn auth_error(err: AuthError) -> RouteError {
    match err {
        AuthError::InvalidInput(msg) => bad_request(msg),
        AuthError::Unauthorized(msg) => unauthorized(msg),
        AuthError::Forbidden(msg) => forbidden(msg),
        AuthError::NotFound(msg) => not_found(msg),
        AuthError::Conflict(msg) => conflict(msg),
        other @ AuthError::Storage(_) => internal_error(other),
    }
}

fn require_admin(role: &str) -> Result<(), RouteError> {
    let role: UserRole = role.parse().map_err(auth_error)?;
    if !role.can_manage_users() {
        return Err(forbidden("Only admins can manage users"));
    }
    Ok(())
}

async fn list_users(
    State(state): State<AppState>,
    jar: CookieJar,
) -> Result<Json<Vec<UserSummary>>, RouteError> {
    let identity = resolve_identity(&jar).map_err(unauthorized)?;
    let users = state.auth_store().list_users(identity.organization_id).await;
    Ok(Json(users))
}

/// Re-resolve the session user against the store, so a stale token
/// for a deleted account reads as gone rather than as a live user.
async fn current_user(
    State(state): State<AppState>,
    jar: CookieJar,
) -> Result<Json<UserRecord>, RouteError> {
    let identity = resolve_identity(&jar).map_err(unauthorized)?;
    let user = state
        .auth_store()
        .get_user(identity.organization_id, identity.id)
        .await
        .map_err(auth_error)?;
    Ok(Json(user))
}

async fn invite_user(
    State(state): State<AppState>,
    jar: CookieJar,
    Json(req): Json<InviteUserRequest>,
) -> Result<Json<InviteUserResponse>, RouteError> {
    let identity = resolve_identity(&jar).map_err(unauthorized)?;
    require_admin(&identity.role)?;

    let Some(email) = req.email else {
        return Err(bad_request("email is required"));
    };
    let role = match req.role.as_deref() {
        Some(raw) => raw.parse::<UserRole>().map_err(auth_error)?,
        None => UserRole::Standard,
    };

    // The invitee changes this on first login; we never store it.
    let temporary_password = Uuid::new_v4().simple().to_string();
    let user = state
        .auth_store()
        .create_user(identity.organization_id, &email, &temporary_password, role)
        .await
        .map_err(auth_error)?;
    Ok(Json(InviteUserResponse {
        user,
        temporary_password,
    }))
}

async fn delete_user(
    State(state): State<AppState>,
    jar: CookieJar,
    Path(user_id): Path<Uuid>,
) -> Result<Json<SuccessResponse>, RouteError> {
    let identity = resolve_identity(&jar).map_err(unauthorized)?;
    require_admin(&identity.role)?;
    if user_id == identity.id {
        return Err(forbidden("Cannot delete your own account"));
    }

    state
        .auth_store()
        .delete_user(identity.organization_id, user_id)
        .await
        .map_err(auth_error)?;
    Ok(Json(SuccessResponse { success: true }))
}

async fn change_password(
    State(state): State<AppState>,
    jar: CookieJar,
    Json(req): Json<ChangePasswordRequest>,
) -> Result<Json<SuccessResponse>, RouteError> {
    let identity = resolve_identity(&jar).map_err(unauthorized)?;

    let (Some(current), Some(new)) = (req.current_password, req.new_password) else {
        return Err(bad_request("currentPassword and newPassword are required"));
    };

    state
        .auth_store()
        .change_password(identity.organization_id, identity.id, &current, &new)
        .await
        .map_err(auth_error)?;
    Ok(Json(SuccessResponse { success: true }))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/users", get(list_users).post(invite_user))
        .route("/api/users/me", get(current_user))
        .route("/api/users/{id}", delete(delete_user))
        .route("/api/users/password", post(change_password))
}
