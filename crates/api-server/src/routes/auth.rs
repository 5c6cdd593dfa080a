use axum::{extract::State, routing::post, Json, Router};
use axum_extra::extract::cookie::CookieJar;
use serde::{Deserialize, Serialize};

use crate::{
    auth::{issue_session_jwt, session_cookie, AuthError},
    state::AppState,
};

use super::{bad_request, internal_error, unauthorized, RouteError};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct LoginRequest {
    #[serde(default)]
    domain: Option<String>,
    #[serde(default)]
    email: Option<String>,
    #[serde(default)]
    password: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct LoginResponse {
    success: bool,
    user: LoginUser,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct LoginUser {
    email: String,
    role: String,
}

async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    Json(req): Json<LoginRequest>,
) -> Result<(CookieJar, Json<LoginResponse>), RouteError> {
    let (Some(domain), Some(email), Some(password)) = (req.domain, req.email, req.password) else {
        return Err(bad_request("domain, email and password are required"));
    };

    // Blank fields are the caller's mistake; every authentication
    // failure collapses into one 401.
    let user = state
        .auth_store()
        .login(&domain, &email, &password)
        .await
        .map_err(|err| match err {
            AuthError::InvalidInput(msg) => bad_request(msg),
            _ => unauthorized("Invalid credentials"),
        })?;

    let (token, _exp) = issue_session_jwt(
        user.id,
        &user.email,
        user.organization_id,
        user.role.as_str(),
    )
    .map_err(internal_error)?;

    Ok((
        jar.add(session_cookie(token)),
        Json(LoginResponse {
            success: true,
            user: LoginUser {
                email: user.email,
                role: user.role.as_str().to_string(),
            },
        }),
    ))
}

pub fn router() -> Router<AppState> {
    Router::new().route("/api/auth/login", post(login))
}
