use axum::{
    extract::{Path, State},
    routing::{delete, post},
    Json, Router,
};
use axum_extra::extract::cookie::CookieJar;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use sd_core::credential::{CredentialSubmission, StoredCredential};
use sd_core::Error;

use crate::{auth::resolve_identity, state::AppState};

use super::{bad_request, internal_error, not_found, unauthorized, RouteError};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct CreateCredentialResponse {
    success: bool,
    data: StoredCredential,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ValidateCredentialsRequest {
    #[serde(default)]
    platform: String,
    #[serde(default)]
    api_key: String,
    #[serde(default)]
    api_secret: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ValidateCredentialsResponse {
    success: bool,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct DeleteCredentialResponse {
    success: bool,
}

/// Map pipeline errors: user-fixable ones surface with their message,
/// everything else is logged and collapsed to a 500.
fn credential_error(err: Error) -> RouteError {
    if err.is_validation() {
        bad_request(err.to_string())
    } else {
        internal_error(err)
    }
}

async fn create_credential(
    State(state): State<AppState>,
    jar: CookieJar,
    Json(submission): Json<CredentialSubmission>,
) -> Result<Json<CreateCredentialResponse>, RouteError> {
    let identity = resolve_identity(&jar).map_err(unauthorized)?;

    let stored = state
        .intake()
        .submit(identity.organization_id, submission)
        .await
        .map_err(credential_error)?;

    Ok(Json(CreateCredentialResponse {
        success: true,
        data: stored,
    }))
}

async fn list_credentials(
    State(state): State<AppState>,
    jar: CookieJar,
) -> Result<Json<Vec<StoredCredential>>, RouteError> {
    let identity = resolve_identity(&jar).map_err(unauthorized)?;
    let credentials = state
        .credential_store()
        .list(identity.organization_id)
        .await;
    Ok(Json(credentials))
}

async fn delete_credential(
    State(state): State<AppState>,
    jar: CookieJar,
    Path(id): Path<Uuid>,
) -> Result<Json<DeleteCredentialResponse>, RouteError> {
    let identity = resolve_identity(&jar).map_err(unauthorized)?;

    state
        .credential_store()
        .delete(identity.organization_id, id)
        .await
        .map_err(|err| match err {
            Error::CredentialNotFound(_) => not_found("Credential not found"),
            other => internal_error(other),
        })?;

    Ok(Json(DeleteCredentialResponse { success: true }))
}

async fn validate_credentials(
    State(state): State<AppState>,
    jar: CookieJar,
    Json(req): Json<ValidateCredentialsRequest>,
) -> Result<Json<ValidateCredentialsResponse>, RouteError> {
    resolve_identity(&jar).map_err(unauthorized)?;

    let success = state
        .intake()
        .verify(&req.platform, &req.api_key, req.api_secret.as_deref())
        .await;

    Ok(Json(ValidateCredentialsResponse { success }))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/api/credentials",
            post(create_credential).get(list_credentials),
        )
        .route("/api/credentials/{id}", delete(delete_credential))
        // Older clients spell the collection differently.
        .route(
            "/api/api-credentials",
            post(create_credential).get(list_credentials),
        )
        .route("/api/validate-credentials", post(validate_credentials))
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use async_trait::async_trait;
    use axum::{
        body::{to_bytes, Body},
        http::{header, Request, StatusCode},
    };
    use sd_core::crypto::CredentialCodec;
    use sd_core::platform::Platform;
    use sd_core::remote::RemoteChecker;
    use serde_json::{json, Value};
    use tempfile::TempDir;
    use tower::ServiceExt;

    use crate::auth::issue_session_jwt;
    use crate::config;
    use crate::state::AppState;

    struct StubChecker {
        valid: bool,
    }

    #[async_trait]
    impl RemoteChecker for StubChecker {
        async fn check(&self, _platform: Platform, _key: &str, _secret: Option<&str>) -> bool {
            self.valid
        }
    }

    async fn build_state(valid: bool) -> (AppState, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let state = AppState::with_checker(
            temp_dir.path().to_path_buf(),
            Arc::new(StubChecker { valid }),
        )
        .await
        .unwrap();
        (state, temp_dir)
    }

    fn session_for(org_id: uuid::Uuid) -> String {
        let (token, _) =
            issue_session_jwt(uuid::Uuid::new_v4(), "user@example.com", org_id, "standard")
                .unwrap();
        format!("jwt={}", token)
    }

    fn json_request(method: &str, uri: &str, cookie: &str, body: Value) -> Request<Body> {
        Request::builder()
            .method(method)
            .uri(uri)
            .header("Content-Type", "application/json")
            .header(header::COOKIE, cookie)
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn zalando_body() -> Value {
        json!({
            "platform": "zalando",
            "apiKey": "z".repeat(32),
            "accountName": "Main",
            "extraFields": { "clientId": "abc123" }
        })
    }

    #[tokio::test]
    async fn create_stores_ciphertext_and_lists_it() {
        let (state, _tmp) = build_state(true).await;
        let app = super::router().with_state(state);
        let org = uuid::Uuid::new_v4();
        let cookie = session_for(org);

        let response = app
            .clone()
            .oneshot(json_request("POST", "/api/credentials", &cookie, zalando_body()))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let payload: Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(payload["success"], true);

        let stored_key = payload["data"]["apiKey"].as_str().unwrap();
        assert_ne!(stored_key, "z".repeat(32));
        let codec = CredentialCodec::new(&config::encryption_key());
        assert_eq!(codec.decrypt(stored_key).unwrap(), "z".repeat(32));

        let response = app
            .oneshot(
                Request::builder()
                    .method("GET")
                    .uri("/api/credentials")
                    .header(header::COOKIE, &cookie)
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let rows: Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(rows.as_array().unwrap().len(), 1);
        assert_eq!(rows[0]["platform"], "zalando");
    }

    #[tokio::test]
    async fn listing_is_tenant_isolated() {
        let (state, _tmp) = build_state(true).await;
        let app = super::router().with_state(state);
        let org_a = uuid::Uuid::new_v4();
        let org_b = uuid::Uuid::new_v4();

        let response = app
            .clone()
            .oneshot(json_request(
                "POST",
                "/api/credentials",
                &session_for(org_a),
                zalando_body(),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let response = app
            .oneshot(
                Request::builder()
                    .method("GET")
                    .uri("/api/credentials")
                    .header(header::COOKIE, session_for(org_b))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let rows: Value = serde_json::from_slice(&body).unwrap();
        assert!(rows.as_array().unwrap().is_empty());
    }

    #[tokio::test]
    async fn rejected_remote_check_returns_400_and_persists_nothing() {
        let (state, _tmp) = build_state(false).await;
        let store = state.credential_store().clone();
        let app = super::router().with_state(state);
        let org = uuid::Uuid::new_v4();
        let cookie = session_for(org);

        let body = json!({
            "platform": "bol.com",
            "apiKey": "a".repeat(32),
            "apiSecret": "b".repeat(32),
            "accountName": "Main"
        });
        let response = app
            .oneshot(json_request("POST", "/api/credentials", &cookie, body))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let payload: Value = serde_json::from_slice(&body).unwrap();
        assert!(payload["error"].as_str().unwrap().contains("rejected"));
        assert!(store.list(org).await.is_empty());
    }

    #[tokio::test]
    async fn shape_violation_reports_specific_error() {
        let (state, _tmp) = build_state(true).await;
        let app = super::router().with_state(state);
        let cookie = session_for(uuid::Uuid::new_v4());

        let mut body = zalando_body();
        body["extraFields"] = json!({});
        let response = app
            .oneshot(json_request("POST", "/api/credentials", &cookie, body))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let payload: Value = serde_json::from_slice(&body).unwrap();
        assert!(payload["error"].as_str().unwrap().contains("clientId"));
    }

    #[tokio::test]
    async fn delete_is_scoped_to_owner_org() {
        let (state, _tmp) = build_state(true).await;
        let app = super::router().with_state(state);
        let owner = uuid::Uuid::new_v4();
        let intruder = uuid::Uuid::new_v4();

        let response = app
            .clone()
            .oneshot(json_request(
                "POST",
                "/api/credentials",
                &session_for(owner),
                zalando_body(),
            ))
            .await
            .unwrap();
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let payload: Value = serde_json::from_slice(&body).unwrap();
        let id = payload["data"]["id"].as_str().unwrap().to_string();

        let response = app
            .clone()
            .oneshot(
                Request::builder()
                    .method("DELETE")
                    .uri(format!("/api/credentials/{}", id))
                    .header(header::COOKIE, session_for(intruder))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let response = app
            .oneshot(
                Request::builder()
                    .method("DELETE")
                    .uri(format!("/api/credentials/{}", id))
                    .header(header::COOKIE, session_for(owner))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn validate_credentials_reports_probe_outcome() {
        let (state, _tmp) = build_state(true).await;
        let app = super::router().with_state(state);
        let cookie = session_for(uuid::Uuid::new_v4());

        let response = app
            .clone()
            .oneshot(json_request(
                "POST",
                "/api/validate-credentials",
                &cookie,
                json!({ "platform": "zalando", "apiKey": "z".repeat(32) }),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let payload: Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(payload["success"], true);

        // Unknown platforms read as not-valid, never as an error.
        let response = app
            .clone()
            .oneshot(json_request(
                "POST",
                "/api/validate-credentials",
                &cookie,
                json!({ "platform": "etsy", "apiKey": "whatever" }),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let payload: Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(payload["success"], false);

        // A malformed key never reaches the remote probe.
        let response = app
            .oneshot(json_request(
                "POST",
                "/api/validate-credentials",
                &cookie,
                json!({ "platform": "zalando", "apiKey": "way-too-short" }),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let payload: Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(payload["success"], false);
    }

    #[tokio::test]
    async fn legacy_collection_path_is_accepted() {
        let (state, _tmp) = build_state(true).await;
        let app = super::router().with_state(state);
        let cookie = session_for(uuid::Uuid::new_v4());

        let response = app
            .oneshot(json_request(
                "POST",
                "/api/api-credentials",
                &cookie,
                zalando_body(),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn missing_cookie_is_401() {
        let (state, _tmp) = build_state(true).await;
        let app = super::router().with_state(state);

        let response = app
            .oneshot(
                Request::builder()
                    .method("GET")
                    .uri("/api/credentials")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }
}
