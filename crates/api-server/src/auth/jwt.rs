use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::config;

/// Sessions expire 24 hours after issuance; there is no server-side
/// revocation list, tokens stay valid until natural expiry.
pub const SESSION_TTL_HOURS: i64 = 24;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionClaims {
    pub id: Uuid,
    pub email: String,
    pub organization_id: Uuid,
    pub role: String,
    pub exp: usize,
}

fn session_validation() -> Validation {
    let mut validation = Validation::default();
    validation.validate_exp = true;
    validation
}

pub fn issue_session_jwt(
    user_id: Uuid,
    email: &str,
    organization_id: Uuid,
    role: &str,
) -> Result<(String, usize), String> {
    let exp = (Utc::now() + Duration::hours(SESSION_TTL_HOURS)).timestamp() as usize;
    let claims = SessionClaims {
        id: user_id,
        email: email.to_string(),
        organization_id,
        role: role.to_string(),
        exp,
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(config::jwt_secret().as_bytes()),
    )
    .map(|token| (token, exp))
    .map_err(|err| format!("Failed to sign session JWT: {}", err))
}

pub fn verify_session_jwt(token: &str) -> Result<SessionClaims, String> {
    decode::<SessionClaims>(
        token,
        &DecodingKey::from_secret(config::jwt_secret().as_bytes()),
        &session_validation(),
    )
    .map(|decoded| decoded.claims)
    .map_err(|err| format!("Invalid session JWT: {}", err))
}
