//! Auth and multi-tenant session primitives.

mod identity;
mod jwt;
mod store;

pub use identity::{resolve_identity, session_cookie, SESSION_COOKIE};
pub use jwt::{issue_session_jwt, verify_session_jwt, SessionClaims, SESSION_TTL_HOURS};
pub use store::{AuthError, AuthStore, OrganizationRecord, UserRecord, UserRole, UserSummary};
