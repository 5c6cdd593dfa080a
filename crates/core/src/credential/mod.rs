//! Credential intake and persistence

pub mod intake;
pub mod model;
pub mod store;
pub mod validator;

pub use intake::{IntakeOrchestrator, IntakeState};
pub use model::{CredentialSubmission, NewCredential, StoredCredential};
pub use store::CredentialStore;
