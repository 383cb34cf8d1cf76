//! Identity resolution for authenticated routes.
//!
//! Token issuance belongs to the registration/login service. This server only
//! needs to turn a bearer credential into an [`Identity`].

pub mod extractor;
pub mod tokens;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

pub use extractor::AuthUser;
pub use tokens::TokenDirectory;

/// The caller on whose behalf an operation runs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    pub id: Uuid,
    pub name: String,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AuthError {
    #[error("Access token required")]
    MissingCredential,

    #[error("Invalid authorization format. Expected 'Bearer <token>'")]
    MalformedCredential,

    #[error("Invalid or expired token")]
    UnknownCredential,
}

pub trait IdentityProvider: Send + Sync {
    fn authenticate(&self, credential: &str) -> Result<Identity, AuthError>;
}
