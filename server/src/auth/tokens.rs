use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};

use super::{AuthError, Identity, IdentityProvider};

/// In-memory bearer token registry.
#[derive(Debug, Default)]
pub struct TokenDirectory {
    tokens: RwLock<HashMap<String, Identity>>,
}

impl TokenDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `token` for `identity`, replacing any previous holder.
    pub fn register(&self, token: impl Into<String>, identity: Identity) {
        self.tokens
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(token.into(), identity);
    }
}

impl IdentityProvider for TokenDirectory {
    fn authenticate(&self, credential: &str) -> Result<Identity, AuthError> {
        if credential.is_empty() {
            return Err(AuthError::MissingCredential);
        }
        self.tokens
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(credential)
            .cloned()
            .ok_or(AuthError::UnknownCredential)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn alice() -> Identity {
        Identity {
            id: Uuid::new_v4(),
            name: "Alice".to_string(),
        }
    }

    #[test]
    fn test_registered_token_authenticates() {
        let directory = TokenDirectory::new();
        let identity = alice();
        directory.register("demo", identity.clone());

        assert_eq!(directory.authenticate("demo"), Ok(identity));
        assert_eq!(
            directory.authenticate("demo-2"),
            Err(AuthError::UnknownCredential)
        );
    }

    #[test]
    fn test_reregistering_replaces_holder() {
        let directory = TokenDirectory::new();
        directory.register("demo", alice());
        let bob = Identity {
            id: Uuid::new_v4(),
            name: "Bob".to_string(),
        };
        directory.register("demo", bob.clone());

        assert_eq!(directory.authenticate("demo"), Ok(bob));
    }

    #[test]
    fn test_empty_credential_is_missing() {
        let directory = TokenDirectory::new();
        assert_eq!(directory.authenticate(""), Err(AuthError::MissingCredential));
    }
}
