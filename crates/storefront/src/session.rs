//! Admin credential session.
//!
//! Holds the bearer token returned by `/auth/login` and the admin profile
//! that came with it. Both are persisted in the key-value store so a
//! restarted CLI stays logged in until the backend answers 401.

use std::sync::Arc;

use secrecy::{ExposeSecret, SecretString};
use tracing::{debug, warn};

use crate::api::AdminUser;
use crate::storage::{self, KeyValueStore, StorageError, keys};

/// Stored admin credentials.
#[derive(Clone)]
pub struct CredentialSession {
    store: Arc<dyn KeyValueStore>,
}

impl CredentialSession {
    /// Create a session over `store`.
    #[must_use]
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    /// Bearer token, if one is stored.
    ///
    /// An unreadable token is treated as absent.
    #[must_use]
    pub fn token(&self) -> Option<SecretString> {
        match storage::get_json::<String>(self.store.as_ref(), keys::AUTH_TOKEN) {
            Ok(Some(token)) if !token.is_empty() => Some(SecretString::from(token)),
            Ok(_) => None,
            Err(e) => {
                warn!(error = %e, "Stored auth token unreadable");
                None
            }
        }
    }

    /// Cached admin profile from the last login.
    ///
    /// Malformed JSON is treated as absent.
    #[must_use]
    pub fn admin_user(&self) -> Option<AdminUser> {
        match storage::get_json(self.store.as_ref(), keys::ADMIN_USER) {
            Ok(user) => user,
            Err(e) => {
                warn!(error = %e, "Stored admin user unreadable");
                None
            }
        }
    }

    /// Whether a bearer token is stored.
    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.token().is_some()
    }

    /// Persist the token and profile from a successful login.
    ///
    /// # Errors
    ///
    /// Returns an error if the store rejects either write.
    pub fn save(&self, token: &SecretString, user: &AdminUser) -> Result<(), StorageError> {
        storage::set_json(self.store.as_ref(), keys::AUTH_TOKEN, token.expose_secret())?;
        storage::set_json(self.store.as_ref(), keys::ADMIN_USER, user)?;
        debug!(username = %user.username, "Saved admin session");
        Ok(())
    }

    /// Replace the cached profile, keeping the token.
    ///
    /// # Errors
    ///
    /// Returns an error if the store rejects the write.
    pub fn update_user(&self, user: &AdminUser) -> Result<(), StorageError> {
        storage::set_json(self.store.as_ref(), keys::ADMIN_USER, user)
    }

    /// Forget the token and profile.
    ///
    /// Both keys are attempted even if the first removal fails.
    ///
    /// # Errors
    ///
    /// Returns the first storage error encountered.
    pub fn clear(&self) -> Result<(), StorageError> {
        let token = self.store.remove(keys::AUTH_TOKEN);
        let user = self.store.remove(keys::ADMIN_USER);
        debug!("Cleared admin session");
        token.and(user)
    }
}

impl std::fmt::Debug for CredentialSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CredentialSession")
            .field("authenticated", &self.is_authenticated())
            .field("token", &"[REDACTED]")
            .finish()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use airshop_core::{AdminRole, AdminUserId};

    use super::*;
    use crate::storage::MemoryStore;

    fn admin() -> AdminUser {
        AdminUser {
            id: AdminUserId::new(1),
            username: "admin".to_string(),
            email: Some("admin@airshop.ru".to_string()),
            role: AdminRole::SuperAdmin,
            is_active: true,
            created_at: None,
            last_login: None,
        }
    }

    #[test]
    fn test_empty_session() {
        let session = CredentialSession::new(Arc::new(MemoryStore::new()));
        assert!(!session.is_authenticated());
        assert!(session.token().is_none());
        assert!(session.admin_user().is_none());
    }

    #[test]
    fn test_save_and_clear() {
        let store = Arc::new(MemoryStore::new());
        let session = CredentialSession::new(store.clone());

        session
            .save(&SecretString::from("jwt.abc.def"), &admin())
            .unwrap();
        assert!(session.is_authenticated());
        assert_eq!(session.token().unwrap().expose_secret(), "jwt.abc.def");
        assert_eq!(session.admin_user().unwrap().username, "admin");
        assert_eq!(
            store.get(keys::AUTH_TOKEN).unwrap().as_deref(),
            Some("\"jwt.abc.def\"")
        );

        session.clear().unwrap();
        assert!(!session.is_authenticated());
        assert!(session.admin_user().is_none());
        assert!(store.is_empty());
    }

    #[test]
    fn test_malformed_user_is_absent() {
        let store = Arc::new(MemoryStore::new());
        store.set(keys::ADMIN_USER, "{broken").unwrap();
        let session = CredentialSession::new(store);
        assert!(session.admin_user().is_none());
    }

    #[test]
    fn test_debug_redacts_token() {
        let session = CredentialSession::new(Arc::new(MemoryStore::new()));
        session
            .save(&SecretString::from("super-secret-token"), &admin())
            .unwrap();
        let debug = format!("{session:?}");
        assert!(!debug.contains("super-secret-token"));
        assert!(debug.contains("[REDACTED]"));
    }
}
