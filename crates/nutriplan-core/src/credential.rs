//! The API key gating the generation endpoint.
//!
//! At most one key is stored at a time, with no expiry. The store itself
//! accepts any string; callers run [`validate_credential_input`] first.

use std::sync::Arc;

use thiserror::Error;
use tracing::{info, warn};

use crate::store::{KeyValueStore, StoreError};

/// Store key holding the credential.
pub const CREDENTIAL_KEY: &str = "gemini_api_key";

/// Errors from [`validate_credential_input`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CredentialError {
    #[error("API key must not be empty")]
    Empty,
}

/// Trim user input and reject empty or whitespace-only keys.
pub fn validate_credential_input(input: &str) -> Result<&str, CredentialError> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(CredentialError::Empty);
    }
    Ok(trimmed)
}

/// Render a key for display: first and last four characters only.
pub fn mask_credential(key: &str) -> String {
    let chars: Vec<char> = key.chars().collect();
    if chars.len() <= 8 {
        return "*".repeat(chars.len());
    }
    let head: String = chars[..4].iter().collect();
    let tail: String = chars[chars.len() - 4..].iter().collect();
    format!("{head}...{tail}")
}

/// Credential lifecycle over a [`KeyValueStore`].
#[derive(Clone)]
pub struct CredentialStore {
    store: Arc<dyn KeyValueStore>,
}

impl CredentialStore {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    pub fn get(&self) -> Result<Option<String>, StoreError> {
        self.store.get(CREDENTIAL_KEY)
    }

    /// Replace the stored credential.
    pub fn set(&self, value: &str) -> Result<(), StoreError> {
        self.store.set(CREDENTIAL_KEY, value)?;
        info!("API key saved");
        Ok(())
    }

    pub fn clear(&self) -> Result<(), StoreError> {
        self.store.remove(CREDENTIAL_KEY)?;
        info!("API key cleared");
        Ok(())
    }

    /// Whether a non-empty credential is stored. A store read failure counts as absent.
    pub fn is_present(&self) -> bool {
        match self.get() {
            Ok(value) => value.is_some_and(|v| !v.is_empty()),
            Err(e) => {
                warn!(error = %e, "failed to read API key");
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{JsonFileStore, MemoryStore};

    #[test]
    fn lifecycle() {
        let creds = CredentialStore::new(Arc::new(MemoryStore::new()));
        assert!(!creds.is_present());
        assert_eq!(creds.get().unwrap(), None);

        creds.set("AIza-first").unwrap();
        creds.set("AIza-second").unwrap();
        assert!(creds.is_present());
        assert_eq!(creds.get().unwrap().as_deref(), Some("AIza-second"));

        creds.clear().unwrap();
        assert!(!creds.is_present());
        creds.clear().unwrap();
    }

    #[test]
    fn persists_across_handles() {
        let tmp = tempfile::TempDir::new().unwrap();
        CredentialStore::new(Arc::new(JsonFileStore::in_dir(tmp.path())))
            .set("AIza-durable")
            .unwrap();

        let reopened = CredentialStore::new(Arc::new(JsonFileStore::in_dir(tmp.path())));
        assert_eq!(reopened.get().unwrap().as_deref(), Some("AIza-durable"));
    }

    #[test]
    fn unreadable_store_counts_as_absent() {
        let tmp = tempfile::TempDir::new().unwrap();
        let store = JsonFileStore::in_dir(tmp.path());
        std::fs::write(store.path(), "{ broken").unwrap();
        let creds = CredentialStore::new(Arc::new(store));
        assert!(!creds.is_present());
        assert!(creds.get().is_err());
    }

    #[test]
    fn validate_input() {
        assert_eq!(validate_credential_input("  key-123 \n").unwrap(), "key-123");
        assert_eq!(
            validate_credential_input(" \t ").unwrap_err(),
            CredentialError::Empty
        );
        assert_eq!(validate_credential_input("").unwrap_err(), CredentialError::Empty);
    }

    #[test]
    fn mask() {
        assert_eq!(mask_credential("AIzaSyD-abcdefgh1234"), "AIza...1234");
        assert_eq!(mask_credential("short"), "*****");
    }
}
