//! Persistent storage for the vision service API key.
//!
//! The key lives in the system's secure credential store (Windows Credential Manager,
//! macOS Keychain, Secret Service on Linux) under service `diagram3d`, entry
//! `gemini_api_key`. It is never written to log output.

use std::sync::Mutex;

use keyring::Entry;
use thiserror::Error;
use tracing::{debug, warn};

pub const SERVICE_NAME: &str = "diagram3d";
pub const API_KEY_ENTRY: &str = "gemini_api_key";

#[derive(Debug, Error)]
pub enum CredentialError {
    #[error("API key cannot be empty")]
    Empty,

    #[error("Keyring error: {0}")]
    Keyring(#[from] keyring::Error),

    #[error("Credential store unavailable: {0}")]
    Unavailable(String),
}

/// Where the single secret string is kept
pub trait SecretBackend: Send + Sync {
    fn get(&self) -> Result<Option<String>, CredentialError>;
    fn set(&self, value: &str) -> Result<(), CredentialError>;
    fn delete(&self) -> Result<(), CredentialError>;
}

pub struct KeyringBackend {
    service: String,
    entry: String,
}

impl KeyringBackend {
    pub fn new(service: impl Into<String>, entry: impl Into<String>) -> Self {
        Self { service: service.into(), entry: entry.into() }
    }

    fn entry(&self) -> Result<Entry, CredentialError> {
        Ok(Entry::new(&self.service, &self.entry)?)
    }
}

impl SecretBackend for KeyringBackend {
    fn get(&self) -> Result<Option<String>, CredentialError> {
        match self.entry()?.get_password() {
            Ok(value) => Ok(Some(value)),
            Err(keyring::Error::NoEntry) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn set(&self, value: &str) -> Result<(), CredentialError> {
        Ok(self.entry()?.set_password(value)?)
    }

    fn delete(&self) -> Result<(), CredentialError> {
        match self.entry()?.delete_credential() {
            Ok(()) | Err(keyring::Error::NoEntry) => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

/// Process-local backend, used in tests and when no keyring is reachable
#[derive(Default)]
pub struct MemoryBackend {
    value: Mutex<Option<String>>,
}

impl SecretBackend for MemoryBackend {
    fn get(&self) -> Result<Option<String>, CredentialError> {
        let guard = self.value.lock().map_err(|e| CredentialError::Unavailable(e.to_string()))?;
        Ok((*guard).clone())
    }

    fn set(&self, value: &str) -> Result<(), CredentialError> {
        let mut guard = self.value.lock().map_err(|e| CredentialError::Unavailable(e.to_string()))?;
        *guard = Some(value.to_string());
        Ok(())
    }

    fn delete(&self) -> Result<(), CredentialError> {
        let mut guard = self.value.lock().map_err(|e| CredentialError::Unavailable(e.to_string()))?;
        *guard = None;
        Ok(())
    }
}

pub struct CredentialStore {
    backend: Box<dyn SecretBackend>,
    persistent: bool,
}

impl CredentialStore {
    /// Keyring-backed store under the default service name
    pub fn new() -> Self {
        Self::with_backend(Box::new(KeyringBackend::new(SERVICE_NAME, API_KEY_ENTRY)))
    }

    /// The system keyring when it answers, otherwise a session-only store
    pub fn system() -> Self {
        Self::with_fallback(Box::new(KeyringBackend::new(SERVICE_NAME, API_KEY_ENTRY)))
    }

    pub fn in_memory() -> Self {
        Self {
            backend: Box::new(MemoryBackend::default()),
            persistent: false,
        }
    }

    pub fn with_backend(backend: Box<dyn SecretBackend>) -> Self {
        Self { backend, persistent: true }
    }

    /// Uses `backend` if a read succeeds (an absent entry counts as success),
    /// else falls back to [`CredentialStore::in_memory`]
    pub fn with_fallback(backend: Box<dyn SecretBackend>) -> Self {
        match backend.get() {
            Ok(_) => Self::with_backend(backend),
            Err(e) => {
                warn!("Credential store unavailable, keeping the API key for this session only: {}", e);
                Self::in_memory()
            }
        }
    }

    /// False when saved keys will not survive a restart
    pub fn is_persistent(&self) -> bool {
        self.persistent
    }

    /// The saved key, if a non-empty one exists
    pub fn load_api_key(&self) -> Option<String> {
        match self.backend.get() {
            Ok(Some(key)) if !key.trim().is_empty() => {
                debug!("Loaded stored API key");
                Some(key)
            }
            Ok(_) => {
                debug!("No stored API key");
                None
            }
            Err(e) => {
                warn!("Could not read stored API key: {}", e);
                None
            }
        }
    }

    pub fn store_api_key(&self, key: &str) -> Result<(), CredentialError> {
        let key = key.trim();
        if key.is_empty() {
            return Err(CredentialError::Empty);
        }
        self.backend.set(key)?;
        debug!("Stored API key");
        Ok(())
    }

    pub fn delete_api_key(&self) -> Result<(), CredentialError> {
        self.backend.delete()?;
        debug!("Cleared stored API key");
        Ok(())
    }

    pub fn has_stored_api_key(&self) -> bool {
        self.load_api_key().is_some()
    }
}

impl Default for CredentialStore {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn saves_and_clears_key() {
        let store = CredentialStore::in_memory();
        assert!(!store.has_stored_api_key());

        store.store_api_key("  AIza-test  ").unwrap();
        assert_eq!(store.load_api_key().as_deref(), Some("AIza-test"));

        store.delete_api_key().unwrap();
        assert_eq!(store.load_api_key(), None);
    }

    #[test]
    fn blank_key_is_rejected() {
        let store = CredentialStore::in_memory();
        assert!(matches!(store.store_api_key("   "), Err(CredentialError::Empty)));
        assert!(!store.has_stored_api_key());
    }

    #[test]
    fn stored_blank_value_counts_as_unsaved() {
        let backend = MemoryBackend::default();
        backend.set("").unwrap();
        let store = CredentialStore::with_backend(Box::new(backend));
        assert!(!store.has_stored_api_key());
    }

    struct BrokenBackend;

    impl SecretBackend for BrokenBackend {
        fn get(&self) -> Result<Option<String>, CredentialError> {
            Err(CredentialError::Unavailable("no secret service".to_string()))
        }

        fn set(&self, _value: &str) -> Result<(), CredentialError> {
            Err(CredentialError::Unavailable("no secret service".to_string()))
        }

        fn delete(&self) -> Result<(), CredentialError> {
            Err(CredentialError::Unavailable("no secret service".to_string()))
        }
    }

    #[test]
    fn unreachable_backend_falls_back_to_memory() {
        let store = CredentialStore::with_fallback(Box::new(BrokenBackend));
        assert!(!store.is_persistent());

        store.store_api_key("AIza-test").unwrap();
        assert_eq!(store.load_api_key().as_deref(), Some("AIza-test"));
    }

    #[test]
    fn working_backend_is_kept() {
        let store = CredentialStore::with_fallback(Box::new(MemoryBackend::default()));
        assert!(store.is_persistent());
    }
}
