// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Credential storage.
//!
//! The store is the only shared mutable resource of the client core. Besides
//! plain get/set/clear it offers [`CredentialStore::replace_if_current`] and
//! [`CredentialStore::clear_if_current`], compare-and-swap operations keyed on
//! the session token, so a refresh that raced with a login never clobbers or
//! wipes newer credentials.

use fd_core::Credentials;
use parking_lot::Mutex;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use thiserror::Error;

/// Errors from credential store operations
#[derive(Debug, Clone, Error)]
pub enum CredentialStoreError {
    #[error("credential store io error: {0}")]
    Io(String),
    #[error("credential store corrupt: {0}")]
    Corrupt(String),
}

/// Storage for the current session's credentials
pub trait CredentialStore: Send + Sync + 'static {
    /// Current credentials, `None` when signed out.
    fn get(&self) -> Result<Option<Credentials>, CredentialStoreError>;

    fn set(&self, credentials: Credentials) -> Result<(), CredentialStoreError>;

    /// Remove stored credentials. Clearing an empty store is not an error.
    fn clear(&self) -> Result<(), CredentialStoreError>;

    /// Store `credentials` only if the current session token equals
    /// `expected_session_token`. Returns whether the swap happened.
    fn replace_if_current(
        &self,
        expected_session_token: &str,
        credentials: Credentials,
    ) -> Result<bool, CredentialStoreError>;

    /// Clear the store only if the current session token equals
    /// `expected_session_token`. Returns whether the store was cleared.
    fn clear_if_current(&self, expected_session_token: &str) -> Result<bool, CredentialStoreError>;
}

/// In-process credential store
#[derive(Clone, Default)]
pub struct MemoryCredentialStore {
    inner: Arc<Mutex<Option<Credentials>>>,
}

impl MemoryCredentialStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_credentials(credentials: Credentials) -> Self {
        Self { inner: Arc::new(Mutex::new(Some(credentials))) }
    }
}

impl CredentialStore for MemoryCredentialStore {
    fn get(&self) -> Result<Option<Credentials>, CredentialStoreError> {
        Ok(self.inner.lock().clone())
    }

    fn set(&self, credentials: Credentials) -> Result<(), CredentialStoreError> {
        *self.inner.lock() = Some(credentials);
        Ok(())
    }

    fn clear(&self) -> Result<(), CredentialStoreError> {
        *self.inner.lock() = None;
        Ok(())
    }

    fn replace_if_current(
        &self,
        expected_session_token: &str,
        credentials: Credentials,
    ) -> Result<bool, CredentialStoreError> {
        let mut current = self.inner.lock();
        match current.as_ref() {
            Some(existing) if existing.session_token == expected_session_token => {
                *current = Some(credentials);
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    fn clear_if_current(&self, expected_session_token: &str) -> Result<bool, CredentialStoreError> {
        let mut current = self.inner.lock();
        match current.as_ref() {
            Some(existing) if existing.session_token == expected_session_token => {
                *current = None;
                Ok(true)
            }
            _ => Ok(false),
        }
    }
}

/// Credentials persisted as JSON in the state directory.
///
/// Written through a temp file and rename so a crash never leaves a torn
/// file. On Unix the file is created with mode 0600. A missing file means
/// signed out.
pub struct FileCredentialStore {
    path: PathBuf,
    // Serializes read-compare-write within this process.
    lock: Mutex<()>,
}

impl FileCredentialStore {
    pub const FILE_NAME: &'static str = "credentials.json";

    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into(), lock: Mutex::new(()) }
    }

    /// Store at `<state_dir>/credentials.json`.
    pub fn in_dir(state_dir: &Path) -> Self {
        Self::new(state_dir.join(Self::FILE_NAME))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read(&self) -> Result<Option<Credentials>, CredentialStoreError> {
        let content = match std::fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(CredentialStoreError::Io(e.to_string())),
        };
        serde_json::from_str(&content)
            .map(Some)
            .map_err(|e| CredentialStoreError::Corrupt(e.to_string()))
    }

    fn write(&self, credentials: &Credentials) -> Result<(), CredentialStoreError> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| CredentialStoreError::Io(e.to_string()))?;
        }
        let json = serde_json::to_vec_pretty(credentials)
            .map_err(|e| CredentialStoreError::Corrupt(e.to_string()))?;
        let tmp = self.path.with_extension("json.tmp");
        write_private(&tmp, &json).map_err(|e| CredentialStoreError::Io(e.to_string()))?;
        std::fs::rename(&tmp, &self.path).map_err(|e| CredentialStoreError::Io(e.to_string()))
    }

    fn remove(&self) -> Result<(), CredentialStoreError> {
        match std::fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(CredentialStoreError::Io(e.to_string())),
        }
    }
}

#[cfg(unix)]
fn write_private(path: &Path, bytes: &[u8]) -> std::io::Result<()> {
    use std::io::Write;
    use std::os::unix::fs::OpenOptionsExt;

    let mut file =
        std::fs::OpenOptions::new().write(true).create(true).truncate(true).mode(0o600).open(path)?;
    file.write_all(bytes)?;
    file.sync_all()
}

#[cfg(not(unix))]
fn write_private(path: &Path, bytes: &[u8]) -> std::io::Result<()> {
    std::fs::write(path, bytes)
}

impl CredentialStore for FileCredentialStore {
    fn get(&self) -> Result<Option<Credentials>, CredentialStoreError> {
        let _guard = self.lock.lock();
        self.read()
    }

    fn set(&self, credentials: Credentials) -> Result<(), CredentialStoreError> {
        let _guard = self.lock.lock();
        self.write(&credentials)
    }

    fn clear(&self) -> Result<(), CredentialStoreError> {
        let _guard = self.lock.lock();
        self.remove()
    }

    fn replace_if_current(
        &self,
        expected_session_token: &str,
        credentials: Credentials,
    ) -> Result<bool, CredentialStoreError> {
        let _guard = self.lock.lock();
        match self.read()? {
            Some(existing) if existing.session_token == expected_session_token => {
                self.write(&credentials)?;
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    fn clear_if_current(&self, expected_session_token: &str) -> Result<bool, CredentialStoreError> {
        let _guard = self.lock.lock();
        match self.read()? {
            Some(existing) if existing.session_token == expected_session_token => {
                self.remove()?;
                Ok(true)
            }
            _ => Ok(false),
        }
    }
}

#[cfg(test)]
#[path = "credential_tests.rs"]
mod tests;
