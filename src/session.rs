// Session holder: owns the bearer token and mirrors it into durable storage
// so a previous login survives a restart.
//
// Storage problems are never fatal. A token that cannot be written simply
// does not survive the next restart; a token that cannot be read means the
// client starts anonymous.

use crate::error::Result;
use std::path::PathBuf;

/// Durable key-value slot holding the persisted token.
pub trait TokenStore {
    fn read(&self) -> Result<Option<String>>;
    fn write(&mut self, token: &str) -> Result<()>;
    fn remove(&mut self) -> Result<()>;
}

/// Token persisted as the whole contents of a single file.
#[derive(Debug, Clone)]
pub struct FileTokenStore {
    path: PathBuf,
}

impl FileTokenStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        FileTokenStore { path: path.into() }
    }
}

impl TokenStore for FileTokenStore {
    fn read(&self) -> Result<Option<String>> {
        match std::fs::read_to_string(&self.path) {
            Ok(data) => {
                let token = data.trim();
                Ok((!token.is_empty()).then(|| token.to_string()))
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn write(&mut self, token: &str) -> Result<()> {
        std::fs::write(&self.path, token)?;
        Ok(())
    }

    fn remove(&mut self) -> Result<()> {
        match std::fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

/// Process-local store, used by tests and when nothing should touch disk.
#[derive(Debug, Clone, Default)]
pub struct MemoryTokenStore {
    slot: Option<String>,
}

impl MemoryTokenStore {
    pub fn with_token(token: &str) -> Self {
        MemoryTokenStore {
            slot: Some(token.to_string()),
        }
    }
}

impl TokenStore for MemoryTokenStore {
    fn read(&self) -> Result<Option<String>> {
        Ok(self.slot.clone())
    }

    fn write(&mut self, token: &str) -> Result<()> {
        self.slot = Some(token.to_string());
        Ok(())
    }

    fn remove(&mut self) -> Result<()> {
        self.slot = None;
        Ok(())
    }
}

/// In-memory credential backed by a [`TokenStore`].
pub struct Session<S: TokenStore> {
    token: Option<String>,
    store: S,
}

impl<S: TokenStore> Session<S> {
    /// Create an empty session over `store`. Call [`Session::load`] to pick
    /// up a previously persisted token.
    pub fn new(store: S) -> Self {
        Session { token: None, store }
    }

    /// Restore the persisted credential, if any, and return it.
    pub fn load(&mut self) -> Option<&str> {
        self.token = match self.store.read() {
            Ok(token) => token,
            Err(e) => {
                tracing::warn!(error = %e, "could not read persisted token, starting anonymous");
                None
            }
        };
        tracing::debug!(present = self.token.is_some(), "session loaded");
        self.token.as_deref()
    }

    /// Hold `token` in memory and persist it.
    pub fn set(&mut self, token: &str) {
        self.token = Some(token.to_string());
        if let Err(e) = self.store.write(token) {
            tracing::warn!(error = %e, "could not persist token, it will not survive a restart");
        }
    }

    /// Forget the credential in memory and in storage.
    pub fn clear(&mut self) {
        self.token = None;
        if let Err(e) = self.store.remove() {
            tracing::warn!(error = %e, "could not remove persisted token");
        }
    }

    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    pub fn is_authenticated(&self) -> bool {
        self.token.is_some()
    }

    pub fn store(&self) -> &S {
        &self.store
    }
}
