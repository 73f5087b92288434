//! Durable storage for the session token.
//!
//! The client persists exactly one value, under the key `token`: written
//! on login, read once at startup, removed on logout. [`TokenStore`] is
//! that slot; [`FileTokenStore`] keeps it on disk and
//! [`MemoryTokenStore`] keeps it in memory (tests, ephemeral clients).

use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use parley_protocol::Token;

use crate::SessionError;

/// Storage key (and file name) of the persisted token.
pub const TOKEN_KEY: &str = "token";

/// A single durable key-value slot holding the session token.
///
/// Synchronous on purpose: the slot is a few bytes and is touched at
/// most once per login/logout.
pub trait TokenStore: Send + Sync + 'static {
    /// Returns the stored token, or `None` if nothing is stored.
    fn load(&self) -> Result<Option<Token>, SessionError>;

    /// Stores `token`, replacing any previous value.
    fn save(&self, token: &Token) -> Result<(), SessionError>;

    /// Removes the stored token. Removing an empty slot is not an error.
    fn clear(&self) -> Result<(), SessionError>;
}

// ---------------------------------------------------------------------------
// FileTokenStore
// ---------------------------------------------------------------------------

/// Stores the token as a plain file named `token` inside a directory.
///
/// The token is written unencrypted, like a browser's local storage.
#[derive(Debug, Clone)]
pub struct FileTokenStore {
    path: PathBuf,
}

impl FileTokenStore {
    /// Stores the token in `dir/token`. The directory is created on the
    /// first save.
    pub fn in_dir(dir: impl AsRef<Path>) -> Self {
        Self {
            path: dir.as_ref().join(TOKEN_KEY),
        }
    }

    /// The platform data directory joined with `parley`, e.g.
    /// `~/.local/share/parley` on Linux. `None` when the platform has no
    /// data directory (some CI sandboxes).
    pub fn default_dir() -> Option<PathBuf> {
        dirs::data_dir().map(|d| d.join("parley"))
    }

    /// Path of the token file.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl TokenStore for FileTokenStore {
    fn load(&self) -> Result<Option<Token>, SessionError> {
        match std::fs::read_to_string(&self.path) {
            Ok(contents) => {
                let token = contents.trim();
                Ok((!token.is_empty()).then(|| Token::new(token)))
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(SessionError::Storage(e)),
        }
    }

    fn save(&self, token: &Token) -> Result<(), SessionError> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent).map_err(SessionError::Storage)?;
        }
        std::fs::write(&self.path, token.as_str()).map_err(SessionError::Storage)
    }

    fn clear(&self) -> Result<(), SessionError> {
        match std::fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(SessionError::Storage(e)),
        }
    }
}

// ---------------------------------------------------------------------------
// MemoryTokenStore
// ---------------------------------------------------------------------------

/// Keeps the token in memory. Clones share the same slot, so a test can
/// hand one clone to the session manager and inspect the other.
#[derive(Debug, Clone, Default)]
pub struct MemoryTokenStore {
    slot: Arc<Mutex<Option<Token>>>,
}

impl MemoryTokenStore {
    /// Creates a store that already holds `token`.
    pub fn with_token(token: Token) -> Self {
        Self {
            slot: Arc::new(Mutex::new(Some(token))),
        }
    }

    fn slot(&self) -> std::sync::MutexGuard<'_, Option<Token>> {
        // A poisoned slot still holds a valid Option.
        self.slot.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl TokenStore for MemoryTokenStore {
    fn load(&self) -> Result<Option<Token>, SessionError> {
        Ok(self.slot().clone())
    }

    fn save(&self, token: &Token) -> Result<(), SessionError> {
        *self.slot() = Some(token.clone());
        Ok(())
    }

    fn clear(&self) -> Result<(), SessionError> {
        *self.slot() = None;
        Ok(())
    }
}
