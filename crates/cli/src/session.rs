//! Login state kept between invocations.
//!
//! The session is a small JSON file `{"username": "..."}`. Logging in writes
//! it, logging out deletes it.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use dispensa_core::{Username, UsernameError};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Session file errors.
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("not logged in: run `dispensa login <username>` first")]
    NotLoggedIn,

    #[error("invalid username: {0}")]
    InvalidUsername(#[from] UsernameError),

    #[error("session file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("corrupt session file {path}: {source}")]
    Corrupt {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

#[derive(Debug, Serialize, Deserialize)]
struct SessionFile {
    username: String,
}

/// Reads and writes the session file.
#[derive(Debug, Clone)]
pub struct SessionStore {
    path: PathBuf,
}

impl SessionStore {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Validate `raw` and remember it as the current user.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::InvalidUsername` for a blank or overlong name,
    /// or `SessionError::Io` if the file cannot be written.
    pub fn login(&self, raw: &str) -> Result<Username, SessionError> {
        let username = Username::parse(raw)?;

        if let Some(dir) = self.path.parent() {
            std::fs::create_dir_all(dir).map_err(|source| self.io_error(source))?;
        }
        let contents = serde_json::to_string_pretty(&SessionFile {
            username: username.as_str().to_owned(),
        })
        .map_err(|source| SessionError::Corrupt {
            path: self.path.clone(),
            source,
        })?;
        std::fs::write(&self.path, contents).map_err(|source| self.io_error(source))?;

        tracing::info!(path = %self.path.display(), "Session saved");
        Ok(username)
    }

    /// Forget the current user. Logging out twice is fine.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Io` if the file exists but cannot be removed.
    pub fn logout(&self) -> Result<(), SessionError> {
        match std::fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(source) => Err(self.io_error(source)),
        }
    }

    /// The logged-in user, if any.
    ///
    /// # Errors
    ///
    /// Returns `SessionError` if the file cannot be read or does not hold a
    /// valid username.
    pub fn current(&self) -> Result<Option<Username>, SessionError> {
        let contents = match std::fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(source) => return Err(self.io_error(source)),
        };

        let file: SessionFile =
            serde_json::from_str(&contents).map_err(|source| SessionError::Corrupt {
                path: self.path.clone(),
                source,
            })?;
        Ok(Some(Username::parse(&file.username)?))
    }

    /// The logged-in user.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::NotLoggedIn` when there is no session.
    pub fn require(&self) -> Result<Username, SessionError> {
        self.current()?.ok_or(SessionError::NotLoggedIn)
    }

    fn io_error(&self, source: std::io::Error) -> SessionError {
        SessionError::Io {
            path: self.path.clone(),
            source,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn temp_store(name: &str) -> SessionStore {
        let dir = std::env::temp_dir().join(format!(
            "dispensa-session-{name}-{}",
            std::process::id()
        ));
        let _ = std::fs::remove_dir_all(&dir);
        SessionStore::new(dir.join("nested").join("session.json"))
    }

    #[test]
    fn test_login_then_current() {
        let store = temp_store("login");
        assert!(store.current().unwrap().is_none());

        let username = store.login("  mario  ").unwrap();
        assert_eq!(username.as_str(), "mario");
        assert_eq!(store.require().unwrap().as_str(), "mario");

        store.logout().unwrap();
        assert!(matches!(store.require(), Err(SessionError::NotLoggedIn)));
        store.logout().unwrap();
    }

    #[test]
    fn test_blank_username_rejected() {
        let store = temp_store("blank");
        assert!(matches!(
            store.login("   "),
            Err(SessionError::InvalidUsername(_))
        ));
        assert!(store.current().unwrap().is_none());
    }

    #[test]
    fn test_corrupt_file_reported() {
        let store = temp_store("corrupt");
        std::fs::create_dir_all(store.path().parent().unwrap()).unwrap();
        std::fs::write(store.path(), "not json").unwrap();
        assert!(matches!(store.current(), Err(SessionError::Corrupt { .. })));
    }
}
