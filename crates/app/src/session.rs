//! Session
//!
//! Bearer tokens issued by `auth/login` and `auth/refresh`, persisted between
//! CLI invocations.

use std::{
    fmt, fs, io,
    path::{Path, PathBuf},
};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use zeroize::{Zeroize, Zeroizing};

/// Errors raised while loading or saving the session file.
#[derive(Debug, Error)]
pub enum SessionError {
    /// The session file exists but could not be read.
    #[error("failed to read session from {path}")]
    Read {
        /// Session file.
        path: PathBuf,

        /// Underlying I/O error.
        #[source]
        source: io::Error,
    },

    /// The session file could not be written or removed.
    #[error("failed to write session to {path}")]
    Write {
        /// Session file.
        path: PathBuf,

        /// Underlying I/O error.
        #[source]
        source: io::Error,
    },

    /// The session file is not valid JSON.
    #[error("stored session is corrupt")]
    Corrupt(#[source] serde_json::Error),
}

/// Access and refresh token pair.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    #[serde(alias = "access_token", alias = "token")]
    access_token: String,

    #[serde(default, alias = "refresh_token")]
    refresh_token: Option<String>,
}

impl Session {
    /// New session from issued tokens.
    #[must_use]
    pub fn new(access_token: impl Into<String>, refresh_token: Option<String>) -> Self {
        Self {
            access_token: access_token.into(),
            refresh_token,
        }
    }

    /// Copy of the access token that is wiped when dropped.
    #[must_use]
    pub fn access_token(&self) -> Zeroizing<String> {
        Zeroizing::new(self.access_token.clone())
    }

    /// Copy of the refresh token that is wiped when dropped.
    #[must_use]
    pub fn refresh_token(&self) -> Option<Zeroizing<String>> {
        self.refresh_token.clone().map(Zeroizing::new)
    }

    /// Session after a refresh. The backend may rotate the refresh token or
    /// keep the current one.
    #[must_use]
    pub fn refreshed(&self, issued: Self) -> Self {
        Self {
            refresh_token: issued.refresh_token.clone().or_else(|| self.refresh_token.clone()),
            access_token: issued.access_token.clone(),
        }
    }
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Session(**redacted**)")?;
        Ok(())
    }
}

impl Drop for Session {
    fn drop(&mut self) {
        self.access_token.zeroize();
        self.refresh_token.zeroize();
    }
}

/// Session persisted as JSON at a fixed path.
#[derive(Debug, Clone)]
pub struct SessionFile {
    path: PathBuf,
}

impl SessionFile {
    /// Session stored at `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Location of the session file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the stored session; `None` when logged out.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn load(&self) -> Result<Option<Session>, SessionError> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => Zeroizing::new(raw),
            Err(error) if error.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(source) => {
                return Err(SessionError::Read {
                    path: self.path.clone(),
                    source,
                });
            }
        };

        serde_json::from_str(&raw)
            .map(Some)
            .map_err(SessionError::Corrupt)
    }

    /// Store `session`, replacing any previous one.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written.
    pub fn save(&self, session: &Session) -> Result<(), SessionError> {
        let encoded = Zeroizing::new(serde_json::to_string(session).map_err(SessionError::Corrupt)?);

        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(|source| self.write_error(source))?;
        }

        fs::write(&self.path, encoded.as_bytes()).map_err(|source| self.write_error(source))
    }

    /// Forget the stored session.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be removed.
    pub fn clear(&self) -> Result<(), SessionError> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(error) if error.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(source) => Err(self.write_error(source)),
        }
    }

    fn write_error(&self, source: io::Error) -> SessionError {
        SessionError::Write {
            path: self.path.clone(),
            source,
        }
    }
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use super::*;

    #[test]
    fn debug_output_hides_tokens() {
        let session = Session::new("secret-access", Some("secret-refresh".to_string()));

        assert_eq!(format!("{session:?}"), "Session(**redacted**)");
    }

    #[test]
    fn refresh_keeps_refresh_token_when_not_rotated() {
        let session = Session::new("old", Some("refresh".to_string()));

        let refreshed = session.refreshed(Session::new("new", None));

        assert_eq!(refreshed.access_token().as_str(), "new");
        assert_eq!(
            refreshed.refresh_token().as_deref().map(String::as_str),
            Some("refresh")
        );
    }

    #[test]
    fn session_round_trips_through_file() -> TestResult {
        let dir = tempfile::tempdir()?;
        let file = SessionFile::new(dir.path().join("nested").join("session.json"));

        assert_eq!(file.load()?, None);

        file.save(&Session::new("access", Some("refresh".to_string())))?;

        assert_eq!(
            file.load()?,
            Some(Session::new("access", Some("refresh".to_string())))
        );

        file.clear()?;
        file.clear()?;

        assert_eq!(file.load()?, None);

        Ok(())
    }

    #[test]
    fn accepts_snake_case_token_names() -> TestResult {
        let session: Session =
            serde_json::from_str(r#"{"access_token":"a","refresh_token":"r"}"#)?;

        assert_eq!(session, Session::new("a", Some("r".to_string())));

        Ok(())
    }
}
