//! Session cache for the authenticated identity.
//!
//! Each session field is its own file under an origin-scoped directory, so
//! fields can be written and removed independently. The store performs no
//! validation and no network calls; it is the single owner of the cached
//! session, and callers only ever receive owned snapshots.

use std::path::PathBuf;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Key file holding the bearer token
const TOKEN_KEY: &str = "token";

/// Key file holding the user's display name
const USER_NAME_KEY: &str = "user_name";

/// Key file holding the user's email address
const USER_EMAIL_KEY: &str = "user_email";

/// The cached authenticated identity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub token: String,
    pub user_name: String,
    pub user_email: String,
}

/// Partial overwrite of the profile fields; `None` keeps the prior value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionUpdate {
    pub user_name: Option<String>,
    pub user_email: Option<String>,
}

/// File-backed store owning the cached session.
///
/// Clones share the same backing directory. Two calls completing out of
/// order resolve as last write wins; no stronger ordering is provided.
#[derive(Debug, Clone)]
pub struct SessionStore {
    dir: PathBuf,
}

impl SessionStore {
    /// Open the store rooted at `dir`, creating the directory if needed.
    pub fn open(dir: PathBuf) -> Result<Self> {
        std::fs::create_dir_all(&dir)
            .with_context(|| format!("Failed to create session directory: {}", dir.display()))?;
        Ok(Self { dir })
    }

    /// Replace the whole session after a successful login or registration.
    pub fn save(&self, session: &Session) -> Result<()> {
        self.write_key(TOKEN_KEY, &session.token)?;
        self.write_key(USER_NAME_KEY, &session.user_name)?;
        self.write_key(USER_EMAIL_KEY, &session.user_email)?;
        debug!(user = %session.user_name, "Session saved");
        Ok(())
    }

    /// Overwrite only the supplied profile fields.
    pub fn update(&self, update: &SessionUpdate) -> Result<()> {
        if let Some(ref name) = update.user_name {
            self.write_key(USER_NAME_KEY, name)?;
        }
        if let Some(ref email) = update.user_email {
            self.write_key(USER_EMAIL_KEY, email)?;
        }
        Ok(())
    }

    /// Remove all session keys. Safe to call on an already-empty store.
    pub fn clear(&self) -> Result<()> {
        self.remove_key(TOKEN_KEY)?;
        self.remove_key(USER_NAME_KEY)?;
        self.remove_key(USER_EMAIL_KEY)?;
        debug!("Session cleared");
        Ok(())
    }

    /// A session exists iff a non-empty token is cached.
    pub fn is_authenticated(&self) -> bool {
        self.token().is_some()
    }

    pub fn token(&self) -> Option<String> {
        self.read_key(TOKEN_KEY).filter(|t| !t.is_empty())
    }

    /// Display name; reads as absent without a token, even if a stale value
    /// remains on disk.
    pub fn user_name(&self) -> Option<String> {
        self.token()?;
        self.read_key(USER_NAME_KEY)
    }

    /// Email address, gated on token presence like [`Self::user_name`].
    pub fn user_email(&self) -> Option<String> {
        self.token()?;
        self.read_key(USER_EMAIL_KEY)
    }

    /// Owned snapshot of the full session, if authenticated.
    pub fn snapshot(&self) -> Option<Session> {
        Some(Session {
            token: self.token()?,
            user_name: self.read_key(USER_NAME_KEY)?,
            user_email: self.read_key(USER_EMAIL_KEY)?,
        })
    }

    fn key_path(&self, key: &str) -> PathBuf {
        self.dir.join(key)
    }

    fn write_key(&self, key: &str, value: &str) -> Result<()> {
        std::fs::write(self.key_path(key), value)
            .with_context(|| format!("Failed to write session key: {}", key))
    }

    fn read_key(&self, key: &str) -> Option<String> {
        std::fs::read_to_string(self.key_path(key)).ok()
    }

    fn remove_key(&self, key: &str) -> Result<()> {
        let path = self.key_path(key);
        if path.exists() {
            std::fs::remove_file(&path)
                .with_context(|| format!("Failed to remove session key: {}", key))?;
        }
        Ok(())
    }
}
