use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::services::scores_api::LoginGrant;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionData {
    pub token: String,
    pub username: String,
    /// Shift the user belongs to, if the login response named one.
    pub shift: Option<u32>,
    pub created_at: DateTime<Utc>,
}

impl SessionData {
    pub fn from_grant(grant: LoginGrant) -> Self {
        Self {
            token: grant.token,
            username: grant.username,
            shift: grant.shift,
            created_at: Utc::now(),
        }
    }
}

/// The logged-in user's session, persisted as JSON at `path`.
pub struct Session {
    path: PathBuf,
    pub data: Option<SessionData>,
}

impl Session {
    pub fn new(path: PathBuf) -> Self {
        Self { path, data: None }
    }

    /// Load session from disk. Returns whether a session was found.
    pub fn load(&mut self) -> Result<bool> {
        if !self.path.exists() {
            return Ok(false);
        }
        let contents = std::fs::read_to_string(&self.path)
            .with_context(|| format!("Failed to read session file {}", self.path.display()))?;
        let data: SessionData = serde_json::from_str(&contents)
            .with_context(|| format!("Failed to parse session file {}", self.path.display()))?;
        debug!(username = %data.username, "Loaded session");
        self.data = Some(data);
        Ok(true)
    }

    pub fn save(&self) -> Result<()> {
        if let Some(ref data) = self.data {
            if let Some(parent) = self.path.parent() {
                std::fs::create_dir_all(parent)?;
            }
            let contents = serde_json::to_string_pretty(data)?;
            std::fs::write(&self.path, contents)
                .with_context(|| format!("Failed to write session file {}", self.path.display()))?;

            // The file holds a bearer token: owner read/write only.
            #[cfg(unix)]
            {
                use std::os::unix::fs::PermissionsExt;
                std::fs::set_permissions(&self.path, std::fs::Permissions::from_mode(0o600))?;
            }
        }
        Ok(())
    }

    /// Forget the session and remove the file.
    pub fn clear(&mut self) -> Result<()> {
        self.data = None;
        if self.path.exists() {
            std::fs::remove_file(&self.path)?;
        }
        Ok(())
    }

    pub fn update(&mut self, data: SessionData) {
        self.data = Some(data);
    }

    pub fn token(&self) -> Option<&str> {
        self.data.as_ref().map(|d| d.token.as_str())
    }

    pub fn shift(&self) -> Option<u32> {
        self.data.as_ref().and_then(|d| d.shift)
    }

    pub fn username(&self) -> Option<&str> {
        self.data.as_ref().map(|d| d.username.as_str())
    }

    pub fn is_logged_in(&self) -> bool {
        self.data.is_some()
    }
}
