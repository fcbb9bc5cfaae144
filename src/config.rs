//! Runtime settings read from the environment (and `.env`).
//!
//! | Variable                   | Default                     |
//! |----------------------------|-----------------------------|
//! | `TENT_SCORES_API_URL`      | `http://localhost:3000/api` |
//! | `TENT_SCORES_SESSION_PATH` | `state/session.json`        |
//! | `TENT_SCORES_UTC_OFFSET`   | `+03:00`                    |
//! | `TENT_SCORES_DATE_STYLE`   | `estonian`                  |
//! | `LOG_FILE_PATH`            | `logs/tent_scores.log`      |

use anyhow::{Context, Result};
use chrono::FixedOffset;
use std::path::PathBuf;

use crate::scores::{DayKeyConfig, DayLabelStyle};

const DEFAULT_API_URL: &str = "http://localhost:3000/api";
const DEFAULT_SESSION_PATH: &str = "state/session.json";
const DEFAULT_UTC_OFFSET: &str = "+03:00";
const DEFAULT_DATE_STYLE: &str = "estonian";
const DEFAULT_LOG_FILE_PATH: &str = "logs/tent_scores.log";

#[derive(Debug, Clone)]
pub struct Settings {
    pub api_url: String,
    pub session_path: PathBuf,
    pub day_keys: DayKeyConfig,
    pub log_file_path: PathBuf,
}

impl Settings {
    /// Reads settings from the process environment.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Reads settings through `lookup`, falling back to defaults for unset keys.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str, default: &str| {
            lookup(key)
                .filter(|v| !v.trim().is_empty())
                .unwrap_or_else(|| default.to_string())
        };

        let offset_raw = get("TENT_SCORES_UTC_OFFSET", DEFAULT_UTC_OFFSET);
        let offset: FixedOffset = offset_raw
            .trim()
            .parse()
            .with_context(|| format!("TENT_SCORES_UTC_OFFSET '{offset_raw}' is not an offset like +03:00"))?;

        let style: DayLabelStyle = get("TENT_SCORES_DATE_STYLE", DEFAULT_DATE_STYLE)
            .parse()
            .context("Invalid TENT_SCORES_DATE_STYLE")?;

        Ok(Self {
            api_url: get("TENT_SCORES_API_URL", DEFAULT_API_URL),
            session_path: PathBuf::from(get("TENT_SCORES_SESSION_PATH", DEFAULT_SESSION_PATH)),
            day_keys: DayKeyConfig::new(offset, style),
            log_file_path: PathBuf::from(get("LOG_FILE_PATH", DEFAULT_LOG_FILE_PATH)),
        })
    }
}
