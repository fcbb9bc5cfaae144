//! Session-aware flows behind the `login` and `scores` commands.

use anyhow::{Context, Result, bail};
use tracing::{info, warn};

use crate::auth::{Credentials, Session, SessionData};
use crate::scores::ScoreRecord;
use crate::services::scores_api::ScoresApi;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoginOutcome {
    /// A session was already stored and `force` was not set; nothing changed.
    AlreadyLoggedIn { username: String },
    LoggedIn { username: String, shift: Option<u32> },
}

/// Logs in and stores the session, unless one exists and `force` is false.
///
/// An unreadable session file counts as no session.
pub async fn log_in<A>(
    api: &A,
    session: &mut Session,
    credentials: &Credentials,
    force: bool,
) -> Result<LoginOutcome>
where
    A: ScoresApi + ?Sized,
{
    let existing = session.load().unwrap_or_else(|e| {
        warn!(error = %e, "Ignoring unreadable session file");
        false
    });
    if existing && !force {
        let username = session.username().unwrap_or_default().to_string();
        info!(username = %username, "Already logged in, use --force to log in again");
        return Ok(LoginOutcome::AlreadyLoggedIn { username });
    }

    let grant = api.login(credentials).await.context("Login failed")?;
    session.update(SessionData::from_grant(grant));
    session.save()?;

    let username = session.username().unwrap_or_default().to_string();
    let shift = session.shift();
    info!(username = %username, shift, "Session stored");
    Ok(LoginOutcome::LoggedIn { username, shift })
}

/// Fetches the records of `shift`, or of the session's shift when `None`.
///
/// A rejected token clears the stored session.
pub async fn fetch_shift_records<A>(
    api: &A,
    session: &mut Session,
    shift: Option<u32>,
) -> Result<Vec<ScoreRecord>>
where
    A: ScoresApi + ?Sized,
{
    session.load()?;
    let Some(data) = session.data.clone() else {
        bail!("Not logged in, run `tent_scores login` first");
    };

    let shift = shift
        .or(data.shift)
        .context("No shift given and the session has none, pass --shift")?;

    match api.shift_scores(&data.token, shift).await {
        Ok(records) => {
            info!(shift, records = records.len(), "Scores fetched");
            Ok(records)
        }
        Err(e) if e.is_unauthorized() => {
            session.clear()?;
            bail!("Session is no longer valid, run `tent_scores login` again");
        }
        Err(e) => Err(e).with_context(|| format!("Failed to fetch scores for shift {shift}")),
    }
}
