//! Data types used by the score aggregation pipeline.

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use thiserror::Error;
use tracing::warn;

/// Number of tents in camp. Tents are numbered `1..=TENT_COUNT`.
pub const TENT_COUNT: u8 = 10;

/// Row label of the synthetic overall-average row.
pub const AVERAGE_LABEL: &str = "Average";

/// Iterates over every valid tent number in display order.
pub fn tent_numbers() -> impl Iterator<Item = u8> {
    1..=TENT_COUNT
}

/// A single score given to a tent, as served by the camp API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreRecord {
    pub score: f64,
    pub tent_nr: i64,
    #[serde(deserialize_with = "deserialize_created_at")]
    pub created_at: DateTime<Utc>,
}

impl ScoreRecord {
    pub fn new(score: f64, tent_nr: i64, created_at: DateTime<Utc>) -> Self {
        Self {
            score,
            tent_nr,
            created_at,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unrecognised timestamp '{0}'")]
pub struct UnrecognisedTimestamp(pub String);

/// Parses a score timestamp.
///
/// Accepts RFC 3339, a naive `YYYY-MM-DDTHH:MM:SS[.fff]` (read as UTC) and a
/// bare `YYYY-MM-DD` (UTC midnight).
pub fn parse_created_at(raw: &str) -> Result<DateTime<Utc>, UnrecognisedTimestamp> {
    let raw = raw.trim();
    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Ok(ts.with_timezone(&Utc));
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f") {
        return Ok(naive.and_utc());
    }
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return Ok(date.and_time(NaiveTime::MIN).and_utc());
    }
    Err(UnrecognisedTimestamp(raw.to_string()))
}

/// Decodes a JSON array of score records. A JSON `null` is read as no records.
///
/// Only a body that is not a JSON array (or `null`) is an error; elements that
/// do not decode as a [`ScoreRecord`] are skipped, see [`decode_records`].
pub fn records_from_json(json: &str) -> serde_json::Result<Vec<ScoreRecord>> {
    let values: Option<Vec<Value>> = serde_json::from_str(json)?;
    Ok(decode_records(values))
}

/// Decodes each element on its own, dropping (and logging) the ones that fail.
pub fn decode_records(values: Option<Vec<Value>>) -> Vec<ScoreRecord> {
    let values = values.unwrap_or_default();
    let total = values.len();

    let records: Vec<ScoreRecord> = values
        .into_iter()
        .enumerate()
        .filter_map(|(index, value)| match serde_json::from_value(value) {
            Ok(record) => Some(record),
            Err(e) => {
                warn!(index, error = %e, "Skipping malformed score record");
                None
            }
        })
        .collect();

    if records.len() < total {
        warn!(
            kept = records.len(),
            skipped = total - records.len(),
            "Some score records could not be read"
        );
    }
    records
}

fn deserialize_created_at<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    parse_created_at(&raw).map_err(serde::de::Error::custom)
}

/// The mean score of one tent on one day (or, in the average row, across all days).
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyTentScore {
    pub tent_nr: u8,
    pub score: f64,
    /// Day label of the row this entry belongs to.
    pub created_at: String,
}

/// All tent scores recorded on one calendar day.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DayGroup {
    pub date: NaiveDate,
    pub label: String,
    /// One entry per tent scored that day, ordered by tent number.
    pub scores: Vec<DailyTentScore>,
}

/// Aggregated score table: day rows in first-seen order plus the average row.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoreTable {
    pub days: Vec<DayGroup>,
    /// One entry for every tent in `1..=TENT_COUNT`, always present.
    pub average: Vec<DailyTentScore>,
}

impl ScoreTable {
    /// Yields `(label, entries)` for each day, then the average row last.
    pub fn rows(&self) -> impl Iterator<Item = (&str, &[DailyTentScore])> {
        self.days
            .iter()
            .map(|day| (day.label.as_str(), day.scores.as_slice()))
            .chain(std::iter::once((AVERAGE_LABEL, self.average.as_slice())))
    }

    pub fn day_count(&self) -> usize {
        self.days.len()
    }

    /// `false` when no day was scored, in which case every average is NaN.
    pub fn has_days(&self) -> bool {
        !self.days.is_empty()
    }

    /// Looks up the score of `tent` within one row's entries.
    pub fn tent_score(entries: &[DailyTentScore], tent: u8) -> Option<f64> {
        entries.iter().find(|e| e.tent_nr == tent).map(|e| e.score)
    }
}
