//! Calendar-day truncation for score timestamps.

use chrono::{DateTime, FixedOffset, NaiveDate, Offset, Utc};
use std::str::FromStr;
use thiserror::Error;

/// Camp local time in summer (EEST).
const CAMP_UTC_OFFSET_SECS: i32 = 3 * 3600;

/// How a day is printed in the table's date column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DayLabelStyle {
    /// `2024-07-01`
    Iso,
    /// `1.07.2024`, the Estonian short numeric date.
    #[default]
    Estonian,
}

#[derive(Debug, Error)]
#[error("unknown date style '{0}', expected 'estonian' or 'iso'")]
pub struct UnknownDayLabelStyle(String);

impl FromStr for DayLabelStyle {
    type Err = UnknownDayLabelStyle;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "iso" => Ok(DayLabelStyle::Iso),
            "estonian" | "et" => Ok(DayLabelStyle::Estonian),
            other => Err(UnknownDayLabelStyle(other.to_string())),
        }
    }
}

/// Decides which calendar day a timestamp belongs to and how that day is labelled.
///
/// Grouping depends only on this value, never on the process locale or timezone.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DayKeyConfig {
    pub offset: FixedOffset,
    pub style: DayLabelStyle,
}

impl Default for DayKeyConfig {
    fn default() -> Self {
        Self {
            offset: FixedOffset::east_opt(CAMP_UTC_OFFSET_SECS).unwrap_or_else(|| Utc.fix()),
            style: DayLabelStyle::default(),
        }
    }
}

impl DayKeyConfig {
    pub fn new(offset: FixedOffset, style: DayLabelStyle) -> Self {
        Self { offset, style }
    }

    /// UTC days with ISO labels.
    pub fn utc_iso() -> Self {
        Self::new(Utc.fix(), DayLabelStyle::Iso)
    }

    /// The calendar day `ts` falls on in the configured offset.
    pub fn day_of(&self, ts: &DateTime<Utc>) -> NaiveDate {
        ts.with_timezone(&self.offset).date_naive()
    }

    pub fn label(&self, date: NaiveDate) -> String {
        match self.style {
            DayLabelStyle::Iso => date.format("%Y-%m-%d").to_string(),
            DayLabelStyle::Estonian => date.format("%-d.%m.%Y").to_string(),
        }
    }
}
