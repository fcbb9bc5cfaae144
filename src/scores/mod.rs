//! Tent score aggregation.
//!
//! Groups raw tent scores by calendar day, averages same-day duplicates per
//! tent and appends an overall average row per tent.

pub mod aggregate;
pub mod day_key;
pub mod types;
pub mod utility;

pub use aggregate::aggregate;
pub use day_key::{DayKeyConfig, DayLabelStyle};
pub use types::{
    AVERAGE_LABEL, DailyTentScore, DayGroup, ScoreRecord, ScoreTable, TENT_COUNT,
    UnrecognisedTimestamp, decode_records, records_from_json,
};
