//! Workout records as delivered by the Concept2 logbook API.

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Deserializer, Serialize};

/// Fixed-point elapsed time, counted in tenths of a second.
pub type Tenths = u64;

/// Heart rate block attached to results, splits and intervals
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeartRate {
    #[serde(default)]
    pub average: Option<u32>,
    #[serde(default)]
    pub min: Option<u32>,
    #[serde(default)]
    pub max: Option<u32>,
    #[serde(default)]
    pub ending: Option<u32>,
}

/// One split of a continuous piece
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Split {
    pub time: Tenths,
    pub distance: u32,
    #[serde(default)]
    pub stroke_rate: Option<u32>,
    #[serde(default)]
    pub heart_rate: Option<HeartRate>,
}

impl Split {
    pub fn new(time: Tenths, distance: u32, stroke_rate: u32) -> Self {
        Self {
            time,
            distance,
            stroke_rate: Some(stroke_rate),
            heart_rate: None,
        }
    }
}

/// Interval type as reported by the logbook
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IntervalKind {
    Distance,
    Time,
    Rest,
    /// Calorie, watt-minute and any type added to the API later
    #[default]
    #[serde(other)]
    Other,
}

/// One work or rest segment of a structured workout
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Interval {
    #[serde(rename = "type", default)]
    pub kind: IntervalKind,
    pub time: Tenths,
    pub distance: u32,
    #[serde(default)]
    pub stroke_rate: Option<u32>,
    #[serde(default)]
    pub heart_rate: Option<HeartRate>,
}

impl Interval {
    pub fn new(kind: IntervalKind, time: Tenths, distance: u32, stroke_rate: u32) -> Self {
        Self {
            kind,
            time,
            distance,
            stroke_rate: Some(stroke_rate),
            heart_rate: None,
        }
    }
}

/// Optional breakdown of a result. The logbook populates at most one list.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Workout {
    #[serde(default)]
    pub splits: Option<Vec<Split>>,
    #[serde(default)]
    pub intervals: Option<Vec<Interval>>,
}

/// A single logged workout result
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawResult {
    #[serde(default)]
    pub id: u64,
    #[serde(default)]
    pub user_id: Option<u64>,
    #[serde(default)]
    pub distance: u32,
    #[serde(default)]
    pub time: Tenths,
    #[serde(default)]
    pub stroke_rate: Option<u32>,
    #[serde(default, deserialize_with = "deserialize_logbook_date")]
    pub date: Option<NaiveDateTime>,
    #[serde(default)]
    pub heart_rate: Option<HeartRate>,
    #[serde(default)]
    pub workout: Workout,
}

impl RawResult {
    pub fn splits(&self) -> &[Split] {
        self.workout.splits.as_deref().unwrap_or_default()
    }

    pub fn intervals(&self) -> &[Interval] {
        self.workout.intervals.as_deref().unwrap_or_default()
    }
}

/// Parse the date shapes the logbook emits.
///
/// Production results carry `2026-02-04 11:53:00` (local to the rower),
/// webhook fixtures and exports use RFC 3339.
pub fn parse_logbook_date(raw: &str) -> Option<NaiveDateTime> {
    let raw = raw.trim();
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.naive_utc())
        .ok()
        .or_else(|| NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S").ok())
        .or_else(|| NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f").ok())
        .or_else(|| {
            NaiveDate::parse_from_str(raw, "%Y-%m-%d")
                .ok()
                .and_then(|d| d.and_hms_opt(0, 0, 0))
        })
}

fn deserialize_logbook_date<'de, D>(deserializer: D) -> Result<Option<NaiveDateTime>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    match raw {
        None => Ok(None),
        Some(s) => parse_logbook_date(&s)
            .map(Some)
            .ok_or_else(|| serde::de::Error::custom(format!("invalid logbook date: {}", s))),
    }
}

/// `{"data": ...}` wrapper used by every logbook API response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogbookEnvelope<T> {
    pub data: T,
}
