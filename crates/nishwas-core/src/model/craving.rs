//! Craving log entity and aggregate helpers.
//!
//! One record per craving episode, written at the end of the SOS flow.
//! Append-only in practice; there is no patch type.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::journal::Trigger;
use super::{generate_id, ValidationReport};

/// A single craving episode.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CravingLog {
    pub id: String,
    pub timestamp: DateTime<Utc>,
    /// 1..=10.
    pub intensity: u8,
    /// At least one trigger.
    pub triggers: Vec<Trigger>,
    /// How long the craving lasted, in minutes.
    #[serde(default)]
    pub duration_minutes: Option<u32>,
    #[serde(default)]
    pub coping_strategy: Option<String>,
    /// Whether the user got through without smoking.
    pub overcome: bool,
    #[serde(default)]
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// SOS-flow input for a new log.
#[derive(Debug, Clone)]
pub struct NewCravingLog {
    pub timestamp: DateTime<Utc>,
    pub intensity: u8,
    pub triggers: Vec<Trigger>,
    pub duration_minutes: Option<u32>,
    pub coping_strategy: Option<String>,
    pub overcome: bool,
    pub notes: Option<String>,
}

impl CravingLog {
    pub fn create(input: NewCravingLog) -> Self {
        let now = Utc::now();
        Self {
            id: generate_id(),
            timestamp: input.timestamp,
            intensity: input.intensity,
            triggers: input.triggers,
            duration_minutes: input.duration_minutes,
            coping_strategy: input.coping_strategy,
            overcome: input.overcome,
            notes: input.notes,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn validate(&self) -> ValidationReport {
        let mut report = ValidationReport::default();
        if !(1..=10).contains(&self.intensity) {
            report.push("ক্রেভিং এর তীব্রতা ১ থেকে ১০ এর মধ্যে হতে হবে");
        }
        if self.triggers.is_empty() {
            report.push("অন্তত একটি ট্রিগার নির্বাচন করুন");
        }
        report
    }
}

/// Sort logs by their timestamp, newest first unless `ascending`.
pub fn sort_by_timestamp(logs: &mut [CravingLog], ascending: bool) {
    logs.sort_by_key(|l| l.timestamp);
    if !ascending {
        logs.reverse();
    }
}

/// Logs whose timestamp falls within `[start, end]`, bounds inclusive.
pub fn filter_by_timestamp_range(
    logs: &[CravingLog],
    start: DateTime<Utc>,
    end: DateTime<Utc>,
) -> Vec<CravingLog> {
    logs.iter()
        .filter(|l| l.timestamp >= start && l.timestamp <= end)
        .cloned()
        .collect()
}

/// Mean intensity across logs; 0.0 for an empty slice.
pub fn average_intensity(logs: &[CravingLog]) -> f64 {
    if logs.is_empty() {
        return 0.0;
    }
    let sum: u32 = logs.iter().map(|l| u32::from(l.intensity)).sum();
    f64::from(sum) / logs.len() as f64
}

/// Trigger frequencies across logs, most common first.
///
/// Counts are accumulated in first-seen order and ranked with a stable
/// sort, so ties keep their first-seen order.
pub fn most_common_triggers(logs: &[CravingLog]) -> Vec<(Trigger, usize)> {
    let mut counts: Vec<(Trigger, usize)> = Vec::new();
    for log in logs {
        for &trigger in &log.triggers {
            match counts.iter_mut().find(|(t, _)| *t == trigger) {
                Some((_, n)) => *n += 1,
                None => counts.push((trigger, 1)),
            }
        }
    }
    counts.sort_by_key(|&(_, n)| std::cmp::Reverse(n));
    counts
}
