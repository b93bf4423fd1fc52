//! Journal entry entity and query helpers.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{generate_id, ValidationReport};

/// Mood recorded with a journal entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Mood {
    Happy,
    Calm,
    Neutral,
    Anxious,
    Sad,
    Angry,
}

/// Situations that provoke a craving.
///
/// Shared between journal entries and craving logs; relations between the
/// two are by value only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Trigger {
    Stress,
    AfterMeal,
    TeaCoffee,
    Social,
    Boredom,
    Loneliness,
    Celebration,
    Driving,
    Other,
}

/// A free-form diary entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JournalEntry {
    pub id: String,
    pub date: DateTime<Utc>,
    pub content: String,
    pub mood: Mood,
    /// Set semantics; `create` deduplicates preserving first-seen order.
    pub triggers: Vec<Trigger>,
    /// 1..=10 when present.
    #[serde(default)]
    pub craving_intensity: Option<u8>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Form input for a new entry.
#[derive(Debug, Clone)]
pub struct NewJournalEntry {
    pub date: DateTime<Utc>,
    pub content: String,
    pub mood: Mood,
    pub triggers: Vec<Trigger>,
    pub craving_intensity: Option<u8>,
}

/// Partial update; `None` fields are left unchanged.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JournalEntryPatch {
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub mood: Option<Mood>,
    #[serde(default)]
    pub triggers: Option<Vec<Trigger>>,
    #[serde(default)]
    pub craving_intensity: Option<u8>,
}

fn dedup_triggers(triggers: Vec<Trigger>) -> Vec<Trigger> {
    let mut seen = Vec::with_capacity(triggers.len());
    for t in triggers {
        if !seen.contains(&t) {
            seen.push(t);
        }
    }
    seen
}

impl JournalEntry {
    pub fn create(input: NewJournalEntry) -> Self {
        let now = Utc::now();
        Self {
            id: generate_id(),
            date: input.date,
            content: input.content,
            mood: input.mood,
            triggers: dedup_triggers(input.triggers),
            craving_intensity: input.craving_intensity,
            created_at: now,
            updated_at: now,
        }
    }

    /// Merge a patch into this entry. Id and created_at never change.
    pub fn apply(&self, patch: &JournalEntryPatch) -> Self {
        Self {
            id: self.id.clone(),
            date: self.date,
            content: patch.content.clone().unwrap_or_else(|| self.content.clone()),
            mood: patch.mood.unwrap_or(self.mood),
            triggers: patch
                .triggers
                .clone()
                .map(dedup_triggers)
                .unwrap_or_else(|| self.triggers.clone()),
            craving_intensity: patch.craving_intensity.or(self.craving_intensity),
            created_at: self.created_at,
            updated_at: Utc::now(),
        }
    }

    pub fn validate(&self) -> ValidationReport {
        let mut report = ValidationReport::default();
        if self.content.trim().is_empty() {
            report.push("জার্নাল কনটেন্ট খালি রাখা যাবে না");
        }
        if let Some(intensity) = self.craving_intensity {
            if !(1..=10).contains(&intensity) {
                report.push("ক্রেভিং এর তীব্রতা ১ থেকে ১০ এর মধ্যে হতে হবে");
            }
        }
        report
    }
}

/// Sort entries by their date, newest first unless `ascending`.
pub fn sort_by_date(entries: &mut [JournalEntry], ascending: bool) {
    entries.sort_by_key(|e| e.date);
    if !ascending {
        entries.reverse();
    }
}

/// Entries whose date falls within `[start, end]`, bounds inclusive.
pub fn filter_by_date_range(
    entries: &[JournalEntry],
    start: DateTime<Utc>,
    end: DateTime<Utc>,
) -> Vec<JournalEntry> {
    entries
        .iter()
        .filter(|e| e.date >= start && e.date <= end)
        .cloned()
        .collect()
}
