//! Per-program-day task completion entity.
//!
//! Tasks are instantiated from static day content by the host app; the core
//! persists only the completion state, keyed by id and program day.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{generate_id, ValidationReport};
use crate::timeline::PROGRAM_LENGTH_DAYS;

/// Completion state of one task of one program day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskCompletion {
    pub id: String,
    /// Program day the task belongs to, 1..=41.
    pub day: u32,
    pub title: String,
    pub description: String,
    pub completed: bool,
    /// Present iff `completed`.
    #[serde(default)]
    pub completed_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Input built from a day's static task content.
#[derive(Debug, Clone)]
pub struct NewTaskCompletion {
    pub day: u32,
    pub title: String,
    pub description: String,
}

impl TaskCompletion {
    /// A fresh, not-yet-completed task.
    pub fn create(input: NewTaskCompletion) -> Self {
        let now = Utc::now();
        Self {
            id: generate_id(),
            day: input.day,
            title: input.title,
            description: input.description,
            completed: false,
            completed_at: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Flip completion state, keeping `completed_at` consistent with it.
    pub fn toggle(&self) -> Self {
        let now = Utc::now();
        let completed = !self.completed;
        Self {
            completed,
            completed_at: completed.then_some(now),
            updated_at: now,
            ..self.clone()
        }
    }

    pub fn validate(&self) -> ValidationReport {
        let mut report = ValidationReport::default();
        if self.title.trim().is_empty() {
            report.push("টাস্কের শিরোনাম খালি রাখা যাবে না");
        }
        if !(1..=PROGRAM_LENGTH_DAYS).contains(&self.day) {
            report.push("দিনের মান ১ থেকে ৪১ এর মধ্যে হতে হবে");
        }
        if self.completed && self.completed_at.is_none() {
            report.push("সম্পন্ন টাস্কে সম্পন্নের সময় থাকতে হবে");
        }
        if !self.completed && self.completed_at.is_some() {
            report.push("অসম্পন্ন টাস্কে সম্পন্নের সময় থাকতে পারে না");
        }
        report
    }
}
