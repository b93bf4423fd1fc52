//! Persisted entity models.
//!
//! One module per entity stored by the gateway:
//! - [`User`]: the profile created at onboarding, anchor of all metrics
//! - [`JournalEntry`]: free-form diary entries with mood and triggers
//! - [`CravingLog`]: one record per craving episode (SOS flow)
//! - [`TaskCompletion`]: per-program-day task state
//! - [`Settings`]: user preferences, default-filled on load
//!
//! Each entity exposes `create` (assigns id and timestamps), `apply`
//! (partial update; id and created_at are immutable) and `validate`.
//! Validation produces a [`ValidationReport`] with Bangla messages for
//! direct display; it never panics and is checked by the gateway before
//! every write.

mod craving;
mod journal;
mod settings;
mod task;
mod user;

pub use craving::{
    average_intensity, filter_by_timestamp_range, most_common_triggers, sort_by_timestamp,
    CravingLog, NewCravingLog,
};
pub use journal::{
    filter_by_date_range, sort_by_date, JournalEntry, JournalEntryPatch, Mood, NewJournalEntry,
    Trigger,
};
pub use settings::{
    AppearanceSettings, EmergencyContact, FontSize, NotificationSettings, PrivacySettings,
    Settings, SettingsPatch,
};
pub use task::{NewTaskCompletion, TaskCompletion};
pub use user::{NewUser, User, UserPatch};

use rand::distributions::Alphanumeric;
use rand::Rng;

/// Outcome of validating a candidate entity before a write.
///
/// Messages are user-facing Bangla strings; the presentation layer shows
/// them verbatim.
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct ValidationReport {
    pub errors: Vec<String>,
}

impl ValidationReport {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    pub(crate) fn push(&mut self, message: &str) {
        self.errors.push(message.to_string());
    }
}

/// Generate a collection id: unix millis plus a 6-char alphanumeric suffix.
pub(crate) fn generate_id() -> String {
    let millis = chrono::Utc::now().timestamp_millis();
    let suffix: String = rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(6)
        .map(char::from)
        .collect();
    format!("{millis}-{suffix}")
}
