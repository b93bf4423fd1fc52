//! # Nishwas Core Library
//!
//! This library provides the core business logic for Nishwas, a personal
//! quit-smoking tracker: deterministic progress metrics derived from the
//! quit instant, and validated local persistence for everything the user
//! records. The mobile shell (screens, navigation, notification
//! scheduling, devotional content) is a thin layer over this crate and
//! only ever sees plain data structures.
//!
//! ## Architecture
//!
//! - **Progress**: pure functions deriving smoke-free time, money saved
//!   and milestone achievement from the profile's quit date and an
//!   injectable `now`
//! - **Storage**: one JSON value per namespaced key in a local SQLite kv
//!   table, with validation before every write
//! - **Retry**: bounded linear-backoff decoration over storage calls,
//!   surfacing exhausted failures as classified errors
//!
//! ## Key Components
//!
//! - [`StorageGateway`]: validated CRUD over the fixed key set
//! - [`RetryingStore`]: the retrying surface handed to UI code
//! - [`ProgressSnapshot`]: the periodically recomputed metrics cache
//! - [`User`]: the profile anchoring every derived metric

pub mod error;
pub mod model;
pub mod progress;
pub mod storage;
pub mod timeline;

pub use error::{AppError, CoreError, ErrorKind, ImportError, StorageError};
pub use model::{
    CravingLog, JournalEntry, JournalEntryPatch, Mood, NewCravingLog, NewJournalEntry,
    NewTaskCompletion, NewUser, Settings, SettingsPatch, TaskCompletion, Trigger, User, UserPatch,
    ValidationReport,
};
pub use progress::{
    HealthBenefits, MilestoneStatus, MoneySaved, NextMilestone, ProgressSnapshot, SmokeFreeTime,
};
pub use storage::{
    ExportBundle, RetryPolicy, RetryingStore, StorageGateway, StoreKey, WriteOutcome,
};
pub use timeline::{BadgeTier, HealthTimelineEntry, PROGRAM_LENGTH_DAYS};
