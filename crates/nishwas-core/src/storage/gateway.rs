//! Validated key-value persistence over a single SQLite kv table.
//!
//! Each [`StoreKey`] owns exactly one JSON value: a single entity for
//! `user`/`progress`/`settings`, an array for the collections. Every write
//! validates the candidate first; a failed validation resolves to
//! [`WriteOutcome::Rejected`] and leaves the stored value untouched.
//!
//! The connection sits behind a `tokio::sync::Mutex` whose guard is held
//! across each full read-modify-write, so concurrent callers mutating the
//! same key are strictly ordered and cannot lose updates.

use std::path::{Path, PathBuf};

use chrono::Utc;
use rusqlite::{params, Connection, OptionalExtension};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tokio::sync::Mutex;

use super::export::{check_version, ExportBundle, ExportData, EXPORT_VERSION};
use crate::error::{Result, StorageError};
use crate::model::{
    CravingLog, JournalEntry, JournalEntryPatch, Settings, SettingsPatch, TaskCompletion, User,
    UserPatch, ValidationReport,
};
use crate::progress::{compute_snapshot_at, ProgressSnapshot};

/// The fixed set of namespaced storage keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreKey {
    User,
    Progress,
    Settings,
    Journal,
    Cravings,
    Tasks,
}

impl StoreKey {
    pub const ALL: [StoreKey; 6] = [
        StoreKey::User,
        StoreKey::Progress,
        StoreKey::Settings,
        StoreKey::Journal,
        StoreKey::Cravings,
        StoreKey::Tasks,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            StoreKey::User => "user",
            StoreKey::Progress => "progress",
            StoreKey::Settings => "settings",
            StoreKey::Journal => "journal",
            StoreKey::Cravings => "cravings",
            StoreKey::Tasks => "tasks",
        }
    }
}

/// Result of a validated write.
///
/// A rejection is data, not an error: the caller shows the report and the
/// stored state is unchanged.
#[derive(Debug, Clone, PartialEq)]
pub enum WriteOutcome {
    Saved,
    Rejected(ValidationReport),
}

impl WriteOutcome {
    pub fn is_saved(&self) -> bool {
        matches!(self, WriteOutcome::Saved)
    }
}

/// SQLite-backed storage for all persisted app state.
pub struct StorageGateway {
    conn: Mutex<Connection>,
}

impl StorageGateway {
    /// Open the database at `~/.config/nishwas/nishwas.db`.
    ///
    /// Creates the database file and schema if they don't exist.
    pub fn open() -> Result<Self, StorageError> {
        let path = super::data_dir()?.join("nishwas.db");
        Self::open_at(&path)
    }

    /// Open the database at an explicit path (used by tests and the host
    /// shell).
    pub fn open_at(path: &Path) -> Result<Self, StorageError> {
        let conn = Connection::open(path).map_err(|source| StorageError::OpenFailed {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_conn(conn)
    }

    /// Open an in-memory database (for tests).
    pub fn open_memory() -> Result<Self, StorageError> {
        let conn = Connection::open_in_memory().map_err(|source| StorageError::OpenFailed {
            path: PathBuf::from(":memory:"),
            source,
        })?;
        Self::from_conn(conn)
    }

    fn from_conn(conn: Connection) -> Result<Self, StorageError> {
        migrate(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    // === User ===

    pub async fn get_user(&self) -> Result<Option<User>> {
        let conn = self.conn.lock().await;
        read_slot(&conn, StoreKey::User)
    }

    pub async fn save_user(&self, user: &User) -> Result<WriteOutcome> {
        let report = user.validate();
        if !report.is_valid() {
            return Ok(WriteOutcome::Rejected(report));
        }
        let conn = self.conn.lock().await;
        write_slot(&conn, StoreKey::User, user)?;
        Ok(WriteOutcome::Saved)
    }

    /// Read-merge-write of the stored profile. `None` when no profile has
    /// been created yet.
    pub async fn update_user(&self, patch: &UserPatch) -> Result<Option<WriteOutcome>> {
        let conn = self.conn.lock().await;
        let Some(user) = read_slot::<User>(&conn, StoreKey::User)? else {
            return Ok(None);
        };
        let updated = user.apply(patch);
        let report = updated.validate();
        if !report.is_valid() {
            return Ok(Some(WriteOutcome::Rejected(report)));
        }
        write_slot(&conn, StoreKey::User, &updated)?;
        Ok(Some(WriteOutcome::Saved))
    }

    // === Progress snapshot ===

    pub async fn get_progress(&self) -> Result<Option<ProgressSnapshot>> {
        let conn = self.conn.lock().await;
        read_slot(&conn, StoreKey::Progress)
    }

    pub async fn save_progress(&self, snapshot: &ProgressSnapshot) -> Result<WriteOutcome> {
        let report = snapshot.validate();
        if !report.is_valid() {
            return Ok(WriteOutcome::Rejected(report));
        }
        let conn = self.conn.lock().await;
        write_slot(&conn, StoreKey::Progress, snapshot)?;
        Ok(WriteOutcome::Saved)
    }

    /// Recompute the snapshot from the profile and overwrite the cache.
    pub async fn update_progress(&self, user: &User) -> Result<ProgressSnapshot> {
        let snapshot = compute_snapshot_at(user, Utc::now());
        let conn = self.conn.lock().await;
        write_slot(&conn, StoreKey::Progress, &snapshot)?;
        Ok(snapshot)
    }

    // === Settings ===

    /// Stored settings, default-filled when nothing has been saved yet.
    pub async fn get_settings(&self) -> Result<Settings> {
        let conn = self.conn.lock().await;
        Ok(read_slot(&conn, StoreKey::Settings)?.unwrap_or_default())
    }

    pub async fn save_settings(&self, settings: &Settings) -> Result<WriteOutcome> {
        let report = settings.validate();
        if !report.is_valid() {
            return Ok(WriteOutcome::Rejected(report));
        }
        let conn = self.conn.lock().await;
        write_slot(&conn, StoreKey::Settings, settings)?;
        Ok(WriteOutcome::Saved)
    }

    pub async fn update_settings(&self, patch: &SettingsPatch) -> Result<WriteOutcome> {
        let conn = self.conn.lock().await;
        let current = read_slot::<Settings>(&conn, StoreKey::Settings)?.unwrap_or_default();
        let updated = current.apply(patch);
        let report = updated.validate();
        if !report.is_valid() {
            return Ok(WriteOutcome::Rejected(report));
        }
        write_slot(&conn, StoreKey::Settings, &updated)?;
        Ok(WriteOutcome::Saved)
    }

    // === Journal ===

    pub async fn get_journal_entries(&self) -> Result<Vec<JournalEntry>> {
        let conn = self.conn.lock().await;
        read_collection(&conn, StoreKey::Journal)
    }

    pub async fn get_journal_entry(&self, id: &str) -> Result<Option<JournalEntry>> {
        let conn = self.conn.lock().await;
        let entries: Vec<JournalEntry> = read_collection(&conn, StoreKey::Journal)?;
        Ok(entries.into_iter().find(|e| e.id == id))
    }

    /// Append a new entry, or replace the stored one with the same id.
    pub async fn save_journal_entry(&self, entry: &JournalEntry) -> Result<WriteOutcome> {
        let report = entry.validate();
        if !report.is_valid() {
            tracing::debug!(key = StoreKey::Journal.as_str(), "write rejected by validation");
            return Ok(WriteOutcome::Rejected(report));
        }
        let conn = self.conn.lock().await;
        let mut entries: Vec<JournalEntry> = read_collection(&conn, StoreKey::Journal)?;
        upsert_by_id(&mut entries, entry.clone(), |e| &e.id);
        write_slot(&conn, StoreKey::Journal, &entries)?;
        Ok(WriteOutcome::Saved)
    }

    /// Patch the stored entry with this id. `None` when no such entry
    /// exists.
    pub async fn update_journal_entry(
        &self,
        id: &str,
        patch: &JournalEntryPatch,
    ) -> Result<Option<WriteOutcome>> {
        let conn = self.conn.lock().await;
        let mut entries: Vec<JournalEntry> = read_collection(&conn, StoreKey::Journal)?;
        let Some(pos) = entries.iter().position(|e| e.id == id) else {
            return Ok(None);
        };
        let updated = entries[pos].apply(patch);
        let report = updated.validate();
        if !report.is_valid() {
            return Ok(Some(WriteOutcome::Rejected(report)));
        }
        entries[pos] = updated;
        write_slot(&conn, StoreKey::Journal, &entries)?;
        Ok(Some(WriteOutcome::Saved))
    }

    /// Remove the entry with this id; `false` when nothing matched.
    pub async fn delete_journal_entry(&self, id: &str) -> Result<bool> {
        let conn = self.conn.lock().await;
        let mut entries: Vec<JournalEntry> = read_collection(&conn, StoreKey::Journal)?;
        let before = entries.len();
        entries.retain(|e| e.id != id);
        if entries.len() == before {
            return Ok(false);
        }
        write_slot(&conn, StoreKey::Journal, &entries)?;
        Ok(true)
    }

    // === Craving logs ===

    pub async fn get_craving_logs(&self) -> Result<Vec<CravingLog>> {
        let conn = self.conn.lock().await;
        read_collection(&conn, StoreKey::Cravings)
    }

    pub async fn save_craving_log(&self, log: &CravingLog) -> Result<WriteOutcome> {
        let report = log.validate();
        if !report.is_valid() {
            tracing::debug!(key = StoreKey::Cravings.as_str(), "write rejected by validation");
            return Ok(WriteOutcome::Rejected(report));
        }
        let conn = self.conn.lock().await;
        let mut logs: Vec<CravingLog> = read_collection(&conn, StoreKey::Cravings)?;
        upsert_by_id(&mut logs, log.clone(), |l| &l.id);
        write_slot(&conn, StoreKey::Cravings, &logs)?;
        Ok(WriteOutcome::Saved)
    }

    // === Task completions ===

    /// All stored completions, or just one program day's.
    pub async fn get_task_completions(&self, day: Option<u32>) -> Result<Vec<TaskCompletion>> {
        let conn = self.conn.lock().await;
        let tasks: Vec<TaskCompletion> = read_collection(&conn, StoreKey::Tasks)?;
        Ok(match day {
            Some(day) => tasks.into_iter().filter(|t| t.day == day).collect(),
            None => tasks,
        })
    }

    pub async fn save_task_completion(&self, task: &TaskCompletion) -> Result<WriteOutcome> {
        let report = task.validate();
        if !report.is_valid() {
            return Ok(WriteOutcome::Rejected(report));
        }
        let conn = self.conn.lock().await;
        let mut tasks: Vec<TaskCompletion> = read_collection(&conn, StoreKey::Tasks)?;
        upsert_by_id(&mut tasks, task.clone(), |t| &t.id);
        write_slot(&conn, StoreKey::Tasks, &tasks)?;
        Ok(WriteOutcome::Saved)
    }

    // === Export / wipe ===

    pub async fn export_all(&self) -> Result<ExportBundle> {
        let conn = self.conn.lock().await;
        Ok(ExportBundle {
            version: EXPORT_VERSION.to_string(),
            export_date: Utc::now(),
            data: ExportData {
                user: read_slot(&conn, StoreKey::User)?,
                progress: read_slot(&conn, StoreKey::Progress)?,
                journal_entries: read_collection(&conn, StoreKey::Journal)?,
                craving_logs: read_collection(&conn, StoreKey::Cravings)?,
                task_completions: read_collection(&conn, StoreKey::Tasks)?,
                settings: read_slot(&conn, StoreKey::Settings)?,
            },
        })
    }

    /// Restore from an export bundle. Sections missing from the bundle
    /// leave their keys untouched; unknown extra fields were already
    /// dropped at deserialization.
    pub async fn import_all(&self, bundle: &ExportBundle) -> Result<()> {
        check_version(&bundle.version)?;
        let conn = self.conn.lock().await;
        if let Some(user) = &bundle.data.user {
            write_slot(&conn, StoreKey::User, user)?;
        }
        if let Some(progress) = &bundle.data.progress {
            write_slot(&conn, StoreKey::Progress, progress)?;
        }
        if let Some(settings) = &bundle.data.settings {
            write_slot(&conn, StoreKey::Settings, settings)?;
        }
        if !bundle.data.journal_entries.is_empty() {
            write_slot(&conn, StoreKey::Journal, &bundle.data.journal_entries)?;
        }
        if !bundle.data.craving_logs.is_empty() {
            write_slot(&conn, StoreKey::Cravings, &bundle.data.craving_logs)?;
        }
        if !bundle.data.task_completions.is_empty() {
            write_slot(&conn, StoreKey::Tasks, &bundle.data.task_completions)?;
        }
        Ok(())
    }

    /// Full data wipe.
    pub async fn clear_all(&self) -> Result<()> {
        let conn = self.conn.lock().await;
        conn.execute("DELETE FROM kv", [])
            .map_err(StorageError::from)?;
        Ok(())
    }

    /// Wipe a single key.
    pub async fn delete_key(&self, key: StoreKey) -> Result<()> {
        let conn = self.conn.lock().await;
        conn.execute("DELETE FROM kv WHERE key = ?1", params![key.as_str()])
            .map_err(StorageError::from)?;
        Ok(())
    }
}

fn migrate(conn: &Connection) -> Result<(), StorageError> {
    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS kv (
            key   TEXT PRIMARY KEY,
            value TEXT NOT NULL
        );",
    )?;
    Ok(())
}

fn get_raw(conn: &Connection, key: StoreKey) -> Result<Option<String>, StorageError> {
    conn.query_row(
        "SELECT value FROM kv WHERE key = ?1",
        params![key.as_str()],
        |row| row.get(0),
    )
    .optional()
    .map_err(StorageError::from)
}

fn read_slot<T: DeserializeOwned>(conn: &Connection, key: StoreKey) -> Result<Option<T>> {
    match get_raw(conn, key)? {
        Some(json) => Ok(Some(serde_json::from_str(&json)?)),
        None => Ok(None),
    }
}

fn read_collection<T: DeserializeOwned>(conn: &Connection, key: StoreKey) -> Result<Vec<T>> {
    Ok(read_slot(conn, key)?.unwrap_or_default())
}

fn write_slot<T: Serialize>(conn: &Connection, key: StoreKey, value: &T) -> Result<()> {
    let json = serde_json::to_string(value)?;
    conn.execute(
        "INSERT OR REPLACE INTO kv (key, value) VALUES (?1, ?2)",
        params![key.as_str(), json],
    )
    .map_err(StorageError::from)?;
    Ok(())
}

/// Replace the element with a matching id, or append.
fn upsert_by_id<T, F: Fn(&T) -> &String>(items: &mut Vec<T>, item: T, id_of: F) {
    match items.iter().position(|x| id_of(x) == id_of(&item)) {
        Some(pos) => items[pos] = item,
        None => items.push(item),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Mood, NewCravingLog, NewJournalEntry, NewTaskCompletion, NewUser, Trigger};

    fn sample_user() -> User {
        User::create(NewUser {
            quit_date: "2024-01-01T00:00:00Z".parse().unwrap(),
            cigarettes_per_day: 20,
            price_per_pack: 350.0,
            cigarettes_per_pack: 20,
        })
    }

    fn sample_entry(content: &str) -> JournalEntry {
        JournalEntry::create(NewJournalEntry {
            date: "2024-01-05T10:00:00Z".parse().unwrap(),
            content: content.to_string(),
            mood: Mood::Calm,
            triggers: vec![Trigger::Stress],
            craving_intensity: Some(4),
        })
    }

    #[tokio::test]
    async fn test_user_roundtrip() {
        let store = StorageGateway::open_memory().unwrap();
        assert!(store.get_user().await.unwrap().is_none());

        let user = sample_user();
        assert!(store.save_user(&user).await.unwrap().is_saved());
        assert_eq!(store.get_user().await.unwrap().unwrap(), user);
    }

    #[tokio::test]
    async fn test_invalid_user_rejected_and_store_unchanged() {
        let store = StorageGateway::open_memory().unwrap();
        let good = sample_user();
        store.save_user(&good).await.unwrap();

        let mut bad = sample_user();
        bad.price_per_pack = -1.0;
        let outcome = store.save_user(&bad).await.unwrap();
        assert!(!outcome.is_saved());
        assert_eq!(store.get_user().await.unwrap().unwrap(), good);
    }

    #[tokio::test]
    async fn test_update_user_merges() {
        let store = StorageGateway::open_memory().unwrap();
        assert!(store
            .update_user(&UserPatch::default())
            .await
            .unwrap()
            .is_none());

        let user = sample_user();
        store.save_user(&user).await.unwrap();
        let patch = UserPatch {
            cigarettes_per_day: Some(12),
            ..Default::default()
        };
        let outcome = store.update_user(&patch).await.unwrap().unwrap();
        assert!(outcome.is_saved());

        let stored = store.get_user().await.unwrap().unwrap();
        assert_eq!(stored.cigarettes_per_day, 12);
        assert_eq!(stored.id, user.id);
    }

    #[tokio::test]
    async fn test_blank_journal_entry_rejected_collection_unchanged() {
        let store = StorageGateway::open_memory().unwrap();
        store
            .save_journal_entry(&sample_entry("ভালো দিন"))
            .await
            .unwrap();

        let outcome = store.save_journal_entry(&sample_entry("   ")).await.unwrap();
        assert!(matches!(outcome, WriteOutcome::Rejected(ref r) if !r.errors.is_empty()));
        assert_eq!(store.get_journal_entries().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_journal_crud() {
        let store = StorageGateway::open_memory().unwrap();
        let entry = sample_entry("প্রথম");
        store.save_journal_entry(&entry).await.unwrap();
        store.save_journal_entry(&sample_entry("দ্বিতীয়")).await.unwrap();
        assert_eq!(store.get_journal_entries().await.unwrap().len(), 2);

        let fetched = store.get_journal_entry(&entry.id).await.unwrap().unwrap();
        assert_eq!(fetched.content, "প্রথম");

        let patch = JournalEntryPatch {
            content: Some("সম্পাদিত".into()),
            ..Default::default()
        };
        let outcome = store
            .update_journal_entry(&entry.id, &patch)
            .await
            .unwrap()
            .unwrap();
        assert!(outcome.is_saved());
        let fetched = store.get_journal_entry(&entry.id).await.unwrap().unwrap();
        assert_eq!(fetched.content, "সম্পাদিত");
        assert_eq!(fetched.created_at, entry.created_at);

        assert!(store.delete_journal_entry(&entry.id).await.unwrap());
        assert!(!store.delete_journal_entry(&entry.id).await.unwrap());
        assert_eq!(store.get_journal_entries().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_update_missing_journal_entry_is_none() {
        let store = StorageGateway::open_memory().unwrap();
        let patch = JournalEntryPatch::default();
        assert!(store
            .update_journal_entry("nope", &patch)
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn test_rejected_update_leaves_entry_intact() {
        let store = StorageGateway::open_memory().unwrap();
        let entry = sample_entry("অক্ষত");
        store.save_journal_entry(&entry).await.unwrap();

        let patch = JournalEntryPatch {
            content: Some("  ".into()),
            ..Default::default()
        };
        let outcome = store
            .update_journal_entry(&entry.id, &patch)
            .await
            .unwrap()
            .unwrap();
        assert!(!outcome.is_saved());
        let fetched = store.get_journal_entry(&entry.id).await.unwrap().unwrap();
        assert_eq!(fetched.content, "অক্ষত");
    }

    #[tokio::test]
    async fn test_craving_log_roundtrip() {
        let store = StorageGateway::open_memory().unwrap();
        let log = CravingLog::create(NewCravingLog {
            timestamp: "2024-01-05T21:00:00Z".parse().unwrap(),
            intensity: 8,
            triggers: vec![Trigger::Social],
            duration_minutes: Some(10),
            coping_strategy: None,
            overcome: false,
            notes: None,
        });
        assert!(store.save_craving_log(&log).await.unwrap().is_saved());
        assert_eq!(store.get_craving_logs().await.unwrap(), vec![log]);
    }

    #[tokio::test]
    async fn test_craving_log_without_triggers_rejected() {
        let store = StorageGateway::open_memory().unwrap();
        let log = CravingLog::create(NewCravingLog {
            timestamp: "2024-01-05T21:00:00Z".parse().unwrap(),
            intensity: 8,
            triggers: vec![],
            duration_minutes: None,
            coping_strategy: None,
            overcome: false,
            notes: None,
        });
        assert!(!store.save_craving_log(&log).await.unwrap().is_saved());
        assert!(store.get_craving_logs().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_task_completions_filtered_by_day() {
        let store = StorageGateway::open_memory().unwrap();
        let day3 = TaskCompletion::create(NewTaskCompletion {
            day: 3,
            title: "হাঁটা".into(),
            description: "".into(),
        });
        let day4 = TaskCompletion::create(NewTaskCompletion {
            day: 4,
            title: "পানি".into(),
            description: "".into(),
        });
        store.save_task_completion(&day3).await.unwrap();
        store.save_task_completion(&day4).await.unwrap();

        assert_eq!(store.get_task_completions(None).await.unwrap().len(), 2);
        let only3 = store.get_task_completions(Some(3)).await.unwrap();
        assert_eq!(only3.len(), 1);
        assert_eq!(only3[0].id, day3.id);
    }

    #[tokio::test]
    async fn test_task_toggle_upserts_in_place() {
        let store = StorageGateway::open_memory().unwrap();
        let task = TaskCompletion::create(NewTaskCompletion {
            day: 1,
            title: "নিয়ত".into(),
            description: "".into(),
        });
        store.save_task_completion(&task).await.unwrap();
        store.save_task_completion(&task.toggle()).await.unwrap();

        let stored = store.get_task_completions(Some(1)).await.unwrap();
        assert_eq!(stored.len(), 1);
        assert!(stored[0].completed);
    }

    #[tokio::test]
    async fn test_settings_default_then_update() {
        let store = StorageGateway::open_memory().unwrap();
        let settings = store.get_settings().await.unwrap();
        assert_eq!(settings, Settings::default());

        let patch = SettingsPatch {
            emergency_contacts: Some(vec![crate::model::EmergencyContact {
                name: "রহিম".into(),
                phone: "01700000000".into(),
                relation: "ভাই".into(),
            }]),
            ..Default::default()
        };
        assert!(store.update_settings(&patch).await.unwrap().is_saved());
        let stored = store.get_settings().await.unwrap();
        assert_eq!(stored.emergency_contacts.len(), 1);
    }

    #[tokio::test]
    async fn test_update_progress_writes_snapshot() {
        let store = StorageGateway::open_memory().unwrap();
        let user = sample_user();
        let snapshot = store.update_progress(&user).await.unwrap();
        assert!(snapshot.validate().is_valid());

        let stored = store.get_progress().await.unwrap().unwrap();
        assert_eq!(stored, snapshot);
    }

    #[tokio::test]
    async fn test_clear_all_and_delete_key() {
        let store = StorageGateway::open_memory().unwrap();
        store.save_user(&sample_user()).await.unwrap();
        store
            .save_journal_entry(&sample_entry("মুছে যাবে"))
            .await
            .unwrap();

        store.delete_key(StoreKey::Journal).await.unwrap();
        assert!(store.get_journal_entries().await.unwrap().is_empty());
        assert!(store.get_user().await.unwrap().is_some());

        store.clear_all().await.unwrap();
        assert!(store.get_user().await.unwrap().is_none());
    }
}
