//! Bounded retry decoration for storage calls.
//!
//! Wraps a [`StorageGateway`] so transient storage failures (a locked
//! database, a failed write) are retried with linear backoff before the
//! failure is surfaced as a classified [`AppError`]. Validation rejections
//! are data, not failures, and pass through un-retried.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use crate::error::{AppError, CoreError, Result};
use crate::model::{
    CravingLog, JournalEntry, JournalEntryPatch, Settings, SettingsPatch, TaskCompletion, User,
    UserPatch,
};
use crate::progress::ProgressSnapshot;
use crate::storage::{ExportBundle, StorageGateway, StoreKey, WriteOutcome};

/// Retry schedule: `base_delay * attempt` between attempts.
#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub base_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_delay: Duration::from_millis(250),
        }
    }
}

impl RetryPolicy {
    fn delay_for(&self, attempt: u32) -> Duration {
        self.base_delay * attempt
    }
}

/// Deterministic failures (corrupt JSON, bad import version) are not worth
/// a second attempt.
fn is_retryable(err: &CoreError) -> bool {
    matches!(err, CoreError::Storage(_) | CoreError::Io(_))
}

/// Run a fallible async operation under the policy.
pub async fn retry<T, F, Fut>(policy: &RetryPolicy, mut op: F) -> Result<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T>>,
{
    let mut attempt = 1u32;
    loop {
        match op().await {
            Ok(value) => return Ok(value),
            Err(err) if attempt < policy.max_attempts && is_retryable(&err) => {
                tracing::warn!(attempt, error = %err, "storage operation failed, retrying");
                tokio::time::sleep(policy.delay_for(attempt)).await;
                attempt += 1;
            }
            Err(err) => return Err(err),
        }
    }
}

/// A [`StorageGateway`] decorated with bounded retry and error
/// classification. This is the surface handed to UI and notification code.
pub struct RetryingStore {
    store: Arc<StorageGateway>,
    policy: RetryPolicy,
}

impl RetryingStore {
    pub fn new(store: Arc<StorageGateway>) -> Self {
        Self::with_policy(store, RetryPolicy::default())
    }

    pub fn with_policy(store: Arc<StorageGateway>, policy: RetryPolicy) -> Self {
        Self { store, policy }
    }

    async fn run<T, F, Fut>(&self, op: F) -> Result<T, AppError>
    where
        F: Fn(Arc<StorageGateway>) -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        let store = Arc::clone(&self.store);
        retry(&self.policy, move || op(Arc::clone(&store)))
            .await
            .map_err(|err| {
                let app = AppError::classify(&err);
                tracing::warn!(kind = ?app.kind, "storage operation failed after retries: {err}");
                app
            })
    }

    pub async fn get_user(&self) -> Result<Option<User>, AppError> {
        self.run(|s| async move { s.get_user().await }).await
    }

    pub async fn save_user(&self, user: &User) -> Result<WriteOutcome, AppError> {
        let user = user.clone();
        self.run(move |s| {
            let user = user.clone();
            async move { s.save_user(&user).await }
        })
        .await
    }

    pub async fn update_user(&self, patch: &UserPatch) -> Result<Option<WriteOutcome>, AppError> {
        let patch = patch.clone();
        self.run(move |s| {
            let patch = patch.clone();
            async move { s.update_user(&patch).await }
        })
        .await
    }

    pub async fn get_progress(&self) -> Result<Option<ProgressSnapshot>, AppError> {
        self.run(|s| async move { s.get_progress().await }).await
    }

    pub async fn save_progress(
        &self,
        snapshot: &ProgressSnapshot,
    ) -> Result<WriteOutcome, AppError> {
        let snapshot = snapshot.clone();
        self.run(move |s| {
            let snapshot = snapshot.clone();
            async move { s.save_progress(&snapshot).await }
        })
        .await
    }

    pub async fn update_progress(&self, user: &User) -> Result<ProgressSnapshot, AppError> {
        let user = user.clone();
        self.run(move |s| {
            let user = user.clone();
            async move { s.update_progress(&user).await }
        })
        .await
    }

    pub async fn get_settings(&self) -> Result<Settings, AppError> {
        self.run(|s| async move { s.get_settings().await }).await
    }

    pub async fn save_settings(&self, settings: &Settings) -> Result<WriteOutcome, AppError> {
        let settings = settings.clone();
        self.run(move |s| {
            let settings = settings.clone();
            async move { s.save_settings(&settings).await }
        })
        .await
    }

    pub async fn update_settings(&self, patch: &SettingsPatch) -> Result<WriteOutcome, AppError> {
        let patch = patch.clone();
        self.run(move |s| {
            let patch = patch.clone();
            async move { s.update_settings(&patch).await }
        })
        .await
    }

    pub async fn get_journal_entries(&self) -> Result<Vec<JournalEntry>, AppError> {
        self.run(|s| async move { s.get_journal_entries().await })
            .await
    }

    pub async fn get_journal_entry(&self, id: &str) -> Result<Option<JournalEntry>, AppError> {
        let id = id.to_string();
        self.run(move |s| {
            let id = id.clone();
            async move { s.get_journal_entry(&id).await }
        })
        .await
    }

    pub async fn save_journal_entry(&self, entry: &JournalEntry) -> Result<WriteOutcome, AppError> {
        let entry = entry.clone();
        self.run(move |s| {
            let entry = entry.clone();
            async move { s.save_journal_entry(&entry).await }
        })
        .await
    }

    pub async fn update_journal_entry(
        &self,
        id: &str,
        patch: &JournalEntryPatch,
    ) -> Result<Option<WriteOutcome>, AppError> {
        let id = id.to_string();
        let patch = patch.clone();
        self.run(move |s| {
            let id = id.clone();
            let patch = patch.clone();
            async move { s.update_journal_entry(&id, &patch).await }
        })
        .await
    }

    pub async fn delete_journal_entry(&self, id: &str) -> Result<bool, AppError> {
        let id = id.to_string();
        self.run(move |s| {
            let id = id.clone();
            async move { s.delete_journal_entry(&id).await }
        })
        .await
    }

    pub async fn get_craving_logs(&self) -> Result<Vec<CravingLog>, AppError> {
        self.run(|s| async move { s.get_craving_logs().await }).await
    }

    pub async fn save_craving_log(&self, log: &CravingLog) -> Result<WriteOutcome, AppError> {
        let log = log.clone();
        self.run(move |s| {
            let log = log.clone();
            async move { s.save_craving_log(&log).await }
        })
        .await
    }

    pub async fn get_task_completions(
        &self,
        day: Option<u32>,
    ) -> Result<Vec<TaskCompletion>, AppError> {
        self.run(move |s| async move { s.get_task_completions(day).await })
            .await
    }

    pub async fn save_task_completion(
        &self,
        task: &TaskCompletion,
    ) -> Result<WriteOutcome, AppError> {
        let task = task.clone();
        self.run(move |s| {
            let task = task.clone();
            async move { s.save_task_completion(&task).await }
        })
        .await
    }

    pub async fn export_all(&self) -> Result<ExportBundle, AppError> {
        self.run(|s| async move { s.export_all().await }).await
    }

    pub async fn import_all(&self, bundle: &ExportBundle) -> Result<(), AppError> {
        let bundle = bundle.clone();
        self.run(move |s| {
            let bundle = bundle.clone();
            async move { s.import_all(&bundle).await }
        })
        .await
    }

    pub async fn clear_all(&self) -> Result<(), AppError> {
        self.run(|s| async move { s.clear_all().await }).await
    }

    pub async fn delete_key(&self, key: StoreKey) -> Result<(), AppError> {
        self.run(move |s| async move { s.delete_key(key).await })
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{ErrorKind, StorageError};
    use std::sync::atomic::{AtomicU32, Ordering};

    fn fast_policy() -> RetryPolicy {
        RetryPolicy {
            max_attempts: 3,
            base_delay: Duration::from_millis(1),
        }
    }

    #[tokio::test]
    async fn test_retry_succeeds_after_transient_failures() {
        let attempts = AtomicU32::new(0);
        let result = retry(&fast_policy(), || {
            let n = attempts.fetch_add(1, Ordering::SeqCst);
            async move {
                if n < 2 {
                    Err(CoreError::Storage(StorageError::Locked))
                } else {
                    Ok(42)
                }
            }
        })
        .await;
        assert_eq!(result.unwrap(), 42);
        assert_eq!(attempts.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_retry_gives_up_after_max_attempts() {
        let attempts = AtomicU32::new(0);
        let result: Result<()> = retry(&fast_policy(), || {
            attempts.fetch_add(1, Ordering::SeqCst);
            async { Err(CoreError::Storage(StorageError::Locked)) }
        })
        .await;
        assert!(result.is_err());
        assert_eq!(attempts.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_non_retryable_error_fails_fast() {
        let attempts = AtomicU32::new(0);
        let result: Result<()> = retry(&fast_policy(), || {
            attempts.fetch_add(1, Ordering::SeqCst);
            async { Err(CoreError::Custom("deterministic".into())) }
        })
        .await;
        assert!(result.is_err());
        assert_eq!(attempts.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_wrapper_passes_operations_through() {
        let store = Arc::new(StorageGateway::open_memory().unwrap());
        let wrapped = RetryingStore::with_policy(Arc::clone(&store), fast_policy());

        let user = User::create(crate::model::NewUser {
            quit_date: "2024-01-01T00:00:00Z".parse().unwrap(),
            cigarettes_per_day: 20,
            price_per_pack: 350.0,
            cigarettes_per_pack: 20,
        });
        assert!(wrapped.save_user(&user).await.unwrap().is_saved());
        assert_eq!(wrapped.get_user().await.unwrap().unwrap(), user);
    }

    #[tokio::test]
    async fn test_wrapper_does_not_retry_validation_rejections() {
        let store = Arc::new(StorageGateway::open_memory().unwrap());
        let wrapped = RetryingStore::with_policy(Arc::clone(&store), fast_policy());

        let mut user = User::create(crate::model::NewUser {
            quit_date: "2024-01-01T00:00:00Z".parse().unwrap(),
            cigarettes_per_day: 20,
            price_per_pack: 350.0,
            cigarettes_per_pack: 20,
        });
        user.price_per_pack = 0.0;

        // A rejection is a successful call carrying the report.
        let outcome = wrapped.save_user(&user).await.unwrap();
        assert!(!outcome.is_saved());
        assert!(wrapped.get_user().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_import_version_error_classified_as_validation() {
        let store = Arc::new(StorageGateway::open_memory().unwrap());
        let wrapped = RetryingStore::with_policy(Arc::clone(&store), fast_policy());

        let mut bundle = store.export_all().await.unwrap();
        bundle.version = "9.0".into();
        let err = wrapped.import_all(&bundle).await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::Validation);
    }
}
