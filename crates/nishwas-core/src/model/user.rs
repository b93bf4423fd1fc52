//! User profile entity.
//!
//! Created once at onboarding and updated via partial merge. The quit date
//! is the anchor for every derived metric in [`crate::progress`].

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{generate_id, ValidationReport};

/// The user's smoking profile and quit date.
///
/// Serialized camelCase so profiles written by earlier releases keep
/// loading.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    /// Instant the program timeline begins.
    pub quit_date: DateTime<Utc>,
    pub cigarettes_per_day: u32,
    pub price_per_pack: f64,
    pub cigarettes_per_pack: u32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Onboarding input for creating a profile.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub quit_date: DateTime<Utc>,
    pub cigarettes_per_day: u32,
    pub price_per_pack: f64,
    pub cigarettes_per_pack: u32,
}

/// Partial merge applied by `update_user`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserPatch {
    #[serde(default)]
    pub quit_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub cigarettes_per_day: Option<u32>,
    #[serde(default)]
    pub price_per_pack: Option<f64>,
    #[serde(default)]
    pub cigarettes_per_pack: Option<u32>,
}

impl User {
    pub fn create(input: NewUser) -> Self {
        let now = Utc::now();
        Self {
            id: generate_id(),
            quit_date: input.quit_date,
            cigarettes_per_day: input.cigarettes_per_day,
            price_per_pack: input.price_per_pack,
            cigarettes_per_pack: input.cigarettes_per_pack,
            created_at: now,
            updated_at: now,
        }
    }

    /// Merge a patch into this profile. Id and created_at never change.
    pub fn apply(&self, patch: &UserPatch) -> Self {
        Self {
            id: self.id.clone(),
            quit_date: patch.quit_date.unwrap_or(self.quit_date),
            cigarettes_per_day: patch.cigarettes_per_day.unwrap_or(self.cigarettes_per_day),
            price_per_pack: patch.price_per_pack.unwrap_or(self.price_per_pack),
            cigarettes_per_pack: patch.cigarettes_per_pack.unwrap_or(self.cigarettes_per_pack),
            created_at: self.created_at,
            updated_at: Utc::now(),
        }
    }

    pub fn validate(&self) -> ValidationReport {
        let mut report = ValidationReport::default();
        if !(self.price_per_pack > 0.0) || !self.price_per_pack.is_finite() {
            report.push("প্রতি প্যাকেটের দাম শূন্যের বেশি হতে হবে");
        }
        if self.cigarettes_per_pack == 0 {
            report.push("প্রতি প্যাকেটে সিগারেটের সংখ্যা শূন্যের বেশি হতে হবে");
        }
        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> NewUser {
        NewUser {
            quit_date: "2024-01-01T00:00:00Z".parse().unwrap(),
            cigarettes_per_day: 20,
            price_per_pack: 350.0,
            cigarettes_per_pack: 20,
        }
    }

    #[test]
    fn test_create_then_validate_roundtrip() {
        let user = User::create(sample());
        assert!(user.validate().is_valid());
        assert_eq!(user.created_at, user.updated_at);
    }

    #[test]
    fn test_zero_price_rejected() {
        let mut user = User::create(sample());
        user.price_per_pack = 0.0;
        let report = user.validate();
        assert!(!report.is_valid());
        assert_eq!(report.errors.len(), 1);
    }

    #[test]
    fn test_zero_pack_size_rejected() {
        let mut user = User::create(sample());
        user.cigarettes_per_pack = 0;
        assert!(!user.validate().is_valid());
    }

    #[test]
    fn test_apply_preserves_identity() {
        let user = User::create(sample());
        let patch = UserPatch {
            cigarettes_per_day: Some(15),
            ..Default::default()
        };
        let updated = user.apply(&patch);

        assert_eq!(updated.id, user.id);
        assert_eq!(updated.created_at, user.created_at);
        assert_eq!(updated.cigarettes_per_day, 15);
        assert_eq!(updated.quit_date, user.quit_date);
    }

    #[test]
    fn test_serializes_camel_case() {
        let user = User::create(sample());
        let json = serde_json::to_value(&user).unwrap();
        assert!(json.get("quitDate").is_some());
        assert!(json.get("cigarettesPerDay").is_some());
        assert!(json.get("quit_date").is_none());
    }
}
