//! Progress metric derivation.
//!
//! Pure functions deriving smoke-free duration, money saved, cigarettes
//! avoided, the current program day and milestone/health-benefit
//! achievement from a quit instant and user profile. Every function has an
//! `_at` form taking an explicit `now` (the form tests use) and a
//! convenience form reading the wall clock. Nothing here touches storage;
//! the cached [`ProgressSnapshot`] persisted under the `progress` key is
//! assembled by [`compute_snapshot_at`] and is never a source of truth.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::model::{User, ValidationReport};
use crate::timeline::{health_timeline, BadgeTier, MILESTONE_DAYS, PROGRAM_LENGTH_DAYS};

const SECS_PER_DAY: i64 = 86_400;
const SECS_PER_HOUR: i64 = 3_600;
const MINS_PER_DAY: i64 = 1_440;

/// How many upcoming health benefits a snapshot carries.
const UPCOMING_BENEFITS: usize = 5;

/// Elapsed smoke-free duration, decomposed for display.
///
/// All components are zero when the quit date lies in the future; nothing
/// is ever negative.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SmokeFreeTime {
    pub days: i64,
    pub hours: i64,
    pub minutes: i64,
    pub seconds: i64,
    pub total_seconds: i64,
}

/// Money figures, floored to whole currency units for stable display.
///
/// `total` is the historical saving since the quit date; `daily` through
/// `yearly` are projections at the current daily rate and deliberately do
/// not reconcile with `total`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MoneySaved {
    pub daily: i64,
    pub weekly: i64,
    pub monthly: i64,
    pub yearly: i64,
    pub total: i64,
}

/// A health-timeline entry the user has reached.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AchievedBenefit {
    pub id: String,
    pub title: String,
    pub description: String,
    pub minutes_after_quit: i64,
    pub achieved_at: DateTime<Utc>,
}

/// A health-timeline entry still ahead.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpcomingBenefit {
    pub id: String,
    pub title: String,
    pub description: String,
    pub minutes_after_quit: i64,
    pub due_at: DateTime<Utc>,
}

/// Partition of the health timeline at the current instant.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthBenefits {
    pub achieved: Vec<AchievedBenefit>,
    /// The next few entries, at most 5.
    pub upcoming: Vec<UpcomingBenefit>,
}

/// The first unachieved health-timeline entry, with progress toward it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NextMilestone {
    pub id: String,
    pub title: String,
    pub description: String,
    pub minutes_after_quit: i64,
    /// 0..=100, measured from the previously achieved threshold.
    pub progress_pct: u8,
    pub remaining_days: i64,
    pub remaining_hours: i64,
    pub remaining_minutes: i64,
}

/// State of one badge milestone.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MilestoneStatus {
    pub day: u32,
    pub title: String,
    pub tier: BadgeTier,
    pub achieved: bool,
    /// The day-1-anchored date the badge is (or will be) earned.
    pub achieved_at: DateTime<Utc>,
}

/// Cached copy of what the calculator produces on demand.
///
/// Recomputed and overwritten periodically; single stored instance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgressSnapshot {
    pub smoke_free_time: SmokeFreeTime,
    pub money_saved: MoneySaved,
    pub cigarettes_not_smoked: i64,
    /// 1..=41.
    pub current_day: u32,
    pub milestones: Vec<MilestoneStatus>,
    pub health_benefits: HealthBenefits,
    pub last_updated: DateTime<Utc>,
}

impl ProgressSnapshot {
    pub fn validate(&self) -> ValidationReport {
        let mut report = ValidationReport::default();
        if !(1..=PROGRAM_LENGTH_DAYS).contains(&self.current_day) {
            report.push("বর্তমান দিন ১ থেকে ৪১ এর মধ্যে হতে হবে");
        }
        if self.smoke_free_time.total_seconds < 0 {
            report.push("ধূমপানমুক্ত সময় ঋণাত্মক হতে পারে না");
        }
        report
    }
}

/// Whole elapsed seconds since the quit instant, clamped at zero.
fn elapsed_seconds(quit_date: DateTime<Utc>, now: DateTime<Utc>) -> i64 {
    (now - quit_date).num_seconds().max(0)
}

/// Fractional days since the quit instant.
fn elapsed_days_f64(quit_date: DateTime<Utc>, now: DateTime<Utc>) -> f64 {
    elapsed_seconds(quit_date, now) as f64 / SECS_PER_DAY as f64
}

/// Cost of one day of smoking at the profile's rate.
///
/// A pack size of zero (rejected by validation, but reachable through a
/// hand-built profile) yields 0.0 rather than a division by zero.
fn daily_cost(user: &User) -> f64 {
    if user.cigarettes_per_pack == 0 {
        return 0.0;
    }
    f64::from(user.cigarettes_per_day) / f64::from(user.cigarettes_per_pack)
        * user.price_per_pack
}

pub fn smoke_free_time_at(quit_date: DateTime<Utc>, now: DateTime<Utc>) -> SmokeFreeTime {
    let total_seconds = elapsed_seconds(quit_date, now);
    SmokeFreeTime {
        days: total_seconds / SECS_PER_DAY,
        hours: (total_seconds % SECS_PER_DAY) / SECS_PER_HOUR,
        minutes: (total_seconds % SECS_PER_HOUR) / 60,
        seconds: total_seconds % 60,
        total_seconds,
    }
}

pub fn smoke_free_time(quit_date: DateTime<Utc>) -> SmokeFreeTime {
    smoke_free_time_at(quit_date, Utc::now())
}

pub fn money_saved_at(user: &User, now: DateTime<Utc>) -> MoneySaved {
    let rate = daily_cost(user);
    let days = elapsed_days_f64(user.quit_date, now);
    MoneySaved {
        daily: rate.floor() as i64,
        weekly: (rate * 7.0).floor() as i64,
        monthly: (rate * 30.0).floor() as i64,
        yearly: (rate * 365.0).floor() as i64,
        total: (rate * days).floor() as i64,
    }
}

pub fn money_saved(user: &User) -> MoneySaved {
    money_saved_at(user, Utc::now())
}

pub fn cigarettes_not_smoked_at(user: &User, now: DateTime<Utc>) -> i64 {
    (f64::from(user.cigarettes_per_day) * elapsed_days_f64(user.quit_date, now)).floor() as i64
}

pub fn cigarettes_not_smoked(user: &User) -> i64 {
    cigarettes_not_smoked_at(user, Utc::now())
}

/// Current program day. Day 1 is the quit day itself; capped at 41.
pub fn current_day_at(quit_date: DateTime<Utc>, now: DateTime<Utc>) -> u32 {
    let days = smoke_free_time_at(quit_date, now).days;
    (days + 1).min(i64::from(PROGRAM_LENGTH_DAYS)) as u32
}

pub fn current_day(quit_date: DateTime<Utc>) -> u32 {
    current_day_at(quit_date, Utc::now())
}

pub fn health_benefits_at(quit_date: DateTime<Utc>, now: DateTime<Utc>) -> HealthBenefits {
    let elapsed_minutes = elapsed_seconds(quit_date, now) / 60;
    let mut achieved = Vec::new();
    let mut upcoming = Vec::new();
    for entry in health_timeline() {
        if entry.minutes_after_quit <= elapsed_minutes {
            achieved.push(AchievedBenefit {
                id: entry.id.to_string(),
                title: entry.title.to_string(),
                description: entry.description.to_string(),
                minutes_after_quit: entry.minutes_after_quit,
                achieved_at: quit_date + Duration::minutes(entry.minutes_after_quit),
            });
        } else if upcoming.len() < UPCOMING_BENEFITS {
            upcoming.push(UpcomingBenefit {
                id: entry.id.to_string(),
                title: entry.title.to_string(),
                description: entry.description.to_string(),
                minutes_after_quit: entry.minutes_after_quit,
                due_at: quit_date + Duration::minutes(entry.minutes_after_quit),
            });
        }
    }
    HealthBenefits { achieved, upcoming }
}

pub fn health_benefits(quit_date: DateTime<Utc>) -> HealthBenefits {
    health_benefits_at(quit_date, Utc::now())
}

/// The first unachieved timeline entry, or `None` once the whole timeline
/// is behind the user.
pub fn next_milestone_at(quit_date: DateTime<Utc>, now: DateTime<Utc>) -> Option<NextMilestone> {
    let elapsed_minutes = elapsed_seconds(quit_date, now) / 60;
    let mut prev_threshold = 0i64;
    for entry in health_timeline() {
        if entry.minutes_after_quit <= elapsed_minutes {
            prev_threshold = entry.minutes_after_quit;
            continue;
        }
        let span = entry.minutes_after_quit - prev_threshold;
        let progress =
            ((elapsed_minutes - prev_threshold) as f64 / span as f64 * 100.0).round();
        let remaining = entry.minutes_after_quit - elapsed_minutes;
        return Some(NextMilestone {
            id: entry.id.to_string(),
            title: entry.title.to_string(),
            description: entry.description.to_string(),
            minutes_after_quit: entry.minutes_after_quit,
            progress_pct: progress.clamp(0.0, 100.0) as u8,
            remaining_days: remaining / MINS_PER_DAY,
            remaining_hours: (remaining % MINS_PER_DAY) / 60,
            remaining_minutes: remaining % 60,
        });
    }
    None
}

pub fn next_milestone(quit_date: DateTime<Utc>) -> Option<NextMilestone> {
    next_milestone_at(quit_date, Utc::now())
}

/// All seven badge milestones, ascending by day.
pub fn milestones_at(quit_date: DateTime<Utc>, now: DateTime<Utc>) -> Vec<MilestoneStatus> {
    let today = current_day_at(quit_date, now);
    MILESTONE_DAYS
        .iter()
        .map(|def| MilestoneStatus {
            day: def.day,
            title: def.title.to_string(),
            tier: def.tier,
            achieved: def.day <= today,
            achieved_at: quit_date + Duration::days(i64::from(def.day) - 1),
        })
        .collect()
}

pub fn milestones(quit_date: DateTime<Utc>) -> Vec<MilestoneStatus> {
    milestones_at(quit_date, Utc::now())
}

/// Assemble the cached snapshot callers persist under the `progress` key.
pub fn compute_snapshot_at(user: &User, now: DateTime<Utc>) -> ProgressSnapshot {
    ProgressSnapshot {
        smoke_free_time: smoke_free_time_at(user.quit_date, now),
        money_saved: money_saved_at(user, now),
        cigarettes_not_smoked: cigarettes_not_smoked_at(user, now),
        current_day: current_day_at(user.quit_date, now),
        milestones: milestones_at(user.quit_date, now),
        health_benefits: health_benefits_at(user.quit_date, now),
        last_updated: now,
    }
}

pub fn compute_snapshot(user: &User) -> ProgressSnapshot {
    compute_snapshot_at(user, Utc::now())
}
