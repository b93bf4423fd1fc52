//! User preference settings.
//!
//! Stored as a single slot; every field carries a serde default so a blob
//! written by any earlier release deserializes with the gaps filled in.
//! Updated via section-level partial merge ([`SettingsPatch`]).

use serde::{Deserialize, Serialize};

use super::ValidationReport;

/// Display font size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FontSize {
    Small,
    Medium,
    Large,
}

/// Notification preferences.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationSettings {
    #[serde(default = "default_true")]
    pub enabled: bool,
    #[serde(default = "default_true")]
    pub daily_reminder: bool,
    /// Local wall-clock time, "HH:MM".
    #[serde(default = "default_reminder_time")]
    pub reminder_time: String,
    #[serde(default = "default_true")]
    pub milestone_alerts: bool,
}

/// Appearance preferences.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppearanceSettings {
    #[serde(default = "default_font_size")]
    pub font_size: FontSize,
    /// BCP 47 tag of the display language.
    #[serde(default = "default_language")]
    pub language: String,
}

/// Privacy preferences.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PrivacySettings {
    #[serde(default)]
    pub pin_enabled: bool,
    #[serde(default)]
    pub pin_code: Option<String>,
}

/// Someone to call from the SOS screen.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmergencyContact {
    pub name: String,
    pub phone: String,
    pub relation: String,
}

/// All user preferences, one stored slot.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Settings {
    #[serde(default)]
    pub notifications: NotificationSettings,
    #[serde(default)]
    pub appearance: AppearanceSettings,
    #[serde(default)]
    pub privacy: PrivacySettings,
    #[serde(default)]
    pub emergency_contacts: Vec<EmergencyContact>,
}

/// Section-level partial merge applied by `update_settings`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SettingsPatch {
    #[serde(default)]
    pub notifications: Option<NotificationSettings>,
    #[serde(default)]
    pub appearance: Option<AppearanceSettings>,
    #[serde(default)]
    pub privacy: Option<PrivacySettings>,
    #[serde(default)]
    pub emergency_contacts: Option<Vec<EmergencyContact>>,
}

// Default functions
fn default_true() -> bool {
    true
}
fn default_reminder_time() -> String {
    "09:00".into()
}
fn default_font_size() -> FontSize {
    FontSize::Medium
}
fn default_language() -> String {
    "bn".into()
}

impl Default for NotificationSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            daily_reminder: true,
            reminder_time: default_reminder_time(),
            milestone_alerts: true,
        }
    }
}

impl Default for AppearanceSettings {
    fn default() -> Self {
        Self {
            font_size: FontSize::Medium,
            language: default_language(),
        }
    }
}

fn is_valid_reminder_time(value: &str) -> bool {
    let Some((h, m)) = value.split_once(':') else {
        return false;
    };
    matches!(h.parse::<u32>(), Ok(h) if h < 24) && matches!(m.parse::<u32>(), Ok(m) if m < 60)
}

impl Settings {
    /// Merge a patch into these settings, section by section.
    pub fn apply(&self, patch: &SettingsPatch) -> Self {
        Self {
            notifications: patch
                .notifications
                .clone()
                .unwrap_or_else(|| self.notifications.clone()),
            appearance: patch
                .appearance
                .clone()
                .unwrap_or_else(|| self.appearance.clone()),
            privacy: patch.privacy.clone().unwrap_or_else(|| self.privacy.clone()),
            emergency_contacts: patch
                .emergency_contacts
                .clone()
                .unwrap_or_else(|| self.emergency_contacts.clone()),
        }
    }

    pub fn validate(&self) -> ValidationReport {
        let mut report = ValidationReport::default();
        if !is_valid_reminder_time(&self.notifications.reminder_time) {
            report.push("রিমাইন্ডারের সময় HH:MM ফরম্যাটে দিতে হবে");
        }
        if self.privacy.pin_enabled && self.privacy.pin_code.as_deref().unwrap_or("").is_empty() {
            report.push("পিন চালু করলে পিন কোড দিতে হবে");
        }
        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let settings = Settings::default();
        assert!(settings.validate().is_valid());
        assert_eq!(settings.appearance.font_size, FontSize::Medium);
        assert_eq!(settings.notifications.reminder_time, "09:00");
    }

    #[test]
    fn test_empty_blob_deserializes_with_defaults() {
        let settings: Settings = serde_json::from_str("{}").unwrap();
        assert_eq!(settings, Settings::default());
    }

    #[test]
    fn test_partial_blob_fills_missing_fields() {
        // An older release that only knew about notifications.enabled.
        let settings: Settings =
            serde_json::from_str(r#"{"notifications":{"enabled":false}}"#).unwrap();
        assert!(!settings.notifications.enabled);
        assert!(settings.notifications.daily_reminder);
        assert_eq!(settings.appearance.language, "bn");
    }

    #[test]
    fn test_unknown_fields_ignored() {
        let settings: Settings =
            serde_json::from_str(r#"{"futureFeature":{"x":1},"privacy":{"pinEnabled":false}}"#)
                .unwrap();
        assert!(!settings.privacy.pin_enabled);
    }

    #[test]
    fn test_pin_enabled_requires_code() {
        let mut settings = Settings::default();
        settings.privacy.pin_enabled = true;
        assert!(!settings.validate().is_valid());
        settings.privacy.pin_code = Some("1234".into());
        assert!(settings.validate().is_valid());
    }

    #[test]
    fn test_bad_reminder_time_rejected() {
        let mut settings = Settings::default();
        settings.notifications.reminder_time = "25:00".into();
        assert!(!settings.validate().is_valid());
        settings.notifications.reminder_time = "sokal".into();
        assert!(!settings.validate().is_valid());
        settings.notifications.reminder_time = "06:30".into();
        assert!(settings.validate().is_valid());
    }

    #[test]
    fn test_apply_merges_sections() {
        let settings = Settings::default();
        let patch = SettingsPatch {
            appearance: Some(AppearanceSettings {
                font_size: FontSize::Large,
                language: "bn".into(),
            }),
            ..Default::default()
        };
        let updated = settings.apply(&patch);
        assert_eq!(updated.appearance.font_size, FontSize::Large);
        assert_eq!(updated.notifications, settings.notifications);
    }
}
