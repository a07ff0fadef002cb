//! Runtime settings: schedule, alert thresholds, result labels
//!
//! Stored as a JSON file edited through the dashboard. Loading always
//! succeeds: a missing or unreadable file falls back to defaults so the
//! server can start on a fresh install. Consumers hold an immutable
//! snapshot (`Arc<Settings>`) and swap in a fresh one after writes.

use std::fs;
use std::path::Path;

use anyhow::Context;
use serde::{Deserialize, Serialize};
use tracing::warn;

/// Notification time slots, local market time, `HH:MM`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Schedule {
    pub morning: String,
    pub monitor: Vec<String>,
    pub evening: String,
}

impl Default for Schedule {
    fn default() -> Self {
        Self {
            morning: "08:30".to_string(),
            monitor: vec![
                "09:30".to_string(),
                "10:30".to_string(),
                "11:30".to_string(),
                "13:00".to_string(),
                "14:00".to_string(),
            ],
            evening: "15:00".to_string(),
        }
    }
}

/// Which schedule slot a given time belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Slot {
    Morning,
    Monitor,
    Evening,
}

impl Schedule {
    /// Match a `HH:MM` clock reading against the configured slots.
    pub fn slot_at(&self, hhmm: &str) -> Option<Slot> {
        if hhmm == self.morning {
            Some(Slot::Morning)
        } else if self.monitor.iter().any(|t| t == hhmm) {
            Some(Slot::Monitor)
        } else if hhmm == self.evening {
            Some(Slot::Evening)
        } else {
            None
        }
    }
}

/// Profit/loss alert thresholds in percent, both positive numbers.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Thresholds {
    pub loss_threshold: f64,
    pub gain_threshold: f64,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            loss_threshold: 5.0,
            gain_threshold: 10.0,
        }
    }
}

/// Outcome of a closed trade as recorded by the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Success,
    Failure,
}

/// Recognized `result` labels for performance analysis.
///
/// Journals imported from elsewhere may carry different wording, so the
/// label sets are configurable rather than hard-coded strings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResultLabels {
    pub success: Vec<String>,
    pub failure: Vec<String>,
}

impl Default for ResultLabels {
    fn default() -> Self {
        Self {
            success: vec!["success".to_string()],
            failure: vec!["failure".to_string()],
        }
    }
}

impl ResultLabels {
    pub fn classify(&self, label: &str) -> Option<Outcome> {
        if self.success.iter().any(|l| l == label) {
            Some(Outcome::Success)
        } else if self.failure.iter().any(|l| l == label) {
            Some(Outcome::Failure)
        } else {
            None
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub schedule: Schedule,
    pub thresholds: Thresholds,
    pub result_labels: ResultLabels,
    pub cache_ttl_secs: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            schedule: Schedule::default(),
            thresholds: Thresholds::default(),
            result_labels: ResultLabels::default(),
            cache_ttl_secs: 3600,
        }
    }
}

impl Settings {
    /// Read settings from `path`, falling back to defaults when the file
    /// is missing or does not parse.
    pub fn load(path: &Path) -> Self {
        match fs::read_to_string(path) {
            Ok(raw) => match serde_json::from_str(&raw) {
                Ok(settings) => settings,
                Err(err) => {
                    warn!("settings file {} is invalid ({}), using defaults", path.display(), err);
                    Settings::default()
                }
            },
            Err(_) => Settings::default(),
        }
    }

    pub fn save(&self, path: &Path) -> anyhow::Result<()> {
        let raw = serde_json::to_string_pretty(self)?;
        fs::write(path, raw)
            .with_context(|| format!("writing settings to {}", path.display()))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_dashboard_conventions() {
        let settings = Settings::default();
        assert_eq!(settings.schedule.morning, "08:30");
        assert_eq!(settings.schedule.monitor.len(), 5);
        assert_eq!(settings.thresholds.loss_threshold, 5.0);
        assert_eq!(settings.thresholds.gain_threshold, 10.0);
        assert_eq!(settings.cache_ttl_secs, 3600);
    }

    #[test]
    fn slot_matching() {
        let schedule = Schedule::default();
        assert_eq!(schedule.slot_at("08:30"), Some(Slot::Morning));
        assert_eq!(schedule.slot_at("10:30"), Some(Slot::Monitor));
        assert_eq!(schedule.slot_at("15:00"), Some(Slot::Evening));
        assert_eq!(schedule.slot_at("03:14"), None);
    }

    #[test]
    fn classify_respects_configured_labels() {
        let labels = ResultLabels {
            success: vec!["win".to_string(), "成功".to_string()],
            failure: vec!["loss".to_string()],
        };
        assert_eq!(labels.classify("win"), Some(Outcome::Success));
        assert_eq!(labels.classify("成功"), Some(Outcome::Success));
        assert_eq!(labels.classify("loss"), Some(Outcome::Failure));
        assert_eq!(labels.classify("meh"), None);
    }

    #[test]
    fn load_missing_file_gives_defaults() {
        let settings = Settings::load(Path::new("/nonexistent/settings.json"));
        assert_eq!(settings, Settings::default());
    }

    #[test]
    fn save_and_reload_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");

        let mut settings = Settings::default();
        settings.thresholds.gain_threshold = 12.5;
        settings.schedule.morning = "08:45".to_string();
        settings.save(&path).unwrap();

        let reloaded = Settings::load(&path);
        assert_eq!(reloaded, settings);
    }

    #[test]
    fn partial_file_fills_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        std::fs::write(&path, r#"{"thresholds": {"loss_threshold": 3.0}}"#).unwrap();

        let settings = Settings::load(&path);
        assert_eq!(settings.thresholds.loss_threshold, 3.0);
        assert_eq!(settings.thresholds.gain_threshold, 10.0);
        assert_eq!(settings.schedule, Schedule::default());
    }
}
