#![forbid(unsafe_code)]

//! View configuration as data.
//!
//! [`ViewConfig`] groups every tunable of the proof view. Defaults match the
//! built-in behavior, so `ViewConfig::default()` changes nothing. With the
//! `config` feature it loads from TOML or JSON:
//!
//! ```toml
//! commit_policy = "recheck"
//! undo_tactic = "Undo"
//!
//! [gesture]
//! drag_threshold = 2
//!
//! [labels]
//! finished = "Proof complete."
//! ```
//!
//! Missing keys fall back to their defaults. [`ViewConfig::validate`]
//! reports every problem at once as human-readable strings.

#[cfg(feature = "config")]
use std::path::Path;
use std::time::Duration;

#[cfg(feature = "config")]
use serde::{Deserialize, Serialize};

use pdeck_core::gesture::GestureConfig;

// ---------------------------------------------------------------------------
// Top-level ViewConfig
// ---------------------------------------------------------------------------

/// Every tunable of a mounted proof view.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "config", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "config", serde(default))]
pub struct ViewConfig {
    pub gesture: GesturePolicy,
    pub commit_policy: CommitPolicy,
    pub labels: Labels,
    /// Tactic submitted by the undo shortcut.
    pub undo_tactic: String,
}

impl Default for ViewConfig {
    fn default() -> Self {
        Self {
            gesture: GesturePolicy::default(),
            commit_policy: CommitPolicy::default(),
            labels: Labels::default(),
            undo_tactic: "Undo".into(),
        }
    }
}

impl ViewConfig {
    /// Load from a TOML string.
    #[cfg(feature = "config")]
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        toml::from_str(s).map_err(ConfigError::Toml)
    }

    /// Load from a JSON string.
    #[cfg(feature = "config")]
    pub fn from_json_str(s: &str) -> Result<Self, ConfigError> {
        serde_json::from_str(s).map_err(ConfigError::Json)
    }

    /// Load from disk; `.json` files are parsed as JSON, anything else as
    /// TOML. The result is validated.
    #[cfg(feature = "config")]
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(ConfigError::Io)?;
        let is_json = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
        let config = if is_json {
            Self::from_json_str(&content)?
        } else {
            Self::from_toml_str(&content)?
        };
        config.validated()
    }

    /// Validate all parameters.
    ///
    /// An empty list means the config is valid.
    #[must_use]
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();

        if self.gesture.drag_threshold == 0 {
            errors.push("gesture.drag_threshold must be > 0".into());
        }
        if self.gesture.multi_click_timeout_ms == 0 {
            errors.push("gesture.multi_click_timeout_ms must be > 0".into());
        }
        if self.gesture.multi_click_timeout_ms > 5_000 {
            errors.push(format!(
                "gesture.multi_click_timeout_ms must be <= 5000, got {}",
                self.gesture.multi_click_timeout_ms
            ));
        }

        for (key, value) in [
            ("labels.loading", &self.labels.loading),
            ("labels.finished", &self.labels.finished),
            ("labels.exit", &self.labels.exit),
        ] {
            if value.trim().is_empty() {
                errors.push(format!("{key} must not be empty"));
            }
        }
        if self.labels.default_marker.chars().count() != 1 {
            errors.push(format!(
                "labels.default_marker must be a single character, got {:?}",
                self.labels.default_marker
            ));
        }

        if self.undo_tactic.trim().is_empty() {
            errors.push("undo_tactic must not be empty".into());
        }

        errors
    }

    /// `self` if valid, otherwise [`ConfigError::Validation`].
    pub fn validated(self) -> Result<Self, ConfigError> {
        let errors = self.validate();
        if errors.is_empty() {
            Ok(self)
        } else {
            Err(ConfigError::Validation(errors))
        }
    }

    /// Convert to the gesture recognizer's config.
    #[must_use]
    pub fn to_gesture_config(&self) -> GestureConfig {
        GestureConfig {
            multi_click_timeout: Duration::from_millis(self.gesture.multi_click_timeout_ms),
            drag_threshold: self.gesture.drag_threshold,
            click_tolerance: self.gesture.click_tolerance,
        }
    }
}

// ---------------------------------------------------------------------------
// Sub-configs
// ---------------------------------------------------------------------------

/// Gesture recognition thresholds.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "config", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "config", serde(default))]
pub struct GesturePolicy {
    /// Manhattan distance in cells before a press becomes a drag.
    pub drag_threshold: u16,
    pub multi_click_timeout_ms: u64,
    pub click_tolerance: u16,
}

impl Default for GesturePolicy {
    fn default() -> Self {
        let defaults = GestureConfig::default();
        Self {
            drag_threshold: defaults.drag_threshold,
            multi_click_timeout_ms: defaults.multi_click_timeout.as_millis() as u64,
            click_tolerance: defaults.click_tolerance,
        }
    }
}

/// Whether a drop re-runs the speculative check right before committing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "config", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "config", serde(rename_all = "snake_case"))]
pub enum CommitPolicy {
    /// Commit on the strength of the last hover check.
    #[default]
    TrustLastCheck,
    /// Check again on release and skip the commit if it now fails.
    Recheck,
}

/// Fixed label table.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "config", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "config", serde(default))]
pub struct Labels {
    pub loading: String,
    pub finished: String,
    pub exit: String,
    /// Prefix for the engine's default suggestion in menus.
    pub default_marker: String,
}

impl Default for Labels {
    fn default() -> Self {
        Self {
            loading: "Loading...".into(),
            finished: "No more subgoals.".into(),
            exit: "Exit".into(),
            default_marker: "★".into(),
        }
    }
}

// ---------------------------------------------------------------------------
// Error type
// ---------------------------------------------------------------------------

/// Errors that can occur when loading a view configuration.
#[derive(Debug)]
pub enum ConfigError {
    /// I/O error reading a file.
    Io(std::io::Error),
    #[cfg(feature = "config")]
    Toml(toml::de::Error),
    #[cfg(feature = "config")]
    Json(serde_json::Error),
    Validation(Vec<String>),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io(e) => write!(f, "I/O error: {e}"),
            #[cfg(feature = "config")]
            Self::Toml(e) => write!(f, "TOML parse error: {e}"),
            #[cfg(feature = "config")]
            Self::Json(e) => write!(f, "JSON parse error: {e}"),
            Self::Validation(errors) => {
                write!(f, "validation errors: {}", errors.join("; "))
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            #[cfg(feature = "config")]
            Self::Toml(e) => Some(e),
            #[cfg(feature = "config")]
            Self::Json(e) => Some(e),
            Self::Validation(_) => None,
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
