use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::ViewMode;

/// Default debounce window for auto-saves.
pub const DEFAULT_AUTOSAVE_DELAY: Duration = Duration::from_millis(2000);

/// Default pause between an auto-advancing answer and the move to the next question.
pub const DEFAULT_ADVANCE_DELAY: Duration = Duration::from_millis(500);

/// Timing and presentation settings of a response session.
///
/// Durations are written as integer milliseconds:
///
/// ```
/// use questionnaire_sync::{SyncConfig, ViewMode};
///
/// let config: SyncConfig = serde_json::from_str(
///     r#"{"autosave_delay_ms": 1000, "view_mode": "full_view"}"#,
/// ).unwrap();
///
/// assert_eq!(config.autosave_delay.as_millis(), 1000);
/// assert_eq!(config.advance_delay.as_millis(), 500);
/// assert_eq!(config.view_mode, ViewMode::FullView);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SyncConfig {
    /// How long edits must settle before they are auto-saved.
    #[serde(rename = "autosave_delay_ms", with = "millis")]
    pub autosave_delay: Duration,

    /// How long an auto-advancing answer stays visible before moving on.
    #[serde(rename = "advance_delay_ms", with = "millis")]
    pub advance_delay: Duration,

    /// How questions are shown when the session opens.
    pub view_mode: ViewMode,
}

impl SyncConfig {
    /// Create a configuration with the default timings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the auto-save debounce window.
    pub fn with_autosave_delay(mut self, delay: Duration) -> Self {
        self.autosave_delay = delay;
        self
    }

    /// Set the auto-advance pause.
    pub fn with_advance_delay(mut self, delay: Duration) -> Self {
        self.advance_delay = delay;
        self
    }

    /// Set the initial view mode.
    pub fn with_view_mode(mut self, view_mode: ViewMode) -> Self {
        self.view_mode = view_mode;
        self
    }
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            autosave_delay: DEFAULT_AUTOSAVE_DELAY,
            advance_delay: DEFAULT_ADVANCE_DELAY,
            view_mode: ViewMode::default(),
        }
    }
}

mod millis {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u64(u64::try_from(duration.as_millis()).unwrap_or(u64::MAX))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        u64::deserialize(deserializer).map(Duration::from_millis)
    }
}
