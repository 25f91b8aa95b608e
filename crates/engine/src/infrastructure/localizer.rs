//! JSON-file localizer.

use std::collections::HashMap;
use std::path::Path;

use chrono::FixedOffset;

use crate::infrastructure::ports::LocalizerPort;

/// Labels used by the filter dialog when no locale file overrides them.
const BUILTIN_STRINGS: &[(&str, &str)] = &[
    ("filter_hide", "Hide"),
    ("filter_show", "Show"),
    ("filter_small", "Small"),
    ("filter_normal", "Normal"),
    ("filter_large", "Large"),
    ("filter_huge", "Huge"),
];

#[derive(Debug, thiserror::Error)]
pub enum LocaleError {
    #[error("Failed to read locale file {path}: {message}")]
    Io { path: String, message: String },
    #[error("Locale file {path} is not a JSON object of strings: {message}")]
    Parse { path: String, message: String },
}

/// Key/value strings loaded once at startup, plus the display time zone.
pub struct JsonLocalizer {
    strings: HashMap<String, String>,
    time_zone: FixedOffset,
}

impl JsonLocalizer {
    /// Built-in labels only.
    pub fn builtin(time_zone: FixedOffset) -> Self {
        let strings = BUILTIN_STRINGS
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Self { strings, time_zone }
    }

    /// Built-in labels overlaid with the contents of `path`.
    pub fn from_file(path: &Path, time_zone: FixedOffset) -> Result<Self, LocaleError> {
        let display = path.display().to_string();
        let raw = std::fs::read_to_string(path).map_err(|e| LocaleError::Io {
            path: display.clone(),
            message: e.to_string(),
        })?;
        let overrides: HashMap<String, String> =
            serde_json::from_str(&raw).map_err(|e| LocaleError::Parse {
                path: display.clone(),
                message: e.to_string(),
            })?;

        let mut localizer = Self::builtin(time_zone);
        tracing::info!(path = %path.display(), keys = overrides.len(), "Loaded locale file");
        localizer.strings.extend(overrides);
        Ok(localizer)
    }
}

impl LocalizerPort for JsonLocalizer {
    fn get(&self, key: &str) -> String {
        self.strings
            .get(key)
            .cloned()
            .unwrap_or_else(|| key.to_string())
    }

    fn time_zone(&self) -> FixedOffset {
        self.time_zone
    }
}
