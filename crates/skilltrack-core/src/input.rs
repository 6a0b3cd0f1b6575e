//! JSON input loading and validation.
//!
//! The engine's callers hand it plain value objects; these helpers load them
//! from JSON files for tooling and tests. Errors are typed so callers can
//! distinguish a missing file from a malformed one without string matching.

use std::path::Path;

use thiserror::Error;

use crate::model::{AbilityState, MistakeRecord, PracticeEvent};

/// Errors loading engine inputs from disk.
#[derive(Debug, Error)]
pub enum InputError {
    /// The file could not be read.
    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// The file was read but is not valid JSON for the expected shape.
    #[error("malformed JSON in {path}: {source}")]
    Malformed {
        path: String,
        #[source]
        source: serde_json::Error,
    },
}

fn read(path: &Path) -> Result<String, InputError> {
    std::fs::read_to_string(path).map_err(|source| InputError::Io {
        path: path.display().to_string(),
        source,
    })
}

fn parse<T: serde::de::DeserializeOwned>(path: &Path, content: &str) -> Result<T, InputError> {
    serde_json::from_str(content).map_err(|source| InputError::Malformed {
        path: path.display().to_string(),
        source,
    })
}

/// Load an ability state from a JSON file.
pub fn load_state(path: &Path) -> Result<AbilityState, InputError> {
    parse(path, &read(path)?)
}

/// Load an ordered practice-event list from a JSON file.
pub fn load_events(path: &Path) -> Result<Vec<PracticeEvent>, InputError> {
    parse(path, &read(path)?)
}

/// Load mistake records from a JSON file.
pub fn load_mistakes(path: &Path) -> Result<Vec<MistakeRecord>, InputError> {
    parse(path, &read(path)?)
}

/// A non-fatal issue found while validating loaded events.
#[derive(Debug, Clone)]
pub struct ValidationWarning {
    /// Index of the offending event in the input list.
    pub index: usize,
    pub message: String,
}

/// Check loaded events for values the engine will normalize away.
///
/// Nothing here is fatal; the scoring engine clamps all of these. The
/// warnings exist so operators can spot bad upstream data.
pub fn validate_events(events: &[PracticeEvent]) -> Vec<ValidationWarning> {
    let mut warnings = Vec::new();
    for (index, event) in events.iter().enumerate() {
        if event.topic.trim().is_empty() {
            warnings.push(ValidationWarning {
                index,
                message: "empty topic, will score as vocabulary".into(),
            });
        }
        if !(0.0..=100.0).contains(&event.score) {
            warnings.push(ValidationWarning {
                index,
                message: format!("score {} outside [0, 100], will be clamped", event.score),
            });
        }
        if !(0.0..=1.0).contains(&event.correct_rate) {
            warnings.push(ValidationWarning {
                index,
                message: format!(
                    "correct_rate {} outside [0, 1], will be clamped",
                    event.correct_rate
                ),
            });
        }
        if event.time_spent_secs < 0.0 {
            warnings.push(ValidationWarning {
                index,
                message: format!(
                    "negative time_spent_secs {}, will be treated as unrecorded",
                    event.time_spent_secs
                ),
            });
        }
    }
    warnings
}
