//! Ability snapshots with JSON persistence and progress comparison.
//!
//! A snapshot captures a learner's full ability state at a point in time,
//! together with the change log that produced it. Diffing two snapshots of
//! the same learner surfaces regressions and improvements over time.

use std::path::Path;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::model::{Ability, AbilityState};
use crate::scoring::AbilityChange;

/// A point-in-time capture of a learner's ability state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AbilitySnapshot {
    /// Unique snapshot identifier.
    pub id: Uuid,
    /// When the snapshot was taken.
    pub created_at: DateTime<Utc>,
    /// Learner label (opaque to this core).
    pub learner: String,
    /// The ability scores at capture time.
    pub state: AbilityState,
    /// Changes applied since the previous snapshot, newest last.
    #[serde(default)]
    pub changes: Vec<AbilityChange>,
}

impl AbilitySnapshot {
    /// Capture the current state with a fresh id and timestamp.
    pub fn capture(learner: &str, state: AbilityState, changes: Vec<AbilityChange>) -> Self {
        Self {
            id: Uuid::new_v4(),
            created_at: Utc::now(),
            learner: learner.to_string(),
            state,
            changes,
        }
    }

    /// Save the snapshot as JSON to a file.
    pub fn save_json(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self).context("failed to serialize snapshot")?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, json)
            .with_context(|| format!("failed to write snapshot to {}", path.display()))?;
        Ok(())
    }

    /// Load a snapshot from a JSON file.
    pub fn load_json(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read snapshot from {}", path.display()))?;
        let snapshot: AbilitySnapshot =
            serde_json::from_str(&content).context("failed to parse snapshot JSON")?;
        Ok(snapshot)
    }

    /// Compare this snapshot against an earlier baseline.
    ///
    /// Abilities that moved more than `threshold` points in either direction
    /// are reported as regressions or improvements; abilities tracked only in
    /// the newer snapshot are counted but not diffed.
    pub fn compare(&self, baseline: &AbilitySnapshot, threshold: f64) -> ProgressReport {
        let mut regressions = Vec::new();
        let mut improvements = Vec::new();
        let mut unchanged = 0usize;
        let mut newly_tracked = 0usize;

        for (ability, current) in self.state.iter() {
            let tracked_before = baseline.state.iter().any(|(a, _)| a == ability);
            if !tracked_before {
                newly_tracked += 1;
                continue;
            }
            let before = baseline.state.get(ability);
            let delta = current - before;
            if delta < -threshold {
                regressions.push(AbilityShift {
                    ability,
                    baseline_score: before,
                    current_score: current,
                    delta,
                });
            } else if delta > threshold {
                improvements.push(AbilityShift {
                    ability,
                    baseline_score: before,
                    current_score: current,
                    delta,
                });
            } else {
                unchanged += 1;
            }
        }

        ProgressReport {
            regressions,
            improvements,
            unchanged,
            newly_tracked,
        }
    }
}

/// One ability's movement between two snapshots.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AbilityShift {
    pub ability: Ability,
    pub baseline_score: f64,
    pub current_score: f64,
    pub delta: f64,
}

/// Result of comparing two snapshots.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProgressReport {
    /// Abilities that dropped beyond the threshold.
    pub regressions: Vec<AbilityShift>,
    /// Abilities that rose beyond the threshold.
    pub improvements: Vec<AbilityShift>,
    /// Abilities with no significant movement.
    pub unchanged: usize,
    /// Abilities tracked in the current snapshot but not the baseline.
    pub newly_tracked: usize,
}

impl ProgressReport {
    /// Format the report as markdown.
    pub fn to_markdown(&self) -> String {
        let mut md = String::new();

        md.push_str(&format!(
            "**Summary:** {} regressions, {} improvements, {} unchanged\n\n",
            self.regressions.len(),
            self.improvements.len(),
            self.unchanged
        ));

        if !self.regressions.is_empty() {
            md.push_str("### Regressions\n\n");
            md.push_str("| Ability | Baseline | Current | Delta |\n");
            md.push_str("|---------|----------|---------|-------|\n");
            for shift in &self.regressions {
                md.push_str(&format!(
                    "| {} | {:.1} | {:.1} | {:.1} |\n",
                    shift.ability, shift.baseline_score, shift.current_score, shift.delta
                ));
            }
            md.push('\n');
        }

        if !self.improvements.is_empty() {
            md.push_str("### Improvements\n\n");
            md.push_str("| Ability | Baseline | Current | Delta |\n");
            md.push_str("|---------|----------|---------|-------|\n");
            for shift in &self.improvements {
                md.push_str(&format!(
                    "| {} | {:.1} | {:.1} | +{:.1} |\n",
                    shift.ability, shift.baseline_score, shift.current_score, shift.delta
                ));
            }
        }

        md
    }

    /// Returns true if any ability regressed.
    pub fn has_regressions(&self) -> bool {
        !self.regressions.is_empty()
    }
}
