//! Weak point and anomaly detection.
//!
//! Two independent read-only queries over the ability state and a bounded
//! window of recent practice history. Both produce advisory flags; neither
//! mutates anything, and callers decide what to do with the output.

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};

use crate::model::{AbilityState, Difficulty, PracticeEvent};

/// Ability scores below this are considered weak.
const WEAK_SCORE_THRESHOLD: f64 = 60.0;
/// Weak abilities below this are escalated to high priority.
const CRITICAL_SCORE_THRESHOLD: f64 = 40.0;
/// History window for topic-level weakness grouping.
const TOPIC_WINDOW: usize = 10;
/// Minimum samples before a topic's mean correct rate is trusted.
const TOPIC_MIN_SAMPLES: usize = 3;
/// History window for the score-drop baseline.
const DROP_WINDOW: usize = 5;
/// Score-drop size that triggers an anomaly.
const DROP_THRESHOLD: f64 = 30.0;
/// Attempts finished faster than this (seconds) look like guessing.
const TOO_FAST_SECS: f64 = 10.0;

/// How urgently a weak point should be addressed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Medium,
    High,
}

/// Whether a weak point names an ability or a practice topic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WeakPointKind {
    Ability,
    Topic,
}

/// One flagged knowledge area.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeakPoint {
    pub kind: WeakPointKind,
    /// Ability name or topic label.
    pub name: String,
    /// Current ability score, or mean correct rate scaled to 0-100 for
    /// topic-level flags.
    pub current_level: f64,
    /// Human-readable explanation.
    pub reason: String,
    pub priority: Priority,
    /// Stable name of the rule that fired.
    pub rule: String,
}

/// Flag weak abilities and weak recent topics.
///
/// Abilities scoring below 60 are flagged (high priority below 40). On top of
/// that, the last 10 history events are grouped by topic: any topic with at
/// least 3 samples and a mean correct rate under 60% is flagged high priority
/// regardless of the ability score. The result is deduplicated by name.
pub fn identify_weak_points(state: &AbilityState, history: &[PracticeEvent]) -> Vec<WeakPoint> {
    let mut seen: HashSet<String> = HashSet::new();
    let mut weak_points = Vec::new();

    for (ability, score) in state.iter() {
        if score >= WEAK_SCORE_THRESHOLD {
            continue;
        }
        let priority = if score < CRITICAL_SCORE_THRESHOLD {
            Priority::High
        } else {
            Priority::Medium
        };
        let name = ability.to_string();
        if seen.insert(name.clone()) {
            weak_points.push(WeakPoint {
                kind: WeakPointKind::Ability,
                current_level: score,
                reason: format!("{ability} score {score:.1} is below {WEAK_SCORE_THRESHOLD:.0}"),
                priority,
                rule: "low_ability_score".into(),
                name,
            });
        }
    }

    let recent: Vec<&PracticeEvent> = history
        .iter()
        .rev()
        .take(TOPIC_WINDOW)
        .collect();
    let mut by_topic: HashMap<&str, Vec<f64>> = HashMap::new();
    for event in recent {
        by_topic
            .entry(event.topic.as_str())
            .or_default()
            .push(event.correct_rate);
    }

    let mut topics: Vec<(&str, Vec<f64>)> = by_topic.into_iter().collect();
    topics.sort_by_key(|(topic, _)| topic.to_string());
    for (topic, rates) in topics {
        if rates.len() < TOPIC_MIN_SAMPLES {
            continue;
        }
        let mean = rates.iter().sum::<f64>() / rates.len() as f64;
        if mean >= 0.6 {
            continue;
        }
        if seen.insert(topic.to_string()) {
            weak_points.push(WeakPoint {
                kind: WeakPointKind::Topic,
                name: topic.to_string(),
                current_level: mean * 100.0,
                reason: format!(
                    "mean correct rate {:.0}% over the last {} attempts at '{topic}'",
                    mean * 100.0,
                    rates.len()
                ),
                priority: Priority::High,
                rule: "low_topic_correct_rate".into(),
            });
        }
    }

    weak_points
}

/// How serious an anomaly is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Low,
    Medium,
    High,
}

/// Classification of a single-result anomaly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnomalyKind {
    ScoreDrop,
    NoTimeRecord,
    TooFast,
    SuspiciousPerformance,
}

/// One anomalous individual result.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Anomaly {
    pub kind: AnomalyKind,
    pub severity: Severity,
    /// Human-readable explanation.
    pub detail: String,
    /// What the caller should do about it.
    pub suggestion: String,
}

/// Check one result against the learner's recent history for anomalies.
///
/// Each rule is independent; all matches are returned, not just the first.
pub fn detect_anomalies(event: &PracticeEvent, recent_history: &[PracticeEvent]) -> Vec<Anomaly> {
    let mut anomalies = Vec::new();

    let recent_scores: Vec<f64> = recent_history
        .iter()
        .rev()
        .take(DROP_WINDOW)
        .map(|e| e.score)
        .collect();
    if !recent_scores.is_empty() {
        let mean = recent_scores.iter().sum::<f64>() / recent_scores.len() as f64;
        if mean - event.score > DROP_THRESHOLD {
            anomalies.push(Anomaly {
                kind: AnomalyKind::ScoreDrop,
                severity: Severity::High,
                detail: format!(
                    "score {:.1} is {:.1} points below the recent mean {:.1}",
                    event.score,
                    mean - event.score,
                    mean
                ),
                suggestion: "review recent material before continuing".into(),
            });
        }
    }

    if event.time_spent_secs <= 0.0 {
        anomalies.push(Anomaly {
            kind: AnomalyKind::NoTimeRecord,
            severity: Severity::Low,
            detail: "no time was recorded for this attempt".into(),
            suggestion: "safe to ignore".into(),
        });
    } else if event.time_spent_secs < TOO_FAST_SECS {
        anomalies.push(Anomaly {
            kind: AnomalyKind::TooFast,
            severity: Severity::Medium,
            detail: format!(
                "finished in {:.0}s, under the {TOO_FAST_SECS:.0}s plausibility floor",
                event.time_spent_secs
            ),
            suggestion: "suggest retaking the exercise".into(),
        });
    }

    if event.correct_rate >= 1.0
        && matches!(event.difficulty, Difficulty::Advanced | Difficulty::Expert)
    {
        anomalies.push(Anomaly {
            kind: AnomalyKind::SuspiciousPerformance,
            severity: Severity::Medium,
            detail: format!(
                "perfect correct rate on {} difficulty",
                event.difficulty
            ),
            suggestion: "flag for manual review".into(),
        });
    }

    anomalies
}
