//! Core data model types for skilltrack.
//!
//! These are the fundamental value types the scoring engine, insight
//! detector, and review scheduler all operate on. Everything here is a plain
//! serializable value object; the engine holds no state of its own.
//!
//! Input normalization happens once, at this boundary: unknown difficulty or
//! status labels fall back to documented defaults instead of failing, and
//! out-of-range numerics are clamped. The engine is advisory and must never
//! reject an event the completion pipeline hands it.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

/// Lowest score an ability can hold.
pub const ABILITY_MIN: f64 = 0.0;
/// Highest score an ability can hold.
pub const ABILITY_MAX: f64 = 100.0;
/// Score assumed for an ability that has never been diagnosed.
pub const ABILITY_BASELINE: f64 = 50.0;

/// One named, independently-scored skill dimension.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Ability {
    Listening,
    Reading,
    Speaking,
    Writing,
    Grammar,
    Vocabulary,
}

impl Ability {
    /// All abilities, in canonical order.
    pub const ALL: [Ability; 6] = [
        Ability::Listening,
        Ability::Reading,
        Ability::Speaking,
        Ability::Writing,
        Ability::Grammar,
        Ability::Vocabulary,
    ];
}

impl fmt::Display for Ability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Ability::Listening => write!(f, "listening"),
            Ability::Reading => write!(f, "reading"),
            Ability::Speaking => write!(f, "speaking"),
            Ability::Writing => write!(f, "writing"),
            Ability::Grammar => write!(f, "grammar"),
            Ability::Vocabulary => write!(f, "vocabulary"),
        }
    }
}

impl FromStr for Ability {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "listening" | "听力" => Ok(Ability::Listening),
            "reading" | "阅读" => Ok(Ability::Reading),
            "speaking" | "口语" => Ok(Ability::Speaking),
            "writing" | "写作" => Ok(Ability::Writing),
            "grammar" | "语法" => Ok(Ability::Grammar),
            "vocabulary" | "词汇" | "单词" => Ok(Ability::Vocabulary),
            other => Err(format!("unknown ability: {other}")),
        }
    }
}

/// Resolve which ability a practice topic affects.
///
/// The lookup accepts English and Chinese topic labels. Unmapped topics
/// default to [`Ability::Vocabulary`].
pub fn ability_for_topic(topic: &str) -> Ability {
    topic.parse().unwrap_or(Ability::Vocabulary)
}

/// A learner's full set of current ability scores.
///
/// Values are always in `[0, 100]`; abilities never referenced read as the
/// baseline 50.0. Mutated only by the scoring engine.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AbilityState {
    scores: BTreeMap<Ability, f64>,
}

impl AbilityState {
    /// An empty state: every ability reads as the 50.0 baseline.
    pub fn new() -> Self {
        Self::default()
    }

    /// A state with every ability explicitly at the baseline, as created on
    /// first diagnosis.
    pub fn baseline() -> Self {
        let scores = Ability::ALL
            .iter()
            .map(|&a| (a, ABILITY_BASELINE))
            .collect();
        Self { scores }
    }

    /// Current score for an ability, defaulting to the baseline.
    pub fn get(&self, ability: Ability) -> f64 {
        self.scores.get(&ability).copied().unwrap_or(ABILITY_BASELINE)
    }

    /// Set an ability score, clamped into `[0, 100]`.
    pub fn set(&mut self, ability: Ability, value: f64) {
        self.scores
            .insert(ability, value.clamp(ABILITY_MIN, ABILITY_MAX));
    }

    /// Iterate over all explicitly tracked (ability, score) pairs.
    pub fn iter(&self) -> impl Iterator<Item = (Ability, f64)> + '_ {
        self.scores.iter().map(|(&a, &v)| (a, v))
    }

    /// Number of explicitly tracked abilities.
    pub fn len(&self) -> usize {
        self.scores.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scores.is_empty()
    }
}

/// Difficulty tier of a practice activity, ordered easiest to hardest.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Beginner,
    Basic,
    #[default]
    Intermediate,
    Advanced,
    Expert,
}

impl Difficulty {
    /// Weight applied to performance and delta computation.
    pub fn weight(self) -> f64 {
        match self {
            Difficulty::Beginner => 0.5,
            Difficulty::Basic => 0.75,
            Difficulty::Intermediate => 1.0,
            Difficulty::Advanced => 1.25,
            Difficulty::Expert => 1.5,
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Difficulty::Beginner => write!(f, "beginner"),
            Difficulty::Basic => write!(f, "basic"),
            Difficulty::Intermediate => write!(f, "intermediate"),
            Difficulty::Advanced => write!(f, "advanced"),
            Difficulty::Expert => write!(f, "expert"),
        }
    }
}

impl FromStr for Difficulty {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "beginner" => Ok(Difficulty::Beginner),
            "basic" | "elementary" => Ok(Difficulty::Basic),
            "intermediate" | "medium" => Ok(Difficulty::Intermediate),
            "advanced" => Ok(Difficulty::Advanced),
            "expert" => Ok(Difficulty::Expert),
            other => Err(format!("unknown difficulty: {other}")),
        }
    }
}

/// Deserialize a difficulty label, falling back to the default on unknown
/// values instead of failing.
fn difficulty_or_default<'de, D>(deserializer: D) -> Result<Difficulty, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    Ok(raw.parse().unwrap_or_else(|_| {
        tracing::warn!("unknown difficulty '{raw}', treating as intermediate");
        Difficulty::default()
    }))
}

/// An immutable record of one completed practice attempt.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PracticeEvent {
    /// Topic or subject label (resolved to an ability via
    /// [`ability_for_topic`]).
    pub topic: String,
    /// Difficulty tier of the activity.
    #[serde(default, deserialize_with = "difficulty_or_default")]
    pub difficulty: Difficulty,
    /// Numeric score, 0-100.
    pub score: f64,
    /// Fraction of answers correct, 0-1.
    pub correct_rate: f64,
    /// Time spent on the attempt, in seconds.
    #[serde(default)]
    pub time_spent_secs: f64,
    /// Length of the learner's consecutive-study-day streak, if tracked.
    #[serde(default)]
    pub streak_days: Option<u32>,
}

impl PracticeEvent {
    /// Clamp all numeric fields into their valid ranges.
    ///
    /// Out-of-range inputs are normalized rather than rejected; this engine
    /// must never block the completion pipeline it is called from.
    pub fn normalized(mut self) -> Self {
        if !(ABILITY_MIN..=ABILITY_MAX).contains(&self.score) || self.score.is_nan() {
            tracing::warn!(topic = %self.topic, score = self.score, "clamping out-of-range score");
            self.score = if self.score.is_nan() {
                0.0
            } else {
                self.score.clamp(ABILITY_MIN, ABILITY_MAX)
            };
        }
        if !(0.0..=1.0).contains(&self.correct_rate) || self.correct_rate.is_nan() {
            tracing::warn!(
                topic = %self.topic,
                correct_rate = self.correct_rate,
                "clamping out-of-range correct rate"
            );
            self.correct_rate = if self.correct_rate.is_nan() {
                0.0
            } else {
                self.correct_rate.clamp(0.0, 1.0)
            };
        }
        if self.time_spent_secs < 0.0 || self.time_spent_secs.is_nan() {
            self.time_spent_secs = 0.0;
        }
        self
    }
}

/// Lifecycle status of a tracked mistake.
///
/// Transitions to `Mastered` are decided by an external policy; this core
/// only reads the status.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MistakeStatus {
    #[default]
    Pending,
    Reviewing,
    Mastered,
    Ignored,
}

impl MistakeStatus {
    /// True for statuses that still participate in review scheduling.
    pub fn is_active(self) -> bool {
        matches!(self, MistakeStatus::Pending | MistakeStatus::Reviewing)
    }
}

impl fmt::Display for MistakeStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MistakeStatus::Pending => write!(f, "pending"),
            MistakeStatus::Reviewing => write!(f, "reviewing"),
            MistakeStatus::Mastered => write!(f, "mastered"),
            MistakeStatus::Ignored => write!(f, "ignored"),
        }
    }
}

impl FromStr for MistakeStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "pending" => Ok(MistakeStatus::Pending),
            "reviewing" => Ok(MistakeStatus::Reviewing),
            "mastered" => Ok(MistakeStatus::Mastered),
            "ignored" => Ok(MistakeStatus::Ignored),
            other => Err(format!("unknown mistake status: {other}")),
        }
    }
}

fn status_or_default<'de, D>(deserializer: D) -> Result<MistakeStatus, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    Ok(raw.parse().unwrap_or_else(|_| {
        tracing::warn!("unknown mistake status '{raw}', treating as pending");
        MistakeStatus::default()
    }))
}

/// One distinct missed question tracked for a learner.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MistakeRecord {
    /// Stable identifier for the missed question.
    pub id: String,
    /// The question text.
    pub question: String,
    /// The learner's wrong answer.
    pub wrong_answer: String,
    /// The correct answer.
    pub correct_answer: String,
    /// Category tag (e.g. "tense", "collocation").
    #[serde(default)]
    pub category: String,
    /// Topic label, same vocabulary as [`PracticeEvent::topic`].
    #[serde(default)]
    pub topic: String,
    /// How many times the question has been missed. Monotonically increasing.
    pub mistake_count: u32,
    /// How many times the learner has been shown and responded to this item.
    pub review_count: u32,
    /// When the question was first missed.
    pub first_mistaken_at: DateTime<Utc>,
    /// Most recent review, if any.
    #[serde(default)]
    pub last_reviewed_at: Option<DateTime<Utc>>,
    /// Lifecycle status.
    #[serde(default, deserialize_with = "status_or_default")]
    pub status: MistakeStatus,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ability_display_and_parse() {
        assert_eq!(Ability::Reading.to_string(), "reading");
        assert_eq!("grammar".parse::<Ability>().unwrap(), Ability::Grammar);
        assert_eq!("听力".parse::<Ability>().unwrap(), Ability::Listening);
        assert_eq!("口语".parse::<Ability>().unwrap(), Ability::Speaking);
        assert!("juggling".parse::<Ability>().is_err());
    }

    #[test]
    fn unmapped_topic_defaults_to_vocabulary() {
        assert_eq!(ability_for_topic("阅读"), Ability::Reading);
        assert_eq!(ability_for_topic("business idioms"), Ability::Vocabulary);
        assert_eq!(ability_for_topic(""), Ability::Vocabulary);
    }

    #[test]
    fn difficulty_ordering_and_weights() {
        assert!(Difficulty::Beginner < Difficulty::Basic);
        assert!(Difficulty::Advanced < Difficulty::Expert);
        assert_eq!(Difficulty::Beginner.weight(), 0.5);
        assert_eq!(Difficulty::Intermediate.weight(), 1.0);
        assert_eq!(Difficulty::Expert.weight(), 1.5);
    }

    #[test]
    fn unknown_difficulty_normalizes_to_intermediate() {
        let event: PracticeEvent = serde_json::from_str(
            r#"{"topic":"reading","difficulty":"legendary","score":80,"correct_rate":0.8}"#,
        )
        .unwrap();
        assert_eq!(event.difficulty, Difficulty::Intermediate);
    }

    #[test]
    fn unknown_status_normalizes_to_pending() {
        let json = r#"{
            "id": "q1",
            "question": "q",
            "wrong_answer": "a",
            "correct_answer": "b",
            "mistake_count": 1,
            "review_count": 0,
            "first_mistaken_at": "2026-01-01T00:00:00Z",
            "status": "archived"
        }"#;
        let record: MistakeRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.status, MistakeStatus::Pending);
    }

    #[test]
    fn state_defaults_and_clamps() {
        let mut state = AbilityState::new();
        assert_eq!(state.get(Ability::Grammar), 50.0);

        state.set(Ability::Grammar, 120.0);
        assert_eq!(state.get(Ability::Grammar), 100.0);
        state.set(Ability::Grammar, -5.0);
        assert_eq!(state.get(Ability::Grammar), 0.0);
    }

    #[test]
    fn baseline_covers_every_ability() {
        let state = AbilityState::baseline();
        assert_eq!(state.len(), Ability::ALL.len());
        for &a in &Ability::ALL {
            assert_eq!(state.get(a), 50.0);
        }
    }

    #[test]
    fn state_serde_roundtrip_uses_string_keys() {
        let mut state = AbilityState::new();
        state.set(Ability::Reading, 72.5);
        let json = serde_json::to_string(&state).unwrap();
        assert!(json.contains("\"reading\""));
        let back: AbilityState = serde_json::from_str(&json).unwrap();
        assert_eq!(back, state);
    }

    #[test]
    fn event_normalization_clamps_numerics() {
        let event = PracticeEvent {
            topic: "reading".into(),
            difficulty: Difficulty::Intermediate,
            score: 250.0,
            correct_rate: 1.7,
            time_spent_secs: -30.0,
            streak_days: None,
        }
        .normalized();
        assert_eq!(event.score, 100.0);
        assert_eq!(event.correct_rate, 1.0);
        assert_eq!(event.time_spent_secs, 0.0);
    }
}
