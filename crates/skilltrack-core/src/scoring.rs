//! Ability scoring engine.
//!
//! Turns one completed practice event into a bounded movement of exactly one
//! ability score. The pipeline is `analyze` (pure read of the event) followed
//! by `apply_update` (moves the mapped ability and records what happened).
//!
//! The key invariant is the hard per-event cap: whatever the input, a single
//! event moves an ability by at most `±max_delta` (1.0 point at the default
//! learning rate), so no single attempt can destabilize a score.

use serde::{Deserialize, Serialize};

use crate::model::{
    ability_for_topic, Ability, AbilityState, Difficulty, PracticeEvent, ABILITY_MAX, ABILITY_MIN,
};

/// Performance level considered "neutral": events above it push the ability
/// up, events below pull it down.
const NEUTRAL_PERFORMANCE: f64 = 60.0;

/// Correct-rate pivot for the correctness sub-rule.
const CORRECT_RATE_PIVOT: f64 = 0.6;

/// Tunables for the scoring engine.
///
/// The defaults are the documented constants; overriding them is for
/// experimentation, not production.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoringConfig {
    /// Scales the performance-derived part of the delta.
    pub learning_rate: f64,
    /// Per-event delta cap, expressed as a multiple of the learning rate.
    pub max_delta_scale: f64,
    /// Nominal time budget for one attempt, in seconds. Attempts finished
    /// under it earn a 1.1x performance multiplier; attempts beyond twice it
    /// are discounted to 0.9x.
    pub time_budget_secs: f64,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            learning_rate: 0.1,
            max_delta_scale: 10.0,
            time_budget_secs: 600.0,
        }
    }
}

impl ScoringConfig {
    /// Largest ability movement a single event may cause.
    pub fn max_delta(&self) -> f64 {
        self.learning_rate * self.max_delta_scale
    }
}

/// Advisory classification of what the learner should focus on next.
///
/// Metadata only; never feeds back into the delta math.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImprovementFocus {
    /// Correct rate below 60%: accuracy first.
    Accuracy,
    /// Overall performance below 70: broad consolidation.
    Comprehensive,
    /// Correct rate above 90%: ready for harder material.
    Challenge,
    /// Nothing stands out.
    Maintain,
}

/// One sub-rule's contribution to the delta.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RuleScore {
    /// Stable rule name, for explainability and audit.
    pub rule: String,
    /// Signed contribution in ability points.
    pub points: f64,
}

/// Result of analyzing one practice event, before it touches any state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Analysis {
    /// The single ability this event affects.
    pub ability: Ability,
    /// Topic label the ability was resolved from.
    pub topic: String,
    /// Difficulty tier of the event.
    pub difficulty: Difficulty,
    /// Weighted performance score, 0-100.
    pub performance: f64,
    /// Advisory focus classification.
    pub focus: ImprovementFocus,
    /// Sub-rules that fired, with their contributions.
    pub rule_scores: Vec<RuleScore>,
}

/// Record of one ability movement, for explainability and audit.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AbilityChange {
    pub ability: Ability,
    pub old_value: f64,
    pub new_value: f64,
    /// Capped delta that was applied (before the [0,100] boundary clamp).
    pub delta: f64,
    /// Relative change in percent of the old value.
    pub percent_change: f64,
    /// Weighted performance score of the triggering event.
    pub performance: f64,
    /// Advisory focus classification of the triggering event.
    pub focus: ImprovementFocus,
    /// Names of the sub-rules that fired.
    pub fired_rules: Vec<String>,
}

// ---------------------------------------------------------------------------
// Sub-rules
//
// Each is a pure function of the event (plus fixed tunables), independent of
// all the others and of any learner state, so they can be unit-tested in
// isolation and evaluated in any order.
// ---------------------------------------------------------------------------

/// Bonus/penalty proportional to the distance from a 60% correct rate.
pub fn correctness_rule(event: &PracticeEvent) -> Option<RuleScore> {
    Some(RuleScore {
        rule: "correctness".into(),
        points: (event.correct_rate - CORRECT_RATE_PIVOT) * 0.5,
    })
}

/// Bonus for holding one's own on advanced or expert material.
pub fn difficulty_rule(event: &PracticeEvent) -> Option<RuleScore> {
    let points = match event.difficulty {
        Difficulty::Advanced if event.score >= 70.0 => 0.2,
        Difficulty::Expert if event.score >= 60.0 => 0.3,
        _ => return None,
    };
    Some(RuleScore {
        rule: "difficulty_challenge".into(),
        points,
    })
}

/// Bonus when score and correct rate are simultaneously high.
pub fn consistency_rule(event: &PracticeEvent) -> Option<RuleScore> {
    if event.score >= 80.0 && event.correct_rate >= 0.8 {
        Some(RuleScore {
            rule: "consistency".into(),
            points: 0.2,
        })
    } else {
        None
    }
}

/// Bonus for finishing fast without sacrificing accuracy.
pub fn time_efficiency_rule(event: &PracticeEvent, time_budget_secs: f64) -> Option<RuleScore> {
    if event.time_spent_secs > 0.0
        && event.time_spent_secs < time_budget_secs
        && event.correct_rate >= 0.7
    {
        Some(RuleScore {
            rule: "time_efficiency".into(),
            points: 0.1,
        })
    } else {
        None
    }
}

/// Bonus for consecutive-study-day streaks.
pub fn streak_rule(event: &PracticeEvent) -> Option<RuleScore> {
    let points = match event.streak_days {
        Some(days) if days >= 7 => 0.3,
        Some(days) if days >= 3 => 0.15,
        _ => return None,
    };
    Some(RuleScore {
        rule: "streak".into(),
        points,
    })
}

// ---------------------------------------------------------------------------
// Engine
// ---------------------------------------------------------------------------

/// The stateless scoring engine.
///
/// Holds only tunables; a single shared instance is safe to reuse across
/// threads with no synchronization.
#[derive(Debug, Clone, Default)]
pub struct ScoringEngine {
    config: ScoringConfig,
}

impl ScoringEngine {
    pub fn new(config: ScoringConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ScoringConfig {
        &self.config
    }

    /// Analyze one practice event: weighted performance, advisory focus,
    /// and the sub-rules that fire. Reads no learner state.
    pub fn analyze(&self, event: &PracticeEvent) -> Analysis {
        let event = event.clone().normalized();

        let base = (event.score + event.correct_rate * 100.0) / 2.0;
        let performance = (base * event.difficulty.weight() * self.time_multiplier(&event))
            .clamp(ABILITY_MIN, ABILITY_MAX);

        let focus = if event.correct_rate < 0.6 {
            ImprovementFocus::Accuracy
        } else if performance < 70.0 {
            ImprovementFocus::Comprehensive
        } else if event.correct_rate > 0.9 {
            ImprovementFocus::Challenge
        } else {
            ImprovementFocus::Maintain
        };

        let rule_scores: Vec<RuleScore> = [
            correctness_rule(&event),
            difficulty_rule(&event),
            consistency_rule(&event),
            time_efficiency_rule(&event, self.config.time_budget_secs),
            streak_rule(&event),
        ]
        .into_iter()
        .flatten()
        .collect();

        for rs in &rule_scores {
            tracing::debug!(rule = %rs.rule, points = rs.points, topic = %event.topic, "rule fired");
        }

        Analysis {
            ability: ability_for_topic(&event.topic),
            topic: event.topic,
            difficulty: event.difficulty,
            performance,
            focus,
            rule_scores,
        }
    }

    /// Apply an analysis to the ability state, moving exactly the one mapped
    /// ability by the capped delta.
    pub fn apply_update(&self, state: &mut AbilityState, analysis: &Analysis) -> AbilityChange {
        let max_delta = self.config.max_delta();
        let rule_sum: f64 = analysis.rule_scores.iter().map(|r| r.points).sum();
        let delta = ((analysis.performance - NEUTRAL_PERFORMANCE)
            * self.config.learning_rate
            * analysis.difficulty.weight()
            + rule_sum)
            .clamp(-max_delta, max_delta);

        let old_value = state.get(analysis.ability);
        state.set(analysis.ability, old_value + delta);
        let new_value = state.get(analysis.ability);

        let percent_change = if old_value.abs() < f64::EPSILON {
            0.0
        } else {
            (new_value - old_value) / old_value * 100.0
        };

        AbilityChange {
            ability: analysis.ability,
            old_value,
            new_value,
            delta,
            percent_change,
            performance: analysis.performance,
            focus: analysis.focus,
            fired_rules: analysis.rule_scores.iter().map(|r| r.rule.clone()).collect(),
        }
    }

    /// Fold an ordered event list into the state, one analyze+apply step at a
    /// time. Order matters: each step's delta depends on the running state.
    pub fn batch_update(
        &self,
        state: &mut AbilityState,
        events: &[PracticeEvent],
    ) -> Vec<AbilityChange> {
        events
            .iter()
            .map(|event| {
                let analysis = self.analyze(event);
                self.apply_update(state, &analysis)
            })
            .collect()
    }

    /// Performance multiplier for the time spent relative to the budget.
    /// Neutral when no time was recorded.
    fn time_multiplier(&self, event: &PracticeEvent) -> f64 {
        if event.time_spent_secs <= 0.0 {
            1.0
        } else if event.time_spent_secs < self.config.time_budget_secs {
            1.1
        } else if event.time_spent_secs <= self.config.time_budget_secs * 2.0 {
            1.0
        } else {
            0.9
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn event(topic: &str, difficulty: Difficulty, score: f64, correct_rate: f64) -> PracticeEvent {
        PracticeEvent {
            topic: topic.into(),
            difficulty,
            score,
            correct_rate,
            time_spent_secs: 300.0,
            streak_days: None,
        }
    }

    #[test]
    fn good_intermediate_session_raises_ability() {
        let engine = ScoringEngine::default();
        let mut state = AbilityState::new();
        state.set(Ability::Reading, 50.0);

        let analysis = engine.analyze(&event("reading", Difficulty::Intermediate, 85.0, 0.85));
        let change = engine.apply_update(&mut state, &analysis);

        assert_eq!(change.ability, Ability::Reading);
        assert!(change.delta > 0.0, "delta was {}", change.delta);
        assert!(change.delta <= 1.0);
        assert!(state.get(Ability::Reading) > 50.0);
    }

    #[test]
    fn poor_beginner_session_lowers_ability() {
        let engine = ScoringEngine::default();
        let mut state = AbilityState::new();

        let analysis = engine.analyze(&event("grammar", Difficulty::Beginner, 40.0, 0.40));
        let change = engine.apply_update(&mut state, &analysis);

        assert_eq!(change.ability, Ability::Grammar);
        assert!(change.delta < 0.0, "delta was {}", change.delta);
        assert!(state.get(Ability::Grammar) < 50.0);
    }

    #[test]
    fn delta_is_capped_for_extreme_inputs() {
        let engine = ScoringEngine::default();
        let max_delta = engine.config().max_delta();
        let mut state = AbilityState::new();

        for (score, rate, streak) in [
            (100.0, 1.0, Some(30)),
            (0.0, 0.0, None),
            (1000.0, 50.0, Some(u32::MAX)),
            (-500.0, -3.0, None),
        ] {
            let mut e = event("reading", Difficulty::Expert, score, rate);
            e.streak_days = streak;
            let analysis = engine.analyze(&e);
            let change = engine.apply_update(&mut state, &analysis);
            assert!(
                change.delta.abs() <= max_delta + f64::EPSILON,
                "delta {} out of cap for score={score} rate={rate}",
                change.delta
            );
        }
    }

    #[test]
    fn state_stays_in_bounds_at_the_edges() {
        let engine = ScoringEngine::default();

        let mut state = AbilityState::new();
        state.set(Ability::Writing, 100.0);
        let analysis = engine.analyze(&event("writing", Difficulty::Expert, 100.0, 1.0));
        engine.apply_update(&mut state, &analysis);
        assert_eq!(state.get(Ability::Writing), 100.0);

        let mut state = AbilityState::new();
        state.set(Ability::Writing, 0.0);
        let analysis = engine.analyze(&event("writing", Difficulty::Expert, 0.0, 0.0));
        engine.apply_update(&mut state, &analysis);
        assert_eq!(state.get(Ability::Writing), 0.0);
    }

    #[test]
    fn perfect_event_at_zero_still_moves_up() {
        let engine = ScoringEngine::default();
        let mut state = AbilityState::new();
        state.set(Ability::Reading, 0.0);

        let analysis = engine.analyze(&event("reading", Difficulty::Intermediate, 100.0, 1.0));
        let change = engine.apply_update(&mut state, &analysis);
        assert!(change.new_value > 0.0);
        assert!(change.delta <= 1.0);
    }

    #[test]
    fn unmapped_topic_falls_back_to_vocabulary() {
        let engine = ScoringEngine::default();
        let analysis = engine.analyze(&event("trivia night", Difficulty::Basic, 70.0, 0.7));
        assert_eq!(analysis.ability, Ability::Vocabulary);
    }

    #[test]
    fn focus_classification_branches() {
        let engine = ScoringEngine::default();

        let a = engine.analyze(&event("reading", Difficulty::Intermediate, 80.0, 0.5));
        assert_eq!(a.focus, ImprovementFocus::Accuracy);

        let a = engine.analyze(&event("reading", Difficulty::Beginner, 60.0, 0.65));
        assert_eq!(a.focus, ImprovementFocus::Comprehensive);

        let a = engine.analyze(&event("reading", Difficulty::Intermediate, 95.0, 0.95));
        assert_eq!(a.focus, ImprovementFocus::Challenge);

        let a = engine.analyze(&event("reading", Difficulty::Intermediate, 88.0, 0.85));
        assert_eq!(a.focus, ImprovementFocus::Maintain);
    }

    #[test]
    fn correctness_rule_is_signed() {
        let above = correctness_rule(&event("r", Difficulty::Intermediate, 80.0, 0.9)).unwrap();
        assert!(above.points > 0.0);
        let below = correctness_rule(&event("r", Difficulty::Intermediate, 40.0, 0.3)).unwrap();
        assert!(below.points < 0.0);
    }

    #[test]
    fn difficulty_rule_thresholds() {
        assert!(difficulty_rule(&event("r", Difficulty::Advanced, 75.0, 0.7)).is_some());
        assert!(difficulty_rule(&event("r", Difficulty::Advanced, 65.0, 0.7)).is_none());
        assert!(difficulty_rule(&event("r", Difficulty::Expert, 60.0, 0.6)).is_some());
        assert!(difficulty_rule(&event("r", Difficulty::Intermediate, 95.0, 0.95)).is_none());
    }

    #[test]
    fn consistency_rule_requires_both_high() {
        assert!(consistency_rule(&event("r", Difficulty::Basic, 85.0, 0.85)).is_some());
        assert!(consistency_rule(&event("r", Difficulty::Basic, 85.0, 0.7)).is_none());
        assert!(consistency_rule(&event("r", Difficulty::Basic, 70.0, 0.9)).is_none());
    }

    #[test]
    fn time_efficiency_rule_needs_speed_and_accuracy() {
        let fast_accurate = event("r", Difficulty::Basic, 80.0, 0.8);
        assert!(time_efficiency_rule(&fast_accurate, 600.0).is_some());

        let mut slow = fast_accurate.clone();
        slow.time_spent_secs = 900.0;
        assert!(time_efficiency_rule(&slow, 600.0).is_none());

        let mut untimed = fast_accurate.clone();
        untimed.time_spent_secs = 0.0;
        assert!(time_efficiency_rule(&untimed, 600.0).is_none());

        let mut sloppy = fast_accurate;
        sloppy.correct_rate = 0.5;
        assert!(time_efficiency_rule(&sloppy, 600.0).is_none());
    }

    #[test]
    fn streak_rule_tiers() {
        let mut e = event("r", Difficulty::Basic, 70.0, 0.7);
        assert!(streak_rule(&e).is_none());

        e.streak_days = Some(2);
        assert!(streak_rule(&e).is_none());

        e.streak_days = Some(3);
        assert_eq!(streak_rule(&e).unwrap().points, 0.15);

        e.streak_days = Some(7);
        assert_eq!(streak_rule(&e).unwrap().points, 0.3);
    }

    #[test]
    fn time_multiplier_tiers() {
        let engine = ScoringEngine::default();
        let mut e = event("r", Difficulty::Intermediate, 80.0, 0.8);

        e.time_spent_secs = 0.0;
        assert_eq!(engine.time_multiplier(&e), 1.0);
        e.time_spent_secs = 300.0;
        assert_eq!(engine.time_multiplier(&e), 1.1);
        e.time_spent_secs = 900.0;
        assert_eq!(engine.time_multiplier(&e), 1.0);
        e.time_spent_secs = 2000.0;
        assert_eq!(engine.time_multiplier(&e), 0.9);
    }

    #[test]
    fn batch_update_is_order_dependent() {
        let engine = ScoringEngine::default();
        let strong = event("reading", Difficulty::Advanced, 95.0, 0.95);
        let weak = event("reading", Difficulty::Beginner, 30.0, 0.3);

        let mut forward = AbilityState::new();
        let forward_changes = engine.batch_update(&mut forward, &[strong.clone(), weak.clone()]);

        let mut backward = AbilityState::new();
        engine.batch_update(&mut backward, &[weak, strong]);

        assert_eq!(forward_changes.len(), 2);
        // Both orders apply the same deltas here, but each change's old value
        // must chain off the previous step's result.
        assert_eq!(
            forward_changes[1].old_value,
            forward_changes[0].new_value
        );
    }

    #[test]
    fn change_log_names_fired_rules() {
        let engine = ScoringEngine::default();
        let mut state = AbilityState::new();
        let mut e = event("listening", Difficulty::Expert, 90.0, 0.9);
        e.streak_days = Some(10);

        let analysis = engine.analyze(&e);
        let change = engine.apply_update(&mut state, &analysis);

        for rule in ["correctness", "difficulty_challenge", "consistency", "streak"] {
            assert!(
                change.fired_rules.iter().any(|r| r == rule),
                "missing rule {rule} in {:?}",
                change.fired_rules
            );
        }
    }
}
