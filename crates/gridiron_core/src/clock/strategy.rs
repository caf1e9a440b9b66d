//! ClockStrategyEngine
//!
//! ```text
//! elapsed = clamp(
//!     base(timing class)
//!   + archetype base adjustment
//!   + archetype play modifier
//!   + shared situational adjustments
//!   + archetype situational override,
//!   min, max)
//! ```

use serde::{Deserialize, Serialize};
use tracing::trace;

use super::archetype::CoachingArchetype;
use super::timing::{SituationalAdjustments, TimingClass};
use crate::config::ClockConfig;
use crate::models::{CompletionStatus, GameContext, PlayType};

/// Elapsed-time strategy of one coordinator
pub trait ClockStrategy: Send + Sync {
    fn archetype(&self) -> CoachingArchetype;

    /// Seconds the play consumes; always inside the configured bound
    fn elapsed_seconds(&self, play_type: PlayType, ctx: &GameContext, completion: CompletionStatus) -> u32;
}

/// Every term of one elapsed-time computation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClockComputation {
    pub archetype: CoachingArchetype,
    pub timing_class: TimingClass,
    pub base_seconds: i32,
    pub archetype_adjustment: i32,
    pub play_modifier: i32,
    pub situational: SituationalAdjustments,
    pub archetype_override: i32,
    /// Sum before clamping
    pub raw_seconds: i32,
    pub elapsed_seconds: u32,
}

impl ClockComputation {
    pub fn was_clamped(&self) -> bool {
        i64::from(self.raw_seconds) != i64::from(self.elapsed_seconds)
    }
}

#[derive(Debug, Clone, Default)]
pub struct ClockStrategyEngine {
    config: ClockConfig,
}

impl ClockStrategyEngine {
    pub fn new(config: ClockConfig) -> Self {
        Self { config: config.normalized() }
    }

    pub fn config(&self) -> &ClockConfig {
        &self.config
    }

    pub fn compute(
        &self,
        archetype: CoachingArchetype,
        play_type: PlayType,
        ctx: &GameContext,
        completion: CompletionStatus,
    ) -> ClockComputation {
        let timing_class = TimingClass::classify(play_type, completion);
        let base_seconds = timing_class.base_seconds(&self.config);
        let archetype_adjustment = archetype.base_adjustment();
        let play_modifier = archetype.play_modifier(timing_class);
        let situational = SituationalAdjustments::evaluate(ctx);
        let archetype_override = archetype.situational_override(timing_class, ctx);

        let raw_seconds = base_seconds
            .saturating_add(archetype_adjustment)
            .saturating_add(play_modifier)
            .saturating_add(situational.total())
            .saturating_add(archetype_override);
        let elapsed_seconds = self.config.clamp(raw_seconds);

        trace!(
            archetype = archetype.as_str(),
            play_type = play_type.as_str(),
            raw_seconds,
            elapsed_seconds,
            "clock computed"
        );

        ClockComputation {
            archetype,
            timing_class,
            base_seconds,
            archetype_adjustment,
            play_modifier,
            situational,
            archetype_override,
            raw_seconds,
            elapsed_seconds,
        }
    }

    pub fn elapsed_seconds(
        &self,
        archetype: CoachingArchetype,
        play_type: PlayType,
        ctx: &GameContext,
        completion: CompletionStatus,
    ) -> u32 {
        self.compute(archetype, play_type, ctx, completion).elapsed_seconds
    }

    /// Strategy bound to one archetype
    pub fn strategy(&self, archetype: CoachingArchetype) -> ArchetypeClock<'_> {
        ArchetypeClock { engine: self, archetype }
    }
}

/// `ClockStrategy` for a single archetype, borrowing the engine's config
#[derive(Debug, Clone, Copy)]
pub struct ArchetypeClock<'a> {
    engine: &'a ClockStrategyEngine,
    archetype: CoachingArchetype,
}

impl ClockStrategy for ArchetypeClock<'_> {
    fn archetype(&self) -> CoachingArchetype {
        self.archetype
    }

    fn elapsed_seconds(&self, play_type: PlayType, ctx: &GameContext, completion: CompletionStatus) -> u32 {
        self.engine.elapsed_seconds(self.archetype, play_type, ctx, completion)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn ctx() -> GameContext {
        GameContext::new("DEN", "LV").with_possession("DEN").with_field_position(40)
    }

    #[test]
    fn test_balanced_run_in_neutral_situation() {
        let engine = ClockStrategyEngine::default();
        let c = engine.compute(CoachingArchetype::Balanced, PlayType::Run, &ctx(), CompletionStatus::NotApplicable);
        assert_eq!(c.base_seconds, 28);
        assert_eq!(c.raw_seconds, 28);
        assert_eq!(c.elapsed_seconds, 28);
        assert!(!c.was_clamped());
    }

    #[test]
    fn test_incomplete_pass_uses_short_base() {
        let engine = ClockStrategyEngine::default();
        let secs = engine.elapsed_seconds(CoachingArchetype::Balanced, PlayType::Pass, &ctx(), CompletionStatus::Incomplete);
        assert_eq!(secs, 6);
    }

    #[test]
    fn test_archetype_terms_add_up() {
        let engine = ClockStrategyEngine::default();
        // Conservative run: 28 + 4 + 3
        let c = engine.compute(CoachingArchetype::Conservative, PlayType::Run, &ctx(), CompletionStatus::NotApplicable);
        assert_eq!(c.elapsed_seconds, 35);
        // Air raid complete pass: 24 - 3 - 2
        let c = engine.compute(CoachingArchetype::AirRaid, PlayType::Pass, &ctx(), CompletionStatus::Complete);
        assert_eq!(c.elapsed_seconds, 19);
    }

    #[test]
    fn test_air_raid_two_minute_drill() {
        let engine = ClockStrategyEngine::default();
        let late = ctx().with_clock(4, 80).with_score(17, 21);
        let c = engine.compute(CoachingArchetype::AirRaid, PlayType::Pass, &late, CompletionStatus::Complete);
        // 24 - 3 - 2 - 6 (two minute) - 4 (crunch, trailing) - 3 (override)
        assert_eq!(c.raw_seconds, 6);
        assert_eq!(c.archetype_override, -3);
        assert_eq!(c.elapsed_seconds, 6);
    }

    #[test]
    fn test_result_clamped_to_max() {
        let engine = ClockStrategyEngine::default();
        let late_lead = ctx().with_clock(4, 200).with_score(30, 3).with_down_and_distance(3, 2).with_field_position(95);
        let c = engine.compute(CoachingArchetype::RunHeavy, PlayType::Run, &late_lead, CompletionStatus::NotApplicable);
        assert!(c.raw_seconds > 40);
        assert_eq!(c.elapsed_seconds, 40);
        assert!(c.was_clamped());
    }

    #[test]
    fn test_strategy_trait_dispatch() {
        let engine = ClockStrategyEngine::default();
        let strategies: Vec<Box<dyn ClockStrategy + '_>> = CoachingArchetype::ALL
            .iter()
            .map(|a| Box::new(engine.strategy(*a)) as Box<dyn ClockStrategy + '_>)
            .collect();
        for strategy in &strategies {
            let secs = strategy.elapsed_seconds(PlayType::Run, &ctx(), CompletionStatus::NotApplicable);
            assert_eq!(
                secs,
                engine.elapsed_seconds(strategy.archetype(), PlayType::Run, &ctx(), CompletionStatus::NotApplicable)
            );
        }
    }

    #[test]
    fn test_inverted_config_is_normalized() {
        let engine = ClockStrategyEngine::new(ClockConfig {
            min_elapsed_seconds: 30,
            max_elapsed_seconds: 10,
            ..Default::default()
        });
        assert_eq!(engine.config().bounds(), (10, 30));
    }

    fn archetype_strategy() -> impl Strategy<Value = CoachingArchetype> {
        prop::sample::select(CoachingArchetype::ALL.to_vec())
    }

    fn completion_strategy() -> impl Strategy<Value = CompletionStatus> {
        prop::sample::select(vec![
            CompletionStatus::Complete,
            CompletionStatus::Incomplete,
            CompletionStatus::NotApplicable,
        ])
    }

    proptest! {
        #[test]
        fn prop_elapsed_within_bounds(
            archetype in archetype_strategy(),
            play_type in prop::sample::select(PlayType::ALL.to_vec()),
            completion in completion_strategy(),
            quarter in 1u8..=5,
            clock in 0u32..=900,
            down in 1u8..=4,
            field_position in 0i32..=100,
            home in 0u16..60,
            away in 0u16..60,
            min in 0u32..20,
            span in 0u32..40,
        ) {
            let engine = ClockStrategyEngine::new(ClockConfig {
                min_elapsed_seconds: min,
                max_elapsed_seconds: min + span,
                ..Default::default()
            });
            let c = GameContext::new("DEN", "LV")
                .with_possession("DEN")
                .with_clock(quarter, clock)
                .with_down_and_distance(down, 10)
                .with_field_position(field_position)
                .with_score(home, away);
            let secs = engine.elapsed_seconds(archetype, play_type, &c, completion);
            prop_assert!(secs >= min && secs <= min + span);
        }
    }
}
