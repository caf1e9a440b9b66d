//! Timing classes and the situational adjustments shared by every archetype.

use serde::{Deserialize, Serialize};

use crate::config::ClockConfig;
use crate::models::{CompletionStatus, GameContext, PlayType};

/// Score margin beyond which second-half tempo changes
pub const LOPSIDED_MARGIN: i32 = 8;

/// Play type, refined by completion status for passes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimingClass {
    Run,
    CompletePass,
    IncompletePass,
    Kick,
    Punt,
    FieldGoal,
    ExtraPoint,
}

impl TimingClass {
    /// Passes without a completion status (sacks, scrambles) keep the clock running
    pub fn classify(play_type: PlayType, completion: CompletionStatus) -> Self {
        match play_type {
            PlayType::Run => TimingClass::Run,
            PlayType::Pass => match completion {
                CompletionStatus::Incomplete => TimingClass::IncompletePass,
                CompletionStatus::Complete | CompletionStatus::NotApplicable => TimingClass::CompletePass,
            },
            PlayType::Kick => TimingClass::Kick,
            PlayType::Punt => TimingClass::Punt,
            PlayType::FieldGoal => TimingClass::FieldGoal,
            PlayType::ExtraPoint => TimingClass::ExtraPoint,
        }
    }

    pub fn base_seconds(&self, config: &ClockConfig) -> i32 {
        let base = &config.base_times;
        match self {
            TimingClass::Run => base.run,
            TimingClass::CompletePass => base.complete_pass,
            TimingClass::IncompletePass => base.incomplete_pass,
            TimingClass::Kick => base.kick,
            TimingClass::Punt => base.punt,
            TimingClass::FieldGoal => base.field_goal,
            TimingClass::ExtraPoint => base.extra_point,
        }
    }
}

/// Breakdown of the shared situational adjustments
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SituationalAdjustments {
    pub score_differential: i32,
    pub down_distance: i32,
    pub two_minute: i32,
    pub fourth_quarter_crunch: i32,
    pub field_zone: i32,
}

impl SituationalAdjustments {
    pub fn evaluate(ctx: &GameContext) -> Self {
        let diff = ctx.score_differential();

        let score_differential = if ctx.is_second_half() && diff > LOPSIDED_MARGIN {
            3
        } else if ctx.is_second_half() && diff < -LOPSIDED_MARGIN {
            -3
        } else {
            0
        };

        let down_distance = if ctx.down >= 3 { 2 } else { 0 };

        let two_minute = if ctx.is_two_minute() && diff <= 0 { -6 } else { 0 };

        let fourth_quarter_crunch = match (ctx.is_fourth_quarter_crunch(), diff.signum()) {
            (true, 1) => 4,
            (true, -1) => -4,
            _ => 0,
        };

        let field_zone = if ctx.is_goal_line() {
            2
        } else if ctx.is_red_zone() {
            1
        } else {
            0
        };

        Self { score_differential, down_distance, two_minute, fourth_quarter_crunch, field_zone }
    }

    pub fn total(&self) -> i32 {
        self.score_differential + self.down_distance + self.two_minute + self.fourth_quarter_crunch + self.field_zone
    }
}
