//! NFL Rules Validator
//!
//! Clock bounds, quarter progression (halftime, overtime), two-minute warning
//! applicability, timeout legality and game-end conditions. Each check returns
//! an independent `ValidationResult`; `validate_complete_game_state` merges
//! the state-level ones.
//!
//! ## Quarter progression
//!
//! ```text
//! Q1 ─► Q2 ─► (halftime, timeouts reset) ─► Q3 ─► Q4 ─┬─► final
//!  900   900                                 900   900  └─► OT (tie only)
//!                                                             600 regular / 900 playoff
//! ```

use serde::{Deserialize, Serialize};

use super::field::FieldValidator;
use super::result::{IssueCategory, ValidationResult};
use super::rule_refs;
use crate::config::RulesConfig;
use crate::models::{GameContext, OVERTIME_QUARTER};

/// Where the game stands with respect to its end conditions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum GameEndStatus {
    InProgress,
    /// Regulation expired with a winner
    RegulationFinal,
    /// Regulation expired tied
    OvertimeRequired,
    /// Playoff overtime period expired tied
    AdditionalOvertimeRequired,
    /// Score broke the tie in overtime
    SuddenDeathFinal,
    /// Regular-season overtime expired tied
    EndedInTie,
}

impl GameEndStatus {
    pub fn is_over(&self) -> bool {
        matches!(
            self,
            GameEndStatus::RegulationFinal | GameEndStatus::SuddenDeathFinal | GameEndStatus::EndedInTie
        )
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            GameEndStatus::InProgress => "IN_PROGRESS",
            GameEndStatus::RegulationFinal => "REGULATION_FINAL",
            GameEndStatus::OvertimeRequired => "OVERTIME_REQUIRED",
            GameEndStatus::AdditionalOvertimeRequired => "ADDITIONAL_OVERTIME_REQUIRED",
            GameEndStatus::SuddenDeathFinal => "SUDDEN_DEATH_FINAL",
            GameEndStatus::EndedInTie => "ENDED_IN_TIE",
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct NflRulesValidator {
    config: RulesConfig,
}

impl NflRulesValidator {
    pub fn new(config: RulesConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &RulesConfig {
        &self.config
    }

    // ===========================================
    // Clock
    // ===========================================

    /// 0 ≤ time ≤ quarter length
    pub fn validate_clock(&self, time_remaining: i64) -> ValidationResult {
        let mut result = ValidationResult::new();
        let max = i64::from(self.config.quarter_length_seconds);
        if !(0..=max).contains(&time_remaining) {
            result
                .error(
                    IssueCategory::ClockConstraints,
                    rule_refs::CLOCK_OUT_OF_BOUNDS,
                    "game clock outside quarter bounds",
                )
                .field("game_clock_seconds")
                .current(time_remaining)
                .expected(format!("0-{}", max));
        }
        result
    }

    /// Time consumed by a single play
    pub fn validate_elapsed(&self, elapsed: i64) -> ValidationResult {
        let mut result = ValidationResult::new();
        if elapsed < 0 {
            result
                .error(
                    IssueCategory::ClockConstraints,
                    rule_refs::NEGATIVE_ELAPSED,
                    "elapsed time cannot be negative",
                )
                .field("time_elapsed")
                .current(elapsed)
                .expected(">= 0");
        } else if elapsed > i64::from(self.config.elapsed_warning_seconds) {
            result
                .warning(
                    IssueCategory::ClockConstraints,
                    rule_refs::LONG_ELAPSED,
                    "unusually long play duration",
                )
                .field("time_elapsed")
                .current(elapsed)
                .expected(format!("<= {}", self.config.elapsed_warning_seconds));
        }
        result
    }

    /// Clock movement within one quarter: `new = max(0, current - elapsed)`
    pub fn validate_clock_transition(
        &self,
        current_time: i64,
        new_time: i64,
        elapsed: i64,
    ) -> ValidationResult {
        let mut result = self.validate_clock(current_time);
        result.merge(self.validate_clock(new_time));
        result.merge(self.validate_elapsed(elapsed));

        if new_time > current_time {
            result
                .error(
                    IssueCategory::ClockConstraints,
                    rule_refs::CLOCK_RESET_WITHOUT_QUARTER_CHANGE,
                    "clock moved backwards without a quarter change",
                )
                .field("game_clock_seconds")
                .current(new_time)
                .expected(format!("<= {}", current_time));
        } else if elapsed >= 0 {
            let expected = (current_time - elapsed).max(0);
            if new_time != expected {
                result
                    .error(
                        IssueCategory::ClockConstraints,
                        rule_refs::CLOCK_MISMATCH,
                        "clock does not match elapsed time",
                    )
                    .field("game_clock_seconds")
                    .current(new_time)
                    .expected(expected);
            }
        }
        result
    }

    // ===========================================
    // Quarters
    // ===========================================

    fn validate_quarter_range(&self, quarter: u8, field: &str) -> ValidationResult {
        let mut result = ValidationResult::new();
        if !(1..=OVERTIME_QUARTER).contains(&quarter) {
            result
                .error(IssueCategory::NflRules, rule_refs::QUARTER_OUT_OF_RANGE, "quarter must be 1-5")
                .field(field)
                .current(quarter)
                .expected("1-5");
        }
        result
    }

    /// Quarter/clock change between two consecutive snapshots
    pub fn validate_quarter_transition(&self, before: &GameContext, after: &GameContext) -> ValidationResult {
        let mut result = self.validate_quarter_range(before.quarter, "quarter_before");
        result.merge(self.validate_quarter_range(after.quarter, "quarter_after"));
        if !result.is_valid() {
            return result;
        }

        let from = before.quarter;
        let to = after.quarter;

        if from == to {
            let playoff_period_rollover = to == OVERTIME_QUARTER
                && self.config.is_playoff
                && before.game_clock_seconds == 0
                && before.is_tied()
                && after.game_clock_seconds == self.config.playoff_overtime_seconds;

            if playoff_period_rollover {
                result
                    .info(
                        IssueCategory::NflRules,
                        rule_refs::ADDITIONAL_OVERTIME,
                        "additional playoff overtime period",
                    )
                    .field("game_clock_seconds")
                    .current(after.game_clock_seconds);
            } else if after.game_clock_seconds > before.game_clock_seconds {
                result
                    .error(
                        IssueCategory::ClockConstraints,
                        rule_refs::CLOCK_RESET_WITHOUT_QUARTER_CHANGE,
                        "clock reset without a quarter change",
                    )
                    .field("game_clock_seconds")
                    .current(after.game_clock_seconds)
                    .expected(format!("<= {}", before.game_clock_seconds));
            }
            return result;
        }

        if to != from + 1 {
            result
                .error(IssueCategory::NflRules, rule_refs::QUARTER_SKIPPED, "quarters must advance one at a time")
                .field("quarter")
                .current(to)
                .expected(from + 1);
            return result;
        }

        if before.game_clock_seconds > 0 {
            result
                .error(
                    IssueCategory::NflRules,
                    rule_refs::QUARTER_ENDED_EARLY,
                    "quarter ended with time remaining",
                )
                .field("game_clock_seconds")
                .current(before.game_clock_seconds)
                .expected(0);
        }

        if to == OVERTIME_QUARTER {
            if !before.is_tied() {
                result
                    .error(
                        IssueCategory::NflRules,
                        rule_refs::OVERTIME_REQUIRES_TIE,
                        "overtime is only played when regulation ends tied",
                    )
                    .field("score")
                    .current(format!("{}-{}", before.home_score, before.away_score));
            }
            let expected = self.config.overtime_length_seconds();
            if after.game_clock_seconds != expected {
                result
                    .error(
                        IssueCategory::ClockConstraints,
                        rule_refs::OVERTIME_CLOCK_INVALID,
                        "overtime clock starts at the wrong value",
                    )
                    .field("game_clock_seconds")
                    .current(after.game_clock_seconds)
                    .expected(expected);
            }
        } else {
            if after.game_clock_seconds != self.config.quarter_length_seconds {
                result
                    .error(
                        IssueCategory::ClockConstraints,
                        rule_refs::QUARTER_CLOCK_NOT_RESET,
                        "new quarter must start with a full clock",
                    )
                    .field("game_clock_seconds")
                    .current(after.game_clock_seconds)
                    .expected(self.config.quarter_length_seconds);
            }
            if to == 3 {
                result.info(IssueCategory::NflRules, rule_refs::HALFTIME, "halftime");
                result.merge(self.validate_timeout_reset(after));
            }
        }

        result
    }

    // ===========================================
    // Two-minute warning
    // ===========================================

    pub fn two_minute_warning_applies(&self, quarter: u8, time_remaining: u32) -> bool {
        matches!(quarter, 2 | 4) && time_remaining <= self.config.two_minute_warning_seconds
    }

    pub fn validate_two_minute_warning(&self, quarter: u8, time_remaining: u32) -> ValidationResult {
        let mut result = ValidationResult::new();
        if !matches!(quarter, 2 | 4) {
            result
                .error(
                    IssueCategory::NflRules,
                    rule_refs::TWO_MINUTE_WRONG_QUARTER,
                    "two-minute warning only occurs in the 2nd and 4th quarters",
                )
                .field("quarter")
                .current(quarter)
                .expected("2 or 4");
        } else if time_remaining > self.config.two_minute_warning_seconds {
            result
                .error(
                    IssueCategory::NflRules,
                    rule_refs::TWO_MINUTE_TOO_EARLY,
                    "two-minute warning before the two-minute mark",
                )
                .field("game_clock_seconds")
                .current(time_remaining)
                .expected(format!("<= {}", self.config.two_minute_warning_seconds));
        } else {
            result
                .info(
                    IssueCategory::NflRules,
                    rule_refs::TWO_MINUTE_APPLICABLE,
                    "two-minute warning applicable",
                )
                .field("game_clock_seconds")
                .current(time_remaining);
        }
        result
    }

    // ===========================================
    // Timeouts
    // ===========================================

    /// `team` calls a timeout in `ctx`
    pub fn validate_timeout_usage(&self, ctx: &GameContext, team: &str) -> ValidationResult {
        let mut result = ValidationResult::new();
        let Some(remaining) = ctx.timeouts_for(team) else {
            result
                .error(IssueCategory::NflRules, rule_refs::TIMEOUT_UNKNOWN_TEAM, "timeout called by unknown team")
                .field("team")
                .current(team);
            return result;
        };

        if remaining == 0 {
            result
                .error(IssueCategory::NflRules, rule_refs::TIMEOUT_NONE_REMAINING, "no timeouts remaining")
                .field("timeouts_remaining")
                .current(remaining)
                .expected(">= 1");
        } else if remaining > self.config.max_timeouts_per_half {
            result
                .error(
                    IssueCategory::NflRules,
                    rule_refs::TIMEOUT_EXCEEDS_MAXIMUM,
                    "more timeouts than allowed per half",
                )
                .field("timeouts_remaining")
                .current(remaining)
                .expected(format!("<= {}", self.config.max_timeouts_per_half));
        }
        result
    }

    pub fn validate_timeout_counts(&self, ctx: &GameContext) -> ValidationResult {
        let mut result = ValidationResult::new();
        let max = self.config.max_timeouts_per_half;
        for (field, count) in [("home_timeouts", ctx.home_timeouts), ("away_timeouts", ctx.away_timeouts)] {
            if count > max {
                result
                    .error(
                        IssueCategory::NflRules,
                        rule_refs::TIMEOUT_EXCEEDS_MAXIMUM,
                        "more timeouts than allowed per half",
                    )
                    .field(field)
                    .current(count)
                    .expected(format!("<= {}", max));
            }
        }
        result
    }

    /// Both teams must hold a full set of timeouts at the start of the 3rd quarter
    pub fn validate_timeout_reset(&self, ctx: &GameContext) -> ValidationResult {
        let mut result = ValidationResult::new();
        let max = self.config.max_timeouts_per_half;
        for (field, count) in [("home_timeouts", ctx.home_timeouts), ("away_timeouts", ctx.away_timeouts)] {
            if count != max {
                result
                    .error(
                        IssueCategory::NflRules,
                        rule_refs::TIMEOUT_NOT_RESET_AT_HALF,
                        "timeouts must reset at the start of the second half",
                    )
                    .field(field)
                    .current(count)
                    .expected(max);
            }
        }
        result
    }

    // ===========================================
    // Game end
    // ===========================================

    pub fn evaluate_game_end(&self, ctx: &GameContext) -> GameEndStatus {
        if ctx.quarter < 4 {
            return GameEndStatus::InProgress;
        }
        if ctx.quarter == 4 {
            return match (ctx.game_clock_seconds, ctx.is_tied()) {
                (0, true) => GameEndStatus::OvertimeRequired,
                (0, false) => GameEndStatus::RegulationFinal,
                _ => GameEndStatus::InProgress,
            };
        }
        if !ctx.is_tied() {
            return GameEndStatus::SuddenDeathFinal;
        }
        if ctx.game_clock_seconds > 0 {
            GameEndStatus::InProgress
        } else if self.config.is_playoff {
            GameEndStatus::AdditionalOvertimeRequired
        } else {
            GameEndStatus::EndedInTie
        }
    }

    /// Check a caller's claim that the game is (or is not) over
    pub fn validate_game_end(&self, ctx: &GameContext, claimed_over: bool) -> ValidationResult {
        let mut result = ValidationResult::new();
        let status = self.evaluate_game_end(ctx);

        if claimed_over && !status.is_over() {
            let (rule, message) = match status {
                GameEndStatus::OvertimeRequired => {
                    (rule_refs::OVERTIME_REQUIRED, "tied at end of regulation; overtime required")
                }
                GameEndStatus::AdditionalOvertimeRequired => (
                    rule_refs::ADDITIONAL_OVERTIME_REQUIRED,
                    "playoff overtime still tied; another period required",
                ),
                _ => (rule_refs::GAME_NOT_OVER, "game ended before its end conditions were met"),
            };
            result
                .error(IssueCategory::NflRules, rule, message)
                .field("game_status")
                .current(status.as_str());
            return result;
        }

        if !claimed_over && status.is_over() {
            result
                .warning(
                    IssueCategory::NflRules,
                    rule_refs::GAME_SHOULD_HAVE_ENDED,
                    "game end conditions met but play continues",
                )
                .field("game_status")
                .current(status.as_str());
        }

        match status {
            GameEndStatus::SuddenDeathFinal => {
                result.info(IssueCategory::NflRules, rule_refs::SUDDEN_DEATH_END, "overtime score ends the game");
            }
            GameEndStatus::EndedInTie => {
                result.info(IssueCategory::NflRules, rule_refs::GAME_ENDED_IN_TIE, "regular season game ends tied");
            }
            _ => {}
        }
        result
    }

    // ===========================================
    // Whole-state check
    // ===========================================

    pub fn validate_complete_game_state(&self, ctx: &GameContext) -> ValidationResult {
        let mut result = self.validate_quarter_range(ctx.quarter, "quarter");

        let period_max = self.config.period_length_seconds(ctx.quarter);
        if ctx.game_clock_seconds > period_max {
            result
                .error(
                    IssueCategory::ClockConstraints,
                    rule_refs::CLOCK_OUT_OF_BOUNDS,
                    "game clock exceeds period length",
                )
                .field("game_clock_seconds")
                .current(ctx.game_clock_seconds)
                .expected(format!("0-{}", period_max));
        }

        result.merge(FieldValidator::validate(ctx.field_position, ctx.down, ctx.yards_to_go));
        result.merge(self.validate_timeout_counts(ctx));

        match ctx.possession_team.as_deref() {
            None => {
                result.warning(
                    IssueCategory::NflRules,
                    rule_refs::POSSESSION_UNKNOWN,
                    "possessing team unknown",
                );
            }
            Some(team) if ctx.side_of(team).is_none() => {
                result
                    .error(
                        IssueCategory::NflRules,
                        rule_refs::POSSESSION_INVALID_TEAM,
                        "possessing team is not playing in this game",
                    )
                    .field("possession_team")
                    .current(team);
            }
            Some(_) => {}
        }

        result
    }
}
