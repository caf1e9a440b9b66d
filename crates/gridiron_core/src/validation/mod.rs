//! Field and league-rules validation.
//!
//! | Validator | Checks |
//! |-----------|--------|
//! | `FieldValidator` | field position bounds, down progression, yards to go |
//! | `NflRulesValidator` | clock bounds, quarter progression, two-minute warning, timeouts, game end |
//!
//! Both return a `ValidationResult`; neither panics nor returns `Err` on bad input.

pub mod field;
pub mod result;
pub mod rules;
pub mod scoring;

pub use field::{DownExpectation, FieldValidator};
pub use result::{IssueCategory, Severity, ValidationIssue, ValidationResult};
pub use rules::{GameEndStatus, NflRulesValidator};
pub use scoring::{ScoringContext, ScoringSignals, ScoringSource};

/// Stable rule reference codes, used in bug reports and asserted in tests.
pub mod rule_refs {
    // Field position
    pub const FIELD_OUT_OF_BOUNDS: &str = "NFL.FIELD.001";
    pub const FIELD_AT_OPPONENT_GOAL_LINE: &str = "NFL.FIELD.002";
    pub const FIELD_AT_OWN_GOAL_LINE: &str = "NFL.FIELD.003";

    // Downs
    pub const DOWN_OUT_OF_RANGE: &str = "NFL.DOWN.001";
    pub const DOWN_RESET_AFTER_SCORE: &str = "NFL.DOWN.002";
    pub const DOWN_RESET_AFTER_FIRST_DOWN: &str = "NFL.DOWN.003";
    pub const DOWN_MUST_ADVANCE: &str = "NFL.DOWN.004";
    pub const TURNOVER_ON_DOWNS_EXPECTED: &str = "NFL.DOWN.005";
    pub const FIRST_DOWN_ACHIEVED: &str = "NFL.DOWN.006";

    // Yards to go
    pub const YARDS_TO_GO_OUT_OF_RANGE: &str = "NFL.DIST.001";
    pub const YARDS_TO_GO_EXCEEDS_FIELD: &str = "NFL.DIST.002";

    // Clock
    pub const CLOCK_OUT_OF_BOUNDS: &str = "NFL.CLOCK.001";
    pub const NEGATIVE_ELAPSED: &str = "NFL.CLOCK.002";
    pub const LONG_ELAPSED: &str = "NFL.CLOCK.003";
    pub const CLOCK_RESET_WITHOUT_QUARTER_CHANGE: &str = "NFL.CLOCK.004";
    pub const CLOCK_MISMATCH: &str = "NFL.CLOCK.005";

    // Quarters
    pub const QUARTER_OUT_OF_RANGE: &str = "NFL.QTR.001";
    pub const QUARTER_SKIPPED: &str = "NFL.QTR.002";
    pub const QUARTER_CLOCK_NOT_RESET: &str = "NFL.QTR.003";
    pub const OVERTIME_REQUIRES_TIE: &str = "NFL.QTR.004";
    pub const OVERTIME_CLOCK_INVALID: &str = "NFL.QTR.005";
    pub const QUARTER_ENDED_EARLY: &str = "NFL.QTR.006";
    pub const HALFTIME: &str = "NFL.QTR.007";
    pub const ADDITIONAL_OVERTIME: &str = "NFL.QTR.008";

    // Two-minute warning
    pub const TWO_MINUTE_WRONG_QUARTER: &str = "NFL.TMW.001";
    pub const TWO_MINUTE_TOO_EARLY: &str = "NFL.TMW.002";
    pub const TWO_MINUTE_APPLICABLE: &str = "NFL.TMW.003";

    // Timeouts
    pub const TIMEOUT_UNKNOWN_TEAM: &str = "NFL.TO.001";
    pub const TIMEOUT_NONE_REMAINING: &str = "NFL.TO.002";
    pub const TIMEOUT_EXCEEDS_MAXIMUM: &str = "NFL.TO.003";
    pub const TIMEOUT_NOT_RESET_AT_HALF: &str = "NFL.TO.004";

    // Game end
    pub const OVERTIME_REQUIRED: &str = "NFL.END.001";
    pub const ADDITIONAL_OVERTIME_REQUIRED: &str = "NFL.END.002";
    pub const SUDDEN_DEATH_END: &str = "NFL.END.003";
    pub const GAME_NOT_OVER: &str = "NFL.END.004";
    pub const GAME_ENDED_IN_TIE: &str = "NFL.END.005";
    pub const GAME_SHOULD_HAVE_ENDED: &str = "NFL.END.006";

    // Possession
    pub const POSSESSION_UNKNOWN: &str = "NFL.POSS.001";
    pub const POSSESSION_INVALID_TEAM: &str = "NFL.POSS.002";
}
