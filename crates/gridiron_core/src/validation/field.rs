//! Field Validator
//!
//! Enforces field-position bounds and down/distance progression.
//!
//! ```text
//!   own goal line                       opponent goal line
//!   0 (safety) ─────────── 50 ─────────── 100 (touchdown)
//! ```
//!
//! 0 and 100 are legal spots but are reported as warnings: the caller has to
//! confirm that a safety or touchdown really happened there.

use super::result::{IssueCategory, ValidationResult};
use super::rule_refs;
use super::scoring::ScoringContext;

pub const FIELD_MIN: i32 = 0;
pub const FIELD_MAX: i32 = 100;
pub const MAX_YARDS_TO_GO: i32 = 99;
pub const MAX_DOWN: u8 = 4;

/// Down the next snap should be, given the current play
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DownExpectation {
    /// Points were scored: next series starts at 1st down
    ResetAfterScore,
    /// Line to gain reached
    FirstDown,
    /// Ordinary progression to the given down
    Advance(u8),
    /// 4th down failed; possession belongs to the calculator
    TurnoverOnDowns,
}

impl DownExpectation {
    pub fn expected_down(&self) -> Option<u8> {
        match self {
            DownExpectation::ResetAfterScore | DownExpectation::FirstDown => Some(1),
            DownExpectation::Advance(down) => Some(*down),
            DownExpectation::TurnoverOnDowns => None,
        }
    }
}

/// Field position and down/distance validator
pub struct FieldValidator;

impl FieldValidator {
    /// Full check of a proposed spot: field position, down range, yards to go
    pub fn validate(field_position: i32, down: u8, yards_to_go: i32) -> ValidationResult {
        let mut result = Self::validate_field_position(field_position);
        result.merge(Self::validate_down_range(down, "down"));
        result.merge(Self::validate_yards_to_go(yards_to_go, field_position));
        result
    }

    pub fn validate_field_position(field_position: i32) -> ValidationResult {
        let mut result = ValidationResult::new();

        if !(FIELD_MIN..=FIELD_MAX).contains(&field_position) {
            result
                .error(
                    IssueCategory::FieldBounds,
                    rule_refs::FIELD_OUT_OF_BOUNDS,
                    "field position outside the playing field",
                )
                .field("field_position")
                .current(field_position)
                .expected("0-100");
        } else if field_position == FIELD_MAX {
            result
                .warning(
                    IssueCategory::FieldBounds,
                    rule_refs::FIELD_AT_OPPONENT_GOAL_LINE,
                    "ball spotted on the opponent goal line; confirm touchdown",
                )
                .field("field_position")
                .current(field_position);
        } else if field_position == FIELD_MIN {
            result
                .warning(
                    IssueCategory::FieldBounds,
                    rule_refs::FIELD_AT_OWN_GOAL_LINE,
                    "ball spotted on the own goal line; confirm safety",
                )
                .field("field_position")
                .current(field_position);
        }

        result
    }

    fn validate_down_range(down: u8, field: &str) -> ValidationResult {
        let mut result = ValidationResult::new();
        if !(1..=MAX_DOWN).contains(&down) {
            result
                .error(IssueCategory::DownDistance, rule_refs::DOWN_OUT_OF_RANGE, "down must be 1-4")
                .field(field)
                .current(down)
                .expected("1-4");
        }
        result
    }

    /// What the next down must be. Scoring is checked before the line to gain.
    pub fn expected_down(
        current_down: u8,
        yards_gained: i32,
        yards_to_go: i32,
        scoring: ScoringContext,
    ) -> DownExpectation {
        if scoring.is_scoring() {
            DownExpectation::ResetAfterScore
        } else if yards_gained >= yards_to_go {
            DownExpectation::FirstDown
        } else if current_down >= MAX_DOWN {
            DownExpectation::TurnoverOnDowns
        } else {
            DownExpectation::Advance(current_down + 1)
        }
    }

    pub fn validate_down_progression(
        current_down: u8,
        yards_gained: i32,
        yards_to_go: i32,
        new_down: u8,
        scoring: ScoringContext,
    ) -> ValidationResult {
        let mut result = Self::validate_down_range(current_down, "current_down");
        if !result.is_valid() {
            return result;
        }

        match Self::expected_down(current_down, yards_gained, yards_to_go, scoring) {
            DownExpectation::ResetAfterScore => {
                if new_down != 1 {
                    result
                        .error(
                            IssueCategory::DownDistance,
                            rule_refs::DOWN_RESET_AFTER_SCORE,
                            "down must reset to 1 after a score",
                        )
                        .field("new_down")
                        .current(new_down)
                        .expected(1);
                }
            }
            DownExpectation::FirstDown => {
                if new_down == 1 {
                    result
                        .info(
                            IssueCategory::DownDistance,
                            rule_refs::FIRST_DOWN_ACHIEVED,
                            "first down achieved",
                        )
                        .field("new_down")
                        .current(new_down)
                        .expected(1);
                } else {
                    result
                        .error(
                            IssueCategory::DownDistance,
                            rule_refs::DOWN_RESET_AFTER_FIRST_DOWN,
                            "line to gain reached; down must reset to 1",
                        )
                        .field("new_down")
                        .current(new_down)
                        .expected(1);
                }
            }
            DownExpectation::Advance(expected) => {
                if new_down != expected {
                    result
                        .error(
                            IssueCategory::DownDistance,
                            rule_refs::DOWN_MUST_ADVANCE,
                            "down must advance by exactly one",
                        )
                        .field("new_down")
                        .current(new_down)
                        .expected(expected);
                }
            }
            DownExpectation::TurnoverOnDowns => {
                result
                    .info(
                        IssueCategory::DownDistance,
                        rule_refs::TURNOVER_ON_DOWNS_EXPECTED,
                        "fourth down not converted; turnover on downs expected",
                    )
                    .field("current_down")
                    .current(current_down);
            }
        }

        result
    }

    pub fn validate_yards_to_go(yards_to_go: i32, field_position: i32) -> ValidationResult {
        let mut result = ValidationResult::new();

        if !(0..=MAX_YARDS_TO_GO).contains(&yards_to_go) {
            result
                .error(
                    IssueCategory::DownDistance,
                    rule_refs::YARDS_TO_GO_OUT_OF_RANGE,
                    "yards to go must be 0-99",
                )
                .field("yards_to_go")
                .current(yards_to_go)
                .expected("0-99");
            return result;
        }

        if (FIELD_MIN..=FIELD_MAX).contains(&field_position) {
            let remaining = FIELD_MAX - field_position;
            if yards_to_go > remaining {
                result
                    .error(
                        IssueCategory::DownDistance,
                        rule_refs::YARDS_TO_GO_EXCEEDS_FIELD,
                        "yards to go exceeds distance to the goal line",
                    )
                    .field("yards_to_go")
                    .current(yards_to_go)
                    .expected(format!("<= {}", remaining));
            }
        }

        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validation::result::Severity;
    use crate::validation::scoring::ScoringSource;

    #[test]
    fn test_midfield_is_clean() {
        let r = FieldValidator::validate(50, 1, 10);
        assert!(r.is_empty());
    }

    #[test]
    fn test_field_position_bounds() {
        assert!(!FieldValidator::validate_field_position(-1).is_valid());
        assert!(!FieldValidator::validate_field_position(101).is_valid());
        assert!(FieldValidator::validate_field_position(1).is_empty());
        assert!(FieldValidator::validate_field_position(99).is_empty());
    }

    #[test]
    fn test_goal_lines_are_warnings() {
        let r = FieldValidator::validate_field_position(100);
        assert!(r.is_valid());
        assert!(r.has_rule(rule_refs::FIELD_AT_OPPONENT_GOAL_LINE));

        let r = FieldValidator::validate_field_position(0);
        assert!(r.is_valid());
        assert!(r.has_rule(rule_refs::FIELD_AT_OWN_GOAL_LINE));
        assert_eq!(r.max_severity(), Some(Severity::Warning));
    }

    #[test]
    fn test_first_down_achieved() {
        // 1st-and-10 at the 50, 12-yard run
        let r = FieldValidator::validate_down_progression(1, 12, 10, 1, ScoringContext::NotScoring);
        assert!(r.is_valid());
        let issue = r.find_rule(rule_refs::FIRST_DOWN_ACHIEVED).unwrap();
        assert_eq!(issue.expected_value.as_deref(), Some("1"));
        assert_eq!(
            FieldValidator::expected_down(1, 12, 10, ScoringContext::NotScoring).expected_down(),
            Some(1)
        );
    }

    #[test]
    fn test_first_down_not_reset_is_error() {
        let r = FieldValidator::validate_down_progression(2, 10, 10, 3, ScoringContext::NotScoring);
        assert!(r.has_rule(rule_refs::DOWN_RESET_AFTER_FIRST_DOWN));
        assert!(!r.is_valid());
    }

    #[test]
    fn test_ordinary_progression() {
        assert!(FieldValidator::validate_down_progression(1, 3, 10, 2, ScoringContext::NotScoring).is_empty());
        let r = FieldValidator::validate_down_progression(1, 3, 10, 3, ScoringContext::NotScoring);
        assert!(r.has_rule(rule_refs::DOWN_MUST_ADVANCE));
    }

    #[test]
    fn test_fourth_down_failure_is_info() {
        // 4th-and-3, 1-yard run
        let r = FieldValidator::validate_down_progression(4, 1, 3, 1, ScoringContext::NotScoring);
        assert!(r.is_valid());
        let issue = r.find_rule(rule_refs::TURNOVER_ON_DOWNS_EXPECTED).unwrap();
        assert_eq!(issue.severity, Severity::Info);
    }

    #[test]
    fn test_score_requires_down_reset() {
        let scoring = ScoringContext::Scoring(ScoringSource::OutcomeTag);
        assert!(FieldValidator::validate_down_progression(3, 4, 8, 1, scoring).is_valid());
        let r = FieldValidator::validate_down_progression(3, 4, 8, 4, scoring);
        assert!(r.has_rule(rule_refs::DOWN_RESET_AFTER_SCORE));
        assert!(!r.is_valid());
    }

    #[test]
    fn test_score_checked_before_fourth_down() {
        let scoring = ScoringContext::explicit();
        let r = FieldValidator::validate_down_progression(4, 2, 5, 1, scoring);
        assert!(r.is_empty());
    }

    #[test]
    fn test_invalid_current_down() {
        let r = FieldValidator::validate_down_progression(5, 2, 5, 1, ScoringContext::NotScoring);
        assert!(r.has_rule(rule_refs::DOWN_OUT_OF_RANGE));
        assert_eq!(r.len(), 1);
    }

    #[test]
    fn test_yards_to_go_rules() {
        assert!(FieldValidator::validate_yards_to_go(10, 50).is_empty());
        assert!(FieldValidator::validate_yards_to_go(0, 99).is_empty());
        assert!(FieldValidator::validate_yards_to_go(5, 95).is_empty());
        assert!(FieldValidator::validate_yards_to_go(-1, 50).has_rule(rule_refs::YARDS_TO_GO_OUT_OF_RANGE));
        assert!(FieldValidator::validate_yards_to_go(100, 0).has_rule(rule_refs::YARDS_TO_GO_OUT_OF_RANGE));

        let r = FieldValidator::validate_yards_to_go(10, 95);
        assert!(!r.is_valid());
        assert_eq!(r.issues()[0].expected_value.as_deref(), Some("<= 5"));
    }

    #[test]
    fn test_validate_reports_every_problem() {
        let r = FieldValidator::validate(120, 0, 150);
        assert!(r.has_rule(rule_refs::FIELD_OUT_OF_BOUNDS));
        assert!(r.has_rule(rule_refs::DOWN_OUT_OF_RANGE));
        assert!(r.has_rule(rule_refs::YARDS_TO_GO_OUT_OF_RANGE));
    }
}
