//! Possession Calculator
//!
//! `calculate_possession_changes` maps one play outcome and the snapshot it
//! was played from to a `PossessionTransition`. Rules are tried in a fixed
//! order and the first match wins:
//!
//! 1. score (touchdown / field goal / safety)
//! 2. turnover
//! 3. punt
//! 4. run or pass crossing either goal line without a score flag
//! 5. turnover on downs
//! 6. no change
//!
//! Extra point tries never move possession here: the touchdown before them
//! already did. A muffed punt is lost by the receiving team, so its
//! transition runs from the receivers back to the punting team.

use tracing::{debug, trace, warn};

use crate::models::{GameContext, OutcomeTag, PlayOutcome, PlayType};
use crate::transition::{PossessionChangeReason, PossessionTeams, PossessionTransition, TurnoverType};

/// Last down before possession is forfeited
pub(crate) const FINAL_DOWN: u8 = 4;

pub fn calculate_possession_changes(outcome: &PlayOutcome, ctx: &GameContext) -> PossessionTransition {
    let current = ctx.possession_team.as_deref();

    if outcome.play_type == PlayType::ExtraPoint {
        trace!(play_type = outcome.play_type.as_str(), "try does not change possession");
        return PossessionTransition::retained(current);
    }

    // 1. Score
    if outcome.is_score {
        if outcome.is_turnover {
            let turnover_type = turnover_type_for(outcome);
            debug!(turnover = turnover_type.as_str(), "defensive return touchdown");
            return PossessionTransition::return_touchdown(
                turnover_teams(ctx, outcome, turnover_type),
                turnover_type,
                turnover_location(ctx, outcome, turnover_type),
            );
        }
        let reason = scoring_reason(outcome);
        debug!(reason = reason.as_str(), from = ?current, "possession changes after score");
        return PossessionTransition::changed(flipped_teams(ctx), reason, None, None);
    }

    // 2. Turnover
    if outcome.is_turnover {
        let turnover_type = turnover_type_for(outcome);
        let location = turnover_location(ctx, outcome, turnover_type);
        debug!(
            turnover = turnover_type.as_str(),
            location,
            from = ?current,
            "turnover"
        );
        return PossessionTransition::changed(
            turnover_teams(ctx, outcome, turnover_type),
            turnover_type.reason(),
            Some(turnover_type),
            Some(location),
        );
    }

    // 3. Punt
    if outcome.play_type == PlayType::Punt {
        debug!(from = ?current, "possession changes on punt");
        return PossessionTransition::changed(flipped_teams(ctx), PossessionChangeReason::Punt, None, None);
    }

    // 4. Unflagged run/pass reaching either end zone
    if outcome.play_type.is_scrimmage() {
        let spot = ctx.field_position.saturating_add(outcome.yards_gained);
        let backstop = if spot >= 100 {
            Some(PossessionChangeReason::TouchdownScored)
        } else if spot <= 0 {
            Some(PossessionChangeReason::SafetyScored)
        } else {
            None
        };
        if let Some(reason) = backstop {
            warn!(
                field_position = ctx.field_position,
                yards_gained = outcome.yards_gained,
                reason = reason.as_str(),
                "play crossed a goal line without a score flag"
            );
            return PossessionTransition::changed(flipped_teams(ctx), reason, None, None);
        }
    }

    // 5. Turnover on downs
    if is_turnover_on_downs(outcome, ctx) {
        debug!(
            down = ctx.down,
            yards_to_go = ctx.yards_to_go,
            yards_gained = outcome.yards_gained,
            "turnover on downs"
        );
        return PossessionTransition::changed(
            flipped_teams(ctx),
            PossessionChangeReason::TurnoverOnDowns,
            Some(TurnoverType::OnDowns),
            Some(ctx.distance_to_goal()),
        );
    }

    // 6. No change
    PossessionTransition::retained(current)
}

/// Short of the line to gain, and the next down would be a fifth
fn is_turnover_on_downs(outcome: &PlayOutcome, ctx: &GameContext) -> bool {
    if ctx.down < FINAL_DOWN {
        return false;
    }
    match outcome.play_type {
        PlayType::Kick | PlayType::ExtraPoint => false,
        // a missed kick never converts, whatever distance it reports
        PlayType::FieldGoal => true,
        PlayType::Run | PlayType::Pass | PlayType::Punt => outcome.yards_gained < ctx.yards_to_go,
    }
}

/// Punt muffed by the receivers and recovered by the punting team
fn is_muffed_punt(outcome: &PlayOutcome, turnover_type: TurnoverType) -> bool {
    outcome.play_type == PlayType::Punt && turnover_type == TurnoverType::MuffedPunt
}

/// Who loses and who gains the ball on a turnover
fn turnover_teams(ctx: &GameContext, outcome: &PlayOutcome, turnover_type: TurnoverType) -> Option<PossessionTeams> {
    let teams = flipped_teams(ctx)?;
    if is_muffed_punt(outcome, turnover_type) {
        Some(PossessionTeams::new(teams.new, teams.old))
    } else {
        Some(teams)
    }
}

/// Yards from the goal line the team losing the ball was attacking
fn turnover_location(ctx: &GameContext, outcome: &PlayOutcome, turnover_type: TurnoverType) -> i32 {
    if is_muffed_punt(outcome, turnover_type) {
        ctx.field_position.saturating_add(outcome.yards_gained).clamp(0, 100)
    } else {
        ctx.distance_to_goal()
    }
}

fn scoring_reason(outcome: &PlayOutcome) -> PossessionChangeReason {
    if outcome.is_safety() {
        PossessionChangeReason::SafetyScored
    } else if outcome.play_type == PlayType::FieldGoal {
        PossessionChangeReason::FieldGoalScored
    } else {
        PossessionChangeReason::TouchdownScored
    }
}

/// Tag first, then play type for untagged turnovers
pub fn turnover_type_for(outcome: &PlayOutcome) -> TurnoverType {
    match outcome.outcome.as_ref() {
        Some(OutcomeTag::Interception) => TurnoverType::Interception,
        Some(OutcomeTag::Fumble) => TurnoverType::FumbleLost,
        Some(OutcomeTag::MuffedPunt) => TurnoverType::MuffedPunt,
        Some(OutcomeTag::MuffedKickoff) => TurnoverType::MuffedKickoff,
        Some(OutcomeTag::BlockedPunt) => TurnoverType::BlockedPunt,
        Some(OutcomeTag::BlockedFieldGoal) => TurnoverType::BlockedFieldGoal,
        _ => match outcome.play_type {
            PlayType::Pass => TurnoverType::Interception,
            PlayType::Punt => TurnoverType::BlockedPunt,
            PlayType::FieldGoal => TurnoverType::BlockedFieldGoal,
            PlayType::Kick => TurnoverType::MuffedKickoff,
            PlayType::Run | PlayType::ExtraPoint => TurnoverType::FumbleLost,
        },
    }
}

/// Current offense → its opponent. `None` when possession is unknown or the
/// possessing team is not playing in this game.
fn flipped_teams(ctx: &GameContext) -> Option<PossessionTeams> {
    let Some(current) = ctx.possession_team.as_deref() else {
        warn!(
            home = %ctx.home_team,
            away = %ctx.away_team,
            "possession changes but possessing team is unknown"
        );
        return None;
    };
    match ctx.opponent_of(current) {
        Some(opponent) => Some(PossessionTeams::new(current, opponent)),
        None => {
            warn!(team = current, "possessing team is not playing in this game");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn ctx() -> GameContext {
        GameContext::new("KC", "SF").with_possession("KC")
    }

    #[test]
    fn test_first_down_run_keeps_possession() {
        // 1st-and-10 at the 50, 12-yard run
        let c = ctx().with_field_position(50);
        let t = calculate_possession_changes(&PlayOutcome::run(12), &c);
        assert!(!t.possession_changes());
        assert_eq!(t.old_possessing_team(), Some("KC"));
        assert_eq!(t.new_possessing_team(), Some("KC"));
        assert!(t.reason().is_none());
    }

    #[test]
    fn test_interception_flips_possession() {
        let c = ctx().with_field_position(35);
        let t = calculate_possession_changes(&PlayOutcome::interception(), &c);
        assert!(t.possession_changes());
        assert!(t.turnover_occurred());
        assert_eq!(t.turnover_type(), Some(TurnoverType::Interception));
        assert_eq!(t.new_possessing_team(), Some("SF"));
        assert_eq!(t.turnover_location(), Some(65));
        assert!(t.is_momentum_shift());
        assert!(!t.is_red_zone_turnover());
    }

    #[test]
    fn test_red_zone_fumble() {
        let c = ctx().with_field_position(83);
        let t = calculate_possession_changes(&PlayOutcome::fumble_lost(2), &c);
        assert_eq!(t.turnover_type(), Some(TurnoverType::FumbleLost));
        assert_eq!(t.reason(), Some(PossessionChangeReason::FumbleLost));
        assert!(t.is_red_zone_turnover());
        assert!(!t.is_goal_line_turnover());
    }

    #[test]
    fn test_untagged_turnover_falls_back_on_play_type() {
        let mut outcome = PlayOutcome::new(PlayType::Pass, 0);
        outcome.is_turnover = true;
        assert_eq!(turnover_type_for(&outcome), TurnoverType::Interception);
        outcome.play_type = PlayType::Punt;
        assert_eq!(turnover_type_for(&outcome), TurnoverType::BlockedPunt);
        outcome.play_type = PlayType::FieldGoal;
        assert_eq!(turnover_type_for(&outcome), TurnoverType::BlockedFieldGoal);
        outcome.play_type = PlayType::Kick;
        assert_eq!(turnover_type_for(&outcome), TurnoverType::MuffedKickoff);
        outcome.play_type = PlayType::Run;
        assert_eq!(turnover_type_for(&outcome), TurnoverType::FumbleLost);
    }

    #[test]
    fn test_scores_flip_possession() {
        let t = calculate_possession_changes(&PlayOutcome::touchdown_pass(18), &ctx().with_field_position(82));
        assert_eq!(t.reason(), Some(PossessionChangeReason::TouchdownScored));
        assert_eq!(t.new_possessing_team(), Some("SF"));
        assert!(!t.turnover_occurred());

        let t = calculate_possession_changes(&PlayOutcome::field_goal_good(41), &ctx());
        assert_eq!(t.reason(), Some(PossessionChangeReason::FieldGoalScored));

        let safety = PlayOutcome::run(-2).scoring(OutcomeTag::Safety);
        let t = calculate_possession_changes(&safety, &ctx().with_field_position(1));
        assert_eq!(t.reason(), Some(PossessionChangeReason::SafetyScored));
        assert!(t.is_scoring_change());
    }

    #[test]
    fn test_return_touchdown() {
        let pick_six = PlayOutcome::interception().scoring(OutcomeTag::Interception);
        let t = calculate_possession_changes(&pick_six, &ctx().with_field_position(30));
        assert!(t.turnover_occurred());
        assert!(t.is_return_touchdown());
        assert!(t.is_game_changing_play());
        assert_eq!(t.reason(), Some(PossessionChangeReason::TouchdownScored));
    }

    #[test]
    fn test_punt_flips_possession() {
        let t = calculate_possession_changes(&PlayOutcome::punt(44), &ctx().with_down_and_distance(4, 8));
        assert_eq!(t.reason(), Some(PossessionChangeReason::Punt));
        assert!(!t.turnover_occurred());
        assert_eq!(t.new_possessing_team(), Some("SF"));
    }

    #[test]
    fn test_goal_line_backstop() {
        let c = ctx().with_field_position(95).with_down_and_distance(1, 5);
        let t = calculate_possession_changes(&PlayOutcome::run(5), &c);
        assert!(t.possession_changes());
        assert_eq!(t.reason(), Some(PossessionChangeReason::TouchdownScored));
    }

    #[test]
    fn test_safety_backstop() {
        // sack at the 2 for -3, no score flag
        let c = ctx().with_field_position(2).with_down_and_distance(2, 10);
        let t = calculate_possession_changes(&PlayOutcome::run(-3).with_tag(OutcomeTag::Sack), &c);
        assert!(t.possession_changes());
        assert_eq!(t.reason(), Some(PossessionChangeReason::SafetyScored));
        assert_eq!(t.new_possessing_team(), Some("SF"));
        assert!(!t.turnover_occurred());
    }

    #[test]
    fn test_muffed_punt_returns_ball_to_punting_team() {
        let c = ctx().with_field_position(40).with_down_and_distance(4, 8);
        let t = calculate_possession_changes(&PlayOutcome::punt(45).turnover(OutcomeTag::MuffedPunt), &c);
        assert!(t.possession_changes());
        assert_eq!(t.turnover_type(), Some(TurnoverType::MuffedPunt));
        assert_eq!(t.old_possessing_team(), Some("SF"));
        assert_eq!(t.new_possessing_team(), Some("KC"));
        assert_eq!(t.turnover_location(), Some(85));

        // blocked punts still go to the defense
        let t = calculate_possession_changes(&PlayOutcome::punt(0).turnover(OutcomeTag::BlockedPunt), &c);
        assert_eq!(t.new_possessing_team(), Some("SF"));
    }

    #[test]
    fn test_missed_fourth_down_field_goal_is_turnover_on_downs() {
        // miss reported with its kick distance
        let c = ctx().with_field_position(70).with_down_and_distance(4, 3);
        let t = calculate_possession_changes(&PlayOutcome::new(PlayType::FieldGoal, 47), &c);
        assert!(t.possession_changes());
        assert_eq!(t.reason(), Some(PossessionChangeReason::TurnoverOnDowns));
        assert_eq!(t.new_possessing_team(), Some("SF"));

        let t = calculate_possession_changes(&PlayOutcome::field_goal_missed(), &c);
        assert_eq!(t.turnover_type(), Some(TurnoverType::OnDowns));
    }

    #[test]
    fn test_extreme_yardage_does_not_overflow() {
        let c = ctx().with_field_position(50);
        let t = calculate_possession_changes(&PlayOutcome::run(i32::MAX), &c);
        assert_eq!(t.reason(), Some(PossessionChangeReason::TouchdownScored));
        let t = calculate_possession_changes(&PlayOutcome::run(i32::MIN), &c);
        assert_eq!(t.reason(), Some(PossessionChangeReason::SafetyScored));
    }

    #[test]
    fn test_turnover_on_downs() {
        // 4th-and-3, 1-yard run
        let c = ctx().with_field_position(60).with_down_and_distance(4, 3);
        let t = calculate_possession_changes(&PlayOutcome::run(1), &c);
        assert!(t.possession_changes());
        assert_eq!(t.turnover_type(), Some(TurnoverType::OnDowns));
        assert_eq!(t.reason(), Some(PossessionChangeReason::TurnoverOnDowns));
        assert_eq!(t.turnover_location(), Some(40));
    }

    #[test]
    fn test_fourth_down_conversion_keeps_possession() {
        let c = ctx().with_field_position(60).with_down_and_distance(4, 3);
        let t = calculate_possession_changes(&PlayOutcome::run(3), &c);
        assert!(!t.possession_changes());
    }

    #[test]
    fn test_third_down_failure_keeps_possession() {
        let c = ctx().with_down_and_distance(3, 7);
        assert!(!calculate_possession_changes(&PlayOutcome::pass_incomplete(), &c).possession_changes());
    }

    #[test]
    fn test_extra_point_keeps_possession() {
        let t = calculate_possession_changes(&PlayOutcome::extra_point_good(), &ctx());
        assert!(!t.possession_changes());
    }

    #[test]
    fn test_unknown_possession_reports_absent_teams() {
        let c = GameContext::new("KC", "SF");
        let t = calculate_possession_changes(&PlayOutcome::interception(), &c);
        assert!(t.possession_changes());
        assert!(t.turnover_occurred());
        assert_eq!(t.old_possessing_team(), None);
        assert_eq!(t.new_possessing_team(), None);

        let t = calculate_possession_changes(&PlayOutcome::run(4), &c);
        assert_eq!(t.old_possessing_team(), None);
    }

    #[test]
    fn test_idempotent() {
        let c = ctx().with_field_position(70).with_down_and_distance(4, 2);
        let outcome = PlayOutcome::run(0);
        assert_eq!(
            calculate_possession_changes(&outcome, &c),
            calculate_possession_changes(&outcome, &c)
        );
    }

    fn play_type_strategy() -> impl Strategy<Value = PlayType> {
        prop::sample::select(PlayType::ALL.to_vec())
    }

    fn tag_strategy() -> impl Strategy<Value = Option<OutcomeTag>> {
        prop::option::of(prop::sample::select(vec![
            OutcomeTag::Touchdown,
            OutcomeTag::FieldGoal,
            OutcomeTag::Safety,
            OutcomeTag::Interception,
            OutcomeTag::Fumble,
            OutcomeTag::MuffedPunt,
            OutcomeTag::BlockedPunt,
            OutcomeTag::Sack,
        ]))
    }

    proptest! {
        #[test]
        fn prop_possession_and_turnover_invariants(
            play_type in play_type_strategy(),
            yards in -20i32..100,
            is_score in any::<bool>(),
            is_turnover in any::<bool>(),
            tag in tag_strategy(),
            down in 1u8..=4,
            yards_to_go in 1i32..30,
            field_position in 1i32..100,
        ) {
            let outcome = PlayOutcome {
                play_type,
                completion: Default::default(),
                yards_gained: yards,
                is_score,
                is_turnover,
                outcome: tag,
            };
            let c = ctx()
                .with_field_position(field_position)
                .with_down_and_distance(down, yards_to_go);
            let t = calculate_possession_changes(&outcome, &c);

            if t.possession_changes() {
                let old = t.old_possessing_team();
                let new = t.new_possessing_team();
                prop_assert!(old.is_some() && new.is_some());
                prop_assert_ne!(old, new);
            }
            if t.turnover_occurred() {
                prop_assert!(t.possession_changes());
                prop_assert!(t.turnover_type().is_some());
            }
            if down == 4 && play_type == PlayType::FieldGoal && !is_turnover {
                prop_assert!(t.possession_changes());
            }
        }
    }
}
