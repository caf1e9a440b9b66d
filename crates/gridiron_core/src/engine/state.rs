//! Next-state projection.
//!
//! `advance_state` turns (snapshot, outcome, transition, elapsed) into the
//! proposed next `GameContext`. It never validates; the session runs the
//! validators on the result before committing it.

use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::config::RulesConfig;
use crate::models::{GameContext, OutcomeTag, PlayOutcome, PlayType, TeamSide};
use crate::possession::FINAL_DOWN;
use crate::transition::{PossessionChangeReason, PossessionTransition};

pub const TOUCHDOWN_POINTS: u16 = 6;
pub const FIELD_GOAL_POINTS: u16 = 3;
pub const EXTRA_POINT_POINTS: u16 = 1;
pub const SAFETY_POINTS: u16 = 2;

const FIRST_DOWN_DISTANCE: i32 = 10;

/// Points credited by one play
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreCredit {
    pub team: String,
    pub points: u16,
}

impl ScoreCredit {
    pub fn is_touchdown(&self) -> bool {
        self.points == TOUCHDOWN_POINTS
    }
}

/// Who scored, and how much.
///
/// Tries are credited to the team on defense in the snapshot: possession
/// moved to the receiving team on the touchdown itself. Return touchdowns go
/// to the team that recovered the ball.
/// `None` when nothing scored or the scoring team cannot be identified.
pub fn score_credit(ctx: &GameContext, outcome: &PlayOutcome, transition: &PossessionTransition) -> Option<ScoreCredit> {
    let offense = ctx.possession_team.as_deref().filter(|t| ctx.side_of(t).is_some());
    let defense = ctx.defending_team();

    let (team, points) = match transition.reason() {
        Some(PossessionChangeReason::TouchdownScored) if transition.is_return_touchdown() => {
            (transition.new_possessing_team(), TOUCHDOWN_POINTS)
        }
        Some(PossessionChangeReason::TouchdownScored) => (offense, TOUCHDOWN_POINTS),
        Some(PossessionChangeReason::FieldGoalScored) => (offense, FIELD_GOAL_POINTS),
        Some(PossessionChangeReason::SafetyScored) => (defense, SAFETY_POINTS),
        _ if outcome.play_type == PlayType::ExtraPoint && outcome.is_score => (defense, EXTRA_POINT_POINTS),
        _ => return None,
    };

    let team = team?;
    Some(ScoreCredit { team: team.to_string(), points })
}

pub fn advance_state(
    ctx: &GameContext,
    outcome: &PlayOutcome,
    transition: &PossessionTransition,
    elapsed_seconds: u32,
    rules: &RulesConfig,
) -> GameContext {
    let credit = score_credit(ctx, outcome, transition);
    advance_state_with_credit(ctx, outcome, transition, elapsed_seconds, rules, credit.as_ref())
}

/// `advance_state` with the score credit decided by the caller
pub fn advance_state_with_credit(
    ctx: &GameContext,
    outcome: &PlayOutcome,
    transition: &PossessionTransition,
    elapsed_seconds: u32,
    rules: &RulesConfig,
    credit: Option<&ScoreCredit>,
) -> GameContext {
    let mut next = ctx.clone();
    next.game_clock_seconds = ctx.game_clock_seconds.saturating_sub(elapsed_seconds);

    if let Some(credit) = credit {
        match ctx.side_of(&credit.team) {
            Some(TeamSide::Home) => next.home_score = next.home_score.saturating_add(credit.points),
            Some(TeamSide::Away) => next.away_score = next.away_score.saturating_add(credit.points),
            None => {}
        }
    }

    if transition.possession_changes() {
        // after any score the team scored upon holds possession for the kickoff
        let receiving = if transition.is_return_touchdown() {
            transition.old_possessing_team()
        } else {
            transition.new_possessing_team()
        };
        if let Some(team) = receiving {
            next.possession_team = Some(team.to_string());
        }
        next.field_position = new_possession_spot(ctx, outcome, transition, rules);
        set_first_down(&mut next);
    } else {
        advance_retained(&mut next, ctx, outcome, rules);
    }

    trace!(
        quarter = next.quarter,
        clock = next.game_clock_seconds,
        down = next.down,
        yards_to_go = next.yards_to_go,
        field_position = next.field_position,
        "state projected"
    );
    next
}

/// Spot of the new offense, from its own perspective
fn new_possession_spot(
    ctx: &GameContext,
    outcome: &PlayOutcome,
    transition: &PossessionTransition,
    rules: &RulesConfig,
) -> i32 {
    if transition.is_scoring_change() {
        // receiving the ensuing kickoff
        return rules.kickoff_touchback_yard_line;
    }
    match transition.reason() {
        Some(PossessionChangeReason::Punt) => {
            let landing = ctx.field_position.saturating_add(outcome.yards_gained);
            if landing >= 100 || outcome.tag_is(&OutcomeTag::Touchback) {
                rules.punt_touchback_yard_line
            } else {
                mirror(landing)
            }
        }
        // defense takes over where the offense was stopped
        Some(PossessionChangeReason::TurnoverOnDowns) => mirror(ctx.field_position),
        // punting team recovers at the muff, still going the same way
        Some(PossessionChangeReason::MuffedPunt) if outcome.play_type == PlayType::Punt => {
            ctx.field_position.saturating_add(outcome.yards_gained).clamp(1, 99)
        }
        _ => {
            let spot = ctx.field_position.saturating_add(outcome.yards_gained);
            if spot >= 100 {
                rules.punt_touchback_yard_line
            } else {
                mirror(spot)
            }
        }
    }
}

/// Same offense keeps the ball. Scores never get here except tries.
fn advance_retained(next: &mut GameContext, ctx: &GameContext, outcome: &PlayOutcome, rules: &RulesConfig) {
    match outcome.play_type {
        PlayType::Run | PlayType::Pass => {
            next.field_position = ctx.field_position.saturating_add(outcome.yards_gained).clamp(1, 99);
            if outcome.yards_gained >= ctx.yards_to_go {
                set_first_down(next);
            } else {
                next.down = next_down(ctx.down);
                next.yards_to_go = ctx.yards_to_go.saturating_sub(outcome.yards_gained);
            }
        }
        PlayType::Kick => {
            // `yards_gained` on a kickoff is the spot the return reached
            next.field_position = if outcome.yards_gained <= 0 || outcome.tag_is(&OutcomeTag::Touchback) {
                rules.kickoff_touchback_yard_line
            } else {
                outcome.yards_gained.clamp(1, 99)
            };
            set_first_down(next);
        }
        PlayType::ExtraPoint => set_first_down(next),
        // missed kick short of 4th down
        PlayType::Punt | PlayType::FieldGoal => next.down = next_down(ctx.down),
    }
}

fn next_down(down: u8) -> u8 {
    down.saturating_add(1).min(FINAL_DOWN)
}

/// 1st-and-10, goal-to-go capped at the distance to the goal line
fn set_first_down(ctx: &mut GameContext) {
    ctx.down = 1;
    ctx.yards_to_go = FIRST_DOWN_DISTANCE.min(100i32.saturating_sub(ctx.field_position)).max(0);
}

/// Spot seen from the other team's side of the field
fn mirror(spot: i32) -> i32 {
    100i32.saturating_sub(spot).clamp(1, 99)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::possession::calculate_possession_changes;
    use proptest::prelude::*;

    fn ctx() -> GameContext {
        GameContext::new("HOU", "IND").with_possession("HOU").with_clock(1, 600)
    }

    fn project(c: &GameContext, outcome: &PlayOutcome, elapsed: u32) -> GameContext {
        let t = calculate_possession_changes(outcome, c);
        advance_state(c, outcome, &t, elapsed, &RulesConfig::default())
    }

    #[test]
    fn test_gain_short_of_line() {
        let next = project(&ctx().with_field_position(30), &PlayOutcome::run(4), 28);
        assert_eq!(next.down, 2);
        assert_eq!(next.yards_to_go, 6);
        assert_eq!(next.field_position, 34);
        assert_eq!(next.game_clock_seconds, 572);
    }

    #[test]
    fn test_first_down_resets_chains() {
        let next = project(&ctx().with_field_position(50).with_down_and_distance(3, 4), &PlayOutcome::run(12), 28);
        assert_eq!((next.down, next.yards_to_go, next.field_position), (1, 10, 62));
    }

    #[test]
    fn test_goal_to_go() {
        let next = project(&ctx().with_field_position(80), &PlayOutcome::pass_complete(14), 24);
        assert_eq!(next.field_position, 94);
        assert_eq!(next.yards_to_go, 6);
    }

    #[test]
    fn test_clock_floors_at_zero() {
        let next = project(&ctx().with_clock(2, 10), &PlayOutcome::run(2), 28);
        assert_eq!(next.game_clock_seconds, 0);
    }

    #[test]
    fn test_touchdown_credits_offense_and_flips() {
        let next = project(&ctx().with_field_position(75), &PlayOutcome::touchdown_pass(25), 10);
        assert_eq!(next.home_score, 6);
        assert_eq!(next.possession_team.as_deref(), Some("IND"));
        assert_eq!(next.field_position, 25);
        assert_eq!((next.down, next.yards_to_go), (1, 10));
    }

    #[test]
    fn test_safety_credits_defense() {
        let safety = PlayOutcome::run(-3).scoring(OutcomeTag::Safety);
        let next = project(&ctx().with_field_position(2), &safety, 6);
        assert_eq!(next.away_score, 2);
        assert_eq!(next.home_score, 0);
        assert_eq!(next.possession_team.as_deref(), Some("IND"));
    }

    #[test]
    fn test_extra_point_credits_kicking_team() {
        // after a HOU touchdown, IND holds possession for the kickoff
        let after_td = GameContext::new("HOU", "IND").with_possession("IND").with_score(6, 0);
        let next = project(&after_td, &PlayOutcome::extra_point_good(), 5);
        assert_eq!(next.home_score, 7);
        assert_eq!(next.possession_team.as_deref(), Some("IND"));
    }

    #[test]
    fn test_punt_spot_and_touchback() {
        let next = project(&ctx().with_field_position(30).with_down_and_distance(4, 9), &PlayOutcome::punt(45), 10);
        assert_eq!(next.possession_team.as_deref(), Some("IND"));
        assert_eq!(next.field_position, 25);

        let next = project(&ctx().with_field_position(60).with_down_and_distance(4, 9), &PlayOutcome::punt(45), 10);
        assert_eq!(next.field_position, 20);
    }

    #[test]
    fn test_turnover_on_downs_keeps_spot() {
        let next = project(&ctx().with_field_position(62).with_down_and_distance(4, 3), &PlayOutcome::run(1), 28);
        assert_eq!(next.possession_team.as_deref(), Some("IND"));
        assert_eq!(next.field_position, 38);
        assert_eq!(next.down, 1);
    }

    #[test]
    fn test_interception_spot() {
        let next = project(&ctx().with_field_position(35), &PlayOutcome::interception(), 6);
        assert_eq!(next.field_position, 65);
        let mut deep = PlayOutcome::interception();
        deep.yards_gained = 70;
        let next = project(&ctx().with_field_position(35), &deep, 6);
        assert_eq!(next.field_position, 20);
    }

    #[test]
    fn test_kickoff_return_spot() {
        let receiving = GameContext::new("HOU", "IND").with_possession("IND").with_field_position(25);
        let next = project(&receiving, &PlayOutcome::kickoff(31), 8);
        assert_eq!(next.field_position, 31);
        let next = project(&receiving, &PlayOutcome::kickoff(0).with_tag(OutcomeTag::Touchback), 0);
        assert_eq!(next.field_position, 25);
    }

    #[test]
    fn test_return_touchdown_credits_defense() {
        let pick_six = PlayOutcome::interception().scoring(OutcomeTag::Interception);
        let c = ctx().with_field_position(40);
        let t = calculate_possession_changes(&pick_six, &c);
        let credit = score_credit(&c, &pick_six, &t).unwrap();
        assert_eq!(credit, ScoreCredit { team: "IND".to_string(), points: 6 });

        let next = advance_state(&c, &pick_six, &t, 8, &RulesConfig::default());
        assert_eq!(next.away_score, 6);
        assert_eq!(next.possession_team.as_deref(), Some("HOU"));
        assert_eq!(next.field_position, 25);
    }

    #[test]
    fn test_unflagged_safety_scores_and_flips() {
        let sack = PlayOutcome::run(-3).with_tag(OutcomeTag::Sack);
        let next = project(&ctx().with_field_position(2).with_down_and_distance(2, 10), &sack, 6);
        assert_eq!((next.home_score, next.away_score), (0, 2));
        assert_eq!(next.possession_team.as_deref(), Some("IND"));
        assert_eq!((next.down, next.field_position), (1, 25));
    }

    #[test]
    fn test_muffed_punt_recovered_at_muff() {
        let muff = PlayOutcome::punt(45).turnover(OutcomeTag::MuffedPunt);
        let next = project(&ctx().with_field_position(40).with_down_and_distance(4, 8), &muff, 9);
        assert_eq!(next.possession_team.as_deref(), Some("HOU"));
        assert_eq!(next.field_position, 85);
        assert_eq!((next.down, next.yards_to_go), (1, 10));
    }

    #[test]
    fn test_muffed_punt_touchdown_credits_punting_team() {
        let mut muff_td = PlayOutcome::punt(45).turnover(OutcomeTag::MuffedPunt);
        muff_td.is_score = true;
        let c = ctx().with_field_position(40).with_down_and_distance(4, 8);
        let next = project(&c, &muff_td, 9);
        assert_eq!((next.home_score, next.away_score), (6, 0));
        assert_eq!(next.possession_team.as_deref(), Some("IND"));
    }

    #[test]
    fn test_missed_field_goal_on_fourth_down() {
        let c = ctx().with_field_position(70).with_down_and_distance(4, 3);
        let next = project(&c, &PlayOutcome::new(PlayType::FieldGoal, 47), 5);
        assert_eq!(next.possession_team.as_deref(), Some("IND"));
        assert_eq!((next.down, next.field_position), (1, 30));

        // third-down miss keeps the ball
        let c = ctx().with_field_position(70).with_down_and_distance(3, 3);
        let next = project(&c, &PlayOutcome::field_goal_missed(), 5);
        assert_eq!(next.possession_team.as_deref(), Some("HOU"));
        assert_eq!(next.down, 4);
    }

    #[test]
    fn test_extreme_yardage_saturates() {
        let next = project(&ctx().with_field_position(40), &PlayOutcome::punt(i32::MAX), 5);
        assert_eq!(next.field_position, 20);
        let mut fumble = PlayOutcome::fumble_lost(0);
        fumble.yards_gained = i32::MIN;
        let next = project(&ctx().with_field_position(40), &fumble, 5);
        assert_eq!(next.field_position, 99);
    }

    #[test]
    fn test_unknown_possession_scores_nobody() {
        let c = GameContext::new("HOU", "IND");
        let outcome = PlayOutcome::touchdown_run(3);
        let t = calculate_possession_changes(&outcome, &c);
        assert!(score_credit(&c, &outcome, &t).is_none());
        let next = advance_state(&c, &outcome, &t, 5, &RulesConfig::default());
        assert_eq!((next.home_score, next.away_score), (0, 0));
        assert!(next.possession_team.is_none());
    }

    fn tag_strategy() -> impl Strategy<Value = Option<OutcomeTag>> {
        prop::option::of(prop::sample::select(vec![
            OutcomeTag::Touchdown,
            OutcomeTag::FieldGoal,
            OutcomeTag::Safety,
            OutcomeTag::Interception,
            OutcomeTag::Fumble,
            OutcomeTag::MuffedPunt,
            OutcomeTag::MuffedKickoff,
            OutcomeTag::BlockedPunt,
            OutcomeTag::BlockedFieldGoal,
            OutcomeTag::Touchback,
            OutcomeTag::Sack,
        ]))
    }

    proptest! {
        #[test]
        fn prop_clock_and_score_never_go_backwards(
            play_type in prop::sample::select(PlayType::ALL.to_vec()),
            yards in -20i32..100,
            is_score in any::<bool>(),
            is_turnover in any::<bool>(),
            down in 1u8..=4,
            yards_to_go in 1i32..20,
            field_position in 1i32..100,
            clock in 0u32..=900,
            elapsed in 0u32..=60,
        ) {
            let outcome = PlayOutcome {
                play_type,
                completion: Default::default(),
                yards_gained: yards,
                is_score,
                is_turnover,
                outcome: None,
            };
            let c = ctx()
                .with_clock(2, clock)
                .with_field_position(field_position)
                .with_down_and_distance(down, yards_to_go);
            let next = project(&c, &outcome, elapsed);

            prop_assert_eq!(next.game_clock_seconds, clock.saturating_sub(elapsed));
            prop_assert!(next.home_score >= c.home_score);
            prop_assert!(next.away_score >= c.away_score);
            prop_assert_eq!(next.quarter, c.quarter);
        }

        #[test]
        fn prop_committed_down_and_spot_stay_legal(
            play_type in prop::sample::select(PlayType::ALL.to_vec()),
            yards in -150i32..150,
            is_score in any::<bool>(),
            is_turnover in any::<bool>(),
            tag in tag_strategy(),
            down in 1u8..=4,
            yards_to_go in 1i32..20,
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
            let next = project(&c, &outcome, 5);

            prop_assert!((1..=FINAL_DOWN).contains(&next.down));
            prop_assert!((1..=99).contains(&next.field_position));
            if is_score {
                prop_assert_eq!(next.down, 1);
            }
        }
    }
}
