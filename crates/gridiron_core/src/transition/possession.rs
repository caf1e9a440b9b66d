//! Ordinary possession changes.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::TransitionError;

/// Red-zone turnover threshold (yards from the goal line being attacked)
pub const RED_ZONE_TURNOVER_YARDS: i32 = 20;
/// Goal-line turnover threshold
pub const GOAL_LINE_TURNOVER_YARDS: i32 = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TurnoverType {
    Interception,
    FumbleLost,
    OnDowns,
    MuffedPunt,
    MuffedKickoff,
    BlockedPunt,
    BlockedFieldGoal,
}

impl TurnoverType {
    pub fn as_str(&self) -> &'static str {
        match self {
            TurnoverType::Interception => "INTERCEPTION",
            TurnoverType::FumbleLost => "FUMBLE_LOST",
            TurnoverType::OnDowns => "ON_DOWNS",
            TurnoverType::MuffedPunt => "MUFFED_PUNT",
            TurnoverType::MuffedKickoff => "MUFFED_KICKOFF",
            TurnoverType::BlockedPunt => "BLOCKED_PUNT",
            TurnoverType::BlockedFieldGoal => "BLOCKED_FIELD_GOAL",
        }
    }

    /// Turnovers forced by the defense
    pub fn is_defensive(&self) -> bool {
        matches!(
            self,
            TurnoverType::Interception
                | TurnoverType::FumbleLost
                | TurnoverType::BlockedPunt
                | TurnoverType::BlockedFieldGoal
        )
    }

    /// Turnovers the offense (or return unit) gives away on its own
    pub fn is_offensive(&self) -> bool {
        matches!(
            self,
            TurnoverType::OnDowns | TurnoverType::MuffedPunt | TurnoverType::MuffedKickoff
        )
    }

    pub fn is_special_teams(&self) -> bool {
        matches!(
            self,
            TurnoverType::MuffedPunt
                | TurnoverType::MuffedKickoff
                | TurnoverType::BlockedPunt
                | TurnoverType::BlockedFieldGoal
        )
    }

    /// Reason code recorded for this turnover
    pub fn reason(&self) -> PossessionChangeReason {
        match self {
            TurnoverType::Interception => PossessionChangeReason::Interception,
            TurnoverType::FumbleLost => PossessionChangeReason::FumbleLost,
            TurnoverType::OnDowns => PossessionChangeReason::TurnoverOnDowns,
            TurnoverType::MuffedPunt => PossessionChangeReason::MuffedPunt,
            TurnoverType::MuffedKickoff => PossessionChangeReason::MuffedKickoff,
            TurnoverType::BlockedPunt => PossessionChangeReason::BlockedPunt,
            TurnoverType::BlockedFieldGoal => PossessionChangeReason::BlockedFieldGoal,
        }
    }
}

impl fmt::Display for TurnoverType {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PossessionChangeReason {
    TouchdownScored,
    FieldGoalScored,
    SafetyScored,
    Punt,
    Kickoff,
    Interception,
    FumbleLost,
    TurnoverOnDowns,
    MuffedPunt,
    MuffedKickoff,
    BlockedPunt,
    BlockedFieldGoal,
    OnsideKickRecovered,
    HalfStart,
    OvertimeStart,
    GameStart,
}

impl PossessionChangeReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            PossessionChangeReason::TouchdownScored => "TOUCHDOWN_SCORED",
            PossessionChangeReason::FieldGoalScored => "FIELD_GOAL_SCORED",
            PossessionChangeReason::SafetyScored => "SAFETY_SCORED",
            PossessionChangeReason::Punt => "PUNT",
            PossessionChangeReason::Kickoff => "KICKOFF",
            PossessionChangeReason::Interception => "INTERCEPTION",
            PossessionChangeReason::FumbleLost => "FUMBLE_LOST",
            PossessionChangeReason::TurnoverOnDowns => "TURNOVER_ON_DOWNS",
            PossessionChangeReason::MuffedPunt => "MUFFED_PUNT",
            PossessionChangeReason::MuffedKickoff => "MUFFED_KICKOFF",
            PossessionChangeReason::BlockedPunt => "BLOCKED_PUNT",
            PossessionChangeReason::BlockedFieldGoal => "BLOCKED_FIELD_GOAL",
            PossessionChangeReason::OnsideKickRecovered => "ONSIDE_KICK_RECOVERED",
            PossessionChangeReason::HalfStart => "HALF_START",
            PossessionChangeReason::OvertimeStart => "OVERTIME_START",
            PossessionChangeReason::GameStart => "GAME_START",
        }
    }

    /// Points were scored on the play that caused the change
    pub fn is_scoring(&self) -> bool {
        matches!(
            self,
            PossessionChangeReason::TouchdownScored
                | PossessionChangeReason::FieldGoalScored
                | PossessionChangeReason::SafetyScored
        )
    }

    pub fn is_turnover(&self) -> bool {
        matches!(
            self,
            PossessionChangeReason::Interception
                | PossessionChangeReason::FumbleLost
                | PossessionChangeReason::TurnoverOnDowns
                | PossessionChangeReason::MuffedPunt
                | PossessionChangeReason::MuffedKickoff
                | PossessionChangeReason::BlockedPunt
                | PossessionChangeReason::BlockedFieldGoal
        )
    }

    /// Period boundaries rather than plays
    pub fn is_period_start(&self) -> bool {
        matches!(
            self,
            PossessionChangeReason::HalfStart
                | PossessionChangeReason::OvertimeStart
                | PossessionChangeReason::GameStart
        )
    }
}

impl fmt::Display for PossessionChangeReason {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Old and new possessing team. Always present together or not at all.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PossessionTeams {
    pub old: String,
    pub new: String,
}

impl PossessionTeams {
    pub fn new(old: impl Into<String>, new: impl Into<String>) -> Self {
        Self { old: old.into(), new: new.into() }
    }
}

/// Result of the possession calculator for one play
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PossessionTransition {
    possession_changes: bool,
    teams: Option<PossessionTeams>,
    turnover_type: Option<TurnoverType>,
    reason: Option<PossessionChangeReason>,
    /// Yards from the goal line the offense was attacking when the ball changed hands
    turnover_location: Option<i32>,
    return_touchdown: bool,
    onside_kick_recovered: bool,

    // derived at construction
    red_zone_turnover: bool,
    goal_line_turnover: bool,
    momentum_shift: bool,
    game_changing_play: bool,
}

/// Raw inputs before derived fields are computed
#[derive(Debug, Clone, Default)]
struct Draft {
    possession_changes: bool,
    teams: Option<PossessionTeams>,
    turnover_type: Option<TurnoverType>,
    reason: Option<PossessionChangeReason>,
    turnover_location: Option<i32>,
    return_touchdown: bool,
    onside_kick_recovered: bool,
}

impl PossessionTransition {
    fn finish(draft: Draft) -> Self {
        let turnover = draft.turnover_type.is_some();
        let location = draft.turnover_location;
        let red_zone_turnover =
            turnover && location.is_some_and(|yards| yards <= RED_ZONE_TURNOVER_YARDS);
        let goal_line_turnover =
            turnover && location.is_some_and(|yards| yards <= GOAL_LINE_TURNOVER_YARDS);
        let momentum_shift = turnover
            || draft.return_touchdown
            || red_zone_turnover
            || draft.onside_kick_recovered;
        let game_changing_play =
            draft.return_touchdown || goal_line_turnover || draft.onside_kick_recovered;

        Self {
            possession_changes: draft.possession_changes,
            teams: draft.teams,
            turnover_type: draft.turnover_type,
            reason: draft.reason,
            turnover_location: draft.turnover_location,
            return_touchdown: draft.return_touchdown,
            onside_kick_recovered: draft.onside_kick_recovered,
            red_zone_turnover,
            goal_line_turnover,
            momentum_shift,
            game_changing_play,
        }
    }

    /// Possession stays with `team` (or stays unknown)
    pub(crate) fn retained(team: Option<&str>) -> Self {
        Self::finish(Draft {
            teams: team.map(|t| PossessionTeams::new(t, t)),
            ..Draft::default()
        })
    }

    /// Possession flips. `teams` is `None` only when possession is unknown.
    pub(crate) fn changed(
        teams: Option<PossessionTeams>,
        reason: PossessionChangeReason,
        turnover_type: Option<TurnoverType>,
        turnover_location: Option<i32>,
    ) -> Self {
        Self::finish(Draft {
            possession_changes: true,
            teams,
            turnover_type,
            reason: Some(reason),
            turnover_location: turnover_type.and(turnover_location),
            ..Draft::default()
        })
    }

    /// Defense took the ball away and scored on the same play
    pub(crate) fn return_touchdown(
        teams: Option<PossessionTeams>,
        turnover_type: TurnoverType,
        turnover_location: i32,
    ) -> Self {
        Self::finish(Draft {
            possession_changes: true,
            teams,
            turnover_type: Some(turnover_type),
            reason: Some(PossessionChangeReason::TouchdownScored),
            turnover_location: Some(turnover_location),
            return_touchdown: true,
            ..Draft::default()
        })
    }

    pub fn builder() -> PossessionTransitionBuilder {
        PossessionTransitionBuilder::default()
    }

    // ========== Accessors ==========

    pub fn possession_changes(&self) -> bool {
        self.possession_changes
    }

    pub fn old_possessing_team(&self) -> Option<&str> {
        self.teams.as_ref().map(|t| t.old.as_str())
    }

    pub fn new_possessing_team(&self) -> Option<&str> {
        self.teams.as_ref().map(|t| t.new.as_str())
    }

    pub fn teams(&self) -> Option<&PossessionTeams> {
        self.teams.as_ref()
    }

    pub fn turnover_occurred(&self) -> bool {
        self.turnover_type.is_some()
    }

    pub fn turnover_type(&self) -> Option<TurnoverType> {
        self.turnover_type
    }

    pub fn reason(&self) -> Option<PossessionChangeReason> {
        self.reason
    }

    pub fn turnover_location(&self) -> Option<i32> {
        self.turnover_location
    }

    pub fn is_return_touchdown(&self) -> bool {
        self.return_touchdown
    }

    pub fn is_onside_kick_recovered(&self) -> bool {
        self.onside_kick_recovered
    }

    pub fn is_red_zone_turnover(&self) -> bool {
        self.red_zone_turnover
    }

    pub fn is_goal_line_turnover(&self) -> bool {
        self.goal_line_turnover
    }

    pub fn is_momentum_shift(&self) -> bool {
        self.momentum_shift
    }

    pub fn is_game_changing_play(&self) -> bool {
        self.game_changing_play
    }

    pub fn is_scoring_change(&self) -> bool {
        self.reason.is_some_and(|r| r.is_scoring())
    }

    /// One-line human readable description
    pub fn summary(&self) -> String {
        if !self.possession_changes {
            return match self.old_possessing_team() {
                Some(team) => format!("{} retains possession", team),
                None => "possession unchanged (team unknown)".to_string(),
            };
        }

        let teams = match &self.teams {
            Some(t) => format!("{} -> {}", t.old, t.new),
            None => "unknown -> unknown".to_string(),
        };
        let reason = self.reason.map(|r| r.as_str()).unwrap_or("UNSPECIFIED");
        let mut text = format!("Possession change {} ({})", teams, reason);
        if let Some(location) = self.turnover_location {
            text.push_str(&format!(", {} yards from goal", location));
        }
        if self.game_changing_play {
            text.push_str(" [game-changing]");
        } else if self.momentum_shift {
            text.push_str(" [momentum shift]");
        }
        text
    }
}

/// Builder for transitions produced outside the calculator
/// (kickoffs, period starts, replays from storage).
#[derive(Debug, Clone, Default)]
pub struct PossessionTransitionBuilder {
    draft: Draft,
    old_team: Option<String>,
    new_team: Option<String>,
}

impl PossessionTransitionBuilder {
    pub fn possession_changes(mut self, changes: bool) -> Self {
        self.draft.possession_changes = changes;
        self
    }

    pub fn old_team(mut self, team: impl Into<String>) -> Self {
        self.old_team = Some(team.into());
        self
    }

    pub fn new_team(mut self, team: impl Into<String>) -> Self {
        self.new_team = Some(team.into());
        self
    }

    pub fn teams(self, old: impl Into<String>, new: impl Into<String>) -> Self {
        self.old_team(old).new_team(new)
    }

    pub fn turnover(mut self, turnover_type: TurnoverType) -> Self {
        self.draft.turnover_type = Some(turnover_type);
        self
    }

    pub fn reason(mut self, reason: PossessionChangeReason) -> Self {
        self.draft.reason = Some(reason);
        self
    }

    pub fn turnover_location(mut self, yards_from_goal: i32) -> Self {
        self.draft.turnover_location = Some(yards_from_goal);
        self
    }

    pub fn return_touchdown(mut self, value: bool) -> Self {
        self.draft.return_touchdown = value;
        self
    }

    pub fn onside_kick_recovered(mut self, value: bool) -> Self {
        self.draft.onside_kick_recovered = value;
        self
    }

    pub fn build(self) -> Result<PossessionTransition, TransitionError> {
        let mut draft = self.draft;

        draft.teams = match (self.old_team, self.new_team) {
            (Some(old), Some(new)) => Some(PossessionTeams { old, new }),
            (None, None) => None,
            _ => return Err(TransitionError::IncompleteTeams),
        };

        if let Some(turnover) = draft.turnover_type {
            if !draft.possession_changes {
                return Err(TransitionError::TurnoverWithoutPossessionChange);
            }
            if draft.reason.is_none() {
                draft.reason = Some(turnover.reason());
            }
        } else if draft.reason.is_some_and(|r| r.is_turnover()) {
            return Err(TransitionError::TurnoverWithoutType);
        }

        if let Some(teams) = &draft.teams {
            if draft.possession_changes && teams.old == teams.new {
                return Err(TransitionError::SameTeam { team: teams.old.clone() });
            }
            if !draft.possession_changes && teams.old != teams.new {
                return Err(TransitionError::TeamsDifferWithoutChange {
                    old: teams.old.clone(),
                    new: teams.new.clone(),
                });
            }
        }

        if draft.turnover_type.is_none() {
            draft.turnover_location = None;
        }

        Ok(PossessionTransition::finish(draft))
    }
}
