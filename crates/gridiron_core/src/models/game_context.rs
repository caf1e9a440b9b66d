//! Per-play game snapshot.
//!
//! Field position is always measured from the offense's perspective:
//! 0 = own goal line, 100 = opponent's goal line.

use serde::{Deserialize, Serialize};

/// Red zone starts at the opponent's 20
pub const RED_ZONE_START: i32 = 80;
/// Goal line territory starts at the opponent's 10
pub const GOAL_LINE_START: i32 = 90;
/// Two-minute window (seconds remaining)
pub const TWO_MINUTE_SECONDS: u32 = 120;
/// Fourth-quarter crunch window (seconds remaining)
pub const CRUNCH_TIME_SECONDS: u32 = 300;
/// Overtime quarter number
pub const OVERTIME_QUARTER: u8 = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TeamSide {
    Home,
    Away,
}

impl TeamSide {
    pub fn opponent(&self) -> Self {
        match self {
            TeamSide::Home => TeamSide::Away,
            TeamSide::Away => TeamSide::Home,
        }
    }
}

/// Read-only snapshot of the live game, produced fresh by the caller per play
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameContext {
    /// Seconds remaining in the current quarter
    pub game_clock_seconds: u32,
    /// 1-4 regulation, 5 = overtime
    pub quarter: u8,
    /// 1-4
    pub down: u8,
    pub yards_to_go: i32,
    /// 0-100, offense's perspective
    pub field_position: i32,
    /// Team currently on offense; `None` = possession unknown
    pub possession_team: Option<String>,
    pub home_team: String,
    pub away_team: String,
    pub home_score: u16,
    pub away_score: u16,
    pub home_timeouts: u8,
    pub away_timeouts: u8,
}

impl GameContext {
    /// Opening kickoff state: Q1 15:00, 1st-and-10 at the 25, nobody in possession
    pub fn new(home_team: impl Into<String>, away_team: impl Into<String>) -> Self {
        Self {
            game_clock_seconds: 900,
            quarter: 1,
            down: 1,
            yards_to_go: 10,
            field_position: 25,
            possession_team: None,
            home_team: home_team.into(),
            away_team: away_team.into(),
            home_score: 0,
            away_score: 0,
            home_timeouts: 3,
            away_timeouts: 3,
        }
    }

    pub fn with_possession(mut self, team: impl Into<String>) -> Self {
        self.possession_team = Some(team.into());
        self
    }

    pub fn with_down_and_distance(mut self, down: u8, yards_to_go: i32) -> Self {
        self.down = down;
        self.yards_to_go = yards_to_go;
        self
    }

    pub fn with_field_position(mut self, field_position: i32) -> Self {
        self.field_position = field_position;
        self
    }

    pub fn with_clock(mut self, quarter: u8, seconds: u32) -> Self {
        self.quarter = quarter;
        self.game_clock_seconds = seconds;
        self
    }

    pub fn with_score(mut self, home: u16, away: u16) -> Self {
        self.home_score = home;
        self.away_score = away;
        self
    }

    pub fn with_timeouts(mut self, home: u8, away: u8) -> Self {
        self.home_timeouts = home;
        self.away_timeouts = away;
        self
    }

    // ========== Derived flags ==========

    pub fn is_red_zone(&self) -> bool {
        self.field_position >= RED_ZONE_START
    }

    pub fn is_goal_line(&self) -> bool {
        self.field_position >= GOAL_LINE_START
    }

    /// Q2/Q4 with two minutes or less remaining
    pub fn is_two_minute(&self) -> bool {
        matches!(self.quarter, 2 | 4) && self.game_clock_seconds <= TWO_MINUTE_SECONDS
    }

    /// Last five minutes of the fourth quarter
    pub fn is_fourth_quarter_crunch(&self) -> bool {
        self.quarter == 4 && self.game_clock_seconds <= CRUNCH_TIME_SECONDS
    }

    pub fn is_second_half(&self) -> bool {
        self.quarter >= 3
    }

    pub fn is_overtime(&self) -> bool {
        self.quarter >= OVERTIME_QUARTER
    }

    pub fn is_tied(&self) -> bool {
        self.home_score == self.away_score
    }

    /// Yards between the ball and the goal line being attacked
    pub fn distance_to_goal(&self) -> i32 {
        100i32.saturating_sub(self.field_position)
    }

    // ========== Team lookups ==========

    pub fn side_of(&self, team: &str) -> Option<TeamSide> {
        if team == self.home_team {
            Some(TeamSide::Home)
        } else if team == self.away_team {
            Some(TeamSide::Away)
        } else {
            None
        }
    }

    pub fn team_name(&self, side: TeamSide) -> &str {
        match side {
            TeamSide::Home => &self.home_team,
            TeamSide::Away => &self.away_team,
        }
    }

    /// The other team, or `None` when `team` is not playing in this game
    pub fn opponent_of(&self, team: &str) -> Option<&str> {
        self.side_of(team).map(|side| self.team_name(side.opponent()))
    }

    /// Team on defense, when possession is known
    pub fn defending_team(&self) -> Option<&str> {
        self.possession_team.as_deref().and_then(|team| self.opponent_of(team))
    }

    pub fn score_for(&self, side: TeamSide) -> u16 {
        match side {
            TeamSide::Home => self.home_score,
            TeamSide::Away => self.away_score,
        }
    }

    /// Offense score minus defense score; 0 when possession is unknown
    pub fn score_differential(&self) -> i32 {
        match self.possession_team.as_deref().and_then(|t| self.side_of(t)) {
            Some(side) => {
                i32::from(self.score_for(side)) - i32::from(self.score_for(side.opponent()))
            }
            None => 0,
        }
    }

    pub fn timeouts_for(&self, team: &str) -> Option<u8> {
        self.side_of(team).map(|side| match side {
            TeamSide::Home => self.home_timeouts,
            TeamSide::Away => self.away_timeouts,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ctx() -> GameContext {
        GameContext::new("BUF", "MIA").with_possession("BUF")
    }

    #[test]
    fn test_opening_state() {
        let c = GameContext::new("BUF", "MIA");
        assert_eq!(c.quarter, 1);
        assert_eq!(c.game_clock_seconds, 900);
        assert!(c.possession_team.is_none());
        assert_eq!(c.defending_team(), None);
    }

    #[test]
    fn test_zone_flags() {
        let c = ctx().with_field_position(79);
        assert!(!c.is_red_zone());
        let c = c.with_field_position(80);
        assert!(c.is_red_zone());
        assert!(!c.is_goal_line());
        let c = c.with_field_position(90);
        assert!(c.is_goal_line());
        assert_eq!(c.distance_to_goal(), 10);
    }

    #[test]
    fn test_two_minute_only_in_q2_q4() {
        assert!(ctx().with_clock(2, 120).is_two_minute());
        assert!(ctx().with_clock(4, 30).is_two_minute());
        assert!(!ctx().with_clock(4, 121).is_two_minute());
        assert!(!ctx().with_clock(1, 60).is_two_minute());
        assert!(!ctx().with_clock(3, 60).is_two_minute());
        assert!(!ctx().with_clock(5, 60).is_two_minute());
    }

    #[test]
    fn test_team_lookups() {
        let c = ctx().with_score(10, 17);
        assert_eq!(c.opponent_of("BUF"), Some("MIA"));
        assert_eq!(c.opponent_of("NYJ"), None);
        assert_eq!(c.defending_team(), Some("MIA"));
        assert_eq!(c.score_differential(), -7);
        assert_eq!(c.timeouts_for("MIA"), Some(3));
        assert_eq!(c.timeouts_for("NYJ"), None);
    }

    #[test]
    fn test_score_differential_unknown_possession() {
        let c = GameContext::new("BUF", "MIA").with_score(21, 0);
        assert_eq!(c.score_differential(), 0);
    }
}
