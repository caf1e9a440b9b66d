//! Play outcome produced by the upstream play resolver.
//!
//! `yards_gained` is relative to the offense's direction of travel. For punts
//! it is the net punt distance, for field goals the kick distance. A missed
//! 4th-down field goal is a turnover on downs whatever distance it carries.
//! On kickoffs, where the receiving team holds possession, it is the yard line
//! the return reached; 0 means touchback.

use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlayType {
    Run,
    Pass,
    /// Kickoff / free kick
    Kick,
    Punt,
    FieldGoal,
    ExtraPoint,
}

impl PlayType {
    pub const ALL: [PlayType; 6] = [
        PlayType::Run,
        PlayType::Pass,
        PlayType::Kick,
        PlayType::Punt,
        PlayType::FieldGoal,
        PlayType::ExtraPoint,
    ];

    /// Ordinary offensive plays from scrimmage
    pub fn is_scrimmage(&self) -> bool {
        matches!(self, PlayType::Run | PlayType::Pass)
    }

    pub fn is_special_teams(&self) -> bool {
        !self.is_scrimmage()
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            PlayType::Run => "run",
            PlayType::Pass => "pass",
            PlayType::Kick => "kick",
            PlayType::Punt => "punt",
            PlayType::FieldGoal => "field_goal",
            PlayType::ExtraPoint => "extra_point",
        }
    }
}

impl fmt::Display for PlayType {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CompletionStatus {
    Complete,
    Incomplete,
    #[default]
    NotApplicable,
}

impl CompletionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            CompletionStatus::Complete => "complete",
            CompletionStatus::Incomplete => "incomplete",
            CompletionStatus::NotApplicable => "not_applicable",
        }
    }
}

/// Descriptive outcome tag attached by the play resolver
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum OutcomeTag {
    Touchdown,
    FieldGoal,
    Safety,
    Interception,
    Fumble,
    MuffedPunt,
    MuffedKickoff,
    BlockedPunt,
    BlockedFieldGoal,
    Incomplete,
    Completion,
    Sack,
    Touchback,
    FairCatch,
    Other(String),
}

impl OutcomeTag {
    pub fn as_str(&self) -> &str {
        match self {
            OutcomeTag::Touchdown => "touchdown",
            OutcomeTag::FieldGoal => "field_goal",
            OutcomeTag::Safety => "safety",
            OutcomeTag::Interception => "interception",
            OutcomeTag::Fumble => "fumble",
            OutcomeTag::MuffedPunt => "muffed_punt",
            OutcomeTag::MuffedKickoff => "muffed_kickoff",
            OutcomeTag::BlockedPunt => "blocked_punt",
            OutcomeTag::BlockedFieldGoal => "blocked_field_goal",
            OutcomeTag::Incomplete => "incomplete",
            OutcomeTag::Completion => "completion",
            OutcomeTag::Sack => "sack",
            OutcomeTag::Touchback => "touchback",
            OutcomeTag::FairCatch => "fair_catch",
            OutcomeTag::Other(raw) => raw,
        }
    }

    /// Tags that by themselves mean points were scored
    pub fn is_scoring(&self) -> bool {
        matches!(self, OutcomeTag::Touchdown | OutcomeTag::FieldGoal | OutcomeTag::Safety)
    }
}

impl From<String> for OutcomeTag {
    fn from(raw: String) -> Self {
        let normalized = raw.trim().to_ascii_lowercase().replace(['-', ' '], "_");
        match normalized.as_str() {
            "touchdown" | "td" => OutcomeTag::Touchdown,
            "field_goal" | "fg" => OutcomeTag::FieldGoal,
            "safety" => OutcomeTag::Safety,
            "interception" | "int" => OutcomeTag::Interception,
            "fumble" | "fumble_lost" => OutcomeTag::Fumble,
            "muffed_punt" => OutcomeTag::MuffedPunt,
            "muffed_kickoff" => OutcomeTag::MuffedKickoff,
            "blocked_punt" => OutcomeTag::BlockedPunt,
            "blocked_field_goal" | "blocked_fg" => OutcomeTag::BlockedFieldGoal,
            "incomplete" => OutcomeTag::Incomplete,
            "completion" | "complete" => OutcomeTag::Completion,
            "sack" => OutcomeTag::Sack,
            "touchback" => OutcomeTag::Touchback,
            "fair_catch" => OutcomeTag::FairCatch,
            _ => OutcomeTag::Other(raw),
        }
    }
}

impl From<&str> for OutcomeTag {
    fn from(raw: &str) -> Self {
        OutcomeTag::from(raw.to_string())
    }
}

impl From<OutcomeTag> for String {
    fn from(tag: OutcomeTag) -> Self {
        tag.as_str().to_string()
    }
}

impl fmt::Display for OutcomeTag {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of a single play
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayOutcome {
    pub play_type: PlayType,
    #[serde(default)]
    pub completion: CompletionStatus,
    pub yards_gained: i32,
    #[serde(default)]
    pub is_score: bool,
    #[serde(default)]
    pub is_turnover: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub outcome: Option<OutcomeTag>,
}

impl PlayOutcome {
    pub fn new(play_type: PlayType, yards_gained: i32) -> Self {
        Self {
            play_type,
            completion: CompletionStatus::NotApplicable,
            yards_gained,
            is_score: false,
            is_turnover: false,
            outcome: None,
        }
    }

    pub fn run(yards: i32) -> Self {
        Self::new(PlayType::Run, yards)
    }

    pub fn pass_complete(yards: i32) -> Self {
        Self {
            completion: CompletionStatus::Complete,
            outcome: Some(OutcomeTag::Completion),
            ..Self::new(PlayType::Pass, yards)
        }
    }

    pub fn pass_incomplete() -> Self {
        Self {
            completion: CompletionStatus::Incomplete,
            outcome: Some(OutcomeTag::Incomplete),
            ..Self::new(PlayType::Pass, 0)
        }
    }

    pub fn interception() -> Self {
        Self {
            completion: CompletionStatus::Incomplete,
            is_turnover: true,
            outcome: Some(OutcomeTag::Interception),
            ..Self::new(PlayType::Pass, 0)
        }
    }

    pub fn fumble_lost(yards: i32) -> Self {
        Self::run(yards).turnover(OutcomeTag::Fumble)
    }

    /// Net punt distance
    pub fn punt(net_yards: i32) -> Self {
        Self::new(PlayType::Punt, net_yards)
    }

    pub fn kickoff(yards: i32) -> Self {
        Self::new(PlayType::Kick, yards)
    }

    pub fn field_goal_good(distance: i32) -> Self {
        Self::new(PlayType::FieldGoal, distance).scoring(OutcomeTag::FieldGoal)
    }

    pub fn field_goal_missed() -> Self {
        Self::new(PlayType::FieldGoal, 0)
    }

    pub fn extra_point_good() -> Self {
        Self::new(PlayType::ExtraPoint, 0).scoring(OutcomeTag::Touchdown)
    }

    pub fn touchdown_run(yards: i32) -> Self {
        Self::run(yards).scoring(OutcomeTag::Touchdown)
    }

    pub fn touchdown_pass(yards: i32) -> Self {
        Self::pass_complete(yards).scoring(OutcomeTag::Touchdown)
    }

    pub fn with_tag(mut self, tag: impl Into<OutcomeTag>) -> Self {
        self.outcome = Some(tag.into());
        self
    }

    pub fn scoring(mut self, tag: OutcomeTag) -> Self {
        self.is_score = true;
        self.outcome = Some(tag);
        self
    }

    pub fn turnover(mut self, tag: OutcomeTag) -> Self {
        self.is_turnover = true;
        self.outcome = Some(tag);
        self
    }

    pub fn is_incomplete_pass(&self) -> bool {
        self.play_type == PlayType::Pass && self.completion == CompletionStatus::Incomplete
    }

    pub fn tag_is(&self, tag: &OutcomeTag) -> bool {
        self.outcome.as_ref() == Some(tag)
    }

    pub fn is_safety(&self) -> bool {
        self.tag_is(&OutcomeTag::Safety)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_outcome_tag_parsing() {
        assert_eq!(OutcomeTag::from("Interception"), OutcomeTag::Interception);
        assert_eq!(OutcomeTag::from("fumble-lost"), OutcomeTag::Fumble);
        assert_eq!(OutcomeTag::from("blocked field goal"), OutcomeTag::BlockedFieldGoal);
        assert_eq!(OutcomeTag::from("lateral"), OutcomeTag::Other("lateral".to_string()));
    }

    #[test]
    fn test_outcome_tag_serializes_as_string() {
        let json = serde_json::to_string(&OutcomeTag::MuffedPunt).unwrap();
        assert_eq!(json, "\"muffed_punt\"");
        let parsed: OutcomeTag = serde_json::from_str("\"hook_and_ladder\"").unwrap();
        assert_eq!(parsed.as_str(), "hook_and_ladder");
    }

    #[test]
    fn test_play_outcome_from_minimal_json() {
        let raw = r#"{"play_type": "run", "yards_gained": 4}"#;
        let outcome: PlayOutcome = serde_json::from_str(raw).unwrap();
        assert_eq!(outcome, PlayOutcome::run(4));
    }

    #[test]
    fn test_constructors() {
        assert!(PlayOutcome::interception().is_turnover);
        assert!(PlayOutcome::pass_incomplete().is_incomplete_pass());
        assert!(PlayOutcome::field_goal_good(40).is_score);
        assert!(PlayOutcome::run(-2).scoring(OutcomeTag::Safety).is_safety());
    }
}
