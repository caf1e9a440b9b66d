//! Audit entry types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use uuid::Uuid;

use crate::models::{GameContext, PlayOutcome, OVERTIME_QUARTER};
use crate::transition::{PossessionTransition, SpecialSituationTransition};
use crate::validation::ValidationResult;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AuditEventType {
    PlayExecuted,
    StateTransition,
    PossessionChange,
    ScoreUpdate,
    QuarterChange,
    DriveStart,
    DriveEnd,
    TimeoutCalled,
    SpecialSituation,
    SystemEvent,
    ErrorCondition,
    ValidationFailure,
}

impl AuditEventType {
    pub const ALL: [AuditEventType; 12] = [
        AuditEventType::PlayExecuted,
        AuditEventType::StateTransition,
        AuditEventType::PossessionChange,
        AuditEventType::ScoreUpdate,
        AuditEventType::QuarterChange,
        AuditEventType::DriveStart,
        AuditEventType::DriveEnd,
        AuditEventType::TimeoutCalled,
        AuditEventType::SpecialSituation,
        AuditEventType::SystemEvent,
        AuditEventType::ErrorCondition,
        AuditEventType::ValidationFailure,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            AuditEventType::PlayExecuted => "PLAY_EXECUTED",
            AuditEventType::StateTransition => "STATE_TRANSITION",
            AuditEventType::PossessionChange => "POSSESSION_CHANGE",
            AuditEventType::ScoreUpdate => "SCORE_UPDATE",
            AuditEventType::QuarterChange => "QUARTER_CHANGE",
            AuditEventType::DriveStart => "DRIVE_START",
            AuditEventType::DriveEnd => "DRIVE_END",
            AuditEventType::TimeoutCalled => "TIMEOUT_CALLED",
            AuditEventType::SpecialSituation => "SPECIAL_SITUATION",
            AuditEventType::SystemEvent => "SYSTEM_EVENT",
            AuditEventType::ErrorCondition => "ERROR_CONDITION",
            AuditEventType::ValidationFailure => "VALIDATION_FAILURE",
        }
    }
}

/// Copy of the game context taken when the entry was recorded.
///
/// `complete == false` marks a degraded snapshot: either no context was
/// available (all fields zero/empty) or the captured context is structurally
/// invalid. The entry is recorded anyway.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ContextSnapshot {
    pub complete: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub degraded_reason: Option<String>,
    pub quarter: u8,
    pub game_clock_seconds: u32,
    pub down: u8,
    pub yards_to_go: i32,
    pub field_position: i32,
    pub possession_team: Option<String>,
    pub home_team: String,
    pub away_team: String,
    pub home_score: u16,
    pub away_score: u16,
    pub home_timeouts: u8,
    pub away_timeouts: u8,
    pub red_zone: bool,
    pub goal_line: bool,
    pub two_minute: bool,
}

impl ContextSnapshot {
    pub fn capture(ctx: &GameContext) -> Self {
        let degraded_reason = structural_problem(ctx);
        Self {
            complete: degraded_reason.is_none(),
            degraded_reason,
            quarter: ctx.quarter,
            game_clock_seconds: ctx.game_clock_seconds,
            down: ctx.down,
            yards_to_go: ctx.yards_to_go,
            field_position: ctx.field_position,
            possession_team: ctx.possession_team.clone(),
            home_team: ctx.home_team.clone(),
            away_team: ctx.away_team.clone(),
            home_score: ctx.home_score,
            away_score: ctx.away_score,
            home_timeouts: ctx.home_timeouts,
            away_timeouts: ctx.away_timeouts,
            red_zone: ctx.is_red_zone(),
            goal_line: ctx.is_goal_line(),
            two_minute: ctx.is_two_minute(),
        }
    }

    /// Placeholder when no context could be obtained
    pub fn minimal(reason: impl Into<String>) -> Self {
        Self { complete: false, degraded_reason: Some(reason.into()), ..Self::default() }
    }

    pub fn from_optional(ctx: Option<&GameContext>) -> Self {
        match ctx {
            Some(ctx) => Self::capture(ctx),
            None => Self::minimal("context unavailable"),
        }
    }

    /// Quarter to index the entry under; `None` for snapshots without a usable quarter
    pub fn indexed_quarter(&self) -> Option<u8> {
        (1..=OVERTIME_QUARTER).contains(&self.quarter).then_some(self.quarter)
    }
}

fn structural_problem(ctx: &GameContext) -> Option<String> {
    if !(1..=OVERTIME_QUARTER).contains(&ctx.quarter) {
        return Some(format!("quarter {} out of range", ctx.quarter));
    }
    if !(0..=100).contains(&ctx.field_position) {
        return Some(format!("field position {} out of range", ctx.field_position));
    }
    if !(1..=4).contains(&ctx.down) {
        return Some(format!("down {} out of range", ctx.down));
    }
    if ctx.home_team.is_empty() || ctx.away_team.is_empty() {
        return Some("team identifiers missing".to_string());
    }
    None
}

/// Wall-clock cost of building the entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PerformanceTiming {
    pub capture_micros: u64,
}

/// One immutable record of the play-by-play log
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuditEntry {
    pub entry_id: Uuid,
    pub timestamp: DateTime<Utc>,
    /// Strictly increasing per game, starting at 1
    pub sequence: u64,
    pub game_id: String,
    pub event_type: AuditEventType,
    pub context: ContextSnapshot,
    pub description: String,
    /// Team the event is about, beyond the offense in `context`
    pub team: Option<String>,
    pub play: Option<PlayOutcome>,
    pub possession: Option<PossessionTransition>,
    pub special: Option<SpecialSituationTransition>,
    pub validation: Option<ValidationResult>,
    pub details: BTreeMap<String, serde_json::Value>,
    /// Sorted, unique
    pub tags: Vec<String>,
    pub timing: Option<PerformanceTiming>,
}

impl AuditEntry {
    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.binary_search_by(|t| t.as_str().cmp(tag)).is_ok()
    }

    /// Teams this entry is indexed under
    pub fn teams(&self) -> Vec<&str> {
        let mut teams: Vec<&str> = Vec::with_capacity(3);
        let candidates = [
            self.context.possession_team.as_deref(),
            self.team.as_deref(),
            self.possession.as_ref().and_then(|p| p.new_possessing_team()),
        ];
        for team in candidates.into_iter().flatten() {
            if !team.is_empty() && !teams.contains(&team) {
                teams.push(team);
            }
        }
        teams
    }
}
