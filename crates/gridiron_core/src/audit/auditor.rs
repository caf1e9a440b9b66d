//! PlayByPlayAuditor
//!
//! Single-writer, append-only log for one game. Entries are shared as
//! `Arc<AuditEntry>` and never mutated after they are appended; secondary
//! indices (event type, team, quarter) hold positions into the log.

use chrono::Utc;
use serde_json::{json, Value};
use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, warn};
use uuid::Uuid;

use super::entry::{AuditEntry, AuditEventType, ContextSnapshot, PerformanceTiming};
use crate::config::AuditConfig;
use crate::models::{GameContext, PlayOutcome, PlayType};
use crate::transition::{PossessionTransition, SpecialSituationTransition};
use crate::validation::ValidationResult;

/// Drive boundary recorded by `record_drive_event`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DriveEvent {
    Start,
    End,
}

/// Everything an entry carries besides the bookkeeping fields
#[derive(Default)]
struct Draft {
    team: Option<String>,
    play: Option<PlayOutcome>,
    possession: Option<PossessionTransition>,
    special: Option<SpecialSituationTransition>,
    validation: Option<ValidationResult>,
    details: BTreeMap<String, Value>,
    tags: Vec<String>,
}

impl Draft {
    fn detail(mut self, key: &str, value: Value) -> Self {
        self.details.insert(key.to_string(), value);
        self
    }

    fn tag(mut self, tag: &str) -> Self {
        self.tags.push(tag.to_string());
        self
    }
}

#[derive(Debug)]
pub struct PlayByPlayAuditor {
    game_id: String,
    config: AuditConfig,
    entries: Vec<Arc<AuditEntry>>,
    next_sequence: u64,
    by_event_type: HashMap<AuditEventType, Vec<usize>>,
    by_team: HashMap<String, Vec<usize>>,
    by_quarter: BTreeMap<u8, Vec<usize>>,
}

impl PlayByPlayAuditor {
    pub fn new(game_id: impl Into<String>) -> Self {
        Self::with_config(game_id, AuditConfig::default())
    }

    pub fn with_config(game_id: impl Into<String>, config: AuditConfig) -> Self {
        Self {
            game_id: game_id.into(),
            config,
            entries: Vec::new(),
            next_sequence: 1,
            by_event_type: HashMap::new(),
            by_team: HashMap::new(),
            by_quarter: BTreeMap::new(),
        }
    }

    pub fn game_id(&self) -> &str {
        &self.game_id
    }

    pub fn config(&self) -> &AuditConfig {
        &self.config
    }

    // ===========================================
    // Recording
    // ===========================================

    pub fn record_play(&mut self, ctx: &GameContext, outcome: &PlayOutcome, elapsed_seconds: Option<u32>) -> Arc<AuditEntry> {
        let started = Instant::now();
        let mut draft = Draft { play: Some(outcome.clone()), ..Draft::default() };
        draft.tags = self.play_tags(ctx, outcome);
        draft = draft.detail("yards_gained", json!(outcome.yards_gained));
        if let Some(secs) = elapsed_seconds {
            draft = draft.detail("elapsed_seconds", json!(secs));
        }
        let description = describe_play(ctx, outcome);
        self.append(AuditEventType::PlayExecuted, Some(ctx), description, draft, started)
    }

    pub fn record_state_transition(
        &mut self,
        before: &GameContext,
        after: &GameContext,
        description: impl Into<String>,
    ) -> Arc<AuditEntry> {
        let started = Instant::now();
        let draft = Draft::default()
            .detail("before", context_details(before))
            .detail("after", context_details(after));
        self.append(AuditEventType::StateTransition, Some(after), description.into(), draft, started)
    }

    pub fn record_possession_change(&mut self, ctx: &GameContext, transition: &PossessionTransition) -> Arc<AuditEntry> {
        let started = Instant::now();
        let mut draft = Draft { possession: Some(transition.clone()), ..Draft::default() };
        if let Some(reason) = transition.reason() {
            draft = draft.tag(&reason.as_str().to_ascii_lowercase());
        }
        if transition.turnover_occurred() {
            draft = draft.tag("turnover");
        }
        if transition.is_momentum_shift() {
            draft = draft.tag("momentum_shift");
        }
        if transition.is_game_changing_play() {
            draft = draft.tag("game_changing");
        }
        self.append(AuditEventType::PossessionChange, Some(ctx), transition.summary(), draft, started)
    }

    pub fn record_score(&mut self, ctx: &GameContext, team: &str, points: u16, description: impl Into<String>) -> Arc<AuditEntry> {
        let started = Instant::now();
        let draft = Draft { team: Some(team.to_string()), ..Draft::default() }
            .detail("points", json!(points))
            .tag("scoring");
        self.append(AuditEventType::ScoreUpdate, Some(ctx), description.into(), draft, started)
    }

    pub fn record_drive_event(
        &mut self,
        ctx: &GameContext,
        event: DriveEvent,
        team: &str,
        description: impl Into<String>,
    ) -> Arc<AuditEntry> {
        let started = Instant::now();
        let event_type = match event {
            DriveEvent::Start => AuditEventType::DriveStart,
            DriveEvent::End => AuditEventType::DriveEnd,
        };
        let draft = Draft { team: Some(team.to_string()), ..Draft::default() }
            .detail("field_position", json!(ctx.field_position));
        self.append(event_type, Some(ctx), description.into(), draft, started)
    }

    /// Context is optional: system events may happen before a game exists
    pub fn record_system_event(
        &mut self,
        ctx: Option<&GameContext>,
        description: impl Into<String>,
        details: BTreeMap<String, Value>,
    ) -> Arc<AuditEntry> {
        let started = Instant::now();
        let draft = Draft { details, ..Draft::default() };
        self.append(AuditEventType::SystemEvent, ctx, description.into(), draft, started)
    }

    pub fn record_error(&mut self, ctx: Option<&GameContext>, error: &dyn fmt::Display, stage: &str) -> Arc<AuditEntry> {
        let started = Instant::now();
        let message = error.to_string();
        warn!(game_id = %self.game_id, stage, error = %message, "error recorded");
        let draft = Draft::default().detail("stage", json!(stage)).tag("error");
        self.append(AuditEventType::ErrorCondition, ctx, message, draft, started)
    }

    pub fn record_validation_failure(&mut self, ctx: &GameContext, result: &ValidationResult, stage: &str) -> Arc<AuditEntry> {
        let started = Instant::now();
        let rules: Vec<&str> = result.errors().map(|i| i.rule_reference.as_str()).collect();
        warn!(
            game_id = %self.game_id,
            stage,
            errors = rules.len(),
            rules = ?rules,
            "validation failed"
        );
        let draft = Draft { validation: Some(result.clone()), ..Draft::default() }
            .detail("stage", json!(stage))
            .detail("rules", json!(rules))
            .tag("validation");
        let description = format!("{} validation failed: {} error(s)", stage, rules.len());
        self.append(AuditEventType::ValidationFailure, Some(ctx), description, draft, started)
    }

    pub fn record_quarter_change(&mut self, before: &GameContext, after: &GameContext) -> Arc<AuditEntry> {
        let started = Instant::now();
        let mut draft = Draft::default()
            .detail("from_quarter", json!(before.quarter))
            .detail("to_quarter", json!(after.quarter));
        if after.quarter == 3 {
            draft = draft.tag("halftime");
        }
        if after.is_overtime() {
            draft = draft.tag("overtime");
        }
        let description = if after.quarter == before.quarter {
            format!("additional overtime period (Q{})", after.quarter)
        } else {
            format!("end of Q{}, start of Q{}", before.quarter, after.quarter)
        };
        self.append(AuditEventType::QuarterChange, Some(after), description, draft, started)
    }

    pub fn record_timeout(&mut self, ctx: &GameContext, team: &str, remaining: u8) -> Arc<AuditEntry> {
        let started = Instant::now();
        let draft = Draft { team: Some(team.to_string()), ..Draft::default() }.detail("remaining", json!(remaining));
        let description = format!("timeout {} ({} remaining)", team, remaining);
        self.append(AuditEventType::TimeoutCalled, Some(ctx), description, draft, started)
    }

    pub fn record_special_situation(&mut self, ctx: &GameContext, situation: &SpecialSituationTransition) -> Arc<AuditEntry> {
        let started = Instant::now();
        let mut draft = Draft {
            special: Some(situation.clone()),
            possession: situation.possession().cloned(),
            ..Draft::default()
        }
        .detail("risk_level", json!(situation.risk_level().as_str()))
        .tag(&situation.situation_type().as_str().to_ascii_lowercase());
        let pending: Vec<&str> = situation.pending_follow_ups().iter().map(|f| f.as_str()).collect();
        if !pending.is_empty() {
            draft = draft.detail("pending_follow_ups", json!(pending));
        }
        self.append(AuditEventType::SpecialSituation, Some(ctx), situation.summary(), draft, started)
    }

    /// Tags derived from a play and the context it was run from
    fn play_tags(&self, ctx: &GameContext, outcome: &PlayOutcome) -> Vec<String> {
        let mut tags = vec![outcome.play_type.as_str().to_string()];
        let mut add = |cond: bool, tag: &str| {
            if cond {
                tags.push(tag.to_string());
            }
        };
        let explosive = match outcome.play_type {
            PlayType::Run => outcome.yards_gained >= self.config.explosive_run_yards,
            PlayType::Pass => outcome.yards_gained >= self.config.explosive_pass_yards,
            _ => false,
        };
        let scrimmage = outcome.play_type.is_scrimmage();

        add(ctx.down == 3, "third_down");
        add(ctx.down == 4, "fourth_down");
        add(outcome.is_score, "scoring");
        add(outcome.is_turnover, "turnover");
        add(explosive, "explosive");
        add(ctx.is_red_zone(), "red_zone");
        add(ctx.is_goal_line(), "goal_line");
        add(ctx.is_two_minute(), "two_minute");
        add(scrimmage && outcome.yards_gained < 0, "negative_play");
        add(
            scrimmage && !outcome.is_turnover && outcome.yards_gained >= ctx.yards_to_go,
            "first_down",
        );
        tags
    }

    /// Single append path. Never fails: a missing context becomes a minimal snapshot.
    fn append(
        &mut self,
        event_type: AuditEventType,
        ctx: Option<&GameContext>,
        description: String,
        draft: Draft,
        started: Instant,
    ) -> Arc<AuditEntry> {
        let context = ContextSnapshot::from_optional(ctx);
        if let Some(reason) = &context.degraded_reason {
            warn!(
                game_id = %self.game_id,
                event_type = event_type.as_str(),
                reason = %reason,
                "recording with degraded context snapshot"
            );
        }

        let mut tags = draft.tags;
        tags.sort();
        tags.dedup();

        let sequence = self.next_sequence;
        self.next_sequence += 1;

        let timing = self.config.capture_timing.then(|| PerformanceTiming {
            capture_micros: u64::try_from(started.elapsed().as_micros()).unwrap_or(u64::MAX),
        });

        let entry = Arc::new(AuditEntry {
            entry_id: Uuid::new_v4(),
            timestamp: Utc::now(),
            sequence,
            game_id: self.game_id.clone(),
            event_type,
            context,
            description,
            team: draft.team,
            play: draft.play,
            possession: draft.possession,
            special: draft.special,
            validation: draft.validation,
            details: draft.details,
            tags,
            timing,
        });

        let position = self.entries.len();
        self.by_event_type.entry(event_type).or_default().push(position);
        for team in entry.teams() {
            self.by_team.entry(team.to_string()).or_default().push(position);
        }
        if let Some(quarter) = entry.context.indexed_quarter() {
            self.by_quarter.entry(quarter).or_default().push(position);
        }

        debug!(
            game_id = %self.game_id,
            sequence,
            event_type = event_type.as_str(),
            "audit entry recorded"
        );

        self.entries.push(Arc::clone(&entry));
        entry
    }

    // ===========================================
    // Queries (read-only)
    // ===========================================

    pub fn entries(&self) -> &[Arc<AuditEntry>] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entry with the given sequence number
    pub fn get(&self, sequence: u64) -> Option<&AuditEntry> {
        let index = usize::try_from(sequence.checked_sub(1)?).ok()?;
        self.entries.get(index).map(Arc::as_ref)
    }

    pub fn latest(&self) -> Option<&AuditEntry> {
        self.entries.last().map(Arc::as_ref)
    }

    pub fn by_event_type(&self, event_type: AuditEventType) -> Vec<&AuditEntry> {
        self.resolve(self.by_event_type.get(&event_type))
    }

    pub fn by_team(&self, team: &str) -> Vec<&AuditEntry> {
        self.resolve(self.by_team.get(team))
    }

    pub fn by_quarter(&self, quarter: u8) -> Vec<&AuditEntry> {
        self.resolve(self.by_quarter.get(&quarter))
    }

    pub fn with_tag(&self, tag: &str) -> Vec<&AuditEntry> {
        self.entries.iter().filter(|e| e.has_tag(tag)).map(Arc::as_ref).collect()
    }

    pub fn event_counts(&self) -> BTreeMap<AuditEventType, usize> {
        self.by_event_type.iter().map(|(kind, positions)| (*kind, positions.len())).collect()
    }

    fn resolve(&self, positions: Option<&Vec<usize>>) -> Vec<&AuditEntry> {
        positions
            .map(|positions| positions.iter().filter_map(|&i| self.entries.get(i)).map(Arc::as_ref).collect())
            .unwrap_or_default()
    }
}

fn describe_play(ctx: &GameContext, outcome: &PlayOutcome) -> String {
    let team = ctx.possession_team.as_deref().unwrap_or("unknown");
    let mut text = format!(
        "Q{} {}:{:02} {} {} & {} at {}: {} for {} yards",
        ctx.quarter,
        ctx.game_clock_seconds / 60,
        ctx.game_clock_seconds % 60,
        team,
        ordinal(ctx.down),
        ctx.yards_to_go,
        ctx.field_position,
        outcome.play_type,
        outcome.yards_gained
    );
    if let Some(tag) = &outcome.outcome {
        text.push_str(&format!(" ({})", tag));
    }
    text
}

fn ordinal(down: u8) -> String {
    match down {
        1 => "1st".to_string(),
        2 => "2nd".to_string(),
        3 => "3rd".to_string(),
        n => format!("{}th", n),
    }
}

fn context_details(ctx: &GameContext) -> Value {
    json!({
        "quarter": ctx.quarter,
        "game_clock_seconds": ctx.game_clock_seconds,
        "down": ctx.down,
        "yards_to_go": ctx.yards_to_go,
        "field_position": ctx.field_position,
        "possession_team": ctx.possession_team,
        "home_score": ctx.home_score,
        "away_score": ctx.away_score,
    })
}
