//! Play Session
//!
//! Per-game orchestrator. Owns the live `GameContext` and drives each play
//! through transition → clock → projection → validation → audit → commit.
//! Validation never blocks a play: issues are reported and audited, and the
//! projected state is committed regardless.

use serde::Serialize;
use serde_json::json;
use std::collections::BTreeMap;
use tracing::{debug, info, warn};

use super::state::{advance_state_with_credit, score_credit, ScoreCredit};
use crate::audit::{DriveEvent, PlayByPlayAuditor};
use crate::clock::{ClockComputation, ClockStrategyEngine, CoachingArchetype};
use crate::config::EngineConfig;
use crate::models::{GameContext, OutcomeTag, PlayOutcome, PlayType, OVERTIME_QUARTER};
use crate::possession::calculate_possession_changes;
use crate::transition::{
    KickDetails, KickType, PossessionChangeReason, PossessionTransition, RecoveryDetails, ReturnDetails, ReturnType,
    SituationType, SpecialSituationTransition, TransitionError,
};
use crate::validation::{
    FieldValidator, GameEndStatus, NflRulesValidator, ScoringContext, ScoringSignals, ValidationResult,
};

/// Everything that happened on one processed play
#[derive(Debug, Clone, Serialize)]
pub struct PlayReport {
    pub before: GameContext,
    /// Committed state, after any quarter rollover
    pub after: GameContext,
    pub transition: PossessionTransition,
    pub clock: ClockComputation,
    pub elapsed_seconds: u32,
    pub score: Option<ScoreCredit>,
    pub special: Option<SpecialSituationTransition>,
    pub validation: ValidationResult,
    /// Quarter transition check, when the play ended a period
    pub quarter_change: Option<ValidationResult>,
    pub game_status: GameEndStatus,
}

impl PlayReport {
    pub fn is_valid(&self) -> bool {
        self.validation.is_valid() && self.quarter_change.as_ref().map_or(true, |q| q.is_valid())
    }
}

pub struct PlaySession {
    config: EngineConfig,
    ctx: GameContext,
    clock: ClockStrategyEngine,
    rules: NflRulesValidator,
    auditor: PlayByPlayAuditor,
    final_recorded: bool,
}

impl PlaySession {
    pub fn new(game_id: impl Into<String>, ctx: GameContext, config: EngineConfig) -> Self {
        let config = config.normalized();
        let mut auditor = PlayByPlayAuditor::with_config(game_id, config.audit.clone());

        let mut details = BTreeMap::new();
        details.insert("playoff".to_string(), json!(config.rules.is_playoff));
        details.insert("home_team".to_string(), json!(ctx.home_team));
        details.insert("away_team".to_string(), json!(ctx.away_team));
        auditor.record_system_event(Some(&ctx), "session started", details);

        let initial = NflRulesValidator::new(config.rules.clone()).validate_complete_game_state(&ctx);
        if initial.has_errors() {
            auditor.record_validation_failure(&ctx, &initial, "initial_state");
        }

        info!(game_id = auditor.game_id(), home = %ctx.home_team, away = %ctx.away_team, "play session started");

        Self {
            clock: ClockStrategyEngine::new(config.clock.clone()),
            rules: NflRulesValidator::new(config.rules.clone()),
            config,
            ctx,
            auditor,
            final_recorded: false,
        }
    }

    pub fn context(&self) -> &GameContext {
        &self.ctx
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn auditor(&self) -> &PlayByPlayAuditor {
        &self.auditor
    }

    pub fn into_auditor(self) -> PlayByPlayAuditor {
        self.auditor
    }

    pub fn game_status(&self) -> GameEndStatus {
        self.rules.evaluate_game_end(&self.ctx)
    }

    pub fn is_over(&self) -> bool {
        self.game_status().is_over()
    }

    // ===========================================
    // Plays
    // ===========================================

    pub fn process_play(&mut self, outcome: &PlayOutcome, archetype: CoachingArchetype) -> PlayReport {
        let before = self.ctx.clone();
        let mut validation = ValidationResult::new();
        if self.is_over() {
            validation.merge(self.rules.validate_game_end(&before, false));
        }

        let transition = calculate_possession_changes(outcome, &before);
        let clock = self.clock.compute(archetype, outcome.play_type, &before, outcome.completion);
        let elapsed_seconds = clock.elapsed_seconds;

        let credit = score_credit(&before, outcome, &transition);
        let after = advance_state_with_credit(
            &before,
            outcome,
            &transition,
            elapsed_seconds,
            &self.config.rules,
            credit.as_ref(),
        );

        validation.merge(self.validate_play(&before, &after, outcome, &transition, credit.is_some(), elapsed_seconds));
        let special = self.special_situation(&before, &after, outcome, &transition);

        self.record_play(&before, &after, outcome, &transition, credit.as_ref(), special.as_ref(), &validation, elapsed_seconds);

        self.ctx = after;

        let quarter_change = self.roll_period();
        let game_status = self.game_status();
        self.record_game_end(game_status);

        PlayReport {
            before,
            after: self.ctx.clone(),
            transition,
            clock,
            elapsed_seconds,
            score: credit,
            special,
            validation,
            quarter_change,
            game_status,
        }
    }

    fn validate_play(
        &self,
        before: &GameContext,
        after: &GameContext,
        outcome: &PlayOutcome,
        transition: &PossessionTransition,
        scored: bool,
        elapsed_seconds: u32,
    ) -> ValidationResult {
        let mut result = FieldValidator::validate(after.field_position, after.down, after.yards_to_go);

        if outcome.play_type.is_scrimmage() && (!transition.possession_changes() || scored) {
            let signals = ScoringSignals::from_play(outcome, Some(transition))
                .with_score_changed(scored)
                .with_field_position(before.field_position.saturating_add(outcome.yards_gained));
            result.merge(FieldValidator::validate_down_progression(
                before.down,
                outcome.yards_gained,
                before.yards_to_go,
                after.down,
                ScoringContext::detect(&signals),
            ));
        }

        result.merge(self.rules.validate_clock_transition(
            i64::from(before.game_clock_seconds),
            i64::from(after.game_clock_seconds),
            i64::from(elapsed_seconds),
        ));
        result.merge(self.rules.validate_complete_game_state(after));
        result
    }

    fn record_play(
        &mut self,
        before: &GameContext,
        after: &GameContext,
        outcome: &PlayOutcome,
        transition: &PossessionTransition,
        credit: Option<&ScoreCredit>,
        special: Option<&SpecialSituationTransition>,
        validation: &ValidationResult,
        elapsed_seconds: u32,
    ) {
        self.auditor.record_play(before, outcome, Some(elapsed_seconds));
        self.auditor.record_state_transition(before, after, format!("{} for {} yards", outcome.play_type, outcome.yards_gained));

        if let Some(special) = special {
            self.auditor.record_special_situation(before, special);
        }

        if transition.possession_changes() {
            self.auditor.record_possession_change(before, transition);
            if let Some(old) = transition.old_possessing_team() {
                let reason = transition.reason().map(|r| r.as_str()).unwrap_or("UNKNOWN");
                self.auditor.record_drive_event(before, DriveEvent::End, old, format!("drive ended: {}", reason));
            }
            // after a score the next drive belongs to the kickoff receiver
            if let Some(next) = after.possession_team.as_deref() {
                self.auditor.record_drive_event(after, DriveEvent::Start, next, "drive started");
            }
        }

        if let Some(credit) = credit {
            let description = format!(
                "{} +{} ({}-{})",
                credit.team, credit.points, after.home_score, after.away_score
            );
            self.auditor.record_score(after, &credit.team, credit.points, description);
        }

        if validation.has_errors() {
            self.auditor.record_validation_failure(after, validation, "play");
        }

        if self.rules.two_minute_warning_applies(after.quarter, after.game_clock_seconds)
            && !self.rules.two_minute_warning_applies(before.quarter, before.game_clock_seconds)
        {
            let mut details = BTreeMap::new();
            details.insert("quarter".to_string(), json!(after.quarter));
            details.insert("game_clock_seconds".to_string(), json!(after.game_clock_seconds));
            self.auditor.record_system_event(Some(after), "two-minute warning", details);
        }
    }

    /// Special-teams description of the play, when it has one
    fn special_situation(
        &mut self,
        before: &GameContext,
        after: &GameContext,
        outcome: &PlayOutcome,
        transition: &PossessionTransition,
    ) -> Option<SpecialSituationTransition> {
        match build_special_situation(after, outcome, transition)? {
            Ok(situation) => Some(situation),
            Err(err) => {
                self.auditor.record_error(Some(before), &err, "special_situation");
                None
            }
        }
    }

    // ===========================================
    // Periods
    // ===========================================

    /// Next period when the clock has expired and the game goes on
    fn roll_period(&mut self) -> Option<ValidationResult> {
        if self.ctx.game_clock_seconds > 0 {
            return None;
        }
        let status = self.game_status();
        let rules = &self.config.rules;
        let before = self.ctx.clone();
        let mut next = before.clone();

        match (before.quarter, status) {
            (1 | 3, _) => {
                next.quarter += 1;
                next.game_clock_seconds = rules.quarter_length_seconds;
            }
            (2, _) => {
                next.quarter = 3;
                next.game_clock_seconds = rules.quarter_length_seconds;
                next.home_timeouts = rules.max_timeouts_per_half;
                next.away_timeouts = rules.max_timeouts_per_half;
            }
            (4, GameEndStatus::OvertimeRequired) => {
                next.quarter = OVERTIME_QUARTER;
                next.game_clock_seconds = rules.overtime_length_seconds();
            }
            (OVERTIME_QUARTER, GameEndStatus::AdditionalOvertimeRequired) => {
                next.game_clock_seconds = rules.playoff_overtime_seconds;
            }
            _ => return None,
        }

        let result = self.rules.validate_quarter_transition(&before, &next);
        if result.has_errors() {
            self.auditor.record_validation_failure(&next, &result, "quarter_change");
        }
        self.auditor.record_quarter_change(&before, &next);
        debug!(from = before.quarter, to = next.quarter, clock = next.game_clock_seconds, "period advanced");
        self.ctx = next;
        Some(result)
    }

    fn record_game_end(&mut self, status: GameEndStatus) {
        if !status.is_over() || self.final_recorded {
            return;
        }
        self.final_recorded = true;
        let mut details = BTreeMap::new();
        details.insert("status".to_string(), json!(status.as_str()));
        details.insert("home_score".to_string(), json!(self.ctx.home_score));
        details.insert("away_score".to_string(), json!(self.ctx.away_score));
        self.auditor.record_system_event(Some(&self.ctx), "game over", details);
        info!(
            game_id = self.auditor.game_id(),
            status = status.as_str(),
            home = self.ctx.home_score,
            away = self.ctx.away_score,
            "game over"
        );
    }

    // ===========================================
    // Timeouts and external situations
    // ===========================================

    /// Charge `team` a timeout. Nothing changes when validation fails.
    pub fn call_timeout(&mut self, team: &str) -> ValidationResult {
        let result = self.rules.validate_timeout_usage(&self.ctx, team);
        if result.has_errors() {
            self.auditor.record_validation_failure(&self.ctx, &result, "timeout");
            return result;
        }

        let remaining = if team == self.ctx.home_team {
            self.ctx.home_timeouts = self.ctx.home_timeouts.saturating_sub(1);
            self.ctx.home_timeouts
        } else {
            self.ctx.away_timeouts = self.ctx.away_timeouts.saturating_sub(1);
            self.ctx.away_timeouts
        };
        self.auditor.record_timeout(&self.ctx, team, remaining);
        result
    }

    /// Record a situation described by the caller (onside kicks, fakes, penalties)
    pub fn record_special_situation(&mut self, situation: &SpecialSituationTransition) {
        self.auditor.record_special_situation(&self.ctx, situation);
    }
}

fn build_special_situation(
    after: &GameContext,
    outcome: &PlayOutcome,
    transition: &PossessionTransition,
) -> Option<Result<SpecialSituationTransition, TransitionError>> {
    let tag = |t: OutcomeTag| outcome.tag_is(&t);

    let builder = match outcome.play_type {
        PlayType::Kick if outcome.is_turnover || tag(OutcomeTag::MuffedKickoff) => {
            SpecialSituationTransition::builder(SituationType::MuffedKickoff)
                .kick(KickDetails::new(KickType::Kickoff, 0))
                .recovery(recovery(after, transition))
        }
        PlayType::Kick => {
            let touchback = outcome.yards_gained <= 0 || tag(OutcomeTag::Touchback);
            SpecialSituationTransition::builder(SituationType::Kickoff)
                .kick(KickDetails::new(KickType::Kickoff, 0))
                .return_details(ReturnDetails {
                    touchback,
                    ..ReturnDetails::new(ReturnType::Kickoff, outcome.yards_gained.max(0))
                })
        }
        PlayType::Punt if tag(OutcomeTag::BlockedPunt) => {
            SpecialSituationTransition::builder(SituationType::BlockedKick)
                .kick(KickDetails { blocked: true, ..KickDetails::new(KickType::Punt, 0) })
        }
        PlayType::Punt if tag(OutcomeTag::MuffedPunt) => {
            SpecialSituationTransition::builder(SituationType::MuffedPunt)
                .kick(KickDetails::new(KickType::Punt, outcome.yards_gained))
                .recovery(recovery(after, transition))
        }
        PlayType::Punt => SpecialSituationTransition::builder(SituationType::Punt)
            .kick(KickDetails::new(KickType::Punt, outcome.yards_gained))
            .return_details(ReturnDetails {
                touchback: tag(OutcomeTag::Touchback),
                fair_catch: tag(OutcomeTag::FairCatch),
                ..ReturnDetails::new(ReturnType::Punt, 0)
            }),
        PlayType::FieldGoal if tag(OutcomeTag::BlockedFieldGoal) => {
            SpecialSituationTransition::builder(SituationType::BlockedKick)
                .kick(KickDetails { blocked: true, ..KickDetails::new(KickType::FieldGoal, 0) })
        }
        PlayType::FieldGoal => SpecialSituationTransition::builder(SituationType::FieldGoal)
            .kick(KickDetails::new(KickType::FieldGoal, outcome.yards_gained).successful(outcome.is_score)),
        PlayType::ExtraPoint => SpecialSituationTransition::builder(SituationType::ExtraPoint)
            .kick(KickDetails::new(KickType::ExtraPoint, 0).successful(outcome.is_score)),
        PlayType::Run | PlayType::Pass
            if outcome.is_safety() || transition.reason() == Some(PossessionChangeReason::SafetyScored) =>
        {
            SpecialSituationTransition::builder(SituationType::Safety)
        }
        PlayType::Run | PlayType::Pass => return None,
    };

    let builder = if transition.possession_changes() {
        builder.possession(transition.clone())
    } else {
        builder
    };
    let built = builder.build();
    if let Err(err) = &built {
        warn!(play_type = outcome.play_type.as_str(), error = %err, "special situation rejected");
    }
    Some(built)
}

fn recovery(after: &GameContext, transition: &PossessionTransition) -> RecoveryDetails {
    RecoveryDetails {
        recovering_team: transition
            .new_possessing_team()
            .or(after.possession_team.as_deref())
            .unwrap_or_default()
            .to_string(),
        recovering_player: None,
        location: after.field_position,
    }
}
