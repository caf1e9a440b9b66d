//! Scoring-context detection.
//!
//! Down validation needs to know whether the play scored. Callers that know
//! pass a `ScoringContext` directly; otherwise `ScoringContext::detect`
//! derives it from the available signals, checked in this order (first
//! positive match wins):
//!
//! 1. explicit scoring flag
//! 2. outcome tag (touchdown / field goal / safety)
//! 3. score changed between snapshots
//! 4. ball spotted at 100 or 0
//! 5. possession-change reason is a scoring reason

use serde::{Deserialize, Serialize};

use crate::models::{OutcomeTag, PlayOutcome};
use crate::transition::{PossessionChangeReason, PossessionTransition};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ScoringSource {
    ExplicitFlag,
    OutcomeTag,
    ScoreTransition,
    FieldPosition,
    PossessionReason,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ScoringContext {
    #[default]
    NotScoring,
    Scoring(ScoringSource),
}

/// Raw evidence available to the caller
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScoringSignals {
    pub explicit_flag: Option<bool>,
    pub outcome_tag: Option<OutcomeTag>,
    pub score_changed: Option<bool>,
    pub field_position: Option<i32>,
    pub possession_reason: Option<PossessionChangeReason>,
}

impl ScoringSignals {
    /// Signals carried by a resolved play and its transition
    pub fn from_play(outcome: &PlayOutcome, transition: Option<&PossessionTransition>) -> Self {
        Self {
            explicit_flag: Some(outcome.is_score),
            outcome_tag: outcome.outcome.clone(),
            score_changed: None,
            field_position: None,
            possession_reason: transition.and_then(|t| t.reason()),
        }
    }

    pub fn with_score_changed(mut self, changed: bool) -> Self {
        self.score_changed = Some(changed);
        self
    }

    pub fn with_field_position(mut self, field_position: i32) -> Self {
        self.field_position = Some(field_position);
        self
    }
}

impl ScoringContext {
    pub fn explicit() -> Self {
        ScoringContext::Scoring(ScoringSource::ExplicitFlag)
    }

    pub fn is_scoring(&self) -> bool {
        matches!(self, ScoringContext::Scoring(_))
    }

    pub fn source(&self) -> Option<ScoringSource> {
        match self {
            ScoringContext::Scoring(source) => Some(*source),
            ScoringContext::NotScoring => None,
        }
    }

    pub fn detect(signals: &ScoringSignals) -> Self {
        if signals.explicit_flag == Some(true) {
            return ScoringContext::Scoring(ScoringSource::ExplicitFlag);
        }
        if signals.outcome_tag.as_ref().is_some_and(|tag| tag.is_scoring()) {
            return ScoringContext::Scoring(ScoringSource::OutcomeTag);
        }
        if signals.score_changed == Some(true) {
            return ScoringContext::Scoring(ScoringSource::ScoreTransition);
        }
        if signals.field_position.is_some_and(|fp| fp >= 100 || fp <= 0) {
            return ScoringContext::Scoring(ScoringSource::FieldPosition);
        }
        if signals.possession_reason.is_some_and(|r| r.is_scoring()) {
            return ScoringContext::Scoring(ScoringSource::PossessionReason);
        }
        ScoringContext::NotScoring
    }
}
