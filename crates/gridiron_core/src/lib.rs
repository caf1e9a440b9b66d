//! # gridiron_core - American Football Game State Engine
//!
//! Deterministic possession, clock and rules bookkeeping for a play-by-play
//! football simulation. The play resolver upstream decides what happened on
//! the field; this crate decides what that means for the game.
//!
//! ## Features
//! - Possession changes, turnovers and return touchdowns per play
//! - Field position, down/distance and NFL rules validation with stable rule codes
//! - Coaching-archetype clock management within configurable bounds
//! - Append-only play-by-play audit log with flat JSON export, schema and digest

// Doc formatting lints - purely cosmetic, fix incrementally
#![allow(clippy::doc_lazy_continuation)]
// Orchestration helpers take the whole play context
#![allow(clippy::too_many_arguments)]

pub mod audit;
pub mod clock;
pub mod config;
pub mod engine;
pub mod error;
pub mod models;
pub mod possession;
pub mod transition;
pub mod validation;

pub use audit::{AuditEntry, AuditEventType, ExportedAuditEntry, PlayByPlayAuditor};
pub use clock::{ClockStrategy, ClockStrategyEngine, CoachingArchetype};
pub use config::{AuditConfig, ClockConfig, EngineConfig, RulesConfig};
pub use engine::{advance_state, PlayReport, PlaySession, ScoreCredit};
pub use error::{CoreError, Result};
pub use models::{CompletionStatus, GameContext, OutcomeTag, PlayOutcome, PlayType, TeamSide};
pub use possession::calculate_possession_changes;
pub use transition::{
    PossessionChangeReason, PossessionTransition, SpecialSituationTransition, TransitionError,
    TurnoverType,
};
pub use validation::{
    rule_refs, FieldValidator, GameEndStatus, NflRulesValidator, ScoringContext, ValidationResult,
};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
