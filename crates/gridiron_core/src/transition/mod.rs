//! Immutable transition data model.
//!
//! Both transition types are produced through two-phase builders: every
//! derived field is computed before the final value exists, so a constructed
//! transition is never mutated afterwards.

pub mod possession;
pub mod special;

pub use possession::{
    PossessionChangeReason, PossessionTeams, PossessionTransition, PossessionTransitionBuilder,
    TurnoverType,
};
pub use special::{
    FollowUp, FollowUpRequirements, KickDetails, KickType, PenaltyDetails, RecoveryDetails,
    ReturnDetails, ReturnType, RiskLevel, SituationEvent, SituationType, SpecialSituationBuilder,
    SpecialSituationTransition, SpecialTeamsUnits,
};

use thiserror::Error;

/// Invariant violations rejected by the transition builders
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TransitionError {
    #[error("turnover recorded without a possession change")]
    TurnoverWithoutPossessionChange,

    #[error("turnover recorded without a turnover type")]
    TurnoverWithoutType,

    #[error("old and new possessing team must be provided together")]
    IncompleteTeams,

    #[error("possession change to the same team: {team}")]
    SameTeam { team: String },

    #[error("possession retained but old/new team differ ({old} -> {new})")]
    TeamsDifferWithoutChange { old: String, new: String },

    #[error("touchback and fair catch cannot both occur on one return")]
    TouchbackWithFairCatch,

    #[error("kick cannot be both blocked and successful")]
    BlockedAndSuccessful,

    #[error("offsetting penalties cannot award an automatic first down")]
    OffsettingWithFirstDown,

    #[error("{situation} requires {detail} details")]
    MissingDetails { situation: &'static str, detail: &'static str },
}
