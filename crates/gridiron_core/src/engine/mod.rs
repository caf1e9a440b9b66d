//! Play orchestration.
//!
//! `state` projects the next `GameContext` from a resolved play; `session`
//! runs the full per-play pipeline for one game and owns its audit log.

mod session;
mod state;

pub use session::{PlayReport, PlaySession};
pub use state::{
    advance_state, advance_state_with_credit, score_credit, ScoreCredit, EXTRA_POINT_POINTS,
    FIELD_GOAL_POINTS, SAFETY_POINTS, TOUCHDOWN_POINTS,
};
