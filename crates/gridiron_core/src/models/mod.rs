//! Input data model: the game snapshot and the play outcome.

pub mod game_context;
pub mod play;

pub use game_context::{
    GameContext, TeamSide, CRUNCH_TIME_SECONDS, GOAL_LINE_START, OVERTIME_QUARTER,
    RED_ZONE_START, TWO_MINUTE_SECONDS,
};
pub use play::{CompletionStatus, OutcomeTag, PlayOutcome, PlayType};
