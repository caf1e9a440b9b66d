//! Clock Strategy
//!
//! Elapsed seconds per play, driven by the coordinator's coaching archetype.
//!
//! - `CoachingArchetype`: closed set of archetypes, each supplying only deltas
//! - `TimingClass` / `SituationalAdjustments`: base timing and shared situational terms
//! - `ClockStrategyEngine`: composes the terms and clamps to `ClockConfig::bounds`
//! - `ClockStrategy`: per-archetype strategy interface

mod archetype;
mod strategy;
mod timing;

pub use archetype::CoachingArchetype;
pub use strategy::{ArchetypeClock, ClockComputation, ClockStrategy, ClockStrategyEngine};
pub use timing::{SituationalAdjustments, TimingClass, LOPSIDED_MARGIN};
