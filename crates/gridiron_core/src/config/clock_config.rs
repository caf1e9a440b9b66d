//! Clock strategy timing configuration.
//!
//! Base times are the seconds a play of each timing class consumes before
//! any archetype or situational adjustment. The final value of every
//! archetype is clamped to `[min_elapsed_seconds, max_elapsed_seconds]`.

use serde::{Deserialize, Serialize};

/// Base seconds per timing class
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BaseTimes {
    pub run: i32,
    pub complete_pass: i32,
    pub incomplete_pass: i32,
    pub kick: i32,
    pub punt: i32,
    pub field_goal: i32,
    pub extra_point: i32,
}

impl Default for BaseTimes {
    fn default() -> Self {
        Self {
            run: 28,
            complete_pass: 24,
            incomplete_pass: 6,
            kick: 8,
            punt: 10,
            field_goal: 6,
            extra_point: 5,
        }
    }
}

/// Clock strategy configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClockConfig {
    /// Lower bound of any elapsed-seconds result
    pub min_elapsed_seconds: u32,
    /// Upper bound of any elapsed-seconds result
    pub max_elapsed_seconds: u32,
    pub base_times: BaseTimes,
}

impl Default for ClockConfig {
    fn default() -> Self {
        Self { min_elapsed_seconds: 3, max_elapsed_seconds: 40, base_times: BaseTimes::default() }
    }
}

impl ClockConfig {
    pub fn fast() -> Self {
        Self {
            base_times: BaseTimes {
                run: 20,
                complete_pass: 18,
                incomplete_pass: 5,
                kick: 6,
                punt: 8,
                field_goal: 5,
                extra_point: 4,
            },
            ..Self::default()
        }
    }

    /// `(min, max)` bound every archetype result must lie in
    pub fn bounds(&self) -> (u32, u32) {
        (self.min_elapsed_seconds, self.max_elapsed_seconds)
    }

    pub fn normalized(mut self) -> Self {
        if self.min_elapsed_seconds > self.max_elapsed_seconds {
            std::mem::swap(&mut self.min_elapsed_seconds, &mut self.max_elapsed_seconds);
        }
        self
    }

    /// Clamp a raw computed value into the configured bound
    pub fn clamp(&self, raw: i32) -> u32 {
        let (min, max) = self.bounds();
        let (lo, hi) = if min <= max { (min, max) } else { (max, min) };
        let lo = i64::from(lo);
        let hi = i64::from(hi);
        i64::from(raw).clamp(lo, hi) as u32
    }
}
