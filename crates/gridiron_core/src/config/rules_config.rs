//! League rule constants used by `NflRulesValidator` and the play session.

use serde::{Deserialize, Serialize};

/// League rules
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RulesConfig {
    /// Length of a regulation quarter in seconds
    pub quarter_length_seconds: u32,
    /// Regular season overtime period length
    pub regular_overtime_seconds: u32,
    /// Playoff overtime period length
    pub playoff_overtime_seconds: u32,
    /// Two-minute warning threshold (Q2/Q4 only)
    pub two_minute_warning_seconds: u32,
    /// Timeouts each team holds per half
    pub max_timeouts_per_half: u8,
    /// Single-play elapsed time above which a warning is emitted
    pub elapsed_warning_seconds: u32,
    /// Playoff game (changes overtime length and tie handling)
    pub is_playoff: bool,
    /// Spot of the next snap after a kickoff touchback (receiving team's own yard line)
    pub kickoff_touchback_yard_line: i32,
    /// Spot of the next snap after a punt touchback
    pub punt_touchback_yard_line: i32,
}

impl Default for RulesConfig {
    fn default() -> Self {
        Self {
            quarter_length_seconds: 900,
            regular_overtime_seconds: 600,
            playoff_overtime_seconds: 900,
            two_minute_warning_seconds: 120,
            max_timeouts_per_half: 3,
            elapsed_warning_seconds: 45,
            is_playoff: false,
            kickoff_touchback_yard_line: 25,
            punt_touchback_yard_line: 20,
        }
    }
}

impl RulesConfig {
    pub fn playoff() -> Self {
        Self { is_playoff: true, ..Self::default() }
    }

    /// Clock value an overtime period starts at
    pub fn overtime_length_seconds(&self) -> u32 {
        if self.is_playoff {
            self.playoff_overtime_seconds
        } else {
            self.regular_overtime_seconds
        }
    }

    /// Clock value a given quarter starts at (5 = overtime)
    pub fn period_length_seconds(&self, quarter: u8) -> u32 {
        if quarter >= 5 {
            self.overtime_length_seconds()
        } else {
            self.quarter_length_seconds
        }
    }
}
