//! Coaching archetypes and their timing deltas.
//!
//! Each archetype only supplies deltas on top of the shared computation in
//! `ClockStrategyEngine`: a fixed base adjustment, a per-timing-class
//! modifier and a situational override.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::timing::TimingClass;
use crate::error::CoreError;
use crate::models::GameContext;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CoachingArchetype {
    #[default]
    Balanced,
    AirRaid,
    RunHeavy,
    WestCoast,
    Conservative,
    Aggressive,
}

impl CoachingArchetype {
    pub const ALL: [CoachingArchetype; 6] = [
        CoachingArchetype::Balanced,
        CoachingArchetype::AirRaid,
        CoachingArchetype::RunHeavy,
        CoachingArchetype::WestCoast,
        CoachingArchetype::Conservative,
        CoachingArchetype::Aggressive,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            CoachingArchetype::Balanced => "balanced",
            CoachingArchetype::AirRaid => "air_raid",
            CoachingArchetype::RunHeavy => "run_heavy",
            CoachingArchetype::WestCoast => "west_coast",
            CoachingArchetype::Conservative => "conservative",
            CoachingArchetype::Aggressive => "aggressive",
        }
    }

    /// Tempo shift applied to every play
    pub fn base_adjustment(&self) -> i32 {
        match self {
            CoachingArchetype::Balanced => 0,
            CoachingArchetype::AirRaid => -3,
            CoachingArchetype::RunHeavy => 3,
            CoachingArchetype::WestCoast => -1,
            CoachingArchetype::Conservative => 4,
            CoachingArchetype::Aggressive => -2,
        }
    }

    /// Per-timing-class modifier. Special teams plays are never modified.
    pub fn play_modifier(&self, class: TimingClass) -> i32 {
        use CoachingArchetype::*;
        use TimingClass::*;

        match (self, class) {
            (AirRaid, Run) => 1,
            (AirRaid, CompletePass) => -2,
            (RunHeavy, Run) => 2,
            (RunHeavy, CompletePass) => -1,
            (WestCoast, CompletePass) => -2,
            (Conservative, Run) => 3,
            (Conservative, CompletePass) => 2,
            (Aggressive, Run) => -1,
            (Aggressive, CompletePass) => -2,
            _ => 0,
        }
    }

    /// Archetype-specific situational delta, applied after the shared adjustments
    pub fn situational_override(&self, class: TimingClass, ctx: &GameContext) -> i32 {
        let diff = ctx.score_differential();
        match self {
            CoachingArchetype::Balanced => 0,
            // hurry-up when behind late
            CoachingArchetype::AirRaid if ctx.is_two_minute() && diff < 0 => -3,
            // bleed the clock when protecting a late lead
            CoachingArchetype::RunHeavy if ctx.is_fourth_quarter_crunch() && diff > 0 => 4,
            CoachingArchetype::WestCoast if ctx.is_two_minute() && class == TimingClass::CompletePass => -2,
            CoachingArchetype::Conservative if ctx.is_second_half() && diff > 0 => 3,
            CoachingArchetype::Aggressive if diff < 0 => -2,
            _ => 0,
        }
    }
}

impl fmt::Display for CoachingArchetype {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CoachingArchetype {
    type Err = CoreError;

    /// Accepts `air_raid`, `air-raid`, `Air Raid`, `AirRaid`, ...
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key: String = s
            .chars()
            .filter(|c| !matches!(c, '_' | '-' | ' '))
            .flat_map(char::to_lowercase)
            .collect();
        match key.as_str() {
            "balanced" => Ok(CoachingArchetype::Balanced),
            "airraid" => Ok(CoachingArchetype::AirRaid),
            "runheavy" => Ok(CoachingArchetype::RunHeavy),
            "westcoast" => Ok(CoachingArchetype::WestCoast),
            "conservative" => Ok(CoachingArchetype::Conservative),
            "aggressive" => Ok(CoachingArchetype::Aggressive),
            _ => Err(CoreError::UnknownArchetype { name: s.to_string() }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_names() {
        assert_eq!("air_raid".parse::<CoachingArchetype>().unwrap(), CoachingArchetype::AirRaid);
        assert_eq!("West Coast".parse::<CoachingArchetype>().unwrap(), CoachingArchetype::WestCoast);
        assert_eq!("RUN-HEAVY".parse::<CoachingArchetype>().unwrap(), CoachingArchetype::RunHeavy);
        for archetype in CoachingArchetype::ALL {
            assert_eq!(archetype.as_str().parse::<CoachingArchetype>().unwrap(), archetype);
        }
    }

    #[test]
    fn test_unknown_name() {
        let err = "wishbone".parse::<CoachingArchetype>().unwrap_err();
        assert!(matches!(err, CoreError::UnknownArchetype { ref name } if name == "wishbone"));
    }

    #[test]
    fn test_special_teams_not_modified() {
        for archetype in CoachingArchetype::ALL {
            for class in [TimingClass::Kick, TimingClass::Punt, TimingClass::FieldGoal, TimingClass::ExtraPoint] {
                assert_eq!(archetype.play_modifier(class), 0);
            }
        }
    }

    #[test]
    fn test_air_raid_override_only_when_trailing_late() {
        let trailing = GameContext::new("NE", "NYJ").with_possession("NE").with_clock(4, 90).with_score(10, 17);
        assert_eq!(CoachingArchetype::AirRaid.situational_override(TimingClass::Run, &trailing), -3);
        let leading = trailing.clone().with_score(17, 10);
        assert_eq!(CoachingArchetype::AirRaid.situational_override(TimingClass::Run, &leading), 0);
        let early = trailing.with_clock(3, 90);
        assert_eq!(CoachingArchetype::AirRaid.situational_override(TimingClass::Run, &early), 0);
    }

    #[test]
    fn test_run_heavy_protects_lead() {
        let ctx = GameContext::new("NE", "NYJ").with_possession("NE").with_clock(4, 240).with_score(24, 20);
        assert_eq!(CoachingArchetype::RunHeavy.situational_override(TimingClass::Run, &ctx), 4);
    }
}
