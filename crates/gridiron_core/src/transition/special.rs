//! Special-teams, turnover and penalty-laden plays.
//!
//! A `SpecialSituationTransition` describes everything that happened on a
//! kick, punt, blocked kick or multi-event play, plus the follow-up actions
//! (kickoff after a score, safety kick, penalty enforcement) the caller must
//! service before the next snap.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::{PossessionTransition, TransitionError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SituationType {
    Kickoff,
    OnsideKick,
    Punt,
    FieldGoal,
    ExtraPoint,
    BlockedKick,
    FakePunt,
    FakeFieldGoal,
    MuffedPunt,
    MuffedKickoff,
    Safety,
    SafetyKick,
    PenaltyEnforcement,
    MultiEvent,
}

impl SituationType {
    pub fn as_str(&self) -> &'static str {
        match self {
            SituationType::Kickoff => "KICKOFF",
            SituationType::OnsideKick => "ONSIDE_KICK",
            SituationType::Punt => "PUNT",
            SituationType::FieldGoal => "FIELD_GOAL",
            SituationType::ExtraPoint => "EXTRA_POINT",
            SituationType::BlockedKick => "BLOCKED_KICK",
            SituationType::FakePunt => "FAKE_PUNT",
            SituationType::FakeFieldGoal => "FAKE_FIELD_GOAL",
            SituationType::MuffedPunt => "MUFFED_PUNT",
            SituationType::MuffedKickoff => "MUFFED_KICKOFF",
            SituationType::Safety => "SAFETY",
            SituationType::SafetyKick => "SAFETY_KICK",
            SituationType::PenaltyEnforcement => "PENALTY_ENFORCEMENT",
            SituationType::MultiEvent => "MULTI_EVENT",
        }
    }

    fn requires_kick(&self) -> bool {
        matches!(
            self,
            SituationType::Kickoff
                | SituationType::OnsideKick
                | SituationType::Punt
                | SituationType::FieldGoal
                | SituationType::ExtraPoint
                | SituationType::BlockedKick
                | SituationType::SafetyKick
        )
    }

    fn requires_recovery(&self) -> bool {
        matches!(self, SituationType::MuffedPunt | SituationType::MuffedKickoff)
    }

    fn risk_level(&self) -> RiskLevel {
        match self {
            SituationType::Kickoff
            | SituationType::ExtraPoint
            | SituationType::SafetyKick
            | SituationType::PenaltyEnforcement => RiskLevel::Low,
            SituationType::Punt | SituationType::FieldGoal | SituationType::MultiEvent => {
                RiskLevel::Moderate
            }
            SituationType::OnsideKick
            | SituationType::FakePunt
            | SituationType::FakeFieldGoal
            | SituationType::Safety => RiskLevel::High,
            SituationType::BlockedKick
            | SituationType::MuffedPunt
            | SituationType::MuffedKickoff => RiskLevel::Extreme,
        }
    }
}

impl fmt::Display for SituationType {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum KickType {
    Kickoff,
    Onside,
    Squib,
    Punt,
    FieldGoal,
    ExtraPoint,
    SafetyKick,
}

impl KickType {
    pub fn as_str(&self) -> &'static str {
        match self {
            KickType::Kickoff => "KICKOFF",
            KickType::Onside => "ONSIDE",
            KickType::Squib => "SQUIB",
            KickType::Punt => "PUNT",
            KickType::FieldGoal => "FIELD_GOAL",
            KickType::ExtraPoint => "EXTRA_POINT",
            KickType::SafetyKick => "SAFETY_KICK",
        }
    }

    fn is_placekick(&self) -> bool {
        matches!(self, KickType::FieldGoal | KickType::ExtraPoint)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ReturnType {
    Kickoff,
    Punt,
    MissedFieldGoal,
    BlockedKick,
    Fumble,
}

impl ReturnType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReturnType::Kickoff => "KICKOFF",
            ReturnType::Punt => "PUNT",
            ReturnType::MissedFieldGoal => "MISSED_FIELD_GOAL",
            ReturnType::BlockedKick => "BLOCKED_KICK",
            ReturnType::Fumble => "FUMBLE",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KickDetails {
    pub kick_type: KickType,
    pub distance: i32,
    /// `None` when success does not apply (kickoffs, punts)
    pub success: Option<bool>,
    pub blocked: bool,
    pub blocking_player: Option<String>,
}

impl KickDetails {
    pub fn new(kick_type: KickType, distance: i32) -> Self {
        Self { kick_type, distance, success: None, blocked: false, blocking_player: None }
    }

    pub fn successful(mut self, success: bool) -> Self {
        self.success = Some(success);
        self
    }

    pub fn blocked_by(mut self, player: impl Into<String>) -> Self {
        self.blocked = true;
        self.blocking_player = Some(player.into());
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReturnDetails {
    pub return_type: ReturnType,
    pub distance: i32,
    pub touchback: bool,
    pub fair_catch: bool,
    pub returner: Option<String>,
}

impl ReturnDetails {
    pub fn new(return_type: ReturnType, distance: i32) -> Self {
        Self { return_type, distance, touchback: false, fair_catch: false, returner: None }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecoveryDetails {
    pub recovering_team: String,
    pub recovering_player: Option<String>,
    /// Spot of the recovery, recovering team's perspective
    pub location: i32,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PenaltyDetails {
    pub penalty_types: Vec<String>,
    pub yards: i32,
    pub automatic_first_down: bool,
    pub offsetting: bool,
    pub against_team: Option<String>,
}

/// One step of a multi-event play
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SituationEvent {
    pub kind: SituationType,
    pub description: String,
    pub team: Option<String>,
    pub yards: i32,
}

impl SituationEvent {
    pub fn new(kind: SituationType, description: impl Into<String>) -> Self {
        Self { kind, description: description.into(), team: None, yards: 0 }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FollowUp {
    Kickoff,
    Punt,
    FieldGoalAttempt,
    SafetyKick,
    PenaltyEnforcement,
}

impl FollowUp {
    pub fn as_str(&self) -> &'static str {
        match self {
            FollowUp::Kickoff => "KICKOFF",
            FollowUp::Punt => "PUNT",
            FollowUp::FieldGoalAttempt => "FIELD_GOAL_ATTEMPT",
            FollowUp::SafetyKick => "SAFETY_KICK",
            FollowUp::PenaltyEnforcement => "PENALTY_ENFORCEMENT",
        }
    }
}

/// Actions the caller must service before the next play
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct FollowUpRequirements {
    pub requires_kickoff: bool,
    pub requires_punt: bool,
    pub requires_field_goal_attempt: bool,
    pub requires_safety_kick: bool,
    pub requires_penalty_enforcement: bool,
}

impl FollowUpRequirements {
    fn set(&mut self, follow_up: FollowUp) {
        match follow_up {
            FollowUp::Kickoff => self.requires_kickoff = true,
            FollowUp::Punt => self.requires_punt = true,
            FollowUp::FieldGoalAttempt => self.requires_field_goal_attempt = true,
            FollowUp::SafetyKick => self.requires_safety_kick = true,
            FollowUp::PenaltyEnforcement => self.requires_penalty_enforcement = true,
        }
    }

    pub fn pending(&self) -> Vec<FollowUp> {
        let mut pending = Vec::new();
        if self.requires_penalty_enforcement {
            pending.push(FollowUp::PenaltyEnforcement);
        }
        if self.requires_safety_kick {
            pending.push(FollowUp::SafetyKick);
        }
        if self.requires_kickoff {
            pending.push(FollowUp::Kickoff);
        }
        if self.requires_punt {
            pending.push(FollowUp::Punt);
        }
        if self.requires_field_goal_attempt {
            pending.push(FollowUp::FieldGoalAttempt);
        }
        pending
    }

    pub fn is_empty(&self) -> bool {
        self.pending().is_empty()
    }
}

/// Special-teams units on the field for this situation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SpecialTeamsUnits {
    pub kicking_unit: bool,
    pub return_unit: bool,
    pub field_goal_unit: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RiskLevel {
    Low,
    Moderate,
    High,
    Extreme,
}

impl RiskLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            RiskLevel::Low => "LOW",
            RiskLevel::Moderate => "MODERATE",
            RiskLevel::High => "HIGH",
            RiskLevel::Extreme => "EXTREME",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpecialSituationTransition {
    situation_type: SituationType,
    possession: Option<PossessionTransition>,
    kick: Option<KickDetails>,
    return_details: Option<ReturnDetails>,
    recovery: Option<RecoveryDetails>,
    penalty: Option<PenaltyDetails>,
    /// Ordered; the first entry is the primary event
    events: Vec<SituationEvent>,
    follow_ups: FollowUpRequirements,
    units: SpecialTeamsUnits,
    risk_level: RiskLevel,
}

impl SpecialSituationTransition {
    pub fn builder(situation_type: SituationType) -> SpecialSituationBuilder {
        SpecialSituationBuilder::new(situation_type)
    }

    pub fn situation_type(&self) -> SituationType {
        self.situation_type
    }

    pub fn possession(&self) -> Option<&PossessionTransition> {
        self.possession.as_ref()
    }

    pub fn kick(&self) -> Option<&KickDetails> {
        self.kick.as_ref()
    }

    pub fn return_details(&self) -> Option<&ReturnDetails> {
        self.return_details.as_ref()
    }

    pub fn recovery(&self) -> Option<&RecoveryDetails> {
        self.recovery.as_ref()
    }

    pub fn penalty(&self) -> Option<&PenaltyDetails> {
        self.penalty.as_ref()
    }

    pub fn events(&self) -> &[SituationEvent] {
        &self.events
    }

    pub fn primary_event(&self) -> Option<&SituationEvent> {
        self.events.first()
    }

    pub fn secondary_events(&self) -> &[SituationEvent] {
        self.events.get(1..).unwrap_or(&[])
    }

    pub fn follow_ups(&self) -> FollowUpRequirements {
        self.follow_ups
    }

    pub fn pending_follow_ups(&self) -> Vec<FollowUp> {
        self.follow_ups.pending()
    }

    pub fn units(&self) -> SpecialTeamsUnits {
        self.units
    }

    pub fn risk_level(&self) -> RiskLevel {
        self.risk_level
    }

    pub fn summary(&self) -> String {
        let mut parts = vec![self.situation_type.as_str().to_string()];
        if let Some(kick) = &self.kick {
            let mut text = format!("{} {} yds", kick.kick_type.as_str(), kick.distance);
            if kick.blocked {
                text.push_str(" BLOCKED");
                if let Some(player) = &kick.blocking_player {
                    text.push_str(&format!(" by {}", player));
                }
            } else if let Some(success) = kick.success {
                text.push_str(if success { " GOOD" } else { " NO GOOD" });
            }
            parts.push(text);
        }
        if let Some(ret) = &self.return_details {
            if ret.touchback {
                parts.push("touchback".to_string());
            } else if ret.fair_catch {
                parts.push("fair catch".to_string());
            } else {
                parts.push(format!("returned {} yds", ret.distance));
            }
        }
        if let Some(recovery) = &self.recovery {
            parts.push(format!("recovered by {}", recovery.recovering_team));
        }
        if let Some(penalty) = &self.penalty {
            if penalty.offsetting {
                parts.push("offsetting penalties".to_string());
            } else {
                parts.push(format!("penalty {} yds", penalty.yards));
            }
        }
        parts.join(", ")
    }
}

/// Two-phase builder for `SpecialSituationTransition`
#[derive(Debug, Clone)]
pub struct SpecialSituationBuilder {
    situation_type: SituationType,
    possession: Option<PossessionTransition>,
    kick: Option<KickDetails>,
    return_details: Option<ReturnDetails>,
    recovery: Option<RecoveryDetails>,
    penalty: Option<PenaltyDetails>,
    events: Vec<SituationEvent>,
    explicit_follow_ups: Vec<FollowUp>,
}

impl SpecialSituationBuilder {
    pub fn new(situation_type: SituationType) -> Self {
        Self {
            situation_type,
            possession: None,
            kick: None,
            return_details: None,
            recovery: None,
            penalty: None,
            events: Vec::new(),
            explicit_follow_ups: Vec::new(),
        }
    }

    pub fn possession(mut self, transition: PossessionTransition) -> Self {
        self.possession = Some(transition);
        self
    }

    pub fn kick(mut self, kick: KickDetails) -> Self {
        self.kick = Some(kick);
        self
    }

    pub fn return_details(mut self, details: ReturnDetails) -> Self {
        self.return_details = Some(details);
        self
    }

    pub fn recovery(mut self, recovery: RecoveryDetails) -> Self {
        self.recovery = Some(recovery);
        self
    }

    pub fn penalty(mut self, penalty: PenaltyDetails) -> Self {
        self.penalty = Some(penalty);
        self
    }

    pub fn event(mut self, event: SituationEvent) -> Self {
        self.events.push(event);
        self
    }

    pub fn requires(mut self, follow_up: FollowUp) -> Self {
        self.explicit_follow_ups.push(follow_up);
        self
    }

    pub fn build(self) -> Result<SpecialSituationTransition, TransitionError> {
        let situation = self.situation_type;

        if situation.requires_kick() && self.kick.is_none() {
            return Err(TransitionError::MissingDetails {
                situation: situation.as_str(),
                detail: "kick",
            });
        }
        if situation.requires_recovery() && self.recovery.is_none() {
            return Err(TransitionError::MissingDetails {
                situation: situation.as_str(),
                detail: "recovery",
            });
        }
        if situation == SituationType::PenaltyEnforcement && self.penalty.is_none() {
            return Err(TransitionError::MissingDetails {
                situation: situation.as_str(),
                detail: "penalty",
            });
        }
        if let Some(kick) = &self.kick {
            if kick.blocked && kick.success == Some(true) {
                return Err(TransitionError::BlockedAndSuccessful);
            }
        }
        if let Some(ret) = &self.return_details {
            if ret.touchback && ret.fair_catch {
                return Err(TransitionError::TouchbackWithFairCatch);
            }
        }
        if let Some(penalty) = &self.penalty {
            if penalty.offsetting && penalty.automatic_first_down {
                return Err(TransitionError::OffsettingWithFirstDown);
            }
        }

        let units = derive_units(situation, self.kick.as_ref());
        let follow_ups =
            derive_follow_ups(situation, self.kick.as_ref(), self.penalty.as_ref(), &self.explicit_follow_ups);

        let mut events = self.events;
        if events.is_empty() {
            events.push(SituationEvent::new(situation, situation.as_str()));
        }

        Ok(SpecialSituationTransition {
            situation_type: situation,
            possession: self.possession,
            kick: self.kick,
            return_details: self.return_details,
            recovery: self.recovery,
            penalty: self.penalty,
            events,
            follow_ups,
            units,
            risk_level: situation.risk_level(),
        })
    }
}

fn derive_units(situation: SituationType, kick: Option<&KickDetails>) -> SpecialTeamsUnits {
    let placekick = kick.is_some_and(|k| k.kick_type.is_placekick());
    match situation {
        SituationType::Kickoff
        | SituationType::OnsideKick
        | SituationType::Punt
        | SituationType::SafetyKick
        | SituationType::MuffedPunt
        | SituationType::MuffedKickoff => {
            SpecialTeamsUnits { kicking_unit: true, return_unit: true, field_goal_unit: false }
        }
        SituationType::FakePunt => {
            SpecialTeamsUnits { kicking_unit: true, return_unit: false, field_goal_unit: false }
        }
        SituationType::FieldGoal | SituationType::ExtraPoint | SituationType::FakeFieldGoal => {
            SpecialTeamsUnits { kicking_unit: false, return_unit: false, field_goal_unit: true }
        }
        SituationType::BlockedKick => SpecialTeamsUnits {
            kicking_unit: !placekick,
            return_unit: false,
            field_goal_unit: placekick,
        },
        SituationType::Safety | SituationType::PenaltyEnforcement | SituationType::MultiEvent => {
            SpecialTeamsUnits::default()
        }
    }
}

fn derive_follow_ups(
    situation: SituationType,
    kick: Option<&KickDetails>,
    penalty: Option<&PenaltyDetails>,
    explicit: &[FollowUp],
) -> FollowUpRequirements {
    let mut follow_ups = FollowUpRequirements::default();

    match situation {
        SituationType::Safety => follow_ups.set(FollowUp::SafetyKick),
        SituationType::FieldGoal | SituationType::ExtraPoint => {
            if kick.is_some_and(|k| k.success == Some(true)) {
                follow_ups.set(FollowUp::Kickoff);
            }
        }
        _ => {}
    }

    if penalty.is_some_and(|p| !p.offsetting) {
        follow_ups.set(FollowUp::PenaltyEnforcement);
    }

    for follow_up in explicit {
        follow_ups.set(*follow_up);
    }
    follow_ups
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kickoff_requires_kick_details() {
        let err = SpecialSituationTransition::builder(SituationType::Kickoff).build().unwrap_err();
        assert_eq!(
            err,
            TransitionError::MissingDetails { situation: "KICKOFF", detail: "kick" }
        );
    }

    #[test]
    fn test_kickoff_units_and_risk() {
        let t = SpecialSituationTransition::builder(SituationType::Kickoff)
            .kick(KickDetails::new(KickType::Kickoff, 65))
            .return_details(ReturnDetails { touchback: true, ..ReturnDetails::new(ReturnType::Kickoff, 0) })
            .build()
            .unwrap();
        assert!(t.units().kicking_unit);
        assert!(t.units().return_unit);
        assert!(!t.units().field_goal_unit);
        assert_eq!(t.risk_level(), RiskLevel::Low);
        assert!(t.pending_follow_ups().is_empty());
        assert!(t.summary().contains("touchback"));
    }

    #[test]
    fn test_made_field_goal_requires_kickoff() {
        let t = SpecialSituationTransition::builder(SituationType::FieldGoal)
            .kick(KickDetails::new(KickType::FieldGoal, 44).successful(true))
            .build()
            .unwrap();
        assert_eq!(t.pending_follow_ups(), vec![FollowUp::Kickoff]);
        assert!(t.units().field_goal_unit);
        assert!(t.summary().contains("GOOD"));
    }

    #[test]
    fn test_missed_field_goal_has_no_follow_up() {
        let t = SpecialSituationTransition::builder(SituationType::FieldGoal)
            .kick(KickDetails::new(KickType::FieldGoal, 55).successful(false))
            .build()
            .unwrap();
        assert!(t.follow_ups().is_empty());
    }

    #[test]
    fn test_safety_requires_safety_kick() {
        let t = SpecialSituationTransition::builder(SituationType::Safety).build().unwrap();
        assert!(t.follow_ups().requires_safety_kick);
        assert_eq!(t.risk_level(), RiskLevel::High);
    }

    #[test]
    fn test_blocked_and_successful_rejected() {
        let mut kick = KickDetails::new(KickType::FieldGoal, 38).blocked_by("DT 97");
        kick.success = Some(true);
        let err = SpecialSituationTransition::builder(SituationType::BlockedKick)
            .kick(kick)
            .build()
            .unwrap_err();
        assert_eq!(err, TransitionError::BlockedAndSuccessful);
    }

    #[test]
    fn test_blocked_field_goal_units() {
        let t = SpecialSituationTransition::builder(SituationType::BlockedKick)
            .kick(KickDetails::new(KickType::FieldGoal, 38).blocked_by("DT 97"))
            .build()
            .unwrap();
        assert!(t.units().field_goal_unit);
        assert!(!t.units().kicking_unit);
        assert_eq!(t.risk_level(), RiskLevel::Extreme);
        assert!(t.summary().contains("BLOCKED by DT 97"));
    }

    #[test]
    fn test_touchback_with_fair_catch_rejected() {
        let ret = ReturnDetails {
            touchback: true,
            fair_catch: true,
            ..ReturnDetails::new(ReturnType::Punt, 0)
        };
        let err = SpecialSituationTransition::builder(SituationType::Punt)
            .kick(KickDetails::new(KickType::Punt, 45))
            .return_details(ret)
            .build()
            .unwrap_err();
        assert_eq!(err, TransitionError::TouchbackWithFairCatch);
    }

    #[test]
    fn test_penalty_enforcement() {
        let penalty = PenaltyDetails {
            penalty_types: vec!["defensive_holding".to_string()],
            yards: 5,
            automatic_first_down: true,
            offsetting: false,
            against_team: Some("NYG".to_string()),
        };
        let t = SpecialSituationTransition::builder(SituationType::PenaltyEnforcement)
            .penalty(penalty)
            .build()
            .unwrap();
        assert!(t.follow_ups().requires_penalty_enforcement);

        let err = SpecialSituationTransition::builder(SituationType::PenaltyEnforcement)
            .penalty(PenaltyDetails { offsetting: true, automatic_first_down: true, ..Default::default() })
            .build()
            .unwrap_err();
        assert_eq!(err, TransitionError::OffsettingWithFirstDown);
    }

    #[test]
    fn test_offsetting_penalties_need_no_enforcement() {
        let t = SpecialSituationTransition::builder(SituationType::PenaltyEnforcement)
            .penalty(PenaltyDetails { offsetting: true, ..Default::default() })
            .build()
            .unwrap();
        assert!(!t.follow_ups().requires_penalty_enforcement);
        assert!(t.summary().contains("offsetting"));
    }

    #[test]
    fn test_muffed_punt_requires_recovery() {
        let err = SpecialSituationTransition::builder(SituationType::MuffedPunt).build().unwrap_err();
        assert!(matches!(err, TransitionError::MissingDetails { detail: "recovery", .. }));
    }

    #[test]
    fn test_multi_event_ordering() {
        let t = SpecialSituationTransition::builder(SituationType::MultiEvent)
            .event(SituationEvent::new(SituationType::Punt, "punt 48 yards"))
            .event(SituationEvent::new(SituationType::MuffedPunt, "muffed at the 12"))
            .event(SituationEvent::new(SituationType::PenaltyEnforcement, "holding on the return"))
            .requires(FollowUp::PenaltyEnforcement)
            .build()
            .unwrap();
        assert_eq!(t.primary_event().map(|e| e.kind), Some(SituationType::Punt));
        assert_eq!(t.secondary_events().len(), 2);
        assert_eq!(t.pending_follow_ups(), vec![FollowUp::PenaltyEnforcement]);
    }

    #[test]
    fn test_default_primary_event() {
        let t = SpecialSituationTransition::builder(SituationType::Safety).build().unwrap();
        assert_eq!(t.events().len(), 1);
        assert!(t.secondary_events().is_empty());
    }
}
