//! Flat, self-describing export of the audit log.
//!
//! Every enum becomes its string form and every nested structure is
//! flattened to primitives, so the export can be written to any format
//! without knowing this crate's types. Free-form details travel as a JSON
//! string.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use super::auditor::PlayByPlayAuditor;
use super::entry::AuditEntry;
use crate::error::Result;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ExportedAuditEntry {
    pub entry_id: String,
    /// RFC 3339
    pub timestamp: String,
    pub sequence: u64,
    pub game_id: String,
    pub event_type: String,
    pub description: String,
    pub team: Option<String>,
    pub tags: Vec<String>,

    // context snapshot
    pub context_complete: bool,
    pub context_degraded_reason: Option<String>,
    pub quarter: u8,
    pub game_clock_seconds: u32,
    pub down: u8,
    pub yards_to_go: i32,
    pub field_position: i32,
    pub possession_team: Option<String>,
    pub home_team: String,
    pub away_team: String,
    pub home_score: u16,
    pub away_score: u16,
    pub home_timeouts: u8,
    pub away_timeouts: u8,

    // play
    pub play_type: Option<String>,
    pub completion: Option<String>,
    pub yards_gained: Option<i32>,
    pub is_score: Option<bool>,
    pub is_turnover: Option<bool>,
    pub outcome_tag: Option<String>,

    // possession transition
    pub possession_changes: Option<bool>,
    pub old_possessing_team: Option<String>,
    pub new_possessing_team: Option<String>,
    pub turnover_type: Option<String>,
    pub possession_reason: Option<String>,
    pub turnover_location: Option<i32>,
    pub momentum_shift: Option<bool>,

    // special situation
    pub special_situation: Option<String>,
    pub special_risk_level: Option<String>,
    pub special_follow_ups: Vec<String>,

    // validation
    pub validation_valid: Option<bool>,
    pub validation_rules: Vec<String>,

    pub details_json: String,
    pub capture_micros: Option<u64>,
}

impl From<&AuditEntry> for ExportedAuditEntry {
    fn from(entry: &AuditEntry) -> Self {
        let ctx = &entry.context;
        let play = entry.play.as_ref();
        let possession = entry.possession.as_ref();
        let special = entry.special.as_ref();
        let validation = entry.validation.as_ref();

        Self {
            entry_id: entry.entry_id.to_string(),
            timestamp: entry.timestamp.to_rfc3339(),
            sequence: entry.sequence,
            game_id: entry.game_id.clone(),
            event_type: entry.event_type.as_str().to_string(),
            description: entry.description.clone(),
            team: entry.team.clone(),
            tags: entry.tags.clone(),

            context_complete: ctx.complete,
            context_degraded_reason: ctx.degraded_reason.clone(),
            quarter: ctx.quarter,
            game_clock_seconds: ctx.game_clock_seconds,
            down: ctx.down,
            yards_to_go: ctx.yards_to_go,
            field_position: ctx.field_position,
            possession_team: ctx.possession_team.clone(),
            home_team: ctx.home_team.clone(),
            away_team: ctx.away_team.clone(),
            home_score: ctx.home_score,
            away_score: ctx.away_score,
            home_timeouts: ctx.home_timeouts,
            away_timeouts: ctx.away_timeouts,

            play_type: play.map(|p| p.play_type.as_str().to_string()),
            completion: play.map(|p| p.completion.as_str().to_string()),
            yards_gained: play.map(|p| p.yards_gained),
            is_score: play.map(|p| p.is_score),
            is_turnover: play.map(|p| p.is_turnover),
            outcome_tag: play.and_then(|p| p.outcome.as_ref()).map(|t| t.as_str().to_string()),

            possession_changes: possession.map(|p| p.possession_changes()),
            old_possessing_team: possession.and_then(|p| p.old_possessing_team()).map(str::to_string),
            new_possessing_team: possession.and_then(|p| p.new_possessing_team()).map(str::to_string),
            turnover_type: possession.and_then(|p| p.turnover_type()).map(|t| t.as_str().to_string()),
            possession_reason: possession.and_then(|p| p.reason()).map(|r| r.as_str().to_string()),
            turnover_location: possession.and_then(|p| p.turnover_location()),
            momentum_shift: possession.map(|p| p.is_momentum_shift()),

            special_situation: special.map(|s| s.situation_type().as_str().to_string()),
            special_risk_level: special.map(|s| s.risk_level().as_str().to_string()),
            special_follow_ups: special
                .map(|s| s.pending_follow_ups().iter().map(|f| f.as_str().to_string()).collect())
                .unwrap_or_default(),

            validation_valid: validation.map(|v| v.is_valid()),
            validation_rules: validation
                .map(|v| v.issues().iter().map(|i| i.rule_reference.clone()).collect())
                .unwrap_or_default(),

            details_json: serde_json::Value::Object(
                entry.details.iter().map(|(k, v)| (k.clone(), v.clone())).collect(),
            )
            .to_string(),
            capture_micros: entry.timing.map(|t| t.capture_micros),
        }
    }
}

impl ExportedAuditEntry {
    /// Copy without run-specific fields (id, wall clock, timing)
    pub fn without_run_metadata(&self) -> Self {
        Self {
            entry_id: String::new(),
            timestamp: String::new(),
            capture_micros: None,
            ..self.clone()
        }
    }
}

/// JSON schema of `ExportedAuditEntry`
pub fn export_schema() -> schemars::schema::RootSchema {
    schemars::schema_for!(ExportedAuditEntry)
}

fn sha256_hex(bytes: &[u8]) -> String {
    let digest = Sha256::digest(bytes);
    let mut out = String::with_capacity(digest.len() * 2);
    for b in digest {
        out.push_str(&format!("{:02x}", b));
    }
    out
}

impl PlayByPlayAuditor {
    pub fn export_log(&self) -> Vec<ExportedAuditEntry> {
        self.entries().iter().map(|e| ExportedAuditEntry::from(e.as_ref())).collect()
    }

    pub fn export_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(&self.export_log())?)
    }

    pub fn export_schema(&self) -> schemars::schema::RootSchema {
        export_schema()
    }

    /// SHA-256 over the export minus ids, timestamps and timing.
    /// Two runs of the same game produce the same digest.
    pub fn digest(&self) -> Result<String> {
        let stable: Vec<ExportedAuditEntry> = self.export_log().iter().map(|e| e.without_run_metadata()).collect();
        let bytes = serde_json::to_vec(&stable)?;
        Ok(sha256_hex(&bytes))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{GameContext, PlayOutcome};
    use crate::possession::calculate_possession_changes;

    fn ctx() -> GameContext {
        GameContext::new("MIN", "DET").with_possession("MIN").with_field_position(35)
    }

    fn run_game(auditor: &mut PlayByPlayAuditor) {
        let c = ctx();
        auditor.record_play(&c, &PlayOutcome::interception(), Some(6));
        let t = calculate_possession_changes(&PlayOutcome::interception(), &c);
        auditor.record_possession_change(&c, &t);
        auditor.record_score(&c.clone().with_score(0, 7), "DET", 7, "touchdown");
    }

    #[test]
    fn test_export_flattens_entries() {
        let mut auditor = PlayByPlayAuditor::new("g");
        run_game(&mut auditor);
        let log = auditor.export_log();
        assert_eq!(log.len(), 3);
        assert_eq!(log[0].play_type.as_deref(), Some("pass"));
        assert_eq!(log[0].outcome_tag.as_deref(), Some("interception"));
        assert_eq!(log[1].turnover_type.as_deref(), Some("INTERCEPTION"));
        assert_eq!(log[1].new_possessing_team.as_deref(), Some("DET"));
        assert_eq!(log[2].event_type, "SCORE_UPDATE");
        assert_eq!(log[2].details_json, r#"{"points":7}"#);
    }

    #[test]
    fn test_export_shape() {
        let mut auditor = PlayByPlayAuditor::new("g");
        let entry = auditor.record_timeout(&ctx().with_clock(2, 95), "DET", 2);
        let exported = ExportedAuditEntry::from(entry.as_ref()).without_run_metadata();
        insta::assert_json_snapshot!(exported, @r###"
        {
          "entry_id": "",
          "timestamp": "",
          "sequence": 1,
          "game_id": "g",
          "event_type": "TIMEOUT_CALLED",
          "description": "timeout DET (2 remaining)",
          "team": "DET",
          "tags": [],
          "context_complete": true,
          "context_degraded_reason": null,
          "quarter": 2,
          "game_clock_seconds": 95,
          "down": 1,
          "yards_to_go": 10,
          "field_position": 35,
          "possession_team": "MIN",
          "home_team": "MIN",
          "away_team": "DET",
          "home_score": 0,
          "away_score": 0,
          "home_timeouts": 3,
          "away_timeouts": 3,
          "play_type": null,
          "completion": null,
          "yards_gained": null,
          "is_score": null,
          "is_turnover": null,
          "outcome_tag": null,
          "possession_changes": null,
          "old_possessing_team": null,
          "new_possessing_team": null,
          "turnover_type": null,
          "possession_reason": null,
          "turnover_location": null,
          "momentum_shift": null,
          "special_situation": null,
          "special_risk_level": null,
          "special_follow_ups": [],
          "validation_valid": null,
          "validation_rules": [],
          "details_json": "{\"remaining\":2}",
          "capture_micros": null
        }
        "###);
    }

    #[test]
    fn test_digest_ignores_ids_and_timestamps() {
        let mut a = PlayByPlayAuditor::new("g");
        let mut b = PlayByPlayAuditor::new("g");
        run_game(&mut a);
        run_game(&mut b);
        assert_ne!(a.entries()[0].entry_id, b.entries()[0].entry_id);
        assert_eq!(a.digest().unwrap(), b.digest().unwrap());
        assert_eq!(a.digest().unwrap().len(), 64);

        b.record_timeout(&ctx(), "MIN", 2);
        assert_ne!(a.digest().unwrap(), b.digest().unwrap());
    }

    #[test]
    fn test_export_json_round_trip() {
        let mut auditor = PlayByPlayAuditor::new("g");
        run_game(&mut auditor);
        let json = auditor.export_json().unwrap();
        let parsed: Vec<ExportedAuditEntry> = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, auditor.export_log());
    }

    #[test]
    fn test_schema_lists_fields() {
        let schema = serde_json::to_value(export_schema()).unwrap();
        let props = schema["properties"].as_object().unwrap();
        for field in ["sequence", "event_type", "tags", "details_json", "possession_reason"] {
            assert!(props.contains_key(field), "schema missing {}", field);
        }
    }
}
