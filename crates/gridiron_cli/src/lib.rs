//! Game Script Runner
//!
//! JSON game script → `PlaySession` → exported audit log + digest.
//! `run_batch` runs a directory of scripts, one independent session per game.

use anyhow::{Context, Result};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use gridiron_core::{
    AuditEventType, CoachingArchetype, EngineConfig, GameContext, GameEndStatus, PlayByPlayAuditor,
    PlayOutcome, PlaySession,
};

/// One game to replay through the engine
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameScript {
    pub game_id: String,
    pub home_team: String,
    pub away_team: String,
    #[serde(default)]
    pub playoff: bool,
    /// Team receiving the opening kickoff (defaults to the away team)
    #[serde(default)]
    pub receiving_team: Option<String>,
    /// Full starting context; overrides the opening-kickoff state
    #[serde(default)]
    pub initial: Option<GameContext>,
    #[serde(default)]
    pub config: Option<EngineConfig>,
    /// Archetype for plays that do not name one
    #[serde(default)]
    pub default_archetype: Option<String>,
    pub plays: Vec<ScriptedPlay>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScriptedPlay {
    #[serde(flatten)]
    pub outcome: PlayOutcome,
    #[serde(default)]
    pub archetype: Option<String>,
    /// Team calling a timeout before the snap
    #[serde(default)]
    pub timeout: Option<String>,
}

/// Per-game result line
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameSummary {
    pub game_id: String,
    pub home_team: String,
    pub away_team: String,
    pub home_score: u16,
    pub away_score: u16,
    pub quarter: u8,
    pub status: GameEndStatus,
    pub plays_run: usize,
    /// Scripted plays left over once the game ended
    pub plays_skipped: usize,
    pub audit_entries: usize,
    pub validation_failures: usize,
    pub digest: String,
}

impl GameSummary {
    pub fn line(&self) -> String {
        format!(
            "{:<16} {} {:>3} - {:<3} {} | {} | plays {} | failures {} | {}",
            self.game_id,
            self.home_team,
            self.home_score,
            self.away_score,
            self.away_team,
            self.status.as_str(),
            self.plays_run,
            self.validation_failures,
            &self.digest[..self.digest.len().min(12)],
        )
    }
}

pub fn load_script(path: &Path) -> Result<GameScript> {
    let raw = fs::read_to_string(path).with_context(|| format!("Failed to read script: {}", path.display()))?;
    serde_json::from_str(&raw).with_context(|| format!("Failed to parse script: {}", path.display()))
}

impl GameScript {
    pub fn engine_config(&self) -> EngineConfig {
        let mut config = self.config.clone().unwrap_or_default();
        if self.playoff {
            config.rules.is_playoff = true;
        }
        config
    }

    pub fn initial_context(&self) -> GameContext {
        if let Some(initial) = &self.initial {
            return initial.clone();
        }
        let receiving = self.receiving_team.clone().unwrap_or_else(|| self.away_team.clone());
        GameContext::new(self.home_team.clone(), self.away_team.clone()).with_possession(receiving)
    }
}

fn parse_archetype(name: Option<&str>) -> Result<CoachingArchetype> {
    match name {
        Some(name) => Ok(name.parse::<CoachingArchetype>()?),
        None => Ok(CoachingArchetype::default()),
    }
}

/// Run every scripted play until the game ends
pub fn run_script(script: &GameScript) -> Result<(GameSummary, PlayByPlayAuditor)> {
    let default_archetype = parse_archetype(script.default_archetype.as_deref())
        .with_context(|| format!("{}: bad default archetype", script.game_id))?;

    let mut session = PlaySession::new(script.game_id.clone(), script.initial_context(), script.engine_config());
    let mut plays_run = 0;

    for (index, play) in script.plays.iter().enumerate() {
        if session.is_over() {
            break;
        }
        let archetype = match play.archetype.as_deref() {
            Some(name) => parse_archetype(Some(name))
                .with_context(|| format!("{}: play {}", script.game_id, index + 1))?,
            None => default_archetype,
        };
        if let Some(team) = &play.timeout {
            session.call_timeout(team);
        }
        session.process_play(&play.outcome, archetype);
        plays_run += 1;
    }

    let ctx = session.context().clone();
    let status = session.game_status();
    let auditor = session.into_auditor();
    let summary = GameSummary {
        game_id: script.game_id.clone(),
        home_team: ctx.home_team.clone(),
        away_team: ctx.away_team.clone(),
        home_score: ctx.home_score,
        away_score: ctx.away_score,
        quarter: ctx.quarter,
        status,
        plays_run,
        plays_skipped: script.plays.len() - plays_run,
        audit_entries: auditor.len(),
        validation_failures: auditor.by_event_type(AuditEventType::ValidationFailure).len(),
        digest: auditor.digest()?,
    };
    Ok((summary, auditor))
}

pub fn write_log(auditor: &PlayByPlayAuditor, out: &Path) -> Result<()> {
    if let Some(parent) = out.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create output directory: {}", parent.display()))?;
        }
    }
    let json = auditor.export_json()?;
    fs::write(out, json).with_context(|| format!("Failed to write audit log: {}", out.display()))
}

/// `*.json` files directly inside `dir`, sorted by name
pub fn script_paths(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut paths = Vec::new();
    for entry in fs::read_dir(dir).with_context(|| format!("Failed to read directory: {}", dir.display()))? {
        let path = entry?.path();
        if path.is_file() && path.extension().is_some_and(|ext| ext == "json") {
            paths.push(path);
        }
    }
    paths.sort();
    Ok(paths)
}

/// Run every script in `dir` in parallel. Failures are reported per game.
pub fn run_batch(dir: &Path) -> Result<Vec<(PathBuf, Result<GameSummary>)>> {
    let paths = script_paths(dir)?;
    Ok(paths
        .into_par_iter()
        .map(|path| {
            let summary = load_script(&path).and_then(|script| run_script(&script).map(|(summary, _)| summary));
            (path, summary)
        })
        .collect())
}
