//! # Engine Configuration
//!
//! Every tuning constant used by the validators, the clock strategy engine and
//! the auditor lives here instead of being scattered across modules.
//!
//! ## Presets
//! - `regular_season()` (default): 10-minute overtime, ties allowed
//! - `playoff()`: 15-minute overtime periods until someone scores
//! - `fast_clock()`: shorter base play times for quick simulations
//!
//! ## Usage
//! ```rust
//! use gridiron_core::config::EngineConfig;
//!
//! let config = EngineConfig::default();
//! let playoff = EngineConfig::playoff();
//! assert!(playoff.rules.is_playoff);
//! assert!(!config.rules.is_playoff);
//! ```
//!
//! ## Environment Variables
//!
//! - `GRIDIRON_RULES_PROFILE`: Select preset (playoff, fast, default)

mod audit_config;
mod clock_config;
mod rules_config;

pub use audit_config::AuditConfig;
pub use clock_config::{BaseTimes, ClockConfig};
pub use rules_config::RulesConfig;

use serde::{Deserialize, Serialize};
use std::env;
use std::path::Path;

use crate::error::{CoreError, Result};

/// Environment variable selecting the preset used by `from_env_or_default`.
pub const PROFILE_ENV_VAR: &str = "GRIDIRON_RULES_PROFILE";

/// Full engine configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct EngineConfig {
    /// League rules (clock, quarters, timeouts, overtime)
    #[serde(default)]
    pub rules: RulesConfig,
    /// Clock strategy timing and bounds
    #[serde(default)]
    pub clock: ClockConfig,
    /// Play-by-play auditor settings
    #[serde(default)]
    pub audit: AuditConfig,
}

impl EngineConfig {
    /// Regular season rules (default)
    pub fn regular_season() -> Self {
        Self::default()
    }

    /// Playoff rules: overtime periods repeat until the tie is broken
    pub fn playoff() -> Self {
        Self { rules: RulesConfig::playoff(), ..Self::default() }
    }

    /// Shorter play clock, used for fast batch simulation
    pub fn fast_clock() -> Self {
        Self { clock: ClockConfig::fast(), ..Self::default() }
    }

    /// Load the preset named by `GRIDIRON_RULES_PROFILE` or fall back to default
    pub fn from_env_or_default() -> Self {
        let profile = env::var(PROFILE_ENV_VAR).unwrap_or_default().to_lowercase();
        log::debug!("Selecting engine profile '{}'", profile);
        Self::from_profile(&profile)
    }

    /// Resolve a preset by name; unknown names yield the regular season preset
    pub fn from_profile(profile: &str) -> Self {
        match profile {
            "playoff" | "playoffs" | "postseason" => Self::playoff(),
            "fast" | "fast_clock" => Self::fast_clock(),
            _ => Self::regular_season(),
        }
    }

    pub fn from_json_str(raw: &str) -> Result<Self> {
        Ok(serde_json::from_str::<Self>(raw)?.normalized())
    }

    pub fn from_yaml_str(raw: &str) -> Result<Self> {
        Ok(serde_yaml::from_str::<Self>(raw)?.normalized())
    }

    /// Load from a `.json`, `.yaml` or `.yml` file
    pub fn load(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)?;
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase())
            .unwrap_or_default();

        let config = match ext.as_str() {
            "json" => Self::from_json_str(&raw)?,
            "yaml" | "yml" => Self::from_yaml_str(&raw)?,
            _ => {
                return Err(CoreError::UnsupportedConfigFormat {
                    path: path.display().to_string(),
                })
            }
        };
        log::info!("Loaded engine config from {}", path.display());
        Ok(config)
    }

    /// Repair values that would break invariants (e.g. min > max clock bounds)
    pub fn normalized(mut self) -> Self {
        self.clock = self.clock.normalized();
        self
    }
}

// ========== Tests ==========
