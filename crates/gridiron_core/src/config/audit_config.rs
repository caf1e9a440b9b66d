use serde::{Deserialize, Serialize};

/// Play-by-play auditor settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AuditConfig {
    /// Attach processing time to recorded plays
    pub capture_timing: bool,
    /// Run gain that earns the "explosive" tag
    pub explosive_run_yards: i32,
    /// Pass gain that earns the "explosive" tag
    pub explosive_pass_yards: i32,
}

impl Default for AuditConfig {
    fn default() -> Self {
        Self { capture_timing: true, explosive_run_yards: 10, explosive_pass_yards: 20 }
    }
}
