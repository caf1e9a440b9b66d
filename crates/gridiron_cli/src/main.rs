//! Gridiron CLI
//!
//! Replays JSON game scripts through the game state engine.

#[cfg(feature = "cli")]
use anyhow::Result;
#[cfg(feature = "cli")]
use clap::{Parser, Subcommand};
#[cfg(feature = "cli")]
use std::path::PathBuf;

#[cfg(feature = "cli")]
#[derive(Parser)]
#[command(name = "gridiron")]
#[command(about = "Run football game scripts through the game state engine", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[cfg(feature = "cli")]
#[derive(Subcommand)]
enum Commands {
    /// Run one game script
    Run {
        /// Game script JSON file
        #[arg(long)]
        script: PathBuf,

        /// Write the exported audit log here
        #[arg(long)]
        out: Option<PathBuf>,

        /// Print the summary line only
        #[arg(long, default_value = "false")]
        summary: bool,
    },

    /// Run every *.json script in a directory in parallel
    Batch {
        #[arg(long)]
        dir: PathBuf,
    },

    /// Print the JSON schema of an exported audit entry
    Schema,
}

#[cfg(feature = "cli")]
fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Run { script, out, summary } => {
            let game = gridiron_cli::load_script(&script)?;
            let (result, auditor) = gridiron_cli::run_script(&game)?;

            if !summary {
                println!("Game:    {}", result.game_id);
                println!("Script:  {}", script.display());
                for entry in auditor.by_event_type(gridiron_core::AuditEventType::ValidationFailure) {
                    println!("  ! #{} Q{} {}", entry.sequence, entry.context.quarter, entry.description);
                    if let Some(validation) = &entry.validation {
                        for issue in validation.errors() {
                            println!("      [{}] {}", issue.rule_reference, issue.message);
                        }
                    }
                }
                println!("Entries: {}", result.audit_entries);
                println!("Digest:  {}", result.digest);
            }
            println!("{}", result.line());

            if let Some(out) = out {
                gridiron_cli::write_log(&auditor, &out)?;
                println!("Audit log written to: {}", out.display());
            }
        }

        Commands::Batch { dir } => {
            let results = gridiron_cli::run_batch(&dir)?;
            let mut failed = 0;
            for (path, result) in &results {
                match result {
                    Ok(summary) => println!("{}", summary.line()),
                    Err(err) => {
                        failed += 1;
                        println!("{:<16} FAILED: {:#}", path.display(), err);
                    }
                }
            }
            println!("{} game(s), {} failed", results.len(), failed);
            if failed > 0 {
                anyhow::bail!("{} script(s) failed", failed);
            }
        }

        Commands::Schema => {
            let schema = gridiron_core::audit::export_schema();
            println!("{}", serde_json::to_string_pretty(&schema)?);
        }
    }

    Ok(())
}

#[cfg(not(feature = "cli"))]
fn main() {
    eprintln!("gridiron CLI is not available. Enable the 'cli' feature to use it.");
    std::process::exit(1);
}
