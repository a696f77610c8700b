//! gent CLI
//!
//! Inspect event scripts and snapshot directories without running a test.

#![warn(missing_docs)]
#![warn(clippy::all)]

use clap::{Parser, Subcommand};
use color_eyre::Result;
use gent_snap::engine::DEFAULT_SCRIPT_EXTENSION;
use gent_snap::{load_script, sanitize, snapshot_name, SnapshotState, SnapshotSuite};
use serde::Serialize;
use std::io::{self, Write};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "gent")]
#[command(about = "gent - golden-file snapshot replay inspector", long_about = None)]
struct Cli {
    /// Log harness activity at debug level
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the event groups of a script
    Script {
        /// Snapshot directory holding the script
        root: PathBuf,
        /// Run identifier (script file name without extension)
        run_id: String,
        /// Emit JSON instead of one line per group
        #[arg(long)]
        json: bool,
    },
    /// Show which snapshots of a run are recorded
    Status {
        /// Snapshot directory
        root: PathBuf,
        /// Run identifier
        run_id: String,
        /// Emit JSON instead of one line per snapshot
        #[arg(long)]
        json: bool,
    },
    /// Print the filesystem-safe form of a name
    Sanitize {
        /// Name to sanitize
        name: String,
    },
}

#[derive(Debug, Serialize)]
struct StatusLine {
    name: String,
    state: SnapshotState,
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .try_init();
}

fn run<W: Write>(command: Commands, out: &mut W) -> Result<()> {
    match command {
        Commands::Script { root, run_id, json } => {
            let suite = SnapshotSuite::new(root);
            let script = load_script(suite.fs(), suite.root(), &run_id, DEFAULT_SCRIPT_EXTENSION)?;
            if json {
                serde_json::to_writer_pretty(&mut *out, &script)?;
                writeln!(out)?;
            } else {
                for (i, group) in script.groups().iter().enumerate() {
                    writeln!(out, "{:03} {}", i + 1, group.to_line())?;
                }
            }
            Ok(())
        }
        Commands::Status { root, run_id, json } => {
            let suite = SnapshotSuite::new(root);
            let script = load_script(suite.fs(), suite.root(), &run_id, DEFAULT_SCRIPT_EXTENSION)?;
            let mut lines = Vec::with_capacity(script.len() + 1);
            for index in 0..=script.len() {
                let name = sanitize(&snapshot_name(&run_id, index));
                let state = suite.state(&name)?;
                tracing::debug!(%name, %state, "snapshot state");
                lines.push(StatusLine { name, state });
            }
            if json {
                serde_json::to_writer_pretty(&mut *out, &lines)?;
                writeln!(out)?;
            } else {
                for line in &lines {
                    writeln!(out, "{} {}", line.name, line.state)?;
                }
            }
            Ok(())
        }
        Commands::Sanitize { name } => {
            writeln!(out, "{}", sanitize(&name))?;
            Ok(())
        }
    }
}

fn main() -> Result<()> {
    color_eyre::install()?;
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let stdout = io::stdout();
    let mut out = stdout.lock();
    run(cli.command, &mut out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn output(command: Commands) -> String {
        let mut buf = Vec::new();
        run(command, &mut buf).unwrap();
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn test_cli_parses_status() {
        let cli = Cli::try_parse_from(["gent", "-v", "status", "snap", "run1"]).unwrap();
        assert!(cli.verbose);
        assert!(matches!(cli.command, Commands::Status { ref run_id, .. } if run_id == "run1"));
    }

    #[test]
    fn test_sanitize_command() {
        let out = output(Commands::Sanitize {
            name: "x wins/1".to_string(),
        });
        assert_eq!(out, "x_wins_1\n");
    }

    #[test]
    fn test_script_command_lines() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("run1.txt"), "down,enter\n# c\ntab\n").unwrap();

        let out = output(Commands::Script {
            root: tmp.path().to_path_buf(),
            run_id: "run1".to_string(),
            json: false,
        });
        assert_eq!(out, "001 down,enter\n002 tab\n");
    }

    #[test]
    fn test_script_command_json() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("run1.txt"), "up,hi\n").unwrap();

        let out = output(Commands::Script {
            root: tmp.path().to_path_buf(),
            run_id: "run1".to_string(),
            json: true,
        });
        let value: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(value["groups"][0][0], "up");
        assert_eq!(value["groups"][0][1]["runes"], "hi");
    }

    #[test]
    fn test_status_command() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("run1.txt"), "down\ntab\n").unwrap();
        fs::write(tmp.path().join("run1_000"), "grid").unwrap();
        fs::write(tmp.path().join("run1_001"), "").unwrap();

        let out = output(Commands::Status {
            root: tmp.path().to_path_buf(),
            run_id: "run1".to_string(),
            json: false,
        });
        assert_eq!(out, "run1_000 recorded\nrun1_001 empty\nrun1_002 absent\n");

        let out = output(Commands::Status {
            root: tmp.path().to_path_buf(),
            run_id: "run1".to_string(),
            json: true,
        });
        let value: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(value[2]["name"], "run1_002");
        assert_eq!(value[2]["state"], "absent");
    }

    #[test]
    fn test_script_command_missing_script() {
        let tmp = TempDir::new().unwrap();
        let mut buf = Vec::new();
        let result = run(
            Commands::Script {
                root: tmp.path().to_path_buf(),
                run_id: "nope".to_string(),
                json: false,
            },
            &mut buf,
        );
        assert!(result.is_err());
    }
}
