//! Topology action sync CLI.
//!
//! Tracks the lifecycle of a single test topology (added → deployed →
//! removed) and an append-only audit log of every attempted action,
//! persisted under `.toposync/` in the working root. Every invocation runs
//! one load → decide → save cycle and prints the resulting snapshot.

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use toposync::apply::{apply_from_root, snapshot_from_root};
use toposync::core::types::{ActionRequest, Snapshot};
use toposync::exit_codes;
use toposync::logging;

#[derive(Parser)]
#[command(
    name = "toposync",
    version,
    about = "Single-topology lifecycle tracker with an append-only action log"
)]
struct Cli {
    /// Working root holding the `.toposync/` data directory.
    #[arg(long, default_value = ".")]
    root: PathBuf,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Apply one action and print the resulting snapshot.
    Apply {
        /// Action name (`add-topology`, `deploy`, `run-test`, `remove-topology`).
        #[arg(long)]
        action: String,
        /// Topology name.
        #[arg(long)]
        topo: String,
        /// Device-under-test identifier.
        #[arg(long)]
        dut: String,
        /// Server identifier.
        #[arg(long)]
        server: String,
        /// Test name recorded with run-test attempts.
        #[arg(long)]
        test_name: Option<String>,
    },
    /// Print the current snapshot without acting.
    Show,
}

fn main() {
    logging::init();
    match run() {
        Ok(code) => std::process::exit(code),
        Err(err) => {
            eprintln!("{:#}", err);
            std::process::exit(exit_codes::ERROR);
        }
    }
}

fn run() -> Result<i32> {
    let cli = Cli::parse();
    match cli.command {
        Command::Apply {
            action,
            topo,
            dut,
            server,
            test_name,
        } => {
            let request = ActionRequest {
                action,
                topo,
                dut,
                server,
                test_name,
            };
            let report = apply_from_root(&cli.root, &request)?;
            print_snapshot(&report.snapshot)?;
            if report.decision.applied() {
                Ok(exit_codes::OK)
            } else {
                Ok(exit_codes::REJECTED)
            }
        }
        Command::Show => {
            let snapshot = snapshot_from_root(&cli.root)?;
            print_snapshot(&snapshot)?;
            Ok(exit_codes::OK)
        }
    }
}

/// Serialize the snapshot to pretty-printed JSON with trailing newline.
fn print_snapshot(snapshot: &Snapshot) -> Result<()> {
    let mut payload = serde_json::to_string_pretty(snapshot)?;
    payload.push('\n');
    print!("{payload}");
    Ok(())
}
