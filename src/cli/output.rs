// Output formatting for the launch summary

use crate::launch::{LaunchReport, ProcessOutcome};
use colored::*;

/// Print a per-process summary once supervision has finished.
pub fn print_report(report: &LaunchReport) {
    for process in report.processes() {
        match &process.outcome {
            ProcessOutcome::Completed { exit_code: Some(0) } => {
                println!("{} {} exited cleanly", "✓".green().bold(), process.name.cyan());
            }
            ProcessOutcome::Completed { exit_code } => {
                let code = exit_code
                    .map(|c| format!("code {}", c))
                    .unwrap_or_else(|| "a signal".to_string());
                println!(
                    "{} {} exited with {}",
                    "✗".red().bold(),
                    process.name.cyan(),
                    code
                );
            }
            ProcessOutcome::SpawnFailed { error } => {
                println!(
                    "{} {} failed to spawn: {}",
                    "✗".red().bold(),
                    process.name.cyan(),
                    error
                );
            }
            ProcessOutcome::Shutdown => {
                println!(
                    "{} {} stopped ({} restarts)",
                    "✓".green().bold(),
                    process.name.cyan(),
                    process.restarts
                );
            }
        }
    }

    if report.interrupted() {
        println!("{}", "✗ Launch interrupted".red().bold());
    } else if report.success() {
        println!("{}", "✓ Launch completed".green().bold());
    } else {
        println!("{}", "✗ Launch finished with failures".red().bold());
    }
}

/// Print an error message to stderr
pub fn print_error(error: &str) {
    eprintln!("{} {}", "✗ Error:".red().bold(), error);
}
