// CLI module - command-line surface for the launch binary

pub mod output;

use clap::{Parser, ValueEnum};
use std::path::PathBuf;

/// navlaunch - supervised launch of the turtlebot navigation bringup
#[derive(Parser, Debug)]
#[command(name = "navlaunch")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Path to map (will be passed to map_server)
    #[arg(long)]
    pub map: Option<PathBuf>,

    /// Launch a descriptor file (.toml or .json) instead of the built-in bringup
    #[arg(long, value_name = "FILE")]
    pub file: Option<PathBuf>,

    /// Seconds to wait for voluntary exit before escalating to SIGKILL
    #[arg(long, default_value_t = 10)]
    pub grace_period: u64,

    /// Directory for log_file output sinks
    #[arg(long, default_value = "/tmp/navlaunch_logs")]
    pub log_dir: PathBuf,

    /// Log level (overrides NAVLAUNCH_LOG)
    #[arg(long, value_enum)]
    pub log_level: Option<LogLevel>,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Error => "error",
            LogLevel::Warn => "warn",
            LogLevel::Info => "info",
            LogLevel::Debug => "debug",
            LogLevel::Trace => "trace",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let cli = Cli::parse_from(["navlaunch"]);
        assert!(cli.map.is_none());
        assert!(cli.file.is_none());
        assert_eq!(cli.grace_period, 10);
    }

    #[test]
    fn test_map_flag() {
        let cli = Cli::parse_from(["navlaunch", "--map", "/maps/office.yaml"]);
        assert_eq!(cli.map, Some(PathBuf::from("/maps/office.yaml")));
    }

    #[test]
    fn test_descriptor_file_flag() {
        let cli = Cli::parse_from(["navlaunch", "--file", "custom.toml", "--grace-period", "3"]);
        assert_eq!(cli.file, Some(PathBuf::from("custom.toml")));
        assert_eq!(cli.grace_period, 3);
    }
}
