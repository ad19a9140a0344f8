use crate::error::{LaunchError, Result};
use crate::launch::restart::RestartSettings;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Exit-handling policy for a managed process.
///
/// The policy set is small and closed: a process either stays down once it
/// exits, or is relaunched with the identical command every time it exits,
/// regardless of exit code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ExitPolicy {
    #[default]
    NoRestart,
    RestartOnExit,
}

impl std::fmt::Display for ExitPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ExitPolicy::NoRestart => write!(f, "no_restart"),
            ExitPolicy::RestartOnExit => write!(f, "restart_on_exit"),
        }
    }
}

/// Destination for a managed process's captured stdout/stderr.
///
/// An empty sink set means the output is discarded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutputSink {
    /// Relay the child's stdout/stderr to the supervisor's own streams,
    /// line-buffered and prefixed with the process name.
    Console,
    /// Write timestamped lines to per-process log files with rotation.
    LogFile,
}

/// Static description of one process to supervise.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProcessSpec {
    /// Process name (unique within a descriptor)
    pub name: String,

    /// Executable path plus arguments; immutable once launched
    pub command: Vec<String>,

    /// Whether the process is relaunched when it exits
    #[serde(default)]
    pub exit_policy: ExitPolicy,

    /// Output sinks for the process's stdout/stderr
    #[serde(default)]
    pub output: Vec<OutputSink>,

    /// Whether a non-zero exit of a non-restartable process should
    /// shut down the whole launch rather than just be recorded
    #[serde(default)]
    pub critical: bool,

    /// Restart pacing; the default restarts forever with no delay
    #[serde(default)]
    pub restart: RestartSettings,

    /// Signal to send on stop (default: SIGTERM)
    #[serde(default = "default_stop_signal")]
    pub stop_signal: String,
}

fn default_stop_signal() -> String {
    "SIGTERM".to_string()
}

impl ProcessSpec {
    /// Create a spec with default policy (no restart, discarded output).
    pub fn new(name: impl Into<String>, command: Vec<String>) -> Self {
        Self {
            name: name.into(),
            command,
            exit_policy: ExitPolicy::default(),
            output: Vec::new(),
            critical: false,
            restart: RestartSettings::default(),
            stop_signal: default_stop_signal(),
        }
    }

    pub fn with_exit_policy(mut self, policy: ExitPolicy) -> Self {
        self.exit_policy = policy;
        self
    }

    pub fn with_output(mut self, sink: OutputSink) -> Self {
        self.output.push(sink);
        self
    }

    pub fn with_critical(mut self, critical: bool) -> Self {
        self.critical = critical;
        self
    }

    pub fn with_restart(mut self, settings: RestartSettings) -> Self {
        self.restart = settings;
        self
    }

    /// Validate a single spec in isolation.
    pub fn validate(&self) -> Result<()> {
        if self.name.is_empty() {
            return Err(LaunchError::MissingField("name".to_string()));
        }

        if self.command.is_empty() || self.command[0].is_empty() {
            return Err(LaunchError::EmptyCommand(self.name.clone()));
        }

        let valid_signals = ["SIGTERM", "SIGINT", "SIGQUIT", "SIGKILL", "SIGHUP"];
        if !valid_signals.contains(&self.stop_signal.as_str()) {
            return Err(LaunchError::InvalidDescriptor(format!(
                "Invalid stop_signal for '{}': {}. Must be one of: {}",
                self.name,
                self.stop_signal,
                valid_signals.join(", ")
            )));
        }

        Ok(())
    }
}

/// Ordered collection of process specs, built incrementally before launch
/// and treated as read-only once handed to the launcher.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LaunchDescriptor {
    #[serde(default)]
    processes: Vec<ProcessSpec>,
}

impl LaunchDescriptor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a process spec, rejecting duplicate names up front.
    pub fn add_process(&mut self, spec: ProcessSpec) -> Result<()> {
        spec.validate()?;

        if self.processes.iter().any(|p| p.name == spec.name) {
            return Err(LaunchError::DuplicateName(spec.name));
        }

        self.processes.push(spec);
        Ok(())
    }

    pub fn specs(&self) -> &[ProcessSpec] {
        &self.processes
    }

    pub fn len(&self) -> usize {
        self.processes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.processes.is_empty()
    }

    /// Validate the whole descriptor (spec invariants plus name uniqueness).
    ///
    /// `add_process` already enforces this for descriptors built in code;
    /// descriptors loaded from files go through here.
    pub fn validate(&self) -> Result<()> {
        for (i, spec) in self.processes.iter().enumerate() {
            spec.validate()?;

            if self.processes[..i].iter().any(|p| p.name == spec.name) {
                return Err(LaunchError::DuplicateName(spec.name.clone()));
            }
        }

        Ok(())
    }

    /// Load a descriptor from a file (supports TOML and JSON).
    pub fn from_file(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| LaunchError::DescriptorFile(format!("{}: {}", path.display(), e)))?;

        let extension = path.extension().and_then(|s| s.to_str()).unwrap_or("");

        let descriptor: LaunchDescriptor = match extension {
            "toml" => toml::from_str(&contents)
                .map_err(|e| LaunchError::InvalidDescriptor(format!("Failed to parse TOML: {}", e)))?,
            "json" => serde_json::from_str(&contents)
                .map_err(|e| LaunchError::InvalidDescriptor(format!("Failed to parse JSON: {}", e)))?,
            _ => {
                return Err(LaunchError::InvalidDescriptor(format!(
                    "Unsupported file format: {}. Use .toml or .json",
                    extension
                )))
            }
        };

        if descriptor.is_empty() {
            return Err(LaunchError::InvalidDescriptor(
                "No process entries found in file".to_string(),
            ));
        }

        descriptor.validate()?;

        Ok(descriptor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spec(name: &str) -> ProcessSpec {
        ProcessSpec::new(name, vec!["/bin/echo".to_string(), "hi".to_string()])
    }

    #[test]
    fn test_add_process() {
        let mut ld = LaunchDescriptor::new();
        ld.add_process(spec("a")).unwrap();
        ld.add_process(spec("b")).unwrap();
        assert_eq!(ld.len(), 2);
        assert_eq!(ld.specs()[0].name, "a");
    }

    #[test]
    fn test_duplicate_name_rejected() {
        let mut ld = LaunchDescriptor::new();
        ld.add_process(spec("a")).unwrap();
        let err = ld.add_process(spec("a")).unwrap_err();
        assert!(matches!(err, LaunchError::DuplicateName(name) if name == "a"));
    }

    #[test]
    fn test_empty_command_rejected() {
        let mut ld = LaunchDescriptor::new();
        let err = ld.add_process(ProcessSpec::new("a", vec![])).unwrap_err();
        assert!(matches!(err, LaunchError::EmptyCommand(_)));
    }

    #[test]
    fn test_empty_name_rejected() {
        let mut ld = LaunchDescriptor::new();
        let err = ld
            .add_process(ProcessSpec::new("", vec!["/bin/true".to_string()]))
            .unwrap_err();
        assert!(matches!(err, LaunchError::MissingField(_)));
    }

    #[test]
    fn test_invalid_stop_signal_rejected() {
        let mut s = spec("a");
        s.stop_signal = "SIGFOO".to_string();
        assert!(matches!(
            s.validate(),
            Err(LaunchError::InvalidDescriptor(_))
        ));
    }

    #[test]
    fn test_spec_defaults() {
        let s = spec("a");
        assert_eq!(s.exit_policy, ExitPolicy::NoRestart);
        assert!(s.output.is_empty());
        assert!(!s.critical);
        assert_eq!(s.stop_signal, "SIGTERM");
    }

    #[test]
    fn test_builder_style() {
        let s = spec("a")
            .with_exit_policy(ExitPolicy::RestartOnExit)
            .with_output(OutputSink::Console)
            .with_critical(true);
        assert_eq!(s.exit_policy, ExitPolicy::RestartOnExit);
        assert_eq!(s.output, vec![OutputSink::Console]);
        assert!(s.critical);
    }

    #[test]
    fn test_parse_toml() {
        let toml_content = r#"
            [[processes]]
            name = "bridge"
            command = ["/opt/ros/lib/ros1_bridge/dynamic_bridge"]
            exit_policy = "restart_on_exit"
            output = ["console"]

            [[processes]]
            name = "map_server"
            command = ["/opt/ros/lib/map_server/map_server", "/maps/playground.yaml"]
        "#;

        let ld: LaunchDescriptor = toml::from_str(toml_content).unwrap();
        ld.validate().unwrap();
        assert_eq!(ld.len(), 2);
        assert_eq!(ld.specs()[0].exit_policy, ExitPolicy::RestartOnExit);
        assert_eq!(ld.specs()[0].output, vec![OutputSink::Console]);
        assert_eq!(ld.specs()[1].exit_policy, ExitPolicy::NoRestart);
    }

    #[test]
    fn test_validate_catches_file_duplicates() {
        let toml_content = r#"
            [[processes]]
            name = "a"
            command = ["/bin/true"]

            [[processes]]
            name = "a"
            command = ["/bin/false"]
        "#;

        let ld: LaunchDescriptor = toml::from_str(toml_content).unwrap();
        assert!(matches!(ld.validate(), Err(LaunchError::DuplicateName(_))));
    }
}
