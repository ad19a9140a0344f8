use crate::descriptor::ProcessSpec;
use crate::error::{LaunchError, Result};
use std::process::Stdio;
use tokio::process::{Child, Command};

/// Metadata returned when spawning a process
#[derive(Debug)]
pub struct SpawnedProcess {
    /// The child process handle
    pub child: Child,

    /// Process ID assigned by the OS
    pub pid: u32,

    /// Process name from the spec
    pub name: String,
}

/// Spawn a child process from a spec's command vector.
///
/// The first element of `command` is the executable path; the remainder are
/// passed through as opaque arguments. Stdout/stderr are piped when the spec
/// has any output sinks, and dropped otherwise.
///
/// A spawn failure here (missing executable, exec error) is fatal for the
/// spec: it is distinct from a post-spawn exit and never enters the restart
/// cycle.
pub async fn spawn_process(spec: &ProcessSpec) -> Result<SpawnedProcess> {
    let executable = spec
        .command
        .first()
        .ok_or_else(|| LaunchError::EmptyCommand(spec.name.clone()))?;

    let mut command = Command::new(executable);

    if spec.command.len() > 1 {
        command.args(&spec.command[1..]);
    }

    if spec.output.is_empty() {
        command.stdout(Stdio::null());
        command.stderr(Stdio::null());
    } else {
        command.stdout(Stdio::piped());
        command.stderr(Stdio::piped());
    }

    let child = command
        .spawn()
        .map_err(|e| LaunchError::SpawnFailure(spec.name.clone(), e.to_string()))?;

    let pid = child.id().ok_or_else(|| {
        LaunchError::SpawnFailure(spec.name.clone(), "no PID assigned".to_string())
    })?;

    Ok(SpawnedProcess {
        child,
        pid,
        name: spec.name.clone(),
    })
}
