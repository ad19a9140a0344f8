use crate::descriptor::{ExitPolicy, LaunchDescriptor, ProcessSpec};
use crate::error::{LaunchError, Result};
use crate::launch::output::attach_sinks;
use crate::launch::restart::RestartTracker;
use crate::launch::spawner::spawn_process;
use nix::sys::signal::{self, Signal};
use nix::unistd::Pid;
use std::path::PathBuf;
use std::time::Duration;
use tokio::process::Child;
use tokio::signal::unix::{signal as unix_signal, SignalKind};
use tokio::sync::watch;
use tokio::task::JoinSet;
use tracing::{debug, error, info, warn};

/// Launcher configuration
#[derive(Debug, Clone)]
pub struct LauncherConfig {
    /// Bounded time allowed for voluntary exit before SIGKILL (in seconds)
    pub grace_period_secs: u64,
    /// Directory for `LogFile` output sinks
    pub log_dir: PathBuf,
}

impl Default for LauncherConfig {
    fn default() -> Self {
        Self {
            grace_period_secs: 10,
            log_dir: PathBuf::from("/tmp/navlaunch_logs"),
        }
    }
}

impl LauncherConfig {
    pub fn grace_period(&self) -> Duration {
        Duration::from_secs(self.grace_period_secs)
    }
}

/// Lifecycle state of one spawned instance
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProcessState {
    Starting,
    Running,
    Exited,
}

impl std::fmt::Display for ProcessState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ProcessState::Starting => write!(f, "starting"),
            ProcessState::Running => write!(f, "running"),
            ProcessState::Exited => write!(f, "exited"),
        }
    }
}

/// Runtime handle for one spawned instance of a spec
struct RunningProcess {
    child: Child,
    pid: u32,
    state: ProcessState,
}

impl RunningProcess {
    fn mark_running(&mut self) {
        self.state = ProcessState::Running;
    }

    fn mark_exited(&mut self) {
        self.state = ProcessState::Exited;
    }
}

/// Terminal disposition of one spec within a launch
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProcessOutcome {
    /// Reached a terminal exit (code is None when killed by a signal)
    Completed { exit_code: Option<i32> },
    /// The executable could not be started; never enters the restart cycle
    SpawnFailed { error: String },
    /// Stopped by a launch-wide shutdown while still supervised
    Shutdown,
}

impl ProcessOutcome {
    /// Whether this outcome counts against the overall exit code.
    pub fn is_failure(&self) -> bool {
        match self {
            ProcessOutcome::Completed { exit_code } => *exit_code != Some(0),
            ProcessOutcome::SpawnFailed { .. } => true,
            ProcessOutcome::Shutdown => false,
        }
    }
}

/// Per-process record in a finished launch
#[derive(Debug, Clone)]
pub struct ProcessReport {
    pub name: String,
    pub outcome: ProcessOutcome,
    pub restarts: usize,
}

/// Result of a whole supervised launch
#[derive(Debug)]
pub struct LaunchReport {
    processes: Vec<ProcessReport>,
    interrupted: bool,
}

impl LaunchReport {
    pub fn processes(&self) -> &[ProcessReport] {
        &self.processes
    }

    pub fn get(&self, name: &str) -> Option<&ProcessReport> {
        self.processes.iter().find(|p| p.name == name)
    }

    pub fn restarts(&self, name: &str) -> Option<usize> {
        self.get(name).map(|p| p.restarts)
    }

    /// Whether the supervisor itself was stopped by an OS signal.
    pub fn interrupted(&self) -> bool {
        self.interrupted
    }

    pub fn success(&self) -> bool {
        !self.interrupted && self.processes.iter().all(|p| !p.outcome.is_failure())
    }

    /// Overall invocation exit code: zero iff supervision completed normally.
    pub fn exit_code(&self) -> i32 {
        if self.success() {
            0
        } else {
            1
        }
    }
}

/// Supervises a read-only `LaunchDescriptor`: spawns every spec as an
/// independent child process, applies its exit policy, and runs until all
/// specs reached a terminal state or a shutdown was requested.
pub struct Launcher {
    config: LauncherConfig,
    shutdown_tx: watch::Sender<bool>,
}

/// Cloneable handle for requesting a launch-wide shutdown.
#[derive(Clone)]
pub struct ShutdownHandle {
    tx: watch::Sender<bool>,
}

impl ShutdownHandle {
    /// Ask the launcher to stop all managed processes. `launch` returns
    /// only once every child has been reaped.
    pub fn shutdown(&self) {
        let _ = self.tx.send(true);
    }
}

impl Launcher {
    pub fn new(config: LauncherConfig) -> Self {
        let (shutdown_tx, _) = watch::channel(false);
        Self {
            config,
            shutdown_tx,
        }
    }

    pub fn with_defaults() -> Self {
        Self::new(LauncherConfig::default())
    }

    pub fn shutdown_handle(&self) -> ShutdownHandle {
        ShutdownHandle {
            tx: self.shutdown_tx.clone(),
        }
    }

    /// Launch every spec in the descriptor and supervise until done.
    ///
    /// One watcher task runs per spec; the caller blocks here until every
    /// spec has reached a terminal, non-restarting state or a shutdown was
    /// requested (via `ShutdownHandle` or SIGINT/SIGTERM). The report's
    /// exit code is non-zero if a non-restartable process failed, a spawn
    /// failed outright, or the run was interrupted by a signal.
    pub async fn launch(&self, descriptor: LaunchDescriptor) -> Result<LaunchReport> {
        descriptor.validate()?;

        info!("launching {} processes", descriptor.len());

        let mut watchers = JoinSet::new();
        for spec in descriptor.specs() {
            watchers.spawn(watch_process(
                spec.clone(),
                self.config.clone(),
                self.shutdown_tx.clone(),
                self.shutdown_tx.subscribe(),
            ));
        }

        let mut sigint = unix_signal(SignalKind::interrupt())
            .map_err(|e| LaunchError::SignalError(e.to_string()))?;
        let mut sigterm = unix_signal(SignalKind::terminate())
            .map_err(|e| LaunchError::SignalError(e.to_string()))?;

        let mut processes = Vec::with_capacity(descriptor.len());
        let mut interrupted = false;

        while !watchers.is_empty() {
            tokio::select! {
                joined = watchers.join_next() => match joined {
                    Some(Ok(report)) => {
                        debug!(process = %report.name, outcome = ?report.outcome, "watcher finished");
                        processes.push(report);
                    }
                    Some(Err(e)) => {
                        error!("watcher task failed: {}", e);
                    }
                    None => break,
                },
                _ = sigint.recv() => {
                    info!("received SIGINT, shutting down all processes");
                    interrupted = true;
                    let _ = self.shutdown_tx.send(true);
                }
                _ = sigterm.recv() => {
                    info!("received SIGTERM, shutting down all processes");
                    interrupted = true;
                    let _ = self.shutdown_tx.send(true);
                }
            }
        }

        let report = LaunchReport {
            processes,
            interrupted,
        };

        info!(
            exit_code = report.exit_code(),
            interrupted = report.interrupted(),
            "launch finished"
        );

        Ok(report)
    }
}

/// Supervise a single spec: spawn, stream output, wait for exit, and apply
/// the exit policy until a terminal state or shutdown.
async fn watch_process(
    spec: ProcessSpec,
    config: LauncherConfig,
    shutdown_tx: watch::Sender<bool>,
    mut shutdown_rx: watch::Receiver<bool>,
) -> ProcessReport {
    let mut tracker = RestartTracker::new();

    loop {
        if *shutdown_rx.borrow() {
            return ProcessReport {
                name: spec.name.clone(),
                outcome: ProcessOutcome::Shutdown,
                restarts: tracker.restart_count(),
            };
        }

        let spawned = match spawn_process(&spec).await {
            Ok(spawned) => spawned,
            Err(e) => {
                // Spawn failure is fatal for the spec and distinct from a
                // post-spawn exit: no restart attempt is consumed.
                error!(process = %spec.name, "{}", e);
                return ProcessReport {
                    name: spec.name.clone(),
                    outcome: ProcessOutcome::SpawnFailed {
                        error: e.to_string(),
                    },
                    restarts: tracker.restart_count(),
                };
            }
        };

        let mut running = RunningProcess {
            child: spawned.child,
            pid: spawned.pid,
            state: ProcessState::Starting,
        };

        if let Err(e) = attach_sinks(&spec, &mut running.child, &config.log_dir).await {
            warn!(process = %spec.name, "failed to attach output sinks: {}", e);
        }

        running.mark_running();
        info!(process = %spec.name, pid = running.pid, state = %running.state, "process started");

        // None means a shutdown request won the race against the child exit
        let waited: Option<Option<i32>> = tokio::select! {
            status = running.child.wait() => Some(status.ok().and_then(|s| s.code())),
            _ = shutdown_rx.wait_for(|v| *v) => None,
        };

        let Some(exit_code) = waited else {
            stop_child(&spec, &mut running, config.grace_period()).await;
            return ProcessReport {
                name: spec.name.clone(),
                outcome: ProcessOutcome::Shutdown,
                restarts: tracker.restart_count(),
            };
        };

        running.mark_exited();

        match spec.exit_policy {
            ExitPolicy::NoRestart => {
                let failed = exit_code != Some(0);

                if failed && spec.critical {
                    error!(
                        process = %spec.name,
                        "critical process exited with {}, shutting down launch",
                        describe_exit(exit_code)
                    );
                    let _ = shutdown_tx.send(true);
                } else if failed {
                    warn!(
                        process = %spec.name,
                        "process exited with {}",
                        describe_exit(exit_code)
                    );
                } else {
                    info!(process = %spec.name, "process exited cleanly");
                }

                return ProcessReport {
                    name: spec.name.clone(),
                    outcome: ProcessOutcome::Completed { exit_code },
                    restarts: tracker.restart_count(),
                };
            }
            ExitPolicy::RestartOnExit => {
                if !spec.restart.should_restart(&tracker) {
                    warn!(
                        process = %spec.name,
                        restarts = tracker.restart_count(),
                        "restart limit reached, giving up"
                    );
                    return ProcessReport {
                        name: spec.name.clone(),
                        outcome: ProcessOutcome::Completed { exit_code },
                        restarts: tracker.restart_count(),
                    };
                }

                let delay = spec.restart.calculate_delay(&tracker);
                tracker.record_restart();
                info!(
                    process = %spec.name,
                    restarts = tracker.restart_count(),
                    "process exited with {}, restarting",
                    describe_exit(exit_code)
                );

                if !delay.is_zero() {
                    tokio::select! {
                        _ = tokio::time::sleep(delay) => {}
                        _ = shutdown_rx.wait_for(|v| *v) => {
                            return ProcessReport {
                                name: spec.name.clone(),
                                outcome: ProcessOutcome::Shutdown,
                                restarts: tracker.restart_count(),
                            };
                        }
                    }
                }
            }
        }
    }
}

/// Gracefully stop one child: send the spec's stop signal, wait out the
/// grace period, then escalate to SIGKILL. Always reaps the child.
async fn stop_child(spec: &ProcessSpec, running: &mut RunningProcess, grace: Duration) {
    let nix_pid = Pid::from_raw(running.pid as i32);
    let stop_signal = parse_signal(&spec.stop_signal).unwrap_or(Signal::SIGTERM);

    info!(
        process = %spec.name,
        pid = running.pid,
        "stopping process with {}",
        spec.stop_signal
    );

    if let Err(e) = signal::kill(nix_pid, stop_signal) {
        // Process may already be gone
        debug!(process = %spec.name, "failed to send {}: {}", spec.stop_signal, e);
    }

    match tokio::time::timeout(grace, running.child.wait()).await {
        Ok(Ok(status)) => {
            info!(process = %spec.name, "process exited gracefully with {:?}", status);
        }
        Ok(Err(e)) => {
            warn!(process = %spec.name, "wait failed while stopping: {}", e);
        }
        Err(_) => {
            warn!(
                "{}, sending SIGKILL",
                LaunchError::ShutdownTimeout(spec.name.clone())
            );
            if let Err(e) = signal::kill(nix_pid, Signal::SIGKILL) {
                warn!(process = %spec.name, "failed to send SIGKILL: {}", e);
            }
            let _ = running.child.wait().await;
        }
    }

    running.mark_exited();
}

fn parse_signal(signal_name: &str) -> Result<Signal> {
    match signal_name {
        "SIGTERM" => Ok(Signal::SIGTERM),
        "SIGINT" => Ok(Signal::SIGINT),
        "SIGQUIT" => Ok(Signal::SIGQUIT),
        "SIGKILL" => Ok(Signal::SIGKILL),
        "SIGHUP" => Ok(Signal::SIGHUP),
        _ => Err(LaunchError::SignalError(format!(
            "Invalid signal name: {}",
            signal_name
        ))),
    }
}

fn describe_exit(exit_code: Option<i32>) -> String {
    match exit_code {
        Some(code) => format!("code {}", code),
        None => "signal".to_string(),
    }
}
