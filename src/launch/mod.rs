// Launch module - process supervision core

mod launcher;
mod logfile;
mod output;
pub mod restart;
pub mod spawner;

pub use launcher::{
    LaunchReport, Launcher, LauncherConfig, ProcessOutcome, ProcessReport, ProcessState,
    ShutdownHandle,
};
pub use logfile::LogWriter;
pub use spawner::{spawn_process, SpawnedProcess};
