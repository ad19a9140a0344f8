use crate::error::{LaunchError, Result};
use chrono::Local;
use std::fs::OpenOptions;
use std::path::{Path, PathBuf};
use tokio::fs::File as TokioFile;
use tokio::io::AsyncWriteExt;

/// Default maximum log file size before rotation (10MB)
const DEFAULT_MAX_LOG_SIZE: u64 = 10 * 1024 * 1024;

/// Writes one managed process's stdout and stderr to per-process log files,
/// one timestamped line per entry, rotating on size.
pub struct LogWriter {
    stdout_path: PathBuf,
    stderr_path: PathBuf,
    stdout_file: TokioFile,
    stderr_file: TokioFile,
    max_size: u64,
    stdout_size: u64,
    stderr_size: u64,
}

impl LogWriter {
    /// Create a log writer for a process, creating the log directory if needed.
    pub async fn new(log_dir: &Path, process_name: &str) -> Result<Self> {
        Self::with_max_size(log_dir, process_name, DEFAULT_MAX_LOG_SIZE).await
    }

    pub async fn with_max_size(log_dir: &Path, process_name: &str, max_size: u64) -> Result<Self> {
        tokio::fs::create_dir_all(log_dir)
            .await
            .map_err(|e| LaunchError::LogError(format!("Failed to create log directory: {}", e)))?;

        let stdout_path = log_dir.join(format!("{}-out.log", process_name));
        let stderr_path = log_dir.join(format!("{}-err.log", process_name));

        let stdout_file = open_append(&stdout_path)?;
        let stderr_file = open_append(&stderr_path)?;

        let stdout_size = stdout_file.metadata().map(|m| m.len()).unwrap_or(0);
        let stderr_size = stderr_file.metadata().map(|m| m.len()).unwrap_or(0);

        Ok(Self {
            stdout_path,
            stderr_path,
            stdout_file: TokioFile::from_std(stdout_file),
            stderr_file: TokioFile::from_std(stderr_file),
            max_size,
            stdout_size,
            stderr_size,
        })
    }

    /// Append a line to the stdout log with a timestamp.
    pub async fn write_stdout(&mut self, line: &str) -> Result<()> {
        if self.stdout_size >= self.max_size {
            let path = self.stdout_path.clone();
            rotate_log(&path).await?;
            self.stdout_file = TokioFile::from_std(open_append(&path)?);
            self.stdout_size = 0;
        }

        let entry = format_log_entry(line);
        self.stdout_file
            .write_all(entry.as_bytes())
            .await
            .map_err(|e| LaunchError::LogError(format!("Failed to write to log: {}", e)))?;
        self.stdout_file
            .flush()
            .await
            .map_err(|e| LaunchError::LogError(format!("Failed to flush log: {}", e)))?;
        self.stdout_size += entry.len() as u64;

        Ok(())
    }

    /// Append a line to the stderr log with a timestamp.
    pub async fn write_stderr(&mut self, line: &str) -> Result<()> {
        if self.stderr_size >= self.max_size {
            let path = self.stderr_path.clone();
            rotate_log(&path).await?;
            self.stderr_file = TokioFile::from_std(open_append(&path)?);
            self.stderr_size = 0;
        }

        let entry = format_log_entry(line);
        self.stderr_file
            .write_all(entry.as_bytes())
            .await
            .map_err(|e| LaunchError::LogError(format!("Failed to write to log: {}", e)))?;
        self.stderr_file
            .flush()
            .await
            .map_err(|e| LaunchError::LogError(format!("Failed to flush log: {}", e)))?;
        self.stderr_size += entry.len() as u64;

        Ok(())
    }

    pub fn stdout_path(&self) -> &Path {
        &self.stdout_path
    }

    pub fn stderr_path(&self) -> &Path {
        &self.stderr_path
    }
}

fn open_append(path: &Path) -> Result<std::fs::File> {
    OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(|e| LaunchError::LogError(format!("Failed to open log file: {}", e)))
}

/// Format: [YYYY-MM-DD HH:MM:SS.mmm] <line>\n
fn format_log_entry(line: &str) -> String {
    let timestamp = Local::now().format("%Y-%m-%d %H:%M:%S%.3f");
    format!("[{}] {}\n", timestamp, line)
}

/// Rotate a log file by renaming it with a timestamp suffix.
async fn rotate_log(file_path: &Path) -> Result<()> {
    let timestamp = Local::now().format("%Y%m%d-%H%M%S").to_string();
    let parent = file_path
        .parent()
        .ok_or_else(|| LaunchError::LogRotationError("Invalid log file path".to_string()))?;
    let file_stem = file_path
        .file_stem()
        .and_then(|s| s.to_str())
        .ok_or_else(|| LaunchError::LogRotationError("Invalid log file name".to_string()))?;

    let rotated_path = parent.join(format!("{}-{}.log", file_stem, timestamp));

    tokio::fs::rename(file_path, &rotated_path)
        .await
        .map_err(|e| LaunchError::LogRotationError(format!("Failed to rotate log: {}", e)))?;

    Ok(())
}
