use thiserror::Error;

/// Main error type for the navlaunch supervisor
#[derive(Debug, Error)]
pub enum LaunchError {
    // Descriptor validation errors
    #[error("Duplicate process name in descriptor: {0}")]
    DuplicateName(String),

    #[error("Process '{0}' has an empty command")]
    EmptyCommand(String),

    #[error("Missing required descriptor field: {0}")]
    MissingField(String),

    #[error("Invalid descriptor file: {0}")]
    InvalidDescriptor(String),

    #[error("Failed to read descriptor file: {0}")]
    DescriptorFile(String),

    // Process lifecycle errors
    #[error("Failed to spawn process '{0}': {1}")]
    SpawnFailure(String, String),

    #[error("Process '{0}' did not exit within the grace period")]
    ShutdownTimeout(String),

    #[error("Signal error: {0}")]
    SignalError(String),

    // Executable resolution errors
    #[error("Executable '{executable}' not found in package '{package}'")]
    ExecutableNotFound { package: String, executable: String },

    #[error("Share directory not found for package '{0}'")]
    ShareDirectoryNotFound(String),

    // Log capture errors
    #[error("Log error: {0}")]
    LogError(String),

    #[error("Log rotation failed: {0}")]
    LogRotationError(String),

    // Fallback for raw IO failures
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for navlaunch operations
pub type Result<T> = std::result::Result<T, LaunchError>;
