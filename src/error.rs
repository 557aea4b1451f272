use crate::config::ConfigError;
use crate::port::PortError;
use thiserror::Error;

/// A specialized `Result` type for the command-line tool.
pub type AppResult<T> = Result<T, AppError>;

/// Unified application error type for the `girino-serial` binary.
///
/// Library callers see [`PortError`] and [`ConfigError`] directly; this type
/// only adds the outcomes a command can end with.
#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Port(#[from] PortError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    /// No port was given and none could be discovered.
    #[error("No Girino board found; pass --port or set discovery.default_port")]
    NoDevice,

    /// A fixed-size frame ended early.
    #[error("Incomplete frame: expected {expected} byte(s), received {received}")]
    ShortFrame { expected: usize, received: usize },

    /// The user interrupted the command.
    #[error("Interrupted")]
    Interrupted,

    #[error("Failed to encode output: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Failed to write output: {0}")]
    Output(#[from] std::io::Error),
}

impl AppError {
    /// Process exit code for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Interrupted => 130,
            Self::NoDevice => 2,
            Self::ShortFrame { .. } => 3,
            Self::Port(PortError::BusyOrTimeout { .. }) => 4,
            _ => 1,
        }
    }
}
