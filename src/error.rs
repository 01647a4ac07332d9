use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

#[allow(dead_code)]
#[derive(Error, Debug)]
pub enum FitplanError {
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),

    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("Generation error: {0}")]
    Generation(#[from] GenerationError),

    #[error("Runner error: {0}")]
    Runner(#[from] RunnerError),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("Tracker error: {0}")]
    Tracker(#[from] TrackerError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file '{path}': {source}")]
    ReadFile {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse config: {0}")]
    Parse(#[from] serde_yaml::Error),

    #[error("Invalid config value for '{field}': {reason}")]
    InvalidValue { field: &'static str, reason: String },
}

#[derive(Error, Debug)]
pub enum ValidationError {
    #[error("user id must be 1-64 characters of [A-Za-z0-9_-], got '{0}'")]
    InvalidUserId(String),

    #[error("{field} must be between {min} and {max}, got {value}")]
    OutOfRange {
        field: &'static str,
        value: i64,
        min: i64,
        max: i64,
    },

    #[error("equipment list must not be empty")]
    NoEquipment,

    #[error("unknown {field}: '{value}'")]
    UnknownVariant { field: &'static str, value: String },
}

#[derive(Error, Debug)]
pub enum GenerationError {
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Upstream request failed: {0}")]
    Upstream(#[from] reqwest::Error),

    #[error("Upstream request timed out after {0:?}")]
    Timeout(Duration),

    #[error("Upstream service error ({status}): {message}")]
    Api { status: u16, message: String },

    #[error("Could not parse a workout plan from the model response: {reason}")]
    Parse { reason: String, raw: String },

    #[error("Generated plan violates profile constraints: {0}")]
    Constraint(String),
}

impl GenerationError {
    /// Whether the caller should retry this failure with backoff.
    /// Credential, parse, and constraint failures never are.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Upstream(_) | Self::Timeout(_) => true,
            Self::Api { status, .. } => *status == 429 || *status >= 500,
            Self::Configuration(_) | Self::Parse { .. } | Self::Constraint(_) => false,
        }
    }
}

#[derive(Error, Debug)]
pub enum RunnerError {
    #[error("A generation for user '{0}' is already in flight")]
    Busy(String),

    #[error("No previous plan exists for user '{0}'; generate one first")]
    NoPreviousPlan(String),

    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("Generation error: {0}")]
    Generation(#[from] GenerationError),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),
}

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("No profile stored for user '{0}'")]
    UserNotFound(String),

    #[error("No plan stored for user '{0}'")]
    PlanNotFound(String),

    #[error("No progress stored for user '{0}'")]
    ProgressNotFound(String),

    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("Failed to serialize record: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Error, Debug)]
pub enum TrackerError {
    #[error("Day '{0}' not found in current plan")]
    DayNotFound(String),

    #[error("Exercise index {index} out of range for day '{day}' ({len} exercises)")]
    ExerciseNotFound {
        day: String,
        index: usize,
        len: usize,
    },
}
