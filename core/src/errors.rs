use thiserror::Error;

/// Errors raised inside the eight ball core
#[derive(Error, Debug)]
pub enum EightBallError {
    #[error("Answer Source Error: {0}")]
    AnswerSource(String),

    #[error("Question {question_number} timed out after {after_ms} ms")]
    Timeout { question_number: u32, after_ms: u64 },

    #[error("Task Error: {0}")]
    TaskFailed(String),

    #[error("Configuration Error: {0}")]
    ConfigError(String),

    #[error(transparent)]
    IoError(#[from] std::io::Error),

    #[error(transparent)]
    TomlError(#[from] toml::de::Error),
}

/// Result type for eight ball operations
pub type EightBallResult<T> = Result<T, EightBallError>;
