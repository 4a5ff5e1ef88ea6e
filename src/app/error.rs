use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid color {0:?}")]
    InvalidColor(String),

    #[error("index {0} out of range")]
    IndexOutOfRange(usize),

    #[error("script error: {0}")]
    Script(String),
}

/// Convenience type alias for Results with AppError
pub type Result<T> = std::result::Result<T, AppError>;
