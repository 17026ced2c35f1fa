// error.rs - Error types
//
// The field is cosmetic: errors never reach the page, they either reject a
// configuration up front or stop the frame loop.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum FieldError {
    /// A configuration value is out of its usable range
    #[error("invalid config: {0}")]
    InvalidConfig(String),

    /// Configuration JSON could not be parsed
    #[error("config parse error: {0}")]
    Json(#[from] serde_json::Error),

    /// Integration produced a non-finite particle state
    #[error("particle {index} diverged")]
    Diverged { index: usize },
}

pub type Result<T> = std::result::Result<T, FieldError>;
