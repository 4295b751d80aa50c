use thiserror::Error;

pub type ManateeResult<T> = Result<T, ManateeError>;

#[derive(Debug, Error)]
pub enum ManateeError {
    #[error("invalid viewport size: width={width}, height={height}")]
    InvalidViewport { width: u32, height: u32 },

    #[error("invalid data: {0}")]
    InvalidData(String),

    #[error("invalid bins: {0}")]
    InvalidBins(String),

    #[error("incompatible bins: {left} edges vs {right} edges do not match pointwise")]
    IncompatibleBins { left: usize, right: usize },

    #[error("no activity found with name `{0}`")]
    UnknownActivity(String),

    #[error("activity `{name}` already exists")]
    DuplicateActivity { name: String },

    #[error("activity `{name}` is a {actual} activity, not a {expected} activity")]
    ActivityKindMismatch {
        name: String,
        expected: &'static str,
        actual: &'static str,
    },

    #[error("snapshot error: {0}")]
    Snapshot(#[from] serde_json::Error),
}
