use std::path::PathBuf;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, ModelError>;

#[derive(Debug, Error)]
pub enum ModelError {
    #[error("odometry cannot be read from transforms and from a topic at the same time")]
    ConflictingPoseSources,

    #[error("at least one {0} log is required")]
    NoLogs(&'static str),

    #[error("invalid test name `{0}`: must be non-empty and must not contain path separators")]
    InvalidTestName(String),

    #[error("ground-truth topic must not be empty")]
    EmptyTopic,

    #[error("cannot make `{path}` absolute: {source}")]
    Path {
        path: PathBuf,
        source: std::io::Error,
    },
}
