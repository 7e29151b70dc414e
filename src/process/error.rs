use thiserror::Error;

use super::ExitOutcome;

pub type Result<T> = std::result::Result<T, ProcessError>;

#[derive(Debug, Error)]
pub enum ProcessError {
    #[error("failed to start `{command}`: {source}")]
    Spawn {
        command: String,
        source: std::io::Error,
    },

    #[error("failed while waiting for `{command}`: {source}")]
    Wait {
        command: String,
        source: std::io::Error,
    },

    #[error("external command `{command}` failed with {outcome}")]
    Failed {
        command: String,
        outcome: ExitOutcome,
    },

    #[error("external command `{command}` wrote non UTF-8 output")]
    NonUtf8Output { command: String },
}
