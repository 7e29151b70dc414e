use std::time::Duration;

use crate::launch::ConfigError;
use crate::model::NodeMode;
use crate::process::ProcessError;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, StageError>;

#[derive(Debug, Error)]
pub enum StageError {
    #[error("mapping node mode `{0}` is not supported: its launch file is out of date")]
    UnsupportedMode(NodeMode),

    #[error("timed out after {waited:?} waiting for {what}")]
    Timeout { what: String, waited: Duration },

    #[error("unexpected output from `{command}`: {detail}")]
    UnexpectedOutput { command: String, detail: String },

    #[error("launch configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("external process error: {0}")]
    Process(#[from] ProcessError),
}
