use crate::launch::ConfigError;
use crate::model::ModelError;
use crate::stages::StageError;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, PipelineError>;

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("invalid evaluation run: {0}")]
    Model(#[from] ModelError),

    #[error("launch package lookup failed: {0}")]
    Config(#[from] ConfigError),

    #[error("stage failed: {0}")]
    Stage(#[from] StageError),

    #[error("pipeline I/O failure: {0}")]
    Io(#[from] std::io::Error),

    #[error("report serialization failure: {0}")]
    SerdeJson(#[from] serde_json::Error),

    #[error("report YAML serialization failure: {0}")]
    SerdeYaml(#[from] serde_yaml::Error),
}
