use crate::config::SettingsError;
use crate::launch::ConfigError;
use crate::model::ModelError;
use crate::workflow::PipelineError;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, AppError>;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("settings error: {0}")]
    Settings(#[from] SettingsError),

    #[error("invalid evaluation run: {0}")]
    Model(#[from] ModelError),

    #[error("launch configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("pipeline error: {0}")]
    Pipeline(#[from] PipelineError),
}
