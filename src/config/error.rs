use thiserror::Error;

pub type Result<T> = std::result::Result<T, SettingsError>;

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("settings I/O failure: {0}")]
    Io(#[from] std::io::Error),

    #[error("settings JSON parse failure: {0}")]
    SerdeJson(#[from] serde_json::Error),

    #[error("settings YAML parse failure: {0}")]
    SerdeYaml(#[from] serde_yaml::Error),

    #[error("invalid settings: {0}")]
    Invalid(String),
}
