mod error;
mod settings;

#[cfg(test)]
mod tests;

pub use error::{Result, SettingsError};
pub use settings::{EngineSettings, LaunchSettings, ScorerSettings, Settings, Timing};
