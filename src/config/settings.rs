use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::{Result, SettingsError};

/// Tooling and timing knobs that are not part of a single evaluation run.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub launch: LaunchSettings,
    pub engine: EngineSettings,
    pub scorer: ScorerSettings,
    pub timing: Timing,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LaunchSettings {
    /// ROS package holding the launch description and the per-robot configs.
    pub package: String,
    /// Launch file name inside `<package>/launch`.
    pub file: String,
    /// Package directory. Looked up with `rospack find` when unset.
    pub package_root: Option<PathBuf>,
}

impl Default for LaunchSettings {
    fn default() -> Self {
        Self {
            package: "cartographer_example".to_string(),
            file: "cartographer.launch".to_string(),
            package_root: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineSettings {
    pub service_namespace: String,
    pub trajectory_id: u32,
}

impl EngineSettings {
    /// Fully qualified name of one of the engine's services.
    pub fn service(&self, name: &str) -> String {
        self.qualified(name)
    }

    /// Fully qualified name of a topic the engine publishes.
    pub fn topic(&self, name: &str) -> String {
        self.qualified(name)
    }

    fn qualified(&self, name: &str) -> String {
        format!("{}/{name}", self.service_namespace.trim_end_matches('/'))
    }
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            service_namespace: "/cartographer".to_string(),
            trajectory_id: 0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScorerSettings {
    pub interpreter: String,
    pub script: PathBuf,
}

impl Default for ScorerSettings {
    fn default() -> Self {
        Self {
            interpreter: "python3".to_string(),
            script: PathBuf::from("evaluate_poses.py"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Timing {
    pub service_settle_ms: u64,
    pub step_settle_ms: u64,
    pub poll_interval_ms: u64,
    pub service_timeout_ms: Option<u64>,
    pub completion_timeout_ms: Option<u64>,
}

impl Default for Timing {
    fn default() -> Self {
        Self {
            service_settle_ms: 3_000,
            step_settle_ms: 1_000,
            poll_interval_ms: 200,
            service_timeout_ms: Some(300_000),
            completion_timeout_ms: Some(3_600_000),
        }
    }
}

impl Timing {
    /// No settle delays and no poll interval. Deadlines are kept.
    pub fn immediate() -> Self {
        Self {
            service_settle_ms: 0,
            step_settle_ms: 0,
            poll_interval_ms: 0,
            ..Self::default()
        }
    }

    pub fn service_settle(&self) -> Duration {
        Duration::from_millis(self.service_settle_ms)
    }

    pub fn step_settle(&self) -> Duration {
        Duration::from_millis(self.step_settle_ms)
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    pub fn service_timeout(&self) -> Option<Duration> {
        self.service_timeout_ms.map(Duration::from_millis)
    }

    pub fn completion_timeout(&self) -> Option<Duration> {
        self.completion_timeout_ms.map(Duration::from_millis)
    }
}

impl Settings {
    /// Loads settings from a YAML (`.yaml`/`.yml`) or JSON file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = fs::read_to_string(path)?;
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .unwrap_or_default()
            .to_ascii_lowercase();
        let settings = if matches!(extension.as_str(), "yaml" | "yml") {
            serde_yaml::from_str::<Settings>(&raw)?
        } else {
            serde_json::from_str::<Settings>(&raw)?
        };
        settings.validate()?;
        Ok(settings)
    }

    pub fn validate(&self) -> Result<()> {
        if self.launch.package.trim().is_empty() {
            return Err(SettingsError::Invalid(
                "launch package name must not be empty".to_string(),
            ));
        }
        if self.launch.file.trim().is_empty() {
            return Err(SettingsError::Invalid(
                "launch file name must not be empty".to_string(),
            ));
        }
        if !self.engine.service_namespace.starts_with('/') {
            return Err(SettingsError::Invalid(format!(
                "service namespace `{}` must be absolute",
                self.engine.service_namespace
            )));
        }
        if self.scorer.interpreter.trim().is_empty() {
            return Err(SettingsError::Invalid(
                "scorer interpreter must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}
