use std::fs;
use std::path::Path;

use super::{Result, RunReport};

/// Writes the report as YAML (`.yaml`/`.yml`) or pretty JSON.
pub fn save_report(path: impl AsRef<Path>, report: &RunReport) -> Result<()> {
    let path = path.as_ref();
    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .unwrap_or_default()
        .to_ascii_lowercase();
    let serialized = if matches!(extension.as_str(), "yaml" | "yml") {
        serde_yaml::to_string(report)?
    } else {
        serde_json::to_string_pretty(report)?
    };
    if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, serialized)?;
    Ok(())
}
