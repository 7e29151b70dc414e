use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::config::LaunchSettings;
use crate::process::{CommandLine, ProcessRunner};

use super::{
    ConfigError, Environment, LaunchDescription, LaunchEntry, Result, TRACKING_FRAME_VARIABLE,
    extract_string_assignment,
};

/// Resolves per-robot settings from the Cartographer launch description.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigResolver {
    package: String,
    root: PathBuf,
    launch_file: PathBuf,
}

impl ConfigResolver {
    /// Dimensionality the guards are evaluated with. The tracking frame and the
    /// transform source do not depend on it, but the guards may mention `dim`.
    pub const DIMENSION_CONTEXT: &'static str = "3d";

    pub fn new(settings: &LaunchSettings, root: impl Into<PathBuf>) -> Self {
        let root = root.into();
        Self {
            package: settings.package.clone(),
            launch_file: root.join("launch").join(&settings.file),
            root,
        }
    }

    /// Uses the configured package root, or asks `rospack find` for it.
    pub fn locate<R: ProcessRunner>(runner: &R, settings: &LaunchSettings) -> Result<Self> {
        if let Some(root) = &settings.package_root {
            return Ok(Self::new(settings, root));
        }
        let query = CommandLine::new("rospack")
            .arg("find")
            .arg(&settings.package);
        let output = runner
            .output(&query)
            .map_err(|error| ConfigError::PackageNotFound {
                package: settings.package.clone(),
                message: error.to_string(),
            })?;
        let root = output.trim();
        if root.is_empty() {
            return Err(ConfigError::PackageNotFound {
                package: settings.package.clone(),
                message: "rospack returned an empty path".to_string(),
            });
        }
        debug!(package = %settings.package, root, "located launch package");
        Ok(Self::new(settings, root))
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn launch_file(&self) -> &Path {
        &self.launch_file
    }

    pub fn resolve_tracking_frame(&self, robot: &str) -> Result<String> {
        let description = LaunchDescription::load(&self.launch_file)?;
        let entry = self.select(&description, robot, "config_file", |entry| {
            entry.tag == "arg" && entry.attribute("name") == Some("config_file")
        })?;
        let file_name = required(&description, entry, "value")?;
        let config_path = self.root.join("config").join(file_name);
        let text = fs::read_to_string(&config_path).map_err(|source| ConfigError::Read {
            path: config_path.clone(),
            source,
        })?;
        extract_string_assignment(&config_path, &text, TRACKING_FRAME_VARIABLE)
    }

    pub fn resolve_transform_source(&self, robot: &str) -> Result<PathBuf> {
        let description = LaunchDescription::load(&self.launch_file)?;
        let entry = self.select(&description, robot, "include", |entry| {
            entry.tag == "include"
        })?;
        let file = required(&description, entry, "file")?;
        self.expand_find(file)
    }

    fn select<'a>(
        &self,
        description: &'a LaunchDescription,
        robot: &str,
        what: &'static str,
        filter: impl Fn(&LaunchEntry) -> bool,
    ) -> Result<&'a LaunchEntry> {
        let environment = Environment::new()
            .with("robot", robot)
            .with("dim", Self::DIMENSION_CONTEXT);
        description
            .first_match(&environment, filter)?
            .ok_or_else(|| ConfigError::NoMatch {
                what,
                path: description.path().to_path_buf(),
                robot: robot.to_string(),
            })
    }

    /// Replaces a leading `$(find <package>)` with the package root.
    fn expand_find(&self, file: &str) -> Result<PathBuf> {
        let prefix = format!("$(find {})", self.package);
        if let Some(rest) = file.strip_prefix(prefix.as_str()) {
            return Ok(self.root.join(rest.trim_start_matches('/')));
        }
        if file.contains("$(") {
            return Err(ConfigError::UnsupportedSubstitution(file.to_string()));
        }
        let path = Path::new(file);
        if path.is_absolute() {
            Ok(path.to_path_buf())
        } else {
            Ok(self.root.join(path))
        }
    }
}

fn required<'a>(
    description: &LaunchDescription,
    entry: &'a LaunchEntry,
    attribute: &'static str,
) -> Result<&'a str> {
    entry
        .attribute(attribute)
        .ok_or_else(|| ConfigError::MissingAttribute {
            path: description.path().to_path_buf(),
            tag: entry.tag.clone(),
            attribute,
        })
}
