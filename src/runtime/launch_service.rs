use std::path::PathBuf;

use crate::config::Settings;
use crate::launch::ConfigResolver;
use crate::process::SystemRunner;

use super::Result;

/// Per-robot lookups in the launch package, without running a pipeline.
#[derive(Debug, Default, Clone, Copy)]
pub struct LaunchService {
    runner: SystemRunner,
}

impl LaunchService {
    pub fn resolver(&self, settings: &Settings) -> Result<ConfigResolver> {
        Ok(ConfigResolver::locate(&self.runner, &settings.launch)?)
    }

    pub fn tracking_frame(&self, settings: &Settings, robot: &str) -> Result<String> {
        Ok(self.resolver(settings)?.resolve_tracking_frame(robot)?)
    }

    pub fn transform_source(&self, settings: &Settings, robot: &str) -> Result<PathBuf> {
        Ok(self.resolver(settings)?.resolve_transform_source(robot)?)
    }
}
