use std::path::Path;

use crate::config::Settings;

use super::{LaunchService, PipelineService, Result};

#[derive(Debug, Clone, Default)]
pub struct AppContext {
    settings: Settings,
    launch_service: LaunchService,
    pipeline_service: PipelineService,
}

impl AppContext {
    pub fn with_settings(settings: Settings) -> Self {
        Self {
            settings,
            ..Self::default()
        }
    }

    /// Loads settings from `path`, or uses the defaults when no file is given.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let settings = match path {
            Some(path) => Settings::load(path)?,
            None => Settings::default(),
        };
        Ok(Self::with_settings(settings))
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn settings_mut(&mut self) -> &mut Settings {
        &mut self.settings
    }

    pub fn launch_service(&self) -> &LaunchService {
        &self.launch_service
    }

    pub fn pipeline_service(&self) -> &PipelineService {
        &self.pipeline_service
    }
}
