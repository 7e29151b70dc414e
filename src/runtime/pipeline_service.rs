use std::path::Path;

use crate::config::Settings;
use crate::model::{PathSet, PipelineRun};
use crate::process::SystemRunner;
use crate::workflow::{RunReport, run_pipeline, save_report};

use super::Result;

#[derive(Debug, Default, Clone, Copy)]
pub struct PipelineService {
    runner: SystemRunner,
}

impl PipelineService {
    /// Paths a run would use, without starting anything.
    pub fn plan(&self, run: &PipelineRun) -> Result<PathSet> {
        run.validate()?;
        Ok(PathSet::for_run(&run.absolutized()?))
    }

    pub fn run(&self, settings: &Settings, run: &PipelineRun) -> Result<RunReport> {
        Ok(run_pipeline(&self.runner, settings, run)?)
    }

    pub fn save_report(&self, path: impl AsRef<Path>, report: &RunReport) -> Result<()> {
        save_report(path, report)?;
        Ok(())
    }
}
