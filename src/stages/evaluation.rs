use std::path::Path;

use tracing::info;

use crate::config::ScorerSettings;
use crate::model::{ExternalCommand, PathSet, Projection, StageKind};
use crate::process::{CommandLine, ProcessRunner};

use super::Result;

/// Scores the prepared pose files of `validation_dir` on one projection plane.
pub fn evaluate<R: ProcessRunner>(
    runner: &R,
    scorer: &ScorerSettings,
    validation_dir: &Path,
    projection: Projection,
) -> Result<ExternalCommand> {
    let output_dir = PathSet::projection_dir(validation_dir, projection);
    info!(%projection, output = %output_dir.display(), "evaluating poses");
    let command = CommandLine::new(&scorer.interpreter)
        .path(&scorer.script)
        .arg("--dir_gt")
        .path(&PathSet::gt_dir(validation_dir))
        .arg("--dir_result")
        .path(&PathSet::results_dir(validation_dir))
        .arg("--dir_output")
        .path(&output_dir)
        .option("--gt_format", "kitti")
        .option("--result_format", "kitti")
        .option("--projection", projection.as_str());
    runner.run(&command)?;
    Ok(ExternalCommand::new(StageKind::Evaluation, command.render()))
}
