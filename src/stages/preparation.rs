use std::path::{Path, PathBuf};

use tracing::info;

use crate::launch::ConfigResolver;
use crate::model::{ExternalCommand, StageKind, Tolerances, TrajectoryScope};
use crate::process::{CommandLine, ProcessRunner};

use super::Result;

/// Inputs of one alignment pass for a single trajectory scope.
#[derive(Debug, Clone)]
pub struct PreparationRequest<'a> {
    pub gt_logs: &'a [PathBuf],
    pub gt_topic: &'a str,
    pub result_log: &'a Path,
    pub scope: TrajectoryScope,
    pub robot: &'a str,
    pub tolerances: Tolerances,
    pub out_gt_poses: &'a Path,
    pub out_result_poses: &'a Path,
    pub out_trajectories: &'a Path,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreparedPoses {
    pub gt_poses: PathBuf,
    pub result_poses: PathBuf,
    pub command: ExternalCommand,
}

/// Time-aligns ground truth against the result channel of `request.scope` and
/// writes both as paired pose files.
pub fn prepare<R: ProcessRunner>(
    runner: &R,
    resolver: &ConfigResolver,
    request: &PreparationRequest<'_>,
) -> Result<PreparedPoses> {
    let transforms_source = resolver.resolve_transform_source(request.robot)?;
    let tolerances = &request.tolerances;
    info!(
        scope = request.scope.as_str(),
        transforms = %transforms_source.display(),
        "preparing poses for evaluation"
    );
    let command = CommandLine::new("rosrun")
        .arg("ros_utils")
        .arg("prepare_poses_for_evaluation.py")
        .arg("-gt-bags")
        .paths(request.gt_logs.iter().map(PathBuf::as_path))
        .option("-gt-topic", request.gt_topic)
        .arg("-res-bag")
        .path(request.result_log)
        .option("-res-topic", request.scope.channel())
        .arg("-out-gt")
        .path(request.out_gt_poses)
        .arg("-out-res")
        .path(request.out_result_poses)
        .arg("-transforms-source")
        .path(&transforms_source)
        .arg("-out-trajectories")
        .path(request.out_trajectories)
        .option(
            "--max-union-intersection-time-difference",
            tolerances.max_union_intersection_time_difference.to_string(),
        )
        .option("--max-time-error", tolerances.max_time_error.to_string())
        .option("--max-time-step", tolerances.max_time_step.to_string());
    runner.run(&command)?;
    Ok(PreparedPoses {
        gt_poses: request.out_gt_poses.to_path_buf(),
        result_poses: request.out_result_poses.to_path_buf(),
        command: ExternalCommand::new(StageKind::Preparation, command.render()),
    })
}
