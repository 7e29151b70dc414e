use std::path::Path;

use tracing::info;

use crate::launch::ConfigResolver;
use crate::model::{ExternalCommand, StageKind};
use crate::process::{CommandLine, ProcessRunner};

use super::Result;

/// Converts the serialized map into a pose log expressed in the robot's tracking frame.
pub fn extract<R: ProcessRunner>(
    runner: &R,
    resolver: &ConfigResolver,
    map_file: &Path,
    out_log: &Path,
    robot: &str,
) -> Result<ExternalCommand> {
    let tracking_frame = resolver.resolve_tracking_frame(robot)?;
    info!(robot, %tracking_frame, "extracting trajectories from map");
    let command = CommandLine::new("rosrun")
        .arg("cartographer_ros")
        .arg("pbstream_trajectories_to_rosbag")
        .arg("-input")
        .path(map_file)
        .arg("-output")
        .path(out_log)
        .option("-tracking_frame", tracking_frame);
    runner.run(&command)?;
    Ok(ExternalCommand::new(StageKind::Extraction, command.render()))
}
