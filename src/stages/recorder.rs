use std::path::Path;

use tracing::{info, warn};

use crate::config::EngineSettings;
use crate::model::{OdometrySource, TrajectoryScope};
use crate::process::{CommandLine, ProcessRunner};

use super::Result;

/// Frame the transform recorder measures the tracking frame against.
pub const ODOMETRY_SOURCE_FRAME: &str = "odom";

/// Starts recording odometry into `out_log` under the local trajectory channel.
///
/// The recorder runs alongside the mapping engine; its log is only complete once
/// [`stop_recorder`] returned. `tracking_frame` is only called for
/// [`OdometrySource::Transforms`].
pub fn start_recorder<R, F>(
    runner: &R,
    engine: &EngineSettings,
    source: OdometrySource,
    tracking_frame: F,
    out_log: &Path,
) -> Result<R::Handle>
where
    R: ProcessRunner,
    F: FnOnce() -> crate::launch::Result<String>,
{
    let channel = TrajectoryScope::Local.channel();
    let command = match source {
        OdometrySource::Transforms => {
            let tracking_frame = tracking_frame()?;
            CommandLine::new("rosrun")
                .arg("ros_utils")
                .arg("read_transforms.py")
                .option("-from", ODOMETRY_SOURCE_FRAME)
                .option("-to", tracking_frame)
                .arg("-out-bag")
                .path(out_log)
                .option("-out-topic", channel)
        }
        OdometrySource::Topic => CommandLine::new("rosbag")
            .arg("record")
            .arg(channel)
            .arg("-O")
            .path(out_log)
            .arg(format!("{channel}:={}", engine.topic("tracked_pose"))),
    };
    info!(?source, log = %out_log.display(), "starting odometry recorder");
    Ok(runner.spawn(&command)?)
}

/// Terminates the recorder and waits until it has flushed and exited.
pub fn stop_recorder<R: ProcessRunner>(runner: &R, handle: R::Handle) -> Result<()> {
    let outcome = runner.stop(handle)?;
    if outcome.success() {
        info!("odometry recorder stopped");
    } else {
        warn!(%outcome, "odometry recorder exited abnormally");
    }
    Ok(())
}
