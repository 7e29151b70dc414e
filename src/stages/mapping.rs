use std::path::{Path, PathBuf};
use std::time::Instant;

use tracing::{debug, info, warn};

use crate::config::{EngineSettings, Settings, Timing};
use crate::model::{Dimension, ExternalCommand, NodeMode, StageKind, TrajectoryState};
use crate::process::{CommandLine, ProcessRunner};

use super::{Result, StageError};

/// Runs the mapping engine over `logs` and writes its serialized state to `out_map`.
///
/// The engine is started in the background, fed by log playback, asked to finish
/// its trajectory, polled until the trajectory is no longer active, asked to
/// write its state and finally terminated. Its exit status must be zero.
pub fn run_mapping<R: ProcessRunner>(
    runner: &R,
    settings: &Settings,
    logs: &[PathBuf],
    out_map: &Path,
    robot: &str,
    dimension: Dimension,
    mode: NodeMode,
) -> Result<ExternalCommand> {
    if mode != NodeMode::Online {
        return Err(StageError::UnsupportedMode(mode));
    }

    let launch = CommandLine::new("roslaunch")
        .arg(&settings.launch.package)
        .arg(&settings.launch.file)
        .arg(format!("robot:={robot}"))
        .arg(format!("dim:={dimension}"))
        .arg("publish_occupancy_grid:=false");
    info!(robot, %dimension, map = %out_map.display(), "starting mapping engine");
    let engine = runner.spawn(&launch)?;

    if let Err(error) = drive_engine(runner, settings, logs, out_map) {
        if let Err(stop_error) = runner.stop(engine) {
            warn!(error = %stop_error, "failed to stop mapping engine after error");
        }
        return Err(error);
    }

    let outcome = runner.stop(engine)?;
    outcome.ensure(&launch)?;
    info!(map = %out_map.display(), "mapping finished");
    Ok(ExternalCommand::new(StageKind::Mapping, launch.render()))
}

fn drive_engine<R: ProcessRunner>(
    runner: &R,
    settings: &Settings,
    logs: &[PathBuf],
    out_map: &Path,
) -> Result<()> {
    let engine = &settings.engine;
    let timing = &settings.timing;

    wait_for_service(runner, &engine.service("write_state"), timing)?;
    runner.pause(timing.service_settle());

    let playback = CommandLine::new("rosbag")
        .arg("play")
        .arg("--clock")
        .paths(logs.iter().map(PathBuf::as_path));
    runner.run(&playback)?;
    runner.pause(timing.step_settle());

    let finish = CommandLine::new("rosservice")
        .arg("call")
        .arg(engine.service("finish_trajectory"))
        .arg(engine.trajectory_id.to_string());
    runner.run(&finish)?;

    let state = wait_for_trajectory_completion(runner, engine, timing)?;
    debug!(state = state.0, "trajectory finished");
    runner.pause(timing.step_settle());

    let write_state = CommandLine::new("rosservice")
        .arg("call")
        .arg(engine.service("write_state"))
        .path(out_map)
        .arg("true");
    runner.run(&write_state)?;
    Ok(())
}

fn wait_for_service<R: ProcessRunner>(runner: &R, service: &str, timing: &Timing) -> Result<()> {
    let probe = CommandLine::new("rosservice").arg("info").arg(service);
    let started = Instant::now();
    loop {
        if runner.probe(&probe)? {
            debug!(service, "service available");
            return Ok(());
        }
        if timing.service_timeout().is_some_and(|limit| started.elapsed() >= limit) {
            return Err(StageError::Timeout {
                what: format!("service {service}"),
                waited: started.elapsed(),
            });
        }
        runner.pause(timing.poll_interval());
    }
}

/// Polls the trajectory states until the first one is no longer active.
///
/// Fails with [`StageError::Timeout`] once the completion deadline has passed.
pub fn wait_for_trajectory_completion<R: ProcessRunner>(
    runner: &R,
    engine: &EngineSettings,
    timing: &Timing,
) -> Result<TrajectoryState> {
    let query = CommandLine::new("rosservice")
        .arg("call")
        .arg(engine.service("get_trajectory_states"));
    let started = Instant::now();
    let mut polls = 0_u64;
    loop {
        let reply = runner.output(&query)?;
        polls += 1;
        let state =
            parse_trajectory_state(&reply).ok_or_else(|| StageError::UnexpectedOutput {
                command: query.render(),
                detail: "no `trajectory_state: [..]` entry".to_string(),
            })?;
        if !state.is_active() {
            debug!(polls, state = state.0, "trajectory no longer active");
            return Ok(state);
        }
        if timing.completion_timeout().is_some_and(|limit| started.elapsed() >= limit) {
            return Err(StageError::Timeout {
                what: "trajectory completion".to_string(),
                waited: started.elapsed(),
            });
        }
        runner.pause(timing.poll_interval());
    }
}

/// First element of the `trajectory_state: [..]` list in a service reply.
pub fn parse_trajectory_state(reply: &str) -> Option<TrajectoryState> {
    let (_, rest) = reply.split_once("trajectory_state:")?;
    let (_, list) = rest.split_once('[')?;
    let (list, _) = list.split_once(']')?;
    list.split(',')
        .next()?
        .trim()
        .parse()
        .ok()
        .map(TrajectoryState)
}
