use std::cell::OnceCell;
use std::fs;
use std::time::Instant;

use tracing::{info, warn};

use crate::config::Settings;
use crate::launch::ConfigResolver;
use crate::model::{
    ExternalCommand, NodeMode, PathSet, PipelineRun, PoseSource, Projection, StageKind,
    TrajectoryScope,
};
use crate::process::ProcessRunner;
use crate::stages::{
    PreparationRequest, StageError, evaluate, extract, prepare, run_mapping, start_recorder,
    stop_recorder,
};

use super::{Result, RunReport};

/// Sequences mapping, extraction, preparation and evaluation for evaluation runs.
///
/// The launch package is located on first use, so runs that skip every stage
/// needing it never query `rospack`.
pub struct Pipeline<'a, R: ProcessRunner> {
    runner: &'a R,
    settings: &'a Settings,
    resolver: OnceCell<ConfigResolver>,
}

impl<'a, R: ProcessRunner> Pipeline<'a, R> {
    pub fn new(runner: &'a R, settings: &'a Settings) -> Self {
        Self {
            runner,
            settings,
            resolver: OnceCell::new(),
        }
    }

    pub fn with_resolver(self, resolver: ConfigResolver) -> Self {
        let _ = self.resolver.set(resolver);
        self
    }

    pub fn run(&self, run: &PipelineRun) -> Result<RunReport> {
        let started = Instant::now();
        run.validate()?;
        let run = run.absolutized()?;
        let paths = PathSet::for_run(&run);
        fs::create_dir_all(&run.out_test_dir)?;
        fs::create_dir_all(&paths.gt_dir)?;
        fs::create_dir_all(&paths.results_dir)?;
        info!(
            test = %run.test_name,
            robot = %run.robot,
            source = ?run.pose_source,
            "starting evaluation run"
        );

        let mut commands = Vec::new();
        let mut skipped = Vec::new();

        if run.skip.running_cartographer {
            skip(&mut skipped, StageKind::Mapping);
        } else {
            commands.push(self.map(&run, &paths)?);
        }

        if run.pose_source.is_map() {
            if run.skip.trajectory_extraction {
                skip(&mut skipped, StageKind::Extraction);
            } else {
                commands.push(extract(
                    self.runner,
                    self.resolver()?,
                    &paths.map_file,
                    &paths.result_log,
                    &run.robot,
                )?);
            }
        }

        if run.skip.poses_preparation {
            skip(&mut skipped, StageKind::Preparation);
        } else {
            for &scope in scopes(run.pose_source) {
                let request = PreparationRequest {
                    gt_logs: &run.gt_logs,
                    gt_topic: &run.gt_topic,
                    result_log: &paths.result_log,
                    scope,
                    robot: &run.robot,
                    tolerances: run.tolerances,
                    out_gt_poses: paths.gt_poses(scope),
                    out_result_poses: paths.result_poses(scope),
                    out_trajectories: &paths.trajectories_log,
                };
                commands.push(prepare(self.runner, self.resolver()?, &request)?.command);
            }
        }

        if run.skip.evaluation {
            skip(&mut skipped, StageKind::Evaluation);
        } else {
            for projection in Projection::ALL {
                commands.push(evaluate(
                    self.runner,
                    &self.settings.scorer,
                    &run.validation_dir,
                    projection,
                )?);
            }
        }

        let duration_ms = started.elapsed().as_millis();
        info!(
            test = %run.test_name,
            commands = commands.len(),
            duration_ms,
            "evaluation run finished"
        );
        Ok(RunReport {
            test_name: run.test_name.clone(),
            robot: run.robot.clone(),
            pose_source: run.pose_source,
            paths,
            commands,
            skipped,
            duration_ms,
        })
    }

    /// Runs the mapping stage with the odometry recorder around it when poses
    /// are not taken from the map.
    fn map(&self, run: &PipelineRun, paths: &PathSet) -> Result<ExternalCommand> {
        if run.node_mode != NodeMode::Online {
            return Err(StageError::UnsupportedMode(run.node_mode).into());
        }
        let recorder = match run.pose_source.odometry() {
            Some(source) => Some(start_recorder(
                self.runner,
                &self.settings.engine,
                source,
                || self.locate()?.resolve_tracking_frame(&run.robot),
                &paths.result_log,
            )?),
            None => None,
        };

        let mapping = run_mapping(
            self.runner,
            self.settings,
            &run.test_logs,
            &paths.map_file,
            &run.robot,
            run.dimension,
            run.node_mode,
        );
        let stopped = recorder
            .map(|handle| stop_recorder(self.runner, handle))
            .transpose();
        if let (Err(_), Err(error)) = (&mapping, &stopped) {
            warn!(%error, "odometry recorder did not stop cleanly");
        }
        let command = mapping?;
        stopped?;
        Ok(command)
    }

    fn resolver(&self) -> Result<&ConfigResolver> {
        Ok(self.locate()?)
    }

    fn locate(&self) -> crate::launch::Result<&ConfigResolver> {
        if let Some(resolver) = self.resolver.get() {
            return Ok(resolver);
        }
        let located = ConfigResolver::locate(self.runner, &self.settings.launch)?;
        Ok(self.resolver.get_or_init(|| located))
    }
}

fn skip(skipped: &mut Vec<StageKind>, stage: StageKind) {
    info!(%stage, "stage skipped");
    skipped.push(stage);
}

/// Global poses only exist in the map; recorded odometry has the local channel only.
fn scopes(source: PoseSource) -> &'static [TrajectoryScope] {
    if source.is_map() {
        &[TrajectoryScope::Global, TrajectoryScope::Local]
    } else {
        &[TrajectoryScope::Local]
    }
}

pub fn run_pipeline<R: ProcessRunner>(
    runner: &R,
    settings: &Settings,
    run: &PipelineRun,
) -> Result<RunReport> {
    Pipeline::new(runner, settings).run(run)
}
