use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use serde::Serialize;

use crate::model::{
    Dimension, ModelError, NodeMode, PipelineRun, PoseSource, SkipFlags, Tolerances,
};

#[derive(Debug, Parser)]
#[command(
    name = "slam-eval",
    version,
    about = "Runs Cartographer over recorded logs and scores its poses against ground truth"
)]
pub(super) struct Cli {
    /// YAML or JSON settings file with tool names, service namespace and timings.
    #[arg(long, global = true)]
    pub(super) settings: Option<PathBuf>,

    /// Launch package directory. Found with `rospack find` when omitted.
    #[arg(long, global = true)]
    pub(super) package_root: Option<PathBuf>,

    #[command(subcommand)]
    pub(super) command: Commands,
}

#[derive(Debug, Subcommand)]
pub(super) enum Commands {
    /// Runs mapping, extraction, pose preparation and evaluation.
    Evaluate {
        #[command(flatten)]
        run: RunArgs,
        /// Pose scorer script passed to the scorer interpreter.
        #[arg(long)]
        scorer_script: Option<PathBuf>,
        /// Writes the run report (`.json`, `.yaml` or `.yml`).
        #[arg(long)]
        report: Option<PathBuf>,
    },
    /// Prints the tracking frame and transform source selected for a robot.
    Resolve {
        #[arg(long, visible_alias = "robot", default_value = "default")]
        robot_name: String,
    },
    /// Prints the files a run reads and writes without starting anything.
    Paths {
        #[command(flatten)]
        run: RunArgs,
    },
}

#[derive(Debug, Args)]
pub(super) struct RunArgs {
    /// Logs to run the mapping engine on.
    #[arg(long, visible_alias = "test-bags", required = true, num_args = 1..)]
    pub(super) test_rosbag_files: Vec<PathBuf>,

    /// Logs holding the ground-truth poses.
    #[arg(long, visible_alias = "gt-bags", required = true, num_args = 1..)]
    pub(super) gt_rosbag_files: Vec<PathBuf>,

    #[arg(long)]
    pub(super) gt_topic: String,

    #[arg(long, visible_alias = "out-test-fld")]
    pub(super) out_test_folder: PathBuf,

    #[arg(long, visible_alias = "val-fld")]
    pub(super) validation_folder: PathBuf,

    #[arg(long, visible_alias = "robot", default_value = "default")]
    pub(super) robot_name: String,

    #[arg(long, visible_alias = "dim", value_enum, default_value_t = Dimension::ThreeD)]
    pub(super) dimension: Dimension,

    #[arg(long, visible_alias = "node", value_enum, default_value_t = NodeMode::Online)]
    pub(super) node_to_use: NodeMode,

    /// Record odometry from the odom -> tracking frame transforms instead of the map.
    #[arg(long, conflicts_with = "get_odom_from_topic")]
    pub(super) get_odom_from_transforms: bool,

    /// Record odometry from the tracked pose topic instead of the map.
    #[arg(long)]
    pub(super) get_odom_from_topic: bool,

    #[arg(long, default_value = "test")]
    pub(super) test_name: String,

    /// Max gap between the union and the intersection of the gt and result time ranges.
    #[arg(long, default_value_t = 0.9)]
    pub(super) max_union_intersection_time_difference: f64,

    /// Max time error when matching gt and result poses.
    #[arg(long, default_value_t = 0.01)]
    pub(super) max_time_error: f64,

    /// Max time step between matched poses.
    #[arg(long, default_value_t = 0.7)]
    pub(super) max_time_step: f64,

    #[arg(long)]
    pub(super) skip_running_cartographer: bool,

    #[arg(long)]
    pub(super) skip_trajectory_extraction: bool,

    #[arg(long)]
    pub(super) skip_poses_preparation: bool,

    #[arg(long)]
    pub(super) skip_evaluation: bool,
}

impl RunArgs {
    pub(super) fn into_run(self) -> Result<PipelineRun, ModelError> {
        let pose_source =
            PoseSource::from_intents(self.get_odom_from_transforms, self.get_odom_from_topic)?;
        let mut run = PipelineRun::new(
            self.test_rosbag_files,
            self.gt_rosbag_files,
            self.gt_topic,
            self.out_test_folder,
            self.validation_folder,
        );
        run.test_name = self.test_name;
        run.robot = self.robot_name;
        run.dimension = self.dimension;
        run.node_mode = self.node_to_use;
        run.pose_source = pose_source;
        run.tolerances = Tolerances {
            max_union_intersection_time_difference: self.max_union_intersection_time_difference,
            max_time_error: self.max_time_error,
            max_time_step: self.max_time_step,
        };
        run.skip = SkipFlags {
            running_cartographer: self.skip_running_cartographer,
            trajectory_extraction: self.skip_trajectory_extraction,
            poses_preparation: self.skip_poses_preparation,
            evaluation: self.skip_evaluation,
        };
        Ok(run)
    }
}

#[derive(Debug, Serialize)]
pub(super) struct RobotInfo {
    pub(super) robot: String,
    pub(super) tracking_frame: String,
    pub(super) transform_source: PathBuf,
}
