use std::path::PathBuf;

use clap::Parser;

use crate::model::{Dimension, NodeMode, OdometrySource, PoseSource};

use super::types::{Cli, Commands, RunArgs};

const REQUIRED: [&str; 11] = [
    "slam-eval",
    "evaluate",
    "--test-rosbag-files",
    "a.bag",
    "b.bag",
    "--gt-bags",
    "gt.bag",
    "--gt-topic",
    "/gt_pose",
    "--out-test-folder",
    "out",
];

fn parse(extra: &[&str]) -> Result<Cli, clap::Error> {
    let mut args = REQUIRED.to_vec();
    args.extend(["--validation-folder", "val"]);
    args.extend_from_slice(extra);
    Cli::try_parse_from(args)
}

fn run_args(cli: Cli) -> RunArgs {
    match cli.command {
        Commands::Evaluate { run, .. } => run,
        other => panic!("unexpected command {other:?}"),
    }
}

#[test]
fn evaluate_defaults_match_a_map_derived_run() {
    let run = run_args(parse(&[]).expect("parse"))
        .into_run()
        .expect("run");
    assert_eq!(
        run.test_logs,
        [PathBuf::from("a.bag"), PathBuf::from("b.bag")]
    );
    assert_eq!(run.gt_logs, [PathBuf::from("gt.bag")]);
    assert_eq!(run.test_name, "test");
    assert_eq!(run.robot, "default");
    assert_eq!(run.dimension, Dimension::ThreeD);
    assert_eq!(run.node_mode, NodeMode::Online);
    assert_eq!(run.pose_source, PoseSource::Map);
    assert_eq!(run.tolerances.max_time_step, 0.7);
    assert!(!run.skip.running_cartographer);
}

#[test]
fn evaluate_flags_reach_the_run() {
    let cli = parse(&[
        "--robot",
        "husky",
        "--dim",
        "2d",
        "--get-odom-from-topic",
        "--max-time-error",
        "0.05",
        "--skip-evaluation",
        "--settings",
        "settings.yaml",
    ])
    .expect("parse");
    assert_eq!(cli.settings, Some(PathBuf::from("settings.yaml")));
    let run = run_args(cli).into_run().expect("run");
    assert_eq!(run.robot, "husky");
    assert_eq!(run.dimension, Dimension::TwoD);
    assert_eq!(run.pose_source, PoseSource::Odometry(OdometrySource::Topic));
    assert_eq!(run.tolerances.max_time_error, 0.05);
    assert!(run.skip.evaluation);
}

#[test]
fn odometry_intents_are_mutually_exclusive() {
    let error = parse(&["--get-odom-from-transforms", "--get-odom-from-topic"])
        .expect_err("conflicting intents");
    assert_eq!(error.kind(), clap::error::ErrorKind::ArgumentConflict);
}

#[test]
fn ground_truth_logs_are_required() {
    assert!(Cli::try_parse_from(["slam-eval", "paths", "--test-rosbag-files", "a.bag"]).is_err());
}
