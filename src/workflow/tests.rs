use std::fs;
use tempfile::{TempDir, tempdir};

use crate::config::{LaunchSettings, Settings, Timing};
use crate::model::{
    NodeMode, OdometrySource, PathSet, PipelineRun, PoseSource, SkipFlags, StageKind,
};
use crate::process::scripted::ScriptedRunner;
use crate::stages::StageError;

use super::{Pipeline, PipelineError, RunReport, run_pipeline, save_report};

const LAUNCH: &str = r#"<launch>
  <arg name="config_file" value="default.lua" if="$(eval robot != 'husky')"/>
  <include file="$(find cartographer_example)/launch/transforms/default.launch" if="$(eval True)"/>
</launch>
"#;

const DEFAULT_LUA: &str = "options = {\n  tracking_frame = \"base_imu\",\n}\n";

struct Fixture {
    dir: TempDir,
    settings: Settings,
}

impl Fixture {
    fn new() -> Self {
        let dir = tempdir().expect("tempdir");
        let package = dir.path().join("package");
        fs::create_dir_all(package.join("launch")).expect("launch dir");
        fs::create_dir_all(package.join("config")).expect("config dir");
        fs::write(package.join("launch/cartographer.launch"), LAUNCH).expect("launch file");
        fs::write(package.join("config/default.lua"), DEFAULT_LUA).expect("config");
        let settings = Settings {
            launch: LaunchSettings {
                package_root: Some(package),
                ..LaunchSettings::default()
            },
            timing: Timing::immediate(),
            ..Settings::default()
        };
        Self { dir, settings }
    }

    fn run(&self) -> PipelineRun {
        let mut run = PipelineRun::new(
            vec![self.dir.path().join("logs/test.bag")],
            vec![self.dir.path().join("logs/gt.bag")],
            "/gt_pose",
            self.dir.path().join("out"),
            self.dir.path().join("validation"),
        );
        run.test_name = "corridor".to_string();
        run
    }
}

fn runner() -> ScriptedRunner {
    ScriptedRunner::new().trajectory_states(&[0, 1])
}

fn stage_kinds(report: &RunReport) -> Vec<StageKind> {
    report.commands.iter().map(|command| command.stage).collect()
}

#[test]
fn map_derived_run_issues_every_stage_in_order() {
    let fixture = Fixture::new();
    let runner = runner();
    let report = run_pipeline(&runner, &fixture.settings, &fixture.run()).expect("pipeline");

    assert_eq!(
        stage_kinds(&report),
        [
            StageKind::Mapping,
            StageKind::Extraction,
            StageKind::Preparation,
            StageKind::Preparation,
            StageKind::Evaluation,
            StageKind::Evaluation,
            StageKind::Evaluation,
        ]
    );
    let preparation = report
        .commands_of(StageKind::Preparation)
        .map(|command| command.command.as_str())
        .collect::<Vec<_>>();
    assert!(preparation[0].contains("-res-topic global_trajectory_0"));
    assert!(preparation[1].contains("-res-topic local_trajectory_0"));
    let projections = report
        .commands_of(StageKind::Evaluation)
        .map(|command| command.command.rsplit(' ').next().unwrap_or_default())
        .collect::<Vec<_>>();
    assert_eq!(projections, ["xy", "xz", "yz"]);

    assert!(report.skipped.is_empty());
    assert_eq!(report.pose_source, PoseSource::Map);
    assert!(runner.commands_containing("read_transforms.py").is_empty());
    assert!(runner.commands_containing("rosbag record").is_empty());
    assert!(report.paths.gt_dir.is_dir());
    assert!(report.paths.results_dir.is_dir());
    assert!(fixture.dir.path().join("out").is_dir());
}

#[test]
fn audit_log_lists_commands_in_execution_order() {
    let fixture = Fixture::new();
    let report = run_pipeline(&runner(), &fixture.settings, &fixture.run()).expect("pipeline");
    let log = report.audit_log();
    let lines = log.split("\n\n").collect::<Vec<_>>();
    assert_eq!(lines.len(), 7);
    assert!(lines[0].starts_with("roslaunch cartographer_example cartographer.launch"));
    assert!(lines[1].contains("pbstream_trajectories_to_rosbag"));
    assert!(lines[1].contains("-tracking_frame base_imu"));
    assert!(!log.ends_with('\n'));
}

#[test]
fn skipping_mapping_still_extracts_from_the_map() {
    let fixture = Fixture::new();
    let runner = runner();
    let mut run = fixture.run();
    run.skip.running_cartographer = true;

    let report = run_pipeline(&runner, &fixture.settings, &run).expect("pipeline");

    assert_eq!(report.skipped, [StageKind::Mapping]);
    assert_eq!(report.commands_of(StageKind::Mapping).count(), 0);
    assert_eq!(report.commands_of(StageKind::Extraction).count(), 1);
    assert!(runner.commands_containing("roslaunch").is_empty());
}

#[test]
fn recorded_odometry_replaces_extraction_and_global_preparation() {
    let fixture = Fixture::new();
    let runner = runner();
    let mut run = fixture.run();
    run.pose_source = PoseSource::Odometry(OdometrySource::Transforms);

    let report = run_pipeline(&runner, &fixture.settings, &run).expect("pipeline");

    let issued = runner.commands();
    assert!(issued[0].starts_with("rosrun ros_utils read_transforms.py -from odom -to base_imu"));
    assert!(issued[1].starts_with("roslaunch "));
    assert_eq!(runner.stopped().len(), 2, "engine and recorder");
    assert!(runner.stopped()[1].contains("read_transforms.py"));

    assert_eq!(
        stage_kinds(&report),
        [
            StageKind::Mapping,
            StageKind::Preparation,
            StageKind::Evaluation,
            StageKind::Evaluation,
            StageKind::Evaluation,
        ]
    );
    let preparation = report
        .commands_of(StageKind::Preparation)
        .next()
        .expect("local preparation");
    assert!(preparation.command.contains("-res-topic local_trajectory_0"));
}

#[test]
fn recorder_is_stopped_when_mapping_fails() {
    let fixture = Fixture::new();
    let runner = runner().failing_on("finish_trajectory");
    let mut run = fixture.run();
    run.pose_source = PoseSource::Odometry(OdometrySource::Topic);

    let error = run_pipeline(&runner, &fixture.settings, &run).expect_err("mapping fails");

    assert!(matches!(error, PipelineError::Stage(StageError::Process(_))), "{error}");
    let stopped = runner.stopped();
    assert_eq!(stopped.len(), 2);
    assert!(stopped.iter().any(|command| command.starts_with("rosbag record")));
    assert!(runner.commands_containing("prepare_poses_for_evaluation.py").is_empty());
}

#[test]
fn offline_mode_fails_before_anything_starts() {
    let fixture = Fixture::new();
    let runner = runner();
    let mut run = fixture.run();
    run.node_mode = NodeMode::Offline;
    run.pose_source = PoseSource::Odometry(OdometrySource::Topic);

    let error = run_pipeline(&runner, &fixture.settings, &run).expect_err("offline");
    assert!(matches!(
        error,
        PipelineError::Stage(StageError::UnsupportedMode(NodeMode::Offline))
    ));
    assert!(runner.commands().is_empty());
}

#[test]
fn invalid_run_is_rejected_before_any_command() {
    let fixture = Fixture::new();
    let runner = runner();
    let mut run = fixture.run();
    run.gt_logs.clear();

    let error = run_pipeline(&runner, &fixture.settings, &run).expect_err("no ground truth");
    assert!(matches!(error, PipelineError::Model(_)));
    assert!(runner.commands().is_empty());
}

#[test]
fn derived_paths_are_identical_across_runs() {
    let fixture = Fixture::new();
    let first = run_pipeline(&runner(), &fixture.settings, &fixture.run()).expect("first run");
    let second = run_pipeline(&runner(), &fixture.settings, &fixture.run()).expect("second run");

    assert_eq!(first.paths, second.paths);
    assert_eq!(first.commands, second.commands);
    assert_eq!(
        first.paths.map_file,
        fixture.dir.path().join("out/corridor.pbstream")
    );
}

#[test]
fn launch_package_is_located_only_when_needed() {
    let fixture = Fixture::new();
    let settings = Settings {
        launch: LaunchSettings::default(),
        ..fixture.settings.clone()
    };
    let runner = runner();
    let mut run = fixture.run();
    run.skip = SkipFlags {
        running_cartographer: true,
        trajectory_extraction: true,
        poses_preparation: true,
        evaluation: false,
    };

    let report = Pipeline::new(&runner, &settings).run(&run).expect("pipeline");

    assert!(runner.commands_containing("rospack").is_empty());
    assert_eq!(
        report.skipped,
        [StageKind::Mapping, StageKind::Extraction, StageKind::Preparation]
    );
    assert_eq!(report.commands.len(), 3);
}

#[test]
fn topic_recording_never_locates_the_launch_package() {
    let fixture = Fixture::new();
    let settings = Settings {
        launch: LaunchSettings::default(),
        ..fixture.settings.clone()
    };
    let runner = runner();
    let mut run = fixture.run();
    run.pose_source = PoseSource::Odometry(OdometrySource::Topic);
    run.skip.poses_preparation = true;

    let report = run_pipeline(&runner, &settings, &run).expect("pipeline");

    assert!(runner.commands_containing("rospack").is_empty());
    assert_eq!(runner.commands_containing("rosbag record").len(), 1);
    assert_eq!(
        stage_kinds(&report),
        [
            StageKind::Mapping,
            StageKind::Evaluation,
            StageKind::Evaluation,
            StageKind::Evaluation,
        ]
    );
    assert_eq!(report.skipped, [StageKind::Preparation]);
}

#[test]
fn launch_package_is_looked_up_once() {
    let fixture = Fixture::new();
    let package = fixture
        .settings
        .launch
        .package_root
        .clone()
        .expect("package root");
    let settings = Settings {
        launch: LaunchSettings::default(),
        ..fixture.settings.clone()
    };
    let runner = runner().reply("rospack find", &format!("{}\n", package.display()));

    run_pipeline(&runner, &settings, &fixture.run()).expect("pipeline");

    assert_eq!(
        runner.commands_containing("rospack find cartographer_example").len(),
        1
    );
}

#[test]
fn reports_are_saved_as_yaml_or_json() {
    let fixture = Fixture::new();
    let report = run_pipeline(&runner(), &fixture.settings, &fixture.run()).expect("pipeline");

    let yaml_path = fixture.dir.path().join("reports/run.yaml");
    save_report(&yaml_path, &report).expect("yaml report");
    let yaml = fs::read_to_string(&yaml_path).expect("read yaml");
    assert!(yaml.contains("test_name: corridor"));
    assert!(yaml.contains("stage: extraction"));

    let json_path = fixture.dir.path().join("run.json");
    save_report(&json_path, &report).expect("json report");
    let json: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&json_path).expect("read json")).expect("parse");
    assert_eq!(json["test_name"], "corridor");
    assert_eq!(json["commands"][0]["stage"], "mapping");
}

#[test]
fn report_paths_match_path_derivation() {
    let fixture = Fixture::new();
    let run = fixture.run();
    let report = run_pipeline(&runner(), &fixture.settings, &run).expect("pipeline");
    let expected = PathSet::derive(
        "corridor",
        &fixture.dir.path().join("out"),
        &fixture.dir.path().join("validation"),
    );
    assert_eq!(report.paths, expected);
    assert!(
        report
            .commands
            .iter()
            .any(|command| command
                .command
                .contains(&expected.local_result_poses.display().to_string()))
    );
}
