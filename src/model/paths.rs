use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use super::{PipelineRun, Projection, TrajectoryScope};

/// Every file a run reads back or writes, derived only from the test name and
/// the two output directories. Re-running with the same inputs targets the same
/// files, which is what lets individual stages be skipped.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PathSet {
    pub map_file: PathBuf,
    pub result_log: PathBuf,
    pub trajectories_log: PathBuf,
    pub gt_dir: PathBuf,
    pub results_dir: PathBuf,
    pub global_gt_poses: PathBuf,
    pub global_result_poses: PathBuf,
    pub local_gt_poses: PathBuf,
    pub local_result_poses: PathBuf,
    pub projection_outputs: BTreeMap<Projection, PathBuf>,
}

impl PathSet {
    pub fn derive(test_name: &str, out_test_dir: &Path, validation_dir: &Path) -> Self {
        let gt_dir = Self::gt_dir(validation_dir);
        let results_dir = Self::results_dir(validation_dir);
        let poses = |dir: &Path, scope: TrajectoryScope| {
            dir.join(format!("{}_{test_name}.txt", scope.as_str()))
        };
        Self {
            map_file: out_test_dir.join(format!("{test_name}.pbstream")),
            result_log: out_test_dir.join(format!("{test_name}.bag")),
            trajectories_log: out_test_dir.join(format!("{test_name}_trajectories.bag")),
            global_gt_poses: poses(&gt_dir, TrajectoryScope::Global),
            global_result_poses: poses(&results_dir, TrajectoryScope::Global),
            local_gt_poses: poses(&gt_dir, TrajectoryScope::Local),
            local_result_poses: poses(&results_dir, TrajectoryScope::Local),
            projection_outputs: Projection::ALL
                .into_iter()
                .map(|projection| (projection, Self::projection_dir(validation_dir, projection)))
                .collect(),
            gt_dir,
            results_dir,
        }
    }

    pub fn for_run(run: &PipelineRun) -> Self {
        Self::derive(&run.test_name, &run.out_test_dir, &run.validation_dir)
    }

    pub fn gt_dir(validation_dir: &Path) -> PathBuf {
        validation_dir.join("gt")
    }

    pub fn results_dir(validation_dir: &Path) -> PathBuf {
        validation_dir.join("results")
    }

    pub fn projection_dir(validation_dir: &Path, projection: Projection) -> PathBuf {
        validation_dir.join(format!("output_{projection}"))
    }

    pub fn gt_poses(&self, scope: TrajectoryScope) -> &Path {
        match scope {
            TrajectoryScope::Global => &self.global_gt_poses,
            TrajectoryScope::Local => &self.local_gt_poses,
        }
    }

    pub fn result_poses(&self, scope: TrajectoryScope) -> &Path {
        match scope {
            TrajectoryScope::Global => &self.global_result_poses,
            TrajectoryScope::Local => &self.local_result_poses,
        }
    }

    /// Files written by the stages, in stage order.
    pub fn written_files(&self) -> [&Path; 7] {
        [
            &self.map_file,
            &self.result_log,
            &self.trajectories_log,
            &self.global_gt_poses,
            &self.global_result_poses,
            &self.local_gt_poses,
            &self.local_result_poses,
        ]
    }
}
