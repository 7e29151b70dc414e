use std::fmt;
use std::path::{Path, PathBuf};

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use super::{ModelError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
pub enum Dimension {
    #[serde(rename = "2d")]
    #[value(name = "2d")]
    TwoD,
    #[serde(rename = "3d")]
    #[value(name = "3d")]
    ThreeD,
}

impl Dimension {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::TwoD => "2d",
            Self::ThreeD => "3d",
        }
    }
}

impl fmt::Display for Dimension {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.as_str())
    }
}

/// Which mapping node drives the run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum NodeMode {
    Online,
    Offline,
}

impl fmt::Display for NodeMode {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(match self {
            Self::Online => "online",
            Self::Offline => "offline",
        })
    }
}

/// Where the side-channel recorder takes odometry from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OdometrySource {
    Transforms,
    Topic,
}

/// How result poses are acquired for one run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PoseSource {
    /// Poses come from the serialized map through the extraction stage.
    Map,
    /// Poses are recorded next to the mapping engine while it runs.
    Odometry(OdometrySource),
}

impl PoseSource {
    /// Derives the strategy from the two user intents. Both set at once is rejected.
    pub fn from_intents(from_transforms: bool, from_topic: bool) -> Result<Self> {
        match (from_transforms, from_topic) {
            (true, true) => Err(ModelError::ConflictingPoseSources),
            (true, false) => Ok(Self::Odometry(OdometrySource::Transforms)),
            (false, true) => Ok(Self::Odometry(OdometrySource::Topic)),
            (false, false) => Ok(Self::Map),
        }
    }

    pub fn is_map(self) -> bool {
        matches!(self, Self::Map)
    }

    pub fn odometry(self) -> Option<OdometrySource> {
        match self {
            Self::Map => None,
            Self::Odometry(source) => Some(source),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Tolerances {
    /// Max gap between the union and the intersection of the gt and result time ranges.
    pub max_union_intersection_time_difference: f64,
    pub max_time_error: f64,
    pub max_time_step: f64,
}

impl Default for Tolerances {
    fn default() -> Self {
        Self {
            max_union_intersection_time_difference: 0.9,
            max_time_error: 0.01,
            max_time_step: 0.7,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SkipFlags {
    pub running_cartographer: bool,
    pub trajectory_extraction: bool,
    pub poses_preparation: bool,
    pub evaluation: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PipelineRun {
    pub test_name: String,
    pub test_logs: Vec<PathBuf>,
    pub gt_logs: Vec<PathBuf>,
    pub gt_topic: String,
    pub out_test_dir: PathBuf,
    pub validation_dir: PathBuf,
    pub robot: String,
    pub dimension: Dimension,
    pub node_mode: NodeMode,
    pub pose_source: PoseSource,
    pub tolerances: Tolerances,
    pub skip: SkipFlags,
}

impl PipelineRun {
    /// Creates a run with the default robot, 3d online mapping and map-derived poses.
    pub fn new(
        test_logs: Vec<PathBuf>,
        gt_logs: Vec<PathBuf>,
        gt_topic: impl Into<String>,
        out_test_dir: impl Into<PathBuf>,
        validation_dir: impl Into<PathBuf>,
    ) -> Self {
        Self {
            test_name: "test".to_string(),
            test_logs,
            gt_logs,
            gt_topic: gt_topic.into(),
            out_test_dir: out_test_dir.into(),
            validation_dir: validation_dir.into(),
            robot: "default".to_string(),
            dimension: Dimension::ThreeD,
            node_mode: NodeMode::Online,
            pose_source: PoseSource::Map,
            tolerances: Tolerances::default(),
            skip: SkipFlags::default(),
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.test_logs.is_empty() {
            return Err(ModelError::NoLogs("test"));
        }
        if self.gt_logs.is_empty() {
            return Err(ModelError::NoLogs("ground-truth"));
        }
        if self.gt_topic.trim().is_empty() {
            return Err(ModelError::EmptyTopic);
        }
        let name = self.test_name.as_str();
        if name.trim().is_empty() || name.contains(['/', '\\']) || name == "." || name == ".." {
            return Err(ModelError::InvalidTestName(self.test_name.clone()));
        }
        Ok(())
    }

    /// Returns a copy where every log and directory path is absolute.
    pub fn absolutized(&self) -> Result<Self> {
        let mut run = self.clone();
        run.test_logs = absolute_all(&self.test_logs)?;
        run.gt_logs = absolute_all(&self.gt_logs)?;
        run.out_test_dir = absolute(&self.out_test_dir)?;
        run.validation_dir = absolute(&self.validation_dir)?;
        Ok(run)
    }
}

fn absolute(path: &Path) -> Result<PathBuf> {
    std::path::absolute(path).map_err(|source| ModelError::Path {
        path: path.to_path_buf(),
        source,
    })
}

fn absolute_all(paths: &[PathBuf]) -> Result<Vec<PathBuf>> {
    paths.iter().map(|path| absolute(path)).collect()
}
