mod command;
mod error;
mod paths;
mod projection;
mod run;


pub use command::{ExternalCommand, StageKind, TrajectoryState};
pub use error::{ModelError, Result};
pub use paths::PathSet;
pub use projection::{Projection, TrajectoryScope};
pub use run::{Dimension, NodeMode, OdometrySource, PipelineRun, PoseSource, SkipFlags, Tolerances};
