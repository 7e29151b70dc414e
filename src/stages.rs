mod error;
mod evaluation;
mod extraction;
mod mapping;
mod preparation;
mod recorder;


pub use error::{Result, StageError};
pub use evaluation::evaluate;
pub use extraction::extract;
pub use mapping::{parse_trajectory_state, run_mapping, wait_for_trajectory_completion};
pub use preparation::{PreparationRequest, PreparedPoses, prepare};
pub use recorder::{ODOMETRY_SOURCE_FRAME, start_recorder, stop_recorder};
