mod context;
mod error;
mod launch_service;
mod pipeline_service;

pub use context::AppContext;
pub use error::{AppError, Result};
pub use launch_service::LaunchService;
pub use pipeline_service::PipelineService;
