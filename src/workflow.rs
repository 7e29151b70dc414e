mod error;
mod execute;
mod io;
mod report;

#[cfg(test)]
mod tests;

pub use error::{PipelineError, Result};
pub use execute::{Pipeline, run_pipeline};
pub use io::save_report;
pub use report::RunReport;
