mod command;
mod error;
mod runner;

#[cfg(test)]
pub(crate) mod scripted;

pub use command::CommandLine;
pub use error::{ProcessError, Result};
pub use runner::{ExitOutcome, ProcessRunner, RunningProcess, SystemRunner};
