use serde::{Deserialize, Serialize};

use crate::model::{ExternalCommand, PathSet, PoseSource, StageKind};

/// Outcome of one successful evaluation run.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RunReport {
    pub test_name: String,
    pub robot: String,
    pub pose_source: PoseSource,
    pub paths: PathSet,
    /// Every external command issued by a stage, in execution order.
    pub commands: Vec<ExternalCommand>,
    /// Stages turned off by skip flags.
    pub skipped: Vec<StageKind>,
    pub duration_ms: u128,
}

impl RunReport {
    pub fn commands_of(&self, stage: StageKind) -> impl Iterator<Item = &ExternalCommand> {
        self.commands
            .iter()
            .filter(move |command| command.stage == stage)
    }

    /// Rendered commands separated by blank lines.
    pub fn audit_log(&self) -> String {
        self.commands
            .iter()
            .map(|command| command.command.as_str())
            .collect::<Vec<_>>()
            .join("\n\n")
    }
}
