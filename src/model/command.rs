use std::fmt;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StageKind {
    Mapping,
    Extraction,
    Preparation,
    Evaluation,
}

impl fmt::Display for StageKind {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(match self {
            Self::Mapping => "mapping",
            Self::Extraction => "extraction",
            Self::Preparation => "preparation",
            Self::Evaluation => "evaluation",
        })
    }
}

/// Audit record of one external invocation issued by a stage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExternalCommand {
    pub stage: StageKind,
    pub command: String,
}

impl ExternalCommand {
    pub fn new(stage: StageKind, command: impl Into<String>) -> Self {
        Self {
            stage,
            command: command.into(),
        }
    }
}

impl fmt::Display for ExternalCommand {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(&self.command)
    }
}

/// Trajectory state reported by the mapping engine. Only `ACTIVE` is meaningful here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrajectoryState(pub i32);

impl TrajectoryState {
    pub const ACTIVE: Self = Self(0);

    pub fn is_active(self) -> bool {
        self == Self::ACTIVE
    }
}
