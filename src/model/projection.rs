use std::fmt;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Projection {
    Xy,
    Xz,
    Yz,
}

impl Projection {
    /// Scoring order used by the evaluation stage.
    pub const ALL: [Projection; 3] = [Projection::Xy, Projection::Xz, Projection::Yz];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Xy => "xy",
            Self::Xz => "xz",
            Self::Yz => "yz",
        }
    }
}

impl fmt::Display for Projection {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TrajectoryScope {
    Global,
    Local,
}

impl TrajectoryScope {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Global => "global",
            Self::Local => "local",
        }
    }

    /// Channel the result poses of this scope are stored under in the result log.
    pub fn channel(self) -> &'static str {
        match self {
            Self::Global => "global_trajectory_0",
            Self::Local => "local_trajectory_0",
        }
    }
}
