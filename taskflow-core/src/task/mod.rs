pub mod aggregate;
pub mod ordering;
pub mod priority;

pub use aggregate::{NewTask, Task, TaskId, TaskPatch};
pub use ordering::sort_tasks;
pub use priority::calculate_priority;

use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::error::ParseEnumError;

/// User-assigned urgency of a task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    High,
    #[default]
    Medium,
    Low,
}

impl Priority {
    pub const ALL: [Priority; 3] = [Priority::High, Priority::Medium, Priority::Low];

    pub fn as_str(&self) -> &'static str {
        match self {
            Priority::High => "high",
            Priority::Medium => "medium",
            Priority::Low => "low",
        }
    }

    /// Sort rank: high first.
    pub fn rank(&self) -> u8 {
        match self {
            Priority::High => 0,
            Priority::Medium => 1,
            Priority::Low => 2,
        }
    }

    /// Single-character marker for list views.
    pub fn icon(&self) -> &'static str {
        match self {
            Priority::High => "!",
            Priority::Medium => "·",
            Priority::Low => " ",
        }
    }
}

impl std::fmt::Display for Priority {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Priority {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "high" => Ok(Priority::High),
            "medium" => Ok(Priority::Medium),
            "low" => Ok(Priority::Low),
            _ => Err(ParseEnumError::new("priority", s, "high, medium, low")),
        }
    }
}
