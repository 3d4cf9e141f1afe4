use std::str::FromStr;

use crate::error::ParseEnumError;
use crate::task::{Priority, Task};

/// Transient view selector over the task list. Never persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Filter {
    #[default]
    All,
    Completed,
    Pending,
    High,
}

impl Filter {
    pub fn as_str(&self) -> &'static str {
        match self {
            Filter::All => "all",
            Filter::Completed => "completed",
            Filter::Pending => "pending",
            Filter::High => "high",
        }
    }

    pub fn matches(&self, task: &Task) -> bool {
        match self {
            Filter::All => true,
            Filter::Completed => task.completed,
            Filter::Pending => !task.completed,
            Filter::High => task.priority == Priority::High,
        }
    }

    /// Tasks passing the filter, in their original order.
    pub fn apply<'a>(&self, tasks: &'a [Task]) -> Vec<&'a Task> {
        tasks.iter().filter(|t| self.matches(t)).collect()
    }
}

impl std::fmt::Display for Filter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Filter {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "all" => Ok(Filter::All),
            "completed" => Ok(Filter::Completed),
            "pending" => Ok(Filter::Pending),
            "high" => Ok(Filter::High),
            _ => Err(ParseEnumError::new(
                "filter",
                s,
                "all, completed, pending, high",
            )),
        }
    }
}
