//! Gamification figures derived from the task list.
//!
//! Nothing here is stored; every value is recomputed from the current list.

use serde::Serialize;

use crate::task::{Priority, Task};

/// Points awarded per completed task.
pub const POINTS_PER_TASK: u64 = 10;

/// Points needed to advance one level.
pub const POINTS_PER_LEVEL: u64 = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Stats {
    pub total_tasks: usize,
    pub tasks_completed: usize,
    pub points: u64,
    pub level: u64,
}

impl Default for Stats {
    fn default() -> Self {
        Self::from_tasks(&[])
    }
}

impl Stats {
    pub fn from_tasks(tasks: &[Task]) -> Self {
        let tasks_completed = tasks.iter().filter(|t| t.completed).count();
        let points = tasks_completed as u64 * POINTS_PER_TASK;
        Self {
            total_tasks: tasks.len(),
            tasks_completed,
            points,
            level: points / POINTS_PER_LEVEL + 1,
        }
    }

    /// Share of tasks completed, as a whole percentage. 0 for an empty list.
    pub fn completion_rate(&self) -> u8 {
        if self.total_tasks == 0 {
            return 0;
        }
        let rate = (self.tasks_completed as f64 / self.total_tasks as f64) * 100.0;
        rate.round() as u8
    }

    /// Points still needed to reach the next level.
    pub fn points_to_next_level(&self) -> u64 {
        self.level * POINTS_PER_LEVEL - self.points
    }
}

/// Completed tasks counted per priority.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct PriorityBreakdown {
    pub high: usize,
    pub medium: usize,
    pub low: usize,
}

impl PriorityBreakdown {
    pub fn completed(tasks: &[Task]) -> Self {
        let mut breakdown = Self::default();
        for task in tasks.iter().filter(|t| t.completed) {
            match task.priority {
                Priority::High => breakdown.high += 1,
                Priority::Medium => breakdown.medium += 1,
                Priority::Low => breakdown.low += 1,
            }
        }
        breakdown
    }

    pub fn get(&self, priority: Priority) -> usize {
        match priority {
            Priority::High => self.high,
            Priority::Medium => self.medium,
            Priority::Low => self.low,
        }
    }
}
