use std::cmp::Ordering;

use super::Task;

/// Return a copy of `tasks` in display order.
///
/// Pending tasks come before completed ones, then higher priority first.
/// When both tasks have a due date the earlier one wins; otherwise the more
/// recently created task comes first.
pub fn sort_tasks(tasks: &[Task]) -> Vec<Task> {
    let mut sorted = tasks.to_vec();
    sorted.sort_by(compare);
    sorted
}

fn compare(a: &Task, b: &Task) -> Ordering {
    if a.completed != b.completed {
        return a.completed.cmp(&b.completed);
    }
    if a.priority != b.priority {
        return a.priority.rank().cmp(&b.priority.rank());
    }
    if let (Some(da), Some(db)) = (a.due_date, b.due_date) {
        return da.cmp(&db);
    }
    b.created_at.cmp(&a.created_at)
}
