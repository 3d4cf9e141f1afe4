use chrono::NaiveDate;

use super::Priority;

/// Suggest a priority from how close the due date is.
///
/// - no due date       → `Low`
/// - due within 1 day  → `High` (includes overdue)
/// - due within 3 days → `Medium`
/// - later             → `Low`
///
/// Pure helper. The task store never calls it; callers opt in when they
/// want a priority derived for them.
pub fn calculate_priority(due: Option<NaiveDate>, today: NaiveDate) -> Priority {
    let Some(due) = due else {
        return Priority::Low;
    };
    let days = (due - today).num_days();
    if days <= 1 {
        Priority::High
    } else if days <= 3 {
        Priority::Medium
    } else {
        Priority::Low
    }
}
