use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Deserializer, Serialize};

use super::Priority;

/// Opaque identifier for a task.
///
/// Fresh ids are UUID v4 strings; ids read back from storage are taken
/// verbatim, whatever their shape.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaskId(pub String);

impl TaskId {
    pub fn new(id: impl Into<String>) -> Self {
        TaskId(id.into())
    }

    pub fn generate() -> Self {
        TaskId(uuid::Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// First eight characters, for compact list output.
    pub fn short(&self) -> &str {
        match self.0.char_indices().nth(8) {
            Some((idx, _)) => &self.0[..idx],
            None => &self.0,
        }
    }
}

impl std::fmt::Display for TaskId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for TaskId {
    fn from(s: String) -> Self {
        TaskId(s)
    }
}

impl From<&str> for TaskId {
    fn from(s: &str) -> Self {
        TaskId(s.to_string())
    }
}

/// A single to-do item.
///
/// Serialized with camelCase keys; optional fields are omitted when absent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: TaskId,
    pub title: String,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "blank_as_none"
    )]
    pub description: Option<String>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "blank_date_as_none"
    )]
    pub due_date: Option<NaiveDate>,
    pub priority: Priority,
    #[serde(default)]
    pub completed: bool,
    pub created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
}

/// Caller-supplied fields for a new task.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NewTask {
    pub title: String,
    pub description: Option<String>,
    pub due_date: Option<NaiveDate>,
    pub priority: Priority,
}

impl NewTask {
    pub fn new(title: impl Into<String>, priority: Priority) -> Self {
        Self {
            title: title.into(),
            priority,
            ..Self::default()
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_due_date(mut self, due: NaiveDate) -> Self {
        self.due_date = Some(due);
        self
    }
}

/// Partial update applied by an edit.
///
/// `None` leaves a field alone. For the optional fields, `Some(None)` clears
/// the value and `Some(Some(v))` replaces it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskPatch {
    pub title: Option<String>,
    pub description: Option<Option<String>>,
    pub due_date: Option<Option<NaiveDate>>,
    pub priority: Option<Priority>,
}

impl TaskPatch {
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.description.is_none()
            && self.due_date.is_none()
            && self.priority.is_none()
    }

    /// A patch that would blank out the title is not applicable.
    pub fn is_valid(&self) -> bool {
        self.title.as_deref().map_or(true, |t| !t.trim().is_empty())
    }
}

impl Task {
    /// Build a fresh, incomplete task.
    ///
    /// Returns `None` when the title is empty or whitespace only.
    pub fn create(new: NewTask, id: TaskId, now: DateTime<Utc>) -> Option<Self> {
        let title = new.title.trim();
        if title.is_empty() {
            return None;
        }
        Some(Task {
            id,
            title: title.to_string(),
            description: new.description.filter(|d| !d.trim().is_empty()),
            due_date: new.due_date,
            priority: new.priority,
            completed: false,
            created_at: now,
            tags: None,
        })
    }

    pub fn toggle(&mut self) {
        self.completed = !self.completed;
    }

    /// Merge `patch` onto this task. `id`, `created_at` and `completed` are
    /// never touched.
    pub fn apply(&mut self, patch: &TaskPatch) {
        if let Some(title) = &patch.title {
            self.title = title.trim().to_string();
        }
        if let Some(description) = &patch.description {
            self.description = description.clone().filter(|d| !d.trim().is_empty());
        }
        if let Some(due) = patch.due_date {
            self.due_date = due;
        }
        if let Some(priority) = patch.priority {
            self.priority = priority;
        }
    }
}

fn blank_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    Ok(raw.filter(|s| !s.trim().is_empty()))
}

// Older records wrote "" for "no due date", and some carried a full ISO
// timestamp; only the date part is kept.
fn blank_date_as_none<'de, D>(deserializer: D) -> Result<Option<NaiveDate>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    let Some(raw) = raw else {
        return Ok(None);
    };
    let date_part = raw.trim().split('T').next().unwrap_or_default();
    if date_part.is_empty() {
        return Ok(None);
    }
    NaiveDate::parse_from_str(date_part, "%Y-%m-%d")
        .map(Some)
        .map_err(serde::de::Error::custom)
}
