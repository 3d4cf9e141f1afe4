//! The task store: single owner of the task list, filter and mood.
//!
//! Every operation is a synchronous state transition. List mutations compute
//! the next list, write all of it to the backing, and only then replace the
//! in-memory copy, so a failed write leaves both sides at the previous state.
//!
//! Not-found ids and blank titles are not errors: the affected operations
//! return `Ok(false)` / `Ok(None)` and touch nothing.
//!
//! There is no locking between processes sharing a backing. Each store holds
//! its own copy and the last writer wins.

use chrono::Utc;
use tracing::{debug, info, warn};

use crate::error::StoreError;
use crate::filter::Filter;
use crate::mood::Mood;
use crate::stats::{PriorityBreakdown, Stats};
use crate::storage::{KeyValueStore, MOOD_KEY, TASKS_KEY};
use crate::task::{NewTask, Task, TaskId, TaskPatch};

#[derive(Debug)]
pub struct TaskStore<S: KeyValueStore> {
    backend: S,
    tasks: Vec<Task>,
    filter: Filter,
    mood: Option<Mood>,
    stats: Stats,
}

impl<S: KeyValueStore> TaskStore<S> {
    /// Rehydrate from `backend`.
    ///
    /// Missing, unreadable or corrupt entries fall back to an empty list and
    /// no mood. The filter always starts at [`Filter::All`].
    pub fn open(backend: S) -> Self {
        let tasks: Vec<Task> = load_json(&backend, TASKS_KEY).unwrap_or_default();
        let mood: Option<Mood> = load_json(&backend, MOOD_KEY);
        let stats = Stats::from_tasks(&tasks);
        info!(tasks = tasks.len(), mood = ?mood, "task store opened");
        Self {
            backend,
            tasks,
            filter: Filter::All,
            mood,
            stats,
        }
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn get(&self, id: &TaskId) -> Option<&Task> {
        self.tasks.iter().find(|t| &t.id == id)
    }

    pub fn stats(&self) -> Stats {
        self.stats
    }

    /// Completed tasks per priority.
    pub fn breakdown(&self) -> PriorityBreakdown {
        PriorityBreakdown::completed(&self.tasks)
    }

    pub fn filter(&self) -> Filter {
        self.filter
    }

    pub fn mood(&self) -> Option<Mood> {
        self.mood
    }

    pub fn backend(&self) -> &S {
        &self.backend
    }

    pub fn into_backend(self) -> S {
        self.backend
    }

    /// Append a new task.
    ///
    /// Returns `Ok(None)` without touching anything when the title is blank.
    pub fn add_task(&mut self, new: NewTask) -> Result<Option<TaskId>, StoreError> {
        let Some(task) = Task::create(new, self.fresh_id(), Utc::now()) else {
            debug!("rejected task with blank title");
            return Ok(None);
        };
        let id = task.id.clone();
        let mut next = self.tasks.clone();
        next.push(task);
        self.commit(next)?;
        debug!(id = %id, "task added");
        Ok(Some(id))
    }

    /// Flip completion on the task with `id`. `Ok(false)` if there is none.
    pub fn toggle_complete(&mut self, id: &TaskId) -> Result<bool, StoreError> {
        let Some(idx) = self.position(id) else {
            debug!(id = %id, "toggle ignored: no such task");
            return Ok(false);
        };
        let mut next = self.tasks.clone();
        next[idx].toggle();
        let completed = next[idx].completed;
        self.commit(next)?;
        debug!(id = %id, completed, "task toggled");
        Ok(true)
    }

    /// Merge `patch` onto the task with `id`.
    ///
    /// `Ok(false)` if there is no such task or the patch would blank the
    /// title. Id, creation time and completion are never changed here.
    pub fn edit_task(&mut self, id: &TaskId, patch: &TaskPatch) -> Result<bool, StoreError> {
        if !patch.is_valid() {
            debug!(id = %id, "edit ignored: blank title");
            return Ok(false);
        }
        let Some(idx) = self.position(id) else {
            debug!(id = %id, "edit ignored: no such task");
            return Ok(false);
        };
        let mut next = self.tasks.clone();
        next[idx].apply(patch);
        self.commit(next)?;
        debug!(id = %id, "task edited");
        Ok(true)
    }

    /// Remove the task with `id`. `Ok(false)` if there is none.
    pub fn delete_task(&mut self, id: &TaskId) -> Result<bool, StoreError> {
        let Some(idx) = self.position(id) else {
            debug!(id = %id, "delete ignored: no such task");
            return Ok(false);
        };
        let mut next = self.tasks.clone();
        next.remove(idx);
        self.commit(next)?;
        debug!(id = %id, "task deleted");
        Ok(true)
    }

    pub fn set_filter(&mut self, filter: Filter) {
        self.filter = filter;
    }

    /// Tasks matching the current filter, in list order.
    pub fn filtered_tasks(&self) -> Vec<&Task> {
        self.filter.apply(&self.tasks)
    }

    /// Set and persist the mood. Only the mood entry is written.
    pub fn set_mood(&mut self, mood: Mood) -> Result<(), StoreError> {
        let value = to_json(MOOD_KEY, &mood)?;
        self.backend.set(MOOD_KEY, &value)?;
        self.mood = Some(mood);
        debug!(mood = %mood, "mood set");
        Ok(())
    }

    /// Forget the mood, removing its stored entry.
    pub fn clear_mood(&mut self) -> Result<(), StoreError> {
        self.backend.remove(MOOD_KEY)?;
        self.mood = None;
        debug!("mood cleared");
        Ok(())
    }

    fn position(&self, id: &TaskId) -> Option<usize> {
        self.tasks.iter().position(|t| &t.id == id)
    }

    fn fresh_id(&self) -> TaskId {
        loop {
            let id = TaskId::generate();
            if self.position(&id).is_none() {
                return id;
            }
        }
    }

    /// Persist `next` in full, then make it current and recompute stats.
    fn commit(&mut self, next: Vec<Task>) -> Result<(), StoreError> {
        let value = to_json(TASKS_KEY, &next)?;
        self.backend.set(TASKS_KEY, &value)?;
        self.tasks = next;
        self.stats = Stats::from_tasks(&self.tasks);
        Ok(())
    }
}

fn to_json<T: serde::Serialize + ?Sized>(key: &str, value: &T) -> Result<String, StoreError> {
    serde_json::to_string(value).map_err(|source| StoreError::Serialize {
        key: key.to_string(),
        source,
    })
}

fn load_json<S, T>(backend: &S, key: &str) -> Option<T>
where
    S: KeyValueStore,
    T: serde::de::DeserializeOwned,
{
    let raw = match backend.get(key) {
        Ok(Some(raw)) => raw,
        Ok(None) => return None,
        Err(e) => {
            warn!(key, error = %e, "could not read stored entry, starting without it");
            return None;
        }
    };
    match serde_json::from_str(&raw) {
        Ok(value) => Some(value),
        Err(e) => {
            warn!(key, error = %e, "stored entry is corrupt, starting without it");
            None
        }
    }
}
