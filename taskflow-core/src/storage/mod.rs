pub mod file;
pub mod memory;

pub use file::FileStore;
pub use memory::MemoryStore;

use crate::error::StoreError;

/// Key holding the serialized task list.
pub const TASKS_KEY: &str = "tasks";

/// Key holding the serialized mood.
pub const MOOD_KEY: &str = "mood";

/// Port for the local key-value storage backing a task store.
///
/// Values are JSON text. A write must be durable when `set` returns; the
/// task store relies on that to report each mutation as saved.
pub trait KeyValueStore {
    /// Read the value for `key`, or `None` if it was never written.
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;

    /// Create or overwrite the value for `key`.
    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError>;

    /// Delete `key`. Removing a missing key is not an error.
    fn remove(&mut self, key: &str) -> Result<(), StoreError>;
}
