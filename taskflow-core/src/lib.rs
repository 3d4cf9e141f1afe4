pub mod config;
pub mod error;
pub mod filter;
pub mod init;
pub mod mood;
pub mod stats;
pub mod storage;
pub mod store;
pub mod task;

pub use error::StoreError;
pub use filter::Filter;
pub use mood::Mood;
pub use stats::{PriorityBreakdown, Stats};
pub use store::TaskStore;
