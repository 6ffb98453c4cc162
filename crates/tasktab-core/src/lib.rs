//! Categories of tasks, the operations that mutate them, and the snapshot
//! that carries them across sessions through a key-value storage.

pub mod due;
pub mod persist;
pub mod storage;
pub mod store;
pub mod task;
pub mod view;

pub use persist::Snapshot;
pub use storage::{KeyValueStorage, MemoryStorage};
pub use store::{CategoryRename, TaskEdit, TaskStore, Theme};
pub use task::{Category, Priority, Task, TaskId};
pub use view::TaskView;
