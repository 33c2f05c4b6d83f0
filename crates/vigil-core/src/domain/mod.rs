//! Domain model (tasks, categories, thresholds).

pub mod task;

pub use self::task::{Task, TaskCategory, Thresholds};
