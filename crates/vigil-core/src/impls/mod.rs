//! In-memory port implementations for tests and local runs.
//!
//! Production implementations (Postgres source, webhook notifier) live in
//! the daemon crate; these exist so the engine can be exercised without
//! any I/O.

pub mod memory_source;
pub mod recording_notifier;

pub use self::memory_source::MemoryTaskSource;
pub use self::recording_notifier::RecordingNotifier;
