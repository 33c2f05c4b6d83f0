//! Ports - the engine's abstraction seams.
//!
//! Each trait hides one external collaborator (wall clock, task table,
//! chat-ops webhook) so the decision logic can be exercised in tests with
//! fixed clocks and in-memory fakes. Production implementations live in
//! the daemon crate; development/test implementations live in `impls`.

pub mod clock;
pub mod notifier;
pub mod task_source;

pub use self::clock::{Clock, FixedClock, SystemClock};
pub use self::notifier::{AlertKind, Notifier};
pub use self::task_source::TaskSource;
