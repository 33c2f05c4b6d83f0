//! App - the decision logic wired together.
//!
//! # Components
//! - **classifier**: partitions tasks into fresh vs timed-out and keeps
//!   the cumulative per-day timeout ledgers
//! - **cooldown**: per-task alert throttling
//! - **hours**: working-hours gate
//! - **daily**: once-per-day summary-and-reset state machine
//! - **message**: alert/summary body composition
//! - **engine**: owns all state and orchestrates one tick

pub mod classifier;
pub mod cooldown;
pub mod daily;
pub mod engine;
pub mod hours;
pub mod message;

pub use self::classifier::{Classification, TimeoutClassifier, TimeoutLedger};
pub use self::cooldown::CooldownTracker;
pub use self::daily::DailyCycle;
pub use self::engine::{Engine, EngineConfig, TickReport};
