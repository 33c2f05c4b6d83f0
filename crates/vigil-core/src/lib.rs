//! vigil-core
//!
//! Decision engine for the workflow-task timeout monitor.
//!
//! The engine polls a task source, classifies open tasks as timed-out by
//! category, deduplicates alerts through a cooldown tracker, fires a daily
//! summary once per calendar day, and snapshots its cumulative state so
//! counts survive restarts. Everything that touches the outside world goes
//! through a port trait so the engine can be tested with fixed clocks and
//! in-memory sources.
//!
//! # Module layout
//! - **domain**: task model (Task, TaskCategory, Thresholds)
//! - **ports**: abstraction seams (Clock, TaskSource, Notifier)
//! - **app**: engine logic (classifier, cooldown, daily cycle, tick orchestration)
//! - **snapshot**: durable full-replace persistence of timeout ledgers
//! - **impls**: in-memory port implementations for tests and local runs

pub mod app;
pub mod domain;
pub mod error;
pub mod impls;
pub mod ports;
pub mod snapshot;

pub use app::engine::{Engine, EngineConfig, TickReport};
pub use error::{NotifyError, SnapshotError, SourceError};
