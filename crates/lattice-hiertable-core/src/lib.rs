//! Core plumbing for Lattice hierarchical tables.
//!
//! This crate provides the single-threaded building blocks the hierarchy
//! engine in `lattice-hiertable` is assembled from:
//!
//! - **Signal/Slot System**: Observers of rebuilds, readiness and resize requests
//! - **Property System**: Value cells that report whether a write changed them
//! - **Task Queue**: Deferred work drained by its owner after the current event
//! - **Logging**: `tracing` targets, span names and a performance span guard
//!
//! # Example
//!
//! ```
//! use lattice_hiertable_core::{Property, Signal, TaskQueue};
//!
//! #[derive(Debug, PartialEq)]
//! enum Work {
//!     Cascade,
//! }
//!
//! let width = Property::new(0.0);
//! let width_changed = Signal::<f64>::new();
//! let mut deferred = TaskQueue::new();
//!
//! width_changed.connect(|w| println!("width is now {w}"));
//! if width.set(240.0) {
//!     width_changed.emit(240.0);
//!     deferred.post_once(Work::Cascade);
//! }
//! assert_eq!(deferred.drain(), vec![Work::Cascade]);
//! ```

pub mod logging;
pub mod property;
pub mod signal;
mod task;

pub use logging::PerfSpan;
pub use property::Property;
pub use signal::{ConnectionGuard, ConnectionId, Signal};
pub use task::{TaskId, TaskQueue};
