//! Logging facilities for Lattice hierarchical tables.
//!
//! All instrumentation goes through the `tracing` crate. The library never
//! installs a subscriber; applications choose one:
//!
//! ```ignore
//! tracing_subscriber::fmt()
//!     .with_env_filter("lattice_hiertable::scroll=trace")
//!     .init();
//! ```
//!
//! Failures inside event handlers (a grid that could not align, a host frame
//! that is not attached yet) are logged rather than returned, so the targets
//! below are the way to observe them.

/// Span names used for tracing.
pub mod span_names {
    /// Structural rebuild of the node sequence.
    pub const REBUILD: &str = "lattice_hiertable::rebuild";
    /// Scroll propagation across levels.
    pub const SCROLL: &str = "lattice_hiertable::scroll";
    /// Content-width cascade to the host frame.
    pub const CASCADE: &str = "lattice_hiertable::cascade";
}

/// Target names for log filtering.
pub mod targets {
    /// Node sequence rebuild and teardown.
    pub const HIERARCHY: &str = "lattice_hiertable::hierarchy";
    /// Scroll propagation.
    pub const SCROLL: &str = "lattice_hiertable::scroll";
    /// Width cascade and host resize requests.
    pub const WIDTH: &str = "lattice_hiertable::width";
    /// Performance spans.
    pub const PERF: &str = "lattice_hiertable::perf";
    /// Signal emission.
    pub const SIGNAL: &str = "lattice_hiertable_core::signal";
    /// Deferred task queue.
    pub const TASK: &str = "lattice_hiertable_core::task";
}

/// A guard that keeps a tracing span entered until dropped.
///
/// This is useful for tracking the duration of operations.
#[derive(Debug)]
pub struct PerfSpan {
    _span: tracing::span::EnteredSpan,
}

impl PerfSpan {
    /// Create and enter a new performance span.
    pub fn new(name: &'static str) -> Self {
        let span = tracing::info_span!(target: targets::PERF, "perf", operation = name);
        Self {
            _span: span.entered(),
        }
    }
}
