//! The data-layer side of a table: one adapter per collection level.

use std::fmt;
use std::rc::Rc;

use crate::error::Result;

/// Stable identity of a case table adapter.
///
/// Two adapters with the same ID are the same collection level, so a rebuild
/// keeps the existing table node for it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AdapterId(u64);

impl AdapterId {
    /// Create an ID from a raw value.
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    /// Get the raw u64 value of this ID.
    pub fn as_u64(self) -> u64 {
        self.0
    }
}

impl fmt::Display for AdapterId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "adapter#{}", self.0)
    }
}

/// Describes one collection's rows for the table bound to it.
///
/// The hierarchy only needs identity, size information and a validity check;
/// everything else about the collection belongs to the grid view.
pub trait CaseAdapter {
    /// Stable identity of this adapter.
    fn adapter_id(&self) -> AdapterId;

    /// Human readable name of the collection, used in logs and debug output.
    fn collection_name(&self) -> &str {
        ""
    }

    /// Current number of cases (rows) in the collection.
    fn case_count(&self) -> usize;

    /// Intrinsic width of the table content in pixels.
    fn content_width(&self) -> f64;

    /// Check that the adapter still describes a live collection.
    ///
    /// A rebuild skips adapters that fail this check.
    fn validate(&self) -> Result<()> {
        Ok(())
    }
}

/// Shared handle to an adapter.
pub type AdapterRef = Rc<dyn CaseAdapter>;
