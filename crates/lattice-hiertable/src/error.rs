//! Error types for the table hierarchy.

/// Result type alias for hierarchy operations.
pub type Result<T> = std::result::Result<T, HierError>;

/// Errors raised by the hierarchy or by its collaborators.
///
/// None of these are fatal. Event entry points on
/// [`HierarchyContainer`](crate::HierarchyContainer) log them and degrade to
/// stale visual alignment, which the next genuine scroll or rebuild repairs.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum HierError {
    /// A grid view failed while aligning with its neighbor.
    #[error("Failed to align table at level {level}: {message}")]
    Alignment { level: usize, message: String },

    /// A relation divider failed to repaint.
    #[error("Failed to refresh relation divider: {message}")]
    DividerRefresh { message: String },

    /// An adapter passed to a rebuild is missing or corrupted.
    #[error("Invalid adapter at position {index}: {reason}")]
    InvalidAdapter { index: usize, reason: String },

    /// The hosting frame cannot take resize requests right now.
    #[error("Hosting frame is unavailable")]
    HostUnavailable,

    /// A node key no longer refers to a live node.
    #[error("Unknown or released table node")]
    UnknownNode,
}

impl HierError {
    /// Create an alignment error.
    pub fn alignment(level: usize, message: impl Into<String>) -> Self {
        Self::Alignment {
            level,
            message: message.into(),
        }
    }

    /// Create a divider refresh error.
    pub fn divider_refresh(message: impl Into<String>) -> Self {
        Self::DividerRefresh {
            message: message.into(),
        }
    }

    /// Create an invalid adapter error.
    pub fn invalid_adapter(index: usize, reason: impl Into<String>) -> Self {
        Self::InvalidAdapter {
            index,
            reason: reason.into(),
        }
    }
}
