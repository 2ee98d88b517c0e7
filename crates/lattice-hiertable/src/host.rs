//! Collaborators outside the table set: the hosting frame and the relation painter.

use crate::error::Result;
use crate::node::DividerNode;
use crate::view::ViewportSnapshot;

/// The component frame that hosts the table hierarchy.
pub trait HostFrame {
    /// Current frame width, or `None` while the frame is not laid out.
    fn frame_width(&self) -> Option<f64>;

    /// Ask the frame manager to resize the frame to `width`.
    ///
    /// Return [`HierError::HostUnavailable`](crate::HierError::HostUnavailable)
    /// when the frame cannot be resized right now; the request is retried on
    /// the next width change.
    fn request_width(&mut self, width: f64) -> Result<()>;
}

/// Paints the relation lines a divider draws between its two tables.
pub trait RelationPainter {
    /// Repaint `divider` for the current viewports of its neighbors.
    fn repaint(
        &mut self,
        divider: &DividerNode,
        left: &ViewportSnapshot,
        right: &ViewportSnapshot,
    ) -> Result<()>;
}
