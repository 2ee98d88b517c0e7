//! The widget side of a table.
//!
//! A [`GridView`] is the scrollable grid that renders one collection level.
//! The hierarchy drives it through this trait and never looks at rows or
//! columns itself.

use crate::adapter::AdapterRef;
use crate::error::Result;

/// The visible window of a grid at one moment.
///
/// Alignment copies the neighbor's snapshot before moving a grid, so the grid
/// being moved never needs access to its neighbor.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ViewportSnapshot {
    /// Index of the first row at least partly visible.
    pub first_visible_row: usize,
    /// Index of the last row at least partly visible.
    pub last_visible_row: usize,
    /// Vertical scroll offset in pixels.
    pub scroll_top: f64,
}

impl ViewportSnapshot {
    /// Create a snapshot.
    pub fn new(first_visible_row: usize, last_visible_row: usize, scroll_top: f64) -> Self {
        Self {
            first_visible_row,
            last_visible_row,
            scroll_top,
        }
    }

    /// Whether `row` lies inside the visible window.
    pub fn contains_row(&self, row: usize) -> bool {
        (self.first_visible_row..=self.last_visible_row).contains(&row)
    }

    /// Number of rows in the visible window.
    pub fn visible_rows(&self) -> usize {
        self.last_visible_row.saturating_sub(self.first_visible_row) + 1
    }
}

/// Scroll events a grid raised while it was being aligned.
///
/// Moving a grid's viewport makes the grid fire its own scroll event. A grid
/// reports that here instead of calling back into the hierarchy; the
/// coordinator dispatches each raised event before the alignment walk moves
/// on, exactly as if the grid had called back synchronously.
#[derive(Debug, Default)]
pub struct ScrollEchoes {
    raised: usize,
}

impl ScrollEchoes {
    /// Create an empty sink.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record that the grid fired a scroll event.
    pub fn raise(&mut self) {
        self.raised += 1;
    }

    /// Number of events recorded and not yet dispatched.
    pub fn pending(&self) -> usize {
        self.raised
    }

    /// Take the recorded events, leaving the sink empty.
    pub fn take(&mut self) -> usize {
        std::mem::take(&mut self.raised)
    }
}

/// A scrollable grid bound to one adapter.
pub trait GridView {
    /// The grid's current visible window.
    fn viewport(&self) -> ViewportSnapshot;

    /// Scroll so the parent cases of the rows visible in the grid to the
    /// right are visible here.
    ///
    /// Returns `true` if the viewport moved.
    fn scroll_to_align_with_right(
        &mut self,
        right: &ViewportSnapshot,
        echoes: &mut ScrollEchoes,
    ) -> Result<bool>;

    /// Scroll so the child cases of the rows visible in the grid to the left
    /// are visible here.
    ///
    /// Returns `true` if the viewport moved.
    fn scroll_to_align_with_left(
        &mut self,
        left: &ViewportSnapshot,
        echoes: &mut ScrollEchoes,
    ) -> Result<bool>;

    /// Redraw everything.
    fn refresh(&mut self) {}

    /// Re-apply the current scroll offset, e.g. after the view was re-attached.
    fn refresh_scroll(&mut self) {}

    /// Rebuild column headers from the adapter.
    fn update_column_info(&mut self) {}

    /// Reload row contents from the adapter.
    fn update_row_data(&mut self) {}

    /// Pick up a changed row count, optionally re-indexing every row.
    fn update_row_count(&mut self, _force_redraw: bool) {}

    /// Re-apply selection highlighting.
    fn update_selected_rows(&mut self) {}

    /// Scroll the current selection into view.
    fn scroll_selection_into_view(&mut self) {}

    /// Release widget resources. Called once, when the table node is released.
    fn teardown(&mut self) {}
}

/// Creates grid views for adapters that do not have a table node yet.
pub trait GridViewFactory {
    /// Create a view for `adapter`.
    fn create_view(&mut self, adapter: &AdapterRef) -> Box<dyn GridView>;
}

impl<F> GridViewFactory for F
where
    F: FnMut(&AdapterRef) -> Box<dyn GridView>,
{
    fn create_view(&mut self, adapter: &AdapterRef) -> Box<dyn GridView> {
        self(adapter)
    }
}
