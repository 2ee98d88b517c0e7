//! Table and divider nodes, and the arena that owns them.
//!
//! The container is the only owner of nodes. Parent/child links and divider
//! neighbors are [`GridKey`]s into the arena, never owning references, so the
//! mutual links between levels cannot form ownership cycles. A released node's
//! key simply stops resolving.

use std::collections::HashMap;

use slotmap::{SlotMap, new_key_type};

use crate::adapter::{AdapterId, AdapterRef};
use crate::config::HierLayoutConfig;
use crate::view::{GridView, ViewportSnapshot};

new_key_type! {
    /// Handle to a table node. Stays valid while the node's adapter keeps
    /// appearing in rebuilds.
    pub struct GridKey;

    /// Handle to a divider node. Dividers are recreated on every rebuild.
    pub struct DividerKey;
}

static_assertions::assert_impl_all!(GridKey: Copy, Send, Sync);

/// One level of the hierarchy: a scrollable grid bound to one adapter.
pub struct GridNode {
    adapter: AdapterRef,
    view: Box<dyn GridView>,
    pub(crate) level: usize,
    pub(crate) parent: Option<GridKey>,
    pub(crate) child: Option<GridKey>,
    pub(crate) scroll_event_counter: u64,
    pub(crate) is_rightmost: bool,
    pub(crate) size: f64,
    maximum_width: Option<f64>,
}

impl GridNode {
    pub(crate) fn new(
        adapter: AdapterRef,
        view: Box<dyn GridView>,
        initial_width: f64,
        generation: u64,
    ) -> Self {
        Self {
            adapter,
            view,
            level: 0,
            parent: None,
            child: None,
            scroll_event_counter: generation,
            is_rightmost: false,
            size: initial_width,
            maximum_width: None,
        }
    }

    /// The adapter this table is bound to.
    pub fn adapter(&self) -> &AdapterRef {
        &self.adapter
    }

    /// Identity of the bound adapter.
    pub fn adapter_id(&self) -> AdapterId {
        self.adapter.adapter_id()
    }

    /// Name of the bound collection.
    pub fn collection_name(&self) -> &str {
        self.adapter.collection_name()
    }

    /// Current number of cases in the bound collection.
    pub fn case_count(&self) -> usize {
        self.adapter.case_count()
    }

    /// Position of this table among the tables, outermost first.
    pub fn level(&self) -> usize {
        self.level
    }

    /// The table immediately to the left, if any.
    pub fn parent(&self) -> Option<GridKey> {
        self.parent
    }

    /// The table immediately to the right, if any.
    pub fn child(&self) -> Option<GridKey> {
        self.child
    }

    /// Last propagation generation this table acted on.
    pub fn scroll_event_counter(&self) -> u64 {
        self.scroll_event_counter
    }

    /// Whether this is the last table in the sequence.
    pub fn is_rightmost(&self) -> bool {
        self.is_rightmost
    }

    /// Laid-out width.
    pub fn size(&self) -> f64 {
        self.size
    }

    /// Most recently reported content width, `None` before the first report.
    pub fn maximum_width(&self) -> Option<f64> {
        self.maximum_width
    }

    /// The grid view.
    pub fn view(&self) -> &dyn GridView {
        self.view.as_ref()
    }

    /// The grid view, mutably.
    pub fn view_mut(&mut self) -> &mut dyn GridView {
        self.view.as_mut()
    }

    /// The grid's current visible window.
    pub fn viewport(&self) -> ViewportSnapshot {
        self.view.viewport()
    }

    /// Record a reported content width. Returns `false` if it is unchanged.
    pub(crate) fn set_maximum_width(&mut self, width: f64) -> bool {
        if self.maximum_width == Some(width) {
            return false;
        }
        self.maximum_width = Some(width);
        true
    }

    pub(crate) fn rebind(&mut self, adapter: AdapterRef) {
        self.adapter = adapter;
    }
}

impl std::fmt::Debug for GridNode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GridNode")
            .field("adapter", &self.adapter_id())
            .field("level", &self.level)
            .field("parent", &self.parent)
            .field("child", &self.child)
            .field("scroll_event_counter", &self.scroll_event_counter)
            .field("is_rightmost", &self.is_rightmost)
            .field("size", &self.size())
            .field("maximum_width", &self.maximum_width())
            .finish()
    }
}

/// Separator between two adjacent tables, drawing the relation lines.
#[derive(Debug, Clone, PartialEq)]
pub struct DividerNode {
    left_table: GridKey,
    right_table: GridKey,
    refresh_count: u32,
}

impl DividerNode {
    pub(crate) fn new(left_table: GridKey, right_table: GridKey) -> Self {
        Self {
            left_table,
            right_table,
            refresh_count: 0,
        }
    }

    /// The parent-level table on the left.
    pub fn left_table(&self) -> GridKey {
        self.left_table
    }

    /// The child-level table on the right.
    pub fn right_table(&self) -> GridKey {
        self.right_table
    }

    /// Whether `key` is one of the two tables this divider borders.
    pub fn borders(&self, key: GridKey) -> bool {
        self.left_table == key || self.right_table == key
    }

    /// How many times this divider has been marked for refresh.
    pub fn refresh_count(&self) -> u32 {
        self.refresh_count
    }

    pub(crate) fn mark_for_refresh(&mut self) {
        self.refresh_count += 1;
    }
}

/// An entry of the node sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HierNode {
    /// A table.
    Grid(GridKey),
    /// A divider between the tables before and after it.
    Divider(DividerKey),
}

impl HierNode {
    /// The table key, if this entry is a table.
    pub fn as_grid(self) -> Option<GridKey> {
        match self {
            Self::Grid(key) => Some(key),
            Self::Divider(_) => None,
        }
    }

    /// The divider key, if this entry is a divider.
    pub fn as_divider(self) -> Option<DividerKey> {
        match self {
            Self::Divider(key) => Some(key),
            Self::Grid(_) => None,
        }
    }
}

/// Storage for every node plus the ordered sequence.
#[derive(Debug, Default)]
pub(crate) struct NodeArena {
    pub(crate) grids: SlotMap<GridKey, GridNode>,
    pub(crate) dividers: SlotMap<DividerKey, DividerNode>,
    pub(crate) by_adapter: HashMap<AdapterId, GridKey>,
    pub(crate) sequence: Vec<HierNode>,
}

impl NodeArena {
    pub(crate) fn grid(&self, key: GridKey) -> Option<&GridNode> {
        self.grids.get(key)
    }

    pub(crate) fn grid_mut(&mut self, key: GridKey) -> Option<&mut GridNode> {
        self.grids.get_mut(key)
    }

    pub(crate) fn grid_keys(&self) -> impl Iterator<Item = GridKey> + '_ {
        self.sequence.iter().filter_map(|node| node.as_grid())
    }

    pub(crate) fn divider_keys(&self) -> impl Iterator<Item = DividerKey> + '_ {
        self.sequence.iter().filter_map(|node| node.as_divider())
    }

    pub(crate) fn dividers_bordering(&self, key: GridKey) -> Vec<DividerKey> {
        self.divider_keys()
            .filter(|&d| self.dividers.get(d).is_some_and(|divider| divider.borders(key)))
            .collect()
    }

    pub(crate) fn layout_width(&self, config: &HierLayoutConfig) -> f64 {
        config.layout_width(
            self.grid_keys()
                .filter_map(|key| self.grids.get(key))
                .map(|grid| grid.size()),
        )
    }

    pub(crate) fn clear_dividers(&mut self) {
        self.dividers.clear();
        self.sequence.clear();
    }
}
