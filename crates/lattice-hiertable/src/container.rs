//! The hierarchy container: owner of the table/divider sequence.
//!
//! [`HierarchyContainer`] holds one [`GridNode`] per collection level, laid out
//! left to right from the outermost collection, with a [`DividerNode`] between
//! each adjacent pair. It is the single entry point for the grid widgets'
//! events and for the data layer's structural changes.
//!
//! # Example
//!
//! ```ignore
//! use lattice_hiertable::{HierarchyContainer, HierLayoutConfig};
//!
//! let mut hierarchy = HierarchyContainer::new(|adapter: &AdapterRef| {
//!     Box::new(CaseGrid::new(adapter.clone())) as Box<dyn GridView>
//! });
//! hierarchy.set_host(Some(Box::new(component_frame)));
//!
//! hierarchy.set_nodes([people.clone(), measurements.clone()]);
//! hierarchy.process_deferred();
//!
//! // Wired to the grid widgets:
//! hierarchy.on_scroll(key);
//! hierarchy.notify_width_changed(key, 240.0);
//! ```

use lattice_hiertable_core::logging::{span_names, targets};
use lattice_hiertable_core::{PerfSpan, Signal, TaskQueue};

use crate::adapter::{AdapterId, AdapterRef};
use crate::config::HierLayoutConfig;
use crate::error::{HierError, Result};
use crate::host::{HostFrame, RelationPainter};
use crate::node::{DividerKey, DividerNode, GridKey, GridNode, HierNode, NodeArena};
use crate::scroll::{ScrollCoordinator, ScrollDisposition};
use crate::view::{GridView, GridViewFactory};
use crate::width::{WidthCascadeController, WidthChange};

/// Work the container defers until [`HierarchyContainer::process_deferred`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeferredAction {
    /// Recompute the tiled layout width.
    Retile,
    /// Recompute the content width and offer it to the hosting frame.
    CascadeWidth,
}

/// Owns the ordered table/divider sequence of a hierarchical case table.
///
/// # Signals
///
/// - `nodes_rebuilt(usize)`: after every rebuild, with the number of tables
/// - `divider_refresh_requested(DividerKey)`: a divider must redraw its relation lines
/// - `ready_changed(bool)`: initial construction completed, or the container was re-armed
/// - `resize_requested(f64)`: a width request was delivered to the hosting frame
/// - `layout_changed(f64)`: the tiled layout width was recomputed
pub struct HierarchyContainer {
    config: HierLayoutConfig,
    factory: Box<dyn GridViewFactory>,
    nodes: NodeArena,
    scroll: ScrollCoordinator,
    width: WidthCascadeController,
    painter: Option<Box<dyn RelationPainter>>,
    deferred: TaskQueue<DeferredAction>,
    tiled_width: f64,

    /// Emitted after every rebuild with the number of tables.
    pub nodes_rebuilt: Signal<usize>,
    /// Emitted whenever a divider is marked for refresh.
    pub divider_refresh_requested: Signal<DividerKey>,
    /// Emitted when readiness changes.
    pub ready_changed: Signal<bool>,
    /// Emitted with every width request delivered to the hosting frame.
    pub resize_requested: Signal<f64>,
    /// Emitted when the tiled layout width is recomputed.
    pub layout_changed: Signal<f64>,
}

impl HierarchyContainer {
    /// Create an empty container with the default layout configuration.
    pub fn new(factory: impl GridViewFactory + 'static) -> Self {
        Self::with_config(HierLayoutConfig::default(), factory)
    }

    /// Create an empty container with a custom layout configuration.
    pub fn with_config(config: HierLayoutConfig, factory: impl GridViewFactory + 'static) -> Self {
        Self {
            config,
            factory: Box::new(factory),
            nodes: NodeArena::default(),
            scroll: ScrollCoordinator::new(),
            width: WidthCascadeController::new(),
            painter: None,
            deferred: TaskQueue::new(),
            tiled_width: 0.0,
            nodes_rebuilt: Signal::new(),
            divider_refresh_requested: Signal::new(),
            ready_changed: Signal::new(),
            resize_requested: Signal::new(),
            layout_changed: Signal::new(),
        }
    }

    // =========================================================================
    // Collaborators
    // =========================================================================

    /// Attach or detach the hosting frame that receives resize requests.
    pub fn set_host(&mut self, host: Option<Box<dyn HostFrame>>) {
        self.width.set_host(host);
    }

    /// Attach or detach the painter that draws divider relation lines.
    pub fn set_relation_painter(&mut self, painter: Option<Box<dyn RelationPainter>>) {
        self.painter = painter;
    }

    /// The layout configuration.
    pub fn config(&self) -> &HierLayoutConfig {
        &self.config
    }

    /// Replace the layout configuration and schedule a relayout.
    pub fn set_config(&mut self, config: HierLayoutConfig) {
        if self.config != config {
            self.config = config;
            self.deferred.post_once(DeferredAction::Retile);
            self.deferred.post_once(DeferredAction::CascadeWidth);
        }
    }

    // =========================================================================
    // Structure
    // =========================================================================

    /// Rebuild the node sequence for `adapters`, outermost collection first.
    ///
    /// Tables are reused for adapters that already have one, created for new
    /// adapters and released for adapters that are no longer listed. Dividers
    /// are always recreated. Adapters that fail validation are skipped with a
    /// warning, as are repeated adapters. A width cascade is scheduled rather
    /// than run, because reused tables have not been laid out in their new
    /// positions yet.
    pub fn set_nodes<I>(&mut self, adapters: I)
    where
        I: IntoIterator<Item = AdapterRef>,
    {
        let _span = PerfSpan::new(span_names::REBUILD);
        if self.nodes.grids.is_empty() {
            self.rearm();
        }

        self.nodes.clear_dividers();

        let mut ordered: Vec<GridKey> = Vec::new();
        let mut created = 0usize;
        for (index, adapter) in adapters.into_iter().enumerate() {
            if let Err(err) = adapter.validate() {
                let err = HierError::invalid_adapter(index, err.to_string());
                tracing::warn!(target: targets::HIERARCHY, error = %err, "skipping adapter");
                continue;
            }

            let id = adapter.adapter_id();
            let key = match self.nodes.by_adapter.get(&id).copied() {
                Some(key) if ordered.contains(&key) => {
                    tracing::warn!(target: targets::HIERARCHY, index, adapter = %id, "skipping repeated adapter");
                    continue;
                }
                Some(key) => {
                    if let Some(grid) = self.nodes.grids.get_mut(key) {
                        grid.rebind(adapter);
                    }
                    key
                }
                None => {
                    let view = self.factory.create_view(&adapter);
                    let grid = GridNode::new(
                        adapter,
                        view,
                        self.config.initial_grid_width,
                        self.scroll.propagation_counter(),
                    );
                    let key = self.nodes.grids.insert(grid);
                    self.nodes.by_adapter.insert(id, key);
                    created += 1;
                    key
                }
            };
            ordered.push(key);
        }

        self.relink(&ordered);
        let released = self.release_unlisted(&ordered);
        if ordered.is_empty() {
            self.rearm();
        }

        for &key in &ordered {
            if let Some(grid) = self.nodes.grids.get_mut(key) {
                grid.view_mut().update_selected_rows();
            }
        }

        self.deferred.post_once(DeferredAction::CascadeWidth);

        tracing::debug!(
            target: targets::HIERARCHY,
            tables = ordered.len(),
            created,
            reused = ordered.len() - created,
            released,
            "rebuilt table hierarchy"
        );
        self.nodes_rebuilt.emit(ordered.len());
    }

    /// Link tables in `ordered` left to right and insert dividers between them.
    fn relink(&mut self, ordered: &[GridKey]) {
        let last = ordered.len().checked_sub(1);
        for (level, &key) in ordered.iter().enumerate() {
            let parent = level.checked_sub(1).map(|i| ordered[i]);
            let child = ordered.get(level + 1).copied();
            if let Some(grid) = self.nodes.grids.get_mut(key) {
                grid.level = level;
                grid.parent = parent;
                grid.child = child;
                grid.is_rightmost = Some(level) == last;
            }

            if let Some(parent) = parent {
                let divider = self.nodes.dividers.insert(DividerNode::new(parent, key));
                self.nodes.sequence.push(HierNode::Divider(divider));
            }
            self.nodes.sequence.push(HierNode::Grid(key));
        }
    }

    /// Release every table not in `ordered`. Returns how many were released.
    fn release_unlisted(&mut self, ordered: &[GridKey]) -> usize {
        let NodeArena {
            grids, by_adapter, ..
        } = &mut self.nodes;

        let mut released = 0;
        grids.retain(|key, grid| {
            if ordered.contains(&key) {
                true
            } else {
                grid.view_mut().teardown();
                released += 1;
                false
            }
        });
        by_adapter.retain(|_, key| grids.contains_key(*key));
        released
    }

    /// Remove one table and its adjacent divider, relinking its neighbors.
    pub fn remove_grid(&mut self, key: GridKey) -> Result<()> {
        self.nodes.grid(key).ok_or(HierError::UnknownNode)?;
        let remaining: Vec<AdapterRef> = self
            .nodes
            .grid_keys()
            .filter(|&k| k != key)
            .filter_map(|k| self.nodes.grid(k))
            .map(|grid| grid.adapter().clone())
            .collect();
        self.set_nodes(remaining);
        Ok(())
    }

    /// Release every table and reset propagation and readiness.
    pub fn teardown(&mut self) {
        for (_, grid) in self.nodes.grids.iter_mut() {
            grid.view_mut().teardown();
        }
        self.nodes = NodeArena::default();
        self.deferred.clear();
        self.rearm();
        tracing::debug!(target: targets::HIERARCHY, "tore down table hierarchy");
    }

    fn rearm(&mut self) {
        self.scroll.reset();
        self.tiled_width = 0.0;
        if self.width.reset() {
            self.ready_changed.emit(false);
        }
    }

    // =========================================================================
    // Queries
    // =========================================================================

    /// The full sequence, alternating tables and dividers.
    pub fn sequence(&self) -> &[HierNode] {
        &self.nodes.sequence
    }

    /// Table keys in sequence order.
    pub fn grid_keys(&self) -> Vec<GridKey> {
        self.nodes.grid_keys().collect()
    }

    /// Divider keys in sequence order.
    pub fn divider_keys(&self) -> Vec<DividerKey> {
        self.nodes.divider_keys().collect()
    }

    /// Tables in sequence order.
    pub fn grids(&self) -> impl Iterator<Item = (GridKey, &GridNode)> + '_ {
        self.nodes
            .grid_keys()
            .filter_map(|key| self.nodes.grid(key).map(|grid| (key, grid)))
    }

    /// Dividers in sequence order.
    pub fn dividers(&self) -> impl Iterator<Item = (DividerKey, &DividerNode)> + '_ {
        self.nodes
            .divider_keys()
            .filter_map(|key| self.nodes.dividers.get(key).map(|divider| (key, divider)))
    }

    /// Look up a table.
    pub fn grid(&self, key: GridKey) -> Option<&GridNode> {
        self.nodes.grid(key)
    }

    /// Look up a table mutably, e.g. to reach its view.
    pub fn grid_mut(&mut self, key: GridKey) -> Option<&mut GridNode> {
        self.nodes.grid_mut(key)
    }

    /// Look up a divider.
    pub fn divider(&self, key: DividerKey) -> Option<&DividerNode> {
        self.nodes.dividers.get(key)
    }

    /// The table bound to an adapter.
    pub fn grid_for_adapter(&self, id: AdapterId) -> Option<GridKey> {
        self.nodes.by_adapter.get(&id).copied()
    }

    /// The rightmost table.
    pub fn rightmost(&self) -> Option<GridKey> {
        self.nodes.grid_keys().last()
    }

    /// Number of tables.
    pub fn grid_count(&self) -> usize {
        self.nodes.grids.len()
    }

    /// Number of dividers.
    pub fn divider_count(&self) -> usize {
        self.nodes.dividers.len()
    }

    /// Whether the container holds no tables.
    pub fn is_empty(&self) -> bool {
        self.nodes.grids.is_empty()
    }

    /// The current scroll propagation generation.
    pub fn propagation_counter(&self) -> u64 {
        self.scroll.propagation_counter()
    }

    /// Whether the rightmost table has reported its first width.
    pub fn is_ready(&self) -> bool {
        self.width.is_ready()
    }

    /// Content width computed by the most recent cascade: the widest the
    /// hosting frame should let the user drag it.
    pub fn container_max_width(&self) -> Option<f64> {
        self.width.container_max_width()
    }

    /// Current layout width: every table size, every divider and the spacer.
    pub fn layout_width(&self) -> f64 {
        self.nodes.layout_width(&self.config)
    }

    /// Layout width as of the last retile.
    pub fn tiled_width(&self) -> f64 {
        self.tiled_width
    }

    /// Whether deferred work is waiting for [`process_deferred`](Self::process_deferred).
    pub fn has_pending_work(&self) -> bool {
        self.deferred.has_pending()
    }

    // =========================================================================
    // Grid Events
    // =========================================================================

    /// A table's viewport scrolled, by the user or by propagation.
    ///
    /// Returns how the event was handled, or `None` if propagation failed.
    /// Failures are logged and never escalate.
    pub fn on_scroll(&mut self, key: GridKey) -> Option<ScrollDisposition> {
        let _span = PerfSpan::new(span_names::SCROLL);
        let disposition = match self.scroll.on_scroll(&mut self.nodes, key) {
            Ok(disposition) => disposition,
            Err(err) => {
                tracing::warn!(target: targets::SCROLL, error = %err, "scroll propagation failed");
                return None;
            }
        };

        if matches!(disposition, ScrollDisposition::Propagated { .. }) {
            let bordering = self.nodes.dividers_bordering(key);
            self.refresh_dividers(&bordering);
        }
        Some(disposition)
    }

    /// A table's row count changed: redraw the dividers on either side of it.
    pub fn on_row_count_changed(&mut self, key: GridKey) {
        if self.nodes.grid(key).is_none() {
            tracing::warn!(target: targets::HIERARCHY, ?key, "row count change for unknown table ignored");
            return;
        }
        let bordering = self.nodes.dividers_bordering(key);
        self.refresh_dividers(&bordering);
    }

    /// A row was expanded or collapsed somewhere: redraw every divider.
    pub fn on_expand_collapse(&mut self) {
        let all: Vec<DividerKey> = self.nodes.divider_keys().collect();
        self.refresh_dividers(&all);
    }

    /// A table's grid view was replaced: redraw every divider.
    pub fn on_grid_view_changed(&mut self) {
        self.on_expand_collapse();
    }

    /// A table's content width changed.
    ///
    /// Returns what happened, or `None` if the key is stale.
    pub fn notify_width_changed(&mut self, key: GridKey, new_width: f64) -> Option<WidthChange> {
        let change = match self
            .width
            .width_changed(&mut self.nodes, &self.config, key, new_width)
        {
            Ok(change) => change,
            Err(err) => {
                tracing::warn!(target: targets::WIDTH, error = %err, "width change ignored");
                return None;
            }
        };

        if let WidthChange::Applied {
            resize,
            became_ready,
        } = change
        {
            self.deferred.post_once(DeferredAction::Retile);
            if let Some(width) = resize {
                self.resize_requested.emit(width);
            }
            if became_ready {
                tracing::debug!(target: targets::WIDTH, "table hierarchy ready");
                self.ready_changed.emit(true);
                self.deferred.post_once(DeferredAction::CascadeWidth);
            }
        }
        Some(change)
    }

    /// Recompute the content width now and offer it to the hosting frame.
    ///
    /// Returns the width requested, if any.
    pub fn cascade_width(&mut self) -> Option<f64> {
        let requested = self.width.cascade(&self.nodes, &self.config);
        if let Some(width) = requested {
            self.resize_requested.emit(width);
        }
        requested
    }

    /// Run every deferred action. Returns how many ran.
    pub fn process_deferred(&mut self) -> usize {
        let actions = self.deferred.drain();
        for action in &actions {
            match action {
                DeferredAction::Retile => self.retile(),
                DeferredAction::CascadeWidth => {
                    self.cascade_width();
                }
            }
        }
        actions.len()
    }

    fn retile(&mut self) {
        let width = self.nodes.layout_width(&self.config);
        if width != self.tiled_width {
            self.tiled_width = width;
            self.layout_changed.emit(width);
        }
    }

    /// Mark `keys` for refresh and repaint them.
    ///
    /// Stops at the first painter failure; the dividers after it are left
    /// for the next refresh.
    fn refresh_dividers(&mut self, keys: &[DividerKey]) {
        for &key in keys {
            let Some(divider) = self.nodes.dividers.get_mut(key) else {
                continue;
            };
            divider.mark_for_refresh();
            let divider = divider.clone();

            if let Some(painter) = self.painter.as_mut() {
                let viewports = self
                    .nodes
                    .grid(divider.left_table())
                    .zip(self.nodes.grid(divider.right_table()))
                    .map(|(left, right)| (left.viewport(), right.viewport()));
                let repainted = match viewports {
                    Some((left, right)) => painter.repaint(&divider, &left, &right),
                    None => Err(HierError::UnknownNode),
                };
                if let Err(err) = repainted {
                    tracing::warn!(target: targets::HIERARCHY, error = %err, "divider refresh failed");
                    return;
                }
            }
            self.divider_refresh_requested.emit(key);
        }
    }

    // =========================================================================
    // Broadcasts
    // =========================================================================

    fn for_each_view(&mut self, mut f: impl FnMut(&mut dyn GridView)) {
        let keys: Vec<GridKey> = self.nodes.grid_keys().collect();
        for key in keys {
            if let Some(grid) = self.nodes.grids.get_mut(key) {
                f(grid.view_mut());
            }
        }
    }

    /// Redraw every table.
    pub fn refresh(&mut self) {
        self.for_each_view(|view| view.refresh());
    }

    /// Re-apply every table's scroll offset, e.g. after the hierarchy was re-attached.
    pub fn refresh_scroll(&mut self) {
        self.for_each_view(|view| view.refresh_scroll());
    }

    /// Rebuild every table's column headers.
    pub fn update_column_info(&mut self) {
        self.for_each_view(|view| view.update_column_info());
    }

    /// Reload every table's rows.
    pub fn update_row_data(&mut self) {
        self.for_each_view(|view| view.update_row_data());
    }

    /// Pick up changed row counts in every table.
    pub fn update_row_count(&mut self, force_redraw: bool) {
        self.for_each_view(|view| view.update_row_count(force_redraw));
    }

    /// Re-apply selection highlighting in every table.
    pub fn update_selected_rows(&mut self) {
        self.for_each_view(|view| view.update_selected_rows());
    }

    /// Scroll the selection into view in every table.
    pub fn scroll_selection_into_view(&mut self) {
        self.for_each_view(|view| view.scroll_selection_into_view());
    }
}

impl std::fmt::Debug for HierarchyContainer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HierarchyContainer")
            .field("config", &self.config)
            .field("nodes", &self.nodes)
            .field("scroll", &self.scroll)
            .field("width", &self.width)
            .field("pending", &self.deferred.pending_count())
            .finish()
    }
}
