//! Linked hierarchical case tables for Horizon Lattice.
//!
//! A hierarchical data set (people → measurements → samples, say) is shown
//! as one scrollable table per level, side by side, with a relation divider
//! between neighbors. This crate is the engine behind that view:
//!
//! - **Rebuild**: [`HierarchyContainer::set_nodes`] turns the data layer's
//!   ordered adapters into a table/divider sequence, reusing tables whose
//!   adapter survives
//! - **Scroll Synchronization**: [`HierarchyContainer::on_scroll`] realigns
//!   every other level so parents of visible rows stay visible, without
//!   feedback loops
//! - **Width Cascade**: [`HierarchyContainer::notify_width_changed`] resizes
//!   a table to its content and asks the hosting frame to shrink to fit
//!
//! The grid widget, the hosting frame and the relation-line painter are
//! collaborators behind the [`GridView`], [`HostFrame`] and
//! [`RelationPainter`] traits. Only a single linear chain of levels is
//! supported; one parent level with several sibling child levels is not.
//!
//! # Example
//!
//! ```
//! use std::rc::Rc;
//! use lattice_hiertable::{
//!     AdapterId, AdapterRef, CaseAdapter, GridView, HierarchyContainer, Result, ScrollEchoes,
//!     ViewportSnapshot,
//! };
//!
//! struct Collection(u64);
//!
//! impl CaseAdapter for Collection {
//!     fn adapter_id(&self) -> AdapterId {
//!         AdapterId::new(self.0)
//!     }
//!     fn case_count(&self) -> usize {
//!         0
//!     }
//!     fn content_width(&self) -> f64 {
//!         120.0
//!     }
//! }
//!
//! struct StaticGrid;
//!
//! impl GridView for StaticGrid {
//!     fn viewport(&self) -> ViewportSnapshot {
//!         ViewportSnapshot::default()
//!     }
//!     fn scroll_to_align_with_right(&mut self, _: &ViewportSnapshot, _: &mut ScrollEchoes) -> Result<bool> {
//!         Ok(false)
//!     }
//!     fn scroll_to_align_with_left(&mut self, _: &ViewportSnapshot, _: &mut ScrollEchoes) -> Result<bool> {
//!         Ok(false)
//!     }
//! }
//!
//! let mut hierarchy = HierarchyContainer::new(|_: &AdapterRef| Box::new(StaticGrid) as Box<dyn GridView>);
//! let parents: AdapterRef = Rc::new(Collection(1));
//! let children: AdapterRef = Rc::new(Collection(2));
//!
//! hierarchy.set_nodes([parents, children]);
//! assert_eq!(hierarchy.grid_count(), 2);
//! assert_eq!(hierarchy.divider_count(), 1);
//!
//! let left = hierarchy.grid_keys()[0];
//! hierarchy.on_scroll(left);
//! assert_eq!(hierarchy.propagation_counter(), 1);
//! ```

mod adapter;
mod config;
mod container;
pub mod debug;
mod error;
mod host;
mod node;
mod scroll;
mod view;
mod width;

pub use adapter::{AdapterId, AdapterRef, CaseAdapter};
pub use config::{
    DEFAULT_COLUMN_WIDTH, DEFAULT_DIVIDER_WIDTH, DEFAULT_SLOP_WIDTH, HierLayoutConfig,
    HierLayoutConfigBuilder,
};
pub use container::{DeferredAction, HierarchyContainer};
pub use error::{HierError, Result};
pub use host::{HostFrame, RelationPainter};
pub use node::{DividerKey, DividerNode, GridKey, GridNode, HierNode};
pub use scroll::ScrollDisposition;
pub use view::{GridView, GridViewFactory, ScrollEchoes, ViewportSnapshot};
pub use width::WidthChange;
