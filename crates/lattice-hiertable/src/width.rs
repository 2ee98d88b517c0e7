//! Content-width cascade from tables to the hosting frame.
//!
//! A table whose content width changes takes that width as its laid-out
//! size. The total layout width is then offered to the hosting frame as a
//! shrink-to-fit request: the frame may shrink to the content, never grow
//! past what it has. Until the rightmost table has reported its first width
//! the hierarchy is still being assembled and no request is sent at all.

use lattice_hiertable_core::logging::{span_names, targets};
use lattice_hiertable_core::{PerfSpan, Property};

use crate::config::HierLayoutConfig;
use crate::error::{HierError, Result};
use crate::host::HostFrame;
use crate::node::{GridKey, NodeArena};

/// Result of a width report.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum WidthChange {
    /// The width equals the table's current maximum width; nothing happened.
    Unchanged,
    /// The table was resized.
    Applied {
        /// Width sent to the hosting frame, if a request was made.
        resize: Option<f64>,
        /// Whether this report completed initial construction.
        became_ready: bool,
    },
}

/// Tracks readiness and forwards layout width to the hosting frame.
pub(crate) struct WidthCascadeController {
    is_ready: Property<bool>,
    container_max_width: Option<f64>,
    host: Option<Box<dyn HostFrame>>,
}

impl WidthCascadeController {
    /// Create a controller with no hosting frame attached.
    pub(crate) fn new() -> Self {
        Self {
            is_ready: Property::new(false),
            container_max_width: None,
            host: None,
        }
    }

    /// Whether the rightmost table has reported its first width.
    pub(crate) fn is_ready(&self) -> bool {
        self.is_ready.get()
    }

    /// Layout width computed by the most recent cascade.
    pub(crate) fn container_max_width(&self) -> Option<f64> {
        self.container_max_width
    }

    /// Attach or replace the hosting frame.
    pub(crate) fn set_host(&mut self, host: Option<Box<dyn HostFrame>>) {
        self.host = host;
    }

    /// Whether a hosting frame is attached.
    pub(crate) fn has_host(&self) -> bool {
        self.host.is_some()
    }

    /// Forget readiness. Returns `true` if the controller was ready.
    pub(crate) fn reset(&mut self) -> bool {
        self.container_max_width = None;
        self.is_ready.replace(false).is_some()
    }

    /// Apply a content width reported by table `key`.
    pub(crate) fn width_changed(
        &mut self,
        nodes: &mut NodeArena,
        config: &HierLayoutConfig,
        key: GridKey,
        new_width: f64,
    ) -> Result<WidthChange> {
        let node = nodes.grid_mut(key).ok_or(HierError::UnknownNode)?;
        if !node.set_maximum_width(new_width) {
            return Ok(WidthChange::Unchanged);
        }
        node.size = config.clamp_grid_width(new_width);
        let completes_construction = node.is_rightmost && !self.is_ready();
        tracing::debug!(
            target: targets::WIDTH,
            level = node.level,
            width = new_width,
            rightmost = node.is_rightmost,
            "table width changed"
        );

        let resize = self.cascade(nodes, config);
        let became_ready = completes_construction && self.is_ready.set(true);

        Ok(WidthChange::Applied {
            resize,
            became_ready,
        })
    }

    /// Recompute the layout width and offer it to the hosting frame.
    ///
    /// Returns the width requested, or `None` when the request was suppressed
    /// (not ready yet) or could not be delivered (no frame, or the frame is
    /// unavailable; the next width change retries).
    pub(crate) fn cascade(&mut self, nodes: &NodeArena, config: &HierLayoutConfig) -> Option<f64> {
        let _span = PerfSpan::new(span_names::CASCADE);
        let content_width = nodes.layout_width(config);
        self.container_max_width = Some(content_width);

        if !self.is_ready() {
            tracing::trace!(target: targets::WIDTH, content_width, "not ready, resize suppressed");
            return None;
        }

        let Some(host) = self.host.as_mut() else {
            tracing::debug!(target: targets::WIDTH, content_width, "no hosting frame attached");
            return None;
        };
        let Some(frame_width) = host.frame_width() else {
            tracing::debug!(target: targets::WIDTH, content_width, "hosting frame has no width yet");
            return None;
        };

        let target = content_width.min(frame_width);
        match host.request_width(target) {
            Ok(()) => {
                tracing::debug!(target: targets::WIDTH, frame_width, target, "requested frame width");
                Some(target)
            }
            Err(err) => {
                tracing::debug!(target: targets::WIDTH, error = %err, "resize request not delivered");
                None
            }
        }
    }
}

impl std::fmt::Debug for WidthCascadeController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WidthCascadeController")
            .field("is_ready", &self.is_ready())
            .field("container_max_width", &self.container_max_width)
            .field("has_host", &self.has_host())
            .finish()
    }
}
