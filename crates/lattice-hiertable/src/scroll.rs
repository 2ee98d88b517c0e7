//! Scroll propagation between adjacent tables.
//!
//! When one table scrolls, every ancestor and descendant is realigned so the
//! parent case of each visible row stays visible at its own level. Realigning
//! a table fires that table's own scroll event, which re-enters
//! [`ScrollCoordinator::on_scroll`] before the outer call returns.
//!
//! Loops are broken with generation tags. The coordinator owns a
//! propagation counter; each table remembers the last generation it acted on.
//! A scroll event from a table whose tag is behind the counter is an echo of
//! propagation: the table is stamped with the current generation and nothing
//! else happens. Any other event is genuine and opens a new generation.

use crate::error::{HierError, Result};
use crate::node::{GridKey, NodeArena};
use crate::view::ScrollEchoes;
use lattice_hiertable_core::logging::targets;

/// How a scroll event was handled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScrollDisposition {
    /// The event was caused by propagation; the table was only stamped.
    Echo,
    /// The event was genuine and was propagated.
    Propagated {
        /// The generation opened for this event.
        generation: u64,
        /// Number of `scroll_to_align_*` calls made, echoes excluded.
        alignment_attempts: usize,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Direction {
    /// Towards the outermost level, via parent links.
    Left,
    /// Towards the innermost level, via child links.
    Right,
}

/// Generation-tagged scroll propagation over the table chain.
#[derive(Debug, Default)]
pub(crate) struct ScrollCoordinator {
    propagation_counter: u64,
}

impl ScrollCoordinator {
    /// Create a coordinator at generation zero.
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// The current propagation generation.
    pub(crate) fn propagation_counter(&self) -> u64 {
        self.propagation_counter
    }

    /// Forget every generation. Only valid when no tables exist.
    pub(crate) fn reset(&mut self) {
        self.propagation_counter = 0;
    }

    /// Handle a scroll event raised by the table `origin`.
    ///
    /// On error the walk stops where it failed. Tables already stamped keep
    /// their tags, so the next genuine scroll starts from a consistent state.
    pub(crate) fn on_scroll(
        &mut self,
        nodes: &mut NodeArena,
        origin: GridKey,
    ) -> Result<ScrollDisposition> {
        let counter = self.propagation_counter;
        let node = nodes.grid_mut(origin).ok_or(HierError::UnknownNode)?;

        if node.scroll_event_counter < counter {
            tracing::trace!(
                target: targets::SCROLL,
                level = node.level,
                tag = node.scroll_event_counter,
                generation = counter,
                "ignoring propagated scroll"
            );
            node.scroll_event_counter = counter;
            return Ok(ScrollDisposition::Echo);
        }

        self.propagation_counter += 1;
        let generation = self.propagation_counter;
        node.scroll_event_counter = generation;
        tracing::trace!(
            target: targets::SCROLL,
            level = node.level,
            generation,
            "propagating scroll"
        );

        let mut alignment_attempts = self.walk(nodes, origin, Direction::Left)?;
        alignment_attempts += self.walk(nodes, origin, Direction::Right)?;

        Ok(ScrollDisposition::Propagated {
            generation,
            alignment_attempts,
        })
    }

    /// Realign tables outward from `origin` until one does not need to move,
    /// then stamp the rest of the chain in that direction.
    ///
    /// Stamps use the live counter: an echo dispatched mid-walk may have
    /// opened a newer generation.
    fn walk(&mut self, nodes: &mut NodeArena, origin: GridKey, direction: Direction) -> Result<usize> {
        let mut attempts = 0;
        let mut reference = origin;
        let mut next = Self::neighbor(nodes, origin, direction)?;
        let mut did_scroll = true;

        while let Some(current) = next {
            if did_scroll {
                let anchor = nodes
                    .grid(reference)
                    .ok_or(HierError::UnknownNode)?
                    .viewport();
                let mut echoes = ScrollEchoes::new();
                let node = nodes.grid_mut(current).ok_or(HierError::UnknownNode)?;
                attempts += 1;
                did_scroll = match direction {
                    Direction::Left => node.view_mut().scroll_to_align_with_right(&anchor, &mut echoes),
                    Direction::Right => node.view_mut().scroll_to_align_with_left(&anchor, &mut echoes),
                }?;
                tracing::trace!(
                    target: targets::SCROLL,
                    level = node.level,
                    ?direction,
                    moved = did_scroll,
                    "aligned"
                );

                for _ in 0..echoes.take() {
                    self.on_scroll(nodes, current)?;
                }
            }

            if !did_scroll {
                let node = nodes.grid_mut(current).ok_or(HierError::UnknownNode)?;
                node.scroll_event_counter = self.propagation_counter;
            }

            reference = current;
            next = Self::neighbor(nodes, current, direction)?;
        }

        Ok(attempts)
    }

    fn neighbor(nodes: &NodeArena, key: GridKey, direction: Direction) -> Result<Option<GridKey>> {
        let node = nodes.grid(key).ok_or(HierError::UnknownNode)?;
        let neighbor = match direction {
            Direction::Left => node.parent,
            Direction::Right => node.child,
        };
        Ok(neighbor)
    }
}
