//! Debug visualization of the node sequence.
//!
//! ```ignore
//! use lattice_hiertable::debug::SequenceDebug;
//!
//! println!("{}", SequenceDebug::new(&hierarchy).format_listing());
//! ```
//!
//! A listing looks like:
//!
//! ```text
//! Hierarchy (2 tables, 1 divider):
//! ├── [0] People size=120 max=120 gen=4
//! ├── ┆ People → Measurements refreshed=2
//! └── [1] Measurements size=60 max=- gen=4 (rightmost)
//! ```

use std::fmt::{self, Write as FmtWrite};

use crate::container::HierarchyContainer;
use crate::node::{GridKey, HierNode};

/// Connector characters used in listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TreeStyle {
    /// ASCII characters.
    Ascii,
    /// Unicode box-drawing characters.
    #[default]
    Unicode,
}

/// What a listing includes.
#[derive(Debug, Clone)]
pub struct SequenceFormatOptions {
    /// Connector characters.
    pub style: TreeStyle,
    /// Show sizes and reported widths.
    pub show_widths: bool,
    /// Show scroll propagation tags.
    pub show_generations: bool,
}

impl Default for SequenceFormatOptions {
    fn default() -> Self {
        Self {
            style: TreeStyle::default(),
            show_widths: true,
            show_generations: true,
        }
    }
}

impl SequenceFormatOptions {
    /// Names and structure only.
    pub fn minimal() -> Self {
        Self {
            show_widths: false,
            show_generations: false,
            ..Default::default()
        }
    }
}

/// Formats a container's node sequence for diagnostics.
#[derive(Debug, Clone)]
pub struct SequenceDebug<'a> {
    container: &'a HierarchyContainer,
    options: SequenceFormatOptions,
}

impl<'a> SequenceDebug<'a> {
    /// Create a formatter with default options.
    pub fn new(container: &'a HierarchyContainer) -> Self {
        Self::with_options(container, SequenceFormatOptions::default())
    }

    /// Create a formatter with custom options.
    pub fn with_options(container: &'a HierarchyContainer, options: SequenceFormatOptions) -> Self {
        Self { container, options }
    }

    /// One line, e.g. `People | Measurements`.
    pub fn format_line(&self) -> String {
        let separator = match self.options.style {
            TreeStyle::Ascii => " | ",
            TreeStyle::Unicode => " \u{2503} ",
        };
        self.container
            .sequence()
            .iter()
            .filter_map(|node| node.as_grid())
            .map(|key| self.grid_label(key))
            .collect::<Vec<_>>()
            .join(separator)
    }

    /// One line per node, dividers included.
    pub fn format_listing(&self) -> String {
        let grids = self.container.grid_count();
        let dividers = self.container.divider_count();
        let mut output = String::new();
        let _ = writeln!(
            output,
            "Hierarchy ({grids} {}, {dividers} {}):",
            if grids == 1 { "table" } else { "tables" },
            if dividers == 1 { "divider" } else { "dividers" },
        );

        let sequence = self.container.sequence();
        if sequence.is_empty() {
            output.push_str("  (empty)\n");
            return output;
        }

        let (branch, corner, gap) = match self.options.style {
            TreeStyle::Ascii => ("+-- ", "`-- ", ": "),
            TreeStyle::Unicode => ("\u{251c}\u{2500}\u{2500} ", "\u{2514}\u{2500}\u{2500} ", "\u{2506} "),
        };

        for (index, node) in sequence.iter().enumerate() {
            output.push_str(if index + 1 == sequence.len() { corner } else { branch });
            match *node {
                HierNode::Grid(key) => self.write_grid(key, &mut output),
                HierNode::Divider(key) => {
                    output.push_str(gap);
                    if let Some(divider) = self.container.divider(key) {
                        let _ = write!(
                            output,
                            "{} \u{2192} {} refreshed={}",
                            self.grid_label(divider.left_table()),
                            self.grid_label(divider.right_table()),
                            divider.refresh_count()
                        );
                    }
                }
            }
            output.push('\n');
        }
        output
    }

    fn write_grid(&self, key: GridKey, output: &mut String) {
        let Some(grid) = self.container.grid(key) else {
            output.push_str("(released)");
            return;
        };
        let _ = write!(output, "[{}] {}", grid.level(), self.grid_label(key));
        if self.options.show_widths {
            let _ = write!(output, " size={}", grid.size());
            match grid.maximum_width() {
                Some(width) => {
                    let _ = write!(output, " max={width}");
                }
                None => output.push_str(" max=-"),
            }
        }
        if self.options.show_generations {
            let _ = write!(output, " gen={}", grid.scroll_event_counter());
        }
        if grid.is_rightmost() {
            output.push_str(" (rightmost)");
        }
    }

    fn grid_label(&self, key: GridKey) -> String {
        match self.container.grid(key) {
            Some(grid) if !grid.collection_name().is_empty() => grid.collection_name().to_string(),
            Some(grid) => grid.adapter_id().to_string(),
            None => "(released)".to_string(),
        }
    }
}

impl fmt::Display for SequenceDebug<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.format_listing())
    }
}
