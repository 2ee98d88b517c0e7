//! Layout configuration for the table hierarchy.

/// Width of the relation divider drawn between two adjacent tables.
pub const DEFAULT_DIVIDER_WIDTH: f64 = 48.0;

/// Default width of a single column, also the narrowest a table may be laid out.
pub const DEFAULT_COLUMN_WIDTH: f64 = 60.0;

/// Width of the spacer kept to the right of the rightmost table.
pub const DEFAULT_SLOP_WIDTH: f64 = 2.0;

/// Fixed layout metrics used when tiling the hierarchy.
#[derive(Debug, Clone, PartialEq)]
pub struct HierLayoutConfig {
    /// Fixed width of every relation divider.
    pub divider_width: f64,
    /// Minimum laid-out width of a table.
    pub min_grid_width: f64,
    /// Width of the trailing spacer after the rightmost table.
    pub slop_width: f64,
    /// Size given to a new table before it reports its content width.
    pub initial_grid_width: f64,
}

impl Default for HierLayoutConfig {
    fn default() -> Self {
        Self {
            divider_width: DEFAULT_DIVIDER_WIDTH,
            min_grid_width: DEFAULT_COLUMN_WIDTH,
            slop_width: DEFAULT_SLOP_WIDTH,
            initial_grid_width: DEFAULT_COLUMN_WIDTH,
        }
    }
}

impl HierLayoutConfig {
    /// Start building a configuration from the defaults.
    pub fn builder() -> HierLayoutConfigBuilder {
        HierLayoutConfigBuilder::default()
    }

    /// Clamp a desired table width to the configured minimum.
    pub fn clamp_grid_width(&self, width: f64) -> f64 {
        width.max(self.min_grid_width)
    }

    /// Laid-out width of tables with the given sizes, plus their dividers and the spacer.
    pub fn layout_width<I>(&self, grid_sizes: I) -> f64
    where
        I: IntoIterator<Item = f64>,
    {
        let mut count = 0usize;
        let mut total = 0.0;
        for size in grid_sizes {
            count += 1;
            total += size;
        }
        if count == 0 {
            return 0.0;
        }
        total + (count - 1) as f64 * self.divider_width + self.slop_width
    }
}

/// Builder for [`HierLayoutConfig`].
#[derive(Debug, Default)]
pub struct HierLayoutConfigBuilder {
    config: HierLayoutConfig,
}

impl HierLayoutConfigBuilder {
    /// Set the divider width.
    pub fn divider_width(mut self, width: f64) -> Self {
        self.config.divider_width = width;
        self
    }

    /// Set the minimum table width.
    pub fn min_grid_width(mut self, width: f64) -> Self {
        self.config.min_grid_width = width;
        self
    }

    /// Set the trailing spacer width.
    pub fn slop_width(mut self, width: f64) -> Self {
        self.config.slop_width = width;
        self
    }

    /// Set the size of a table that has not reported its width yet.
    pub fn initial_grid_width(mut self, width: f64) -> Self {
        self.config.initial_grid_width = width;
        self
    }

    /// Finish building.
    pub fn build(self) -> HierLayoutConfig {
        self.config
    }
}
