//! Mapping between terminal cells and graph coordinates.
//!
//! Graph coordinates grow to the right and downwards. A terminal cell is
//! roughly twice as tall as it is wide, so one row spans twice the graph units
//! of one column.

use ratatui::layout::Rect;

use super::layout::{NODE_DIAMETER, Point};

// ============================================================================
// Constants
// ============================================================================

/// Padding around the fitted extent, in graph units.
const FIT_PADDING: f64 = NODE_DIAMETER;

/// Zoom limits in graph units per column.
const MIN_UNITS_PER_COL: f64 = 0.5;
const MAX_UNITS_PER_COL: f64 = 400.0;

/// Columns moved by one pan step.
pub const PAN_STEP_COLS: f64 = 4.0;

/// Zoom factor applied by one zoom step.
pub const ZOOM_STEP: f64 = 1.25;

/// Cell height over cell width.
const ROW_ASPECT: f64 = 2.0;

// ============================================================================
// Viewport
// ============================================================================

/// Visible rectangle of the graph plane.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    /// Graph point shown at the centre of the canvas.
    pub center: Point,
    /// Graph units covered by one terminal column.
    pub units_per_col: f64,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            center: Point::ORIGIN,
            units_per_col: 10.0,
        }
    }
}

/// Graph-space rectangle `(min_x, max_x, min_y, max_y)`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub min_x: f64,
    pub max_x: f64,
    pub min_y: f64,
    pub max_y: f64,
}

impl Viewport {
    /// Graph units covered by one terminal row.
    #[must_use]
    pub fn units_per_row(&self) -> f64 {
        self.units_per_col * ROW_ASPECT
    }

    /// Centres and scales the viewport so every point fits in `area`.
    #[must_use]
    pub fn fit(points: impl IntoIterator<Item = Point>, area: Rect) -> Self {
        let mut iter = points.into_iter();
        let Some(first) = iter.next() else {
            return Self::default();
        };
        let (mut min_x, mut max_x, mut min_y, mut max_y) = (first.x, first.x, first.y, first.y);
        for p in iter {
            min_x = min_x.min(p.x);
            max_x = max_x.max(p.x);
            min_y = min_y.min(p.y);
            max_y = max_y.max(p.y);
        }

        let width = (max_x - min_x) + 2.0 * FIT_PADDING;
        let height = (max_y - min_y) + 2.0 * FIT_PADDING;
        let cols = f64::from(area.width.max(1));
        let rows = f64::from(area.height.max(1));
        let units_per_col = (width / cols)
            .max(height / (rows * ROW_ASPECT))
            .clamp(MIN_UNITS_PER_COL, MAX_UNITS_PER_COL);

        Self {
            center: Point::new((min_x + max_x) / 2.0, (min_y + max_y) / 2.0),
            units_per_col,
        }
    }

    /// Graph-space rectangle shown in `area`.
    #[must_use]
    pub fn bounds(&self, area: Rect) -> Bounds {
        let half_w = f64::from(area.width) * self.units_per_col / 2.0;
        let half_h = f64::from(area.height) * self.units_per_row() / 2.0;
        Bounds {
            min_x: self.center.x - half_w,
            max_x: self.center.x + half_w,
            min_y: self.center.y - half_h,
            max_y: self.center.y + half_h,
        }
    }

    /// Graph point under the centre of terminal cell `(col, row)`.
    ///
    /// Returns `None` if the cell lies outside `area`.
    #[must_use]
    pub fn cell_to_world(&self, area: Rect, col: u16, row: u16) -> Option<Point> {
        if col < area.x || row < area.y || col >= area.right() || row >= area.bottom() {
            return None;
        }
        let bounds = self.bounds(area);
        let x = bounds.min_x + (f64::from(col - area.x) + 0.5) * self.units_per_col;
        let y = bounds.min_y + (f64::from(row - area.y) + 0.5) * self.units_per_row();
        Some(Point::new(x, y))
    }

    /// Moves the viewport by whole columns and rows.
    pub fn pan(&mut self, cols: f64, rows: f64) {
        self.center = self
            .center
            .offset(cols * self.units_per_col, rows * self.units_per_row());
    }

    /// Scales the viewport; factors above one zoom out.
    pub fn zoom(&mut self, factor: f64) {
        if factor.is_finite() && factor > 0.0 {
            self.units_per_col =
                (self.units_per_col * factor).clamp(MIN_UNITS_PER_COL, MAX_UNITS_PER_COL);
        }
    }

    /// Nearest node to `at` within hit distance, if any.
    ///
    /// Hit distance is the node radius, widened to one and a half cells when
    /// zoomed out far enough that nodes shrink below a cell.
    #[must_use]
    pub fn hit_test<'a, I>(&self, nodes: I, at: Point) -> Option<&'a str>
    where
        I: IntoIterator<Item = (&'a str, Point)>,
    {
        let tolerance = (NODE_DIAMETER / 2.0).max(self.units_per_row() * 1.5);
        nodes
            .into_iter()
            .map(|(id, p)| (id, p.distance(at)))
            .filter(|(_, d)| *d <= tolerance)
            .min_by(|a, b| a.1.total_cmp(&b.1))
            .map(|(id, _)| id)
    }
}

// ============================================================================
// Tests
// ============================================================================
