//! Grid coordinates and occupied rectangles.

use serde::{Deserialize, Serialize};

/// Number of columns on the placement grid.
pub const GRID_COLUMNS: u32 = 12;

/// Height of one grid row in canvas pixels.
pub const ROW_HEIGHT: f64 = 50.0;

/// A cell on the placement grid (column, row), both 0-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct GridPosition {
    /// Column.
    pub x: u32,
    /// Row.
    pub y: u32,
}

impl GridPosition {
    pub fn new(x: u32, y: u32) -> Self {
        Self { x, y }
    }
}

/// Extent of a widget in grid units.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GridSize {
    /// Width in columns.
    pub w: u32,
    /// Height in rows.
    pub h: u32,
}

impl GridSize {
    pub fn new(w: u32, h: u32) -> Self {
        Self { w, h }
    }

    /// Clamp to at least one cell and at most `columns` wide.
    pub fn clamped(self, columns: u32) -> Self {
        Self {
            w: self.w.clamp(1, columns.max(1)),
            h: self.h.max(1),
        }
    }
}

/// The half-open rectangle `[x, x + w) × [y, y + h)` a widget occupies.
///
/// Coordinates are signed so that raw drop cells left of or above the
/// canvas can still be tested before clamping.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridRect {
    pub x: i64,
    pub y: i64,
    pub w: i64,
    pub h: i64,
}

impl GridRect {
    pub fn new(x: i64, y: i64, w: i64, h: i64) -> Self {
        Self { x, y, w, h }
    }

    /// Rectangle of a widget at `position` with `size`.
    pub fn at(position: GridPosition, size: GridSize) -> Self {
        Self::new(
            i64::from(position.x),
            i64::from(position.y),
            i64::from(size.w),
            i64::from(size.h),
        )
    }

    pub fn right(&self) -> i64 {
        self.x + self.w
    }

    pub fn bottom(&self) -> i64 {
        self.y + self.h
    }

    /// Axis-aligned overlap test.
    ///
    /// Two rectangles overlap unless one lies entirely left of, right of,
    /// above, or below the other. Touching edges do not overlap.
    pub fn overlaps(&self, other: &GridRect) -> bool {
        !(self.right() <= other.x
            || other.right() <= self.x
            || self.bottom() <= other.y
            || other.bottom() <= self.y)
    }

    /// Whether this rectangle overlaps any of `others`.
    pub fn overlaps_any<'a>(&self, others: impl IntoIterator<Item = &'a GridRect>) -> bool {
        others.into_iter().any(|other| self.overlaps(other))
    }
}

/// Clamp a column into `[0, columns - w]`.
pub fn clamp_column(x: i64, w: u32, columns: u32) -> u32 {
    let max_x = i64::from(columns.saturating_sub(w));
    // max_x fits in u32 since it never exceeds `columns`
    x.clamp(0, max_x) as u32
}

/// Clamp a row to be non-negative.
pub fn clamp_row(y: i64) -> u32 {
    y.clamp(0, i64::from(u32::MAX)) as u32
}
