//! Grid placement: turns a drop point into a free grid cell.
//!
//! The free-cell search only visits coordinates where the answer can lie:
//! the target itself, the grid bounds and the cells on either side of each
//! obstacle edge. Its cost depends on the number of widgets, not on how far
//! down the canvas they sit.

use crate::grid::{clamp_column, clamp_row, GridPosition, GridRect, GridSize, GRID_COLUMNS, ROW_HEIGHT};
use kurbo::{Point, Size};
use serde::{Deserialize, Serialize};

/// Grid dimensions used to map canvas pixels to cells.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridGeometry {
    /// Number of columns spanning the canvas width.
    pub columns: u32,
    /// Row height in pixels.
    pub row_height: f64,
}

impl Default for GridGeometry {
    fn default() -> Self {
        Self {
            columns: GRID_COLUMNS,
            row_height: ROW_HEIGHT,
        }
    }
}

impl GridGeometry {
    pub fn new(columns: u32, row_height: f64) -> Self {
        Self { columns, row_height }
    }

    /// Raw (unclamped) cell under a canvas-relative pixel point.
    pub fn cell_at(&self, point: Point, canvas_width: f64) -> (i64, i64) {
        let x = if canvas_width > 0.0 && canvas_width.is_finite() {
            (point.x / canvas_width * f64::from(self.columns)).floor()
        } else {
            0.0
        };
        let y = if self.row_height > 0.0 {
            (point.y / self.row_height).floor()
        } else {
            0.0
        };
        (finite_cell(x), finite_cell(y))
    }

    /// Number of whole rows visible in a canvas of `canvas_height` pixels.
    pub fn visible_rows(&self, canvas_height: f64) -> u32 {
        if self.row_height <= 0.0 || !canvas_height.is_finite() || canvas_height <= 0.0 {
            return 0;
        }
        (canvas_height / self.row_height).floor().min(f64::from(u32::MAX)) as u32
    }
}

fn finite_cell(value: f64) -> i64 {
    if value.is_finite() {
        value.clamp(i64::MIN as f64, i64::MAX as f64) as i64
    } else {
        0
    }
}

/// Where a widget was released, in canvas-relative pixels, and the measured
/// canvas extent.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DropContext {
    pub point: Point,
    pub canvas: Size,
}

impl DropContext {
    pub fn new(point: Point, canvas: Size) -> Self {
        Self { point, canvas }
    }
}

/// Result of a placement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Placement {
    /// Final grid position.
    pub position: GridPosition,
    /// Whether the requested cell was taken and a free one was chosen.
    pub relocated: bool,
    /// Whether no free cell existed and the widget overlaps another.
    pub overlapping: bool,
}

impl Placement {
    fn accepted(position: GridPosition) -> Self {
        Self {
            position,
            relocated: false,
            overlapping: false,
        }
    }
}

/// Resolve a drop point against the current occupied rectangles.
pub fn resolve_drop(
    drop: &DropContext,
    size: GridSize,
    occupied: &[GridRect],
    geometry: &GridGeometry,
) -> Placement {
    let requested = geometry.cell_at(drop.point, drop.canvas.width);
    let rows = geometry.visible_rows(drop.canvas.height);
    resolve_cell(requested, size, occupied, rows, geometry.columns)
}

/// Resolve a raw grid cell against the current occupied rectangles.
///
/// The requested cell is clamped into the grid first; if the widget fits
/// there it is accepted. Otherwise every cell in the first `rows` rows that
/// fits without overlap is a candidate and the one closest to `requested`
/// (Euclidean, first in row-major order on ties) wins. With no candidate the
/// clamped cell is used even though it overlaps.
pub fn resolve_cell(
    requested: (i64, i64),
    size: GridSize,
    occupied: &[GridRect],
    rows: u32,
    columns: u32,
) -> Placement {
    let size = size.clamped(columns);
    let clamped = GridPosition::new(
        clamp_column(requested.0, size.w, columns),
        clamp_row(requested.1),
    );

    if !GridRect::at(clamped, size).overlaps_any(occupied) {
        return Placement::accepted(clamped);
    }

    match nearest_free_cell(requested, size, occupied, rows, columns) {
        Some(position) => Placement {
            position,
            relocated: true,
            overlapping: false,
        },
        None => {
            log::debug!(
                "No free {}x{} slot in {} rows, placing at ({}, {}) with overlap",
                size.w,
                size.h,
                rows,
                clamped.x,
                clamped.y
            );
            Placement {
                position: clamped,
                relocated: false,
                overlapping: true,
            }
        }
    }
}

/// Closest cell to `target` where a `size` rectangle overlaps nothing.
///
/// Only the first `rows` rows are searched. Distance is Euclidean; ties go to
/// the first cell in row-major order.
pub fn nearest_free_cell(
    target: (i64, i64),
    size: GridSize,
    occupied: &[GridRect],
    rows: u32,
    columns: u32,
) -> Option<GridPosition> {
    if size.w > columns || rows == 0 {
        return None;
    }
    let (w, h) = (i64::from(size.w), i64::from(size.h));
    // Free columns in a row change only just past an obstacle's sides; free
    // rows change where the widget starts or stops reaching an obstacle
    let xs = axis_candidates(
        target.0,
        i64::from(columns - size.w),
        occupied.iter().flat_map(|o| [o.x - w, o.right()]),
    );
    let ys = axis_candidates(
        target.1,
        i64::from(rows) - 1,
        occupied
            .iter()
            .flat_map(|o| [o.y - h, o.y - h + 1, o.bottom() - 1, o.bottom()]),
    );

    let mut best: Option<(i64, i64, i128)> = None;
    for &y in &ys {
        let dy = i128::from(y) - i128::from(target.1);
        for &x in &xs {
            let dx = i128::from(x) - i128::from(target.0);
            // Squared distance orders candidates the same as Euclidean
            let dist_sq = dx * dx + dy * dy;
            if best.is_some_and(|(_, _, d)| dist_sq >= d) {
                continue;
            }
            if !GridRect::new(x, y, w, h).overlaps_any(occupied) {
                best = Some((x, y, dist_sq));
            }
        }
    }

    // Candidates lie in [0, columns - w] × [0, rows - 1], so they fit in u32
    best.map(|(x, y, _)| GridPosition::new(x as u32, y as u32))
}

/// Sorted distinct coordinates in `0..=max` worth testing along one axis.
fn axis_candidates(target: i64, max: i64, edges: impl Iterator<Item = i64>) -> Vec<i64> {
    let mut values = vec![0, max, target.clamp(0, max)];
    values.extend(edges.filter(|v| (0..=max).contains(v)));
    values.sort_unstable();
    values.dedup();
    values
}
