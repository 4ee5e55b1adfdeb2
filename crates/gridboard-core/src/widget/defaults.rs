//! Per-kind defaults for freshly dropped widgets.

use super::content::{ButtonContent, ImageContent, TableContent, TextContent, WidgetContent};
use super::style::WidgetStyle;
use super::WidgetKind;
use crate::grid::GridSize;

/// Columns each table column spans.
pub const TABLE_COLUMN_SPAN: u32 = 4;

/// Size of a table before any rows exist.
pub const TABLE_BASE_SIZE: GridSize = GridSize { w: 4, h: 2 };

/// Side length of an image with unknown or square proportions.
pub const IMAGE_BASE_SIDE: u32 = 4;

/// Empty content for `kind`. Tables start with no rows and no columns.
pub fn default_content(kind: WidgetKind) -> WidgetContent {
    match kind {
        WidgetKind::Text => TextContent::default().into(),
        WidgetKind::Image => ImageContent::default().into(),
        WidgetKind::Button => ButtonContent::default().into(),
        WidgetKind::Table => TableContent::default().into(),
    }
}

pub fn default_size(kind: WidgetKind) -> GridSize {
    match kind {
        WidgetKind::Text => GridSize::new(4, 3),
        WidgetKind::Image => GridSize::new(IMAGE_BASE_SIDE, IMAGE_BASE_SIDE),
        WidgetKind::Button => GridSize::new(3, 2),
        WidgetKind::Table => TABLE_BASE_SIZE,
    }
}

pub fn default_style(kind: WidgetKind) -> WidgetStyle {
    match kind {
        WidgetKind::Button => WidgetStyle {
            padding: 8.0,
            ..WidgetStyle::default()
        },
        WidgetKind::Text | WidgetKind::Image | WidgetKind::Table => WidgetStyle::default(),
    }
}

/// Size of a table with `rows × columns` cells on a grid `grid_columns` wide.
///
/// An empty table keeps [`TABLE_BASE_SIZE`]; height only grows once rows exist.
pub fn table_size(rows: u32, columns: u32, grid_columns: u32) -> GridSize {
    let w = columns
        .saturating_mul(TABLE_COLUMN_SPAN)
        .max(TABLE_BASE_SIZE.w)
        .min(grid_columns.max(1));
    let h = if rows == 0 {
        TABLE_BASE_SIZE.h
    } else {
        rows.saturating_add(1).max(TABLE_BASE_SIZE.h)
    };
    GridSize::new(w, h)
}

/// Size of an image with the given natural pixel dimensions.
///
/// The short side stays at [`IMAGE_BASE_SIDE`], the long side grows with the
/// aspect ratio. Widths are capped at `grid_columns`.
pub fn image_size_for_aspect(width_px: f64, height_px: f64, grid_columns: u32) -> GridSize {
    let base = f64::from(IMAGE_BASE_SIDE);
    if !(width_px > 0.0 && height_px > 0.0) || !width_px.is_finite() || !height_px.is_finite() {
        return default_size(WidgetKind::Image);
    }
    let ratio = width_px / height_px;
    let size = if ratio >= 1.0 {
        let w = (base * ratio).ceil().min(f64::from(grid_columns)) as u32;
        GridSize::new(w.max(IMAGE_BASE_SIDE), IMAGE_BASE_SIDE)
    } else {
        // Tall images are unbounded vertically; cap at a sane multiple
        let h = (base / ratio).ceil().min(base * 8.0) as u32;
        GridSize::new(IMAGE_BASE_SIDE, h.max(IMAGE_BASE_SIDE))
    };
    size.clamped(grid_columns)
}
