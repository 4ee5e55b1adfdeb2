//! Widget entity and its content variants.
//!
//! A widget is pure placement data: a kind-specific content record, a grid
//! position, an optional explicit size and a box style. All defaults for a
//! new widget are pure functions of its kind, see [`defaults`].

mod content;
mod defaults;
mod id;
mod patch;
mod record;
mod style;

pub use content::{
    ButtonContent, ButtonVariant, CellKind, ImageContent, TableCell, TableContent, TextAlign,
    TextContent, TextStyle, WidgetContent,
};
pub use defaults::{
    default_content, default_size, default_style, image_size_for_aspect, table_size,
    IMAGE_BASE_SIDE, TABLE_BASE_SIZE, TABLE_COLUMN_SPAN,
};
pub use id::WidgetId;
pub use patch::{PatchRecord, WidgetPatch};
pub use style::{WidgetColor, WidgetStyle};

use crate::grid::{clamp_column, GridPosition, GridRect, GridSize};
use serde::{Deserialize, Serialize};

/// The closed set of widget kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WidgetKind {
    Text,
    Image,
    Button,
    Table,
}

impl WidgetKind {
    pub fn name(&self) -> &'static str {
        match self {
            WidgetKind::Text => "text",
            WidgetKind::Image => "image",
            WidgetKind::Button => "button",
            WidgetKind::Table => "table",
        }
    }

    pub fn all() -> &'static [WidgetKind] {
        &[
            WidgetKind::Text,
            WidgetKind::Image,
            WidgetKind::Button,
            WidgetKind::Table,
        ]
    }
}

impl std::fmt::Display for WidgetKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// A positioned, typed content unit on the canvas.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(into = "record::WidgetRecord", try_from = "record::WidgetRecord")]
pub struct Widget {
    pub(crate) id: WidgetId,
    /// Content record; its variant fixes the widget's kind.
    pub(crate) content: WidgetContent,
    pub position: GridPosition,
    /// Explicit size. `None` means the kind default (tables: derived from content).
    pub size: Option<GridSize>,
    pub style: WidgetStyle,
    /// Presentation-layer editing flag. Persisted, otherwise inert.
    pub is_editing: bool,
}

impl Widget {
    /// Create a widget of `kind` seeded from the kind defaults.
    ///
    /// Tables get no explicit size so their height follows their rows.
    pub fn new(kind: WidgetKind) -> Self {
        let size = match kind {
            WidgetKind::Table => None,
            _ => Some(default_size(kind)),
        };
        Self {
            id: WidgetId::generate(),
            content: default_content(kind),
            position: GridPosition::default(),
            size,
            style: default_style(kind),
            is_editing: true,
        }
    }

    /// Create a widget around existing content.
    pub fn with_content(content: WidgetContent) -> Self {
        let mut widget = Self::new(content.kind());
        widget.content = content;
        widget
    }

    pub fn with_position(mut self, position: GridPosition) -> Self {
        self.position = position;
        self
    }

    pub fn with_size(mut self, size: GridSize) -> Self {
        self.size = Some(size);
        self
    }

    /// Rebuild a widget with a known id (storage).
    pub(crate) fn reconstruct(
        id: WidgetId,
        content: WidgetContent,
        position: GridPosition,
        size: Option<GridSize>,
        style: WidgetStyle,
        is_editing: bool,
    ) -> Self {
        Self {
            id,
            content,
            position,
            size,
            style,
            is_editing,
        }
    }

    pub fn id(&self) -> &WidgetId {
        &self.id
    }

    pub fn kind(&self) -> WidgetKind {
        self.content.kind()
    }

    pub fn content(&self) -> &WidgetContent {
        &self.content
    }

    /// Size used for placement on a grid `columns` wide: explicit size,
    /// else the kind default.
    pub fn effective_size(&self, columns: u32) -> GridSize {
        let size = match (self.size, &self.content) {
            (Some(size), _) => size,
            (None, WidgetContent::Table(table)) => {
                table_size(table.row_count(), table.columns, columns)
            }
            (None, content) => default_size(content.kind()),
        };
        size.clamped(columns)
    }

    /// The rectangle this widget occupies on a grid `columns` wide.
    pub fn rect(&self, columns: u32) -> GridRect {
        GridRect::at(self.position, self.effective_size(columns))
    }

    /// Replace the content if it has the same kind. Returns whether it did.
    pub fn set_content(&mut self, content: WidgetContent) -> bool {
        if content.kind() != self.kind() {
            log::debug!(
                "Ignoring {} content for {} widget {}",
                content.kind(),
                self.kind(),
                self.id
            );
            return false;
        }
        self.content = match content {
            WidgetContent::Table(table) => WidgetContent::Table(table.normalized()),
            other => other,
        };
        true
    }

    /// Pull the widget back inside a grid `columns` wide.
    pub fn clamp_to_grid(&mut self, columns: u32) {
        if let Some(size) = self.size {
            self.size = Some(size.clamped(columns));
        }
        let w = self.effective_size(columns).w;
        self.position.x = clamp_column(i64::from(self.position.x), w, columns);
    }

    /// Merge a partial update. Omitted fields are preserved.
    pub fn apply_patch(&mut self, patch: WidgetPatch, columns: u32) {
        if let Some(content) = patch.content {
            self.set_content(content);
        }
        if let Some(position) = patch.position {
            self.position = position;
        }
        if let Some(size) = patch.size {
            self.size = Some(size);
        }
        if let Some(style) = patch.style {
            self.style = style;
        }
        if let Some(is_editing) = patch.is_editing {
            self.is_editing = is_editing;
        }
        self.clamp_to_grid(columns);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::GRID_COLUMNS;

    #[test]
    fn test_new_widget_uses_defaults() {
        let widget = Widget::new(WidgetKind::Text);
        assert_eq!(widget.kind(), WidgetKind::Text);
        assert_eq!(widget.size, Some(GridSize::new(4, 3)));
        assert_eq!(widget.position, GridPosition::new(0, 0));
        assert!(widget.is_editing);
    }

    #[test]
    fn test_new_widgets_have_distinct_ids() {
        let a = Widget::new(WidgetKind::Button);
        let b = Widget::new(WidgetKind::Button);
        assert_ne!(a.id(), b.id());
    }

    #[test]
    fn test_table_size_follows_rows_until_resized() {
        let mut widget = Widget::new(WidgetKind::Table);
        assert_eq!(widget.size, None);
        assert_eq!(widget.effective_size(GRID_COLUMNS), TABLE_BASE_SIZE);

        assert!(widget.set_content(TableContent::with_dimensions(3, 2).into()));
        assert_eq!(widget.effective_size(GRID_COLUMNS), GridSize::new(8, 4));

        widget.size = Some(GridSize::new(6, 6));
        assert_eq!(widget.effective_size(GRID_COLUMNS), GridSize::new(6, 6));
    }

    #[test]
    fn test_effective_size_fits_narrow_grid() {
        let mut widget = Widget::new(WidgetKind::Table);
        assert!(widget.set_content(TableContent::with_dimensions(1, 3).into()));
        assert_eq!(widget.effective_size(6), GridSize::new(6, 2));
        assert_eq!(widget.effective_size(2).w, 2);
        assert_eq!(Widget::new(WidgetKind::Text).effective_size(3), GridSize::new(3, 3));
    }

    #[test]
    fn test_set_content_rejects_other_kind() {
        let mut widget = Widget::new(WidgetKind::Image);
        let before = widget.clone();
        assert!(!widget.set_content(TextContent::default().into()));
        assert_eq!(widget, before);
    }

    #[test]
    fn test_patch_preserves_omitted_fields() {
        let mut widget = Widget::new(WidgetKind::Text).with_position(GridPosition::new(2, 5));
        let patch = WidgetPatch::content(TextContent {
            text: "Hello".to_string(),
            style: None,
        });
        widget.apply_patch(patch, GRID_COLUMNS);

        assert_eq!(widget.position, GridPosition::new(2, 5));
        assert_eq!(widget.size, Some(GridSize::new(4, 3)));
        match widget.content() {
            WidgetContent::Text(text) => assert_eq!(text.text, "Hello"),
            other => panic!("unexpected content {other:?}"),
        }
    }

    #[test]
    fn test_patch_clamps_position_into_grid() {
        let mut widget = Widget::new(WidgetKind::Text);
        widget.apply_patch(WidgetPatch::position(GridPosition::new(11, 0)), GRID_COLUMNS);
        assert_eq!(widget.position.x, GRID_COLUMNS - 4);

        let resize = WidgetPatch {
            position: Some(GridPosition::new(0, 0)),
            size: Some(GridSize::new(30, 2)),
            ..WidgetPatch::default()
        };
        widget.apply_patch(resize, GRID_COLUMNS);
        assert_eq!(widget.size, Some(GridSize::new(GRID_COLUMNS, 2)));
    }

    #[test]
    fn test_overlap_uses_effective_size() {
        let a = Widget::new(WidgetKind::Text);
        let b = Widget::new(WidgetKind::Button).with_position(GridPosition::new(3, 2));
        let c = Widget::new(WidgetKind::Button).with_position(GridPosition::new(4, 0));
        let rect = |w: &Widget| w.rect(GRID_COLUMNS);
        assert!(rect(&a).overlaps(&rect(&b)));
        assert!(!rect(&a).overlaps(&rect(&c)));
    }
}
