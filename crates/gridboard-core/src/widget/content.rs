//! Content variants, one per widget kind.

use super::style::WidgetColor;
use super::WidgetKind;
use serde::{Deserialize, Serialize};

/// Horizontal text alignment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextAlign {
    #[default]
    Left,
    Center,
    Right,
}

/// Inline formatting for a text widget.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TextStyle {
    /// Font size in pixels.
    pub font_size: f32,
    pub color: WidgetColor,
    pub bold: bool,
    pub italic: bool,
    pub align: TextAlign,
}

impl Default for TextStyle {
    fn default() -> Self {
        Self {
            font_size: 16.0,
            color: WidgetColor::black(),
            bold: false,
            italic: false,
            align: TextAlign::Left,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct TextContent {
    #[serde(default)]
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub style: Option<TextStyle>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ImageContent {
    pub url: String,
    #[serde(default)]
    pub alt: String,
}

/// Visual emphasis of a button.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ButtonVariant {
    #[default]
    Primary,
    Secondary,
    Outline,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ButtonContent {
    #[serde(default)]
    pub text: String,
    /// Link target opened on click.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default)]
    pub variant: ButtonVariant,
}

/// What a table cell holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CellKind {
    #[default]
    Text,
    Image,
}

/// One table cell. `content` is text, or an image URL for image cells.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct TableCell {
    #[serde(rename = "type", default)]
    pub kind: CellKind,
    #[serde(default)]
    pub content: String,
}

impl TableCell {
    pub fn text(content: impl Into<String>) -> Self {
        Self {
            kind: CellKind::Text,
            content: content.into(),
        }
    }

    pub fn image(url: impl Into<String>) -> Self {
        Self {
            kind: CellKind::Image,
            content: url.into(),
        }
    }
}

/// Row-major table. Every row holds exactly `columns` cells.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct TableContent {
    pub rows: Vec<Vec<TableCell>>,
    pub columns: u32,
}

impl TableContent {
    /// A `rows × columns` table of empty text cells.
    pub fn with_dimensions(rows: u32, columns: u32) -> Self {
        let row = vec![TableCell::default(); columns as usize];
        Self {
            rows: vec![row; rows as usize],
            columns,
        }
    }

    pub fn row_count(&self) -> u32 {
        u32::try_from(self.rows.len()).unwrap_or(u32::MAX)
    }

    /// Whether every row has exactly `columns` cells.
    pub fn is_consistent(&self) -> bool {
        self.rows.iter().all(|row| row.len() == self.columns as usize)
    }

    /// Pad short rows with empty text cells and truncate long ones.
    pub fn normalized(mut self) -> Self {
        let columns = self.columns as usize;
        for row in &mut self.rows {
            row.resize_with(columns, TableCell::default);
        }
        self
    }

    pub fn cell(&self, row: usize, column: usize) -> Option<&TableCell> {
        self.rows.get(row)?.get(column)
    }

    pub fn cell_mut(&mut self, row: usize, column: usize) -> Option<&mut TableCell> {
        self.rows.get_mut(row)?.get_mut(column)
    }

    /// Append a row of empty text cells.
    pub fn push_row(&mut self) {
        self.rows.push(vec![TableCell::default(); self.columns as usize]);
    }

    /// Append an empty text cell to every row.
    pub fn push_column(&mut self) {
        self.columns += 1;
        for row in &mut self.rows {
            row.push(TableCell::default());
        }
    }
}

/// Content of a widget, keyed by its kind.
///
/// Serializes as the bare content record. A bare record does not say which
/// kind it is, so decoding always goes through [`WidgetContent::from_value`]
/// with the kind taken from the widget.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum WidgetContent {
    Table(TableContent),
    Button(ButtonContent),
    Image(ImageContent),
    Text(TextContent),
}

impl WidgetContent {
    pub fn kind(&self) -> WidgetKind {
        match self {
            WidgetContent::Text(_) => WidgetKind::Text,
            WidgetContent::Image(_) => WidgetKind::Image,
            WidgetContent::Button(_) => WidgetKind::Button,
            WidgetContent::Table(_) => WidgetKind::Table,
        }
    }

    /// Decode a content record of a known kind.
    ///
    /// A missing (`null`) record yields the kind's default content.
    pub fn from_value(kind: WidgetKind, value: serde_json::Value) -> Result<Self, serde_json::Error> {
        if value.is_null() {
            return Ok(super::default_content(kind));
        }
        Ok(match kind {
            WidgetKind::Text => WidgetContent::Text(serde_json::from_value(value)?),
            WidgetKind::Image => WidgetContent::Image(serde_json::from_value(value)?),
            WidgetKind::Button => WidgetContent::Button(serde_json::from_value(value)?),
            WidgetKind::Table => {
                let table: TableContent = serde_json::from_value(value)?;
                WidgetContent::Table(table.normalized())
            }
        })
    }

    pub fn as_table(&self) -> Option<&TableContent> {
        match self {
            WidgetContent::Table(table) => Some(table),
            _ => None,
        }
    }
}

impl From<TextContent> for WidgetContent {
    fn from(content: TextContent) -> Self {
        WidgetContent::Text(content)
    }
}

impl From<ImageContent> for WidgetContent {
    fn from(content: ImageContent) -> Self {
        WidgetContent::Image(content)
    }
}

impl From<ButtonContent> for WidgetContent {
    fn from(content: ButtonContent) -> Self {
        WidgetContent::Button(content)
    }
}

impl From<TableContent> for WidgetContent {
    fn from(content: TableContent) -> Self {
        WidgetContent::Table(content)
    }
}
