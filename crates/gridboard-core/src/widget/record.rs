//! Persisted shape of a widget.
//!
//! The stored record predates explicit sizes and styles, so every field but
//! `id` and `type` is optional on read and back-filled from the kind
//! defaults. Ids are opaque strings; older records carry 21-character
//! nanoids rather than UUIDs.

use super::{default_style, Widget, WidgetContent, WidgetId, WidgetKind, WidgetStyle};
use crate::grid::{clamp_row, GridPosition, GridSize};
use serde::{Deserialize, Serialize};

/// Stored positions may be negative or fractional in older records.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub(crate) struct RecordPosition {
    x: serde_json::Number,
    y: serde_json::Number,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct WidgetRecord {
    id: WidgetId,
    #[serde(rename = "type")]
    kind: WidgetKind,
    #[serde(default)]
    content: serde_json::Value,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    position: Option<RecordPosition>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    size: Option<GridSize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    style: Option<WidgetStyle>,
    #[serde(default)]
    is_editing: bool,
}

impl TryFrom<WidgetRecord> for Widget {
    type Error = serde_json::Error;

    fn try_from(record: WidgetRecord) -> Result<Self, Self::Error> {
        if record.id.is_empty() {
            return Err(serde::de::Error::custom("widget id is empty"));
        }
        let content = WidgetContent::from_value(record.kind, record.content)?;
        let position = record
            .position
            .map(|p| GridPosition::new(to_cell(&p.x), to_cell(&p.y)))
            .unwrap_or_default();
        let style = record.style.unwrap_or_else(|| default_style(record.kind));
        Ok(Widget::reconstruct(
            record.id,
            content,
            position,
            record.size,
            style,
            record.is_editing,
        ))
    }
}

impl From<Widget> for WidgetRecord {
    fn from(widget: Widget) -> Self {
        let kind = widget.kind();
        let content = match serde_json::to_value(&widget.content) {
            Ok(value) => value,
            Err(e) => {
                // Content records are plain data; this only trips on non-finite floats
                log::error!("Failed to serialize content of widget {}: {}", widget.id, e);
                serde_json::Value::Null
            }
        };
        Self {
            id: widget.id,
            kind,
            content,
            position: Some(RecordPosition {
                x: widget.position.x.into(),
                y: widget.position.y.into(),
            }),
            size: widget.size,
            style: Some(widget.style),
            is_editing: widget.is_editing,
        }
    }
}

fn to_cell(value: &serde_json::Number) -> u32 {
    match value.as_f64() {
        Some(v) if v.is_finite() => clamp_row(v.floor() as i64),
        _ => 0,
    }
}
