//! Partial widget updates.

use super::{Widget, WidgetContent, WidgetStyle};
use crate::grid::{GridPosition, GridSize};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A partial widget update. Omitted fields are left as they are.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WidgetPatch {
    pub content: Option<WidgetContent>,
    pub position: Option<GridPosition>,
    pub size: Option<GridSize>,
    pub style: Option<WidgetStyle>,
    pub is_editing: Option<bool>,
}

impl WidgetPatch {
    pub fn content(content: impl Into<WidgetContent>) -> Self {
        Self {
            content: Some(content.into()),
            ..Self::default()
        }
    }

    pub fn position(position: GridPosition) -> Self {
        Self {
            position: Some(position),
            ..Self::default()
        }
    }
}

/// Wire form of a [`WidgetPatch`] as sent by the presentation layer.
///
/// `content` and `style` arrive as raw JSON objects. They are laid over the
/// target widget's current values and decoded against its kind, so
/// `{"text": "Buy now"}` sent to a button only changes the button's text.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PatchRecord {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub position: Option<GridPosition>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<GridSize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub style: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_editing: Option<bool>,
}

impl PatchRecord {
    /// Decode against `widget`, merging partial content and style.
    pub fn resolve(self, widget: &Widget) -> Result<WidgetPatch, serde_json::Error> {
        let content = match self.content {
            Some(value) => {
                let current = serde_json::to_value(widget.content())?;
                Some(WidgetContent::from_value(widget.kind(), overlay(current, value))?)
            }
            None => None,
        };
        let style = match self.style {
            Some(value) => {
                let current = serde_json::to_value(&widget.style)?;
                Some(serde_json::from_value(overlay(current, value))?)
            }
            None => None,
        };
        Ok(WidgetPatch {
            content,
            position: self.position,
            size: self.size,
            style,
            is_editing: self.is_editing,
        })
    }
}

/// Shallow merge: fields of `patch` replace those of `base`.
fn overlay(base: Value, patch: Value) -> Value {
    match (base, patch) {
        (Value::Object(mut base), Value::Object(patch)) => {
            base.extend(patch);
            Value::Object(base)
        }
        (_, patch) => patch,
    }
}
