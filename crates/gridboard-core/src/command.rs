//! Inbound intents from the presentation layer.
//!
//! Commands are plain data so they can cross a serialization boundary
//! (e.g. from JavaScript) and be replayed in tests.

use crate::canvas::{Canvas, CanvasError};
use crate::grid::{GridPosition, GridSize};
use crate::placement::DropContext;
use crate::storage::KeyValueStore;
use crate::widget::{PatchRecord, WidgetId, WidgetKind};
use kurbo::Size;
use serde::{Deserialize, Serialize};

/// A user intent addressed to the canvas.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "command", rename_all = "camelCase")]
pub enum CanvasCommand {
    /// A palette item of `kind` was released over the canvas.
    ///
    /// An image dropped with its natural pixel size is shaped to its aspect
    /// ratio.
    Drop {
        kind: WidgetKind,
        #[serde(flatten)]
        at: DropContext,
        #[serde(default, rename = "imageSize", skip_serializing_if = "Option::is_none")]
        image_size: Option<Size>,
    },
    Update {
        id: WidgetId,
        patch: PatchRecord,
    },
    Delete {
        id: WidgetId,
    },
    Clear,
    Undo,
    Redo,
    SetupTable {
        id: WidgetId,
        rows: u32,
        columns: u32,
    },
    AddTableRow {
        id: WidgetId,
    },
    AddTableColumn {
        id: WidgetId,
    },
    BeginDrag {
        id: WidgetId,
    },
    DragTo {
        id: WidgetId,
        position: GridPosition,
        #[serde(default)]
        size: Option<GridSize>,
    },
    EndDrag,
    CancelDrag,
}

/// What a command did.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "camelCase")]
pub enum CommandOutcome {
    /// A widget was created.
    Added { id: WidgetId },
    /// The command ran; `changed` tells whether the widget set differs.
    Applied { changed: bool },
    /// The command was rejected.
    Rejected { reason: String },
}

impl From<CanvasError> for CommandOutcome {
    fn from(e: CanvasError) -> Self {
        CommandOutcome::Rejected {
            reason: e.to_string(),
        }
    }
}

impl<S: KeyValueStore> Canvas<S> {
    /// Dispatch a command.
    pub fn apply(&mut self, command: CanvasCommand) -> CommandOutcome {
        let changed = match command {
            CanvasCommand::Drop {
                kind,
                at,
                image_size,
            } => {
                let id = match (kind, image_size) {
                    (WidgetKind::Image, Some(natural)) => self.add_image(natural, &at),
                    _ => self.add_widget(kind, &at),
                };
                return CommandOutcome::Added { id };
            }
            CanvasCommand::Update { id, patch } => match self.update_widget_record(&id, patch) {
                Ok(changed) => changed,
                Err(e) => return e.into(),
            },
            CanvasCommand::Delete { id } => self.delete_widget(&id),
            CanvasCommand::Clear => self.clear_all(),
            CanvasCommand::Undo => self.undo(),
            CanvasCommand::Redo => self.redo(),
            CanvasCommand::SetupTable { id, rows, columns } => {
                if let Err(e) = self.setup_table(&id, rows, columns) {
                    return e.into();
                }
                true
            }
            CanvasCommand::AddTableRow { id } => {
                if let Err(e) = self.add_table_row(&id) {
                    return e.into();
                }
                true
            }
            CanvasCommand::AddTableColumn { id } => {
                if let Err(e) = self.add_table_column(&id) {
                    return e.into();
                }
                true
            }
            CanvasCommand::BeginDrag { id } => self.begin_drag(&id),
            CanvasCommand::DragTo { id, position, size } => self.drag_to(&id, position, size),
            CanvasCommand::EndDrag => self.end_drag(),
            CanvasCommand::CancelDrag => self.cancel_drag(),
        };
        CommandOutcome::Applied { changed }
    }
}
