//! Canvas state: the single owner of the widget set.
//!
//! Every mutation goes through [`Canvas`], which places new widgets, commits
//! the resulting set to the undo history and persists it. The presentation
//! layer only ever reads [`Canvas::widgets`].

use crate::config::CanvasConfig;
use crate::grid::{GridPosition, GridRect, GridSize};
use crate::history::History;
use crate::placement::{nearest_free_cell, resolve_drop, DropContext, Placement};
use crate::storage::{KeyValueStore, PersistenceGateway};
use crate::widget::{
    image_size_for_aspect, PatchRecord, TableContent, Widget, WidgetId, WidgetKind, WidgetPatch,
};
use kurbo::Size;
use thiserror::Error;

/// Errors from operations that validate user input.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CanvasError {
    #[error("No widget with id {0}")]
    UnknownWidget(WidgetId),
    #[error("Widget {0} is not a table")]
    NotATable(WidgetId),
    #[error("A table needs at least one row and one column, got {rows}x{columns}")]
    InvalidTableDimensions { rows: u32, columns: u32 },
    #[error("Too many columns: {requested} requested, at most {max} fit the canvas")]
    TooManyColumns { requested: u32, max: u32 },
    #[error("Too many rows: {requested} requested, at most {max} allowed")]
    TooManyRows { requested: u32, max: u32 },
    #[error("Invalid update for widget {id}: {reason}")]
    InvalidPatch { id: WidgetId, reason: String },
}

/// An open drag gesture on one widget.
#[derive(Debug, Clone)]
struct DragSession {
    id: WidgetId,
    /// Widget set when the gesture started.
    before: Vec<Widget>,
}

/// The canvas widget set with undo history and persistence.
pub struct Canvas<S: KeyValueStore> {
    /// Live widgets in insertion order.
    widgets: Vec<Widget>,
    history: History<Vec<Widget>>,
    gateway: PersistenceGateway<S>,
    config: CanvasConfig,
    drag: Option<DragSession>,
}

impl<S: KeyValueStore> Canvas<S> {
    /// Open a canvas on `store` with the default configuration.
    pub fn new(store: S) -> Self {
        Self::with_config(store, CanvasConfig::default())
    }

    /// Open a canvas on `store`, restoring any persisted widgets.
    pub fn with_config(store: S, config: CanvasConfig) -> Self {
        let gateway = PersistenceGateway::new(store, config.storage_key.clone(), config.grid_columns);
        let widgets = gateway.load();
        let history = History::new(widgets.clone()).with_limit(config.history_limit);
        log::info!("Canvas opened with {} widgets", widgets.len());
        Self {
            widgets,
            history,
            gateway,
            config,
            drag: None,
        }
    }

    /// Current widgets in insertion order.
    pub fn widgets(&self) -> &[Widget] {
        &self.widgets
    }

    pub fn widget(&self, id: &WidgetId) -> Option<&Widget> {
        self.widgets.iter().find(|w| w.id() == id)
    }

    pub fn config(&self) -> &CanvasConfig {
        &self.config
    }

    pub fn gateway(&self) -> &PersistenceGateway<S> {
        &self.gateway
    }

    pub fn len(&self) -> usize {
        self.widgets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.widgets.is_empty()
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo() || self.drag.is_some()
    }

    pub fn can_redo(&self) -> bool {
        self.drag.is_none() && self.history.can_redo()
    }

    /// Where a widget of `size` dropped at `drop` would land.
    pub fn place(&self, size: GridSize, drop: &DropContext) -> Placement {
        let columns = self.config.grid_columns;
        let occupied: Vec<GridRect> = self.widgets.iter().map(|w| w.rect(columns)).collect();
        resolve_drop(drop, size, &occupied, &self.config.geometry())
    }

    /// Drop a new widget of `kind` seeded from the kind defaults.
    pub fn add_widget(&mut self, kind: WidgetKind, drop: &DropContext) -> WidgetId {
        self.add_widget_with(Widget::new(kind), drop)
    }

    /// Drop an image sized to its natural pixel dimensions.
    pub fn add_image(&mut self, natural: Size, drop: &DropContext) -> WidgetId {
        let size = image_size_for_aspect(natural.width, natural.height, self.config.grid_columns);
        self.add_widget_with(Widget::new(WidgetKind::Image).with_size(size), drop)
    }

    /// Drop a prepared widget.
    ///
    /// The widget is given a fresh id if its id is already on the canvas.
    pub fn add_widget_with(&mut self, mut widget: Widget, drop: &DropContext) -> WidgetId {
        self.settle_drag();

        while self.widget(&widget.id).is_some() {
            widget.id = WidgetId::generate();
        }
        let columns = self.config.grid_columns;
        if let Some(size) = widget.size {
            widget.size = Some(size.clamped(columns));
        }

        let placement = self.place(widget.effective_size(columns), drop);
        if placement.overlapping {
            log::warn!(
                "No free slot for new {} widget, placed at ({}, {}) overlapping",
                widget.kind(),
                placement.position.x,
                placement.position.y
            );
        } else if placement.relocated {
            log::debug!(
                "Drop cell taken, moved new {} widget to ({}, {})",
                widget.kind(),
                placement.position.x,
                placement.position.y
            );
        }
        widget.position = placement.position;

        let id = widget.id.clone();
        log::debug!("Added {} widget {} at {:?}", widget.kind(), id, widget.position);
        self.widgets.push(widget);
        self.commit();
        id
    }

    /// Merge `patch` into the widget with `id`.
    ///
    /// Unknown ids are ignored. If the new layout overlaps another widget the
    /// updated widget moves to the nearest free cell. Returns whether the
    /// widget set changed.
    pub fn update_widget(&mut self, id: &WidgetId, patch: WidgetPatch) -> bool {
        self.settle_drag();

        let Some(index) = self.index_of(id) else {
            log::debug!("Ignoring update for unknown widget {}", id);
            return false;
        };
        let relayout = patch.position.is_some() || patch.size.is_some() || patch.content.is_some();
        let before = self.widgets[index].clone();
        self.widgets[index].apply_patch(patch, self.config.grid_columns);
        if relayout {
            self.reconcile(index);
        }

        if self.widgets[index] == before {
            return false;
        }
        self.commit();
        true
    }

    /// Decode a wire patch against the widget's kind, then merge it.
    ///
    /// Unknown ids are ignored as in [`update_widget`](Self::update_widget).
    /// Content or style that does not decode for the widget is an error.
    pub fn update_widget_record(
        &mut self,
        id: &WidgetId,
        record: PatchRecord,
    ) -> Result<bool, CanvasError> {
        let Some(widget) = self.widget(id) else {
            log::debug!("Ignoring update for unknown widget {}", id);
            return Ok(false);
        };
        let patch = record.resolve(widget).map_err(|e| CanvasError::InvalidPatch {
            id: id.clone(),
            reason: e.to_string(),
        })?;
        Ok(self.update_widget(id, patch))
    }

    /// Remove the widget with `id`. Unknown ids are ignored.
    pub fn delete_widget(&mut self, id: &WidgetId) -> bool {
        self.settle_drag();

        let Some(index) = self.index_of(id) else {
            log::debug!("Ignoring delete for unknown widget {}", id);
            return false;
        };
        self.widgets.remove(index);
        log::debug!("Deleted widget {}", id);
        self.commit();
        true
    }

    /// Remove every widget and purge the persisted record.
    ///
    /// Clearing an already empty canvas still purges storage but adds no
    /// history entry.
    pub fn clear_all(&mut self) -> bool {
        self.settle_drag();

        let changed = !self.widgets.is_empty();
        if changed {
            self.widgets.clear();
            self.history.commit(Vec::new());
            log::info!("Canvas cleared");
        }
        self.gateway.clear();
        changed
    }

    /// Step back one snapshot and persist it. Does not add history.
    pub fn undo(&mut self) -> bool {
        self.settle_drag();

        match self.history.undo() {
            Some(snapshot) => {
                self.widgets = snapshot.clone();
                self.gateway.save(&self.widgets);
                true
            }
            None => false,
        }
    }

    /// Step forward one snapshot and persist it. Does not add history.
    pub fn redo(&mut self) -> bool {
        self.settle_drag();

        match self.history.redo() {
            Some(snapshot) => {
                self.widgets = snapshot.clone();
                self.gateway.save(&self.widgets);
                true
            }
            None => false,
        }
    }

    /// Give a table `rows × columns` empty text cells.
    pub fn setup_table(&mut self, id: &WidgetId, rows: u32, columns: u32) -> Result<(), CanvasError> {
        self.check_table_columns(columns)?;
        self.check_table_rows(rows)?;
        if rows == 0 || columns == 0 {
            return Err(CanvasError::InvalidTableDimensions { rows, columns });
        }
        self.table(id)?;

        let content = TableContent::with_dimensions(rows, columns);
        self.update_widget(id, WidgetPatch::content(content));
        Ok(())
    }

    /// Append a row of empty text cells to a table.
    pub fn add_table_row(&mut self, id: &WidgetId) -> Result<(), CanvasError> {
        let mut table = self.table(id)?.clone();
        self.check_table_rows(table.row_count().saturating_add(1))?;
        table.push_row();
        self.update_widget(id, WidgetPatch::content(table));
        Ok(())
    }

    /// Append an empty text cell to every row of a table.
    pub fn add_table_column(&mut self, id: &WidgetId) -> Result<(), CanvasError> {
        let mut table = self.table(id)?.clone();
        self.check_table_columns(table.columns.saturating_add(1))?;
        table.push_column();
        self.update_widget(id, WidgetPatch::content(table));
        Ok(())
    }

    /// Start a drag gesture on `id`.
    ///
    /// Until [`end_drag`](Self::end_drag) or [`cancel_drag`](Self::cancel_drag),
    /// [`drag_to`](Self::drag_to) moves the widget without touching history
    /// or storage. An open gesture on another widget is ended first.
    pub fn begin_drag(&mut self, id: &WidgetId) -> bool {
        self.settle_drag();

        if self.index_of(id).is_none() {
            log::debug!("Ignoring drag start for unknown widget {}", id);
            return false;
        }
        self.drag = Some(DragSession {
            id: id.clone(),
            before: self.widgets.clone(),
        });
        true
    }

    /// Move (and optionally resize) the dragged widget without committing.
    ///
    /// Discarded when no gesture is open or `id` is not the dragged widget.
    pub fn drag_to(&mut self, id: &WidgetId, position: GridPosition, size: Option<GridSize>) -> bool {
        match &self.drag {
            Some(session) if session.id == *id => {}
            _ => {
                log::debug!("Discarding stale drag update for {}", id);
                return false;
            }
        }
        let Some(index) = self.index_of(id) else {
            return false;
        };
        let columns = self.config.grid_columns;
        let widget = &mut self.widgets[index];
        widget.position = position;
        if size.is_some() {
            widget.size = size;
        }
        widget.clamp_to_grid(columns);
        true
    }

    /// Release the drag: settle the widget on a free cell, then commit once.
    ///
    /// Returns whether a history entry was added. A gesture that ends where
    /// it started adds nothing.
    pub fn end_drag(&mut self) -> bool {
        let Some(session) = self.drag.take() else {
            return false;
        };
        if let Some(index) = self.index_of(&session.id) {
            self.reconcile(index);
        }
        if self.widgets == session.before {
            return false;
        }
        log::debug!("Drag of {} committed", session.id);
        self.commit();
        true
    }

    /// Abandon the drag and restore the widget set from before it started.
    pub fn cancel_drag(&mut self) -> bool {
        match self.drag.take() {
            Some(session) => {
                self.widgets = session.before;
                true
            }
            None => false,
        }
    }

    /// The widget being dragged, if a gesture is open.
    pub fn dragging(&self) -> Option<&WidgetId> {
        self.drag.as_ref().map(|session| &session.id)
    }

    fn index_of(&self, id: &WidgetId) -> Option<usize> {
        self.widgets.iter().position(|w| w.id() == id)
    }

    fn table(&self, id: &WidgetId) -> Result<&TableContent, CanvasError> {
        let widget = self
            .widget(id)
            .ok_or_else(|| CanvasError::UnknownWidget(id.clone()))?;
        widget
            .content()
            .as_table()
            .ok_or_else(|| CanvasError::NotATable(id.clone()))
    }

    fn check_table_columns(&self, requested: u32) -> Result<(), CanvasError> {
        let max = self.config.max_table_columns;
        if requested > max {
            return Err(CanvasError::TooManyColumns { requested, max });
        }
        Ok(())
    }

    fn check_table_rows(&self, requested: u32) -> Result<(), CanvasError> {
        let max = self.config.max_table_rows;
        if requested > max {
            return Err(CanvasError::TooManyRows { requested, max });
        }
        Ok(())
    }

    /// Close an open drag before another mutation so its writes land first.
    fn settle_drag(&mut self) {
        if self.drag.is_some() {
            self.end_drag();
        }
    }

    /// Move the widget at `index` to the nearest free cell if it overlaps.
    fn reconcile(&mut self, index: usize) {
        let columns = self.config.grid_columns;
        let widget = &self.widgets[index];
        let rect = widget.rect(columns);
        let others: Vec<GridRect> = self
            .widgets
            .iter()
            .enumerate()
            .filter(|(i, _)| *i != index)
            .map(|(_, w)| w.rect(columns))
            .collect();
        if !rect.overlaps_any(&others) {
            return;
        }

        // The row just below the lowest widget is always free
        let lowest = others.iter().map(GridRect::bottom).max().unwrap_or(0);
        let rows = u32::try_from(lowest.saturating_add(1)).unwrap_or(u32::MAX);
        let size = widget.effective_size(columns);
        let target = (rect.x, rect.y);
        if let Some(position) = nearest_free_cell(target, size, &others, rows, columns) {
            log::debug!("Moved widget {} off an overlap to {:?}", widget.id(), position);
            self.widgets[index].position = position;
        }
    }

    fn commit(&mut self) {
        self.history.commit(self.widgets.clone());
        self.gateway.save(&self.widgets);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::GRID_COLUMNS;
    use crate::storage::MemoryStore;
    use crate::widget::{TextContent, WidgetContent, TABLE_BASE_SIZE};
    use kurbo::Point;
    use std::sync::Arc;

    /// 1200x500 canvas: 100px per column, 10 rows of 50px.
    fn drop_at(col: u32, row: u32) -> DropContext {
        DropContext::new(
            Point::new(f64::from(col) * 100.0 + 10.0, f64::from(row) * 50.0 + 10.0),
            Size::new(1200.0, 500.0),
        )
    }

    fn canvas() -> Canvas<Arc<MemoryStore>> {
        Canvas::new(Arc::new(MemoryStore::new()))
    }

    fn overlap(a: &Widget, b: &Widget) -> bool {
        a.rect(GRID_COLUMNS).overlaps(&b.rect(GRID_COLUMNS))
    }

    fn text(s: &str) -> WidgetPatch {
        WidgetPatch::content(TextContent {
            text: s.to_string(),
            style: None,
        })
    }

    #[test]
    fn test_add_widget_places_and_commits() {
        let mut canvas = canvas();
        let id = canvas.add_widget(WidgetKind::Text, &drop_at(2, 1));

        let widget = canvas.widget(&id).unwrap();
        assert_eq!(widget.position, GridPosition::new(2, 1));
        assert_eq!(canvas.len(), 1);
        assert!(canvas.can_undo());
        assert_eq!(canvas.gateway().load(), canvas.widgets());
    }

    #[test]
    fn test_add_widget_avoids_overlap() {
        let mut canvas = canvas();
        let first = canvas.add_widget(WidgetKind::Text, &drop_at(0, 0));
        let second = canvas.add_widget(WidgetKind::Text, &drop_at(2, 1));

        let a = canvas.widget(&first).unwrap();
        let b = canvas.widget(&second).unwrap();
        assert!(!overlap(a, b));
        assert_eq!(b.position, GridPosition::new(4, 1));
    }

    #[test]
    fn test_add_table_starts_empty() {
        let mut canvas = canvas();
        let id = canvas.add_widget(WidgetKind::Table, &drop_at(0, 0));
        let widget = canvas.widget(&id).unwrap();

        assert_eq!(widget.content(), &WidgetContent::Table(TableContent::default()));
        assert_eq!(widget.effective_size(GRID_COLUMNS), TABLE_BASE_SIZE);
    }

    #[test]
    fn test_update_unknown_is_noop() {
        let mut canvas = canvas();
        canvas.add_widget(WidgetKind::Text, &drop_at(0, 0));
        let before = canvas.widgets().to_vec();

        assert!(!canvas.update_widget(&WidgetId::from("missing"), text("x")));
        assert_eq!(canvas.widgets(), before.as_slice());
    }

    #[test]
    fn test_update_without_change_adds_no_history() {
        let mut canvas = canvas();
        let id = canvas.add_widget(WidgetKind::Text, &drop_at(0, 0));
        assert!(canvas.update_widget(&id, text("a")));
        assert!(!canvas.update_widget(&id, text("a")));

        assert!(canvas.undo());
        assert!(canvas.undo());
        assert!(!canvas.undo());
    }

    #[test]
    fn test_update_layout_moves_off_overlap() {
        let mut canvas = canvas();
        let a = canvas.add_widget(WidgetKind::Text, &drop_at(0, 0));
        let b = canvas.add_widget(WidgetKind::Text, &drop_at(6, 0));

        canvas.update_widget(&b, WidgetPatch::position(GridPosition::new(1, 0)));
        let (wa, wb) = (canvas.widget(&a).unwrap(), canvas.widget(&b).unwrap());
        assert!(!overlap(wa, wb));
        assert_eq!(wb.position, GridPosition::new(4, 0));
    }

    #[test]
    fn test_delete_is_idempotent() {
        let mut canvas = canvas();
        let id = canvas.add_widget(WidgetKind::Button, &drop_at(0, 0));
        canvas.add_widget(WidgetKind::Image, &drop_at(5, 0));

        assert!(canvas.delete_widget(&id));
        let after_once = canvas.widgets().to_vec();
        assert!(!canvas.delete_widget(&id));
        assert_eq!(canvas.widgets(), after_once.as_slice());
    }

    #[test]
    fn test_clear_all_purges_storage() {
        let store = Arc::new(MemoryStore::new());
        let mut canvas = Canvas::new(store.clone());
        canvas.add_widget(WidgetKind::Text, &drop_at(0, 0));
        assert!(store.contains("canvas-widgets"));

        assert!(canvas.clear_all());
        assert!(canvas.is_empty());
        assert!(!store.contains("canvas-widgets"));

        // Clear is undoable
        assert!(canvas.undo());
        assert_eq!(canvas.len(), 1);
    }

    #[test]
    fn test_undo_redo_persist_without_history() {
        let store = Arc::new(MemoryStore::new());
        let mut canvas = Canvas::new(store.clone());
        canvas.add_widget(WidgetKind::Text, &drop_at(0, 0));
        canvas.add_widget(WidgetKind::Button, &drop_at(6, 0));

        assert!(canvas.undo());
        assert_eq!(canvas.len(), 1);
        assert_eq!(Canvas::new(store.clone()).len(), 1);

        assert!(canvas.redo());
        assert_eq!(canvas.len(), 2);
        assert!(!canvas.redo());
        assert_eq!(Canvas::new(store).len(), 2);
    }

    #[test]
    fn test_reopen_restores_state() {
        let store = Arc::new(MemoryStore::new());
        let mut canvas = Canvas::new(store.clone());
        let id = canvas.add_widget(WidgetKind::Text, &drop_at(3, 2));
        canvas.update_widget(&id, text("persisted"));

        let reopened = Canvas::new(store);
        assert_eq!(reopened.widgets(), canvas.widgets());
        assert!(!reopened.can_undo());
    }

    #[test]
    fn test_setup_table() {
        let mut canvas = canvas();
        let id = canvas.add_widget(WidgetKind::Table, &drop_at(0, 0));

        canvas.setup_table(&id, 3, 2).unwrap();
        let widget = canvas.widget(&id).unwrap();
        let table = widget.content().as_table().unwrap();
        assert_eq!(table.row_count(), 3);
        assert_eq!(table.columns, 2);
        assert_eq!(widget.effective_size(GRID_COLUMNS), GridSize::new(8, 4));
    }

    #[test]
    fn test_setup_table_validation() {
        let mut canvas = canvas();
        let table = canvas.add_widget(WidgetKind::Table, &drop_at(0, 0));
        let button = canvas.add_widget(WidgetKind::Button, &drop_at(6, 0));

        assert_eq!(
            canvas.setup_table(&table, 1, 11),
            Err(CanvasError::TooManyColumns { requested: 11, max: 10 })
        );
        assert_eq!(
            canvas.setup_table(&table, 0, 2),
            Err(CanvasError::InvalidTableDimensions { rows: 0, columns: 2 })
        );
        assert_eq!(canvas.setup_table(&button, 1, 1), Err(CanvasError::NotATable(button.clone())));
        let ghost = WidgetId::from("missing");
        assert_eq!(canvas.setup_table(&ghost, 1, 1), Err(CanvasError::UnknownWidget(ghost.clone())));
    }

    #[test]
    fn test_setup_table_growth_avoids_neighbours() {
        let mut canvas = canvas();
        let table = canvas.add_widget(WidgetKind::Table, &drop_at(0, 0));
        let below = canvas.add_widget(WidgetKind::Button, &drop_at(0, 2));
        assert_eq!(canvas.widget(&below).unwrap().position, GridPosition::new(0, 2));

        canvas.setup_table(&table, 4, 1).unwrap();
        let t = canvas.widget(&table).unwrap();
        let b = canvas.widget(&below).unwrap();
        assert!(!overlap(t, b));
    }

    #[test]
    fn test_drag_commits_once() {
        let mut canvas = canvas();
        let id = canvas.add_widget(WidgetKind::Button, &drop_at(0, 0));

        assert!(canvas.begin_drag(&id));
        for x in 1..=6 {
            assert!(canvas.drag_to(&id, GridPosition::new(x, 1), None));
        }
        assert_eq!(canvas.widget(&id).unwrap().position, GridPosition::new(6, 1));
        // Intermediate moves are not persisted
        assert_eq!(canvas.gateway().load()[0].position, GridPosition::new(0, 0));

        assert!(canvas.end_drag());
        assert_eq!(canvas.gateway().load()[0].position, GridPosition::new(6, 1));

        // One undo reverts the whole gesture
        assert!(canvas.undo());
        assert_eq!(canvas.widget(&id).unwrap().position, GridPosition::new(0, 0));
    }

    #[test]
    fn test_drag_release_reconciles_overlap() {
        let mut canvas = canvas();
        let a = canvas.add_widget(WidgetKind::Text, &drop_at(0, 0));
        let b = canvas.add_widget(WidgetKind::Text, &drop_at(6, 0));

        canvas.begin_drag(&b);
        canvas.drag_to(&b, GridPosition::new(2, 0), None);
        // Overlap is allowed while dragging
        assert!(overlap(canvas.widget(&a).unwrap(), canvas.widget(&b).unwrap()));

        canvas.end_drag();
        assert!(!overlap(canvas.widget(&a).unwrap(), canvas.widget(&b).unwrap()));
    }

    #[test]
    fn test_drag_back_to_start_adds_no_history() {
        let mut canvas = canvas();
        let id = canvas.add_widget(WidgetKind::Text, &drop_at(0, 0));

        canvas.begin_drag(&id);
        canvas.drag_to(&id, GridPosition::new(5, 5), None);
        canvas.drag_to(&id, GridPosition::new(0, 0), None);
        assert!(!canvas.end_drag());

        assert!(canvas.undo());
        assert!(canvas.is_empty());
    }

    #[test]
    fn test_cancel_drag_restores() {
        let mut canvas = canvas();
        let id = canvas.add_widget(WidgetKind::Image, &drop_at(0, 0));
        let before = canvas.widgets().to_vec();

        canvas.begin_drag(&id);
        canvas.drag_to(&id, GridPosition::new(4, 4), Some(GridSize::new(6, 6)));
        assert!(canvas.cancel_drag());
        assert_eq!(canvas.widgets(), before.as_slice());
        assert!(!canvas.cancel_drag());
    }

    #[test]
    fn test_stale_drag_updates_are_discarded() {
        let mut canvas = canvas();
        let a = canvas.add_widget(WidgetKind::Text, &drop_at(0, 0));
        let b = canvas.add_widget(WidgetKind::Text, &drop_at(6, 0));

        assert!(!canvas.drag_to(&a, GridPosition::new(0, 5), None));

        canvas.begin_drag(&a);
        assert!(!canvas.drag_to(&b, GridPosition::new(0, 5), None));
        canvas.drag_to(&a, GridPosition::new(0, 4), None);
        canvas.end_drag();

        // Released: late updates are dropped
        assert!(!canvas.drag_to(&a, GridPosition::new(0, 8), None));
        assert_eq!(canvas.widget(&a).unwrap().position, GridPosition::new(0, 4));
    }

    #[test]
    fn test_mutation_during_drag_ends_it_first() {
        let mut canvas = canvas();
        let id = canvas.add_widget(WidgetKind::Text, &drop_at(0, 0));

        canvas.begin_drag(&id);
        canvas.drag_to(&id, GridPosition::new(0, 5), None);
        canvas.add_widget(WidgetKind::Button, &drop_at(8, 0));

        assert_eq!(canvas.dragging(), None);
        assert_eq!(canvas.widget(&id).unwrap().position, GridPosition::new(0, 5));
        // Drag and add are separate entries
        canvas.undo();
        assert_eq!(canvas.len(), 1);
        canvas.undo();
        assert_eq!(canvas.widget(&id).unwrap().position, GridPosition::new(0, 0));
    }

    #[test]
    fn test_add_widget_with_duplicate_id_gets_fresh_id() {
        let mut canvas = canvas();
        let id = canvas.add_widget(WidgetKind::Text, &drop_at(0, 0));
        let copy = canvas.widget(&id).unwrap().clone();

        let new_id = canvas.add_widget_with(copy, &drop_at(6, 0));
        assert_ne!(new_id, id);
        assert_eq!(canvas.len(), 2);
    }

    #[test]
    fn test_history_limit_from_config() {
        let config = CanvasConfig {
            history_limit: Some(2),
            ..CanvasConfig::default()
        };
        let mut canvas = Canvas::with_config(Arc::new(MemoryStore::new()), config);
        canvas.add_widget(WidgetKind::Button, &drop_at(0, 0));
        canvas.add_widget(WidgetKind::Button, &drop_at(3, 0));
        canvas.add_widget(WidgetKind::Button, &drop_at(6, 0));

        assert!(canvas.undo());
        assert!(!canvas.undo());
        assert_eq!(canvas.len(), 2);
    }

    #[test]
    fn test_clear_empty_canvas_adds_no_history() {
        let mut canvas = canvas();
        assert!(!canvas.clear_all());
        assert!(!canvas.can_undo());
    }

    #[test]
    fn test_setup_table_row_limit() {
        let mut canvas = canvas();
        let table = canvas.add_widget(WidgetKind::Table, &drop_at(0, 0));

        assert_eq!(
            canvas.setup_table(&table, 11, 2),
            Err(CanvasError::TooManyRows { requested: 11, max: 10 })
        );
        assert_eq!(
            canvas.setup_table(&table, 1_000_000, 1),
            Err(CanvasError::TooManyRows { requested: 1_000_000, max: 10 })
        );
        assert_eq!(canvas.setup_table(&table, 10, 2), Ok(()));
    }

    #[test]
    fn test_setup_table_on_narrow_grid() {
        let config = CanvasConfig {
            grid_columns: 6,
            ..CanvasConfig::default()
        };
        let mut canvas = Canvas::with_config(Arc::new(MemoryStore::new()), config);
        let id = canvas.add_widget(WidgetKind::Table, &drop_at(0, 0));

        canvas.setup_table(&id, 1, 3).unwrap();
        let widget = canvas.widget(&id).unwrap();
        assert_eq!(widget.effective_size(6), GridSize::new(6, 2));
        assert_eq!(widget.position.x, 0);
    }

    #[test]
    fn test_add_table_row_and_column() {
        let mut canvas = canvas();
        let id = canvas.add_widget(WidgetKind::Table, &drop_at(0, 0));
        canvas.setup_table(&id, 2, 2).unwrap();

        canvas.add_table_row(&id).unwrap();
        canvas.add_table_column(&id).unwrap();
        let table = canvas.widget(&id).unwrap().content().as_table().unwrap();
        assert_eq!(table.row_count(), 3);
        assert_eq!(table.columns, 3);
        assert!(table.is_consistent());

        // Each is its own history entry
        assert!(canvas.undo());
        let table = canvas.widget(&id).unwrap().content().as_table().unwrap();
        assert_eq!((table.row_count(), table.columns), (3, 2));
    }

    #[test]
    fn test_add_table_row_respects_limits() {
        let config = CanvasConfig {
            max_table_rows: 2,
            max_table_columns: 2,
            ..CanvasConfig::default()
        };
        let mut canvas = Canvas::with_config(Arc::new(MemoryStore::new()), config);
        let table = canvas.add_widget(WidgetKind::Table, &drop_at(0, 0));
        let text = canvas.add_widget(WidgetKind::Text, &drop_at(8, 0));
        canvas.setup_table(&table, 2, 2).unwrap();

        assert_eq!(
            canvas.add_table_row(&table),
            Err(CanvasError::TooManyRows { requested: 3, max: 2 })
        );
        assert_eq!(
            canvas.add_table_column(&table),
            Err(CanvasError::TooManyColumns { requested: 3, max: 2 })
        );
        assert_eq!(canvas.add_table_row(&text), Err(CanvasError::NotATable(text.clone())));
    }

    #[test]
    fn test_add_image_uses_aspect_ratio() {
        let mut canvas = canvas();
        let id = canvas.add_image(Size::new(1600.0, 900.0), &drop_at(0, 0));
        let widget = canvas.widget(&id).unwrap();
        assert_eq!(widget.kind(), WidgetKind::Image);
        assert_eq!(widget.size, Some(GridSize::new(8, 4)));
    }

    #[test]
    fn test_update_record_merges_partial_content() {
        let mut canvas = canvas();
        let id = canvas.add_widget(WidgetKind::Button, &drop_at(0, 0));
        let record: PatchRecord =
            serde_json::from_value(serde_json::json!({ "content": { "text": "Buy now" } })).unwrap();

        assert_eq!(canvas.update_widget_record(&id, record), Ok(true));
        let value = serde_json::to_value(canvas.widget(&id).unwrap().content()).unwrap();
        assert_eq!(value, serde_json::json!({ "text": "Buy now", "variant": "primary" }));

        let bad: PatchRecord =
            serde_json::from_value(serde_json::json!({ "content": { "text": 5 } })).unwrap();
        assert!(matches!(
            canvas.update_widget_record(&id, bad),
            Err(CanvasError::InvalidPatch { .. })
        ));
        let missing = WidgetId::from("missing");
        assert_eq!(canvas.update_widget_record(&missing, PatchRecord::default()), Ok(false));
    }

    #[test]
    fn test_reconcile_far_down_the_canvas() {
        let mut canvas = canvas();
        let a = canvas.add_widget(WidgetKind::Text, &drop_at(0, 0));
        let b = canvas.add_widget(WidgetKind::Text, &drop_at(6, 0));
        let far = 4_000_000_000;

        canvas.update_widget(&a, WidgetPatch::position(GridPosition::new(0, far)));
        canvas.update_widget(&b, WidgetPatch::position(GridPosition::new(2, far)));
        assert_eq!(canvas.widget(&b).unwrap().position, GridPosition::new(4, far));
        assert!(!overlap(canvas.widget(&a).unwrap(), canvas.widget(&b).unwrap()));
    }
}
