//! Canvas interaction controller.
//!
//! [`Canvas`] owns the element store, the camera, the selection, the tool
//! manager and the content editor. Pointer events come in through
//! [`Canvas::handle_pointer_event`]; discrete toolbar actions through the
//! named methods (or [`Canvas::apply`]). Renderers read a [`RenderView`].

use crate::camera::Camera;
use crate::config::{ConfigError, EditorConfig};
use crate::editor::{ContentEditor, EditError, EditSession, TextEditResult, TextKey, TextModifiers};
use crate::element::{Element, ElementId, ElementKind, ElementPatch, StickyColor};
use crate::hit::hit_test;
use crate::id::{IdAllocator, SequentialIds};
use crate::input::{InputState, MouseButton, PointerEvent};
use crate::storage::{Storage, StorageResult};
use crate::store::{ElementStore, SnapshotError};
use crate::tools::{CursorIcon, PointerDownAction, ToolKind, ToolManager, ToolState};
use kurbo::{Point, Vec2};
use std::time::{Duration, Instant};

/// Read-only projection of everything a renderer needs for one frame.
#[derive(Debug, Clone, Copy)]
pub struct RenderView<'a> {
    /// Elements back to front.
    pub elements: &'a [Element],
    pub camera: &'a Camera,
    pub selection: Option<&'a ElementId>,
    /// Rectangle/circle currently being drawn.
    pub preview: Option<&'a Element>,
    /// Open content edit; render its buffer instead of the stored content.
    pub editing: Option<&'a EditSession>,
    pub cursor: CursorIcon,
    /// Store revision this view was taken at.
    pub revision: u64,
}

/// Runtime canvas state (not persisted).
#[derive(Debug)]
pub struct Canvas {
    store: ElementStore,
    camera: Camera,
    tools: ToolManager,
    /// Selected element, held by id only.
    selection: Option<ElementId>,
    editor: ContentEditor,
    input: InputState,
    ids: Box<dyn IdAllocator>,
    config: EditorConfig,
}

impl Default for Canvas {
    fn default() -> Self {
        Self::new()
    }
}

impl Canvas {
    /// Create an empty canvas with the default configuration.
    pub fn new() -> Self {
        Self::from_valid_config(EditorConfig::default())
    }

    /// Create an empty canvas with the given configuration.
    pub fn with_config(config: EditorConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self::from_valid_config(config))
    }

    fn from_valid_config(config: EditorConfig) -> Self {
        let input = InputState::new().with_double_click(
            Duration::from_millis(config.double_click_ms),
            config.double_click_distance,
        );
        Self {
            store: ElementStore::new(),
            camera: Camera::from_config(&config),
            tools: ToolManager::new(),
            selection: None,
            editor: ContentEditor::new(),
            input,
            ids: Box::new(SequentialIds::new()),
            config,
        }
    }

    /// Use a different id source for new elements.
    pub fn with_id_allocator(mut self, ids: impl IdAllocator + 'static) -> Self {
        self.ids = Box::new(ids);
        self
    }

    pub fn store(&self) -> &ElementStore {
        &self.store
    }

    pub fn elements(&self) -> &[Element] {
        self.store.elements()
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    pub fn tool(&self) -> ToolKind {
        self.tools.current_tool()
    }

    /// The interaction session in progress.
    pub fn session(&self) -> &ToolState {
        self.tools.state()
    }

    pub fn selection(&self) -> Option<&ElementId> {
        self.selection.as_ref()
    }

    pub fn selected_element(&self) -> Option<&Element> {
        self.selection.as_ref().and_then(|id| self.store.get(id))
    }

    /// Provisional element of a draw session.
    pub fn preview(&self) -> Option<&Element> {
        self.tools.preview()
    }

    pub fn edit_session(&self) -> Option<&EditSession> {
        self.editor.session()
    }

    /// Snapshot for the rendering layer.
    pub fn view(&self) -> RenderView<'_> {
        RenderView {
            elements: self.store.elements(),
            camera: &self.camera,
            selection: self.selection.as_ref(),
            preview: self.tools.preview(),
            editing: self.editor.session(),
            cursor: self.tools.current_tool().cursor(),
            revision: self.store.revision(),
        }
    }

    /// Switch tools. Any session in progress ends without committing.
    pub fn set_tool(&mut self, tool: ToolKind) {
        let dropped = self.tools.set_tool(tool);
        if !matches!(dropped, ToolState::Idle) {
            log::debug!("Tool changed to {} mid-session; dropped {:?}", tool, dropped);
        } else {
            log::debug!("Tool changed to {}", tool);
        }
    }

    // --- Pointer input ---

    /// Process a pointer event received now.
    pub fn handle_pointer_event(&mut self, event: PointerEvent) {
        self.handle_pointer_event_at(event, Instant::now());
    }

    /// Process a pointer event received at `now`.
    pub fn handle_pointer_event_at(&mut self, event: PointerEvent, now: Instant) {
        self.input.handle_pointer_event_at(&event, now);
        match event {
            PointerEvent::Down { position, button } => self.on_pointer_down(position, button),
            PointerEvent::Move { position } => self.on_pointer_move(position),
            PointerEvent::Up {
                button: MouseButton::Left,
                ..
            } => self.on_pointer_up(),
            PointerEvent::Up { .. } => {}
            PointerEvent::Scroll { delta, .. } => self.wheel(delta),
        }
    }

    /// Primary-button press at a screen position.
    pub fn pointer_down(&mut self, screen: Point) {
        self.handle_pointer_event(PointerEvent::Down {
            position: screen,
            button: MouseButton::Left,
        });
    }

    /// Pointer movement to a screen position.
    pub fn pointer_move(&mut self, screen: Point) {
        self.handle_pointer_event(PointerEvent::Move { position: screen });
    }

    /// Primary-button release at a screen position.
    pub fn pointer_up(&mut self, screen: Point) {
        self.handle_pointer_event(PointerEvent::Up {
            position: screen,
            button: MouseButton::Left,
        });
    }

    fn on_pointer_down(&mut self, screen: Point, button: MouseButton) {
        if button != MouseButton::Left {
            return;
        }
        if self.tools.is_active() {
            // The release was never delivered; close the old session first.
            self.finish_session();
        }

        let world = self.camera.screen_to_world(screen);
        self.commit_edit_unless_inside(world);

        match self.tools.route_pointer_down() {
            PointerDownAction::StartPan => {
                self.tools.begin_pan(screen, self.camera.offset);
                log::debug!("Pan started at {:?}", screen);
            }
            PointerDownAction::SelectAt => self.select_at(world),
            PointerDownAction::Place(kind) => {
                self.place_element(kind, world);
            }
            PointerDownAction::StartDraw(kind) => {
                let id = self.allocate_id();
                log::debug!("Drawing {:?} {} from {:?}", kind, id, world);
                self.tools.begin_draw(id, kind, world);
            }
        }
    }

    fn select_at(&mut self, world: Point) {
        let Some(hit) = hit_test(&self.store, world) else {
            self.selection = None;
            return;
        };
        let id = hit.id.clone();
        let editable = hit.kind.has_content();
        self.tools.begin_drag(id.clone(), world, hit.origin());
        log::debug!("Dragging {}", id);

        if editable && self.input.is_double_click() {
            if let Err(err) = self.editor.begin(&mut self.store, &id) {
                log::warn!("Cannot edit {}: {}", id, err);
            }
        }
        self.selection = Some(id);
    }

    /// A press outside the element being edited counts as losing focus.
    fn commit_edit_unless_inside(&mut self, world: Point) {
        let Some(session) = self.editor.session() else {
            return;
        };
        let inside = self
            .store
            .get(session.id())
            .is_some_and(|e| e.contains(world));
        if !inside {
            self.editor.commit(&mut self.store);
        }
    }

    fn on_pointer_move(&mut self, screen: Point) {
        match self.tools.state() {
            ToolState::Idle => {}
            ToolState::Pan { .. } => {
                if let Some(offset) = self.tools.pan_offset_for(screen) {
                    self.camera.set_offset(offset);
                }
            }
            ToolState::Drag { .. } => {
                if !self.input.only_primary_pressed() {
                    return;
                }
                let world = self.camera.screen_to_world(screen);
                let Some((id, origin)) = self.tools.drag_target(world) else {
                    return;
                };
                if let Err(err) = self.store.update(id, &ElementPatch::position(origin)) {
                    log::warn!("Drag target vanished: {}", err);
                    self.tools.end();
                }
            }
            ToolState::Draw { .. } => {
                let world = self.camera.screen_to_world(screen);
                self.tools.update_draw(world);
            }
        }
    }

    fn on_pointer_up(&mut self) {
        self.finish_session();
    }

    /// End the active session; a drawn element is committed only if it is
    /// larger than `min_draw_size` in both dimensions.
    fn finish_session(&mut self) {
        match self.tools.end() {
            ToolState::Idle => {}
            ToolState::Pan { .. } => log::debug!("Pan ended at {:?}", self.camera.offset),
            ToolState::Drag { id, .. } => log::debug!("Drag of {} ended", id),
            ToolState::Draw { preview, .. } => {
                let min = self.config.min_draw_size;
                if preview.width > min && preview.height > min {
                    let id = preview.id.clone();
                    match self.store.create(preview) {
                        Ok(()) => log::debug!("Committed drawn element {}", id),
                        Err(err) => log::warn!("Drawn element not committed: {}", err),
                    }
                } else {
                    log::debug!(
                        "Discarded {}x{} draw below threshold",
                        preview.width,
                        preview.height
                    );
                }
            }
        }
    }

    /// Create a text or sticky element at a world position and select it.
    fn place_element(&mut self, kind: ElementKind, world: Point) -> Option<ElementId> {
        let id = self.allocate_id();
        let element = match kind {
            ElementKind::Text => Element::text(
                id.clone(),
                world,
                self.config.text_size,
                self.config.text_placeholder.clone(),
            ),
            ElementKind::Sticky => Element::sticky(
                id.clone(),
                world,
                self.config.sticky_size,
                self.config.sticky_placeholder.clone(),
                StickyColor::for_index(self.store.len()),
            ),
            ElementKind::Rectangle | ElementKind::Circle => {
                Element::new(id.clone(), kind, world, kurbo::Size::ZERO)
            }
        };
        match self.store.create(element) {
            Ok(()) => {
                log::debug!("Placed {:?} {} at {:?}", kind, id, world);
                self.selection = Some(id.clone());
                Some(id)
            }
            Err(err) => {
                log::warn!("Placement failed: {}", err);
                None
            }
        }
    }

    /// Next id not already used by the store (imports may contain any id).
    fn allocate_id(&mut self) -> ElementId {
        loop {
            let id = self.ids.next_id();
            if !self.store.contains(&id) {
                return id;
            }
        }
    }

    // --- Viewport ---

    /// Apply a wheel scroll: down zooms out, up zooms in, one step per event.
    pub fn wheel(&mut self, delta: Vec2) {
        let step = self.config.wheel_zoom_step;
        if delta.y > 0.0 {
            self.zoom_by(-step);
        } else if delta.y < 0.0 {
            self.zoom_by(step);
        }
    }

    /// Change zoom by an additive delta, clamped. Returns the new zoom.
    pub fn zoom_by(&mut self, delta: f64) -> f64 {
        let zoom = self.camera.zoom_by(delta);
        log::debug!("Zoom {:.2}", zoom);
        zoom
    }

    pub fn zoom_in(&mut self) -> f64 {
        self.zoom_by(self.config.button_zoom_step)
    }

    pub fn zoom_out(&mut self) -> f64 {
        self.zoom_by(-self.config.button_zoom_step)
    }

    // --- Selection and element mutation ---

    /// Select an element by id. Returns `false` if it does not exist.
    pub fn select(&mut self, id: &ElementId) -> bool {
        if self.store.contains(id) {
            self.selection = Some(id.clone());
            true
        } else {
            false
        }
    }

    pub fn clear_selection(&mut self) {
        self.selection = None;
    }

    /// Merge a patch into an element. A stale id is logged and ignored.
    pub fn update_element(&mut self, id: &ElementId, patch: &ElementPatch) -> bool {
        match self.store.update(id, patch) {
            Ok(_) => true,
            Err(err) => {
                log::warn!("Ignoring update: {}", err);
                false
            }
        }
    }

    /// Delete an element, clearing the selection and any edit or drag that
    /// refers to it. A stale id is logged and ignored.
    pub fn delete_element(&mut self, id: &ElementId) -> Option<Element> {
        let removed = match self.store.delete(id) {
            Ok(element) => element,
            Err(err) => {
                log::warn!("Ignoring delete: {}", err);
                return None;
            }
        };
        if self.selection.as_ref() == Some(id) {
            self.selection = None;
        }
        self.editor.forget(id);
        if matches!(self.tools.state(), ToolState::Drag { id: dragged, .. } if dragged == id) {
            self.tools.end();
        }
        log::debug!("Deleted {}", id);
        Some(removed)
    }

    /// Delete the selected element, if any.
    pub fn delete_selected(&mut self) -> Option<Element> {
        let id = self.selection.clone()?;
        self.delete_element(&id)
    }

    /// Remove every element.
    pub fn clear_all(&mut self) {
        self.store.clear();
        self.reset_transient_state();
        log::info!("Canvas cleared");
    }

    /// Serialize the store as a JSON array of elements.
    pub fn export_snapshot(&self) -> Result<String, SnapshotError> {
        let json = self.store.to_json()?;
        log::info!("Exported {} elements", self.store.len());
        Ok(json)
    }

    /// Replace the store with a JSON snapshot.
    ///
    /// Nothing changes unless the whole snapshot parses and validates.
    /// Returns the number of imported elements.
    pub fn import_snapshot(&mut self, json: &str) -> Result<usize, SnapshotError> {
        let store = ElementStore::from_json(json).inspect_err(|err| {
            log::warn!("Import rejected: {}", err);
        })?;
        Ok(self.replace_store(store))
    }

    /// Replace the store with an already validated one.
    pub fn replace_store(&mut self, store: ElementStore) -> usize {
        self.store.replace_with(store);
        self.reset_transient_state();
        log::info!("Imported {} elements", self.store.len());
        self.store.len()
    }

    /// Save the board under `name`.
    pub fn save_to(&self, storage: &dyn Storage, name: &str) -> StorageResult<()> {
        storage.save(name, &self.store)?;
        log::info!("Saved {} elements as {}", self.store.len(), name);
        Ok(())
    }

    /// Replace the board with the one saved under `name`.
    ///
    /// On failure the canvas is left untouched.
    pub fn load_from(&mut self, storage: &dyn Storage, name: &str) -> StorageResult<usize> {
        let store = storage.load(name).inspect_err(|err| {
            log::warn!("Load of {} failed: {}", name, err);
        })?;
        Ok(self.replace_store(store))
    }

    fn reset_transient_state(&mut self) {
        self.selection = None;
        self.editor.cancel();
        self.tools.end();
    }

    // --- Content editing ---

    /// Enter edit mode for a text or sticky element.
    pub fn begin_edit(&mut self, id: &ElementId) -> Result<(), EditError> {
        self.editor.begin(&mut self.store, id)
    }

    /// Feed a key to the open edit session.
    pub fn edit_key(&mut self, key: &TextKey, modifiers: TextModifiers) -> TextEditResult {
        self.editor.handle_key(&mut self.store, key, modifiers)
    }

    /// Replace the edit buffer wholesale (e.g. from a platform text field).
    pub fn set_edit_buffer(&mut self, text: &str) -> bool {
        match self.editor.session_mut() {
            Some(session) => {
                session.set_buffer(text);
                true
            }
            None => false,
        }
    }

    /// Commit the open edit (confirm or focus loss).
    pub fn commit_edit(&mut self) -> Option<ElementId> {
        self.editor.commit(&mut self.store)
    }

    /// Abandon the open edit without touching the store.
    pub fn cancel_edit(&mut self) -> Option<EditSession> {
        self.editor.cancel()
    }
}
