//! The editing session behind the canvas.
//!
//! `EditorContext` owns the snapshot history, the transient selection, the
//! active tool and the raster surface. Every document change goes through
//! [`EditorContext::execute`]; pointer gestures only reach the history when
//! the active tool reports a finished gesture.

use egui::{PointerButton, Pos2};
use std::borrow::Cow;
use std::sync::Arc;
use thiserror::Error;

use super::persistence::{DesignData, DesignId, DesignStore, PersistenceResult};
use super::EditorState;
use crate::command::{Command, CommandError, History, ReorderDirection};
use crate::config::EditorConfig;
use crate::document::Document;
use crate::element::{
    Color, Element, ElementId, ElementPatch, ShapeKind, DEFAULT_FONT_SIZE,
};
use crate::error::{EditorError, EditorResult};
use crate::id_generator::IdAllocator;
use crate::image_cache::{DecodeTask, ImageCache};
use crate::input::{shortcut, EditorAction, InputEvent};
use crate::renderer::{RenderError, Renderer};
use crate::selection::Selection;
use crate::stroke::StrokeRef;
use crate::tools::{Tool, ToolContext, ToolKind, ToolResponse, ToolSettings, ToolType};

/// Where new shapes are placed.
pub const SHAPE_ORIGIN: Pos2 = Pos2::new(300.0, 100.0);
/// Where new text blocks are placed.
pub const TEXT_ORIGIN: Pos2 = Pos2::new(100.0, 100.0);
/// Where imported images are placed, and their initial size.
pub const IMAGE_ORIGIN: Pos2 = Pos2::new(50.0, 50.0);
pub const IMAGE_SIZE: f32 = 200.0;

/// Errors that can occur during state transitions.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum StateTransitionError {
    /// The requested state transition is not allowed from the current state
    #[error("cannot go from {from} to {to}")]
    InvalidTransition {
        from: &'static str,
        to: &'static str,
    },
}

/// The main context for the design editor.
#[derive(Debug)]
pub struct EditorContext {
    history: History,
    selection: Selection,
    ids: IdAllocator,
    tool: ToolType,
    settings: ToolSettings,
    renderer: Renderer,
    images: ImageCache,
    config: EditorConfig,
    state: EditorState,
    needs_render: bool,
    surface_changed: bool,
}

impl EditorContext {
    /// An empty design on a surface sized by `config`, with the Select tool active.
    pub fn new(config: EditorConfig) -> Result<Self, RenderError> {
        let renderer = Renderer::new(config.canvas_width, config.canvas_height)?;
        let history = History::new(Document::new())
            .with_limit(config.history_limit)
            .with_coalescing(config.coalesce_field_edits);
        Ok(Self {
            history,
            selection: Selection::none(),
            ids: IdAllocator::new(),
            tool: ToolType::new(ToolKind::Select),
            settings: ToolSettings::default(),
            renderer,
            images: ImageCache::new(),
            config,
            state: EditorState::Idle,
            needs_render: true,
            surface_changed: false,
        })
    }

    pub fn with_settings(mut self, settings: ToolSettings) -> Self {
        self.settings = settings;
        self
    }

    pub fn document(&self) -> &Document {
        self.history.current()
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    pub fn selection(&self) -> Selection {
        self.selection
    }

    pub fn selected_element(&self) -> Option<&Element> {
        self.selection
            .index()
            .and_then(|index| self.document().element(index))
    }

    /// Select the element at `index`, or clear the selection for an index
    /// past the end.
    pub fn select(&mut self, index: usize) {
        if index < self.document().elements().len() {
            self.selection.select(index);
        } else {
            self.selection.clear();
        }
        self.needs_render = true;
    }

    pub fn state(&self) -> EditorState {
        self.state
    }

    pub fn settings(&self) -> &ToolSettings {
        &self.settings
    }

    /// Settings that only affect future elements and strokes. Use the
    /// `set_*` methods for changes that should also restyle the selection.
    pub fn settings_mut(&mut self) -> &mut ToolSettings {
        &mut self.settings
    }

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    pub fn renderer(&self) -> &Renderer {
        &self.renderer
    }

    pub fn image_cache(&self) -> &ImageCache {
        &self.images
    }

    pub fn image_cache_mut(&mut self) -> &mut ImageCache {
        &mut self.images
    }

    /// Attempts to transition to a new state, validating the transition.
    pub fn transition_to(&mut self, new_state: EditorState) -> Result<(), StateTransitionError> {
        if !self.state.can_transition_to(&new_state) {
            return Err(StateTransitionError::InvalidTransition {
                from: self.state.name(),
                to: new_state.name(),
            });
        }
        if std::mem::discriminant(&self.state) != std::mem::discriminant(&new_state) {
            log::debug!("Editor state {} -> {}", self.state.name(), new_state.name());
        }
        self.state = new_state;
        Ok(())
    }

    /// Drop any gesture in progress without committing it.
    fn cancel_gesture(&mut self) {
        self.tool.deactivate();
        self.state = EditorState::Idle;
        self.needs_render = true;
    }

    // --- committing --------------------------------------------------------

    /// Commit `command` as a new snapshot.
    ///
    /// Returns `Ok(false)` when the command left the document unchanged and
    /// nothing was pushed. Ids brought in by the command are reserved so the
    /// session never hands them out again.
    pub fn execute(&mut self, command: Command) -> Result<bool, CommandError> {
        let len = self.document().elements().len();
        let changed = self.history.execute(&command)?;
        if let Some(id) = command.added_id() {
            self.ids.reserve_through(id);
        }
        if changed {
            log::debug!("Committed {}", command.name());
            self.selection.follow(&command, len);
            self.needs_render = true;
        }
        Ok(changed)
    }

    /// Replace the whole session with a loaded design. Not undoable.
    pub fn load(&mut self, design: DesignData) {
        let mut doc = design.into_document();
        let renumbered = doc.normalize_ids(&mut self.ids);
        log::info!(
            "Loaded design {:?}: {} elements, {} strokes ({} ids reassigned)",
            doc.title(),
            doc.elements().len(),
            doc.strokes().len(),
            renumbered
        );
        self.cancel_gesture();
        self.selection.clear();
        self.history.reset(doc);
    }

    /// Parse and [`load`](Self::load) a stored design.
    pub fn load_json(&mut self, json: &str) -> PersistenceResult<()> {
        self.load(DesignData::from_json(json)?);
        Ok(())
    }

    /// Drop every element, stroke and history entry. The title stays, and the
    /// cleared design becomes the new history root.
    pub fn clear(&mut self) {
        let mut root = Document::new();
        root.set_title(self.document().title());
        self.cancel_gesture();
        self.selection.clear();
        self.history.reset(root);
        log::info!("Canvas cleared");
    }

    pub fn undo(&mut self) -> bool {
        self.cancel_gesture();
        self.selection.clear();
        self.history.undo()
    }

    pub fn redo(&mut self) -> bool {
        self.cancel_gesture();
        self.selection.clear();
        self.history.redo()
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    /// Close a title or rotation editing session; the next edit of that
    /// field starts a new history entry.
    pub fn end_edit_session(&mut self) {
        self.history.end_edit_session();
    }

    // --- element operations -------------------------------------------------

    pub fn add_element(&mut self, element: Element) -> Result<ElementId, CommandError> {
        let id = element.id;
        self.execute(Command::AddElement(element))?;
        Ok(id)
    }

    /// Add a `shape` with the current shape color and switch back to Select.
    pub fn add_shape(&mut self, shape: ShapeKind) -> EditorResult<ElementId> {
        self.settings.shape_kind = shape;
        self.set_tool(ToolKind::Select);
        let element = Element::shape(
            self.ids.generate_id(),
            shape,
            SHAPE_ORIGIN,
            self.settings.shape_color.clone(),
        );
        Ok(self.add_element(element)?)
    }

    /// Add a text block sized to its measured width in the current font.
    pub fn add_text(&mut self, text: &str) -> EditorResult<ElementId> {
        if text.trim().is_empty() {
            return Err(EditorError::EmptyText);
        }
        let family = self.settings.font_family.clone();
        let width = self
            .renderer
            .fonts()
            .measure(text, &family, DEFAULT_FONT_SIZE);
        let element = Element::text(
            self.ids.generate_id(),
            text,
            TEXT_ORIGIN,
            width,
            DEFAULT_FONT_SIZE,
            family,
            self.settings.text_color.clone(),
        );
        Ok(self.add_element(element)?)
    }

    /// Add an image element holding `bytes` as a data URI. The raster
    /// shows up once its decode task has run.
    pub fn import_image(&mut self, bytes: &[u8]) -> EditorResult<ElementId> {
        let src = crate::image::import_data_uri(bytes)?;
        let rect = egui::Rect::from_min_size(IMAGE_ORIGIN, egui::vec2(IMAGE_SIZE, IMAGE_SIZE));
        let element = Element::image(self.ids.generate_id(), src, rect);
        log::info!("Imported image element {} ({} bytes)", element.id, bytes.len());
        Ok(self.add_element(element)?)
    }

    pub fn add_stroke(&mut self, stroke: StrokeRef) -> Result<bool, CommandError> {
        self.execute(Command::AddStroke(stroke))
    }

    pub fn update_element(&mut self, index: usize, patch: ElementPatch) -> Result<bool, CommandError> {
        self.execute(Command::UpdateElement { index, patch })
    }

    fn update_selected(&mut self, patch: ElementPatch) -> EditorResult<bool> {
        let index = self.selection.index().ok_or(EditorError::NothingSelected)?;
        Ok(self.update_element(index, patch)?)
    }

    /// Remember `color` for new shapes and recolor the selected element, if
    /// it has a color.
    pub fn set_shape_color(&mut self, color: Color) -> bool {
        self.settings.shape_color = color.clone();
        if self.selected_element().and_then(Element::color).is_none() {
            return false;
        }
        self.update_selected(ElementPatch::color(color))
            .unwrap_or_else(|err| log_rejected("recolor", err))
    }

    /// Remember `color` for new text and recolor the selected text element.
    pub fn set_text_color(&mut self, color: Color) -> bool {
        self.settings.text_color = color.clone();
        if !self.selected_element().is_some_and(Element::is_text) {
            return false;
        }
        self.update_selected(ElementPatch::color(color))
            .unwrap_or_else(|err| log_rejected("text recolor", err))
    }

    /// Remember `family` for new text and apply it to the selected text element.
    pub fn set_font_family(&mut self, family: &str) -> bool {
        self.settings.font_family = family.to_owned();
        if !self.selected_element().is_some_and(Element::is_text) {
            return false;
        }
        self.update_selected(ElementPatch::font_family(family))
            .unwrap_or_else(|err| log_rejected("font change", err))
    }

    /// Rotate the selected element to `degrees`.
    pub fn set_rotation(&mut self, degrees: f32) -> bool {
        self.update_selected(ElementPatch::rotation(degrees))
            .unwrap_or_else(|err| log_rejected("rotation", err))
    }

    /// Move the selected element one step toward the front or back.
    pub fn reorder(&mut self, direction: ReorderDirection) -> bool {
        let Some(index) = self.selection.index() else {
            return false;
        };
        self.execute(Command::Reorder { index, direction })
            .unwrap_or_else(|err| log_rejected("reorder", EditorError::from(err)))
    }

    pub fn delete_selected(&mut self) -> bool {
        let Some(index) = self.selection.index() else {
            return false;
        };
        self.execute(Command::DeleteElement { index })
            .unwrap_or_else(|err| log_rejected("delete", EditorError::from(err)))
    }

    pub fn set_title(&mut self, title: impl Into<String>) -> bool {
        self.execute(Command::SetTitle(title.into()))
            .unwrap_or_else(|err| log_rejected("title change", EditorError::from(err)))
    }

    // --- tools and input ----------------------------------------------------

    pub fn current_tool(&self) -> ToolKind {
        self.tool.kind()
    }

    pub fn tool(&self) -> &ToolType {
        &self.tool
    }

    /// Switch tools. A gesture in progress is dropped.
    pub fn set_tool(&mut self, kind: ToolKind) {
        if self.tool.kind() == kind {
            return;
        }
        log::info!("Tool changed: {} -> {}", self.tool.name(), kind.label());
        self.cancel_gesture();
        self.tool = ToolType::new(kind);
    }

    /// Feed one input event through the active tool.
    ///
    /// Returns true if anything visible changed.
    pub fn handle_input(&mut self, event: &InputEvent) -> bool {
        match event {
            InputEvent::PointerDown {
                location,
                button: PointerButton::Primary,
            } if location.is_in_canvas => {
                let pos = location.position;
                self.dispatch(|tool, ctx| tool.on_pointer_down(pos, ctx))
            }
            InputEvent::PointerMove { location, .. }
                if !self.state.is_idle() && !location.is_in_canvas =>
            {
                log::debug!("Pointer left the canvas mid-gesture");
                let pos = location.position;
                self.dispatch(|tool, ctx| tool.on_pointer_up(pos, ctx))
            }
            InputEvent::PointerMove { location, .. } if !self.state.is_idle() => {
                let pos = location.position;
                self.dispatch(|tool, ctx| tool.on_pointer_move(pos, ctx))
            }
            InputEvent::PointerUp {
                location,
                button: PointerButton::Primary,
            } if !self.state.is_idle() => {
                let pos = location.position;
                self.dispatch(|tool, ctx| tool.on_pointer_up(pos, ctx))
            }
            InputEvent::PointerLeave {
                last_known_location,
            } if !self.state.is_idle() => {
                let pos = last_known_location.position;
                self.dispatch(|tool, ctx| tool.on_pointer_up(pos, ctx))
            }
            InputEvent::KeyDown { key, modifiers } => match shortcut(*key, *modifiers) {
                Some(action) => self.perform(action),
                None => false,
            },
            _ => false,
        }
    }

    pub fn perform(&mut self, action: EditorAction) -> bool {
        match action {
            EditorAction::Undo => self.undo(),
            EditorAction::Redo => self.redo(),
            EditorAction::DeleteSelected => self.delete_selected(),
        }
    }

    fn dispatch(
        &mut self,
        handle: impl FnOnce(&mut ToolType, &mut ToolContext<'_>) -> ToolResponse,
    ) -> bool {
        let response = {
            let mut ctx = ToolContext {
                document: self.history.current(),
                selection: &mut self.selection,
                ids: &mut self.ids,
                settings: &self.settings,
            };
            handle(&mut self.tool, &mut ctx)
        };

        if let Err(err) = self.transition_to(self.tool.state()) {
            log::warn!("{}; dropping the gesture", err);
            self.cancel_gesture();
        }

        match response {
            ToolResponse::Ignored => false,
            ToolResponse::SelectionChanged | ToolResponse::PreviewChanged => {
                self.needs_render = true;
                true
            }
            ToolResponse::Segment(from, to) => {
                if let Some(stroke) = self.tool.in_progress() {
                    self.renderer
                        .paint_segment(from, to, stroke.color(), stroke.size(), stroke.mode());
                    self.surface_changed = true;
                }
                true
            }
            ToolResponse::Commit(command) => {
                let result = match self.execute(command.clone()) {
                    Err(CommandError::DuplicateId(taken)) => match command {
                        Command::AddStroke(stroke) => {
                            let id = self.ids.generate_id();
                            log::warn!("Stroke id {} already taken, using {}", taken, id);
                            self.execute(Command::AddStroke(Arc::new(stroke.with_id(id))))
                        }
                        _ => Err(CommandError::DuplicateId(taken)),
                    },
                    result => result,
                };
                if let Err(err) = result {
                    log::warn!("Gesture commit rejected: {}", err);
                }
                self.needs_render = true;
                true
            }
        }
    }

    // --- rendering ----------------------------------------------------------

    /// The committed snapshot with the element being dragged or resized swapped in.
    pub fn preview_document(&self) -> Cow<'_, Document> {
        match self.tool.draft() {
            Some((index, draft)) => {
                let mut doc = self.document().clone();
                doc.replace_element(index, draft.clone());
                Cow::Owned(doc)
            }
            None => Cow::Borrowed(self.document()),
        }
    }

    /// Full repaint of the surface.
    pub fn render(&mut self) {
        let images = self.images.snapshot();
        let preview = self.preview_document().into_owned();
        self.renderer.render(
            &preview,
            &images,
            self.selection.index(),
            self.tool.in_progress(),
        );
        self.needs_render = false;
        self.surface_changed = true;
    }

    /// Repaint if something asked for it since the last call, including a
    /// finished image decode. Returns true if the surface changed since the
    /// last call.
    pub fn refresh(&mut self) -> bool {
        if self.images.take_dirty() {
            self.needs_render = true;
        }
        if self.needs_render {
            self.render();
        }
        std::mem::take(&mut self.surface_changed)
    }

    /// Decode tasks for the images of the current snapshot that have no
    /// raster yet. The caller decides where they run.
    pub fn take_decode_tasks(&self) -> Vec<DecodeTask> {
        self.images.sync(self.document())
    }

    // --- export -------------------------------------------------------------

    /// The save payload for the current snapshot.
    pub fn export_design(&self, thumbnail_url: Option<String>) -> DesignData {
        DesignData::from_document(self.document(), thumbnail_url)
    }

    /// The current snapshot as PNG bytes, without selection decoration.
    pub fn render_png(&self) -> Result<Vec<u8>, RenderError> {
        self.renderer
            .export_png(self.document(), &self.images.snapshot())
    }

    /// Upload a thumbnail, then save the design referencing it. History is
    /// left alone whether or not this succeeds.
    pub fn save_to(&self, store: &mut dyn DesignStore) -> EditorResult<DesignId> {
        let png = self.render_png()?;
        let thumbnail_url = store.upload_thumbnail(&png)?;
        let design = self.export_design(Some(thumbnail_url));
        let id = store.save(&design)?;
        log::info!("Saved design {:?} as {}", design.title, id);
        Ok(id)
    }

    /// File name for downloading the PNG export.
    pub fn download_file_name(&self) -> String {
        download_file_name(self.document().title())
    }
}

/// `title` with `.png` appended when missing; `canvas.png` for a blank title.
pub fn download_file_name(title: &str) -> String {
    let title = title.trim();
    if title.is_empty() {
        "canvas.png".to_owned()
    } else if title.to_lowercase().ends_with(".png") {
        title.to_owned()
    } else {
        format!("{title}.png")
    }
}

fn log_rejected(what: &str, err: EditorError) -> bool {
    log::warn!("Ignoring {}: {}", what, err);
    false
}
