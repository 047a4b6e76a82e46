use egui::{Rect, TextureId};

use crate::config::EditorConfig;
use crate::error::{EditorError, EditorResult};
use crate::file_handler::{DroppedFile, FileHandler};
use crate::image_cache::DecodeTask;
use crate::input::InputHandler;
use crate::panels::{central_panel, tools_panel};
use crate::state::{DesignId, DesignStore, DesignSummary, EditorContext, FileDesignStore};
use crate::texture_manager::CanvasTexture;
use crate::tools::ToolSettings;

/// The part of the app that survives a restart.
#[derive(serde::Deserialize, serde::Serialize, Debug, Default)]
#[serde(default)] // if we add new fields, give them default values when deserializing old state
struct PersistedState {
    config: EditorConfig,
    settings: ToolSettings,
}

pub struct DesignApp {
    editor: EditorContext,
    store: FileDesignStore,
    saved_designs: Vec<DesignSummary>,
    input: InputHandler,
    texture: CanvasTexture,
    file_handler: FileHandler,
    /// Contents of the "add text" field
    pub text_input: String,
    status: Option<String>,
}

impl DesignApp {
    /// Called once before the first frame.
    pub fn new(cc: &eframe::CreationContext<'_>) -> Result<Self, EditorError> {
        let persisted: PersistedState = cc
            .storage
            .and_then(|storage| eframe::get_value(storage, eframe::APP_KEY))
            .unwrap_or_default();

        let store = FileDesignStore::new(&persisted.config.store_dir);
        let mut editor = EditorContext::new(persisted.config)?.with_settings(persisted.settings);

        let repaint_ctx = cc.egui_ctx.clone();
        editor
            .image_cache_mut()
            .set_repaint_callback(move || repaint_ctx.request_repaint());

        let mut app = Self {
            editor,
            store,
            saved_designs: Vec::new(),
            input: InputHandler::new(Rect::NOTHING),
            texture: CanvasTexture::new(),
            file_handler: FileHandler::new(),
            text_input: String::new(),
            status: None,
        };
        app.refresh_saved_designs();
        Ok(app)
    }

    pub fn editor(&self) -> &EditorContext {
        &self.editor
    }

    pub fn editor_mut(&mut self) -> &mut EditorContext {
        &mut self.editor
    }

    pub fn status(&self) -> Option<&str> {
        self.status.as_deref()
    }

    fn set_status(&mut self, status: impl Into<String>) {
        let status = status.into();
        log::info!("{}", status);
        self.status = Some(status);
    }

    pub fn saved_designs(&self) -> &[DesignSummary] {
        &self.saved_designs
    }

    pub fn refresh_saved_designs(&mut self) {
        match self.store.list() {
            Ok(designs) => self.saved_designs = designs,
            Err(err) => log::warn!("Cannot list saved designs: {}", err),
        }
    }

    /// Route this frame's pointer and key input to the editor.
    pub fn handle_input(&mut self, ctx: &egui::Context, canvas_rect: Rect, scale: f32) {
        self.input.set_canvas_rect(canvas_rect, scale);
        let keys = !ctx.wants_keyboard_input();
        for event in self.input.process_input(ctx, keys) {
            if self.editor.handle_input(&event) {
                ctx.request_repaint();
            }
        }
    }

    /// Bring the canvas texture up to date and return it.
    pub fn canvas_texture(&mut self, ctx: &egui::Context) -> TextureId {
        let changed = self.editor.refresh();
        let editor = &self.editor;
        self.texture
            .sync(ctx, changed, || editor.renderer().to_color_image())
    }

    pub fn import_image(&mut self, name: &str, bytes: &[u8]) {
        match self.editor.import_image(bytes) {
            Ok(_) => self.set_status(format!("Imported {name}")),
            Err(err) => self.set_status(format!("Cannot import {name}: {err}")),
        }
    }

    pub fn save_design(&mut self) {
        match self.editor.save_to(&mut self.store) {
            Ok(id) => {
                self.set_status(format!("Design saved ({id})"));
                self.refresh_saved_designs();
            }
            Err(err) => self.set_status(format!("Failed to save design: {err}")),
        }
    }

    pub fn open_design(&mut self, id: DesignId) {
        match self.store.load(id) {
            Ok(design) => {
                self.editor.load(design);
                self.set_status("Design loaded");
            }
            Err(err) => self.set_status(format!("Failed to load design: {err}")),
        }
    }

    /// Write the PNG export into the designs directory.
    #[cfg(not(target_arch = "wasm32"))]
    pub fn download(&mut self) {
        let path = self.store.dir().join(self.editor.download_file_name());
        match self.write_png(&path) {
            Ok(()) => self.set_status(format!("Exported {}", path.display())),
            Err(err) => self.set_status(format!("Export failed: {err}")),
        }
    }

    #[cfg(not(target_arch = "wasm32"))]
    fn write_png(&self, path: &std::path::Path) -> EditorResult<()> {
        let png = self.editor.render_png()?;
        std::fs::create_dir_all(self.store.dir())?;
        std::fs::write(path, png)?;
        Ok(())
    }

    #[cfg(target_arch = "wasm32")]
    pub fn download(&mut self) {
        self.set_status("Download is not available in the web build");
    }

    fn handle_dropped_files(&mut self, ctx: &egui::Context) {
        for file in self.file_handler.take_dropped_files(ctx) {
            match file {
                DroppedFile::Image { name, bytes } => self.import_image(&name, &bytes),
                DroppedFile::Design { name, json } => match self.editor.load_json(&json) {
                    Ok(()) => self.set_status(format!("Opened {name}")),
                    Err(err) => self.set_status(format!("Cannot open {name}: {err}")),
                },
            }
        }
    }

    fn spawn_decodes(&self) {
        for task in self.editor.take_decode_tasks() {
            spawn_decode(task);
        }
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn spawn_decode(task: DecodeTask) {
    std::thread::spawn(move || {
        let outcome = futures::executor::block_on(task);
        log::debug!("Image decode finished: {:?}", outcome);
    });
}

#[cfg(target_arch = "wasm32")]
fn spawn_decode(task: DecodeTask) {
    wasm_bindgen_futures::spawn_local(async move {
        let outcome = task.await;
        log::debug!("Image decode finished: {:?}", outcome);
    });
}

impl eframe::App for DesignApp {
    /// Called by the frame work to save state before shutdown.
    fn save(&mut self, storage: &mut dyn eframe::Storage) {
        let state = PersistedState {
            config: self.editor.config().clone(),
            settings: self.editor.settings().clone(),
        };
        eframe::set_value(storage, eframe::APP_KEY, &state);
    }

    /// Called each time the UI needs repainting, which may be many times per second.
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.handle_dropped_files(ctx);

        tools_panel(self, ctx);
        central_panel(self, ctx);

        self.spawn_decodes();
        self.file_handler.preview_files_being_dropped(ctx);
    }
}
