#![warn(clippy::all, rust_2018_idioms)]

pub mod app;
pub mod command;
pub mod components;
pub mod config;
pub mod document;
pub mod element;
pub mod error;
pub mod file_handler;
pub mod geometry;
pub mod id_generator;
pub mod image;
pub mod image_cache;
pub mod input;
pub mod panels;
pub mod renderer;
pub mod selection;
pub mod state;
pub mod stroke;
pub mod texture_manager;
pub mod tools;
pub mod util;
pub mod widgets;

pub use app::DesignApp;
pub use command::{Command, History};
pub use config::EditorConfig;
pub use document::Document;
pub use element::{Element, ElementId, ElementKind, ElementPatch, ShapeKind};
pub use error::{EditorError, EditorResult};
pub use input::{InputEvent, InputLocation};
pub use renderer::Renderer;
pub use state::{DesignData, DesignStore, EditorContext, EditorState, FileDesignStore};
pub use stroke::{Stroke, StrokeMode, StrokeRef};
pub use tools::{Tool, ToolKind, ToolSettings};
