use egui::Pos2;
use serde::{Deserialize, Serialize};

use crate::command::Command;
use crate::document::Document;
use crate::element::{
    Color, Element, ShapeKind, DEFAULT_FONT_FAMILY, DEFAULT_PENCIL_COLOR, DEFAULT_SHAPE_COLOR,
    DEFAULT_TEXT_COLOR,
};
use crate::id_generator::IdAllocator;
use crate::selection::Selection;
use crate::state::EditorState;
use crate::stroke::{StrokeBuilder, StrokeMode};

/// Font families offered for text.
pub const FONT_FAMILIES: [&str; 20] = [
    "Arial",
    "Times New Roman",
    "Georgia",
    "Courier New",
    "Comic Sans MS",
    "Verdana",
    "Trebuchet MS",
    "Lucida Console",
    "Impact",
    "Tahoma",
    "Palatino Linotype",
    "Garamond",
    "Brush Script MT",
    "Helvetica",
    "Futura",
    "Gill Sans",
    "Rockwell",
    "Franklin Gothic Medium",
    "Copperplate",
    "Optima",
];

/// Range of the pencil width control.
pub const BRUSH_SIZE_RANGE: std::ops::RangeInclusive<f32> = 1.0..=30.0;
/// Range of the eraser width control.
pub const ERASER_SIZE_RANGE: std::ops::RangeInclusive<f32> = 5.0..=50.0;

/// User-adjustable tool options, remembered between runs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ToolSettings {
    pub shape_kind: ShapeKind,
    pub shape_color: Color,
    pub text_color: Color,
    pub font_family: String,
    pub pencil_color: Color,
    pub brush_size: f32,
    pub eraser_size: f32,
}

impl Default for ToolSettings {
    fn default() -> Self {
        Self {
            shape_kind: ShapeKind::Rectangle,
            shape_color: Color::new(DEFAULT_SHAPE_COLOR),
            text_color: Color::new(DEFAULT_TEXT_COLOR),
            font_family: DEFAULT_FONT_FAMILY.to_owned(),
            pencil_color: Color::new(DEFAULT_PENCIL_COLOR),
            brush_size: 2.0,
            eraser_size: 20.0,
        }
    }
}

impl ToolSettings {
    /// Line width a freehand stroke in `mode` gets.
    pub fn stroke_size(&self, mode: StrokeMode) -> f32 {
        match mode {
            StrokeMode::Draw => self.brush_size,
            StrokeMode::Erase => self.eraser_size,
        }
    }
}

/// Everything a tool may look at or touch while handling one pointer event.
pub struct ToolContext<'a> {
    /// The committed snapshot the gesture works against
    pub document: &'a Document,
    pub selection: &'a mut Selection,
    pub ids: &'a mut IdAllocator,
    pub settings: &'a ToolSettings,
}

/// What the editor should do after a tool handled an event.
#[derive(Debug, Clone, PartialEq)]
pub enum ToolResponse {
    /// Nothing visible changed
    Ignored,
    /// The selection changed; repaint
    SelectionChanged,
    /// The working draft changed; repaint it in place of the committed element
    PreviewChanged,
    /// A freehand stroke grew by this segment; paint just the segment
    Segment(Pos2, Pos2),
    /// The gesture finished with this mutation
    Commit(Command),
}

/// Tool trait defines the interface for all canvas tools
pub trait Tool {
    /// Return the name of the tool
    fn name(&self) -> &'static str;

    /// Handle pointer press on the canvas.
    fn on_pointer_down(&mut self, pos: Pos2, ctx: &mut ToolContext<'_>) -> ToolResponse;

    /// Handle pointer movement while the pointer is held down.
    fn on_pointer_move(&mut self, pos: Pos2, ctx: &mut ToolContext<'_>) -> ToolResponse;

    /// Handle pointer release, or the pointer leaving the canvas.
    fn on_pointer_up(&mut self, pos: Pos2, ctx: &mut ToolContext<'_>) -> ToolResponse;

    /// The element being dragged or resized, with its index, before it is committed.
    fn draft(&self) -> Option<(usize, &Element)> {
        None
    }

    /// The freehand stroke being drawn, if any.
    fn in_progress(&self) -> Option<&StrokeBuilder> {
        None
    }

    /// Summary of the gesture in progress.
    fn state(&self) -> EditorState;

    /// Drop any gesture in progress without committing it.
    fn deactivate(&mut self);
}

mod draw_stroke_tool;
pub use draw_stroke_tool::DrawStrokeTool;

mod selection_tool;
pub use selection_tool::{SelectionState, SelectionTool};

/// The mutually exclusive modes the canvas can be in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ToolKind {
    Select,
    Pencil,
    Eraser,
}

impl ToolKind {
    pub const ALL: [ToolKind; 3] = [ToolKind::Select, ToolKind::Pencil, ToolKind::Eraser];

    pub fn label(&self) -> &'static str {
        match self {
            ToolKind::Select => "Select",
            ToolKind::Pencil => "Pencil",
            ToolKind::Eraser => "Eraser",
        }
    }
}

/// Enum representing all available tool types
/// This allows us to avoid using Box<dyn Tool> and simplifies memory management
#[derive(Debug, Clone)]
pub enum ToolType {
    Selection(SelectionTool),
    DrawStroke(DrawStrokeTool),
}

impl ToolType {
    pub fn new(kind: ToolKind) -> Self {
        match kind {
            ToolKind::Select => Self::Selection(SelectionTool::new()),
            ToolKind::Pencil => Self::DrawStroke(DrawStrokeTool::new(StrokeMode::Draw)),
            ToolKind::Eraser => Self::DrawStroke(DrawStrokeTool::new(StrokeMode::Erase)),
        }
    }

    pub fn kind(&self) -> ToolKind {
        match self {
            Self::Selection(_) => ToolKind::Select,
            Self::DrawStroke(tool) => match tool.mode() {
                StrokeMode::Draw => ToolKind::Pencil,
                StrokeMode::Erase => ToolKind::Eraser,
            },
        }
    }

    pub fn is_drawing_mode(&self) -> bool {
        matches!(self, Self::DrawStroke(_))
    }
}

impl Tool for ToolType {
    fn name(&self) -> &'static str {
        match self {
            Self::Selection(tool) => tool.name(),
            Self::DrawStroke(tool) => tool.name(),
        }
    }

    fn on_pointer_down(&mut self, pos: Pos2, ctx: &mut ToolContext<'_>) -> ToolResponse {
        match self {
            Self::Selection(tool) => tool.on_pointer_down(pos, ctx),
            Self::DrawStroke(tool) => tool.on_pointer_down(pos, ctx),
        }
    }

    fn on_pointer_move(&mut self, pos: Pos2, ctx: &mut ToolContext<'_>) -> ToolResponse {
        match self {
            Self::Selection(tool) => tool.on_pointer_move(pos, ctx),
            Self::DrawStroke(tool) => tool.on_pointer_move(pos, ctx),
        }
    }

    fn on_pointer_up(&mut self, pos: Pos2, ctx: &mut ToolContext<'_>) -> ToolResponse {
        match self {
            Self::Selection(tool) => tool.on_pointer_up(pos, ctx),
            Self::DrawStroke(tool) => tool.on_pointer_up(pos, ctx),
        }
    }

    fn draft(&self) -> Option<(usize, &Element)> {
        match self {
            Self::Selection(tool) => tool.draft(),
            Self::DrawStroke(tool) => tool.draft(),
        }
    }

    fn in_progress(&self) -> Option<&StrokeBuilder> {
        match self {
            Self::Selection(tool) => tool.in_progress(),
            Self::DrawStroke(tool) => tool.in_progress(),
        }
    }

    fn state(&self) -> EditorState {
        match self {
            Self::Selection(tool) => tool.state(),
            Self::DrawStroke(tool) => tool.state(),
        }
    }

    fn deactivate(&mut self) {
        match self {
            Self::Selection(tool) => tool.deactivate(),
            Self::DrawStroke(tool) => tool.deactivate(),
        }
    }
}
