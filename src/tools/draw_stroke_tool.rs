use egui::Pos2;

use super::{Tool, ToolContext, ToolResponse};
use crate::command::Command;
use crate::state::EditorState;
use crate::stroke::{StrokeBuilder, StrokeMode};

/// Freehand pencil or eraser.
///
/// While this tool is active a press always starts a stroke; elements are
/// not hit-tested.
#[derive(Debug, Clone)]
pub struct DrawStrokeTool {
    mode: StrokeMode,
    // Transient state: the stroke being drawn (if any)
    current_stroke: Option<StrokeBuilder>,
}

impl DrawStrokeTool {
    pub fn new(mode: StrokeMode) -> Self {
        Self {
            mode,
            current_stroke: None,
        }
    }

    pub fn mode(&self) -> StrokeMode {
        self.mode
    }
}

impl Tool for DrawStrokeTool {
    fn name(&self) -> &'static str {
        match self.mode {
            StrokeMode::Draw => "Pencil",
            StrokeMode::Erase => "Eraser",
        }
    }

    fn on_pointer_down(&mut self, pos: Pos2, ctx: &mut ToolContext<'_>) -> ToolResponse {
        let settings = ctx.settings;
        let mut stroke = StrokeBuilder::new(
            settings.pencil_color.clone(),
            settings.stroke_size(self.mode),
            self.mode,
        );
        stroke.add_point(pos);
        self.current_stroke = Some(stroke);
        log::debug!("{} stroke started at {:?}", self.name(), pos);
        ToolResponse::Ignored
    }

    fn on_pointer_move(&mut self, pos: Pos2, _ctx: &mut ToolContext<'_>) -> ToolResponse {
        let Some(stroke) = &mut self.current_stroke else {
            return ToolResponse::Ignored;
        };
        stroke.add_point(pos);
        match stroke.last_segment() {
            Some((from, to)) => ToolResponse::Segment(from, to),
            None => ToolResponse::Ignored,
        }
    }

    fn on_pointer_up(&mut self, _pos: Pos2, ctx: &mut ToolContext<'_>) -> ToolResponse {
        // Finish the stroke and produce an AddStroke command for undo/redo
        match self.current_stroke.take() {
            Some(stroke) => {
                let id = ctx.ids.generate_id();
                log::debug!("{} stroke {} finished with {} points", self.name(), id, stroke.points().len());
                ToolResponse::Commit(Command::AddStroke(stroke.finish(id)))
            }
            None => ToolResponse::Ignored,
        }
    }

    fn in_progress(&self) -> Option<&StrokeBuilder> {
        self.current_stroke.as_ref()
    }

    fn state(&self) -> EditorState {
        match self.current_stroke {
            Some(_) => EditorState::FreehandDrawing { mode: self.mode },
            None => EditorState::Idle,
        }
    }

    fn deactivate(&mut self) {
        // Clear any in-progress stroke when deactivated
        self.current_stroke = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::Document;
    use crate::id_generator::IdAllocator;
    use crate::selection::Selection;
    use crate::tools::ToolSettings;

    #[test]
    fn eraser_strokes_use_eraser_size() {
        let doc = Document::new();
        let mut selection = Selection::none();
        let mut ids = IdAllocator::new();
        let settings = ToolSettings::default();
        let mut ctx = ToolContext {
            document: &doc,
            selection: &mut selection,
            ids: &mut ids,
            settings: &settings,
        };

        let mut tool = DrawStrokeTool::new(StrokeMode::Erase);
        tool.on_pointer_down(Pos2::new(1.0, 1.0), &mut ctx);
        assert_eq!(
            tool.on_pointer_move(Pos2::new(5.0, 5.0), &mut ctx),
            ToolResponse::Segment(Pos2::new(1.0, 1.0), Pos2::new(5.0, 5.0))
        );
        let ToolResponse::Commit(Command::AddStroke(stroke)) =
            tool.on_pointer_up(Pos2::new(5.0, 5.0), &mut ctx)
        else {
            panic!("releasing should commit the stroke");
        };
        assert_eq!(stroke.size(), 20.0);
        assert!(stroke.is_erase());
        assert_eq!(stroke.id(), 1);
        assert_eq!(tool.state(), EditorState::Idle);
    }

    #[test]
    fn release_without_press_does_nothing() {
        let doc = Document::new();
        let mut selection = Selection::none();
        let mut ids = IdAllocator::new();
        let settings = ToolSettings::default();
        let mut ctx = ToolContext {
            document: &doc,
            selection: &mut selection,
            ids: &mut ids,
            settings: &settings,
        };
        let mut tool = DrawStrokeTool::new(StrokeMode::Draw);
        assert_eq!(tool.on_pointer_up(Pos2::ZERO, &mut ctx), ToolResponse::Ignored);
        assert_eq!(ids.peek(), 1);
    }
}
