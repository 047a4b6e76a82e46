use egui::{Pos2, Vec2};

use super::{Tool, ToolContext, ToolResponse};
use crate::command::Command;
use crate::element::{Element, ElementPatch};
use crate::geometry::{hit_test, Hit};
use crate::state::EditorState;
use crate::widgets::Corner;

/// Gesture state of the selection tool.
///
/// Dragging and resizing work on a draft copy of the element; the committed
/// document is only touched by the single `UpdateElement` issued on release.
#[derive(Debug, Clone, PartialEq)]
pub enum SelectionState {
    Idle,
    /// Pressed on empty canvas; the selection was cleared.
    Selecting { start_pos: Pos2 },
    Dragging {
        index: usize,
        offset: Vec2,
        original: Element,
        draft: Element,
    },
    Resizing {
        index: usize,
        corner: Corner,
        original: Element,
        draft: Element,
    },
}

#[derive(Debug, Clone)]
pub struct SelectionTool {
    pub state: SelectionState,
}

impl Default for SelectionTool {
    fn default() -> Self {
        Self::new()
    }
}

impl SelectionTool {
    pub fn new() -> Self {
        Self {
            state: SelectionState::Idle,
        }
    }

    pub fn current_state_name(&self) -> &'static str {
        match self.state {
            SelectionState::Idle => "Idle",
            SelectionState::Selecting { .. } => "Selecting",
            SelectionState::Dragging { .. } => "Dragging",
            SelectionState::Resizing { .. } => "Resizing",
        }
    }
}

impl Tool for SelectionTool {
    fn name(&self) -> &'static str {
        "Select"
    }

    fn on_pointer_down(&mut self, pos: Pos2, ctx: &mut ToolContext<'_>) -> ToolResponse {
        let doc = ctx.document;
        let selected = ctx.selection.index();

        match hit_test(doc, selected, pos) {
            Hit::Handle(corner) => {
                let Some((index, element)) =
                    selected.and_then(|index| doc.element(index).map(|element| (index, element)))
                else {
                    return ToolResponse::Ignored;
                };
                log::debug!("Resizing element {} from {}", element.id, corner.as_str());
                self.state = SelectionState::Resizing {
                    index,
                    corner,
                    original: element.clone(),
                    draft: element.clone(),
                };
                ToolResponse::Ignored
            }
            Hit::Element(index) => {
                let Some(element) = doc.element(index) else {
                    return ToolResponse::Ignored;
                };
                log::debug!("Selected element {} at index {}", element.id, index);
                ctx.selection.select(index);
                self.state = SelectionState::Dragging {
                    index,
                    offset: pos - element.position(),
                    original: element.clone(),
                    draft: element.clone(),
                };
                ToolResponse::SelectionChanged
            }
            Hit::Nothing => {
                self.state = SelectionState::Selecting { start_pos: pos };
                if ctx.selection.is_empty() {
                    ToolResponse::Ignored
                } else {
                    ctx.selection.clear();
                    ToolResponse::SelectionChanged
                }
            }
        }
    }

    fn on_pointer_move(&mut self, pos: Pos2, _ctx: &mut ToolContext<'_>) -> ToolResponse {
        match &mut self.state {
            SelectionState::Dragging {
                offset,
                original,
                draft,
                ..
            } => {
                *draft = original.patched(&ElementPatch::position(pos - *offset));
                ToolResponse::PreviewChanged
            }
            SelectionState::Resizing {
                corner,
                original,
                draft,
                ..
            } => {
                let rect = corner.resize(original.rect(), pos);
                *draft = original.patched(&ElementPatch::bounds(original, rect));
                ToolResponse::PreviewChanged
            }
            SelectionState::Idle | SelectionState::Selecting { .. } => ToolResponse::Ignored,
        }
    }

    fn on_pointer_up(&mut self, _pos: Pos2, _ctx: &mut ToolContext<'_>) -> ToolResponse {
        let state = std::mem::replace(&mut self.state, SelectionState::Idle);
        let (index, patch, original, draft) = match state {
            SelectionState::Dragging {
                index,
                original,
                draft,
                ..
            } => (index, ElementPatch::position(draft.position()), original, draft),
            SelectionState::Resizing {
                index,
                original,
                draft,
                ..
            } => (index, ElementPatch::bounds(&original, draft.rect()), original, draft),
            SelectionState::Idle | SelectionState::Selecting { .. } => {
                return ToolResponse::Ignored;
            }
        };

        if draft == original {
            // A plain click: selected, nothing moved.
            return ToolResponse::Ignored;
        }
        log::debug!("Gesture on element {} finished", draft.id);
        ToolResponse::Commit(Command::UpdateElement { index, patch })
    }

    fn draft(&self) -> Option<(usize, &Element)> {
        match &self.state {
            SelectionState::Dragging { index, draft, .. }
            | SelectionState::Resizing { index, draft, .. } => Some((*index, draft)),
            SelectionState::Idle | SelectionState::Selecting { .. } => None,
        }
    }

    fn state(&self) -> EditorState {
        match &self.state {
            SelectionState::Idle => EditorState::Idle,
            SelectionState::Selecting { .. } => EditorState::Selecting,
            SelectionState::Dragging { index, .. } => EditorState::Dragging { index: *index },
            SelectionState::Resizing { index, corner, .. } => EditorState::Resizing {
                index: *index,
                corner: *corner,
            },
        }
    }

    fn deactivate(&mut self) {
        self.state = SelectionState::Idle;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::Document;
    use crate::element::factory;
    use crate::id_generator::IdAllocator;
    use crate::selection::Selection;
    use crate::tools::ToolSettings;

    struct Harness {
        doc: Document,
        selection: Selection,
        ids: IdAllocator,
        settings: ToolSettings,
        tool: SelectionTool,
    }

    impl Harness {
        fn new(doc: Document) -> Self {
            Self {
                doc,
                selection: Selection::none(),
                ids: IdAllocator::new(),
                settings: ToolSettings::default(),
                tool: SelectionTool::new(),
            }
        }

        fn run(&mut self, f: impl FnOnce(&mut SelectionTool, &mut ToolContext<'_>) -> ToolResponse) -> ToolResponse {
            let mut ctx = ToolContext {
                document: &self.doc,
                selection: &mut self.selection,
                ids: &mut self.ids,
                settings: &self.settings,
            };
            f(&mut self.tool, &mut ctx)
        }

        fn down(&mut self, x: f32, y: f32) -> ToolResponse {
            self.run(|tool, ctx| tool.on_pointer_down(Pos2::new(x, y), ctx))
        }

        fn drag(&mut self, x: f32, y: f32) -> ToolResponse {
            self.run(|tool, ctx| tool.on_pointer_move(Pos2::new(x, y), ctx))
        }

        fn up(&mut self) -> ToolResponse {
            self.run(|tool, ctx| tool.on_pointer_up(Pos2::ZERO, ctx))
        }
    }

    fn single_rect() -> Document {
        let mut doc = Document::new();
        doc.push_element(factory::create_rectangle(1, 100.0, 100.0, 80.0, 60.0, "#000"));
        doc
    }

    #[test]
    fn drag_keeps_pointer_offset() {
        let mut h = Harness::new(single_rect());
        assert_eq!(h.down(110.0, 120.0), ToolResponse::SelectionChanged);
        assert_eq!(h.selection.index(), Some(0));

        h.drag(160.0, 170.0);
        let (_, draft) = h.tool.draft().unwrap();
        assert_eq!(draft.position(), Pos2::new(150.0, 150.0));

        assert_eq!(
            h.up(),
            ToolResponse::Commit(Command::UpdateElement {
                index: 0,
                patch: ElementPatch::position(Pos2::new(150.0, 150.0)),
            })
        );
        assert_eq!(h.tool.state, SelectionState::Idle);
    }

    #[test]
    fn click_without_motion_commits_nothing() {
        let mut h = Harness::new(single_rect());
        h.down(110.0, 120.0);
        assert_eq!(h.up(), ToolResponse::Ignored);
        assert_eq!(h.selection.index(), Some(0));
    }

    #[test]
    fn handle_press_starts_resize_only_when_selected() {
        let mut h = Harness::new(single_rect());
        // Bottom-right handle area, outside the box.
        h.down(185.0, 165.0);
        assert!(h.tool.draft().is_none());

        h.selection.select(0);
        h.down(185.0, 165.0);
        assert_eq!(
            h.tool.state(),
            EditorState::Resizing {
                index: 0,
                corner: Corner::BottomRight
            }
        );
        h.drag(300.0, 20.0);
        let (_, draft) = h.tool.draft().unwrap();
        assert_eq!(draft.w, 200.0);
        assert_eq!(draft.h, 20.0);
        assert_eq!(draft.position(), Pos2::new(100.0, 100.0));
    }

    #[test]
    fn empty_canvas_clears_selection() {
        let mut h = Harness::new(single_rect());
        h.selection.select(0);
        assert_eq!(h.down(500.0, 500.0), ToolResponse::SelectionChanged);
        assert!(h.selection.is_empty());
        assert_eq!(h.tool.state(), EditorState::Selecting);
        assert_eq!(h.up(), ToolResponse::Ignored);
    }
}
