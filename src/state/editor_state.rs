//! Gesture state of the editor.
//!
//! Every pointer gesture runs from `Idle` into exactly one active state and
//! back:
//!
//! ```text
//!            ┌──────────► Selecting ─────────┐
//!            │                               │
//!            ├──────────► Dragging ──────────┤
//!   Idle ────┤                               ├────► Idle
//!            ├──────────► Resizing ──────────┤
//!            │                               │
//!            └──────────► FreehandDrawing ───┘
//! ```
//!
//! Staying in the same state (a drag tick) is always allowed; jumping from one
//! active state to another is not.

use crate::stroke::StrokeMode;
use crate::widgets::Corner;

/// The possible states of the editor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EditorState {
    /// No active gesture
    #[default]
    Idle,
    /// Pressed on empty canvas
    Selecting,
    /// Moving the element at `index`
    Dragging { index: usize },
    /// Dragging one corner of the element at `index`
    Resizing { index: usize, corner: Corner },
    /// Recording a pencil or eraser stroke
    FreehandDrawing { mode: StrokeMode },
}

impl EditorState {
    /// Validates whether a transition to the new state is allowed
    pub fn can_transition_to(&self, new_state: &EditorState) -> bool {
        match (self, new_state) {
            // From Idle, we can go to any state
            (EditorState::Idle, _) => true,
            // Every gesture ends in Idle
            (_, EditorState::Idle) => true,
            // Further ticks of the same gesture
            (current, next) => std::mem::discriminant(current) == std::mem::discriminant(next),
        }
    }

    /// Returns true if the editor is currently in an idle state
    pub fn is_idle(&self) -> bool {
        matches!(self, EditorState::Idle)
    }

    pub fn is_drawing(&self) -> bool {
        matches!(self, EditorState::FreehandDrawing { .. })
    }

    /// Dragging or resizing.
    pub fn is_transforming(&self) -> bool {
        matches!(self, EditorState::Dragging { .. } | EditorState::Resizing { .. })
    }

    pub fn name(&self) -> &'static str {
        match self {
            EditorState::Idle => "Idle",
            EditorState::Selecting => "Selecting",
            EditorState::Dragging { .. } => "Dragging",
            EditorState::Resizing { .. } => "Resizing",
            EditorState::FreehandDrawing { .. } => "FreehandDrawing",
        }
    }
}
