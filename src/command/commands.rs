use super::{CommandError, CommandResult};
use crate::document::Document;
use crate::element::{Element, ElementId, ElementPatch};
use crate::stroke::StrokeRef;

/// Which neighbour an element swaps with when reordered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReorderDirection {
    /// Toward the front (painted later).
    Up,
    /// Toward the back (painted earlier).
    Down,
}

/// Identifies consecutive edits of the same field that may share one history entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditSession {
    Title,
    Rotation(ElementId),
}

/// Every mutation that can be committed to the document history.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// Append an element; it paints on top of everything already placed.
    AddElement(Element),

    /// Append a finished freehand stroke.
    AddStroke(StrokeRef),

    /// Merge `patch` into the element at `index`.
    UpdateElement { index: usize, patch: ElementPatch },

    /// Swap the element at `index` with its neighbour.
    Reorder {
        index: usize,
        direction: ReorderDirection,
    },

    /// Remove the element at `index`.
    DeleteElement { index: usize },

    /// Rename the design.
    SetTitle(String),
}

impl Command {
    pub fn name(&self) -> &'static str {
        match self {
            Command::AddElement(_) => "AddElement",
            Command::AddStroke(_) => "AddStroke",
            Command::UpdateElement { .. } => "UpdateElement",
            Command::Reorder { .. } => "Reorder",
            Command::DeleteElement { .. } => "DeleteElement",
            Command::SetTitle(_) => "SetTitle",
        }
    }

    /// Id of the element or stroke this command introduces.
    pub fn added_id(&self) -> Option<ElementId> {
        match self {
            Command::AddElement(element) => Some(element.id),
            Command::AddStroke(stroke) => Some(stroke.id()),
            _ => None,
        }
    }

    /// Apply this command to `doc`.
    ///
    /// Reordering past either end leaves the document as it is. On error the
    /// document is untouched.
    pub fn apply(&self, doc: &mut Document) -> CommandResult {
        match self {
            Command::AddElement(element) => {
                if doc.contains_id(element.id) {
                    return Err(CommandError::DuplicateId(element.id));
                }
                doc.push_element(element.clone());
            }
            Command::AddStroke(stroke) => {
                if doc.contains_id(stroke.id()) {
                    return Err(CommandError::DuplicateId(stroke.id()));
                }
                doc.push_stroke(stroke.clone());
            }
            Command::UpdateElement { index, patch } => {
                let updated = doc
                    .element(*index)
                    .map(|element| element.patched(patch))
                    .ok_or_else(|| out_of_range(*index, doc))?;
                doc.replace_element(*index, updated);
            }
            Command::Reorder { index, direction } => {
                let len = doc.elements().len();
                if *index >= len {
                    return Err(out_of_range(*index, doc));
                }
                if let Some(target) = reorder_target(*index, *direction, len) {
                    doc.swap_elements(*index, target);
                }
            }
            Command::DeleteElement { index } => {
                doc.remove_element(*index)
                    .ok_or_else(|| out_of_range(*index, doc))?;
            }
            Command::SetTitle(title) => doc.set_title(title.clone()),
        }
        Ok(())
    }

    /// The editing session this command belongs to, if it may be folded into
    /// the previous history entry.
    pub fn edit_session(&self, doc: &Document) -> Option<EditSession> {
        match self {
            Command::SetTitle(_) => Some(EditSession::Title),
            Command::UpdateElement { index, patch } if patch.is_rotation_only() => doc
                .element(*index)
                .map(|element| EditSession::Rotation(element.id)),
            _ => None,
        }
    }
}

/// Index an element at `index` moves to, or `None` at the boundary.
pub fn reorder_target(index: usize, direction: ReorderDirection, len: usize) -> Option<usize> {
    match direction {
        ReorderDirection::Up => (index + 1 < len).then_some(index + 1),
        ReorderDirection::Down => index.checked_sub(1),
    }
}

fn out_of_range(index: usize, doc: &Document) -> CommandError {
    CommandError::IndexOutOfRange {
        index,
        len: doc.elements().len(),
    }
}
