use crate::command::{reorder_target, Command};

/// The element the user is working on, by position in the current snapshot.
///
/// Selection is view state: it is never stored in the history and undo/redo
/// drop it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Selection(Option<usize>);

impl Selection {
    pub fn none() -> Self {
        Self(None)
    }

    pub fn index(&self) -> Option<usize> {
        self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_none()
    }

    pub fn select(&mut self, index: usize) {
        self.0 = Some(index);
    }

    pub fn clear(&mut self) {
        self.0 = None;
    }

    /// Where the selection ends up after `command` has been committed on a
    /// document that had `len` elements before it.
    pub fn follow(&mut self, command: &Command, len: usize) {
        match command {
            Command::Reorder { index, direction } if self.0 == Some(*index) => {
                if let Some(target) = reorder_target(*index, *direction, len) {
                    self.0 = Some(target);
                }
            }
            Command::DeleteElement { .. } => self.0 = None,
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::ReorderDirection;

    #[test]
    fn follows_reordered_element() {
        let mut selection = Selection::none();
        selection.select(1);
        selection.follow(
            &Command::Reorder {
                index: 1,
                direction: ReorderDirection::Up,
            },
            3,
        );
        assert_eq!(selection.index(), Some(2));

        // Already at the front: stays put.
        selection.follow(
            &Command::Reorder {
                index: 2,
                direction: ReorderDirection::Up,
            },
            3,
        );
        assert_eq!(selection.index(), Some(2));
    }

    #[test]
    fn delete_clears() {
        let mut selection = Selection::none();
        selection.select(0);
        selection.follow(&Command::DeleteElement { index: 0 }, 1);
        assert!(selection.is_empty());
    }
}
