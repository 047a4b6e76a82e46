use super::{Command, CommandError, EditSession};
use crate::document::Document;

/// Linear undo/redo over whole-document snapshots.
///
/// `entries[index]` is the current document. Committing drops every entry
/// after `index`, so redo is only possible until the next edit.
#[derive(Debug, Clone)]
pub struct History {
    /// Snapshots, oldest first; never empty
    entries: Vec<Document>,
    /// Position of the current snapshot
    index: usize,
    /// Maximum number of snapshots kept, oldest dropped first
    limit: Option<usize>,
    /// Fold consecutive title/rotation edits into one entry
    coalesce: bool,
    /// Session of the most recent commit, while it is still open
    open_session: Option<EditSession>,
}

impl Default for History {
    fn default() -> Self {
        Self::new(Document::new())
    }
}

impl History {
    /// A history whose only entry is `root`.
    pub fn new(root: Document) -> Self {
        Self {
            entries: vec![root],
            index: 0,
            limit: None,
            coalesce: false,
            open_session: None,
        }
    }

    pub fn with_limit(mut self, limit: Option<usize>) -> Self {
        self.limit = limit.map(|limit| limit.max(1));
        self
    }

    pub fn with_coalescing(mut self, coalesce: bool) -> Self {
        self.coalesce = coalesce;
        self
    }

    pub fn current(&self) -> &Document {
        &self.entries[self.index]
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn entry(&self, index: usize) -> Option<&Document> {
        self.entries.get(index)
    }

    /// Apply `command` to a copy of the current snapshot and commit the result.
    ///
    /// Returns `Ok(false)` when the command left the document unchanged; no
    /// entry is pushed in that case.
    pub fn execute(&mut self, command: &Command) -> Result<bool, CommandError> {
        let mut next = self.current().clone();
        command.apply(&mut next)?;

        if next == *self.current() {
            log::debug!("{} changed nothing, not recorded", command.name());
            return Ok(false);
        }

        let session = if self.coalesce {
            command.edit_session(self.current())
        } else {
            None
        };

        if session.is_some() && session == self.open_session && self.index > 0 {
            // Still the same field edit: fold into the entry it opened.
            self.entries[self.index] = next;
            log::debug!("{} folded into entry {}", command.name(), self.index);
        } else {
            self.commit(next);
            log::debug!(
                "{} committed as entry {} of {}",
                command.name(),
                self.index,
                self.entries.len()
            );
        }
        self.open_session = session;
        Ok(true)
    }

    /// Push `doc` as the new current snapshot, discarding any redo entries.
    pub fn commit(&mut self, doc: Document) {
        self.entries.truncate(self.index + 1);
        self.entries.push(doc);
        self.index = self.entries.len() - 1;
        self.open_session = None;

        if let Some(limit) = self.limit {
            let overflow = self.entries.len().saturating_sub(limit);
            if overflow > 0 {
                self.entries.drain(..overflow);
                self.index -= overflow;
            }
        }
    }

    pub fn undo(&mut self) -> bool {
        self.open_session = None;
        if self.can_undo() {
            self.index -= 1;
            true
        } else {
            false
        }
    }

    pub fn redo(&mut self) -> bool {
        self.open_session = None;
        if self.can_redo() {
            self.index += 1;
            true
        } else {
            false
        }
    }

    pub fn can_undo(&self) -> bool {
        self.index > 0
    }

    pub fn can_redo(&self) -> bool {
        self.index + 1 < self.entries.len()
    }

    /// Close the running title/rotation session so the next edit gets its own entry.
    pub fn end_edit_session(&mut self) {
        self.open_session = None;
    }

    /// Start over with `root` as the only entry. Not undoable.
    pub fn reset(&mut self, root: Document) {
        self.entries = vec![root];
        self.index = 0;
        self.open_session = None;
    }
}
