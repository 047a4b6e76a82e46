mod commands;
mod history;

use thiserror::Error;

use crate::element::ElementId;

pub use commands::{reorder_target, Command, EditSession, ReorderDirection};
pub use history::History;

/// Result type for command operations
pub type CommandResult = Result<(), CommandError>;

/// Errors that can occur during command execution
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CommandError {
    #[error("element index {index} out of range (document has {len})")]
    IndexOutOfRange { index: usize, len: usize },
    #[error("id {0} is already used in this document")]
    DuplicateId(ElementId),
}
