use thiserror::Error;

use crate::command::CommandError;
use crate::image::ImageError;
use crate::renderer::RenderError;
use crate::state::PersistenceError;

/// Anything an editor operation can fail with.
#[derive(Debug, Error)]
pub enum EditorError {
    #[error(transparent)]
    Command(#[from] CommandError),
    #[error(transparent)]
    Render(#[from] RenderError),
    #[error(transparent)]
    Image(#[from] ImageError),
    #[error(transparent)]
    Persistence(#[from] PersistenceError),
    #[error("file error: {0}")]
    Io(#[from] std::io::Error),
    #[error("text elements need some text")]
    EmptyText,
    #[error("nothing is selected")]
    NothingSelected,
}

pub type EditorResult<T> = Result<T, EditorError>;
