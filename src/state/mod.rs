mod editor_state;
pub mod context;
mod persistence;

pub use editor_state::EditorState;
pub use context::{EditorContext, StateTransitionError};
pub use persistence::{
    DesignData,
    DesignId,
    DesignStore,
    DesignSummary,
    FileDesignStore,
    JsonData,
    PersistenceError,
    PersistenceResult,
    UNTITLED_DESIGN,
};
