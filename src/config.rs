use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Editor settings, persisted through eframe storage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)] // if we add new fields, give them default values when deserializing old state
pub struct EditorConfig {
    pub canvas_width: u32,
    pub canvas_height: u32,
    /// Oldest snapshots are dropped past this many. `None` keeps everything.
    pub history_limit: Option<usize>,
    /// Fold consecutive title or rotation edits into one history entry.
    pub coalesce_field_edits: bool,
    /// Where [`crate::state::FileDesignStore`] keeps saved designs.
    pub store_dir: PathBuf,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            canvas_width: 1000,
            canvas_height: 700,
            history_limit: None,
            coalesce_field_edits: true,
            store_dir: PathBuf::from("designs"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn old_state_fills_in_defaults() {
        let config: EditorConfig = serde_json::from_str(r#"{"canvas_width":640}"#).unwrap();
        assert_eq!(config.canvas_width, 640);
        assert_eq!(config.canvas_height, 700);
        assert!(config.coalesce_field_edits);
        assert_eq!(config.history_limit, None);
    }
}
