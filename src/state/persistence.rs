use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use thiserror::Error;
use uuid::Uuid;

use crate::document::Document;
use crate::element::Element;
use crate::stroke::Stroke;
use crate::util::time;

/// Title a design is saved under when the user left it blank.
pub const UNTITLED_DESIGN: &str = "Untitled Design";

/// Errors that can occur during design persistence operations
#[derive(Debug, Error)]
pub enum PersistenceError {
    #[error("Failed to serialize design: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Failed to access design storage: {0}")]
    IoError(#[from] std::io::Error),

    #[error("No design with id {0}")]
    NotFound(DesignId),

    #[error("Thumbnail upload failed: {0}")]
    UploadFailed(String),
}

/// Result type for persistence operations
pub type PersistenceResult<T> = Result<T, PersistenceError>;

/// Identifier of a stored design.
pub type DesignId = Uuid;

/// Shape data of a design, as stored under `jsonData`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct JsonData {
    #[serde(default, deserialize_with = "lenient_vec")]
    pub elements: Vec<Element>,
    #[serde(default, alias = "strokes", deserialize_with = "lenient_vec")]
    pub lines: Vec<Stroke>,
}

/// A design as exchanged with storage: `{ title, jsonData, thumbnailUrl }`.
///
/// Every field may be missing on load.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DesignData {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub json_data: Option<JsonData>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thumbnail_url: Option<String>,
}

impl DesignData {
    /// Parse a stored design. Only a document that isn't JSON at all is an
    /// error; bad entries inside it are skipped.
    pub fn from_json(json: &str) -> PersistenceResult<Self> {
        let value: serde_json::Value = serde_json::from_str(json)?;
        if !value.is_object() {
            log::warn!("Design payload is not an object, loading an empty design");
            return Ok(Self::default());
        }
        Ok(serde_json::from_value(value).unwrap_or_else(|err| {
            log::warn!("Malformed design payload ({}), loading an empty design", err);
            Self::default()
        }))
    }

    /// The save payload for `doc`. Blank titles become [`UNTITLED_DESIGN`].
    pub fn from_document(doc: &Document, thumbnail_url: Option<String>) -> Self {
        let title = doc.title().trim();
        Self {
            title: Some(if title.is_empty() {
                UNTITLED_DESIGN.to_owned()
            } else {
                title.to_owned()
            }),
            json_data: Some(JsonData {
                elements: doc.elements().to_vec(),
                lines: doc.strokes().iter().map(|stroke| Stroke::clone(stroke)).collect(),
            }),
            thumbnail_url,
        }
    }

    pub fn into_document(self) -> Document {
        let JsonData { elements, lines } = self.json_data.unwrap_or_default();
        Document::from_parts(
            self.title.unwrap_or_default(),
            elements,
            lines.into_iter().map(Arc::new).collect(),
        )
    }
}

/// Deserialize a list, dropping entries that don't parse instead of failing.
fn lenient_vec<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    let entries = match value {
        serde_json::Value::Array(entries) => entries,
        serde_json::Value::Null => return Ok(Vec::new()),
        other => {
            log::warn!("Expected a list, found {}; treating it as empty", other);
            return Ok(Vec::new());
        }
    };

    Ok(entries
        .into_iter()
        .enumerate()
        .filter_map(|(index, entry)| match serde_json::from_value(entry) {
            Ok(item) => Some(item),
            Err(err) => {
                log::warn!("Skipping malformed entry {}: {}", index, err);
                None
            }
        })
        .collect())
}

/// Listing entry for a stored design.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DesignSummary {
    pub id: DesignId,
    pub title: String,
    pub thumbnail_url: Option<String>,
    pub created_at: u64,
}

/// Where designs and their thumbnails are kept.
pub trait DesignStore {
    /// Store a rendered PNG and return the URL the design should reference.
    fn upload_thumbnail(&mut self, png: &[u8]) -> PersistenceResult<String>;

    /// Store a design as a new entry.
    fn save(&mut self, design: &DesignData) -> PersistenceResult<DesignId>;

    fn load(&self, id: DesignId) -> PersistenceResult<DesignData>;

    /// All stored designs, newest first.
    fn list(&self) -> PersistenceResult<Vec<DesignSummary>>;
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct StoredDesign {
    id: DesignId,
    created_at: u64,
    #[serde(flatten)]
    design: DesignData,
}

/// [`DesignStore`] over a directory: `<uuid>.json` per design and
/// `<uuid>.png` per thumbnail.
#[derive(Debug, Clone)]
pub struct FileDesignStore {
    dir: PathBuf,
}

impl FileDesignStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn design_path(&self, id: DesignId) -> PathBuf {
        self.dir.join(format!("{id}.json"))
    }
}

impl DesignStore for FileDesignStore {
    fn upload_thumbnail(&mut self, png: &[u8]) -> PersistenceResult<String> {
        fs::create_dir_all(&self.dir)?;
        let path = self.dir.join(format!("{}.png", Uuid::new_v4()));
        fs::write(&path, png)?;
        Ok(path.to_string_lossy().into_owned())
    }

    fn save(&mut self, design: &DesignData) -> PersistenceResult<DesignId> {
        fs::create_dir_all(&self.dir)?;
        let stored = StoredDesign {
            id: Uuid::new_v4(),
            created_at: time::timestamp_secs(),
            design: design.clone(),
        };
        let json = serde_json::to_string_pretty(&stored)?;
        fs::write(self.design_path(stored.id), json)?;
        log::info!("Saved design {} to {}", stored.id, self.dir.display());
        Ok(stored.id)
    }

    fn load(&self, id: DesignId) -> PersistenceResult<DesignData> {
        let path = self.design_path(id);
        if !path.exists() {
            return Err(PersistenceError::NotFound(id));
        }
        DesignData::from_json(&fs::read_to_string(path)?)
    }

    fn list(&self) -> PersistenceResult<Vec<DesignSummary>> {
        if !self.dir.exists() {
            return Ok(Vec::new());
        }

        let mut summaries = Vec::new();
        for entry in fs::read_dir(&self.dir)? {
            let path = entry?.path();
            if path.extension().and_then(|ext| ext.to_str()) != Some("json") {
                continue;
            }
            let stored: StoredDesign = match fs::read_to_string(&path)
                .map_err(PersistenceError::from)
                .and_then(|json| serde_json::from_str(&json).map_err(PersistenceError::from))
            {
                Ok(stored) => stored,
                Err(err) => {
                    log::warn!("Skipping unreadable design {}: {}", path.display(), err);
                    continue;
                }
            };
            summaries.push(DesignSummary {
                id: stored.id,
                title: stored.design.title.unwrap_or_default(),
                thumbnail_url: stored.design.thumbnail_url,
                created_at: stored.created_at,
            });
        }

        summaries.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(summaries)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::element::factory;

    #[test]
    fn missing_fields_load_as_empty() {
        let design = DesignData::from_json("{}").unwrap().into_document();
        assert_eq!(design, Document::new());

        let design = DesignData::from_json(r#"{"title":"Poster","jsonData":null}"#)
            .unwrap()
            .into_document();
        assert_eq!(design.title(), "Poster");
        assert!(design.is_empty());
    }

    #[test]
    fn malformed_entries_are_skipped() {
        let json = r##"{
            "title": "Mixed",
            "jsonData": {
                "elements": [
                    {"id": 1, "type": "rectangle", "x": 300, "y": 100, "w": 120, "h": 80, "color": "#4f46e5", "rotation": 0},
                    {"id": 2, "type": "star", "x": 0, "y": 0},
                    "garbage"
                ],
                "lines": [{"id": 3, "points": [[0, 0], [10, 10]], "color": "#333", "size": 2, "mode": "draw"}, {"id": 4}]
            }
        }"##;
        let doc = DesignData::from_json(json).unwrap().into_document();
        assert_eq!(doc.elements().len(), 1);
        assert_eq!(doc.strokes().len(), 1);
        assert_eq!(doc.strokes()[0].id(), 3);
    }

    #[test]
    fn strokes_key_is_accepted() {
        let json = r#"{"jsonData":{"strokes":[{"id":1,"points":[[1,1]]}]}}"#;
        let doc = DesignData::from_json(json).unwrap().into_document();
        assert_eq!(doc.strokes().len(), 1);
    }

    #[test]
    fn not_json_is_an_error() {
        assert!(DesignData::from_json("not json").is_err());
        assert_eq!(DesignData::from_json("[1,2]").unwrap(), DesignData::default());
    }

    #[test]
    fn save_payload_uses_wire_names() {
        let mut doc = Document::new();
        doc.set_title("   ");
        doc.push_element(factory::create_rectangle(1, 0.0, 0.0, 40.0, 40.0, "#000"));
        let payload = DesignData::from_document(&doc, Some("thumb.png".into()));
        let value = serde_json::to_value(&payload).unwrap();
        assert_eq!(value["title"], UNTITLED_DESIGN);
        assert_eq!(value["thumbnailUrl"], "thumb.png");
        assert_eq!(value["jsonData"]["elements"][0]["type"], "rectangle");
        assert!(value["jsonData"]["lines"].as_array().unwrap().is_empty());
    }

    #[test]
    fn file_store_round_trip() {
        let dir = std::env::temp_dir().join(format!("design-store-{}", Uuid::new_v4()));
        let mut store = FileDesignStore::new(&dir);
        assert!(store.list().unwrap().is_empty());

        let url = store.upload_thumbnail(b"\x89PNG").unwrap();
        assert!(Path::new(&url).exists());

        let mut doc = Document::new();
        doc.set_title("Flyer");
        let id = store.save(&DesignData::from_document(&doc, Some(url))).unwrap();

        let loaded = store.load(id).unwrap();
        assert_eq!(loaded.title.as_deref(), Some("Flyer"));
        let listed = store.list().unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].id, id);

        assert!(matches!(
            store.load(Uuid::new_v4()),
            Err(PersistenceError::NotFound(_))
        ));
        fs::remove_dir_all(dir).unwrap();
    }
}
