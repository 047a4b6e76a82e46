use egui::Pos2;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::sync::Arc;

use crate::element::{Color, ElementId, DEFAULT_PENCIL_COLOR};

/// Width used when a stored stroke carries none.
pub const DEFAULT_STROKE_SIZE: f32 = 2.0;

/// Whether a stroke paints or cuts pixels out of the surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StrokeMode {
    #[serde(rename = "draw")]
    Draw,
    #[serde(rename = "eraser", alias = "erase")]
    Erase,
}

// Immutable stroke for sharing between snapshots
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Stroke {
    #[serde(default)]
    id: ElementId,
    #[serde(serialize_with = "points_to_pairs", deserialize_with = "points_from_pairs")]
    points: Vec<Pos2>,
    #[serde(default = "default_color")]
    color: Color,
    #[serde(default = "default_size")]
    size: f32,
    #[serde(default = "default_mode")]
    mode: StrokeMode,
}

// Define a reference-counted type alias for Stroke
pub type StrokeRef = Arc<Stroke>;

impl Stroke {
    pub fn new(id: ElementId, points: Vec<Pos2>, color: Color, size: f32, mode: StrokeMode) -> Self {
        Self {
            id,
            points,
            color,
            size,
            mode,
        }
    }

    pub fn new_ref(
        id: ElementId,
        points: Vec<Pos2>,
        color: Color,
        size: f32,
        mode: StrokeMode,
    ) -> StrokeRef {
        Arc::new(Self::new(id, points, color, size, mode))
    }

    pub fn id(&self) -> ElementId {
        self.id
    }

    pub fn points(&self) -> &[Pos2] {
        &self.points
    }

    pub fn color(&self) -> &Color {
        &self.color
    }

    pub fn size(&self) -> f32 {
        self.size
    }

    pub fn mode(&self) -> StrokeMode {
        self.mode
    }

    pub fn is_erase(&self) -> bool {
        self.mode == StrokeMode::Erase
    }

    /// Copy of this stroke under a different id.
    pub(crate) fn with_id(&self, id: ElementId) -> Self {
        Self {
            id,
            ..self.clone()
        }
    }
}

// Mutable stroke for the gesture in progress
#[derive(Debug, Clone)]
pub struct StrokeBuilder {
    points: Vec<Pos2>,
    color: Color,
    size: f32,
    mode: StrokeMode,
}

impl StrokeBuilder {
    pub fn new(color: Color, size: f32, mode: StrokeMode) -> Self {
        Self {
            points: Vec::new(),
            color,
            size,
            mode,
        }
    }

    pub fn add_point(&mut self, point: Pos2) {
        self.points.push(point);
    }

    /// The newest segment, used for incremental painting.
    pub fn last_segment(&self) -> Option<(Pos2, Pos2)> {
        match self.points.as_slice() {
            [.., a, b] => Some((*a, *b)),
            _ => None,
        }
    }

    pub fn points(&self) -> &[Pos2] {
        &self.points
    }

    pub fn color(&self) -> &Color {
        &self.color
    }

    pub fn size(&self) -> f32 {
        self.size
    }

    pub fn mode(&self) -> StrokeMode {
        self.mode
    }

    // Convert to a reference-counted StrokeRef
    pub fn finish(self, id: ElementId) -> StrokeRef {
        Stroke::new_ref(id, self.points, self.color, self.size, self.mode)
    }
}

fn default_color() -> Color {
    Color::new(DEFAULT_PENCIL_COLOR)
}

fn default_size() -> f32 {
    DEFAULT_STROKE_SIZE
}

fn default_mode() -> StrokeMode {
    StrokeMode::Draw
}

fn points_to_pairs<S: Serializer>(points: &[Pos2], serializer: S) -> Result<S::Ok, S::Error> {
    serializer.collect_seq(points.iter().map(|p| [p.x, p.y]))
}

fn points_from_pairs<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<Pos2>, D::Error> {
    let pairs = Vec::<[f32; 2]>::deserialize(deserializer)?;
    Ok(pairs.into_iter().map(|[x, y]| Pos2::new(x, y)).collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn points_serialize_as_pairs() {
        let stroke = Stroke::new(
            9,
            vec![Pos2::new(1.0, 2.0), Pos2::new(3.5, 4.0)],
            Color::new("#333"),
            2.0,
            StrokeMode::Erase,
        );
        let value = serde_json::to_value(&stroke).unwrap();
        assert_eq!(value["points"], serde_json::json!([[1.0, 2.0], [3.5, 4.0]]));
        assert_eq!(value["mode"], "eraser");
    }

    #[test]
    fn missing_fields_fall_back() {
        let stroke: Stroke = serde_json::from_str(r#"{"id":3,"points":[[0,0],[5,5]]}"#).unwrap();
        assert_eq!(stroke.color().as_str(), "#333");
        assert_eq!(stroke.size(), 2.0);
        assert_eq!(stroke.mode(), StrokeMode::Draw);

        let erase: Stroke =
            serde_json::from_str(r#"{"id":4,"points":[],"mode":"erase"}"#).unwrap();
        assert!(erase.is_erase());
    }

    #[test]
    fn builder_tracks_newest_segment() {
        let mut builder = StrokeBuilder::new(Color::new("#000"), 4.0, StrokeMode::Draw);
        builder.add_point(Pos2::new(0.0, 0.0));
        assert_eq!(builder.last_segment(), None);
        builder.add_point(Pos2::new(10.0, 0.0));
        builder.add_point(Pos2::new(10.0, 10.0));
        assert_eq!(
            builder.last_segment(),
            Some((Pos2::new(10.0, 0.0), Pos2::new(10.0, 10.0)))
        );
        let stroke = builder.finish(12);
        assert_eq!(stroke.id(), 12);
        assert_eq!(stroke.points().len(), 3);
    }
}
