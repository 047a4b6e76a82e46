use egui::{Pos2, Rect, Vec2};
use serde::{Deserialize, Serialize};

mod common;
mod record;

pub use common::{
    Color, DEFAULT_FONT_FAMILY, DEFAULT_FONT_SIZE, DEFAULT_PENCIL_COLOR, DEFAULT_SHAPE_COLOR,
    DEFAULT_TEXT_COLOR, HANDLE_SIZE, MIN_ELEMENT_SIZE, MIN_FONT_SIZE, SKEW_OFFSET,
    TEXT_BOX_PADDING,
};
pub use record::{ElementError, ElementRecord};

/// Identifier shared by elements and strokes.
pub type ElementId = u64;

/// Every shape the editor can place.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ShapeKind {
    Rectangle,
    Square,
    Circle,
    Oval,
    Triangle,
    Parallelogram,
    Rhombus,
    Trapezoid,
    Kite,
    Pentagon,
    Hexagon,
    Heptagon,
    Octagon,
    Nonagon,
    Decagon,
}

impl ShapeKind {
    pub const ALL: [ShapeKind; 15] = [
        ShapeKind::Rectangle,
        ShapeKind::Square,
        ShapeKind::Circle,
        ShapeKind::Oval,
        ShapeKind::Triangle,
        ShapeKind::Parallelogram,
        ShapeKind::Rhombus,
        ShapeKind::Trapezoid,
        ShapeKind::Kite,
        ShapeKind::Pentagon,
        ShapeKind::Hexagon,
        ShapeKind::Heptagon,
        ShapeKind::Octagon,
        ShapeKind::Nonagon,
        ShapeKind::Decagon,
    ];

    /// The `type` tag used in design files.
    pub fn as_str(&self) -> &'static str {
        match self {
            ShapeKind::Rectangle => "rectangle",
            ShapeKind::Square => "square",
            ShapeKind::Circle => "circle",
            ShapeKind::Oval => "oval",
            ShapeKind::Triangle => "triangle",
            ShapeKind::Parallelogram => "parallelogram",
            ShapeKind::Rhombus => "rhombus",
            ShapeKind::Trapezoid => "trapezoid",
            ShapeKind::Kite => "kite",
            ShapeKind::Pentagon => "pentagon",
            ShapeKind::Hexagon => "hexagon",
            ShapeKind::Heptagon => "heptagon",
            ShapeKind::Octagon => "octagon",
            ShapeKind::Nonagon => "nonagon",
            ShapeKind::Decagon => "decagon",
        }
    }

    pub fn from_tag(tag: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.as_str() == tag)
    }

    pub fn label(&self) -> &'static str {
        match self {
            ShapeKind::Rectangle => "Rectangle",
            ShapeKind::Square => "Square",
            ShapeKind::Circle => "Circle",
            ShapeKind::Oval => "Oval",
            ShapeKind::Triangle => "Triangle",
            ShapeKind::Parallelogram => "Parallelogram",
            ShapeKind::Rhombus => "Rhombus",
            ShapeKind::Trapezoid => "Trapezoid",
            ShapeKind::Kite => "Kite",
            ShapeKind::Pentagon => "Pentagon",
            ShapeKind::Hexagon => "Hexagon",
            ShapeKind::Heptagon => "Heptagon",
            ShapeKind::Octagon => "Octagon",
            ShapeKind::Nonagon => "Nonagon",
            ShapeKind::Decagon => "Decagon",
        }
    }

    /// Number of vertices for the regular polygons, `None` for everything else.
    pub fn sides(&self) -> Option<usize> {
        match self {
            ShapeKind::Pentagon => Some(5),
            ShapeKind::Hexagon => Some(6),
            ShapeKind::Heptagon => Some(7),
            ShapeKind::Octagon => Some(8),
            ShapeKind::Nonagon => Some(9),
            ShapeKind::Decagon => Some(10),
            _ => None,
        }
    }

    /// Size a freshly added shape gets.
    pub fn default_size(&self) -> Vec2 {
        match self {
            ShapeKind::Square | ShapeKind::Circle => Vec2::new(100.0, 100.0),
            _ => Vec2::new(120.0, 80.0),
        }
    }
}

/// Kind-specific payload of an [`Element`].
#[derive(Debug, Clone, PartialEq)]
pub enum ElementKind {
    Shape {
        shape: ShapeKind,
        color: Color,
    },
    Text {
        text: String,
        font_size: f32,
        font_family: String,
        color: Color,
    },
    Image {
        /// Content reference: a data URI, or a path the host can read.
        src: String,
    },
}

/// A placed shape, text block or image.
///
/// `x`/`y` is the top-left of the unrotated bounding box; `rotation` is in
/// degrees and applies about the box center.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "ElementRecord", into = "ElementRecord")]
pub struct Element {
    pub id: ElementId,
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
    pub rotation: f32,
    pub kind: ElementKind,
}

impl Element {
    pub fn shape(id: ElementId, shape: ShapeKind, position: Pos2, color: Color) -> Self {
        let size = shape.default_size();
        Self {
            id,
            x: position.x,
            y: position.y,
            w: size.x,
            h: size.y,
            rotation: 0.0,
            kind: ElementKind::Shape { shape, color },
        }
    }

    /// A text block. `width` is the measured advance of `text` at `font_size`.
    pub fn text(
        id: ElementId,
        text: impl Into<String>,
        position: Pos2,
        width: f32,
        font_size: f32,
        font_family: impl Into<String>,
        color: Color,
    ) -> Self {
        Self {
            id,
            x: position.x,
            y: position.y,
            w: width.max(MIN_ELEMENT_SIZE),
            h: font_size + TEXT_BOX_PADDING,
            rotation: 0.0,
            kind: ElementKind::Text {
                text: text.into(),
                font_size,
                font_family: font_family.into(),
                color,
            },
        }
    }

    pub fn image(id: ElementId, src: impl Into<String>, rect: Rect) -> Self {
        Self {
            id,
            x: rect.min.x,
            y: rect.min.y,
            w: rect.width(),
            h: rect.height(),
            rotation: 0.0,
            kind: ElementKind::Image { src: src.into() },
        }
    }

    /// The `type` tag used in design files.
    pub fn kind_name(&self) -> &'static str {
        match &self.kind {
            ElementKind::Shape { shape, .. } => shape.as_str(),
            ElementKind::Text { .. } => "text",
            ElementKind::Image { .. } => "image",
        }
    }

    pub fn rect(&self) -> Rect {
        Rect::from_min_size(Pos2::new(self.x, self.y), Vec2::new(self.w, self.h))
    }

    pub fn position(&self) -> Pos2 {
        Pos2::new(self.x, self.y)
    }

    pub fn center(&self) -> Pos2 {
        self.rect().center()
    }

    /// Bounding-box containment, edges inclusive. Rotation is ignored.
    pub fn contains(&self, pos: Pos2) -> bool {
        self.rect().contains(pos)
    }

    pub fn color(&self) -> Option<&Color> {
        match &self.kind {
            ElementKind::Shape { color, .. } | ElementKind::Text { color, .. } => Some(color),
            ElementKind::Image { .. } => None,
        }
    }

    pub fn is_text(&self) -> bool {
        matches!(self.kind, ElementKind::Text { .. })
    }

    pub fn image_src(&self) -> Option<&str> {
        match &self.kind {
            ElementKind::Image { src } => Some(src),
            _ => None,
        }
    }

    /// Merge `patch` into this element.
    ///
    /// Sizes are clamped to [`MIN_ELEMENT_SIZE`], rotation to `0..=360`. Fields
    /// that don't exist on this kind (a color on an image, a font on a shape)
    /// are ignored.
    pub fn apply_patch(&mut self, patch: &ElementPatch) {
        if let Some(x) = patch.x {
            self.x = x;
        }
        if let Some(y) = patch.y {
            self.y = y;
        }
        if let Some(w) = patch.w {
            self.w = w.max(MIN_ELEMENT_SIZE);
        }
        if let Some(h) = patch.h {
            self.h = h.max(MIN_ELEMENT_SIZE);
        }
        if let Some(rotation) = patch.rotation {
            self.rotation = rotation.clamp(0.0, 360.0);
        }

        match &mut self.kind {
            ElementKind::Shape { color, .. } => {
                if let Some(new_color) = &patch.color {
                    *color = new_color.clone();
                }
            }
            ElementKind::Text {
                color,
                font_size,
                font_family,
                ..
            } => {
                if let Some(new_color) = &patch.color {
                    *color = new_color.clone();
                }
                if let Some(size) = patch.font_size {
                    *font_size = size.max(MIN_FONT_SIZE);
                }
                if let Some(family) = &patch.font_family {
                    *font_family = family.clone();
                }
            }
            ElementKind::Image { .. } => {}
        }
    }

    /// Copy of this element with `patch` merged in.
    pub fn patched(&self, patch: &ElementPatch) -> Self {
        let mut element = self.clone();
        element.apply_patch(patch);
        element
    }
}

/// A partial update to one element. `None` fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ElementPatch {
    pub x: Option<f32>,
    pub y: Option<f32>,
    pub w: Option<f32>,
    pub h: Option<f32>,
    pub rotation: Option<f32>,
    pub color: Option<Color>,
    pub font_size: Option<f32>,
    pub font_family: Option<String>,
}

impl ElementPatch {
    pub fn position(pos: Pos2) -> Self {
        Self {
            x: Some(pos.x),
            y: Some(pos.y),
            ..Default::default()
        }
    }

    /// Move and resize to `rect`. Text elements also follow the new height with
    /// their font size (`max(12, h - 8)`).
    pub fn bounds(element: &Element, rect: Rect) -> Self {
        let w = rect.width().max(MIN_ELEMENT_SIZE);
        let h = rect.height().max(MIN_ELEMENT_SIZE);
        Self {
            x: Some(rect.min.x),
            y: Some(rect.min.y),
            w: Some(w),
            h: Some(h),
            font_size: element
                .is_text()
                .then(|| (h - TEXT_BOX_PADDING).max(MIN_FONT_SIZE)),
            ..Default::default()
        }
    }

    pub fn rotation(degrees: f32) -> Self {
        Self {
            rotation: Some(degrees),
            ..Default::default()
        }
    }

    pub fn color(color: Color) -> Self {
        Self {
            color: Some(color),
            ..Default::default()
        }
    }

    pub fn font_family(family: impl Into<String>) -> Self {
        Self {
            font_family: Some(family.into()),
            ..Default::default()
        }
    }

    /// True when the patch touches nothing but `rotation`.
    pub fn is_rotation_only(&self) -> bool {
        self.rotation.is_some()
            && *self
                == Self {
                    rotation: self.rotation,
                    ..Default::default()
                }
    }
}

/// Factory functions for creating elements
pub mod factory {
    use super::*;

    pub fn create_rectangle(id: ElementId, x: f32, y: f32, w: f32, h: f32, color: &str) -> Element {
        Element {
            id,
            x,
            y,
            w,
            h,
            rotation: 0.0,
            kind: ElementKind::Shape {
                shape: ShapeKind::Rectangle,
                color: Color::new(color),
            },
        }
    }

    pub fn create_text(id: ElementId, text: &str, x: f32, y: f32, w: f32, h: f32) -> Element {
        Element {
            id,
            x,
            y,
            w,
            h,
            rotation: 0.0,
            kind: ElementKind::Text {
                text: text.to_owned(),
                font_size: (h - TEXT_BOX_PADDING).max(MIN_FONT_SIZE),
                font_family: DEFAULT_FONT_FAMILY.to_owned(),
                color: Color::new(DEFAULT_TEXT_COLOR),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn patch_clamps_sizes() {
        let mut element = factory::create_rectangle(1, 0.0, 0.0, 100.0, 100.0, "#000");
        element.apply_patch(&ElementPatch {
            w: Some(-40.0),
            h: Some(3.0),
            ..Default::default()
        });
        assert_eq!(element.w, MIN_ELEMENT_SIZE);
        assert_eq!(element.h, MIN_ELEMENT_SIZE);
    }

    #[test]
    fn color_patch_is_ignored_by_images() {
        let image = Element::image(3, "data:,", Rect::from_min_size(Pos2::ZERO, Vec2::splat(50.0)));
        let patched = image.patched(&ElementPatch::color(Color::new("#fff")));
        assert_eq!(patched, image);
    }

    #[test]
    fn bounds_patch_drives_font_size() {
        let text = factory::create_text(2, "hi", 0.0, 0.0, 60.0, 40.0);
        let patch = ElementPatch::bounds(&text, Rect::from_min_size(Pos2::ZERO, Vec2::new(60.0, 100.0)));
        assert_eq!(patch.font_size, Some(92.0));

        let shape = factory::create_rectangle(1, 0.0, 0.0, 10.0, 10.0, "#000");
        let patch = ElementPatch::bounds(&shape, shape.rect());
        assert_eq!(patch.font_size, None);
    }

    #[test]
    fn rotation_only_detection() {
        assert!(ElementPatch::rotation(45.0).is_rotation_only());
        assert!(!ElementPatch::position(Pos2::ZERO).is_rotation_only());
        let mut mixed = ElementPatch::rotation(10.0);
        mixed.x = Some(1.0);
        assert!(!mixed.is_rotation_only());
    }

    #[test]
    fn shape_tags_round_trip() {
        for kind in ShapeKind::ALL {
            assert_eq!(ShapeKind::from_tag(kind.as_str()), Some(kind));
        }
        assert_eq!(ShapeKind::from_tag("star"), None);
    }
}
