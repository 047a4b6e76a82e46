use egui::Color32;
use serde::{Deserialize, Serialize};

// Common constants for all element types
pub const MIN_ELEMENT_SIZE: f32 = 20.0;
pub const HANDLE_SIZE: f32 = 16.0;
/// Horizontal skew used by parallelograms and trapezoids, independent of width.
pub const SKEW_OFFSET: f32 = 20.0;

pub const DEFAULT_FONT_SIZE: f32 = 24.0;
pub const DEFAULT_FONT_FAMILY: &str = "Arial";
pub const MIN_FONT_SIZE: f32 = 12.0;
/// Extra height a text box carries on top of its font size.
pub const TEXT_BOX_PADDING: f32 = 8.0;

pub const DEFAULT_SHAPE_COLOR: &str = "#4f46e5";
pub const DEFAULT_TEXT_COLOR: &str = "#111827";
pub const DEFAULT_PENCIL_COLOR: &str = "#333";

/// A CSS-style color string as stored in design files, e.g. `#4f46e5` or `#333`.
///
/// The raw text is kept so a design round-trips unchanged; parsing happens only
/// when painting.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Color(String);

impl Color {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Parse into straight (non-premultiplied) RGBA.
    ///
    /// Accepts `#rgb`, `#rgba`, `#rrggbb` and `#rrggbbaa`. Anything else falls
    /// back to opaque black, which is what a canvas does with a color it can't parse.
    pub fn to_rgba8(&self) -> [u8; 4] {
        parse_hex(self.0.trim()).unwrap_or_else(|| {
            log::debug!("Unparseable color {:?}, using black", self.0);
            [0, 0, 0, 255]
        })
    }

    pub fn to_color32(&self) -> Color32 {
        let [r, g, b, a] = self.to_rgba8();
        Color32::from_rgba_unmultiplied(r, g, b, a)
    }

    pub fn from_color32(color: Color32) -> Self {
        let [r, g, b, a] = color.to_srgba_unmultiplied();
        if a == 255 {
            Self(format!("#{r:02x}{g:02x}{b:02x}"))
        } else {
            Self(format!("#{r:02x}{g:02x}{b:02x}{a:02x}"))
        }
    }
}

impl From<&str> for Color {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl std::fmt::Display for Color {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

fn parse_hex(text: &str) -> Option<[u8; 4]> {
    let hex = text.strip_prefix('#')?;
    if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }
    let nibble = |i: usize| u8::from_str_radix(&hex[i..i + 1], 16).ok().map(|v| v * 17);
    let byte = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();
    match hex.len() {
        3 => Some([nibble(0)?, nibble(1)?, nibble(2)?, 255]),
        4 => Some([nibble(0)?, nibble(1)?, nibble(2)?, nibble(3)?]),
        6 => Some([byte(0)?, byte(2)?, byte(4)?, 255]),
        8 => Some([byte(0)?, byte(2)?, byte(4)?, byte(6)?]),
        _ => None,
    }
}
