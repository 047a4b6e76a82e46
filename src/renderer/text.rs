use ab_glyph::{Font, FontRef, GlyphId, OutlineCurve, Point, ScaleFont};
use tiny_skia::{Path, PathBuilder};

use super::RenderError;

/// Families that render with the monospace face; everything else uses the
/// proportional one.
const MONOSPACE_FAMILIES: [&str; 5] = ["monospace", "courier", "courier new", "consolas", "lucida console"];

/// The faces text elements are drawn with.
///
/// Both come from egui's bundled fonts, so rendering doesn't depend on what
/// is installed on the machine.
pub struct FontBook {
    proportional: FontRef<'static>,
    monospace: FontRef<'static>,
}

impl FontBook {
    pub fn new() -> Result<Self, RenderError> {
        Ok(Self {
            proportional: FontRef::try_from_slice(epaint_default_fonts::UBUNTU_LIGHT)?,
            monospace: FontRef::try_from_slice(epaint_default_fonts::HACK_REGULAR)?,
        })
    }

    fn face(&self, family: &str) -> &FontRef<'static> {
        let family = family.trim().to_ascii_lowercase();
        if MONOSPACE_FAMILIES.contains(&family.as_str()) {
            &self.monospace
        } else {
            &self.proportional
        }
    }

    /// Advance width of `text` at `font_size` pixels per em.
    pub fn measure(&self, text: &str, family: &str, font_size: f32) -> f32 {
        let font = self.face(family);
        let scaled = font.as_scaled(px_scale(font, font_size));
        let mut width = 0.0;
        let mut previous: Option<GlyphId> = None;
        for ch in text.chars() {
            let id = font.glyph_id(ch);
            if let Some(prev) = previous {
                width += scaled.kern(prev, id);
            }
            width += scaled.h_advance(id);
            previous = Some(id);
        }
        width
    }

    /// Glyph outlines of `text` with the baseline at `baseline.1` and the pen
    /// starting at `baseline.0`. `None` when nothing has an outline (blank text).
    pub fn text_path(
        &self,
        text: &str,
        family: &str,
        font_size: f32,
        baseline: (f32, f32),
    ) -> Option<Path> {
        let font = self.face(family);
        let scale = px_scale(font, font_size);
        let scaled = font.as_scaled(scale);
        let factor = scaled.scale_factor();

        let mut builder = PathBuilder::new();
        let mut caret = baseline.0;
        let mut previous: Option<GlyphId> = None;

        for ch in text.chars() {
            let id = font.glyph_id(ch);
            if let Some(prev) = previous {
                caret += scaled.kern(prev, id);
            }
            if let Some(outline) = font.outline(id) {
                // Font units are y-up; the surface is y-down.
                let map = |p: Point| (caret + p.x * factor.horizontal, baseline.1 - p.y * factor.vertical);
                let mut pen: Option<Point> = None;
                for curve in &outline.curves {
                    let (start, end) = match curve {
                        OutlineCurve::Line(a, b) => (*a, *b),
                        OutlineCurve::Quad(a, _, c) => (*a, *c),
                        OutlineCurve::Cubic(a, _, _, d) => (*a, *d),
                    };
                    if pen != Some(start) {
                        if pen.is_some() {
                            builder.close();
                        }
                        let (x, y) = map(start);
                        builder.move_to(x, y);
                    }
                    match curve {
                        OutlineCurve::Line(_, b) => {
                            let (x, y) = map(*b);
                            builder.line_to(x, y);
                        }
                        OutlineCurve::Quad(_, b, c) => {
                            let (x1, y1) = map(*b);
                            let (x, y) = map(*c);
                            builder.quad_to(x1, y1, x, y);
                        }
                        OutlineCurve::Cubic(_, b, c, d) => {
                            let (x1, y1) = map(*b);
                            let (x2, y2) = map(*c);
                            let (x, y) = map(*d);
                            builder.cubic_to(x1, y1, x2, y2, x, y);
                        }
                    }
                    pen = Some(end);
                }
                if pen.is_some() {
                    builder.close();
                }
            }
            caret += scaled.h_advance(id);
            previous = Some(id);
        }

        builder.finish()
    }
}

/// `font_size` is CSS-style pixels per em; ab_glyph scales by the line height.
fn px_scale(font: &FontRef<'static>, font_size: f32) -> ab_glyph::PxScale {
    let units_per_em = font.units_per_em().unwrap_or(1000.0);
    ab_glyph::PxScale::from(font_size * font.height_unscaled() / units_per_em)
}
