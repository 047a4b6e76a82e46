use egui::{ColorImage, Pos2};
use thiserror::Error;
use tiny_skia::{Color as SkColor, Pixmap};

use crate::document::Document;
use crate::element::Color;
use crate::image_cache::ResolvedImages;
use crate::stroke::{StrokeBuilder, StrokeMode};

pub mod paint;
mod text;

pub use text::FontBook;

/// Errors raised by the raster surface.
#[derive(Error, Debug)]
pub enum RenderError {
    #[error("cannot allocate a {0}x{1} surface")]
    Surface(u32, u32),
    #[error("PNG encoding failed: {0}")]
    Encode(String),
    #[error("bundled font is invalid: {0}")]
    Font(#[from] ab_glyph::InvalidFont),
}

/// The design surface: a fixed-size RGBA pixmap plus the fonts text is drawn with.
///
/// A full [`Renderer::render`] clears the surface and repaints the document.
/// The only incremental path is [`Renderer::paint_segment`], used while a
/// freehand stroke is being drawn.
pub struct Renderer {
    pixmap: Pixmap,
    fonts: FontBook,
}

impl Renderer {
    pub fn new(width: u32, height: u32) -> Result<Self, RenderError> {
        Ok(Self {
            pixmap: Pixmap::new(width, height).ok_or(RenderError::Surface(width, height))?,
            fonts: FontBook::new()?,
        })
    }

    pub fn width(&self) -> u32 {
        self.pixmap.width()
    }

    pub fn height(&self) -> u32 {
        self.pixmap.height()
    }

    pub fn pixmap(&self) -> &Pixmap {
        &self.pixmap
    }

    pub fn fonts(&self) -> &FontBook {
        &self.fonts
    }

    /// Repaint everything: elements in list order, then strokes in list order.
    ///
    /// `selected` gets the highlight and handles. `in_progress` is a stroke
    /// still being drawn; it is painted last so a repaint mid-gesture doesn't
    /// lose it.
    pub fn render(
        &mut self,
        doc: &Document,
        images: &ResolvedImages,
        selected: Option<usize>,
        in_progress: Option<&StrokeBuilder>,
    ) {
        self.pixmap.fill(SkColor::TRANSPARENT);

        for (index, element) in doc.elements().iter().enumerate() {
            let raster = images.get(&element.id).map(|pixmap| &**pixmap);
            paint::paint_element(&mut self.pixmap, element, raster, &self.fonts);
            if selected == Some(index) {
                paint::paint_selection(&mut self.pixmap, element);
            }
        }

        for stroke in doc.strokes() {
            paint::paint_polyline(
                &mut self.pixmap,
                stroke.points(),
                stroke.color(),
                stroke.size(),
                stroke.mode(),
            );
        }

        if let Some(builder) = in_progress {
            paint::paint_polyline(
                &mut self.pixmap,
                builder.points(),
                builder.color(),
                builder.size(),
                builder.mode(),
            );
        }
    }

    /// Paint just one new segment of a stroke in progress.
    pub fn paint_segment(&mut self, from: Pos2, to: Pos2, color: &Color, size: f32, mode: StrokeMode) {
        paint::paint_polyline(&mut self.pixmap, &[from, to], color, size, mode);
    }

    pub fn to_color_image(&self) -> ColorImage {
        ColorImage::from_rgba_premultiplied(
            [self.pixmap.width() as usize, self.pixmap.height() as usize],
            self.pixmap.data(),
        )
    }

    pub fn encode_png(&self) -> Result<Vec<u8>, RenderError> {
        self.pixmap
            .encode_png()
            .map_err(|err| RenderError::Encode(err.to_string()))
    }

    /// Render `doc` without any selection decoration onto a fresh surface of
    /// the same size and encode it. The live surface is left alone.
    pub fn export_png(&self, doc: &Document, images: &ResolvedImages) -> Result<Vec<u8>, RenderError> {
        let (width, height) = (self.width(), self.height());
        let mut surface = Renderer {
            pixmap: Pixmap::new(width, height).ok_or(RenderError::Surface(width, height))?,
            fonts: FontBook::new()?,
        };
        surface.render(doc, images, None, None);
        surface.encode_png()
    }
}

impl std::fmt::Debug for Renderer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Renderer")
            .field("width", &self.width())
            .field("height", &self.height())
            .finish_non_exhaustive()
    }
}
