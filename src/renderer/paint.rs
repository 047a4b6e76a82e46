//! Drawing primitives: each function paints one element, stroke or decoration
//! onto a pixmap and touches nothing else.

use egui::Pos2;
use tiny_skia::{
    BlendMode, FillRule, FilterQuality, LineCap, LineJoin, Paint, PathBuilder, Pixmap,
    PixmapPaint, Rect as SkRect, Stroke as SkStroke, Transform,
};

use super::text::FontBook;
use crate::element::{Color, Element, ElementKind, HANDLE_SIZE};
use crate::geometry::{handle_rects, outline, Outline};
use crate::stroke::StrokeMode;

const HIGHLIGHT_COLOR: [u8; 4] = [0xf5, 0x9e, 0x42, 0xff];
const HIGHLIGHT_WIDTH: f32 = 2.0;
/// Gap between an element's box and its highlight outline.
const HIGHLIGHT_INSET: f32 = 2.0;
const HANDLE_FILL: [u8; 4] = [0xff, 0xff, 0xff, 0xff];
const HANDLE_BORDER: [u8; 4] = [0x33, 0x33, 0x33, 0xff];

fn solid(rgba: [u8; 4]) -> Paint<'static> {
    let mut paint = Paint::default();
    paint.set_color_rgba8(rgba[0], rgba[1], rgba[2], rgba[3]);
    paint.anti_alias = true;
    paint
}

fn color_paint(color: &Color) -> Paint<'static> {
    solid(color.to_rgba8())
}

/// Rotation about the element's box center, clockwise in degrees.
pub fn element_transform(element: &Element) -> Transform {
    if element.rotation == 0.0 {
        return Transform::identity();
    }
    let center = element.center();
    Transform::from_rotate_at(element.rotation, center.x, center.y)
}

/// Paint `element`. Images without a decoded raster are skipped.
pub fn paint_element(pixmap: &mut Pixmap, element: &Element, raster: Option<&Pixmap>, fonts: &FontBook) {
    let transform = element_transform(element);

    match &element.kind {
        ElementKind::Shape { shape, color } => {
            let paint = color_paint(color);
            let path = match outline(*shape, element.rect()) {
                Outline::Rect(rect) => {
                    SkRect::from_xywh(rect.min.x, rect.min.y, rect.width(), rect.height())
                        .map(PathBuilder::from_rect)
                }
                Outline::Circle { center, radius } => {
                    PathBuilder::from_circle(center.x, center.y, radius)
                }
                Outline::Oval {
                    center,
                    radius,
                    x_scale,
                } => SkRect::from_ltrb(
                    center.x - radius * x_scale,
                    center.y - radius,
                    center.x + radius * x_scale,
                    center.y + radius,
                )
                .and_then(PathBuilder::from_oval),
                Outline::Polygon(points) => polygon_path(&points),
            };
            if let Some(path) = path {
                pixmap.fill_path(&path, &paint, FillRule::Winding, transform, None);
            }
        }
        ElementKind::Text {
            text,
            font_size,
            font_family,
            color,
        } => {
            let baseline = (element.x, element.y + font_size);
            if let Some(path) = fonts.text_path(text, font_family, *font_size, baseline) {
                pixmap.fill_path(&path, &color_paint(color), FillRule::Winding, transform, None);
            }
        }
        ElementKind::Image { .. } => {
            let Some(raster) = raster else {
                return;
            };
            if raster.width() == 0 || raster.height() == 0 {
                return;
            }
            let sx = element.w / raster.width() as f32;
            let sy = element.h / raster.height() as f32;
            let placement = transform.pre_concat(
                Transform::from_translate(element.x, element.y).pre_scale(sx, sy),
            );
            let paint = PixmapPaint {
                quality: FilterQuality::Bilinear,
                ..PixmapPaint::default()
            };
            pixmap.draw_pixmap(0, 0, raster.as_ref(), &paint, placement, None);
        }
    }
}

fn polygon_path(points: &[Pos2]) -> Option<tiny_skia::Path> {
    let (first, rest) = points.split_first()?;
    let mut builder = PathBuilder::new();
    builder.move_to(first.x, first.y);
    for point in rest {
        builder.line_to(point.x, point.y);
    }
    builder.close();
    builder.finish()
}

/// Highlight outline and corner handles around the selected element, in the
/// element's rotated frame.
pub fn paint_selection(pixmap: &mut Pixmap, element: &Element) {
    let transform = element_transform(element);
    let rect = element.rect();

    if let Some(outline) = SkRect::from_xywh(
        rect.min.x - HIGHLIGHT_INSET,
        rect.min.y - HIGHLIGHT_INSET,
        rect.width() + 2.0 * HIGHLIGHT_INSET,
        rect.height() + 2.0 * HIGHLIGHT_INSET,
    ) {
        let stroke = SkStroke {
            width: HIGHLIGHT_WIDTH,
            ..SkStroke::default()
        };
        pixmap.stroke_path(
            &PathBuilder::from_rect(outline),
            &solid(HIGHLIGHT_COLOR),
            &stroke,
            transform,
            None,
        );
    }

    let border = SkStroke {
        width: 1.0,
        ..SkStroke::default()
    };
    for (_, handle) in handle_rects(rect) {
        let Some(square) = SkRect::from_xywh(handle.min.x, handle.min.y, HANDLE_SIZE, HANDLE_SIZE)
        else {
            continue;
        };
        pixmap.fill_rect(square, &solid(HANDLE_FILL), transform, None);
        pixmap.stroke_path(
            &PathBuilder::from_rect(square),
            &solid(HANDLE_BORDER),
            &border,
            transform,
            None,
        );
    }
}

/// Stroke an open polyline. Erase strokes punch the covered pixels out
/// instead of painting.
pub fn paint_polyline(pixmap: &mut Pixmap, points: &[Pos2], color: &Color, size: f32, mode: StrokeMode) {
    let Some((first, rest)) = points.split_first() else {
        return;
    };
    let mut builder = PathBuilder::new();
    builder.move_to(first.x, first.y);
    for point in rest {
        builder.line_to(point.x, point.y);
    }
    // A lone point has no segment to stroke.
    let Some(path) = builder.finish() else {
        return;
    };

    let paint = match mode {
        StrokeMode::Draw => color_paint(color),
        StrokeMode::Erase => {
            let mut paint = solid([0, 0, 0, 255]);
            paint.blend_mode = BlendMode::DestinationOut;
            paint
        }
    };

    let stroke = SkStroke {
        width: size,
        line_cap: LineCap::Round,
        line_join: LineJoin::Round,
        ..SkStroke::default()
    };
    pixmap.stroke_path(&path, &paint, &stroke, Transform::identity(), None);
}
