use egui::{Pos2, Rect, Vec2};
use std::f32::consts::{FRAC_PI_2, TAU};

use crate::element::{ShapeKind, SKEW_OFFSET};

/// Horizontal stretch applied to the oval's circle.
pub const OVAL_X_SCALE: f32 = 1.5;

/// Outline of a shape in its own unrotated frame.
#[derive(Debug, Clone, PartialEq)]
pub enum Outline {
    Rect(Rect),
    Circle { center: Pos2, radius: f32 },
    /// A circle of `radius` stretched horizontally by `x_scale`.
    Oval {
        center: Pos2,
        radius: f32,
        x_scale: f32,
    },
    Polygon(Vec<Pos2>),
}

/// Compute the outline of `shape` laid out in `rect`.
///
/// Circles take their radius from the width and ovals from the height, so
/// neither necessarily fills the box.
pub fn outline(shape: ShapeKind, rect: Rect) -> Outline {
    let Rect { min, max } = rect;
    let (x, y) = (min.x, min.y);
    let (w, h) = (rect.width(), rect.height());
    let center = rect.center();

    match shape {
        ShapeKind::Rectangle | ShapeKind::Square => Outline::Rect(rect),
        ShapeKind::Circle => Outline::Circle {
            center,
            radius: w / 2.0,
        },
        ShapeKind::Oval => Outline::Oval {
            center,
            radius: h / 2.0,
            x_scale: OVAL_X_SCALE,
        },
        ShapeKind::Triangle => Outline::Polygon(vec![
            Pos2::new(x, max.y),
            Pos2::new(max.x, max.y),
            Pos2::new(x + w / 2.0, y),
        ]),
        ShapeKind::Parallelogram => Outline::Polygon(vec![
            Pos2::new(x + SKEW_OFFSET, max.y),
            Pos2::new(max.x + SKEW_OFFSET, max.y),
            Pos2::new(max.x, y),
            Pos2::new(x, y),
        ]),
        // Kites are drawn with the rhombus vertices.
        ShapeKind::Rhombus | ShapeKind::Kite => Outline::Polygon(vec![
            Pos2::new(x + w / 2.0, y),
            Pos2::new(max.x, y + h / 2.0),
            Pos2::new(x + w / 2.0, max.y),
            Pos2::new(x, y + h / 2.0),
        ]),
        ShapeKind::Trapezoid => Outline::Polygon(vec![
            Pos2::new(x + SKEW_OFFSET, max.y),
            Pos2::new(max.x - SKEW_OFFSET, max.y),
            Pos2::new(max.x, y),
            Pos2::new(x, y),
        ]),
        ShapeKind::Pentagon
        | ShapeKind::Hexagon
        | ShapeKind::Heptagon
        | ShapeKind::Octagon
        | ShapeKind::Nonagon
        | ShapeKind::Decagon => {
            let sides = shape.sides().unwrap_or(5);
            Outline::Polygon(regular_polygon(center, w.min(h) / 2.0, sides))
        }
    }
}

/// Vertices of a regular polygon inscribed in a circle, first vertex straight up.
pub fn regular_polygon(center: Pos2, radius: f32, sides: usize) -> Vec<Pos2> {
    (0..sides)
        .map(|i| {
            let angle = TAU * i as f32 / sides as f32 - FRAC_PI_2;
            center + radius * Vec2::angled(angle)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: Pos2, b: Pos2) -> bool {
        (a - b).length() < 1e-3
    }

    #[test]
    fn hexagon_vertices_step_sixty_degrees_from_top() {
        let center = Pos2::new(50.0, 50.0);
        let vertices = regular_polygon(center, 40.0, 6);
        assert_eq!(vertices.len(), 6);
        assert!(approx(vertices[0], Pos2::new(50.0, 10.0)));

        for (i, vertex) in vertices.iter().enumerate() {
            let offset = *vertex - center;
            let expected = (-90.0 + 60.0 * i as f32).to_radians();
            let angle = offset.y.atan2(offset.x);
            let diff = (angle - expected).rem_euclid(TAU);
            assert!(diff < 1e-3 || TAU - diff < 1e-3, "vertex {i} at {angle}");
            assert!((offset.length() - 40.0).abs() < 1e-3);
        }
    }

    #[test]
    fn polygon_radius_uses_shorter_side() {
        let rect = Rect::from_min_size(Pos2::ZERO, Vec2::new(120.0, 80.0));
        let Outline::Polygon(points) = outline(ShapeKind::Pentagon, rect) else {
            panic!("pentagon should be a polygon");
        };
        assert!(approx(points[0], Pos2::new(60.0, 0.0)));
    }

    #[test]
    fn circle_and_oval_radii() {
        let rect = Rect::from_min_size(Pos2::new(10.0, 10.0), Vec2::new(100.0, 60.0));
        assert_eq!(
            outline(ShapeKind::Circle, rect),
            Outline::Circle {
                center: Pos2::new(60.0, 40.0),
                radius: 50.0
            }
        );
        assert_eq!(
            outline(ShapeKind::Oval, rect),
            Outline::Oval {
                center: Pos2::new(60.0, 40.0),
                radius: 30.0,
                x_scale: OVAL_X_SCALE
            }
        );
    }

    #[test]
    fn skew_does_not_depend_on_width() {
        let narrow = Rect::from_min_size(Pos2::ZERO, Vec2::new(40.0, 40.0));
        let Outline::Polygon(points) = outline(ShapeKind::Parallelogram, narrow) else {
            panic!("parallelogram should be a polygon");
        };
        assert_eq!(points[0], Pos2::new(20.0, 40.0));
        assert_eq!(points[1], Pos2::new(60.0, 40.0));
    }
}
