use egui::{CursorIcon, Pos2, Rect};

use crate::element::MIN_ELEMENT_SIZE;

/// Represents a corner of a selection box
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Corner {
    TopLeft,
    TopRight,
    BottomLeft,
    BottomRight,
}

impl Corner {
    /// Hit-test order of the handles.
    pub const ALL: [Corner; 4] = [
        Corner::TopLeft,
        Corner::TopRight,
        Corner::BottomLeft,
        Corner::BottomRight,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Corner::TopLeft => "top_left",
            Corner::TopRight => "top_right",
            Corner::BottomLeft => "bottom_left",
            Corner::BottomRight => "bottom_right",
        }
    }

    pub fn cursor_icon(&self) -> CursorIcon {
        match self {
            Corner::TopLeft => CursorIcon::ResizeNwSe,
            Corner::TopRight => CursorIcon::ResizeNeSw,
            Corner::BottomLeft => CursorIcon::ResizeNeSw,
            Corner::BottomRight => CursorIcon::ResizeNwSe,
        }
    }

    pub fn opposite(&self) -> Corner {
        match self {
            Corner::TopLeft => Corner::BottomRight,
            Corner::TopRight => Corner::BottomLeft,
            Corner::BottomLeft => Corner::TopRight,
            Corner::BottomRight => Corner::TopLeft,
        }
    }

    fn is_left(&self) -> bool {
        matches!(self, Corner::TopLeft | Corner::BottomLeft)
    }

    fn is_top(&self) -> bool {
        matches!(self, Corner::TopLeft | Corner::TopRight)
    }

    /// This corner's position on `rect`.
    pub fn of(&self, rect: Rect) -> Pos2 {
        match self {
            Corner::TopLeft => rect.left_top(),
            Corner::TopRight => rect.right_top(),
            Corner::BottomLeft => rect.left_bottom(),
            Corner::BottomRight => rect.right_bottom(),
        }
    }

    /// Drag this corner of `rect` to `pointer`.
    ///
    /// The opposite corner stays where it is and both sides are clamped to
    /// [`MIN_ELEMENT_SIZE`], so dragging past the anchor never flips the box.
    pub fn resize(&self, rect: Rect, pointer: Pos2) -> Rect {
        let anchor = self.opposite().of(rect);

        let (min_x, max_x) = if self.is_left() {
            let w = (anchor.x - pointer.x).max(MIN_ELEMENT_SIZE);
            (anchor.x - w, anchor.x)
        } else {
            let w = (pointer.x - anchor.x).max(MIN_ELEMENT_SIZE);
            (anchor.x, anchor.x + w)
        };
        let (min_y, max_y) = if self.is_top() {
            let h = (anchor.y - pointer.y).max(MIN_ELEMENT_SIZE);
            (anchor.y - h, anchor.y)
        } else {
            let h = (pointer.y - anchor.y).max(MIN_ELEMENT_SIZE);
            (anchor.y, anchor.y + h)
        };

        Rect::from_min_max(Pos2::new(min_x, min_y), Pos2::new(max_x, max_y))
    }
}
