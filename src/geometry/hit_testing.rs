use egui::{Pos2, Rect, Vec2};

use crate::document::Document;
use crate::element::HANDLE_SIZE;
use crate::widgets::Corner;

/// What a pointer press landed on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Hit {
    /// A grab handle of the selected element.
    Handle(Corner),
    /// The element at this index (topmost under the pointer).
    Element(usize),
    Nothing,
}

/// Grab handle squares centred on the corners of `rect`.
pub fn handle_rects(rect: Rect) -> [(Corner, Rect); 4] {
    Corner::ALL.map(|corner| {
        (
            corner,
            Rect::from_center_size(corner.of(rect), Vec2::splat(HANDLE_SIZE)),
        )
    })
}

/// The corner whose handle contains `pos`, checked in [`Corner::ALL`] order.
pub fn handle_at(rect: Rect, pos: Pos2) -> Option<Corner> {
    handle_rects(rect)
        .into_iter()
        .find(|(_, handle)| handle.contains(pos))
        .map(|(corner, _)| corner)
}

/// Index of the topmost element whose bounding box contains `pos`.
///
/// Rotation is not taken into account.
pub fn element_at(doc: &Document, pos: Pos2) -> Option<usize> {
    doc.elements().iter().rposition(|element| element.contains(pos))
}

/// Resolve a press: the selected element's handles win, then the topmost
/// element under the pointer.
pub fn hit_test(doc: &Document, selected: Option<usize>, pos: Pos2) -> Hit {
    if let Some(corner) = selected
        .and_then(|index| doc.element(index))
        .and_then(|element| handle_at(element.rect(), pos))
    {
        return Hit::Handle(corner);
    }
    element_at(doc, pos).map_or(Hit::Nothing, Hit::Element)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::element::factory;

    fn two_overlapping() -> Document {
        let mut doc = Document::new();
        doc.push_element(factory::create_rectangle(1, 0.0, 0.0, 100.0, 100.0, "#000"));
        doc.push_element(factory::create_rectangle(2, 50.0, 50.0, 100.0, 100.0, "#fff"));
        doc
    }

    #[test]
    fn topmost_element_wins() {
        let doc = two_overlapping();
        assert_eq!(element_at(&doc, Pos2::new(75.0, 75.0)), Some(1));
        assert_eq!(element_at(&doc, Pos2::new(10.0, 10.0)), Some(0));
        assert_eq!(element_at(&doc, Pos2::new(300.0, 300.0)), None);
    }

    #[test]
    fn edges_are_inclusive() {
        let doc = two_overlapping();
        assert_eq!(element_at(&doc, Pos2::new(150.0, 150.0)), Some(1));
    }

    #[test]
    fn handles_only_count_for_the_selection() {
        let doc = two_overlapping();
        // Just outside element 0's top-left corner, inside its handle.
        let pos = Pos2::new(-5.0, -5.0);
        assert_eq!(hit_test(&doc, None, pos), Hit::Nothing);
        assert_eq!(hit_test(&doc, Some(0), pos), Hit::Handle(Corner::TopLeft));
    }

    #[test]
    fn selected_handle_beats_element_on_top() {
        let doc = two_overlapping();
        // Element 0's bottom-right corner lies inside element 1.
        let pos = Pos2::new(100.0, 100.0);
        assert_eq!(hit_test(&doc, Some(0), pos), Hit::Handle(Corner::BottomRight));
        assert_eq!(hit_test(&doc, None, pos), Hit::Element(1));
    }
}
