use std::collections::HashSet;
use std::sync::Arc;

use crate::element::{Element, ElementId};
use crate::id_generator::IdAllocator;
use crate::stroke::StrokeRef;

/// One design: a title, the placed elements in paint order and the freehand
/// strokes painted over them.
///
/// Cloning a document is the snapshot operation used by the history. Elements
/// are copied; committed strokes are immutable and shared through [`StrokeRef`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Document {
    title: String,
    elements: Vec<Element>,
    strokes: Vec<StrokeRef>,
}

impl Document {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_parts(title: String, elements: Vec<Element>, strokes: Vec<StrokeRef>) -> Self {
        Self {
            title,
            elements,
            strokes,
        }
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn set_title(&mut self, title: impl Into<String>) {
        self.title = title.into();
    }

    pub fn elements(&self) -> &[Element] {
        &self.elements
    }

    pub fn element(&self, index: usize) -> Option<&Element> {
        self.elements.get(index)
    }

    pub fn index_of(&self, id: ElementId) -> Option<usize> {
        self.elements.iter().position(|element| element.id == id)
    }

    pub fn strokes(&self) -> &[StrokeRef] {
        &self.strokes
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty() && self.strokes.is_empty()
    }

    pub fn contains_id(&self, id: ElementId) -> bool {
        self.elements.iter().any(|element| element.id == id)
            || self.strokes.iter().any(|stroke| stroke.id() == id)
    }

    pub fn push_element(&mut self, element: Element) {
        self.elements.push(element);
    }

    pub fn push_stroke(&mut self, stroke: StrokeRef) {
        self.strokes.push(stroke);
    }

    /// Replace the element at `index`, returning the old one.
    pub fn replace_element(&mut self, index: usize, element: Element) -> Option<Element> {
        let slot = self.elements.get_mut(index)?;
        Some(std::mem::replace(slot, element))
    }

    pub fn swap_elements(&mut self, a: usize, b: usize) {
        self.elements.swap(a, b);
    }

    pub fn remove_element(&mut self, index: usize) -> Option<Element> {
        (index < self.elements.len()).then(|| self.elements.remove(index))
    }

    /// Largest id used by any element or stroke.
    pub fn max_id(&self) -> Option<ElementId> {
        self.ids().max()
    }

    fn ids(&self) -> impl Iterator<Item = ElementId> + '_ {
        self.elements
            .iter()
            .map(|element| element.id)
            .chain(self.strokes.iter().map(|stroke| stroke.id()))
    }

    /// Make every id unique, non-zero and within [`MAX_ID`](crate::id_generator::MAX_ID), then move `ids`
    /// past all of them.
    ///
    /// Stored designs can carry repeated, missing or out-of-range ids; the
    /// first holder of a valid id keeps it and the others get fresh ids.
    /// Returns how many entries were renumbered.
    pub fn normalize_ids(&mut self, ids: &mut IdAllocator) -> usize {
        if let Some(max) = self.ids().filter(|id| IdAllocator::is_valid(*id)).max() {
            ids.reserve_through(max);
        }

        let mut seen = HashSet::new();
        let mut renumbered = 0;

        for element in &mut self.elements {
            if !IdAllocator::is_valid(element.id) || !seen.insert(element.id) {
                element.id = ids.generate_id();
                seen.insert(element.id);
                renumbered += 1;
            }
        }
        for stroke in &mut self.strokes {
            if !IdAllocator::is_valid(stroke.id()) || !seen.insert(stroke.id()) {
                let id = ids.generate_id();
                *stroke = Arc::new(stroke.with_id(id));
                seen.insert(id);
                renumbered += 1;
            }
        }

        if renumbered > 0 {
            log::warn!("Renumbered {} entries with missing or duplicate ids", renumbered);
        }
        renumbered
    }
}
