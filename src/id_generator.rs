use crate::element::ElementId;

/// Hands out element and stroke ids for one editor session.
///
/// Elements and strokes share the same id space. Ids are unique and
/// monotonically increasing but not dense: deleting an element leaves a gap.
/// Largest id handed out or accepted from storage: the biggest integer a
/// JSON reader backed by doubles keeps exact.
pub const MAX_ID: ElementId = (1 << 53) - 1;

#[derive(Debug, Clone)]
pub struct IdAllocator {
    next: ElementId,
}

impl Default for IdAllocator {
    fn default() -> Self {
        Self::new()
    }
}

impl IdAllocator {
    pub fn new() -> Self {
        Self { next: 1 }
    }

    pub fn generate_id(&mut self) -> ElementId {
        let id = self.next;
        self.next += 1;
        id
    }

    /// Make sure every future id is strictly greater than `id`.
    ///
    /// Used after loading a design or adding an element with a caller-chosen
    /// id, so freshly created ids can't collide with it. Returns false, and
    /// leaves the allocator alone, for ids above [`MAX_ID`].
    pub fn reserve_through(&mut self, id: ElementId) -> bool {
        if id > MAX_ID {
            return false;
        }
        if let Some(next) = id.checked_add(1) {
            self.next = self.next.max(next);
        }
        true
    }

    /// Whether `id` can be kept as is: non-zero and at most [`MAX_ID`].
    pub fn is_valid(id: ElementId) -> bool {
        id != 0 && id <= MAX_ID
    }

    /// The id the next call to [`Self::generate_id`] will return.
    pub fn peek(&self) -> ElementId {
        self.next
    }
}
