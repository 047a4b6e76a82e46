use egui::{Context, Key, Modifiers, PointerButton, Pos2, Rect};

/// Represents the location where an input event occurred
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InputLocation {
    /// Position relative to the canvas' top-left corner, in design pixels
    pub position: Pos2,
    /// Whether this position is within the canvas bounds
    pub is_in_canvas: bool,
}

/// Represents different types of input events that can occur in the application
#[derive(Debug, Clone, PartialEq)]
pub enum InputEvent {
    /// Mouse button was pressed
    PointerDown {
        location: InputLocation,
        button: PointerButton,
    },
    /// Mouse button was released
    PointerUp {
        location: InputLocation,
        button: PointerButton,
    },
    /// Mouse moved (with or without buttons pressed)
    PointerMove {
        location: InputLocation,
        /// Buttons that are currently held down
        held_buttons: Vec<PointerButton>,
    },
    /// Pointer left the canvas, or the window altogether
    PointerLeave { last_known_location: InputLocation },
    /// Key was pressed
    KeyDown { key: Key, modifiers: Modifiers },
}

impl InputEvent {
    /// Helper to check if an input event occurred within the canvas
    pub fn is_in_canvas(&self) -> bool {
        match self {
            InputEvent::PointerDown { location, .. }
            | InputEvent::PointerUp { location, .. }
            | InputEvent::PointerMove { location, .. } => location.is_in_canvas,
            InputEvent::PointerLeave {
                last_known_location,
            } => last_known_location.is_in_canvas,
            InputEvent::KeyDown { .. } => false,
        }
    }
}

/// Editor commands bound to keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditorAction {
    Undo,
    Redo,
    DeleteSelected,
}

/// Ctrl/Cmd+Z undoes, Ctrl/Cmd+Y or Ctrl/Cmd+Shift+Z redoes, Delete and
/// Backspace remove the selected element.
pub fn shortcut(key: Key, modifiers: Modifiers) -> Option<EditorAction> {
    match key {
        Key::Z if modifiers.command && modifiers.shift => Some(EditorAction::Redo),
        Key::Z if modifiers.command => Some(EditorAction::Undo),
        Key::Y if modifiers.command => Some(EditorAction::Redo),
        Key::Delete | Key::Backspace if !modifiers.command => Some(EditorAction::DeleteSelected),
        _ => None,
    }
}

/// Handles converting raw egui input into our domain-specific InputEvents
pub struct InputHandler {
    last_pointer_pos: Option<Pos2>,
    canvas_rect: Rect,
    /// Screen pixels per design pixel
    scale: f32,
}

impl InputHandler {
    pub fn new(canvas_rect: Rect) -> Self {
        Self {
            last_pointer_pos: None,
            canvas_rect,
            scale: 1.0,
        }
    }

    /// Update the canvas rectangle (e.g. if window is resized)
    pub fn set_canvas_rect(&mut self, rect: Rect, scale: f32) {
        self.canvas_rect = rect;
        self.scale = if scale > 0.0 { scale } else { 1.0 };
    }

    /// Creates an InputLocation from a screen position
    fn make_location(&self, pos: Pos2) -> InputLocation {
        InputLocation {
            position: ((pos - self.canvas_rect.min) / self.scale).to_pos2(),
            is_in_canvas: self.canvas_rect.contains(pos),
        }
    }

    /// The event for the pointer moving from the last known position to
    /// `hover`. Crossing out of the canvas, or out of the window, is a
    /// `PointerLeave` at the last position inside.
    fn pointer_motion(&self, hover: Option<Pos2>, held_buttons: Vec<PointerButton>) -> Option<InputEvent> {
        let last = self.last_pointer_pos;
        if hover == last {
            return None;
        }
        let left_canvas = |last: Pos2| {
            self.canvas_rect.contains(last) && !hover.is_some_and(|pos| self.canvas_rect.contains(pos))
        };
        match (hover, last) {
            (_, Some(last)) if left_canvas(last) => Some(InputEvent::PointerLeave {
                last_known_location: self.make_location(last),
            }),
            (Some(pos), _) => Some(InputEvent::PointerMove {
                location: self.make_location(pos),
                held_buttons,
            }),
            (None, Some(last)) => Some(InputEvent::PointerLeave {
                last_known_location: self.make_location(last),
            }),
            (None, None) => None,
        }
    }

    /// Process raw egui input and generate our InputEvents.
    ///
    /// Key events are only collected when `keys` is set, so shortcuts don't
    /// fire while a text field has focus.
    pub fn process_input(&mut self, ctx: &Context, keys: bool) -> Vec<InputEvent> {
        let mut events = Vec::new();

        ctx.input(|input| {
            let hover = input.pointer.hover_pos();
            let buttons = [
                PointerButton::Primary,
                PointerButton::Secondary,
                PointerButton::Middle,
            ];

            let held_buttons = buttons
                .into_iter()
                .filter(|button| input.pointer.button_down(*button))
                .collect();
            events.extend(self.pointer_motion(hover, held_buttons));

            for button in buttons {
                if input.pointer.button_pressed(button) {
                    if let Some(pos) = hover {
                        events.push(InputEvent::PointerDown {
                            location: self.make_location(pos),
                            button,
                        });
                    }
                }
                if input.pointer.button_released(button) {
                    if let Some(pos) = hover.or(self.last_pointer_pos) {
                        events.push(InputEvent::PointerUp {
                            location: self.make_location(pos),
                            button,
                        });
                    }
                }
            }

            self.last_pointer_pos = hover;

            if keys {
                for event in &input.raw.events {
                    if let egui::Event::Key {
                        key,
                        pressed: true,
                        modifiers,
                        ..
                    } = event
                    {
                        events.push(InputEvent::KeyDown {
                            key: *key,
                            modifiers: *modifiers,
                        });
                    }
                }
            }
        });

        events
    }
}
