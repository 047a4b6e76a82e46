use eframe_design::element::factory;
use eframe_design::input::{InputEvent, InputLocation};
use eframe_design::state::{EditorContext, EditorState};
use eframe_design::stroke::StrokeMode;
use eframe_design::tools::ToolKind;
use eframe_design::widgets::Corner;
use eframe_design::{EditorConfig, ElementKind};
use egui::{PointerButton, Pos2};

fn editor() -> EditorContext {
    EditorContext::new(EditorConfig {
        canvas_width: 400,
        canvas_height: 300,
        ..Default::default()
    })
    .unwrap()
}

fn location(x: f32, y: f32) -> InputLocation {
    InputLocation {
        position: Pos2::new(x, y),
        is_in_canvas: true,
    }
}

fn press(editor: &mut EditorContext, x: f32, y: f32) {
    editor.handle_input(&InputEvent::PointerDown {
        location: location(x, y),
        button: PointerButton::Primary,
    });
}

fn move_to(editor: &mut EditorContext, x: f32, y: f32) {
    editor.handle_input(&InputEvent::PointerMove {
        location: location(x, y),
        held_buttons: vec![PointerButton::Primary],
    });
}

fn release(editor: &mut EditorContext, x: f32, y: f32) {
    editor.handle_input(&InputEvent::PointerUp {
        location: location(x, y),
        button: PointerButton::Primary,
    });
}

fn font_size(editor: &EditorContext) -> f32 {
    match &editor.document().elements()[0].kind {
        ElementKind::Text { font_size, .. } => *font_size,
        other => panic!("expected text, found {:?}", other),
    }
}

/// A selected 100x40 text block at (50, 50).
fn editor_with_selected_text() -> EditorContext {
    let mut editor = editor();
    editor
        .add_element(factory::create_text(1, "Hello", 50.0, 50.0, 100.0, 40.0))
        .unwrap();
    editor.select(0);
    editor
}

#[test]
fn resizing_text_grows_its_font() {
    let mut editor = editor_with_selected_text();

    // Bottom-right corner sits at (150, 90).
    press(&mut editor, 150.0, 90.0);
    assert_eq!(
        editor.state(),
        EditorState::Resizing {
            index: 0,
            corner: Corner::BottomRight
        }
    );
    move_to(&mut editor, 150.0, 150.0);
    release(&mut editor, 150.0, 150.0);

    let text = &editor.document().elements()[0];
    assert_eq!(text.h, 100.0);
    assert_eq!(font_size(&editor), 92.0);
}

#[test]
fn shrinking_text_clamps_height_and_font() {
    let mut editor = editor_with_selected_text();

    press(&mut editor, 150.0, 90.0);
    move_to(&mut editor, 150.0, 60.0);
    release(&mut editor, 150.0, 60.0);

    let text = &editor.document().elements()[0];
    assert_eq!(text.h, 20.0);
    assert_eq!(text.y, 50.0);
    assert_eq!(font_size(&editor), 12.0);
}

#[test]
fn resize_never_underflows() {
    let mut editor = editor();
    editor
        .add_element(factory::create_rectangle(1, 100.0, 100.0, 80.0, 60.0, "#000"))
        .unwrap();
    editor.select(0);

    // Drag the top-left handle far past the opposite corner.
    press(&mut editor, 100.0, 100.0);
    move_to(&mut editor, 390.0, 290.0);
    release(&mut editor, 390.0, 290.0);

    let rect = &editor.document().elements()[0];
    assert!(rect.w >= 20.0 && rect.h >= 20.0);
    // The opposite corner stays put.
    assert_eq!((rect.x + rect.w, rect.y + rect.h), (180.0, 160.0));
}

#[test]
fn history_is_untouched_mid_gesture() {
    let mut editor = editor_with_selected_text();
    let committed = editor.document().clone();
    let entries = editor.history().len();

    press(&mut editor, 60.0, 60.0);
    move_to(&mut editor, 120.0, 80.0);
    move_to(&mut editor, 200.0, 100.0);
    assert_eq!(editor.history().len(), entries);
    assert_eq!(*editor.document(), committed);
    assert_eq!(
        editor.preview_document().elements()[0].position(),
        Pos2::new(190.0, 90.0)
    );

    release(&mut editor, 200.0, 100.0);
    assert_eq!(editor.history().len(), entries + 1);
    assert_eq!(editor.document().elements()[0].position(), Pos2::new(190.0, 90.0));
}

#[test]
fn topmost_element_is_picked() {
    let mut editor = editor();
    editor
        .add_element(factory::create_rectangle(1, 0.0, 0.0, 100.0, 100.0, "#f00"))
        .unwrap();
    editor
        .add_element(factory::create_rectangle(2, 50.0, 50.0, 100.0, 100.0, "#00f"))
        .unwrap();

    press(&mut editor, 75.0, 75.0);
    release(&mut editor, 75.0, 75.0);
    assert_eq!(editor.selection().index(), Some(1));

    press(&mut editor, 10.0, 10.0);
    release(&mut editor, 10.0, 10.0);
    assert_eq!(editor.selection().index(), Some(0));

    press(&mut editor, 300.0, 250.0);
    release(&mut editor, 300.0, 250.0);
    assert!(editor.selection().is_empty());
    assert_eq!(editor.history().len(), 3);
}

#[test]
fn drawing_mode_does_not_grab_elements() {
    let mut editor = editor();
    editor
        .add_element(factory::create_rectangle(1, 0.0, 0.0, 100.0, 100.0, "#f00"))
        .unwrap();
    editor.set_tool(ToolKind::Eraser);

    press(&mut editor, 50.0, 50.0);
    assert_eq!(
        editor.state(),
        EditorState::FreehandDrawing {
            mode: StrokeMode::Erase
        }
    );
    move_to(&mut editor, 60.0, 60.0);
    move_to(&mut editor, 70.0, 60.0);
    release(&mut editor, 70.0, 60.0);

    let doc = editor.document();
    assert!(editor.selection().is_empty());
    assert_eq!(doc.elements()[0].position(), Pos2::new(0.0, 0.0));
    let stroke = &doc.strokes()[0];
    assert!(stroke.is_erase());
    assert_eq!(stroke.size(), editor.settings().eraser_size);
    assert_eq!(stroke.points().len(), 3);
}

#[test]
fn leaving_the_canvas_commits_the_stroke() {
    let mut editor = editor();
    editor.set_tool(ToolKind::Pencil);
    press(&mut editor, 20.0, 20.0);
    move_to(&mut editor, 40.0, 30.0);
    editor.handle_input(&InputEvent::PointerLeave {
        last_known_location: location(40.0, 30.0),
    });

    assert!(editor.state().is_idle());
    let strokes = editor.document().strokes();
    assert_eq!(strokes.len(), 1);
    assert_eq!(strokes[0].points(), &[Pos2::new(20.0, 20.0), Pos2::new(40.0, 30.0)]);

    // Moving back in with the button held does not resume drawing.
    move_to(&mut editor, 50.0, 30.0);
    release(&mut editor, 50.0, 30.0);
    assert_eq!(editor.document().strokes().len(), 1);
    assert_eq!(editor.history().len(), 2);
}

#[test]
fn dragging_out_of_the_canvas_ends_the_drag() {
    let mut editor = editor();
    editor
        .add_element(factory::create_rectangle(1, 10.0, 10.0, 50.0, 50.0, "#000"))
        .unwrap();

    press(&mut editor, 20.0, 20.0);
    move_to(&mut editor, 60.0, 40.0);
    editor.handle_input(&InputEvent::PointerMove {
        location: InputLocation {
            position: Pos2::new(450.0, 40.0),
            is_in_canvas: false,
        },
        held_buttons: vec![PointerButton::Primary],
    });

    assert!(editor.state().is_idle());
    assert_eq!(editor.document().elements()[0].position(), Pos2::new(50.0, 30.0));
    assert_eq!(editor.history().len(), 3);
}

#[test]
fn switching_tools_drops_the_stroke_in_progress() {
    let mut editor = editor();
    editor.set_tool(ToolKind::Pencil);
    press(&mut editor, 10.0, 10.0);
    move_to(&mut editor, 20.0, 20.0);

    editor.set_tool(ToolKind::Select);
    assert!(editor.state().is_idle());
    release(&mut editor, 20.0, 20.0);
    assert!(editor.document().strokes().is_empty());
    assert_eq!(editor.history().len(), 1);
}

#[test]
fn reorder_keeps_the_moved_element_selected() {
    let mut editor = editor();
    for id in 1..=3 {
        editor
            .add_element(factory::create_rectangle(id, 0.0, 0.0, 40.0, 40.0, "#000"))
            .unwrap();
    }
    editor.select(0);
    assert!(editor.reorder(eframe_design::command::ReorderDirection::Up));
    assert_eq!(editor.selection().index(), Some(1));
    assert_eq!(editor.selected_element().unwrap().id, 1);

    editor.select(2);
    let entries = editor.history().len();
    assert!(!editor.reorder(eframe_design::command::ReorderDirection::Up));
    assert_eq!(editor.history().len(), entries);
}
