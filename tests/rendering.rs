use eframe_design::element::ShapeKind;
use eframe_design::image_cache::DecodeOutcome;
use eframe_design::state::EditorContext;
use eframe_design::tools::ToolKind;
use eframe_design::{EditorConfig, ElementPatch, InputEvent, InputLocation};

fn editor() -> EditorContext {
    EditorContext::new(EditorConfig {
        canvas_width: 300,
        canvas_height: 300,
        ..Default::default()
    })
    .unwrap()
}

fn solid_png(rgba: [u8; 4]) -> Vec<u8> {
    let img = image::RgbaImage::from_pixel(4, 4, image::Rgba(rgba));
    let mut bytes = Vec::new();
    img.write_to(&mut std::io::Cursor::new(&mut bytes), image::ImageFormat::Png)
        .unwrap();
    bytes
}

fn pixel(editor: &EditorContext, x: u32, y: u32) -> (u8, u8, u8, u8) {
    let p = editor.renderer().pixmap().pixel(x, y).unwrap();
    (p.red(), p.green(), p.blue(), p.alpha())
}

#[test]
fn imported_images_appear_once_decoded() {
    let mut editor = editor();
    let id = editor.import_image(&solid_png([0, 200, 0, 255])).unwrap();
    let element = &editor.document().elements()[0];
    assert_eq!((element.x, element.y, element.w, element.h), (50.0, 50.0, 200.0, 200.0));

    editor.refresh();
    assert_eq!(pixel(&editor, 150, 150).3, 0, "not decoded yet, nothing painted");

    let tasks = editor.take_decode_tasks();
    assert_eq!(tasks.len(), 1);
    assert!(editor.take_decode_tasks().is_empty(), "one request per id");
    for task in tasks {
        assert_eq!(futures::executor::block_on(task), DecodeOutcome::Ready(id));
    }

    assert!(editor.refresh());
    let (r, g, b, a) = pixel(&editor, 150, 150);
    assert_eq!(a, 255);
    assert!(g > 150 && r < 20 && b < 20);
}

#[test]
fn bytes_that_are_not_an_image_are_refused() {
    let mut editor = editor();
    assert!(editor.import_image(b"plain text").is_err());
    assert!(editor.document().elements().is_empty());
}

#[test]
fn eraser_cuts_through_shapes() {
    let mut editor = editor();
    // A 120x80 rectangle moved to (20, 20).
    editor.add_shape(ShapeKind::Rectangle).unwrap();
    editor
        .update_element(0, ElementPatch::position(egui::pos2(20.0, 20.0)))
        .unwrap();
    editor.set_tool(ToolKind::Eraser);
    let at = |x: f32, y: f32| InputLocation {
        position: egui::pos2(x, y),
        is_in_canvas: true,
    };
    editor.handle_input(&InputEvent::PointerDown {
        location: at(30.0, 60.0),
        button: egui::PointerButton::Primary,
    });
    editor.handle_input(&InputEvent::PointerMove {
        location: at(130.0, 60.0),
        held_buttons: vec![egui::PointerButton::Primary],
    });
    editor.handle_input(&InputEvent::PointerUp {
        location: at(130.0, 60.0),
        button: egui::PointerButton::Primary,
    });

    editor.refresh();
    assert_eq!(pixel(&editor, 80, 60).3, 0, "erased");
    assert_eq!(pixel(&editor, 80, 30).3, 255, "untouched fill");
}

#[test]
fn export_has_no_selection_decoration() {
    let mut editor = editor();
    editor.add_shape(ShapeKind::Square).unwrap();
    editor
        .update_element(0, ElementPatch::position(egui::pos2(100.0, 100.0)))
        .unwrap();
    editor.select(0);
    editor.refresh();
    // The handle at the top-left corner pokes out of the square.
    assert_ne!(pixel(&editor, 94, 94).3, 0);

    let png = editor.render_png().unwrap();
    let exported = image::load_from_memory(&png).unwrap().to_rgba8();
    assert_eq!(exported.dimensions(), (300, 300));
    assert_eq!(exported.get_pixel(94, 94)[3], 0);
    assert_eq!(exported.get_pixel(150, 150)[3], 255);
}
