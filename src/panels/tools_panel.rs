use egui::{Button, ComboBox, Slider};

use crate::app::DesignApp;
use crate::command::ReorderDirection;
use crate::components::ToolButton;
use crate::element::{Color, ShapeKind};
use crate::tools::{ToolKind, BRUSH_SIZE_RANGE, ERASER_SIZE_RANGE, FONT_FAMILIES};

pub fn tools_panel(app: &mut DesignApp, ctx: &egui::Context) {
    egui::SidePanel::left("tools_panel")
        .resizable(true)
        .default_width(220.0)
        .show(ctx, |ui| {
            egui::ScrollArea::vertical().show(ui, |ui| {
                title_section(app, ui);
                ui.separator();
                tool_section(app, ui);
                ui.separator();
                shape_section(app, ui);
                ui.separator();
                text_section(app, ui);
                ui.separator();
                drawing_section(app, ui);
                ui.separator();
                selection_section(app, ui);
                ui.separator();
                history_section(app, ui);
                ui.separator();
                file_section(app, ui);
            });
        });
}

fn title_section(app: &mut DesignApp, ui: &mut egui::Ui) {
    ui.heading("Design");
    let mut title = app.editor().document().title().to_owned();
    let response = ui.add(egui::TextEdit::singleline(&mut title).hint_text("Untitled Design"));
    if response.changed() {
        app.editor_mut().set_title(title);
    }
    if response.lost_focus() {
        app.editor_mut().end_edit_session();
    }
}

fn tool_section(app: &mut DesignApp, ui: &mut egui::Ui) {
    ui.heading("Tools");
    let active = app.editor().current_tool();
    ui.horizontal(|ui| {
        for kind in ToolKind::ALL {
            if ToolButton::new(kind, active == kind).show(ui).clicked() {
                log::info!("Tool selected from UI: {}", kind.label());
                app.editor_mut().set_tool(kind);
            }
        }
    });
}

fn shape_section(app: &mut DesignApp, ui: &mut egui::Ui) {
    ui.heading("Shapes");
    let mut shape = app.editor().settings().shape_kind;
    ComboBox::from_id_salt("shape_kind")
        .selected_text(shape.label())
        .show_ui(ui, |ui| {
            for kind in ShapeKind::ALL {
                ui.selectable_value(&mut shape, kind, kind.label());
            }
        });
    app.editor_mut().settings_mut().shape_kind = shape;

    ui.horizontal(|ui| {
        ui.label("Color");
        let mut color = app.editor().settings().shape_color.to_color32();
        if ui.color_edit_button_srgba(&mut color).changed() {
            app.editor_mut().set_shape_color(Color::from_color32(color));
        }
    });

    if ui.button("Add shape").clicked() {
        if let Err(err) = app.editor_mut().add_shape(shape) {
            log::warn!("Cannot add shape: {}", err);
        }
    }
}

fn text_section(app: &mut DesignApp, ui: &mut egui::Ui) {
    ui.heading("Text");
    ui.text_edit_singleline(&mut app.text_input);

    let mut family = app.editor().settings().font_family.clone();
    let before = family.clone();
    ComboBox::from_id_salt("font_family")
        .selected_text(family.as_str())
        .show_ui(ui, |ui| {
            for option in FONT_FAMILIES {
                ui.selectable_value(&mut family, option.to_owned(), option);
            }
        });
    if family != before {
        app.editor_mut().set_font_family(&family);
    }

    ui.horizontal(|ui| {
        ui.label("Text color");
        let mut color = app.editor().settings().text_color.to_color32();
        if ui.color_edit_button_srgba(&mut color).changed() {
            app.editor_mut().set_text_color(Color::from_color32(color));
        }
    });

    let can_add = !app.text_input.trim().is_empty();
    if ui.add_enabled(can_add, Button::new("Add text")).clicked() {
        let text = std::mem::take(&mut app.text_input);
        if let Err(err) = app.editor_mut().add_text(&text) {
            log::warn!("Cannot add text: {}", err);
        }
    }
}

fn drawing_section(app: &mut DesignApp, ui: &mut egui::Ui) {
    ui.heading("Drawing");
    let settings = app.editor_mut().settings_mut();

    ui.horizontal(|ui| {
        ui.label("Pencil color");
        let mut color = settings.pencil_color.to_color32();
        if ui.color_edit_button_srgba(&mut color).changed() {
            settings.pencil_color = Color::from_color32(color);
        }
    });
    ui.add(Slider::new(&mut settings.brush_size, BRUSH_SIZE_RANGE).text("Brush size"));
    ui.add(Slider::new(&mut settings.eraser_size, ERASER_SIZE_RANGE).text("Eraser size"));
}

fn selection_section(app: &mut DesignApp, ui: &mut egui::Ui) {
    ui.heading("Selection");
    let Some(element) = app.editor().selected_element() else {
        ui.label("Nothing selected");
        return;
    };
    ui.label(format!("{} #{}", element.kind_name(), element.id));

    let mut rotation = element.rotation;
    let response = ui.add(Slider::new(&mut rotation, 0.0..=360.0).text("Rotation"));
    if response.changed() {
        app.editor_mut().set_rotation(rotation);
    }
    if response.drag_stopped() || response.lost_focus() {
        app.editor_mut().end_edit_session();
    }

    ui.horizontal(|ui| {
        if ui.button("Bring forward").clicked() {
            app.editor_mut().reorder(ReorderDirection::Up);
        }
        if ui.button("Send backward").clicked() {
            app.editor_mut().reorder(ReorderDirection::Down);
        }
    });
    if ui.button("Delete").clicked() {
        app.editor_mut().delete_selected();
    }
}

fn history_section(app: &mut DesignApp, ui: &mut egui::Ui) {
    let history = app.editor().history();
    let (can_undo, can_redo) = (history.can_undo(), history.can_redo());
    ui.label(format!("Step {} of {}", history.index() + 1, history.len()));

    ui.horizontal(|ui| {
        if ui.add_enabled(can_undo, Button::new("Undo")).clicked() {
            app.editor_mut().undo();
        }
        if ui.add_enabled(can_redo, Button::new("Redo")).clicked() {
            app.editor_mut().redo();
        }
        if ui.button("Clear").clicked() {
            app.editor_mut().clear();
        }
    });
}

fn file_section(app: &mut DesignApp, ui: &mut egui::Ui) {
    ui.heading("File");
    ui.horizontal(|ui| {
        if ui.button("Save").clicked() {
            app.save_design();
        }
        if ui.button("Download").clicked() {
            app.download();
        }
    });
    ui.small("Drop images or saved .json designs onto the window to import them.");

    if let Some(status) = app.status() {
        ui.label(status);
    }

    ui.collapsing("Saved designs", |ui| {
        if ui.button("Refresh").clicked() {
            app.refresh_saved_designs();
        }
        let mut open = None;
        for design in app.saved_designs() {
            let title = if design.title.is_empty() {
                "(untitled)"
            } else {
                design.title.as_str()
            };
            if ui.link(title).clicked() {
                open = Some(design.id);
            }
        }
        if let Some(id) = open {
            app.open_design(id);
        }
    });
}
