use egui::{Color32, CursorIcon, Rect, Sense, Stroke};

use crate::app::DesignApp;
use crate::geometry::handle_at;

/// Smallest on-screen scale the canvas is shrunk to.
const MIN_CANVAS_SCALE: f32 = 0.1;

pub fn central_panel(app: &mut DesignApp, ctx: &egui::Context) {
    egui::CentralPanel::default().show(ctx, |ui| {
        let renderer = app.editor().renderer();
        let size = egui::vec2(renderer.width() as f32, renderer.height() as f32);

        // Fit the canvas into the panel, never enlarging it.
        let available = ui.available_rect_before_wrap();
        let scale = (available.width() / size.x)
            .min(available.height() / size.y)
            .clamp(MIN_CANVAS_SCALE, 1.0);
        let canvas_rect = Rect::from_min_size(available.min, size * scale);
        let response = ui.allocate_rect(canvas_rect, Sense::click_and_drag());

        app.handle_input(ctx, canvas_rect, scale);
        let texture = app.canvas_texture(ctx);

        let painter = ui.painter_at(canvas_rect);
        painter.rect_filled(canvas_rect, 0.0, Color32::WHITE);
        painter.image(
            texture,
            canvas_rect,
            Rect::from_min_max(egui::pos2(0.0, 0.0), egui::pos2(1.0, 1.0)),
            Color32::WHITE,
        );
        ui.painter()
            .rect_stroke(canvas_rect, 0.0, Stroke::new(1.0, Color32::from_gray(160)));

        if let Some(pointer) = response.hover_pos() {
            let local = ((pointer - canvas_rect.min) / scale).to_pos2();
            let editor = app.editor();
            let cursor = if editor.tool().is_drawing_mode() {
                CursorIcon::Crosshair
            } else if let Some(corner) = editor
                .selected_element()
                .and_then(|element| handle_at(element.rect(), local))
            {
                corner.cursor_icon()
            } else if editor.state().is_transforming() {
                CursorIcon::Grabbing
            } else {
                CursorIcon::Default
            };
            ctx.set_cursor_icon(cursor);
        }
    });
}
