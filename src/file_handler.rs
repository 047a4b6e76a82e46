use eframe::egui;

/// What a dropped file turned out to be.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DroppedFile {
    /// An image to place on the canvas
    Image { name: String, bytes: Vec<u8> },
    /// A saved design to open
    Design { name: String, json: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FileKind {
    Image,
    Design,
}

/// Picks up files dropped onto the window.
#[derive(Default)]
pub struct FileHandler {
    processed_files: Vec<String>,
}

impl FileHandler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Read this frame's dropped files. Unsupported or unreadable files are
    /// logged and skipped.
    pub fn take_dropped_files(&mut self, ctx: &egui::Context) -> Vec<DroppedFile> {
        let dropped = ctx.input(|i| i.raw.dropped_files.clone());
        if dropped.is_empty() {
            // Drops arrive in a single frame; the next drop may reuse names.
            self.processed_files.clear();
            return Vec::new();
        }

        let mut files = Vec::new();
        for file in &dropped {
            let file_name = display_name(file);
            if self.processed_files.contains(&file_name) {
                continue;
            }
            self.processed_files.push(file_name.clone());

            let Some(kind) = classify(&file_name, &file.mime) else {
                log::warn!("Dropped file is not a supported type: {}", file_name);
                continue;
            };
            let Some(bytes) = read_bytes(file, &file_name) else {
                continue;
            };

            match kind {
                FileKind::Image => {
                    log::info!("Processing dropped image {} ({} bytes)", file_name, bytes.len());
                    files.push(DroppedFile::Image {
                        name: file_name,
                        bytes,
                    });
                }
                FileKind::Design => match String::from_utf8(bytes) {
                    Ok(json) => files.push(DroppedFile::Design {
                        name: file_name,
                        json,
                    }),
                    Err(err) => log::error!("Design file {} is not UTF-8: {}", file_name, err),
                },
            }
        }
        files
    }

    /// Preview files being dragged over the application
    pub fn preview_files_being_dropped(&self, ctx: &egui::Context) {
        use egui::{Align2, Color32, Id, LayerId, Order, TextStyle};

        if ctx.input(|i| i.raw.hovered_files.is_empty()) {
            return;
        }

        let text = ctx.input(|i| {
            let mut text = "Dropping files:\n".to_owned();
            for file in &i.raw.hovered_files {
                if let Some(path) = &file.path {
                    text += &format!("\n{}", path.display());
                } else if !file.mime.is_empty() {
                    text += &format!("\n{}", file.mime);
                } else {
                    text += "\n(Path not available)";
                }
            }
            text
        });

        let painter = ctx.layer_painter(LayerId::new(Order::Foreground, Id::new("file_drop_target")));
        let screen_rect = ctx.screen_rect();
        painter.rect_filled(screen_rect, 0.0, Color32::from_black_alpha(192));
        painter.text(
            screen_rect.center(),
            Align2::CENTER_CENTER,
            text,
            TextStyle::Heading.resolve(&ctx.style()),
            Color32::WHITE,
        );
    }
}

fn display_name(file: &egui::DroppedFile) -> String {
    if let Some(path) = &file.path {
        path.display().to_string()
    } else if !file.name.is_empty() {
        file.name.clone()
    } else {
        "unknown".to_owned()
    }
}

/// Sort a file by MIME type, falling back to its extension.
fn classify(name: &str, mime: &str) -> Option<FileKind> {
    if mime.starts_with("image/") {
        return Some(FileKind::Image);
    }
    if mime == "application/json" {
        return Some(FileKind::Design);
    }

    let ext = std::path::Path::new(name)
        .extension()?
        .to_string_lossy()
        .to_lowercase();
    match ext.as_str() {
        "png" | "jpg" | "jpeg" | "gif" | "webp" | "bmp" => Some(FileKind::Image),
        "json" => Some(FileKind::Design),
        _ => None,
    }
}

fn read_bytes(file: &egui::DroppedFile, file_name: &str) -> Option<Vec<u8>> {
    if let Some(bytes) = &file.bytes {
        return Some(bytes.to_vec());
    }

    // For native platforms, we can load the file from the path
    #[cfg(not(target_arch = "wasm32"))]
    {
        if let Some(path) = &file.path {
            return match std::fs::read(path) {
                Ok(bytes) => Some(bytes),
                Err(err) => {
                    log::error!("Failed to read dropped file {}: {}", path.display(), err);
                    None
                }
            };
        }
    }

    log::warn!("Dropped file has no accessible data: {}", file_name);
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mime_type_wins_over_extension() {
        assert_eq!(classify("photo", "image/png"), Some(FileKind::Image));
        assert_eq!(classify("design.txt", "application/json"), Some(FileKind::Design));
    }

    #[test]
    fn extension_fallback() {
        assert_eq!(classify("/tmp/Cat.JPG", ""), Some(FileKind::Image));
        assert_eq!(classify("poster.json", ""), Some(FileKind::Design));
        assert_eq!(classify("notes.txt", ""), None);
        assert_eq!(classify("README", ""), None);
    }
}
