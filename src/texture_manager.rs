use egui::{ColorImage, Context, TextureHandle, TextureId, TextureOptions};

/// GPU copy of the design surface.
///
/// The texture is allocated on first use and overwritten in place whenever
/// the surface changed, so the canvas keeps one texture id for its lifetime.
#[derive(Default)]
pub struct CanvasTexture {
    handle: Option<TextureHandle>,
    uploads: u64,
}

impl CanvasTexture {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the texture to draw, uploading `image()` first if `changed`
    /// or if nothing was uploaded yet.
    pub fn sync(
        &mut self,
        ctx: &Context,
        changed: bool,
        image: impl FnOnce() -> ColorImage,
    ) -> TextureId {
        match &mut self.handle {
            Some(handle) if !changed => handle.id(),
            Some(handle) => {
                handle.set(image(), TextureOptions::LINEAR);
                self.uploads += 1;
                handle.id()
            }
            None => {
                let handle = ctx.load_texture("design_canvas", image(), TextureOptions::LINEAR);
                let id = handle.id();
                self.handle = Some(handle);
                self.uploads += 1;
                id
            }
        }
    }

    /// Number of uploads so far.
    pub fn uploads(&self) -> u64 {
        self.uploads
    }
}
