use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use thiserror::Error;
use tiny_skia::{IntSize, Pixmap};

/// Errors that can occur while turning an image reference into pixels
#[derive(Error, Debug)]
pub enum ImageError {
    #[error("unsupported image source {0:?}")]
    UnsupportedSource(String),
    #[error("malformed data URI")]
    MalformedDataUri,
    #[error("invalid base64 payload: {0}")]
    Base64(#[from] base64::DecodeError),
    #[error("cannot decode image: {0}")]
    Decode(#[from] image::ImageError),
    #[error("cannot read image file: {0}")]
    Io(#[from] std::io::Error),
    #[error("image has invalid dimensions {0}x{1}")]
    Dimensions(u32, u32),
}

/// Encode `bytes` as a base64 data URI, sniffing the MIME type from the content.
pub fn data_uri(bytes: &[u8]) -> String {
    let mime = image::guess_format(bytes)
        .map(|format| format.to_mime_type())
        .unwrap_or("application/octet-stream");
    format!("data:{mime};base64,{}", STANDARD.encode(bytes))
}

/// Like [`data_uri`], but refuses bytes that aren't a known image format.
pub fn import_data_uri(bytes: &[u8]) -> Result<String, ImageError> {
    image::guess_format(bytes)?;
    Ok(data_uri(bytes))
}

/// Fetch the raw bytes behind an element's `src`.
///
/// Data URIs are decoded in place; anything without a URL scheme is read as a
/// local file path. Remote URLs are not fetched.
pub fn load_source_bytes(src: &str) -> Result<Vec<u8>, ImageError> {
    if let Some(rest) = src.strip_prefix("data:") {
        let (meta, payload) = rest.split_once(',').ok_or(ImageError::MalformedDataUri)?;
        return if meta.ends_with(";base64") {
            Ok(STANDARD.decode(payload.trim())?)
        } else {
            Ok(payload.as_bytes().to_vec())
        };
    }
    if src.contains("://") {
        return Err(ImageError::UnsupportedSource(src.to_owned()));
    }
    Ok(std::fs::read(src)?)
}

/// Decode an encoded image (PNG, JPEG, ...) into a premultiplied pixmap.
pub fn decode_raster(bytes: &[u8]) -> Result<Pixmap, ImageError> {
    let rgba = image::load_from_memory(bytes)?.to_rgba8();
    let (width, height) = rgba.dimensions();
    let size = IntSize::from_wh(width, height).ok_or(ImageError::Dimensions(width, height))?;

    let mut data = rgba.into_raw();
    for pixel in data.chunks_exact_mut(4) {
        let alpha = u16::from(pixel[3]);
        for channel in &mut pixel[..3] {
            *channel = ((u16::from(*channel) * alpha + 127) / 255) as u8;
        }
    }

    Pixmap::from_vec(data, size).ok_or(ImageError::Dimensions(width, height))
}

/// [`load_source_bytes`] followed by [`decode_raster`].
pub fn decode_source(src: &str) -> Result<Pixmap, ImageError> {
    decode_raster(&load_source_bytes(src)?)
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    /// A small encoded PNG with a red pixel at the top-left.
    pub(crate) fn tiny_png() -> Vec<u8> {
        let mut img = image::RgbaImage::new(2, 2);
        img.put_pixel(0, 0, image::Rgba([255, 0, 0, 255]));
        img.put_pixel(1, 1, image::Rgba([0, 0, 255, 128]));
        let mut bytes = Vec::new();
        img.write_to(&mut std::io::Cursor::new(&mut bytes), image::ImageFormat::Png)
            .unwrap();
        bytes
    }

    #[test]
    fn data_uri_round_trip() {
        let png = tiny_png();
        let uri = data_uri(&png);
        assert!(uri.starts_with("data:image/png;base64,"));
        assert_eq!(load_source_bytes(&uri).unwrap(), png);
    }

    #[test]
    fn decode_premultiplies() {
        let pixmap = decode_source(&data_uri(&tiny_png())).unwrap();
        assert_eq!((pixmap.width(), pixmap.height()), (2, 2));
        let translucent = pixmap.pixel(1, 1).unwrap();
        assert_eq!(translucent.alpha(), 128);
        assert_eq!(translucent.blue(), 128);
    }

    #[test]
    fn bad_sources_are_errors() {
        assert!(matches!(
            load_source_bytes("https://example.com/cat.png"),
            Err(ImageError::UnsupportedSource(_))
        ));
        assert!(matches!(
            load_source_bytes("data:image/png;base64"),
            Err(ImageError::MalformedDataUri)
        ));
        assert!(matches!(
            decode_raster(b"not an image"),
            Err(ImageError::Decode(_))
        ));
        assert!(import_data_uri(b"not an image").is_err());
        assert!(import_data_uri(&tiny_png()).is_ok());
    }
}
