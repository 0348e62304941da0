//! Newsletter logo, shrunk once per batch for inline embedding.

use std::io::Cursor;
use std::path::Path;

use image::imageops::FilterType;
use image::ImageFormat;
use tracing::warn;

/// Width of the embedded logo, in pixels.
pub const LOGO_WIDTH: u32 = 75;

/// Image bytes ready to attach.
#[derive(Debug, Clone)]
pub struct Logo {
    pub data: Vec<u8>,
    pub content_type: &'static str,
}

/// Loads the logo and scales it to `LOGO_WIDTH` keeping the aspect ratio, as PNG.
/// Returns `None` when the file is missing, unreadable or not an image; when only
/// the resize fails, the original bytes are used with their detected type.
pub fn load_logo(path: &Path) -> Option<Logo> {
    if !path.exists() {
        return None;
    }
    let raw = match std::fs::read(path) {
        Ok(raw) => raw,
        Err(e) => {
            warn!("Error processing logo {}: {e}", path.display());
            return None;
        }
    };

    match resize_png(&raw, LOGO_WIDTH) {
        Ok(data) => Some(Logo {
            data,
            content_type: ImageFormat::Png.to_mime_type(),
        }),
        Err(e) => match image::guess_format(&raw) {
            Ok(format) => {
                warn!("Resize failed, using original: {e}");
                Some(Logo {
                    data: raw,
                    content_type: format.to_mime_type(),
                })
            }
            Err(_) => {
                warn!("Logo {} is not an image: {e}", path.display());
                None
            }
        },
    }
}

fn resize_png(raw: &[u8], width: u32) -> Result<Vec<u8>, image::ImageError> {
    let img = image::load_from_memory(raw)?;
    let scale = width as f64 / img.width().max(1) as f64;
    let height = ((img.height() as f64) * scale).max(1.0) as u32;

    let resized = img.resize_exact(width, height, FilterType::Lanczos3);
    let mut out = Cursor::new(Vec::new());
    resized.write_to(&mut out, ImageFormat::Png)?;
    Ok(out.into_inner())
}
