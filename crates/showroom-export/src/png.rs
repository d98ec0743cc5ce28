//! PNG encoding of rendered frames.

use std::io::Cursor;
use std::path::Path;

use image::{ImageFormat, RgbaImage};
use showroom_core::ExportError;
use tracing::debug;

/// Encode raw RGBA8 pixels as PNG.
pub fn encode_png(pixels: &[u8], width: u32, height: u32) -> Result<Vec<u8>, ExportError> {
    let expected = width as usize * height as usize * 4;
    if pixels.len() != expected || expected == 0 {
        return Err(ExportError::BufferSize { width, height, actual: pixels.len() });
    }

    let image = RgbaImage::from_raw(width, height, pixels.to_vec())
        .ok_or(ExportError::BufferSize { width, height, actual: pixels.len() })?;

    let mut output = Cursor::new(Vec::new());
    image
        .write_to(&mut output, ImageFormat::Png)
        .map_err(|e| ExportError::Encode { reason: e.to_string() })?;
    Ok(output.into_inner())
}

/// Encode and write a frame to `path`.
pub fn write_png(path: &Path, pixels: &[u8], width: u32, height: u32) -> Result<(), ExportError> {
    let bytes = encode_png(pixels, width, height)?;
    std::fs::write(path, &bytes)?;
    debug!(path = %path.display(), bytes = bytes.len(), "Wrote frame");
    Ok(())
}
