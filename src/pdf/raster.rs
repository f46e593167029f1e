//! Pixmap to PNG encoding

use std::io::Cursor;

use image::{DynamicImage, RgbImage};

use crate::document::{DocumentError, DocumentResult};

/// Encode a MuPDF pixmap as PNG, dropping any alpha channel
pub(super) fn encode_pixmap_png(pixmap: &mupdf::Pixmap) -> DocumentResult<Vec<u8>> {
    let width = pixmap.width() as u32;
    let height = pixmap.height() as u32;
    let n = pixmap.n() as usize;

    let rgb = samples_to_rgb(pixmap.samples(), width, height, n);
    let img = RgbImage::from_raw(width, height, rgb)
        .ok_or_else(|| DocumentError::ImageError("Failed to create image buffer".to_string()))?;

    let mut output = Vec::new();
    DynamicImage::ImageRgb8(img)
        .write_to(&mut Cursor::new(&mut output), image::ImageFormat::Png)
        .map_err(|e| DocumentError::ImageError(e.to_string()))?;

    Ok(output)
}

/// Repack `n`-component samples into tightly packed RGB
///
/// Grayscale (`n` < 3) is replicated into all three channels.
fn samples_to_rgb(samples: &[u8], width: u32, height: u32, n: usize) -> Vec<u8> {
    let n = n.max(1);
    let pixels = width as usize * height as usize;
    let mut rgb = Vec::with_capacity(pixels * 3);

    for i in 0..pixels {
        let offset = i * n;
        if n >= 3 {
            let r = samples.get(offset).copied().unwrap_or(255);
            let g = samples.get(offset + 1).copied().unwrap_or(255);
            let b = samples.get(offset + 2).copied().unwrap_or(255);
            rgb.extend_from_slice(&[r, g, b]);
        } else {
            let v = samples.get(offset).copied().unwrap_or(255);
            rgb.extend_from_slice(&[v, v, v]);
        }
    }

    rgb
}
