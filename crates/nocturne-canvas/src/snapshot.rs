//! PNG snapshots of a raster canvas.

use std::path::Path;

use image::RgbaImage;
use nocturne_core::{NocturneError, Result};

use crate::PixelCanvas;

/// Encode the canvas contents to a PNG file at `path`.
pub fn save_png(canvas: &PixelCanvas, path: &Path) -> Result<()> {
    let (w, h) = (canvas.width(), canvas.height());
    let image = RgbaImage::from_raw(w, h, canvas.as_bytes().to_vec())
        .ok_or_else(|| NocturneError::EncodeError(format!("buffer mismatch for {w}x{h} image")))?;
    image
        .save(path)
        .map_err(|e| NocturneError::EncodeError(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use nocturne_core::Rgba;

    #[test]
    fn writes_a_decodable_png() {
        let mut canvas = PixelCanvas::new(16, 8, Rgba::from_hex(0x101020));
        use crate::Canvas2d;
        canvas.fill_circle(8.0, 4.0, 3.0, Rgba::WHITE);

        let dir = std::env::temp_dir();
        let path = dir.join("nocturne_snapshot_test.png");
        save_png(&canvas, &path).unwrap();

        let decoded = image::open(&path).unwrap().to_rgba8();
        assert_eq!(decoded.dimensions(), (16, 8));
        assert_eq!(decoded.get_pixel(8, 4).0, [255, 255, 255, 255]);
        let _ = std::fs::remove_file(&path);
    }
}
