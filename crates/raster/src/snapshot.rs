//! CPU-side PNG output of a [`DisplayList`].
//!
//! This module is feature-gated behind `png` (default on) so that consumers
//! that only need pixels do not pull in the `image` crate. The rasterizer
//! itself lives in [`crate::pixel`] (always available).

use std::path::Path;

use wheels_core::canvas::DisplayList;
use wheels_core::error::SketchError;

use crate::pixel::{rasterize, Pixmap};

/// Writes a pixel buffer as a PNG image.
///
/// Returns `SketchError::Io` on write failure.
pub fn write_png(pixmap: &Pixmap, path: &Path) -> Result<(), SketchError> {
    let img = image::RgbaImage::from_raw(pixmap.width(), pixmap.height(), pixmap.data().to_vec())
        .ok_or_else(|| SketchError::Io("RGBA buffer size mismatch".into()))?;
    img.save(path).map_err(|e| SketchError::Io(e.to_string()))
}

/// Rasterizes `list` and writes it as a PNG image.
pub fn render_png(list: &DisplayList, path: &Path) -> Result<(), SketchError> {
    let pixmap = rasterize(list)?;
    write_png(&pixmap, path)?;
    log::info!(
        "wrote {}x{} snapshot to {}",
        pixmap.width(),
        pixmap.height(),
        path.display()
    );
    Ok(())
}
