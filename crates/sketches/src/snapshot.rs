//! PNG output of a [`Raster`].
//!
//! Feature-gated behind `png` (default on) so the registry can be used
//! without pulling in the `image` crate.

use std::path::Path;

use sketchbook_core::SketchError;

use crate::raster::Raster;

/// Writes the raster as an RGBA PNG.
///
/// Returns `SketchError::InvalidDimensions` if the raster dimensions
/// overflow `u32`, or `SketchError::Io` on write failure.
pub fn write_png(raster: &Raster, path: &Path) -> Result<(), SketchError> {
    let w = u32::try_from(raster.width()).map_err(|_| SketchError::InvalidDimensions)?;
    let h = u32::try_from(raster.height()).map_err(|_| SketchError::InvalidDimensions)?;
    let img = image::RgbaImage::from_raw(w, h, raster.to_rgba8())
        .ok_or_else(|| SketchError::Io("RGBA buffer size mismatch".into()))?;
    img.save(path).map_err(|e| SketchError::Io(e.to_string()))?;
    log::debug!("wrote {}x{} snapshot to {}", w, h, path.display());
    Ok(())
}
