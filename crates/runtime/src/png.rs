//! PNG output for rendered frames.
//!
//! Feature-gated behind `png` (default on) so embedders that only need the
//! loop and an in-memory frame do not pull in the `image` crate.

use std::path::Path;

use flowfield_core::error::EngineError;

use crate::raster::Frame;

/// Writes a frame as an 8-bit RGBA PNG.
///
/// Returns `EngineError::InvalidDimensions` if the frame size does not fit
/// `u32`, or `EngineError::Io` on write failure.
pub fn write_png(frame: &Frame, path: &Path) -> Result<(), EngineError> {
    let invalid = || EngineError::InvalidDimensions {
        width: frame.width(),
        height: frame.height(),
    };
    let w = u32::try_from(frame.width()).map_err(|_| invalid())?;
    let h = u32::try_from(frame.height()).map_err(|_| invalid())?;
    let img = image::RgbaImage::from_raw(w, h, frame.to_rgba8())
        .ok_or_else(|| EngineError::Io("RGBA buffer size mismatch".into()))?;
    img.save(path)
        .map_err(|e| EngineError::Io(format!("{}: {e}", path.display())))?;
    log::debug!("wrote {}x{} frame to {}", w, h, path.display());
    Ok(())
}
