//! High-level image operations.
//!
//! These functions combine the geometry in [`calculations`](super::calculations)
//! with backend execution, and own the guards that keep degenerate surfaces
//! away from the pixel code.

use super::backend::{BackendError, ImageBackend};
use super::calculations::calculate_overlay;
use super::params::Quality;
use super::surface::{Dimensions, RasterSurface};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CompositeError {
    #[error("main image is {}x{}, nothing to draw on", .0.width, .0.height)]
    DegenerateMain(Dimensions),
    #[error("watermark is {}x{}, its aspect ratio is undefined", .0.width, .0.height)]
    DegenerateMark(Dimensions),
}

/// Draw the watermark in the bottom-right corner of `main`.
///
/// Returns a new surface the size of `main`; neither input is modified.
pub fn composite_watermark(
    backend: &impl ImageBackend,
    main: &RasterSurface,
    mark: &RasterSurface,
) -> Result<RasterSurface, CompositeError> {
    let main_dims = main.dimensions();
    if main_dims.is_degenerate() {
        return Err(CompositeError::DegenerateMain(main_dims));
    }
    let spec = calculate_overlay(main_dims, mark.dimensions())
        .ok_or(CompositeError::DegenerateMark(mark.dimensions()))?;

    tracing::debug!(
        x = spec.x,
        y = spec.y,
        width = spec.width,
        height = spec.height,
        "Placing watermark"
    );
    Ok(backend.composite(main, mark, &spec))
}

/// Encode the final surface as JPEG at the fixed output quality.
pub fn encode_output(
    backend: &impl ImageBackend,
    surface: &RasterSurface,
) -> Result<Vec<u8>, BackendError> {
    backend.encode(surface, Quality::default())
}
