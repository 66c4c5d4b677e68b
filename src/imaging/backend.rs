//! Image processing backend trait and shared types.
//!
//! The [`ImageBackend`] trait defines the three pixel operations the
//! pipeline needs: decode, composite, and encode.
//!
//! The production implementation is
//! [`RustBackend`](super::rust_backend::RustBackend), built on the `image`
//! crate. Tests swap in a recording mock to count which stages ran.

use super::calculations::OverlaySpec;
use super::params::Quality;
use super::surface::RasterSurface;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum BackendError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Decode failed: {0}")]
    DecodeFailed(String),
    #[error("Encode failed: {0}")]
    EncodeFailed(String),
    #[error("Degenerate surface: {width}x{height}")]
    Degenerate { width: u32, height: u32 },
}

/// Trait for image processing backends.
pub trait ImageBackend {
    /// Decode an encoded raster payload into an RGBA surface.
    fn decode(&self, payload: &[u8]) -> Result<RasterSurface, BackendError>;

    /// Draw `mark` onto a copy of `main`, scaled and blended per `spec`.
    ///
    /// Pixels outside the overlay are left untouched. Cannot fail for
    /// non-degenerate inputs; callers check degeneracy before calling.
    fn composite(
        &self,
        main: &RasterSurface,
        mark: &RasterSurface,
        spec: &OverlaySpec,
    ) -> RasterSurface;

    /// Serialize a surface to a lossy compressed byte stream.
    fn encode(&self, surface: &RasterSurface, quality: Quality) -> Result<Vec<u8>, BackendError>;
}
