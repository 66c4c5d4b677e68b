//! Image processing on the `image` crate.
//!
//! | Operation | Crate / function |
//! |---|---|
//! | **Decode** | `image::ImageReader` (content-sniffed) |
//! | **Place** | pure overlay geometry |
//! | **Composite** | `imageops::resize` (Lanczos3) + source-over blend |
//! | **Encode** | `JpegEncoder`, quality 80 |
//!
//! The module is split into:
//! - **Surface**: [`RasterSurface`], the decoded RGBA bitmap
//! - **Calculations**: Pure functions for overlay geometry (unit testable)
//! - **Parameters**: Quality and opacity value types
//! - **Backend**: [`ImageBackend`] trait + [`RustBackend`]
//! - **Operations**: High-level functions combining calculations + backend

pub mod backend;
mod calculations;
pub mod operations;
mod params;
pub mod rust_backend;
mod surface;

pub use backend::{BackendError, ImageBackend};
pub use calculations::{
    DrawSlice, MARGIN_RATIO, MARK_WIDTH_RATIO, OverlaySpec, PixelRect, calculate_overlay,
    placement_rect, visible_slice,
};
pub use operations::{CompositeError, composite_watermark, encode_output};
pub use params::{Opacity, Quality};
pub use rust_backend::RustBackend;
pub use surface::{Dimensions, RasterSurface};
