//! # Photomark
//!
//! Stamps a brand watermark onto a user's photo and hands back a JPEG named
//! after its owner. Built for event photo booths: an attendee fills in their
//! name and email, uploads a picture, picks a watermark color, and downloads
//! the branded result.
//!
//! # Architecture: Four-Stage Pipeline
//!
//! ```text
//! 1. Decode     RawUpload        →  RasterSurface   (user photo)
//! 2. Resolve    WatermarkVariant →  RasterSurface   (static asset)
//! 3. Composite  main + mark      →  RasterSurface   (bottom-right, 80% opacity)
//! 4. Encode     surface + names  →  OutputArtifact  (JPEG q80, sanitized filename)
//! ```
//!
//! Stages 1 and 2 are independent and run concurrently on one task; 3 waits
//! for both. Any failure aborts the run with a single [`pipeline::PipelineError`].
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`upload`] | Submission inputs: photo payload, user metadata, the request context |
//! | [`assets`] | Watermark variants and the asset each one maps to |
//! | [`imaging`] | Surfaces, overlay geometry, and the `image`-crate backend |
//! | [`naming`] | Output filename derivation |
//! | [`pipeline`] | Async orchestration and the error taxonomy |
//! | [`config`] | `config.toml` loading and validation |
//! | [`output`] | CLI output formatting |
//!
//! # Design Decisions
//!
//! ## Fixed Geometry
//!
//! The watermark is always 20% of the photo's width, keeps its own aspect
//! ratio, and sits 5% in from the right and bottom edges (each margin
//! relative to its own axis). None of this is configurable: every photo out
//! of the booth looks the same.
//!
//! ## Backend Trait
//!
//! Pixel work goes through [`imaging::ImageBackend`]. Production uses
//! [`imaging::RustBackend`]; tests use a recording backend to assert which
//! stages ran after a failure.

pub mod assets;
pub mod config;
pub mod imaging;
pub mod naming;
pub mod output;
pub mod pipeline;
pub mod upload;

#[cfg(test)]
pub(crate) mod test_helpers;
