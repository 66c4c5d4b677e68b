//! The stamp pipeline: decode, resolve, composite, encode, name.
//!
//! ```text
//!   photo ──decode──┐
//!                   ├──▶ composite ──▶ encode + name ──▶ OutputArtifact
//!   variant ─resolve┘
//! ```
//!
//! Decode and resolve share no data and are joined on the calling task with
//! `tokio::try_join!`; whichever fails first aborts the run. Everything after
//! the join is sequential. Each run owns its surfaces and drops them once
//! the artifact exists, so concurrent runs share nothing.
//!
//! There is no timeout and no cancellation: a decode that never completes
//! stalls its run.

use crate::assets::{self, AssetError, AssetSource, WatermarkVariant};
use crate::imaging::{
    BackendError, CompositeError, Dimensions, ImageBackend, RasterSurface, composite_watermark,
    encode_output,
};
use crate::naming::output_filename;
use crate::upload::{RawUpload, StampRequest};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Message shown to the user for any failed run.
pub const FAILURE_NOTICE: &str = "There was an error processing your image. Please try again.";

/// The user's photo could not be used. Read and decode failures look the
/// same to the user.
#[derive(Error, Debug)]
pub enum InputError {
    #[error("could not read photo: {0}")]
    Read(#[source] std::io::Error),
    #[error("could not decode photo: {0}")]
    Decode(#[source] BackendError),
    #[error("photo is {}x{}", .0.width, .0.height)]
    Degenerate(Dimensions),
}

#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("Input error: {0}")]
    Input(#[from] InputError),
    #[error("Asset load error: {0}")]
    AssetLoad(#[from] AssetError),
    #[error("Encode error: {0}")]
    Encode(#[source] BackendError),
}

/// Error category, for callers that only branch on the kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Input,
    AssetLoad,
    Encode,
}

impl PipelineError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Input(_) => ErrorKind::Input,
            Self::AssetLoad(_) => ErrorKind::AssetLoad,
            Self::Encode(_) => ErrorKind::Encode,
        }
    }

    /// The single notification shown for a failed run, whatever the cause.
    pub fn user_message(&self) -> &'static str {
        FAILURE_NOTICE
    }
}

/// Encoded result of a successful run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputArtifact {
    pub filename: String,
    pub bytes: Vec<u8>,
    pub width: u32,
    pub height: u32,
    pub variant: WatermarkVariant,
}

impl OutputArtifact {
    /// Hand the artifact over by writing it into `dir` under its filename.
    pub async fn write_to(self, dir: &Path) -> std::io::Result<PathBuf> {
        tokio::fs::create_dir_all(dir).await?;
        let path = dir.join(&self.filename);
        tokio::fs::write(&path, &self.bytes).await?;
        Ok(path)
    }
}

async fn decode_photo(
    photo: RawUpload,
    backend: &impl ImageBackend,
) -> Result<RasterSurface, PipelineError> {
    tracing::debug!(media_type = %photo.media_type, "Decoding photo");
    let bytes = photo.read().await.map_err(InputError::Read)?;
    let surface = backend.decode(&bytes).map_err(InputError::Decode)?;
    tracing::debug!(
        width = surface.width(),
        height = surface.height(),
        "Photo decoded"
    );
    Ok(surface)
}

async fn resolve_mark(
    variant: WatermarkVariant,
    source: &impl AssetSource,
    backend: &impl ImageBackend,
) -> Result<RasterSurface, PipelineError> {
    Ok(assets::resolve(variant, source, backend).await?)
}

async fn stamp(
    request: StampRequest,
    backend: &impl ImageBackend,
    source: &impl AssetSource,
) -> Result<OutputArtifact, PipelineError> {
    let StampRequest {
        metadata,
        photo,
        variant,
    } = request;

    let (main, mark) = tokio::try_join!(
        decode_photo(photo, backend),
        resolve_mark(variant, source, backend),
    )?;

    let composited = composite_watermark(backend, &main, &mark).map_err(|e| match e {
        CompositeError::DegenerateMain(dims) => PipelineError::from(InputError::Degenerate(dims)),
        CompositeError::DegenerateMark(dimensions) => PipelineError::from(AssetError::Degenerate {
            location: variant.asset_location().to_string(),
            dimensions,
        }),
    })?;
    drop(main);
    drop(mark);

    let bytes = encode_output(backend, &composited).map_err(PipelineError::Encode)?;

    Ok(OutputArtifact {
        filename: output_filename(&metadata),
        bytes,
        width: composited.width(),
        height: composited.height(),
        variant,
    })
}

/// Run one submission end to end.
///
/// Any stage failure aborts the remaining stages; no partial artifact is
/// ever returned. Nothing is retried.
pub async fn run(
    request: StampRequest,
    backend: &impl ImageBackend,
    source: &impl AssetSource,
) -> Result<OutputArtifact, PipelineError> {
    let variant = request.variant;
    match stamp(request, backend, source).await {
        Ok(artifact) => {
            tracing::info!(
                filename = %artifact.filename,
                %variant,
                bytes = artifact.bytes.len(),
                "Photo stamped"
            );
            Ok(artifact)
        }
        Err(e) => {
            tracing::error!(kind = ?e.kind(), error = %e, "Stamp pipeline failed");
            Err(e)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assets::tests::MemoryAssets;
    use crate::imaging::backend::tests::MockBackend;
    use crate::test_helpers::{png_bytes, sample_request};
    use tempfile::TempDir;

    #[tokio::test]
    async fn stamps_and_names_the_photo() {
        let backend = MockBackend::new();
        let request = sample_request(
            png_bytes(&RasterSurface::filled(400, 300, [200, 200, 200, 255])),
            "black",
        );

        let artifact = run(request, &backend, &MemoryAssets::standard())
            .await
            .unwrap();

        assert_eq!(artifact.filename, "ana_lpez_ana@x.com.jpg");
        assert_eq!((artifact.width, artifact.height), (400, 300));
        assert_eq!(artifact.variant, WatermarkVariant::Black);
        assert_eq!(&artifact.bytes[..2], &[0xFF, 0xD8]);
        assert_eq!(backend.decode_calls(), 2);
        assert_eq!(backend.composite_calls(), 1);
        assert_eq!(backend.encode_calls(), 1);
    }

    #[tokio::test]
    async fn undecodable_photo_stops_before_compositing() {
        let backend = MockBackend::new();
        let request = sample_request(b"not an image at all".to_vec(), "blue");

        let err = run(request, &backend, &MemoryAssets::standard())
            .await
            .unwrap_err();

        assert_eq!(err.kind(), ErrorKind::Input);
        assert!(matches!(err, PipelineError::Input(InputError::Decode(_))));
        assert_eq!(backend.composite_calls(), 0);
        assert_eq!(backend.encode_calls(), 0);
    }

    #[tokio::test]
    async fn empty_photo_is_input_error() {
        let backend = MockBackend::new();
        let err = run(
            sample_request(Vec::new(), "blue"),
            &backend,
            &MemoryAssets::standard(),
        )
        .await
        .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Input);
    }

    #[tokio::test]
    async fn unreadable_photo_file_is_input_error() {
        let tmp = TempDir::new().unwrap();
        let backend = MockBackend::new();
        let mut request = sample_request(Vec::new(), "blue");
        request.photo = RawUpload::from_path(tmp.path().join("missing.jpg"));

        let err = run(request, &backend, &MemoryAssets::standard())
            .await
            .unwrap_err();
        assert!(matches!(err, PipelineError::Input(InputError::Read(_))));
        assert_eq!(backend.composite_calls(), 0);
    }

    #[tokio::test]
    async fn unknown_variant_uses_blue_asset() {
        // Only the blue asset exists; any other lookup would fail.
        let blue = png_bytes(&RasterSurface::filled(20, 10, [0, 0, 255, 255]));
        let assets = MemoryAssets::default().with("watermark-blue.png", blue);
        let backend = MockBackend::new();
        let request = sample_request(
            png_bytes(&RasterSurface::filled(100, 100, [255, 255, 255, 255])),
            "magenta",
        );

        let artifact = run(request, &backend, &assets).await.unwrap();
        assert_eq!(artifact.variant, WatermarkVariant::Blue);
    }

    #[tokio::test]
    async fn zero_width_asset_is_asset_load_error() {
        let assets = MemoryAssets::default().with("watermark-white.png", b"flat".to_vec());
        let backend = MockBackend::with_decode_override(
            b"flat".to_vec(),
            RasterSurface::filled(0, 25, [255, 255, 255, 255]),
        );
        let request = sample_request(
            png_bytes(&RasterSurface::filled(50, 50, [0, 0, 0, 255])),
            "white",
        );

        let err = run(request, &backend, &assets).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::AssetLoad);
        assert_eq!(backend.composite_calls(), 0);
        assert_eq!(backend.encode_calls(), 0);
    }

    #[tokio::test]
    async fn missing_asset_is_asset_load_error() {
        let backend = MockBackend::new();
        let request = sample_request(
            png_bytes(&RasterSurface::filled(50, 50, [0, 0, 0, 255])),
            "blue",
        );

        let err = run(request, &backend, &MemoryAssets::default())
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::AssetLoad);
        assert_eq!(err.user_message(), FAILURE_NOTICE);
    }

    #[tokio::test]
    async fn transparent_photo_areas_export_black() {
        let backend = MockBackend::new();
        let request = sample_request(
            png_bytes(&RasterSurface::filled(200, 200, [255, 255, 255, 0])),
            "blue",
        );

        let artifact = run(request, &backend, &MemoryAssets::standard())
            .await
            .unwrap();
        let decoded = image::load_from_memory(&artifact.bytes).unwrap().to_rgb8();
        let px = decoded.get_pixel(10, 10);
        assert!(px.0.iter().all(|&c| c <= 2), "{px:?}");
    }

    #[tokio::test]
    async fn artifact_is_written_under_its_filename() {
        let tmp = TempDir::new().unwrap();
        let artifact = OutputArtifact {
            filename: "a_b_c@d.e.jpg".into(),
            bytes: vec![0xFF, 0xD8, 0xFF, 0xD9],
            width: 1,
            height: 1,
            variant: WatermarkVariant::Blue,
        };

        let path = artifact.write_to(&tmp.path().join("out")).await.unwrap();
        assert_eq!(path, tmp.path().join("out/a_b_c@d.e.jpg"));
        assert_eq!(std::fs::read(path).unwrap(), vec![0xFF, 0xD8, 0xFF, 0xD9]);
    }
}
