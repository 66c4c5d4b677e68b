//! Watermark variants and the static assets behind them.
//!
//! Each [`WatermarkVariant`] maps to exactly one file under the deployment's
//! asset root:
//!
//! | Variant | Asset |
//! |---|---|
//! | `Blue` (default) | `watermark-blue.png` |
//! | `Black` | `watermark-black.png` |
//! | `White` | `watermark-white.png` |
//!
//! The table is fixed at build time. Selector strings that match no
//! variant resolve to `Blue`: the form only ever offers the three values,
//! so anything else is treated as "no choice made".

use crate::imaging::{BackendError, Dimensions, ImageBackend, RasterSurface};
use std::future::Future;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AssetError {
    #[error("Failed to fetch watermark asset {location}: {source}")]
    Fetch {
        location: String,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to decode watermark asset {location}: {source}")]
    Decode {
        location: String,
        #[source]
        source: BackendError,
    },
    #[error("Watermark asset {location} is {}x{}", .dimensions.width, .dimensions.height)]
    Degenerate {
        location: String,
        dimensions: Dimensions,
    },
}

/// Selected watermark color.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum WatermarkVariant {
    #[default]
    Blue,
    Black,
    White,
}

impl WatermarkVariant {
    pub const ALL: [WatermarkVariant; 3] = [Self::Blue, Self::Black, Self::White];

    /// Parse a selector value from the form. Total: unknown values are `Blue`.
    ///
    /// Accepts the English names and the legacy form values
    /// (`azul`, `negro`, `blanco`), ignoring case and surrounding whitespace.
    pub fn from_selector(selector: &str) -> Self {
        match selector.trim().to_ascii_lowercase().as_str() {
            "blue" | "azul" => Self::Blue,
            "black" | "negro" => Self::Black,
            "white" | "blanco" => Self::White,
            other => {
                tracing::warn!(selector = other, "Unknown watermark variant, using blue");
                Self::default()
            }
        }
    }

    /// Asset identifier, relative to the asset root.
    pub fn asset_location(self) -> &'static str {
        match self {
            Self::Blue => "watermark-blue.png",
            Self::Black => "watermark-black.png",
            Self::White => "watermark-white.png",
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Blue => "blue",
            Self::Black => "black",
            Self::White => "white",
        }
    }
}

impl std::fmt::Display for WatermarkVariant {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Fetches raw asset bytes by location.
pub trait AssetSource {
    fn fetch(&self, location: &str) -> impl Future<Output = std::io::Result<Vec<u8>>>;
}

/// Assets served from a directory on disk.
#[derive(Debug, Clone)]
pub struct FsAssetSource {
    root: PathBuf,
}

impl FsAssetSource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

impl AssetSource for FsAssetSource {
    async fn fetch(&self, location: &str) -> std::io::Result<Vec<u8>> {
        tokio::fs::read(self.root.join(location)).await
    }
}

/// Fetch and decode the watermark for `variant`.
pub async fn resolve(
    variant: WatermarkVariant,
    source: &impl AssetSource,
    backend: &impl ImageBackend,
) -> Result<RasterSurface, AssetError> {
    let location = variant.asset_location();
    tracing::debug!(%variant, location, "Resolving watermark asset");

    let bytes = source
        .fetch(location)
        .await
        .map_err(|source| AssetError::Fetch {
            location: location.to_string(),
            source,
        })?;
    let surface = backend
        .decode(&bytes)
        .map_err(|source| AssetError::Decode {
            location: location.to_string(),
            source,
        })?;

    let dimensions = surface.dimensions();
    if dimensions.is_degenerate() {
        return Err(AssetError::Degenerate {
            location: location.to_string(),
            dimensions,
        });
    }
    tracing::debug!(
        width = dimensions.width,
        height = dimensions.height,
        "Watermark loaded"
    );
    Ok(surface)
}

#[cfg(test)]
pub mod tests {
    use super::*;
    use crate::imaging::backend::tests::MockBackend;
    use crate::test_helpers::png_bytes;
    use std::collections::HashMap;
    use tempfile::TempDir;

    /// In-memory asset store keyed by location.
    #[derive(Default)]
    pub struct MemoryAssets {
        pub files: HashMap<String, Vec<u8>>,
    }

    impl MemoryAssets {
        /// Every variant backed by a distinct solid-color PNG.
        pub fn standard() -> Self {
            let mut files = HashMap::new();
            for (variant, color) in [
                (WatermarkVariant::Blue, [0, 0, 255, 255]),
                (WatermarkVariant::Black, [0, 0, 0, 255]),
                (WatermarkVariant::White, [255, 255, 255, 255]),
            ] {
                files.insert(
                    variant.asset_location().to_string(),
                    png_bytes(&RasterSurface::filled(40, 16, color)),
                );
            }
            Self { files }
        }

        pub fn with(mut self, location: &str, bytes: Vec<u8>) -> Self {
            self.files.insert(location.to_string(), bytes);
            self
        }
    }

    impl AssetSource for MemoryAssets {
        async fn fetch(&self, location: &str) -> std::io::Result<Vec<u8>> {
            self.files.get(location).cloned().ok_or_else(|| {
                std::io::Error::new(std::io::ErrorKind::NotFound, location.to_string())
            })
        }
    }

    #[test]
    fn selector_parses_known_values() {
        assert_eq!(WatermarkVariant::from_selector("blue"), WatermarkVariant::Blue);
        assert_eq!(WatermarkVariant::from_selector("Black"), WatermarkVariant::Black);
        assert_eq!(WatermarkVariant::from_selector(" WHITE "), WatermarkVariant::White);
    }

    #[test]
    fn selector_accepts_legacy_form_values() {
        assert_eq!(WatermarkVariant::from_selector("azul"), WatermarkVariant::Blue);
        assert_eq!(WatermarkVariant::from_selector("negro"), WatermarkVariant::Black);
        assert_eq!(WatermarkVariant::from_selector("blanco"), WatermarkVariant::White);
    }

    #[test]
    fn unknown_selector_falls_back_to_blue() {
        for s in ["", "red", "bleu", "🟦"] {
            assert_eq!(WatermarkVariant::from_selector(s), WatermarkVariant::Blue);
        }
    }

    #[test]
    fn every_variant_has_a_distinct_asset() {
        let mut locations: Vec<_> = WatermarkVariant::ALL
            .iter()
            .map(|v| v.asset_location())
            .collect();
        locations.sort();
        locations.dedup();
        assert_eq!(locations.len(), 3);
    }

    #[tokio::test]
    async fn resolve_decodes_selected_asset() {
        let assets = MemoryAssets::standard();
        let backend = MockBackend::new();

        let mark = resolve(WatermarkVariant::Black, &assets, &backend)
            .await
            .unwrap();
        assert_eq!((mark.width(), mark.height()), (40, 16));
        assert_eq!(mark.pixel(0, 0), Some([0, 0, 0, 255]));
    }

    #[tokio::test]
    async fn resolve_missing_asset_is_fetch_error() {
        let assets = MemoryAssets::default();
        let err = resolve(WatermarkVariant::Blue, &assets, &MockBackend::new())
            .await
            .unwrap_err();
        assert!(matches!(err, AssetError::Fetch { ref location, .. } if location == "watermark-blue.png"));
    }

    #[tokio::test]
    async fn resolve_corrupt_asset_is_decode_error() {
        let assets = MemoryAssets::default().with("watermark-white.png", b"junk".to_vec());
        let err = resolve(WatermarkVariant::White, &assets, &MockBackend::new())
            .await
            .unwrap_err();
        assert!(matches!(err, AssetError::Decode { .. }));
    }

    #[tokio::test]
    async fn resolve_zero_width_asset_is_degenerate() {
        let assets = MemoryAssets::default().with("watermark-blue.png", b"zero".to_vec());
        let backend = MockBackend::with_decode_override(
            b"zero".to_vec(),
            RasterSurface::filled(0, 12, [0, 0, 0, 0]),
        );
        let err = resolve(WatermarkVariant::Blue, &assets, &backend)
            .await
            .unwrap_err();
        assert!(matches!(err, AssetError::Degenerate { dimensions, .. } if dimensions.width == 0));
    }

    #[tokio::test]
    async fn fs_source_reads_from_root() {
        let tmp = TempDir::new().unwrap();
        std::fs::write(tmp.path().join("watermark-blue.png"), [1u8, 2]).unwrap();

        let source = FsAssetSource::new(tmp.path());
        assert_eq!(source.fetch("watermark-blue.png").await.unwrap(), vec![1, 2]);
        assert!(source.fetch("watermark-black.png").await.is_err());
    }
}
