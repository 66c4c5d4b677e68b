//! Pure Rust image backend on the `image` crate.
//!
//! ## Crate mapping
//!
//! | Operation | Crate / function |
//! |---|---|
//! | Decode (JPEG, PNG, TIFF, WebP) | `image::ImageReader` with content sniffing |
//! | Scale watermark | `image::imageops::crop_imm` of the visible slice, then `resize` with `Lanczos3` |
//! | Blend | source-over with a constant opacity, per pixel |
//! | Flatten | alpha composited over opaque black |
//! | Encode → JPEG | `image::codecs::jpeg::JpegEncoder` |

use super::backend::{BackendError, ImageBackend};
use super::calculations::{OverlaySpec, placement_rect, visible_slice};
use super::params::Quality;
use super::surface::RasterSurface;
use image::codecs::jpeg::JpegEncoder;
use image::imageops::FilterType;
use image::{DynamicImage, ImageReader, Rgb, RgbImage, Rgba};
use std::io::Cursor;

/// Pure Rust backend using the `image` crate ecosystem.
///
/// See the [module docs](self) for the crate-to-operation mapping.
pub struct RustBackend;

impl RustBackend {
    pub fn new() -> Self {
        Self
    }
}

impl Default for RustBackend {
    fn default() -> Self {
        Self::new()
    }
}

/// Porter-Duff source-over with the source alpha scaled by `opacity`.
fn blend_over(dst: Rgba<u8>, src: Rgba<u8>, opacity: f32) -> Rgba<u8> {
    let sa = f32::from(src[3]) / 255.0 * opacity;
    if sa <= 0.0 {
        return dst;
    }
    let da = f32::from(dst[3]) / 255.0;
    let out_a = sa + da * (1.0 - sa);

    let channel = |s: u8, d: u8| {
        let v = (f32::from(s) * sa + f32::from(d) * da * (1.0 - sa)) / out_a;
        v.round().clamp(0.0, 255.0) as u8
    };

    Rgba([
        channel(src[0], dst[0]),
        channel(src[1], dst[1]),
        channel(src[2], dst[2]),
        (out_a * 255.0).round().clamp(0.0, 255.0) as u8,
    ])
}

/// JPEG has no alpha channel: composite every pixel over opaque black, the
/// way a canvas exports to JPEG.
fn flatten_over_black(surface: &RasterSurface) -> RgbImage {
    let rgba = surface.as_rgba();
    RgbImage::from_fn(rgba.width(), rgba.height(), |x, y| {
        let Rgba([r, g, b, a]) = *rgba.get_pixel(x, y);
        let scale = |c: u8| ((u16::from(c) * u16::from(a) + 127) / 255) as u8;
        Rgb([scale(r), scale(g), scale(b)])
    })
}

impl ImageBackend for RustBackend {
    fn decode(&self, payload: &[u8]) -> Result<RasterSurface, BackendError> {
        if payload.is_empty() {
            return Err(BackendError::DecodeFailed("payload is empty".into()));
        }
        let reader = ImageReader::new(Cursor::new(payload)).with_guessed_format()?;
        if reader.format().is_none() {
            return Err(BackendError::DecodeFailed(
                "unrecognized image format".into(),
            ));
        }
        let img = reader
            .decode()
            .map_err(|e| BackendError::DecodeFailed(e.to_string()))?;
        Ok(RasterSurface::from_rgba(img.to_rgba8()))
    }

    fn composite(
        &self,
        main: &RasterSurface,
        mark: &RasterSurface,
        spec: &OverlaySpec,
    ) -> RasterSurface {
        let mut out = main.clone();
        let rect = placement_rect(spec);
        let Some(slice) = visible_slice(rect, mark.dimensions(), main.dimensions()) else {
            return out;
        };

        let source = image::imageops::crop_imm(
            mark.as_rgba(),
            slice.source.x as u32,
            slice.source.y as u32,
            slice.source.width,
            slice.source.height,
        )
        .to_image();
        let scaled = image::imageops::resize(
            &source,
            slice.target.width,
            slice.target.height,
            FilterType::Lanczos3,
        );
        let opacity = spec.opacity.value();
        let (w, h) = (i64::from(out.width()), i64::from(out.height()));
        let target = out.as_rgba_mut();

        for (mx, my, src) in scaled.enumerate_pixels() {
            let x = slice.target.x + i64::from(mx);
            let y = slice.target.y + i64::from(my);
            // Overhanging pixels are clipped like a canvas would.
            if !rect.contains(x, y) || x < 0 || y < 0 || x >= w || y >= h {
                continue;
            }
            let dst = target.get_pixel_mut(x as u32, y as u32);
            *dst = blend_over(*dst, *src, opacity);
        }

        out
    }

    fn encode(&self, surface: &RasterSurface, quality: Quality) -> Result<Vec<u8>, BackendError> {
        let dims = surface.dimensions();
        if dims.is_degenerate() {
            return Err(BackendError::Degenerate {
                width: dims.width,
                height: dims.height,
            });
        }

        let rgb = flatten_over_black(surface);
        let mut bytes = Vec::new();
        let encoder = JpegEncoder::new_with_quality(&mut bytes, quality.value());
        DynamicImage::ImageRgb8(rgb)
            .write_with_encoder(encoder)
            .map_err(|e| BackendError::EncodeFailed(format!("JPEG encode failed: {}", e)))?;
        Ok(bytes)
    }
}
