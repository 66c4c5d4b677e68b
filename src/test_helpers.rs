//! Shared test utilities.
//!
//! Builders for in-memory image payloads and ready-to-run requests, so
//! pipeline tests do not need fixture files on disk.

use std::io::Cursor;

use crate::assets::WatermarkVariant;
use crate::imaging::RasterSurface;
use crate::upload::{RawUpload, StampRequest, UserMetadata};

/// Encode a surface as PNG bytes.
pub fn png_bytes(surface: &RasterSurface) -> Vec<u8> {
    let mut buf = Cursor::new(Vec::new());
    surface
        .as_rgba()
        .write_to(&mut buf, image::ImageFormat::Png)
        .unwrap();
    buf.into_inner()
}

/// Request from Ana López with the given photo bytes and variant selector.
pub fn sample_request(photo: Vec<u8>, selector: &str) -> StampRequest {
    StampRequest {
        metadata: UserMetadata::new("Ana", "López", "ana@x.com"),
        photo: RawUpload::from_bytes(photo, "image/png"),
        variant: WatermarkVariant::from_selector(selector),
    }
}
