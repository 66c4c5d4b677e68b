//! Pure overlay geometry.
//!
//! All functions here are pure and testable without any I/O or images.

use super::params::Opacity;
use super::surface::Dimensions;

/// Watermark width as a fraction of the main image width.
pub const MARK_WIDTH_RATIO: f64 = 0.20;

/// Margin from the bottom-right corner, as a fraction of each axis.
pub const MARGIN_RATIO: f64 = 0.05;

/// Placement of the watermark on the main image, in fractional pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OverlaySpec {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub opacity: Opacity,
}

/// A rectangle of whole pixels; may lie partly outside a surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PixelRect {
    pub x: i64,
    pub y: i64,
    pub width: u32,
    pub height: u32,
}

impl PixelRect {
    pub fn contains(&self, x: i64, y: i64) -> bool {
        x >= self.x
            && y >= self.y
            && x < self.x + i64::from(self.width)
            && y < self.y + i64::from(self.height)
    }
}

/// Calculate where the watermark goes on the main image.
///
/// The watermark is 20% of the main width, keeps its own aspect ratio, and
/// sits in the bottom-right corner with a margin of 5% of the width on the
/// x axis and 5% of the height on the y axis.
///
/// Returns `None` when the watermark has a zero-length side, since its
/// aspect ratio is then undefined.
///
/// # Examples
/// ```
/// # use photomark::imaging::{calculate_overlay, Dimensions};
/// let main = Dimensions { width: 1000, height: 800 };
/// let mark = Dimensions { width: 200, height: 100 };
/// let spec = calculate_overlay(main, mark).unwrap();
/// assert_eq!((spec.x, spec.y, spec.width, spec.height), (750.0, 660.0, 200.0, 100.0));
/// ```
pub fn calculate_overlay(main: Dimensions, mark: Dimensions) -> Option<OverlaySpec> {
    if mark.is_degenerate() {
        return None;
    }

    let main_w = f64::from(main.width);
    let main_h = f64::from(main.height);

    let width = main_w * MARK_WIDTH_RATIO;
    let height = width * (f64::from(mark.height) / f64::from(mark.width));
    let x = main_w - width - main_w * MARGIN_RATIO;
    let y = main_h - height - main_h * MARGIN_RATIO;

    Some(OverlaySpec {
        x,
        y,
        width,
        height,
        opacity: Opacity::default(),
    })
}

/// Where the scaled watermark is drawn: the overlay snapped to whole pixels.
///
/// Position and size are rounded independently, so each side is within half
/// a pixel of the fractional overlay and the aspect ratio survives. The rect
/// may extend past the target surface (a very tall watermark on a short,
/// wide photo yields a negative `y`); see [`visible_slice`].
pub fn placement_rect(spec: &OverlaySpec) -> PixelRect {
    PixelRect {
        x: spec.x.round() as i64,
        y: spec.y.round() as i64,
        width: spec.width.round().max(1.0) as u32,
        height: spec.height.round().max(1.0) as u32,
    }
}

/// Extra source pixels kept around a clipped slice so the Lanczos3 kernel
/// still sees its neighbours.
const RESAMPLE_PAD: i64 = 3;

/// The part of a watermark that has to be resampled to cover the visible
/// part of a [`placement_rect`].
///
/// `source` is a region of the unscaled watermark; `target` is where that
/// region lands once scaled, in surface coordinates. `target` can still
/// overhang the surface by a few pixels and is clipped when drawing. When
/// the rect lies fully on the surface, `source` is the whole watermark and
/// `target` equals the rect.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DrawSlice {
    pub source: PixelRect,
    pub target: PixelRect,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct AxisSlice {
    src_start: i64,
    src_len: u32,
    dst_start: i64,
    dst_len: u32,
}

fn slice_axis(rect_start: i64, rect_len: u32, mark_len: u32, surface_len: u32) -> Option<AxisSlice> {
    let visible_start = rect_start.max(0);
    let visible_end = (rect_start + i64::from(rect_len)).min(i64::from(surface_len));
    if visible_start >= visible_end {
        return None;
    }

    // Destination pixels per source pixel; identical on both axes up to rounding.
    let scale = f64::from(rect_len) / f64::from(mark_len);
    let s0 = (((visible_start - rect_start) as f64 / scale).floor() as i64 - RESAMPLE_PAD).max(0);
    let s1 = (((visible_end - rect_start) as f64 / scale).ceil() as i64 + RESAMPLE_PAD)
        .min(i64::from(mark_len));
    let d0 = (s0 as f64 * scale).round() as i64;
    let d1 = (s1 as f64 * scale).round() as i64;

    Some(AxisSlice {
        src_start: s0,
        src_len: (s1 - s0) as u32,
        dst_start: rect_start + d0,
        dst_len: (d1 - d0).max(1) as u32,
    })
}

/// Restrict drawing `mark` into `rect` to what can appear on `surface`.
///
/// Returns `None` when nothing of the rect is visible. The resampled slice
/// is bounded by the surface plus a few source pixels, however far the rect
/// itself overhangs.
pub fn visible_slice(rect: PixelRect, mark: Dimensions, surface: Dimensions) -> Option<DrawSlice> {
    if mark.is_degenerate() || surface.is_degenerate() {
        return None;
    }
    let x = slice_axis(rect.x, rect.width, mark.width, surface.width)?;
    let y = slice_axis(rect.y, rect.height, mark.height, surface.height)?;

    Some(DrawSlice {
        source: PixelRect {
            x: x.src_start,
            y: y.src_start,
            width: x.src_len,
            height: y.src_len,
        },
        target: PixelRect {
            x: x.dst_start,
            y: y.dst_start,
            width: x.dst_len,
            height: y.dst_len,
        },
    })
}
