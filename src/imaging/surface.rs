//! Decoded raster surfaces.
//!
//! A [`RasterSurface`] is the only pixel container that crosses stage
//! boundaries. Its dimensions are fixed when it is built; the compositor
//! writes into a copy sized exactly like the main photo and never resizes
//! a surface in place.

use image::{Rgba, RgbaImage};

/// Width and height of a surface in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Dimensions {
    pub width: u32,
    pub height: u32,
}

impl Dimensions {
    /// True when either axis is zero; nothing can be drawn or scaled from it.
    pub fn is_degenerate(self) -> bool {
        self.width == 0 || self.height == 0
    }
}

/// An 8-bit RGBA bitmap addressable by `(x, y)`.
#[derive(Debug, Clone, PartialEq)]
pub struct RasterSurface {
    pixels: RgbaImage,
}

impl RasterSurface {
    pub fn from_rgba(pixels: RgbaImage) -> Self {
        Self { pixels }
    }

    /// A surface filled with a single color.
    pub fn filled(width: u32, height: u32, color: [u8; 4]) -> Self {
        Self {
            pixels: RgbaImage::from_pixel(width, height, Rgba(color)),
        }
    }

    pub fn width(&self) -> u32 {
        self.pixels.width()
    }

    pub fn height(&self) -> u32 {
        self.pixels.height()
    }

    pub fn dimensions(&self) -> Dimensions {
        Dimensions {
            width: self.width(),
            height: self.height(),
        }
    }

    /// Pixel at `(x, y)`, or `None` outside the surface.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        self.pixels.get_pixel_checked(x, y).map(|p| p.0)
    }

    pub fn as_rgba(&self) -> &RgbaImage {
        &self.pixels
    }

    pub(crate) fn as_rgba_mut(&mut self) -> &mut RgbaImage {
        &mut self.pixels
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn filled_surface_reports_dimensions() {
        let s = RasterSurface::filled(30, 20, [1, 2, 3, 255]);
        assert_eq!(
            s.dimensions(),
            Dimensions {
                width: 30,
                height: 20
            }
        );
        assert_eq!(s.pixel(29, 19), Some([1, 2, 3, 255]));
    }

    #[test]
    fn pixel_outside_bounds_is_none() {
        let s = RasterSurface::filled(4, 4, [0, 0, 0, 255]);
        assert_eq!(s.pixel(4, 0), None);
        assert_eq!(s.pixel(0, 4), None);
    }

    #[test]
    fn zero_axis_is_degenerate() {
        assert!(Dimensions { width: 0, height: 10 }.is_degenerate());
        assert!(Dimensions { width: 10, height: 0 }.is_degenerate());
        assert!(!Dimensions { width: 1, height: 1 }.is_degenerate());
    }
}
