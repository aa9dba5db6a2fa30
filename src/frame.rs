//! Frame pipeline: a 24-bit RGB framebuffer and its RGB565 serialization.
//!
//! Screens draw into a [`Frame`] through the embedded-graphics [`DrawTarget`]
//! trait; the display transport then serializes the whole frame as big-endian
//! RGB565 in one pass. A fresh frame is created every render call, so there is
//! no frame history to invalidate.

use embedded_graphics::pixelcolor::Rgb888;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::Rectangle;

use crate::config::{SCREEN_HEIGHT, SCREEN_WIDTH};

/// Pack a 24-bit RGB pixel into RGB565 by 5/6/5 truncation.
#[inline]
pub const fn pack_rgb565(r: u8, g: u8, b: u8) -> u16 {
    (((r >> 3) as u16) << 11) | (((g >> 2) as u16) << 5) | ((b >> 3) as u16)
}

/// Expand a packed RGB565 pixel back to 24-bit RGB.
///
/// The low bits lost by [`pack_rgb565`] stay zero, so packing the result
/// again yields the same word (quantization is stable under repetition).
#[inline]
pub const fn unpack_rgb565(pixel: u16) -> (u8, u8, u8) {
    let r = ((pixel >> 11) & 0x1F) as u8;
    let g = ((pixel >> 5) & 0x3F) as u8;
    let b = (pixel & 0x1F) as u8;
    (r << 3, g << 2, b << 3)
}

/// A full-screen 24-bit RGB framebuffer.
pub struct Frame {
    buf: Vec<u8>,
}

impl Frame {
    /// Create a black frame.
    pub fn new() -> Self {
        Self {
            buf: vec![0u8; (SCREEN_WIDTH * SCREEN_HEIGHT * 3) as usize],
        }
    }

    /// Set a single pixel. Out-of-bounds coordinates are ignored.
    #[inline]
    pub fn set_pixel(&mut self, x: i32, y: i32, color: Rgb888) {
        if x >= 0 && x < SCREEN_WIDTH as i32 && y >= 0 && y < SCREEN_HEIGHT as i32 {
            let idx = (y as usize * SCREEN_WIDTH as usize + x as usize) * 3;
            self.buf[idx] = color.r();
            self.buf[idx + 1] = color.g();
            self.buf[idx + 2] = color.b();
        }
    }

    /// Serialize the frame as row-major big-endian RGB565, ready to stream to
    /// the panel after a memory-write command.
    pub fn to_rgb565_be(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity((SCREEN_WIDTH * SCREEN_HEIGHT * 2) as usize);
        for px in self.buf.chunks_exact(3) {
            let packed = pack_rgb565(px[0], px[1], px[2]);
            out.extend_from_slice(&packed.to_be_bytes());
        }
        out
    }
}

impl Default for Frame {
    fn default() -> Self {
        Self::new()
    }
}

impl OriginDimensions for Frame {
    fn size(&self) -> Size {
        Size::new(SCREEN_WIDTH, SCREEN_HEIGHT)
    }
}

impl DrawTarget for Frame {
    type Color = Rgb888;
    type Error = core::convert::Infallible;

    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        for Pixel(point, color) in pixels {
            self.set_pixel(point.x, point.y, color);
        }
        Ok(())
    }

    fn fill_solid(&mut self, area: &Rectangle, color: Self::Color) -> Result<(), Self::Error> {
        let area = area.intersection(&self.bounding_box());
        for y in area.rows() {
            for x in area.columns() {
                self.set_pixel(x, y, color);
            }
        }
        Ok(())
    }

    fn clear(&mut self, color: Self::Color) -> Result<(), Self::Error> {
        for px in self.buf.chunks_exact_mut(3) {
            px[0] = color.r();
            px[1] = color.g();
            px[2] = color.b();
        }
        Ok(())
    }
}
