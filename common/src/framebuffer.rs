//! In-memory 128x128 RGB565 frame.
//!
//! Pages draw into a [`Framebuffer`] through `embedded-graphics`; the panel
//! driver then streams [`Framebuffer::as_bytes`] to the display in one window
//! write. Pixels are stored big-endian, the wire order of the ST77xx family,
//! so pushing a frame needs no per-pixel conversion beyond the panel's own
//! colour order.

use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::pixelcolor::raw::RawU16;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::{ContainsPoint, PointsIter, Rectangle};

use crate::config::{SCREEN_HEIGHT, SCREEN_WIDTH};

const WIDTH: usize = SCREEN_WIDTH as usize;
const HEIGHT: usize = SCREEN_HEIGHT as usize;

/// Size of one frame in bytes (two bytes per pixel).
pub const FRAME_BYTES: usize = WIDTH * HEIGHT * 2;

/// A full-screen RGB565 frame implementing [`DrawTarget`].
#[derive(Clone, PartialEq, Eq)]
pub struct Framebuffer {
    data: [u8; FRAME_BYTES],
}

impl Framebuffer {
    /// Create a black frame.
    pub const fn new() -> Self { Self { data: [0; FRAME_BYTES] } }

    /// Raw big-endian RGB565 bytes, row-major from the top-left corner.
    #[inline]
    pub fn as_bytes(&self) -> &[u8] { &self.data }

    /// Copy another frame into this one.
    #[inline]
    pub fn copy_from(
        &mut self,
        other: &Self,
    ) {
        self.data.copy_from_slice(&other.data);
    }

    /// Read back one pixel.
    pub fn pixel(
        &self,
        x: u32,
        y: u32,
    ) -> Option<Rgb565> {
        if x >= SCREEN_WIDTH || y >= SCREEN_HEIGHT {
            return None;
        }
        let idx = (y as usize * WIDTH + x as usize) * 2;
        let raw = u16::from_be_bytes([self.data[idx], self.data[idx + 1]]);
        Some(RawU16::new(raw).into())
    }

    /// Iterate all pixels, row-major. Used to blit the frame onto another target.
    pub fn pixels(&self) -> impl Iterator<Item = Pixel<Rgb565>> + '_ {
        self.data.chunks_exact(2).enumerate().map(|(i, px)| {
            let point = Point::new((i % WIDTH) as i32, (i / WIDTH) as i32);
            let color: Rgb565 = RawU16::new(u16::from_be_bytes([px[0], px[1]])).into();
            Pixel(point, color)
        })
    }

    /// Fill the whole frame with a color.
    pub fn fill(
        &mut self,
        color: Rgb565,
    ) {
        let bytes = Self::encode(color);
        for px in self.data.chunks_exact_mut(2) {
            px.copy_from_slice(&bytes);
        }
    }

    #[inline]
    fn encode(color: Rgb565) -> [u8; 2] {
        let raw: RawU16 = color.into();
        raw.into_inner().to_be_bytes()
    }

    /// Set a pixel, ignoring points outside the frame.
    #[inline]
    fn set_pixel(
        &mut self,
        x: i32,
        y: i32,
        color: Rgb565,
    ) {
        if x >= 0 && x < WIDTH as i32 && y >= 0 && y < HEIGHT as i32 {
            let idx = (y as usize * WIDTH + x as usize) * 2;
            let bytes = Self::encode(color);
            self.data[idx] = bytes[0];
            self.data[idx + 1] = bytes[1];
        }
    }
}

impl Default for Framebuffer {
    fn default() -> Self { Self::new() }
}

impl core::fmt::Debug for Framebuffer {
    fn fmt(
        &self,
        f: &mut core::fmt::Formatter<'_>,
    ) -> core::fmt::Result {
        f.debug_struct("Framebuffer")
            .field("width", &WIDTH)
            .field("height", &HEIGHT)
            .finish_non_exhaustive()
    }
}

impl OriginDimensions for Framebuffer {
    fn size(&self) -> Size { Size::new(SCREEN_WIDTH, SCREEN_HEIGHT) }
}

impl DrawTarget for Framebuffer {
    type Color = Rgb565;
    type Error = core::convert::Infallible;

    fn draw_iter<I>(
        &mut self,
        pixels: I,
    ) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        for Pixel(point, color) in pixels {
            self.set_pixel(point.x, point.y, color);
        }
        Ok(())
    }

    fn fill_contiguous<I>(
        &mut self,
        area: &Rectangle,
        colors: I,
    ) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Self::Color>,
    {
        // Colors are laid out over the full `area`, so walk it whole and clip per pixel
        let clip = area.intersection(&self.bounding_box());
        if clip.size == Size::zero() {
            return Ok(());
        }

        for (point, color) in area.points().zip(colors) {
            if clip.contains(point) {
                self.set_pixel(point.x, point.y, color);
            }
        }
        Ok(())
    }

    fn fill_solid(
        &mut self,
        area: &Rectangle,
        color: Self::Color,
    ) -> Result<(), Self::Error> {
        let drawable_area = area.intersection(&self.bounding_box());
        if drawable_area.size == Size::zero() {
            return Ok(());
        }

        let bytes = Self::encode(color);
        let x_start = drawable_area.top_left.x as usize;
        let width = drawable_area.size.width as usize;

        for y in drawable_area.rows() {
            let row_start = (y as usize * WIDTH + x_start) * 2;
            let row = &mut self.data[row_start..row_start + width * 2];
            for px in row.chunks_exact_mut(2) {
                px.copy_from_slice(&bytes);
            }
        }
        Ok(())
    }

    fn clear(
        &mut self,
        color: Self::Color,
    ) -> Result<(), Self::Error> {
        self.fill(color);
        Ok(())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
