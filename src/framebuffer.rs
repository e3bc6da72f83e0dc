//! Owns the color and depth buffers for one window. Grounded in the
//! teacher's `screen.rs` (packed-ARGB buffer, `write_bmp` debug dump):
//! arena-allocate once at construction, never reallocate per frame.
//! `rasterizer` partitions these buffers by tile for its parallel writes;
//! see that module for how.
//!
//! The teacher stores pixels as a `Vec<u8>` and reaches for `bytemuck` to
//! reinterpret it as `&mut [u32]` for a fast fill; this module stores
//! `pixels: Vec<u32>` directly (it's what `pack_argb` produces and what
//! `minifb::Window::update_with_buffer` wants), so there is no byte/word
//! boundary left to cross and no remaining use for that cast.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::error::Result;
use crate::math::{pack_argb, ColorRGBA};

pub struct Framebuffer {
    pub width: u32,
    pub height: u32,
    pub pixel_scale: u32,
    pub pixels: Vec<u32>,
    pub depth: Vec<f32>,
}

impl Framebuffer {
    pub fn new(width: u32, height: u32, pixel_scale: u32) -> Framebuffer {
        let size = (width * height) as usize;
        Framebuffer {
            width,
            height,
            pixel_scale,
            pixels: vec![0; size],
            depth: vec![f32::INFINITY; size],
        }
    }

    pub fn window_width(&self) -> u32 {
        self.width * self.pixel_scale
    }

    pub fn window_height(&self) -> u32 {
        self.height * self.pixel_scale
    }

    pub fn clear(&mut self, color: u32) {
        self.pixels.fill(color);
        self.depth.fill(f32::INFINITY);
        log::debug!("framebuffer cleared to 0x{color:08X}");
    }

    /// Bounds-checks, then depth-tests: writes only if `z` is strictly
    /// closer than what's stored. Out-of-range coordinates are silently
    /// dropped — see spec §7, no error is possible here by contract.
    #[inline]
    pub fn set_pixel(&mut self, x: i32, y: i32, z: f32, color: ColorRGBA) {
        if x < 0 || y < 0 || x as u32 >= self.width || y as u32 >= self.height {
            return;
        }
        let i = (y as u32 * self.width + x as u32) as usize;
        if z < self.depth[i] {
            self.depth[i] = z;
            self.pixels[i] = pack_argb(color);
        }
    }

    pub fn write_bmp<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let width = self.width;
        let height = self.height;
        let row_stride = (3 * width + 3) & !3;
        let pixel_array_size = row_stride * height;
        let file_size = 54 + pixel_array_size;
        let mut file = BufWriter::new(File::create(path)?);
        file.write_all(b"BM")?;
        file.write_all(&file_size.to_le_bytes())?;
        file.write_all(&[0u8; 4])?;
        file.write_all(&54u32.to_le_bytes())?;
        file.write_all(&[40u8, 0, 0, 0])?;
        file.write_all(&(width as i32).to_le_bytes())?;
        file.write_all(&(height as i32).to_le_bytes())?;
        file.write_all(&[1, 0])?;
        file.write_all(&[24, 0])?;
        file.write_all(&[0u8; 4])?;
        file.write_all(&pixel_array_size.to_le_bytes())?;
        file.write_all(&[0u8; 4])?;
        file.write_all(&[0u8; 4])?;
        file.write_all(&[0u8; 4])?;
        file.write_all(&[0u8; 4])?;
        let padding = vec![0u8; (row_stride - width * 3) as usize];
        for y in (0..height).rev() {
            for x in 0..width {
                let argb = self.pixels[(y * width + x) as usize];
                let bytes = argb.to_be_bytes(); // [a, r, g, b]
                file.write_all(&[bytes[3], bytes[2], bytes[1]])?;
            }
            file.write_all(&padding)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clear_sets_every_pixel_and_depth() {
        let mut fb = Framebuffer::new(4, 4, 1);
        fb.clear(0xFF11_2233);
        assert!(fb.pixels.iter().all(|&p| p == 0xFF11_2233));
        assert!(fb.depth.iter().all(|&d| d == f32::INFINITY));
    }

    #[test]
    fn out_of_bounds_write_is_dropped() {
        let mut fb = Framebuffer::new(4, 4, 1);
        fb.clear(0);
        fb.set_pixel(-1, 0, 0.0, ColorRGBA::WHITE);
        fb.set_pixel(4, 0, 0.0, ColorRGBA::WHITE);
        fb.set_pixel(0, 4, 0.0, ColorRGBA::WHITE);
        assert!(fb.pixels.iter().all(|&p| p == 0));
    }

    #[test]
    fn depth_test_keeps_closer_write() {
        let mut fb = Framebuffer::new(2, 2, 1);
        fb.clear(0);
        fb.set_pixel(0, 0, 0.5, ColorRGBA::new(1.0, 0.0, 0.0, 1.0));
        fb.set_pixel(0, 0, 0.9, ColorRGBA::new(0.0, 0.0, 1.0, 1.0));
        let i = 0;
        assert_eq!(fb.depth[i], 0.5);
        assert_eq!(fb.pixels[i], pack_argb(ColorRGBA::new(1.0, 0.0, 0.0, 1.0)));
    }

    #[test]
    fn depth_monotonicity_holds_after_writes() {
        let mut fb = Framebuffer::new(1, 1, 1);
        fb.clear(0);
        for z in [0.9, 0.2, 0.5, 0.1] {
            let before = fb.depth[0];
            fb.set_pixel(0, 0, z, ColorRGBA::WHITE);
            assert!(fb.depth[0] <= before);
        }
    }

    #[test]
    fn window_dimensions_scale_with_pixel_scale() {
        let fb = Framebuffer::new(100, 50, 3);
        assert_eq!(fb.window_width(), 300);
        assert_eq!(fb.window_height(), 150);
    }
}
