//! CPU reference surface - Rgba16Float compatible storage
//!
//! Hosts normally draw fill paths with their own canvas; this surface is the
//! in-process fallback used for previews and tests.

use tracing::trace;

use crate::render::{DrawSurface, FillPath};

/// A CPU surface that rasterizes fill paths
/// Stores pixels as [f32; 4] (Rgba16Float compatible)
pub struct CpuSurface {
    /// Surface dimensions
    pub width: u32,
    pub height: u32,
    /// Color the surface is reset to by `clear`
    background: [f32; 4],
    /// Pixel data in row-major order, each pixel is [r, g, b, a] as f32
    pixels: Vec<[f32; 4]>,
}

impl CpuSurface {
    /// Create a new surface with the given dimensions, initialized to transparent black
    pub fn new(width: u32, height: u32) -> Self {
        Self::with_background(width, height, [0.0, 0.0, 0.0, 0.0])
    }

    pub fn with_background(width: u32, height: u32, background: [f32; 4]) -> Self {
        let pixel_count = (width as usize) * (height as usize);
        Self {
            width,
            height,
            background,
            pixels: vec![background; pixel_count],
        }
    }

    /// Get a pixel at the given coordinates
    /// Returns None if coordinates are out of bounds
    #[inline]
    pub fn get_pixel(&self, x: u32, y: u32) -> Option<[f32; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let index = (y as usize) * (self.width as usize) + (x as usize);
        Some(self.pixels[index])
    }

    /// Number of pixels differing from the background
    pub fn painted_pixel_count(&self) -> usize {
        self.pixels.iter().filter(|p| **p != self.background).count()
    }

    /// Fill a disc; pixels whose centers lie inside the radius are covered
    ///
    /// Returns bounding box of affected region (x, y, width, height), or
    /// None if the disc is completely outside the surface.
    pub fn fill_disc(
        &mut self,
        center_x: f32,
        center_y: f32,
        radius: f32,
        color: [f32; 4],
    ) -> Option<(u32, u32, u32, u32)> {
        if !(radius > 0.0 && center_x.is_finite() && center_y.is_finite()) {
            return None;
        }

        let x_min = ((center_x - radius).floor().max(0.0) as u32).min(self.width);
        let y_min = ((center_y - radius).floor().max(0.0) as u32).min(self.height);
        let x_max = ((center_x + radius).ceil().max(0.0) as u32).min(self.width);
        let y_max = ((center_y + radius).ceil().max(0.0) as u32).min(self.height);

        if x_min >= x_max || y_min >= y_max {
            return None;
        }

        let radius_sq = radius * radius;
        for py in y_min..y_max {
            for px in x_min..x_max {
                let dx = px as f32 + 0.5 - center_x;
                let dy = py as f32 + 0.5 - center_y;
                if dx * dx + dy * dy <= radius_sq {
                    let index = (py as usize) * (self.width as usize) + (px as usize);
                    self.pixels[index] = color;
                }
            }
        }

        Some((x_min, y_min, x_max - x_min, y_max - y_min))
    }

    /// Get raw pixel data for GPU upload
    /// Returns the pixel data as a byte slice suitable for wgpu texture upload
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.pixels)
    }

    /// Get direct access to pixel data
    #[inline]
    pub fn pixels(&self) -> &[[f32; 4]] {
        &self.pixels
    }
}

impl DrawSurface for CpuSurface {
    fn fill(&mut self, path: &FillPath) {
        let color = path.color.to_rgba_f32();
        for disc in &path.discs {
            if self.fill_disc(disc.x, disc.y, disc.radius, color).is_none() {
                trace!("CpuSurface: disc at ({:.1}, {:.1}) outside surface", disc.x, disc.y);
            }
        }
    }

    fn clear(&mut self) {
        self.pixels.fill(self.background);
    }
}
