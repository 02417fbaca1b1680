//! CPU surface for rendering - f32 RGBA storage

/// An RGBA CPU surface
/// Stores pixels as [f32; 4] in 0..1
pub struct CpuSurface {
    /// Surface dimensions
    pub width: u32,
    pub height: u32,
    /// Pixel data in row-major order, each pixel is [r, g, b, a] as f32
    pixels: Vec<[f32; 4]>,
}

impl CpuSurface {
    /// Create a new surface with the given dimensions, initialized to transparent black
    pub fn new(width: u32, height: u32) -> Self {
        let pixel_count = (width as usize) * (height as usize);
        Self {
            width,
            height,
            pixels: vec![[0.0, 0.0, 0.0, 0.0]; pixel_count],
        }
    }

    /// Clear the surface to a solid color
    pub fn clear(&mut self, color: [f32; 4]) {
        self.pixels.fill(color);
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

    /// Blend a color onto an existing pixel using alpha compositing
    /// Formula: out = src * alpha + dst * (1 - alpha)
    #[inline]
    pub fn blend_pixel(&mut self, x: u32, y: u32, color: [f32; 4], opacity: f32) {
        if x >= self.width || y >= self.height {
            return;
        }
        let index = (y as usize) * (self.width as usize) + (x as usize);
        self.pixels[index] = blend(self.pixels[index], color, opacity);
    }

    /// Composite a color over every pixel
    pub fn blend_all(&mut self, color: [f32; 4]) {
        for pixel in &mut self.pixels {
            *pixel = blend(*pixel, color, 1.0);
        }
    }

    /// Get raw pixel data for presentation
    /// Returns the pixel data as a byte slice suitable for texture upload
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.pixels)
    }
}

#[inline]
fn blend(dst: [f32; 4], color: [f32; 4], opacity: f32) -> [f32; 4] {
    // Source alpha is the color's alpha multiplied by opacity
    let src_alpha = color[3] * opacity;
    let inv_src_alpha = 1.0 - src_alpha;

    [
        color[0] * src_alpha + dst[0] * inv_src_alpha,
        color[1] * src_alpha + dst[1] * inv_src_alpha,
        color[2] * src_alpha + dst[2] * inv_src_alpha,
        src_alpha + dst[3] * inv_src_alpha,
    ]
}
