//! Per-pixel storage: the running radiance sums and the displayable image.

use lumen_math::Color;

/// Running sum of sampled radiance, one cell per pixel, row-major.
#[derive(Debug, Clone, Default)]
pub struct AccumulationBuffer {
    width: u32,
    height: u32,
    samples: Vec<Color>,
}

impl AccumulationBuffer {
    /// Create a zeroed buffer.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            samples: vec![Color::ZERO; width as usize * height as usize],
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Number of cells (`width * height`).
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Reallocate for new dimensions. Contents are zeroed.
    pub fn resize(&mut self, width: u32, height: u32) {
        *self = Self::new(width, height);
    }

    /// Zero every cell.
    pub fn clear(&mut self) {
        self.samples.fill(Color::ZERO);
    }

    /// Get the running sum at (x, y).
    pub fn get(&self, x: u32, y: u32) -> Color {
        self.samples[self.index(x, y)]
    }

    /// Add one sample into the cell at (x, y).
    #[inline]
    pub fn add(&mut self, x: u32, y: u32, sample: Color) {
        let index = self.index(x, y);
        self.samples[index] += sample;
    }

    pub fn as_slice(&self) -> &[Color] {
        &self.samples
    }

    pub fn as_mut_slice(&mut self) -> &mut [Color] {
        &mut self.samples
    }

    #[inline]
    fn index(&self, x: u32, y: u32) -> usize {
        y as usize * self.width as usize + x as usize
    }
}

/// Quantized RGBA image derived from the accumulation buffer each frame.
#[derive(Debug, Clone, Default)]
pub struct DisplayImage {
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<[u8; 4]>,
}

impl DisplayImage {
    /// Create a new image filled with opaque black.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pixels: vec![[0, 0, 0, 255]; width as usize * height as usize],
        }
    }

    /// True for a zero-area image.
    pub fn is_empty(&self) -> bool {
        self.pixels.is_empty()
    }

    /// Get the pixel at (x, y).
    pub fn get(&self, x: u32, y: u32) -> [u8; 4] {
        self.pixels[y as usize * self.width as usize + x as usize]
    }

    /// RGBA bytes without copying (for upload or saving).
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.pixels)
    }
}
