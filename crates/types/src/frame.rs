//! Fixed-size RGB image shared by the raycaster, the frame pipeline and the display.
//!
//! Pixels are stored row-major so a frame can be handed to image codecs and
//! terminal backends without reshuffling. The raycaster still produces it one
//! vertical strip at a time through [`Frame::fill_column`].

use crate::Rgb;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    width: u16,
    height: u16,
    pixels: Vec<Rgb>,
}

impl Frame {
    /// Create a black frame.
    pub fn new(width: u16, height: u16) -> Self {
        Self::filled(width, height, Rgb::default())
    }

    pub fn filled(width: u16, height: u16, color: Rgb) -> Self {
        let len = (width as usize) * (height as usize);
        Self {
            width,
            height,
            pixels: vec![color; len],
        }
    }

    /// Build a frame from packed `RGBRGB...` bytes.
    ///
    /// Returns `None` if `bytes` does not hold exactly `width * height` pixels.
    pub fn from_rgb_bytes(width: u16, height: u16, bytes: &[u8]) -> Option<Self> {
        let len = (width as usize) * (height as usize);
        if bytes.len() != len * 3 {
            return None;
        }
        let pixels = bytes
            .chunks_exact(3)
            .map(|c| Rgb::new(c[0], c[1], c[2]))
            .collect();
        Some(Self {
            width,
            height,
            pixels,
        })
    }

    pub fn width(&self) -> u16 {
        self.width
    }

    pub fn height(&self) -> u16 {
        self.height
    }

    pub fn dimensions(&self) -> (u16, u16) {
        (self.width, self.height)
    }

    pub fn same_size(&self, other: &Frame) -> bool {
        self.dimensions() == other.dimensions()
    }

    pub fn pixels(&self) -> &[Rgb] {
        &self.pixels
    }

    pub fn pixels_mut(&mut self) -> &mut [Rgb] {
        &mut self.pixels
    }

    #[inline(always)]
    fn idx(&self, x: u16, y: u16) -> Option<usize> {
        if x >= self.width || y >= self.height {
            return None;
        }
        Some((y as usize) * (self.width as usize) + (x as usize))
    }

    pub fn get(&self, x: u16, y: u16) -> Option<Rgb> {
        self.idx(x, y).map(|i| self.pixels[i])
    }

    pub fn set(&mut self, x: u16, y: u16, color: Rgb) {
        if let Some(i) = self.idx(x, y) {
            self.pixels[i] = color;
        }
    }

    pub fn clear(&mut self, color: Rgb) {
        self.pixels.fill(color);
    }

    /// Fill rows `y_start..y_end` of column `x` with `color`.
    ///
    /// Out-of-range rows are clipped.
    pub fn fill_column(&mut self, x: u16, y_start: u16, y_end: u16, color: Rgb) {
        if x >= self.width {
            return;
        }
        let w = self.width as usize;
        let end = y_end.min(self.height);
        for y in y_start..end {
            self.pixels[(y as usize) * w + (x as usize)] = color;
        }
    }

    /// Overwrite this frame with `other`.
    ///
    /// Reuses the existing allocation when the sizes match.
    pub fn copy_from(&mut self, other: &Frame) {
        self.width = other.width;
        self.height = other.height;
        self.pixels.clear();
        self.pixels.extend_from_slice(&other.pixels);
    }

    /// Packed `RGBRGB...` bytes, row-major.
    pub fn to_rgb_bytes(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.pixels.len() * 3);
        for p in &self.pixels {
            out.extend_from_slice(&p.to_array());
        }
        out
    }
}
