//! Packed 8-bit pixel buffer handed to the display or image export.

use crate::color::{linear_to_byte, srgb_to_byte};
use crate::Color;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Bytes per pixel in every supported format.
pub const CHANNEL_COUNT: usize = 4;

/// Errors raised at the film boundary.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FilmError {
    #[error("Unsupported pixel format: {0}")]
    UnsupportedFormat(String),
}

/// Byte order and transfer curve of a [`Film`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PixelFormat {
    Rgba8Unorm,
    Rgba8UnormSrgb,
    Bgra8Unorm,
    Bgra8UnormSrgb,
}

impl PixelFormat {
    /// True when red is stored in the third byte.
    pub fn is_bgra(self) -> bool {
        matches!(self, PixelFormat::Bgra8Unorm | PixelFormat::Bgra8UnormSrgb)
    }

    /// True when color channels are sRGB encoded on packing.
    pub fn is_srgb(self) -> bool {
        matches!(self, PixelFormat::Rgba8UnormSrgb | PixelFormat::Bgra8UnormSrgb)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            PixelFormat::Rgba8Unorm => "rgba8unorm",
            PixelFormat::Rgba8UnormSrgb => "rgba8unorm-srgb",
            PixelFormat::Bgra8Unorm => "bgra8unorm",
            PixelFormat::Bgra8UnormSrgb => "bgra8unorm-srgb",
        }
    }

    fn pack_channel(self, value: f32) -> u8 {
        if self.is_srgb() {
            srgb_to_byte(value)
        } else {
            linear_to_byte(value)
        }
    }

    /// Pack a color into this format's byte order.
    pub fn pack(self, color: Color) -> [u8; CHANNEL_COUNT] {
        let r = self.pack_channel(color.x);
        let g = self.pack_channel(color.y);
        let b = self.pack_channel(color.z);
        // Alpha is never gamma encoded
        let a = linear_to_byte(color.w);
        if self.is_bgra() {
            [b, g, r, a]
        } else {
            [r, g, b, a]
        }
    }
}

impl FromStr for PixelFormat {
    type Err = FilmError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "rgba8unorm" => Ok(PixelFormat::Rgba8Unorm),
            "rgba8unorm-srgb" => Ok(PixelFormat::Rgba8UnormSrgb),
            "bgra8unorm" => Ok(PixelFormat::Bgra8Unorm),
            "bgra8unorm-srgb" => Ok(PixelFormat::Bgra8UnormSrgb),
            _ => Err(FilmError::UnsupportedFormat(s.to_string())),
        }
    }
}

impl fmt::Display for PixelFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Row-major packed pixels, `width * height * 4` bytes.
#[derive(Debug, Clone, PartialEq)]
pub struct Film {
    width: u32,
    height: u32,
    format: PixelFormat,
    data: Vec<u8>,
}

impl Film {
    /// Create a film filled with zero bytes.
    pub fn new(width: u32, height: u32, format: PixelFormat) -> Self {
        Self {
            width,
            height,
            format,
            data: vec![0; width as usize * height as usize * CHANNEL_COUNT],
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn format(&self) -> PixelFormat {
        self.format
    }

    /// Packed bytes in the film's own layout.
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    fn offset(&self, x: u32, y: u32) -> usize {
        debug_assert!(x < self.width && y < self.height, "pixel ({x}, {y}) out of range");
        (y as usize * self.width as usize + x as usize) * CHANNEL_COUNT
    }

    /// Pack one pixel.
    pub fn put_color(&mut self, x: u32, y: u32, color: Color) {
        let offset = self.offset(x, y);
        let packed = self.format.pack(color);
        self.data[offset..offset + CHANNEL_COUNT].copy_from_slice(&packed);
    }

    /// Packed bytes of one pixel in the film's layout.
    pub fn pixel(&self, x: u32, y: u32) -> [u8; CHANNEL_COUNT] {
        let offset = self.offset(x, y);
        let mut pixel = [0; CHANNEL_COUNT];
        pixel.copy_from_slice(&self.data[offset..offset + CHANNEL_COUNT]);
        pixel
    }

    /// Set every pixel to `color`.
    pub fn fill(&mut self, color: Color) {
        let packed = self.format.pack(color);
        for pixel in self.data.chunks_exact_mut(CHANNEL_COUNT) {
            pixel.copy_from_slice(&packed);
        }
    }

    /// Bytes in RGBA order regardless of the film's layout (for image export).
    pub fn to_rgba8(&self) -> Vec<u8> {
        if !self.format.is_bgra() {
            return self.data.clone();
        }

        let mut rgba = Vec::with_capacity(self.data.len());
        for pixel in self.data.chunks_exact(CHANNEL_COUNT) {
            rgba.extend_from_slice(&[pixel[2], pixel[1], pixel[0], pixel[3]]);
        }
        rgba
    }
}
