use std::io::Cursor;

use anyhow::Context;

use crate::foundation::error::{WidgetError, WidgetResult};

pub use kurbo::{Affine, BezPath, Point};

/// Maximum uncompressed footprint (`width * height * 4`) allowed for a decoded thumbnail.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
pub struct SizeBudget(u64);

impl SizeBudget {
    /// Budget used by the home-screen widget.
    pub const DEFAULT: Self = Self(67_392);

    /// Create a validated budget, rejecting zero.
    pub fn new(bytes: u64) -> WidgetResult<Self> {
        if bytes == 0 {
            return Err(WidgetError::validation("size budget must be > 0"));
        }
        Ok(Self(bytes))
    }

    /// Budget in bytes.
    pub fn bytes(self) -> u64 {
        self.0
    }
}

impl Default for SizeBudget {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Side length of the square output canvas, in pixels.
///
/// Limited to `u16::MAX` because raster surfaces are addressed with 16-bit dimensions.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
pub struct CanvasSize(u32);

impl CanvasSize {
    /// Create a validated canvas size in `1..=u16::MAX`.
    pub fn new(side: u32) -> WidgetResult<Self> {
        if side == 0 {
            return Err(WidgetError::validation("canvas size must be > 0"));
        }
        if side > u32::from(u16::MAX) {
            return Err(WidgetError::validation(format!(
                "canvas size {side} exceeds {}",
                u16::MAX
            )));
        }
        Ok(Self(side))
    }

    /// Side length in pixels.
    pub fn get(self) -> u32 {
        self.0
    }

    /// Canvas center, which is also the bounding radius of every mask.
    pub fn half(self) -> f64 {
        f64::from(self.0) / 2.0
    }
}

/// An in-memory raster: straight-alpha RGBA8, tightly packed, row-major.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RasterImage {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// RGBA8 bytes, `width * height * 4` long.
    pub data: Vec<u8>,
}

impl RasterImage {
    /// Wrap raw RGBA8 bytes, checking the buffer length.
    pub fn from_rgba8(width: u32, height: u32, data: Vec<u8>) -> WidgetResult<Self> {
        let expected = (width as usize)
            .checked_mul(height as usize)
            .and_then(|px| px.checked_mul(4))
            .ok_or_else(|| WidgetError::validation("raster dimensions overflow"))?;
        if data.len() != expected {
            return Err(WidgetError::validation(format!(
                "raster byte len {} does not match {width}x{height}",
                data.len()
            )));
        }
        Ok(Self {
            width,
            height,
            data,
        })
    }

    /// Convert any decoded image to RGBA8.
    pub fn from_dynamic(img: image::DynamicImage) -> Self {
        let rgba = img.into_rgba8();
        let (width, height) = rgba.dimensions();
        Self {
            width,
            height,
            data: rgba.into_raw(),
        }
    }

    /// A `width x height` raster filled with one straight-alpha color.
    pub fn solid(width: u32, height: u32, rgba: [u8; 4]) -> Self {
        let n = (width as usize) * (height as usize);
        let mut data = Vec::with_capacity(n * 4);
        for _ in 0..n {
            data.extend_from_slice(&rgba);
        }
        Self {
            width,
            height,
            data,
        }
    }

    /// Uncompressed footprint in bytes (`width * height * 4`).
    pub fn byte_footprint(&self) -> u64 {
        u64::from(self.width) * u64::from(self.height) * 4
    }

    /// Pixel at `(x, y)`, or `None` when out of bounds or `data` is too short.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let i = ((y as usize) * (self.width as usize) + (x as usize)) * 4;
        self.data.get(i..i + 4)?.try_into().ok()
    }

    /// Copy into an `image` buffer.
    pub fn to_rgba_image(&self) -> WidgetResult<image::RgbaImage> {
        image::RgbaImage::from_raw(self.width, self.height, self.data.clone())
            .ok_or_else(|| WidgetError::validation("raster byte len mismatch"))
    }

    /// Encode as PNG bytes.
    pub fn encode_png(&self) -> WidgetResult<Vec<u8>> {
        let mut buf = Vec::new();
        image::DynamicImage::ImageRgba8(self.to_rgba_image()?)
            .write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)
            .context("encode png")?;
        Ok(buf)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
