use crate::foundation::error::{PlaceError, PlaceResult};
use crate::foundation::palette::PALETTE;

#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
pub struct FrameIndex(pub u64);

/// Largest side a canvas may have; event coordinates are `u16`.
pub const MAX_CANVAS_SIDE: u32 = 1 << 16;

#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Canvas {
    pub width: u32,
    pub height: u32,
}

impl Canvas {
    pub fn new(width: u32, height: u32) -> PlaceResult<Self> {
        if width == 0 || height == 0 {
            return Err(PlaceError::config("canvas width and height must be > 0"));
        }
        if width > MAX_CANVAS_SIDE || height > MAX_CANVAS_SIDE {
            return Err(PlaceError::config(format!(
                "canvas {width}x{height} exceeds the addressable {MAX_CANVAS_SIDE}x{MAX_CANVAS_SIDE}"
            )));
        }
        if (width as usize).checked_mul(height as usize).is_none() {
            return Err(PlaceError::config(format!(
                "canvas {width}x{height} does not fit in memory on this platform"
            )));
        }
        Ok(Self { width, height })
    }

    /// Number of cells. Canvases built through [`Canvas::new`] never overflow here.
    pub fn pixel_count(self) -> usize {
        (self.width as usize) * (self.height as usize)
    }

    pub fn contains(self, x: u16, y: u16) -> bool {
        u32::from(x) < self.width && u32::from(y) < self.height
    }

    /// Row-major index of `(x, y)`. Callers check bounds first.
    pub fn index_of(self, x: u16, y: u16) -> usize {
        (y as usize) * (self.width as usize) + (x as usize)
    }
}

/// One pixel placement: at `timestamp_ms` the pixel `(x, y)` was set to palette entry `color`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct PixelEvent {
    pub timestamp_ms: i64,
    pub x: u16,
    pub y: u16,
    pub color: u8,
}

impl PixelEvent {
    pub fn new(timestamp_ms: i64, x: u16, y: u16, color: u8) -> Self {
        Self {
            timestamp_ms,
            x,
            y,
            color,
        }
    }

    /// Check coordinate bounds and palette membership against `canvas`.
    pub fn validate(&self, canvas: Canvas) -> PlaceResult<()> {
        if !canvas.contains(self.x, self.y) {
            return Err(PlaceError::data_integrity(format!(
                "event at t={}ms has coordinate ({}, {}) outside {}x{} canvas",
                self.timestamp_ms, self.x, self.y, canvas.width, canvas.height
            )));
        }
        if usize::from(self.color) >= PALETTE.len() {
            return Err(PlaceError::data_integrity(format!(
                "event at t={}ms has color index {} (palette has {} entries)",
                self.timestamp_ms,
                self.color,
                PALETTE.len()
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
