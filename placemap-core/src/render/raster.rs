use image::{ImageBuffer, Luma, RgbImage};

use crate::foundation::core::FrameIndex;
use crate::foundation::error::{PlaceError, PlaceResult};
use crate::foundation::palette::{BACKGROUND_COLOR, PALETTE};
use crate::sim::driver::FrameSnapshot;

/// 16-bit grayscale heat raster.
pub type HeatImage = ImageBuffer<Luma<u16>, Vec<u16>>;

/// A rendered (color map, heat map) pair for one frame.
#[derive(Clone, Debug)]
pub struct RenderedFrame {
    pub index: FrameIndex,
    pub color: RgbImage,
    pub heat: HeatImage,
}

/// Presentation settings for heat rasters.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct HeatScale {
    /// Heat value mapped to full white. Larger values clamp.
    pub ceiling: f64,
}

impl Default for HeatScale {
    fn default() -> Self {
        Self { ceiling: 1.0 }
    }
}

impl HeatScale {
    pub fn new(ceiling: f64) -> PlaceResult<Self> {
        if !ceiling.is_finite() || ceiling <= 0.0 {
            return Err(PlaceError::config(format!(
                "heat ceiling must be finite and > 0 (got {ceiling})"
            )));
        }
        Ok(Self { ceiling })
    }

    /// Map a heat value onto the full `u16` range, clamping to `[0, ceiling]`.
    pub fn level(&self, value: f32) -> u16 {
        let v = f64::from(value);
        if v.is_nan() || v <= 0.0 {
            return 0;
        }
        let t = (v / self.ceiling).min(1.0);
        (t * f64::from(u16::MAX)).round() as u16
    }
}

pub fn render_color(snapshot: &FrameSnapshot) -> PlaceResult<RgbImage> {
    let c = snapshot.canvas;
    if snapshot.colors.len() != c.pixel_count() {
        return Err(size_mismatch(snapshot, "color"));
    }
    let mut buf = Vec::with_capacity(snapshot.colors.len() * 3);
    for &idx in &snapshot.colors {
        let rgb = PALETTE
            .get(usize::from(idx))
            .unwrap_or(&PALETTE[usize::from(BACKGROUND_COLOR)]);
        buf.extend_from_slice(rgb);
    }
    RgbImage::from_raw(c.width, c.height, buf).ok_or_else(|| size_mismatch(snapshot, "color"))
}

pub fn render_heat(snapshot: &FrameSnapshot, scale: HeatScale) -> PlaceResult<HeatImage> {
    let c = snapshot.canvas;
    if snapshot.heat.len() != c.pixel_count() {
        return Err(size_mismatch(snapshot, "heat"));
    }
    let buf: Vec<u16> = snapshot.heat.iter().map(|&h| scale.level(h)).collect();
    HeatImage::from_raw(c.width, c.height, buf).ok_or_else(|| size_mismatch(snapshot, "heat"))
}

/// Render both maps of one snapshot. Pure: the snapshot is only read.
pub fn render_snapshot(snapshot: &FrameSnapshot, scale: HeatScale) -> PlaceResult<RenderedFrame> {
    Ok(RenderedFrame {
        index: snapshot.index,
        color: render_color(snapshot)?,
        heat: render_heat(snapshot, scale)?,
    })
}

fn size_mismatch(snapshot: &FrameSnapshot, layer: &str) -> PlaceError {
    PlaceError::data_integrity(format!(
        "frame {} {layer} grid does not match {}x{} canvas",
        snapshot.index.0, snapshot.canvas.width, snapshot.canvas.height
    ))
}

#[cfg(test)]
#[path = "../../tests/unit/render/raster.rs"]
mod tests;
