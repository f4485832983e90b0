//! Lazily decayed per-pixel heat.
//!
//! Each cell stores the height it had at its last edit and when that edit happened. The current
//! height at any later instant is derived on read, so untouched pixels cost nothing per frame.

use crate::foundation::core::{Canvas, PixelEvent};
use crate::foundation::math::{decay_factor, saturating_increment};

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct HeatCell {
    pub value: f64,
    pub last_update_ms: i64,
}

impl HeatCell {
    /// Height of this cell at `at_ms`.
    pub fn decayed_to(&self, at_ms: f64, half_life_ms: f64) -> f64 {
        if self.value == 0.0 {
            return 0.0;
        }
        self.value * decay_factor(at_ms - self.last_update_ms as f64, half_life_ms)
    }
}

#[derive(Clone, Debug)]
pub struct HeatState {
    canvas: Canvas,
    half_life_ms: f64,
    scale_height: f64,
    cells: Vec<HeatCell>,
}

impl HeatState {
    /// All cells start at zero with `last_update_ms = start_ms`.
    pub fn new(canvas: Canvas, start_ms: i64, half_life_ms: f64, scale_height: f64) -> Self {
        let zero = HeatCell {
            value: 0.0,
            last_update_ms: start_ms,
        };
        Self {
            canvas,
            half_life_ms,
            scale_height,
            cells: vec![zero; canvas.pixel_count()],
        }
    }

    /// Decay the touched cell to the event time, then add the saturating increment.
    pub(crate) fn apply(&mut self, ev: &PixelEvent) {
        let idx = self.canvas.index_of(ev.x, ev.y);
        let cell = &mut self.cells[idx];
        let current = cell.decayed_to(ev.timestamp_ms as f64, self.half_life_ms);
        cell.value = saturating_increment(current, self.scale_height);
        cell.last_update_ms = ev.timestamp_ms;
    }

    pub fn cell_at(&self, x: u16, y: u16) -> Option<HeatCell> {
        if !self.canvas.contains(x, y) {
            return None;
        }
        Some(self.cells[self.canvas.index_of(x, y)])
    }

    /// Every cell's height at `at_ms`. Stored cells are left untouched.
    pub(crate) fn snapshot(&self, at_ms: f64) -> Vec<f32> {
        self.cells
            .iter()
            .map(|c| c.decayed_to(at_ms, self.half_life_ms) as f32)
            .collect()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/sim/heat.rs"]
mod tests;
