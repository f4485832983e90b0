use crate::foundation::core::FrameIndex;
use crate::foundation::error::{PlaceError, PlaceResult};
use crate::sim::config::GenerateConfig;

/// Virtual instant of one output frame: `start_ms + index * timescale / fps`.
///
/// The instant is kept as an exact rational so that event admission at frame boundaries never
/// depends on float rounding.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FrameTarget {
    pub index: FrameIndex,
    start_ms: i64,
    // index * timescale, over `fps`
    offset_num: i128,
    fps: i64,
}

impl FrameTarget {
    /// Whether an event at `timestamp_ms` belongs in this frame (closed upper bound).
    pub fn admits(&self, timestamp_ms: i64) -> bool {
        let rel = i128::from(timestamp_ms) - i128::from(self.start_ms);
        rel * i128::from(self.fps) <= self.offset_num
    }

    /// The target as float milliseconds, for decay computations.
    pub fn target_ms(&self) -> f64 {
        self.start_ms as f64 + (self.offset_num as f64) / (self.fps as f64)
    }
}

/// Ordered, immutable sequence of frame targets.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FrameTimeline {
    start_ms: i64,
    timescale: i64,
    frames: u64,
    fps: i64,
}

impl FrameTimeline {
    pub fn new(start_ms: i64, timescale: i64, frames: i64, fps: i64) -> PlaceResult<Self> {
        if fps <= 0 {
            return Err(PlaceError::config(format!("fps must be > 0 (got {fps})")));
        }
        if frames < 0 {
            return Err(PlaceError::config(format!(
                "frames must be >= 0 (got {frames})"
            )));
        }
        if timescale < 0 {
            return Err(PlaceError::config(format!(
                "timescale must be >= 0 (got {timescale})"
            )));
        }
        Ok(Self {
            start_ms,
            timescale,
            frames: frames as u64,
            fps,
        })
    }

    pub fn from_config(cfg: &GenerateConfig) -> PlaceResult<Self> {
        Self::new(cfg.start_ms, cfg.timescale, cfg.frames, cfg.fps)
    }

    pub fn len(&self) -> u64 {
        self.frames
    }

    pub fn is_empty(&self) -> bool {
        self.frames == 0
    }

    pub fn start_ms(&self) -> i64 {
        self.start_ms
    }

    pub fn target(&self, index: u64) -> Option<FrameTarget> {
        if index >= self.frames {
            return None;
        }
        Some(FrameTarget {
            index: FrameIndex(index),
            start_ms: self.start_ms,
            offset_num: i128::from(index) * i128::from(self.timescale),
            fps: self.fps,
        })
    }

    pub fn iter(&self) -> impl Iterator<Item = FrameTarget> + '_ {
        (0..self.frames).filter_map(move |i| self.target(i))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/sim/timeline.rs"]
mod tests;
