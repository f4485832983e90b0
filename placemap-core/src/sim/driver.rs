use crate::events::source::EventSource;
use crate::foundation::core::{Canvas, FrameIndex, PixelEvent};
use crate::foundation::error::{PlaceError, PlaceResult};
use crate::sim::canvas::CanvasState;
use crate::sim::config::GenerateConfig;
use crate::sim::heat::HeatState;
use crate::sim::timeline::{FrameTarget, FrameTimeline};

/// Owned, immutable copy of both grids at one frame target.
#[derive(Clone, Debug)]
pub struct FrameSnapshot {
    pub index: FrameIndex,
    /// Virtual time of the frame, in dataset milliseconds.
    pub target_ms: f64,
    pub canvas: Canvas,
    /// Palette index per pixel, row-major.
    pub colors: Vec<u8>,
    /// Heat per pixel decayed to `target_ms`, row-major.
    pub heat: Vec<f32>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DriverState {
    /// Waiting to compare the next event against the current frame target.
    AwaitingEvent,
    /// An admitted event is being applied to both grids.
    ApplyingEvent,
    /// No more events qualify for the current target; a snapshot can be taken.
    SnapshotReady,
    /// All frames emitted, or the run failed.
    Done,
}

/// Replays an event stream into per-frame snapshots.
///
/// Events are applied strictly in stream order. A snapshot for frame `i` includes every event with
/// timestamp `<=` the frame's target. Events after the final target are never read.
pub struct SimulationDriver<S: EventSource> {
    source: S,
    timeline: FrameTimeline,
    canvas: CanvasState,
    heat: HeatState,
    state: DriverState,
    lookahead: Option<PixelEvent>,
    source_exhausted: bool,
    last_timestamp_ms: Option<i64>,
    next_frame: u64,
    events_applied: u64,
}

impl<S: EventSource> SimulationDriver<S> {
    /// Validate `cfg` and set up both grids. No events are pulled here.
    pub fn new(source: S, cfg: &GenerateConfig) -> PlaceResult<Self> {
        cfg.validate()?;
        let timeline = FrameTimeline::from_config(cfg)?;
        let canvas = source.canvas();
        Ok(Self {
            source,
            timeline,
            canvas: CanvasState::new(canvas),
            heat: HeatState::new(
                canvas,
                timeline.start_ms(),
                cfg.heat_half_life,
                cfg.scale_height,
            ),
            state: if timeline.is_empty() {
                DriverState::Done
            } else {
                DriverState::AwaitingEvent
            },
            lookahead: None,
            source_exhausted: false,
            last_timestamp_ms: None,
            next_frame: 0,
            events_applied: 0,
        })
    }

    pub fn state(&self) -> DriverState {
        self.state
    }

    pub fn timeline(&self) -> &FrameTimeline {
        &self.timeline
    }

    pub fn frames_emitted(&self) -> u64 {
        self.next_frame
    }

    pub fn events_applied(&self) -> u64 {
        self.events_applied
    }

    pub fn canvas_state(&self) -> &CanvasState {
        &self.canvas
    }

    pub fn heat_state(&self) -> &HeatState {
        &self.heat
    }

    /// Advance to the next frame target and snapshot it. Returns `Ok(None)` once all frames have
    /// been produced. Any error ends the run.
    pub fn next_frame(&mut self) -> PlaceResult<Option<FrameSnapshot>> {
        if self.state == DriverState::Done {
            return Ok(None);
        }
        let Some(target) = self.timeline.target(self.next_frame) else {
            self.state = DriverState::Done;
            return Ok(None);
        };

        match self.advance_to(target) {
            Ok(snapshot) => Ok(Some(snapshot)),
            Err(e) => {
                self.state = DriverState::Done;
                Err(e)
            }
        }
    }

    fn advance_to(&mut self, target: FrameTarget) -> PlaceResult<FrameSnapshot> {
        loop {
            match self.state {
                DriverState::AwaitingEvent => {
                    self.state = match self.peek_event()? {
                        Some(ev) if target.admits(ev.timestamp_ms) => DriverState::ApplyingEvent,
                        _ => DriverState::SnapshotReady,
                    };
                }
                DriverState::ApplyingEvent => {
                    let ev = self.lookahead.take().ok_or_else(|| {
                        PlaceError::Other(anyhow::anyhow!(
                            "internal error: no pending event to apply"
                        ))
                    })?;
                    self.apply(&ev);
                    self.state = DriverState::AwaitingEvent;
                }
                DriverState::SnapshotReady => {
                    let snapshot = self.snapshot(target);
                    self.next_frame += 1;
                    self.state = if self.next_frame >= self.timeline.len() {
                        if self.lookahead.is_some() {
                            tracing::debug!(
                                events_applied = self.events_applied,
                                "events remain after the final frame; discarding"
                            );
                        }
                        DriverState::Done
                    } else {
                        DriverState::AwaitingEvent
                    };
                    return Ok(snapshot);
                }
                DriverState::Done => {
                    return Err(PlaceError::Other(anyhow::anyhow!(
                        "internal error: driver advanced after completion"
                    )));
                }
            }
        }
    }

    /// Fill the one-event lookahead from the source, validating the event on the way in.
    fn peek_event(&mut self) -> PlaceResult<Option<PixelEvent>> {
        if self.lookahead.is_none() && !self.source_exhausted {
            match self.source.next() {
                None => self.source_exhausted = true,
                Some(ev) => {
                    let ev = ev?;
                    ev.validate(self.canvas.canvas())?;
                    if let Some(prev) = self.last_timestamp_ms
                        && ev.timestamp_ms < prev
                    {
                        return Err(PlaceError::data_integrity(format!(
                            "events out of order: t={}ms follows t={prev}ms",
                            ev.timestamp_ms
                        )));
                    }
                    self.last_timestamp_ms = Some(ev.timestamp_ms);
                    self.lookahead = Some(ev);
                }
            }
        }
        Ok(self.lookahead)
    }

    fn apply(&mut self, ev: &PixelEvent) {
        self.canvas.apply(ev);
        self.heat.apply(ev);
        self.events_applied += 1;
    }

    fn snapshot(&self, target: FrameTarget) -> FrameSnapshot {
        let target_ms = target.target_ms();
        FrameSnapshot {
            index: target.index,
            target_ms,
            canvas: self.canvas.canvas(),
            colors: self.canvas.snapshot(),
            heat: self.heat.snapshot(target_ms),
        }
    }
}

impl<S: EventSource> Iterator for SimulationDriver<S> {
    type Item = PlaceResult<FrameSnapshot>;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_frame().transpose()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/sim/driver.rs"]
mod tests;
