//! placemap replays the r/Place pixel history into two image sequences: a color map of the
//! canvas and an age/heat map of recent editing activity.
//!
//! # Pipeline overview
//!
//! 1. **Ingest** (`trim`): raw CSV log -> validated, sorted, deduplicated columnar event file
//! 2. **Schedule**: `GenerateConfig -> FrameTimeline` (one virtual instant per output frame)
//! 3. **Simulate**: `EventSource -> FrameSnapshot` per frame, applying events in timestamp order
//!    and decaying heat lazily
//! 4. **Render**: `FrameSnapshot -> RenderedFrame` (palette RGB + 16-bit heat), optionally in
//!    parallel across a chunk of snapshots
//! 5. **Sink**: rendered frames are pushed in order to a [`FrameSink`] such as
//!    [`PngSequenceSink`]
//!
//! Design constraints:
//!
//! - **No unsafe**: `unsafe` is forbidden in this crate.
//! - **Deterministic**: identical inputs and config produce identical rasters.
//! - **Sequential simulation**: only rendering may run in parallel; snapshots are owned copies.
#![forbid(unsafe_code)]

mod encode;
mod events;
mod foundation;
mod ingest;
mod render;
mod sim;

pub use encode::png::PngSequenceSink;
pub use encode::sink::{FrameSink, InMemorySink, SinkConfig};
pub use events::file::{EVENT_FILE_EXTENSION, EventFileHeader, EventFileReader, write_event_file};
pub use events::source::{EventSource, VecEventSource};
pub use foundation::core::{Canvas, FrameIndex, MAX_CANVAS_SIDE, PixelEvent};
pub use foundation::error::{PlaceError, PlaceResult};
pub use foundation::math::{HEAT_INCREMENT, decay_factor, saturating_increment};
pub use foundation::palette::{BACKGROUND_COLOR, PALETTE, palette_index_of_hex};
pub use ingest::trim::{IngestError, IngestReport, SortedLog, TrimOpts, sort_log, trim};
pub use render::pipeline::{GenerateStats, RenderOpts, RenderThreading, generate};
pub use render::raster::{
    HeatImage, HeatScale, RenderedFrame, render_color, render_heat, render_snapshot,
};
pub use sim::canvas::CanvasState;
pub use sim::config::GenerateConfig;
pub use sim::driver::{DriverState, FrameSnapshot, SimulationDriver};
pub use sim::heat::{HeatCell, HeatState};
pub use sim::timeline::{FrameTarget, FrameTimeline};
