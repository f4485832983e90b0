use crate::foundation::core::Canvas;
use crate::foundation::error::PlaceResult;
use crate::render::raster::RenderedFrame;

/// Configuration provided to a [`FrameSink`] at the start of a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SinkConfig {
    /// Output raster size in pixels.
    pub canvas: Canvas,
    /// Number of frames that will be pushed.
    pub frames: u64,
    /// Playback rate of the sequence. Metadata only: image-sequence sinks record it but do not
    /// time anything by it.
    pub fps: u32,
}

/// Sink contract for consuming rendered frames in timeline order.
///
/// Ordering contract: `push_frame` is called in strictly increasing frame index order.
pub trait FrameSink: Send {
    /// Called once before any frames are pushed.
    fn begin(&mut self, cfg: SinkConfig) -> PlaceResult<()>;
    /// Push one frame in strictly increasing timeline order.
    fn push_frame(&mut self, frame: &RenderedFrame) -> PlaceResult<()>;
    /// Called once after the last frame is pushed.
    fn end(&mut self) -> PlaceResult<()>;
}

/// In-memory sink for tests and debugging.
#[derive(Debug, Default)]
pub struct InMemorySink {
    cfg: Option<SinkConfig>,
    frames: Vec<RenderedFrame>,
    ended: bool,
}

impl InMemorySink {
    /// Create a new in-memory sink.
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the sink configuration captured in `begin`, if any.
    pub fn config(&self) -> Option<SinkConfig> {
        self.cfg
    }

    /// Borrow the captured frames.
    pub fn frames(&self) -> &[RenderedFrame] {
        &self.frames
    }

    /// Whether `end` has been called.
    pub fn ended(&self) -> bool {
        self.ended
    }
}

impl FrameSink for InMemorySink {
    fn begin(&mut self, cfg: SinkConfig) -> PlaceResult<()> {
        self.cfg = Some(cfg);
        self.frames.clear();
        self.ended = false;
        Ok(())
    }

    fn push_frame(&mut self, frame: &RenderedFrame) -> PlaceResult<()> {
        self.frames.push(frame.clone());
        Ok(())
    }

    fn end(&mut self) -> PlaceResult<()> {
        self.ended = true;
        Ok(())
    }
}
