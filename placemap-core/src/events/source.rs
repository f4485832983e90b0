use crate::foundation::core::{Canvas, PixelEvent};
use crate::foundation::error::PlaceResult;

/// Time-ordered, finite, single-pass stream of pixel events.
///
/// Ordering contract: events are yielded with non-decreasing `timestamp_ms`. The simulation
/// driver checks this and fails the run on violation.
pub trait EventSource: Iterator<Item = PlaceResult<PixelEvent>> {
    /// Dimensions of the canvas the events refer to.
    fn canvas(&self) -> Canvas;
}

/// In-memory event source for tests and tooling.
#[derive(Debug, Clone)]
pub struct VecEventSource {
    canvas: Canvas,
    events: std::vec::IntoIter<PixelEvent>,
}

impl VecEventSource {
    pub fn new(canvas: Canvas, events: Vec<PixelEvent>) -> Self {
        Self {
            canvas,
            events: events.into_iter(),
        }
    }
}

impl Iterator for VecEventSource {
    type Item = PlaceResult<PixelEvent>;

    fn next(&mut self) -> Option<Self::Item> {
        self.events.next().map(Ok)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.events.size_hint()
    }
}

impl EventSource for VecEventSource {
    fn canvas(&self) -> Canvas {
        self.canvas
    }
}

impl<S: EventSource + ?Sized> EventSource for Box<S> {
    fn canvas(&self) -> Canvas {
        (**self).canvas()
    }
}
