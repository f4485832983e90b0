use crate::foundation::core::{Canvas, PixelEvent};
use crate::foundation::palette::BACKGROUND_COLOR;

/// Current palette index of every pixel, row-major.
#[derive(Clone, Debug)]
pub struct CanvasState {
    canvas: Canvas,
    colors: Vec<u8>,
}

impl CanvasState {
    pub fn new(canvas: Canvas) -> Self {
        Self {
            canvas,
            colors: vec![BACKGROUND_COLOR; canvas.pixel_count()],
        }
    }

    pub fn canvas(&self) -> Canvas {
        self.canvas
    }

    /// Paint one (already validated) event.
    pub(crate) fn apply(&mut self, ev: &PixelEvent) {
        let idx = self.canvas.index_of(ev.x, ev.y);
        self.colors[idx] = ev.color;
    }

    pub fn color_at(&self, x: u16, y: u16) -> Option<u8> {
        if !self.canvas.contains(x, y) {
            return None;
        }
        Some(self.colors[self.canvas.index_of(x, y)])
    }

    pub fn colors(&self) -> &[u8] {
        &self.colors
    }

    pub(crate) fn snapshot(&self) -> Vec<u8> {
        self.colors.clone()
    }
}
