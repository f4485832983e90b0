use std::path::{Path, PathBuf};

use crate::encode::sink::{FrameSink, SinkConfig};
use crate::foundation::core::FrameIndex;
use crate::foundation::error::{PlaceError, PlaceResult};
use crate::render::raster::RenderedFrame;

/// Writes each frame as `NNNNNN.png` into a color-map and an age-map directory.
///
/// Both directories must already exist; this sink never creates or cleans them.
#[derive(Debug, Clone)]
pub struct PngSequenceSink {
    color_dir: PathBuf,
    age_dir: PathBuf,
    written: u64,
}

impl PngSequenceSink {
    pub fn new(color_dir: impl Into<PathBuf>, age_dir: impl Into<PathBuf>) -> Self {
        Self {
            color_dir: color_dir.into(),
            age_dir: age_dir.into(),
            written: 0,
        }
    }

    /// File name used for frame `idx`.
    pub fn file_name(idx: FrameIndex) -> String {
        format!("{:06}.png", idx.0)
    }

    pub fn frames_written(&self) -> u64 {
        self.written
    }
}

fn require_dir(dir: &Path) -> PlaceResult<()> {
    if dir.is_dir() {
        return Ok(());
    }
    Err(PlaceError::io(
        dir,
        std::io::Error::new(std::io::ErrorKind::NotFound, "output directory does not exist"),
    ))
}

fn image_err(path: &Path, e: image::ImageError) -> PlaceError {
    match e {
        image::ImageError::IoError(io) => PlaceError::io(path, io),
        other => PlaceError::io(path, std::io::Error::other(other)),
    }
}

impl FrameSink for PngSequenceSink {
    fn begin(&mut self, cfg: SinkConfig) -> PlaceResult<()> {
        require_dir(&self.color_dir)?;
        require_dir(&self.age_dir)?;
        self.written = 0;
        tracing::debug!(
            color_dir = %self.color_dir.display(),
            age_dir = %self.age_dir.display(),
            frames = cfg.frames,
            fps = cfg.fps,
            "writing png sequences"
        );
        Ok(())
    }

    fn push_frame(&mut self, frame: &RenderedFrame) -> PlaceResult<()> {
        let name = Self::file_name(frame.index);

        let color_path = self.color_dir.join(&name);
        frame
            .color
            .save_with_format(&color_path, image::ImageFormat::Png)
            .map_err(|e| image_err(&color_path, e))?;

        let age_path = self.age_dir.join(&name);
        frame
            .heat
            .save_with_format(&age_path, image::ImageFormat::Png)
            .map_err(|e| image_err(&age_path, e))?;

        self.written += 1;
        Ok(())
    }

    fn end(&mut self) -> PlaceResult<()> {
        tracing::info!(frames = self.written, "png sequences complete");
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/encode/png.rs"]
mod tests;
