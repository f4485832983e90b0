use std::path::Path;

use crate::foundation::error::{PlaceError, PlaceResult};

/// Engine parameters for one `generate` run.
///
/// Field types are deliberately wide (signed) so that out-of-range values coming from the CLI or a
/// JSON file reach [`GenerateConfig::validate`] and are reported as config errors.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GenerateConfig {
    /// Virtual timestamp of frame 0, in dataset milliseconds.
    pub start_ms: i64,
    /// Dataset milliseconds that elapse per second of output.
    pub timescale: i64,
    /// Number of frames to produce.
    pub frames: i64,
    /// Output frames per second.
    pub fps: i64,
    /// Heat half-life in dataset milliseconds.
    pub heat_half_life: f64,
    /// Height at which an edit's increment is reduced by a factor of e.
    pub scale_height: f64,
}

impl Default for GenerateConfig {
    fn default() -> Self {
        Self {
            start_ms: 0,
            timescale: 1000,
            frames: 600,
            fps: 60,
            heat_half_life: 10.0 * 60.0 * 1000.0,
            scale_height: 0.3,
        }
    }
}

impl GenerateConfig {
    /// Load a config from a JSON file. Missing fields take their defaults.
    pub fn from_path(path: impl AsRef<Path>) -> PlaceResult<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|e| PlaceError::io(path, e))?;
        Self::from_json_str(&text)
    }

    pub fn from_json_str(text: &str) -> PlaceResult<Self> {
        serde_json::from_str(text).map_err(|e| PlaceError::serde(format!("config json: {e}")))
    }

    pub fn validate(&self) -> PlaceResult<()> {
        if self.fps <= 0 {
            return Err(PlaceError::config(format!(
                "fps must be > 0 (got {})",
                self.fps
            )));
        }
        if self.frames < 0 {
            return Err(PlaceError::config(format!(
                "frames must be >= 0 (got {})",
                self.frames
            )));
        }
        if self.timescale < 0 {
            return Err(PlaceError::config(format!(
                "timescale must be >= 0 (got {})",
                self.timescale
            )));
        }
        if self.heat_half_life.is_nan() || self.heat_half_life <= 0.0 {
            return Err(PlaceError::config(format!(
                "heat_half_life must be > 0 (got {})",
                self.heat_half_life
            )));
        }
        if self.scale_height.is_nan() || self.scale_height <= 0.0 {
            return Err(PlaceError::config(format!(
                "scale_height must be > 0 (got {})",
                self.scale_height
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/sim/config.rs"]
mod tests;
