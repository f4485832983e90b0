use std::path::PathBuf;

/// Convenience result type used across placemap.
pub type PlaceResult<T> = Result<T, PlaceError>;

/// Top-level error taxonomy used by engine APIs.
///
/// Every variant is fatal for a run: rendering is a deterministic batch computation, so the only
/// recovery is to fix the input or configuration and start again.
#[derive(thiserror::Error, Debug)]
pub enum PlaceError {
    /// Invalid engine configuration (fps, frames, half-life, ...), reported before processing.
    #[error("config error: {0}")]
    Config(String),

    /// The event stream broke its contract (ordering, bounds, palette).
    #[error("data integrity error: {0}")]
    DataIntegrity(String),

    /// Unreadable input or unwritable output, with the offending path.
    #[error("io error at '{}': {source}", .path.display())]
    Io {
        /// Path that failed.
        path: PathBuf,
        /// Underlying IO error.
        #[source]
        source: std::io::Error,
    },

    /// Errors when serializing or deserializing data structures.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Wrapped lower-level error from dependencies.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl PlaceError {
    /// Build a [`PlaceError::Config`] value.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Build a [`PlaceError::DataIntegrity`] value.
    pub fn data_integrity(msg: impl Into<String>) -> Self {
        Self::DataIntegrity(msg.into())
    }

    /// Build a [`PlaceError::Io`] value.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Build a [`PlaceError::Serde`] value.
    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
