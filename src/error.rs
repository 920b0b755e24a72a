use std::path::PathBuf;

use thiserror::Error;

/// Errors surfaced by the scan and report pipeline.
///
/// Only [`Error::StartPathNotFound`] is fatal for a run; everything else is
/// raised per artifact and logged by the report writer.
#[derive(Debug, Error)]
pub enum Error {
    #[error("start path does not exist: {}", .0.display())]
    StartPathNotFound(PathBuf),

    #[error("I/O error at {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("image encoding failed: {0}")]
    Image(#[from] image::ImageError),

    #[error("JSON serialization failed: {0}")]
    Json(#[from] serde_json::Error),

    #[error("no data to visualize")]
    EmptyGraph,
}

impl Error {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
