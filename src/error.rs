//! Error type shared by the SEG-Y codec and the amplitude engine.

use std::io;
use std::path::PathBuf;

/// All failures reported by the core.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Caller-supplied data was rejected before anything was touched.
    #[error("invalid input: {0}")]
    Input(String),

    /// Opening, creating, reading or writing a file failed.
    #[error("{stage} '{}': {source}", path.display())]
    File {
        path: PathBuf,
        stage: &'static str,
        #[source]
        source: io::Error,
    },

    /// A read returned fewer bytes than the SEG-Y layout requires.
    #[error("truncated SEG-Y file '{}' while reading {stage}", path.display())]
    Truncated { path: PathBuf, stage: String },

    /// Header fields are missing or inconsistent.
    #[error("malformed SEG-Y file '{}': {reason}", path.display())]
    Format { path: PathBuf, reason: String },

    /// Trace accessor called with an index past the end.
    #[error("trace index {index} out of range ({len} traces)")]
    OutOfRange { index: usize, len: usize },
}

impl Error {
    pub(crate) fn file(path: impl Into<PathBuf>, stage: &'static str, source: io::Error) -> Self {
        Error::File {
            path: path.into(),
            stage,
            source,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
