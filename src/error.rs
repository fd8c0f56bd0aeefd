//! Crate-wide error type.
//!
//! Mirrors the split the rest of the ambient stack expects: I/O errors carry
//! the path that caused them, JSON errors are transparent wraps, and anything
//! that doesn't fit those two buckets becomes a `Message`.

use std::{fmt, path::PathBuf};

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("{0}")]
    Io(#[from] IoError),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error("{0}")]
    Message(String),
}

impl Error {
    pub fn msg(msg: impl fmt::Display) -> Self {
        Self::Message(msg.to_string())
    }

    pub fn io(err: std::io::Error, path: impl Into<PathBuf>) -> Self {
        Self::Io(IoError { io: err, path: path.into() })
    }
}

/// An [`std::io::Error`] with the path that triggered it attached, so error
/// messages can name the offending file instead of just "No such file or
/// directory (os error 2)".
#[derive(Debug)]
pub struct IoError {
    io: std::io::Error,
    path: PathBuf,
}

impl IoError {
    pub fn new(io: std::io::Error, path: impl Into<PathBuf>) -> Self {
        Self { io, path: path.into() }
    }
}

impl fmt::Display for IoError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.path.display(), self.io)
    }
}

impl std::error::Error for IoError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.io)
    }
}
