use std::io;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum EdfError {
    #[error("File not found: {0}")]
    FileNotFound(String),

    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("Invalid file format: {0}")]
    InvalidFormat(String),

    #[error("Sample count mismatch: header declares {expected} samples, blob holds {actual}")]
    SizeMismatch { expected: usize, actual: usize },

    #[error("Unsupported operation: {0}")]
    UnsupportedOperation(String),

    #[error("Unknown channel: {0}")]
    UnknownChannel(String),
}

pub type Result<T> = std::result::Result<T, EdfError>;
