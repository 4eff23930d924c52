use thiserror::Error;

/// Errors raised while painting to the output sink.
///
/// Result payloads are JSON values and always print, so `Field` only
/// surfaces from whole-record renders such as the inventory dump.
#[derive(Error, Debug)]
pub enum RenderError {
    #[error("sink write failed: {0}")]
    Sink(#[from] std::io::Error),

    #[error("cannot serialize field '{field}': {message}")]
    Field { field: String, message: String },
}

/// Malformed result shapes. These are programmer errors and are rejected
/// when the node is built, so a renderer never sees them.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum ResultError {
    #[error("host result for '{0}' has no leaves")]
    EmptyHostResult(String),

    #[error("duplicate host '{0}' in aggregate")]
    DuplicateHost(String),
}
