use thiserror::Error;

pub type Result<T> = std::result::Result<T, RtasEventError>;
pub type DeserializationResult<T> = std::result::Result<T, DeserializationError>;

/// Errors raised while decoding the raw event bytes.
///
/// Any of these aborts the whole parse, no partially decoded event is returned.
#[derive(Debug, Error)]
pub enum DeserializationError {
    #[error("buffer too small for {what} at offset {offset} (need {need} bytes, have {have})")]
    Truncated {
        what: &'static str,
        offset: u64,
        need: usize,
        have: usize,
    },

    #[error("invalid {what} at offset {offset}: expected {expected:?}, found {found:?}")]
    BadMagic {
        what: &'static str,
        offset: u64,
        expected: [u8; 4],
        found: [u8; 4],
    },

    #[error(
        "declared length of {what} at offset {offset} is inconsistent (declared {declared}, actual {actual})"
    )]
    LengthMismatch {
        what: &'static str,
        offset: u64,
        declared: usize,
        actual: usize,
    },

    #[error("unknown {what} `{value:#x}` at offset {offset}")]
    UnknownFormat {
        what: &'static str,
        offset: u64,
        value: u32,
    },

    #[error("failed to allocate {size} bytes for {what}")]
    OutOfMemory { what: &'static str, size: usize },
}

#[derive(Debug, Error)]
pub enum RtasEventError {
    #[error(transparent)]
    DeserializationError(#[from] DeserializationError),

    #[error("event has no {kind} section")]
    MissingSection { kind: &'static str },

    #[error("invalid argument: {message}")]
    InvalidArgument { message: String },
}

impl DeserializationError {
    /// Byte offset (relative to the start of the event) the error refers to, if any.
    pub fn offset(&self) -> Option<u64> {
        match self {
            DeserializationError::Truncated { offset, .. }
            | DeserializationError::BadMagic { offset, .. }
            | DeserializationError::LengthMismatch { offset, .. }
            | DeserializationError::UnknownFormat { offset, .. } => Some(*offset),
            DeserializationError::OutOfMemory { .. } => None,
        }
    }
}
