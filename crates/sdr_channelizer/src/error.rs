use std::fmt;

/// Failure modes for channelizer construction and execution.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// `M` is not a supported power of two in `[2, 16]`.
    InvalidChannelCount,
    /// Input length is not a multiple of the decimation factor `M/2`.
    InvalidBlockLength,
    /// Filter or window buffer allocation failed.
    OutOfMemory,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::InvalidChannelCount => write!(f, "channel count must be a power of two in [2, 16]"),
            Error::InvalidBlockLength => write!(f, "input length must be a multiple of M/2"),
            Error::OutOfMemory => write!(f, "failed to allocate channelizer buffers"),
        }
    }
}

impl std::error::Error for Error {}

pub type Result<T> = std::result::Result<T, Error>;
