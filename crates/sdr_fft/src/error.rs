use std::fmt;

/// Failure modes for FFT plan creation and execution.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// `N` is not a supported power of two in `[2, 32]`.
    InvalidSize,
    /// A buffer passed to `forward`/`inverse` does not match the plan's `N`.
    InvalidArgument,
    /// Plan or scratch buffer allocation failed.
    OutOfMemory,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::InvalidSize => write!(f, "FFT size is not a supported power of two in [2, 32]"),
            Error::InvalidArgument => write!(f, "input/output buffer length does not match the FFT plan size"),
            Error::OutOfMemory => write!(f, "failed to allocate FFT plan buffers"),
        }
    }
}

impl std::error::Error for Error {}

pub type Result<T> = std::result::Result<T, Error>;
