use std::fmt;

/// Failure modes for resampler construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// `rate_in` or `rate_out` is zero, or exceeds the signed 32-bit domain
    /// the gcd/phase arithmetic is carried out in.
    InvalidRate,
    /// `rate_out / gcd(rate_in, rate_out)` does not fit the internal counters.
    FactorOverflow,
    /// The derived history/output buffer size overflows `usize`.
    BufferTooLarge,
    /// Polyphase branch or history buffer allocation failed.
    OutOfMemory,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::InvalidRate => write!(f, "input and output rates must both be nonzero and fit a signed 32-bit value"),
            Error::FactorOverflow => write!(f, "up-sampling factor overflows the internal phase counter"),
            Error::BufferTooLarge => write!(f, "derived resampler buffer size overflows usize"),
            Error::OutOfMemory => write!(f, "failed to allocate resampler buffers"),
        }
    }
}

impl std::error::Error for Error {}

pub type Result<T> = std::result::Result<T, Error>;
