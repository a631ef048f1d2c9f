//! Fixed-size complex FFT engine (`N` a power of two in `[2, 32]`): a
//! radix-4 Stockham autosort core with on-the-fly twiddle derivation, fully
//! unrolled SoA kernels for the sizes the channelizer actually runs, and
//! real-to-complex / complex-to-real fast paths built on a half-size
//! internal transform.

mod aligned;
mod error;
mod kernels;
mod plan;
mod stockham;
mod twiddle;

pub use aligned::{build_info, AlignedBuf, ALIGNMENT};
pub use error::{Error, Result};
pub use plan::FftPlan;
