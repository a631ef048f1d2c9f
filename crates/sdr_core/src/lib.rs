//! Wideband SDR signal-processing core: channelizer, resampler, and
//! cross-channel dedup wired into one orchestrator. Protocol decoding and
//! real hardware acquisition are deliberately out of scope; this crate's job
//! ends at handing clean per-channel IQ to an external decoder and gating
//! that decoder's output against duplicates.

mod config;
mod orchestrator;

pub use config::CoreConfig;
pub use orchestrator::{ChannelEvent, Orchestrator};

pub use sdr_dedup::{DataValue, DecodedRecord, ElemKind};
