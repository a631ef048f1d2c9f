/// Run configuration for one channelized wideband capture.
///
/// Built once from CLI flags or a config file by the caller and handed to
/// `Orchestrator::new`; never mutated afterwards.
#[derive(Debug, Clone, PartialEq)]
pub struct CoreConfig {
    /// Number of channels the PFB splits the capture into. Power of two, `[2, 16]`.
    pub channels: usize,
    /// Tuned center frequency of the wideband capture, in Hz.
    pub center_hz: f64,
    /// Wideband sample rate feeding the channelizer, in Hz.
    pub sample_rate: f64,
    /// Target per-channel sample rate handed to the external decoder, in Hz.
    /// A channel's native rate after the PFB is `sample_rate / channels`; set
    /// this equal to that value to skip the per-channel resampler entirely.
    pub decode_rate: f64,
}

impl CoreConfig {
    pub fn native_channel_rate(&self) -> f64 {
        self.sample_rate / self.channels as f64
    }

    pub fn needs_resampling(&self) -> bool {
        (self.decode_rate - self.native_channel_rate()).abs() > f64::EPSILON
    }
}
