//! Ties the channelizer, per-channel resampler, and cross-channel dedup gate
//! together into one wideband-in, decoder-facing-events-out pipeline.
//!
//! Protocol decoding itself stays external (it's out of scope here): the
//! orchestrator hands each channel's resampled IQ to an `iq_sink` callback,
//! the same shape as the teacher's `subscribe_bits_out` hook, and exposes
//! `submit_decoded` for whatever decoder the caller plugs in to report a
//! decoded record back through the dedup gate.

use num::complex::Complex32;
use sdr_channelizer::Channelizer;
use sdr_dedup::{Dedup, DecodedRecord};
use sdr_resampler::Resampler;

use crate::config::CoreConfig;

/// One channel's resampled IQ, ready for an external decoder.
pub struct ChannelEvent {
    pub channel: usize,
    pub freq_hz: f64,
    pub samples: Vec<Complex32>,
}

/// Coordinates the channelizer, resamplers, and dedup gate for one capture.
pub struct Orchestrator {
    channelizer: Channelizer,
    resamplers: Vec<Option<Resampler>>,
    dedup: Dedup,
    iq_sink: Box<dyn FnMut(ChannelEvent) + Send>,
    decoded_sink: Box<dyn FnMut(DecodedRecord) + Send>,
}

impl Orchestrator {
    /// Builds an orchestrator from `config`. `iq_sink` receives one
    /// `ChannelEvent` per channel per processed block; `decoded_sink`
    /// receives decoded records that survive the dedup gate.
    pub fn new(
        config: &CoreConfig,
        iq_sink: impl FnMut(ChannelEvent) + Send + 'static,
        decoded_sink: impl FnMut(DecodedRecord) + Send + 'static,
    ) -> anyhow::Result<Self> {
        let channelizer = Channelizer::new(config.channels, config.sample_rate, config.center_hz)?;

        let resamplers = if config.needs_resampling() {
            log::info!(
                "sdr_core: resampling each channel {:.1} Hz -> {:.1} Hz before decode",
                config.native_channel_rate(),
                config.decode_rate
            );
            let rate_in = config.native_channel_rate().round() as u32;
            let rate_out = config.decode_rate.round() as u32;
            (0..config.channels)
                .map(|_| Resampler::new(rate_in, rate_out).map(Some))
                .collect::<Result<Vec<_>, _>>()?
        } else {
            (0..config.channels).map(|_| None).collect()
        };

        Ok(Self {
            channelizer,
            resamplers,
            dedup: Dedup::new(),
            iq_sink: Box::new(iq_sink),
            decoded_sink: Box::new(decoded_sink),
        })
    }

    /// Runs one block of wideband baseband IQ through the channelizer (and,
    /// where configured, the per-channel resampler), delivering a
    /// `ChannelEvent` to `iq_sink` for every channel of every `M/2`-sample
    /// sub-block produced.
    pub fn process_iq(&mut self, baseband: &[Complex32]) -> anyhow::Result<()> {
        let rows = self.channelizer.process(baseband)?;
        let channel_count = self.channelizer.channel_count();

        for row in rows {
            for (k, sample) in row.into_iter().enumerate() {
                let resampled = match &mut self.resamplers[k] {
                    Some(r) => r.process(&[sample]),
                    None => vec![sample],
                };
                if resampled.is_empty() {
                    continue;
                }
                (self.iq_sink)(ChannelEvent {
                    channel: k,
                    freq_hz: self.channelizer.channel_freq(k),
                    samples: resampled,
                });
            }
            debug_assert!(channel_count > 0);
        }
        Ok(())
    }

    /// Routes a decoded record through the cross-channel dedup gate,
    /// delivering it to `decoded_sink` unless it's a recent duplicate.
    /// Returns whether the record was delivered.
    pub fn submit_decoded(&mut self, record: DecodedRecord) -> bool {
        if !self.dedup.check(&record) {
            return false;
        }
        (self.decoded_sink)(record);
        true
    }

    pub fn suppressed_count(&self) -> u64 {
        self.dedup.suppressed_count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    fn config() -> CoreConfig {
        CoreConfig {
            channels: 4,
            center_hz: 868.5e6,
            sample_rate: 2_400_000.0,
            decode_rate: 600_000.0, // == native rate, no resampling needed
        }
    }

    #[test]
    fn process_iq_delivers_one_event_per_channel_per_subblock() {
        let events = Arc::new(Mutex::new(Vec::new()));
        let events_clone = events.clone();
        let mut orch = Orchestrator::new(
            &config(),
            move |event: ChannelEvent| events_clone.lock().unwrap().push(event.channel),
            |_record| {},
        )
        .unwrap();

        let input = vec![Complex32::new(1.0, 0.0); 8]; // 4 sub-blocks of M/2=2
        orch.process_iq(&input).unwrap();

        let got = events.lock().unwrap();
        assert_eq!(got.len(), 4 * 4); // 4 sub-blocks x 4 channels
    }

    #[test]
    fn submit_decoded_forwards_nearby_frequency_retransmission_through_the_gate() {
        let delivered = Arc::new(Mutex::new(0u32));
        let delivered_clone = delivered.clone();
        let mut orch = Orchestrator::new(&config(), |_event| {}, move |_record| {
            *delivered_clone.lock().unwrap() += 1;
        })
        .unwrap();

        use sdr_dedup::DataValue;
        let record = |channel: usize, freq: f64, t: u64| DecodedRecord {
            channel,
            freq_hz: freq,
            timestamp_ms: t,
            values: vec![DataValue::Text("hi".into())],
        };

        assert!(orch.submit_decoded(record(0, 868.5e6, 0)));
        assert!(orch.submit_decoded(record(1, 868.5e6 + 200.0, 10)));
        assert_eq!(*delivered.lock().unwrap(), 2);
        assert_eq!(orch.suppressed_count(), 0);
    }

    #[test]
    fn needs_resampling_is_false_when_rates_match() {
        assert!(!config().needs_resampling());
    }

    #[test]
    fn needs_resampling_is_true_when_decode_rate_differs() {
        let mut c = config();
        c.decode_rate = 48_000.0;
        assert!(c.needs_resampling());
    }
}
