use log::warn;

use crate::{
    errors::{AxonaError, Result},
    layout::{SignalKind, SignalLayout},
    parsers::{check_body_length, data_file, signal_samples},
    util::scale_to_microvolts,
    Attributes, RecordingHeader,
};

/// A continuous recording from an `.eeg` or `.egf` file, in microvolts.
#[derive(Debug, Clone, PartialEq)]
pub struct AnalogSignal {
    channel_id: usize,
    kind: SignalKind,
    suffix: u32,
    signal: Vec<f64>,
    channel_count: usize,
    sample_rate: f64,
    gain: f64,
    attributes: Attributes,
}

impl AnalogSignal {
    /// Decodes a continuous file.
    ///
    /// `suffix` is the number after the extension (`.eeg2` has suffix 2);
    /// files without a number have suffix 1.
    pub fn from_bytes(bytes: &[u8], kind: SignalKind, suffix: u32, header: &RecordingHeader) -> Result<Self> {
        let data_file = data_file(bytes)?;
        let layout = SignalLayout::from_attributes(&data_file.attributes, kind)?;
        let channel = header.eeg_channel(suffix)?;

        check_body_length(data_file.body, layout.sample_count, layout.record_size())?;
        let (_, samples) = signal_samples(data_file.body, &layout)
            .map_err(|e| AxonaError::CorruptRecordError(format!("could not decode samples: {e}")))?;

        check_duration(&layout, header.duration());

        let signal = samples
            .into_iter()
            .map(|raw| scale_to_microvolts(raw, layout.bytes_per_sample, header.adc_fullscale_uv(), channel.gain))
            .collect();

        Ok(Self {
            channel_id: channel.channel_id,
            kind,
            suffix,
            signal,
            channel_count: layout.num_chans,
            sample_rate: layout.sample_rate,
            gain: channel.gain,
            attributes: data_file.attributes,
        })
    }

    /// The recorded channel, before referencing.
    pub fn channel_id(&self) -> usize {
        self.channel_id
    }

    pub fn kind(&self) -> SignalKind {
        self.kind
    }

    pub fn suffix(&self) -> u32 {
        self.suffix
    }

    /// Samples in microvolts. With more than one channel the samples are interleaved.
    pub fn signal(&self) -> &[f64] {
        &self.signal
    }

    pub fn channel_count(&self) -> usize {
        self.channel_count
    }

    /// Number of samples per channel.
    pub fn sample_count(&self) -> usize {
        self.signal.len() / self.channel_count
    }

    /// Sample rate in Hz.
    pub fn sample_rate(&self) -> f64 {
        self.sample_rate
    }

    pub fn gain(&self) -> f64 {
        self.gain
    }

    /// The header of the continuous file.
    pub fn attributes(&self) -> &Attributes {
        &self.attributes
    }
}

// data is written in fixed size blocks, so only a mismatch of more than a second is worth reporting
fn check_duration(layout: &SignalLayout, duration: f64) {
    let expected = duration * layout.sample_rate;
    if (layout.sample_count as f64 - expected).abs() > layout.sample_rate {
        warn!(
            "{} file has {} samples at {} Hz, but the recording lasts {} s ({} samples expected)",
            layout.kind.extension(),
            layout.sample_count,
            layout.sample_rate,
            duration,
            expected
        );
    }
}
