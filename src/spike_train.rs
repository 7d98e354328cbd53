use crate::Attributes;

/// The spikes detected on one channel group.
///
/// Waveforms are stored flat in spike-major order: for every spike, every
/// channel, every sample. Values are in microvolts and sign-flipped so that
/// spikes point upwards.
#[derive(Debug, Clone, PartialEq)]
pub struct SpikeTrain {
    pub(crate) times: Vec<f64>,
    pub(crate) waveforms: Vec<f64>,
    pub(crate) channel_count: usize,
    pub(crate) samples_per_spike: usize,
    pub(crate) sample_rate: f64,
    pub(crate) attributes: Attributes,
}

/// One spike: its time and a `channel_count × samples_per_spike` waveform matrix.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Spike<'a> {
    pub time: f64,
    waveform: &'a [f64],
    samples_per_spike: usize,
}

impl<'a> Spike<'a> {
    /// The waveform as one flat row-major slice.
    pub fn waveform(&self) -> &'a [f64] {
        self.waveform
    }

    /// The waveform seen on one channel of the group.
    pub fn channel(&self, channel: usize) -> Option<&'a [f64]> {
        self.waveform.chunks_exact(self.samples_per_spike).nth(channel)
    }
}

impl SpikeTrain {
    /// Spike times in seconds, non-decreasing.
    pub fn times(&self) -> &[f64] {
        &self.times
    }

    /// All waveforms, flat. See [`SpikeTrain::spike`] for a structured view.
    pub fn waveforms(&self) -> &[f64] {
        &self.waveforms
    }

    pub fn len(&self) -> usize {
        self.times.len()
    }

    pub fn is_empty(&self) -> bool {
        self.times.is_empty()
    }

    /// Alias for [`SpikeTrain::len`], named like the `num_spikes` header key.
    pub fn num_spikes(&self) -> usize {
        self.len()
    }

    pub fn channel_count(&self) -> usize {
        self.channel_count
    }

    pub fn samples_per_spike(&self) -> usize {
        self.samples_per_spike
    }

    /// Sample rate of the waveforms in Hz.
    pub fn sample_rate(&self) -> f64 {
        self.sample_rate
    }

    /// The header of the tetrode file.
    pub fn attributes(&self) -> &Attributes {
        &self.attributes
    }

    fn spike_size(&self) -> usize {
        self.channel_count * self.samples_per_spike
    }

    pub fn spike(&self, index: usize) -> Option<Spike<'_>> {
        let time = *self.times.get(index)?;
        let size = self.spike_size();
        let waveform = self.waveforms.get(index * size..(index + 1) * size)?;

        Some(Spike {
            time,
            waveform,
            samples_per_spike: self.samples_per_spike,
        })
    }

    pub fn spikes(&self) -> impl Iterator<Item = Spike<'_>> {
        self.times
            .iter()
            .zip(self.waveforms.chunks_exact(self.spike_size()))
            .map(|(&time, waveform)| Spike {
                time,
                waveform,
                samples_per_spike: self.samples_per_spike,
            })
    }
}
