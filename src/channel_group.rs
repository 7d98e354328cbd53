use crate::{
    errors::{AxonaError, Result},
    layout::SpikeLayout,
    parsers::{check_body_length, data_file, spike_records},
    util::{check_non_decreasing, scale_to_microvolts},
    Attributes, ChannelGroupId, RecordingHeader, SpikeTrain,
};

/// Axona numbers gains as if every group had four channels.
const CHANNELS_PER_GAIN_BLOCK: usize = 4;

/// One recording channel within a channel group.
#[derive(Debug, Clone, PartialEq)]
pub struct Channel {
    /// Running index over all channel groups of the recording.
    pub index: usize,
    pub name: String,
    pub gain: f64,
}

/// A tetrode (or other electrode group) and the spikes recorded on it.
#[derive(Debug, Clone, PartialEq)]
pub struct ChannelGroup {
    id: ChannelGroupId,
    channels: Vec<Channel>,
    spike_train: SpikeTrain,
}

impl ChannelGroup {
    /// Decodes the contents of a tetrode file.
    ///
    /// `first_channel` is the running index of this group's first channel,
    /// i.e. the number of channels in the groups before it.
    pub fn from_bytes(
        bytes: &[u8],
        id: ChannelGroupId,
        first_channel: usize,
        header: &RecordingHeader,
    ) -> Result<Self> {
        let data_file = data_file(bytes)?;
        let layout = SpikeLayout::from_attributes(&data_file.attributes)?;

        let channels = (0..layout.num_chans)
            .map(|i| {
                let index = first_channel + i;
                let gain = header.gain(id as usize * CHANNELS_PER_GAIN_BLOCK + i)?;
                Ok(Channel {
                    index,
                    name: format!("channel_{index}_channel_group_{id}_internal_{i}"),
                    gain,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        let spike_train = decode_spike_train(
            data_file.body,
            &layout,
            &channels,
            header.adc_fullscale_uv(),
            data_file.attributes,
        )?;

        Ok(Self {
            id,
            channels,
            spike_train,
        })
    }

    /// Zero-based id; the tetrode file `<session>.<id + 1>` holds its spikes.
    pub fn id(&self) -> ChannelGroupId {
        self.id
    }

    pub fn channels(&self) -> &[Channel] {
        &self.channels
    }

    pub fn spike_train(&self) -> &SpikeTrain {
        &self.spike_train
    }

    /// The header of the tetrode file.
    pub fn attributes(&self) -> &Attributes {
        &self.spike_train.attributes
    }
}

fn decode_spike_train(
    body: &[u8],
    layout: &SpikeLayout,
    channels: &[Channel],
    adc_fullscale_uv: f64,
    attributes: Attributes,
) -> Result<SpikeTrain> {
    check_body_length(body, layout.record_count(), layout.record_size())?;

    let (_, records) = spike_records(body, layout)
        .map_err(|e| AxonaError::CorruptRecordError(format!("could not decode spike records: {e}")))?;

    // every channel of a spike carries the same timestamp, take the first
    let times: Vec<f64> = records
        .iter()
        .step_by(layout.num_chans)
        .map(|record| record.timestamp as f64 / layout.timebase)
        .collect();
    check_non_decreasing(&times, "spike")?;

    let mut waveforms = Vec::with_capacity(layout.record_count() * layout.samples_per_spike);
    for (i, record) in records.iter().enumerate() {
        let gain = channels[i % layout.num_chans].gain;
        waveforms.extend(
            record
                .samples
                .iter()
                .map(|&raw| -scale_to_microvolts(raw, layout.bytes_per_sample, adc_fullscale_uv, gain)),
        );
    }

    Ok(SpikeTrain {
        times,
        waveforms,
        channel_count: layout.num_chans,
        samples_per_spike: layout.samples_per_spike,
        sample_rate: layout.sample_rate,
        attributes,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ErrorKind;

    fn header() -> RecordingHeader {
        RecordingHeader::from_text(
            "ADC_fullscale_mv 1500\r\nduration 1\r\ntracked_spots 1\r\n\
             gain_ch_4 3000\r\ngain_ch_5 6000\r\n",
        )
        .unwrap()
    }

    fn tetrode_file(num_spikes: usize, body: &[u8]) -> Vec<u8> {
        let mut bytes = format!(
            "num_chans 2\r\ntimebase 96000 hz\r\nbytes_per_timestamp 4\r\nsamples_per_spike 2\r\n\
             bytes_per_sample 1\r\nnum_spikes {num_spikes}\r\ndata_start"
        )
        .into_bytes();
        bytes.extend_from_slice(body);
        bytes.extend_from_slice(b"\r\ndata_end\r\n");
        bytes
    }

    const TWO_SPIKES: [u8; 24] = [
        0x00, 0x00, 0x00, 0x60, 0x40, 0xC0, // spike 0, channel 0 at 96 ticks
        0x00, 0x00, 0x00, 0x60, 0x20, 0x00, // spike 0, channel 1
        0x00, 0x01, 0x77, 0x00, 0x80, 0x01, // spike 1, channel 0 at 96000 ticks
        0x00, 0x01, 0x77, 0x00, 0x7F, 0xFF, // spike 1, channel 1
    ];

    #[test]
    #[allow(clippy::float_cmp)] // all values are exact binary fractions
    fn test_channel_group() {
        let group = ChannelGroup::from_bytes(&tetrode_file(2, &TWO_SPIKES), 1, 4, &header()).unwrap();

        assert_eq!(group.id(), 1);
        assert_eq!(group.channels().len(), 2);
        assert_eq!(group.channels()[0].index, 4);
        assert_eq!(group.channels()[1].name, "channel_5_channel_group_1_internal_1");
        assert_eq!(group.channels()[1].gain, 6000.0);

        let spike_train = group.spike_train();
        assert_eq!(spike_train.times(), &[0.001, 1.0]);
        assert_eq!(spike_train.channel_count(), 2);
        assert_eq!(spike_train.samples_per_spike(), 2);
        assert_eq!(group.attributes().get_str("num_spikes"), Some("2"));

        // raw / 128 * 1.5e6 uV / gain, sign flipped
        let spike = spike_train.spike(0).unwrap();
        assert_eq!(spike.channel(0), Some(&[-250.0, 250.0][..]));
        assert_eq!(spike.channel(1), Some(&[-62.5, -0.0][..]));

        let spike = spike_train.spike(1).unwrap();
        assert_eq!(spike.waveform()[0], 500.0);
    }

    #[test]
    fn test_truncated_tetrode_file() {
        let err = ChannelGroup::from_bytes(&tetrode_file(2, &TWO_SPIKES[..23]), 1, 0, &header()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::CorruptRecord);
    }

    #[test]
    fn test_fewer_records_than_declared() {
        let err = ChannelGroup::from_bytes(&tetrode_file(3, &TWO_SPIKES), 1, 0, &header()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::CorruptRecord);
    }

    #[test]
    fn test_decreasing_spike_times() {
        let mut body = TWO_SPIKES;
        // move spike 1 to tick 0, before spike 0
        body[13] = 0x00;
        body[14] = 0x00;
        let err = ChannelGroup::from_bytes(&tetrode_file(2, &body), 1, 0, &header()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::CorruptRecord);
    }

    #[test]
    fn test_missing_gain() {
        let err = ChannelGroup::from_bytes(&tetrode_file(2, &TWO_SPIKES), 0, 0, &header()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Format);
    }
}
