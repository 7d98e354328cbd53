// structure of a tetrode record, one per channel per spike:
// [Timestamp] [Sample 1] [Sample 2] ... [Sample N]
// [big endian unsigned] [little endian signed] ...
// [bytes_per_timestamp] [bytes_per_sample] ... (N = samples_per_spike)

use nom::{error::context, multi, IResult};
use tracing::instrument;

use crate::layout::SpikeLayout;

use super::values::{be_unsigned, le_signed};

#[derive(Debug, PartialEq)]
pub(crate) struct SpikeRecord {
    pub(crate) timestamp: u64,
    pub(crate) samples: Vec<i64>,
}

fn spike_record<'a>(input: &'a [u8], layout: &SpikeLayout) -> IResult<&'a [u8], SpikeRecord> {
    let (input, timestamp) = context("spike timestamp", |i| be_unsigned(i, layout.bytes_per_timestamp))(input)?;
    let (input, samples) = context(
        "spike samples",
        multi::count(|i| le_signed(i, layout.bytes_per_sample), layout.samples_per_spike),
    )(input)?;

    Ok((input, SpikeRecord { timestamp, samples }))
}

#[instrument(level = "trace", skip(input))]
pub(crate) fn spike_records<'a>(input: &'a [u8], layout: &SpikeLayout) -> IResult<&'a [u8], Vec<SpikeRecord>> {
    context(
        "spike records",
        multi::count(|i| spike_record(i, layout), layout.record_count()),
    )(input)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn layout(num_spikes: usize, num_chans: usize) -> SpikeLayout {
        SpikeLayout {
            num_spikes,
            num_chans,
            bytes_per_timestamp: 4,
            bytes_per_sample: 1,
            samples_per_spike: 3,
            timebase: 96000.0,
            sample_rate: 48000.0,
        }
    }

    #[test]
    fn test_spike_records() {
        let input = [
            0x00, 0x00, 0x01, 0x00, 0x01, 0xFF, 0x80, // channel 0
            0x00, 0x00, 0x01, 0x00, 0x02, 0x03, 0x7F, // channel 1
        ];
        let (rest, records) = spike_records(&input, &layout(1, 2)).unwrap();

        assert!(rest.is_empty());
        assert_eq!(
            records,
            vec![
                SpikeRecord {
                    timestamp: 256,
                    samples: vec![1, -1, -128],
                },
                SpikeRecord {
                    timestamp: 256,
                    samples: vec![2, 3, 127],
                },
            ]
        );
    }

    #[test]
    fn test_truncated_record() {
        let input = [0x00, 0x00, 0x01, 0x00, 0x01, 0xFF];
        assert!(spike_records(&input, &layout(1, 1)).is_err());
    }
}
