// structure of a continuous record:
// [Channel 1] [Channel 2] ... [Channel N]
// [little endian signed] ...
// [bytes_per_sample] ... (N = num_chans)

use nom::{error::context, multi, IResult};
use tracing::instrument;

use crate::layout::SignalLayout;

use super::values::le_signed;

// the records are contiguous, so the whole body is read as one flat run of samples
#[instrument(level = "trace", skip(input))]
pub(crate) fn signal_samples<'a>(input: &'a [u8], layout: &SignalLayout) -> IResult<&'a [u8], Vec<i64>> {
    context(
        "signal samples",
        multi::count(
            |i| le_signed(i, layout.bytes_per_sample),
            layout.sample_count.saturating_mul(layout.num_chans),
        ),
    )(input)
}

#[test]
fn test_signal_samples() {
    let layout = SignalLayout {
        kind: crate::SignalKind::Egf,
        sample_count: 3,
        num_chans: 1,
        bytes_per_sample: 2,
        sample_rate: 4800.0,
    };
    let input = [0x01, 0x00, 0xFF, 0xFF, 0x00, 0x80];

    let (rest, samples) = signal_samples(&input, &layout).unwrap();

    assert!(rest.is_empty());
    assert_eq!(samples, vec![1, -1, -32768]);
}
