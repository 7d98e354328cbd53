// structure of an input record:
// [Timestamp] [Type] [Value]
// [big endian signed] [ASCII tag, padded] [raw bytes]
// [bytes_per_timestamp] [bytes_per_type] [bytes_per_value]

use nom::{bytes::complete::take, error::context, multi, IResult};
use tracing::instrument;

use crate::layout::InputLayout;

use super::values::be_signed;

#[derive(Debug, PartialEq)]
pub(crate) struct InputRecord<'a> {
    pub(crate) timestamp: i64,
    pub(crate) event_type: &'a [u8],
    pub(crate) value: &'a [u8],
}

fn input_record<'a>(input: &'a [u8], layout: &InputLayout) -> IResult<&'a [u8], InputRecord<'a>> {
    let (input, timestamp) = context("input timestamp", |i| be_signed(i, layout.bytes_per_timestamp))(input)?;
    let (input, event_type) = context("input type", take(layout.bytes_per_type))(input)?;
    let (input, value) = context("input value", take(layout.bytes_per_value))(input)?;

    Ok((
        input,
        InputRecord {
            timestamp,
            event_type,
            value,
        },
    ))
}

// the header does not count output events, so the record count is derived from the body length
#[instrument(level = "trace", skip(input))]
pub(crate) fn input_records<'a>(
    input: &'a [u8],
    layout: &InputLayout,
    count: usize,
) -> IResult<&'a [u8], Vec<InputRecord<'a>>> {
    context("input records", multi::count(|i| input_record(i, layout), count))(input)
}

#[test]
fn test_input_records() {
    let layout = InputLayout {
        bytes_per_timestamp: 4,
        bytes_per_type: 1,
        bytes_per_value: 2,
        timebase: 1000.0,
        duration: 10.0,
        num_inp_samples: 1,
    };
    let input = [
        0x00, 0x00, 0x03, 0xE8, b'I', 0x00, 0x01, // input at 1000 ticks
        0x00, 0x00, 0x07, 0xD0, b'K', 0x00, 0x61, // keypress at 2000 ticks
    ];

    let (rest, records) = input_records(&input, &layout, 2).unwrap();

    assert!(rest.is_empty());
    assert_eq!(records.len(), 2);
    assert_eq!(records[0].timestamp, 1000);
    assert_eq!(records[0].event_type, b"I");
    assert_eq!(records[0].value, &[0x00, 0x01]);
    assert_eq!(records[1].timestamp, 2000);
    assert_eq!(records[1].event_type, b"K");
}
