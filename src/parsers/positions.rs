// structure of a position record:
// [Timestamp] [X1] [Y1] [X2] [Y2] ... [PixelCount1] [PixelCount2]
// [big endian signed] [big endian signed] ... [big endian i32] [big endian i32]
// [bytes_per_timestamp] [bytes_per_coord] ... [4] [4]

use nom::{error::context, multi, number::complete::be_i32, sequence::pair, IResult};
use tracing::instrument;

use crate::layout::PositionLayout;

use super::values::be_signed;

#[derive(Debug, PartialEq)]
pub(crate) struct PositionRecord {
    pub(crate) timestamp: i64,
    pub(crate) coords: Vec<i64>,
    pub(crate) pixel_counts: [i32; 2],
}

fn position_record<'a>(input: &'a [u8], layout: &PositionLayout) -> IResult<&'a [u8], PositionRecord> {
    let (input, timestamp) = context("position timestamp", |i| be_signed(i, layout.bytes_per_timestamp))(input)?;
    let (input, coords) = context(
        "position coords",
        multi::count(|i| be_signed(i, layout.bytes_per_coord), layout.coords_per_record()),
    )(input)?;
    let (input, (pixels_1, pixels_2)) = context("position pixel counts", pair(be_i32, be_i32))(input)?;

    Ok((
        input,
        PositionRecord {
            timestamp,
            coords,
            pixel_counts: [pixels_1, pixels_2],
        },
    ))
}

#[instrument(level = "trace", skip(input))]
pub(crate) fn position_records<'a>(
    input: &'a [u8],
    layout: &PositionLayout,
) -> IResult<&'a [u8], Vec<PositionRecord>> {
    context(
        "position records",
        multi::count(|i| position_record(i, layout), layout.num_pos_samples),
    )(input)
}

#[test]
fn test_position_records() {
    let layout = PositionLayout {
        num_pos_samples: 1,
        bytes_per_timestamp: 4,
        bytes_per_coord: 2,
        tracked_spots: 1,
        timebase: 50.0,
        sample_rate: 50.0,
        x_span: 100.0,
        y_span: 100.0,
        eeg_samples_per_position: None,
    };
    let input = [
        0x00, 0x00, 0x00, 0x07, // timestamp
        0x00, 0x10, 0x03, 0xFF, // x, y
        0x00, 0x00, 0x00, 0x05, 0xFF, 0xFF, 0xFF, 0xFF, // pixel counts
    ];

    let (rest, records) = position_records(&input, &layout).unwrap();

    assert!(rest.is_empty());
    assert_eq!(
        records,
        vec![PositionRecord {
            timestamp: 7,
            coords: vec![16, 1023],
            pixel_counts: [5, -1],
        }]
    );
}
