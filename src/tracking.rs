use log::debug;

use crate::{
    errors::{AxonaError, Result},
    layout::PositionLayout,
    parsers::{check_body_length, data_file, position_records},
    util::check_non_decreasing,
    Attributes,
};

/// The tracking system writes this value for a coordinate it lost.
const MISSING_COORD: i64 = 1023;

/// LED positions from a `.pos` file.
///
/// Every row holds an x and a y for each tracked spot, normalised by the
/// width and height of the tracking window. Rows where the tracker lost any
/// spot are all NaN but are kept, so that rows line up with `times`.
#[derive(Debug, Clone, PartialEq)]
pub struct Tracking {
    times: Vec<f64>,
    positions: Vec<f64>,
    pixel_counts: Vec<[i32; 2]>,
    tracked_spots: usize,
    sample_rate: f64,
    eeg_samples_per_position: Option<f64>,
    attributes: Attributes,
}

impl Tracking {
    /// Decodes a tracking file. The number of tracked spots is not in the
    /// file itself and comes from the `.set` header.
    pub fn from_bytes(bytes: &[u8], tracked_spots: usize) -> Result<Self> {
        let data_file = data_file(bytes)?;
        let layout = PositionLayout::from_attributes(&data_file.attributes, tracked_spots)?;

        check_body_length(data_file.body, layout.num_pos_samples, layout.record_size())?;
        let (_, records) = position_records(data_file.body, &layout)
            .map_err(|e| AxonaError::CorruptRecordError(format!("could not decode position records: {e}")))?;

        let times: Vec<f64> = records.iter().map(|r| r.timestamp as f64 / layout.timebase).collect();
        check_non_decreasing(&times, "position")?;

        let mut positions = Vec::with_capacity(records.len() * layout.coords_per_record());
        let mut lost = 0;
        for record in &records {
            if record.coords.contains(&MISSING_COORD) {
                lost += 1;
                positions.extend(std::iter::repeat(f64::NAN).take(record.coords.len()));
                continue;
            }
            positions.extend(record.coords.iter().enumerate().map(|(i, &coord)| {
                let span = if i % 2 == 0 { layout.x_span } else { layout.y_span };
                coord as f64 / span
            }));
        }
        if lost > 0 {
            debug!("{lost} of {} position samples have lost LEDs", records.len());
        }

        Ok(Self {
            times,
            positions,
            pixel_counts: records.iter().map(|r| r.pixel_counts).collect(),
            tracked_spots: layout.tracked_spots,
            sample_rate: layout.sample_rate,
            eeg_samples_per_position: layout.eeg_samples_per_position,
            attributes: data_file.attributes,
        })
    }

    /// Sample times in seconds.
    pub fn times(&self) -> &[f64] {
        &self.times
    }

    /// All positions, flat, row-major: `x1 y1 x2 y2 ...` per sample.
    pub fn position_data(&self) -> &[f64] {
        &self.positions
    }

    /// Values per row, an x and a y for every tracked spot.
    pub fn row_len(&self) -> usize {
        self.tracked_spots * 2
    }

    pub fn position(&self, index: usize) -> Option<&[f64]> {
        let len = self.row_len();
        self.positions.get(index * len..(index + 1) * len)
    }

    pub fn positions(&self) -> impl Iterator<Item = &[f64]> {
        self.positions.chunks_exact(self.row_len())
    }

    /// Pixel counts of the first two spots, per sample.
    pub fn pixel_counts(&self) -> &[[i32; 2]] {
        &self.pixel_counts
    }

    pub fn len(&self) -> usize {
        self.times.len()
    }

    pub fn is_empty(&self) -> bool {
        self.times.is_empty()
    }

    pub fn tracked_spots(&self) -> usize {
        self.tracked_spots
    }

    /// Sample rate in Hz.
    pub fn sample_rate(&self) -> f64 {
        self.sample_rate
    }

    pub fn eeg_samples_per_position(&self) -> Option<f64> {
        self.eeg_samples_per_position
    }

    /// The header of the tracking file.
    pub fn attributes(&self) -> &Attributes {
        &self.attributes
    }
}
