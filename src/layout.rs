//! Record layouts derived from the header of each data file.
//!
//! Every binary field width in an Axona file is declared in that file's
//! header. The layouts collect those declarations in one place and are passed
//! explicitly to the record parsers.

use crate::{
    errors::{AxonaError, Result},
    Attributes,
};

/// Pixel counts follow the coordinates in every position record: two big endian i32.
pub(crate) const PIXEL_COUNT_BYTES: usize = 8;

fn width(attributes: &Attributes, key: &str, default: Option<usize>) -> Result<usize> {
    let width: usize = match default {
        Some(default) => attributes.get_or(key, default)?,
        None => attributes.require(key)?,
    };

    if !(1..=4).contains(&width) {
        return Err(AxonaError::FormatError(format!(
            "{key} is {width}, but only widths of 1 to 4 bytes are supported"
        )));
    }
    Ok(width)
}

fn positive(key: &str, value: usize) -> Result<usize> {
    if value == 0 {
        return Err(AxonaError::FormatError(format!("{key} must be at least 1")));
    }
    Ok(value)
}

fn positive_rate(key: &str, rate: f64) -> Result<f64> {
    if !(rate.is_finite() && rate > 0.0) {
        return Err(AxonaError::FormatError(format!("{key} must be a positive rate, got {rate}")));
    }
    Ok(rate)
}

fn positive_span(what: &str, span: f64) -> Result<f64> {
    if !(span.is_finite() && span > 0.0) {
        return Err(AxonaError::FormatError(format!("tracking window {what} must be positive, got {span}")));
    }
    Ok(span)
}

/// Layout of a tetrode (`.N`) file.
#[derive(Debug, Clone, PartialEq)]
pub struct SpikeLayout {
    pub num_spikes: usize,
    pub num_chans: usize,
    pub bytes_per_timestamp: usize,
    pub bytes_per_sample: usize,
    pub samples_per_spike: usize,
    /// Ticks per second of the timestamps.
    pub timebase: f64,
    /// Sample rate of the waveforms.
    pub sample_rate: f64,
}

impl SpikeLayout {
    pub fn from_attributes(attributes: &Attributes) -> Result<Self> {
        Ok(Self {
            num_spikes: attributes.get_or("num_spikes", 0)?,
            num_chans: positive("num_chans", attributes.get_or("num_chans", 1)?)?,
            bytes_per_timestamp: width(attributes, "bytes_per_timestamp", Some(4))?,
            bytes_per_sample: width(attributes, "bytes_per_sample", Some(1))?,
            samples_per_spike: positive("samples_per_spike", attributes.get_or("samples_per_spike", 50)?)?,
            timebase: positive_rate("timebase", attributes.rate_or("timebase", 96000.0)?)?,
            sample_rate: positive_rate("rawrate", attributes.rate_or("rawrate", 48000.0)?)?,
        })
    }

    /// One record holds one channel of one spike.
    pub fn record_size(&self) -> usize {
        self.bytes_per_timestamp
            .saturating_add(self.samples_per_spike.saturating_mul(self.bytes_per_sample))
    }

    pub fn record_count(&self) -> usize {
        self.num_spikes.saturating_mul(self.num_chans)
    }
}

/// Layout of a tracking (`.pos`) file.
#[derive(Debug, Clone, PartialEq)]
pub struct PositionLayout {
    pub num_pos_samples: usize,
    pub bytes_per_timestamp: usize,
    pub bytes_per_coord: usize,
    /// Number of LEDs, taken from the `.set` header.
    pub tracked_spots: usize,
    pub timebase: f64,
    pub sample_rate: f64,
    pub x_span: f64,
    pub y_span: f64,
    pub eeg_samples_per_position: Option<f64>,
}

impl PositionLayout {
    pub fn from_attributes(attributes: &Attributes, tracked_spots: usize) -> Result<Self> {
        let window_min_x: f64 = attributes.require("window_min_x")?;
        let window_max_x: f64 = attributes.require("window_max_x")?;
        let window_min_y: f64 = attributes.require("window_min_y")?;
        let window_max_y: f64 = attributes.require("window_max_y")?;

        Ok(Self {
            num_pos_samples: attributes.require("num_pos_samples")?,
            bytes_per_timestamp: width(attributes, "bytes_per_timestamp", None)?,
            bytes_per_coord: width(attributes, "bytes_per_coord", None)?,
            tracked_spots: positive("tracked_spots", tracked_spots)?,
            timebase: positive_rate("timebase", attributes.rate("timebase")?)?,
            sample_rate: positive_rate("sample_rate", attributes.rate("sample_rate")?)?,
            x_span: positive_span("window_max_x - window_min_x", window_max_x - window_min_x)?,
            y_span: positive_span("window_max_y - window_min_y", window_max_y - window_min_y)?,
            eeg_samples_per_position: attributes.get("EEG_samples_per_position")?,
        })
    }

    /// Coordinates per record: an x and a y for every tracked spot.
    pub fn coords_per_record(&self) -> usize {
        self.tracked_spots.saturating_mul(2)
    }

    pub fn record_size(&self) -> usize {
        self.bytes_per_timestamp
            .saturating_add(self.coords_per_record().saturating_mul(self.bytes_per_coord))
            .saturating_add(PIXEL_COUNT_BYTES)
    }
}

/// The two kinds of continuous files.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum SignalKind {
    /// `.eeg`: low rate, usually one byte per sample.
    Eeg,
    /// `.egf`: high rate, usually two bytes per sample.
    Egf,
}

impl SignalKind {
    pub fn extension(self) -> &'static str {
        match self {
            Self::Eeg => "eeg",
            Self::Egf => "egf",
        }
    }

    fn sample_count_key(self) -> &'static str {
        match self {
            Self::Eeg => "num_EEG_samples",
            Self::Egf => "num_EGF_samples",
        }
    }
}

/// Layout of a continuous (`.eeg`, `.egf`) file.
#[derive(Debug, Clone, PartialEq)]
pub struct SignalLayout {
    pub kind: SignalKind,
    pub sample_count: usize,
    pub num_chans: usize,
    pub bytes_per_sample: usize,
    pub sample_rate: f64,
}

impl SignalLayout {
    pub fn from_attributes(attributes: &Attributes, kind: SignalKind) -> Result<Self> {
        Ok(Self {
            kind,
            sample_count: attributes.require(kind.sample_count_key())?,
            num_chans: positive("num_chans", attributes.get_or("num_chans", 1)?)?,
            bytes_per_sample: width(attributes, "bytes_per_sample", None)?,
            sample_rate: positive_rate("sample_rate", attributes.rate("sample_rate")?)?,
        })
    }

    /// One record holds one sample of every channel in the file.
    pub fn record_size(&self) -> usize {
        self.num_chans.saturating_mul(self.bytes_per_sample)
    }
}

/// Layout of an input (`.inp`) file.
#[derive(Debug, Clone, PartialEq)]
pub struct InputLayout {
    pub bytes_per_timestamp: usize,
    pub bytes_per_type: usize,
    pub bytes_per_value: usize,
    pub timebase: f64,
    pub duration: f64,
    /// Declared number of input samples. Outputs are not included, so this is not the record count.
    pub num_inp_samples: usize,
}

impl InputLayout {
    pub fn from_attributes(attributes: &Attributes) -> Result<Self> {
        Ok(Self {
            bytes_per_timestamp: width(attributes, "bytes_per_timestamp", None)?,
            bytes_per_type: positive("bytes_per_type", attributes.require("bytes_per_type")?)?,
            bytes_per_value: positive("bytes_per_value", attributes.require("bytes_per_value")?)?,
            timebase: positive_rate("timebase", attributes.rate("timebase")?)?,
            duration: attributes.require("duration")?,
            num_inp_samples: attributes.require("num_inp_samples")?,
        })
    }

    pub fn record_size(&self) -> usize {
        self.bytes_per_timestamp
            .saturating_add(self.bytes_per_type)
            .saturating_add(self.bytes_per_value)
    }
}
