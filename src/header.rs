use chrono::NaiveDateTime;
use log::debug;

use crate::{
    errors::{AxonaError, Result},
    parsers::header_text,
    Attributes, ChannelGroupId,
};

const TRIAL_DATETIME_FORMAT: &str = "%A, %d %b %Y %H:%M:%S";

/// The parsed `.set` file of a recording.
///
/// Holds everything the data file parsers need from the session as a whole:
/// the ADC fullscale and per-channel gains for calibration, the number of
/// tracked LEDs, and the mapping from continuous files to channels.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordingHeader {
    attributes: Attributes,
    adc_fullscale_uv: f64,
    duration: f64,
    tracked_spots: usize,
    start_datetime: Option<NaiveDateTime>,
    raw_sample_rate: Option<f64>,
    active_channel_groups: Option<Vec<ChannelGroupId>>,
}

/// Where a continuous file's samples come from, resolved through the `.set` header.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EegChannel {
    /// Channel after referencing (`EEG_ch_<n>`).
    pub final_channel: usize,
    /// Channel that was recorded (`ref_<b_in_ch>`).
    pub channel_id: usize,
    pub gain: f64,
}

impl RecordingHeader {
    pub fn from_text(text: &str) -> Result<Self> {
        let attributes = header_text(text)?;
        Self::from_attributes(attributes)
    }

    pub fn from_attributes(attributes: Attributes) -> Result<Self> {
        let adc_fullscale_mv: f64 = attributes.require("ADC_fullscale_mv")?;
        let duration: f64 = attributes.require("duration")?;
        let tracked_spots: usize = attributes.require("tracked_spots")?;
        let raw_sample_rate = attributes.get("rawRate")?;

        let start_datetime = match (attributes.get_str("trial_date"), attributes.get_str("trial_time")) {
            (Some(date), Some(time)) => Some(
                NaiveDateTime::parse_from_str(&format!("{date} {time}"), TRIAL_DATETIME_FORMAT).map_err(|e| {
                    AxonaError::FormatError(format!("malformed trial_date '{date}' or trial_time '{time}': {e}"))
                })?,
            ),
            _ => None,
        };

        let active_channel_groups = active_channel_groups(&attributes)?;
        debug!(
            "recording header: {} keys, {} s, active channel groups {:?}",
            attributes.len(),
            duration,
            active_channel_groups
        );

        Ok(Self {
            attributes,
            adc_fullscale_uv: adc_fullscale_mv * 1000.0,
            duration,
            tracked_spots,
            start_datetime,
            raw_sample_rate,
            active_channel_groups,
        })
    }

    pub fn attributes(&self) -> &Attributes {
        &self.attributes
    }

    /// ADC fullscale in microvolts.
    pub fn adc_fullscale_uv(&self) -> f64 {
        self.adc_fullscale_uv
    }

    /// Duration of the recording in seconds.
    pub fn duration(&self) -> f64 {
        self.duration
    }

    /// Number of LEDs in the tracking file.
    pub fn tracked_spots(&self) -> usize {
        self.tracked_spots
    }

    pub fn start_datetime(&self) -> Option<NaiveDateTime> {
        self.start_datetime
    }

    /// Sample rate of the raw signal in Hz, if declared.
    pub fn raw_sample_rate(&self) -> Option<f64> {
        self.raw_sample_rate
    }

    /// Channel groups switched on in the `collectMask_<n>` keys, sorted.
    /// `None` if the header has no such keys.
    pub fn active_channel_groups(&self) -> Option<&[ChannelGroupId]> {
        self.active_channel_groups.as_deref()
    }

    /// Gain of a global channel index (`gain_ch_<n>`).
    pub fn gain(&self, channel: usize) -> Result<f64> {
        let key = format!("gain_ch_{channel}");
        let gain: f64 = self.attributes.require(&key)?;

        if !(gain.is_finite() && gain > 0.0) {
            return Err(AxonaError::FormatError(format!("{key} must be positive, got {gain}")));
        }
        Ok(gain)
    }

    /// Resolves the channel and gain of the continuous file with the given numeric suffix.
    pub fn eeg_channel(&self, suffix: u32) -> Result<EegChannel> {
        let final_channel: usize = self.attributes.require(&format!("EEG_ch_{suffix}"))?;
        let reference: usize = self.attributes.require(&format!("b_in_ch_{final_channel}"))?;
        let channel_id: usize = self.attributes.require(&format!("ref_{reference}"))?;

        Ok(EegChannel {
            final_channel,
            channel_id,
            gain: self.gain(final_channel)?,
        })
    }
}

fn active_channel_groups(attributes: &Attributes) -> Result<Option<Vec<ChannelGroupId>>> {
    let mut declared = false;
    let mut active = Vec::new();

    for (key, _) in attributes.iter() {
        let Some(tetrode) = key.strip_prefix("collectMask_") else {
            continue;
        };
        let tetrode: ChannelGroupId = tetrode
            .parse()
            .ok()
            .filter(|&n| n >= 1)
            .ok_or_else(|| AxonaError::FormatError(format!("invalid tetrode number in '{key}'")))?;

        declared = true;
        if attributes.require::<u32>(key)? == 1 {
            active.push(tetrode - 1);
        }
    }

    active.sort_unstable();
    Ok(declared.then_some(active))
}
