mod attributes;
mod cut;
mod envelope;
mod input;
mod positions;
mod signal;
mod spikes;
mod values;

pub(crate) use cut::cut_file;
pub(crate) use envelope::{check_body_length, data_file, header_text};
pub(crate) use input::input_records;
pub(crate) use positions::position_records;
pub(crate) use signal::signal_samples;
pub(crate) use spikes::spike_records;
