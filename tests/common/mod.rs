//! Synthetic Axona recordings written to a temporary directory.

#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};

pub const SESSION: &str = "rec";

static COUNTER: AtomicUsize = AtomicUsize::new(0);

/// A recording directory that is removed again when dropped.
pub struct Bundle {
    dir: PathBuf,
}

impl Bundle {
    pub fn empty(name: &str) -> Self {
        let dir = std::env::temp_dir().join(format!(
            "axona_{name}_{}_{}",
            std::process::id(),
            COUNTER.fetch_add(1, Ordering::Relaxed)
        ));
        fs::create_dir_all(&dir).unwrap();
        Self { dir }
    }

    /// A complete recording: two channel groups with cuts, two `.eeg` files, one `.egf`, tracking and inputs.
    pub fn complete(name: &str) -> Self {
        let bundle = Self::empty(name);

        bundle.write(&format!("{SESSION}.set"), SET.as_bytes());
        bundle.write_data_file(&format!("{SESSION}.1"), &tetrode_header(3), &tetrode_body(&GROUP_0_SPIKES));
        bundle.write_data_file(&format!("{SESSION}.2"), &tetrode_header(1), &tetrode_body(&GROUP_1_SPIKES));
        bundle.write(&format!("{SESSION}_1.cut"), CUT_1.as_bytes());
        bundle.write(&format!("{SESSION}_2.cut"), CUT_2.as_bytes());
        bundle.write_data_file(
            &format!("{SESSION}.eeg"),
            &signal_header("EEG", 4, 1),
            &[0x00, 0x40, 0x80, 0x7F],
        );
        bundle.write_data_file(
            &format!("{SESSION}.eeg2"),
            &signal_header("EEG", 4, 1),
            &[0x01, 0x02, 0x03, 0x04],
        );
        bundle.write_data_file(
            &format!("{SESSION}.egf"),
            &signal_header("EGF", 2, 2),
            &[0x00, 0x40, 0x00, 0xC0],
        );
        bundle.write_data_file(&format!("{SESSION}.pos"), &pos_header(3), &POS_BODY);
        bundle.write_data_file(&format!("{SESSION}.inp"), INP_HEADER, &INP_BODY);

        bundle
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn set_path(&self) -> PathBuf {
        self.dir.join(format!("{SESSION}.set"))
    }

    pub fn path(&self, name: &str) -> PathBuf {
        self.dir.join(name)
    }

    pub fn write(&self, name: &str, bytes: &[u8]) {
        fs::write(self.dir.join(name), bytes).unwrap();
    }

    pub fn write_data_file(&self, name: &str, header: &str, body: &[u8]) {
        self.write(name, &data_file(header, body));
    }

    pub fn remove(&self, name: &str) {
        fs::remove_file(self.dir.join(name)).unwrap();
    }
}

impl Drop for Bundle {
    fn drop(&mut self) {
        let _ = fs::remove_dir_all(&self.dir);
    }
}

pub fn data_file(header: &str, body: &[u8]) -> Vec<u8> {
    let mut bytes = header.as_bytes().to_vec();
    bytes.extend_from_slice(b"data_start");
    bytes.extend_from_slice(body);
    bytes.extend_from_slice(b"\r\ndata_end\r\n");
    bytes
}

pub const SET: &str = "trial_date Thursday, 31 Oct 2013\r\n\
                       trial_time 14:27:48\r\n\
                       experimenter test\r\n\
                       comments\r\n\
                       ADC_fullscale_mv 1500\r\n\
                       duration 2\r\n\
                       tracked_spots 1\r\n\
                       rawRate 48000\r\n\
                       gain_ch_0 3000\r\n\
                       gain_ch_1 6000\r\n\
                       gain_ch_2 1000\r\n\
                       gain_ch_3 500\r\n\
                       gain_ch_4 3000\r\n\
                       gain_ch_5 3000\r\n\
                       EEG_ch_1 2\r\n\
                       EEG_ch_2 3\r\n\
                       b_in_ch_2 1\r\n\
                       b_in_ch_3 2\r\n\
                       ref_1 5\r\n\
                       ref_2 6\r\n";

pub fn tetrode_header(num_spikes: usize) -> String {
    format!(
        "trial_date Thursday, 31 Oct 2013\r\nnum_chans 2\r\ntimebase 96000 hz\r\nbytes_per_timestamp 4\r\n\
         samples_per_spike 2\r\nbytes_per_sample 1\r\nrawrate 48000\r\nnum_spikes {num_spikes}\r\n"
    )
}

/// Spike timestamps and `[channel][sample]` raw values.
pub type RawSpike = (u32, [[i8; 2]; 2]);

pub const GROUP_0_SPIKES: [RawSpike; 3] = [
    (96, [[64, -64], [32, 0]]),
    (960, [[-128, 1], [127, -1]]),
    (96_000, [[0, 0], [16, 16]]),
];

pub const GROUP_1_SPIKES: [RawSpike; 1] = [(48_000, [[8, 8], [8, 8]])];

pub fn tetrode_body(spikes: &[RawSpike]) -> Vec<u8> {
    let mut body = Vec::new();
    for (timestamp, channels) in spikes {
        for samples in channels {
            body.extend_from_slice(&timestamp.to_be_bytes());
            body.extend(samples.iter().map(|&s| s as u8));
        }
    }
    body
}

pub const CUT_1: &str = "n_clusters: 2\n\
                         n_channels: 2\n\
                         n_params: 2\n\
                         Exact_cut_for: rec spikes: 3\n\
                         1 0 2\n";

pub const CUT_2: &str = "n_clusters: 1\nExact_cut_for: rec spikes: 1\n1\n";

pub fn signal_header(kind: &str, samples: usize, bytes_per_sample: usize) -> String {
    format!(
        "sample_rate 2.0 hz\r\nEEG_samples_per_position 5\r\nbytes_per_sample {bytes_per_sample}\r\n\
         num_chans 1\r\nnum_{kind}_samples {samples}\r\n"
    )
}

pub fn pos_header(num_pos_samples: usize) -> String {
    format!(
        "timebase 50 hz\r\nsample_rate 50.0 hz\r\nEEG_samples_per_position 5\r\n\
         window_min_x 0\r\nwindow_max_x 400\r\nwindow_min_y 0\r\nwindow_max_y 200\r\n\
         bytes_per_timestamp 4\r\nbytes_per_coord 2\r\npixels_per_metre 400\r\nnum_pos_samples {num_pos_samples}\r\n"
    )
}

/// Three position samples; the second one has lost its LED.
pub const POS_BODY: [u8; 48] = [
    0x00, 0x00, 0x00, 0x00, 0x00, 0x64, 0x00, 0x32, 0x00, 0x00, 0x00, 0x10, 0x00, 0x00, 0x00, 0x00, //
    0x00, 0x00, 0x00, 0x01, 0x03, 0xFF, 0x00, 0x32, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, //
    0x00, 0x00, 0x00, 0x02, 0x00, 0xC8, 0x00, 0x64, 0x00, 0x00, 0x00, 0x11, 0x00, 0x00, 0x00, 0x00, //
];

pub const INP_HEADER: &str = "timebase 1000 hz\r\nduration 2\r\nnum_inp_samples 1\r\nbytes_per_timestamp 4\r\n\
                              bytes_per_type 1\r\nbytes_per_value 2\r\n";

pub const INP_BODY: [u8; 14] = [
    0x00, 0x00, 0x01, 0xF4, b'I', 0x00, 0x01, // input at 0.5 s
    0x00, 0x00, 0x05, 0xDC, b'K', 0x00, 0x61, // keypress at 1.5 s
];
