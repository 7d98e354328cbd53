#![forbid(unsafe_code)]
#![deny(nonstandard_style)]
#![warn(array_into_iter)]
#![crate_type = "lib"]

//! Read Axona recordings
//!
//! An Axona recording is a set of files sharing one base name: a `.set`
//! header, tetrode files `.1`, `.2`, ..., cluster cuts `_1.cut`, ...,
//! continuous `.eeg`/`.egf` files, a `.pos` tracking file and an `.inp`
//! input event file.
//!
//! [`AxonaFile::open`] parses only the `.set` header. Every other file is
//! read the first time its view is requested and kept for later calls.
//!
//! ```no_run
//! let recording = axona::AxonaFile::open("data/session.set")?;
//! for group in recording.channel_groups()? {
//!     println!("group {}: {} spikes", group.id(), group.spike_train().len());
//! }
//! # Ok::<(), axona::AxonaError>(())
//! ```

use std::{
    fs,
    path::{Path, PathBuf},
};

use log::{debug, warn};

mod analog_signal;
mod attributes;
mod channel_group;
mod cut;
mod errors;
mod header;
mod input_events;
pub mod layout;
mod parsers;
mod spike_train;
mod tracking;
mod util;

pub use analog_signal::AnalogSignal;
pub use attributes::Attributes;
pub use channel_group::{Channel, ChannelGroup};
pub use cut::Cut;
pub use errors::{AxonaError, ErrorKind, Result};
pub use header::{EegChannel, RecordingHeader};
pub use input_events::{EventType, InputEvent, InputEvents};
pub use layout::SignalKind;
pub use spike_train::{Spike, SpikeTrain};
pub use tracking::Tracking;

use util::{latin1, read_file, Memo};

/// Zero-based channel group number. The tetrode file of group `id` has extension `id + 1`.
pub type ChannelGroupId = u32;

/// An open Axona recording.
///
/// Views are parsed on first access and memoized: calling a view twice
/// returns the same reference. A failed parse is not cached.
#[derive(Debug)]
pub struct AxonaFile {
    directory: PathBuf,
    session: String,
    header: RecordingHeader,
    channel_groups: Memo<Vec<ChannelGroup>>,
    cuts: Memo<Vec<Cut>>,
    analog_signals: Memo<Vec<AnalogSignal>>,
    tracking: Memo<Tracking>,
    inp_data: Memo<InputEvents>,
}

impl AxonaFile {
    /// Opens a recording by its `.set` file.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();

        if path.extension().and_then(|e| e.to_str()) != Some("set") {
            return Err(AxonaError::FormatError(format!(
                "{} is not a .set file",
                path.display()
            )));
        }
        let session = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .ok_or_else(|| AxonaError::FormatError(format!("{} has no file name", path.display())))?;
        let directory = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };

        let bytes = read_file(path)?;
        let header = RecordingHeader::from_text(&latin1(&bytes)).map_err(|e| e.in_file(path))?;
        debug!("opened recording {session} in {}", directory.display());

        Ok(Self {
            directory,
            session,
            header,
            channel_groups: Memo::default(),
            cuts: Memo::default(),
            analog_signals: Memo::default(),
            tracking: Memo::default(),
            inp_data: Memo::default(),
        })
    }

    pub fn header(&self) -> &RecordingHeader {
        &self.header
    }

    /// Base name shared by all files of the recording.
    pub fn session(&self) -> &str {
        &self.session
    }

    pub fn directory(&self) -> &Path {
        &self.directory
    }

    /// Every file of the recording, `.set` included, sorted by name.
    pub fn related_files(&self) -> Result<Vec<PathBuf>> {
        let mut files: Vec<PathBuf> = self
            .file_names()?
            .into_iter()
            .filter(|name| self.extension_of(name).is_some() || self.cut_number_of(name).is_some())
            .map(|name| self.directory.join(name))
            .collect();
        files.sort();
        Ok(files)
    }

    /// Channel groups ordered by id.
    pub fn channel_groups(&self) -> Result<&[ChannelGroup]> {
        self.channel_groups
            .get_or_try_init(|| self.load_channel_groups())
            .map(Vec::as_slice)
    }

    pub fn channel_group(&self, id: ChannelGroupId) -> Result<Option<&ChannelGroup>> {
        Ok(self.channel_groups()?.iter().find(|group| group.id() == id))
    }

    /// The channel group holding the channel with this running index.
    pub fn channel_group_for_channel(&self, index: usize) -> Result<Option<&ChannelGroup>> {
        Ok(self
            .channel_groups()?
            .iter()
            .find(|group| group.channels().iter().any(|channel| channel.index == index)))
    }

    /// Cluster cuts ordered by channel group id. Each cut is checked against its channel group.
    pub fn cuts(&self) -> Result<&[Cut]> {
        self.cuts.get_or_try_init(|| self.load_cuts()).map(Vec::as_slice)
    }

    /// Continuous signals ordered by file name.
    pub fn analog_signals(&self) -> Result<&[AnalogSignal]> {
        self.analog_signals
            .get_or_try_init(|| self.load_analog_signals())
            .map(Vec::as_slice)
    }

    pub fn tracking(&self) -> Result<&Tracking> {
        self.tracking.get_or_try_init(|| {
            let path = self.sibling("pos");
            Tracking::from_bytes(&read_file(&path)?, self.header.tracked_spots()).map_err(|e| e.in_file(&path))
        })
    }

    pub fn inp_data(&self) -> Result<&InputEvents> {
        self.inp_data.get_or_try_init(|| {
            let path = self.sibling("inp");
            InputEvents::from_bytes(&read_file(&path)?).map_err(|e| e.in_file(&path))
        })
    }

    fn sibling(&self, extension: &str) -> PathBuf {
        self.directory.join(format!("{}.{extension}", self.session))
    }

    fn file_names(&self) -> Result<Vec<String>> {
        let mut names = Vec::new();
        for entry in fs::read_dir(&self.directory)? {
            let entry = entry?;
            if entry.file_type()?.is_file() {
                names.push(entry.file_name().to_string_lossy().into_owned());
            }
        }
        Ok(names)
    }

    /// `ext` for a file named `<session>.<ext>`.
    fn extension_of<'a>(&self, name: &'a str) -> Option<&'a str> {
        name.strip_prefix(self.session.as_str())?
            .strip_prefix('.')
            .filter(|ext| !ext.is_empty())
    }

    /// `n` for a file named `<session>_<n>.cut`.
    fn cut_number_of(&self, name: &str) -> Option<u32> {
        let number = name
            .strip_prefix(self.session.as_str())?
            .strip_prefix('_')?
            .strip_suffix(".cut")?;
        if number.is_empty() || !number.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        number.parse().ok().filter(|&n| n >= 1)
    }

    /// Tetrode files to read, with the group each one belongs to.
    fn channel_group_files(&self) -> Result<Vec<(ChannelGroupId, PathBuf)>> {
        if let Some(active) = self.header.active_channel_groups() {
            return Ok(active.iter().map(|&id| (id, self.sibling(&(id + 1).to_string()))).collect());
        }

        let mut files = Vec::new();
        for name in self.file_names()? {
            let Some(ext) = self.extension_of(&name) else {
                continue;
            };
            if !ext.starts_with(|c: char| c.is_ascii_digit()) {
                continue;
            }
            match ext.parse::<ChannelGroupId>() {
                Ok(n) if n >= 1 => files.push((n - 1, name)),
                _ => warn!("skipping {name}: extension is not a tetrode number"),
            }
        }
        Ok(self.unique_numbered(files))
    }

    /// Sorts files by number and keeps one file per number, preferring
    /// the unpadded name (`rec.1` over `rec.01`).
    fn unique_numbered(&self, mut files: Vec<(u32, String)>) -> Vec<(u32, PathBuf)> {
        files.sort_by(|a, b| (a.0, a.1.len(), &a.1).cmp(&(b.0, b.1.len(), &b.1)));

        let mut unique: Vec<(u32, PathBuf)> = Vec::with_capacity(files.len());
        for (number, name) in files {
            if unique.last().is_some_and(|(last, _)| *last == number) {
                warn!("skipping {name}: another file has the same number");
                continue;
            }
            unique.push((number, self.directory.join(name)));
        }
        unique
    }

    fn load_channel_groups(&self) -> Result<Vec<ChannelGroup>> {
        let mut groups = Vec::new();
        let mut first_channel = 0;

        for (id, path) in self.channel_group_files()? {
            let group =
                ChannelGroup::from_bytes(&read_file(&path)?, id, first_channel, &self.header).map_err(|e| e.in_file(&path))?;
            debug!(
                "channel group {id}: {} channels, {} spikes",
                group.channels().len(),
                group.spike_train().len()
            );
            first_channel += group.channels().len();
            groups.push(group);
        }
        Ok(groups)
    }

    fn load_cuts(&self) -> Result<Vec<Cut>> {
        let files: Vec<(u32, String)> = self
            .file_names()?
            .into_iter()
            .filter_map(|name| Some((self.cut_number_of(&name)?, name)))
            .collect();
        let files = self.unique_numbered(files);

        if files.is_empty() {
            return Err(AxonaError::MissingFileError(
                self.directory.join(format!("{}_1.cut", self.session)),
            ));
        }

        let mut cuts = Vec::with_capacity(files.len());
        for (number, path) in files {
            let id = number - 1;
            let cut = Cut::from_text(id, &latin1(&read_file(&path)?)).map_err(|e| e.in_file(&path))?;

            let group = self
                .channel_group(id)?
                .ok_or_else(|| AxonaError::MissingFileError(self.sibling(&number.to_string())))?;
            let spike_count = group.spike_train().len();
            if cut.len() != spike_count {
                return Err(AxonaError::MismatchError {
                    channel_group: id,
                    cut_count: cut.len(),
                    spike_count,
                });
            }
            cuts.push(cut);
        }
        Ok(cuts)
    }

    fn load_analog_signals(&self) -> Result<Vec<AnalogSignal>> {
        let mut files: Vec<(String, SignalKind, u32)> = Vec::new();
        for name in self.file_names()? {
            let Some(ext) = self.extension_of(&name) else {
                continue;
            };
            let (kind, suffix) = if let Some(suffix) = ext.strip_prefix("eeg") {
                (SignalKind::Eeg, suffix)
            } else if let Some(suffix) = ext.strip_prefix("egf") {
                (SignalKind::Egf, suffix)
            } else {
                continue;
            };
            let suffix = if suffix.is_empty() {
                1
            } else if let Ok(n) = suffix.parse::<u32>() {
                n
            } else {
                warn!("skipping {name}: unrecognised continuous file suffix");
                continue;
            };
            files.push((name, kind, suffix));
        }
        files.sort();

        files
            .into_iter()
            .map(|(name, kind, suffix)| {
                let path = self.directory.join(name);
                AnalogSignal::from_bytes(&read_file(&path)?, kind, suffix, &self.header).map_err(|e| e.in_file(&path))
            })
            .collect()
    }
}

#[cfg(test)]
fn assert_send_sync<T: Send + Sync>() {}

#[test]
fn test_axona_file_is_send_sync() {
    assert_send_sync::<AxonaFile>();
}

#[test]
fn test_open_rejects_other_extensions() {
    let err = AxonaFile::open("recording.pos").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Format);
}

#[test]
fn test_open_missing_set_file() {
    let err = AxonaFile::open("does/not/exist.set").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::MissingFile);
}
