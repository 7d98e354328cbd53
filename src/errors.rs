//! Errors that can occur when reading an Axona recording
use std::path::{Path, PathBuf};
use std::sync::PoisonError;

use thiserror::Error;

/// Coarse classification of an [`AxonaError`], for batch tools that want to
/// skip a broken recording but abort on anything else.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    MissingFile,
    Format,
    CorruptRecord,
    Mismatch,
    IO,
}

#[derive(Debug, Error)]
pub enum AxonaError {
    /// A sibling file the recording needs does not exist.
    #[error("Could not find file {}", .0.display())]
    MissingFileError(PathBuf),

    /// A header or text file does not follow the expected grammar.
    #[error("Invalid format: {0}")]
    FormatError(String),

    /// Binary record boundaries do not line up with the widths declared in the header.
    #[error("Corrupt record: {0}")]
    CorruptRecordError(String),

    /// A cut file and its channel group disagree on the number of spikes.
    #[error("Cut file for channel group {channel_group} has {cut_count} labels but the channel group has {spike_count} spikes")]
    MismatchError {
        channel_group: u32,
        cut_count: usize,
        spike_count: usize,
    },

    #[error(transparent)]
    IOError(#[from] std::io::Error),

    #[error("AxonaFile lock is poisoned")]
    PoisonError,
}

impl AxonaError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::MissingFileError(_) => ErrorKind::MissingFile,
            Self::FormatError(_) => ErrorKind::Format,
            Self::CorruptRecordError(_) => ErrorKind::CorruptRecord,
            Self::MismatchError { .. } => ErrorKind::Mismatch,
            Self::IOError(_) | Self::PoisonError => ErrorKind::IO,
        }
    }

    /// Prefixes the message with the file it came from. Kinds are left untouched.
    pub(crate) fn in_file(self, path: &Path) -> Self {
        match self {
            Self::FormatError(msg) => Self::FormatError(format!("{}: {msg}", path.display())),
            Self::CorruptRecordError(msg) => Self::CorruptRecordError(format!("{}: {msg}", path.display())),
            other => other,
        }
    }
}

impl<T> From<PoisonError<T>> for AxonaError {
    fn from(_value: PoisonError<T>) -> Self {
        AxonaError::PoisonError
    }
}

pub type Result<T> = std::result::Result<T, AxonaError>;

#[test]
fn test_in_file_keeps_kind() {
    let path = Path::new("/data/rec.pos");

    let err = AxonaError::CorruptRecordError("3 bytes left over".to_string()).in_file(path);
    assert_eq!(err.kind(), ErrorKind::CorruptRecord);
    assert_eq!(err.to_string(), "Corrupt record: /data/rec.pos: 3 bytes left over");

    let err = AxonaError::MismatchError {
        channel_group: 0,
        cut_count: 1,
        spike_count: 2,
    }
    .in_file(path);
    assert_eq!(err.kind(), ErrorKind::Mismatch);
}
