use std::{
    fs,
    io::ErrorKind,
    path::Path,
    sync::{Mutex, OnceLock},
};

use crate::errors::{AxonaError, Result};

/// Axona headers are written as latin-1, which maps byte for byte onto the first 256 code points.
pub(crate) fn latin1(bytes: &[u8]) -> String {
    bytes.iter().map(|&b| char::from(b)).collect()
}

/// Reads a whole file, turning a missing file into [`AxonaError::MissingFileError`].
pub(crate) fn read_file(path: &Path) -> Result<Vec<u8>> {
    fs::read(path).map_err(|e| match e.kind() {
        ErrorKind::NotFound => AxonaError::MissingFileError(path.to_path_buf()),
        _ => AxonaError::IOError(e),
    })
}

/// Converts a raw ADC value to microvolts.
///
/// With one byte per sample the raw range [-128, 127] maps onto
/// [-1.0, 127/128] * fullscale / gain.
pub(crate) fn scale_to_microvolts(raw: i64, bytes_per_sample: usize, adc_fullscale_uv: f64, gain: f64) -> f64 {
    let max_value = (1_i64 << (8 * bytes_per_sample - 1)) as f64;
    (raw as f64 / max_value) * (adc_fullscale_uv / gain)
}

/// Fails on the first timestamp that is smaller than its predecessor.
pub(crate) fn check_non_decreasing(times: &[f64], what: &str) -> Result<()> {
    if let Some(i) = times.windows(2).position(|w| w[1] < w[0]) {
        return Err(AxonaError::CorruptRecordError(format!(
            "{what} timestamp {} at record {} is earlier than the previous one ({})",
            times[i + 1],
            i + 1,
            times[i]
        )));
    }
    Ok(())
}

/// A value that is computed at most once, on first access, even when accessed from several threads.
///
/// Failed initialisations are not cached; the next access tries again.
#[derive(Debug)]
pub(crate) struct Memo<T> {
    cell: OnceLock<T>,
    init: Mutex<()>,
}

impl<T> Default for Memo<T> {
    fn default() -> Self {
        Self {
            cell: OnceLock::new(),
            init: Mutex::new(()),
        }
    }
}

impl<T> Memo<T> {
    pub(crate) fn get_or_try_init<F>(&self, f: F) -> Result<&T>
    where
        F: FnOnce() -> Result<T>,
    {
        if let Some(value) = self.cell.get() {
            return Ok(value);
        }

        let _guard = self.init.lock()?;
        // someone else may have finished while we were waiting for the lock
        if let Some(value) = self.cell.get() {
            return Ok(value);
        }

        let value = f()?;
        Ok(self.cell.get_or_init(|| value))
    }
}

#[test]
fn test_latin1() {
    assert_eq!(latin1(b"gain_ch_0 \xb5V"), "gain_ch_0 µV");
}

#[test]
#[allow(clippy::float_cmp)] // powers of two divide exactly
fn test_scale_to_microvolts() {
    assert_eq!(scale_to_microvolts(-128, 1, 1_500_000.0, 1.0), -1_500_000.0);
    assert_eq!(scale_to_microvolts(64, 1, 1_500_000.0, 3000.0), 250.0);
    assert_eq!(scale_to_microvolts(16384, 2, 1_500_000.0, 1000.0), 750.0);
}

#[test]
fn test_check_non_decreasing() {
    assert!(check_non_decreasing(&[0.0, 0.0, 1.0, 2.5], "spike").is_ok());
    assert!(check_non_decreasing(&[], "spike").is_ok());

    let err = check_non_decreasing(&[0.0, 2.0, 1.0], "spike").unwrap_err();
    assert_eq!(err.kind(), crate::ErrorKind::CorruptRecord);
}

#[test]
fn test_memo_initialises_once() {
    let memo: Memo<Vec<u32>> = Memo::default();
    let mut calls = 0;

    let first = memo
        .get_or_try_init(|| {
            calls += 1;
            Ok(vec![1, 2, 3])
        })
        .unwrap() as *const Vec<u32>;
    let second = memo
        .get_or_try_init(|| {
            calls += 1;
            Ok(vec![4])
        })
        .unwrap() as *const Vec<u32>;

    assert_eq!(calls, 1);
    assert!(std::ptr::eq(first, second));
}

#[test]
fn test_memo_does_not_cache_errors() {
    let memo: Memo<u32> = Memo::default();

    let result = memo.get_or_try_init(|| Err(AxonaError::FormatError("nope".to_string())));
    assert!(result.is_err());

    let value = memo.get_or_try_init(|| Ok(7)).unwrap();
    assert_eq!(*value, 7);
}
