// structure of an Axona data file (.N, .pos, .eeg, .egf, .inp):
// [Header] [DataStart] [Body] [DataEnd]
// [key value lines] ["data_start"] [fixed size records] ["\r\ndata_end\r\n"]
// [Variable] [10] [as declared in the header] [12]

use nom::{
    bytes::complete::{tag, take_until},
    error::context,
    IResult,
};
use tracing::{instrument, trace};

use crate::{
    errors::{AxonaError, Result},
    util::latin1,
    Attributes,
};

use super::attributes::attributes;

pub(crate) const DATA_START: &[u8] = b"data_start";
pub(crate) const DATA_END: &[u8] = b"\r\ndata_end\r\n";

/// A data file split into its parsed header and the raw record bytes.
#[derive(Debug)]
pub(crate) struct DataFile<'a> {
    pub(crate) attributes: Attributes,
    pub(crate) body: &'a [u8],
}

#[instrument(level = "trace", skip(input))]
fn header_block(input: &[u8]) -> IResult<&[u8], &[u8]> {
    let (input, header) = context("envelope header", take_until(DATA_START))(input)?;
    let (input, _) = context("envelope data_start", tag(DATA_START))(input)?;
    trace!(header_len = header.len(), body_len = input.len());

    Ok((input, header))
}

/// Parses the text header of a `.set` file or of a data file header block.
pub(crate) fn header_text(text: &str) -> Result<Attributes> {
    let (rest, attributes) = attributes(text).map_err(|e| AxonaError::FormatError(format!("bad header: {e}")))?;

    let rest = rest.trim();
    if !rest.is_empty() {
        let line = rest.lines().next().unwrap_or(rest);
        return Err(AxonaError::FormatError(format!("could not parse header line '{line}'")));
    }

    Ok(attributes)
}

pub(crate) fn data_file(bytes: &[u8]) -> Result<DataFile<'_>> {
    let (rest, header) = header_block(bytes)
        .map_err(|_| AxonaError::FormatError("header is not terminated by 'data_start'".to_string()))?;

    let body = rest.strip_suffix(DATA_END).ok_or_else(|| {
        AxonaError::CorruptRecordError(format!(
            "data section of {} bytes is not terminated by 'data_end'",
            rest.len()
        ))
    })?;

    let attributes = header_text(&latin1(header))?;

    Ok(DataFile { attributes, body })
}

/// Checks that the body holds exactly `count` records of `record_size` bytes.
pub(crate) fn check_body_length(body: &[u8], count: usize, record_size: usize) -> Result<()> {
    let expected = count.checked_mul(record_size).ok_or_else(|| {
        AxonaError::FormatError(format!("{count} records of {record_size} bytes do not fit in memory"))
    })?;

    if body.len() != expected {
        return Err(AxonaError::CorruptRecordError(format!(
            "expected {count} records of {record_size} bytes ({expected} bytes) but the data section has {} bytes",
            body.len()
        )));
    }
    Ok(())
}
