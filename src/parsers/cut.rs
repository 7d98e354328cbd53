// structure of a cut file:
// [Preamble] [ExactCutLine] [Label] [Label] ... [Label]
// [cluster descriptions] ["Exact_cut_for: <session> spikes: <count>"] [whitespace separated integers]

use nom::{
    bytes::complete::{tag, take_until},
    character::complete::{digit1, multispace0, space0},
    combinator::map_res,
    error::context,
    multi::many0,
    sequence::preceded,
    IResult,
};
use tracing::instrument;

use crate::errors::{AxonaError, Result};

const EXACT_CUT_MARKER: &str = "Exact_cut_for";

#[derive(Debug, PartialEq, Eq)]
pub(crate) struct CutContents {
    pub(crate) declared_spike_count: Option<usize>,
    pub(crate) labels: Vec<u32>,
}

fn declared_spike_count(line: &str) -> IResult<&str, usize> {
    let (input, _) = take_until("spikes:")(line)?;
    let (input, _) = tag("spikes:")(input)?;
    let (input, _) = space0(input)?;
    map_res(digit1, str::parse::<usize>)(input)
}

fn labels(input: &str) -> IResult<&str, Vec<u32>> {
    let (input, labels) = context(
        "cut labels",
        many0(preceded(multispace0, map_res(digit1, str::parse::<u32>))),
    )(input)?;
    let (input, _) = multispace0(input)?;

    Ok((input, labels))
}

#[instrument(level = "trace", skip(text))]
pub(crate) fn cut_file(text: &str) -> Result<CutContents> {
    let mut offset = 0;
    let mut marker_line = None;
    for line in text.split_inclusive('\n') {
        offset += line.len();
        if line.trim_start().starts_with(EXACT_CUT_MARKER) {
            marker_line = Some(line);
            break;
        }
    }

    let marker_line = marker_line
        .ok_or_else(|| AxonaError::FormatError(format!("no line starting with '{EXACT_CUT_MARKER}'")))?;
    let declared_spike_count = if marker_line.contains("spikes:") {
        match declared_spike_count(marker_line) {
            Ok((rest, count)) if rest.trim().is_empty() => Some(count),
            _ => {
                return Err(AxonaError::FormatError(format!(
                    "malformed spike count in '{}'",
                    marker_line.trim()
                )))
            }
        }
    } else {
        None
    };

    let (rest, labels) =
        labels(&text[offset..]).map_err(|e| AxonaError::FormatError(format!("bad cluster labels: {e}")))?;

    if let Some(token) = rest.split_whitespace().next() {
        return Err(AxonaError::FormatError(format!(
            "invalid cluster label '{token}' after {} labels",
            labels.len()
        )));
    }

    if let Some(declared) = declared_spike_count {
        if declared != labels.len() {
            return Err(AxonaError::FormatError(format!(
                "'{EXACT_CUT_MARKER}' declares {declared} spikes but {} labels follow",
                labels.len()
            )));
        }
    }

    Ok(CutContents {
        declared_spike_count,
        labels,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ErrorKind;

    const PREAMBLE: &str = "n_clusters: 3\r\nn_channels: 4\r\nn_params: 2\r\n\
                            cluster: 0 center: 0 0 0 0 0 0 0 0\r\n";

    #[test]
    fn test_cut_file() {
        let text = format!("{PREAMBLE}\r\nExact_cut_for: DVH_2013103103 spikes: 5\r\n 1 1 0\r\n 2 1\r\n");
        let cut = cut_file(&text).unwrap();

        assert_eq!(cut.declared_spike_count, Some(5));
        assert_eq!(cut.labels, vec![1, 1, 0, 2, 1]);
    }

    #[test]
    fn test_cut_file_without_declared_count() {
        let cut = cut_file("  Exact_cut_for: rec\n3 4").unwrap();

        assert_eq!(cut.declared_spike_count, None);
        assert_eq!(cut.labels, vec![3, 4]);
    }

    #[test]
    fn test_empty_cut() {
        let cut = cut_file("Exact_cut_for: rec spikes: 0\r\n").unwrap();
        assert!(cut.labels.is_empty());
    }

    #[test]
    fn test_missing_marker() {
        let err = cut_file(PREAMBLE).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Format);
    }

    #[test]
    fn test_invalid_label() {
        let err = cut_file("Exact_cut_for: rec spikes: 3\r\n1 x 2\r\n").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Format);

        let err = cut_file("Exact_cut_for: rec spikes: 2\r\n1 -2\r\n").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Format);
    }

    #[test]
    fn test_malformed_declared_count() {
        for line in ["spikes: -3", "spikes:", "spikes: 3x", "spikes: many"] {
            let err = cut_file(&format!("Exact_cut_for: rec {line}\r\n1 2\r\n")).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::Format, "{line}");
        }
    }

    #[test]
    fn test_declared_count_disagrees() {
        let err = cut_file("Exact_cut_for: rec spikes: 4\r\n1 2 3\r\n").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Format);
    }
}
