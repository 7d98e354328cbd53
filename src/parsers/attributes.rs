// attribute block structure
// [Key] [Space] [Value] [LineEnding] [Key] [Space] [Value] [LineEnding] ...
// [text without whitespace] [0 or more] [rest of the line] ["\r\n" or "\n"] ...
// a lone "\r" does not end a line, it stays in the value

use nom::{
    branch::alt,
    bytes::complete::{take_till, take_till1, take_while},
    character::complete::{char, space0},
    combinator::{map, opt, value},
    error::context,
    multi::fold_many0,
    sequence::pair,
    IResult,
};
use tracing::instrument;

use crate::Attributes;

fn key(input: &str) -> IResult<&str, &str> {
    take_till1(|c: char| c == ' ' || c == '\t' || c == '\r' || c == '\n')(input)
}

fn entry(input: &str) -> IResult<&str, (&str, Option<&str>)> {
    let (input, _) = space0(input)?;
    let (input, key) = context("attribute key", key)(input)?;
    let (input, value) = context("attribute value", take_till(|c: char| c == '\n'))(input)?;
    let (input, _) = opt(char('\n'))(input)?;

    let value = value.trim();
    let value = if value.is_empty() { None } else { Some(value) };

    Ok((input, (key, value)))
}

fn blank_line(input: &str) -> IResult<&str, ()> {
    value((), pair(take_while(|c: char| c == ' ' || c == '\t' || c == '\r'), char('\n')))(input)
}

// parses every `key value` line it can. Whatever is left over is returned as the remainder.
#[instrument(level = "trace", skip(input))]
pub(crate) fn attributes(input: &str) -> IResult<&str, Attributes> {
    fold_many0(
        alt((value(None, blank_line), map(entry, Some))),
        Attributes::default,
        |mut attributes, entry| {
            if let Some((key, value)) = entry {
                attributes.insert(key, value);
            }
            attributes
        },
    )(input)
}

#[test]
fn test_attributes() {
    let input = "trialdate Thursday, 31 Oct 2013\r\n\r\nnum_chans 4\r\n  comments\r\nduration 600 ";
    let (rest, attributes) = attributes(input).unwrap();

    assert!(rest.is_empty());
    assert_eq!(attributes.len(), 4);
    assert_eq!(attributes.get_str("trialdate"), Some("Thursday, 31 Oct 2013"));
    assert_eq!(attributes.get_str("num_chans"), Some("4"));
    assert_eq!(attributes.get_str("duration"), Some("600"));
    assert!(attributes.contains("comments"));
    assert_eq!(attributes.get_str("comments"), None);
}

#[test]
fn test_attributes_unix_line_endings() {
    let (rest, attributes) = attributes("a 1\nb 2\n").unwrap();

    assert!(rest.is_empty());
    assert_eq!(attributes.get_str("a"), Some("1"));
    assert_eq!(attributes.get_str("b"), Some("2"));
}

#[test]
fn test_attributes_last_key_wins() {
    let (_, attributes) = attributes("gain_ch_0 1000\ngain_ch_0 2000\n").unwrap();
    assert_eq!(attributes.get_str("gain_ch_0"), Some("2000"));
}

#[test]
fn test_attributes_bare_carriage_return() {
    let (rest, attributes) = attributes("comments a\rb\r\n\r\r\nnum_chans 4\r\n").unwrap();

    assert!(rest.is_empty());
    assert_eq!(attributes.len(), 2);
    assert_eq!(attributes.get_str("comments"), Some("a\rb"));
    assert_eq!(attributes.get_str("num_chans"), Some("4"));
}
