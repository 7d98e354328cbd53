use std::{collections::BTreeMap, str::FromStr};

use crate::errors::{AxonaError, Result};

/// The `key value` pairs found at the top of every Axona file.
///
/// Values are kept as text; the typed getters convert them on demand and
/// report a [`AxonaError::FormatError`] naming the offending key.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Attributes {
    entries: BTreeMap<String, Option<String>>,
}

impl Attributes {
    pub(crate) fn insert(&mut self, key: &str, value: Option<&str>) {
        self.entries.insert(key.to_string(), value.map(str::to_string));
    }

    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// The raw text of a value. Keys that are present without a value give `None`.
    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.entries.get(key).and_then(|v| v.as_deref())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, Option<&str>)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_deref()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Parses a value that must be present.
    pub fn require<T: FromStr>(&self, key: &str) -> Result<T> {
        let text = self
            .get_str(key)
            .ok_or_else(|| AxonaError::FormatError(format!("missing required key '{key}'")))?;
        parse_value(key, text)
    }

    /// Parses a value, falling back to `default` only when the key is absent.
    /// A value that is present but malformed is still an error.
    pub fn get_or<T: FromStr>(&self, key: &str, default: T) -> Result<T> {
        match self.get_str(key) {
            Some(text) => parse_value(key, text),
            None => Ok(default),
        }
    }

    /// Parses an optional value.
    pub fn get<T: FromStr>(&self, key: &str) -> Result<Option<T>> {
        self.get_str(key).map(|text| parse_value(key, text)).transpose()
    }

    /// Parses a rate such as `96000 hz` into Hertz.
    pub fn rate(&self, key: &str) -> Result<f64> {
        let text = self
            .get_str(key)
            .ok_or_else(|| AxonaError::FormatError(format!("missing required key '{key}'")))?;
        parse_rate(key, text)
    }

    pub fn rate_or(&self, key: &str, default: f64) -> Result<f64> {
        match self.get_str(key) {
            Some(text) => parse_rate(key, text),
            None => Ok(default),
        }
    }
}

fn parse_value<T: FromStr>(key: &str, text: &str) -> Result<T> {
    text.trim()
        .parse::<T>()
        .map_err(|_| AxonaError::FormatError(format!("malformed value '{text}' for key '{key}'")))
}

fn parse_rate(key: &str, text: &str) -> Result<f64> {
    let mut parts = text.split_whitespace();
    let rate = parts
        .next()
        .ok_or_else(|| AxonaError::FormatError(format!("empty rate for key '{key}'")))?;
    let rate: f64 = parse_value(key, rate)?;

    match parts.next() {
        None => Ok(rate),
        Some(unit) if unit.eq_ignore_ascii_case("hz") => Ok(rate),
        Some(unit) => Err(AxonaError::FormatError(format!(
            "unexpected unit '{unit}' for key '{key}', expected hz"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn attributes() -> Attributes {
        let mut attributes = Attributes::default();
        attributes.insert("num_chans", Some("4"));
        attributes.insert("timebase", Some("96000 hz"));
        attributes.insert("sample_rate", Some("250.0 Hz"));
        attributes.insert("bad_rate", Some("50.0 khz"));
        attributes.insert("comments", None);
        attributes
    }

    #[test]
    fn test_require() {
        let attributes = attributes();
        assert_eq!(attributes.require::<usize>("num_chans").unwrap(), 4);
        assert!(attributes.require::<usize>("num_spikes").is_err());
        assert!(attributes.require::<usize>("timebase").is_err());
        assert!(attributes.require::<usize>("comments").is_err());
    }

    #[test]
    fn test_get_or() {
        let attributes = attributes();
        assert_eq!(attributes.get_or("num_spikes", 0_usize).unwrap(), 0);
        assert_eq!(attributes.get_or("num_chans", 1_usize).unwrap(), 4);
        assert!(attributes.get_or("timebase", 1_usize).is_err());
    }

    #[test]
    #[allow(clippy::float_cmp)]
    fn test_rate() {
        let attributes = attributes();
        assert_eq!(attributes.rate("timebase").unwrap(), 96000.0);
        assert_eq!(attributes.rate("sample_rate").unwrap(), 250.0);
        assert_eq!(attributes.rate_or("rawrate", 48000.0).unwrap(), 48000.0);
        assert!(attributes.rate("bad_rate").is_err());
        assert!(attributes.rate("comments").is_err());
    }

    #[test]
    fn test_key_without_value() {
        let attributes = attributes();
        assert!(attributes.contains("comments"));
        assert_eq!(attributes.get_str("comments"), None);
        assert_eq!(attributes.get::<f64>("comments").unwrap(), None);
    }
}
