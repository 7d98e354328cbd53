use crate::{
    errors::{AxonaError, Result},
    layout::InputLayout,
    parsers::{data_file, input_records},
    util::check_non_decreasing,
    Attributes,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventType {
    Input,
    Output,
    Keypress,
}

impl TryFrom<u8> for EventType {
    type Error = AxonaError;

    fn try_from(tag: u8) -> Result<Self> {
        match tag {
            b'I' => Ok(Self::Input),
            b'O' => Ok(Self::Output),
            b'K' => Ok(Self::Keypress),
            other => Err(AxonaError::CorruptRecordError(format!(
                "unknown input event type {:?}",
                char::from(other)
            ))),
        }
    }
}

/// Digital input, output and keypress events from an `.inp` file.
#[derive(Debug, Clone, PartialEq)]
pub struct InputEvents {
    times: Vec<f64>,
    event_types: Vec<EventType>,
    values: Vec<i8>,
    bytes_per_value: usize,
    duration: f64,
    timebase: f64,
    attributes: Attributes,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InputEvent<'a> {
    pub time: f64,
    pub event_type: EventType,
    /// Raw value bytes, as signed bytes.
    pub value: &'a [i8],
}

impl InputEvents {
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let data_file = data_file(bytes)?;
        let layout = InputLayout::from_attributes(&data_file.attributes)?;

        let record_size = layout.record_size();
        if data_file.body.len() % record_size != 0 {
            return Err(AxonaError::CorruptRecordError(format!(
                "{} body bytes is not a whole number of {record_size} byte records",
                data_file.body.len()
            )));
        }
        let count = data_file.body.len() / record_size;

        let (_, records) = input_records(data_file.body, &layout, count)
            .map_err(|e| AxonaError::CorruptRecordError(format!("could not decode input records: {e}")))?;

        let times: Vec<f64> = records.iter().map(|r| r.timestamp as f64 / layout.timebase).collect();
        check_non_decreasing(&times, "input")?;

        let event_types = records
            .iter()
            .map(|r| EventType::try_from(r.event_type[0]))
            .collect::<Result<Vec<_>>>()?;

        let values = records
            .iter()
            .flat_map(|r| r.value.iter().map(|&b| b as i8))
            .collect();

        Ok(Self {
            times,
            event_types,
            values,
            bytes_per_value: layout.bytes_per_value,
            duration: layout.duration,
            timebase: layout.timebase,
            attributes: data_file.attributes,
        })
    }

    /// Event times in seconds.
    pub fn times(&self) -> &[f64] {
        &self.times
    }

    pub fn event_types(&self) -> &[EventType] {
        &self.event_types
    }

    /// All value bytes, `bytes_per_value` per event.
    pub fn values(&self) -> &[i8] {
        &self.values
    }

    pub fn bytes_per_value(&self) -> usize {
        self.bytes_per_value
    }

    pub fn len(&self) -> usize {
        self.times.len()
    }

    pub fn is_empty(&self) -> bool {
        self.times.is_empty()
    }

    /// Duration of the recording in seconds, as written in the file header.
    pub fn duration(&self) -> f64 {
        self.duration
    }

    pub fn timebase(&self) -> f64 {
        self.timebase
    }

    pub fn attributes(&self) -> &Attributes {
        &self.attributes
    }

    pub fn events(&self) -> impl Iterator<Item = InputEvent<'_>> {
        self.times
            .iter()
            .zip(&self.event_types)
            .zip(self.values.chunks_exact(self.bytes_per_value))
            .map(|((&time, &event_type), value)| InputEvent {
                time,
                event_type,
                value,
            })
    }

    /// Only the events of one type.
    pub fn of_type(&self, event_type: EventType) -> impl Iterator<Item = InputEvent<'_>> {
        self.events().filter(move |e| e.event_type == event_type)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ErrorKind;

    fn inp_file(body: &[u8]) -> Vec<u8> {
        let mut bytes = b"timebase 1000 hz\r\nduration 10\r\nnum_inp_samples 1\r\nbytes_per_timestamp 4\r\n\
                          bytes_per_type 1\r\nbytes_per_value 2\r\ndata_start"
            .to_vec();
        bytes.extend_from_slice(body);
        bytes.extend_from_slice(b"\r\ndata_end\r\n");
        bytes
    }

    #[test]
    #[allow(clippy::float_cmp)]
    fn test_input_events() {
        let events = InputEvents::from_bytes(&inp_file(&[
            0x00, 0x00, 0x03, 0xE8, b'I', 0x00, 0x01, //
            0x00, 0x00, 0x05, 0xDC, b'O', 0xFF, 0x00, //
            0x00, 0x00, 0x07, 0xD0, b'K', 0x00, 0x61, //
        ]))
        .unwrap();

        assert_eq!(events.len(), 3);
        assert_eq!(events.times(), &[1.0, 1.5, 2.0]);
        assert_eq!(
            events.event_types(),
            &[EventType::Input, EventType::Output, EventType::Keypress]
        );

        let output = events.of_type(EventType::Output).next().unwrap();
        assert_eq!(output.value, &[-1, 0]);
        assert_eq!(events.events().count(), 3);
    }

    #[test]
    fn test_partial_record() {
        let err = InputEvents::from_bytes(&inp_file(&[0x00, 0x00, 0x03, 0xE8, b'I', 0x00])).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::CorruptRecord);
    }

    #[test]
    fn test_decreasing_input_times() {
        let err = InputEvents::from_bytes(&inp_file(&[
            0x00, 0x00, 0x07, 0xD0, b'I', 0x00, 0x01, //
            0x00, 0x00, 0x03, 0xE8, b'I', 0x00, 0x00, //
        ]))
        .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::CorruptRecord);
    }

    #[test]
    fn test_unknown_event_type() {
        let err = InputEvents::from_bytes(&inp_file(&[0x00, 0x00, 0x03, 0xE8, b'X', 0x00, 0x01])).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::CorruptRecord);
    }
}
