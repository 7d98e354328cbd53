use nom::{
    combinator::map,
    error::{Error, ErrorKind},
    number::complete::{be_i16, be_i24, be_i32, be_i8, be_u16, be_u24, be_u32, be_u8, le_i16, le_i24, le_i32, le_i8},
    IResult,
};

// structure of a value:
// timestamps and coordinates are big endian, waveform and EEG samples are little endian
// the width of every field is declared in the file header
// [1, 2, 3 or 4]

fn bad_width(input: &[u8]) -> nom::Err<Error<&[u8]>> {
    // layouts validate widths before parsing starts, so this only guards against misuse
    nom::Err::Failure(Error::new(input, ErrorKind::LengthValue))
}

pub(crate) fn be_unsigned(input: &[u8], width: usize) -> IResult<&[u8], u64> {
    match width {
        1 => map(be_u8, u64::from)(input),
        2 => map(be_u16, u64::from)(input),
        3 => map(be_u24, u64::from)(input),
        4 => map(be_u32, u64::from)(input),
        _ => Err(bad_width(input)),
    }
}

pub(crate) fn be_signed(input: &[u8], width: usize) -> IResult<&[u8], i64> {
    match width {
        1 => map(be_i8, i64::from)(input),
        2 => map(be_i16, i64::from)(input),
        3 => map(be_i24, i64::from)(input),
        4 => map(be_i32, i64::from)(input),
        _ => Err(bad_width(input)),
    }
}

pub(crate) fn le_signed(input: &[u8], width: usize) -> IResult<&[u8], i64> {
    match width {
        1 => map(le_i8, i64::from)(input),
        2 => map(le_i16, i64::from)(input),
        3 => map(le_i24, i64::from)(input),
        4 => map(le_i32, i64::from)(input),
        _ => Err(bad_width(input)),
    }
}

#[test]
fn test_be_unsigned() {
    let input = [0x00, 0x01, 0x77, 0x00, 0xFF];
    let (rest, value) = be_unsigned(&input, 4).unwrap();
    assert_eq!(value, 0x0001_7700);
    assert_eq!(rest, &[0xFF]);

    let (_, value) = be_unsigned(&[0xFF, 0xFF], 2).unwrap();
    assert_eq!(value, 0xFFFF);
}

#[test]
fn test_be_signed() {
    let (_, value) = be_signed(&[0xFF, 0xFE], 2).unwrap();
    assert_eq!(value, -2);

    let (_, value) = be_signed(&[0x03, 0xFF], 2).unwrap();
    assert_eq!(value, 1023);
}

#[test]
fn test_le_signed() {
    let (_, value) = le_signed(&[0x80], 1).unwrap();
    assert_eq!(value, -128);

    let (_, value) = le_signed(&[0x00, 0x80], 2).unwrap();
    assert_eq!(value, -32768);

    let (_, value) = le_signed(&[0x01, 0x02, 0x03], 3).unwrap();
    assert_eq!(value, 0x03_0201);
}

#[test]
fn test_invalid_width() {
    for width in [0, 5, 8] {
        assert!(be_unsigned(&[0; 8], width).is_err());
        assert!(be_signed(&[0; 8], width).is_err());
        assert!(le_signed(&[0; 8], width).is_err());
    }
}

#[test]
fn test_not_enough_input() {
    assert!(be_unsigned(&[0; 3], 4).is_err());
    assert!(le_signed(&[0], 2).is_err());
}
