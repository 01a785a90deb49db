// Parser combinators using nom for GP-8 SysEx dumps
// A dump is a plain concatenation of 59-byte patch records.

use crate::core::constants::*;
use crate::core::schema::FieldId;
use crate::patch::Gp8Patch;
use nom::{
    bytes::complete::take,
    error::{Error, ErrorKind},
    IResult,
};

/// Parse one patch record, checking the F0 ... F7 framing
pub fn parse_record(input: &[u8]) -> IResult<&[u8], Gp8Patch> {
    let start = input;
    let (input, bytes) = take(RECORD_SIZE)(input)?;

    if bytes[0] != SYSEX_BEGIN || bytes[RECORD_SIZE - 1] != SYSEX_END {
        return Err(nom::Err::Error(Error::new(start, ErrorKind::Verify)));
    }

    let patch = Gp8Patch::from_bytes(bytes)
        .map_err(|_| nom::Err::Error(Error::new(start, ErrorKind::LengthValue)))?;
    tracing::debug!("Parsed record {}", patch);
    Ok((input, patch))
}

/// Parse exactly `count` consecutive records
pub fn parse_records(count: usize) -> impl FnMut(&[u8]) -> IResult<&[u8], Vec<Gp8Patch>> {
    move |input: &[u8]| parse_array(count, parse_record)(input)
}

/// Parse every whole record, leaving any trailing partial record unconsumed
pub fn parse_all_records(input: &[u8]) -> IResult<&[u8], Vec<Gp8Patch>> {
    parse_records(input.len() / RECORD_SIZE)(input)
}

/// Parse the patch name out of a raw record without decoding the rest
pub fn parse_record_name(input: &[u8]) -> IResult<&[u8], String> {
    let name = FieldId::Name.descriptor();
    let (input, _) = take(name.position)(input)?;
    let (input, text) = parse_char_array(name.length)(input)?;
    let (input, _) = take(RECORD_SIZE - name.position - name.length)(input)?;
    Ok((input, text))
}

/// Parse a fixed-length character array (not null-terminated)
pub fn parse_char_array(len: usize) -> impl Fn(&[u8]) -> IResult<&[u8], String> {
    move |input: &[u8]| {
        let (input, bytes) = take(len)(input)?;
        let s = String::from_utf8_lossy(bytes).to_string();
        Ok((input, s))
    }
}

/// Parse an array of elements using a parser
pub fn parse_array<'a, O, F>(
    count_val: usize,
    mut parser: F,
) -> impl FnMut(&'a [u8]) -> IResult<&'a [u8], Vec<O>>
where
    F: FnMut(&'a [u8]) -> IResult<&'a [u8], O>,
{
    move |mut input: &'a [u8]| {
        let mut results = Vec::with_capacity(count_val);
        for _ in 0..count_val {
            let (remaining, value) = parser(input)?;
            results.push(value);
            input = remaining;
        }
        Ok((input, results))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn named(name: &str) -> Vec<u8> {
        let mut patch = Gp8Patch::new();
        patch.set_name(name).unwrap();
        patch.as_bytes().to_vec()
    }

    #[test]
    fn test_parse_record() {
        let mut data = DEFAULT_RECORD.to_vec();
        data.extend_from_slice(&[0xF0, 0x41]);

        let (rest, patch) = parse_record(&data).unwrap();
        assert_eq!(rest, &[0xF0, 0x41]);
        assert_eq!(patch, Gp8Patch::new());
    }

    #[test]
    fn test_parse_record_bad_framing() {
        let mut data = DEFAULT_RECORD.to_vec();
        data[RECORD_SIZE - 1] = 0x00;
        match parse_record(&data) {
            Err(nom::Err::Error(e)) => {
                assert_eq!(e.code, ErrorKind::Verify);
                assert_eq!(e.input.len(), RECORD_SIZE);
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn test_parse_record_short() {
        assert!(parse_record(&DEFAULT_RECORD[..30]).is_err());
    }

    #[test]
    fn test_parse_records() {
        let mut data = named("One");
        data.extend(named("Two"));
        data.extend(named("Three"));

        let (rest, patches) = parse_records(2)(&data).unwrap();
        assert_eq!(patches.len(), 2);
        assert_eq!(patches[1].name(), "Two             ");
        assert_eq!(rest.len(), RECORD_SIZE);
    }

    #[test]
    fn test_parse_all_records_leaves_partial() {
        let mut data = named("One");
        data.extend(named("Two"));
        data.extend_from_slice(&[0xF0, 0x41, 0x00]);

        let (rest, patches) = parse_all_records(&data).unwrap();
        assert_eq!(patches.len(), 2);
        assert_eq!(rest, &[0xF0, 0x41, 0x00]);

        let (rest, patches) = parse_all_records(&[]).unwrap();
        assert!(patches.is_empty());
        assert!(rest.is_empty());
    }

    #[test]
    fn test_parse_record_name() {
        let data = named("Crunch");
        let (rest, name) = parse_record_name(&data).unwrap();
        assert_eq!(name, "Crunch          ");
        assert!(rest.is_empty());
    }

    #[test]
    fn test_parse_char_array() {
        let data = b"ABCDEF";
        let (rest, s) = parse_char_array(4)(data).unwrap();
        assert_eq!(s, "ABCD");
        assert_eq!(rest, b"EF");
    }
}
