// Typed field values and patch errors

use crate::core::schema::{FieldId, FieldKind, SchemaError, ValidRange};
use std::fmt;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PatchError {
    #[error("Value {value} out of range for {field} (allowed: {allowed})")]
    Range {
        field: FieldId,
        value: u8,
        allowed: ValidRange,
    },

    #[error("Invalid group {0:?}, expected 'A' or 'B'")]
    InvalidGroup(char),

    #[error("Field {field} holds {expected} data, not {actual}")]
    KindMismatch {
        field: FieldId,
        expected: FieldKind,
        actual: FieldKind,
    },

    #[error("Field {field} only accepts ASCII characters 20h-7Fh")]
    NonAscii { field: FieldId },

    #[error("Invalid length: expected {expected} bytes, got {actual}")]
    InvalidLength { expected: usize, actual: usize },

    #[error("Bytes for {field} do not match the required pattern")]
    PatternMismatch { field: FieldId },

    #[error("Invalid address: {0}")]
    InvalidAddress(String),

    #[error("Invalid value for {field}: {value}")]
    InvalidValue { field: FieldId, value: String },

    #[error(transparent)]
    Schema(#[from] SchemaError),
}

pub type PatchResult<T> = std::result::Result<T, PatchError>;

/// A field value decoded according to the field's kind
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldValue {
    /// Integer and bit flag fields
    Integer(u8),
    Boolean(bool),
    Bytes(Vec<u8>),
    Text(String),
}

impl FieldValue {
    /// Kind of field this value can be stored in.
    /// Integer values are also accepted by bit flag fields.
    pub fn kind(&self) -> FieldKind {
        match self {
            FieldValue::Integer(_) => FieldKind::Integer,
            FieldValue::Boolean(_) => FieldKind::Boolean,
            FieldValue::Bytes(_) => FieldKind::RawBytes,
            FieldValue::Text(_) => FieldKind::AsciiString,
        }
    }

    /// Parse user supplied text for the given field.
    ///
    /// Integers are decimal, or hex with an `h` suffix or `0x` prefix.
    /// Booleans accept on/off, true/false, yes/no and 1/0. Raw bytes are
    /// hex, optionally separated by commas or spaces.
    pub fn parse(field: FieldId, text: &str) -> PatchResult<Self> {
        let invalid = || PatchError::InvalidValue {
            field,
            value: text.to_string(),
        };
        let trimmed = text.trim();

        match field.descriptor().kind {
            FieldKind::Integer | FieldKind::BitFlags => {
                parse_byte(trimmed).map(FieldValue::Integer).ok_or_else(invalid)
            }
            FieldKind::Boolean => parse_switch(trimmed)
                .map(FieldValue::Boolean)
                .ok_or_else(invalid),
            FieldKind::RawBytes => parse_hex_bytes(trimmed)
                .map(FieldValue::Bytes)
                .ok_or_else(invalid),
            FieldKind::AsciiString => Ok(FieldValue::Text(text.to_string())),
        }
    }

    /// Look up a field by name and parse text for it
    pub fn parse_named(name: &str, text: &str) -> PatchResult<(FieldId, Self)> {
        let field = FieldId::from_name(name)?;
        Ok((field, Self::parse(field, text)?))
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Integer(value) => write!(f, "{}", value),
            FieldValue::Boolean(true) => write!(f, "On"),
            FieldValue::Boolean(false) => write!(f, "Off"),
            FieldValue::Bytes(bytes) => {
                let hex: Vec<String> = bytes.iter().map(|b| format!("{:02X}", b)).collect();
                write!(f, "{}", hex.join(" "))
            }
            FieldValue::Text(text) => write!(f, "\"{}\"", text),
        }
    }
}

/// Parse an on/off switch: on/off, true/false, yes/no or 1/0
pub fn parse_switch(text: &str) -> Option<bool> {
    match text.trim().to_ascii_lowercase().as_str() {
        "on" | "true" | "yes" | "1" => Some(true),
        "off" | "false" | "no" | "0" => Some(false),
        _ => None,
    }
}

fn parse_byte(text: &str) -> Option<u8> {
    let lower = text.to_ascii_lowercase();
    if let Some(hex) = lower.strip_prefix("0x") {
        u8::from_str_radix(hex, 16).ok()
    } else if let Some(hex) = lower.strip_suffix('h') {
        u8::from_str_radix(hex, 16).ok()
    } else {
        lower.parse().ok()
    }
}

fn parse_hex_bytes(text: &str) -> Option<Vec<u8>> {
    let groups: Vec<&str> = text
        .split(|c: char| c == ',' || c.is_whitespace())
        .filter(|s| !s.is_empty())
        .collect();

    // "0310" style: split into pairs
    if groups.len() == 1 && groups[0].len() > 2 {
        let digits = groups[0];
        if digits.len() % 2 != 0 || !digits.is_ascii() {
            return None;
        }
        return (0..digits.len())
            .step_by(2)
            .map(|i| u8::from_str_radix(&digits[i..i + 2], 16).ok())
            .collect();
    }

    if groups.is_empty() {
        return None;
    }
    groups
        .iter()
        .map(|g| u8::from_str_radix(g, 16).ok())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_integer() {
        assert_eq!(
            FieldValue::parse(FieldId::EqLo, "42").unwrap(),
            FieldValue::Integer(42)
        );
        assert_eq!(
            FieldValue::parse(FieldId::EqLo, "64h").unwrap(),
            FieldValue::Integer(100)
        );
        assert_eq!(
            FieldValue::parse(FieldId::EffectMsb, "0x0F").unwrap(),
            FieldValue::Integer(15)
        );
        assert!(FieldValue::parse(FieldId::EqLo, "300").is_err());
        assert!(FieldValue::parse(FieldId::EqLo, "loud").is_err());
    }

    #[test]
    fn test_parse_boolean() {
        assert_eq!(
            FieldValue::parse(FieldId::OdTurbo, "on").unwrap(),
            FieldValue::Boolean(true)
        );
        assert_eq!(
            FieldValue::parse(FieldId::OdTurbo, "FALSE").unwrap(),
            FieldValue::Boolean(false)
        );
        assert!(FieldValue::parse(FieldId::OdTurbo, "maybe").is_err());
    }

    #[test]
    fn test_parse_bytes() {
        assert_eq!(
            FieldValue::parse(FieldId::DelayTime, "03,10").unwrap(),
            FieldValue::Bytes(vec![0x03, 0x10])
        );
        assert_eq!(
            FieldValue::parse(FieldId::DelayTime, "0310").unwrap(),
            FieldValue::Bytes(vec![0x03, 0x10])
        );
        assert_eq!(
            FieldValue::parse(FieldId::Checksum, "7f").unwrap(),
            FieldValue::Bytes(vec![0x7F])
        );
        assert!(FieldValue::parse(FieldId::DelayTime, "031").is_err());
        assert!(FieldValue::parse(FieldId::DelayTime, "").is_err());
    }

    #[test]
    fn test_parse_text_keeps_spacing() {
        assert_eq!(
            FieldValue::parse(FieldId::Name, " Lead ").unwrap(),
            FieldValue::Text(" Lead ".to_string())
        );
    }

    #[test]
    fn test_parse_named() {
        assert_eq!(
            FieldValue::parse_named("od_drive", "80").unwrap(),
            (FieldId::OdDrive, FieldValue::Integer(80))
        );
        assert_eq!(
            FieldValue::parse_named("FLANGER_RATE", "10"),
            Err(PatchError::Schema(SchemaError::UnknownField(
                "FLANGER_RATE".to_string()
            )))
        );
        assert_eq!(
            FieldValue::parse_named("FLANGER_RATE", "10")
                .unwrap_err()
                .to_string(),
            "Unknown field: FLANGER_RATE"
        );
        assert!(matches!(
            FieldValue::parse_named("EXT_CONTROL_2", "maybe"),
            Err(PatchError::InvalidValue { .. })
        ));
    }

    #[test]
    fn test_display() {
        assert_eq!(FieldValue::Integer(7).to_string(), "7");
        assert_eq!(FieldValue::Boolean(true).to_string(), "On");
        assert_eq!(FieldValue::Bytes(vec![0x03, 0x10]).to_string(), "03 10");
        assert_eq!(FieldValue::Text("abc".to_string()).to_string(), "\"abc\"");
    }

    #[test]
    fn test_error_messages() {
        let err = PatchError::Range {
            field: FieldId::EqLo,
            value: 101,
            allowed: ValidRange::Interval { min: 0, max: 100 },
        };
        assert_eq!(
            err.to_string(),
            "Value 101 out of range for EQ_LO (allowed: 0-100)"
        );
        assert_eq!(
            PatchError::InvalidGroup('C').to_string(),
            "Invalid group 'C', expected 'A' or 'B'"
        );
    }
}
