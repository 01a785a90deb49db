// Patch validation logic and helpers
//
// Reads are lenient, so a record loaded from a dump can hold bytes the
// writers would refuse. Validation reports them without touching the record.

use super::constants::*;
use super::schema::{FieldId, FieldKind, ValidRange};
use crate::patch::Gp8Patch;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationMessage {
    Warning(String),
    Error(String),
}

impl ValidationMessage {
    pub fn is_error(&self) -> bool {
        matches!(self, ValidationMessage::Error(_))
    }

    pub fn is_warning(&self) -> bool {
        matches!(self, ValidationMessage::Warning(_))
    }

    pub fn message(&self) -> &str {
        match self {
            ValidationMessage::Warning(msg) | ValidationMessage::Error(msg) => msg,
        }
    }
}

/// Validate a patch and return messages
pub fn validate_patch(patch: &Gp8Patch) -> Vec<ValidationMessage> {
    validate_record(patch.as_bytes())
}

/// Validate a raw record against the field schema
pub fn validate_record(data: &[u8; RECORD_SIZE]) -> Vec<ValidationMessage> {
    let mut msgs = Vec::new();

    for field in FieldId::ALL {
        let desc = field.descriptor();
        let bytes = &data[desc.span()];

        match (desc.kind, desc.valid_range) {
            // Protocol markers must be exact
            (FieldKind::RawBytes, ValidRange::Exact(pattern)) => {
                if bytes != pattern {
                    msgs.push(ValidationMessage::Error(format!(
                        "{} is {:02X?}, expected {}",
                        field, bytes, desc.valid_range
                    )));
                }
            }
            (FieldKind::AsciiString, range) => {
                if !range.accepts(bytes) {
                    msgs.push(ValidationMessage::Warning(format!(
                        "{} contains characters outside {}",
                        field, range
                    )));
                }
            }
            (_, range) => {
                if let Some(&bad) = bytes.iter().find(|&&b| !range.contains(b)) {
                    msgs.push(ValidationMessage::Warning(format!(
                        "{} value {} is out of range ({})",
                        field, bad, range
                    )));
                }
            }
        }
    }

    // Stored slots start at 64, anything below is neither temp nor a slot
    let msb = data[FieldId::AddressMsb.descriptor().position];
    if msb != ADDRESS_TEMP && msb < ADDRESS_BASE {
        msgs.push(ValidationMessage::Warning(format!(
            "Address MSB {} does not select a patch slot",
            msb
        )));
    }

    msgs
}

/// Check if validation messages contain any errors
pub fn has_errors(messages: &[ValidationMessage]) -> bool {
    messages.iter().any(|m| m.is_error())
}

/// Check if validation messages contain any warnings
pub fn has_warnings(messages: &[ValidationMessage]) -> bool {
    messages.iter().any(|m| m.is_warning())
}

/// Filter out only error messages
pub fn errors_only(messages: &[ValidationMessage]) -> Vec<String> {
    messages
        .iter()
        .filter(|m| m.is_error())
        .map(|m| m.message().to_string())
        .collect()
}

/// Filter out only warning messages
pub fn warnings_only(messages: &[ValidationMessage]) -> Vec<String> {
    messages
        .iter()
        .filter(|m| m.is_warning())
        .map(|m| m.message().to_string())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn position(field: FieldId) -> usize {
        field.descriptor().position
    }

    #[test]
    fn test_default_record_is_clean() {
        assert!(validate_record(&DEFAULT_RECORD).is_empty());
        assert!(validate_patch(&Gp8Patch::new()).is_empty());
    }

    #[test]
    fn test_corrupt_marker_is_error() {
        let mut data = DEFAULT_RECORD;
        data[position(FieldId::SysexEnd)] = 0xF6;

        let msgs = validate_record(&data);
        assert!(has_errors(&msgs));
        assert!(!has_warnings(&msgs));
        assert!(errors_only(&msgs)[0].starts_with("SYSEX_END"));
    }

    #[test]
    fn test_malformed_boolean_is_warning() {
        let mut data = DEFAULT_RECORD;
        data[position(FieldId::ExtControl1)] = 7;

        let msgs = validate_record(&data);
        assert!(!has_errors(&msgs));
        let warnings = warnings_only(&msgs);
        assert_eq!(warnings.len(), 1);
        assert_eq!(warnings[0], "EXT_CONTROL_1 value 7 is out of range (on/off)");
    }

    #[test]
    fn test_out_of_range_values() {
        let mut data = DEFAULT_RECORD;
        data[position(FieldId::EqGain)] = 101;
        data[position(FieldId::EffectLsb)] = 0x1F;
        data[position(FieldId::AddressLsb)] = 1;
        data[position(FieldId::DelayTime) + 1] = 0x80;
        data[position(FieldId::Name)] = 0x07;

        let warnings = warnings_only(&validate_record(&data));
        assert_eq!(warnings.len(), 5);
        assert!(warnings.iter().any(|w| w.starts_with("EQ_GAIN value 101")));
        assert!(warnings.iter().any(|w| w.starts_with("ADDR_LSB value 1")));
        assert!(warnings.iter().any(|w| w.starts_with("NAME contains")));
    }

    #[test]
    fn test_address_gap() {
        let mut data = DEFAULT_RECORD;
        data[position(FieldId::AddressMsb)] = 12;
        let warnings = warnings_only(&validate_record(&data));
        assert_eq!(warnings, vec!["Address MSB 12 does not select a patch slot"]);
    }

    #[test]
    fn test_validation_helpers() {
        let msgs = vec![
            ValidationMessage::Warning("test warning".to_string()),
            ValidationMessage::Error("test error".to_string()),
        ];

        assert!(has_errors(&msgs));
        assert!(has_warnings(&msgs));

        let errors = errors_only(&msgs);
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0], "test error");

        let warnings = warnings_only(&msgs);
        assert_eq!(warnings.len(), 1);
        assert_eq!(warnings[0], "test warning");
    }
}
