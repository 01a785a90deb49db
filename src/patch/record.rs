// GP-8 patch record accessor
// Reads and writes named fields of one 59-byte patch SysEx record in place.

use super::address::{decode_bank, decode_program, encode_bank, encode_slot, Group, PatchAddress};
use super::value::{FieldValue, PatchError, PatchResult};
use crate::core::constants::*;
use crate::core::effects::Effect;
use crate::core::schema::{FieldDescriptor, FieldId, FieldKind, ValidRange};
use crate::core::validation::{validate_record, ValidationMessage};
use std::fmt;

/// One GP-8 patch, backed by its raw SysEx record.
///
/// Reads never fail: bytes loaded from a dump are returned as they are, even
/// when they are outside the field's range. Writes are validated and either
/// fully applied or rejected with the buffer untouched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Gp8Patch {
    data: [u8; RECORD_SIZE],
}

impl Gp8Patch {
    /// Create a blank patch addressed to the temporary area
    pub fn new() -> Self {
        Self {
            data: DEFAULT_RECORD,
        }
    }

    /// Create a patch from a copy of exactly one record
    pub fn from_bytes(data: &[u8]) -> PatchResult<Self> {
        let data: [u8; RECORD_SIZE] =
            data.try_into().map_err(|_| PatchError::InvalidLength {
                expected: RECORD_SIZE,
                actual: data.len(),
            })?;
        Ok(Self { data })
    }

    /// The raw record
    pub fn as_bytes(&self) -> &[u8; RECORD_SIZE] {
        &self.data
    }

    /// Check every field against its declared range
    pub fn validate(&self) -> Vec<ValidationMessage> {
        validate_record(&self.data)
    }

    fn bytes(&self, desc: &FieldDescriptor) -> &[u8] {
        &self.data[desc.span()]
    }

    fn check_kind(field: FieldId, desc: &FieldDescriptor, wanted: FieldKind) -> PatchResult<()> {
        let compatible = desc.kind == wanted
            || (wanted == FieldKind::Integer && desc.kind == FieldKind::BitFlags);
        if compatible {
            Ok(())
        } else {
            Err(PatchError::KindMismatch {
                field,
                expected: desc.kind,
                actual: wanted,
            })
        }
    }

    // Typed reads

    // Reads never check the field kind. Each one decodes the field's bytes
    // its own way whatever the schema says; use `get` for kind dispatch.

    /// First byte of a field, as stored
    pub fn read_integer(&self, field: FieldId) -> u8 {
        self.data[field.descriptor().position]
    }

    /// Decode the first byte of a field as a switch. Only 100 is on; 0 and
    /// any malformed byte read as off.
    pub fn read_boolean(&self, field: FieldId) -> bool {
        self.data[field.descriptor().position] == BOOL_ON
    }

    /// Verbatim bytes of a field
    pub fn read_raw_bytes(&self, field: FieldId) -> &[u8] {
        self.bytes(&field.descriptor())
    }

    /// Decode a field's bytes as text, without trimming
    pub fn read_ascii_string(&self, field: FieldId) -> String {
        String::from_utf8_lossy(self.bytes(&field.descriptor())).into_owned()
    }

    // Typed writes

    /// Store an integer or bit flag value after checking its range
    pub fn write_integer(&mut self, field: FieldId, value: u8) -> PatchResult<()> {
        let desc = field.descriptor();
        Self::check_kind(field, &desc, FieldKind::Integer)?;

        if !desc.valid_range.contains(value) {
            return Err(PatchError::Range {
                field,
                value,
                allowed: desc.valid_range,
            });
        }

        tracing::debug!("{} = {}", field, value);
        self.data[desc.position] = value;
        Ok(())
    }

    /// Store a boolean as 100 (on) or 0 (off)
    pub fn write_boolean(&mut self, field: FieldId, value: bool) -> PatchResult<()> {
        let desc = field.descriptor();
        Self::check_kind(field, &desc, FieldKind::Boolean)?;

        tracing::debug!("{} = {}", field, value);
        self.data[desc.position] = if value { BOOL_ON } else { BOOL_OFF };
        Ok(())
    }

    /// Store text, space padded or truncated to the field width
    pub fn write_ascii_string(&mut self, field: FieldId, value: &str) -> PatchResult<()> {
        let desc = field.descriptor();
        Self::check_kind(field, &desc, FieldKind::AsciiString)?;

        let mut bytes: Vec<u8> = value.bytes().take(desc.length).collect();
        if !desc.valid_range.accepts(&bytes) {
            return Err(PatchError::NonAscii { field });
        }
        bytes.resize(desc.length, b' ');

        tracing::debug!("{} = {:?}", field, String::from_utf8_lossy(&bytes));
        self.data[desc.span()].copy_from_slice(&bytes);
        Ok(())
    }

    /// Store raw bytes. Markers only accept their exact pattern.
    pub fn write_raw_bytes(&mut self, field: FieldId, value: &[u8]) -> PatchResult<()> {
        let desc = field.descriptor();
        Self::check_kind(field, &desc, FieldKind::RawBytes)?;

        if value.len() != desc.length {
            return Err(PatchError::InvalidLength {
                expected: desc.length,
                actual: value.len(),
            });
        }

        if let ValidRange::Exact(_) = desc.valid_range {
            if !desc.valid_range.accepts(value) {
                return Err(PatchError::PatternMismatch { field });
            }
        } else if let Some(&bad) = value.iter().find(|&&b| !desc.valid_range.contains(b)) {
            return Err(PatchError::Range {
                field,
                value: bad,
                allowed: desc.valid_range,
            });
        }

        tracing::debug!("{} = {:02X?}", field, value);
        self.data[desc.span()].copy_from_slice(value);
        Ok(())
    }

    /// Restore a field to its default bytes
    pub fn reset_field(&mut self, field: FieldId) {
        let desc = field.descriptor();
        tracing::debug!("{} reset", field);
        self.data[desc.span()].copy_from_slice(desc.default_value());
    }

    // Kind-dispatched access

    /// Read any field as a typed value
    pub fn get(&self, field: FieldId) -> FieldValue {
        match field.descriptor().kind {
            FieldKind::Integer | FieldKind::BitFlags => {
                FieldValue::Integer(self.read_integer(field))
            }
            FieldKind::Boolean => FieldValue::Boolean(self.read_boolean(field)),
            FieldKind::RawBytes => FieldValue::Bytes(self.read_raw_bytes(field).to_vec()),
            FieldKind::AsciiString => FieldValue::Text(self.read_ascii_string(field)),
        }
    }

    /// Write any field from a typed value
    pub fn set(&mut self, field: FieldId, value: FieldValue) -> PatchResult<()> {
        match value {
            FieldValue::Integer(v) => self.write_integer(field, v),
            FieldValue::Boolean(v) => self.write_boolean(field, v),
            FieldValue::Bytes(v) => self.write_raw_bytes(field, &v),
            FieldValue::Text(v) => self.write_ascii_string(field, &v),
        }
    }

    /// Restore a field to its default
    pub fn reset(&mut self, field: FieldId) {
        self.reset_field(field)
    }

    // Effect switches

    /// Whether an effect block is switched on
    pub fn effect(&self, effect: Effect) -> bool {
        let mask = effect.mask();
        self.read_integer(effect.bank().field()) & mask == mask
    }

    /// Switch an effect block on or off.
    ///
    /// The bank byte is only written when the state actually changes, and
    /// then only the effect's bit is flipped.
    pub fn set_effect(&mut self, effect: Effect, on: bool) -> PatchResult<()> {
        if self.effect(effect) == on {
            return Ok(());
        }
        let field = effect.bank().field();
        let flipped = self.read_integer(field) ^ effect.mask();
        self.write_integer(field, flipped)
    }

    /// Switch an effect back to its state in a new patch
    pub fn reset_effect(&mut self, effect: Effect) -> PatchResult<()> {
        let desc = effect.bank().field().descriptor();
        let mask = effect.mask();
        let default_on = desc.default_value()[0] & mask == mask;
        self.set_effect(effect, default_on)
    }

    /// On/off state of every effect
    pub fn effects(&self) -> Vec<(Effect, bool)> {
        Effect::ALL.iter().map(|&e| (e, self.effect(e))).collect()
    }

    /// Effects that are switched on
    pub fn enabled_effects(&self) -> Vec<Effect> {
        Effect::ALL
            .iter()
            .copied()
            .filter(|&e| self.effect(e))
            .collect()
    }

    // Name

    pub fn name(&self) -> String {
        self.read_ascii_string(FieldId::Name)
    }

    /// Set the patch name, padded or truncated to 16 characters
    pub fn set_name(&mut self, name: &str) -> PatchResult<()> {
        self.write_ascii_string(FieldId::Name, name)
    }

    pub fn reset_name(&mut self) {
        self.reset_field(FieldId::Name)
    }

    // Address

    pub fn group(&self) -> Group {
        Group::from_lsb(self.read_integer(FieldId::AddressLsb))
    }

    /// Select group 'A' or 'B'
    pub fn set_group(&mut self, group: char) -> PatchResult<()> {
        let group = Group::try_from(group)?;
        self.write_integer(FieldId::AddressLsb, group.lsb())
    }

    /// Bank 1-8, or 0 for the temporary area
    pub fn bank(&self) -> u8 {
        decode_bank(self.read_integer(FieldId::AddressMsb))
    }

    /// Program 1-8, or 0 for the temporary area
    pub fn program(&self) -> u8 {
        decode_program(self.read_integer(FieldId::AddressMsb))
    }

    /// Set the bank, keeping the current program. A patch in the
    /// temporary area keeps program 0, so bank 1 lands on 40h (1-1).
    pub fn set_bank(&mut self, bank: u8) -> PatchResult<()> {
        let msb = encode_bank(bank, self.program())?;
        self.write_integer(FieldId::AddressMsb, msb)
    }

    /// Set the program, keeping the current bank. A patch in the
    /// temporary area takes bank 1.
    pub fn set_program(&mut self, program: u8) -> PatchResult<()> {
        let bank = self.bank().max(1);
        let msb = encode_slot(bank, program)?;
        self.write_integer(FieldId::AddressMsb, msb)
    }

    pub fn address(&self) -> PatchAddress {
        PatchAddress::from_bytes(
            self.read_integer(FieldId::AddressMsb),
            self.read_integer(FieldId::AddressLsb),
        )
    }

    pub fn set_address(&mut self, address: PatchAddress) -> PatchResult<()> {
        let (msb, lsb) = address.to_bytes()?;
        self.write_integer(FieldId::AddressMsb, msb)?;
        self.write_integer(FieldId::AddressLsb, lsb)
    }

    // Export

    /// Comma separated lowercase hex of the whole record, e.g. "f0,41,...,f7"
    pub fn csv_hex(&self) -> String {
        self.data
            .iter()
            .map(|b| format!("{:02x}", b))
            .collect::<Vec<_>>()
            .join(",")
    }
}

impl Default for Gp8Patch {
    fn default() -> Self {
        Self::new()
    }
}

impl TryFrom<&[u8]> for Gp8Patch {
    type Error = PatchError;

    fn try_from(data: &[u8]) -> PatchResult<Self> {
        Self::from_bytes(data)
    }
}

impl AsRef<[u8]> for Gp8Patch {
    fn as_ref(&self) -> &[u8] {
        &self.data
    }
}

impl fmt::Display for Gp8Patch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}-{}-{}:{}",
            self.group(),
            self.bank(),
            self.program(),
            self.name()
        )
    }
}
