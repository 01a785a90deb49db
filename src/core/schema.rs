// Field schema for the GP-8 patch record
// Reference: GP-8 owner's manual, "Exclusive message" parameter map

use super::constants::*;
use std::collections::HashMap;
use std::fmt;
use std::ops::Range;
use std::str::FromStr;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SchemaError {
    #[error("Unknown field: {0}")]
    UnknownField(String),
}

pub type Result<T> = std::result::Result<T, SchemaError>;

/// How the bytes of a field are interpreted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldKind {
    /// Unsigned byte value
    Integer,
    /// `100` for on, `0` for off
    Boolean,
    /// Low nibble of on/off bits
    BitFlags,
    /// Bytes passed through verbatim (markers, opaque data)
    RawBytes,
    /// Fixed-width, space padded ASCII text
    AsciiString,
}

impl fmt::Display for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            FieldKind::Integer => "integer",
            FieldKind::Boolean => "boolean",
            FieldKind::BitFlags => "bit flags",
            FieldKind::RawBytes => "raw bytes",
            FieldKind::AsciiString => "ASCII string",
        };
        write!(f, "{}", name)
    }
}

/// Values a field may legally hold. Only enforced on write.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidRange {
    /// Inclusive interval, applied to every byte of the field
    Interval { min: u8, max: u8 },
    /// Explicit set of allowed byte values
    OneOf(&'static [u8]),
    /// Exact byte pattern (protocol markers)
    Exact(&'static [u8]),
    /// `true` / `false`
    Boolean,
    /// Any text of the field's width
    Text,
}

impl ValidRange {
    /// Check a single byte value against this range
    pub fn contains(&self, value: u8) -> bool {
        match self {
            ValidRange::Interval { min, max } => (*min..=*max).contains(&value),
            ValidRange::OneOf(values) => values.contains(&value),
            ValidRange::Exact(pattern) => pattern.len() == 1 && pattern[0] == value,
            ValidRange::Boolean => value == BOOL_ON || value == BOOL_OFF,
            ValidRange::Text => (0x20..=DATA_BYTE_MAX).contains(&value),
        }
    }

    /// Check a complete byte slice against this range
    pub fn accepts(&self, bytes: &[u8]) -> bool {
        match self {
            ValidRange::Exact(pattern) => bytes == *pattern,
            _ => bytes.iter().all(|&b| self.contains(b)),
        }
    }
}

impl fmt::Display for ValidRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidRange::Interval { min, max } => write!(f, "{}-{}", min, max),
            ValidRange::OneOf(values) => {
                let values: Vec<String> = values.iter().map(|v| v.to_string()).collect();
                write!(f, "one of {}", values.join(", "))
            }
            ValidRange::Exact(pattern) => {
                let hex: Vec<String> = pattern.iter().map(|b| format!("{:02X}h", b)).collect();
                write!(f, "exactly {}", hex.join(" "))
            }
            ValidRange::Boolean => write!(f, "on/off"),
            ValidRange::Text => write!(f, "ASCII 20h-7Fh"),
        }
    }
}

/// Static description of one field in the record
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldDescriptor {
    /// Byte offset into the record
    pub position: usize,
    /// Number of bytes occupied
    pub length: usize,
    pub kind: FieldKind,
    pub valid_range: ValidRange,
    /// Effect block or section the parameter belongs to
    pub category: &'static str,
    /// Human readable parameter name
    pub label: &'static str,
}

impl FieldDescriptor {
    const fn integer(position: usize, max: u8, category: &'static str, label: &'static str) -> Self {
        Self {
            position,
            length: 1,
            kind: FieldKind::Integer,
            valid_range: ValidRange::Interval { min: 0, max },
            category,
            label,
        }
    }

    const fn boolean(position: usize, category: &'static str, label: &'static str) -> Self {
        Self {
            position,
            length: 1,
            kind: FieldKind::Boolean,
            valid_range: ValidRange::Boolean,
            category,
            label,
        }
    }

    const fn bit_flags(position: usize, label: &'static str) -> Self {
        Self {
            position,
            length: 1,
            kind: FieldKind::BitFlags,
            valid_range: ValidRange::Interval { min: 0, max: 0x0F },
            category: "Effects",
            label,
        }
    }

    const fn marker(position: usize, pattern: &'static [u8], label: &'static str) -> Self {
        Self {
            position,
            length: pattern.len(),
            kind: FieldKind::RawBytes,
            valid_range: ValidRange::Exact(pattern),
            category: "System",
            label,
        }
    }

    const fn opaque(
        position: usize,
        length: usize,
        category: &'static str,
        label: &'static str,
    ) -> Self {
        Self {
            position,
            length,
            kind: FieldKind::RawBytes,
            valid_range: ValidRange::Interval {
                min: 0,
                max: DATA_BYTE_MAX,
            },
            category,
            label,
        }
    }

    /// Byte range occupied in the record
    pub fn span(&self) -> Range<usize> {
        self.position..self.position + self.length
    }

    /// Bytes restored by a reset, taken from the default record
    pub fn default_value(&self) -> &'static [u8] {
        &DEFAULT_RECORD[self.span()]
    }
}

/// Every addressable field of the patch record, in layout order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum FieldId {
    SysexBegin,
    ManufacturerId,
    DeviceId,
    ModelId,
    Command,
    AddressMsb,
    AddressLsb,
    EffectMsb,
    EffectLsb,
    FilterSens,
    FilterCutoffFreq,
    FilterQ,
    FilterUpDown,
    CompAttack,
    CompSustain,
    OdTone,
    OdDrive,
    OdTurbo,
    DistTone,
    DistDist,
    PhaserRate,
    PhaserDepth,
    PhaserResonance,
    EqHi,
    EqMid,
    EqLo,
    EqGain,
    DelayLevel,
    DelayTime,
    DelayFeedback,
    ChorusRate,
    ChorusDepth,
    ChorusLevel,
    ChorusPreDelay,
    ChorusFeedback,
    Volume,
    Ev5Param,
    ExtControl1,
    ExtControl2,
    Name,
    NameTerm,
    Checksum,
    SysexEnd,
}

impl FieldId {
    pub const ALL: [FieldId; 43] = [
        FieldId::SysexBegin,
        FieldId::ManufacturerId,
        FieldId::DeviceId,
        FieldId::ModelId,
        FieldId::Command,
        FieldId::AddressMsb,
        FieldId::AddressLsb,
        FieldId::EffectMsb,
        FieldId::EffectLsb,
        FieldId::FilterSens,
        FieldId::FilterCutoffFreq,
        FieldId::FilterQ,
        FieldId::FilterUpDown,
        FieldId::CompAttack,
        FieldId::CompSustain,
        FieldId::OdTone,
        FieldId::OdDrive,
        FieldId::OdTurbo,
        FieldId::DistTone,
        FieldId::DistDist,
        FieldId::PhaserRate,
        FieldId::PhaserDepth,
        FieldId::PhaserResonance,
        FieldId::EqHi,
        FieldId::EqMid,
        FieldId::EqLo,
        FieldId::EqGain,
        FieldId::DelayLevel,
        FieldId::DelayTime,
        FieldId::DelayFeedback,
        FieldId::ChorusRate,
        FieldId::ChorusDepth,
        FieldId::ChorusLevel,
        FieldId::ChorusPreDelay,
        FieldId::ChorusFeedback,
        FieldId::Volume,
        FieldId::Ev5Param,
        FieldId::ExtControl1,
        FieldId::ExtControl2,
        FieldId::Name,
        FieldId::NameTerm,
        FieldId::Checksum,
        FieldId::SysexEnd,
    ];

    /// Stable identifier used in dumps, JSON and on the command line
    pub fn id(&self) -> &'static str {
        match self {
            FieldId::SysexBegin => "SYSEX_BEGIN",
            FieldId::ManufacturerId => "MANUFACTURER_ID",
            FieldId::DeviceId => "DEVICE_ID",
            FieldId::ModelId => "MODEL_ID",
            FieldId::Command => "COMMAND",
            FieldId::AddressMsb => "ADDR_MSB",
            FieldId::AddressLsb => "ADDR_LSB",
            FieldId::EffectMsb => "EFFECT_MSB",
            FieldId::EffectLsb => "EFFECT_LSB",
            FieldId::FilterSens => "FILTER_SENS",
            FieldId::FilterCutoffFreq => "FILTER_CUTOFF_FREQ",
            FieldId::FilterQ => "FILTER_Q",
            FieldId::FilterUpDown => "FILTER_UP_DOWN",
            FieldId::CompAttack => "COMP_ATTACK",
            FieldId::CompSustain => "COMP_SUSTAIN",
            FieldId::OdTone => "OD_TONE",
            FieldId::OdDrive => "OD_DRIVE",
            FieldId::OdTurbo => "OD_TURBO",
            FieldId::DistTone => "DIST_TONE",
            FieldId::DistDist => "DIST_DIST",
            FieldId::PhaserRate => "PHASER_RATE",
            FieldId::PhaserDepth => "PHASER_DEPTH",
            FieldId::PhaserResonance => "PHASER_RESONANCE",
            FieldId::EqHi => "EQ_HI",
            FieldId::EqMid => "EQ_MID",
            FieldId::EqLo => "EQ_LO",
            FieldId::EqGain => "EQ_GAIN",
            FieldId::DelayLevel => "DELAY_LEVEL",
            FieldId::DelayTime => "DELAY_TIME",
            FieldId::DelayFeedback => "DELAY_FEEDBACK",
            FieldId::ChorusRate => "CHORUS_RATE",
            FieldId::ChorusDepth => "CHORUS_DEPTH",
            FieldId::ChorusLevel => "CHORUS_LEVEL",
            FieldId::ChorusPreDelay => "CHORUS_PRE_DELAY",
            FieldId::ChorusFeedback => "CHORUS_FEEDBACK",
            FieldId::Volume => "VOLUME",
            FieldId::Ev5Param => "EV5_PARAM",
            FieldId::ExtControl1 => "EXT_CONTROL_1",
            FieldId::ExtControl2 => "EXT_CONTROL_2",
            FieldId::Name => "NAME",
            FieldId::NameTerm => "NAME_TERM",
            FieldId::Checksum => "CHECKSUM",
            FieldId::SysexEnd => "SYSEX_END",
        }
    }

    /// Look up the static descriptor for this field
    pub fn descriptor(&self) -> FieldDescriptor {
        use FieldDescriptor as D;

        match self {
            FieldId::SysexBegin => D::marker(0, &[SYSEX_BEGIN], "Sysex Begin Message"),
            FieldId::ManufacturerId => D::marker(1, &[MANUFACTURER_ROLAND], "Manufacturer ID"),
            FieldId::DeviceId => D::integer(2, 15, "System", "Device ID"),
            FieldId::ModelId => D::marker(3, &[MODEL_GP8], "Model ID"),
            FieldId::Command => D::marker(4, &[COMMAND_DT1], "Command"),
            FieldId::AddressMsb => D::integer(5, DATA_BYTE_MAX, "Address", "Address MSB"),
            FieldId::AddressLsb => D {
                valid_range: ValidRange::OneOf(&[GROUP_A_LSB, GROUP_B_LSB]),
                ..D::integer(6, GROUP_B_LSB, "Address", "Address LSB")
            },
            FieldId::EffectMsb => D::bit_flags(7, "Effect MSB"),
            FieldId::EffectLsb => D::bit_flags(8, "Effect LSB"),

            FieldId::FilterSens => D::integer(9, 100, "Filter", "Sensitivity"),
            FieldId::FilterCutoffFreq => D::integer(10, 100, "Filter", "Cutoff Frequency"),
            FieldId::FilterQ => D::integer(11, 100, "Filter", "Q"),
            FieldId::FilterUpDown => D::boolean(12, "Filter", "Direction"),

            FieldId::CompAttack => D::integer(13, 100, "Compressor", "Attack"),
            FieldId::CompSustain => D::integer(14, 100, "Compressor", "Sustain"),

            FieldId::OdTone => D::integer(15, 100, "Overdrive", "Tone"),
            FieldId::OdDrive => D::integer(16, 100, "Overdrive", "Drive"),
            FieldId::OdTurbo => D::boolean(17, "Overdrive", "Turbo"),

            FieldId::DistTone => D::integer(18, 100, "Distortion", "Tone"),
            FieldId::DistDist => D::integer(19, 100, "Distortion", "Distortion"),

            FieldId::PhaserRate => D::integer(20, 100, "Phaser", "Rate"),
            FieldId::PhaserDepth => D::integer(21, 100, "Phaser", "Depth"),
            FieldId::PhaserResonance => D::integer(22, 100, "Phaser", "Resonance"),

            FieldId::EqHi => D::integer(23, 100, "Equalizer", "High"),
            FieldId::EqMid => D::integer(24, 100, "Equalizer", "Mid"),
            FieldId::EqLo => D::integer(25, 100, "Equalizer", "Low"),
            FieldId::EqGain => D::integer(26, 100, "Equalizer", "Gain"),

            FieldId::DelayLevel => D::integer(27, 100, "Delay", "Level"),
            // Two 7-bit data bytes. The device documents 0-1000 for the
            // combined value but the byte split is not confirmed yet, so the
            // bytes are exposed raw.
            FieldId::DelayTime => D::opaque(28, 2, "Delay", "Time"),
            FieldId::DelayFeedback => D::integer(30, 100, "Delay", "Feedback"),

            FieldId::ChorusRate => D::integer(31, 100, "Chorus", "Rate"),
            FieldId::ChorusDepth => D::integer(32, 100, "Chorus", "Depth"),
            FieldId::ChorusLevel => D::integer(33, 100, "Chorus", "Level"),
            FieldId::ChorusPreDelay => D::integer(34, 100, "Chorus", "Pre Delay"),
            FieldId::ChorusFeedback => D::integer(35, 100, "Chorus", "Feedback"),

            FieldId::Volume => D::integer(36, 100, "Master", "Volume"),
            // 0 = off, 1 = FILTER_SENS ... 27 = VOLUME
            FieldId::Ev5Param => D::integer(37, 27, "Master", "EV-5 Parameter"),
            FieldId::ExtControl1 => D::boolean(38, "Master", "External Control 1"),
            FieldId::ExtControl2 => D::boolean(39, "Master", "External Control 2"),

            FieldId::Name => D {
                position: 40,
                length: NAME_LENGTH,
                kind: FieldKind::AsciiString,
                valid_range: ValidRange::Text,
                category: "Name",
                label: "Name",
            },
            FieldId::NameTerm => D::marker(56, &[0x00], "String Terminator"),
            // Checksum is carried verbatim, it is never computed here
            FieldId::Checksum => D::opaque(57, 1, "System", "Checksum"),
            FieldId::SysexEnd => D::marker(58, &[SYSEX_END], "Sysex Message End"),
        }
    }

    /// Look up a field by its identifier, case-insensitively
    pub fn from_name(name: &str) -> Result<FieldId> {
        let key = name.trim().to_ascii_lowercase().replace('-', "_");
        FIELD_NAMES
            .get(key.as_str())
            .copied()
            .ok_or_else(|| SchemaError::UnknownField(name.to_string()))
    }
}

lazy_static::lazy_static! {
    static ref FIELD_NAMES: HashMap<String, FieldId> = {
        let mut names: HashMap<String, FieldId> = FieldId::ALL
            .iter()
            .map(|field| (field.id().to_ascii_lowercase(), *field))
            .collect();
        names.insert("master_volume".to_string(), FieldId::Volume);
        names
    };
}

impl fmt::Display for FieldId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.id())
    }
}

impl FromStr for FieldId {
    type Err = SchemaError;

    fn from_str(s: &str) -> Result<Self> {
        FieldId::from_name(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fields_tile_the_record() {
        let mut owner: [Option<FieldId>; RECORD_SIZE] = [None; RECORD_SIZE];

        for field in FieldId::ALL {
            let desc = field.descriptor();
            assert!(desc.span().end <= RECORD_SIZE, "{} runs past the record", field);
            for pos in desc.span() {
                assert!(
                    owner[pos].is_none(),
                    "{} overlaps {:?} at byte {}",
                    field,
                    owner[pos],
                    pos
                );
                owner[pos] = Some(field);
            }
        }

        assert!(owner.iter().all(|o| o.is_some()), "record has unmapped bytes");
    }

    #[test]
    fn test_all_is_in_layout_order() {
        let positions: Vec<usize> = FieldId::ALL
            .iter()
            .map(|f| f.descriptor().position)
            .collect();
        let mut sorted = positions.clone();
        sorted.sort();
        assert_eq!(positions, sorted);
    }

    #[test]
    fn test_defaults_match_length() {
        for field in FieldId::ALL {
            let desc = field.descriptor();
            assert_eq!(desc.default_value().len(), desc.length, "{}", field);
        }
        assert_eq!(FieldId::SysexBegin.descriptor().default_value(), &[0xF0]);
        assert_eq!(FieldId::FilterCutoffFreq.descriptor().default_value(), &[80]);
        assert_eq!(FieldId::DelayTime.descriptor().default_value(), &[0x03, 0x10]);
        assert_eq!(
            FieldId::Name.descriptor().default_value(),
            DEFAULT_NAME.as_bytes()
        );
    }

    #[test]
    fn test_table_positions() {
        assert_eq!(FieldId::AddressMsb.descriptor().position, 5);
        assert_eq!(FieldId::DelayTime.descriptor().length, 2);
        assert_eq!(FieldId::DelayFeedback.descriptor().position, 30);
        assert_eq!(FieldId::Name.descriptor().position, 40);
        assert_eq!(FieldId::Name.descriptor().length, 16);
        assert_eq!(FieldId::Checksum.descriptor().position, 57);
        assert_eq!(FieldId::SysexEnd.descriptor().position, 58);
        assert_eq!(FieldId::DeviceId.descriptor().category, "System");
    }

    #[test]
    fn test_from_name() {
        assert_eq!(FieldId::from_name("EQ_LO").unwrap(), FieldId::EqLo);
        assert_eq!(FieldId::from_name("eq_lo").unwrap(), FieldId::EqLo);
        assert_eq!(FieldId::from_name("chorus-pre-delay").unwrap(), FieldId::ChorusPreDelay);
        assert_eq!(FieldId::from_name("MASTER_VOLUME").unwrap(), FieldId::Volume);
        assert_eq!("name".parse::<FieldId>().unwrap(), FieldId::Name);

        for field in FieldId::ALL {
            assert_eq!(FieldId::from_name(field.id()).unwrap(), field);
        }
    }

    #[test]
    fn test_unknown_field() {
        assert_eq!(
            FieldId::from_name("FLANGER"),
            Err(SchemaError::UnknownField("FLANGER".to_string()))
        );
    }

    #[test]
    fn test_valid_range() {
        let percent = ValidRange::Interval { min: 0, max: 100 };
        assert!(percent.contains(0));
        assert!(percent.contains(100));
        assert!(!percent.contains(101));

        let group = ValidRange::OneOf(&[0, 64]);
        assert!(group.contains(64));
        assert!(!group.contains(1));

        let marker = ValidRange::Exact(&[0xF0]);
        assert!(marker.accepts(&[0xF0]));
        assert!(!marker.accepts(&[0xF1]));

        assert!(ValidRange::Boolean.contains(100));
        assert!(!ValidRange::Boolean.contains(1));

        assert_eq!(percent.to_string(), "0-100");
        assert_eq!(marker.to_string(), "exactly F0h");
    }
}
