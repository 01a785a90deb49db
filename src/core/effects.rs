// Effect on/off switches
//
// The GP-8 stores the on/off state of its eight effect blocks as bits in
// the low nibble of two bytes (EFFECT_MSB and EFFECT_LSB):
//
//   MSB: bit 0 Phaser, bit 1 Equalizer, bit 2 Delay, bit 3 Chorus
//   LSB: bit 0 Dynamic Filter, bit 1 Compressor, bit 2 Overdrive, bit 3 Distortion

use super::schema::{FieldId, SchemaError};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

/// One of the two effect switch bytes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EffectBank {
    Msb,
    Lsb,
}

impl EffectBank {
    /// Record field holding this bank's bits
    pub fn field(&self) -> FieldId {
        match self {
            EffectBank::Msb => FieldId::EffectMsb,
            EffectBank::Lsb => FieldId::EffectLsb,
        }
    }
}

/// Effect blocks that can be switched on or off
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Effect {
    Phaser,
    Equalizer,
    Delay,
    Chorus,
    DynamicFilter,
    Compressor,
    Overdrive,
    Distortion,
}

/// (bank, effect, mask) for every switch
const EFFECT_FLAGS: [(EffectBank, Effect, u8); 8] = [
    (EffectBank::Msb, Effect::Phaser, 0x01),
    (EffectBank::Msb, Effect::Equalizer, 0x02),
    (EffectBank::Msb, Effect::Delay, 0x04),
    (EffectBank::Msb, Effect::Chorus, 0x08),
    (EffectBank::Lsb, Effect::DynamicFilter, 0x01),
    (EffectBank::Lsb, Effect::Compressor, 0x02),
    (EffectBank::Lsb, Effect::Overdrive, 0x04),
    (EffectBank::Lsb, Effect::Distortion, 0x08),
];

lazy_static::lazy_static! {
    static ref EFFECT_MASKS: HashMap<(EffectBank, Effect), u8> = EFFECT_FLAGS
        .iter()
        .map(|&(bank, effect, mask)| ((bank, effect), mask))
        .collect();
}

/// Look up the bit mask of an effect within a bank.
/// Returns None when the effect does not live in that bank.
pub fn effect_mask(bank: EffectBank, effect: Effect) -> Option<u8> {
    EFFECT_MASKS.get(&(bank, effect)).copied()
}

impl Effect {
    /// All effects, MSB bank first, in bit order
    pub const ALL: [Effect; 8] = [
        Effect::Phaser,
        Effect::Equalizer,
        Effect::Delay,
        Effect::Chorus,
        Effect::DynamicFilter,
        Effect::Compressor,
        Effect::Overdrive,
        Effect::Distortion,
    ];

    /// Bank byte holding this effect's switch
    pub fn bank(&self) -> EffectBank {
        match self {
            Effect::Phaser | Effect::Equalizer | Effect::Delay | Effect::Chorus => EffectBank::Msb,
            _ => EffectBank::Lsb,
        }
    }

    /// Bit mask of this effect within its bank
    pub fn mask(&self) -> u8 {
        effect_mask(self.bank(), *self).unwrap_or(0)
    }

    /// Display name
    pub fn label(&self) -> &'static str {
        match self {
            Effect::Phaser => "Phaser",
            Effect::Equalizer => "Equalizer",
            Effect::Delay => "Delay",
            Effect::Chorus => "Chorus",
            Effect::DynamicFilter => "Dynamic Filter",
            Effect::Compressor => "Compressor",
            Effect::Overdrive => "Overdrive",
            Effect::Distortion => "Distortion",
        }
    }
}

impl fmt::Display for Effect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.label())
    }
}

impl FromStr for Effect {
    type Err = SchemaError;

    /// Accepts the display name in any case, with spaces, dashes or
    /// underscores, plus "filter" for the dynamic filter.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key: String = s
            .trim()
            .to_ascii_lowercase()
            .chars()
            .filter(|c| !matches!(c, ' ' | '_' | '-'))
            .collect();

        let effect = match key.as_str() {
            "phaser" => Effect::Phaser,
            "equalizer" | "eq" => Effect::Equalizer,
            "delay" => Effect::Delay,
            "chorus" => Effect::Chorus,
            "dynamicfilter" | "filter" => Effect::DynamicFilter,
            "compressor" => Effect::Compressor,
            "overdrive" => Effect::Overdrive,
            "distortion" => Effect::Distortion,
            _ => return Err(SchemaError::UnknownField(s.to_string())),
        };
        Ok(effect)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_masks() {
        assert_eq!(Effect::Phaser.mask(), 0x01);
        assert_eq!(Effect::Chorus.mask(), 0x08);
        assert_eq!(Effect::DynamicFilter.mask(), 0x01);
        assert_eq!(Effect::Distortion.mask(), 0x08);
    }

    #[test]
    fn test_lookup_by_bank() {
        assert_eq!(effect_mask(EffectBank::Msb, Effect::Delay), Some(0x04));
        assert_eq!(effect_mask(EffectBank::Lsb, Effect::Overdrive), Some(0x04));
        assert_eq!(effect_mask(EffectBank::Lsb, Effect::Delay), None);
        assert_eq!(effect_mask(EffectBank::Msb, Effect::Compressor), None);
    }

    #[test]
    fn test_masks_are_unique_per_bank() {
        for bank in [EffectBank::Msb, EffectBank::Lsb] {
            let combined = Effect::ALL
                .iter()
                .filter(|e| e.bank() == bank)
                .fold(0u8, |acc, e| {
                    assert_eq!(acc & e.mask(), 0);
                    acc | e.mask()
                });
            assert_eq!(combined, 0x0F);
        }
    }

    #[test]
    fn test_bank_fields() {
        assert_eq!(EffectBank::Msb.field(), FieldId::EffectMsb);
        assert_eq!(EffectBank::Lsb.field(), FieldId::EffectLsb);
    }

    #[test]
    fn test_parse_effect() {
        assert_eq!("Dynamic Filter".parse::<Effect>().unwrap(), Effect::DynamicFilter);
        assert_eq!("dynamic_filter".parse::<Effect>().unwrap(), Effect::DynamicFilter);
        assert_eq!("filter".parse::<Effect>().unwrap(), Effect::DynamicFilter);
        assert_eq!("CHORUS".parse::<Effect>().unwrap(), Effect::Chorus);
        assert!("flanger".parse::<Effect>().is_err());
    }
}
