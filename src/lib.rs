// GP8-RS: patch record library for the Roland GP-8 guitar effects processor
// Copyright 2024 - Licensed under GPLv3

pub mod bitwise;
pub mod core;
pub mod formats;
pub mod memmap;
pub mod patch;

// Re-export commonly used types
pub use bitwise::{parse_all_records, parse_record};
pub use self::core::{
    constants::*, effects::Effect, schema::FieldId, validation, FieldKind, ValidationMessage,
};
pub use formats::{load_syx, read_syx, save_syx, PatchSummary, SyxError};
pub use memmap::DumpMap;
pub use patch::{FieldValue, Gp8Patch, Group, PatchAddress, PatchError};

/// GP8-RS version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
    }

    #[test]
    fn test_dry_rhythm_end_to_end() {
        let hex = "f0410013124040000a0050646464643c006432211e3c3c32323c64320310191a0f\
                   64411b14000000204472792052687974686d20202020200023f7";
        let bytes: Vec<u8> = (0..hex.len())
            .step_by(2)
            .map(|i| u8::from_str_radix(&hex[i..i + 2], 16).unwrap())
            .collect();

        let patches = read_syx(&bytes).unwrap();
        assert_eq!(patches.len(), 1);

        let patch = &patches[0];
        assert_eq!(patch.to_string(), "B-1-1: Dry Rhythm     ");
        assert_eq!(
            patch.enabled_effects(),
            vec![Effect::Compressor, Effect::Distortion]
        );
        assert!(patch.validate().is_empty());
        assert_eq!(patch.csv_hex().replace(',', ""), hex);
    }
}
