// Patch memory addressing
//
// The GP-8 holds 128 patches: two groups (A/B) of 8 banks with 8 programs
// each. A patch record carries its destination in two address bytes:
//
// - Address LSB selects the group: 64 is group B, anything else group A.
// - Address MSB packs bank and program. 0 is the temporary (immediate
//   edit) area. Otherwise bank = (msb - 64) / 8 + 1 and
//   program = (msb - 64) % 8 + 1.
//
// Encoding a stored slot uses ((bank - 1) * 7) + program + 64. The multiplier
// differs from the decoder's divisor, so only some bank/program pairs survive
// an encode/decode round trip. This mirrors the device tooling byte for byte.

use super::value::{PatchError, PatchResult};
use crate::core::constants::*;
use crate::core::schema::{FieldId, ValidRange};
use std::fmt;
use std::str::FromStr;

/// Patch group selector
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Group {
    A,
    B,
}

impl Group {
    /// Decode the group from the address LSB
    pub fn from_lsb(lsb: u8) -> Self {
        if lsb == GROUP_B_LSB {
            Group::B
        } else {
            Group::A
        }
    }

    /// Address LSB value for this group
    pub fn lsb(&self) -> u8 {
        match self {
            Group::A => GROUP_A_LSB,
            Group::B => GROUP_B_LSB,
        }
    }

    pub fn as_char(&self) -> char {
        match self {
            Group::A => 'A',
            Group::B => 'B',
        }
    }
}

impl TryFrom<char> for Group {
    type Error = PatchError;

    fn try_from(value: char) -> PatchResult<Self> {
        match value {
            'A' => Ok(Group::A),
            'B' => Ok(Group::B),
            other => Err(PatchError::InvalidGroup(other)),
        }
    }
}

impl fmt::Display for Group {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_char())
    }
}

/// Decode the bank (1-8) from an address MSB, 0 for the temporary area
pub fn decode_bank(msb: u8) -> u8 {
    if msb == ADDRESS_TEMP {
        return 0;
    }
    msb.saturating_sub(ADDRESS_BASE) / NUM_PROGRAMS + 1
}

/// Decode the program (1-8) from an address MSB, 0 for the temporary area
pub fn decode_program(msb: u8) -> u8 {
    if msb == ADDRESS_TEMP {
        return 0;
    }
    // 256 is a multiple of 8, so wrapping keeps (msb - 64) mod 8 exact
    msb.wrapping_sub(ADDRESS_BASE) % NUM_PROGRAMS + 1
}

/// Encode bank and program (both 1-8) into an address MSB
pub fn encode_slot(bank: u8, program: u8) -> PatchResult<u8> {
    check_slot_value(bank, NUM_BANKS)?;
    check_slot_value(program, NUM_PROGRAMS)?;
    Ok(pack_slot(bank, program))
}

/// Encode a bank (1-8) together with the program currently stored, which
/// is 0 while the patch sits in the temporary area
pub fn encode_bank(bank: u8, current_program: u8) -> PatchResult<u8> {
    check_slot_value(bank, NUM_BANKS)?;
    Ok(pack_slot(bank, current_program))
}

fn pack_slot(bank: u8, program: u8) -> u8 {
    (bank - 1) * 7 + program + ADDRESS_BASE
}

fn check_slot_value(value: u8, max: u8) -> PatchResult<()> {
    if (1..=max).contains(&value) {
        Ok(())
    } else {
        Err(PatchError::Range {
            field: FieldId::AddressMsb,
            value,
            allowed: ValidRange::Interval { min: 1, max },
        })
    }
}

/// Where a patch record is addressed to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PatchAddress {
    /// Temporary area at `00 00`, edits are heard immediately
    Temp,
    /// Stored patch slot
    Slot { group: Group, bank: u8, program: u8 },
}

impl PatchAddress {
    /// Decode from the two raw address bytes
    pub fn from_bytes(msb: u8, lsb: u8) -> Self {
        if msb == ADDRESS_TEMP {
            PatchAddress::Temp
        } else {
            PatchAddress::Slot {
                group: Group::from_lsb(lsb),
                bank: decode_bank(msb),
                program: decode_program(msb),
            }
        }
    }

    /// Encode into (msb, lsb)
    pub fn to_bytes(&self) -> PatchResult<(u8, u8)> {
        match *self {
            PatchAddress::Temp => Ok((ADDRESS_TEMP, GROUP_A_LSB)),
            PatchAddress::Slot {
                group,
                bank,
                program,
            } => Ok((encode_slot(bank, program)?, group.lsb())),
        }
    }
}

impl fmt::Display for PatchAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PatchAddress::Temp => write!(f, "TEMP"),
            PatchAddress::Slot {
                group,
                bank,
                program,
            } => write!(f, "{}-{}-{}", group, bank, program),
        }
    }
}

lazy_static::lazy_static! {
    static ref ADDRESS_RE: regex::Regex =
        regex::Regex::new(r"^\s*([ABab])\s*-\s*([1-8])\s*-\s*([1-8])\s*$").unwrap();
}

impl FromStr for PatchAddress {
    type Err = PatchError;

    /// Parse "TEMP" or "group-bank-program", e.g. "B-3-4"
    fn from_str(s: &str) -> PatchResult<Self> {
        if s.trim().eq_ignore_ascii_case("temp") {
            return Ok(PatchAddress::Temp);
        }

        let caps = ADDRESS_RE
            .captures(s)
            .ok_or_else(|| PatchError::InvalidAddress(s.to_string()))?;

        let group_char = caps[1]
            .chars()
            .next()
            .map(|c| c.to_ascii_uppercase())
            .ok_or_else(|| PatchError::InvalidAddress(s.to_string()))?;
        let bank: u8 = caps[2]
            .parse()
            .map_err(|_| PatchError::InvalidAddress(s.to_string()))?;
        let program: u8 = caps[3]
            .parse()
            .map_err(|_| PatchError::InvalidAddress(s.to_string()))?;

        Ok(PatchAddress::Slot {
            group: Group::try_from(group_char)?,
            bank,
            program,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_group() {
        assert_eq!(Group::from_lsb(64), Group::B);
        assert_eq!(Group::from_lsb(0), Group::A);
        // Anything but 64 reads as group A
        assert_eq!(Group::from_lsb(65), Group::A);
        assert_eq!(Group::try_from('B').unwrap().lsb(), 64);
        assert_eq!(Group::try_from('c'), Err(PatchError::InvalidGroup('c')));
    }

    #[test]
    fn test_decode() {
        assert_eq!((decode_bank(0x00), decode_program(0x00)), (0, 0));
        assert_eq!((decode_bank(0x40), decode_program(0x40)), (1, 1));
        assert_eq!((decode_bank(0x47), decode_program(0x47)), (1, 8));
        assert_eq!((decode_bank(0x48), decode_program(0x48)), (2, 1));
        assert_eq!((decode_bank(0x7F), decode_program(0x7F)), (8, 8));
    }

    #[test]
    fn test_decode_below_slot_base() {
        // Bank saturates at 1, program keeps (msb - 64) mod 8
        assert_eq!((decode_bank(63), decode_program(63)), (1, 8));
        assert_eq!((decode_bank(12), decode_program(12)), (1, 5));
        assert_eq!((decode_bank(1), decode_program(1)), (1, 2));
    }

    #[test]
    fn test_encode_bank() {
        // Temporary area keeps program 0: bank 1 lands on 40h
        assert_eq!(encode_bank(1, 0).unwrap(), 0x40);
        assert_eq!(encode_bank(2, 3).unwrap(), 0x4A);
        assert!(encode_bank(0, 3).is_err());
        assert!(encode_bank(9, 0).is_err());
    }

    #[test]
    fn test_encode() {
        assert_eq!(encode_slot(1, 1).unwrap(), 0x41);
        assert_eq!(encode_slot(2, 3).unwrap(), 0x4A);
        assert_eq!(encode_slot(8, 8).unwrap(), 121);
        assert!(encode_slot(0, 1).is_err());
        assert!(encode_slot(9, 1).is_err());
        assert!(encode_slot(1, 9).is_err());
    }

    #[test]
    fn test_encode_decode_asymmetry() {
        // 2-3 encodes to 0x4A which decodes back to 2-3
        let msb = encode_slot(2, 3).unwrap();
        assert_eq!((decode_bank(msb), decode_program(msb)), (2, 3));

        // 1-1 encodes to 0x41 which decodes as 1-2
        let msb = encode_slot(1, 1).unwrap();
        assert_eq!((decode_bank(msb), decode_program(msb)), (1, 2));

        // 3-1 encodes to 79 which decodes as 2-8
        let msb = encode_slot(3, 1).unwrap();
        assert_eq!((decode_bank(msb), decode_program(msb)), (2, 8));
    }

    #[test]
    fn test_address_bytes() {
        assert_eq!(PatchAddress::from_bytes(0, 0), PatchAddress::Temp);
        assert_eq!(PatchAddress::from_bytes(0, 64), PatchAddress::Temp);
        assert_eq!(
            PatchAddress::from_bytes(0x40, 0x40),
            PatchAddress::Slot {
                group: Group::B,
                bank: 1,
                program: 1
            }
        );
        assert_eq!(PatchAddress::Temp.to_bytes().unwrap(), (0, 0));
        let slot = PatchAddress::Slot {
            group: Group::B,
            bank: 2,
            program: 3,
        };
        assert_eq!(slot.to_bytes().unwrap(), (0x4A, 0x40));
    }

    #[test]
    fn test_parse_address() {
        assert_eq!("TEMP".parse::<PatchAddress>().unwrap(), PatchAddress::Temp);
        assert_eq!("temp".parse::<PatchAddress>().unwrap(), PatchAddress::Temp);
        assert_eq!(
            "B-3-4".parse::<PatchAddress>().unwrap(),
            PatchAddress::Slot {
                group: Group::B,
                bank: 3,
                program: 4
            }
        );
        assert_eq!(
            "a - 8 - 1".parse::<PatchAddress>().unwrap(),
            PatchAddress::Slot {
                group: Group::A,
                bank: 8,
                program: 1
            }
        );
        assert!("C-1-1".parse::<PatchAddress>().is_err());
        assert!("A-9-1".parse::<PatchAddress>().is_err());
        assert!("A-1".parse::<PatchAddress>().is_err());
    }

    #[test]
    fn test_display() {
        assert_eq!(PatchAddress::Temp.to_string(), "TEMP");
        let slot: PatchAddress = "B-3-4".parse().unwrap();
        assert_eq!(slot.to_string(), "B-3-4");
    }
}
