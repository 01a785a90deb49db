// Constants for the GP-8 patch SysEx record
// Reference: Roland GP-8 owner's manual, MIDI implementation (DT1 patch data)

/// Total size of one patch record, including SysEx framing
pub const RECORD_SIZE: usize = 59;

/// SysEx start of exclusive
pub const SYSEX_BEGIN: u8 = 0xF0;

/// SysEx end of exclusive
pub const SYSEX_END: u8 = 0xF7;

/// Roland manufacturer ID
pub const MANUFACTURER_ROLAND: u8 = 0x41;

/// GP-8 model ID
pub const MODEL_GP8: u8 = 0x13;

/// "Data set 1" (DT1) command ID
pub const COMMAND_DT1: u8 = 0x12;

/// Byte value stored for an "on" boolean parameter
pub const BOOL_ON: u8 = 100;

/// Byte value stored for an "off" boolean parameter
pub const BOOL_OFF: u8 = 0;

/// Address LSB value selecting group A
pub const GROUP_A_LSB: u8 = 0;

/// Address LSB value selecting group B
pub const GROUP_B_LSB: u8 = 64;

/// Base value of a stored (non-temporary) address MSB
pub const ADDRESS_BASE: u8 = 64;

/// Address MSB of the temporary / immediate-edit area
pub const ADDRESS_TEMP: u8 = 0;

/// Banks per group
pub const NUM_BANKS: u8 = 8;

/// Programs per bank
pub const NUM_PROGRAMS: u8 = 8;

/// Width of the patch name field
pub const NAME_LENGTH: usize = 16;

/// Name of a freshly created patch, space padded to the field width
pub const DEFAULT_NAME: &str = "*Untitled       ";

/// Highest value any MIDI data byte can carry
pub const DATA_BYTE_MAX: u8 = 0x7F;

/// Baseline record for a new patch: all effects off, name "*Untitled",
/// addressed to the temporary area at `00 00`.
#[rustfmt::skip]
pub static DEFAULT_RECORD: [u8; RECORD_SIZE] = [
    // Header: F0 41 <dev> 13 12
    0xF0, 0x41, 0x00, 0x13, 0x12,
    // Address MSB/LSB
    0x00, 0x00,
    // Effect on/off bits, MSB then LSB
    0x00, 0x00,
    // Dynamic filter: sens, cutoff, Q, up/down
    0x00, 0x50, 0x64, 0x64,
    // Compressor: attack, sustain
    0x64, 0x64,
    // Overdrive: tone, drive, turbo
    0x3C, 0x00, 0x64,
    // Distortion: tone, distortion
    0x32, 0x21,
    // Phaser: rate, depth, resonance
    0x1E, 0x00, 0x32,
    // Equalizer: hi, mid, lo, gain
    0x32, 0x32, 0x3C, 0x64,
    // Delay: level, time (2 bytes), feedback
    0x32, 0x03, 0x10, 0x19,
    // Chorus: rate, depth, level, pre delay, feedback
    0x1A, 0x0F, 0x64, 0x41, 0x1B,
    // Volume, EV-5 parameter, external control 1/2
    0x14, 0x00, 0x00, 0x00,
    // Name: "*Untitled       "
    0x2A, 0x55, 0x6E, 0x74, 0x69, 0x74, 0x6C, 0x65, 0x64, 0x20, 0x20, 0x20, 0x20, 0x20, 0x20,
    0x20,
    // Name terminator, checksum, EOX
    0x00, 0x12, 0xF7,
];
