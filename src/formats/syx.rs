// .syx dump file handler
// A .syx file is the raw MIDI byte stream of one or more patch records,
// as written by common SysEx librarians.

use crate::bitwise::parse_record;
use crate::core::constants::RECORD_SIZE;
use crate::memmap::DumpMap;
use crate::patch::Gp8Patch;
use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SyxError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Malformed patch record at byte offset {offset}")]
    Malformed { offset: usize },
}

pub type Result<T> = std::result::Result<T, SyxError>;

/// Load every whole patch record from a .syx file
pub fn load_syx(filename: impl AsRef<Path>) -> Result<Vec<Gp8Patch>> {
    let mut file = File::open(filename)?;
    let mut data = Vec::new();
    file.read_to_end(&mut data)?;

    read_syx(&data)
}

/// Load a .syx file as a raw dump
pub fn load_dump(filename: impl AsRef<Path>) -> Result<DumpMap> {
    let mut file = File::open(filename)?;
    let mut data = Vec::new();
    file.read_to_end(&mut data)?;

    Ok(DumpMap::new(data))
}

/// Decode patch records from an in-memory dump
pub fn read_syx(data: &[u8]) -> Result<Vec<Gp8Patch>> {
    let mut patches = Vec::with_capacity(data.len() / RECORD_SIZE);
    let mut input = data;

    while input.len() >= RECORD_SIZE {
        let offset = data.len() - input.len();
        let (rest, patch) =
            parse_record(input).map_err(|_| SyxError::Malformed { offset })?;
        patches.push(patch);
        input = rest;
    }

    if !input.is_empty() {
        tracing::warn!(
            "Ignoring {} trailing bytes after {} records",
            input.len(),
            patches.len()
        );
    }

    tracing::debug!("Read {} patch records", patches.len());
    Ok(patches)
}

/// Save patches to a .syx file as back-to-back records
pub fn save_syx<'a>(
    filename: impl AsRef<Path>,
    patches: impl IntoIterator<Item = &'a Gp8Patch>,
) -> Result<()> {
    let mut file = File::create(filename)?;

    let mut count = 0;
    for patch in patches {
        file.write_all(patch.as_bytes())?;
        count += 1;
    }
    file.flush()?;

    tracing::debug!("Wrote {} patch records", count);
    Ok(())
}
