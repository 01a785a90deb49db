// Byte storage for a GP-8 SysEx dump
// A dump holds consecutive 59-byte patch records, e.g. all 128 stored
// patches sent from the device in one bulk transfer.

use crate::bitwise::{parse_record, parse_record_name};
use crate::core::constants::RECORD_SIZE;
use crate::patch::Gp8Patch;
use std::fmt;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DumpMapError {
    #[error("Index out of bounds: {0}")]
    IndexOutOfBounds(usize),

    #[error("Record {0} is not a valid patch")]
    InvalidRecord(usize),
}

pub type Result<T> = std::result::Result<T, DumpMapError>;

/// Raw dump bytes with record-oriented access
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DumpMap {
    data: Vec<u8>,
}

impl DumpMap {
    /// Create a dump map from bytes
    pub fn new(data: Vec<u8>) -> Self {
        Self { data }
    }

    /// Build a dump from patches, in order
    pub fn from_patches<'a>(patches: impl IntoIterator<Item = &'a Gp8Patch>) -> Self {
        let data = patches
            .into_iter()
            .flat_map(|p| p.as_bytes().iter().copied())
            .collect();
        Self { data }
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Get a chunk of the dump from @start for @length bytes
    /// If length is None, returns all data from @start to end
    pub fn get(&self, start: usize, length: Option<usize>) -> Result<&[u8]> {
        if start > self.data.len() {
            return Err(DumpMapError::IndexOutOfBounds(start));
        }

        match length {
            Some(len) => {
                let end = start + len;
                if end > self.data.len() {
                    return Err(DumpMapError::IndexOutOfBounds(end));
                }
                Ok(&self.data[start..end])
            }
            None => Ok(&self.data[start..]),
        }
    }

    /// Number of whole records in the dump
    pub fn record_count(&self) -> usize {
        self.data.len() / RECORD_SIZE
    }

    /// Raw bytes of record @index
    pub fn record_bytes(&self, index: usize) -> Result<&[u8]> {
        if index >= self.record_count() {
            return Err(DumpMapError::IndexOutOfBounds(index));
        }
        self.get(index * RECORD_SIZE, Some(RECORD_SIZE))
    }

    /// Decode record @index as a patch
    pub fn record(&self, index: usize) -> Result<Gp8Patch> {
        let bytes = self.record_bytes(index)?;
        parse_record(bytes)
            .map(|(_, patch)| patch)
            .map_err(|_| DumpMapError::InvalidRecord(index))
    }

    /// Name of record @index, read straight from the raw bytes
    pub fn record_name(&self, index: usize) -> Result<String> {
        let bytes = self.record_bytes(index)?;
        parse_record_name(bytes)
            .map(|(_, name)| name)
            .map_err(|_| DumpMapError::InvalidRecord(index))
    }

    /// Get a printable hex representation of the dump
    pub fn printable(&self, start: Option<usize>, end: Option<usize>) -> String {
        let end = end.unwrap_or(self.data.len()).min(self.data.len());
        let start = start.unwrap_or(0).min(end);

        hexdump(&self.data[start..end])
    }
}

impl From<Vec<u8>> for DumpMap {
    fn from(data: Vec<u8>) -> Self {
        Self::new(data)
    }
}

impl From<&[u8]> for DumpMap {
    fn from(data: &[u8]) -> Self {
        Self::new(data.to_vec())
    }
}

impl AsRef<[u8]> for DumpMap {
    fn as_ref(&self) -> &[u8] {
        &self.data
    }
}

impl fmt::Display for DumpMap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "DumpMap({} bytes, {} records)",
            self.data.len(),
            self.record_count()
        )
    }
}

/// Create a hex dump of bytes (similar to hexdump -C)
fn hexdump(data: &[u8]) -> String {
    let mut output = String::new();

    for (i, chunk) in data.chunks(16).enumerate() {
        output.push_str(&format!("{:08x}  ", i * 16));

        for (j, byte) in chunk.iter().enumerate() {
            if j == 8 {
                output.push(' ');
            }
            output.push_str(&format!("{:02x} ", byte));
        }

        // Pad short last line so the text column lines up
        for j in chunk.len()..16 {
            if j == 8 {
                output.push(' ');
            }
            output.push_str("   ");
        }

        output.push_str(" |");
        for &byte in chunk {
            if (0x20..=0x7e).contains(&byte) {
                output.push(byte as char);
            } else {
                output.push('.');
            }
        }
        output.push_str("|\n");
    }

    output
}
