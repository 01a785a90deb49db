// Raw dump storage
pub mod dump_map;

pub use dump_map::{DumpMap, DumpMapError};
