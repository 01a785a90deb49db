// File format handlers
pub mod summary;
pub mod syx;

pub use summary::{ParameterValue, PatchSummary};
pub use syx::{load_dump, load_syx, read_syx, save_syx, SyxError};
