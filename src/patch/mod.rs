// Patch record access
pub mod address;
pub mod record;
pub mod value;

pub use address::{Group, PatchAddress};
pub use record::Gp8Patch;
pub use value::{FieldValue, PatchError, PatchResult};
