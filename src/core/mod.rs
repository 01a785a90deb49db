// Core module containing the GP-8 record layout and field schema
pub mod constants;
pub mod effects;
pub mod schema;
pub mod validation;

// Re-export commonly used types
pub use constants::*;
pub use effects::{Effect, EffectBank};
pub use schema::{FieldDescriptor, FieldId, FieldKind, SchemaError, ValidRange};
pub use validation::{validate_patch, ValidationMessage};
