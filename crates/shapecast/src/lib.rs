//! Schema-driven validation and conversion of JSON values.
//!
//! shapecast checks untrusted JSON against declarative schemas and converts
//! it into an internal form (renamed fields, real dates), and back.
//!
//! # Crate Structure
//!
//! - [`schema`]: schema model, definition format, frozen registry
//! - [`transform`]: the decode/encode engine and its errors
//! - [`jobs`]: built-in job listing and task types (behind `jobs` feature)

/// Re-export schema types.
pub mod schema {
    pub use shapecast_schema::*;
}

/// Re-export transform types.
pub mod transform {
    pub use shapecast_transform::*;
}

/// Re-export the job listing and task collaborators (requires `jobs` feature).
#[cfg(feature = "jobs")]
pub mod jobs {
    pub use shapecast_jobs::*;
}

pub use shapecast_schema::{SchemaError, SchemaNode, SchemaRegistry};
pub use shapecast_transform::{decode, encode, TransformError, Transformer, ValidationError, Value};
