//! Schema-driven validation and conversion.
//!
//! A [`Transformer`] walks a [`Value`] and a [`SchemaNode`] in lockstep.
//! Decoding turns external JSON into the internal representation: fields
//! are renamed from external to internal names and date strings become
//! [`Value::Date`]. Encoding is the mirror image. Any mismatch aborts the
//! whole transform with a [`ValidationError`] that names the key and the
//! path of the offending value.
//!
//! ```
//! use serde_json::json;
//! use shapecast_schema::SchemaRegistry;
//!
//! let registry = SchemaRegistry::from_embedded(&[r#"{
//!     "Person": {"object": {"fields": [
//!         {"external": "full_name", "internal": "name", "type": "string"}
//!     ]}}
//! }"#]).unwrap();
//!
//! let raw = json!({"full_name": "Ada"});
//! let person = shapecast_transform::decode(&registry, &raw, "Person").unwrap();
//! assert_eq!(person.get("name").and_then(|v| v.as_str()), Some("Ada"));
//! ```
//!
//! [`SchemaNode`]: shapecast_schema::SchemaNode

pub mod config;
pub mod date;
pub mod engine;
pub mod error;
pub mod value;

pub use config::TransformOptions;
pub use engine::{decode, encode, Direction, Transformer};
pub use error::{PathSegment, Result, TransformError, ValidationError};
pub use value::{render_date, Map, Value};
