//! Declarative schema model and frozen schema registry.
//!
//! A schema is a tree of [`SchemaNode`]s describing the shape of a JSON
//! value: primitives, literal sets, arrays, ordered unions, objects with
//! renamed fields, dates, and named references into a [`SchemaRegistry`].
//!
//! Registries are assembled with a [`SchemaRegistryBuilder`] (in code, from
//! embedded definition documents, or from a directory of
//! `*.schema.json` files), checked once, and then only read.

mod check;
pub mod config;
pub mod definition;
pub mod error;
pub mod node;
pub mod registry;

pub use config::RegistryConfig;
pub use definition::{parse_definitions, to_definition, TypeExpr};
pub use error::{Result, SchemaError};
pub use node::{AdditionalPolicy, Field, ObjectSchema, PrimitiveKind, SchemaNode};
pub use registry::{SchemaRegistry, SchemaRegistryBuilder};
