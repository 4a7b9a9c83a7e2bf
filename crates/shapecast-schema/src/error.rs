/// Errors raised while defining, loading, or resolving schemas.
///
/// These are programmer or configuration errors. They are never produced by
/// a value failing to match a schema.
#[derive(Debug, thiserror::Error)]
pub enum SchemaError {
    /// A definition file could not be loaded.
    #[error("failed to load schema definitions: {0}")]
    LoadFailed(String),

    /// A definition document is not valid JSON or not a valid type expression.
    #[error("invalid schema definition: {0}")]
    InvalidDefinition(#[from] serde_json::Error),

    /// A single entry of a definition document is not a valid type expression.
    #[error("invalid definition for type {name:?}: {source}")]
    InvalidType {
        name: String,
        source: serde_json::Error,
    },

    /// The same type name was registered twice.
    #[error("type {0:?} is already registered")]
    DuplicateType(String),

    /// No type with this name is registered.
    #[error("unknown type {0:?}")]
    UnknownType(String),

    /// A reference inside a registered type names no registered type.
    #[error("type {owner:?} references unknown type {name:?}")]
    UnresolvedReference { owner: String, name: String },

    /// An object schema declares the same field name twice.
    #[error("type {owner:?} declares field {field:?} more than once")]
    DuplicateField { owner: String, field: String },

    /// A type reaches itself through references and unions alone.
    #[error("type {0:?} refers to itself without an intervening object or array")]
    CyclicReference(String),
}

pub type Result<T> = std::result::Result<T, SchemaError>;
