use shapecast_schema::SchemaError;

/// One step from a container to a contained value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathSegment {
    Key(String),
    Index(usize),
}

/// A value did not match its schema.
///
/// Renders as
/// `Invalid value for key "<key>" on <parent>. Expected <expected> but got <actual>`,
/// dropping the key clause when the value does not sit under an object key
/// and the parent clause at the root.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error(
    "Invalid value{}{}. Expected {expected} but got {actual}",
    key_clause(.key),
    parent_clause(.parent)
)]
pub struct ValidationError {
    /// Description of the expected shape.
    pub expected: String,
    /// Compact JSON of the offending value, or `undefined` when it was missing.
    pub actual: String,
    /// Object key holding the offending value.
    pub key: Option<String>,
    /// Rendered location of the enclosing container.
    pub parent: Option<String>,
    /// Full location of the offending value, relative to the root.
    pub path: Vec<PathSegment>,
}

fn key_clause(key: &Option<String>) -> String {
    key.as_ref()
        .map(|key| format!(" for key \"{key}\""))
        .unwrap_or_default()
}

fn parent_clause(parent: &Option<String>) -> String {
    parent.as_ref().map(|parent| format!(" on {parent}")).unwrap_or_default()
}

/// Errors returned by [`Transformer`](crate::Transformer).
#[derive(Debug, thiserror::Error)]
pub enum TransformError {
    /// The value does not match the schema. Recoverable by the caller.
    #[error(transparent)]
    Invalid(#[from] ValidationError),

    /// A reference could not be resolved. This is a programming error in the
    /// schema or the caller, not a property of the input.
    #[error("schema resolution failed: {0}")]
    Resolution(#[from] SchemaError),

    /// The value nests deeper than the configured limit.
    #[error("value nests deeper than {limit} levels at {path}")]
    DepthExceeded { limit: usize, path: String },
}

impl TransformError {
    /// The validation failure, when this is one.
    pub fn as_validation(&self) -> Option<&ValidationError> {
        match self {
            TransformError::Invalid(err) => Some(err),
            _ => None,
        }
    }

    pub fn is_validation(&self) -> bool {
        matches!(self, TransformError::Invalid(_))
    }
}

pub type Result<T> = std::result::Result<T, TransformError>;

/// Render a location as `Label.key[0].other`. Returns `None` when empty.
pub fn render_path(label: Option<&str>, segments: &[PathSegment]) -> Option<String> {
    let mut out = label.unwrap_or_default().to_string();
    for segment in segments {
        match segment {
            PathSegment::Key(key) => {
                if !out.is_empty() {
                    out.push('.');
                }
                out.push_str(key);
            }
            PathSegment::Index(index) => {
                out.push('[');
                out.push_str(&index.to_string());
                out.push(']');
            }
        }
    }
    (!out.is_empty()).then_some(out)
}
