use std::fmt;

/// Kinds accepted by [`SchemaNode::Primitive`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PrimitiveKind {
    String,
    Number,
    Boolean,
    Null,
    /// Accepts every value unchanged.
    Any,
}

impl PrimitiveKind {
    pub fn as_str(self) -> &'static str {
        match self {
            PrimitiveKind::String => "string",
            PrimitiveKind::Number => "number",
            PrimitiveKind::Boolean => "boolean",
            PrimitiveKind::Null => "null",
            PrimitiveKind::Any => "any",
        }
    }
}

impl fmt::Display for PrimitiveKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One node of a declarative shape description.
#[derive(Debug, Clone, PartialEq)]
pub enum SchemaNode {
    Primitive(PrimitiveKind),
    /// Matches nothing. Used for fields that must never carry a value.
    Never,
    /// Matches a missing value. Combined with another node in a union it
    /// marks a field as optional.
    Absent,
    /// Closed set of allowed strings, compared exactly.
    Literals(Vec<String>),
    Array(Box<SchemaNode>),
    /// Members are tried in order; the first match wins.
    Union(Vec<SchemaNode>),
    Object(ObjectSchema),
    /// External strings are parsed into dates; internal dates render back to strings.
    Date,
    /// Named pointer into a schema registry.
    Ref(String),
}

/// Declared fields of an object plus the rule for undeclared keys.
#[derive(Debug, Clone, PartialEq)]
pub struct ObjectSchema {
    pub fields: Vec<Field>,
    pub additional: AdditionalPolicy,
}

/// A declared object field with its external (wire) and internal names.
#[derive(Debug, Clone, PartialEq)]
pub struct Field {
    pub external: String,
    pub internal: String,
    pub schema: SchemaNode,
}

/// Rule applied to keys present in a value but not declared by the schema.
#[derive(Debug, Clone, PartialEq)]
pub enum AdditionalPolicy {
    Reject,
    Schema(Box<SchemaNode>),
}

impl SchemaNode {
    pub fn string() -> Self {
        SchemaNode::Primitive(PrimitiveKind::String)
    }

    pub fn number() -> Self {
        SchemaNode::Primitive(PrimitiveKind::Number)
    }

    pub fn boolean() -> Self {
        SchemaNode::Primitive(PrimitiveKind::Boolean)
    }

    pub fn null() -> Self {
        SchemaNode::Primitive(PrimitiveKind::Null)
    }

    pub fn any() -> Self {
        SchemaNode::Primitive(PrimitiveKind::Any)
    }

    pub fn date() -> Self {
        SchemaNode::Date
    }

    pub fn never() -> Self {
        SchemaNode::Never
    }

    pub fn literals<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        SchemaNode::Literals(values.into_iter().map(Into::into).collect())
    }

    pub fn array(items: SchemaNode) -> Self {
        SchemaNode::Array(Box::new(items))
    }

    pub fn union(members: impl IntoIterator<Item = SchemaNode>) -> Self {
        SchemaNode::Union(members.into_iter().collect())
    }

    /// Shorthand for a union of [`SchemaNode::Absent`] and `inner`.
    pub fn optional(inner: SchemaNode) -> Self {
        SchemaNode::Union(vec![SchemaNode::Absent, inner])
    }

    pub fn object(fields: impl IntoIterator<Item = Field>, additional: AdditionalPolicy) -> Self {
        SchemaNode::Object(ObjectSchema {
            fields: fields.into_iter().collect(),
            additional,
        })
    }

    /// An object with no declared fields whose every value matches `values`.
    pub fn map(values: SchemaNode) -> Self {
        SchemaNode::Object(ObjectSchema {
            fields: Vec::new(),
            additional: AdditionalPolicy::Schema(Box::new(values)),
        })
    }

    pub fn reference(name: impl Into<String>) -> Self {
        SchemaNode::Ref(name.into())
    }

    /// Human-readable description of the expected shape, as used in error messages.
    pub fn describe(&self) -> String {
        match self {
            SchemaNode::Primitive(kind) => kind.as_str().to_string(),
            SchemaNode::Never => "never".to_string(),
            SchemaNode::Absent => "undefined".to_string(),
            SchemaNode::Literals(values) => {
                let quoted: Vec<String> = values
                    .iter()
                    .map(|v| serde_json::Value::String(v.clone()).to_string())
                    .collect();
                format!("one of [{}]", quoted.join(", "))
            }
            SchemaNode::Array(_) => "array".to_string(),
            SchemaNode::Union(members) => match members.as_slice() {
                [SchemaNode::Absent, inner] => format!("an optional {}", inner.describe()),
                _ => {
                    let described: Vec<String> = members.iter().map(SchemaNode::describe).collect();
                    format!("one of [{}]", described.join(", "))
                }
            },
            SchemaNode::Object(_) => "object".to_string(),
            SchemaNode::Date => "Date".to_string(),
            SchemaNode::Ref(name) => name.clone(),
        }
    }

    /// Short kind label for listings.
    pub fn kind_name(&self) -> &'static str {
        match self {
            SchemaNode::Primitive(kind) => kind.as_str(),
            SchemaNode::Never => "never",
            SchemaNode::Absent => "absent",
            SchemaNode::Literals(_) => "enum",
            SchemaNode::Array(_) => "array",
            SchemaNode::Union(_) => "union",
            SchemaNode::Object(_) => "object",
            SchemaNode::Date => "date",
            SchemaNode::Ref(_) => "ref",
        }
    }
}

impl Field {
    pub fn new(
        external: impl Into<String>,
        internal: impl Into<String>,
        schema: SchemaNode,
    ) -> Self {
        Self {
            external: external.into(),
            internal: internal.into(),
            schema,
        }
    }

    /// A field whose external and internal names are the same.
    pub fn same(name: impl Into<String>, schema: SchemaNode) -> Self {
        let name = name.into();
        Self {
            internal: name.clone(),
            external: name,
            schema,
        }
    }
}

impl ObjectSchema {
    pub fn declares_external(&self, key: &str) -> bool {
        self.fields.iter().any(|field| field.external == key)
    }

    pub fn declares_internal(&self, key: &str) -> bool {
        self.fields.iter().any(|field| field.internal == key)
    }
}

impl AdditionalPolicy {
    /// Policy that carries undeclared keys through unchanged.
    pub fn allow_any() -> Self {
        AdditionalPolicy::Schema(Box::new(SchemaNode::any()))
    }
}
