//! JSON definition format for schemas.
//!
//! A definition document maps type names to type expressions:
//!
//! ```json
//! {
//!   "Country": { "enum": ["US"] },
//!   "Office": {
//!     "object": {
//!       "fields": [
//!         { "external": "office_name", "internal": "name", "type": "string" },
//!         { "external": "country", "type": { "ref": "Country" } },
//!         { "external": "opened", "type": { "union": ["null", "date"] } }
//!       ],
//!       "additional": false
//!     }
//!   }
//! }
//! ```

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{Result, SchemaError};
use crate::node::{AdditionalPolicy, Field, ObjectSchema, PrimitiveKind, SchemaNode};

/// A type expression as written in a definition document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TypeExpr {
    Keyword(Keyword),
    Compound(Compound),
}

/// Bare-string type expressions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Keyword {
    String,
    Number,
    Boolean,
    Null,
    Any,
    Date,
    Never,
    Absent,
}

/// Single-key object type expressions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Compound {
    Ref(String),
    Array(Box<TypeExpr>),
    Union(Vec<TypeExpr>),
    Enum(Vec<String>),
    Map(Box<TypeExpr>),
    Object(ObjectExpr),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ObjectExpr {
    #[serde(default)]
    pub fields: Vec<FieldExpr>,
    /// `false` rejects undeclared keys, `true` carries them through, a type
    /// expression validates them. Omitted means the registry default.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub additional: Option<AdditionalExpr>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FieldExpr {
    pub external: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub internal: Option<String>,
    #[serde(rename = "type")]
    pub type_expr: TypeExpr,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AdditionalExpr {
    Flag(bool),
    Type(Box<TypeExpr>),
}

impl TypeExpr {
    /// Lower into a schema node. `strict` decides the policy of objects that
    /// leave `additional` unspecified.
    pub fn into_node(self, strict: bool) -> SchemaNode {
        match self {
            TypeExpr::Keyword(keyword) => keyword.into_node(),
            TypeExpr::Compound(Compound::Ref(name)) => SchemaNode::Ref(name),
            TypeExpr::Compound(Compound::Array(items)) => {
                SchemaNode::array(items.into_node(strict))
            }
            TypeExpr::Compound(Compound::Union(members)) => {
                SchemaNode::union(members.into_iter().map(|m| m.into_node(strict)))
            }
            TypeExpr::Compound(Compound::Enum(values)) => SchemaNode::Literals(values),
            TypeExpr::Compound(Compound::Map(values)) => SchemaNode::map(values.into_node(strict)),
            TypeExpr::Compound(Compound::Object(object)) => object.into_node(strict),
        }
    }
}

impl Keyword {
    fn into_node(self) -> SchemaNode {
        match self {
            Keyword::String => SchemaNode::Primitive(PrimitiveKind::String),
            Keyword::Number => SchemaNode::Primitive(PrimitiveKind::Number),
            Keyword::Boolean => SchemaNode::Primitive(PrimitiveKind::Boolean),
            Keyword::Null => SchemaNode::Primitive(PrimitiveKind::Null),
            Keyword::Any => SchemaNode::Primitive(PrimitiveKind::Any),
            Keyword::Date => SchemaNode::Date,
            Keyword::Never => SchemaNode::Never,
            Keyword::Absent => SchemaNode::Absent,
        }
    }
}

impl ObjectExpr {
    fn into_node(self, strict: bool) -> SchemaNode {
        let fields = self
            .fields
            .into_iter()
            .map(|field| {
                let internal = field.internal.unwrap_or_else(|| field.external.clone());
                Field::new(field.external, internal, field.type_expr.into_node(strict))
            })
            .collect::<Vec<_>>();

        let additional = match self.additional {
            Some(AdditionalExpr::Flag(false)) => AdditionalPolicy::Reject,
            Some(AdditionalExpr::Flag(true)) => AdditionalPolicy::allow_any(),
            Some(AdditionalExpr::Type(expr)) => {
                AdditionalPolicy::Schema(Box::new((*expr).into_node(strict)))
            }
            None if strict => AdditionalPolicy::Reject,
            None => AdditionalPolicy::allow_any(),
        };

        SchemaNode::Object(ObjectSchema { fields, additional })
    }
}

impl From<&SchemaNode> for TypeExpr {
    fn from(node: &SchemaNode) -> Self {
        match node {
            SchemaNode::Primitive(kind) => TypeExpr::Keyword(match kind {
                PrimitiveKind::String => Keyword::String,
                PrimitiveKind::Number => Keyword::Number,
                PrimitiveKind::Boolean => Keyword::Boolean,
                PrimitiveKind::Null => Keyword::Null,
                PrimitiveKind::Any => Keyword::Any,
            }),
            SchemaNode::Never => TypeExpr::Keyword(Keyword::Never),
            SchemaNode::Absent => TypeExpr::Keyword(Keyword::Absent),
            SchemaNode::Date => TypeExpr::Keyword(Keyword::Date),
            SchemaNode::Ref(name) => TypeExpr::Compound(Compound::Ref(name.clone())),
            SchemaNode::Literals(values) => TypeExpr::Compound(Compound::Enum(values.clone())),
            SchemaNode::Array(items) => {
                TypeExpr::Compound(Compound::Array(Box::new(TypeExpr::from(items.as_ref()))))
            }
            SchemaNode::Union(members) => {
                TypeExpr::Compound(Compound::Union(members.iter().map(TypeExpr::from).collect()))
            }
            SchemaNode::Object(object) => match (object.fields.is_empty(), &object.additional) {
                (true, AdditionalPolicy::Schema(values)) => {
                    TypeExpr::Compound(Compound::Map(Box::new(TypeExpr::from(values.as_ref()))))
                }
                _ => TypeExpr::Compound(Compound::Object(ObjectExpr::from(object))),
            },
        }
    }
}

impl From<&ObjectSchema> for ObjectExpr {
    fn from(object: &ObjectSchema) -> Self {
        let fields = object
            .fields
            .iter()
            .map(|field| FieldExpr {
                external: field.external.clone(),
                internal: (field.internal != field.external).then(|| field.internal.clone()),
                type_expr: TypeExpr::from(&field.schema),
            })
            .collect();

        let additional = match &object.additional {
            AdditionalPolicy::Reject => AdditionalExpr::Flag(false),
            AdditionalPolicy::Schema(node) if **node == SchemaNode::any() => {
                AdditionalExpr::Flag(true)
            }
            AdditionalPolicy::Schema(node) => {
                AdditionalExpr::Type(Box::new(TypeExpr::from(node.as_ref())))
            }
        };

        ObjectExpr {
            fields,
            additional: Some(additional),
        }
    }
}

/// Parse a definition document into `(name, node)` pairs, in document order.
pub fn parse_definitions(json: &str, strict: bool) -> Result<Vec<(String, SchemaNode)>> {
    let document: Map<String, Value> = serde_json::from_str(json)?;
    parse_definition_map(document, strict)
}

/// Parse an already-decoded definition document.
pub fn parse_definition_map(
    document: Map<String, Value>,
    strict: bool,
) -> Result<Vec<(String, SchemaNode)>> {
    document
        .into_iter()
        .map(|(name, raw)| {
            let expr: TypeExpr =
                serde_json::from_value(raw).map_err(|source| SchemaError::InvalidType {
                    name: name.clone(),
                    source,
                })?;
            Ok((name, expr.into_node(strict)))
        })
        .collect()
}

/// Render a node as its definition-format JSON.
pub fn to_definition(node: &SchemaNode) -> Value {
    serde_json::to_value(TypeExpr::from(node)).unwrap_or(Value::Null)
}
