use std::fmt;

use shapecast_schema::{AdditionalPolicy, ObjectSchema, PrimitiveKind, SchemaNode, SchemaRegistry};

use crate::config::TransformOptions;
use crate::date::{date_from_millis, parse_date};
use crate::error::{render_path, PathSegment, Result, TransformError, ValidationError};
use crate::value::{render_date, Map, Value};

/// Which way a transform runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// External (wire) value to internal value: fields are looked up by
    /// external name and stored under internal name; date strings become dates.
    Decode,
    /// Internal value to external value: the mirror of [`Direction::Decode`].
    Encode,
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::Decode => f.write_str("decode"),
            Direction::Encode => f.write_str("encode"),
        }
    }
}

/// Validates and converts values against schemas from one registry.
///
/// A transform is a pure function of value, schema, and direction. It either
/// produces a complete output tree or fails on the first mismatch.
#[derive(Debug, Clone, Copy)]
pub struct Transformer<'r> {
    registry: &'r SchemaRegistry,
    options: TransformOptions,
}

impl<'r> Transformer<'r> {
    pub fn new(registry: &'r SchemaRegistry) -> Self {
        Self::with_options(registry, TransformOptions::default())
    }

    pub fn with_options(registry: &'r SchemaRegistry, options: TransformOptions) -> Self {
        Self { registry, options }
    }

    pub fn registry(&self) -> &'r SchemaRegistry {
        self.registry
    }

    pub fn options(&self) -> &TransformOptions {
        &self.options
    }

    /// Convert an external value into its internal form.
    pub fn decode(&self, value: &Value, schema: &SchemaNode) -> Result<Value> {
        self.transform(value, schema, Direction::Decode)
    }

    /// Convert an internal value into its external form.
    pub fn encode(&self, value: &Value, schema: &SchemaNode) -> Result<Value> {
        self.transform(value, schema, Direction::Encode)
    }

    /// Decode parsed JSON against a registered type.
    pub fn decode_json(&self, raw: &serde_json::Value, type_name: &str) -> Result<Value> {
        self.decode(&Value::from(raw), &SchemaNode::reference(type_name))
    }

    /// Encode an internal value against a registered type and render it as JSON.
    pub fn encode_json(&self, value: &Value, type_name: &str) -> Result<serde_json::Value> {
        self.encode(value, &SchemaNode::reference(type_name))
            .map(|encoded| encoded.to_json())
    }

    pub fn transform(
        &self,
        value: &Value,
        schema: &SchemaNode,
        direction: Direction,
    ) -> Result<Value> {
        let walk = Walk {
            registry: self.registry,
            options: self.options,
            direction,
            root_label: match schema {
                SchemaNode::Ref(name) => Some(name.as_str()),
                _ => None,
            },
        };
        let output = walk.visit(Some(value), schema, &Location::root(), None)?;
        Ok(output.unwrap_or(Value::Null))
    }
}

/// Decode parsed JSON against a registered type.
pub fn decode(
    registry: &SchemaRegistry,
    raw: &serde_json::Value,
    type_name: &str,
) -> Result<Value> {
    Transformer::new(registry).decode_json(raw, type_name)
}

/// Encode an internal value against a registered type.
pub fn encode(
    registry: &SchemaRegistry,
    value: &Value,
    type_name: &str,
) -> Result<serde_json::Value> {
    Transformer::new(registry).encode_json(value, type_name)
}

/// Where the traversal currently is. Frames borrow their parent, so the
/// path is only materialised when an error is built.
#[derive(Clone, Copy)]
struct Location<'a> {
    parent: Option<&'a Location<'a>>,
    segment: Option<Segment<'a>>,
    depth: usize,
}

#[derive(Clone, Copy)]
enum Segment<'a> {
    Key(&'a str),
    Index(usize),
}

impl<'a> Location<'a> {
    fn root() -> Self {
        Self {
            parent: None,
            segment: None,
            depth: 0,
        }
    }

    fn key(&'a self, key: &'a str) -> Location<'a> {
        Location {
            parent: Some(self),
            segment: Some(Segment::Key(key)),
            depth: self.depth + 1,
        }
    }

    fn index(&'a self, index: usize) -> Location<'a> {
        Location {
            parent: Some(self),
            segment: Some(Segment::Index(index)),
            depth: self.depth + 1,
        }
    }

    fn segments(&self) -> Vec<PathSegment> {
        let mut segments = Vec::with_capacity(self.depth);
        let mut current = Some(self);
        while let Some(location) = current {
            match location.segment {
                Some(Segment::Key(key)) => segments.push(PathSegment::Key(key.to_string())),
                Some(Segment::Index(index)) => segments.push(PathSegment::Index(index)),
                None => {}
            }
            current = location.parent;
        }
        segments.reverse();
        segments
    }
}

struct Walk<'t> {
    registry: &'t SchemaRegistry,
    options: TransformOptions,
    direction: Direction,
    root_label: Option<&'t str>,
}

impl Walk<'_> {
    /// `value` is `None` when an object field is missing. `label` carries the
    /// name of the reference that led here, if any.
    fn visit(
        &self,
        value: Option<&Value>,
        schema: &SchemaNode,
        at: &Location<'_>,
        label: Option<&str>,
    ) -> Result<Option<Value>> {
        if at.depth > self.options.max_depth {
            return Err(TransformError::DepthExceeded {
                limit: self.options.max_depth,
                path: render_path(self.root_label, &at.segments()).unwrap_or_default(),
            });
        }

        match schema {
            SchemaNode::Primitive(kind) => self.visit_primitive(*kind, value, at),
            SchemaNode::Never => Err(self.invalid(schema.describe(), value, at)),
            SchemaNode::Absent => match value {
                None => Ok(None),
                Some(_) => Err(self.invalid(schema.describe(), value, at)),
            },
            SchemaNode::Ref(name) => {
                let resolved = self.registry.resolve(name)?;
                self.visit(value, resolved, at, Some(label.unwrap_or(name.as_str())))
            }
            SchemaNode::Literals(allowed) => match value {
                Some(Value::String(s)) if allowed.iter().any(|candidate| candidate == s) => {
                    Ok(Some(Value::String(s.clone())))
                }
                _ => Err(self.invalid(schema.describe(), value, at)),
            },
            SchemaNode::Union(members) => {
                for member in members {
                    match self.visit(value, member, at, None) {
                        Ok(output) => return Ok(output),
                        Err(TransformError::Invalid(err)) => {
                            tracing::trace!(
                                expected = %err.expected,
                                "union member rejected value"
                            );
                        }
                        Err(err) => return Err(err),
                    }
                }
                Err(self.invalid(schema.describe(), value, at))
            }
            SchemaNode::Array(items) => self.visit_array(value, items, at),
            SchemaNode::Object(object) => self.visit_object(value, object, at, label),
            SchemaNode::Date => self.visit_date(value, at),
        }
    }

    fn visit_primitive(
        &self,
        kind: PrimitiveKind,
        value: Option<&Value>,
        at: &Location<'_>,
    ) -> Result<Option<Value>> {
        match (kind, value) {
            (PrimitiveKind::Any, _) => Ok(value.cloned()),
            (PrimitiveKind::Null, Some(Value::Null))
            | (PrimitiveKind::String, Some(Value::String(_)))
            | (PrimitiveKind::Number, Some(Value::Number(_)))
            | (PrimitiveKind::Boolean, Some(Value::Bool(_))) => Ok(value.cloned()),
            _ => Err(self.invalid(kind.to_string(), value, at)),
        }
    }

    fn visit_array(
        &self,
        value: Option<&Value>,
        items: &SchemaNode,
        at: &Location<'_>,
    ) -> Result<Option<Value>> {
        let Some(Value::Array(elements)) = value else {
            return Err(self.invalid("array".to_string(), value, at));
        };

        let mut output = Vec::with_capacity(elements.len());
        for (index, element) in elements.iter().enumerate() {
            let here = at.index(index);
            let transformed = self.visit(Some(element), items, &here, None)?;
            output.push(transformed.unwrap_or(Value::Null));
        }
        Ok(Some(Value::Array(output)))
    }

    fn visit_object(
        &self,
        value: Option<&Value>,
        object: &ObjectSchema,
        at: &Location<'_>,
        label: Option<&str>,
    ) -> Result<Option<Value>> {
        let Some(Value::Object(input)) = value else {
            let expected = label.unwrap_or("object").to_string();
            return Err(self.invalid(expected, value, at));
        };

        let mut output = Map::with_capacity(input.len());
        for field in &object.fields {
            let (from, to) = match self.direction {
                Direction::Decode => (&field.external, &field.internal),
                Direction::Encode => (&field.internal, &field.external),
            };
            let here = at.key(from);
            let transformed = self.visit(input.get(from.as_str()), &field.schema, &here, None)?;
            if let Some(transformed) = transformed {
                output.insert(to.clone(), transformed);
            }
        }

        for (key, extra) in input {
            let declared = match self.direction {
                Direction::Decode => object.declares_external(key),
                Direction::Encode => object.declares_internal(key),
            };
            if declared {
                continue;
            }

            let here = at.key(key);
            // An undeclared key may not shadow a renamed field's output name.
            let shadows = output.contains_key(key.as_str());
            let schema = match &object.additional {
                AdditionalPolicy::Schema(schema) if !shadows => schema,
                _ => {
                    let expected = SchemaNode::Never.describe();
                    return Err(self.invalid(expected, Some(extra), &here));
                }
            };
            if let Some(transformed) = self.visit(Some(extra), schema, &here, None)? {
                output.insert(key.clone(), transformed);
            }
        }

        Ok(Some(Value::Object(output)))
    }

    fn visit_date(&self, value: Option<&Value>, at: &Location<'_>) -> Result<Option<Value>> {
        let date = match value {
            Some(Value::Null) => return Ok(Some(Value::Null)),
            Some(Value::Date(date)) => Some(*date),
            Some(Value::String(text)) => parse_date(text),
            Some(Value::Number(number)) if self.options.numeric_timestamps => {
                date_from_millis(number)
            }
            _ => None,
        };

        let Some(date) = date else {
            return Err(self.invalid(SchemaNode::Date.describe(), value, at));
        };

        Ok(Some(match self.direction {
            Direction::Decode => Value::Date(date),
            Direction::Encode => Value::String(render_date(&date)),
        }))
    }

    fn invalid(
        &self,
        expected: String,
        value: Option<&Value>,
        at: &Location<'_>,
    ) -> TransformError {
        let path = at.segments();
        let (key, parent) = match path.split_last() {
            Some((PathSegment::Key(key), container)) => {
                (Some(key.clone()), render_path(self.root_label, container))
            }
            Some(_) => (None, render_path(self.root_label, &path)),
            // The root value itself has no enclosing container.
            None => (None, None),
        };

        TransformError::Invalid(ValidationError {
            expected,
            actual: value.map_or_else(|| "undefined".to_string(), Value::to_string),
            key,
            parent,
            path,
        })
    }
}
