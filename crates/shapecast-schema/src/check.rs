use std::collections::{HashMap, HashSet};

use crate::error::{Result, SchemaError};
use crate::node::{AdditionalPolicy, SchemaNode};

/// Integrity checks run once when a registry is frozen.
pub(crate) fn check_types(types: &HashMap<String, SchemaNode>) -> Result<()> {
    let mut names: Vec<&str> = types.keys().map(String::as_str).collect();
    names.sort_unstable();

    for name in &names {
        check_node(name, &types[*name], types)?;
    }

    if let Some(name) = find_unguarded_cycle(&names, types) {
        return Err(SchemaError::CyclicReference(name.to_string()));
    }

    Ok(())
}

fn check_node(owner: &str, node: &SchemaNode, types: &HashMap<String, SchemaNode>) -> Result<()> {
    match node {
        SchemaNode::Ref(name) => {
            if types.contains_key(name) {
                Ok(())
            } else {
                Err(SchemaError::UnresolvedReference {
                    owner: owner.to_string(),
                    name: name.clone(),
                })
            }
        }
        SchemaNode::Array(items) => check_node(owner, items, types),
        SchemaNode::Union(members) => members
            .iter()
            .try_for_each(|member| check_node(owner, member, types)),
        SchemaNode::Object(object) => {
            let mut external = HashSet::new();
            let mut internal = HashSet::new();
            for field in &object.fields {
                if !external.insert(field.external.as_str()) {
                    return Err(SchemaError::DuplicateField {
                        owner: owner.to_string(),
                        field: field.external.clone(),
                    });
                }
                if !internal.insert(field.internal.as_str()) {
                    return Err(SchemaError::DuplicateField {
                        owner: owner.to_string(),
                        field: field.internal.clone(),
                    });
                }
                check_node(owner, &field.schema, types)?;
            }
            match &object.additional {
                AdditionalPolicy::Reject => Ok(()),
                AdditionalPolicy::Schema(extra) => check_node(owner, extra, types),
            }
        }
        SchemaNode::Primitive(_)
        | SchemaNode::Never
        | SchemaNode::Absent
        | SchemaNode::Literals(_)
        | SchemaNode::Date => Ok(()),
    }
}

/// References reachable from `node` without descending into an array or object.
fn unguarded_refs<'a>(node: &'a SchemaNode, out: &mut Vec<&'a str>) {
    match node {
        SchemaNode::Ref(name) => out.push(name),
        SchemaNode::Union(members) => {
            for member in members {
                unguarded_refs(member, out);
            }
        }
        _ => {}
    }
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Mark {
    Visiting,
    Done,
}

/// Returns a type that reaches itself through references and unions alone.
/// Such a type would recurse forever on any value.
fn find_unguarded_cycle<'a>(
    names: &[&'a str],
    types: &'a HashMap<String, SchemaNode>,
) -> Option<&'a str> {
    let edges: HashMap<&str, Vec<&str>> = names
        .iter()
        .map(|name| {
            let mut out = Vec::new();
            unguarded_refs(&types[*name], &mut out);
            (*name, out)
        })
        .collect();

    let mut marks: HashMap<&str, Mark> = HashMap::new();
    names.iter().find_map(|name| visit(*name, &edges, &mut marks))
}

fn visit<'a>(
    name: &'a str,
    edges: &HashMap<&'a str, Vec<&'a str>>,
    marks: &mut HashMap<&'a str, Mark>,
) -> Option<&'a str> {
    match marks.get(name) {
        Some(Mark::Visiting) => return Some(name),
        Some(Mark::Done) => return None,
        None => {}
    }

    marks.insert(name, Mark::Visiting);
    if let Some(next) = edges.get(name) {
        for target in next {
            if let Some(hit) = visit(*target, edges, marks) {
                return Some(hit);
            }
        }
    }
    marks.insert(name, Mark::Done);
    None
}
