//! JSON <-> node tree conversion utilities
//!
//! A node is an object with optional `name`, `value` and `children` keys:
//!
//! ```text
//! {"name": "_data", "children": [{"name": "x", "value": 5}]}
//! ```
//!
//! A top-level array becomes the children of a nameless root. Values that
//! JSON cannot express directly are written as `{"type": "decimal", "value": "1.50"}`.

use super::CliError;
use crate::{Match, NodeId, Tree, Value};

/// Builds a tree from JSON, returning it together with its root.
pub fn json_to_tree(json: serde_json::Value) -> Result<(Tree, NodeId), CliError> {
    let mut tree = Tree::new();
    let root = match json {
        serde_json::Value::Array(children) => {
            let root = tree.add_root("", None);
            for child in children {
                add_node(&mut tree, Some(root), child)?;
            }
            root
        }
        object @ serde_json::Value::Object(_) => add_node(&mut tree, None, object)?,
        other => {
            return Err(CliError::InvalidTree(format!(
                "expected an object or an array, found {}",
                other
            )));
        }
    };
    Ok((tree, root))
}

fn add_node(
    tree: &mut Tree,
    parent: Option<NodeId>,
    json: serde_json::Value,
) -> Result<NodeId, CliError> {
    let mut object = match json {
        serde_json::Value::Object(object) => object,
        other => {
            return Err(CliError::InvalidTree(format!("expected a node object, found {}", other)));
        }
    };

    let name = match object.remove("name") {
        None | Some(serde_json::Value::Null) => String::new(),
        Some(serde_json::Value::String(name)) => name,
        Some(other) => other.to_string(),
    };
    let value = match object.remove("value") {
        Some(json) => json_to_value(json)?,
        None => None,
    };

    let node = match parent {
        Some(parent) => tree.add_child(parent, name, value),
        None => tree.add_root(name, value),
    };

    match object.remove("children") {
        None | Some(serde_json::Value::Null) => {}
        Some(serde_json::Value::Array(children)) => {
            for child in children {
                add_node(tree, Some(node), child)?;
            }
        }
        Some(other) => {
            return Err(CliError::InvalidTree(format!("children must be an array, found {}", other)));
        }
    }
    Ok(node)
}

fn json_to_value(json: serde_json::Value) -> Result<Option<Value>, CliError> {
    let value = match json {
        serde_json::Value::Null => return Ok(None),
        serde_json::Value::Bool(b) => Value::Boolean(b),
        serde_json::Value::Number(n) => match n.as_i64() {
            Some(i) => Value::Integer(i),
            None => Value::Float(n.as_f64().unwrap_or(f64::NAN)),
        },
        serde_json::Value::String(s) => Value::String(s),
        serde_json::Value::Object(mut object) => {
            let type_name = match object.remove("type") {
                Some(serde_json::Value::String(type_name)) => type_name,
                _ => {
                    return Err(CliError::InvalidTree(
                        "typed values need a string 'type'".to_string(),
                    ));
                }
            };
            let text = match object.remove("value") {
                Some(serde_json::Value::String(text)) => text,
                Some(other) => other.to_string(),
                None => String::new(),
            };
            Value::from_typed(&type_name, &text)?
        }
        serde_json::Value::Array(_) => {
            return Err(CliError::InvalidTree("values cannot be arrays".to_string()));
        }
    };
    Ok(Some(value))
}

/// Converts a node and its descendants back into JSON.
pub fn tree_to_json(tree: &Tree, node: NodeId) -> serde_json::Value {
    let mut object = serde_json::Map::new();
    object.insert("name".to_string(), tree.name(node).into());
    if let Some(value) = tree.value(node) {
        object.insert("value".to_string(), value_to_json(tree, value));
    }
    let children = tree.children(node);
    if !children.is_empty() {
        let children = children.iter().map(|child| tree_to_json(tree, *child)).collect();
        object.insert("children".to_string(), serde_json::Value::Array(children));
    }
    serde_json::Value::Object(object)
}

/// Converts a node value into JSON; embedded nodes become node objects.
pub fn value_to_json(tree: &Tree, value: &Value) -> serde_json::Value {
    let typed = |value: &Value| {
        serde_json::json!({ "type": value.type_name(), "value": value.as_string() })
    };
    match value {
        Value::String(s) => serde_json::Value::String(s.clone()),
        Value::Integer(i) => serde_json::Value::Number((*i).into()),
        Value::Float(f) => serde_json::Number::from_f64(*f)
            .map(serde_json::Value::Number)
            .unwrap_or(serde_json::Value::Null),
        Value::Boolean(b) => serde_json::Value::Bool(*b),
        Value::Node(node) if node.index() < tree.len() => tree_to_json(tree, *node),
        Value::Bytes(bytes) => serde_json::Value::Array(
            bytes.iter().map(|b| serde_json::Value::Number((*b).into())).collect(),
        ),
        other => typed(other),
    }
}

/// Converts the projected values of a match into a JSON array.
pub fn match_to_json(tree: &Tree, matched: &Match) -> Result<serde_json::Value, CliError> {
    let values = matched
        .values(tree)?
        .into_iter()
        .map(|value| match value {
            Some(value) => value_to_json(tree, &value),
            None => serde_json::Value::Null,
        })
        .collect();
    Ok(serde_json::Value::Array(values))
}
