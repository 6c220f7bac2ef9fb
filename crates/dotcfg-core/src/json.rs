// JSON form of a config tree: serialization for Dump/Save and a shape-aware
// merge for Load.
use serde::ser::{Serialize, SerializeMap, SerializeSeq, Serializer};
use serde_json::Value;

use crate::coerce;
use crate::error::{ConfigError, Result};
use crate::model::{Composite, Field, Node, Scalar};
use crate::path::join;

impl Serialize for Node {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        match self {
            Node::Leaf(Scalar::Int(n)) => serializer.serialize_i64(*n),
            Node::Leaf(Scalar::Str(s)) => serializer.serialize_str(s),
            Node::Leaf(Scalar::Bool(b)) => serializer.serialize_bool(*b),
            Node::Composite(c) => c.serialize(serializer),
            Node::Keyed(m) => {
                let mut map = serializer.serialize_map(Some(m.len()))?;
                for (k, v) in m.iter() {
                    map.serialize_entry(&k.to_string(), v)?;
                }
                map.end()
            }
            Node::Ordered(s) => {
                let mut seq = serializer.serialize_seq(Some(s.len()))?;
                for item in s.items() {
                    seq.serialize_element(item)?;
                }
                seq.end()
            }
        }
    }
}

impl Serialize for Composite {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let fields: Vec<&Field> = self
            .promoted_fields(Field::json_name)
            .into_iter()
            .filter(|f| !(f.is_omit_empty() && is_empty(&f.node)))
            .collect();
        let mut map = serializer.serialize_map(Some(fields.len()))?;
        for f in fields {
            map.serialize_entry(f.json_name(), &f.node)?;
        }
        map.end()
    }
}

fn is_empty(node: &Node) -> bool {
    match node {
        Node::Leaf(s) => s.is_zero(),
        Node::Keyed(m) => m.is_empty(),
        Node::Ordered(s) => s.is_empty(),
        Node::Composite(_) => false,
    }
}

/// Pretty JSON with two-space indentation.
pub fn to_pretty_string(node: &Node) -> Result<String> {
    Ok(serde_json::to_string_pretty(node)?)
}

/// Decodes `value` into `node`, keeping `node`'s shape. Unknown object keys are
/// ignored; any value whose JSON kind doesn't fit the node is an error naming
/// the dotted location.
pub fn merge(node: &mut Node, value: &Value) -> Result<()> {
    merge_at(node, value, "")
}

fn merge_at(node: &mut Node, value: &Value, location: &str) -> Result<()> {
    if value.is_null() {
        match node {
            Node::Keyed(m) => m.clear(),
            Node::Ordered(s) => s.clear(),
            Node::Leaf(_) | Node::Composite(_) => {}
        }
        return Ok(());
    }
    match (node, value) {
        (Node::Leaf(Scalar::Int(n)), Value::Number(num)) => {
            *n = num
                .as_i64()
                .ok_or_else(|| mismatch(location, "an integer", value))?;
        }
        (Node::Leaf(Scalar::Str(s)), Value::String(v)) => *s = v.clone(),
        (Node::Leaf(Scalar::Bool(b)), Value::Bool(v)) => *b = *v,
        (Node::Composite(c), Value::Object(obj)) => {
            for (key, v) in obj {
                if let Some(field) = c.json_field_mut(key) {
                    let at = join(location, field.name());
                    merge_at(&mut field.node, v, &at)?;
                }
            }
        }
        (Node::Keyed(m), Value::Object(obj)) => {
            for (key, v) in obj {
                let at = join(location, key);
                let map_key = coerce::parse_key(m.key_kind(), key)
                    .map_err(|e| structural(&at, e.to_string()))?;
                let mut entry = m.new_entry();
                merge_at(&mut entry, v, &at)?;
                m.insert(map_key, entry)?;
            }
        }
        (Node::Ordered(s), Value::Array(items)) => {
            let mut fresh = Vec::with_capacity(items.len());
            for (i, v) in items.iter().enumerate() {
                let mut item = s.new_element();
                merge_at(&mut item, v, &join(location, &(i + 1).to_string()))?;
                fresh.push(item);
            }
            s.clear();
            for item in fresh {
                s.push(item);
            }
        }
        (node, value) => {
            let expected = match node {
                Node::Leaf(Scalar::Int(_)) => "an integer",
                Node::Leaf(Scalar::Str(_)) => "a string",
                Node::Leaf(Scalar::Bool(_)) => "a boolean",
                Node::Composite(_) | Node::Keyed(_) => "an object",
                Node::Ordered(_) => "an array",
            };
            return Err(mismatch(location, expected, value));
        }
    }
    Ok(())
}

fn mismatch(location: &str, expected: &str, found: &Value) -> ConfigError {
    let found = match found {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    };
    structural(location, format!("expected {}, found {}", expected, found))
}

fn structural(location: &str, message: String) -> ConfigError {
    let location = if location.is_empty() { "<root>" } else { location };
    ConfigError::StructuralParse {
        location: location.to_string(),
        message,
    }
}
