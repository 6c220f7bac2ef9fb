use std::collections::BTreeMap;

use crate::coerce;
use crate::model::{Field, Node, Scalar};
use crate::path::join;

/// Every leaf path with its string value, skipping leaves whose value is the
/// empty string. Zero integers and false booleans are kept.
pub fn list(root: &Node) -> BTreeMap<String, String> {
    let mut out = BTreeMap::new();
    walk(root, "", &mut |path, leaf| {
        let value = coerce::format(leaf);
        if !value.is_empty() {
            out.insert(path, value);
        }
    });
    out
}

/// Every leaf path, in tree order: composite fields as declared, map entries
/// by ascending key, sequence elements by index.
pub fn keys(root: &Node) -> Vec<String> {
    let mut out = Vec::new();
    walk(root, "", &mut |path, _| out.push(path));
    out
}

fn walk(node: &Node, prefix: &str, visit: &mut dyn FnMut(String, &Scalar)) {
    match node {
        Node::Leaf(leaf) => {
            // A bare leaf root has no address of its own.
            if !prefix.is_empty() {
                visit(prefix.to_string(), leaf);
            }
        }
        Node::Composite(c) => {
            for field in c.promoted_fields(Field::name) {
                walk(&field.node, &join(prefix, field.name()), visit);
            }
        }
        Node::Keyed(map) => {
            for (key, entry) in map.iter() {
                walk(entry, &join(prefix, &key.to_string()), visit);
            }
        }
        Node::Ordered(seq) => {
            for (i, item) in seq.items().iter().enumerate() {
                walk(item, &join(prefix, &(i + 1).to_string()), visit);
            }
        }
    }
}
