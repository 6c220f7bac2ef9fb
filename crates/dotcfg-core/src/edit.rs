use tracing::debug;

use crate::coerce;
use crate::copy::deep_copy;
use crate::error::{ConfigError, Result};
use crate::model::{Node, NodeKind};
use crate::path::Path;

/// Walks `path` from `root` and returns the terminal leaf formatted as a string.
pub fn get_by_path(root: &Node, path: &Path) -> Result<String> {
    let mut node = root;
    for segment in path.segments() {
        node = step(node, segment)?;
    }
    match node {
        Node::Leaf(leaf) => Ok(coerce::format(leaf)),
        other => Err(ConfigError::UnsupportedType(other.kind())),
    }
}

fn step<'a>(node: &'a Node, segment: &str) -> Result<&'a Node> {
    match node {
        Node::Keyed(map) => {
            let key = coerce::parse_key(map.key_kind(), segment)?;
            map.get(&key)
                .ok_or_else(|| ConfigError::NoEntryFound(segment.to_string()))
        }
        Node::Composite(c) => c
            .lookup(segment)
            .ok_or_else(|| ConfigError::NoFieldWithName(segment.to_string())),
        Node::Ordered(seq) => {
            let index = coerce::parse_index(segment)?;
            seq.get(index)
                .ok_or_else(|| ConfigError::IndexOutOfRange(segment.to_string()))
        }
        Node::Leaf(leaf) => Err(ConfigError::CannotStepInto {
            kind: NodeKind::Leaf(leaf.kind()),
            segment: segment.to_string(),
        }),
    }
}

/// Assigns `value` to the leaf at `path`, or deletes the addressed map entry or
/// sequence element when `value` is empty and the last segment indexes a
/// container.
///
/// Set is all-or-nothing. Map entries are copied before descending and new
/// sequence slots are built off to the side; each staged value is committed into
/// its container only after everything below it succeeded, so commits land
/// innermost first and a failure anywhere leaves the tree untouched.
pub fn set_by_path(root: &mut Node, path: &Path, value: &str) -> Result<()> {
    set_at(root, path.segments(), value)
}

fn set_at(node: &mut Node, segments: &[String], value: &str) -> Result<()> {
    let Some((segment, rest)) = segments.split_first() else {
        return match node {
            Node::Leaf(leaf) => coerce::assign(leaf, value),
            other => Err(ConfigError::UnsupportedType(other.kind())),
        };
    };
    let last = rest.is_empty();

    match node {
        Node::Leaf(leaf) => Err(ConfigError::CannotStepInto {
            kind: NodeKind::Leaf(leaf.kind()),
            segment: segment.clone(),
        }),
        Node::Composite(c) => {
            let child = c
                .lookup_mut(segment)
                .ok_or_else(|| ConfigError::NoFieldWithName(segment.clone()))?;
            set_at(child, rest, value)
        }
        Node::Keyed(map) => {
            let key = coerce::parse_key(map.key_kind(), segment)?;
            if last && value.is_empty() {
                if map.remove(&key).is_some() {
                    debug!(key = %key, "deleted map entry");
                }
                return Ok(());
            }
            let mut staged = match map.get(&key) {
                Some(entry) => deep_copy(entry),
                None => map.new_entry(),
            };
            set_at(&mut staged, rest, value)?;
            debug!(key = %key, "committing map entry");
            map.insert(key, staged)?;
            Ok(())
        }
        Node::Ordered(seq) => {
            let index = coerce::parse_index(segment)?;
            if last && value.is_empty() {
                return match seq.remove(index) {
                    Some(_) => {
                        debug!(index, len = seq.len(), "deleted sequence element");
                        Ok(())
                    }
                    None => Err(ConfigError::IndexOutOfRange(segment.clone())),
                };
            }
            if let Some(item) = seq.get_mut(index) {
                return set_at(item, rest, value);
            }
            let mut staged = seq.new_element();
            set_at(&mut staged, rest, value)?;
            seq.reserve(index)
                .map_err(|_| ConfigError::IndexOutOfRange(segment.clone()))?;
            debug!(from = seq.len(), to = index, "growing sequence");
            seq.grow_to(index - 1);
            seq.push(staged);
            Ok(())
        }
    }
}
