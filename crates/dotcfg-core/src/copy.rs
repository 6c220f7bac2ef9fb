use crate::model::Node;

/// Fully independent clone of an acyclic tree. Leaves are copied by value and
/// every Composite field, Keyed entry and Ordered element is cloned
/// recursively, so mutating the copy never shows through to the original.
pub fn deep_copy(node: &Node) -> Node {
    node.clone()
}
