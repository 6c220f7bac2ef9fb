// Generic config tree: four node shapes that every path walk dispatches on.
use std::collections::{BTreeMap, HashSet, TryReserveError};
use std::fmt;

use crate::coerce;
use crate::error::Result;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Scalar {
    Int(i64),
    Str(String),
    Bool(bool),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScalarKind {
    Int,
    Str,
    Bool,
}

impl Scalar {
    pub fn kind(&self) -> ScalarKind {
        match self {
            Scalar::Int(_) => ScalarKind::Int,
            Scalar::Str(_) => ScalarKind::Str,
            Scalar::Bool(_) => ScalarKind::Bool,
        }
    }

    pub fn zeroed(&self) -> Scalar {
        match self {
            Scalar::Int(_) => Scalar::Int(0),
            Scalar::Str(_) => Scalar::Str(String::new()),
            Scalar::Bool(_) => Scalar::Bool(false),
        }
    }

    pub fn is_zero(&self) -> bool {
        match self {
            Scalar::Int(n) => *n == 0,
            Scalar::Str(s) => s.is_empty(),
            Scalar::Bool(b) => !*b,
        }
    }
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scalar::Int(n) => write!(f, "{}", n),
            Scalar::Str(s) => f.write_str(s),
            Scalar::Bool(b) => write!(f, "{}", b),
        }
    }
}

/// Shape of a node, used in error messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    Leaf(ScalarKind),
    Composite,
    Keyed,
    Ordered,
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            NodeKind::Leaf(ScalarKind::Int) => "int",
            NodeKind::Leaf(ScalarKind::Str) => "string",
            NodeKind::Leaf(ScalarKind::Bool) => "bool",
            NodeKind::Composite => "composite",
            NodeKind::Keyed => "map",
            NodeKind::Ordered => "sequence",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    Leaf(Scalar),
    Composite(Composite),
    Keyed(Keyed),
    Ordered(Ordered),
}

impl Node {
    pub fn int(n: i64) -> Node {
        Node::Leaf(Scalar::Int(n))
    }

    pub fn string(s: impl Into<String>) -> Node {
        Node::Leaf(Scalar::Str(s.into()))
    }

    pub fn bool(b: bool) -> Node {
        Node::Leaf(Scalar::Bool(b))
    }

    pub fn kind(&self) -> NodeKind {
        match self {
            Node::Leaf(s) => NodeKind::Leaf(s.kind()),
            Node::Composite(_) => NodeKind::Composite,
            Node::Keyed(_) => NodeKind::Keyed,
            Node::Ordered(_) => NodeKind::Ordered,
        }
    }

    /// A node of the same shape with every leaf reset and every container emptied.
    pub fn zeroed(&self) -> Node {
        match self {
            Node::Leaf(s) => Node::Leaf(s.zeroed()),
            Node::Composite(c) => Node::Composite(Composite {
                fields: c.fields.iter().map(Field::zeroed).collect(),
            }),
            Node::Keyed(m) => Node::Keyed(Keyed::new(m.key_kind, (*m.template).clone())),
            Node::Ordered(s) => Node::Ordered(Ordered::new((*s.template).clone())),
        }
    }

    pub fn as_scalar(&self) -> Option<&Scalar> {
        match self {
            Node::Leaf(s) => Some(s),
            _ => None,
        }
    }
}

impl From<Composite> for Node {
    fn from(c: Composite) -> Self {
        Node::Composite(c)
    }
}

impl From<Keyed> for Node {
    fn from(m: Keyed) -> Self {
        Node::Keyed(m)
    }
}

impl From<Ordered> for Node {
    fn from(s: Ordered) -> Self {
        Node::Ordered(s)
    }
}

// -------- Composite --------

#[derive(Debug, Clone, PartialEq)]
pub struct Field {
    name: String,
    pub node: Node,
    hidden: bool,
    embedded: bool,
    json_name: Option<String>,
    omit_empty: bool,
}

impl Field {
    pub fn new(name: impl Into<String>, node: impl Into<Node>) -> Self {
        Self {
            name: name.into(),
            node: node.into(),
            hidden: false,
            embedded: false,
            json_name: None,
            omit_empty: false,
        }
    }

    /// Excluded from paths, enumeration and persistence.
    pub fn hidden(mut self) -> Self {
        self.hidden = true;
        self
    }

    /// Sub-fields appear at the parent's level without an added segment.
    pub fn embedded(mut self) -> Self {
        self.embedded = true;
        self
    }

    /// Name used in persisted JSON instead of the path name.
    pub fn rename(mut self, json_name: impl Into<String>) -> Self {
        self.json_name = Some(json_name.into());
        self
    }

    pub fn omit_empty(mut self) -> Self {
        self.omit_empty = true;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn json_name(&self) -> &str {
        self.json_name.as_deref().unwrap_or(&self.name)
    }

    pub fn is_hidden(&self) -> bool {
        self.hidden
    }

    pub fn is_omit_empty(&self) -> bool {
        self.omit_empty
    }

    /// True when this field's children are promoted into the parent.
    pub fn promotes(&self) -> bool {
        self.embedded && matches!(self.node, Node::Composite(_))
    }

    fn zeroed(&self) -> Field {
        Field {
            name: self.name.clone(),
            node: self.node.zeroed(),
            hidden: self.hidden,
            embedded: self.embedded,
            json_name: self.json_name.clone(),
            omit_empty: self.omit_empty,
        }
    }
}

/// Fixed, ordered set of named fields.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Composite {
    fields: Vec<Field>,
}

impl Composite {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, field: Field) -> Self {
        self.fields.push(field);
        self
    }

    pub fn field(self, name: impl Into<String>, node: impl Into<Node>) -> Self {
        self.with(Field::new(name, node))
    }

    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    pub fn fields_mut(&mut self) -> &mut [Field] {
        &mut self.fields
    }

    /// Path lookup: direct visible fields first, then promoted fields of
    /// embedded composites in declaration order.
    pub fn lookup(&self, name: &str) -> Option<&Node> {
        if let Some(f) = self.fields.iter().find(|f| !f.hidden && f.name == name) {
            return Some(&f.node);
        }
        for f in self.fields.iter().filter(|f| !f.hidden && f.promotes()) {
            if let Node::Composite(inner) = &f.node
                && let Some(n) = inner.lookup(name)
            {
                return Some(n);
            }
        }
        None
    }

    pub fn lookup_mut(&mut self, name: &str) -> Option<&mut Node> {
        if let Some(i) = self.fields.iter().position(|f| !f.hidden && f.name == name) {
            return Some(&mut self.fields[i].node);
        }
        for f in self.fields.iter_mut().filter(|f| !f.hidden && f.promotes()) {
            if let Node::Composite(inner) = &mut f.node
                && let Some(n) = inner.lookup_mut(name)
            {
                return Some(n);
            }
        }
        None
    }

    /// Flattened view of the visible fields with embedded composites expanded in
    /// place. `key` picks the name that shadowing is decided on (path name or
    /// JSON name), so a direct field always hides a promoted one.
    pub fn promoted_fields(&self, key: fn(&Field) -> &str) -> Vec<&Field> {
        self.promoted_routes(key).into_iter().map(|(_, f)| f).collect()
    }

    fn promoted_routes(&self, key: fn(&Field) -> &str) -> Vec<(Vec<usize>, &Field)> {
        let direct: HashSet<&str> = self
            .fields
            .iter()
            .filter(|f| !f.hidden && !f.promotes())
            .map(key)
            .collect();
        let mut seen = HashSet::new();
        let mut out = Vec::with_capacity(self.fields.len());
        for (i, f) in self.fields.iter().enumerate().filter(|(_, f)| !f.hidden) {
            match &f.node {
                Node::Composite(inner) if f.promotes() => {
                    for (mut route, pf) in inner.promoted_routes(key) {
                        let k = key(pf);
                        if !direct.contains(k) && seen.insert(k) {
                            route.insert(0, i);
                            out.push((route, pf));
                        }
                    }
                }
                _ => {
                    if seen.insert(key(f)) {
                        out.push((vec![i], f));
                    }
                }
            }
        }
        out
    }

    /// Field a persisted JSON key decodes into: exact match on the JSON name,
    /// else the first case-insensitive match.
    pub(crate) fn json_field_mut(&mut self, json_key: &str) -> Option<&mut Field> {
        let route = {
            let candidates = self.promoted_routes(Field::json_name);
            candidates
                .iter()
                .find(|(_, f)| f.json_name() == json_key)
                .or_else(|| {
                    candidates
                        .iter()
                        .find(|(_, f)| f.json_name().eq_ignore_ascii_case(json_key))
                })
                .map(|(route, _)| route.clone())
        }?;
        self.field_at_mut(&route)
    }

    fn field_at_mut(&mut self, route: &[usize]) -> Option<&mut Field> {
        let (&first, rest) = route.split_first()?;
        let field = self.fields.get_mut(first)?;
        if rest.is_empty() {
            return Some(field);
        }
        match &mut field.node {
            Node::Composite(inner) => inner.field_at_mut(rest),
            _ => None,
        }
    }
}

// -------- Keyed --------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyKind {
    Str,
    Int,
}

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum MapKey {
    Int(i64),
    Str(String),
}

impl fmt::Display for MapKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MapKey::Int(n) => write!(f, "{}", n),
            MapKey::Str(s) => f.write_str(s),
        }
    }
}

impl From<&str> for MapKey {
    fn from(s: &str) -> Self {
        MapKey::Str(s.to_string())
    }
}

impl From<i64> for MapKey {
    fn from(n: i64) -> Self {
        MapKey::Int(n)
    }
}

/// Map from string or integer keys to nodes of one declared element shape.
/// Entries iterate in ascending key order.
#[derive(Debug, Clone, PartialEq)]
pub struct Keyed {
    key_kind: KeyKind,
    template: Box<Node>,
    entries: BTreeMap<MapKey, Node>,
}

impl Keyed {
    pub fn new(key_kind: KeyKind, element: Node) -> Self {
        Self {
            key_kind,
            template: Box::new(element.zeroed()),
            entries: BTreeMap::new(),
        }
    }

    pub fn with_entry(
        mut self,
        key: impl Into<MapKey>,
        node: impl Into<Node>,
    ) -> Result<Self> {
        self.insert(key.into(), node.into())?;
        Ok(self)
    }

    pub fn key_kind(&self) -> KeyKind {
        self.key_kind
    }

    /// Fresh zero-valued element of the declared shape.
    pub fn new_entry(&self) -> Node {
        (*self.template).clone()
    }

    pub fn get(&self, key: &MapKey) -> Option<&Node> {
        self.entries.get(key)
    }

    pub fn get_mut(&mut self, key: &MapKey) -> Option<&mut Node> {
        self.entries.get_mut(key)
    }

    /// Stores `node` under `key` converted to the declared key kind, so every
    /// entry stays reachable by path. A string key on an integer map must parse.
    pub fn insert(&mut self, key: MapKey, node: Node) -> Result<Option<Node>> {
        let key = match (self.key_kind, key) {
            (KeyKind::Str, MapKey::Int(n)) => MapKey::Str(n.to_string()),
            (KeyKind::Int, MapKey::Str(s)) => MapKey::Int(coerce::parse_int(&s)?),
            (_, key) => key,
        };
        Ok(self.entries.insert(key, node))
    }

    pub fn remove(&mut self, key: &MapKey) -> Option<Node> {
        self.entries.remove(key)
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn iter(&self) -> impl Iterator<Item = (&MapKey, &Node)> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

// -------- Ordered --------

/// Sequence addressed externally by 1-based index.
#[derive(Debug, Clone, PartialEq)]
pub struct Ordered {
    template: Box<Node>,
    items: Vec<Node>,
}

impl Ordered {
    pub fn new(element: Node) -> Self {
        Self {
            template: Box::new(element.zeroed()),
            items: Vec::new(),
        }
    }

    pub fn with_items(mut self, items: impl IntoIterator<Item = Node>) -> Self {
        self.items.extend(items);
        self
    }

    pub fn new_element(&self) -> Node {
        (*self.template).clone()
    }

    /// `index` is 1-based.
    pub fn get(&self, index: usize) -> Option<&Node> {
        index.checked_sub(1).and_then(|i| self.items.get(i))
    }

    pub fn get_mut(&mut self, index: usize) -> Option<&mut Node> {
        index.checked_sub(1).and_then(|i| self.items.get_mut(i))
    }

    /// Makes room for `len` elements in total, failing instead of aborting when
    /// the allocation can't be had.
    pub fn reserve(&mut self, len: usize) -> std::result::Result<(), TryReserveError> {
        self.items.try_reserve(len.saturating_sub(self.items.len()))
    }

    /// Extends to `len` elements with zero values; never shrinks.
    pub fn grow_to(&mut self, len: usize) {
        while self.items.len() < len {
            let fresh = self.new_element();
            self.items.push(fresh);
        }
    }

    /// Removes the element at 1-based `index`, shifting later ones down.
    pub fn remove(&mut self, index: usize) -> Option<Node> {
        let i = index.checked_sub(1)?;
        if i < self.items.len() {
            Some(self.items.remove(i))
        } else {
            None
        }
    }

    pub fn push(&mut self, node: Node) {
        self.items.push(node);
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }

    pub fn items(&self) -> &[Node] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}
