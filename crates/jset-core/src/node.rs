//! # Validated Object Graph
//!
//! [`Node`] is the in-memory result of validation. Each node owns its
//! children; graphs share no memory and are never mutated after
//! construction. Leaves are read through explicit accessors
//! ([`Node::value`], [`Node::as_f64`], [`Node::as_number`], ...).
//!
//! [`Settings`] is a validated root: the schema it was built from, the root
//! node, and the raw source document retained verbatim.

use std::collections::btree_map;
use std::collections::BTreeMap;
use std::iter::Enumerate;
use std::slice;
use std::sync::Arc;

use serde_json::Value;

use crate::error::{Address, Segment};
use crate::schema::Schema;
use crate::value::{NumberValue, Numeric, NumericKind, Scalar};

/// A validated node.
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    /// A record field declared with a primitive kind.
    Primitive(Scalar),
    /// A record.
    Record(Record),
    /// A homogeneous sequence.
    Sequence(Vec<Node>),
    /// A homogeneous keyed collection.
    Keyed(BTreeMap<String, Node>),
    /// A terminal leaf.
    Terminal(Scalar),
    /// A numeric leaf.
    Number(NumberLeaf),
    /// A string-selection leaf.
    Selection(String),
}

/// The fields of a validated record, in declaration order.
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    schema: String,
    fields: Vec<(String, Node)>,
}

impl Record {
    pub(crate) fn new(schema: &str, fields: Vec<(String, Node)>) -> Self {
        Self {
            schema: schema.to_string(),
            fields,
        }
    }

    /// Name of the schema this record was validated against.
    pub fn schema_name(&self) -> &str {
        &self.schema
    }

    /// Look up a field by name.
    pub fn get(&self, name: &str) -> Option<&Node> {
        self.fields
            .iter()
            .find_map(|(field, node)| (field == name).then_some(node))
    }

    /// Fields in declaration order.
    pub fn fields(&self) -> &[(String, Node)] {
        &self.fields
    }

    /// Number of fields.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Returns true if the record declares no fields.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

/// A validated numeric leaf.
#[derive(Debug, Clone, PartialEq)]
pub struct NumberLeaf {
    kind: NumericKind,
    value: NumberValue,
    match_id: Option<String>,
}

impl NumberLeaf {
    pub(crate) fn scalar(value: Numeric) -> Self {
        Self {
            kind: value.kind(),
            value: NumberValue::Scalar(value),
            match_id: None,
        }
    }

    pub(crate) fn samples(kind: NumericKind, samples: Vec<Numeric>, match_id: Option<String>) -> Self {
        Self {
            kind,
            value: NumberValue::Samples(samples),
            match_id,
        }
    }

    /// The declared numeric kind.
    pub fn kind(&self) -> NumericKind {
        self.kind
    }

    /// The stored scalar or samples.
    pub fn value(&self) -> &NumberValue {
        &self.value
    }

    /// True if the leaf holds an array or range rather than a bare scalar.
    pub fn is_range(&self) -> bool {
        matches!(self.value, NumberValue::Samples(_))
    }

    /// The match group identifier, if one was given.
    pub fn match_id(&self) -> Option<&str> {
        self.match_id.as_deref()
    }
}

/// Iterator over the children of a node, yielding each child with the
/// segment that addresses it.
pub enum Children<'a> {
    /// Record fields in declaration order.
    Record(slice::Iter<'a, (String, Node)>),
    /// Sequence items by index.
    Sequence(Enumerate<slice::Iter<'a, Node>>),
    /// Keyed entries in key order.
    Keyed(btree_map::Iter<'a, String, Node>),
    /// Leaves have no children.
    Leaf,
}

impl<'a> Iterator for Children<'a> {
    type Item = (Segment, &'a Node);

    fn next(&mut self) -> Option<Self::Item> {
        match self {
            Self::Record(iter) => iter
                .next()
                .map(|(name, node)| (Segment::Field(name.clone()), node)),
            Self::Sequence(iter) => iter.next().map(|(idx, node)| (Segment::Index(idx), node)),
            Self::Keyed(iter) => iter
                .next()
                .map(|(key, node)| (Segment::Key(key.clone()), node)),
            Self::Leaf => None,
        }
    }
}

impl Node {
    /// Look up a record field or keyed entry by name.
    pub fn get(&self, name: &str) -> Option<&Node> {
        match self {
            Self::Record(record) => record.get(name),
            Self::Keyed(entries) => entries.get(name),
            _ => None,
        }
    }

    /// Look up a sequence item by index.
    pub fn at(&self, index: usize) -> Option<&Node> {
        match self {
            Self::Sequence(items) => items.get(index),
            _ => None,
        }
    }

    /// Follow one segment.
    pub fn child(&self, segment: &Segment) -> Option<&Node> {
        match (self, segment) {
            (Self::Record(record), Segment::Field(name)) => record.get(name),
            (Self::Keyed(entries), Segment::Key(key)) => entries.get(key),
            (Self::Sequence(items), Segment::Index(idx)) => items.get(*idx),
            _ => None,
        }
    }

    /// Follow an address from this node.
    pub fn lookup(&self, address: &Address) -> Option<&Node> {
        address
            .segments()
            .iter()
            .try_fold(self, |node, segment| node.child(segment))
    }

    /// Number of children. Zero for leaves.
    pub fn len(&self) -> usize {
        match self {
            Self::Record(record) => record.len(),
            Self::Sequence(items) => items.len(),
            Self::Keyed(entries) => entries.len(),
            _ => 0,
        }
    }

    /// Returns true if the node has no children.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns true for records, sequences and keyed collections.
    pub fn is_composite(&self) -> bool {
        matches!(self, Self::Record(_) | Self::Sequence(_) | Self::Keyed(_))
    }

    /// Iterate over children with their addressing segments.
    pub fn children(&self) -> Children<'_> {
        match self {
            Self::Record(record) => Children::Record(record.fields.iter()),
            Self::Sequence(items) => Children::Sequence(items.iter().enumerate()),
            Self::Keyed(entries) => Children::Keyed(entries.iter()),
            _ => Children::Leaf,
        }
    }

    /// The stored scalar of a primitive field or terminal leaf.
    pub fn value(&self) -> Option<&Scalar> {
        match self {
            Self::Primitive(scalar) | Self::Terminal(scalar) => Some(scalar),
            _ => None,
        }
    }

    /// The record, if this is one.
    pub fn as_record(&self) -> Option<&Record> {
        match self {
            Self::Record(record) => Some(record),
            _ => None,
        }
    }

    /// The numeric leaf, if this is one.
    pub fn as_number(&self) -> Option<&NumberLeaf> {
        match self {
            Self::Number(leaf) => Some(leaf),
            _ => None,
        }
    }

    /// A numeric scalar widened to `f64`. `None` for ranges.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Number(leaf) => leaf.value().scalar().map(Numeric::as_f64),
            other => other.value().and_then(Scalar::as_f64),
        }
    }

    /// An integer scalar. `None` for ranges and floats.
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Self::Number(leaf) => match leaf.value().scalar()? {
                Numeric::Int(i) => Some(i),
                Numeric::Float(_) => None,
            },
            other => other.value().and_then(Scalar::as_i64),
        }
    }

    /// A string scalar or selection.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Selection(value) => Some(value),
            other => other.value().and_then(Scalar::as_str),
        }
    }

    /// A boolean scalar.
    pub fn as_bool(&self) -> Option<bool> {
        self.value().and_then(Scalar::as_bool)
    }

    /// The samples of a numeric leaf, or the single scalar as a slice.
    pub fn as_samples(&self) -> Option<&[Numeric]> {
        self.as_number().map(|leaf| leaf.value().samples())
    }
}

/// A validated root together with its schema and retained source data.
///
/// Two settings objects are equal iff their source documents are equal.
#[derive(Debug, Clone)]
pub struct Settings {
    schema: Arc<Schema>,
    root: Node,
    source: Value,
}

impl Settings {
    pub(crate) fn new(schema: Arc<Schema>, root: Node, source: Value) -> Self {
        Self {
            schema,
            root,
            source,
        }
    }

    /// The schema this object was validated against.
    pub fn schema(&self) -> &Arc<Schema> {
        &self.schema
    }

    /// The validated root node.
    pub fn root(&self) -> &Node {
        &self.root
    }

    /// The raw source data, unmodified.
    pub fn source(&self) -> &Value {
        &self.source
    }

    /// Look up a top-level field or entry.
    pub fn get(&self, name: &str) -> Option<&Node> {
        self.root.get(name)
    }

    /// Follow an address from the root.
    pub fn lookup(&self, address: &Address) -> Option<&Node> {
        self.root.lookup(address)
    }

    /// Consume into the root node.
    pub fn into_root(self) -> Node {
        self.root
    }
}

impl PartialEq for Settings {
    fn eq(&self, other: &Self) -> bool {
        self.source == other.source
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Node {
        let mut keyed = BTreeMap::new();
        keyed.insert("b".to_string(), Node::Terminal(Scalar::Int(2)));
        keyed.insert("a".to_string(), Node::Terminal(Scalar::Int(1)));
        Node::Record(Record::new(
            "Main",
            vec![
                ("name".to_string(), Node::Primitive(Scalar::Str("x".to_string()))),
                (
                    "items".to_string(),
                    Node::Sequence(vec![Node::Number(NumberLeaf::scalar(Numeric::Float(1.5)))]),
                ),
                ("map".to_string(), Node::Keyed(keyed)),
            ],
        ))
    }

    #[test]
    fn test_lookup_follows_address() {
        let root = sample();
        let address: Address = vec![
            Segment::Field("items".to_string()),
            Segment::Index(0),
        ]
        .into();
        assert_eq!(root.lookup(&address).and_then(Node::as_f64), Some(1.5));
    }

    #[test]
    fn test_lookup_rejects_wrong_segment_kind() {
        let root = sample();
        let address: Address = vec![Segment::Key("name".to_string())].into();
        assert!(root.lookup(&address).is_none());
    }

    #[test]
    fn test_children_order() {
        let root = sample();
        let segments: Vec<Segment> = root.children().map(|(s, _)| s).collect();
        assert_eq!(
            segments,
            vec![
                Segment::Field("name".to_string()),
                Segment::Field("items".to_string()),
                Segment::Field("map".to_string()),
            ]
        );
        let keys: Vec<Segment> = root.get("map").unwrap().children().map(|(s, _)| s).collect();
        assert_eq!(
            keys,
            vec![Segment::Key("a".to_string()), Segment::Key("b".to_string())]
        );
    }

    #[test]
    fn test_scalar_accessors() {
        let root = sample();
        assert_eq!(root.get("name").and_then(Node::as_str), Some("x"));
        assert_eq!(root.get("map").and_then(|m| m.get("a")).and_then(Node::as_i64), Some(1));
        assert_eq!(root.len(), 3);
        assert!(root.get("missing").is_none());
    }

    #[test]
    fn test_range_has_no_scalar() {
        let leaf = NumberLeaf::samples(
            NumericKind::Float,
            vec![Numeric::Float(1.0), Numeric::Float(2.0)],
            Some("g".to_string()),
        );
        let node = Node::Number(leaf);
        assert!(node.as_f64().is_none());
        assert_eq!(node.as_samples().map(<[Numeric]>::len), Some(2));
        assert_eq!(node.as_number().and_then(NumberLeaf::match_id), Some("g"));
    }
}
