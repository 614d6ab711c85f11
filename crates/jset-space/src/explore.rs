//! # Range Discovery
//!
//! Depth-first walk of a validated graph, in declaration order for records,
//! index order for sequences and key order for keyed collections. A numeric
//! leaf holding samples ends its branch and is recorded with its address;
//! scalar numeric leaves and other leaves are skipped.
//!
//! ## Restriction
//!
//! A [`Restriction`] maps a field or key name to the one child that may be
//! explored below it. At any container whose children include restriction
//! keys, siblings that are not restriction keys are pruned, so
//! `{"object": "a"}` explores only `object -> a`.

use std::collections::BTreeMap;

use jset_core::{Address, Node, NumberLeaf, Numeric, Segment};
use serde::{Deserialize, Serialize};

/// Field-name to required-child-name mapping that narrows exploration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Restriction(BTreeMap<String, String>);

impl Restriction {
    /// An empty restriction: every branch is explored.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a rule: below `name`, only explore `child`.
    #[must_use]
    pub fn with(mut self, name: impl Into<String>, child: impl Into<String>) -> Self {
        self.0.insert(name.into(), child.into());
        self
    }

    /// The child required below `name`, if `name` is restricted.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.0.get(name).map(String::as_str)
    }

    /// Returns true if `name` is a restriction key.
    pub fn contains(&self, name: &str) -> bool {
        self.0.contains_key(name)
    }

    /// Returns true if no rules are set.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    fn covers(&self, segment: &Segment) -> bool {
        segment.name().is_some_and(|name| self.contains(name))
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Restriction {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}

/// A discovered range leaf.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct RangeLeaf {
    pub(crate) address: Address,
    pub(crate) samples: Vec<Numeric>,
}

/// Range leaves sharing one match id, in discovery order.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct MatchGroup {
    pub(crate) id: String,
    pub(crate) leaves: Vec<RangeLeaf>,
}

/// Everything a walk found: independent leaves in discovery order, then
/// match groups in first-seen order.
#[derive(Debug, Default)]
pub(crate) struct Discovery {
    pub(crate) independent: Vec<RangeLeaf>,
    pub(crate) groups: Vec<MatchGroup>,
}

impl Discovery {
    fn record(&mut self, address: Address, leaf: &NumberLeaf) {
        let samples = leaf.value().samples().to_vec();
        tracing::debug!(
            address = %address,
            samples = samples.len(),
            match_id = ?leaf.match_id(),
            "range discovered"
        );
        let found = RangeLeaf { address, samples };
        match leaf.match_id() {
            None => self.independent.push(found),
            Some(id) => match self.groups.iter_mut().find(|group| group.id == id) {
                Some(group) => group.leaves.push(found),
                None => self.groups.push(MatchGroup {
                    id: id.to_string(),
                    leaves: vec![found],
                }),
            },
        }
    }
}

/// Find every range leaf reachable from `root`.
pub(crate) fn discover(root: &Node, restriction: &Restriction) -> Discovery {
    let mut discovery = Discovery::default();
    let mut path = Address::root();
    match root {
        Node::Number(leaf) if leaf.is_range() => discovery.record(path, leaf),
        _ => walk(root, &mut path, None, restriction, &mut discovery),
    }
    discovery
}

fn walk(
    node: &Node,
    path: &mut Address,
    only: Option<&str>,
    restriction: &Restriction,
    discovery: &mut Discovery,
) {
    let mut children: Vec<(Segment, &Node)> = node
        .children()
        .filter(|(segment, _)| only.map_or(true, |name| segment.name() == Some(name)))
        .collect();
    if children.iter().any(|(segment, _)| restriction.covers(segment)) {
        children.retain(|(segment, _)| restriction.covers(segment));
    }

    for (segment, child) in children {
        if let Node::Number(leaf) = child {
            if leaf.is_range() {
                discovery.record(path.child(segment), leaf);
            }
            continue;
        }
        let next = segment.name().and_then(|name| restriction.get(name));
        path.push(segment);
        walk(child, path, next, restriction, discovery);
        path.pop();
    }
}
