// File: crates/bubble-core/src/join.rs
// Summary: Enter/update/exit data joins between existing nodes and a new dataset.

use std::collections::{HashMap, HashSet};
use std::hash::Hash;

use crate::surface::NodeId;

/// Outcome of joining a dataset against existing nodes.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Join {
    /// `(data index, node)` pairs that stay bound, in data order.
    pub update: Vec<(usize, NodeId)>,
    /// Data indices without a node.
    pub enter: Vec<usize>,
    /// Nodes without a datum.
    pub exit: Vec<NodeId>,
}

/// Positional join: node `i` is bound to datum `i`.
pub fn join_by_index(nodes: &[NodeId], data_len: usize) -> Join {
    let shared = nodes.len().min(data_len);
    Join {
        update: nodes[..shared].iter().copied().enumerate().collect(),
        enter: (shared..data_len).collect(),
        exit: nodes[shared..].to_vec(),
    }
}

/// Keyed join. A node whose key repeats an earlier node's key exits; a datum whose key
/// repeats an earlier datum's key enters.
pub fn join_by_key<K: Eq + Hash>(nodes: &[(NodeId, K)], keys: &[K]) -> Join {
    let mut by_key: HashMap<&K, NodeId> = HashMap::with_capacity(nodes.len());
    let mut join = Join::default();
    for (id, key) in nodes {
        if by_key.contains_key(key) {
            join.exit.push(*id);
        } else {
            by_key.insert(key, *id);
        }
    }
    for (i, key) in keys.iter().enumerate() {
        match by_key.remove(key) {
            Some(id) => join.update.push((i, id)),
            None => join.enter.push(i),
        }
    }
    let unmatched: HashSet<NodeId> = by_key.into_values().collect();
    join.exit.extend(nodes.iter().map(|(id, _)| *id).filter(|id| unmatched.contains(id)));
    join
}
