//! Outline node representation

use crate::outline::key::NodeKey;
use serde::Serialize;

/// A single node in the outline tree.
///
/// Owned exclusively by the store's key-to-node map; the key never
/// changes after creation. `last_modified` is bumped on every mutation
/// touching the node (text change, child added, child removed) and is
/// strictly increasing per node.
#[derive(Debug, Clone)]
pub struct OutlineNode {
    /// Hierarchical path key, immutable after creation
    pub key: NodeKey,
    /// Node text
    pub text: String,
    /// Child keys in insertion order
    pub children: Vec<NodeKey>,
    /// Seconds since epoch of the last mutation touching this node
    pub last_modified: f64,
    /// Index assigned to the next child created under this node.
    /// Never decremented, so deleted siblings cannot leave a freed
    /// index behind to collide with a later creation.
    pub(crate) next_child_index: u64,
}

impl OutlineNode {
    /// Create a node with the given key and text
    pub(crate) fn new(key: NodeKey, text: String, timestamp: f64) -> Self {
        Self {
            key,
            text,
            children: Vec::new(),
            last_modified: timestamp,
            next_child_index: 0,
        }
    }

    /// Boundary representation of this node
    pub fn view(&self) -> NodeView {
        NodeView {
            key: self.key.clone(),
            text: self.text.clone(),
            children: self.children.clone(),
        }
    }
}

/// Serialized form of a node at the HTTP boundary.
///
/// Children are listed by key only; clients fetch subtrees with
/// further requests.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct NodeView {
    /// Node key
    pub key: NodeKey,
    /// Node text
    pub text: String,
    /// Child keys in insertion order
    pub children: Vec<NodeKey>,
}
