//! Hierarchical node keys
//!
//! A key is a path string ending in `/`. A child's key is its parent's
//! key plus a numeric segment, so `/outline/0/1/` is the second child
//! ever created under `/outline/0/`. The parent is recovered by
//! stripping the last segment; the segment index comes from a
//! per-parent counter that never decreases, so keys stay unique even
//! after siblings are deleted.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Key of the permanent root node.
pub const ROOT_KEY: &str = "/outline/";

/// Unique hierarchical path identifying an outline node.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeKey(String);

impl NodeKey {
    /// Key of the root node
    pub fn root() -> Self {
        NodeKey(ROOT_KEY.to_string())
    }

    /// Whether this is the root key
    pub fn is_root(&self) -> bool {
        self.0 == ROOT_KEY
    }

    /// Key of the child at the given index under this node
    pub fn child(&self, index: u64) -> Self {
        NodeKey(format!("{}{}/", self.0, index))
    }

    /// Parent key, obtained by stripping the last path segment.
    /// Returns `None` for the root.
    pub fn parent(&self) -> Option<Self> {
        if self.is_root() {
            return None;
        }
        let trimmed = self.0.strip_suffix('/')?;
        let cut = trimmed.rfind('/')?;
        Some(NodeKey(self.0[..=cut].to_string()))
    }

    /// Build a key from the `<path>` part of an `/outline/<path>/` URL.
    /// A missing trailing slash is tolerated and normalized.
    pub fn from_request_path(path: &str) -> Self {
        let mut key = format!("{}{}", ROOT_KEY, path);
        if !key.ends_with('/') {
            key.push('/');
        }
        NodeKey(key)
    }

    /// The key as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for NodeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn child_key_appends_index_segment() {
        let root = NodeKey::root();
        assert_eq!(root.child(0).as_str(), "/outline/0/");
        assert_eq!(root.child(0).child(3).as_str(), "/outline/0/3/");
    }

    #[test]
    fn parent_strips_last_segment() {
        let key = NodeKey::root().child(0).child(1);
        assert_eq!(key.parent(), Some(NodeKey::root().child(0)));
        assert_eq!(NodeKey::root().child(7).parent(), Some(NodeKey::root()));
    }

    #[test]
    fn root_has_no_parent() {
        assert_eq!(NodeKey::root().parent(), None);
    }

    #[test]
    fn request_path_is_normalized() {
        assert_eq!(NodeKey::from_request_path("0/1/").as_str(), "/outline/0/1/");
        assert_eq!(NodeKey::from_request_path("0/1").as_str(), "/outline/0/1/");
    }
}
