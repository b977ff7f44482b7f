//! Outline store - tree mutation and change tracking
//!
//! [`OutlineModel`] holds the key-to-node map, the permanent root and
//! the change log. [`OutlineStore`] wraps it in a single coarse lock so
//! the HTTP layer can share it across request tasks; recursive delete
//! and child-key derivation are not safe under concurrent mutation, so
//! every operation takes the whole lock.

use crate::core::config::OutlineConfig;
use crate::outline::key::NodeKey;
use crate::outline::node::{NodeView, OutlineNode};
use parking_lot::RwLock;
use std::collections::{HashMap, HashSet};
use std::time::{Duration, SystemTime, UNIX_EPOCH};
use tracing::debug;

/// Seconds since the Unix epoch as a float, matching the `since`
/// query parameter on the wire.
fn unix_now() -> f64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or(Duration::ZERO)
        .as_secs_f64()
}

/// The outline tree plus its change log.
///
/// Not internally synchronized; see [`OutlineStore`] for the shared
/// handle used by the transport layer.
#[derive(Debug)]
pub struct OutlineModel {
    /// Exclusive owner of every node; a node is reachable from the
    /// root iff it has an entry here
    nodes: HashMap<NodeKey, OutlineNode>,
    /// Keys touched by a recent mutation, pruned by age on every read
    dirty: HashSet<NodeKey>,
    /// Change-log retention window
    retention: Duration,
    /// Last timestamp issued, to keep timestamps strictly increasing
    /// even when the wall clock does not advance between mutations
    last_stamp: f64,
}

impl OutlineModel {
    /// Create a model holding only the root node
    pub fn new(config: &OutlineConfig) -> Self {
        let mut model = Self {
            nodes: HashMap::new(),
            dirty: HashSet::new(),
            retention: Duration::from_secs(config.retention_secs),
            last_stamp: 0.0,
        };
        let stamp = model.next_timestamp();
        let root = OutlineNode::new(NodeKey::root(), config.root_text.clone(), stamp);
        model.nodes.insert(NodeKey::root(), root);
        model
    }

    /// Issue a timestamp strictly greater than any issued before.
    fn next_timestamp(&mut self) -> f64 {
        let now = unix_now();
        self.last_stamp = if now > self.last_stamp {
            now
        } else {
            // same clock reading as the previous mutation: step to the
            // next representable float
            f64::from_bits(self.last_stamp.to_bits() + 1)
        };
        self.last_stamp
    }

    /// Look up a node by key. Pure lookup, no side effects.
    pub fn get_item(&self, key: &NodeKey) -> Option<&OutlineNode> {
        self.nodes.get(key)
    }

    /// Create a new node under `parent_key`.
    ///
    /// Returns `None` if the parent does not exist. The child key is
    /// the parent key plus the parent's next child index; both the new
    /// key and the parent key are marked dirty.
    pub fn create_item(&mut self, parent_key: &NodeKey, text: String) -> Option<&OutlineNode> {
        if !self.nodes.contains_key(parent_key) {
            return None;
        }

        let stamp = self.next_timestamp();
        let parent = self.nodes.get_mut(parent_key)?;
        let index = parent.next_child_index;
        parent.next_child_index += 1;

        let key = parent_key.child(index);
        parent.children.push(key.clone());
        parent.last_modified = stamp;

        let node = OutlineNode::new(key.clone(), text, stamp);
        self.nodes.insert(key.clone(), node);
        self.dirty.insert(key.clone());
        self.dirty.insert(parent_key.clone());

        debug!(key = %key, parent = %parent_key, "created outline item");
        self.nodes.get(&key)
    }

    /// Replace the text of an existing node.
    ///
    /// Returns `None` without side effects if the key does not resolve.
    pub fn update_item(&mut self, key: &NodeKey, text: String) -> Option<&OutlineNode> {
        if !self.nodes.contains_key(key) {
            return None;
        }

        let stamp = self.next_timestamp();
        let node = self.nodes.get_mut(key)?;
        node.text = text;
        node.last_modified = stamp;
        self.dirty.insert(key.clone());

        debug!(key = %key, "updated outline item");
        self.nodes.get(key)
    }

    /// Delete a node and all of its descendants.
    ///
    /// Returns `false` for the root or an unresolved key. Children are
    /// deleted depth-first over a snapshot of the child list, since
    /// each recursive call mutates the live tree; the node is then
    /// detached from its parent and forgotten entirely.
    pub fn delete_item(&mut self, key: &NodeKey) -> bool {
        if key.is_root() {
            return false;
        }
        let children = match self.nodes.get(key) {
            Some(node) => node.children.clone(),
            None => return false,
        };

        for child in children {
            self.delete_item(&child);
        }

        if let Some(parent_key) = key.parent() {
            let stamp = self.next_timestamp();
            if let Some(parent) = self.nodes.get_mut(&parent_key) {
                parent.children.retain(|c| c != key);
                parent.last_modified = stamp;
            }
            self.dirty.insert(parent_key);
        }

        self.nodes.remove(key);
        debug!(key = %key, "deleted outline item");
        true
    }

    /// Keys of nodes mutated strictly after `since`.
    ///
    /// Entries whose node no longer exists contribute nothing. As a
    /// side effect the change log is swept: entries whose node's
    /// `last_modified` is older than the retention window are dropped.
    /// Entries for deleted nodes survive the sweep until they age out;
    /// that lazy cleanup is intentional, not a leak to fix eagerly.
    pub fn updated_since(&mut self, since: f64) -> Vec<NodeKey> {
        let updated: Vec<NodeKey> = self
            .dirty
            .iter()
            .filter(|key| {
                self.nodes
                    .get(*key)
                    .map_or(false, |node| node.last_modified > since)
            })
            .cloned()
            .collect();

        let cutoff = unix_now() - self.retention.as_secs_f64();
        self.sweep(cutoff);

        updated
    }

    /// Drop change-log entries last modified before `cutoff`.
    fn sweep(&mut self, cutoff: f64) {
        let nodes = &self.nodes;
        self.dirty
            .retain(|key| nodes.get(key).map_or(true, |node| node.last_modified >= cutoff));
    }

    /// Empty the change log unconditionally.
    ///
    /// Kept for API compatibility; pollers normally leave the log in
    /// place so other independent pollers still see the entries.
    pub fn clear_updated(&mut self) {
        self.dirty.clear();
    }

    /// Number of live nodes, root included
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }
}

/// Shared handle to the outline model.
///
/// Constructed once at startup and handed to the transport layer; all
/// access goes through these methods, never the raw maps. Mutations
/// take the write lock, so at most one request mutates at a time.
pub struct OutlineStore {
    model: RwLock<OutlineModel>,
}

impl OutlineStore {
    /// Create a store holding only the root node
    pub fn new(config: &OutlineConfig) -> Self {
        Self {
            model: RwLock::new(OutlineModel::new(config)),
        }
    }

    /// Snapshot of the node at `key`, if it exists
    pub fn get_item(&self, key: &NodeKey) -> Option<NodeView> {
        self.model.read().get_item(key).map(OutlineNode::view)
    }

    /// Create a node under `parent_key`; `None` if the parent is missing
    pub fn create_item(&self, parent_key: &NodeKey, text: String) -> Option<NodeView> {
        self.model
            .write()
            .create_item(parent_key, text)
            .map(OutlineNode::view)
    }

    /// Replace the text at `key`; `None` if the key is missing
    pub fn update_item(&self, key: &NodeKey, text: String) -> Option<NodeView> {
        self.model
            .write()
            .update_item(key, text)
            .map(OutlineNode::view)
    }

    /// Delete the subtree at `key`; `false` for the root or a missing key
    pub fn delete_item(&self, key: &NodeKey) -> bool {
        self.model.write().delete_item(key)
    }

    /// Keys mutated strictly after `since`, sweeping aged entries
    pub fn updated_since(&self, since: f64) -> Vec<NodeKey> {
        self.model.write().updated_since(since)
    }

    /// Empty the change log
    pub fn clear_updated(&self) {
        self.model.write().clear_updated();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn model() -> OutlineModel {
        OutlineModel::new(&OutlineConfig::default())
    }

    fn root() -> NodeKey {
        NodeKey::root()
    }

    #[test]
    fn root_exists_at_startup() {
        let model = model();
        let node = model.get_item(&root()).unwrap();
        assert_eq!(node.key, root());
        assert_eq!(node.text, "My Outline");
        assert!(node.children.is_empty());
    }

    #[test]
    fn create_derives_key_from_parent_index() {
        let mut model = model();
        let first = model.create_item(&root(), "A".into()).unwrap().key.clone();
        assert_eq!(first.as_str(), "/outline/0/");

        let second = model.create_item(&root(), "B".into()).unwrap().key.clone();
        assert_eq!(second.as_str(), "/outline/1/");

        let nested = model.create_item(&first, "C".into()).unwrap().key.clone();
        assert_eq!(nested.as_str(), "/outline/0/0/");

        let parent = model.get_item(&root()).unwrap();
        assert_eq!(parent.children, vec![first.clone(), second]);

        let created = model.get_item(&first).unwrap();
        assert_eq!(created.text, "A");
    }

    #[test]
    fn create_under_missing_parent_fails() {
        let mut model = model();
        let missing = root().child(9);
        assert!(model.create_item(&missing, "X".into()).is_none());
        assert_eq!(model.node_count(), 1);
    }

    #[test]
    fn deleted_index_is_never_reused() {
        let mut model = model();
        model.create_item(&root(), "A".into());
        let second = model.create_item(&root(), "B".into()).unwrap().key.clone();
        assert_eq!(second.as_str(), "/outline/1/");

        assert!(model.delete_item(&second));

        let third = model.create_item(&root(), "C".into()).unwrap().key.clone();
        assert_eq!(third.as_str(), "/outline/2/");
    }

    #[test]
    fn update_replaces_text_and_bumps_timestamp() {
        let mut model = model();
        let key = model.create_item(&root(), "old".into()).unwrap().key.clone();
        let before = model.get_item(&key).unwrap().last_modified;

        let node = model.update_item(&key, "new".into()).unwrap();
        assert_eq!(node.text, "new");
        assert!(node.last_modified > before);
    }

    #[test]
    fn update_missing_key_has_no_side_effects() {
        let mut model = model();
        let missing = root().child(3);
        assert!(model.update_item(&missing, "x".into()).is_none());
        assert!(model.updated_since(0.0).is_empty());
    }

    #[test]
    fn delete_removes_entire_subtree() {
        let mut model = model();
        let a = model.create_item(&root(), "A".into()).unwrap().key.clone();
        let b = model.create_item(&a, "B".into()).unwrap().key.clone();
        let c = model.create_item(&b, "C".into()).unwrap().key.clone();

        assert!(model.delete_item(&a));

        assert!(model.get_item(&a).is_none());
        assert!(model.get_item(&b).is_none());
        assert!(model.get_item(&c).is_none());
        assert!(model.get_item(&root()).unwrap().children.is_empty());
    }

    #[test]
    fn delete_root_fails_and_leaves_tree_unchanged() {
        let mut model = model();
        model.create_item(&root(), "A".into());

        assert!(!model.delete_item(&root()));
        assert_eq!(model.node_count(), 2);
        assert_eq!(model.get_item(&root()).unwrap().children.len(), 1);
    }

    #[test]
    fn delete_missing_key_fails() {
        let mut model = model();
        assert!(!model.delete_item(&root().child(5)));
    }

    #[test]
    fn delete_marks_parent_dirty() {
        let mut model = model();
        let a = model.create_item(&root(), "A".into()).unwrap().key.clone();
        let since = model.get_item(&a).unwrap().last_modified;

        model.delete_item(&a);

        let updated = model.updated_since(since);
        assert!(updated.contains(&root()));
        // the deleted key resolves to nothing, so it is filtered out
        assert!(!updated.contains(&a));
    }

    #[test]
    fn updated_since_reports_creations_then_quiesces() {
        let mut model = model();
        let a = model.create_item(&root(), "A".into()).unwrap().key.clone();

        let updated = model.updated_since(0.0);
        assert!(updated.contains(&a));
        assert!(updated.contains(&root()));

        let now = unix_now();
        assert!(model.updated_since(now).is_empty());
    }

    #[test]
    fn sweep_discards_entries_older_than_retention() {
        let mut model = model();
        let a = model.create_item(&root(), "A".into()).unwrap().key.clone();

        // age the node past the retention window
        model.nodes.get_mut(&a).unwrap().last_modified = unix_now() - 7200.0;
        model.nodes.get_mut(&root()).unwrap().last_modified = unix_now() - 7200.0;

        model.updated_since(unix_now());
        assert!(model.dirty.is_empty());
    }

    #[test]
    fn stale_entry_for_deleted_node_survives_until_aged_out() {
        let mut model = model();
        let a = model.create_item(&root(), "A".into()).unwrap().key.clone();
        model.delete_item(&a);

        // not returned, but the age-based sweep alone removes it
        assert!(!model.updated_since(0.0).contains(&a));
        assert!(model.dirty.contains(&a));
    }

    #[test]
    fn clear_updated_empties_the_change_log() {
        let mut model = model();
        model.create_item(&root(), "A".into());
        model.clear_updated();
        assert!(model.updated_since(0.0).is_empty());
    }

    #[test]
    fn timestamps_are_strictly_increasing() {
        let mut model = model();
        let mut last = 0.0;
        for _ in 0..100 {
            let stamp = model.next_timestamp();
            assert!(stamp > last);
            last = stamp;
        }
    }

    #[test]
    fn store_handle_round_trip() {
        let store = OutlineStore::new(&OutlineConfig::default());
        let created = store.create_item(&root(), "A".into()).unwrap();
        assert_eq!(created.key.as_str(), "/outline/0/");

        let fetched = store.get_item(&created.key).unwrap();
        assert_eq!(fetched, created);

        assert!(store.delete_item(&created.key));
        assert!(store.get_item(&created.key).is_none());
    }
}
