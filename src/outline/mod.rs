//! Outline tree model and change tracking
//!
//! The outline is a tree of text nodes addressed by hierarchical path
//! keys (`/outline/0/1/`). All mutation goes through [`OutlineStore`];
//! each mutation records the touched keys in a change log that clients
//! poll through `updated_since` and that is pruned by age on every read.

pub mod key;
pub mod node;
pub mod store;

// Re-export main model types
pub use key::NodeKey;
pub use node::{NodeView, OutlineNode};
pub use store::{OutlineModel, OutlineStore};
