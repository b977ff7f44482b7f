//! # API Module
//!
//! HTTP interface for the outline server:
//!
//! - `GET /outline/` - Fetch the root node
//! - `POST /outline/` - Create an item under the root
//! - `GET /outline/<path>/` - Fetch an item
//! - `POST /outline/<path>/` - Create an item under `<path>`
//! - `PUT /outline/<path>/` - Replace an item's text
//! - `DELETE /outline/<path>/` - Delete an item and its subtree
//! - `GET /updates/?since=<float>` - Poll for recently-changed keys
//! - `GET /health` - Health check
//!
//! Static assets (`/`, `/style.css`, `/main.js`, `/favicon.ico`) are
//! file pass-throughs from the configured asset directory.

pub mod handlers;
pub mod server;

// Re-export commonly used items
pub use server::{create_app, start_server};
