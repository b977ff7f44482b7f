//! Core system types and foundations
//!
//! Fundamental building blocks of the outline server: error handling
//! and configuration.

pub mod error;
pub mod config;

// Re-export commonly used items
pub use error::{Error, Result};
pub use config::Config;
