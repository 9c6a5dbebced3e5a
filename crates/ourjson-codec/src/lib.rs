//! Reversible key escaping for JSON documents.
//!
//! Document stores in the MongoDB family reject object keys that start with
//! `$` or contain `.`. OurJSON accepts any JSON, so every document is passed
//! through [`escape`] before it is written and through [`unescape`] after it
//! is read.
//!
//! # Encoding
//!
//! | Input            | Stored form |
//! |------------------|-------------|
//! | `\`              | `\\`        |
//! | leading `$`      | `\u0024`    |
//! | `.` (anywhere)   | `\u002e`    |
//!
//! Backslashes are escaped too, so [`unescape_key`] is the exact inverse of
//! [`escape_key`] for every string, including keys that already contain
//! marker-like text.
//!
//! # Modules
//!
//! - [`key`] — single-key transforms
//! - [`tree`] — recursive walk over a [`serde_json::Value`]

pub mod key;
pub mod tree;

pub use key::{escape_key, is_store_safe, unescape_key};
pub use tree::{escape, unescape};
