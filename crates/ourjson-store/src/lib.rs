//! Bin persistence for OurJSON.
//!
//! The service talks to its backing document store only through the
//! [`BinStore`] trait: create, find-by-id, update-by-id and find-by-many-ids.
//! Concurrency control (isolation, last-write-wins on racing updates) is the
//! backend's business; nothing here retries.
//!
//! # Storage Backends
//!
//! - [`InMemoryBinStore`] -- `HashMap`-based store for tests and ephemeral servers
//! - [`FileBinStore`] -- one JSON document per bin under a directory
//!
//! # Design Rules
//!
//! 1. A store holds documents exactly as given. Key escaping happens above it.
//! 2. `binId` is never rewritten once a bin exists.
//! 3. There is no delete.

pub mod error;
pub mod file;
pub mod memory;
pub mod traits;

pub use error::{StoreError, StoreResult};
pub use file::FileBinStore;
pub use memory::InMemoryBinStore;
pub use traits::BinStore;
