//! HTTP server for OurJSON.
//!
//! Clients POST arbitrary JSON documents, get back a generated bin id, and
//! later read, replace or bulk-export bins by id. Object keys the backing
//! store would reject are escaped on write and restored on read.

pub mod body;
pub mod config;
pub mod error;
pub mod handler;
pub mod router;
pub mod server;
pub mod service;

pub use body::{JsonBody, RequestBody};
pub use config::{ServerConfig, StorageConfig};
pub use error::{ApiError, ApiResult, ServerError, ServerResult};
pub use server::{open_store, BinServer};
pub use service::{BinService, CreatedBin, ExportResponse};
