//! Foundation types for OurJSON.
//!
//! Every other OurJSON crate depends on `ourjson-types`.
//!
//! # Key Types
//!
//! - [`BinId`] — opaque, URL-safe identifier of a stored bin
//! - [`IdGenerator`] — source of fresh ids; [`RandomIdGenerator`] is the default
//! - [`Bin`] — the persisted record `{binId, json}`

pub mod bin;
pub mod error;
pub mod id;

pub use bin::Bin;
pub use error::TypeError;
pub use id::{BinId, IdGenerator, RandomIdGenerator, GENERATED_ID_LEN, ID_ALPHABET};
