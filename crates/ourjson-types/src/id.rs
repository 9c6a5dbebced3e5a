use std::fmt;
use std::str::FromStr;

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::TypeError;

/// Symbols a bin id may contain. Every one of them is safe in a URL path
/// segment and in a file name.
pub const ID_ALPHABET: &[u8; 64] =
    b"0123456789abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ_-";

/// Length of ids produced by [`RandomIdGenerator`] (72 bits of entropy).
pub const GENERATED_ID_LEN: usize = 12;

/// Opaque identifier of a stored bin.
///
/// A `BinId` is assigned once when the bin is created and never changes.
/// Parsing only checks the shape (non-empty, URL-safe alphabet); whether a
/// bin with that id exists is a question for the store.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct BinId(String);

impl BinId {
    /// Validate and wrap an identifier received from a client.
    pub fn parse(s: &str) -> Result<Self, TypeError> {
        if s.is_empty() {
            return Err(TypeError::EmptyId);
        }
        if let Some((index, ch)) = s.char_indices().find(|(_, c)| !is_id_char(*c)) {
            return Err(TypeError::InvalidChar { ch, index });
        }
        Ok(Self(s.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

fn is_id_char(c: char) -> bool {
    c.is_ascii() && ID_ALPHABET.contains(&(c as u8))
}

impl FromStr for BinId {
    type Err = TypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for BinId {
    type Error = TypeError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<BinId> for String {
    fn from(id: BinId) -> Self {
        id.0
    }
}

impl AsRef<str> for BinId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for BinId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "BinId({})", self.0)
    }
}

impl fmt::Display for BinId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Source of fresh bin identifiers.
///
/// Implementations must be callable concurrently from independent requests
/// without coordination.
pub trait IdGenerator: Send + Sync {
    fn generate(&self) -> BinId;
}

/// Draws [`GENERATED_ID_LEN`] symbols from [`ID_ALPHABET`] using the
/// thread-local CSPRNG. Holds no state, so there is nothing to lock.
#[derive(Clone, Copy, Debug, Default)]
pub struct RandomIdGenerator;

impl IdGenerator for RandomIdGenerator {
    fn generate(&self) -> BinId {
        let mut rng = rand::thread_rng();
        let id: String = (0..GENERATED_ID_LEN)
            .map(|_| ID_ALPHABET[rng.gen_range(0..ID_ALPHABET.len())] as char)
            .collect();
        BinId(id)
    }
}
