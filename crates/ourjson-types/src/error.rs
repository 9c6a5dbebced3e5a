use thiserror::Error;

/// Errors produced by type operations.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TypeError {
    #[error("bin id is empty")]
    EmptyId,

    #[error("bin id contains invalid character {ch:?} at byte {index}")]
    InvalidChar { ch: char, index: usize },
}
