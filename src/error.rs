use thiserror::Error;

/// Errors returned by [`Tree`](crate::Tree) queries that measure a node by key.
#[derive(Clone, Copy, Debug, Error, Eq, PartialEq, Hash)]
pub enum TreeError {
    /// The queried key is not stored in the tree.
    #[error("key not found in tree")]
    KeyNotFound,
}

/// Result type for fallible [`Tree`](crate::Tree) queries.
pub type Result<T> = core::result::Result<T, TreeError>;
