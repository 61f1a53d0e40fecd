//! Errors surfaced by the query runtime.

use thiserror::Error;

use cumulo_spi::{ConfigError, FetchError};

/// Failure while querying a built context.
#[derive(Debug, Error)]
pub enum QueryError {
    /// The requested name resolves to no registered schema object type.
    #[error("no schema object type registered under `{name}`")]
    UnknownSchemaObject {
        /// Name as the caller supplied it, before alias resolution.
        name: String,
    },
    /// The registered binding does not produce the requested item type.
    #[error("schema object type `{name}` is not backed by the requested item type")]
    ItemTypeMismatch {
        /// Canonical name of the binding that was queried.
        name: String,
    },
    /// A fetcher failed.
    #[error("fetch failed: {0}")]
    Fetch(#[from] FetchError),
    /// Configuration resolution failed outside any single fetcher.
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),
}

impl QueryError {
    /// Build a [`QueryError::UnknownSchemaObject`] for `name`.
    pub fn unknown_schema_object(name: impl Into<String>) -> Self {
        Self::UnknownSchemaObject { name: name.into() }
    }

    /// Build a [`QueryError::ItemTypeMismatch`] for `name`.
    pub fn item_type_mismatch(name: impl Into<String>) -> Self {
        Self::ItemTypeMismatch { name: name.into() }
    }
}
