//! Error types shared across the query runtime and its connectors.
//!
//! Connectors surface their own failure enums internally; at the SPI boundary
//! everything funnels into [`ConfigError`] (configuration and build problems)
//! or [`FetchError`] (a data fetch that could not complete).

use std::error::Error as StdError;

use thiserror::Error;

/// Boxed error used wherever a connector-specific cause crosses the SPI.
pub type BoxedError = Box<dyn StdError + Send + Sync>;

/// Configuration or context-build failure.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// No property provider is registered for the requested key.
    #[error("no property provider registered for `{key}`")]
    UnknownProperty {
        /// Property key that was looked up.
        key: String,
    },
    /// A required property resolved to no value.
    #[error("required property `{key}` has no value")]
    MissingProperty {
        /// Property key that was resolved.
        key: String,
    },
    /// A property resolved to a value of an unexpected type.
    #[error("property `{key}` does not hold a `{expected}`")]
    TypeMismatch {
        /// Property key that was resolved.
        key: String,
        /// Type the caller asked for.
        expected: &'static str,
    },
    /// An alias points at a schema object type that is not registered.
    #[error("alias `{alias}` refers to unknown schema object type `{type_name}`")]
    UnresolvedAlias {
        /// Alias that failed to resolve.
        alias: String,
        /// Canonical type name the alias points at.
        type_name: String,
    },
    /// Property providers recursed into each other while resolving a key.
    #[error("property provider cycle while resolving `{key}`: {chain}")]
    ProviderCycle {
        /// Key whose resolution re-entered an in-flight provider.
        key: String,
        /// Resolution chain at the point the cycle closed.
        chain: String,
    },
    /// A property provider failed while computing its value.
    #[error("property provider for `{key}` failed: {source}")]
    Provider {
        /// Key whose provider failed.
        key: String,
        /// Underlying provider failure.
        #[source]
        source: BoxedError,
    },
}

impl ConfigError {
    /// Build a [`ConfigError::UnknownProperty`] for `key`.
    pub fn unknown_property(key: impl Into<String>) -> Self {
        Self::UnknownProperty { key: key.into() }
    }

    /// Build a [`ConfigError::MissingProperty`] for `key`.
    pub fn missing_property(key: impl Into<String>) -> Self {
        Self::MissingProperty { key: key.into() }
    }

    /// Build a [`ConfigError::TypeMismatch`] for `key`.
    pub fn type_mismatch(key: impl Into<String>, expected: &'static str) -> Self {
        Self::TypeMismatch {
            key: key.into(),
            expected,
        }
    }

    /// Build a [`ConfigError::UnresolvedAlias`] naming both sides.
    pub fn unresolved_alias(alias: impl Into<String>, type_name: impl Into<String>) -> Self {
        Self::UnresolvedAlias {
            alias: alias.into(),
            type_name: type_name.into(),
        }
    }

    /// Build a [`ConfigError::ProviderCycle`] from the in-flight key stack.
    pub fn provider_cycle(key: impl Into<String>, stack: &[String]) -> Self {
        Self::ProviderCycle {
            key: key.into(),
            chain: stack.join(" -> "),
        }
    }

    /// Wrap a provider-specific failure for `key`.
    pub fn provider(key: impl Into<String>, source: impl Into<BoxedError>) -> Self {
        Self::Provider {
            key: key.into(),
            source: source.into(),
        }
    }
}

/// A data fetch failed for one schema object type.
///
/// The wrapped cause is whatever the fetcher hit first: a configuration
/// problem, a client failure, or a serialization error. The canonical type
/// name identifies which registered fetcher was running.
#[derive(Debug, Error)]
#[error("could not fetch `{type_name}`: {source}")]
pub struct FetchError {
    type_name: String,
    #[source]
    source: BoxedError,
}

impl FetchError {
    /// Wrap `source` as the fetch failure for `type_name`.
    pub fn new(type_name: impl Into<String>, source: impl Into<BoxedError>) -> Self {
        Self {
            type_name: type_name.into(),
            source: source.into(),
        }
    }

    /// Canonical name of the schema object type whose fetch failed.
    pub fn type_name(&self) -> &str {
        &self.type_name
    }
}
