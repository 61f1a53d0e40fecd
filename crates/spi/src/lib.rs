//! Service provider interface for the Cumulo query runtime.
//!
//! This crate defines the contracts a cloud connector implements and the
//! types that cross the boundary between connectors and the runtime:
//!
//! - [`DataFetcher`] produces all records of one schema object type, reading
//!   the configuration it needs from a [`DataFetchContext`].
//! - [`QuerySchemaProvider`] contributes fetcher bindings for a whole
//!   connector at context build time.
//! - [`PropertyProvider`] and [`ConfigProperty`] carry configuration values
//!   between embedders and fetchers without coupling either side to concrete
//!   types.
//!
//! Nothing in this crate performs I/O. Connectors depend on it alone, and the
//! runtime crate consumes these contracts to build query contexts.

pub mod context;
pub mod error;
pub mod fetcher;
pub mod format;
pub mod property;
pub mod schema;

pub use context::{ConfigurationProvider, DataFetchContext};
pub use error::{BoxedError, ConfigError, FetchError};
pub use fetcher::{DataFetcher, ItemFetcher, RowsFetcher, SchemaObject, SchemaObjectBinding};
pub use format::{DataFormat, FieldFormat, FieldKind};
pub use property::{
    ComputedProperty, ConfigProperty, PropertyProvider, PropertyValue, StaticProperty,
};
pub use schema::{QuerySchemaProvider, SchemaProviderDiscovery, StaticDiscovery};
