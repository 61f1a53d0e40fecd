//! Immutable query contexts.

use indexmap::IndexMap;
use serde_json::Value;
use tracing::{debug, info, warn};

use cumulo_spi::{DataFormat, SchemaObject, SchemaObjectBinding};

use crate::error::QueryError;
use crate::properties::{FetchContext, PropertyTable};

/// Frozen registry of schema object types, aliases, and configuration.
///
/// A context is immutable once built and safe to share across threads; every
/// query runs against the same table of bindings, and each fetch receives its
/// own [`FetchContext`]. Queries accept either a canonical type name or a
/// registered alias.
pub struct QueryContext {
    bindings: IndexMap<String, SchemaObjectBinding>,
    aliases: IndexMap<String, String>,
    properties: PropertyTable,
}

impl QueryContext {
    pub(crate) fn new(
        bindings: IndexMap<String, SchemaObjectBinding>,
        aliases: IndexMap<String, String>,
        properties: PropertyTable,
    ) -> Self {
        info!(
            schema_objects = bindings.len(),
            aliases = aliases.len(),
            properties = properties.len(),
            "query context built"
        );
        Self {
            bindings,
            aliases,
            properties,
        }
    }

    /// Canonical type names registered in this context, in resolution order.
    pub fn schema_object_names(&self) -> impl Iterator<Item = &str> {
        self.bindings.keys().map(String::as_str)
    }

    /// Resolve `name` through the alias table to a canonical type name.
    pub fn resolve_name<'a>(&'a self, name: &'a str) -> &'a str {
        self.aliases.get(name).map(String::as_str).unwrap_or(name)
    }

    /// Look up the binding registered under `name` or an alias of it.
    pub fn schema_object(&self, name: &str) -> Result<&SchemaObjectBinding, QueryError> {
        self.bindings
            .get(self.resolve_name(name))
            .ok_or_else(|| QueryError::unknown_schema_object(name))
    }

    /// Field-level description of the rows `name` produces.
    pub fn data_format(&self, name: &str) -> Result<&DataFormat, QueryError> {
        self.schema_object(name).map(SchemaObjectBinding::data_format)
    }

    /// Open a property resolution context for one fetch invocation.
    ///
    /// Exposed so fetchers can be exercised directly against a built
    /// context's configuration.
    pub fn fetch_context(&self) -> FetchContext<'_> {
        FetchContext::new(&self.properties)
    }

    /// Fetch every record of `name` as JSON rows.
    pub fn fetch_rows(&self, name: &str) -> Result<Vec<Value>, QueryError> {
        let binding = self.schema_object(name)?;
        let type_name = binding.canonical_name();
        debug!(type_name, "fetch started");
        let ctx = self.fetch_context();
        match binding.fetch_rows(&ctx) {
            Ok(rows) => {
                info!(type_name, rows = rows.len(), "fetch completed");
                Ok(rows)
            }
            Err(err) => {
                warn!(type_name, error = %err, "fetch failed");
                Err(err.into())
            }
        }
    }

    /// Fetch several types in one call, keyed by canonical type name.
    ///
    /// Names are fetched in the order given; a name requested twice (directly
    /// or through an alias) is fetched once. The first failure aborts the
    /// whole call.
    pub fn fetch_all_rows(&self, names: &[&str]) -> Result<IndexMap<String, Vec<Value>>, QueryError> {
        let mut results: IndexMap<String, Vec<Value>> = IndexMap::new();
        for name in names {
            let canonical = self.resolve_name(name);
            if results.contains_key(canonical) {
                continue;
            }
            let rows = self.fetch_rows(name)?;
            results.insert(canonical.to_string(), rows);
        }
        Ok(results)
    }

    /// Fetch every record of `T` as typed items.
    pub fn fetch<T: SchemaObject>(&self) -> Result<Vec<T>, QueryError> {
        let binding = self.schema_object(T::CANONICAL_NAME)?;
        let type_name = binding.canonical_name();
        let Some(fetcher) = binding.typed_fetcher::<T>() else {
            return Err(QueryError::item_type_mismatch(type_name));
        };
        debug!(type_name, "typed fetch started");
        let ctx = self.fetch_context();
        match fetcher.fetch_items(&ctx) {
            Ok(items) => {
                info!(type_name, items = items.len(), "typed fetch completed");
                Ok(items)
            }
            Err(err) => {
                warn!(type_name, error = %err, "typed fetch failed");
                Err(err.into())
            }
        }
    }
}

impl std::fmt::Debug for QueryContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("QueryContext")
            .field("schema_objects", &self.bindings.len())
            .field("aliases", &self.aliases.len())
            .finish_non_exhaustive()
    }
}
