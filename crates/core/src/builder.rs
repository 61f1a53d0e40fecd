//! Mutable accumulation of configuration, fetchers, and schema providers.

use std::sync::Arc;

use indexmap::IndexMap;
use tracing::debug;

use cumulo_spi::{
    ConfigError, ConfigurationProvider, DataFetcher, PropertyProvider, PropertyValue,
    QuerySchemaProvider, SchemaObject, SchemaObjectBinding, SchemaProviderDiscovery,
    StaticProperty,
};

use crate::context::QueryContext;
use crate::properties::PropertyTable;

/// Builder for a [`QueryContext`].
///
/// Registration order matters twice: schema providers are resolved in the
/// order they were registered, with later bindings replacing earlier ones for
/// the same type, and explicit fetcher registrations override provider
/// bindings regardless of order. Property and alias registrations under an
/// already used key replace the previous entry.
#[derive(Default)]
pub struct QueryContextBuilder {
    property_providers: IndexMap<String, Arc<dyn PropertyProvider>>,
    schema_providers: Vec<Arc<dyn QuerySchemaProvider>>,
    explicit_bindings: IndexMap<String, SchemaObjectBinding>,
    aliases: IndexMap<String, String>,
}

impl QueryContextBuilder {
    /// Start an empty builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a fixed property value under `key`.
    pub fn set_property<T: Send + Sync + 'static>(self, key: impl Into<String>, value: T) -> Self {
        self.set_property_provider(key, Arc::new(StaticProperty::new(value)))
    }

    /// Register an already erased property value under `key`.
    ///
    /// This is the re-registration path for values obtained from
    /// [`QueryContextBuilder::static_properties`]: passing such a value to
    /// [`QueryContextBuilder::set_property`] would erase it a second time,
    /// and typed lookups would no longer see through the outer wrapper.
    pub fn set_property_value(self, key: impl Into<String>, value: PropertyValue) -> Self {
        self.set_property_provider(key, Arc::new(StaticProperty::from_value(value)))
    }

    /// Register a property provider under `key`, replacing any previous
    /// registration.
    pub fn set_property_provider(
        mut self,
        key: impl Into<String>,
        provider: Arc<dyn PropertyProvider>,
    ) -> Self {
        let key = key.into();
        if self.property_providers.insert(key.clone(), provider).is_some() {
            debug!(property = %key, "replaced property provider");
        }
        self
    }

    /// Register `fetcher` for its item's canonical type name.
    ///
    /// Explicit registrations take precedence over bindings contributed by
    /// schema providers. Registering twice for the same type keeps the later
    /// fetcher.
    pub fn register_schema_object<F: DataFetcher>(mut self, fetcher: F) -> Self {
        let binding = SchemaObjectBinding::new(fetcher);
        let name = binding.canonical_name();
        if self
            .explicit_bindings
            .insert(name.to_string(), binding)
            .is_some()
        {
            debug!(type_name = name, "replaced explicit schema object registration");
        }
        self
    }

    /// Register `alias` as an alternate query name for the item type `T`.
    pub fn register_schema_object_alias<T: SchemaObject>(self, alias: impl Into<String>) -> Self {
        self.register_alias(alias, T::CANONICAL_NAME)
    }

    /// Register `alias` as an alternate query name for `type_name`.
    ///
    /// The target does not need to be registered yet; it must exist by the
    /// time [`QueryContextBuilder::build`] runs.
    pub fn register_alias(
        mut self,
        alias: impl Into<String>,
        type_name: impl Into<String>,
    ) -> Self {
        let alias = alias.into();
        if self
            .aliases
            .insert(alias.clone(), type_name.into())
            .is_some()
        {
            debug!(alias = %alias, "replaced schema object alias");
        }
        self
    }

    /// Register one schema provider.
    pub fn register_schema_provider(mut self, provider: Arc<dyn QuerySchemaProvider>) -> Self {
        self.schema_providers.push(provider);
        self
    }

    /// Register every provider a discovery yields, in discovery order.
    pub fn load_schema_providers(mut self, discovery: &dyn SchemaProviderDiscovery) -> Self {
        for provider in discovery.providers() {
            debug!(provider = provider.name(), "discovered schema provider");
            self.schema_providers.push(provider);
        }
        self
    }

    /// Snapshot of the fixed property values registered so far.
    ///
    /// Computed providers are omitted: only values that exist without a fetch
    /// context appear here.
    pub fn static_properties(&self) -> IndexMap<String, PropertyValue> {
        self.property_providers
            .iter()
            .filter_map(|(key, provider)| {
                provider
                    .static_value()
                    .map(|value| (key.clone(), value))
            })
            .collect()
    }

    /// Resolve all registrations into an immutable [`QueryContext`].
    ///
    /// Schema providers run first, in registration order; explicit fetcher
    /// registrations are applied on top; aliases are then checked against the
    /// final table. Any failure aborts the build with nothing constructed.
    pub fn build(self) -> Result<QueryContext, ConfigError> {
        let mut bindings: IndexMap<String, SchemaObjectBinding> = IndexMap::new();
        for provider in &self.schema_providers {
            let resolved = provider.resolve_schema_objects(&self)?;
            debug!(
                provider = provider.name(),
                bindings = resolved.len(),
                "resolved schema provider"
            );
            for binding in resolved {
                let name = binding.canonical_name();
                if bindings.insert(name.to_string(), binding).is_some() {
                    debug!(
                        provider = provider.name(),
                        type_name = name,
                        "later schema provider replaced binding"
                    );
                }
            }
        }
        for (name, binding) in self.explicit_bindings {
            if bindings.insert(name.clone(), binding).is_some() {
                debug!(type_name = %name, "explicit registration overrides provider binding");
            }
        }
        for (alias, type_name) in &self.aliases {
            if !bindings.contains_key(type_name) {
                return Err(ConfigError::unresolved_alias(alias, type_name));
            }
        }
        Ok(QueryContext::new(
            bindings,
            self.aliases,
            PropertyTable::new(self.property_providers),
        ))
    }
}

impl ConfigurationProvider for QueryContextBuilder {
    fn find_property_provider(&self, key: &str) -> Option<Arc<dyn PropertyProvider>> {
        self.property_providers.get(key).cloned()
    }
}
