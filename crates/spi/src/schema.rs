//! Schema providers and provider discovery.

use std::sync::Arc;

use crate::context::ConfigurationProvider;
use crate::error::ConfigError;
use crate::fetcher::SchemaObjectBinding;

/// A connector's contribution of schema object types.
///
/// One provider covers one provider service or module and returns a binding
/// per type it supports. Resolution runs once, at context build time, with a
/// view of the configuration accumulated in the builder so far.
pub trait QuerySchemaProvider: Send + Sync {
    /// Short connector name used in build logs.
    fn name(&self) -> &'static str;

    /// Resolve the bindings this provider contributes.
    ///
    /// Implementations may consult `config` to select between fetcher
    /// variants, and should fail fast when configuration they depend on is
    /// structurally invalid.
    fn resolve_schema_objects(
        &self,
        config: &dyn ConfigurationProvider,
    ) -> Result<Vec<SchemaObjectBinding>, ConfigError>;
}

/// Source of schema providers for bulk registration.
///
/// Embedders wire connectors through a discovery so the set of registered
/// providers is declared in one place instead of call-by-call.
pub trait SchemaProviderDiscovery: Send + Sync {
    /// Providers to register, in registration order.
    fn providers(&self) -> Vec<Arc<dyn QuerySchemaProvider>>;
}

/// Fixed, deterministic discovery over an explicit provider list.
#[derive(Default)]
pub struct StaticDiscovery {
    providers: Vec<Arc<dyn QuerySchemaProvider>>,
}

impl StaticDiscovery {
    /// Discovery returning exactly `providers`, in order.
    pub fn new(providers: Vec<Arc<dyn QuerySchemaProvider>>) -> Self {
        Self { providers }
    }

    /// Append one provider.
    pub fn push(&mut self, provider: Arc<dyn QuerySchemaProvider>) {
        self.providers.push(provider);
    }
}

impl SchemaProviderDiscovery for StaticDiscovery {
    fn providers(&self) -> Vec<Arc<dyn QuerySchemaProvider>> {
        self.providers.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct NamedProvider(&'static str);

    impl QuerySchemaProvider for NamedProvider {
        fn name(&self) -> &'static str {
            self.0
        }

        fn resolve_schema_objects(
            &self,
            _config: &dyn ConfigurationProvider,
        ) -> Result<Vec<SchemaObjectBinding>, ConfigError> {
            Ok(Vec::new())
        }
    }

    #[test]
    fn static_discovery_preserves_registration_order() {
        let mut discovery = StaticDiscovery::default();
        discovery.push(Arc::new(NamedProvider("first")));
        discovery.push(Arc::new(NamedProvider("second")));
        let names: Vec<&str> = discovery.providers().iter().map(|p| p.name()).collect();
        assert_eq!(names, vec!["first", "second"]);
    }
}
