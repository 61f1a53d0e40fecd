//! Frozen property tables and per-fetch resolution contexts.

use std::sync::{Arc, Mutex};

use indexmap::IndexMap;
use tracing::warn;

use cumulo_spi::{ConfigError, DataFetchContext, PropertyProvider, PropertyValue};

/// Immutable key to provider table owned by a built context.
#[derive(Clone, Default)]
pub(crate) struct PropertyTable {
    providers: Arc<IndexMap<String, Arc<dyn PropertyProvider>>>,
}

impl PropertyTable {
    pub(crate) fn new(providers: IndexMap<String, Arc<dyn PropertyProvider>>) -> Self {
        Self {
            providers: Arc::new(providers),
        }
    }

    pub(crate) fn provider(&self, key: &str) -> Option<&Arc<dyn PropertyProvider>> {
        self.providers.get(key)
    }

    pub(crate) fn len(&self) -> usize {
        self.providers.len()
    }
}

/// Property view scoped to one fetch invocation.
///
/// Each call into a fetcher receives a fresh context, so computed providers
/// run per fetch and re-entrancy tracking never leaks between invocations.
pub struct FetchContext<'a> {
    table: &'a PropertyTable,
    resolving: Mutex<Vec<String>>,
}

impl<'a> FetchContext<'a> {
    pub(crate) fn new(table: &'a PropertyTable) -> Self {
        Self {
            table,
            resolving: Mutex::new(Vec::new()),
        }
    }
}

impl DataFetchContext for FetchContext<'_> {
    fn find_property(&self, key: &str) -> Result<Option<PropertyValue>, ConfigError> {
        let Some(provider) = self.table.provider(key) else {
            return Ok(None);
        };
        {
            let mut resolving = self.resolving.lock().expect("resolving lock");
            if resolving.iter().any(|in_flight| in_flight == key) {
                let mut chain = resolving.clone();
                chain.push(key.to_string());
                warn!(property = %key, "property provider cycle");
                return Err(ConfigError::provider_cycle(key, &chain));
            }
            resolving.push(key.to_string());
        }
        let result = provider.provide(self);
        self.resolving.lock().expect("resolving lock").pop();
        result.map(Some)
    }
}
