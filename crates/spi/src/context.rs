//! Context traits connecting fetchers and schema providers to configuration.

use std::sync::Arc;

use crate::error::ConfigError;
use crate::property::{PropertyProvider, PropertyValue};

/// Read-only property access handed to a fetcher for the duration of one
/// fetch invocation.
///
/// Values are resolved through the providers registered at build time. A key
/// with no registered provider resolves to `Ok(None)`; provider failures and
/// provider cycles surface as errors.
pub trait DataFetchContext {
    /// Resolve the value registered under `key`, if any.
    fn find_property(&self, key: &str) -> Result<Option<PropertyValue>, ConfigError>;
}

/// Provider-level view of the configuration accumulated so far.
///
/// Schema providers receive this during context build so that the set of
/// schema objects they contribute can depend on configuration, for example
/// binding a different fetcher when an alternate transport is configured.
pub trait ConfigurationProvider {
    /// Look up the provider registered under `key`.
    ///
    /// Unlike value resolution, an unknown key is an error here: the caller
    /// asked for the registration itself, and its absence is detectable at
    /// lookup time.
    fn property_provider(&self, key: &str) -> Result<Arc<dyn PropertyProvider>, ConfigError> {
        self.find_property_provider(key)
            .ok_or_else(|| ConfigError::unknown_property(key))
    }

    /// Look up the provider registered under `key`, returning `None` when no
    /// registration exists.
    fn find_property_provider(&self, key: &str) -> Option<Arc<dyn PropertyProvider>>;
}
