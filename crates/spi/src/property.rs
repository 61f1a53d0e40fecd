//! Property providers and typed property keys.
//!
//! Configuration flows through the runtime as type-erased [`PropertyValue`]s
//! produced by [`PropertyProvider`]s. Connectors declare the keys they consume
//! as [`ConfigProperty`] constants, which recover the typed value at the point
//! of use and turn shape mismatches into descriptive errors.

use std::any::Any;
use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;

use crate::context::DataFetchContext;
use crate::error::ConfigError;

/// Type-erased configuration value shared between the runtime and fetchers.
pub type PropertyValue = Arc<dyn Any + Send + Sync>;

/// Source of a single configuration value.
///
/// Providers registered under the same key replace each other; the last
/// registration wins. A provider may return a fixed value or compute one from
/// the fetch context on every resolution.
pub trait PropertyProvider: Send + Sync + fmt::Debug {
    /// Produce the value for this provider's key.
    fn provide(&self, ctx: &dyn DataFetchContext) -> Result<PropertyValue, ConfigError>;

    /// Fixed value backing this provider, when it has one.
    ///
    /// Computed providers return `None` so that configuration snapshots only
    /// carry values that are stable without a fetch context.
    fn static_value(&self) -> Option<PropertyValue> {
        None
    }
}

/// Provider wrapping a fixed value.
pub struct StaticProperty {
    value: PropertyValue,
}

impl StaticProperty {
    /// Wrap `value` as a static provider.
    pub fn new<T: Send + Sync + 'static>(value: T) -> Self {
        Self {
            value: Arc::new(value),
        }
    }

    /// Wrap an already erased value.
    pub fn from_value(value: PropertyValue) -> Self {
        Self { value }
    }
}

impl PropertyProvider for StaticProperty {
    fn provide(&self, _ctx: &dyn DataFetchContext) -> Result<PropertyValue, ConfigError> {
        Ok(Arc::clone(&self.value))
    }

    fn static_value(&self) -> Option<PropertyValue> {
        Some(Arc::clone(&self.value))
    }
}

impl fmt::Debug for StaticProperty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StaticProperty").finish_non_exhaustive()
    }
}

/// Provider computing its value from the fetch context on every resolution.
///
/// Results are not memoized. A computed provider may itself resolve other
/// properties through the context; re-entering a key that is already being
/// resolved is reported as [`ConfigError::ProviderCycle`].
pub struct ComputedProperty {
    compute: Box<dyn Fn(&dyn DataFetchContext) -> Result<PropertyValue, ConfigError> + Send + Sync>,
}

impl ComputedProperty {
    /// Wrap a closure producing an erased value.
    pub fn new<F>(compute: F) -> Self
    where
        F: Fn(&dyn DataFetchContext) -> Result<PropertyValue, ConfigError> + Send + Sync + 'static,
    {
        Self {
            compute: Box::new(compute),
        }
    }

    /// Wrap a closure producing a typed value.
    pub fn of<T, F>(compute: F) -> Self
    where
        T: Send + Sync + 'static,
        F: Fn(&dyn DataFetchContext) -> Result<T, ConfigError> + Send + Sync + 'static,
    {
        Self::new(move |ctx| compute(ctx).map(|value| Arc::new(value) as PropertyValue))
    }
}

impl PropertyProvider for ComputedProperty {
    fn provide(&self, ctx: &dyn DataFetchContext) -> Result<PropertyValue, ConfigError> {
        (self.compute)(ctx)
    }
}

impl fmt::Debug for ComputedProperty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ComputedProperty").finish_non_exhaustive()
    }
}

/// Typed handle for a well-known configuration key.
///
/// Connectors export these as constants so embedders and fetchers agree on
/// both the key string and the value type:
///
/// ```
/// use cumulo_spi::ConfigProperty;
///
/// pub const REGION: ConfigProperty<String> = ConfigProperty::new("aws.region");
/// ```
pub struct ConfigProperty<T> {
    key: &'static str,
    _marker: PhantomData<fn() -> T>,
}

impl<T> ConfigProperty<T> {
    /// Declare a property key.
    pub const fn new(key: &'static str) -> Self {
        Self {
            key,
            _marker: PhantomData,
        }
    }

    /// Key string this handle resolves.
    pub const fn key(&self) -> &'static str {
        self.key
    }
}

impl<T: Clone + Send + Sync + 'static> ConfigProperty<T> {
    /// Resolve the value for this key, tolerating absence.
    ///
    /// Returns `Ok(None)` when no provider is registered for the key. A
    /// registered value of the wrong type is an error, not absence.
    pub fn find(&self, ctx: &dyn DataFetchContext) -> Result<Option<T>, ConfigError> {
        let Some(value) = ctx.find_property(self.key)? else {
            return Ok(None);
        };
        match value.downcast_ref::<T>() {
            Some(typed) => Ok(Some(typed.clone())),
            None => Err(ConfigError::type_mismatch(
                self.key,
                std::any::type_name::<T>(),
            )),
        }
    }

    /// Resolve the value for this key as a non-empty list.
    ///
    /// A single `T` is treated as a one-element list, so embedders may set
    /// either one value or a `Vec` of them. Absence and an empty list are both
    /// errors: callers of this method require at least one value.
    pub fn get_all(&self, ctx: &dyn DataFetchContext) -> Result<Vec<T>, ConfigError> {
        let Some(value) = ctx.find_property(self.key)? else {
            return Err(ConfigError::missing_property(self.key));
        };
        if let Some(list) = value.downcast_ref::<Vec<T>>() {
            if list.is_empty() {
                return Err(ConfigError::missing_property(self.key));
            }
            return Ok(list.clone());
        }
        if let Some(single) = value.downcast_ref::<T>() {
            return Ok(vec![single.clone()]);
        }
        Err(ConfigError::type_mismatch(
            self.key,
            std::any::type_name::<Vec<T>>(),
        ))
    }
}

impl<T> Clone for ConfigProperty<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for ConfigProperty<T> {}

impl<T> fmt::Debug for ConfigProperty<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("ConfigProperty").field(&self.key).finish()
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    /// Map-backed context with no provider indirection.
    #[derive(Default)]
    struct MapContext {
        values: HashMap<String, PropertyValue>,
    }

    impl MapContext {
        fn with<T: Send + Sync + 'static>(mut self, key: &str, value: T) -> Self {
            self.values.insert(key.to_string(), Arc::new(value));
            self
        }
    }

    impl DataFetchContext for MapContext {
        fn find_property(&self, key: &str) -> Result<Option<PropertyValue>, ConfigError> {
            Ok(self.values.get(key).map(Arc::clone))
        }
    }

    const REGION: ConfigProperty<String> = ConfigProperty::new("test.region");
    const LIMIT: ConfigProperty<u32> = ConfigProperty::new("test.limit");

    #[test]
    fn find_returns_none_for_unregistered_key() {
        let ctx = MapContext::default();
        assert_eq!(REGION.find(&ctx).expect("find"), None);
    }

    #[test]
    fn find_returns_typed_value() {
        let ctx = MapContext::default().with("test.region", "eu-west-1".to_string());
        assert_eq!(
            REGION.find(&ctx).expect("find"),
            Some("eu-west-1".to_string())
        );
    }

    #[test]
    fn find_rejects_wrong_type() {
        let ctx = MapContext::default().with("test.region", 42u32);
        let err = REGION.find(&ctx).expect_err("type mismatch");
        assert!(matches!(err, ConfigError::TypeMismatch { .. }));
    }

    #[test]
    fn get_all_errors_when_absent() {
        let ctx = MapContext::default();
        let err = LIMIT.get_all(&ctx).expect_err("missing");
        assert!(matches!(err, ConfigError::MissingProperty { .. }));
    }

    #[test]
    fn get_all_errors_on_empty_list() {
        let ctx = MapContext::default().with("test.limit", Vec::<u32>::new());
        let err = LIMIT.get_all(&ctx).expect_err("empty");
        assert!(matches!(err, ConfigError::MissingProperty { .. }));
    }

    #[test]
    fn get_all_accepts_singleton_value() {
        let ctx = MapContext::default().with("test.limit", 7u32);
        assert_eq!(LIMIT.get_all(&ctx).expect("get_all"), vec![7]);
    }

    #[test]
    fn get_all_returns_list_in_order() {
        let ctx = MapContext::default().with("test.limit", vec![1u32, 2, 3]);
        assert_eq!(LIMIT.get_all(&ctx).expect("get_all"), vec![1, 2, 3]);
    }

    #[test]
    fn static_provider_exposes_its_value() {
        let provider = StaticProperty::new("fixed".to_string());
        let value = provider.static_value().expect("static value");
        assert_eq!(value.downcast_ref::<String>().map(String::as_str), Some("fixed"));
    }

    #[test]
    fn computed_provider_has_no_static_value() {
        let provider = ComputedProperty::of(|_ctx| Ok(1u32));
        assert!(provider.static_value().is_none());
    }
}
