//! Data fetchers and the erased bindings stored in a built context.
//!
//! A connector implements [`DataFetcher`] once per schema object type. The
//! runtime stores fetchers as [`SchemaObjectBinding`]s, which erase the item
//! type twice: once into a JSON row producer for uniform querying, and once
//! into an `Any`-boxed typed handle recovered by the typed fetch path.

use std::any::Any;
use std::fmt;
use std::sync::Arc;

use serde::Serialize;
use serde_json::Value;

use crate::context::DataFetchContext;
use crate::error::FetchError;
use crate::format::DataFormat;

/// A domain record type that can be registered in a query context.
///
/// The canonical name is the stable identifier rows are queried under. Names
/// are dot-separated and globally unique per type, `"aws.iam.user"` style;
/// two types must never share one.
pub trait SchemaObject: Send + Sync + 'static {
    /// Stable, globally unique name for this type.
    const CANONICAL_NAME: &'static str;
}

/// Produces all records of one schema object type.
///
/// A fetcher owns the retrieval logic for exactly one type: resolving the
/// configuration it needs from the fetch context, calling the provider, and
/// returning the complete flat result. Fetchers hold no per-invocation state;
/// one instance serves concurrent fetches.
pub trait DataFetcher: Send + Sync + 'static {
    /// Record type this fetcher produces.
    type Item: SchemaObject + Serialize + schemars::JsonSchema;

    /// Fetch every record currently visible to the configured accounts.
    ///
    /// Failures wrap the underlying cause in a [`FetchError`] naming the
    /// item's canonical type; partial results are never returned.
    fn fetch(&self, ctx: &dyn DataFetchContext) -> Result<Vec<Self::Item>, FetchError>;

    /// Field-level description of the produced records.
    fn data_format(&self) -> DataFormat {
        DataFormat::of::<Self::Item>()
    }
}

/// Object-safe view of a fetcher producing serialized JSON rows.
pub trait RowsFetcher: Send + Sync {
    /// Fetch and serialize every record.
    fn fetch_rows(&self, ctx: &dyn DataFetchContext) -> Result<Vec<Value>, FetchError>;
}

impl<F: DataFetcher> RowsFetcher for F {
    fn fetch_rows(&self, ctx: &dyn DataFetchContext) -> Result<Vec<Value>, FetchError> {
        self.fetch(ctx)?
            .into_iter()
            .map(|item| {
                serde_json::to_value(item)
                    .map_err(|err| FetchError::new(F::Item::CANONICAL_NAME, err))
            })
            .collect()
    }
}

/// Object-safe view of a fetcher producing typed records.
///
/// This is the handle recovered by the typed fetch path after downcasting the
/// `Any`-boxed slot of a [`SchemaObjectBinding`].
pub trait ItemFetcher<T>: Send + Sync {
    /// Fetch every record as the item type.
    fn fetch_items(&self, ctx: &dyn DataFetchContext) -> Result<Vec<T>, FetchError>;
}

impl<F: DataFetcher> ItemFetcher<F::Item> for F {
    fn fetch_items(&self, ctx: &dyn DataFetchContext) -> Result<Vec<F::Item>, FetchError> {
        self.fetch(ctx)
    }
}

/// One schema object type bound to its fetcher.
///
/// Bindings are what schema providers hand to the context builder and what
/// the built context stores. The same underlying fetcher instance backs both
/// the row view and the typed view.
#[derive(Clone)]
pub struct SchemaObjectBinding {
    canonical_name: &'static str,
    rows: Arc<dyn RowsFetcher>,
    items: Arc<dyn Any + Send + Sync>,
    format: DataFormat,
}

impl SchemaObjectBinding {
    /// Bind `fetcher` under its item's canonical name.
    pub fn new<F: DataFetcher>(fetcher: F) -> Self {
        let format = fetcher.data_format();
        let fetcher = Arc::new(fetcher);
        let items: Arc<dyn ItemFetcher<F::Item>> = fetcher.clone();
        Self {
            canonical_name: F::Item::CANONICAL_NAME,
            rows: fetcher,
            items: Arc::new(items),
            format,
        }
    }

    /// Canonical name of the bound type.
    pub fn canonical_name(&self) -> &'static str {
        self.canonical_name
    }

    /// Field-level description of the bound type's rows.
    pub fn data_format(&self) -> &DataFormat {
        &self.format
    }

    /// Fetch every record of the bound type as JSON rows.
    pub fn fetch_rows(&self, ctx: &dyn DataFetchContext) -> Result<Vec<Value>, FetchError> {
        self.rows.fetch_rows(ctx)
    }

    /// Recover the typed fetcher, when `T` is the bound item type.
    pub fn typed_fetcher<T: SchemaObject>(&self) -> Option<Arc<dyn ItemFetcher<T>>> {
        self.items
            .downcast_ref::<Arc<dyn ItemFetcher<T>>>()
            .map(Arc::clone)
    }
}

impl fmt::Debug for SchemaObjectBinding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SchemaObjectBinding")
            .field("canonical_name", &self.canonical_name)
            .finish_non_exhaustive()
    }
}
