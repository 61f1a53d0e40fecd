//! Query context construction and execution for Cumulo connectors.
//!
//! The runtime follows a build-then-query split. A [`QueryContextBuilder`]
//! accumulates property providers, schema providers, fetcher registrations,
//! and aliases; [`QueryContextBuilder::build`] resolves everything into an
//! immutable [`QueryContext`] that answers queries by canonical type name or
//! alias.
//!
//! ```no_run
//! use cumulo_core::QueryContextBuilder;
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let context = QueryContextBuilder::new()
//!     .set_property("aws.region", "eu-central-1".to_string())
//!     .build()?;
//! let rows = context.fetch_rows("aws.iam.user")?;
//! # Ok(()) }
//! ```

pub mod builder;
pub mod context;
pub mod error;
pub mod properties;

pub use builder::QueryContextBuilder;
pub use context::QueryContext;
pub use error::QueryError;
pub use properties::FetchContext;

pub use cumulo_spi as spi;
