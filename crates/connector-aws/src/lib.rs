//! AWS connector for the Cumulo query runtime.
//!
//! Covers two services: IAM (users, MFA devices, password policies, account
//! summaries) and Elastic Load Balancing (load balancers, target groups).
//! Every fetcher iterates the accounts registered under `aws.account`,
//! opening a short-lived service client per account and merging the results
//! into one flat sequence.
//!
//! Embedders typically register both schema providers and the accounts to
//! fetch from:
//!
//! ```no_run
//! use cumulo_connector_aws::config::{Account, Credentials};
//! use cumulo_core::QueryContextBuilder;
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let account = Account::new(
//!     "prod",
//!     "eu-west-1",
//!     Credentials::new("AKIAEXAMPLE", "secret"),
//! );
//! let mut builder = QueryContextBuilder::new().set_property("aws.account", account);
//! for provider in cumulo_connector_aws::schema_providers() {
//!     builder = builder.register_schema_provider(provider);
//! }
//! let context = builder.build()?;
//! let users = context.fetch_rows("aws.iam.user")?;
//! # Ok(()) }
//! ```

pub mod client;
pub mod config;
pub mod elb;
pub mod error;
mod fetch;
pub mod iam;
pub mod transport;

use std::sync::Arc;

use cumulo_spi::QuerySchemaProvider;

pub use client::{AwsClientFactory, ElbApi, HttpClientFactory, IamApi, ScopedClient};
pub use config::{ACCOUNT, Account, CLIENT_FACTORY, Credentials, ENDPOINT, Endpoint, HTTP_TRANSPORT};
pub use elb::AwsElbSchemaProvider;
pub use error::ClientError;
pub use iam::AwsIamSchemaProvider;
pub use transport::HttpTransport;

/// All schema providers bundled with this connector, in registration order.
pub fn schema_providers() -> Vec<Arc<dyn QuerySchemaProvider>> {
    vec![
        Arc::new(AwsIamSchemaProvider),
        Arc::new(AwsElbSchemaProvider),
    ]
}
