//! Configuration consumed by the AWS fetchers.
//!
//! Fetchers read everything they need through the well-known keys declared
//! here. Embedders set [`ACCOUNT`] (one value or a `Vec` of them) and
//! optionally override the transport, endpoint, or client factory.

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use url::Url;

use cumulo_spi::ConfigProperty;

use crate::client::AwsClientFactory;
use crate::error::ClientError;
use crate::transport::HttpTransport;

/// Accounts to fetch from. Required by every fetcher in this connector; a
/// single [`Account`] value is accepted in place of a one-element `Vec`.
pub const ACCOUNT: ConfigProperty<Account> = ConfigProperty::new("aws.account");

/// Shared HTTP transport reused by all per-account clients. Optional; each
/// client builds its own transport when unset.
pub const HTTP_TRANSPORT: ConfigProperty<HttpTransport> =
    ConfigProperty::new("aws.http-transport");

/// Service endpoint override. Optional; when unset, clients target the
/// public per-service endpoints.
pub const ENDPOINT: ConfigProperty<Endpoint> = ConfigProperty::new("aws.endpoint");

/// Replacement client factory. Optional; primarily a test seam, but also the
/// hook for embedders that bring their own service clients.
pub const CLIENT_FACTORY: ConfigProperty<Arc<dyn AwsClientFactory>> =
    ConfigProperty::new("aws.client-factory");

/// Static credentials for one account.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credentials {
    /// Access key identifier.
    pub access_key_id: String,
    /// Secret key paired with the access key.
    pub secret_access_key: String,
    /// Session token for temporary credentials.
    pub session_token: Option<String>,
}

impl Credentials {
    /// Long-lived credentials without a session token.
    pub fn new(access_key_id: impl Into<String>, secret_access_key: impl Into<String>) -> Self {
        Self {
            access_key_id: access_key_id.into(),
            secret_access_key: secret_access_key.into(),
            session_token: None,
        }
    }

    /// Temporary credentials carrying a session token.
    pub fn with_session_token(mut self, session_token: impl Into<String>) -> Self {
        self.session_token = Some(session_token.into());
        self
    }
}

// Secrets stay out of Debug output; logs carry the key id only.
impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("access_key_id", &self.access_key_id)
            .field("secret_access_key", &"<redacted>")
            .field("session_token", &self.session_token.as_deref().map(|_| "<redacted>"))
            .finish()
    }
}

/// One account the connector fetches from.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    /// Stable identifier used in logs and error messages.
    pub id: String,
    /// Region the account's regional services are queried in.
    pub region: String,
    /// Credentials the clients authenticate with.
    pub credentials: Credentials,
}

impl Account {
    pub fn new(
        id: impl Into<String>,
        region: impl Into<String>,
        credentials: Credentials,
    ) -> Self {
        Self {
            id: id.into(),
            region: region.into(),
            credentials,
        }
    }
}

/// Validated base URL all service clients are pointed at.
///
/// Hosts other than localhost must use HTTPS. The trailing slash is trimmed
/// so request paths can always be appended verbatim.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Endpoint {
    base: String,
}

/// Hostnames allowed with any scheme for local development.
const LOCALHOST_DOMAINS: &[&str] = &["localhost", "127.0.0.1"];

impl Endpoint {
    /// Parse and validate `raw` as an endpoint base URL.
    pub fn parse(raw: &str) -> Result<Self, ClientError> {
        let parsed = Url::parse(raw)
            .map_err(|err| ClientError::invalid_endpoint(raw, err.to_string()))?;
        let host = parsed
            .host_str()
            .ok_or_else(|| ClientError::invalid_endpoint(raw, "missing host"))?;
        let is_local = LOCALHOST_DOMAINS
            .iter()
            .any(|&allowed| host.eq_ignore_ascii_case(allowed));
        if !is_local && parsed.scheme() != "https" {
            return Err(ClientError::invalid_endpoint(
                raw,
                format!("non-localhost hosts must use https, got `{}://`", parsed.scheme()),
            ));
        }
        Ok(Self {
            base: raw.trim_end_matches('/').to_string(),
        })
    }

    /// Base URL without a trailing slash.
    pub fn base(&self) -> &str {
        &self.base
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.base)
    }
}
