//! Shared HTTP transport for service clients.

use std::env;
use std::time::Duration;

use reqwest::Client;
use reqwest::header::{self, HeaderMap, HeaderValue};

use crate::error::ClientError;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Preconfigured `reqwest` client shared across per-account service clients.
///
/// Connection pools live on the inner client, so registering one transport
/// under the `aws.http-transport` property lets every account reuse the same
/// pool. Cloning is cheap; reqwest clients are reference counted.
#[derive(Clone, Debug)]
pub struct HttpTransport {
    client: Client,
}

impl HttpTransport {
    /// Build a transport with the connector's defaults: JSON accept header, a
    /// 30 second request timeout, and a stable user agent.
    pub fn new() -> Result<Self, ClientError> {
        let mut default_headers = HeaderMap::new();
        default_headers.insert(header::ACCEPT, HeaderValue::from_static("application/json"));
        let client = Client::builder()
            .default_headers(default_headers)
            .timeout(REQUEST_TIMEOUT)
            .user_agent(format!("cumulo-connector-aws/0.1; {}", env::consts::OS))
            .build()
            .map_err(ClientError::transport)?;
        Ok(Self { client })
    }

    pub(crate) fn client(&self) -> &Client {
        &self.client
    }
}
