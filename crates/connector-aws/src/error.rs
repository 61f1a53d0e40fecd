//! Connector-level failures.

use thiserror::Error;

use cumulo_spi::BoxedError;

/// Failure while opening or using a service client.
///
/// Fetchers wrap these into the SPI's `FetchError`; the variants keep the
/// service and account visible so multi-account fetch failures stay
/// attributable.
#[derive(Debug, Error)]
pub enum ClientError {
    /// The configured endpoint is not a usable base URL.
    #[error("invalid endpoint `{url}`: {reason}")]
    InvalidEndpoint {
        /// Endpoint as configured.
        url: String,
        /// What made it unusable.
        reason: String,
    },
    /// The client's blocking runtime could not be initialized.
    #[error("could not initialize client runtime: {source}")]
    Runtime {
        #[source]
        source: std::io::Error,
    },
    /// The HTTP transport could not be built.
    #[error("could not build http transport: {source}")]
    Transport {
        #[source]
        source: reqwest::Error,
    },
    /// A request failed before a response arrived.
    #[error("{service} request failed for account `{account}`: {source}")]
    Request {
        /// Service the request targeted.
        service: &'static str,
        /// Account the client was opened for.
        account: String,
        #[source]
        source: reqwest::Error,
    },
    /// The service answered with a non-success status.
    #[error("{service} returned {status} for account `{account}`")]
    Status {
        /// Service the request targeted.
        service: &'static str,
        /// Response status code.
        status: reqwest::StatusCode,
        /// Account the client was opened for.
        account: String,
    },
    /// The response body could not be decoded.
    #[error("could not decode {service} response for account `{account}`: {source}")]
    Decode {
        /// Service the request targeted.
        service: &'static str,
        /// Account the client was opened for.
        account: String,
        #[source]
        source: reqwest::Error,
    },
    /// A substituted service client failed.
    ///
    /// Factories registered under `aws.client-factory` bring their own
    /// transports, so their clients have no `reqwest`-shaped cause to
    /// report; this variant carries whatever they hit instead.
    #[error("{service} client failed for account `{account}`: {source}")]
    Api {
        /// Service the client was opened for.
        service: &'static str,
        /// Account the client was opened for.
        account: String,
        #[source]
        source: BoxedError,
    },
}

impl ClientError {
    /// Build a [`ClientError::InvalidEndpoint`] for `url`.
    pub fn invalid_endpoint(url: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidEndpoint {
            url: url.into(),
            reason: reason.into(),
        }
    }

    /// Build a [`ClientError::Api`] wrapping a client-specific failure.
    pub fn api(
        service: &'static str,
        account: impl Into<String>,
        source: impl Into<BoxedError>,
    ) -> Self {
        Self::Api {
            service,
            account: account.into(),
            source: source.into(),
        }
    }

    pub(crate) fn runtime(source: std::io::Error) -> Self {
        Self::Runtime { source }
    }

    pub(crate) fn transport(source: reqwest::Error) -> Self {
        Self::Transport { source }
    }

    pub(crate) fn request(service: &'static str, account: &str, source: reqwest::Error) -> Self {
        Self::Request {
            service,
            account: account.to_string(),
            source,
        }
    }

    pub(crate) fn status(service: &'static str, account: &str, status: reqwest::StatusCode) -> Self {
        Self::Status {
            service,
            status,
            account: account.to_string(),
        }
    }

    pub(crate) fn decode(service: &'static str, account: &str, source: reqwest::Error) -> Self {
        Self::Decode {
            service,
            account: account.to_string(),
            source,
        }
    }
}
