//! Per-account service clients and the factory seam fetchers go through.
//!
//! Every fetch opens a client per configured account, uses it for exactly one
//! service call, and releases it before moving to the next account. The
//! [`AwsClientFactory`] property lets embedders and tests substitute their own
//! clients; the default factory speaks JSON over HTTPS to the public service
//! endpoints or to a configured gateway endpoint.

use std::ops::Deref;
use std::sync::Arc;

use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use tokio::runtime::Runtime;
use tracing::debug;

use cumulo_spi::{ConfigError, DataFetchContext};

use crate::config::{self, Account, Endpoint};
use crate::elb::model::{LoadBalancer, TargetGroup};
use crate::error::ClientError;
use crate::iam::model::{AccountSummary, MfaDevice, PasswordPolicy, User};
use crate::transport::HttpTransport;

pub(crate) const IAM_SERVICE: &str = "iam";
pub(crate) const ELB_SERVICE: &str = "elasticloadbalancing";

/// IAM operations the connector's fetchers rely on.
pub trait IamApi: Send {
    /// All IAM users in the account.
    fn list_users(&self) -> Result<Vec<User>, ClientError>;

    /// All MFA devices in the account, across users.
    fn list_mfa_devices(&self) -> Result<Vec<MfaDevice>, ClientError>;

    /// The account password policy, or `None` when the account has none.
    fn account_password_policy(&self) -> Result<Option<PasswordPolicy>, ClientError>;

    /// Entity usage and quota summary for the account.
    fn account_summary(&self) -> Result<AccountSummary, ClientError>;
}

/// Elastic Load Balancing operations the connector's fetchers rely on.
pub trait ElbApi: Send {
    /// All load balancers in the account's region.
    fn describe_load_balancers(&self) -> Result<Vec<LoadBalancer>, ClientError>;

    /// All target groups in the account's region.
    fn describe_target_groups(&self) -> Result<Vec<TargetGroup>, ClientError>;
}

/// Owning guard for one per-account client.
///
/// The client stays usable for exactly as long as the guard lives; dropping
/// it releases the client and any release hook installed by the factory.
/// Fetchers hold one guard at a time, so client lifetime never outlasts the
/// account iteration that opened it.
pub struct ScopedClient<A: ?Sized> {
    api: Box<A>,
    on_release: Option<Box<dyn FnOnce() + Send>>,
}

impl<A: ?Sized> ScopedClient<A> {
    /// Guard without a release hook; dropping the inner client is the
    /// release.
    pub fn new(api: Box<A>) -> Self {
        Self {
            api,
            on_release: None,
        }
    }

    /// Guard invoking `on_release` when dropped.
    pub fn with_release(api: Box<A>, on_release: impl FnOnce() + Send + 'static) -> Self {
        Self {
            api,
            on_release: Some(Box::new(on_release)),
        }
    }
}

impl<A: ?Sized> Deref for ScopedClient<A> {
    type Target = A;

    fn deref(&self) -> &A {
        &*self.api
    }
}

impl<A: ?Sized> Drop for ScopedClient<A> {
    fn drop(&mut self) {
        if let Some(release) = self.on_release.take() {
            release();
        }
    }
}

/// Opens per-account service clients.
///
/// Registered under the `aws.client-factory` property. Factories must be
/// usable from concurrent fetches; each open call yields an independent
/// client.
pub trait AwsClientFactory: Send + Sync {
    /// Open an IAM client for `account`.
    fn open_iam(
        &self,
        account: &Account,
        transport: Option<&HttpTransport>,
    ) -> Result<ScopedClient<dyn IamApi>, ClientError>;

    /// Open an Elastic Load Balancing client for `account`.
    fn open_elb(
        &self,
        account: &Account,
        transport: Option<&HttpTransport>,
    ) -> Result<ScopedClient<dyn ElbApi>, ClientError>;
}

/// Resolve the factory fetchers should open clients through.
///
/// The `aws.client-factory` property wins when set; otherwise a default
/// HTTP factory is built around the optional `aws.endpoint` override.
pub fn resolve_client_factory(
    ctx: &dyn DataFetchContext,
) -> Result<Arc<dyn AwsClientFactory>, ConfigError> {
    if let Some(factory) = config::CLIENT_FACTORY.find(ctx)? {
        return Ok(factory);
    }
    let endpoint = config::ENDPOINT.find(ctx)?;
    Ok(Arc::new(HttpClientFactory::new(endpoint)))
}

/// Default factory speaking JSON over HTTP.
///
/// Without an endpoint override, clients target the public service hosts:
/// the global IAM endpoint and the regional Elastic Load Balancing endpoint
/// for the account's region.
#[derive(Clone, Debug, Default)]
pub struct HttpClientFactory {
    endpoint: Option<Endpoint>,
}

impl HttpClientFactory {
    /// Factory with an optional endpoint override.
    pub fn new(endpoint: Option<Endpoint>) -> Self {
        Self { endpoint }
    }

    /// Factory pinned to `endpoint`.
    pub fn with_endpoint(endpoint: Endpoint) -> Self {
        Self {
            endpoint: Some(endpoint),
        }
    }
}

impl AwsClientFactory for HttpClientFactory {
    fn open_iam(
        &self,
        account: &Account,
        transport: Option<&HttpTransport>,
    ) -> Result<ScopedClient<dyn IamApi>, ClientError> {
        let gateway = HttpGateway::open(
            IAM_SERVICE,
            "https://iam.amazonaws.com".to_string(),
            account,
            transport,
            self.endpoint.as_ref(),
        )?;
        Ok(ScopedClient::new(Box::new(HttpIamClient { gateway })))
    }

    fn open_elb(
        &self,
        account: &Account,
        transport: Option<&HttpTransport>,
    ) -> Result<ScopedClient<dyn ElbApi>, ClientError> {
        let gateway = HttpGateway::open(
            ELB_SERVICE,
            format!(
                "https://elasticloadbalancing.{}.amazonaws.com",
                account.region
            ),
            account,
            transport,
            self.endpoint.as_ref(),
        )?;
        Ok(ScopedClient::new(Box::new(HttpElbClient { gateway })))
    }
}

/// One service client bound to one account.
///
/// Requests run on an owned single-purpose runtime so the synchronous fetch
/// path can drive the async transport. Credentials ride along as basic auth
/// plus the session token header when one is present.
struct HttpGateway {
    service: &'static str,
    account_id: String,
    base: String,
    http: Client,
    runtime: Runtime,
    access_key_id: String,
    secret_access_key: String,
    session_token: Option<String>,
}

impl HttpGateway {
    fn open(
        service: &'static str,
        default_base: String,
        account: &Account,
        transport: Option<&HttpTransport>,
        endpoint: Option<&Endpoint>,
    ) -> Result<Self, ClientError> {
        let runtime = Runtime::new().map_err(ClientError::runtime)?;
        let http = match transport {
            Some(shared) => shared.client().clone(),
            None => HttpTransport::new()?.client().clone(),
        };
        let base = endpoint
            .map(|endpoint| endpoint.base().to_string())
            .unwrap_or(default_base);
        debug!(service, account = %account.id, base = %base, "opened service client");
        Ok(Self {
            service,
            account_id: account.id.clone(),
            base,
            http,
            runtime,
            access_key_id: account.credentials.access_key_id.clone(),
            secret_access_key: account.credentials.secret_access_key.clone(),
            session_token: account.credentials.session_token.clone(),
        })
    }

    fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, ClientError> {
        match self.get_optional(path)? {
            Some(decoded) => Ok(decoded),
            None => Err(ClientError::status(
                self.service,
                &self.account_id,
                StatusCode::NOT_FOUND,
            )),
        }
    }

    /// GET `path`, mapping 404 to `None`.
    fn get_optional<T: DeserializeOwned>(&self, path: &str) -> Result<Option<T>, ClientError> {
        let url = format!("{}{}", self.base, path);
        debug!(service = self.service, account = %self.account_id, %url, "GET");
        let mut request = self
            .http
            .get(&url)
            .basic_auth(&self.access_key_id, Some(&self.secret_access_key));
        if let Some(token) = &self.session_token {
            request = request.header("x-amz-security-token", token);
        }
        let response = self
            .runtime
            // Built inside `block_on`: reqwest's `send` constructs its timeout
            // eagerly and needs the runtime context already entered.
            .block_on(async { request.send().await })
            .map_err(|err| ClientError::request(self.service, &self.account_id, err))?;
        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !status.is_success() {
            return Err(ClientError::status(self.service, &self.account_id, status));
        }
        self.runtime
            .block_on(response.json::<T>())
            .map(Some)
            .map_err(|err| ClientError::decode(self.service, &self.account_id, err))
    }
}

impl Drop for HttpGateway {
    fn drop(&mut self) {
        debug!(service = self.service, account = %self.account_id, "released service client");
    }
}

struct HttpIamClient {
    gateway: HttpGateway,
}

impl IamApi for HttpIamClient {
    fn list_users(&self) -> Result<Vec<User>, ClientError> {
        #[derive(serde::Deserialize)]
        struct Envelope {
            #[serde(rename = "Users", default)]
            users: Vec<User>,
        }
        Ok(self.gateway.get::<Envelope>("/iam/users")?.users)
    }

    fn list_mfa_devices(&self) -> Result<Vec<MfaDevice>, ClientError> {
        #[derive(serde::Deserialize)]
        struct Envelope {
            #[serde(rename = "MFADevices", default)]
            mfa_devices: Vec<MfaDevice>,
        }
        Ok(self.gateway.get::<Envelope>("/iam/mfa-devices")?.mfa_devices)
    }

    fn account_password_policy(&self) -> Result<Option<PasswordPolicy>, ClientError> {
        #[derive(serde::Deserialize)]
        struct Envelope {
            #[serde(rename = "PasswordPolicy")]
            password_policy: PasswordPolicy,
        }
        let envelope = self
            .gateway
            .get_optional::<Envelope>("/iam/password-policy")?;
        Ok(envelope.map(|envelope| envelope.password_policy))
    }

    fn account_summary(&self) -> Result<AccountSummary, ClientError> {
        self.gateway.get::<AccountSummary>("/iam/account-summary")
    }
}

struct HttpElbClient {
    gateway: HttpGateway,
}

impl ElbApi for HttpElbClient {
    fn describe_load_balancers(&self) -> Result<Vec<LoadBalancer>, ClientError> {
        #[derive(serde::Deserialize)]
        struct Envelope {
            #[serde(rename = "LoadBalancers", default)]
            load_balancers: Vec<LoadBalancer>,
        }
        Ok(self
            .gateway
            .get::<Envelope>("/elbv2/load-balancers")?
            .load_balancers)
    }

    fn describe_target_groups(&self) -> Result<Vec<TargetGroup>, ClientError> {
        #[derive(serde::Deserialize)]
        struct Envelope {
            #[serde(rename = "TargetGroups", default)]
            target_groups: Vec<TargetGroup>,
        }
        Ok(self
            .gateway
            .get::<Envelope>("/elbv2/target-groups")?
            .target_groups)
    }
}
