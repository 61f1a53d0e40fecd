//! Multi-account fetch behavior with a stub client factory: merge order,
//! client lifetimes, and failure handling.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use std::sync::atomic::{AtomicI32, AtomicU32, Ordering};

use chrono::{TimeZone, Utc};
use serde_json::json;

use cumulo_connector_aws::client::{AwsClientFactory, ElbApi, IamApi, ScopedClient};
use cumulo_connector_aws::config::{Account, Credentials};
use cumulo_connector_aws::elb::model::{LoadBalancer, TargetGroup};
use cumulo_connector_aws::error::ClientError;
use cumulo_connector_aws::iam::model::{AccountSummary, MfaDevice, PasswordPolicy, User};
use cumulo_connector_aws::transport::HttpTransport;
use cumulo_core::{QueryContext, QueryContextBuilder, QueryError};

/// Open and release accounting shared between a factory and its test.
#[derive(Default)]
struct FactoryStats {
    opened: AtomicU32,
    live: AtomicI32,
    max_live: AtomicI32,
}

impl FactoryStats {
    fn note_open(&self) {
        self.opened.fetch_add(1, Ordering::SeqCst);
        let live = self.live.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_live.fetch_max(live, Ordering::SeqCst);
    }

    fn note_release(&self) {
        self.live.fetch_sub(1, Ordering::SeqCst);
    }
}

/// Canned per-account responses.
#[derive(Default)]
struct StubData {
    users: HashMap<String, Vec<User>>,
    failing_accounts: HashSet<String>,
    policies: HashMap<String, PasswordPolicy>,
    load_balancers: HashMap<String, Vec<LoadBalancer>>,
}

struct StubFactory {
    stats: Arc<FactoryStats>,
    data: Arc<StubData>,
}

impl StubFactory {
    fn new(data: StubData) -> (Arc<dyn AwsClientFactory>, Arc<FactoryStats>) {
        let stats = Arc::new(FactoryStats::default());
        let factory = Arc::new(Self {
            stats: Arc::clone(&stats),
            data: Arc::new(data),
        });
        (factory, stats)
    }
}

impl AwsClientFactory for StubFactory {
    fn open_iam(
        &self,
        account: &Account,
        _transport: Option<&HttpTransport>,
    ) -> Result<ScopedClient<dyn IamApi>, ClientError> {
        self.stats.note_open();
        let stats = Arc::clone(&self.stats);
        let client = StubIam {
            account: account.id.clone(),
            data: Arc::clone(&self.data),
        };
        Ok(ScopedClient::with_release(Box::new(client), move || {
            stats.note_release();
        }))
    }

    fn open_elb(
        &self,
        account: &Account,
        _transport: Option<&HttpTransport>,
    ) -> Result<ScopedClient<dyn ElbApi>, ClientError> {
        self.stats.note_open();
        let stats = Arc::clone(&self.stats);
        let client = StubElb {
            account: account.id.clone(),
            data: Arc::clone(&self.data),
        };
        Ok(ScopedClient::with_release(Box::new(client), move || {
            stats.note_release();
        }))
    }
}

struct StubIam {
    account: String,
    data: Arc<StubData>,
}

impl IamApi for StubIam {
    fn list_users(&self) -> Result<Vec<User>, ClientError> {
        if self.data.failing_accounts.contains(&self.account) {
            return Err(ClientError::api(
                "iam",
                &self.account,
                anyhow::anyhow!("injected outage"),
            ));
        }
        Ok(self.data.users.get(&self.account).cloned().unwrap_or_default())
    }

    fn list_mfa_devices(&self) -> Result<Vec<MfaDevice>, ClientError> {
        Ok(Vec::new())
    }

    fn account_password_policy(&self) -> Result<Option<PasswordPolicy>, ClientError> {
        Ok(self.data.policies.get(&self.account).cloned())
    }

    fn account_summary(&self) -> Result<AccountSummary, ClientError> {
        let users = self.data.users.get(&self.account).map_or(0, Vec::len);
        Ok(AccountSummary {
            summary_map: [("Users".to_string(), users as i64)].into_iter().collect(),
        })
    }
}

struct StubElb {
    account: String,
    data: Arc<StubData>,
}

impl ElbApi for StubElb {
    fn describe_load_balancers(&self) -> Result<Vec<LoadBalancer>, ClientError> {
        Ok(self
            .data
            .load_balancers
            .get(&self.account)
            .cloned()
            .unwrap_or_default())
    }

    fn describe_target_groups(&self) -> Result<Vec<TargetGroup>, ClientError> {
        Ok(Vec::new())
    }
}

fn account(id: &str) -> Account {
    Account::new(id, "eu-west-1", Credentials::new(format!("AKIA{id}"), "secret"))
}

fn user(name: &str) -> User {
    User {
        path: "/".to_string(),
        user_name: name.to_string(),
        user_id: format!("AIDA{name}"),
        arn: format!("arn:aws:iam::123456789012:user/{name}"),
        create_date: Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap(),
        password_last_used: None,
    }
}

fn load_balancer(name: &str) -> LoadBalancer {
    LoadBalancer {
        load_balancer_arn: format!("arn:aws:elasticloadbalancing:eu-west-1:123456789012:loadbalancer/app/{name}/1"),
        load_balancer_name: name.to_string(),
        dns_name: format!("{name}.eu-west-1.elb.amazonaws.com"),
        canonical_hosted_zone_id: None,
        created_time: Utc.with_ymd_and_hms(2024, 5, 20, 8, 30, 0).unwrap(),
        scheme: Some("internet-facing".to_string()),
        vpc_id: None,
        state: None,
        kind: Some("application".to_string()),
        availability_zones: Vec::new(),
        security_groups: Vec::new(),
        ip_address_type: None,
    }
}

fn context_with(
    accounts: Vec<Account>,
    factory: Arc<dyn AwsClientFactory>,
) -> QueryContext {
    let mut builder = QueryContextBuilder::new()
        .set_property("aws.account", accounts)
        .set_property("aws.client-factory", factory);
    for provider in cumulo_connector_aws::schema_providers() {
        builder = builder.register_schema_provider(provider);
    }
    builder.build().expect("build")
}

#[test]
fn merges_records_across_accounts_in_account_order() {
    let mut data = StubData::default();
    data.users.insert("one".to_string(), vec![user("alice")]);
    data.users
        .insert("two".to_string(), vec![user("bob"), user("carol")]);
    let (factory, _stats) = StubFactory::new(data);
    let context = context_with(vec![account("one"), account("two")], factory);

    let rows = context.fetch_rows("aws.iam.user").expect("rows");
    let names: Vec<&str> = rows
        .iter()
        .map(|row| row.get("UserName").and_then(serde_json::Value::as_str).expect("name"))
        .collect();
    assert_eq!(names, vec!["alice", "bob", "carol"]);
}

#[test]
fn opens_one_client_per_account_and_releases_each() {
    let mut data = StubData::default();
    data.users.insert("one".to_string(), vec![user("alice")]);
    data.users.insert("two".to_string(), vec![user("bob")]);
    let (factory, stats) = StubFactory::new(data);
    let context = context_with(vec![account("one"), account("two")], factory);

    context.fetch_rows("aws.iam.user").expect("rows");
    assert_eq!(stats.opened.load(Ordering::SeqCst), 2);
    assert_eq!(stats.live.load(Ordering::SeqCst), 0);
    // Clients never overlap: each account's client closes before the next opens.
    assert_eq!(stats.max_live.load(Ordering::SeqCst), 1);
}

#[test]
fn mid_iteration_failure_aborts_and_releases_every_client() {
    let mut data = StubData::default();
    data.users.insert("one".to_string(), vec![user("alice")]);
    data.failing_accounts.insert("two".to_string());
    data.users.insert("three".to_string(), vec![user("dave")]);
    let (factory, stats) = StubFactory::new(data);
    let context = context_with(
        vec![account("one"), account("two"), account("three")],
        factory,
    );

    let err = context.fetch_rows("aws.iam.user").expect_err("outage");
    match err {
        QueryError::Fetch(fetch) => {
            assert_eq!(fetch.type_name(), "aws.iam.user");
            assert!(fetch.to_string().contains("injected outage"));
            // The failing account stays attributable through the wrapping.
            assert!(fetch.to_string().contains("account `two`"));
        }
        other => panic!("unexpected error: {other}"),
    }
    // The third account was never reached and nothing stayed open.
    assert_eq!(stats.opened.load(Ordering::SeqCst), 2);
    assert_eq!(stats.live.load(Ordering::SeqCst), 0);
}

#[test]
fn missing_account_configuration_fails_the_fetch() {
    let (factory, stats) = StubFactory::new(StubData::default());
    let mut builder = QueryContextBuilder::new().set_property("aws.client-factory", factory);
    for provider in cumulo_connector_aws::schema_providers() {
        builder = builder.register_schema_provider(provider);
    }
    let context = builder.build().expect("build");

    let err = context.fetch_rows("aws.iam.user").expect_err("no accounts");
    match err {
        QueryError::Fetch(fetch) => assert!(fetch.to_string().contains("aws.account")),
        other => panic!("unexpected error: {other}"),
    }
    assert_eq!(stats.opened.load(Ordering::SeqCst), 0);
}

#[test]
fn empty_account_list_fails_the_fetch() {
    let (factory, _stats) = StubFactory::new(StubData::default());
    let context = context_with(Vec::new(), factory);
    let err = context.fetch_rows("aws.iam.user").expect_err("empty accounts");
    assert!(matches!(err, QueryError::Fetch(_)));
}

#[test]
fn single_account_value_acts_as_one_element_list() {
    let mut data = StubData::default();
    data.users.insert("solo".to_string(), vec![user("alice")]);
    let (factory, _stats) = StubFactory::new(data);
    let mut builder = QueryContextBuilder::new()
        .set_property("aws.account", account("solo"))
        .set_property("aws.client-factory", factory);
    for provider in cumulo_connector_aws::schema_providers() {
        builder = builder.register_schema_provider(provider);
    }
    let context = builder.build().expect("build");

    let rows = context.fetch_rows("aws.iam.user").expect("rows");
    assert_eq!(rows.len(), 1);
}

#[test]
fn accounts_without_password_policy_contribute_no_record() {
    let mut data = StubData::default();
    data.policies.insert(
        "two".to_string(),
        PasswordPolicy {
            minimum_password_length: Some(14),
            ..PasswordPolicy::default()
        },
    );
    let (factory, _stats) = StubFactory::new(data);
    let context = context_with(vec![account("one"), account("two")], factory);

    let rows = context.fetch_rows("aws.iam.password-policy").expect("rows");
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].get("MinimumPasswordLength"), Some(&json!(14)));
}

#[test]
fn account_summary_yields_one_record_per_account() {
    let mut data = StubData::default();
    data.users.insert("one".to_string(), vec![user("alice")]);
    data.users
        .insert("two".to_string(), vec![user("bob"), user("carol")]);
    let (factory, _stats) = StubFactory::new(data);
    let context = context_with(vec![account("one"), account("two")], factory);

    let rows = context.fetch_rows("aws.iam.account-summary").expect("rows");
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].pointer("/SummaryMap/Users"), Some(&json!(1)));
    assert_eq!(rows[1].pointer("/SummaryMap/Users"), Some(&json!(2)));
}

#[test]
fn typed_fetch_returns_domain_items() {
    let mut data = StubData::default();
    data.users.insert("one".to_string(), vec![user("alice")]);
    let (factory, _stats) = StubFactory::new(data);
    let context = context_with(vec![account("one")], factory);

    let users: Vec<User> = context.fetch().expect("typed users");
    assert_eq!(users.len(), 1);
    assert_eq!(users[0].user_name, "alice");
}

#[test]
fn load_balancers_query_by_alias_and_canonical_name() {
    let mut data = StubData::default();
    data.load_balancers.insert(
        "one".to_string(),
        vec![load_balancer("web"), load_balancer("api")],
    );
    data.load_balancers
        .insert("two".to_string(), vec![load_balancer("jobs")]);
    let (factory, _stats) = StubFactory::new(data);
    let mut builder = QueryContextBuilder::new()
        .set_property("aws.account", vec![account("one"), account("two")])
        .set_property("aws.client-factory", factory)
        .set_property("aws.region", "eu-west-1".to_string())
        .register_schema_object_alias::<LoadBalancer>("LoadBalancer");
    for provider in cumulo_connector_aws::schema_providers() {
        builder = builder.register_schema_provider(provider);
    }
    let context = builder.build().expect("build");

    let by_alias = context.fetch_rows("LoadBalancer").expect("alias rows");
    let by_name = context.fetch_rows("aws.elb.load-balancer").expect("rows");
    assert_eq!(by_alias.len(), 3);
    assert_eq!(by_alias, by_name);
    let names: Vec<&str> = by_alias
        .iter()
        .map(|row| {
            row.get("LoadBalancerName")
                .and_then(serde_json::Value::as_str)
                .expect("name")
        })
        .collect();
    assert_eq!(names, vec!["web", "api", "jobs"]);
}

#[test]
fn schema_providers_cover_both_services() {
    let (factory, _stats) = StubFactory::new(StubData::default());
    let context = context_with(vec![account("one")], factory);
    let names: Vec<&str> = context.schema_object_names().collect();
    assert_eq!(
        names,
        vec![
            "aws.iam.user",
            "aws.iam.mfa-device",
            "aws.iam.password-policy",
            "aws.iam.account-summary",
            "aws.elb.load-balancer",
            "aws.elb.target-group",
        ]
    );
}
