//! Fetchers for the Elastic Load Balancing schema object types.

use cumulo_spi::{DataFetchContext, DataFetcher, FetchError, SchemaObject};

use crate::elb::model::{LoadBalancer, TargetGroup};
use crate::fetch::fetch_per_account;

/// Fetches every load balancer across the configured accounts.
#[derive(Debug, Default)]
pub struct LoadBalancerFetcher;

impl DataFetcher for LoadBalancerFetcher {
    type Item = LoadBalancer;

    fn fetch(&self, ctx: &dyn DataFetchContext) -> Result<Vec<LoadBalancer>, FetchError> {
        fetch_per_account(
            ctx,
            LoadBalancer::CANONICAL_NAME,
            |factory, account, transport| factory.open_elb(account, transport),
            |client| client.describe_load_balancers(),
        )
    }
}

/// Fetches every target group across the configured accounts.
#[derive(Debug, Default)]
pub struct TargetGroupFetcher;

impl DataFetcher for TargetGroupFetcher {
    type Item = TargetGroup;

    fn fetch(&self, ctx: &dyn DataFetchContext) -> Result<Vec<TargetGroup>, FetchError> {
        fetch_per_account(
            ctx,
            TargetGroup::CANONICAL_NAME,
            |factory, account, transport| factory.open_elb(account, transport),
            |client| client.describe_target_groups(),
        )
    }
}
