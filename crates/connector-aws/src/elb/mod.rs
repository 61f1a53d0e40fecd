//! Elastic Load Balancing connector: load balancers and target groups.

pub mod fetcher;
pub mod model;

use cumulo_spi::{ConfigError, ConfigurationProvider, QuerySchemaProvider, SchemaObjectBinding};

pub use fetcher::{LoadBalancerFetcher, TargetGroupFetcher};
pub use model::{AvailabilityZone, LoadBalancer, LoadBalancerState, TargetGroup};

/// Contributes the Elastic Load Balancing schema object types.
#[derive(Debug, Default)]
pub struct AwsElbSchemaProvider;

impl QuerySchemaProvider for AwsElbSchemaProvider {
    fn name(&self) -> &'static str {
        "aws-elb"
    }

    fn resolve_schema_objects(
        &self,
        _config: &dyn ConfigurationProvider,
    ) -> Result<Vec<SchemaObjectBinding>, ConfigError> {
        Ok(vec![
            SchemaObjectBinding::new(LoadBalancerFetcher),
            SchemaObjectBinding::new(TargetGroupFetcher),
        ])
    }
}
