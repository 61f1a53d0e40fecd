//! IAM connector: users, MFA devices, password policies, and account
//! summaries.

pub mod fetcher;
pub mod model;

use cumulo_spi::{ConfigError, ConfigurationProvider, QuerySchemaProvider, SchemaObjectBinding};

pub use fetcher::{AccountSummaryFetcher, MfaDeviceFetcher, PasswordPolicyFetcher, UserFetcher};
pub use model::{AccountSummary, MfaDevice, PasswordPolicy, User};

/// Contributes the IAM schema object types.
#[derive(Debug, Default)]
pub struct AwsIamSchemaProvider;

impl QuerySchemaProvider for AwsIamSchemaProvider {
    fn name(&self) -> &'static str {
        "aws-iam"
    }

    fn resolve_schema_objects(
        &self,
        _config: &dyn ConfigurationProvider,
    ) -> Result<Vec<SchemaObjectBinding>, ConfigError> {
        Ok(vec![
            SchemaObjectBinding::new(UserFetcher),
            SchemaObjectBinding::new(MfaDeviceFetcher),
            SchemaObjectBinding::new(PasswordPolicyFetcher),
            SchemaObjectBinding::new(AccountSummaryFetcher),
        ])
    }
}
