//! Fetchers for the IAM schema object types.

use cumulo_spi::{DataFetchContext, DataFetcher, FetchError, SchemaObject};

use crate::fetch::fetch_per_account;
use crate::iam::model::{AccountSummary, MfaDevice, PasswordPolicy, User};

/// Fetches every IAM user across the configured accounts.
#[derive(Debug, Default)]
pub struct UserFetcher;

impl DataFetcher for UserFetcher {
    type Item = User;

    fn fetch(&self, ctx: &dyn DataFetchContext) -> Result<Vec<User>, FetchError> {
        fetch_per_account(
            ctx,
            User::CANONICAL_NAME,
            |factory, account, transport| factory.open_iam(account, transport),
            |client| client.list_users(),
        )
    }
}

/// Fetches every MFA device across the configured accounts.
#[derive(Debug, Default)]
pub struct MfaDeviceFetcher;

impl DataFetcher for MfaDeviceFetcher {
    type Item = MfaDevice;

    fn fetch(&self, ctx: &dyn DataFetchContext) -> Result<Vec<MfaDevice>, FetchError> {
        fetch_per_account(
            ctx,
            MfaDevice::CANONICAL_NAME,
            |factory, account, transport| factory.open_iam(account, transport),
            |client| client.list_mfa_devices(),
        )
    }
}

/// Fetches the password policy of each configured account.
///
/// Accounts without a policy contribute no record, so the result may hold
/// fewer records than there are accounts.
#[derive(Debug, Default)]
pub struct PasswordPolicyFetcher;

impl DataFetcher for PasswordPolicyFetcher {
    type Item = PasswordPolicy;

    fn fetch(&self, ctx: &dyn DataFetchContext) -> Result<Vec<PasswordPolicy>, FetchError> {
        fetch_per_account(
            ctx,
            PasswordPolicy::CANONICAL_NAME,
            |factory, account, transport| factory.open_iam(account, transport),
            |client| {
                client
                    .account_password_policy()
                    .map(|policy| policy.into_iter().collect())
            },
        )
    }
}

/// Fetches the entity summary of each configured account, one record per
/// account.
#[derive(Debug, Default)]
pub struct AccountSummaryFetcher;

impl DataFetcher for AccountSummaryFetcher {
    type Item = AccountSummary;

    fn fetch(&self, ctx: &dyn DataFetchContext) -> Result<Vec<AccountSummary>, FetchError> {
        fetch_per_account(
            ctx,
            AccountSummary::CANONICAL_NAME,
            |factory, account, transport| factory.open_iam(account, transport),
            |client| client.account_summary().map(|summary| vec![summary]),
        )
    }
}
