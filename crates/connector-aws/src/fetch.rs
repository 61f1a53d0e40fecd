//! Shared account-iteration plumbing for fetchers.

use tracing::debug;

use cumulo_spi::{BoxedError, DataFetchContext, FetchError};

use crate::client::{AwsClientFactory, ScopedClient, resolve_client_factory};
use crate::config::{self, Account};
use crate::error::ClientError;
use crate::transport::HttpTransport;

/// Run one service call against every configured account and merge the
/// results in account order.
///
/// A client is opened per account and released before the next account's
/// client opens, on success and on error alike. The first failure aborts the
/// fetch; partial results are never surfaced.
pub(crate) fn fetch_per_account<C, T, O, L>(
    ctx: &dyn DataFetchContext,
    type_name: &'static str,
    open: O,
    list: L,
) -> Result<Vec<T>, FetchError>
where
    C: ?Sized,
    O: Fn(
        &dyn AwsClientFactory,
        &Account,
        Option<&HttpTransport>,
    ) -> Result<ScopedClient<C>, ClientError>,
    L: Fn(&C) -> Result<Vec<T>, ClientError>,
{
    let run = || -> Result<Vec<T>, BoxedError> {
        let accounts = config::ACCOUNT.get_all(ctx)?;
        let transport = config::HTTP_TRANSPORT.find(ctx)?;
        let factory = resolve_client_factory(ctx)?;
        let mut records = Vec::new();
        for account in &accounts {
            let client = open(factory.as_ref(), account, transport.as_ref())?;
            let mut page = list(&client)?;
            debug!(type_name, account = %account.id, records = page.len(), "account fetched");
            records.append(&mut page);
            // `client` drops here, before the next account's client opens.
        }
        Ok(records)
    };
    run().map_err(|source| FetchError::new(type_name, source))
}
