//! Transport capability injected into the poll loop.

use async_trait::async_trait;

use crate::model::CheckRunList;

/// Fetches check-run records for one check name on one ref.
///
/// Implementations own transport and authentication. The poll loop issues
/// one call per tracked name per round, strictly sequentially, and never
/// retries a failed call: any error aborts the whole invocation.
#[async_trait]
pub trait ChecksClient: Send + Sync {
    /// Lists the check runs recorded for `check_name` on `git_ref`.
    async fn list_for_ref(
        &self,
        owner: &str,
        repo: &str,
        git_ref: &str,
        check_name: &str,
    ) -> anyhow::Result<CheckRunList>;
}
