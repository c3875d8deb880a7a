//! Caller identity, checked once before any region is touched

use crate::aws::context::AwsContext;
use anyhow::{Context, Result, ensure};
use std::str::FromStr;
use tracing::info;

/// 12-digit AWS account number of the caller
#[derive(Debug, Clone, PartialEq, Eq, Hash, derive_more::Display, derive_more::Deref)]
pub struct AccountId(String);

impl FromStr for AccountId {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        ensure!(
            s.len() == 12 && s.bytes().all(|b| b.is_ascii_digit()),
            "Invalid AWS account ID: {s:?}"
        );
        Ok(Self(s.to_string()))
    }
}

/// Resolve the caller's account through STS GetCallerIdentity.
///
/// `aws-config` resolves credentials lazily, so this is the first call that
/// can tell an unknown profile or bad credentials apart from a working
/// session. It needs no IAM permissions.
pub async fn get_current_account_id(aws: &AwsContext) -> Result<AccountId> {
    let identity = aws
        .sts_client()
        .get_caller_identity()
        .send()
        .await
        .context("Failed to resolve caller identity - check the profile and its credentials")?;

    let account_id: AccountId = identity
        .account()
        .context("STS returned no account for the caller")?
        .parse()?;

    info!(account_id = %account_id, "Credentials resolved");
    Ok(account_id)
}
