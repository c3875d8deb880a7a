//! Region enumeration

use crate::aws::Ec2Operations;
use anyhow::{Context, Result};
use tracing::info;

/// List every region the account can operate in.
///
/// Failure here is fatal for the whole run: nothing has been tagged yet and
/// there is nothing to iterate over.
pub async fn list_regions<E: Ec2Operations>(ec2: &E) -> Result<Vec<String>> {
    let regions = ec2
        .describe_regions()
        .await
        .context("Failed to list AWS regions")?;

    info!(count = regions.len(), "Found regions: {}", regions.join(","));
    Ok(regions)
}
