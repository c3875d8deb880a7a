//! Tag application, dry-run aware
//!
//! Both variants share one contract: attach the tag, honor the dry-run flag,
//! report a dry-run acknowledgment as success without mutation, and return
//! any other error.

use crate::aws::{AwsError, Ec2Operations, RdsOperations};
use default_tagger_common::{ResourceTag, Service};
use tracing::info;

/// Message logged when a dry run stops a tagging call
pub const DRY_RUN_MESSAGE: &str = "Request would have succeeded, but DryRun flag is set.";

/// Result of a tagging call that did not fail
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display)]
pub enum TagOutcome {
    /// The tag was written
    #[display("tagged")]
    Tagged,
    /// Dry run: the call would have succeeded, nothing was written
    #[display("dry-run")]
    DryRun,
}

/// Tag all EC2 resources in one batched call.
///
/// The dry-run flag is passed to EC2, which checks permissions and answers
/// `DryRunOperation` instead of tagging. The batch is atomic on the provider
/// side: either every resource is tagged or none is.
pub async fn tag_ec2_resources<E: Ec2Operations>(
    ec2: &E,
    region: &str,
    resource_ids: &[String],
    tag: &ResourceTag,
    dry_run: bool,
) -> Result<TagOutcome, AwsError> {
    info!(service = %Service::Ec2, region, "Tag on {}", resource_ids.join(","));

    match ec2.create_tags(resource_ids, tag, dry_run).await {
        Ok(()) => {
            info!(service = %Service::Ec2, region, "done");
            Ok(TagOutcome::Tagged)
        }
        Err(AwsError::DryRunAcknowledged { message }) => {
            info!(service = %Service::Ec2, region, "{message}");
            Ok(TagOutcome::DryRun)
        }
        Err(e) => Err(e),
    }
}

/// Tag a single RDS resource by ARN.
///
/// RDS has no server-side dry run, so in dry-run mode no call is made at all.
pub async fn tag_rds_security_group<R: RdsOperations>(
    rds: &R,
    region: &str,
    arn: &str,
    tag: &ResourceTag,
    dry_run: bool,
) -> Result<TagOutcome, AwsError> {
    info!(service = %Service::Rds, region, "Tag on {arn}");

    if dry_run {
        info!(service = %Service::Rds, region, "{DRY_RUN_MESSAGE}");
        return Ok(TagOutcome::DryRun);
    }

    rds.add_tags_to_resource(arn, tag).await?;
    info!(service = %Service::Rds, region, "done");
    Ok(TagOutcome::Tagged)
}
