//! Processing of a single region
//!
//! ```text
//! discover VPC ─┬─ found ─> aggregate ─> tag
//!               └─ none ──> skip
//! discover RDS default SG ─┬─ found ─> tag
//!                          └─ none ──> skip
//! ```
//!
//! A failure in the EC2 step is recorded and the RDS step still runs.

use super::types::{Ec2Outcome, RdsOutcome, RegionReport, RunContext};
use crate::aws::{AwsError, Ec2Operations, RdsOperations};
use crate::discovery::{
    aggregate_default_vpc_resources, resolve_default_rds_security_group, resolve_default_vpc,
};
use crate::tagging::{TagOutcome, tag_ec2_resources, tag_rds_security_group};
use default_tagger_common::Service;
use tracing::error;

/// Run both steps for one region and report their outcomes.
pub async fn process_region<E, R>(region: &str, ec2: &E, rds: &R, ctx: &RunContext) -> RegionReport
where
    E: Ec2Operations,
    R: RdsOperations,
{
    let ec2_result = tag_default_vpc(region, ec2, ctx).await;
    if let Err(e) = &ec2_result {
        error!(service = %Service::Ec2, region, "Failed to tag default VPC resources: {e}");
    }

    let rds_result = tag_default_rds_security_group(region, rds, ctx).await;
    if let Err(e) = &rds_result {
        error!(service = %Service::Rds, region, "Failed to tag default DB security group: {e}");
    }

    RegionReport {
        region: region.to_string(),
        ec2: ec2_result,
        rds: rds_result,
    }
}

async fn tag_default_vpc<E: Ec2Operations>(
    region: &str,
    ec2: &E,
    ctx: &RunContext,
) -> Result<Ec2Outcome, AwsError> {
    let Some(vpc_id) = resolve_default_vpc(ec2, region).await? else {
        return Ok(Ec2Outcome::NoDefaultVpc);
    };

    let resources = aggregate_default_vpc_resources(ec2, region, &vpc_id, &ctx.domain_names).await?;
    let count = resources.len();

    match tag_ec2_resources(ec2, region, &resources.ids(), &ctx.tag, ctx.dry_run).await? {
        TagOutcome::Tagged => Ok(Ec2Outcome::Tagged { resources: count }),
        TagOutcome::DryRun => Ok(Ec2Outcome::DryRun { resources: count }),
    }
}

async fn tag_default_rds_security_group<R: RdsOperations>(
    region: &str,
    rds: &R,
    ctx: &RunContext,
) -> Result<RdsOutcome, AwsError> {
    let Some(group) = resolve_default_rds_security_group(rds, region).await? else {
        return Ok(RdsOutcome::NoDefaultSecurityGroup);
    };

    match tag_rds_security_group(rds, region, &group.arn, &ctx.tag, ctx.dry_run).await? {
        TagOutcome::Tagged => Ok(RdsOutcome::Tagged),
        TagOutcome::DryRun => Ok(RdsOutcome::DryRun),
    }
}
