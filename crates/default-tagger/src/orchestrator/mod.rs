//! Run orchestration
//!
//! Sets up the AWS session, lists regions, then processes every region
//! independently with a bounded number in flight. A failing region never
//! stops its siblings; the run waits for all of them before reporting.

mod region;
mod types;

pub use region::process_region;
pub use types::{Ec2Outcome, RdsOutcome, RegionReport, RunContext, RunReport};

use crate::aws::{
    AwsContext, Ec2Client, Ec2Operations, RdsClient, RdsOperations, get_current_account_id,
};
use crate::config::TaggerConfig;
use crate::regions::list_regions;
use anyhow::Result;
use futures::stream::{self, StreamExt};
use tracing::{info, instrument, warn};

/// Tag default resources in every region visible to the configured profile.
///
/// Setup failures (unresolvable profile, invalid credentials, region listing)
/// are returned before any region is touched. Per-region failures are
/// captured in the returned [`RunReport`].
#[instrument(skip_all, fields(profile = %config.profile, dry_run = config.dry_run))]
pub async fn run(config: &TaggerConfig) -> Result<RunReport> {
    let aws = AwsContext::with_profile(&config.profile).await;
    info!(
        profile = %config.profile,
        dry_run = config.dry_run,
        bootstrap_region = aws.region(),
        "Starting default resource tagging"
    );

    let account_id = get_current_account_id(&aws).await?;
    let regions = list_regions(&Ec2Client::from_context(&aws)).await?;
    let ctx = RunContext::new(config, &regions);

    let reports = run_regions(&regions, &ctx, |region| {
        let regional = aws.for_region(region);
        (
            Ec2Client::from_context(&regional),
            RdsClient::from_context(&regional),
        )
    })
    .await;

    let report = RunReport {
        account_id,
        dry_run: config.dry_run,
        regions: reports,
    };
    log_summary(&report);

    Ok(report)
}

/// Process every region, at most `ctx.concurrency` at a time.
///
/// `clients` builds the region-scoped EC2 and RDS clients. Reports come back
/// in the order of `regions`.
pub async fn run_regions<E, R, F>(
    regions: &[String],
    ctx: &RunContext,
    clients: F,
) -> Vec<RegionReport>
where
    E: Ec2Operations,
    R: RdsOperations,
    F: Fn(&str) -> (E, R),
{
    stream::iter(regions)
        .map(|region| {
            let region = region.as_str();
            let (ec2, rds) = clients(region);
            async move { process_region(region, &ec2, &rds, ctx).await }
        })
        .buffered(ctx.concurrency.max(1))
        .collect()
        .await
}

fn log_summary(report: &RunReport) {
    let failed = report.failed_regions();
    if failed.is_empty() {
        info!(
            account_id = %report.account_id,
            regions = report.regions.len(),
            ec2_resources = report.ec2_resource_count(),
            rds_security_groups = report.rds_security_group_count(),
            dry_run = report.dry_run,
            "All regions processed"
        );
    } else {
        warn!(
            account_id = %report.account_id,
            regions = report.regions.len(),
            failed = failed.len(),
            "Regions with errors: {}",
            failed.join(",")
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aws::ec2::MockEc2Operations;
    use crate::aws::rds::MockRdsOperations;
    use crate::aws::{AccountId, DbSecurityGroupRef, classify_aws_error};
    use crate::logging::capture::capture_lines;
    use crate::tagging::DRY_RUN_MESSAGE;
    use default_tagger_common::ResourceTag;

    fn context(dry_run: bool, regions: &[String]) -> RunContext {
        RunContext::new(
            &TaggerConfig {
                dry_run,
                ..Default::default()
            },
            regions,
        )
    }

    fn regions(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    /// EC2 mock for a region whose default VPC `vpc-A` has two subnets
    fn ec2_with_default_vpc(dry_run: bool) -> MockEc2Operations {
        let mut ec2 = MockEc2Operations::new();
        ec2.expect_default_vpc_ids()
            .times(1)
            .returning(|| Ok(vec!["vpc-A".to_string()]));
        ec2.expect_subnet_ids()
            .returning(|_| Ok(vec!["subnet-1".to_string(), "subnet-2".to_string()]));
        ec2.expect_security_group_ids().returning(|_| Ok(vec![]));
        ec2.expect_network_acl_ids().returning(|_| Ok(vec![]));
        ec2.expect_route_table_ids().returning(|_| Ok(vec![]));
        ec2.expect_internet_gateway_ids().returning(|_| Ok(vec![]));
        ec2.expect_dhcp_options_ids().returning(|_| Ok(vec![]));
        ec2.expect_create_tags()
            .withf(move |ids, tag, dry| {
                ids.to_vec() == vec!["vpc-A", "subnet-1", "subnet-2"]
                    && *tag == ResourceTag::is_default()
                    && *dry == dry_run
            })
            .times(1)
            .returning(move |_, _, _| {
                if dry_run {
                    Err(classify_aws_error(Some("DryRunOperation"), Some(DRY_RUN_MESSAGE)))
                } else {
                    Ok(())
                }
            });
        ec2
    }

    /// EC2 mock for a region without a default VPC; tagging must not happen
    fn ec2_without_default_vpc() -> MockEc2Operations {
        let mut ec2 = MockEc2Operations::new();
        ec2.expect_default_vpc_ids().times(1).returning(|| Ok(vec![]));
        ec2.expect_subnet_ids().times(0);
        ec2.expect_create_tags().times(0);
        ec2
    }

    fn rds_without_default_group() -> MockRdsOperations {
        let mut rds = MockRdsOperations::new();
        rds.expect_describe_db_security_groups()
            .times(1)
            .returning(|_| {
                Err(classify_aws_error(
                    Some("DBSecurityGroupNotFound"),
                    Some("DBSecurityGroup default not found."),
                ))
            });
        rds.expect_add_tags_to_resource().times(0);
        rds
    }

    fn rds_with_default_group(expected_tag_calls: usize) -> MockRdsOperations {
        let mut rds = MockRdsOperations::new();
        rds.expect_describe_db_security_groups()
            .times(1)
            .returning(|_| {
                Ok(vec![DbSecurityGroupRef {
                    name: "default".to_string(),
                    arn: "arn:aws:rds:us-east-1:123456789012:secgrp:default".to_string(),
                }])
            });
        rds.expect_add_tags_to_resource()
            .times(expected_tag_calls)
            .returning(|_, _| Ok(()));
        rds
    }

    #[tokio::test]
    async fn test_default_vpc_with_two_subnets_is_tagged_once() {
        let ctx = context(false, &regions(&["us-east-1"]));

        let report = process_region(
            "us-east-1",
            &ec2_with_default_vpc(false),
            &rds_without_default_group(),
            &ctx,
        )
        .await;

        assert!(report.is_success());
        assert_eq!(report.ec2.unwrap(), Ec2Outcome::Tagged { resources: 3 });
        assert_eq!(report.rds.unwrap(), RdsOutcome::NoDefaultSecurityGroup);
    }

    #[tokio::test]
    async fn test_region_without_defaults_issues_no_tag_calls() {
        let ctx = context(false, &regions(&["eu-west-1"]));

        let report = process_region(
            "eu-west-1",
            &ec2_without_default_vpc(),
            &rds_without_default_group(),
            &ctx,
        )
        .await;

        assert!(report.is_success());
        assert_eq!(report.ec2.unwrap(), Ec2Outcome::NoDefaultVpc);
        assert_eq!(report.rds.unwrap(), RdsOutcome::NoDefaultSecurityGroup);
    }

    #[tokio::test]
    async fn test_dry_run_rds_issues_no_tag_call() {
        let ctx = context(true, &regions(&["us-east-1"]));

        let report = process_region(
            "us-east-1",
            &ec2_with_default_vpc(true),
            &rds_with_default_group(0),
            &ctx,
        )
        .await;

        assert!(report.is_success());
        assert_eq!(report.ec2.unwrap(), Ec2Outcome::DryRun { resources: 3 });
        assert_eq!(report.rds.unwrap(), RdsOutcome::DryRun);
    }

    #[tokio::test]
    async fn test_region_without_defaults_logs_two_not_found_lines() {
        let ctx = context(false, &regions(&["eu-west-1"]));
        let (lines, _guard) = capture_lines();

        process_region(
            "eu-west-1",
            &ec2_without_default_vpc(),
            &rds_without_default_group(),
            &ctx,
        )
        .await;

        assert_eq!(
            lines.lines(),
            vec![
                "INFO:EC2:eu-west-1: Default VPC not found.",
                "INFO:RDS:eu-west-1: DBSecurityGroup default not found.",
            ]
        );
    }

    #[tokio::test]
    async fn test_dry_run_rds_logs_would_have_succeeded() {
        let ctx = context(true, &regions(&["us-east-1"]));
        let (lines, _guard) = capture_lines();

        process_region(
            "us-east-1",
            &ec2_without_default_vpc(),
            &rds_with_default_group(0),
            &ctx,
        )
        .await;

        assert_eq!(
            lines.lines(),
            vec![
                "INFO:EC2:us-east-1: Default VPC not found.",
                "INFO:RDS:us-east-1: Tag on arn:aws:rds:us-east-1:123456789012:secgrp:default",
                "INFO:RDS:us-east-1: Request would have succeeded, but DryRun flag is set.",
            ]
        );
    }

    #[tokio::test]
    async fn test_ec2_tagging_logs_resource_list() {
        let ctx = context(false, &regions(&["us-east-1"]));
        let (lines, _guard) = capture_lines();

        process_region(
            "us-east-1",
            &ec2_with_default_vpc(false),
            &rds_without_default_group(),
            &ctx,
        )
        .await;

        assert_eq!(
            lines.lines(),
            vec![
                "INFO:EC2:us-east-1: Tag on vpc-A,subnet-1,subnet-2",
                "INFO:EC2:us-east-1: done",
                "INFO:RDS:us-east-1: DBSecurityGroup default not found.",
            ]
        );
    }

    #[tokio::test]
    async fn test_rds_tagged_when_default_group_exists() {
        let ctx = context(false, &regions(&["us-east-1"]));

        let report = process_region(
            "us-east-1",
            &ec2_without_default_vpc(),
            &rds_with_default_group(1),
            &ctx,
        )
        .await;

        assert_eq!(report.rds.unwrap(), RdsOutcome::Tagged);
    }

    #[tokio::test]
    async fn test_ec2_failure_still_runs_rds_step() {
        let ctx = context(false, &regions(&["us-east-1"]));

        let mut ec2 = MockEc2Operations::new();
        ec2.expect_default_vpc_ids()
            .returning(|| Err(classify_aws_error(Some("UnauthorizedOperation"), Some("denied"))));
        ec2.expect_create_tags().times(0);

        let report = process_region("us-east-1", &ec2, &rds_with_default_group(1), &ctx).await;

        assert!(!report.is_success());
        assert!(report.ec2.is_err());
        assert_eq!(report.rds.unwrap(), RdsOutcome::Tagged);
    }

    #[tokio::test]
    async fn test_failing_region_does_not_stop_siblings() {
        let names = regions(&["us-east-1", "eu-west-1", "ap-south-1"]);
        let ctx = context(false, &names);

        let reports = run_regions(&names, &ctx, |region| match region {
            "us-east-1" => (ec2_with_default_vpc(false), rds_without_default_group()),
            "eu-west-1" => {
                let mut ec2 = MockEc2Operations::new();
                ec2.expect_default_vpc_ids().returning(|| {
                    Err(classify_aws_error(Some("RequestLimitExceeded"), Some("slow down")))
                });
                let mut rds = MockRdsOperations::new();
                rds.expect_describe_db_security_groups()
                    .returning(|_| Err(classify_aws_error(Some("AccessDenied"), Some("nope"))));
                (ec2, rds)
            }
            _ => (ec2_without_default_vpc(), rds_with_default_group(1)),
        })
        .await;

        let order: Vec<&str> = reports.iter().map(|r| r.region.as_str()).collect();
        assert_eq!(order, vec!["us-east-1", "eu-west-1", "ap-south-1"]);
        assert!(reports[0].is_success());
        assert!(!reports[1].is_success());
        assert!(reports[2].is_success());

        let report = RunReport {
            account_id: "123456789012".parse::<AccountId>().unwrap(),
            dry_run: false,
            regions: reports,
        };
        assert!(!report.is_success());
        assert_eq!(report.failed_regions(), vec!["eu-west-1"]);
        assert_eq!(report.ec2_resource_count(), 3);
        assert_eq!(report.rds_security_group_count(), 1);
    }

    #[tokio::test]
    async fn test_dry_run_across_regions_never_mutates() {
        let names = regions(&["us-east-1", "eu-west-1"]);
        let ctx = context(true, &names);

        let reports = run_regions(&names, &ctx, |region| match region {
            "us-east-1" => (ec2_with_default_vpc(true), rds_with_default_group(0)),
            _ => (ec2_without_default_vpc(), rds_with_default_group(0)),
        })
        .await;

        assert!(reports.iter().all(RegionReport::is_success));
        assert!(
            reports
                .iter()
                .all(|r| matches!(r.rds, Ok(RdsOutcome::DryRun)))
        );
    }

    #[test]
    fn test_run_context_domain_names_cover_all_regions() {
        let ctx = context(false, &regions(&["us-east-1", "eu-west-1"]));
        assert_eq!(
            ctx.domain_names,
            vec![
                "us-east-1.compute.internal",
                "eu-west-1.compute.internal",
                "ec2.internal",
            ]
        );
        assert_eq!(ctx.tag, ResourceTag::is_default());
        assert!(!ctx.dry_run);
    }

    #[test]
    fn test_run_context_concurrency_is_at_least_one() {
        let ctx = RunContext::new(
            &TaggerConfig {
                concurrency: 0,
                ..Default::default()
            },
            &[],
        );
        assert_eq!(ctx.concurrency, 1);
    }
}
