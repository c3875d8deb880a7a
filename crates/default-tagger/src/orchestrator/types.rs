//! Orchestrator types: per-run context and per-region results

use crate::aws::{AccountId, AwsError};
use crate::config::TaggerConfig;
use default_tagger_common::{ResourceTag, default_domain_names};

/// Immutable state shared by every region task of one run
#[derive(Debug, Clone)]
pub struct RunContext {
    /// Validate permissions without tagging anything
    pub dry_run: bool,
    /// Tag written to every resource
    pub tag: ResourceTag,
    /// Domain names identifying default DHCP option sets, built from the
    /// regions known at run start
    pub domain_names: Vec<String>,
    /// Maximum number of regions processed at the same time
    pub concurrency: usize,
}

impl RunContext {
    pub fn new(config: &TaggerConfig, regions: &[String]) -> Self {
        Self {
            dry_run: config.dry_run,
            tag: ResourceTag::is_default(),
            domain_names: default_domain_names(regions),
            concurrency: config.concurrency.max(1),
        }
    }
}

/// Outcome of the EC2 step of one region
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display)]
pub enum Ec2Outcome {
    /// The default VPC and its resources were tagged
    #[display("tagged {resources} resources")]
    Tagged { resources: usize },
    /// Dry run acknowledged for the default VPC resources
    #[display("dry run for {resources} resources")]
    DryRun { resources: usize },
    /// The region has no default VPC; nothing to tag
    #[display("no default VPC")]
    NoDefaultVpc,
}

/// Outcome of the RDS step of one region
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display)]
pub enum RdsOutcome {
    #[display("tagged default DB security group")]
    Tagged,
    #[display("dry run for default DB security group")]
    DryRun,
    /// The region has no default DB security group; nothing to tag
    #[display("no default DB security group")]
    NoDefaultSecurityGroup,
}

/// Result of processing one region. Each step is attempted exactly once.
#[derive(Debug)]
pub struct RegionReport {
    pub region: String,
    pub ec2: Result<Ec2Outcome, AwsError>,
    pub rds: Result<RdsOutcome, AwsError>,
}

impl RegionReport {
    /// True when neither step failed
    pub fn is_success(&self) -> bool {
        self.ec2.is_ok() && self.rds.is_ok()
    }
}

/// Result of a whole run, one report per region in region-list order
#[derive(Debug)]
pub struct RunReport {
    pub account_id: AccountId,
    pub dry_run: bool,
    pub regions: Vec<RegionReport>,
}

impl RunReport {
    /// True when every region completed without a fatal error
    pub fn is_success(&self) -> bool {
        self.regions.iter().all(RegionReport::is_success)
    }

    /// Names of regions with at least one failed step
    pub fn failed_regions(&self) -> Vec<&str> {
        self.regions
            .iter()
            .filter(|r| !r.is_success())
            .map(|r| r.region.as_str())
            .collect()
    }

    /// Number of EC2 resources tagged (or that would have been, in dry run)
    pub fn ec2_resource_count(&self) -> usize {
        self.regions
            .iter()
            .map(|r| match r.ec2 {
                Ok(Ec2Outcome::Tagged { resources } | Ec2Outcome::DryRun { resources }) => {
                    resources
                }
                _ => 0,
            })
            .sum()
    }

    /// Number of default DB security groups tagged (or that would have been)
    pub fn rds_security_group_count(&self) -> usize {
        self.regions
            .iter()
            .filter(|r| matches!(r.rds, Ok(RdsOutcome::Tagged | RdsOutcome::DryRun)))
            .count()
    }
}
