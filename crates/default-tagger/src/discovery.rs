//! Discovery of default resources in one region
//!
//! - [`resolve_default_vpc`]: the VPC flagged as default, if any
//! - [`aggregate_default_vpc_resources`]: the VPC plus everything that
//!   belongs to it, as one immutable [`DefaultVpcResources`]
//! - [`resolve_default_rds_security_group`]: the legacy RDS security group
//!   named `default`, if any
//!
//! "Not found" outcomes are logged and returned as `None`. Every other
//! provider error is returned to the caller.

use crate::aws::error::DB_SECURITY_GROUP_NOT_FOUND;
use crate::aws::{AwsError, DbSecurityGroupRef, Ec2Operations, RdsOperations};
use default_tagger_common::{ResourceKind, Service};
use std::collections::HashSet;
use tracing::{debug, info, warn};

/// Name of the legacy RDS security group created with every account
pub const DEFAULT_DB_SECURITY_GROUP_NAME: &str = "default";

/// Every resource identifier belonging to a region's default VPC.
///
/// Always starts with the VPC itself, followed by the dependent resources in
/// [`ResourceKind::DEFAULT_VPC_ORDER`]. Identifiers are unique.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DefaultVpcResources {
    entries: Vec<(ResourceKind, String)>,
}

impl DefaultVpcResources {
    /// Assemble the set from the VPC ID and the IDs found per category.
    ///
    /// Categories are appended in the order given. Identifiers already
    /// present, including the VPC ID, are dropped.
    pub fn from_categories<I>(vpc_id: &str, categories: I) -> Self
    where
        I: IntoIterator<Item = (ResourceKind, Vec<String>)>,
    {
        let mut seen = HashSet::new();
        let mut entries = vec![(ResourceKind::Vpc, vpc_id.to_string())];
        seen.insert(vpc_id.to_string());

        for (kind, ids) in categories {
            for id in ids {
                if seen.insert(id.clone()) {
                    entries.push((kind, id));
                }
            }
        }

        Self { entries }
    }

    /// The default VPC's ID
    pub fn vpc_id(&self) -> &str {
        &self.entries[0].1
    }

    /// All identifiers in insertion order, VPC first
    pub fn ids(&self) -> Vec<String> {
        self.iter().map(|(_, id)| id.to_string()).collect()
    }

    /// Number of identifiers of one kind
    pub fn count(&self, kind: ResourceKind) -> usize {
        self.iter().filter(|(k, _)| *k == kind).count()
    }

    pub fn iter(&self) -> impl Iterator<Item = (ResourceKind, &str)> {
        self.entries.iter().map(|(k, id)| (*k, id.as_str()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Always false: the set contains at least the VPC.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Find the region's default VPC.
///
/// Returns the first VPC flagged `isDefault=true`. AWS allows at most one;
/// if the provider ever returns more, the rest are ignored.
pub async fn resolve_default_vpc<E: Ec2Operations>(
    ec2: &E,
    region: &str,
) -> Result<Option<String>, AwsError> {
    let vpc_ids = ec2.default_vpc_ids().await?;

    let Some(vpc_id) = vpc_ids.first() else {
        info!(service = %Service::Ec2, region, "Default VPC not found.");
        return Ok(None);
    };

    if vpc_ids.len() > 1 {
        warn!(
            service = %Service::Ec2,
            region,
            ignored = vpc_ids.len() - 1,
            "Multiple default VPCs returned, using {vpc_id}"
        );
    }

    debug!(service = %Service::Ec2, region, vpc_id = %vpc_id, "Found default VPC");
    Ok(Some(vpc_id.clone()))
}

/// Collect the default VPC and every resource that belongs to it.
///
/// Subnets, security groups, network ACLs and route tables are matched by
/// `vpc-id`, internet gateways by attachment. DHCP option sets are not VPC
/// scoped; they match when their `domain-name` is one of `domain_names`.
/// Categories are queried one after another and the first error aborts.
pub async fn aggregate_default_vpc_resources<E: Ec2Operations>(
    ec2: &E,
    region: &str,
    vpc_id: &str,
    domain_names: &[String],
) -> Result<DefaultVpcResources, AwsError> {
    let mut categories = Vec::with_capacity(ResourceKind::dependents().len());
    for &kind in ResourceKind::dependents() {
        let ids = match kind {
            ResourceKind::Subnet => ec2.subnet_ids(vpc_id).await?,
            ResourceKind::SecurityGroup => ec2.security_group_ids(vpc_id).await?,
            ResourceKind::NetworkAcl => ec2.network_acl_ids(vpc_id).await?,
            ResourceKind::RouteTable => ec2.route_table_ids(vpc_id).await?,
            ResourceKind::InternetGateway => ec2.internet_gateway_ids(vpc_id).await?,
            ResourceKind::DhcpOptions => ec2.dhcp_options_ids(domain_names).await?,
            ResourceKind::Vpc => continue,
        };
        categories.push((kind, ids));
    }

    let resources = DefaultVpcResources::from_categories(vpc_id, categories);

    debug!(
        service = %Service::Ec2,
        region,
        vpc_id,
        subnets = resources.count(ResourceKind::Subnet),
        security_groups = resources.count(ResourceKind::SecurityGroup),
        network_acls = resources.count(ResourceKind::NetworkAcl),
        route_tables = resources.count(ResourceKind::RouteTable),
        internet_gateways = resources.count(ResourceKind::InternetGateway),
        dhcp_options = resources.count(ResourceKind::DhcpOptions),
        "Collected default VPC resources"
    );

    Ok(resources)
}

/// Find the legacy RDS security group named `default`.
///
/// Most modern accounts have none, so `DBSecurityGroupNotFound` is an
/// expected outcome and maps to `None`. Any other error is returned.
pub async fn resolve_default_rds_security_group<R: RdsOperations>(
    rds: &R,
    region: &str,
) -> Result<Option<DbSecurityGroupRef>, AwsError> {
    match rds
        .describe_db_security_groups(DEFAULT_DB_SECURITY_GROUP_NAME)
        .await
    {
        Ok(groups) => match groups.into_iter().next() {
            Some(group) => {
                debug!(
                    service = %Service::Rds,
                    region,
                    name = %group.name,
                    arn = %group.arn,
                    "Found DB security group"
                );
                Ok(Some(group))
            }
            None => {
                info!(service = %Service::Rds, region, "Default DB security group not found.");
                Ok(None)
            }
        },
        Err(AwsError::NotFound { code, message }) if code == DB_SECURITY_GROUP_NOT_FOUND => {
            info!(service = %Service::Rds, region, "{message}");
            Ok(None)
        }
        Err(e) => Err(e),
    }
}
