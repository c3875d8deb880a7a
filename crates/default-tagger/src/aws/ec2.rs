//! EC2 client: region listing, default VPC resource discovery and tagging

use crate::aws::context::AwsContext;
use crate::aws::error::{AwsError, classify_sdk_error};
use aws_sdk_ec2::{
    Client,
    types::{Filter, Tag},
};
use default_tagger_common::ResourceTag;
use tracing::debug;

/// EC2 client scoped to one region
pub struct Ec2Client {
    client: Client,
}

impl Ec2Client {
    /// Create an EC2 client from a pre-loaded AWS context
    pub fn from_context(ctx: &AwsContext) -> Self {
        Self {
            client: ctx.ec2_client(),
        }
    }

    /// List all regions enabled for the account
    pub async fn describe_regions(&self) -> Result<Vec<String>, AwsError> {
        let response = self
            .client
            .describe_regions()
            .send()
            .await
            .map_err(|e| classify_sdk_error(&e))?;

        Ok(response
            .regions()
            .iter()
            .filter_map(|r| r.region_name().map(str::to_string))
            .collect())
    }

    /// IDs of VPCs flagged `isDefault=true`
    pub async fn default_vpc_ids(&self) -> Result<Vec<String>, AwsError> {
        let mut ids = Vec::new();
        let mut pages = self
            .client
            .describe_vpcs()
            .filters(filter("isDefault", ["true"]))
            .into_paginator()
            .send();

        while let Some(page) = pages.next().await {
            let page = page.map_err(|e| classify_sdk_error(&e))?;
            ids.extend(page.vpcs().iter().filter_map(|v| v.vpc_id().map(str::to_string)));
        }

        Ok(ids)
    }

    /// IDs of subnets in the VPC
    pub async fn subnet_ids(&self, vpc_id: &str) -> Result<Vec<String>, AwsError> {
        let mut ids = Vec::new();
        let mut pages = self
            .client
            .describe_subnets()
            .filters(filter("vpc-id", [vpc_id]))
            .into_paginator()
            .send();

        while let Some(page) = pages.next().await {
            let page = page.map_err(|e| classify_sdk_error(&e))?;
            ids.extend(
                page.subnets()
                    .iter()
                    .filter_map(|s| s.subnet_id().map(str::to_string)),
            );
        }

        debug!(vpc_id, count = ids.len(), "Found subnets");
        Ok(ids)
    }

    /// IDs of security groups in the VPC
    pub async fn security_group_ids(&self, vpc_id: &str) -> Result<Vec<String>, AwsError> {
        let mut ids = Vec::new();
        let mut pages = self
            .client
            .describe_security_groups()
            .filters(filter("vpc-id", [vpc_id]))
            .into_paginator()
            .send();

        while let Some(page) = pages.next().await {
            let page = page.map_err(|e| classify_sdk_error(&e))?;
            ids.extend(
                page.security_groups()
                    .iter()
                    .filter_map(|sg| sg.group_id().map(str::to_string)),
            );
        }

        debug!(vpc_id, count = ids.len(), "Found security groups");
        Ok(ids)
    }

    /// IDs of network ACLs in the VPC
    pub async fn network_acl_ids(&self, vpc_id: &str) -> Result<Vec<String>, AwsError> {
        let mut ids = Vec::new();
        let mut pages = self
            .client
            .describe_network_acls()
            .filters(filter("vpc-id", [vpc_id]))
            .into_paginator()
            .send();

        while let Some(page) = pages.next().await {
            let page = page.map_err(|e| classify_sdk_error(&e))?;
            ids.extend(
                page.network_acls()
                    .iter()
                    .filter_map(|acl| acl.network_acl_id().map(str::to_string)),
            );
        }

        debug!(vpc_id, count = ids.len(), "Found network ACLs");
        Ok(ids)
    }

    /// IDs of route tables in the VPC
    pub async fn route_table_ids(&self, vpc_id: &str) -> Result<Vec<String>, AwsError> {
        let mut ids = Vec::new();
        let mut pages = self
            .client
            .describe_route_tables()
            .filters(filter("vpc-id", [vpc_id]))
            .into_paginator()
            .send();

        while let Some(page) = pages.next().await {
            let page = page.map_err(|e| classify_sdk_error(&e))?;
            ids.extend(
                page.route_tables()
                    .iter()
                    .filter_map(|rt| rt.route_table_id().map(str::to_string)),
            );
        }

        debug!(vpc_id, count = ids.len(), "Found route tables");
        Ok(ids)
    }

    /// IDs of internet gateways attached to the VPC
    pub async fn internet_gateway_ids(&self, vpc_id: &str) -> Result<Vec<String>, AwsError> {
        let mut ids = Vec::new();
        let mut pages = self
            .client
            .describe_internet_gateways()
            .filters(filter("attachment.vpc-id", [vpc_id]))
            .into_paginator()
            .send();

        while let Some(page) = pages.next().await {
            let page = page.map_err(|e| classify_sdk_error(&e))?;
            ids.extend(
                page.internet_gateways()
                    .iter()
                    .filter_map(|igw| igw.internet_gateway_id().map(str::to_string)),
            );
        }

        debug!(vpc_id, count = ids.len(), "Found internet gateways");
        Ok(ids)
    }

    /// IDs of DHCP option sets whose `domain-name` is one of `domain_names`
    pub async fn dhcp_options_ids(&self, domain_names: &[String]) -> Result<Vec<String>, AwsError> {
        let mut ids = Vec::new();
        let mut pages = self
            .client
            .describe_dhcp_options()
            .filters(filter("key", ["domain-name"]))
            .filters(filter("value", domain_names))
            .into_paginator()
            .send();

        while let Some(page) = pages.next().await {
            let page = page.map_err(|e| classify_sdk_error(&e))?;
            ids.extend(
                page.dhcp_options()
                    .iter()
                    .filter_map(|d| d.dhcp_options_id().map(str::to_string)),
            );
        }

        debug!(count = ids.len(), "Found default DHCP option sets");
        Ok(ids)
    }

    /// Attach a tag to all resources in one batched call.
    ///
    /// With `dry_run` set EC2 only checks permissions and answers with
    /// [`AwsError::DryRunAcknowledged`] instead of tagging.
    pub async fn create_tags(
        &self,
        resource_ids: &[String],
        tag: &ResourceTag,
        dry_run: bool,
    ) -> Result<(), AwsError> {
        self.client
            .create_tags()
            .dry_run(dry_run)
            .set_resources(Some(resource_ids.to_vec()))
            .tags(Tag::builder().key(&tag.key).value(&tag.value).build())
            .send()
            .await
            .map_err(|e| classify_sdk_error(&e))?;

        Ok(())
    }
}

/// Build an EC2 filter with the given name and values
fn filter<I, S>(name: &str, values: I) -> Filter
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    Filter::builder()
        .name(name)
        .set_values(Some(values.into_iter().map(Into::into).collect()))
        .build()
}

/// Trait for EC2 operations that can be mocked in tests.
///
/// This is the EC2 half of the cloud resource capability: every call the
/// discovery and tagging code makes against EC2 goes through it.
#[allow(async_fn_in_trait)] // Internal use only, callers are never spawned
#[cfg_attr(test, mockall::automock)]
pub trait Ec2Operations {
    /// List all regions enabled for the account
    async fn describe_regions(&self) -> Result<Vec<String>, AwsError>;

    /// IDs of VPCs flagged `isDefault=true`
    async fn default_vpc_ids(&self) -> Result<Vec<String>, AwsError>;

    /// IDs of subnets in the VPC
    async fn subnet_ids(&self, vpc_id: &str) -> Result<Vec<String>, AwsError>;

    /// IDs of security groups in the VPC
    async fn security_group_ids(&self, vpc_id: &str) -> Result<Vec<String>, AwsError>;

    /// IDs of network ACLs in the VPC
    async fn network_acl_ids(&self, vpc_id: &str) -> Result<Vec<String>, AwsError>;

    /// IDs of route tables in the VPC
    async fn route_table_ids(&self, vpc_id: &str) -> Result<Vec<String>, AwsError>;

    /// IDs of internet gateways attached to the VPC
    async fn internet_gateway_ids(&self, vpc_id: &str) -> Result<Vec<String>, AwsError>;

    /// IDs of DHCP option sets with a matching `domain-name`
    async fn dhcp_options_ids(&self, domain_names: &[String]) -> Result<Vec<String>, AwsError>;

    /// Tag all resources in one atomic batch, honoring `dry_run`
    async fn create_tags(
        &self,
        resource_ids: &[String],
        tag: &ResourceTag,
        dry_run: bool,
    ) -> Result<(), AwsError>;
}

impl Ec2Operations for Ec2Client {
    async fn describe_regions(&self) -> Result<Vec<String>, AwsError> {
        Ec2Client::describe_regions(self).await
    }

    async fn default_vpc_ids(&self) -> Result<Vec<String>, AwsError> {
        Ec2Client::default_vpc_ids(self).await
    }

    async fn subnet_ids(&self, vpc_id: &str) -> Result<Vec<String>, AwsError> {
        Ec2Client::subnet_ids(self, vpc_id).await
    }

    async fn security_group_ids(&self, vpc_id: &str) -> Result<Vec<String>, AwsError> {
        Ec2Client::security_group_ids(self, vpc_id).await
    }

    async fn network_acl_ids(&self, vpc_id: &str) -> Result<Vec<String>, AwsError> {
        Ec2Client::network_acl_ids(self, vpc_id).await
    }

    async fn route_table_ids(&self, vpc_id: &str) -> Result<Vec<String>, AwsError> {
        Ec2Client::route_table_ids(self, vpc_id).await
    }

    async fn internet_gateway_ids(&self, vpc_id: &str) -> Result<Vec<String>, AwsError> {
        Ec2Client::internet_gateway_ids(self, vpc_id).await
    }

    async fn dhcp_options_ids(&self, domain_names: &[String]) -> Result<Vec<String>, AwsError> {
        Ec2Client::dhcp_options_ids(self, domain_names).await
    }

    async fn create_tags(
        &self,
        resource_ids: &[String],
        tag: &ResourceTag,
        dry_run: bool,
    ) -> Result<(), AwsError> {
        Ec2Client::create_tags(self, resource_ids, tag, dry_run).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filter_values() {
        let f = filter("value", ["a.compute.internal", "ec2.internal"]);
        assert_eq!(f.name(), Some("value"));
        assert_eq!(f.values(), ["a.compute.internal", "ec2.internal"]);
    }
}
