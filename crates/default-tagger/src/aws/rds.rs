//! RDS client: legacy DB security group lookup and tagging

use crate::aws::context::AwsContext;
use crate::aws::error::{AwsError, classify_sdk_error};
use aws_sdk_rds::{Client, types::Tag};
use default_tagger_common::ResourceTag;

/// A DB security group, reduced to what tagging needs
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DbSecurityGroupRef {
    pub name: String,
    pub arn: String,
}

/// RDS client scoped to one region
pub struct RdsClient {
    client: Client,
}

impl RdsClient {
    /// Create an RDS client from a pre-loaded AWS context
    pub fn from_context(ctx: &AwsContext) -> Self {
        Self {
            client: ctx.rds_client(),
        }
    }

    /// Describe the DB security group with the given name.
    ///
    /// A missing group surfaces as [`AwsError::NotFound`]. Groups without an
    /// ARN are skipped since they cannot be tagged.
    pub async fn describe_db_security_groups(
        &self,
        name: &str,
    ) -> Result<Vec<DbSecurityGroupRef>, AwsError> {
        let response = self
            .client
            .describe_db_security_groups()
            .db_security_group_name(name)
            .send()
            .await
            .map_err(|e| classify_sdk_error(&e))?;

        Ok(response
            .db_security_groups()
            .iter()
            .filter_map(|sg| {
                Some(DbSecurityGroupRef {
                    name: sg.db_security_group_name()?.to_string(),
                    arn: sg.db_security_group_arn()?.to_string(),
                })
            })
            .collect())
    }

    /// Attach a tag to the resource identified by `arn`.
    ///
    /// RDS has no server-side dry run; callers must not invoke this in
    /// dry-run mode.
    pub async fn add_tags_to_resource(&self, arn: &str, tag: &ResourceTag) -> Result<(), AwsError> {
        self.client
            .add_tags_to_resource()
            .resource_name(arn)
            .tags(Tag::builder().key(&tag.key).value(&tag.value).build())
            .send()
            .await
            .map_err(|e| classify_sdk_error(&e))?;

        Ok(())
    }
}

/// Trait for RDS operations that can be mocked in tests.
#[allow(async_fn_in_trait)] // Internal use only, callers are never spawned
#[cfg_attr(test, mockall::automock)]
pub trait RdsOperations {
    /// Describe DB security groups with the given name
    async fn describe_db_security_groups(
        &self,
        name: &str,
    ) -> Result<Vec<DbSecurityGroupRef>, AwsError>;

    /// Attach a tag to a single resource ARN
    async fn add_tags_to_resource(&self, arn: &str, tag: &ResourceTag) -> Result<(), AwsError>;
}

impl RdsOperations for RdsClient {
    async fn describe_db_security_groups(
        &self,
        name: &str,
    ) -> Result<Vec<DbSecurityGroupRef>, AwsError> {
        RdsClient::describe_db_security_groups(self, name).await
    }

    async fn add_tags_to_resource(&self, arn: &str, tag: &ResourceTag) -> Result<(), AwsError> {
        RdsClient::add_tags_to_resource(self, arn, tag).await
    }
}
