//! Shared AWS configuration context
//!
//! Provides `AwsContext` for loading AWS SDK configuration once per run and
//! deriving region-scoped service clients from it.

use aws_config::meta::region::RegionProviderChain;
use aws_config::profile::ProfileFileRegionProvider;
use aws_config::{BehaviorVersion, Region, SdkConfig};
use default_tagger_common::defaults::DEFAULT_BOOTSTRAP_REGION;
use std::sync::Arc;

/// Shared AWS configuration context for creating service clients.
///
/// Credentials are resolved from the named profile once. Region-scoped
/// contexts created with [`AwsContext::for_region`] share that resolution.
///
/// # Example
/// ```ignore
/// let aws = AwsContext::with_profile("default").await;
/// let eu = aws.for_region("eu-west-1");
/// let ec2 = Ec2Client::from_context(&eu);
/// let rds = RdsClient::from_context(&eu);
/// ```
#[derive(Clone)]
pub struct AwsContext {
    config: Arc<SdkConfig>,
    region: String,
}

impl AwsContext {
    /// Load AWS configuration for the given credential profile.
    ///
    /// The region comes from the profile, then the environment, then
    /// falls back to the bootstrap region. It is only used for calls that
    /// are not region specific, such as listing regions.
    pub async fn with_profile(profile: &str) -> Self {
        let region_provider = RegionProviderChain::first_try(
            ProfileFileRegionProvider::builder()
                .profile_name(profile)
                .build(),
        )
        .or_default_provider()
        .or_else(DEFAULT_BOOTSTRAP_REGION);

        let config = aws_config::defaults(BehaviorVersion::latest())
            .profile_name(profile)
            .region(region_provider)
            .load()
            .await;

        let region = config
            .region()
            .map(|r| r.as_ref().to_string())
            .unwrap_or_else(|| DEFAULT_BOOTSTRAP_REGION.to_string());

        Self {
            config: Arc::new(config),
            region,
        }
    }

    /// Derive a context for another region, reusing the loaded credentials.
    pub fn for_region(&self, region: &str) -> Self {
        let config = self
            .config
            .to_builder()
            .region(Region::new(region.to_string()))
            .build();

        Self {
            config: Arc::new(config),
            region: region.to_string(),
        }
    }

    /// Get the underlying SDK config for direct client construction.
    pub fn sdk_config(&self) -> &SdkConfig {
        &self.config
    }

    /// Get the region string.
    pub fn region(&self) -> &str {
        &self.region
    }

    /// Create an EC2 client from this context.
    pub fn ec2_client(&self) -> aws_sdk_ec2::Client {
        aws_sdk_ec2::Client::new(self.sdk_config())
    }

    /// Create an RDS client from this context.
    pub fn rds_client(&self) -> aws_sdk_rds::Client {
        aws_sdk_rds::Client::new(self.sdk_config())
    }

    /// Create an STS client from this context.
    pub fn sts_client(&self) -> aws_sdk_sts::Client {
        aws_sdk_sts::Client::new(self.sdk_config())
    }
}

impl std::fmt::Debug for AwsContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AwsContext")
            .field("region", &self.region)
            .finish_non_exhaustive()
    }
}
