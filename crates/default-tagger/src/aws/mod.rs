//! AWS client modules
//!
//! This module provides wrappers around AWS SDK clients for:
//! - EC2: Region listing, default VPC resource discovery, tagging
//! - RDS: Default DB security group lookup and tagging
//! - STS: Credential validation and account ID lookup

pub mod account;
pub mod context;
pub mod ec2;
pub mod error;
pub mod rds;

pub use account::{AccountId, get_current_account_id};
pub use context::AwsContext;
pub use ec2::{Ec2Client, Ec2Operations};
pub use error::{AwsError, classify_aws_error, classify_sdk_error};
pub use rds::{DbSecurityGroupRef, RdsClient, RdsOperations};
