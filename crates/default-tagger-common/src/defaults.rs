//! Default configuration values

/// Credential profile used when `--profile` is not given
pub const DEFAULT_PROFILE: &str = "default";

/// Region used to list regions when neither the profile nor the
/// environment configures one
pub const DEFAULT_BOOTSTRAP_REGION: &str = "us-east-1";

/// Maximum number of regions processed at the same time
pub const DEFAULT_REGION_CONCURRENCY: usize = 4;
