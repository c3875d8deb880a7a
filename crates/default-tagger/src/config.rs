//! Run configuration
//!
//! Built once from the command line and passed down explicitly. Nothing
//! mutates it after startup.

use default_tagger_common::defaults::{DEFAULT_PROFILE, DEFAULT_REGION_CONCURRENCY};

/// Configuration for a tagging run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaggerConfig {
    /// Credential profile used for every AWS call
    pub profile: String,
    /// Validate permissions without tagging anything
    pub dry_run: bool,
    /// Maximum number of regions processed at the same time
    pub concurrency: usize,
}

impl Default for TaggerConfig {
    fn default() -> Self {
        Self {
            profile: DEFAULT_PROFILE.to_string(),
            dry_run: false,
            concurrency: DEFAULT_REGION_CONCURRENCY,
        }
    }
}
