//! AWS error classification
//!
//! Every provider call is classified once, at the SDK boundary, using the
//! `.code()` from `ProvideErrorMetadata`. Callers match on [`AwsError`]
//! instead of re-parsing error codes.

use aws_sdk_ec2::error::{DisplayErrorContext, ProvideErrorMetadata};
use thiserror::Error;

/// Closed set of provider error kinds
#[derive(Debug, Error)]
pub enum AwsError {
    /// The requested resource does not exist (an expected outcome for lookups)
    #[error("Resource not found ({code}): {message}")]
    NotFound { code: String, message: String },

    /// The provider validated a dry-run request and would have executed it
    #[error("{message}")]
    DryRunAcknowledged { message: String },

    /// Any other AWS SDK error, always fatal for the step that raised it
    #[error("AWS error: {message}")]
    Sdk {
        code: Option<String>,
        message: String,
    },
}

impl AwsError {
    /// The provider error code, if there was one
    pub fn code(&self) -> Option<&str> {
        match self {
            AwsError::NotFound { code, .. } => Some(code),
            AwsError::DryRunAcknowledged { .. } => Some(DRY_RUN_CODE),
            AwsError::Sdk { code, .. } => code.as_deref(),
        }
    }
}

/// Error code EC2 returns when a dry-run request would have succeeded
const DRY_RUN_CODE: &str = "DryRunOperation";

/// RDS error code for a DB security group that does not exist
pub const DB_SECURITY_GROUP_NOT_FOUND: &str = "DBSecurityGroupNotFound";

/// Error codes for lookups whose absence is an expected outcome.
///
/// EC2 discovery filters by attribute and gets an empty list instead of an
/// error, so only the RDS lookup by name needs one.
const NOT_FOUND_CODES: &[&str] = &[DB_SECURITY_GROUP_NOT_FOUND];

/// Classify an AWS error from its code and message.
pub fn classify_aws_error(code: Option<&str>, message: Option<&str>) -> AwsError {
    let message = message.unwrap_or("Unknown error").to_string();

    match code {
        Some(DRY_RUN_CODE) => AwsError::DryRunAcknowledged { message },
        Some(c) if NOT_FOUND_CODES.contains(&c) => AwsError::NotFound {
            code: c.to_string(),
            message,
        },
        _ => AwsError::Sdk {
            code: code.map(|s| s.to_string()),
            message,
        },
    }
}

/// Classify any AWS SDK error (EC2, RDS, ...).
///
/// Errors that carry no service message (dispatch failures, timeouts) keep
/// their full display chain as the message.
pub fn classify_sdk_error<E>(error: &E) -> AwsError
where
    E: ProvideErrorMetadata + std::error::Error,
{
    match error.message() {
        Some(message) => classify_aws_error(error.code(), Some(message)),
        None => {
            let context = DisplayErrorContext(error).to_string();
            classify_aws_error(error.code(), Some(&context))
        }
    }
}
