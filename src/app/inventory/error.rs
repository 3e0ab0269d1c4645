//! Error taxonomy for the inventory pass.
//!
//! Provider failures are fatal and carry an [`ErrorCategory`] for the log line that reports
//! them. The audit performs no application-level retry; whatever retrying the AWS SDK does
//! internally has already happened by the time a [`InventoryError::Transport`] is built.
//! Missing fields are only recovered by the backup job fetcher.

use super::aws_client::ListOperation;
use aws_smithy_runtime_api::client::result::SdkError;
use aws_smithy_types::error::display::DisplayErrorContext;
use aws_smithy_types::error::metadata::ProvideErrorMetadata;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum InventoryError {
    /// A listing call to the provider failed (network, auth, throttling, validation)
    #[error("{operation} failed ({category}): {message}")]
    Transport {
        operation: ListOperation,
        category: ErrorCategory,
        code: Option<String>,
        message: String,
    },

    /// A record lacks a field the fetcher needs
    #[error("{resource} record is missing field '{field}'")]
    MissingField {
        resource: &'static str,
        field: &'static str,
    },
}

impl InventoryError {
    pub fn missing_field(resource: &'static str, field: &'static str) -> Self {
        InventoryError::MissingField { resource, field }
    }

    /// Transport failure with an explicit category, used by non-SDK transports
    pub fn transport(operation: ListOperation, category: ErrorCategory, message: impl Into<String>) -> Self {
        InventoryError::Transport {
            operation,
            category,
            code: None,
            message: message.into(),
        }
    }

    pub fn is_transport(&self) -> bool {
        matches!(self, InventoryError::Transport { .. })
    }
}

/// Coarse classification of provider failures
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Throttled,
    Timeout,
    Network,
    Permission,
    ServiceUnavailable,
    Other,
}

impl ErrorCategory {
    /// Short label for compact display
    pub fn short_label(&self) -> &'static str {
        match self {
            ErrorCategory::Throttled => "throttled",
            ErrorCategory::Timeout => "timeout",
            ErrorCategory::Network => "network",
            ErrorCategory::Permission => "permission",
            ErrorCategory::ServiceUnavailable => "unavailable",
            ErrorCategory::Other => "error",
        }
    }
}

impl std::fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.short_label())
    }
}

const THROTTLING_CODES: &[&str] = &[
    "Throttling",
    "ThrottlingException",
    "TooManyRequestsException",
    "RequestLimitExceeded",
    "LimitExceededException",
    "RateExceeded",
];

const PERMISSION_CODES: &[&str] = &[
    "AccessDenied",
    "AccessDeniedException",
    "UnauthorizedOperation",
    "UnauthorizedAccess",
    "AuthFailure",
    "InvalidClientTokenId",
    "SignatureDoesNotMatch",
    "ExpiredToken",
];

const UNAVAILABLE_CODES: &[&str] = &[
    "ServiceUnavailable",
    "ServiceUnavailableException",
    "InternalError",
    "InternalServerError",
    "InternalServerException",
    "Unavailable",
];

/// Categorize a provider error code
pub fn categorize_code(code: Option<&str>) -> ErrorCategory {
    match code {
        Some(c) if THROTTLING_CODES.contains(&c) => ErrorCategory::Throttled,
        Some(c) if PERMISSION_CODES.contains(&c) => ErrorCategory::Permission,
        Some(c) if UNAVAILABLE_CODES.contains(&c) => ErrorCategory::ServiceUnavailable,
        _ => ErrorCategory::Other,
    }
}

/// Convert an SDK failure into a transport error for `operation`
pub fn transport_error<E, R>(operation: ListOperation, err: SdkError<E, R>) -> InventoryError
where
    E: ProvideErrorMetadata + std::error::Error + 'static,
    R: std::fmt::Debug,
{
    let code = err.code().map(str::to_string);
    let category = match &err {
        SdkError::TimeoutError(_) => ErrorCategory::Timeout,
        SdkError::DispatchFailure(_) => ErrorCategory::Network,
        _ => categorize_code(code.as_deref()),
    };

    InventoryError::Transport {
        operation,
        category,
        code,
        message: DisplayErrorContext(&err).to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_throttling_codes() {
        assert_eq!(categorize_code(Some("RequestLimitExceeded")), ErrorCategory::Throttled);
        assert_eq!(categorize_code(Some("ThrottlingException")), ErrorCategory::Throttled);
    }

    #[test]
    fn test_permission_codes() {
        assert_eq!(categorize_code(Some("UnauthorizedOperation")), ErrorCategory::Permission);
        assert_eq!(categorize_code(Some("AuthFailure")), ErrorCategory::Permission);
    }

    #[test]
    fn test_unknown_or_missing_code_is_other() {
        assert_eq!(categorize_code(Some("InvalidParameterValue")), ErrorCategory::Other);
        assert_eq!(categorize_code(None), ErrorCategory::Other);
    }

    #[test]
    fn test_transport_error_display() {
        let err = InventoryError::transport(
            ListOperation::DescribeVolumes,
            ErrorCategory::Throttled,
            "Rate exceeded",
        );
        assert!(err.is_transport());
        assert_eq!(
            err.to_string(),
            "ec2:DescribeVolumes failed (throttled): Rate exceeded"
        );
    }

    #[test]
    fn test_missing_field_display() {
        let err = InventoryError::missing_field("snapshot", "StartTime");
        assert!(!err.is_transport());
        assert_eq!(err.to_string(), "snapshot record is missing field 'StartTime'");
    }
}
