use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Unified error type for all challenge solver operations.
///
/// Each variant includes a `provider` field identifying which provider produced the error,
/// plus variant-specific context. All variants are serializable for structured error reporting.
///
/// # Retryable Errors
///
/// The following variants represent transient failures that may succeed on retry:
/// - [`NetworkError`](Self::NetworkError) — network connectivity issues
/// - [`Timeout`](Self::Timeout) — request timed out
/// - [`RateLimited`](Self::RateLimited) — API rate limit exceeded
///
/// Retries are disabled by default; see
/// [`AzurePrivateDnsProviderBuilder::max_retries`](crate::AzurePrivateDnsProviderBuilder::max_retries).
#[derive(Debug, Clone, Error, Serialize, Deserialize)]
#[serde(tag = "code")]
pub enum ProviderError {
    /// A network-level error occurred (DNS resolution failure, connection refused, etc.).
    #[error("[{provider}] Network error: {detail}")]
    NetworkError {
        /// Provider that produced the error.
        provider: String,
        /// Error details.
        detail: String,
    },

    /// The HTTP request timed out.
    #[error("[{provider}] Request timeout: {detail}")]
    Timeout {
        /// Provider that produced the error.
        provider: String,
        /// Error details.
        detail: String,
    },

    /// The bearer token was rejected, expired, or could not be acquired.
    #[error("[{provider}] Invalid credentials{}", fmt_raw(.raw_message))]
    InvalidCredentials {
        /// Provider that produced the error.
        provider: String,
        /// Original error message from the provider API, if available.
        raw_message: Option<String>,
    },

    /// The principal lacks permission on the zone or resource group.
    #[error("[{provider}] Permission denied{}", fmt_raw(.raw_message))]
    PermissionDenied {
        /// Provider that produced the error.
        provider: String,
        /// Original error message from the provider API, if available.
        raw_message: Option<String>,
    },

    /// The API rate limit has been exceeded (HTTP 429).
    #[error("[{provider}] Rate limited{}", fmt_retry_after(.retry_after))]
    RateLimited {
        /// Provider that produced the error.
        provider: String,
        /// Suggested wait time in seconds before retrying, if provided by the API.
        retry_after: Option<u64>,
        /// Original error message from the provider API, if available.
        raw_message: Option<String>,
    },

    /// The subscription's record set quota has been exceeded.
    #[error("[{provider}] Quota exceeded")]
    QuotaExceeded {
        /// Provider that produced the error.
        provider: String,
        /// Original error message from the provider API, if available.
        raw_message: Option<String>,
    },

    /// The write was rejected because the record set changed underneath it.
    #[error("[{provider}] Conflicting update on record set '{record_name}'")]
    Conflict {
        /// Provider that produced the error.
        provider: String,
        /// Relative name of the record set.
        record_name: String,
        /// Original error message from the provider API, if available.
        raw_message: Option<String>,
    },

    /// No private zone encloses the requested name.
    #[error("[{provider}] Zone for '{domain}' not found{}", fmt_raw(.raw_message))]
    ZoneNotFound {
        /// Provider that produced the error.
        provider: String,
        /// The name (or zone candidate) that was looked up.
        domain: String,
        /// Original error message from the provider API, if available.
        raw_message: Option<String>,
    },

    /// The TXT record set does not exist.
    ///
    /// Reads and deletes treat this as absence rather than failure, so callers
    /// of the challenge operations never observe it.
    #[error("[{provider}] Record set '{record_name}' not found")]
    RecordNotFound {
        /// Provider that produced the error.
        provider: String,
        /// Relative name of the record set.
        record_name: String,
        /// Original error message from the provider API, if available.
        raw_message: Option<String>,
    },

    /// The effective FQDN does not extend the resolved zone.
    #[error("[{provider}] Cannot extract sub-domain of '{fqdn}' in zone '{zone}': {detail}")]
    SubDomainExtraction {
        /// Provider that produced the error.
        provider: String,
        /// The effective FQDN of the challenge.
        fqdn: String,
        /// The resolved zone name.
        zone: String,
        /// Why extraction failed.
        detail: String,
    },

    /// A request parameter is invalid (e.g., bad TTL value, malformed name).
    #[error("[{provider}] Invalid parameter '{param}': {detail}")]
    InvalidParameter {
        /// Provider that produced the error.
        provider: String,
        /// Name of the invalid parameter.
        param: String,
        /// Description of what's wrong.
        detail: String,
    },

    /// The provider configuration is incomplete or malformed.
    #[error("[{provider}] Configuration error: {detail}")]
    Configuration {
        /// Provider that produced the error.
        provider: String,
        /// Details about the configuration problem.
        detail: String,
    },

    /// Failed to parse the provider's API response.
    #[error("[{provider}] Parse error: {detail}")]
    ParseError {
        /// Provider that produced the error.
        provider: String,
        /// Details about the parse failure.
        detail: String,
    },

    /// Failed to serialize a request body.
    #[error("[{provider}] Serialization error: {detail}")]
    SerializationError {
        /// Provider that produced the error.
        provider: String,
        /// Details about the serialization failure.
        detail: String,
    },

    /// Any other non-success answer from the API.
    ///
    /// This is a catch-all for error codes not yet mapped to a specific variant.
    #[error("[{provider}] API error{}: {raw_message}", fmt_status(.status))]
    ApiError {
        /// Provider that produced the error.
        provider: String,
        /// HTTP status code, if the failure came from an HTTP response.
        status: Option<u16>,
        /// Raw error code from the API, if available.
        raw_code: Option<String>,
        /// Raw error message from the API.
        raw_message: String,
    },
}

fn fmt_raw(raw_message: &Option<String>) -> String {
    raw_message
        .as_ref()
        .map(|msg| format!(": {msg}"))
        .unwrap_or_default()
}

fn fmt_retry_after(retry_after: &Option<u64>) -> String {
    retry_after
        .map(|secs| format!(" (retry after {secs}s)"))
        .unwrap_or_default()
}

fn fmt_status(status: &Option<u16>) -> String {
    status
        .map(|code| format!(" (HTTP {code})"))
        .unwrap_or_default()
}

impl ProviderError {
    /// 是否为预期行为（配置错误、资源不存在等），用于日志分级。
    ///
    /// 返回 `true` 时应使用 `warn` 级别，`false` 时使用 `error` 级别。
    /// **新增变体时请同步更新此方法。**
    #[must_use]
    pub fn is_expected(&self) -> bool {
        matches!(
            self,
            Self::InvalidCredentials { .. }
                | Self::PermissionDenied { .. }
                | Self::QuotaExceeded { .. }
                | Self::ZoneNotFound { .. }
                | Self::RecordNotFound { .. }
                | Self::SubDomainExtraction { .. }
                | Self::InvalidParameter { .. }
                | Self::Configuration { .. }
        )
    }

    /// Whether the error is a "resource does not exist" answer.
    pub(crate) fn is_not_found(&self) -> bool {
        matches!(
            self,
            Self::RecordNotFound { .. } | Self::ZoneNotFound { .. }
        )
    }
}

/// Convenience type alias for `Result<T, ProviderError>`.
pub type Result<T> = std::result::Result<T, ProviderError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_network_error() {
        let e = ProviderError::NetworkError {
            provider: "azure-private".to_string(),
            detail: "connection refused".to_string(),
        };
        assert_eq!(
            e.to_string(),
            "[azure-private] Network error: connection refused"
        );
    }

    #[test]
    fn display_invalid_credentials_with_message() {
        let e = ProviderError::InvalidCredentials {
            provider: "azure-private".to_string(),
            raw_message: Some("token expired".to_string()),
        };
        assert_eq!(
            e.to_string(),
            "[azure-private] Invalid credentials: token expired"
        );
    }

    #[test]
    fn display_invalid_credentials_without_message() {
        let e = ProviderError::InvalidCredentials {
            provider: "azure-private".to_string(),
            raw_message: None,
        };
        assert_eq!(e.to_string(), "[azure-private] Invalid credentials");
    }

    #[test]
    fn display_rate_limited() {
        let with_retry = ProviderError::RateLimited {
            provider: "azure-private".to_string(),
            retry_after: Some(30),
            raw_message: None,
        };
        let without_retry = ProviderError::RateLimited {
            provider: "azure-private".to_string(),
            retry_after: None,
            raw_message: None,
        };
        assert_eq!(
            with_retry.to_string(),
            "[azure-private] Rate limited (retry after 30s)"
        );
        assert_eq!(without_retry.to_string(), "[azure-private] Rate limited");
    }

    #[test]
    fn display_zone_not_found() {
        let e = ProviderError::ZoneNotFound {
            provider: "azure-private".to_string(),
            domain: "_acme-challenge.example.com.".to_string(),
            raw_message: None,
        };
        assert_eq!(
            e.to_string(),
            "[azure-private] Zone for '_acme-challenge.example.com.' not found"
        );
    }

    #[test]
    fn display_sub_domain_extraction() {
        let e = ProviderError::SubDomainExtraction {
            provider: "azure-private".to_string(),
            fqdn: "_acme-challenge.example.org.".to_string(),
            zone: "example.com".to_string(),
            detail: "domain is not under the zone".to_string(),
        };
        assert_eq!(
            e.to_string(),
            "[azure-private] Cannot extract sub-domain of '_acme-challenge.example.org.' \
             in zone 'example.com': domain is not under the zone"
        );
    }

    #[test]
    fn display_api_error() {
        let with_status = ProviderError::ApiError {
            provider: "azure-private".to_string(),
            status: Some(500),
            raw_code: Some("InternalServerError".to_string()),
            raw_message: "boom".to_string(),
        };
        let without_status = ProviderError::ApiError {
            provider: "azure-private".to_string(),
            status: None,
            raw_code: None,
            raw_message: "boom".to_string(),
        };
        assert_eq!(
            with_status.to_string(),
            "[azure-private] API error (HTTP 500): boom"
        );
        assert_eq!(without_status.to_string(), "[azure-private] API error: boom");
    }

    #[test]
    fn serialize_json_tagged_by_code() {
        let e = ProviderError::RateLimited {
            provider: "azure-private".to_string(),
            retry_after: Some(60),
            raw_message: Some("too many requests".to_string()),
        };
        let json = serde_json::to_string(&e).unwrap();
        assert!(json.contains("\"code\":\"RateLimited\""));
        assert!(json.contains("\"retry_after\":60"));
    }

    #[test]
    fn deserialize_preserves_display() {
        let original = ProviderError::Conflict {
            provider: "azure-private".to_string(),
            record_name: "_acme-challenge".to_string(),
            raw_message: None,
        };
        let json = serde_json::to_string(&original).unwrap();
        let back: ProviderError = serde_json::from_str(&json).unwrap();
        assert_eq!(back.to_string(), original.to_string());
    }

    #[test]
    fn expected_errors() {
        assert!(
            ProviderError::ZoneNotFound {
                provider: "t".into(),
                domain: "x".into(),
                raw_message: None,
            }
            .is_expected()
        );
        assert!(
            !ProviderError::NetworkError {
                provider: "t".into(),
                detail: "x".into(),
            }
            .is_expected()
        );
        assert!(
            !ProviderError::ApiError {
                provider: "t".into(),
                status: Some(500),
                raw_code: None,
                raw_message: "x".into(),
            }
            .is_expected()
        );
    }

    #[test]
    fn not_found_errors() {
        assert!(
            ProviderError::RecordNotFound {
                provider: "t".into(),
                record_name: "x".into(),
                raw_message: None,
            }
            .is_not_found()
        );
        assert!(
            !ProviderError::PermissionDenied {
                provider: "t".into(),
                raw_message: None,
            }
            .is_not_found()
        );
    }
}
