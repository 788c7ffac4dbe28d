//! Azure Resource Manager 错误映射
//!
//! 参考: <https://learn.microsoft.com/azure/azure-resource-manager/troubleshooting/common-deployment-errors>
//!
//! 优先按 `error.code` 映射；未识别的错误码再按 HTTP 状态码兜底，最后回退到 `ApiError`。

use crate::PROVIDER_ID;
use crate::error::ProviderError;
use crate::traits::{ErrorContext, ProviderErrorMapper, RawApiError};

use super::AzurePrivateDnsProvider;

impl ProviderErrorMapper for AzurePrivateDnsProvider {
    fn provider_name(&self) -> &'static str {
        PROVIDER_ID
    }

    fn map_error(&self, raw: RawApiError, context: ErrorContext) -> ProviderError {
        let provider = self.provider_name().to_string();

        match raw.code.as_deref() {
            // ============ 认证错误 ============
            Some(
                "AuthenticationFailed"
                | "AuthenticationFailedInvalidHeader"
                | "InvalidAuthenticationToken"
                | "InvalidAuthenticationTokenAudience"
                | "InvalidAuthenticationTokenTenant"
                | "ExpiredAuthenticationToken",
            ) => ProviderError::InvalidCredentials {
                provider,
                raw_message: Some(raw.message),
            },

            // ============ 权限/资源锁 ============
            Some("AuthorizationFailed" | "LinkedAuthorizationFailed" | "ScopeLocked") => {
                ProviderError::PermissionDenied {
                    provider,
                    raw_message: Some(raw.message),
                }
            }

            // ============ 订阅/资源组配置错误（不应继续查找 zone） ============
            Some("SubscriptionNotFound" | "InvalidSubscriptionId") => {
                ProviderError::InvalidParameter {
                    provider,
                    param: "subscription_id".to_string(),
                    detail: raw.message,
                }
            }
            Some("ResourceGroupNotFound") => ProviderError::InvalidParameter {
                provider,
                param: "resource_group".to_string(),
                detail: raw.message,
            },

            // ============ 父资源（zone）不存在 ============
            Some("ParentResourceNotFound") => ProviderError::ZoneNotFound {
                provider,
                domain: context.zone.unwrap_or_default(),
                raw_message: Some(raw.message),
            },

            // ============ 资源不存在 ============
            Some("ResourceNotFound" | "NotFound") => self.not_found(raw, context),

            // ============ 并发冲突 ============
            Some("PreconditionFailed" | "Conflict" | "AnotherOperationInProgress") => {
                ProviderError::Conflict {
                    provider,
                    record_name: context.record_name.unwrap_or_default(),
                    raw_message: Some(raw.message),
                }
            }

            // ============ 配额 ============
            Some(
                "QuotaExceeded"
                | "MaxNumberOfRecordSetsInZoneExceeded"
                | "MaxNumberOfRecordsInRecordSetExceeded",
            ) => ProviderError::QuotaExceeded {
                provider,
                raw_message: Some(raw.message),
            },

            // ============ 参数无效 ============
            Some(
                code @ ("BadRequest"
                | "InvalidRequestFormat"
                | "InvalidRequestContent"
                | "InvalidResourceName"
                | "InvalidRecordSetTtl"
                | "InvalidTxtRecord"),
            ) => {
                let param = match code {
                    "InvalidResourceName" => "name",
                    "InvalidRecordSetTtl" => "ttl",
                    "InvalidTxtRecord" => "value",
                    _ => "request",
                };
                ProviderError::InvalidParameter {
                    provider,
                    param: param.to_string(),
                    detail: raw.message,
                }
            }

            // ============ 按 HTTP 状态码兜底 ============
            _ => match raw.status {
                Some(401) => ProviderError::InvalidCredentials {
                    provider,
                    raw_message: Some(raw.message),
                },
                Some(403) => ProviderError::PermissionDenied {
                    provider,
                    raw_message: Some(raw.message),
                },
                Some(404) => self.not_found(raw, context),
                Some(409 | 412) => ProviderError::Conflict {
                    provider,
                    record_name: context.record_name.unwrap_or_default(),
                    raw_message: Some(raw.message),
                },
                _ => self.unknown_error(raw),
            },
        }
    }
}

impl AzurePrivateDnsProvider {
    /// 404 on a record path means the record set, otherwise the zone.
    fn not_found(&self, raw: RawApiError, context: ErrorContext) -> ProviderError {
        match context.record_name {
            Some(record_name) => ProviderError::RecordNotFound {
                provider: self.provider_name().to_string(),
                record_name,
                raw_message: Some(raw.message),
            },
            None => ProviderError::ZoneNotFound {
                provider: self.provider_name().to_string(),
                domain: context.zone.unwrap_or_default(),
                raw_message: Some(raw.message),
            },
        }
    }
}
