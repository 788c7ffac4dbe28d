use async_trait::async_trait;

use crate::error::{ProviderError, Result};
use crate::types::TimeoutPolicy;

/// 原始 API 错误（内部使用）
#[derive(Debug, Clone)]
pub(crate) struct RawApiError {
    /// HTTP 状态码
    pub status: Option<u16>,
    /// 错误码（如 `ResourceNotFound`）
    pub code: Option<String>,
    /// 原始错误消息
    pub message: String,
}

impl RawApiError {
    pub fn new(status: u16, message: impl Into<String>) -> Self {
        Self {
            status: Some(status),
            code: None,
            message: message.into(),
        }
    }

    pub fn with_code(status: u16, code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            status: Some(status),
            code: Some(code.into()),
            message: message.into(),
        }
    }
}

/// 错误上下文信息（内部使用）
/// 用于在映射错误时提供额外信息
#[derive(Debug, Clone, Default)]
pub(crate) struct ErrorContext {
    /// 相对记录名（用于 `RecordNotFound` / `Conflict`）
    pub record_name: Option<String>,
    /// Zone 名称（用于 `ZoneNotFound`）
    pub zone: Option<String>,
}

impl ErrorContext {
    pub fn zone(zone: &str) -> Self {
        Self {
            zone: Some(zone.to_string()),
            record_name: None,
        }
    }

    pub fn record(zone: &str, record_name: &str) -> Self {
        Self {
            zone: Some(zone.to_string()),
            record_name: Some(record_name.to_string()),
        }
    }
}

/// Provider 错误映射 Trait（内部使用）
/// 将原始 API 错误映射到统一错误类型
pub(crate) trait ProviderErrorMapper {
    /// 返回 Provider 标识符
    fn provider_name(&self) -> &'static str;

    /// 将原始 API 错误映射到统一错误类型
    fn map_error(&self, raw: RawApiError, context: ErrorContext) -> ProviderError;

    /// 快捷方法：序列化错误
    fn serialization_error(&self, detail: impl ToString) -> ProviderError {
        ProviderError::SerializationError {
            provider: self.provider_name().to_string(),
            detail: detail.to_string(),
        }
    }

    /// 快捷方法：未知错误（fallback）
    fn unknown_error(&self, raw: RawApiError) -> ProviderError {
        ProviderError::ApiError {
            provider: self.provider_name().to_string(),
            status: raw.status,
            raw_code: raw.code,
            raw_message: raw.message,
        }
    }
}

/// A DNS-01 challenge solver.
///
/// The caller drives the lifecycle: [`present`](Self::present), then waits for
/// propagation using [`timeout`](Self::timeout), lets the CA validate, and
/// finally calls [`cleanup`](Self::cleanup). Each call is independent; no
/// state carries over between them.
#[async_trait]
pub trait ChallengeProvider: Send + Sync {
    /// 提供商标识符
    fn id(&self) -> &'static str;

    /// Publishes the TXT record for the challenge of `domain`.
    ///
    /// `token` is part of the ACME interface but not needed to derive the record.
    async fn present(&self, domain: &str, token: &str, key_auth: &str) -> Result<()>;

    /// Removes the TXT record published by [`present`](Self::present).
    async fn cleanup(&self, domain: &str, token: &str, key_auth: &str) -> Result<()>;

    /// Propagation timeout and polling interval the caller should use.
    fn timeout(&self) -> TimeoutPolicy;
}
