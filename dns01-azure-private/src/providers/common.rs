//! Provider 公共工具函数

use std::time::Duration;

use reqwest::Client;

use crate::PROVIDER_ID;
use crate::error::{ProviderError, Result};

/// 默认连接超时（秒）
const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 10;
/// 默认请求超时（秒）
const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

/// 创建带超时配置的 HTTP Client
pub fn create_http_client() -> Result<Client> {
    Client::builder()
        .connect_timeout(Duration::from_secs(DEFAULT_CONNECT_TIMEOUT_SECS))
        .timeout(Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS))
        .build()
        .map_err(|e| ProviderError::Configuration {
            provider: PROVIDER_ID.to_string(),
            detail: format!("Failed to create HTTP client: {e}"),
        })
}

/// Joins a base URL and a path that starts with `/`, tolerating a trailing
/// slash on the base.
///
/// 如: "https://management.azure.com/" + "/subscriptions" -> "https://management.azure.com/subscriptions"
pub fn join_url(base: &str, path: &str) -> String {
    format!("{}{path}", base.trim_end_matches('/'))
}
