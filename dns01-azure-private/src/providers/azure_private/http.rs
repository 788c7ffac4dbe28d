//! Azure Resource Manager HTTP 请求方法

use reqwest::Method;
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::http_client::HttpUtils;
use crate::providers::common::join_url;
use crate::traits::{ErrorContext, ProviderErrorMapper, RawApiError};

use super::types::ErrorResponse;
use super::{API_VERSION, AzurePrivateDnsProvider};

impl AzurePrivateDnsProvider {
    // ==================== 路径构建 ====================

    /// `.../privateDnsZones/{zone}`
    pub(crate) fn zone_path(&self, zone: &str) -> String {
        format!(
            "/subscriptions/{}/resourceGroups/{}/providers/Microsoft.Network/privateDnsZones/{}",
            urlencoding::encode(&self.config.subscription_id),
            urlencoding::encode(&self.config.resource_group),
            urlencoding::encode(zone)
        )
    }

    /// `.../privateDnsZones/{zone}/TXT/{name}`
    pub(crate) fn txt_record_set_path(&self, zone: &str, name: &str) -> String {
        format!("{}/TXT/{}", self.zone_path(zone), urlencoding::encode(name))
    }

    // ==================== 辅助方法 ====================

    /// 统一处理响应错误
    fn handle_response_error(&self, status: u16, response_text: &str, ctx: ErrorContext) -> Result<()> {
        if (200..300).contains(&status) {
            return Ok(());
        }

        // 尝试解析结构化错误
        if let Ok(ErrorResponse {
            error: Some(detail),
        }) = serde_json::from_str::<ErrorResponse>(response_text)
        {
            let message = detail.message.unwrap_or_default();
            let raw = match detail.code {
                Some(code) => RawApiError::with_code(status, code, message),
                None => RawApiError::new(status, message),
            };
            return Err(self.map_error(raw, ctx));
        }

        // 回退到通用错误（按状态码映射）
        Err(self.map_error(RawApiError::new(status, format!("HTTP {status}: {response_text}")), ctx))
    }

    /// 发送请求（带认证头与 api-version），返回状态码和响应体
    async fn send<B: Serialize>(
        &self,
        method: Method,
        path: &str,
        body: Option<&B>,
        ctx: ErrorContext,
    ) -> Result<(u16, String)> {
        let url = format!(
            "{}?api-version={API_VERSION}",
            join_url(&self.config.resource_manager_endpoint, path)
        );
        let authorization = self.authorizer.authorization_header().await?;

        let mut request = self
            .client
            .request(method.clone(), &url)
            .header(reqwest::header::AUTHORIZATION, authorization);

        if let Some(body) = body {
            let payload = serde_json::to_string(body).map_err(|e| self.serialization_error(e))?;
            log::debug!("[{}] Request Body: {payload}", self.provider_name());
            request = request
                .header(reqwest::header::CONTENT_TYPE, "application/json")
                .body(payload);
        }

        let (status, response_text) = HttpUtils::execute_request_with_retry(
            request,
            self.provider_name(),
            method.as_str(),
            &url,
            self.max_retries,
        )
        .await?;

        self.handle_response_error(status, &response_text, ctx)?;
        Ok((status, response_text))
    }

    // ==================== 公开 API 方法 ====================

    /// 执行 GET 请求
    pub(crate) async fn get<T: for<'de> Deserialize<'de>>(
        &self,
        path: &str,
        ctx: ErrorContext,
    ) -> Result<T> {
        let (_, response_text) = self.send::<()>(Method::GET, path, None, ctx).await?;
        HttpUtils::parse_json(&response_text, self.provider_name())
    }

    /// 执行 PUT 请求（create-or-update）
    pub(crate) async fn put<T: for<'de> Deserialize<'de>, B: Serialize>(
        &self,
        path: &str,
        body: &B,
        ctx: ErrorContext,
    ) -> Result<T> {
        let (_, response_text) = self.send(Method::PUT, path, Some(body), ctx).await?;
        HttpUtils::parse_json(&response_text, self.provider_name())
    }

    /// 执行 DELETE 请求
    pub(crate) async fn delete(&self, path: &str, ctx: ErrorContext) -> Result<()> {
        self.send::<()>(Method::DELETE, path, None, ctx).await?;
        Ok(())
    }
}
