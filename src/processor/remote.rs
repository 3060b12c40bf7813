//! # 远程上色客户端模块
//!
//! ## 设计思路
//!
//! 远程上色服务是外部协作方：请求体 `{ "imageData": <data URI> }`，
//! 成功响应 `{ "colorizedImage": <data URI> }`。客户端只负责一次
//! 请求 / 响应与失败分类，不做自动重试：
//!
//! - HTTP 429 → `RemoteRateLimited`
//! - HTTP 402 → `RemotePaymentRequired`
//! - 2xx 但缺少 `colorizedImage` → `RemoteNoResult`
//! - 其他（含超时）→ `RemoteUnknown`
//!
//! 通过 `RemoteColorizer` 能力接口隔离传输细节，编排器与测试可注入替身。

use std::time::Duration;

use super::{ProcessError, ProcessorConfig};

/// 远程上色能力接口。
pub trait RemoteColorizer {
    /// 发送原图 data URI，返回上色结果 data URI。
    fn colorize(
        &self,
        image_data: &str,
    ) -> impl Future<Output = Result<String, ProcessError>> + Send;
}

#[derive(Debug, serde::Serialize)]
struct ColorizeRequest<'a> {
    #[serde(rename = "imageData")]
    image_data: &'a str,
}

#[derive(Debug, serde::Deserialize)]
struct ColorizeResponse {
    #[serde(rename = "colorizedImage")]
    colorized_image: Option<String>,
}

/// 基于 reqwest 的默认实现。
pub struct HttpRemoteColorizer {
    client: reqwest::Client,
    endpoint: String,
    timeout_secs: u64,
}

impl HttpRemoteColorizer {
    /// 根据配置构建客户端（复用连接池，超时在构建期固定）。
    ///
    /// 地址允许为空：仅灰度链路时远程客户端不会被调用，
    /// 空地址在 `colorize` 调用时才报错。
    pub fn new(config: &ProcessorConfig) -> Result<Self, ProcessError> {
        config.validate()?;

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.remote_timeout_secs))
            .connect_timeout(Duration::from_secs(config.connect_timeout_secs))
            .build()
            .map_err(|e| ProcessError::RemoteUnknown(format!("无法创建 HTTP 客户端：{}", e)))?;

        Ok(Self {
            client,
            endpoint: config.remote_endpoint.clone(),
            timeout_secs: config.remote_timeout_secs,
        })
    }

    /// 统一映射 reqwest 传输错误。超时按约定归入 `RemoteUnknown`。
    fn map_transport_error(&self, e: reqwest::Error) -> ProcessError {
        if e.is_timeout() {
            ProcessError::RemoteUnknown(format!("请求超时（{}秒）", self.timeout_secs))
        } else if e.is_connect() {
            ProcessError::RemoteUnknown(format!("无法连接远程服务：{}", e))
        } else {
            ProcessError::RemoteUnknown(format!("请求失败：{}", e))
        }
    }
}

/// 按 HTTP 状态码分类失败。成功状态返回 `None`。
pub(crate) fn classify_status(status: reqwest::StatusCode) -> Option<ProcessError> {
    if status.is_success() {
        return None;
    }

    Some(match status.as_u16() {
        429 => ProcessError::RemoteRateLimited,
        402 => ProcessError::RemotePaymentRequired,
        code => ProcessError::RemoteUnknown(format!("HTTP {}", code)),
    })
}

impl RemoteColorizer for HttpRemoteColorizer {
    async fn colorize(&self, image_data: &str) -> Result<String, ProcessError> {
        if self.endpoint.is_empty() {
            return Err(ProcessError::InvalidFormat("远程上色服务地址未配置".to_string()));
        }

        log::info!("🌐 调用远程上色服务 - endpoint: {}", self.endpoint);

        let response = self
            .client
            .post(&self.endpoint)
            .json(&ColorizeRequest { image_data })
            .send()
            .await
            .map_err(|e| self.map_transport_error(e))?;

        if let Some(err) = classify_status(response.status()) {
            return Err(err);
        }

        let body: ColorizeResponse = response
            .json()
            .await
            .map_err(|e| ProcessError::RemoteUnknown(format!("响应解析失败：{}", e)))?;

        match body.colorized_image {
            Some(colorized) if !colorized.is_empty() => Ok(colorized),
            _ => Err(ProcessError::RemoteNoResult),
        }
    }
}
