//! # 配置模块
//!
//! ## 设计思路
//!
//! 将所有“可调策略”集中到 `ProcessorConfig`，保证运行时行为可观测、可调整、可测试。
//! `Default` 提供生产可用的保守配置；`validate` 在构建编排器或远程客户端前
//! 做一次性范围检查，避免运行中途才暴露非法参数。
//!
//! ## 实现思路
//!
//! - 体积 / 像素上限沿用解码阶段的防御性默认值。
//! - 远程超时默认 30 秒（原始行为未定义超时，此处显式补上并可配置）。
//! - `remote_endpoint` 允许为空：仅灰度链路不需要远程服务。

use super::ProcessError;

/// 图片处理配置。
///
/// 字段覆盖加载限制、解码限制与远程上色调用三个方面。
#[derive(Debug, Clone)]
pub struct ProcessorConfig {
    /// 读取原始字节时允许的最大文件体积（字节）。
    pub max_file_size: u64,
    /// 解码后的像素上限（`width * height`）。
    pub max_decoded_pixels: u64,
    /// 解码阶段允许的预计内存上限（按 RGBA 估算，字节）。
    pub max_decoded_bytes: u64,
    /// 远程上色服务地址（HTTP/HTTPS）。灰度模式可留空。
    pub remote_endpoint: String,
    /// 远程请求整体超时时间（秒）。
    pub remote_timeout_secs: u64,
    /// 建立连接（TCP/TLS）超时时间（秒）。
    pub connect_timeout_secs: u64,
}

impl Default for ProcessorConfig {
    fn default() -> Self {
        Self {
            max_file_size: 50 * 1024 * 1024,
            max_decoded_pixels: 40_000_000,
            max_decoded_bytes: 160 * 1024 * 1024,
            remote_endpoint: String::new(),
            remote_timeout_secs: 30,
            connect_timeout_secs: 8,
        }
    }
}

impl ProcessorConfig {
    /// 校验配置合法性。
    pub fn validate(&self) -> Result<(), ProcessError> {
        if self.max_file_size == 0 {
            return Err(ProcessError::InvalidFormat("max_file_size 不能为 0".to_string()));
        }
        if self.max_decoded_bytes < 8 * 1024 * 1024 {
            return Err(ProcessError::InvalidFormat("max_decoded_bytes 不能小于 8MB".to_string()));
        }
        if self.max_decoded_pixels == 0 {
            return Err(ProcessError::InvalidFormat("max_decoded_pixels 不能为 0".to_string()));
        }
        if !(1..=300).contains(&self.remote_timeout_secs) {
            return Err(ProcessError::InvalidFormat("remote_timeout_secs 必须在 1~300 秒之间".to_string()));
        }
        if !(1..=120).contains(&self.connect_timeout_secs) {
            return Err(ProcessError::InvalidFormat("connect_timeout_secs 必须在 1~120 秒之间".to_string()));
        }

        if !self.remote_endpoint.is_empty() {
            let parsed = reqwest::Url::parse(&self.remote_endpoint)
                .map_err(|e| ProcessError::InvalidFormat(format!("远程地址格式错误：{}", e)))?;

            if parsed.scheme() != "http" && parsed.scheme() != "https" {
                return Err(ProcessError::InvalidFormat("远程地址仅支持 HTTP/HTTPS".to_string()));
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        ProcessorConfig::default().validate().expect("默认配置应当合法");
    }

    #[test]
    fn rejects_invalid_remote_timeout() {
        let mut config = ProcessorConfig::default();
        config.remote_timeout_secs = 0;
        assert!(matches!(config.validate(), Err(ProcessError::InvalidFormat(_))));

        config.remote_timeout_secs = 301;
        assert!(matches!(config.validate(), Err(ProcessError::InvalidFormat(_))));
    }

    #[test]
    fn rejects_non_http_endpoint() {
        let mut config = ProcessorConfig::default();
        config.remote_endpoint = "ftp://example.com/colorize".to_string();
        assert!(matches!(config.validate(), Err(ProcessError::InvalidFormat(_))));
    }

    #[test]
    fn accepts_https_endpoint() {
        let mut config = ProcessorConfig::default();
        config.remote_endpoint = "https://api.example.com/functions/colorize-image".to_string();
        config.validate().expect("HTTPS 地址应当合法");
    }
}
