//! # 数据模型模块
//!
//! ## 设计思路
//!
//! 将“外部输入类型”和“流水线中间结果”解耦：
//! - `ImageInput` 表示上传来源语义（路径 / 字节 / Base64）
//! - `EncodedImage` 表示已编码但未解码的图片（保留原始格式字节）
//! - `PixelBuffer` 表示解码后的 RGBA 像素数据
//! - `ImageArtifact` 表示编排器持有的“原图 / 结果图”产物
//!
//! 原始应用全程以 data URI 传递图片，因此 `EncodedImage` 自带
//! data URI 双向转换；解码端在解码前按 Base64 字符数估算解码体积上限，
//! 超限时在解码前快速拒绝。

use base64::{Engine as _, engine::general_purpose};

use super::ProcessError;

/// 图片上传来源。
pub enum ImageInput {
    /// 本地文件路径来源。
    FilePath(String),
    /// 已读入内存的原始字节。
    Bytes(Vec<u8>),
    /// Base64（支持 Data URL 与纯 Base64 字符串）。
    Base64(String),
}

/// 解码后的 RGBA 像素缓冲。
///
/// 不变量：`bytes.len() == width * height * 4`，由构造函数保证。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PixelBuffer {
    width: u32,
    height: u32,
    pub(crate) bytes: Vec<u8>,
}

impl PixelBuffer {
    /// 构造像素缓冲并校验长度不变量。
    pub fn new(width: u32, height: u32, bytes: Vec<u8>) -> Result<Self, ProcessError> {
        let expected_len = (width as usize)
            .checked_mul(height as usize)
            .and_then(|pixels| pixels.checked_mul(4))
            .ok_or_else(|| ProcessError::ResourceLimit("图片尺寸导致内存溢出风险".to_string()))?;

        if bytes.len() != expected_len {
            return Err(ProcessError::Decode(format!(
                "像素数据长度异常：{}（期望 {}）",
                bytes.len(),
                expected_len
            )));
        }

        Ok(Self { width, height, bytes })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// RGBA 字节视图（`width * height * 4`）。
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }
}

/// 已编码的图片：原始字节 + 嗅探得到的 MIME 类型。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedImage {
    bytes: Vec<u8>,
    mime: &'static str,
}

impl EncodedImage {
    /// 从原始字节构造，要求文件签名（magic bytes）是图片类型。
    pub fn from_bytes(bytes: Vec<u8>) -> Result<Self, ProcessError> {
        if bytes.is_empty() {
            return Err(ProcessError::InvalidFormat("图片内容为空".to_string()));
        }

        let kind = infer::get(&bytes)
            .ok_or_else(|| ProcessError::InvalidFormat("无法识别图片类型".to_string()))?;

        if kind.matcher_type() != infer::MatcherType::Image {
            return Err(ProcessError::InvalidFormat(format!(
                "文件签名不是图片类型：{}",
                kind.mime_type()
            )));
        }

        Ok(Self {
            bytes,
            mime: kind.mime_type(),
        })
    }

    /// 解析 data URI（或纯 Base64 字符串）为编码图片。
    ///
    /// 解码前按 Base64 字符数估算解码体积上限，超限直接拒绝。
    pub fn from_data_uri(data: &str, max_file_size: u64) -> Result<Self, ProcessError> {
        let normalized = data.trim();

        let base64_data = if normalized.starts_with("data:image/") {
            let base64_start = normalized
                .find(";base64,")
                .ok_or_else(|| ProcessError::InvalidFormat("缺少 base64 标记".to_string()))?;
            &normalized[base64_start + 8..]
        } else {
            normalized
        };

        let estimated_len = estimate_base64_decoded_upper_bound_len(base64_data)?;
        if estimated_len > max_file_size {
            return Err(ProcessError::ResourceLimit(format!(
                "Base64 预计解码体积过大：{:.2} MB（限制：{:.2} MB）",
                estimated_len as f64 / 1024.0 / 1024.0,
                max_file_size as f64 / 1024.0 / 1024.0
            )));
        }

        let bytes = general_purpose::STANDARD
            .decode(base64_data)
            .map_err(|e| ProcessError::Decode(format!("Base64 解码失败：{}", e)))?;

        Self::from_bytes(bytes)
    }

    /// 输出为自包含的 data URI，可直接展示或下载。
    pub fn to_data_uri(&self) -> String {
        format!(
            "data:{};base64,{}",
            self.mime,
            general_purpose::STANDARD.encode(&self.bytes)
        )
    }

    pub fn mime(&self) -> &'static str {
        self.mime
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }
}

/// 估算 Base64 解码后体积上限（每 4 字符解出 3 字节）。
fn estimate_base64_decoded_upper_bound_len(base64_data: &str) -> Result<u64, ProcessError> {
    let len = base64_data.trim().len() as u64;
    let groups = len
        .checked_add(3)
        .ok_or_else(|| ProcessError::ResourceLimit("Base64 输入长度溢出".to_string()))?
        / 4;

    groups
        .checked_mul(3)
        .ok_or_else(|| ProcessError::ResourceLimit("Base64 解码体积估算溢出".to_string()))
}

/// 产物角色：上传原图或处理结果。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArtifactRole {
    Original,
    Processed,
}

/// 编排器持有的图片产物。
///
/// 原图保留上传时的原始格式字节；结果图固定为 PNG。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageArtifact {
    pub image: EncodedImage,
    pub role: ArtifactRole,
}

/// 处理模式（面向产品语义）。
///
/// - `Colorize`：调用远程服务为黑白图上色
/// - `Grayscale`：本地转换为灰度
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Colorize,
    Grayscale,
}

impl Mode {
    /// 从外部字符串解析模式。
    pub fn from_str(mode: &str) -> Result<Self, ProcessError> {
        match mode.trim().to_lowercase().as_str() {
            "colorize" => Ok(Self::Colorize),
            "grayscale" => Ok(Self::Grayscale),
            other => Err(ProcessError::InvalidFormat(format!(
                "未知处理模式：{}（可选：colorize / grayscale）",
                other
            ))),
        }
    }

    /// 将模式输出为稳定字符串，供展示与导出文件名使用。
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Colorize => "colorize",
            Self::Grayscale => "grayscale",
        }
    }
}

/// 编排器处理状态。
///
/// 状态仅由编排器持有与变更：
/// `Idle → Loading → Processing → {Succeeded, Failed}`。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProcessingState {
    Idle,
    Loading,
    Processing,
    Succeeded,
    Failed,
}

impl ProcessingState {
    /// 是否处于不可打断的处理中状态。
    pub fn is_busy(self) -> bool {
        matches!(self, Self::Loading | Self::Processing)
    }
}
