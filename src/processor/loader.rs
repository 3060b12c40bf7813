//! # 加载与校验模块
//!
//! ## 设计思路
//!
//! 统一处理不同来源（本地文件 / 内存字节 / Base64）的原始字节加载，
//! 并在“尽可能早”的阶段执行输入校验：先查体积，再查文件签名，
//! 非图片输入在进入编解码器之前就被拒绝。

use std::path::Path;

use super::{EncodedImage, ImageInput, ProcessError, ProcessorConfig};

/// 将上传来源加载为已校验的编码图片。
pub(crate) fn load_input(
    input: ImageInput,
    config: &ProcessorConfig,
) -> Result<EncodedImage, ProcessError> {
    match input {
        ImageInput::FilePath(path) => load_from_file(&path, config),
        ImageInput::Bytes(bytes) => load_from_bytes(bytes, config),
        ImageInput::Base64(data) => {
            log::info!("📝 开始处理 base64 图片");
            EncodedImage::from_data_uri(&data, config.max_file_size)
        }
    }
}

/// 从本地路径加载图片原始字节。
fn load_from_file(path: &str, config: &ProcessorConfig) -> Result<EncodedImage, ProcessError> {
    log::info!("📁 开始读取本地图片 - 路径: {}", path);

    let file_path = Path::new(path);
    if !file_path.exists() {
        return Err(ProcessError::Load(format!("文件不存在：{}", path)));
    }

    let metadata = std::fs::metadata(file_path)
        .map_err(|e| ProcessError::Load(format!("无法读取文件信息：{}", e)))?;

    if metadata.len() > config.max_file_size {
        return Err(ProcessError::ResourceLimit(format!(
            "文件过大：{:.2} MB（限制：{:.2} MB）",
            metadata.len() as f64 / 1024.0 / 1024.0,
            config.max_file_size as f64 / 1024.0 / 1024.0
        )));
    }

    let bytes = std::fs::read(file_path)
        .map_err(|e| ProcessError::Load(format!("无法读取图片文件：{}", e)))?;

    EncodedImage::from_bytes(bytes)
}

/// 校验内存字节并包装为编码图片。
fn load_from_bytes(bytes: Vec<u8>, config: &ProcessorConfig) -> Result<EncodedImage, ProcessError> {
    if bytes.len() as u64 > config.max_file_size {
        return Err(ProcessError::ResourceLimit(format!(
            "图片体积过大：{:.2} MB（限制：{:.2} MB）",
            bytes.len() as f64 / 1024.0 / 1024.0,
            config.max_file_size as f64 / 1024.0 / 1024.0
        )));
    }

    EncodedImage::from_bytes(bytes)
}
