//! # 图片编解码适配模块
//!
//! ## 设计思路
//!
//! 通过 `ImageCodec` 能力接口隔离具体编解码库，编排器只依赖接口，
//! 便于按目标平台替换实现。附带的 `RasterCodec` 基于 `image` crate，
//! 支持 JPEG / PNG / WebP 等常见光栅格式解码，编码固定输出无损 PNG。
//!
//! ## 实现思路
//!
//! 解码端优先做尺寸检查，再进行完整解码，降低恶意输入触发高内存开销的风险：
//! 1. 猜测格式并读取 header 尺寸
//! 2. 按像素 / 内存上限快速拒绝
//! 3. 完整解码并转换 RGBA
//! 4. 校验字节长度一致性

use image::{DynamicImage, GenericImageView, ImageBuffer, ImageFormat, ImageReader, Rgba};
use std::io::Cursor;

use super::{EncodedImage, PixelBuffer, ProcessError, ProcessorConfig};

/// 编解码能力接口。
pub trait ImageCodec {
    /// 将编码图片解码为 RGBA 像素缓冲。
    fn decode(&self, image: &EncodedImage) -> Result<PixelBuffer, ProcessError>;

    /// 将像素缓冲编码为无损 PNG。
    ///
    /// 要求 `decode(encode(p))` 与 `p` 像素级相等（字节级编码结果依实现而定）。
    fn encode(&self, buffer: &PixelBuffer) -> Result<EncodedImage, ProcessError>;
}

/// 基于 `image` crate 的默认实现。
pub struct RasterCodec {
    max_decoded_pixels: u64,
    max_decoded_bytes: u64,
}

impl RasterCodec {
    pub fn new(config: &ProcessorConfig) -> Self {
        Self {
            max_decoded_pixels: config.max_decoded_pixels,
            max_decoded_bytes: config.max_decoded_bytes,
        }
    }

    /// 仅通过内存中的图片头信息读取宽高。
    ///
    /// 用于在完整解码前做像素限制检查。
    fn inspect_dimensions_from_memory(bytes: &[u8]) -> Result<(u32, u32), ProcessError> {
        let cursor = Cursor::new(bytes);
        let reader = ImageReader::new(cursor)
            .with_guessed_format()
            .map_err(|e| ProcessError::InvalidFormat(format!("无法识别图片格式：{}", e)))?;

        reader
            .into_dimensions()
            .map_err(|e| ProcessError::Decode(format!("无法读取图片尺寸：{}", e)))
    }

    /// 校验像素数量与预计解码内存是否超过配置上限。
    fn validate_decode_limits(&self, width: u32, height: u32) -> Result<(), ProcessError> {
        let pixels = (width as u64)
            .checked_mul(height as u64)
            .ok_or_else(|| ProcessError::ResourceLimit("图片像素数溢出".to_string()))?;

        if pixels > self.max_decoded_pixels {
            return Err(ProcessError::ResourceLimit(format!(
                "图片像素过大：{} 像素（限制：{} 像素）",
                pixels, self.max_decoded_pixels
            )));
        }

        let estimated = pixels
            .checked_mul(4)
            .ok_or_else(|| ProcessError::ResourceLimit("图片解码内存估算溢出".to_string()))?;

        if estimated > self.max_decoded_bytes {
            return Err(ProcessError::ResourceLimit(format!(
                "图片解码预计内存过大：{:.2} MB（限制：{:.2} MB）",
                estimated as f64 / 1024.0 / 1024.0,
                self.max_decoded_bytes as f64 / 1024.0 / 1024.0
            )));
        }

        Ok(())
    }
}

impl ImageCodec for RasterCodec {
    fn decode(&self, image: &EncodedImage) -> Result<PixelBuffer, ProcessError> {
        let bytes = image.as_bytes();

        let _format: ImageFormat = image::guess_format(bytes)
            .map_err(|e| ProcessError::Decode(format!("不支持的图片格式：{}", e)))?;

        let (header_width, header_height) = Self::inspect_dimensions_from_memory(bytes)?;
        self.validate_decode_limits(header_width, header_height)?;

        let decoded = image::load_from_memory(bytes)
            .map_err(|e| ProcessError::Decode(format!("图片解码失败：{}", e)))?;

        let (width, height) = decoded.dimensions();
        self.validate_decode_limits(width, height)?;

        let rgba = decoded.to_rgba8();
        let buffer = PixelBuffer::new(width, height, rgba.into_raw())?;

        log::debug!(
            "🖼️ 图片解码成功 - 格式: {} 尺寸: {}x{}",
            image.mime(),
            width,
            height
        );

        Ok(buffer)
    }

    fn encode(&self, buffer: &PixelBuffer) -> Result<EncodedImage, ProcessError> {
        let rgba = ImageBuffer::<Rgba<u8>, Vec<u8>>::from_raw(
            buffer.width(),
            buffer.height(),
            buffer.as_bytes().to_vec(),
        )
        .ok_or_else(|| ProcessError::Encode("像素缓冲长度与尺寸不一致".to_string()))?;

        let mut cursor = Cursor::new(Vec::new());
        DynamicImage::ImageRgba8(rgba)
            .write_to(&mut cursor, ImageFormat::Png)
            .map_err(|e| ProcessError::Encode(format!("PNG 编码失败：{}", e)))?;

        EncodedImage::from_bytes(cursor.into_inner())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn codec() -> RasterCodec {
        RasterCodec::new(&ProcessorConfig::default())
    }

    fn gradient_buffer(width: u32, height: u32) -> PixelBuffer {
        let mut bytes = Vec::with_capacity((width * height * 4) as usize);
        for y in 0..height {
            for x in 0..width {
                bytes.extend_from_slice(&[
                    (x % 256) as u8,
                    (y % 256) as u8,
                    ((x + y) % 256) as u8,
                    255,
                ]);
            }
        }
        PixelBuffer::new(width, height, bytes).expect("test buffer init failed")
    }

    fn encode_as(format: ImageFormat, width: u32, height: u32) -> EncodedImage {
        let img = image::RgbaImage::from_fn(width, height, |x, y| {
            image::Rgba([(x % 256) as u8, (y % 256) as u8, 128, 255])
        });
        let mut cursor = Cursor::new(Vec::new());
        // JPEG 不支持 Alpha，先转 RGB 再编码
        let dyn_img = if format == ImageFormat::Jpeg {
            DynamicImage::ImageRgb8(DynamicImage::ImageRgba8(img).to_rgb8())
        } else {
            DynamicImage::ImageRgba8(img)
        };
        dyn_img
            .write_to(&mut cursor, format)
            .expect("failed to encode test image");
        EncodedImage::from_bytes(cursor.into_inner()).expect("test image signature invalid")
    }

    #[test]
    fn png_round_trip_is_pixel_exact() {
        let codec = codec();
        let buffer = gradient_buffer(13, 7);

        let encoded = codec.encode(&buffer).expect("PNG 编码失败");
        assert_eq!(encoded.mime(), "image/png");

        let decoded = codec.decode(&encoded).expect("PNG 解码失败");
        assert_eq!(decoded, buffer);
    }

    #[test]
    fn decodes_jpeg_with_matching_dimensions() {
        let codec = codec();
        let encoded = encode_as(ImageFormat::Jpeg, 32, 20);

        let decoded = codec.decode(&encoded).expect("JPEG 解码失败");
        assert_eq!(decoded.width(), 32);
        assert_eq!(decoded.height(), 20);
        assert_eq!(decoded.as_bytes().len(), 32 * 20 * 4);
    }

    #[test]
    fn decode_rejects_corrupt_payload() {
        let codec = codec();
        // PNG 签名 + 截断的垃圾内容
        let mut bytes = vec![0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A];
        bytes.extend_from_slice(&[0u8; 16]);
        let encoded = EncodedImage::from_bytes(bytes).expect("PNG 签名应当可识别");

        assert!(matches!(
            codec.decode(&encoded),
            Err(ProcessError::Decode(_))
        ));
    }

    #[test]
    fn decode_rejects_too_many_pixels() {
        let mut config = ProcessorConfig::default();
        config.max_decoded_pixels = 1_000;
        let codec = RasterCodec::new(&config);

        let encoded = encode_as(ImageFormat::Png, 100, 100);
        assert!(matches!(
            codec.decode(&encoded),
            Err(ProcessError::ResourceLimit(_))
        ));
    }
}
