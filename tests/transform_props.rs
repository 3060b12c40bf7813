//! 灰度变换与编解码的性质测试（proptest）。

use proptest::prelude::*;

use image_colorizer::processor::{
    grayscale, ImageCodec, PixelBuffer, ProcessorConfig, RasterCodec,
};

fn buffer_from_pixels(pixels: Vec<[u8; 4]>) -> PixelBuffer {
    let width = pixels.len() as u32;
    let bytes: Vec<u8> = pixels.into_iter().flatten().collect();
    PixelBuffer::new(width, 1, bytes).expect("test buffer init failed")
}

proptest! {
    /// 任意输入：变换后每个像素 R==G==B，Alpha 逐像素保持不变。
    #[test]
    fn channels_equal_and_alpha_preserved(pixels in prop::collection::vec(any::<[u8; 4]>(), 1..64)) {
        let input = buffer_from_pixels(pixels);
        let output = grayscale(&input);

        prop_assert_eq!(output.width(), input.width());
        prop_assert_eq!(output.height(), input.height());

        for (before, after) in input.as_bytes().chunks_exact(4).zip(output.as_bytes().chunks_exact(4)) {
            prop_assert_eq!(after[0], after[1]);
            prop_assert_eq!(after[1], after[2]);
            prop_assert_eq!(after[3], before[3]);
        }
    }

    /// 幂等性：灰度图再灰度仍是自身（舍入稳定）。
    #[test]
    fn transform_is_idempotent(pixels in prop::collection::vec(any::<[u8; 4]>(), 1..64)) {
        let input = buffer_from_pixels(pixels);
        let once = grayscale(&input);
        let twice = grayscale(&once);
        prop_assert_eq!(once, twice);
    }

    /// 无损链路：变换结果经 PNG 编码再解码，像素级相等。
    #[test]
    fn png_round_trip_is_pixel_exact(pixels in prop::collection::vec(any::<[u8; 4]>(), 1..64)) {
        let codec = RasterCodec::new(&ProcessorConfig::default());
        let transformed = grayscale(&buffer_from_pixels(pixels));

        let encoded = codec.encode(&transformed).expect("PNG 编码失败");
        let decoded = codec.decode(&encoded).expect("PNG 解码失败");
        prop_assert_eq!(decoded, transformed);
    }
}
