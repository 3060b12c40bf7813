//! # 灰度变换模块
//!
//! ## 设计思路
//!
//! 纯函数实现 ITU-R BT.601 亮度加权灰度：
//! `Y = round(R*0.299 + G*0.587 + B*0.114)`，R/G/B 三通道统一写入 Y，
//! Alpha 通道保持不变。无副作用，时间复杂度 O(width*height)。
//!
//! 三通道相等时加权和仍等于原值（舍入后），因此变换具有幂等性。

use super::PixelBuffer;

const WEIGHT_R: f64 = 0.299;
const WEIGHT_G: f64 = 0.587;
const WEIGHT_B: f64 = 0.114;

/// 生成输入缓冲的灰度副本，不修改输入。
pub fn grayscale(buffer: &PixelBuffer) -> PixelBuffer {
    let mut output = buffer.clone();
    grayscale_in_place(&mut output);
    output
}

/// 就地灰度变换（调用方独占缓冲时避免一次拷贝）。
pub fn grayscale_in_place(buffer: &mut PixelBuffer) {
    for pixel in buffer.bytes.chunks_exact_mut(4) {
        let luma = (pixel[0] as f64) * WEIGHT_R
            + (pixel[1] as f64) * WEIGHT_G
            + (pixel[2] as f64) * WEIGHT_B;
        let gray = luma.round().clamp(0.0, 255.0) as u8;

        pixel[0] = gray;
        pixel[1] = gray;
        pixel[2] = gray;
        // pixel[3]（Alpha）保持不变
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn buffer_of(pixels: &[[u8; 4]]) -> PixelBuffer {
        let bytes: Vec<u8> = pixels.iter().flatten().copied().collect();
        PixelBuffer::new(pixels.len() as u32, 1, bytes).expect("test buffer init failed")
    }

    #[test]
    fn pure_red_maps_to_76() {
        let gray = grayscale(&buffer_of(&[[255, 0, 0, 255]]));
        assert_eq!(gray.as_bytes(), &[76, 76, 76, 255]);
    }

    #[test]
    fn pure_white_stays_white() {
        let gray = grayscale(&buffer_of(&[[255, 255, 255, 255]]));
        assert_eq!(gray.as_bytes(), &[255, 255, 255, 255]);
    }

    #[test]
    fn pure_black_stays_black() {
        let gray = grayscale(&buffer_of(&[[0, 0, 0, 0]]));
        assert_eq!(gray.as_bytes(), &[0, 0, 0, 0]);
    }

    #[test]
    fn alpha_channel_is_preserved() {
        let input = buffer_of(&[[10, 200, 30, 0], [90, 14, 200, 128], [1, 2, 3, 7]]);
        let gray = grayscale(&input);

        for (before, after) in input
            .as_bytes()
            .chunks_exact(4)
            .zip(gray.as_bytes().chunks_exact(4))
        {
            assert_eq!(before[3], after[3]);
        }
    }

    #[test]
    fn input_is_not_mutated() {
        let input = buffer_of(&[[200, 40, 90, 255]]);
        let snapshot = input.clone();
        let _ = grayscale(&input);
        assert_eq!(input, snapshot);
    }

    #[test]
    fn in_place_matches_pure_variant() {
        let input = buffer_of(&[[13, 37, 199, 42], [255, 0, 0, 255]]);
        let expected = grayscale(&input);

        let mut in_place = input;
        grayscale_in_place(&mut in_place);
        assert_eq!(in_place, expected);
    }

    /// 三通道相等时加权和必须精确回到原值，否则幂等性会被舍入破坏。
    #[test]
    fn equal_channels_are_rounding_stable() {
        for value in 0u8..=255 {
            let gray = grayscale(&buffer_of(&[[value, value, value, 255]]));
            assert_eq!(gray.as_bytes()[0], value, "灰度值 {} 舍入不稳定", value);
        }
    }

    #[test]
    fn transform_is_idempotent() {
        let input = buffer_of(&[[255, 0, 0, 255], [12, 240, 77, 9], [5, 5, 6, 1]]);
        let once = grayscale(&input);
        let twice = grayscale(&once);
        assert_eq!(once, twice);
    }
}
