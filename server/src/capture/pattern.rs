//! テストパターン生成器

use super::{CaptureError, FrameProducer};
use image::{GrayImage, Luma};

/// フレームごとに斜めに流れるグラデーションを生成する
pub struct PatternProducer {
    width: u32,
    height: u32,
    /// 生成したフレーム数
    tick: u32,
}

impl PatternProducer {
    /// 指定サイズの生成器を作成
    pub fn new(width: u32, height: u32) -> Result<Self, CaptureError> {
        if width == 0 || height == 0 {
            return Err(CaptureError::InvalidConfig(format!(
                "パターンのサイズが 0 です: {}x{}",
                width, height
            )));
        }
        Ok(Self { width, height, tick: 0 })
    }
}

impl FrameProducer for PatternProducer {
    fn next_frame(&mut self) -> Result<GrayImage, CaptureError> {
        let shift = self.tick.wrapping_mul(4);
        let frame = GrayImage::from_fn(self.width, self.height, |x, y| {
            Luma([(x.wrapping_add(y).wrapping_add(shift) % 256) as u8])
        });
        self.tick = self.tick.wrapping_add(1);
        Ok(frame)
    }
}
