//! ビットマップ
//!
//! 単一チャネル（グレースケール）の画素を行優先で保持します。

use super::decoder::DecodeError;

/// グレースケールビットマップ
///
/// `samples.len() == width * height` が常に成り立ちます。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bitmap {
    width: u32,
    height: u32,
    samples: Vec<u8>,
}

impl Bitmap {
    /// サンプル列からビットマップを作成
    pub fn new(width: u32, height: u32, samples: Vec<u8>) -> Result<Self, DecodeError> {
        let expected = width as usize * height as usize;
        if samples.len() != expected {
            return Err(DecodeError::LengthMismatch {
                expected,
                actual: samples.len(),
            });
        }

        Ok(Self { width, height, samples })
    }

    /// 単色で塗りつぶしたビットマップを作成
    pub fn filled(width: u32, height: u32, value: u8) -> Self {
        Self {
            width,
            height,
            samples: vec![value; width as usize * height as usize],
        }
    }

    /// 幅
    pub fn width(&self) -> u32 {
        self.width
    }

    /// 高さ
    pub fn height(&self) -> u32 {
        self.height
    }

    /// (幅, 高さ)
    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// 行優先のサンプル列
    pub fn samples(&self) -> &[u8] {
        &self.samples
    }

    /// 指定座標のサンプル
    pub fn sample(&self, x: u32, y: u32) -> Option<u8> {
        if x >= self.width || y >= self.height {
            return None;
        }
        self.samples
            .get(y as usize * self.width as usize + x as usize)
            .copied()
    }
}
