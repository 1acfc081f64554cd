//! 画像デコードモジュール
//!
//! フレームソースから受信した画像と、起動時に読み込む背景画像を
//! [`Bitmap`] に変換します。

use super::Bitmap;
use frame_viewer_rs_common::{ImageFormat, ImageResponse};
use image::ImageError;
use std::path::Path;
use thiserror::Error;

/// デコードエラー
#[derive(Error, Debug)]
pub enum DecodeError {
    /// 幅または高さが 0
    #[error("画像サイズが不正です: {width}x{height}")]
    ZeroSized {
        /// 幅
        width: u32,
        /// 高さ
        height: u32,
    },

    /// 表示できない画素フォーマット
    #[error("未対応の画素フォーマット: {0:?}")]
    UnsupportedFormat(ImageFormat),

    /// プレーンが含まれていない
    #[error("画像データにプレーンが含まれていません")]
    MissingPlane,

    /// サンプル数が幅×高さに満たない
    #[error("サンプル数が不足しています: {expected} 必要ですが {actual} しかありません")]
    ShortPlane {
        /// 必要なサンプル数
        expected: usize,
        /// 実際のサンプル数
        actual: usize,
    },

    /// サンプル数が幅×高さと一致しない
    #[error("サンプル数が一致しません: expected {expected} but got {actual}")]
    LengthMismatch {
        /// 必要なサンプル数
        expected: usize,
        /// 実際のサンプル数
        actual: usize,
    },

    /// 背景画像の読み込みエラー
    #[error("画像の読み込みに失敗しました: {0}")]
    AssetFailure(#[from] ImageError),
}

/// 受信したフレームをビットマップにデコード
///
/// 先頭プレーンのサンプルをそのままコピーします（スケーリングや色変換はしません）。
/// 幅×高さを超える余分なサンプルは無視します。
pub fn decode_frame(response: ImageResponse) -> Result<Bitmap, DecodeError> {
    let ImageResponse { width, height, format, data } = response;

    if width == 0 || height == 0 {
        return Err(DecodeError::ZeroSized { width, height });
    }
    if format != ImageFormat::Gray {
        return Err(DecodeError::UnsupportedFormat(format));
    }

    let mut plane = data.into_iter().next().ok_or(DecodeError::MissingPlane)?;
    let expected = width as usize * height as usize;
    if plane.len() < expected {
        return Err(DecodeError::ShortPlane {
            expected,
            actual: plane.len(),
        });
    }
    plane.truncate(expected);

    Bitmap::new(width, height, plane)
}

/// 背景画像を読み込む
///
/// カラー画像は輝度に変換されます。
pub fn load_background<P: AsRef<Path>>(path: P) -> Result<Bitmap, DecodeError> {
    let image = image::open(path.as_ref())?.to_luma8();
    let (width, height) = image.dimensions();
    if width == 0 || height == 0 {
        return Err(DecodeError::ZeroSized { width, height });
    }

    Bitmap::new(width, height, image.into_raw())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_copies_samples() {
        let response = ImageResponse::gray(3, 2, vec![0, 1, 2, 3, 4, 5]);
        let bitmap = decode_frame(response).unwrap();
        assert_eq!(bitmap.dimensions(), (3, 2));
        assert_eq!(bitmap.samples(), &[0, 1, 2, 3, 4, 5]);
    }

    #[test]
    fn test_decode_ignores_surplus_samples() {
        let response = ImageResponse::gray(2, 1, vec![7, 8, 9, 10]);
        let bitmap = decode_frame(response).unwrap();
        assert_eq!(bitmap.samples(), &[7, 8]);
    }

    #[test]
    fn test_decode_rejects_malformed_frames() {
        assert!(matches!(
            decode_frame(ImageResponse::gray(0, 5, vec![])),
            Err(DecodeError::ZeroSized { width: 0, height: 5 })
        ));
        assert!(matches!(
            decode_frame(ImageResponse::gray(4, 4, vec![0; 15])),
            Err(DecodeError::ShortPlane { expected: 16, actual: 15 })
        ));

        let mut no_planes = ImageResponse::gray(1, 1, vec![0]);
        no_planes.data.clear();
        assert!(matches!(decode_frame(no_planes), Err(DecodeError::MissingPlane)));

        let mut rgb = ImageResponse::gray(1, 1, vec![0, 0, 0]);
        rgb.format = ImageFormat::Rgb;
        assert!(matches!(
            decode_frame(rgb),
            Err(DecodeError::UnsupportedFormat(ImageFormat::Rgb))
        ));
    }

    #[test]
    fn test_load_background_converts_to_luma() {
        let path = std::env::temp_dir().join(format!("frame-viewer-bg-{}.png", std::process::id()));
        let mut rgb = image::RgbImage::new(4, 2);
        for pixel in rgb.pixels_mut() {
            *pixel = image::Rgb([255, 255, 255]);
        }
        rgb.save(&path).unwrap();

        let bitmap = load_background(&path).unwrap();
        assert_eq!(bitmap.dimensions(), (4, 2));
        assert!(bitmap.samples().iter().all(|&v| v == 255));

        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn test_load_background_missing_file() {
        let result = load_background("/nonexistent/frame-viewer/board.png");
        assert!(matches!(result, Err(DecodeError::AssetFailure(_))));
    }
}
