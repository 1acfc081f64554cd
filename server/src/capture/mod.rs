//! キャプチャモジュール
//!
//! 配信するグレースケールフレームを生成します。

mod pattern;
mod sequence;

pub use pattern::PatternProducer;
pub use sequence::ImageSequenceProducer;

use image::{GrayImage, ImageError};
use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// キャプチャエラー
#[derive(Error, Debug)]
pub enum CaptureError {
    /// 画像の読み込みエラー
    #[error("画像の読み込みに失敗しました: {0}")]
    ImageError(#[from] ImageError),

    /// IO エラー
    #[error("IO エラー: {0}")]
    IoError(#[from] io::Error),

    /// 読み込める画像がない
    #[error("画像が見つかりません: {0}")]
    NoImages(PathBuf),

    /// 無効な設定
    #[error("無効な設定: {0}")]
    InvalidConfig(String),
}

/// フレーム生成器
///
/// クライアントごとに1つ作られ、配信のたびに次のフレームを返します。
pub trait FrameProducer: Send {
    /// 次のフレームを生成
    fn next_frame(&mut self) -> Result<GrayImage, CaptureError>;
}
