//! ネットワークモジュール
//!
//! フレームソースとの通信と、受信したフレームをレンダーワーカーへ渡す
//! ネットワークレシーバーを提供します。

mod receiver;
mod tcp_client;

pub use receiver::NetworkReceiver;
pub use tcp_client::TcpFrameSource;

use frame_viewer_rs_common::{CommonError, ImageResponse};
use std::io;
use thiserror::Error;

/// ネットワークエラー
#[derive(Error, Debug)]
pub enum NetworkError {
    /// 接続エラー
    #[error("接続エラー: {0}")]
    ConnectionError(String),

    /// IO エラー
    #[error("IO エラー: {0}")]
    IoError(#[from] io::Error),

    /// プロトコルエラー
    #[error("プロトコルエラー: {0}")]
    ProtocolError(#[from] CommonError),

    /// サーバーが報告したエラー
    #[error("サーバーエラー ({code}): {message}")]
    RemoteError {
        /// エラーコード
        code: i32,
        /// エラーメッセージ
        message: String,
    },
}

/// フレームソース
///
/// 順番にフレームを返す長寿命のストリームです。
pub trait FrameSource {
    /// 次のフレームを待って返す
    ///
    /// `Ok(None)` はストリームの正常終了、`Err` は致命的な転送エラーです。
    fn next_frame(&mut self) -> Result<Option<ImageResponse>, NetworkError>;
}
