//! ネットワークモジュール
//!
//! ビューアからの接続を受け付け、要求されたノードのフレームを配信します。

mod tcp_server;

pub use tcp_server::{serve_client, FrameServer};

use crate::capture::CaptureError;
use frame_viewer_rs_common::CommonError;
use thiserror::Error;

/// ネットワークエラー
#[derive(Error, Debug)]
pub enum NetworkError {
    /// I/Oエラー
    #[error("I/Oエラー: {0}")]
    IoError(#[from] std::io::Error),

    /// プロトコルエラー
    #[error("プロトコルエラー: {0}")]
    ProtocolError(#[from] CommonError),

    /// フレーム生成エラー
    #[error("フレーム生成エラー: {0}")]
    CaptureError(#[from] CaptureError),
}
