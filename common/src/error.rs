//! エラー型定義
//!
//! クライアントとサーバーで共有する共通エラー型を定義します。

use std::io;
use thiserror::Error;

/// 共通エラー
#[derive(Error, Debug)]
pub enum CommonError {
    /// 入出力エラー
    #[error("I/Oエラー: {0}")]
    IoError(#[from] io::Error),

    /// シリアライズ/デシリアライズエラー
    #[error("シリアライズエラー: {0}")]
    SerializeError(#[from] serde_json::Error),

    /// メッセージサイズが上限を超えた
    #[error("メッセージが大きすぎます: {size} バイト (上限 {limit} バイト)")]
    MessageTooLarge {
        /// 受信したサイズ
        size: usize,
        /// 上限
        limit: usize,
    },

    /// メッセージの途中で接続が閉じられた
    #[error("メッセージの途中で接続が閉じられました")]
    TruncatedMessage,
}

/// エラーコード
///
/// `StreamMessage::Error` で送られる数値コード。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    /// 一般的なエラー
    GeneralError = 1,
    /// リソースが見つからない
    ResourceNotFoundError = 13,
    /// 未知のコード
    Other = 99,
}

impl ErrorCode {
    /// エラーコードから文字列表現を取得
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::GeneralError => "GeneralError",
            ErrorCode::ResourceNotFoundError => "ResourceNotFoundError",
            ErrorCode::Other => "Other",
        }
    }

    /// 送信用の数値
    pub fn code(&self) -> i32 {
        *self as i32
    }

    /// 数値からエラーコードを取得
    pub fn from_i32(code: i32) -> Self {
        match code {
            1 => ErrorCode::GeneralError,
            13 => ErrorCode::ResourceNotFoundError,
            _ => ErrorCode::Other,
        }
    }
}

/// 結果型のエイリアス
pub type Result<T> = std::result::Result<T, CommonError>;
