//! フレームビューア共通ライブラリ
//!
//! フレームソース（サーバー）とビューア（クライアント）の両方で使用される
//! プロトコル、エラー型、設定、ロギングを提供します。

pub mod config;
pub mod error;
pub mod protocol;
pub mod utils;

// 主要コンポーネントを再エクスポート
pub use config::{ConfigError, ConfigFormat};
pub use error::{CommonError, ErrorCode, Result};
pub use protocol::{ImageFormat, ImageRequest, ImageResponse, NodeSelector, StreamMessage};

/// 既定のフレームソースポート
pub const DEFAULT_PORT: u16 = 50050;
