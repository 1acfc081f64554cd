//! リモートフレームビューア用のフレームサーバー
//!
//! ビューアからの画像ストリーム要求を受け付け、ノードごとにフレームを配信します。

pub mod capture;
pub mod config;
pub mod network;

pub use config::{ProducerKind, ServerConfig};
pub use network::{FrameServer, NetworkError};
