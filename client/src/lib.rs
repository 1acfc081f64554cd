//! リモートフレームビューア クライアント
//!
//! サーバーから受信したグレースケールのフレームを、ウィンドウに収まるように
//! 拡大縮小して表示します。

pub mod app;
pub mod config;
pub mod display;
pub mod network;
pub mod ui;

pub use app::{launch, Actor, Supervisor, ViewerError};
pub use config::ViewerConfig;
