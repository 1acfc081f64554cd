//! ユーティリティモジュール
//!
//! 各種ユーティリティ機能を提供します。

pub mod logging;

/// パス関連のユーティリティ
pub mod path {
    use std::path::PathBuf;

    /// アプリケーション名（設定ディレクトリ名）
    pub const APP_DIR_NAME: &str = "frame-viewer-rs";

    /// 設定ディレクトリを取得
    pub fn get_config_dir() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(APP_DIR_NAME)
    }

    /// 設定ディレクトリ内のファイルパスを取得
    pub fn config_file(name: &str) -> PathBuf {
        get_config_dir().join(name)
    }
}
