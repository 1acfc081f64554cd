//! ビューア設定
//!
//! 接続先、表示するノード、背景画像、ウィンドウの設定を保持します。
//! 設定ファイル（TOML / JSON）から読み込み、コマンドライン引数で上書きできます。

use frame_viewer_rs_common::config::{self, ConfigError};
use frame_viewer_rs_common::utils::path;
use frame_viewer_rs_common::DEFAULT_PORT;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// 既定の設定ファイル名
pub const CONFIG_FILE_NAME: &str = "viewer.toml";

/// 接続先サーバーの設定
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerSettings {
    /// ホスト名または IP アドレス
    pub host: String,
    /// ポート番号
    pub port: u16,
    /// 接続タイムアウト（ミリ秒）
    pub timeout_ms: u64,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: DEFAULT_PORT,
            timeout_ms: 5000,
        }
    }
}

impl ServerSettings {
    /// `host:port` 形式のアドレス
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// ウィンドウの設定
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowSettings {
    /// タイトル
    pub title: String,
    /// 初期幅
    pub width: f32,
    /// 初期高さ
    pub height: f32,
}

impl Default for WindowSettings {
    fn default() -> Self {
        Self {
            title: "フレームビューア".to_string(),
            width: 1024.0,
            height: 768.0,
        }
    }
}

/// ビューア設定
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewerConfig {
    /// 接続先
    pub server: ServerSettings,
    /// 表示するノード名
    pub node: String,
    /// 最初に表示する背景画像
    pub background: PathBuf,
    /// ウィンドウ
    pub window: WindowSettings,
    /// ログレベル
    pub log_level: String,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            server: ServerSettings::default(),
            node: "Node 1".to_string(),
            background: PathBuf::from("board.png"),
            window: WindowSettings::default(),
            log_level: "info".to_string(),
        }
    }
}

impl ViewerConfig {
    /// 既定の設定ファイルパス
    pub fn default_path() -> PathBuf {
        path::config_file(CONFIG_FILE_NAME)
    }

    /// 設定を読み込む
    ///
    /// パスが指定された場合はそのファイルを読み込みます（存在しなければエラー）。
    /// 指定がない場合は既定のパスにファイルがあれば読み込み、なければ既定値を返します。
    pub fn load(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        match explicit {
            Some(path) => config::load_from_file(path),
            None => {
                let path = Self::default_path();
                if path.exists() {
                    config::load_from_file(&path)
                } else {
                    Ok(Self::default())
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use frame_viewer_rs_common::ConfigFormat;

    #[test]
    fn test_partial_file_keeps_defaults() {
        let parsed: ViewerConfig = config::parse_str(
            "node = \"Camera\"\n[server]\nport = 6000\n",
            ConfigFormat::Toml,
        )
        .unwrap();

        assert_eq!(parsed.node, "Camera");
        assert_eq!(parsed.server.port, 6000);
        assert_eq!(parsed.server.host, "127.0.0.1");
        assert_eq!(parsed.window, WindowSettings::default());
        assert_eq!(parsed.server.address(), "127.0.0.1:6000");
    }

    #[test]
    fn test_explicit_missing_file_is_error() {
        let result = ViewerConfig::load(Some(Path::new("/nonexistent/frame-viewer/viewer.toml")));
        assert!(matches!(result, Err(ConfigError::IoError(_))));
    }

    #[test]
    fn test_json_config() {
        let parsed: ViewerConfig = config::parse_str(
            r#"{"server": {"host": "10.0.0.2"}, "background": "bg.png"}"#,
            ConfigFormat::Json,
        )
        .unwrap();
        assert_eq!(parsed.server.host, "10.0.0.2");
        assert_eq!(parsed.server.port, DEFAULT_PORT);
        assert_eq!(parsed.background, PathBuf::from("bg.png"));
    }
}
