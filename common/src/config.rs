//! 設定管理
//!
//! 設定ファイルの読み込みと保存を提供します。
//! 形式はファイル拡張子（`.json` / `.toml`）から判定します。

use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fs;
use std::io;
use std::path::Path;
use thiserror::Error;

/// 設定エラー
#[derive(Error, Debug)]
pub enum ConfigError {
    /// I/O エラー
    #[error("設定の読み書き中にI/Oエラーが発生しました: {0}")]
    IoError(#[from] io::Error),

    /// JSON エラー
    #[error("JSONの解析に失敗しました: {0}")]
    JsonError(#[from] serde_json::Error),

    /// TOML デシリアライズエラー
    #[error("TOMLの解析に失敗しました: {0}")]
    TomlDeError(#[from] toml::de::Error),

    /// TOML シリアライズエラー
    #[error("TOMLのシリアライズに失敗しました: {0}")]
    TomlSerError(#[from] toml::ser::Error),
}

/// 設定形式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConfigFormat {
    /// JSON 形式
    Json,
    /// TOML 形式
    #[default]
    Toml,
}

impl ConfigFormat {
    /// ファイル拡張子から設定形式を判定
    pub fn from_path(path: &Path) -> Option<Self> {
        path.extension()
            .and_then(|ext| ext.to_str())
            .and_then(|ext| match ext.to_lowercase().as_str() {
                "json" => Some(ConfigFormat::Json),
                "toml" => Some(ConfigFormat::Toml),
                _ => None,
            })
    }
}

/// 文字列から設定を解析
pub fn parse_str<T: DeserializeOwned>(content: &str, format: ConfigFormat) -> Result<T, ConfigError> {
    let value = match format {
        ConfigFormat::Json => serde_json::from_str(content)?,
        ConfigFormat::Toml => toml::from_str(content)?,
    };
    Ok(value)
}

/// ファイルから設定を読み込み
pub fn load_from_file<T: DeserializeOwned, P: AsRef<Path>>(path: P) -> Result<T, ConfigError> {
    let path = path.as_ref();
    let format = ConfigFormat::from_path(path).unwrap_or_default();
    let content = fs::read_to_string(path)?;
    parse_str(&content, format)
}

/// 設定をファイルに保存
pub fn save_to_file<T: Serialize, P: AsRef<Path>>(value: &T, path: P) -> Result<(), ConfigError> {
    let path = path.as_ref();

    // ディレクトリが存在することを確認
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            fs::create_dir_all(parent)?;
        }
    }

    let content = match ConfigFormat::from_path(path).unwrap_or_default() {
        ConfigFormat::Json => serde_json::to_string_pretty(value)?,
        ConfigFormat::Toml => toml::to_string(value)?,
    };
    fs::write(path, content)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Sample {
        host: String,
        port: u16,
    }

    #[test]
    fn test_format_from_path() {
        assert_eq!(ConfigFormat::from_path(Path::new("a/viewer.toml")), Some(ConfigFormat::Toml));
        assert_eq!(ConfigFormat::from_path(Path::new("viewer.JSON")), Some(ConfigFormat::Json));
        assert_eq!(ConfigFormat::from_path(Path::new("viewer")), None);
    }

    #[test]
    fn test_save_and_load_both_formats() {
        let dir = std::env::temp_dir().join(format!("frame-viewer-config-{}", std::process::id()));
        let sample = Sample { host: "127.0.0.1".to_string(), port: 50050 };

        for name in ["viewer.toml", "viewer.json"] {
            let path = dir.join(name);
            save_to_file(&sample, &path).unwrap();
            let loaded: Sample = load_from_file(&path).unwrap();
            assert_eq!(loaded, sample);
        }

        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_parse_error_is_reported() {
        let result: Result<Sample, _> = parse_str("port = \"not a number\"", ConfigFormat::Toml);
        assert!(matches!(result, Err(ConfigError::TomlDeError(_))));
    }
}
