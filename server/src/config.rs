//! サーバー設定
//!
//! サーバーの設定情報を管理するモジュール

use crate::capture::{CaptureError, FrameProducer, ImageSequenceProducer, PatternProducer};
use frame_viewer_rs_common::DEFAULT_PORT;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// フレームの生成方法
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProducerKind {
    /// テストパターン
    Pattern {
        /// 幅
        width: u32,
        /// 高さ
        height: u32,
    },
    /// ディレクトリ内の画像
    Sequence {
        /// 画像ディレクトリ
        dir: PathBuf,
    },
}

impl Default for ProducerKind {
    fn default() -> Self {
        ProducerKind::Pattern { width: 640, height: 480 }
    }
}

impl ProducerKind {
    /// フレーム生成器を作成
    pub fn create(&self) -> Result<Box<dyn FrameProducer>, CaptureError> {
        Ok(match self {
            ProducerKind::Pattern { width, height } => Box::new(PatternProducer::new(*width, *height)?),
            ProducerKind::Sequence { dir } => Box::new(ImageSequenceProducer::open(dir)?),
        })
    }
}

/// サーバー設定
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// バインドアドレス
    pub bind_address: String,
    /// ポート番号
    pub port: u16,
    /// 配信できるノード名
    pub nodes: Vec<String>,
    /// フレームの送信間隔(ミリ秒)
    pub interval_ms: u64,
    /// 1接続あたりの最大フレーム数（なければ無制限）
    pub frame_limit: Option<u64>,
    /// フレームの生成方法
    pub producer: ProducerKind,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0".to_string(),
            port: DEFAULT_PORT,
            nodes: vec!["Node 1".to_string()],
            interval_ms: 33,
            frame_limit: None,
            producer: ProducerKind::default(),
        }
    }
}

impl ServerConfig {
    /// `bind_address:port` 形式のアドレス
    pub fn address(&self) -> String {
        format!("{}:{}", self.bind_address, self.port)
    }

    /// フレームの送信間隔
    pub fn interval(&self) -> Duration {
        Duration::from_millis(self.interval_ms)
    }

    /// ノード名が配信対象か
    pub fn has_node(&self, name: &str) -> bool {
        self.nodes.iter().any(|node| node == name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use frame_viewer_rs_common::config::parse_str;
    use frame_viewer_rs_common::ConfigFormat;

    #[test]
    fn test_defaults() {
        let config = ServerConfig::default();
        assert_eq!(config.address(), format!("0.0.0.0:{}", DEFAULT_PORT));
        assert!(config.has_node("Node 1"));
        assert!(!config.has_node("node 1"));
        assert_eq!(config.interval(), Duration::from_millis(33));
    }

    #[test]
    fn test_toml_producer() {
        let config: ServerConfig = parse_str(
            "nodes = [\"Cam A\", \"Cam B\"]\nframe_limit = 10\n[producer.sequence]\ndir = \"frames\"\n",
            ConfigFormat::Toml,
        )
        .unwrap();

        assert!(config.has_node("Cam B"));
        assert_eq!(config.frame_limit, Some(10));
        assert_eq!(config.producer, ProducerKind::Sequence { dir: PathBuf::from("frames") });
        assert_eq!(config.port, DEFAULT_PORT);
    }

    #[test]
    fn test_create_pattern_producer() {
        let mut producer = ProducerKind::Pattern { width: 3, height: 2 }.create().unwrap();
        assert_eq!(producer.next_frame().unwrap().dimensions(), (3, 2));
    }
}
