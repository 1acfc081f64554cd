//! フレームサーバーエントリポイント
//!
//! フレームサーバーのメインエントリポイント

use anyhow::Context;
use clap::Parser;
use frame_viewer_rs_common::config;
use frame_viewer_rs_common::utils::logging;
use frame_viewer_rs_server::{FrameServer, ProducerKind, ServerConfig};
use std::path::PathBuf;

/// リモートフレームビューア用のフレームサーバー
#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    /// 設定ファイル (TOML / JSON)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// バインドアドレス
    #[arg(long)]
    bind: Option<String>,

    /// ポート番号
    #[arg(short, long)]
    port: Option<u16>,

    /// 配信するノード名（複数指定可）
    #[arg(short, long = "node")]
    nodes: Vec<String>,

    /// フレームの送信間隔(ミリ秒)
    #[arg(short, long)]
    interval_ms: Option<u64>,

    /// 1接続あたりの最大フレーム数
    #[arg(short = 'l', long)]
    frame_limit: Option<u64>,

    /// 画像ディレクトリ（指定しなければテストパターン）
    #[arg(long)]
    images: Option<PathBuf>,

    /// ログレベル
    #[arg(long, default_value = "info")]
    log_level: String,
}

impl Args {
    /// コマンドライン引数で設定を上書き
    fn apply(self, config: &mut ServerConfig) {
        if let Some(bind) = self.bind {
            config.bind_address = bind;
        }
        if let Some(port) = self.port {
            config.port = port;
        }
        if !self.nodes.is_empty() {
            config.nodes = self.nodes;
        }
        if let Some(interval_ms) = self.interval_ms {
            config.interval_ms = interval_ms;
        }
        if self.frame_limit.is_some() {
            config.frame_limit = self.frame_limit;
        }
        if let Some(dir) = self.images {
            config.producer = ProducerKind::Sequence { dir };
        }
    }
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    // ロガーを初期化
    logging::init_logger(&args.log_level);
    logging::set_panic_hook();

    let mut server_config = match &args.config {
        Some(path) => config::load_from_file(path)
            .with_context(|| format!("設定ファイルを読み込めません: {}", path.display()))?,
        None => ServerConfig::default(),
    };
    args.apply(&mut server_config);

    let server = FrameServer::bind(server_config).context("サーバーの起動に失敗しました")?;
    server.run()?;
    Ok(())
}
