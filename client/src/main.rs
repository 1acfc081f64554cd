//! クライアントエントリポイント
//!
//! リモートフレームビューアのメインエントリポイント

use anyhow::Context as _;
use clap::Parser;
use eframe::egui;
use frame_viewer_rs_client::display::load_background;
use frame_viewer_rs_client::network::TcpFrameSource;
use frame_viewer_rs_client::ui::{host_channel, ViewerWindow};
use frame_viewer_rs_client::{launch, Supervisor, ViewerConfig, ViewerError};
use frame_viewer_rs_common::utils::logging;
use frame_viewer_rs_common::NodeSelector;
use std::path::PathBuf;
use std::process;
use std::thread;

/// リモートフレームビューア
#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    /// 設定ファイル
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// 接続先ホスト
    #[arg(long)]
    host: Option<String>,

    /// 接続先ポート
    #[arg(short, long)]
    port: Option<u16>,

    /// 表示するノード名
    #[arg(short, long)]
    node: Option<String>,

    /// 最初に表示する背景画像
    #[arg(short, long)]
    background: Option<PathBuf>,

    /// ログレベル (error, warn, info, debug, trace)
    #[arg(long)]
    log_level: Option<String>,
}

impl Args {
    /// コマンドライン引数で設定を上書き
    fn apply(self, config: &mut ViewerConfig) {
        if let Some(host) = self.host {
            config.server.host = host;
        }
        if let Some(port) = self.port {
            config.server.port = port;
        }
        if let Some(node) = self.node {
            config.node = node;
        }
        if let Some(background) = self.background {
            config.background = background;
        }
        if let Some(level) = self.log_level {
            config.log_level = level;
        }
    }
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let mut config = ViewerConfig::load(args.config.as_deref()).context("設定の読み込みに失敗しました")?;
    args.apply(&mut config);

    // ロガーを初期化
    logging::init_logger(&config.log_level);
    logging::set_panic_hook();

    let background = load_background(&config.background)
        .with_context(|| format!("背景画像を読み込めません: {}", config.background.display()))?;

    let source = TcpFrameSource::connect(&config.server, &NodeSelector::new(config.node.as_str()))
        .with_context(|| format!("{} に接続できません", config.server.address()))?;

    // パイプラインの終了を監視し、プロセスの終了コードを決める
    let (supervisor_tx, supervisor_rx) = crossbeam_channel::bounded::<Result<Supervisor, ViewerError>>(1);
    let watcher = thread::Builder::new().name("supervisor".to_string()).spawn(move || {
        let result = match supervisor_rx.recv() {
            Ok(launched) => launched.and_then(Supervisor::wait),
            // ウィンドウが作られる前に終了した
            Err(_) => return,
        };
        match result {
            Ok(()) => {
                log::info!("ビューアを終了します");
                process::exit(0);
            }
            Err(e) => {
                log::error!("ビューアが異常終了しました: {}", e);
                process::exit(1);
            }
        }
    })?;

    let native_options = eframe::NativeOptions {
        initial_window_size: Some(egui::vec2(config.window.width, config.window.height)),
        resizable: true,
        vsync: true,
        ..Default::default()
    };

    eframe::run_native(
        &config.window.title,
        native_options,
        Box::new(move |cc| {
            let (handle, host) = host_channel();
            let launched = launch(source, host, cc.egui_ctx.clone(), background);
            let _ = supervisor_tx.send(launched);
            Box::new(ViewerWindow::new(cc, handle))
        }),
    )
    .map_err(|e| anyhow::anyhow!("ウィンドウの作成に失敗しました: {}", e))?;

    // ウィンドウが閉じられた後は監視スレッドがプロセスを終了させる
    if watcher.join().is_err() {
        anyhow::bail!("監視スレッドがパニックしました");
    }
    Ok(())
}
