//! ビューアウィンドウ
//!
//! eframe のウィンドウをディスプレイホストとして動かします。毎フレームの
//! `update` で描画要求を送り、返ってきた描画命令列を実行します。

use super::host::HostHandle;
use crate::display::{DisplayRenderer, Invalidate, ViewportExtent};
use eframe::egui;
use log::{debug, warn};

impl Invalidate for egui::Context {
    fn invalidate(&self) {
        self.request_repaint();
    }
}

/// ビューアウィンドウ
pub struct ViewerWindow {
    /// パイプラインへのハンドル
    host: HostHandle,
    /// 画面レンダラー
    renderer: DisplayRenderer,
    /// 破棄通知を送ったかどうか
    destroyed: bool,
}

impl ViewerWindow {
    /// 新しいビューアウィンドウを作成
    pub fn new(cc: &eframe::CreationContext<'_>, host: HostHandle) -> Self {
        Self {
            host,
            renderer: DisplayRenderer::new(cc.egui_ctx.clone()),
            destroyed: false,
        }
    }

    /// 破棄を一度だけ通知
    fn destroy(&mut self) {
        if !self.destroyed {
            self.destroyed = true;
            self.host.destroy(None);
        }
    }
}

impl eframe::App for ViewerWindow {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        egui::CentralPanel::default()
            .frame(egui::Frame::none().fill(egui::Color32::BLACK))
            .show(ctx, |ui| {
                if self.destroyed {
                    return;
                }

                let rect = ui.max_rect();
                let viewport = ViewportExtent::new(rect.width(), rect.height());

                let Some(list) = self.host.request_paint(viewport) else {
                    debug!("パイプラインが終了しているため描画をスキップします");
                    return;
                };

                if let Err(e) = self.renderer.render(ui.painter(), rect.min, &list) {
                    warn!("描画に失敗しました: {}", e);
                }
            });
    }

    fn on_close_event(&mut self) -> bool {
        self.destroy();
        true
    }
}

impl Drop for ViewerWindow {
    fn drop(&mut self) {
        self.destroy();
    }
}
