//! イベントディスパッチループ
//!
//! ディスプレイホストのイベントを1つずつ読み、描画要求をレンダーワーカーへ
//! 渡して完了を待ちます。未完了の描画要求が2つ以上存在することはありません。

use super::host::{DisplayHost, HostError, HostEvent, PaintRequest};
use crossbeam_channel::{Receiver, Sender};
use log::{debug, info};
use thiserror::Error;

/// ディスパッチエラー
#[derive(Error, Debug)]
pub enum DispatchError {
    /// ディスプレイホストがエラー付きで破棄された
    #[error(transparent)]
    Host(#[from] HostError),

    /// レンダーワーカーが応答しなくなった
    #[error("レンダーワーカーが終了しています")]
    WorkerGone,
}

/// イベントディスパッチループ
pub struct EventDispatchLoop<H: DisplayHost> {
    /// イベント供給元
    host: H,
    /// レンダーワーカーへの描画要求
    paint_tx: Sender<PaintRequest>,
    /// レンダーワーカーからの完了通知
    done_rx: Receiver<()>,
    /// 処理した描画要求の数
    dispatched: u64,
}

impl<H: DisplayHost> EventDispatchLoop<H> {
    /// 新しいディスパッチループを作成
    pub fn new(host: H, paint_tx: Sender<PaintRequest>, done_rx: Receiver<()>) -> Self {
        Self {
            host,
            paint_tx,
            done_rx,
            dispatched: 0,
        }
    }

    /// 破棄イベントを受け取るまでイベントを処理する
    ///
    /// 破棄イベントが運んできたエラーをそのまま返します。
    pub fn run(mut self) -> Result<(), DispatchError> {
        loop {
            match self.host.next_event() {
                HostEvent::Destroyed(error) => {
                    info!("ウィンドウが破棄されました (描画 {} 回)", self.dispatched);
                    return match error {
                        Some(error) => Err(error.into()),
                        None => Ok(()),
                    };
                }
                HostEvent::Paint(request) => {
                    self.paint_tx.send(request).map_err(|_| DispatchError::WorkerGone)?;
                    self.done_rx.recv().map_err(|_| DispatchError::WorkerGone)?;
                    self.dispatched += 1;
                    debug!("描画要求 #{} が完了しました", self.dispatched);
                }
            }
        }
    }
}
