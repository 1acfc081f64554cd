//! ディスプレイホスト
//!
//! ウィンドウ側（イベントの発生源）とイベントディスパッチループの間の
//! 境界を定義します。ウィンドウは [`HostHandle`] から描画要求と破棄通知を送り、
//! ディスパッチループは [`DisplayHost`] からそれを順に読み出します。

use crate::display::{DrawList, ViewportExtent};
use crossbeam_channel::{bounded, unbounded, Receiver, Sender};
use log::debug;
use thiserror::Error;

/// ディスプレイホストが破棄時に報告するエラー
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("ディスプレイホストエラー: {message}")]
pub struct HostError {
    /// エラーメッセージ
    pub message: String,
}

impl HostError {
    /// メッセージからエラーを作成
    pub fn new(message: impl Into<String>) -> Self {
        Self { message: message.into() }
    }
}

/// 描画要求
///
/// 表示領域の大きさと、描画命令列の返送先を運びます。
#[derive(Debug)]
pub struct PaintRequest {
    viewport: ViewportExtent,
    reply: Sender<DrawList>,
}

impl PaintRequest {
    /// 描画要求と、描画命令列を受け取る受信側を作成
    pub fn new(viewport: ViewportExtent) -> (Self, Receiver<DrawList>) {
        let (reply, draw_list) = bounded(1);
        (Self { viewport, reply }, draw_list)
    }

    /// 描画時の表示領域
    pub fn viewport(&self) -> ViewportExtent {
        self.viewport
    }

    /// 描画命令列をホストへ返す
    pub fn submit(self, list: DrawList) {
        if self.reply.send(list).is_err() {
            debug!("描画命令列の受け取り手がいません");
        }
    }
}

/// ディスプレイホストのイベント
#[derive(Debug)]
pub enum HostEvent {
    /// 描画要求
    Paint(PaintRequest),
    /// ウィンドウの破棄（エラーを伴う場合がある）
    Destroyed(Option<HostError>),
}

/// イベントを順に供給するディスプレイホスト
pub trait DisplayHost {
    /// 次のイベントを待って返す
    fn next_event(&mut self) -> HostEvent;
}

/// チャネルからイベントを読むディスプレイホスト
pub struct ChannelHost {
    events: Receiver<HostEvent>,
}

impl DisplayHost for ChannelHost {
    fn next_event(&mut self) -> HostEvent {
        // ウィンドウ側が破棄通知なしにいなくなった場合も破棄として扱う
        self.events.recv().unwrap_or(HostEvent::Destroyed(None))
    }
}

/// ウィンドウ側のハンドル
#[derive(Clone)]
pub struct HostHandle {
    events: Sender<HostEvent>,
}

impl HostHandle {
    /// 描画を要求し、描画命令列が返るまで待つ
    ///
    /// パイプラインが既に終了している場合は `None` を返します。
    pub fn request_paint(&self, viewport: ViewportExtent) -> Option<DrawList> {
        let (request, draw_list) = PaintRequest::new(viewport);
        self.events.send(HostEvent::Paint(request)).ok()?;
        draw_list.recv().ok()
    }

    /// ウィンドウの破棄を通知
    pub fn destroy(&self, error: Option<HostError>) {
        if self.events.send(HostEvent::Destroyed(error)).is_err() {
            debug!("イベントディスパッチループは既に終了しています");
        }
    }
}

/// 接続済みのハンドルとホストを作成
pub fn host_channel() -> (HostHandle, ChannelHost) {
    let (events, receiver) = unbounded();
    (HostHandle { events }, ChannelHost { events: receiver })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    #[test]
    fn test_paint_round_trip_through_host() {
        let (handle, mut host) = host_channel();

        let window = thread::spawn(move || handle.request_paint(ViewportExtent::new(640.0, 480.0)));

        match host.next_event() {
            HostEvent::Paint(request) => {
                assert_eq!(request.viewport(), ViewportExtent::new(640.0, 480.0));
                request.submit(DrawList::new());
            }
            other => panic!("unexpected event {:?}", other),
        }

        assert!(window.join().unwrap().is_some());
    }

    #[test]
    fn test_dropped_request_unblocks_window() {
        let (handle, mut host) = host_channel();
        let window = thread::spawn(move || handle.request_paint(ViewportExtent::new(1.0, 1.0)));

        // 応答せずに要求を破棄する
        drop(host.next_event());
        assert!(window.join().unwrap().is_none());
    }

    #[test]
    fn test_destroy_and_disconnect() {
        let (handle, mut host) = host_channel();
        handle.destroy(Some(HostError::new("gpu lost")));
        assert!(matches!(
            host.next_event(),
            HostEvent::Destroyed(Some(e)) if e.message == "gpu lost"
        ));

        drop(handle);
        assert!(matches!(host.next_event(), HostEvent::Destroyed(None)));
    }
}
