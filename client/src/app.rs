//! パイプラインの起動と監視
//!
//! ネットワークレシーバー、レンダーワーカー、イベントディスパッチループの
//! 3つのアクターをそれぞれ専用スレッドで起動し、終了を監視します。
//!
//! - ネットワークレシーバーの正常終了（ストリーム終了）ではプロセスを続行し、
//!   最後のフレームを表示し続けます。
//! - ネットワークレシーバーのエラーは致命的です。
//! - イベントディスパッチループの終了（ウィンドウの破棄）でパイプライン全体が終わります。

use crate::display::{Bitmap, Invalidate, RenderWorker};
use crate::network::{FrameSource, NetworkError, NetworkReceiver};
use crate::ui::{DisplayHost, DispatchError, EventDispatchLoop};
use crossbeam_channel::{bounded, unbounded, Receiver, RecvTimeoutError, Sender};
use log::{debug, error, info};
use std::fmt;
use std::io;
use std::panic::{self, AssertUnwindSafe};
use std::thread;
use std::time::{Duration, Instant};
use thiserror::Error;

/// ビューアエラー
#[derive(Error, Debug)]
pub enum ViewerError {
    /// ネットワークエラー
    #[error(transparent)]
    Network(#[from] NetworkError),

    /// ディスパッチエラー
    #[error(transparent)]
    Dispatch(#[from] DispatchError),

    /// スレッド起動エラー
    #[error("スレッドの起動に失敗しました: {0}")]
    Spawn(#[from] io::Error),

    /// アクターのパニック
    #[error("{0} がパニックしました")]
    Panicked(Actor),
}

/// パイプラインを構成するアクター
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Actor {
    /// ネットワークレシーバー
    NetworkReceiver,
    /// レンダーワーカー
    RenderWorker,
    /// イベントディスパッチループ
    EventDispatch,
}

impl Actor {
    /// スレッド名
    pub fn name(&self) -> &'static str {
        match self {
            Actor::NetworkReceiver => "network-receiver",
            Actor::RenderWorker => "render-worker",
            Actor::EventDispatch => "event-dispatch",
        }
    }
}

impl fmt::Display for Actor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// アクターの終了通知
#[derive(Debug)]
pub struct ActorExit {
    /// 終了したアクター
    pub actor: Actor,
    /// 終了結果
    pub result: Result<(), ViewerError>,
}

/// パイプラインの監視役
pub struct Supervisor {
    exits: Receiver<ActorExit>,
}

impl Supervisor {
    /// パイプラインが終わるまで待つ
    ///
    /// ウィンドウが正常に破棄された場合は `Ok(())` を返します。
    pub fn wait(self) -> Result<(), ViewerError> {
        for exit in self.exits.iter() {
            if let Some(result) = Self::judge(exit) {
                return result;
            }
        }
        Ok(())
    }

    /// 指定時間だけパイプラインの終了を待つ
    ///
    /// 時間内に終了しなかった場合は `None` を返します。
    pub fn wait_timeout(&mut self, timeout: Duration) -> Option<Result<(), ViewerError>> {
        let deadline = Instant::now() + timeout;
        loop {
            match self.exits.recv_deadline(deadline) {
                Ok(exit) => {
                    if let Some(result) = Self::judge(exit) {
                        return Some(result);
                    }
                }
                Err(RecvTimeoutError::Timeout) => return None,
                Err(RecvTimeoutError::Disconnected) => return Some(Ok(())),
            }
        }
    }

    /// 終了通知がパイプライン全体の終了を意味するか判定
    fn judge(exit: ActorExit) -> Option<Result<(), ViewerError>> {
        let ActorExit { actor, result } = exit;
        match (actor, result) {
            (Actor::EventDispatch, result) => {
                info!("{} が終了しました", actor);
                Some(result)
            }
            (actor, Err(e)) => {
                error!("{} がエラーで終了しました: {}", actor, e);
                Some(Err(e))
            }
            (Actor::NetworkReceiver, Ok(())) => {
                info!("フレームストリームが終了しました。最後のフレームを表示し続けます");
                None
            }
            (Actor::RenderWorker, Ok(())) => {
                debug!("レンダーワーカーが終了しました");
                None
            }
        }
    }
}

/// アクターを名前付きスレッドで起動し、終了を監視役へ通知する
fn spawn_actor<F>(actor: Actor, exits: &Sender<ActorExit>, body: F) -> Result<(), ViewerError>
where
    F: FnOnce() -> Result<(), ViewerError> + Send + 'static,
{
    let exits = exits.clone();
    thread::Builder::new().name(actor.name().to_string()).spawn(move || {
        let result = panic::catch_unwind(AssertUnwindSafe(body)).unwrap_or(Err(ViewerError::Panicked(actor)));
        // 監視役が先にいなくなっていても問題ない
        let _ = exits.send(ActorExit { actor, result });
    })?;
    Ok(())
}

/// パイプラインを起動
///
/// フレーム配送と描画要求のチャネルはどちらも容量 0 のランデブーチャネルです。
pub fn launch<S, H, I>(source: S, host: H, invalidator: I, background: Bitmap) -> Result<Supervisor, ViewerError>
where
    S: FrameSource + Send + 'static,
    H: DisplayHost + Send + 'static,
    I: Invalidate + 'static,
{
    let (exit_tx, exit_rx) = unbounded();
    let (frame_tx, frame_rx) = bounded(0);
    let (paint_tx, paint_rx) = bounded(0);
    let (done_tx, done_rx) = bounded(0);

    info!(
        "パイプラインを起動します (背景 {}x{})",
        background.width(),
        background.height()
    );

    let worker = RenderWorker::new(background, invalidator);
    spawn_actor(Actor::RenderWorker, &exit_tx, move || {
        worker.run(paint_rx, frame_rx, done_tx);
        Ok(())
    })?;

    let dispatch = EventDispatchLoop::new(host, paint_tx, done_rx);
    spawn_actor(Actor::EventDispatch, &exit_tx, move || Ok(dispatch.run()?))?;

    let receiver = NetworkReceiver::new(source, frame_tx);
    spawn_actor(Actor::NetworkReceiver, &exit_tx, move || Ok(receiver.run()?))?;

    Ok(Supervisor { exits: exit_rx })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::display::{DrawOp, ViewportExtent};
    use crate::ui::{host_channel, HostError};
    use frame_viewer_rs_common::ImageResponse;
    use std::collections::VecDeque;

    struct NoopInvalidator;

    impl Invalidate for NoopInvalidator {
        fn invalidate(&self) {}
    }

    /// 用意したフレームを返し、尽きたら通知してから終端またはエラーを返すソース
    struct ScriptedSource {
        frames: VecDeque<ImageResponse>,
        ending: Option<NetworkError>,
        drained: Option<Sender<()>>,
    }

    impl ScriptedSource {
        fn new(count: u8, ending: Option<NetworkError>) -> (Self, Receiver<()>) {
            let (drained, drained_rx) = bounded(1);
            let frames = (1..=count).map(|i| ImageResponse::gray(u32::from(i), 1, vec![i; usize::from(i)])).collect();
            (Self { frames, ending, drained: Some(drained) }, drained_rx)
        }
    }

    impl FrameSource for ScriptedSource {
        fn next_frame(&mut self) -> Result<Option<ImageResponse>, NetworkError> {
            if let Some(frame) = self.frames.pop_front() {
                return Ok(Some(frame));
            }
            if let Some(drained) = self.drained.take() {
                let _ = drained.send(());
            }
            match self.ending.take() {
                Some(e) => Err(e),
                None => Ok(None),
            }
        }
    }

    const TIMEOUT: Duration = Duration::from_secs(5);

    #[test]
    fn test_end_of_stream_keeps_running_until_destroy() {
        let (source, drained) = ScriptedSource::new(3, None);
        let (handle, host) = host_channel();
        let mut supervisor = launch(source, host, NoopInvalidator, Bitmap::filled(4, 4, 0)).unwrap();

        drained.recv_timeout(TIMEOUT).unwrap();
        assert!(supervisor.wait_timeout(Duration::from_millis(100)).is_none());

        handle.destroy(None);
        assert!(matches!(supervisor.wait_timeout(TIMEOUT), Some(Ok(()))));
    }

    #[test]
    fn test_transport_error_is_fatal() {
        let (source, _drained) = ScriptedSource::new(1, Some(NetworkError::ConnectionError("reset".to_string())));
        let (_handle, host) = host_channel();
        let supervisor = launch(source, host, NoopInvalidator, Bitmap::filled(4, 4, 0)).unwrap();

        let result = supervisor.wait();
        assert!(matches!(result, Err(ViewerError::Network(NetworkError::ConnectionError(_)))));
    }

    #[test]
    fn test_destroy_error_is_fatal() {
        let (source, _drained) = ScriptedSource::new(0, None);
        let (handle, host) = host_channel();
        let supervisor = launch(source, host, NoopInvalidator, Bitmap::filled(4, 4, 0)).unwrap();

        handle.destroy(Some(HostError::new("surface lost")));
        assert!(matches!(supervisor.wait(), Err(ViewerError::Dispatch(DispatchError::Host(_)))));
    }

    #[test]
    fn test_paint_shows_last_frame() {
        let (source, drained) = ScriptedSource::new(3, None);
        let (handle, host) = host_channel();
        let supervisor = launch(source, host, NoopInvalidator, Bitmap::filled(4, 4, 0)).unwrap();

        drained.recv_timeout(TIMEOUT).unwrap();
        let list = handle.request_paint(ViewportExtent::new(30.0, 30.0)).unwrap();
        match &list.ops()[0] {
            DrawOp::Image(resource) => {
                assert_eq!(resource.generation, 3);
                assert_eq!(*resource.bitmap, Bitmap::filled(3, 1, 3));
            }
            other => panic!("unexpected op {:?}", other),
        }

        handle.destroy(None);
        assert!(supervisor.wait().is_ok());
    }

    #[test]
    fn test_actor_names() {
        assert_eq!(Actor::NetworkReceiver.to_string(), "network-receiver");
        assert_eq!(Actor::RenderWorker.name(), "render-worker");
        assert_eq!(Actor::EventDispatch.name(), "event-dispatch");
    }
}
