//! レンダーワーカー
//!
//! 現在のビットマップを唯一所有するスレッドです。描画要求と新しいフレームの
//! 2つの入力を同時に待ち、先に届いた方を処理します（両方準備済みの場合は
//! どちらが選ばれるか不定で、どちらかが飢えることはありません）。

use super::command::{Affine, DrawList, DrawOp, ImageResource};
use super::scale::{scale_to_fit, ViewportExtent};
use super::Bitmap;
use crate::ui::PaintRequest;
use crossbeam_channel::{never, select, Receiver, Sender};
use log::{debug, info};
use std::sync::Arc;

/// ディスプレイホストへ再描画を依頼するためのトレイト
pub trait Invalidate: Send {
    /// 将来の再描画をスケジュールする
    fn invalidate(&self);
}

/// ワーカーの状態
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkerState {
    /// 待機中
    Idle,
    /// 描画要求を処理中
    Painting,
}

/// レンダーワーカー
pub struct RenderWorker<I: Invalidate> {
    /// 現在のビットマップ
    current: Arc<Bitmap>,
    /// 差し替えごとに増える世代番号
    generation: u64,
    /// 状態
    state: WorkerState,
    /// 再描画の依頼先
    invalidator: I,
    /// 処理した描画要求の数
    paints: u64,
}

impl<I: Invalidate> RenderWorker<I> {
    /// 背景画像を初期ビットマップとしてワーカーを作成
    pub fn new(background: Bitmap, invalidator: I) -> Self {
        Self {
            current: Arc::new(background),
            generation: 0,
            state: WorkerState::Idle,
            invalidator,
            paints: 0,
        }
    }

    /// 現在のビットマップ
    pub fn current(&self) -> &Bitmap {
        &self.current
    }

    /// 現在の世代番号（受け取ったフレーム数）
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// 現在の状態
    pub fn state(&self) -> WorkerState {
        self.state
    }

    /// 現在のビットマップを表示領域に収める描画命令列を組み立てる
    ///
    /// 画像は原点に固定され、中央寄せはしません。スケールが求まらない場合
    /// （サイズ 0 の表示領域など）は空の命令列になります。
    pub fn build_draw_list(&self, viewport: ViewportExtent) -> DrawList {
        let mut list = DrawList::new();

        let Some(scale) = scale_to_fit(self.current.dimensions(), viewport) else {
            debug!(
                "スケールを計算できないため描画をスキップします: bitmap={:?}, viewport={:?}",
                self.current.dimensions(),
                viewport
            );
            return list;
        };

        list.push(DrawOp::Image(ImageResource {
            generation: self.generation,
            bitmap: Arc::clone(&self.current),
        }));
        list.push(DrawOp::Transform(Affine::uniform_scale(scale)));
        list.push(DrawOp::Paint);
        list
    }

    /// 描画要求を処理し、完了を通知する
    ///
    /// 完了通知の送信先がいなくなっていた場合は `false` を返します。
    pub fn handle_paint(&mut self, request: PaintRequest, done: &Sender<()>) -> bool {
        self.state = WorkerState::Painting;

        let list = self.build_draw_list(request.viewport());
        request.submit(list);
        self.paints += 1;

        self.state = WorkerState::Idle;
        done.send(()).is_ok()
    }

    /// 新しいビットマップに差し替え、再描画を依頼する
    pub fn handle_frame(&mut self, bitmap: Bitmap) {
        self.current = Arc::new(bitmap);
        self.generation += 1;
        debug!(
            "フレーム #{} に差し替えました ({}x{})",
            self.generation,
            self.current.width(),
            self.current.height()
        );
        self.invalidator.invalidate();
    }

    /// ワーカーのメインループ
    ///
    /// 描画要求チャネルが閉じられるまで動き続けます。フレーム配送チャネルが
    /// 閉じられた後は描画要求だけを処理します。
    pub fn run(mut self, paint_rx: Receiver<PaintRequest>, frame_rx: Receiver<Bitmap>, done_tx: Sender<()>) {
        let mut frame_rx = frame_rx;

        loop {
            let mut stream_closed = false;

            select! {
                recv(paint_rx) -> request => match request {
                    Ok(request) => {
                        if !self.handle_paint(request, &done_tx) {
                            debug!("完了通知の送信先が終了しました");
                            break;
                        }
                    }
                    Err(_) => {
                        debug!("描画要求チャネルが閉じられました");
                        break;
                    }
                },
                recv(frame_rx) -> bitmap => match bitmap {
                    Ok(bitmap) => self.handle_frame(bitmap),
                    Err(_) => stream_closed = true,
                },
            }

            if stream_closed {
                debug!("フレーム配送チャネルが閉じられました");
                frame_rx = never();
            }
        }

        info!(
            "レンダーワーカーを終了します (フレーム {} 枚, 描画 {} 回)",
            self.generation, self.paints
        );
    }
}
