//! ネットワークレシーバー
//!
//! フレームソースからフレームを取り出し、ビットマップにデコードして
//! フレーム配送チャネルへ渡します。配送チャネルは容量 0 のランデブー
//! チャネルなので、送信はレンダーワーカーが受け取るまでブロックします。

use super::{FrameSource, NetworkError};
use crate::display::{decode_frame, Bitmap};
use crossbeam_channel::Sender;
use log::{debug, info, warn};

/// ネットワークレシーバー
pub struct NetworkReceiver<S: FrameSource> {
    /// フレームソース
    source: S,
    /// フレーム配送チャネル
    frames: Sender<Bitmap>,
    /// 受信したフレーム数
    received: u64,
    /// 破棄した不正なフレーム数
    skipped: u64,
}

impl<S: FrameSource> NetworkReceiver<S> {
    /// 新しいネットワークレシーバーを作成
    pub fn new(source: S, frames: Sender<Bitmap>) -> Self {
        Self {
            source,
            frames,
            received: 0,
            skipped: 0,
        }
    }

    /// ストリームが終わるまでフレームを受信して配送する
    ///
    /// ストリームの正常終了では `Ok(())`、転送エラーではそのエラーを返します。
    /// 不正なフレーム（サイズ 0 など）は警告を出して読み飛ばします。
    pub fn run(mut self) -> Result<(), NetworkError> {
        info!("フレームの受信を開始します");

        loop {
            let Some(response) = self.source.next_frame()? else {
                info!(
                    "フレームストリームが終了しました (受信 {} 枚, 破棄 {} 枚)",
                    self.received, self.skipped
                );
                return Ok(());
            };
            self.received += 1;

            let bitmap = match decode_frame(response) {
                Ok(bitmap) => bitmap,
                Err(e) => {
                    self.skipped += 1;
                    warn!("フレーム #{} を破棄しました: {}", self.received, e);
                    continue;
                }
            };

            if self.frames.send(bitmap).is_err() {
                debug!("レンダーワーカーが終了したため受信を停止します");
                return Ok(());
            }
        }
    }
}
