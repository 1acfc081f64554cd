//! ディスプレイモジュール
//!
//! 受信したフレームのデコード、現在のビットマップを所有するレンダーワーカー、
//! 表示領域に合わせたスケーリング、描画命令の実行を担当します。

mod bitmap;
mod command;
mod decoder;
mod renderer;
mod scale;
mod worker;

pub use bitmap::Bitmap;
pub use command::{Affine, DrawList, DrawOp, ImageResource};
pub use decoder::{decode_frame, load_background, DecodeError};
pub use renderer::{DisplayRenderer, RenderError};
pub use scale::{scale_to_fit, ViewportExtent};
pub use worker::{Invalidate, RenderWorker, WorkerState};
