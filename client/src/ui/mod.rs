//! UIモジュール
//!
//! ディスプレイホストとの境界、イベントディスパッチループ、
//! egui によるビューアウィンドウを提供します。

mod dispatch;
mod host;
mod window;

pub use dispatch::{DispatchError, EventDispatchLoop};
pub use host::{host_channel, ChannelHost, DisplayHost, HostError, HostEvent, HostHandle, PaintRequest};
pub use window::ViewerWindow;
