//! TCP フレームソース
//!
//! TCP ソケット上の長さプレフィックス付きメッセージとしてフレームを受信します。

use super::{FrameSource, NetworkError};
use crate::config::ServerSettings;
use frame_viewer_rs_common::protocol::{self, ImageRequest, NodeSelector, StreamMessage};
use frame_viewer_rs_common::{ErrorCode, ImageResponse};
use log::{debug, info, warn};
use std::io::BufReader;
use std::net::{TcpStream, ToSocketAddrs};
use std::time::Duration;

/// TCP フレームソース
pub struct TcpFrameSource {
    /// 受信ストリーム
    reader: BufReader<TcpStream>,
    /// ストリームが終了したかどうか
    finished: bool,
}

impl TcpFrameSource {
    /// サーバーに接続し、指定ノードの画像ストリームを要求
    pub fn connect(settings: &ServerSettings, node: &NodeSelector) -> Result<Self, NetworkError> {
        let address = settings.address();
        let addr = address
            .to_socket_addrs()
            .map_err(|e| NetworkError::ConnectionError(format!("Invalid host {}: {}", address, e)))?
            .next()
            .ok_or_else(|| NetworkError::ConnectionError(format!("No address for {}", address)))?;

        let stream = TcpStream::connect_timeout(&addr, Duration::from_millis(settings.timeout_ms))
            .map_err(|e| NetworkError::ConnectionError(format!("Connection failed: {}", e)))?;

        info!("{} に接続しました", addr);
        Self::from_stream(stream, node)
    }

    /// 接続済みのストリームで画像ストリームを要求
    pub fn from_stream(mut stream: TcpStream, node: &NodeSelector) -> Result<Self, NetworkError> {
        // ノンブロッキングモードを無効化
        stream.set_nonblocking(false)?;
        // TCP_NODELAY フラグを設定（Nagle アルゴリズムを無効化）
        stream.set_nodelay(true)?;

        let request = ImageRequest { node: node.clone() };
        protocol::write_message(&mut stream, &request)?;
        debug!("画像ストリームを要求しました: {:?}", node.name);

        Ok(Self {
            reader: BufReader::new(stream),
            finished: false,
        })
    }
}

impl FrameSource for TcpFrameSource {
    fn next_frame(&mut self) -> Result<Option<ImageResponse>, NetworkError> {
        if self.finished {
            return Ok(None);
        }

        // メッセージ境界での切断は `None` として返る
        match protocol::read_message::<_, StreamMessage>(&mut self.reader)? {
            Some(StreamMessage::Image(frame)) => Ok(Some(frame)),
            Some(StreamMessage::End) | None => {
                self.finished = true;
                Ok(None)
            }
            Some(StreamMessage::Error { code, message }) => {
                self.finished = true;
                warn!("サーバーがエラーを返しました: {} ({})", ErrorCode::from_i32(code).as_str(), message);
                Err(NetworkError::RemoteError { code, message })
            }
        }
    }
}
