//! TCP サーバー実装
//!
//! 1接続につき1スレッドで、要求されたノードのフレームを一定間隔で送信します。

use super::NetworkError;
use crate::config::ServerConfig;
use frame_viewer_rs_common::protocol::{self, ImageRequest, StreamMessage};
use frame_viewer_rs_common::{CommonError, ErrorCode, ImageResponse};
use log::{debug, error, info, warn};
use std::io::{self, ErrorKind};
use std::net::{SocketAddr, TcpListener, TcpStream};
use std::sync::Arc;
use std::thread;
use std::time::Instant;

/// フレームサーバー
pub struct FrameServer {
    /// サーバー設定
    config: Arc<ServerConfig>,
    /// 接続待ち受けソケット
    listener: TcpListener,
}

impl FrameServer {
    /// 設定されたアドレスにバインド
    ///
    /// フレーム生成器を一度作成し、設定の誤りを起動時に検出します。
    pub fn bind(config: ServerConfig) -> Result<Self, NetworkError> {
        config.producer.create()?;

        let listener = TcpListener::bind(config.address())?;
        info!("TCPサーバー起動: {} (ノード: {:?})", listener.local_addr()?, config.nodes);

        Ok(Self {
            config: Arc::new(config),
            listener,
        })
    }

    /// 実際にバインドされたアドレス
    pub fn local_addr(&self) -> Result<SocketAddr, NetworkError> {
        Ok(self.listener.local_addr()?)
    }

    /// 接続を受け付け続ける
    pub fn run(self) -> Result<(), NetworkError> {
        for stream in self.listener.incoming() {
            let stream = match stream {
                Ok(stream) => stream,
                Err(e) => {
                    error!("接続受付エラー: {}", e);
                    continue;
                }
            };

            let peer = match stream.peer_addr() {
                Ok(peer) => peer,
                Err(e) => {
                    warn!("接続元アドレスを取得できません: {}", e);
                    continue;
                }
            };
            let config = Arc::clone(&self.config);
            thread::Builder::new()
                .name(format!("client-{}", peer))
                .spawn(move || {
                    info!("クライアント接続: {}", peer);
                    match serve_client(stream, &config) {
                        Ok(sent) => info!("クライアント切断: {} ({} フレーム送信)", peer, sent),
                        Err(e) => warn!("クライアント {} の処理中にエラーが発生しました: {}", peer, e),
                    }
                })?;
        }

        Ok(())
    }
}

/// 1クライアント分の要求を処理し、送信したフレーム数を返す
pub fn serve_client(mut stream: TcpStream, config: &ServerConfig) -> Result<u64, NetworkError> {
    // TCP_NODELAY フラグを設定（Nagle アルゴリズムを無効化）
    stream.set_nodelay(true)?;

    let Some(request) = protocol::read_message::<_, ImageRequest>(&mut stream)? else {
        debug!("要求を受け取る前に切断されました");
        return Ok(0);
    };

    let node = request.node.name;
    if !config.has_node(&node) {
        warn!("不明なノードが要求されました: {:?}", node);
        let reply = StreamMessage::Error {
            code: ErrorCode::ResourceNotFoundError.code(),
            message: format!("Unknown node: {}", node),
        };
        protocol::write_message(&mut stream, &reply)?;
        return Ok(0);
    }

    let mut producer = match config.producer.create() {
        Ok(producer) => producer,
        Err(e) => {
            let reply = StreamMessage::Error {
                code: ErrorCode::GeneralError.code(),
                message: e.to_string(),
            };
            protocol::write_message(&mut stream, &reply)?;
            return Err(e.into());
        }
    };

    debug!("ノード {:?} の配信を開始します", node);

    let interval = config.interval();
    let mut next = Instant::now();
    let mut sent = 0;

    loop {
        if config.frame_limit.map_or(false, |limit| sent >= limit) {
            protocol::write_message(&mut stream, &StreamMessage::End)?;
            return Ok(sent);
        }

        let frame = producer.next_frame()?;
        let (width, height) = frame.dimensions();
        let message = StreamMessage::Image(ImageResponse::gray(width, height, frame.into_raw()));

        match protocol::write_message(&mut stream, &message) {
            Ok(()) => sent += 1,
            Err(CommonError::IoError(e)) if is_disconnect(&e) => return Ok(sent),
            Err(e) => return Err(e.into()),
        }

        next += interval;
        let now = Instant::now();
        if next > now {
            thread::sleep(next - now);
        } else {
            // 遅れた分は取り戻さない
            next = now;
        }
    }
}

fn is_disconnect(e: &io::Error) -> bool {
    matches!(
        e.kind(),
        ErrorKind::BrokenPipe | ErrorKind::ConnectionReset | ErrorKind::ConnectionAborted
    )
}
