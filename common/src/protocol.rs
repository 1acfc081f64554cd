//! 通信プロトコル定義
//!
//! フレームソース（サーバー）とビューア（クライアント）の間で送受信される
//! メッセージと、その長さプレフィックス付きフレーミングを定義します。
//!
//! 1メッセージは 4 バイトのビッグエンディアン長に続く JSON 本体で構成されます。

use crate::error::{CommonError, Result};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::io::{ErrorKind, Read, Write};

/// 1メッセージの最大サイズ（バイト）
pub const MAX_MESSAGE_SIZE: usize = 64 * 1024 * 1024;

/// 画像ソースとなるノードの指定
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeSelector {
    /// ノード名
    pub name: String,
}

impl NodeSelector {
    /// ノード名から作成
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

/// 画像ストリームの要求
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageRequest {
    /// 対象ノード
    pub node: NodeSelector,
}

/// 画素フォーマット
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ImageFormat {
    /// 単一チャネルのグレースケール
    #[default]
    Gray,
    /// RGB
    Rgb,
    /// YUYV 4:2:2
    Yuyv422,
    /// YUV 4:2:0 プレーナー
    Yuv420p,
    /// YUVJ 4:2:0 プレーナー（フルレンジ）
    Yuvj420p,
}

/// 1フレーム分の画像
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageResponse {
    /// 幅
    pub width: u32,
    /// 高さ
    pub height: u32,
    /// 画素フォーマット
    #[serde(default)]
    pub format: ImageFormat,
    /// プレーンごとのサンプル列（行優先）
    #[serde(with = "base64_planes")]
    pub data: Vec<Vec<u8>>,
}

impl ImageResponse {
    /// グレースケール1プレーンの画像を作成
    pub fn gray(width: u32, height: u32, samples: Vec<u8>) -> Self {
        Self {
            width,
            height,
            format: ImageFormat::Gray,
            data: vec![samples],
        }
    }
}

/// サーバーからクライアントへ流れるストリームメッセージ
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum StreamMessage {
    /// 画像フレーム
    Image(ImageResponse),
    /// ストリームの正常終了
    End,
    /// サーバー側エラー（ストリームはここで終わる）
    Error {
        /// エラーコード
        code: i32,
        /// エラーメッセージ
        message: String,
    },
}

/// メッセージを書き込む
pub fn write_message<W: Write, T: Serialize>(writer: &mut W, message: &T) -> Result<()> {
    let body = serde_json::to_vec(message)?;
    if body.len() > MAX_MESSAGE_SIZE {
        return Err(CommonError::MessageTooLarge {
            size: body.len(),
            limit: MAX_MESSAGE_SIZE,
        });
    }

    writer.write_all(&(body.len() as u32).to_be_bytes())?;
    writer.write_all(&body)?;
    writer.flush()?;
    Ok(())
}

/// メッセージを読み込む
///
/// 長さプレフィックスの手前で接続が閉じられた場合は `Ok(None)` を返します。
/// メッセージの途中で閉じられた場合は [`CommonError::TruncatedMessage`] です。
pub fn read_message<R: Read, T: DeserializeOwned>(reader: &mut R) -> Result<Option<T>> {
    let mut len_bytes = [0u8; 4];
    let mut filled = 0;
    while filled < len_bytes.len() {
        match reader.read(&mut len_bytes[filled..]) {
            Ok(0) if filled == 0 => return Ok(None),
            Ok(0) => return Err(CommonError::TruncatedMessage),
            Ok(n) => filled += n,
            Err(e) if e.kind() == ErrorKind::Interrupted => continue,
            Err(e) => return Err(e.into()),
        }
    }

    let len = u32::from_be_bytes(len_bytes) as usize;
    if len > MAX_MESSAGE_SIZE {
        return Err(CommonError::MessageTooLarge {
            size: len,
            limit: MAX_MESSAGE_SIZE,
        });
    }

    let mut body = vec![0u8; len];
    reader.read_exact(&mut body).map_err(|e| match e.kind() {
        ErrorKind::UnexpectedEof => CommonError::TruncatedMessage,
        _ => CommonError::IoError(e),
    })?;

    Ok(Some(serde_json::from_slice(&body)?))
}

/// プレーン列を base64 文字列の配列として (de)serialize する
mod base64_planes {
    use base64::engine::general_purpose::STANDARD;
    use base64::Engine as _;
    use serde::de::Error as _;
    use serde::ser::SerializeSeq;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(planes: &[Vec<u8>], serializer: S) -> Result<S::Ok, S::Error> {
        let mut seq = serializer.serialize_seq(Some(planes.len()))?;
        for plane in planes {
            seq.serialize_element(&STANDARD.encode(plane))?;
        }
        seq.end()
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<Vec<u8>>, D::Error> {
        let encoded = Vec::<String>::deserialize(deserializer)?;
        encoded
            .iter()
            .map(|plane| STANDARD.decode(plane).map_err(D::Error::custom))
            .collect()
    }
}
