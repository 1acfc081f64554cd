//! 描画コマンド
//!
//! レンダーワーカーが描画要求ごとに組み立て、ディスプレイホストへ渡す
//! 描画命令の列を定義します。

use super::Bitmap;
use std::sync::Arc;

/// 2次元アフィン変換（回転なし）
///
/// `p' = (scale_x * p.x + offset_x, scale_y * p.y + offset_y)`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Affine {
    /// X方向の拡大率
    pub scale_x: f32,
    /// Y方向の拡大率
    pub scale_y: f32,
    /// X方向の平行移動
    pub offset_x: f32,
    /// Y方向の平行移動
    pub offset_y: f32,
}

impl Affine {
    /// 恒等変換
    pub const IDENTITY: Affine = Affine {
        scale_x: 1.0,
        scale_y: 1.0,
        offset_x: 0.0,
        offset_y: 0.0,
    };

    /// 原点を中心とした一様スケール
    pub fn uniform_scale(scale: f32) -> Self {
        Self::scale_about((0.0, 0.0), scale, scale)
    }

    /// 指定点を中心としたスケール
    pub fn scale_about(origin: (f32, f32), scale_x: f32, scale_y: f32) -> Self {
        Self {
            scale_x,
            scale_y,
            offset_x: origin.0 - origin.0 * scale_x,
            offset_y: origin.1 - origin.1 * scale_y,
        }
    }

    /// `self` を適用した後に `next` を適用する変換
    pub fn then(self, next: Affine) -> Affine {
        Affine {
            scale_x: self.scale_x * next.scale_x,
            scale_y: self.scale_y * next.scale_y,
            offset_x: self.offset_x * next.scale_x + next.offset_x,
            offset_y: self.offset_y * next.scale_y + next.offset_y,
        }
    }

    /// 点を変換
    pub fn apply(&self, point: (f32, f32)) -> (f32, f32) {
        (
            self.scale_x * point.0 + self.offset_x,
            self.scale_y * point.1 + self.offset_y,
        )
    }
}

impl Default for Affine {
    fn default() -> Self {
        Self::IDENTITY
    }
}

/// 描画可能な画像リソース
///
/// `generation` はレンダーワーカーが画像を差し替えるたびに増加し、
/// ホスト側のテクスチャキャッシュのキーになります。
#[derive(Debug, Clone)]
pub struct ImageResource {
    /// 世代番号
    pub generation: u64,
    /// 画像
    pub bitmap: Arc<Bitmap>,
}

/// 描画命令
#[derive(Debug, Clone)]
pub enum DrawOp {
    /// 以降の Paint で使う画像を指定
    Image(ImageResource),
    /// 現在の変換に追加する変換
    Transform(Affine),
    /// 現在の画像を現在の変換で描画
    Paint,
}

/// 描画命令の列（追記のみ）
#[derive(Debug, Clone, Default)]
pub struct DrawList {
    ops: Vec<DrawOp>,
}

impl DrawList {
    /// 空の描画命令列を作成
    pub fn new() -> Self {
        Self::default()
    }

    /// 命令を追加
    pub fn push(&mut self, op: DrawOp) {
        self.ops.push(op);
    }

    /// 命令列
    pub fn ops(&self) -> &[DrawOp] {
        &self.ops
    }

    /// 命令数
    pub fn len(&self) -> usize {
        self.ops.len()
    }

    /// 空かどうか
    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }

    /// Paint 命令ごとに (画像, 累積変換) を列挙
    ///
    /// 画像が指定される前の Paint は無視されます。
    pub fn paints(&self) -> Vec<(&ImageResource, Affine)> {
        let mut current: Option<&ImageResource> = None;
        let mut transform = Affine::IDENTITY;
        let mut paints = Vec::new();

        for op in &self.ops {
            match op {
                DrawOp::Image(resource) => current = Some(resource),
                DrawOp::Transform(next) => transform = transform.then(*next),
                DrawOp::Paint => {
                    if let Some(resource) = current {
                        paints.push((resource, transform));
                    }
                }
            }
        }

        paints
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_uniform_scale_keeps_origin() {
        let affine = Affine::uniform_scale(2.5);
        assert_eq!(affine.apply((0.0, 0.0)), (0.0, 0.0));
        assert_eq!(affine.apply((4.0, 2.0)), (10.0, 5.0));
    }

    #[test]
    fn test_scale_about_point() {
        let affine = Affine::scale_about((10.0, 10.0), 2.0, 2.0);
        assert_eq!(affine.apply((10.0, 10.0)), (10.0, 10.0));
        assert_eq!(affine.apply((11.0, 12.0)), (12.0, 14.0));
    }

    #[test]
    fn test_then_composes_in_order() {
        let translate = Affine { offset_x: 1.0, offset_y: 2.0, ..Affine::IDENTITY };
        let scale = Affine::uniform_scale(3.0);
        let combined = translate.then(scale);
        assert_eq!(combined.apply((1.0, 1.0)), scale.apply(translate.apply((1.0, 1.0))));
    }

    #[test]
    fn test_paints_accumulate_transform() {
        let bitmap = Arc::new(Bitmap::filled(2, 2, 0));
        let mut list = DrawList::new();
        list.push(DrawOp::Paint);
        list.push(DrawOp::Image(ImageResource { generation: 7, bitmap }));
        list.push(DrawOp::Transform(Affine::uniform_scale(2.0)));
        list.push(DrawOp::Transform(Affine::uniform_scale(3.0)));
        list.push(DrawOp::Paint);

        let paints = list.paints();
        assert_eq!(paints.len(), 1);
        assert_eq!(paints[0].0.generation, 7);
        assert_eq!(paints[0].1, Affine::uniform_scale(6.0));
    }
}
