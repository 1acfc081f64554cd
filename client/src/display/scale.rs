//! スケーリング計算
//!
//! ビットマップを表示領域に収めるための一様スケールを計算します。

/// 描画可能な領域の大きさ
///
/// 描画要求ごとにディスプレイホストから渡され、保持されません。
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewportExtent {
    /// 幅
    pub width: f32,
    /// 高さ
    pub height: f32,
}

impl ViewportExtent {
    /// 新しい表示領域を作成
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }
}

/// アスペクト比を保ったまま表示領域に収まるスケールを計算
///
/// `min(vw / bw, vh / bh)` を返します。拘束される軸ではちょうど一致し、
/// もう一方の軸でははみ出しません。いずれかの値が正でない（または有限でない）
/// 場合は `None` です。
pub fn scale_to_fit(bitmap: (u32, u32), viewport: ViewportExtent) -> Option<f32> {
    let (bw, bh) = (bitmap.0 as f32, bitmap.1 as f32);
    let (vw, vh) = (viewport.width, viewport.height);

    let positive = |v: f32| v.is_finite() && v > 0.0;
    if !(positive(bw) && positive(bh) && positive(vw) && positive(vh)) {
        return None;
    }

    let scale_x = vw / bw;
    let scale_y = vh / bh;
    Some(scale_x.min(scale_y))
}
