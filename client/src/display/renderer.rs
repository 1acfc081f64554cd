//! 画面レンダリングモジュール
//!
//! レンダーワーカーから返された描画命令列を egui のペインターで実行します。

use super::command::{Affine, DrawList, ImageResource};
use super::Bitmap;
use egui::{pos2, vec2, Color32, ColorImage, Context, Painter, Pos2, Rect, TextureHandle, TextureId, TextureOptions};
use thiserror::Error;

/// レンダリングエラー
#[derive(Error, Debug)]
pub enum RenderError {
    /// 画像変換エラー
    #[error("画像変換に失敗しました: {0}")]
    ImageConversionFailed(String),
}

/// ディスプレイレンダラー
pub struct DisplayRenderer {
    /// eguiコンテキスト
    ctx: Context,
    /// 表示用テクスチャと、その元になった画像の世代番号
    texture: Option<(u64, TextureHandle)>,
}

impl DisplayRenderer {
    /// 新しいディスプレイレンダラーを作成
    pub fn new(ctx: Context) -> Self {
        Self {
            ctx,
            texture: None,
        }
    }

    /// 描画命令列を実行
    ///
    /// `origin` は描画面の左上です。描画した画像の数を返します。
    pub fn render(&mut self, painter: &Painter, origin: Pos2, list: &DrawList) -> Result<usize, RenderError> {
        let paints = list.paints();

        for (resource, transform) in &paints {
            let texture = self.texture_for(resource)?;
            let rect = paint_rect(origin, *transform, resource.bitmap.dimensions());
            painter.image(
                texture,
                rect,
                Rect::from_min_max(pos2(0.0, 0.0), pos2(1.0, 1.0)),
                Color32::WHITE,
            );
        }

        Ok(paints.len())
    }

    /// 画像に対応するテクスチャを取得（世代が変わった場合のみ再転送）
    fn texture_for(&mut self, resource: &ImageResource) -> Result<TextureId, RenderError> {
        if let Some((generation, texture)) = &self.texture {
            if *generation == resource.generation {
                return Ok(texture.id());
            }
        }

        let image = to_color_image(&resource.bitmap)?;

        match &mut self.texture {
            Some((generation, texture)) => {
                texture.set(image, TextureOptions::LINEAR);
                *generation = resource.generation;
                Ok(texture.id())
            }
            None => {
                let texture = self.ctx.load_texture("remote_frame", image, TextureOptions::LINEAR);
                let id = texture.id();
                self.texture = Some((resource.generation, texture));
                Ok(id)
            }
        }
    }
}

/// 変換後の画像の表示矩形を計算
pub fn paint_rect(origin: Pos2, transform: Affine, dimensions: (u32, u32)) -> Rect {
    let (min_x, min_y) = transform.apply((0.0, 0.0));
    let (max_x, max_y) = transform.apply((dimensions.0 as f32, dimensions.1 as f32));
    Rect::from_min_max(origin + vec2(min_x, min_y), origin + vec2(max_x, max_y))
}

/// グレースケールのビットマップを egui の画像に変換
pub fn to_color_image(bitmap: &Bitmap) -> Result<ColorImage, RenderError> {
    let (width, height) = bitmap.dimensions();
    let expected = width as usize * height as usize;
    if bitmap.samples().len() != expected {
        return Err(RenderError::ImageConversionFailed(format!(
            "Invalid data size: expected {} but got {}",
            expected,
            bitmap.samples().len()
        )));
    }

    Ok(ColorImage {
        size: [width as usize, height as usize],
        pixels: bitmap.samples().iter().map(|&v| Color32::from_gray(v)).collect(),
    })
}
