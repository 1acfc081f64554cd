//! 画像シーケンス生成器
//!
//! ディレクトリ内の画像をファイル名順に読み込み、グレースケールに変換して
//! 繰り返し配信します。

use super::{CaptureError, FrameProducer};
use image::GrayImage;
use log::{debug, warn};
use std::fs;
use std::path::{Path, PathBuf};

/// 読み込み対象の拡張子
const EXTENSIONS: &[&str] = &["png", "jpg", "jpeg"];

/// 画像シーケンス生成器
pub struct ImageSequenceProducer {
    frames: Vec<GrayImage>,
    index: usize,
}

impl ImageSequenceProducer {
    /// ディレクトリ内の画像を読み込む
    ///
    /// 読み込めないファイルは警告を出して読み飛ばします。
    pub fn open(dir: impl AsRef<Path>) -> Result<Self, CaptureError> {
        let dir = dir.as_ref();

        let mut paths: Vec<PathBuf> = fs::read_dir(dir)?
            .filter_map(|entry| entry.ok().map(|e| e.path()))
            .filter(|path| has_image_extension(path))
            .collect();
        paths.sort();

        let mut frames = Vec::with_capacity(paths.len());
        for path in &paths {
            match image::open(path) {
                Ok(image) => {
                    debug!("フレームを読み込みました: {}", path.display());
                    frames.push(image.to_luma8());
                }
                Err(e) => warn!("{} を読み込めません: {}", path.display(), e),
            }
        }

        Self::from_frames(frames).map_err(|_| CaptureError::NoImages(dir.to_path_buf()))
    }

    /// 読み込み済みのフレームから作成
    pub fn from_frames(frames: Vec<GrayImage>) -> Result<Self, CaptureError> {
        if frames.is_empty() {
            return Err(CaptureError::InvalidConfig("フレームが 1 枚もありません".to_string()));
        }
        Ok(Self { frames, index: 0 })
    }

    /// フレーム数
    pub fn frame_count(&self) -> usize {
        self.frames.len()
    }
}

fn has_image_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| EXTENSIONS.contains(&ext.to_ascii_lowercase().as_str()))
        .unwrap_or(false)
}

impl FrameProducer for ImageSequenceProducer {
    fn next_frame(&mut self) -> Result<GrayImage, CaptureError> {
        let frame = self.frames[self.index].clone();
        self.index = (self.index + 1) % self.frames.len();
        Ok(frame)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;

    #[test]
    fn test_frames_cycle() {
        let frames = vec![GrayImage::new(1, 1), GrayImage::from_raw(1, 1, vec![7]).unwrap()];
        let mut producer = ImageSequenceProducer::from_frames(frames).unwrap();

        assert_eq!(producer.frame_count(), 2);
        assert_eq!(producer.next_frame().unwrap().as_raw(), &[0]);
        assert_eq!(producer.next_frame().unwrap().as_raw(), &[7]);
        assert_eq!(producer.next_frame().unwrap().as_raw(), &[0]);
    }

    #[test]
    fn test_open_directory() {
        let dir = env::temp_dir().join(format!("frame-viewer-sequence-{}", std::process::id()));
        fs::create_dir_all(&dir).unwrap();
        GrayImage::from_raw(2, 1, vec![10, 20]).unwrap().save(dir.join("b.png")).unwrap();
        GrayImage::from_raw(2, 1, vec![30, 40]).unwrap().save(dir.join("a.png")).unwrap();
        fs::write(dir.join("notes.txt"), "skip").unwrap();

        let mut producer = ImageSequenceProducer::open(&dir).unwrap();
        assert_eq!(producer.frame_count(), 2);
        assert_eq!(producer.next_frame().unwrap().as_raw(), &[30, 40]);
        assert_eq!(producer.next_frame().unwrap().as_raw(), &[10, 20]);

        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_empty_directory() {
        let dir = env::temp_dir().join(format!("frame-viewer-empty-{}", std::process::id()));
        fs::create_dir_all(&dir).unwrap();
        assert!(matches!(ImageSequenceProducer::open(&dir), Err(CaptureError::NoImages(_))));
        fs::remove_dir_all(&dir).unwrap();
    }
}
