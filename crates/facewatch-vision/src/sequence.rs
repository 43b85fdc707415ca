//! 이미지 시퀀스 프레임 소스.
//!
//! 디렉토리의 이미지 파일(jpg/png/bmp)을 파일명 순으로 읽어 프레임으로 재생한다.
//! 카메라 없는 환경에서의 재현 실행과 테스트에 사용.

use facewatch_core::error::CoreError;
use facewatch_core::models::frame::Frame;
use facewatch_core::ports::camera::{FrameSource, FrameStream};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, info, warn};

/// 지원하는 이미지 확장자
const SUPPORTED_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "bmp"];

/// 이미지 시퀀스 프레임 소스
pub struct ImageSequenceSource {
    dir: PathBuf,
    frame_interval: Duration,
}

impl ImageSequenceSource {
    /// 새 소스 생성 (열기 전까지 디렉토리를 읽지 않음)
    pub fn new(dir: PathBuf, frame_interval: Duration) -> Self {
        Self {
            dir,
            frame_interval,
        }
    }
}

impl FrameSource for ImageSequenceSource {
    fn open(&self) -> Result<Box<dyn FrameStream>, CoreError> {
        let files = list_images(&self.dir)?;
        if files.is_empty() {
            return Err(CoreError::DeviceUnavailable(format!(
                "이미지 없음: {}",
                self.dir.display()
            )));
        }
        info!("이미지 시퀀스 열기: {}개 파일", files.len());
        Ok(Box::new(ImageSequenceStream {
            files,
            next: 0,
            frame_interval: self.frame_interval,
            released: false,
        }))
    }

    fn describe(&self) -> String {
        format!("이미지 시퀀스 {}", self.dir.display())
    }
}

/// 열린 이미지 시퀀스
struct ImageSequenceStream {
    files: Vec<PathBuf>,
    next: usize,
    frame_interval: Duration,
    released: bool,
}

impl FrameStream for ImageSequenceStream {
    fn read_frame(&mut self) -> Result<Frame, CoreError> {
        if self.released {
            return Err(CoreError::StreamEnded);
        }
        let Some(path) = self.files.get(self.next) else {
            return Err(CoreError::StreamEnded);
        };

        if self.next > 0 && !self.frame_interval.is_zero() {
            std::thread::sleep(self.frame_interval);
        }

        let image = image::open(path).map_err(|e| {
            warn!("프레임 파일 읽기 실패: {}: {e}", path.display());
            CoreError::StreamEnded
        })?;
        let index = self.next as u64;
        self.next += 1;
        debug!("프레임 #{index}: {}", path.display());
        Ok(Frame::new(index, image.to_rgb8()))
    }

    fn release(&mut self) {
        if !self.released {
            self.released = true;
            debug!("이미지 시퀀스 해제");
        }
    }
}

/// 디렉토리의 이미지 파일 목록 (파일명 정렬)
fn list_images(dir: &Path) -> Result<Vec<PathBuf>, CoreError> {
    let entries = fs::read_dir(dir).map_err(|e| {
        CoreError::DeviceUnavailable(format!("디렉토리 열기 실패: {}: {e}", dir.display()))
    })?;

    let mut files: Vec<PathBuf> = entries
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|path| {
            path.extension()
                .and_then(|ext| ext.to_str())
                .map(|ext| SUPPORTED_EXTENSIONS.contains(&ext.to_ascii_lowercase().as_str()))
                .unwrap_or(false)
        })
        .collect();
    files.sort();
    Ok(files)
}
