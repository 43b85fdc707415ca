//! 프레임 미리보기 출력.
//!
//! 콘솔 환경에는 비디오 창이 없으므로 N 프레임마다 최신 주석 프레임을
//! JPEG 파일로 덮어쓴다. 외부 이미지 뷰어로 열어 확인한다.

use facewatch_core::error::CoreError;
use facewatch_core::models::frame::AnnotatedFrame;
use facewatch_core::ports::presenter::FrameSink;
use facewatch_vision::thumbnail::fit_within;
use image::ImageFormat;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// 최신 프레임을 파일로 저장하는 `FrameSink`
pub struct PreviewWriter {
    path: PathBuf,
    every_frames: u64,
    max_width: u32,
    max_height: u32,
    written: u64,
}

impl PreviewWriter {
    pub fn new(path: PathBuf, every_frames: u64, max_width: u32, max_height: u32) -> Self {
        Self {
            path,
            every_frames: every_frames.max(1),
            max_width,
            max_height,
            written: 0,
        }
    }

    /// 미리보기 파일 경로
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// 저장된 미리보기 수
    pub fn written(&self) -> u64 {
        self.written
    }

    fn write(&self, frame: &AnnotatedFrame) -> Result<(), CoreError> {
        let image = fit_within(&frame.frame.image, self.max_width, self.max_height)?;

        // 읽는 쪽이 반쯤 쓰인 파일을 보지 않도록 임시 파일에 쓰고 교체
        let tmp = self.path.with_extension("tmp");
        image
            .save_with_format(&tmp, ImageFormat::Jpeg)
            .map_err(|e| CoreError::Internal(format!("미리보기 저장 실패: {e}")))?;
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}

impl FrameSink for PreviewWriter {
    fn render(&mut self, frame: &AnnotatedFrame) {
        if frame.frame.index % self.every_frames != 0 {
            return;
        }
        match self.write(frame) {
            Ok(()) => {
                self.written += 1;
                debug!("미리보기 갱신: frame #{}", frame.frame.index);
            }
            Err(e) => warn!("미리보기 저장 실패 ({}): {e}", self.path.display()),
        }
    }
}

/// 아무것도 그리지 않는 `FrameSink`
#[derive(Debug, Default)]
pub struct NullFrameSink;

impl FrameSink for NullFrameSink {
    fn render(&mut self, _frame: &AnnotatedFrame) {}
}
