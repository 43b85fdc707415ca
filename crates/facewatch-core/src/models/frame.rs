//! 카메라 프레임 모델.

use image::RgbImage;

use super::detection::{Detection, Region};

/// 카메라에서 읽은 RGB 프레임
#[derive(Debug, Clone)]
pub struct Frame {
    /// 스트림 내 순번 (0부터)
    pub index: u64,
    /// 픽셀 데이터
    pub image: RgbImage,
}

impl Frame {
    /// 새 프레임 생성
    pub fn new(index: u64, image: RgbImage) -> Self {
        Self { index, image }
    }

    /// (너비, 높이)
    pub fn dimensions(&self) -> (u32, u32) {
        self.image.dimensions()
    }
}

/// 검출 영역이 그려진 프레임
#[derive(Debug, Clone)]
pub struct AnnotatedFrame {
    /// 주석이 그려진 프레임
    pub frame: Frame,
    /// 검출 결과 (검출 모드 Off면 비어 있음)
    pub detection: Detection,
}

impl AnnotatedFrame {
    /// 검출 없이 원본 그대로
    pub fn plain(frame: Frame) -> Self {
        Self {
            frame,
            detection: Detection::empty(),
        }
    }

    /// 검출 영역
    pub fn regions(&self) -> &[Region] {
        &self.detection.regions
    }

    /// 특징 존재 여부
    pub fn feature_present(&self) -> bool {
        self.detection.feature_present()
    }
}
