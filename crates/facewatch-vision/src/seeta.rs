//! rustface(SeetaFace) 기반 얼굴 검출기.
//!
//! 순수 Rust 구현이라 시스템 라이브러리가 필요 없다. 얼굴 영역만 검출하며
//! 눈/코/입 하위 특징은 `cascade` 검출기에서만 제공된다.

use facewatch_core::error::CoreError;
use facewatch_core::models::detection::{Detection, FeatureKind, Region};
use facewatch_core::models::frame::Frame;
use facewatch_core::ports::detector::FeatureDetector;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use tracing::{debug, info};

/// 검출 점수 임계값
const SCORE_THRESHOLD: f64 = 2.0;

/// 이미지 피라미드 축소 비율
const PYRAMID_SCALE_FACTOR: f32 = 0.8;

/// 슬라이딩 윈도우 간격 (픽셀)
const SLIDE_WINDOW_STEP: u32 = 4;

/// SeetaFace 얼굴 검출기
pub struct SeetaFaceDetector {
    model: rustface::Model,
    min_face_size: u32,
}

impl SeetaFaceDetector {
    /// 모델 파일 로드
    pub fn load(model_path: &Path, min_face_size: u32) -> Result<Self, CoreError> {
        let file = File::open(model_path).map_err(|e| {
            CoreError::Detector(format!(
                "SeetaFace 모델 열기 실패: {}: {e}",
                model_path.display()
            ))
        })?;
        let model = rustface::read_model(BufReader::new(file)).map_err(|e| {
            CoreError::Detector(format!(
                "SeetaFace 모델 파싱 실패: {}: {e}",
                model_path.display()
            ))
        })?;
        info!("SeetaFace 모델 로드: {}", model_path.display());
        Ok(Self {
            model,
            min_face_size,
        })
    }
}

impl FeatureDetector for SeetaFaceDetector {
    fn detect(&mut self, frame: &Frame) -> Detection {
        let gray = image::imageops::grayscale(&frame.image);
        let (width, height) = gray.dimensions();
        if width == 0 || height == 0 {
            return Detection::empty();
        }

        let mut detector = rustface::create_detector_with_model(self.model.clone());
        detector.set_min_face_size(self.min_face_size);
        detector.set_score_thresh(SCORE_THRESHOLD);
        detector.set_pyramid_scale_factor(PYRAMID_SCALE_FACTOR);
        detector.set_slide_window_step(SLIDE_WINDOW_STEP, SLIDE_WINDOW_STEP);

        let faces = detector.detect(&rustface::ImageData::new(gray.as_raw(), width, height));

        let regions: Vec<Region> = faces
            .iter()
            .filter_map(|face| {
                let bbox = face.bbox();
                clamp_to_frame(bbox.x(), bbox.y(), bbox.width(), bbox.height(), width, height)
            })
            .collect();

        if !regions.is_empty() {
            debug!("frame #{}: 얼굴 {}개", frame.index, regions.len());
        }
        Detection { regions }
    }

    fn name(&self) -> &'static str {
        "seetaface"
    }
}

/// 음수 좌표/이미지 밖 영역을 프레임 안으로 자른다
fn clamp_to_frame(x: i32, y: i32, w: u32, h: u32, frame_w: u32, frame_h: u32) -> Option<Region> {
    let x0 = x.max(0) as u32;
    let y0 = y.max(0) as u32;
    let x1 = (i64::from(x) + i64::from(w)).clamp(0, i64::from(frame_w)) as u32;
    let y1 = (i64::from(y) + i64::from(h)).clamp(0, i64::from(frame_h)) as u32;
    if x1 <= x0 || y1 <= y0 {
        return None;
    }
    Some(Region::new(FeatureKind::Face, x0, y0, x1 - x0, y1 - y0))
}
