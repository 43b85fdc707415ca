//! OpenCV Haar cascade 검출기.
//!
//! 전체 프레임에서 얼굴을 찾고, 각 얼굴 영역 안에서 눈/코/입을 찾는다.
//! 하위 특징 좌표는 프레임 좌표계로 변환해 돌려준다.

use facewatch_core::config::DetectorConfig;
use facewatch_core::error::CoreError;
use facewatch_core::models::detection::{Detection, FeatureKind, Region};
use facewatch_core::models::frame::Frame;
use facewatch_core::ports::detector::FeatureDetector;
use opencv::core::{self, Mat, Rect, Size, Vector};
use opencv::objdetect::CascadeClassifier;
use opencv::prelude::*;
use std::path::Path;
use tracing::{info, warn};

const FACE_CASCADE: &str = "haarcascade_frontalface_default.xml";
const EYE_CASCADE: &str = "haarcascade_eye.xml";
const NOSE_CASCADE: &str = "haarcascade_mcs_nose.xml";
const MOUTH_CASCADE: &str = "haarcascade_mcs_mouth.xml";

/// Haar cascade 검출기
pub struct CascadeDetector {
    face: CascadeClassifier,
    /// 얼굴 영역 안에서 찾는 하위 특징
    parts: Vec<(FeatureKind, CascadeClassifier)>,
    scale_factor: f64,
    min_neighbors: i32,
    min_face_size: i32,
}

impl CascadeDetector {
    /// `cascade_dir`에서 네 개의 cascade XML 로드
    pub fn load(config: &DetectorConfig) -> Result<Self, CoreError> {
        let dir = config.cascade_dir.as_path();
        let face = load_classifier(dir, FACE_CASCADE)?;
        let parts = vec![
            (FeatureKind::Eye, load_classifier(dir, EYE_CASCADE)?),
            (FeatureKind::Nose, load_classifier(dir, NOSE_CASCADE)?),
            (FeatureKind::Mouth, load_classifier(dir, MOUTH_CASCADE)?),
        ];
        info!("Haar cascade 로드: {}", dir.display());

        Ok(Self {
            face,
            parts,
            scale_factor: config.scale_factor,
            min_neighbors: config.min_neighbors,
            min_face_size: config.min_face_size as i32,
        })
    }

    fn try_detect(&mut self, frame: &Frame) -> opencv::Result<Vec<Region>> {
        let gray = image::imageops::grayscale(&frame.image);
        let (width, height) = gray.dimensions();
        let gray = Mat::from_slice(gray.as_raw())?
            .reshape(1, height as i32)?
            .try_clone()?;
        debug_assert_eq!(gray.cols() as u32, width);

        let mut faces = Vector::<Rect>::new();
        self.face.detect_multi_scale(
            &gray,
            &mut faces,
            self.scale_factor,
            self.min_neighbors,
            0,
            Size::new(self.min_face_size, self.min_face_size),
            Size::default(),
        )?;

        let mut regions = Vec::new();
        for face_rect in faces.iter() {
            let face = to_region(FeatureKind::Face, face_rect);
            let roi = Mat::roi(&gray, face_rect)?.try_clone()?;

            for (kind, classifier) in self.parts.iter_mut() {
                let mut found = Vector::<Rect>::new();
                classifier.detect_multi_scale(
                    &roi,
                    &mut found,
                    self.scale_factor,
                    self.min_neighbors,
                    0,
                    Size::default(),
                    Size::default(),
                )?;
                regions.extend(found.iter().map(|r| to_region(*kind, r).offset_by(&face)));
            }
            regions.push(face);
        }
        Ok(regions)
    }
}

impl FeatureDetector for CascadeDetector {
    fn detect(&mut self, frame: &Frame) -> Detection {
        match self.try_detect(frame) {
            Ok(regions) => Detection { regions },
            Err(e) => {
                warn!("frame #{} 검출 실패: {e}", frame.index);
                Detection::empty()
            }
        }
    }

    fn name(&self) -> &'static str {
        "haar-cascade"
    }
}

fn load_classifier(dir: &Path, file_name: &str) -> Result<CascadeClassifier, CoreError> {
    let path = dir.join(file_name);
    if !path.is_file() {
        return Err(CoreError::Detector(format!(
            "cascade 파일 없음: {}",
            path.display()
        )));
    }
    let path_str = path
        .to_str()
        .ok_or_else(|| CoreError::Detector(format!("잘못된 경로: {}", path.display())))?;
    let classifier = CascadeClassifier::new(path_str)
        .map_err(|e| CoreError::Detector(format!("cascade 로드 실패: {path_str}: {e}")))?;
    if classifier.empty().unwrap_or(true) {
        return Err(CoreError::Detector(format!("빈 cascade: {path_str}")));
    }
    Ok(classifier)
}

fn to_region(kind: FeatureKind, rect: Rect) -> Region {
    Region::new(
        kind,
        rect.x.max(0) as u32,
        rect.y.max(0) as u32,
        rect.width.max(0) as u32,
        rect.height.max(0) as u32,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_cascade_dir_is_detector_error() {
        let config = DetectorConfig {
            cascade_dir: "/nonexistent/haar".into(),
            ..facewatch_core::config::AppConfig::default_config().detector
        };
        assert!(matches!(
            CascadeDetector::load(&config),
            Err(CoreError::Detector(_))
        ));
    }
}
