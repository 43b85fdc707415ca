//! # facewatch-vision
//!
//! 카메라 프레임 소스와 얼굴 특징 검출기 어댑터.
//!
//! - [`sequence`]: 디렉토리의 이미지 파일을 프레임으로 재생
//! - [`camera`]: OpenCV `VideoCapture` 카메라 (`opencv` feature)
//! - [`seeta`]: rustface(SeetaFace) 얼굴 검출기
//! - [`cascade`]: OpenCV Haar cascade 얼굴/눈/코/입 검출기 (`opencv` feature)
//! - [`annotate`]: 검출 영역 사각형 그리기
//! - [`thumbnail`]: 미리보기용 축소

pub mod annotate;
#[cfg(feature = "opencv")]
pub mod camera;
#[cfg(feature = "opencv")]
pub mod cascade;
pub mod seeta;
pub mod sequence;
pub mod thumbnail;

use facewatch_core::config::{AppConfig, DetectorBackend};
use facewatch_core::error::CoreError;
use facewatch_core::ports::camera::FrameSource;
use facewatch_core::ports::detector::FeatureDetector;
use tracing::info;

/// 설정에 맞는 프레임 소스 생성
///
/// `camera.frames_dir`가 지정되면 이미지 시퀀스를 재생하고,
/// 아니면 OpenCV 카메라를 사용한다.
pub fn create_frame_source(config: &AppConfig) -> Result<Box<dyn FrameSource>, CoreError> {
    if let Some(ref dir) = config.camera.frames_dir {
        info!("이미지 시퀀스 프레임 소스: {}", dir.display());
        return Ok(Box::new(sequence::ImageSequenceSource::new(
            dir.clone(),
            config.frame_interval(),
        )));
    }

    #[cfg(feature = "opencv")]
    {
        info!("카메라 프레임 소스: 장치 #{}", config.camera.device_index);
        Ok(Box::new(camera::OpenCvCamera::new(
            config.camera.device_index,
        )))
    }

    #[cfg(not(feature = "opencv"))]
    {
        Err(CoreError::DeviceUnavailable(format!(
            "장치 #{}: 카메라 지원 없이 빌드됨 (opencv feature 또는 --frames-dir 필요)",
            config.camera.device_index
        )))
    }
}

/// 설정에 맞는 검출기 생성
pub fn create_detector(config: &AppConfig) -> Result<Box<dyn FeatureDetector>, CoreError> {
    let detector = &config.detector;
    match detector.backend {
        DetectorBackend::Rustface => {
            let seeta = seeta::SeetaFaceDetector::load(&detector.model_path, detector.min_face_size)?;
            Ok(Box::new(seeta))
        }
        DetectorBackend::Cascade => {
            #[cfg(feature = "opencv")]
            {
                let cascade = cascade::CascadeDetector::load(detector)?;
                Ok(Box::new(cascade))
            }

            #[cfg(not(feature = "opencv"))]
            {
                Err(CoreError::Detector(
                    "Haar cascade 검출기는 opencv feature가 필요합니다".to_string(),
                ))
            }
        }
    }
}
