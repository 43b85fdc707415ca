//! 특징 검출기 포트.
//!
//! 구현: `facewatch-vision` crate (Haar cascade, rustface)

use crate::models::detection::Detection;
use crate::models::frame::Frame;

/// 얼굴 특징 검출기
///
/// 프레임마다 호출되며 실패는 모델링하지 않는다 (실패 시 빈 결과).
pub trait FeatureDetector: Send {
    /// 프레임에서 특징 영역 검출
    fn detect(&mut self, frame: &Frame) -> Detection;

    /// 검출기 이름 (로그용)
    fn name(&self) -> &'static str;
}
