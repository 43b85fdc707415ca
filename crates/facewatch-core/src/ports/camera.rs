//! 프레임 소스 포트.
//!
//! 구현: `facewatch-vision` crate (OpenCV 카메라, 이미지 시퀀스)

use crate::error::CoreError;
use crate::models::frame::Frame;

/// 카메라 장치: 열기만 담당
pub trait FrameSource: Send + Sync {
    /// 장치 열기. 실패 시 `CoreError::DeviceUnavailable`.
    fn open(&self) -> Result<Box<dyn FrameStream>, CoreError>;

    /// 로그용 장치 설명
    fn describe(&self) -> String;
}

/// 열린 프레임 스트림
///
/// 프레임 루프 스레드가 단독으로 소유한다.
pub trait FrameStream: Send {
    /// 다음 프레임 읽기. 더 이상 프레임이 없으면 `CoreError::StreamEnded`.
    fn read_frame(&mut self) -> Result<Frame, CoreError>;

    /// 장치 해제. 여러 번 호출해도 안전해야 한다.
    fn release(&mut self);
}
