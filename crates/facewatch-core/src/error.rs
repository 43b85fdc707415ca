//! FACEWATCH 핵심 에러 타입.
//!
//! 모든 어댑터 crate는 `CoreError`를 그대로 반환하거나 래핑한다.

use thiserror::Error;

/// 코어 레이어 에러.
/// 카메라, 검출기, 종료 동작, 설정 등 도메인 공통 에러를 정의한다.
#[derive(Debug, Error)]
pub enum CoreError {
    /// 카메라 장치를 열 수 없음 (검출 시작 불가)
    #[error("카메라를 열 수 없습니다: {0}")]
    DeviceUnavailable(String),

    /// 프레임 소스가 더 이상 프레임을 생성하지 않음
    #[error("카메라 읽기 오류: 스트림 종료")]
    StreamEnded,

    /// OS 종료 명령 실패
    #[error("시스템 종료 명령 실패: {0}")]
    ShutdownActionFailed(String),

    /// 검출기 초기화/실행 실패
    #[error("검출기 에러: {0}")]
    Detector(String),

    /// JSON 직렬화/역직렬화 실패
    #[error("직렬화 에러: {0}")]
    Serialization(#[from] serde_json::Error),

    /// 설정값 오류
    #[error("설정 에러: {0}")]
    Config(String),

    /// I/O 에러
    #[error("I/O 에러: {0}")]
    Io(#[from] std::io::Error),

    /// 내부 에러 (예상치 못한 상황)
    #[error("내부 에러: {0}")]
    Internal(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn io_error_converts() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "missing");
        let err: CoreError = io.into();
        assert!(matches!(err, CoreError::Io(_)));
    }

    #[test]
    fn messages_name_the_device() {
        let err = CoreError::DeviceUnavailable("/dev/video0".to_string());
        assert!(err.to_string().contains("/dev/video0"));
    }
}
