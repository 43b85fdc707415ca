//! 프레젠테이션 레이어가 생성하는 사용자 명령.

use serde::{Deserialize, Serialize};

/// 사용자 명령
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UserCommand {
    /// 카메라 시작
    StartCamera,
    /// 검출 토글
    ToggleDetection,
    /// 검출 시작
    StartDetection,
    /// 검출 중지
    StopDetection,
    /// 종료 카운트다운 취소 (대화상자 닫기 포함)
    CancelShutdown,
    /// 즉시 종료
    ShutdownNow,
    /// 앱 종료 (시스템 종료 없이)
    ExitApp,
}
