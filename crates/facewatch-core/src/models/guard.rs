//! 유휴/종료 가드 상태 모델.
//!
//! 상태 머신의 상태, 종료 사유, 전이마다 발생하는 효과(effect)를 정의한다.
//! 효과는 앱 컨트롤러가 프레젠테이션 레이어와 종료 동작으로 전달한다.

use serde::{Deserialize, Serialize};

/// 가드 상태
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum GuardState {
    /// 검출 꺼짐, 유휴 추적 없음
    Idle,
    /// 검출 켜짐, 유휴 시간 추적 중
    Monitoring,
    /// 종료 카운트다운 진행 중
    CountdownActive,
    /// 종료됨 (시스템 종료 또는 앱 종료)
    Terminated,
}

/// 종료 사유
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TerminationReason {
    /// 카운트다운 만료 또는 즉시 종료 명령 → 시스템 종료 실행
    Shutdown,
    /// 사용자 앱 종료
    UserExit,
    /// 프레임 소스 종료 (장치 오류 포함)
    StreamEnded,
}

impl TerminationReason {
    /// 시스템 종료 동작을 실행해야 하는지
    pub fn runs_shutdown_action(self) -> bool {
        self == TerminationReason::Shutdown
    }
}

/// 종료 세션이 닫힌 사유
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionCloseReason {
    /// 사용자가 취소 (대화상자 닫기 포함)
    Cancelled,
    /// 특징 재검출 (사람이 돌아옴)
    FeatureReturned,
    /// 검출 중지 명령
    DetectionStopped,
    /// 검출 재시작 명령
    DetectionRestarted,
    /// 카운트다운 0 도달
    Expired,
    /// 즉시 종료 명령
    ShutdownRequested,
    /// 앱 종료 또는 스트림 종료
    Exited,
}

/// 특징 재검출 시 진행 중인 카운트다운 처리 정책
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReturnPolicy {
    /// 세션 취소 + 유휴 시계 리셋
    #[default]
    Cancel,
    /// 특징이 보이는 동안 카운트다운 일시정지 (명시적 취소 필요)
    Pause,
}

/// 상태 전이 한 번이 만들어내는 관찰 가능한 효과
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuardEffect {
    /// 상태 표시줄 텍스트 변경
    StatusChanged(String),
    /// 종료 세션 시작 (카운트다운 대화상자 표시)
    SessionOpened {
        /// 남은 초
        remaining: u32,
    },
    /// 카운트다운 1초 경과
    CountdownTick {
        /// 남은 초
        remaining: u32,
    },
    /// 종료 세션 닫힘
    SessionClosed(SessionCloseReason),
    /// 시스템 종료 동작 실행
    ExecuteShutdown,
    /// 프레임 소스 해제 후 프로세스 종료
    Exit(TerminationReason),
}

/// 카운트다운 대화상자 문구
pub fn countdown_text(remaining: u32) -> String {
    format!("시스템이 {remaining}초 후 종료됩니다")
}
