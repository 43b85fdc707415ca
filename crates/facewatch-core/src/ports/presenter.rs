//! 프레젠테이션 포트.
//!
//! 코어가 상태 변화를 알리는 출력 방향 인터페이스.
//! 구현: `facewatch-ui` crate (콘솔, 미리보기 파일)

use crate::models::frame::AnnotatedFrame;
use crate::models::guard::SessionCloseReason;

/// 상태/카운트다운 표시
pub trait Presenter: Send + Sync {
    /// 상태 표시줄 텍스트 변경
    fn on_status_changed(&self, text: &str);

    /// 카운트다운 1초 경과
    fn on_countdown_tick(&self, seconds_remaining: u32);

    /// 종료 카운트다운 대화상자 열림
    fn on_shutdown_session_opened(&self, seconds_remaining: u32);

    /// 종료 카운트다운 대화상자 닫힘
    fn on_shutdown_session_closed(&self, reason: SessionCloseReason);

    /// 사용자 알림 (에러 보고, 대체 안내)
    fn on_notice(&self, title: &str, body: &str);
}

/// 비디오 표시 영역
///
/// 프레임 루프에서 매 프레임 호출된다. 한 프레임 간격 이상 막으면 안 된다.
pub trait FrameSink: Send {
    /// 주석이 그려진 프레임 렌더링
    fn render(&mut self, frame: &AnnotatedFrame);
}
