//! 유휴/종료 가드 상태 머신.
//!
//! 특징 미검출 시간이 임계값을 넘으면 종료 카운트다운 세션을 열고,
//! 1초 틱마다 카운트다운을 줄여 0이 되면 시스템 종료를 요청한다.
//!
//! 가드는 I/O를 하지 않는다. 모든 진입점은 현재 시각을 인자로 받고
//! [`GuardEffect`] 목록을 반환하며, 앱 컨트롤러가 이를 프레젠테이션
//! 레이어와 종료 동작으로 전달한다. 가드는 컨트롤러 태스크 하나만 소유한다.
//!
//! ```text
//!  Idle ──start──▶ Monitoring ──idle ≥ threshold──▶ CountdownActive
//!   ▲                 ▲  │ feature                      │  │
//!   └──────stop───────┼──┘                              │  │ 0 / shutdown now
//!                     └──────cancel / feature───────────┘  ▼
//!                                                     Terminated
//! ```

use std::time::{Duration, Instant};

use facewatch_core::config::IdleConfig;
use facewatch_core::models::detection::{DetectionEvent, DetectionMode};
use facewatch_core::models::guard::{
    countdown_text, GuardEffect, GuardState, ReturnPolicy, SessionCloseReason, TerminationReason,
};
use tracing::{debug, info, warn};

use crate::idle::IdleClock;
use crate::session::ShutdownSession;

/// 가드 설정
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GuardConfig {
    /// 특징 미검출 임계값
    pub idle_threshold: Duration,
    /// 종료 카운트다운 시작값 (초)
    pub countdown_secs: u32,
    /// 카운트다운 중 특징 재검출 처리
    pub return_policy: ReturnPolicy,
}

impl Default for GuardConfig {
    fn default() -> Self {
        Self::from(&IdleConfig::default())
    }
}

impl From<&IdleConfig> for GuardConfig {
    fn from(config: &IdleConfig) -> Self {
        Self {
            idle_threshold: config.idle_threshold(),
            countdown_secs: config.shutdown_countdown_secs,
            return_policy: config.return_policy,
        }
    }
}

/// 유휴/종료 가드
#[derive(Debug)]
pub struct IdleShutdownGuard {
    config: GuardConfig,
    mode: DetectionMode,
    clock: IdleClock,
    /// 유휴 추적을 마지막으로 (다시) 시작한 시각
    armed_at: Option<Instant>,
    session: Option<ShutdownSession>,
    terminated: Option<TerminationReason>,
}

impl IdleShutdownGuard {
    /// 새 가드 생성 (Idle 상태)
    pub fn new(config: GuardConfig) -> Self {
        Self {
            config,
            mode: DetectionMode::Off,
            clock: IdleClock::new(config.idle_threshold),
            armed_at: None,
            session: None,
            terminated: None,
        }
    }

    /// 현재 상태
    pub fn state(&self) -> GuardState {
        if self.terminated.is_some() {
            GuardState::Terminated
        } else if self.session.is_some() {
            GuardState::CountdownActive
        } else if self.mode.is_on() {
            GuardState::Monitoring
        } else {
            GuardState::Idle
        }
    }

    pub fn mode(&self) -> DetectionMode {
        self.mode
    }

    /// 남은 카운트다운 (세션 없으면 None)
    pub fn countdown_remaining(&self) -> Option<u32> {
        self.session.as_ref().map(ShutdownSession::remaining)
    }

    pub fn last_feature_time(&self) -> Option<Instant> {
        self.clock.last_feature_time()
    }

    /// 유휴 추적이 마지막으로 시작된 시각
    ///
    /// 검출 시작, 카운트다운 취소, 특징 재검출로 세션이 닫힐 때 갱신되고
    /// 검출 중지 시 None이 된다. 컨트롤러는 이 값이 바뀌면 틱 기준점을 옮긴다.
    pub fn armed_at(&self) -> Option<Instant> {
        self.armed_at
    }

    pub fn termination(&self) -> Option<TerminationReason> {
        self.terminated
    }

    pub fn config(&self) -> &GuardConfig {
        &self.config
    }

    // ============================================================
    // 사용자 명령
    // ============================================================

    /// 검출 시작. 이미 켜져 있으면 추적을 다시 시작한다.
    pub fn start_detection(&mut self, now: Instant) -> Vec<GuardEffect> {
        if self.is_terminated() {
            return Vec::new();
        }

        let mut effects = Vec::new();
        if self.session.take().is_some() {
            effects.push(GuardEffect::SessionClosed(
                SessionCloseReason::DetectionRestarted,
            ));
        }

        self.mode = DetectionMode::On;
        self.clock.reset(now);
        self.armed_at = Some(now);
        info!("검출 시작: 유휴 임계값 {}초", self.clock.threshold().as_secs());
        effects.push(GuardEffect::StatusChanged("검출 중...".to_string()));
        effects
    }

    /// 검출 중지. 진행 중인 카운트다운을 취소하고 유휴 추적을 멈춘다.
    pub fn stop_detection(&mut self) -> Vec<GuardEffect> {
        if self.is_terminated() || !self.mode.is_on() {
            return Vec::new();
        }

        let mut effects = Vec::new();
        if self.session.take().is_some() {
            effects.push(GuardEffect::SessionClosed(
                SessionCloseReason::DetectionStopped,
            ));
        }

        self.mode = DetectionMode::Off;
        self.clock.clear();
        self.armed_at = None;
        info!("검출 중지");
        effects.push(GuardEffect::StatusChanged("검출이 중지되었습니다".to_string()));
        effects
    }

    /// 검출 토글
    pub fn toggle_detection(&mut self, now: Instant) -> Vec<GuardEffect> {
        match self.mode {
            DetectionMode::Off => self.start_detection(now),
            DetectionMode::On => self.stop_detection(),
        }
    }

    /// 종료 카운트다운 취소. 세션이 없으면 아무것도 하지 않는다.
    pub fn cancel_shutdown(&mut self, now: Instant) -> Vec<GuardEffect> {
        if self.is_terminated() || self.session.is_none() {
            return Vec::new();
        }
        self.close_session(SessionCloseReason::Cancelled, now)
    }

    /// 즉시 종료. 카운트다운 세션이 열려 있을 때만 유효하다.
    pub fn shutdown_now(&mut self) -> Vec<GuardEffect> {
        if self.is_terminated() {
            return Vec::new();
        }
        if self.session.is_none() {
            warn!("즉시 종료 요청 무시: 진행 중인 종료 카운트다운 없음");
            return Vec::new();
        }
        self.terminate(
            TerminationReason::Shutdown,
            SessionCloseReason::ShutdownRequested,
        )
    }

    /// 앱 종료 (시스템 종료 없음)
    pub fn exit_app(&mut self) -> Vec<GuardEffect> {
        if self.is_terminated() {
            return Vec::new();
        }
        self.terminate(TerminationReason::UserExit, SessionCloseReason::Exited)
    }

    // ============================================================
    // 프레임 루프 / 타이머 입력
    // ============================================================

    /// 검출 이벤트 처리
    pub fn observe(&mut self, event: DetectionEvent) -> Vec<GuardEffect> {
        if self.is_terminated() || !self.mode.is_on() {
            return Vec::new();
        }

        if !event.feature_present {
            if let Some(session) = self.session.as_mut() {
                if session.is_paused() {
                    session.resume();
                    debug!("특징 사라짐: 카운트다운 재개 ({}초)", session.remaining());
                    return vec![GuardEffect::StatusChanged(countdown_text(
                        session.remaining(),
                    ))];
                }
            }
            return Vec::new();
        }

        self.clock.mark_feature(event.at);

        let Some(session) = self.session.as_mut() else {
            return Vec::new();
        };

        match self.config.return_policy {
            ReturnPolicy::Cancel => {
                info!(
                    "특징 재검출 (frame #{}): 종료 카운트다운 취소",
                    event.frame_index
                );
                self.close_session(SessionCloseReason::FeatureReturned, event.at)
            }
            ReturnPolicy::Pause => {
                if session.is_paused() {
                    return Vec::new();
                }
                session.pause();
                info!(
                    "특징 재검출: 카운트다운 일시정지 ({}초 남음)",
                    session.remaining()
                );
                vec![GuardEffect::StatusChanged(format!(
                    "사용자 감지: 카운트다운 일시정지 ({}초 남음)",
                    session.remaining()
                ))]
            }
        }
    }

    /// 1초 틱 처리
    pub fn tick(&mut self, now: Instant) -> Vec<GuardEffect> {
        if self.is_terminated() || !self.mode.is_on() {
            return Vec::new();
        }

        if let Some(session) = self.session.as_mut() {
            if session.is_paused() {
                return Vec::new();
            }
            let remaining = session.tick();
            let expired = session.is_expired();
            let opened_at = session.opened_at();
            debug!("종료 카운트다운: {}초", remaining);
            let mut effects = vec![GuardEffect::CountdownTick { remaining }];
            if expired {
                info!(
                    "종료 카운트다운 만료 (세션 {:.1}초 경과)",
                    now.saturating_duration_since(opened_at).as_secs_f64()
                );
                effects.extend(self.terminate(
                    TerminationReason::Shutdown,
                    SessionCloseReason::Expired,
                ));
            }
            return effects;
        }

        if self.clock.last_feature_time().is_none() {
            self.clock.reset(now);
        }

        if self.clock.threshold_reached(now) {
            return self.open_session(now);
        }

        vec![GuardEffect::StatusChanged(format!(
            "특징 미검출: {}초 후 종료 카운트다운 시작",
            self.clock.secs_until_threshold(now)
        ))]
    }

    /// 프레임 소스 종료 (읽기 실패 포함): 시스템 종료 없이 종료 경로로
    pub fn stream_ended(&mut self) -> Vec<GuardEffect> {
        if self.is_terminated() {
            return Vec::new();
        }
        let mut effects = vec![GuardEffect::StatusChanged("카메라 읽기 오류".to_string())];
        effects.extend(self.terminate(
            TerminationReason::StreamEnded,
            SessionCloseReason::Exited,
        ));
        effects
    }

    // ============================================================
    // 내부 전이
    // ============================================================

    fn is_terminated(&self) -> bool {
        self.terminated.is_some()
    }

    fn open_session(&mut self, now: Instant) -> Vec<GuardEffect> {
        if self.session.is_some() {
            return Vec::new();
        }
        let remaining = self.config.countdown_secs;
        self.session = Some(ShutdownSession::open(remaining, now));
        warn!(
            "장시간 특징 미검출: {}초 후 시스템 종료 (취소 가능)",
            remaining
        );
        vec![
            GuardEffect::SessionOpened { remaining },
            GuardEffect::StatusChanged(countdown_text(remaining)),
        ]
    }

    fn close_session(&mut self, reason: SessionCloseReason, now: Instant) -> Vec<GuardEffect> {
        if self.session.take().is_none() {
            return Vec::new();
        }
        self.clock.reset(now);
        self.armed_at = Some(now);
        info!("종료 카운트다운 닫힘: {:?}", reason);
        vec![
            GuardEffect::SessionClosed(reason),
            GuardEffect::StatusChanged("검출이 재개되었습니다".to_string()),
        ]
    }

    fn terminate(
        &mut self,
        reason: TerminationReason,
        close_reason: SessionCloseReason,
    ) -> Vec<GuardEffect> {
        let mut effects = Vec::new();
        if self.session.take().is_some() {
            effects.push(GuardEffect::SessionClosed(close_reason));
        }
        self.terminated = Some(reason);
        info!("가드 종료: {:?}", reason);
        if reason.runs_shutdown_action() {
            effects.push(GuardEffect::ExecuteShutdown);
        }
        effects.push(GuardEffect::Exit(reason));
        effects
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn guard(threshold: u64, countdown: u32) -> IdleShutdownGuard {
        IdleShutdownGuard::new(GuardConfig {
            idle_threshold: Duration::from_secs(threshold),
            countdown_secs: countdown,
            return_policy: ReturnPolicy::Cancel,
        })
    }

    fn event(at: Instant, feature_present: bool) -> DetectionEvent {
        DetectionEvent {
            at,
            feature_present,
            frame_index: 0,
            face_count: usize::from(feature_present),
        }
    }

    #[test]
    fn starts_idle() {
        let g = guard(10, 30);
        assert_eq!(g.state(), GuardState::Idle);
        assert!(g.last_feature_time().is_none());
    }

    #[test]
    fn start_resets_clock_and_monitors() {
        let t0 = Instant::now();
        let mut g = guard(10, 30);
        let effects = g.start_detection(t0);
        assert_eq!(g.state(), GuardState::Monitoring);
        assert_eq!(g.last_feature_time(), Some(t0));
        assert!(matches!(effects.last(), Some(GuardEffect::StatusChanged(_))));
    }

    #[test]
    fn tracking_rearms_on_start_cancel_and_return() {
        let t0 = Instant::now();
        let secs = Duration::from_secs;
        let mut g = guard(2, 30);
        assert!(g.armed_at().is_none());

        g.start_detection(t0);
        assert_eq!(g.armed_at(), Some(t0));

        // 평소 특징 검출은 기준점을 옮기지 않는다
        g.observe(event(t0 + secs(1), true));
        assert_eq!(g.armed_at(), Some(t0));

        g.tick(t0 + secs(3));
        g.cancel_shutdown(t0 + secs(4));
        assert_eq!(g.armed_at(), Some(t0 + secs(4)));

        g.tick(t0 + secs(6));
        g.observe(event(t0 + secs(7), true));
        assert_eq!(g.armed_at(), Some(t0 + secs(7)));

        g.stop_detection();
        assert!(g.armed_at().is_none());
    }

    #[test]
    fn ticks_ignored_while_idle() {
        let t0 = Instant::now();
        let mut g = guard(1, 3);
        assert!(g.tick(t0 + Duration::from_secs(100)).is_empty());
        assert!(g.observe(event(t0, true)).is_empty());
        assert_eq!(g.state(), GuardState::Idle);
    }

    #[test]
    fn countdown_status_while_monitoring() {
        let t0 = Instant::now();
        let mut g = guard(10, 30);
        g.start_detection(t0);
        let effects = g.tick(t0 + Duration::from_secs(3));
        assert_eq!(
            effects,
            vec![GuardEffect::StatusChanged(
                "특징 미검출: 7초 후 종료 카운트다운 시작".to_string()
            )]
        );
    }

    #[test]
    fn shutdown_now_without_session_is_noop() {
        let t0 = Instant::now();
        let mut g = guard(10, 30);
        g.start_detection(t0);
        assert!(g.shutdown_now().is_empty());
        assert_eq!(g.state(), GuardState::Monitoring);
    }

    #[test]
    fn stop_detection_closes_session() {
        let t0 = Instant::now();
        let mut g = guard(2, 30);
        g.start_detection(t0);
        g.tick(t0 + Duration::from_secs(2));
        assert_eq!(g.state(), GuardState::CountdownActive);

        let effects = g.stop_detection();
        assert_eq!(
            effects[0],
            GuardEffect::SessionClosed(SessionCloseReason::DetectionStopped)
        );
        assert_eq!(g.state(), GuardState::Idle);
        assert!(g.last_feature_time().is_none());
        assert!(g.tick(t0 + Duration::from_secs(60)).is_empty());
    }

    #[test]
    fn restart_while_counting_down_closes_session() {
        let t0 = Instant::now();
        let mut g = guard(2, 30);
        g.start_detection(t0);
        g.tick(t0 + Duration::from_secs(2));

        let effects = g.start_detection(t0 + Duration::from_secs(3));
        assert_eq!(
            effects[0],
            GuardEffect::SessionClosed(SessionCloseReason::DetectionRestarted)
        );
        assert_eq!(g.state(), GuardState::Monitoring);
    }

    #[test]
    fn exit_never_runs_shutdown() {
        let t0 = Instant::now();
        let mut g = guard(1, 30);
        g.start_detection(t0);
        g.tick(t0 + Duration::from_secs(1));

        let effects = g.exit_app();
        assert!(!effects.contains(&GuardEffect::ExecuteShutdown));
        assert_eq!(
            effects.last(),
            Some(&GuardEffect::Exit(TerminationReason::UserExit))
        );
        assert_eq!(g.state(), GuardState::Terminated);
        assert!(g.exit_app().is_empty());
    }

    #[test]
    fn stream_end_exits_without_shutdown() {
        let t0 = Instant::now();
        let mut g = guard(10, 30);
        g.start_detection(t0);
        let effects = g.stream_ended();
        assert!(!effects.contains(&GuardEffect::ExecuteShutdown));
        assert_eq!(g.termination(), Some(TerminationReason::StreamEnded));
    }

    #[test]
    fn commands_after_termination_are_ignored() {
        let t0 = Instant::now();
        let mut g = guard(10, 30);
        g.exit_app();
        assert!(g.start_detection(t0).is_empty());
        assert!(g.tick(t0 + Duration::from_secs(20)).is_empty());
        assert!(g.cancel_shutdown(t0).is_empty());
        assert_eq!(g.state(), GuardState::Terminated);
    }

    #[test]
    fn pause_policy_freezes_countdown() {
        let t0 = Instant::now();
        let mut g = IdleShutdownGuard::new(GuardConfig {
            idle_threshold: Duration::from_secs(2),
            countdown_secs: 5,
            return_policy: ReturnPolicy::Pause,
        });
        g.start_detection(t0);
        g.tick(t0 + Duration::from_secs(2));
        g.tick(t0 + Duration::from_secs(3));
        assert_eq!(g.countdown_remaining(), Some(4));

        g.observe(event(t0 + Duration::from_millis(3_500), true));
        assert!(g.tick(t0 + Duration::from_secs(4)).is_empty());
        assert!(g.tick(t0 + Duration::from_secs(5)).is_empty());
        assert_eq!(g.countdown_remaining(), Some(4));
        assert_eq!(g.state(), GuardState::CountdownActive);

        g.observe(event(t0 + Duration::from_millis(5_500), false));
        g.tick(t0 + Duration::from_secs(6));
        assert_eq!(g.countdown_remaining(), Some(3));

        g.cancel_shutdown(t0 + Duration::from_secs(7));
        assert_eq!(g.state(), GuardState::Monitoring);
    }
}
