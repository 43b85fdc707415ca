//! 유휴/종료 가드 시나리오 테스트.
//!
//! 가상의 시각을 직접 넘겨 초 단위 타임라인을 재현한다.
//! 틱은 매 정수 초에 한 번, 같은 시각의 명령/이벤트는 틱보다 먼저 처리한다.

use facewatch_core::models::detection::DetectionEvent;
use facewatch_core::models::guard::{
    GuardEffect, GuardState, ReturnPolicy, SessionCloseReason, TerminationReason,
};
use facewatch_monitor::{GuardConfig, IdleShutdownGuard};
use std::time::{Duration, Instant};

struct Timeline {
    t0: Instant,
    guard: IdleShutdownGuard,
}

impl Timeline {
    fn new(return_policy: ReturnPolicy) -> Self {
        let config = GuardConfig {
            idle_threshold: Duration::from_secs(10),
            countdown_secs: 30,
            return_policy,
        };
        Self {
            t0: Instant::now(),
            guard: IdleShutdownGuard::new(config),
        }
    }

    fn at(&self, millis: u64) -> Instant {
        self.t0 + Duration::from_millis(millis)
    }

    fn start(&mut self) {
        let now = self.t0;
        self.guard.start_detection(now);
    }

    fn tick(&mut self, secs: u64) -> Vec<GuardEffect> {
        let now = self.at(secs * 1_000);
        self.guard.tick(now)
    }

    /// `from..=to` 초의 틱 효과를 (초, 효과) 목록으로
    fn ticks(&mut self, from: u64, to: u64) -> Vec<(u64, GuardEffect)> {
        let mut out = Vec::new();
        for s in from..=to {
            for effect in self.tick(s) {
                out.push((s, effect));
            }
        }
        out
    }

    fn feature(&mut self, millis: u64, present: bool) -> Vec<GuardEffect> {
        let event = DetectionEvent {
            at: self.at(millis),
            feature_present: present,
            frame_index: millis,
            face_count: usize::from(present),
        };
        self.guard.observe(event)
    }
}

fn opened_at(effects: &[(u64, GuardEffect)]) -> Vec<u64> {
    effects
        .iter()
        .filter(|(_, e)| matches!(e, GuardEffect::SessionOpened { .. }))
        .map(|(s, _)| *s)
        .collect()
}

fn shutdown_at(effects: &[(u64, GuardEffect)]) -> Vec<u64> {
    effects
        .iter()
        .filter(|(_, e)| *e == GuardEffect::ExecuteShutdown)
        .map(|(s, _)| *s)
        .collect()
}

#[test]
fn session_created_exactly_once_when_threshold_crossed() {
    let mut tl = Timeline::new(ReturnPolicy::Cancel);
    tl.start();

    let effects = tl.ticks(1, 20);
    assert_eq!(opened_at(&effects), vec![10]);
    assert_eq!(tl.guard.state(), GuardState::CountdownActive);
    assert_eq!(tl.guard.countdown_remaining(), Some(20));
}

#[test]
fn full_scenario_feature_return_then_shutdown() {
    let mut tl = Timeline::new(ReturnPolicy::Cancel);
    tl.start();

    let mut effects = tl.ticks(1, 14);
    assert_eq!(opened_at(&effects), vec![10]);
    assert_eq!(tl.guard.countdown_remaining(), Some(26));

    // t=15: 틱보다 먼저 얼굴 재검출
    let closed = tl.feature(15_000, true);
    assert!(closed.contains(&GuardEffect::SessionClosed(SessionCloseReason::FeatureReturned)));
    assert_eq!(tl.guard.state(), GuardState::Monitoring);

    effects.extend(tl.ticks(15, 60));
    assert_eq!(opened_at(&effects), vec![10, 25]);
    assert_eq!(shutdown_at(&effects), vec![55]);
    assert_eq!(tl.guard.termination(), Some(TerminationReason::Shutdown));

    // 종료 이후 틱은 아무것도 하지 않는다
    assert!(effects.iter().all(|(s, _)| *s <= 55));
}

#[test]
fn cancel_then_silence_retriggers_after_threshold() {
    let mut tl = Timeline::new(ReturnPolicy::Cancel);
    tl.start();
    tl.ticks(1, 11);
    assert_eq!(tl.guard.state(), GuardState::CountdownActive);

    let cancelled = tl.guard.cancel_shutdown(tl.at(12_000));
    assert_eq!(
        cancelled[0],
        GuardEffect::SessionClosed(SessionCloseReason::Cancelled)
    );
    assert_eq!(tl.guard.last_feature_time(), Some(tl.at(12_000)));

    let effects = tl.ticks(12, 30);
    assert_eq!(opened_at(&effects), vec![22]);
}

#[test]
fn feature_at_last_second_prevents_shutdown() {
    let mut tl = Timeline::new(ReturnPolicy::Cancel);
    tl.start();
    tl.ticks(1, 39);
    assert_eq!(tl.guard.countdown_remaining(), Some(1));

    tl.feature(39_500, true);
    assert_eq!(tl.guard.state(), GuardState::Monitoring);

    let effects = tl.ticks(40, 49);
    assert!(shutdown_at(&effects).is_empty());
    assert!(opened_at(&effects).is_empty());
    assert_eq!(tl.guard.termination(), None);

    // 39.5초 + 10초 이후 첫 틱에서 다시 카운트다운
    let effects = tl.ticks(50, 50);
    assert_eq!(opened_at(&effects), vec![50]);
}

#[test]
fn countdown_decrements_once_per_tick_to_zero() {
    let mut tl = Timeline::new(ReturnPolicy::Cancel);
    tl.start();
    let effects = tl.ticks(1, 45);

    let remaining: Vec<u32> = effects
        .iter()
        .filter_map(|(_, e)| match e {
            GuardEffect::CountdownTick { remaining } => Some(*remaining),
            _ => None,
        })
        .collect();
    assert_eq!(remaining, (0..30).rev().collect::<Vec<u32>>());

    let tail: Vec<&GuardEffect> = effects
        .iter()
        .filter(|(s, _)| *s == 40)
        .map(|(_, e)| e)
        .collect();
    assert_eq!(
        tail,
        vec![
            &GuardEffect::CountdownTick { remaining: 0 },
            &GuardEffect::SessionClosed(SessionCloseReason::Expired),
            &GuardEffect::ExecuteShutdown,
            &GuardEffect::Exit(TerminationReason::Shutdown),
        ]
    );
    assert_eq!(tl.guard.state(), GuardState::Terminated);
}

#[test]
fn cancel_twice_is_same_as_once() {
    let mut tl = Timeline::new(ReturnPolicy::Cancel);
    tl.start();
    tl.ticks(1, 12);

    let first = tl.guard.cancel_shutdown(tl.at(12_500));
    assert!(!first.is_empty());
    let last_feature = tl.guard.last_feature_time();

    let second = tl.guard.cancel_shutdown(tl.at(13_000));
    assert!(second.is_empty());
    assert_eq!(tl.guard.last_feature_time(), last_feature);
    assert_eq!(tl.guard.state(), GuardState::Monitoring);
}

#[test]
fn stop_detection_clears_session_and_halts_tracking() {
    let mut tl = Timeline::new(ReturnPolicy::Cancel);
    tl.start();
    tl.ticks(1, 15);

    let effects = tl.guard.stop_detection();
    assert_eq!(
        effects[0],
        GuardEffect::SessionClosed(SessionCloseReason::DetectionStopped)
    );
    assert_eq!(tl.guard.state(), GuardState::Idle);
    assert_eq!(tl.guard.countdown_remaining(), None);

    assert!(tl.ticks(16, 120).is_empty());
    assert!(tl.feature(50_000, true).is_empty());
    assert_eq!(tl.guard.last_feature_time(), None);
}

#[test]
fn exit_during_countdown_never_shuts_down() {
    let mut tl = Timeline::new(ReturnPolicy::Cancel);
    tl.start();
    tl.ticks(1, 30);

    let effects = tl.guard.exit_app();
    assert!(!effects.contains(&GuardEffect::ExecuteShutdown));
    assert_eq!(
        effects.last(),
        Some(&GuardEffect::Exit(TerminationReason::UserExit))
    );
    assert!(tl.ticks(31, 60).is_empty());
}

#[test]
fn shutdown_now_during_countdown() {
    let mut tl = Timeline::new(ReturnPolicy::Cancel);
    tl.start();
    tl.ticks(1, 10);

    let effects = tl.guard.shutdown_now();
    assert_eq!(
        effects,
        vec![
            GuardEffect::SessionClosed(SessionCloseReason::ShutdownRequested),
            GuardEffect::ExecuteShutdown,
            GuardEffect::Exit(TerminationReason::Shutdown),
        ]
    );
}

#[test]
fn pause_policy_holds_countdown_while_user_present() {
    let mut tl = Timeline::new(ReturnPolicy::Pause);
    tl.start();
    tl.ticks(1, 15);
    assert_eq!(tl.guard.countdown_remaining(), Some(25));

    tl.feature(15_200, true);
    let frozen = tl.ticks(16, 40);
    assert!(frozen.is_empty());
    assert_eq!(tl.guard.countdown_remaining(), Some(25));
    assert_eq!(tl.guard.state(), GuardState::CountdownActive);

    // 사용자가 다시 사라지면 이어서 카운트다운
    tl.feature(40_500, false);
    let effects = tl.ticks(41, 80);
    assert_eq!(shutdown_at(&effects), vec![65]);
}

#[test]
fn pause_policy_explicit_cancel_still_closes() {
    let mut tl = Timeline::new(ReturnPolicy::Pause);
    tl.start();
    tl.ticks(1, 12);
    tl.feature(12_500, true);

    let effects = tl.guard.cancel_shutdown(tl.at(13_000));
    assert_eq!(
        effects[0],
        GuardEffect::SessionClosed(SessionCloseReason::Cancelled)
    );
    assert_eq!(tl.guard.state(), GuardState::Monitoring);
}
