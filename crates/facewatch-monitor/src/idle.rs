//! 유휴 시계.
//!
//! 마지막으로 얼굴 특징이 검출된 시각을 추적하고 임계값 도달 여부를 판단한다.

use std::time::{Duration, Instant};
use tracing::debug;

/// 유휴 시계
///
/// `last_feature_time`은 뒤로 가지 않는다. 늦게 도착한 이벤트가
/// 더 최근의 리셋을 덮어쓰지 않도록 항상 최댓값을 유지한다.
#[derive(Debug, Clone)]
pub struct IdleClock {
    /// 유휴 임계값
    threshold: Duration,
    /// 마지막 특징 검출 시각 (None이면 추적 안 함)
    last_feature_time: Option<Instant>,
}

impl IdleClock {
    /// 새 유휴 시계 생성 (추적 중지 상태)
    pub fn new(threshold: Duration) -> Self {
        Self {
            threshold,
            last_feature_time: None,
        }
    }

    /// 특징 검출 기록
    pub fn mark_feature(&mut self, at: Instant) {
        self.last_feature_time = Some(match self.last_feature_time {
            Some(prev) if prev > at => prev,
            _ => at,
        });
    }

    /// 시계 리셋 (검출 시작, 카운트다운 취소)
    pub fn reset(&mut self, now: Instant) {
        debug!("유휴 시계 리셋");
        self.mark_feature(now);
    }

    /// 추적 중지
    pub fn clear(&mut self) {
        self.last_feature_time = None;
    }

    /// 마지막 특징 검출 시각
    pub fn last_feature_time(&self) -> Option<Instant> {
        self.last_feature_time
    }

    /// 마지막 검출 이후 경과 시간
    pub fn idle_for(&self, now: Instant) -> Option<Duration> {
        self.last_feature_time
            .map(|last| now.saturating_duration_since(last))
    }

    /// 임계값 도달 여부
    pub fn threshold_reached(&self, now: Instant) -> bool {
        self.idle_for(now)
            .is_some_and(|idle| idle >= self.threshold)
    }

    /// 카운트다운 시작까지 남은 초 (정수 초 단위 내림 기준)
    pub fn secs_until_threshold(&self, now: Instant) -> u64 {
        let idle_secs = self.idle_for(now).map(|d| d.as_secs()).unwrap_or(0);
        self.threshold.as_secs().saturating_sub(idle_secs)
    }

    /// 임계값 조회
    pub fn threshold(&self) -> Duration {
        self.threshold
    }
}
