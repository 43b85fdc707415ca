//! 종료 카운트다운 세션.

use std::time::Instant;

/// 진행 중인 종료 카운트다운 한 건
#[derive(Debug, Clone)]
pub struct ShutdownSession {
    countdown_remaining: u32,
    opened_at: Instant,
    paused: bool,
}

impl ShutdownSession {
    /// 새 세션 (카운트다운은 항상 시작값부터)
    pub fn open(countdown_secs: u32, now: Instant) -> Self {
        Self {
            countdown_remaining: countdown_secs,
            opened_at: now,
            paused: false,
        }
    }

    /// 1초 경과 처리 후 남은 초 반환. 일시정지 중이면 그대로.
    pub fn tick(&mut self) -> u32 {
        if !self.paused {
            self.countdown_remaining = self.countdown_remaining.saturating_sub(1);
        }
        self.countdown_remaining
    }

    /// 남은 초
    pub fn remaining(&self) -> u32 {
        self.countdown_remaining
    }

    /// 카운트다운 만료 여부
    pub fn is_expired(&self) -> bool {
        self.countdown_remaining == 0
    }

    /// 세션 시작 시각
    pub fn opened_at(&self) -> Instant {
        self.opened_at
    }

    pub fn pause(&mut self) {
        self.paused = true;
    }

    pub fn resume(&mut self) {
        self.paused = false;
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }
}
