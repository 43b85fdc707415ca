//! # facewatch-monitor
//!
//! 특징 미검출(유휴) 시간을 추적하고 종료 카운트다운을 구동하는 상태 머신.
//!
//! - [`idle`]: 마지막 특징 검출 시각을 보관하는 유휴 시계
//! - [`session`]: 진행 중인 종료 카운트다운 세션
//! - [`guard`]: `IdleShutdownGuard` 상태 머신 (I/O 없음, 효과 목록 반환)

pub mod guard;
pub mod idle;
pub mod session;

pub use guard::{GuardConfig, IdleShutdownGuard};
