//! 데스크톱 알림 포트.
//!
//! 구현: `facewatch-ui` crate (notify-rust)

use async_trait::async_trait;

use crate::error::CoreError;

/// 데스크톱 알림 인터페이스
#[async_trait]
pub trait DesktopNotifier: Send + Sync {
    /// 일반 알림 표시 (제목 + 본문)
    async fn show_notification(&self, title: &str, body: &str) -> Result<(), CoreError>;

    /// 에러 알림 표시
    async fn show_error(&self, message: &str) -> Result<(), CoreError>;
}
