//! 데스크톱 알림 어댑터.
//!
//! `DesktopNotifier` 포트 구현. notify-rust 기반.
//! `show()`는 동기 D-Bus 호출이므로 블로킹 스레드에서 실행한다.

use async_trait::async_trait;
use facewatch_core::error::CoreError;
use facewatch_core::ports::notifier::DesktopNotifier;
use notify_rust::{Notification, Timeout};
use tracing::{debug, warn};

const APP_NAME: &str = "FACEWATCH";

/// 데스크톱 알림 어댑터
pub struct DesktopNotifierImpl {
    /// 알림 표시 시간 (밀리초)
    timeout_ms: u32,
}

impl DesktopNotifierImpl {
    pub fn new() -> Self {
        Self { timeout_ms: 5_000 }
    }

    fn build(&self, summary: &str, body: &str) -> Notification {
        let mut notification = Notification::new();
        notification
            .summary(summary)
            .body(body)
            .appname(APP_NAME)
            .timeout(Timeout::Milliseconds(self.timeout_ms));
        notification
    }
}

async fn show(notification: Notification) -> Result<(), CoreError> {
    tokio::task::spawn_blocking(move || notification.show().map(|_| ()))
        .await
        .map_err(|e| CoreError::Internal(format!("알림 태스크 실패: {e}")))?
        .map_err(|e| CoreError::Internal(format!("알림 표시 실패: {e}")))
}

impl Default for DesktopNotifierImpl {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl DesktopNotifier for DesktopNotifierImpl {
    async fn show_notification(&self, title: &str, body: &str) -> Result<(), CoreError> {
        debug!("알림: {title}");

        show(self.build(title, body)).await
    }

    async fn show_error(&self, message: &str) -> Result<(), CoreError> {
        warn!("에러 알림: {message}");

        show(self.build("FACEWATCH 에러", message)).await
    }
}
