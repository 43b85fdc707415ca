//! 라이프사이클 관리.
//!
//! OS 종료 시그널(SIGINT, SIGTERM, Ctrl+C)을 받아 종료 채널로 알린다.
//! 컨트롤러는 이 신호를 "앱 종료" 명령과 같게 처리한다 (시스템 종료 없음).

use tokio::sync::watch;
use tracing::info;

/// 라이프사이클 관리자
pub struct LifecycleManager {
    shutdown_tx: watch::Sender<bool>,
}

impl LifecycleManager {
    pub fn new() -> Self {
        let (shutdown_tx, _) = watch::channel(false);
        Self { shutdown_tx }
    }

    /// 종료 수신기
    pub fn subscribe(&self) -> watch::Receiver<bool> {
        self.shutdown_tx.subscribe()
    }

    /// 종료 신호 발송
    pub fn shutdown(&self) {
        if !self.shutdown_tx.send_replace(true) {
            info!("종료 신호 발송");
        }
    }

    /// OS 시그널 대기 후 종료 신호 발송
    pub async fn wait_for_signal(&self) {
        #[cfg(unix)]
        {
            use tokio::signal::unix::{signal, SignalKind};
            let mut sigint = signal(SignalKind::interrupt()).expect("SIGINT 핸들러 등록 실패");
            let mut sigterm = signal(SignalKind::terminate()).expect("SIGTERM 핸들러 등록 실패");

            tokio::select! {
                _ = sigint.recv() => info!("SIGINT 수신"),
                _ = sigterm.recv() => info!("SIGTERM 수신"),
            }
        }

        #[cfg(not(unix))]
        {
            tokio::signal::ctrl_c()
                .await
                .expect("Ctrl+C 핸들러 등록 실패");
            info!("Ctrl+C 수신");
        }

        self.shutdown();
    }
}

impl Default for LifecycleManager {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_running() {
        let lm = LifecycleManager::new();
        assert!(!*lm.subscribe().borrow());
    }

    #[tokio::test]
    async fn subscribers_see_shutdown() {
        let lm = LifecycleManager::new();
        let mut rx = lm.subscribe();
        lm.shutdown();
        rx.changed().await.unwrap();
        assert!(*rx.borrow());

        // 두 번째 호출은 무해
        lm.shutdown();
        assert!(*lm.subscribe().borrow());
    }
}
