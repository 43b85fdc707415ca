//! 시스템 종료 포트.
//!
//! 구현: `facewatch-app` crate (플랫폼별 종료 명령, dry-run)

use async_trait::async_trait;

use crate::error::CoreError;

/// OS 수준 종료 동작
#[async_trait]
pub trait ShutdownAction: Send + Sync {
    /// 시스템 종료 실행. 성공 시 보통 반환되지 않는다.
    async fn execute_shutdown(&self) -> Result<(), CoreError>;
}
