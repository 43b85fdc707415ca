//! 시스템 종료 동작.
//!
//! `ShutdownAction` 포트 구현. 플랫폼 종료 명령을 실행하거나
//! dry-run 모드에서는 로그만 남긴다.

use async_trait::async_trait;
use facewatch_core::config::ShutdownConfig;
use facewatch_core::error::CoreError;
use facewatch_core::ports::shutdown::ShutdownAction;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::process::Command;
use tracing::{info, warn};

/// 플랫폼별 종료 명령 (프로그램, 인자)
pub fn shutdown_command(use_sudo: bool) -> (String, Vec<String>) {
    if cfg!(windows) {
        return (
            "shutdown".to_string(),
            vec!["/s".to_string(), "/t".to_string(), "0".to_string()],
        );
    }

    let args = ["shutdown", "-h", "now"].map(String::from);
    if use_sudo {
        ("sudo".to_string(), args.to_vec())
    } else {
        (args[0].clone(), args[1..].to_vec())
    }
}

/// OS 종료 명령 실행
pub struct SystemShutdown {
    program: String,
    args: Vec<String>,
}

impl SystemShutdown {
    /// 플랫폼 기본 종료 명령
    pub fn new(use_sudo: bool) -> Self {
        let (program, args) = shutdown_command(use_sudo);
        Self::with_command(program, args)
    }

    /// 임의 명령으로 종료 (관리 스크립트 등)
    pub fn with_command(program: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            program: program.into(),
            args,
        }
    }
}

#[async_trait]
impl ShutdownAction for SystemShutdown {
    async fn execute_shutdown(&self) -> Result<(), CoreError> {
        let program = &self.program;
        warn!("시스템 종료 실행: {} {}", program, self.args.join(" "));

        let status = Command::new(program)
            .args(&self.args)
            .status()
            .await
            .map_err(|e| CoreError::ShutdownActionFailed(format!("{program} 실행 실패: {e}")))?;

        if !status.success() {
            return Err(CoreError::ShutdownActionFailed(format!(
                "{program} 종료 코드 {status}"
            )));
        }
        Ok(())
    }
}

/// 실제로 종료하지 않는 동작 (테스트, 데모)
#[derive(Debug, Default)]
pub struct DryRunShutdown {
    invocations: AtomicUsize,
}

impl DryRunShutdown {
    pub fn new() -> Self {
        Self::default()
    }

    /// 호출 횟수
    pub fn invocations(&self) -> usize {
        self.invocations.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ShutdownAction for DryRunShutdown {
    async fn execute_shutdown(&self) -> Result<(), CoreError> {
        self.invocations.fetch_add(1, Ordering::SeqCst);
        info!("dry-run: 시스템 종료 생략");
        Ok(())
    }
}

/// 설정에 맞는 종료 동작 생성
pub fn create_shutdown_action(config: &ShutdownConfig) -> Arc<dyn ShutdownAction> {
    if config.dry_run {
        info!("시스템 종료 동작: dry-run");
        Arc::new(DryRunShutdown::new())
    } else {
        Arc::new(SystemShutdown::new(config.use_sudo))
    }
}
