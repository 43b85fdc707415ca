//! # facewatch
//!
//! FACEWATCH 바이너리 진입점.
//! 설정 로드, CLI 오버라이드, 어댑터 생성과 연결, 라이프사이클 관리.

use anyhow::{Context, Result};
use clap::Parser;
use facewatch_app::{create_shutdown_action, Controller, ControllerConfig, LifecycleManager};
use facewatch_core::config::{AppConfig, DetectorBackend};
use facewatch_core::config_manager::ConfigManager;
use facewatch_core::models::command::UserCommand;
use facewatch_core::ports::presenter::{FrameSink, Presenter};
use facewatch_ui::console::HELP_TEXT;
use facewatch_ui::{read_commands, ConsolePresenter, DesktopNotifierImpl, NullFrameSink, PreviewWriter};
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

/// 명령 채널 크기
const COMMAND_CHANNEL_CAPACITY: usize = 32;

/// 카메라 얼굴 검출 기반 자동 종료 도구
///
/// 일정 시간 얼굴이 보이지 않으면 종료 카운트다운을 시작하고,
/// 취소되지 않으면 시스템을 종료한다.
#[derive(Parser, Debug)]
#[command(name = "facewatch")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// 설정 파일 경로 (기본: 플랫폼 설정 디렉토리의 config.json)
    #[arg(long, short = 'c')]
    config: Option<PathBuf>,

    /// 로그 레벨 (trace, debug, info, warn, error)
    #[arg(long, short = 'l', default_value = "info")]
    log_level: String,

    /// 카메라 장치 번호
    #[arg(long)]
    camera: Option<i32>,

    /// 카메라 대신 재생할 이미지 시퀀스 디렉토리
    #[arg(long)]
    frames_dir: Option<PathBuf>,

    /// 검출기 (rustface, cascade)
    #[arg(long)]
    detector: Option<String>,

    /// 특징 미검출 임계값 (초)
    #[arg(long)]
    idle_secs: Option<u64>,

    /// 종료 카운트다운 길이 (초)
    #[arg(long)]
    countdown_secs: Option<u32>,

    /// 미리보기 JPEG 저장 경로
    #[arg(long)]
    preview: Option<PathBuf>,

    /// 실제로 종료하지 않고 로그만 남김
    #[arg(long)]
    dry_run: bool,

    /// 시작 시 카메라 열기
    #[arg(long)]
    auto_start: bool,

    /// 시작 시 검출까지 켜기 (--auto-start 포함)
    #[arg(long)]
    detect: bool,
}

/// 설정 로드
///
/// `--config`가 지정되면 그 파일을 쓰고 실패 시 에러. 아니면 플랫폼 기본
/// 경로를 시도하고, 실패하면 기본 설정으로 계속한다.
fn load_config(path: Option<PathBuf>) -> Result<AppConfig> {
    match path {
        Some(path) => {
            let manager = ConfigManager::with_path(path.clone())
                .with_context(|| format!("설정 파일 로드 실패: {}", path.display()))?;
            info!("설정 파일: {}", manager.config_path().display());
            Ok(manager.get())
        }
        None => match ConfigManager::new() {
            Ok(manager) => {
                info!("설정 파일: {}", manager.config_path().display());
                Ok(manager.get())
            }
            Err(e) => {
                warn!("설정 관리자 초기화 실패, 기본 설정 사용: {e}");
                Ok(AppConfig::default_config())
            }
        },
    }
}

/// CLI 인자로 설정 오버라이드 (파일에는 저장하지 않음)
fn apply_overrides(config: &mut AppConfig, args: &Args) -> Result<()> {
    if let Some(index) = args.camera {
        config.camera.device_index = index;
    }
    if let Some(ref dir) = args.frames_dir {
        config.camera.frames_dir = Some(dir.clone());
    }
    if let Some(ref name) = args.detector {
        config.detector.backend = match name.as_str() {
            "rustface" | "seeta" => DetectorBackend::Rustface,
            "cascade" | "haar" => DetectorBackend::Cascade,
            other => anyhow::bail!("알 수 없는 검출기: {other} (rustface, cascade)"),
        };
    }
    if let Some(secs) = args.idle_secs {
        config.idle.idle_threshold_secs = secs;
    }
    if let Some(secs) = args.countdown_secs {
        config.idle.shutdown_countdown_secs = secs;
    }
    if let Some(ref path) = args.preview {
        config.ui.preview_path = Some(path.clone());
    }
    if args.dry_run {
        config.shutdown.dry_run = true;
    }
    config.validate().context("설정 검증 실패")?;
    Ok(())
}

fn print_banner(config: &AppConfig) {
    println!();
    println!("FACEWATCH v{}", env!("CARGO_PKG_VERSION"));
    println!(
        "  {}초 동안 얼굴이 보이지 않으면 {}초 카운트다운 후 시스템을 종료합니다{}",
        config.idle.idle_threshold_secs,
        config.idle.shutdown_countdown_secs,
        if config.shutdown.dry_run { " (dry-run)" } else { "" }
    );
    println!("  {HELP_TEXT}");
    println!();
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // tracing 초기화
    let log_filter = format!(
        "facewatch={},facewatch_app={},facewatch_core={},facewatch_monitor={},facewatch_vision={},facewatch_ui={}",
        args.log_level, args.log_level, args.log_level, args.log_level, args.log_level, args.log_level
    );
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&log_filter)),
        )
        .init();

    info!("FACEWATCH 시작");

    let mut config = load_config(args.config.clone())?;
    apply_overrides(&mut config, &args)?;

    // ── 어댑터 생성 ──
    let source = facewatch_vision::create_frame_source(&config).context("프레임 소스 생성 실패")?;
    let detector = facewatch_vision::create_detector(&config).context("검출기 생성 실패")?;
    info!("검출기: {}", detector.name());

    let sink: Box<dyn FrameSink> = match config.ui.preview_path.clone() {
        Some(path) => {
            info!("미리보기 파일: {}", path.display());
            Box::new(PreviewWriter::new(
                path,
                config.ui.preview_every_frames,
                config.ui.preview_max_width,
                config.ui.preview_max_height,
            ))
        }
        None => Box::new(NullFrameSink),
    };

    let presenter: Arc<dyn Presenter> = Arc::new(ConsolePresenter::stdout());
    let shutdown_action = create_shutdown_action(&config.shutdown);

    let mut controller = Controller::new(
        ControllerConfig::from(&config),
        Arc::from(source),
        detector,
        sink,
        presenter.clone(),
        shutdown_action,
    );
    if config.ui.desktop_notifications {
        controller = controller.with_notifier(Arc::new(DesktopNotifierImpl::new()));
    }

    // ── 라이프사이클 ──
    let lifecycle = Arc::new(LifecycleManager::new());
    let shutdown_rx = lifecycle.subscribe();
    {
        let lifecycle = lifecycle.clone();
        tokio::spawn(async move {
            lifecycle.wait_for_signal().await;
        });
    }

    // ── 명령 입력 (표준 입력은 블로킹이므로 전용 스레드) ──
    let (command_tx, command_rx) = mpsc::channel(COMMAND_CHANNEL_CAPACITY);
    if args.auto_start || args.detect {
        command_tx.send(UserCommand::StartCamera).await?;
    }
    if args.detect {
        command_tx.send(UserCommand::StartDetection).await?;
    }
    {
        let presenter = presenter.clone();
        std::thread::Builder::new()
            .name("facewatch-stdin".to_string())
            .spawn(move || {
                read_commands(std::io::stdin().lock(), command_tx, presenter.as_ref());
            })
            .context("명령 입력 스레드 생성 실패")?;
    }

    print_banner(&config);

    let reason = controller.run(command_rx, shutdown_rx).await;
    lifecycle.shutdown();

    if reason.runs_shutdown_action() {
        info!("시스템 종료 요청 완료");
    } else {
        info!("FACEWATCH 종료: {reason:?}");
    }
    Ok(())
}
