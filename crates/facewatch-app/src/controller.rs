//! 앱 컨트롤러.
//!
//! `IdleShutdownGuard`를 소유하는 단일 태스크. 사용자 명령, 검출 이벤트,
//! 프레임 루프 종료, 1초 틱을 하나의 `select!`로 받아 가드에 전달하고,
//! 가드가 돌려준 효과를 프레젠터, 알림, 종료 동작으로 실행한다.
//!
//! 분기 우선순위는 종료 시그널 > 명령 > 검출 이벤트 > 프레임 루프 종료 > 틱.
//! 같은 순간에 도착한 취소나 특징 검출은 항상 다음 틱보다 먼저 반영된다.
//!
//! 틱 기준점은 가드가 유휴 추적을 다시 시작할 때마다 그 시각으로 옮긴다.
//! 데스크톱 알림은 별도 태스크가 보내며 컨트롤러는 기다리지 않는다.

use facewatch_core::config::AppConfig;
use facewatch_core::error::CoreError;
use facewatch_core::models::command::UserCommand;
use facewatch_core::models::detection::{DetectionEvent, DetectionMode};
use facewatch_core::models::guard::{countdown_text, GuardEffect, TerminationReason};
use facewatch_core::ports::camera::FrameSource;
use facewatch_core::ports::detector::FeatureDetector;
use facewatch_core::ports::notifier::DesktopNotifier;
use facewatch_core::ports::presenter::{FrameSink, Presenter};
use facewatch_core::ports::shutdown::ShutdownAction;
use facewatch_monitor::{GuardConfig, IdleShutdownGuard};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, error, info, warn};

use crate::frame_loop::{FrameLoop, LoopExit};

/// 검출 이벤트 채널 크기
const EVENT_CHANNEL_CAPACITY: usize = 64;

/// 프레임 루프 정지 대기 한도
const CAMERA_STOP_TIMEOUT: Duration = Duration::from_secs(2);

/// 알림 대기열 크기
const NOTICE_CHANNEL_CAPACITY: usize = 16;

/// 종료 시 남은 알림 전송 대기 한도
const NOTICE_FLUSH_TIMEOUT: Duration = Duration::from_secs(3);

/// 종료 카운트다운 1단계 길이
pub const COUNTDOWN_TICK: Duration = Duration::from_secs(1);

/// 컨트롤러 설정
#[derive(Debug, Clone, Copy)]
pub struct ControllerConfig {
    /// 가드 타이밍
    pub guard: GuardConfig,
    /// 틱 간격. 실행 파일은 항상 [`COUNTDOWN_TICK`]을 쓰고 테스트만 줄인다.
    pub tick_interval: Duration,
}

impl From<&AppConfig> for ControllerConfig {
    fn from(config: &AppConfig) -> Self {
        Self {
            guard: GuardConfig::from(&config.idle),
            tick_interval: COUNTDOWN_TICK,
        }
    }
}

/// 알림 태스크로 보내는 요청
#[derive(Debug)]
enum DesktopNotice {
    Info { title: String, body: String },
    Error(String),
}

/// 앱 컨트롤러
pub struct Controller {
    guard: IdleShutdownGuard,
    tick_interval: Duration,
    source: Arc<dyn FrameSource>,
    /// 카메라 시작 시 프레임 루프로 넘어간다
    pipeline: Option<(Box<dyn FeatureDetector>, Box<dyn FrameSink>)>,
    frame_task: Option<JoinHandle<LoopExit>>,
    presenter: Arc<dyn Presenter>,
    notifier: Option<Arc<dyn DesktopNotifier>>,
    notices: Option<mpsc::Sender<DesktopNotice>>,
    shutdown_action: Arc<dyn ShutdownAction>,
    mode_tx: watch::Sender<DetectionMode>,
    stop_tx: watch::Sender<bool>,
    events_tx: mpsc::Sender<DetectionEvent>,
    events_rx: mpsc::Receiver<DetectionEvent>,
}

impl Controller {
    pub fn new(
        config: ControllerConfig,
        source: Arc<dyn FrameSource>,
        detector: Box<dyn FeatureDetector>,
        sink: Box<dyn FrameSink>,
        presenter: Arc<dyn Presenter>,
        shutdown_action: Arc<dyn ShutdownAction>,
    ) -> Self {
        let (mode_tx, _) = watch::channel(DetectionMode::Off);
        let (stop_tx, _) = watch::channel(false);
        let (events_tx, events_rx) = mpsc::channel(EVENT_CHANNEL_CAPACITY);
        Self {
            guard: IdleShutdownGuard::new(config.guard),
            tick_interval: config.tick_interval,
            source,
            pipeline: Some((detector, sink)),
            frame_task: None,
            presenter,
            notifier: None,
            notices: None,
            shutdown_action,
            mode_tx,
            stop_tx,
            events_tx,
            events_rx,
        }
    }

    /// 데스크톱 알림 연결
    pub fn with_notifier(mut self, notifier: Arc<dyn DesktopNotifier>) -> Self {
        self.notifier = Some(notifier);
        self
    }

    /// 종료될 때까지 실행
    ///
    /// `commands`가 닫혀도 틱과 검출은 계속된다. `shutdown_rx`에 종료 신호가
    /// 오면 앱 종료 명령과 같이 처리한다.
    pub async fn run(
        mut self,
        mut commands: mpsc::Receiver<UserCommand>,
        mut shutdown_rx: watch::Receiver<bool>,
    ) -> TerminationReason {
        let mut ticker = tokio::time::interval_at(
            tokio::time::Instant::now() + self.tick_interval,
            self.tick_interval,
        );
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        let notice_task = self.notifier.take().map(|notifier| {
            let (tx, rx) = mpsc::channel(NOTICE_CHANNEL_CAPACITY);
            self.notices = Some(tx);
            tokio::spawn(deliver_notices(notifier, rx))
        });

        info!("컨트롤러 시작 (틱 {}ms)", self.tick_interval.as_millis());

        let reason = loop {
            let armed_before = self.guard.armed_at();
            let effects = tokio::select! {
                biased;

                _ = shutdown_rx.changed() => {
                    info!("종료 시그널: 앱 종료");
                    self.guard.exit_app()
                }
                Some(command) = commands.recv() => self.handle_command(command).await,
                Some(event) = self.events_rx.recv() => self.guard.observe(event),
                exit = Self::join_frame_loop(&mut self.frame_task) => match exit {
                    LoopExit::StreamEnded => {
                        error!("카메라 스트림 종료");
                        self.guard.stream_ended()
                    }
                    LoopExit::Stopped => Vec::new(),
                },
                _ = ticker.tick() => self.guard.tick(Instant::now()),
            };

            let armed = self.guard.armed_at();
            if armed != armed_before {
                if let Some(at) = armed {
                    ticker.reset_at(tokio::time::Instant::from_std(at) + self.tick_interval);
                }
            }

            if let Some(reason) = self.apply(effects).await {
                break reason;
            }
        };

        self.stop_camera().await;

        self.notices = None;
        if let Some(task) = notice_task {
            if tokio::time::timeout(NOTICE_FLUSH_TIMEOUT, task).await.is_err() {
                warn!("남은 데스크톱 알림 전송 시간 초과");
            }
        }

        info!("컨트롤러 종료: {reason:?}");
        reason
    }

    async fn handle_command(&mut self, command: UserCommand) -> Vec<GuardEffect> {
        debug!("명령 처리: {command:?}");
        let now = Instant::now();
        match command {
            UserCommand::StartCamera => {
                self.start_camera().await;
                Vec::new()
            }
            UserCommand::StartDetection => {
                if !self.require_camera() {
                    return Vec::new();
                }
                self.guard.start_detection(now)
            }
            UserCommand::ToggleDetection => {
                if self.guard.mode().is_on() {
                    self.guard.stop_detection()
                } else if self.require_camera() {
                    self.guard.start_detection(now)
                } else {
                    Vec::new()
                }
            }
            UserCommand::StopDetection => self.guard.stop_detection(),
            UserCommand::CancelShutdown => self.guard.cancel_shutdown(now),
            UserCommand::ShutdownNow => self.guard.shutdown_now(),
            UserCommand::ExitApp => self.guard.exit_app(),
        }
    }

    /// 효과 실행. 종료 효과가 있으면 사유를 돌려준다.
    async fn apply(&mut self, effects: Vec<GuardEffect>) -> Option<TerminationReason> {
        let mut exit = None;
        for effect in effects {
            match effect {
                GuardEffect::StatusChanged(text) => self.presenter.on_status_changed(&text),
                GuardEffect::SessionOpened { remaining } => {
                    self.presenter.on_shutdown_session_opened(remaining);
                    self.notify(DesktopNotice::Info {
                        title: "FACEWATCH 자동 종료".to_string(),
                        body: countdown_text(remaining),
                    });
                }
                GuardEffect::CountdownTick { remaining } => {
                    self.presenter.on_countdown_tick(remaining)
                }
                GuardEffect::SessionClosed(reason) => {
                    self.presenter.on_shutdown_session_closed(reason)
                }
                GuardEffect::ExecuteShutdown => self.execute_shutdown().await,
                GuardEffect::Exit(reason) => exit = Some(reason),
            }
        }

        let mode = self.guard.mode();
        self.mode_tx.send_if_modified(|current| {
            if *current == mode {
                return false;
            }
            *current = mode;
            true
        });
        exit
    }

    /// 카메라를 해제한 뒤 종료 동작 실행. 실패해도 프로세스는 종료 경로를 탄다.
    async fn execute_shutdown(&mut self) {
        self.stop_camera().await;
        if let Err(e) = self.shutdown_action.execute_shutdown().await {
            error!("시스템 종료 실패: {e}");
            let body = format!("{e}. 시스템을 직접 종료해 주세요");
            self.presenter.on_notice("시스템 종료 실패", &body);
            self.notify(DesktopNotice::Error(body));
        }
    }

    /// 알림 태스크에 넘기고 바로 돌아온다. 대기열이 차면 버린다.
    fn notify(&self, notice: DesktopNotice) {
        let Some(tx) = &self.notices else {
            return;
        };
        if let Err(e) = tx.try_send(notice) {
            warn!("데스크톱 알림 생략: {e}");
        }
    }

    async fn start_camera(&mut self) {
        if self.frame_task.is_some() {
            self.presenter.on_notice("카메라", "이미 실행 중입니다");
            return;
        }

        let source = Arc::clone(&self.source);
        let description = source.describe();
        let opened = tokio::task::spawn_blocking(move || source.open())
            .await
            .map_err(|e| CoreError::Internal(format!("카메라 열기 태스크 실패: {e}")))
            .and_then(|result| result);

        let stream = match opened {
            Ok(stream) => stream,
            Err(e) => {
                error!("카메라 열기 실패: {e}");
                self.presenter.on_notice("카메라를 열 수 없습니다", &e.to_string());
                return;
            }
        };

        let Some((detector, sink)) = self.pipeline.take() else {
            warn!("검출 파이프라인이 이미 사용됨");
            return;
        };

        let frame_loop = FrameLoop::new(
            stream,
            detector,
            sink,
            self.mode_tx.subscribe(),
            self.stop_tx.subscribe(),
            self.events_tx.clone(),
        );
        self.frame_task = Some(frame_loop.spawn());
        info!("카메라 시작: {description}");
        self.presenter
            .on_status_changed(&format!("카메라 실행 중: {description}"));
    }

    fn require_camera(&self) -> bool {
        if self.frame_task.is_some() {
            return true;
        }
        self.presenter.on_notice(
            "검출을 시작할 수 없습니다",
            "카메라가 실행 중이 아닙니다. 먼저 start 명령으로 카메라를 여세요",
        );
        false
    }

    /// 프레임 루프를 멈추고 스트림 해제를 기다린다
    async fn stop_camera(&mut self) {
        let Some(handle) = self.frame_task.take() else {
            return;
        };
        self.stop_tx.send_replace(true);
        self.events_rx.close();

        match tokio::time::timeout(CAMERA_STOP_TIMEOUT, handle).await {
            Ok(Ok(exit)) => debug!("프레임 루프 정지: {exit:?}"),
            Ok(Err(e)) => error!("프레임 루프 태스크 실패: {e}"),
            Err(_) => warn!(
                "프레임 루프가 {}초 안에 멈추지 않음",
                CAMERA_STOP_TIMEOUT.as_secs()
            ),
        }
    }

    async fn join_frame_loop(task: &mut Option<JoinHandle<LoopExit>>) -> LoopExit {
        let Some(handle) = task.as_mut() else {
            return std::future::pending().await;
        };
        let exit = match handle.await {
            Ok(exit) => exit,
            Err(e) => {
                error!("프레임 루프 태스크 실패: {e}");
                LoopExit::StreamEnded
            }
        };
        *task = None;
        exit
    }
}

async fn deliver_notices(
    notifier: Arc<dyn DesktopNotifier>,
    mut notices: mpsc::Receiver<DesktopNotice>,
) {
    while let Some(notice) = notices.recv().await {
        let result = match &notice {
            DesktopNotice::Info { title, body } => notifier.show_notification(title, body).await,
            DesktopNotice::Error(message) => notifier.show_error(message).await,
        };
        if let Err(e) = result {
            warn!("데스크톱 알림 실패: {e}");
        }
    }
    debug!("알림 태스크 종료");
}
