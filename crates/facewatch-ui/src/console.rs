//! 콘솔 프레젠테이션.
//!
//! `Presenter` 포트를 줄 단위 텍스트 출력으로 구현하고,
//! 표준 입력에서 사용자 명령을 읽는다.

use facewatch_core::models::command::UserCommand;
use facewatch_core::models::guard::{countdown_text, SessionCloseReason};
use facewatch_core::ports::presenter::Presenter;
use parking_lot::Mutex;
use std::io::{BufRead, Write};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

/// 명령 도움말
pub const HELP_TEXT: &str = "명령: start(카메라 시작) | detect(검출 토글) | on | off | \
cancel(종료 취소) | now(즉시 종료) | exit(앱 종료)";

/// 종료 대화상자 안내 문구
pub const SESSION_OPENED_TEXT: &str = "장시간 사용하지 않아 시스템이 자동으로 종료됩니다";

/// 콘솔 출력 프레젠터
///
/// 출력 대상은 기본적으로 stdout이며, 테스트에서는 버퍼를 넘긴다.
pub struct ConsolePresenter<W: Write + Send = std::io::Stdout> {
    out: Mutex<W>,
}

impl ConsolePresenter<std::io::Stdout> {
    /// stdout 프레젠터
    pub fn stdout() -> Self {
        Self::new(std::io::stdout())
    }
}

impl<W: Write + Send> ConsolePresenter<W> {
    pub fn new(out: W) -> Self {
        Self {
            out: Mutex::new(out),
        }
    }

    /// 출력 대상 꺼내기
    pub fn into_inner(self) -> W {
        self.out.into_inner()
    }

    fn line(&self, text: &str) {
        let mut out = self.out.lock();
        if let Err(e) = writeln!(out, "{text}").and_then(|_| out.flush()) {
            warn!("콘솔 출력 실패: {e}");
        }
    }
}

/// 세션 종료 사유 표시 문구
fn close_reason_text(reason: SessionCloseReason) -> &'static str {
    match reason {
        SessionCloseReason::Cancelled => "사용자가 종료를 취소했습니다",
        SessionCloseReason::FeatureReturned => "얼굴이 다시 검출되어 종료를 취소했습니다",
        SessionCloseReason::DetectionStopped => "검출이 중지되어 종료를 취소했습니다",
        SessionCloseReason::DetectionRestarted => "검출이 다시 시작되어 종료를 취소했습니다",
        SessionCloseReason::Expired => "카운트다운이 끝났습니다",
        SessionCloseReason::ShutdownRequested => "즉시 종료를 요청했습니다",
        SessionCloseReason::Exited => "앱을 종료합니다",
    }
}

impl<W: Write + Send> Presenter for ConsolePresenter<W> {
    fn on_status_changed(&self, text: &str) {
        debug!("상태: {text}");
        self.line(&format!("[상태] {text}"));
    }

    fn on_countdown_tick(&self, seconds_remaining: u32) {
        self.line(&format!("[종료] {}", countdown_text(seconds_remaining)));
    }

    fn on_shutdown_session_opened(&self, seconds_remaining: u32) {
        info!("종료 대화상자 열림: {seconds_remaining}초");
        self.line(&format!("[종료 예정] {SESSION_OPENED_TEXT}"));
        self.line(&format!(
            "[종료 예정] {} (cancel: 취소, now: 즉시 종료)",
            countdown_text(seconds_remaining)
        ));
    }

    fn on_shutdown_session_closed(&self, reason: SessionCloseReason) {
        self.line(&format!("[종료 대화상자 닫힘] {}", close_reason_text(reason)));
    }

    fn on_notice(&self, title: &str, body: &str) {
        self.line(&format!("[{title}] {body}"));
    }
}

/// 한 줄 입력을 명령으로 해석
pub fn parse_command(line: &str) -> Option<UserCommand> {
    let command = match line.trim().to_ascii_lowercase().as_str() {
        "start" | "camera" => UserCommand::StartCamera,
        "detect" | "toggle" | "d" => UserCommand::ToggleDetection,
        "on" => UserCommand::StartDetection,
        "off" => UserCommand::StopDetection,
        "cancel" | "c" => UserCommand::CancelShutdown,
        "now" | "shutdown" => UserCommand::ShutdownNow,
        "exit" | "quit" | "q" => UserCommand::ExitApp,
        _ => return None,
    };
    Some(command)
}

/// 입력 스트림에서 명령을 읽어 채널로 전달
///
/// 블로킹 읽기이므로 전용 스레드에서 호출한다. 입력이 끝나거나 수신 측이
/// 닫히면 반환한다. 알 수 없는 입력에는 도움말을 `presenter`로 안내한다.
pub fn read_commands<R: BufRead>(
    reader: R,
    tx: mpsc::Sender<UserCommand>,
    presenter: &dyn Presenter,
) {
    for line in reader.lines() {
        let line = match line {
            Ok(line) => line,
            Err(e) => {
                warn!("명령 입력 읽기 실패: {e}");
                return;
            }
        };

        if line.trim().is_empty() {
            continue;
        }

        match parse_command(&line) {
            Some(command) => {
                debug!("사용자 명령: {command:?}");
                if tx.blocking_send(command).is_err() {
                    return;
                }
            }
            None => presenter.on_notice("알 수 없는 명령", HELP_TEXT),
        }
    }
    debug!("명령 입력 종료 (EOF)");
}
