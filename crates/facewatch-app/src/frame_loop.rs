//! 블로킹 프레임 루프.
//!
//! 프레임 스트림의 유일한 소유자. 프레임을 읽고, 검출 모드가 켜져 있으면
//! 검출기를 돌려 영역을 그리고, 모든 프레임을 `FrameSink`로 렌더링한 뒤
//! 검출 이벤트를 컨트롤러로 보낸다. `spawn_blocking` 스레드에서 실행된다.

use facewatch_core::error::CoreError;
use facewatch_core::models::detection::{DetectionEvent, DetectionMode};
use facewatch_core::models::frame::AnnotatedFrame;
use facewatch_core::ports::camera::FrameStream;
use facewatch_core::ports::detector::FeatureDetector;
use facewatch_core::ports::presenter::FrameSink;
use facewatch_vision::annotate::draw_regions;
use std::time::Instant;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tracing::{debug, error, info};

/// 프레임 루프 종료 사유
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopExit {
    /// 컨트롤러 요청으로 중지
    Stopped,
    /// 스트림 끝 또는 읽기 실패
    StreamEnded,
}

/// 프레임 루프
pub struct FrameLoop {
    stream: Box<dyn FrameStream>,
    detector: Box<dyn FeatureDetector>,
    sink: Box<dyn FrameSink>,
    mode_rx: watch::Receiver<DetectionMode>,
    stop_rx: watch::Receiver<bool>,
    events_tx: mpsc::Sender<DetectionEvent>,
}

impl FrameLoop {
    pub fn new(
        stream: Box<dyn FrameStream>,
        detector: Box<dyn FeatureDetector>,
        sink: Box<dyn FrameSink>,
        mode_rx: watch::Receiver<DetectionMode>,
        stop_rx: watch::Receiver<bool>,
        events_tx: mpsc::Sender<DetectionEvent>,
    ) -> Self {
        Self {
            stream,
            detector,
            sink,
            mode_rx,
            stop_rx,
            events_tx,
        }
    }

    /// 블로킹 스레드에서 실행
    pub fn spawn(self) -> JoinHandle<LoopExit> {
        tokio::task::spawn_blocking(move || self.run())
    }

    /// 루프 실행. 어떤 경로로 끝나든 스트림을 해제한다.
    pub fn run(mut self) -> LoopExit {
        info!("프레임 루프 시작 (검출기: {})", self.detector.name());
        let exit = self.pump();
        self.stream.release();
        info!("프레임 루프 종료: {exit:?}");
        exit
    }

    fn pump(&mut self) -> LoopExit {
        loop {
            if *self.stop_rx.borrow() {
                return LoopExit::Stopped;
            }

            let mut frame = match self.stream.read_frame() {
                Ok(frame) => frame,
                Err(CoreError::StreamEnded) => return LoopExit::StreamEnded,
                Err(e) => {
                    error!("프레임 읽기 실패: {e}");
                    return LoopExit::StreamEnded;
                }
            };

            if !self.mode_rx.borrow().is_on() {
                self.sink.render(&AnnotatedFrame::plain(frame));
                continue;
            }

            let detection = self.detector.detect(&frame);
            let event = DetectionEvent::from_detection(Instant::now(), frame.index, &detection);
            draw_regions(&mut frame.image, &detection.regions);
            self.sink.render(&AnnotatedFrame { frame, detection });

            if self.events_tx.blocking_send(event).is_err() {
                debug!("검출 이벤트 수신 측 닫힘");
                return LoopExit::Stopped;
            }
        }
    }
}
