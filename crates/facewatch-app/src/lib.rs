//! # facewatch-app
//!
//! FACEWATCH 실행 구성요소.
//! 가드를 소유하는 컨트롤러, 블로킹 프레임 루프, OS 종료 동작,
//! 시그널 기반 라이프사이클 관리를 제공한다. 바이너리(`main.rs`)는
//! 이들을 설정에 맞게 연결만 한다.

pub mod controller;
pub mod frame_loop;
pub mod lifecycle;
pub mod shutdown;

pub use controller::{Controller, ControllerConfig, COUNTDOWN_TICK};
pub use frame_loop::{FrameLoop, LoopExit};
pub use lifecycle::LifecycleManager;
pub use shutdown::{create_shutdown_action, DryRunShutdown, SystemShutdown};
