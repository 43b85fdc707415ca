//! 포트 인터페이스 (trait).
//!
//! Hexagonal Architecture의 포트 레이어.
//! 각 어댑터 crate가 이 trait들을 구현하며,
//! `facewatch-app`에서 `Arc<dyn T>` / `Box<dyn T>`로 와이어링한다.
//!
//! 프레임 소스와 검출기는 블로킹 스레드에서 호출되므로 동기 trait이고,
//! 알림과 시스템 종료는 `async_trait`을 사용한다.

pub mod camera;
pub mod detector;
pub mod notifier;
pub mod presenter;
pub mod shutdown;
