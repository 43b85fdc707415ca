//! # facewatch-ui
//!
//! 프레젠테이션 어댑터 크레이트.
//! 콘솔 상태 표시줄/카운트다운 출력, 표준 입력 명령 파서,
//! 데스크톱 알림(notify-rust), 최신 프레임 미리보기 파일을 제공한다.

pub mod console;
pub mod notifier;
pub mod preview;

pub use console::{parse_command, read_commands, ConsolePresenter};
pub use notifier::DesktopNotifierImpl;
pub use preview::{NullFrameSink, PreviewWriter};
