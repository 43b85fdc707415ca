//! 설정 및 와이어링 통합 테스트.
//!
//! AppConfig → 어댑터 생성 검증.

use facewatch_app::{create_shutdown_action, ControllerConfig, COUNTDOWN_TICK};
use facewatch_core::config::{AppConfig, DetectorBackend};
use facewatch_core::config_manager::ConfigManager;
use facewatch_core::models::frame::{AnnotatedFrame, Frame};
use facewatch_core::models::guard::ReturnPolicy;
use facewatch_core::ports::camera::{FrameSource, FrameStream};
use facewatch_core::ports::presenter::FrameSink;
use facewatch_core::ports::shutdown::ShutdownAction;
use facewatch_ui::{NullFrameSink, PreviewWriter};
use image::{Rgb, RgbImage};
use std::time::Duration;
use tempfile::TempDir;

#[test]
fn config_defaults_are_valid() {
    let config = AppConfig::default_config();
    assert!(config.validate().is_ok());

    assert_eq!(config.camera.device_index, 0);
    assert!(config.camera.frames_dir.is_none());
    assert_eq!(config.detector.backend, DetectorBackend::Rustface);
    assert_eq!(config.idle.idle_threshold_secs, 10);
    assert_eq!(config.idle.shutdown_countdown_secs, 30);
    assert_eq!(config.idle.return_policy, ReturnPolicy::Cancel);
    assert!(!config.shutdown.dry_run);
    assert!(config.ui.preview_path.is_none());
}

#[test]
fn controller_config_follows_idle_section() {
    let mut config = AppConfig::default_config();
    config.idle.idle_threshold_secs = 45;
    config.idle.shutdown_countdown_secs = 12;
    config.idle.return_policy = ReturnPolicy::Pause;

    let controller = ControllerConfig::from(&config);
    assert_eq!(controller.guard.idle_threshold, Duration::from_secs(45));
    assert_eq!(controller.guard.countdown_secs, 12);
    assert_eq!(controller.guard.return_policy, ReturnPolicy::Pause);
    assert_eq!(controller.tick_interval, Duration::from_secs(1));
}

#[test]
fn countdown_always_ticks_in_whole_seconds() {
    let json = r#"{ "idle": { "shutdown_countdown_secs": 3, "tick_interval_ms": 100 } }"#;
    let config: AppConfig = serde_json::from_str(json).unwrap();
    assert!(config.validate().is_ok());

    let controller = ControllerConfig::from(&config);
    assert_eq!(COUNTDOWN_TICK, Duration::from_secs(1));
    assert_eq!(controller.tick_interval, COUNTDOWN_TICK);
    assert_eq!(controller.guard.countdown_secs, 3);
}

#[test]
fn config_file_roundtrip_through_manager() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("facewatch.json");

    let json = serde_json::json!({
        "camera": { "device_index": 1 },
        "detector": { "backend": "cascade", "cascade_dir": "/opt/haar" },
        "idle": { "idle_threshold_secs": 120, "return_policy": "pause" },
        "shutdown": { "dry_run": true }
    });
    std::fs::write(&path, serde_json::to_string_pretty(&json).unwrap()).unwrap();

    let manager = ConfigManager::with_path(path).unwrap();
    let config = manager.get();
    assert_eq!(config.camera.device_index, 1);
    assert_eq!(config.detector.backend, DetectorBackend::Cascade);
    assert_eq!(config.idle.idle_threshold_secs, 120);
    assert_eq!(config.idle.shutdown_countdown_secs, 30);
    assert_eq!(config.idle.return_policy, ReturnPolicy::Pause);
    assert!(config.shutdown.dry_run);
    assert!(config.shutdown.use_sudo);
}

#[test]
fn frames_dir_wires_image_sequence_source() {
    let temp_dir = TempDir::new().unwrap();
    RgbImage::from_pixel(4, 4, Rgb([1, 2, 3]))
        .save(temp_dir.path().join("0001.png"))
        .unwrap();

    let mut config = AppConfig::default_config();
    config.camera.frames_dir = Some(temp_dir.path().to_path_buf());
    config.camera.frame_interval_ms = 0;

    let source = facewatch_vision::create_frame_source(&config).unwrap();
    let mut stream = source.open().unwrap();
    let frame = stream.read_frame().unwrap();
    assert_eq!(frame.dimensions(), (4, 4));
    assert!(stream.read_frame().is_err());
    stream.release();
}

#[tokio::test]
async fn dry_run_shutdown_action_from_config() {
    let mut config = AppConfig::default_config();
    config.shutdown.dry_run = true;
    let action = create_shutdown_action(&config.shutdown);
    assert!(action.execute_shutdown().await.is_ok());
}

#[test]
fn frame_sinks_from_ui_config() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("latest.jpg");
    let config = AppConfig::default_config();

    let mut sinks: Vec<Box<dyn FrameSink>> = vec![
        Box::new(NullFrameSink),
        Box::new(PreviewWriter::new(
            path.clone(),
            config.ui.preview_every_frames,
            config.ui.preview_max_width,
            config.ui.preview_max_height,
        )),
    ];
    let frame = AnnotatedFrame::plain(Frame::new(0, RgbImage::new(1280, 720)));
    for sink in sinks.iter_mut() {
        sink.render(&frame);
    }

    let preview = image::open(&path).unwrap();
    assert_eq!((preview.width(), preview.height()), (800, 450));
}
