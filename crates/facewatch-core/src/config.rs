//! 애플리케이션 설정 구조체.
//!
//! 카메라 장치, 검출기, 유휴/종료 타이밍, 종료 동작, UI 설정 등
//! 런타임 설정을 정의한다. `ConfigManager`를 통해 JSON 파일에서 로드.
//!
//! 빠진 섹션이나 필드는 기본값으로 채워진다. 종료 카운트다운은 항상
//! 1초 단위이므로 틱 간격은 설정 항목이 아니다.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

use crate::error::CoreError;
use crate::models::guard::ReturnPolicy;

/// 최상위 애플리케이션 설정
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// 카메라 설정
    #[serde(default)]
    pub camera: CameraConfig,
    /// 검출기 설정
    #[serde(default)]
    pub detector: DetectorConfig,
    /// 유휴/종료 타이밍 설정
    #[serde(default)]
    pub idle: IdleConfig,
    /// 시스템 종료 동작 설정
    #[serde(default)]
    pub shutdown: ShutdownConfig,
    /// UI 설정
    #[serde(default)]
    pub ui: UiConfig,
}

// ============================================================
// 카메라 설정
// ============================================================

/// 카메라 설정
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CameraConfig {
    /// 카메라 장치 번호
    #[serde(default)]
    pub device_index: i32,
    /// 이미지 시퀀스 디렉토리 (설정 시 카메라 대신 재생)
    #[serde(default)]
    pub frames_dir: Option<PathBuf>,
    /// 이미지 시퀀스 재생 간격 (밀리초)
    #[serde(default = "default_frame_interval_ms")]
    pub frame_interval_ms: u64,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            device_index: 0,
            frames_dir: None,
            frame_interval_ms: default_frame_interval_ms(),
        }
    }
}

// ============================================================
// 검출기 설정
// ============================================================

/// 검출기 구현 선택
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DetectorBackend {
    /// SeetaFace (rustface), 얼굴만
    #[default]
    Rustface,
    /// OpenCV Haar cascade, 얼굴/눈/코/입 (`opencv` feature 필요)
    Cascade,
}

/// 검출기 설정
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DetectorConfig {
    /// 검출기 구현
    #[serde(default)]
    pub backend: DetectorBackend,
    /// Haar cascade XML 디렉토리
    #[serde(default = "default_cascade_dir")]
    pub cascade_dir: PathBuf,
    /// SeetaFace 모델 파일 경로
    #[serde(default = "default_model_path")]
    pub model_path: PathBuf,
    /// 피라미드 스케일 계수
    #[serde(default = "default_scale_factor")]
    pub scale_factor: f64,
    /// 최소 이웃 수 (cascade)
    #[serde(default = "default_min_neighbors")]
    pub min_neighbors: i32,
    /// 최소 얼굴 크기 (픽셀)
    #[serde(default = "default_min_face_size")]
    pub min_face_size: u32,
}

impl Default for DetectorConfig {
    fn default() -> Self {
        Self {
            backend: DetectorBackend::default(),
            cascade_dir: default_cascade_dir(),
            model_path: default_model_path(),
            scale_factor: default_scale_factor(),
            min_neighbors: default_min_neighbors(),
            min_face_size: default_min_face_size(),
        }
    }
}

// ============================================================
// 유휴/종료 타이밍 설정
// ============================================================

/// 유휴/종료 타이밍 설정
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IdleConfig {
    /// 특징 미검출 임계값 (초). 초과 시 종료 카운트다운 시작
    #[serde(default = "default_idle_threshold_secs")]
    pub idle_threshold_secs: u64,
    /// 종료 카운트다운 길이 (초)
    #[serde(default = "default_shutdown_countdown_secs")]
    pub shutdown_countdown_secs: u32,
    /// 카운트다운 중 특징 재검출 처리
    #[serde(default)]
    pub return_policy: ReturnPolicy,
}

impl Default for IdleConfig {
    fn default() -> Self {
        Self {
            idle_threshold_secs: default_idle_threshold_secs(),
            shutdown_countdown_secs: default_shutdown_countdown_secs(),
            return_policy: ReturnPolicy::default(),
        }
    }
}

impl IdleConfig {
    /// 유효성 검증
    pub fn validate(&self) -> Result<(), CoreError> {
        if self.shutdown_countdown_secs == 0 {
            return Err(CoreError::Config(
                "shutdown_countdown_secs는 1 이상이어야 합니다".to_string(),
            ));
        }
        Ok(())
    }

    /// 유휴 임계값을 Duration으로 반환
    pub fn idle_threshold(&self) -> Duration {
        Duration::from_secs(self.idle_threshold_secs)
    }
}

// ============================================================
// 시스템 종료 / UI 설정
// ============================================================

/// 시스템 종료 동작 설정
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShutdownConfig {
    /// 실제 종료 대신 로그만 남김
    #[serde(default)]
    pub dry_run: bool,
    /// Unix 계열에서 `sudo`를 붙여 실행
    #[serde(default = "default_true")]
    pub use_sudo: bool,
}

impl Default for ShutdownConfig {
    fn default() -> Self {
        Self {
            dry_run: false,
            use_sudo: true,
        }
    }
}

/// UI 설정
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UiConfig {
    /// 데스크톱 알림 사용
    #[serde(default = "default_true")]
    pub desktop_notifications: bool,
    /// 최신 프레임 미리보기 저장 경로 (None이면 저장 안 함)
    #[serde(default)]
    pub preview_path: Option<PathBuf>,
    /// 미리보기 저장 주기 (프레임 수)
    #[serde(default = "default_preview_every_frames")]
    pub preview_every_frames: u64,
    /// 미리보기 최대 너비
    #[serde(default = "default_preview_max_width")]
    pub preview_max_width: u32,
    /// 미리보기 최대 높이
    #[serde(default = "default_preview_max_height")]
    pub preview_max_height: u32,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            desktop_notifications: true,
            preview_path: None,
            preview_every_frames: default_preview_every_frames(),
            preview_max_width: default_preview_max_width(),
            preview_max_height: default_preview_max_height(),
        }
    }
}

// ============================================================
// AppConfig impl
// ============================================================

impl AppConfig {
    /// 기본 설정값 반환
    pub fn default_config() -> Self {
        Self {
            camera: CameraConfig::default(),
            detector: DetectorConfig::default(),
            idle: IdleConfig::default(),
            shutdown: ShutdownConfig::default(),
            ui: UiConfig::default(),
        }
    }

    /// 전체 유효성 검증
    pub fn validate(&self) -> Result<(), CoreError> {
        self.idle.validate()?;
        if self.detector.scale_factor <= 1.0 {
            return Err(CoreError::Config(format!(
                "scale_factor는 1.0보다 커야 합니다: {}",
                self.detector.scale_factor
            )));
        }
        Ok(())
    }

    /// 이미지 시퀀스 재생 간격을 Duration으로 반환
    pub fn frame_interval(&self) -> Duration {
        Duration::from_millis(self.camera.frame_interval_ms)
    }
}

// ============================================================
// 기본값 함수
// ============================================================

fn default_true() -> bool {
    true
}
fn default_frame_interval_ms() -> u64 {
    33
}
fn default_cascade_dir() -> PathBuf {
    PathBuf::from("haar")
}
fn default_model_path() -> PathBuf {
    PathBuf::from("model/seeta_fd_frontal_v1.0.bin")
}
fn default_scale_factor() -> f64 {
    1.3
}
fn default_min_neighbors() -> i32 {
    5
}
fn default_min_face_size() -> u32 {
    40
}
fn default_idle_threshold_secs() -> u64 {
    10
}
fn default_shutdown_countdown_secs() -> u32 {
    30
}
fn default_preview_every_frames() -> u64 {
    15
}
fn default_preview_max_width() -> u32 {
    800
}
fn default_preview_max_height() -> u32 {
    600
}
