//! 얼굴 특징 검출 모델.
//!
//! 검출기가 반환하는 영역과 상태 머신으로 전달되는 검출 이벤트.

use serde::{Deserialize, Serialize};
use std::time::Instant;

/// 검출 대상 특징 종류
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FeatureKind {
    /// 얼굴
    Face,
    /// 눈
    Eye,
    /// 코
    Nose,
    /// 입
    Mouth,
}

impl FeatureKind {
    /// 주석 사각형 색상 (RGB)
    pub fn color(self) -> [u8; 3] {
        match self {
            FeatureKind::Face => [0, 0, 255],
            FeatureKind::Eye => [0, 255, 0],
            FeatureKind::Nose => [255, 0, 0],
            FeatureKind::Mouth => [255, 0, 255],
        }
    }
}

/// 프레임 좌표계의 검출 영역
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Region {
    /// 특징 종류
    pub kind: FeatureKind,
    /// 좌상단 X
    pub x: u32,
    /// 좌상단 Y
    pub y: u32,
    /// 너비
    pub width: u32,
    /// 높이
    pub height: u32,
}

impl Region {
    /// 새 영역 생성
    pub fn new(kind: FeatureKind, x: u32, y: u32, width: u32, height: u32) -> Self {
        Self {
            kind,
            x,
            y,
            width,
            height,
        }
    }

    /// 얼굴 ROI 내부 좌표를 프레임 좌표로 변환
    pub fn offset_by(mut self, parent: &Region) -> Self {
        self.x += parent.x;
        self.y += parent.y;
        self
    }
}

/// 한 프레임에 대한 검출 결과
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Detection {
    /// 검출된 영역 목록 (얼굴 → 하위 특징 순)
    pub regions: Vec<Region>,
}

impl Detection {
    /// 빈 검출 결과
    pub fn empty() -> Self {
        Self::default()
    }

    /// 특징이 하나라도 검출되었는지
    pub fn feature_present(&self) -> bool {
        !self.regions.is_empty()
    }

    /// 특정 종류 영역 개수
    pub fn count(&self, kind: FeatureKind) -> usize {
        self.regions.iter().filter(|r| r.kind == kind).count()
    }
}

/// 검출 모드
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum DetectionMode {
    /// 검출 중지
    #[default]
    Off,
    /// 검출 중
    On,
}

impl DetectionMode {
    /// 검출 활성 여부
    pub fn is_on(self) -> bool {
        self == DetectionMode::On
    }
}

/// 프레임 처리 1회의 결과 (검출 모드 On일 때만 생성)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DetectionEvent {
    /// 처리 시각 (단조 시계)
    pub at: Instant,
    /// 특징 존재 여부
    pub feature_present: bool,
    /// 프레임 번호
    pub frame_index: u64,
    /// 검출된 얼굴 수
    pub face_count: usize,
}

impl DetectionEvent {
    /// 검출 결과로부터 이벤트 생성
    pub fn from_detection(at: Instant, frame_index: u64, detection: &Detection) -> Self {
        Self {
            at,
            feature_present: detection.feature_present(),
            frame_index,
            face_count: detection.count(FeatureKind::Face),
        }
    }
}
