//! OpenCV 카메라 캡처.

use facewatch_core::error::CoreError;
use facewatch_core::models::frame::Frame;
use facewatch_core::ports::camera::{FrameSource, FrameStream};
use image::RgbImage;
use opencv::core::{self, Mat};
use opencv::prelude::*;
use opencv::{imgproc, videoio};
use tracing::{debug, info, warn};

/// OpenCV `VideoCapture` 기반 카메라
pub struct OpenCvCamera {
    device_index: i32,
}

impl OpenCvCamera {
    pub fn new(device_index: i32) -> Self {
        Self { device_index }
    }
}

impl FrameSource for OpenCvCamera {
    fn open(&self) -> Result<Box<dyn FrameStream>, CoreError> {
        let capture = videoio::VideoCapture::new(self.device_index, videoio::CAP_ANY)
            .map_err(|e| device_error(self.device_index, e))?;
        let opened = capture
            .is_opened()
            .map_err(|e| device_error(self.device_index, e))?;
        if !opened {
            return Err(CoreError::DeviceUnavailable(format!(
                "카메라 #{}를 열 수 없습니다",
                self.device_index
            )));
        }

        info!("카메라 #{} 열림", self.device_index);
        Ok(Box::new(OpenCvStream {
            capture: Some(capture),
            next_index: 0,
        }))
    }

    fn describe(&self) -> String {
        format!("카메라 #{}", self.device_index)
    }
}

fn device_error(device_index: i32, e: opencv::Error) -> CoreError {
    CoreError::DeviceUnavailable(format!("카메라 #{device_index}: {e}"))
}

/// 열린 카메라 스트림
struct OpenCvStream {
    /// 해제 후 None
    capture: Option<videoio::VideoCapture>,
    next_index: u64,
}

impl OpenCvStream {
    fn to_rgb(mat: &Mat) -> Result<RgbImage, opencv::Error> {
        let mut rgb = Mat::default();
        imgproc::cvt_color(
            mat,
            &mut rgb,
            imgproc::COLOR_BGR2RGB,
            0,
            core::AlgorithmHint::ALGO_HINT_DEFAULT,
        )?;
        let width = rgb.cols() as u32;
        let height = rgb.rows() as u32;
        let data = rgb.data_bytes()?.to_vec();
        RgbImage::from_raw(width, height, data).ok_or_else(|| {
            opencv::Error::new(core::StsBadSize, "프레임 버퍼 크기 불일치".to_string())
        })
    }
}

impl FrameStream for OpenCvStream {
    fn read_frame(&mut self) -> Result<Frame, CoreError> {
        let capture = self.capture.as_mut().ok_or(CoreError::StreamEnded)?;

        let mut mat = Mat::default();
        let ok = capture.read(&mut mat).map_err(|e| {
            warn!("프레임 읽기 실패: {e}");
            CoreError::StreamEnded
        })?;
        if !ok || mat.empty() {
            return Err(CoreError::StreamEnded);
        }

        let image = Self::to_rgb(&mat).map_err(|e| {
            warn!("프레임 변환 실패: {e}");
            CoreError::StreamEnded
        })?;

        let frame = Frame::new(self.next_index, image);
        self.next_index += 1;
        Ok(frame)
    }

    fn release(&mut self) {
        if let Some(mut capture) = self.capture.take() {
            if let Err(e) = capture.release() {
                warn!("카메라 해제 실패: {e}");
            } else {
                debug!("카메라 해제");
            }
        }
    }
}

impl Drop for OpenCvStream {
    fn drop(&mut self) {
        self.release();
    }
}
