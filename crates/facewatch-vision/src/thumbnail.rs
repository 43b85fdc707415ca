//! 미리보기용 축소.
//!
//! fast_image_resize 기반. 종횡비를 유지하며 최대 크기 안으로 줄이기만 한다.

use facewatch_core::error::CoreError;
use fast_image_resize::{images::Image as FirImage, PixelType, ResizeAlg, ResizeOptions, Resizer};
use image::RgbImage;
use tracing::debug;

/// 최대 크기 안에 맞춘 목표 크기 계산 (확대 없음)
pub fn fit_dimensions(src_w: u32, src_h: u32, max_w: u32, max_h: u32) -> (u32, u32) {
    if src_w <= max_w && src_h <= max_h {
        return (src_w, src_h);
    }
    let scale = f64::min(
        f64::from(max_w) / f64::from(src_w),
        f64::from(max_h) / f64::from(src_h),
    );
    let w = ((f64::from(src_w) * scale).round() as u32).max(1);
    let h = ((f64::from(src_h) * scale).round() as u32).max(1);
    (w, h)
}

/// 최대 크기 안으로 축소. 이미 작으면 복제 반환.
pub fn fit_within(image: &RgbImage, max_w: u32, max_h: u32) -> Result<RgbImage, CoreError> {
    let (src_w, src_h) = image.dimensions();
    if src_w == 0 || src_h == 0 {
        return Err(CoreError::Internal("소스 이미지 크기 0".to_string()));
    }
    if max_w == 0 || max_h == 0 {
        return Err(CoreError::Internal("목표 이미지 크기 0".to_string()));
    }

    let (width, height) = fit_dimensions(src_w, src_h, max_w, max_h);
    if (width, height) == (src_w, src_h) {
        return Ok(image.clone());
    }

    let src_image = FirImage::from_vec_u8(src_w, src_h, image.as_raw().clone(), PixelType::U8x3)
        .map_err(|e| CoreError::Internal(format!("소스 이미지 생성 실패: {e}")))?;
    let mut dst_image = FirImage::new(width, height, PixelType::U8x3);

    let mut resizer = Resizer::new();
    let options = ResizeOptions::new().resize_alg(ResizeAlg::Convolution(
        fast_image_resize::FilterType::Bilinear,
    ));
    resizer
        .resize(&src_image, &mut dst_image, &options)
        .map_err(|e| CoreError::Internal(format!("리사이즈 실패: {e}")))?;

    debug!("미리보기 축소: {src_w}x{src_h} → {width}x{height}");

    RgbImage::from_raw(width, height, dst_image.into_vec())
        .ok_or_else(|| CoreError::Internal("결과 이미지 생성 실패".to_string()))
}
