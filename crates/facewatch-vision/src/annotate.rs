//! 검출 영역 주석.
//!
//! 특징 종류별 색상으로 테두리 사각형을 그린다 (얼굴 파랑, 눈 초록, 코 빨강, 입 자홍).

use facewatch_core::models::detection::Region;
use image::{Rgb, RgbImage};

/// 테두리 두께 (픽셀)
pub const BORDER_THICKNESS: u32 = 2;

/// 모든 영역을 이미지에 그린다
pub fn draw_regions(image: &mut RgbImage, regions: &[Region]) {
    for region in regions {
        draw_rect(image, region, Rgb(region.kind.color()), BORDER_THICKNESS);
    }
}

/// 테두리 사각형 하나 그리기. 이미지 밖으로 나가는 부분은 잘린다.
pub fn draw_rect(image: &mut RgbImage, region: &Region, color: Rgb<u8>, thickness: u32) {
    let (img_w, img_h) = image.dimensions();
    if region.width == 0 || region.height == 0 || region.x >= img_w || region.y >= img_h {
        return;
    }

    let x0 = region.x;
    let y0 = region.y;
    let x1 = (region.x + region.width - 1).min(img_w - 1);
    let y1 = (region.y + region.height - 1).min(img_h - 1);

    for t in 0..thickness {
        // 가로선
        for x in x0..=x1 {
            if y0 + t <= y1 {
                image.put_pixel(x, y0 + t, color);
            }
            if y1 >= y0 + t {
                image.put_pixel(x, y1 - t, color);
            }
        }
        // 세로선
        for y in y0..=y1 {
            if x0 + t <= x1 {
                image.put_pixel(x0 + t, y, color);
            }
            if x1 >= x0 + t {
                image.put_pixel(x1 - t, y, color);
            }
        }
    }
}
