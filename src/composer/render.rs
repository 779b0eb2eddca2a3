//! Layer rendering: decode-independent raster transforms.
//!
//! Turns a `CanvasPlan` entry plus its source raster into the raster the
//! compositor will stack. The alpha channel is preserved through every
//! transform so opacity and transparent rotation corners composite
//! correctly regardless of the final output format.
//!
//! Resize goes through fast_image_resize (Lanczos3 convolution); rotation
//! is an inverse-mapped bilinear resample that fills everything outside
//! the original bounds with full transparency.

use fast_image_resize::{FilterType, Image, PixelType, ResizeAlg, Resizer};
use image::{imageops, Rgba, RgbaImage};
use std::num::NonZeroU32;

use super::error::ComposeError;
use super::plan::{rotated_bounds, Dimensions, LogoPlan, SubjectPlan, WatermarkPlan};
use super::saliency;

/// Render the subject layer: cover-scale, then crop back to the target
/// rect at the saliency-selected anchor.
pub fn render_subject(src: &RgbaImage, plan: &SubjectPlan) -> Result<RgbaImage, ComposeError> {
    let scaled = resize_rgba(src, plan.scaled)?;

    if plan.scaled == plan.target {
        return Ok(scaled);
    }

    let (x, y) = saliency::crop_anchor(&scaled, plan.target.width, plan.target.height);
    Ok(imageops::crop_imm(&scaled, x, y, plan.target.width, plan.target.height).to_image())
}

/// Render the watermark layer: inside-fit resize, then rotation in
/// diagonal mode. Opacity is not baked in here; the compositor applies it
/// at blend time.
pub fn render_watermark(src: &RgbaImage, plan: &WatermarkPlan) -> Result<RgbaImage, ComposeError> {
    let resized = resize_rgba(src, plan.resized)?;

    match plan.rotation {
        Some(degrees) => Ok(rotate_about_center(&resized, degrees)),
        None => Ok(resized),
    }
}

/// Render the sheet layout's secondary logo.
pub fn render_logo(src: &RgbaImage, plan: &LogoPlan) -> Result<RgbaImage, ComposeError> {
    resize_rgba(src, plan.resized)
}

/// Resize an RGBA raster with Lanczos3 convolution, preserving alpha.
pub fn resize_rgba(src: &RgbaImage, target: Dimensions) -> Result<RgbaImage, ComposeError> {
    if src.width() == target.width && src.height() == target.height {
        return Ok(src.clone());
    }

    let src_width = NonZeroU32::new(src.width())
        .ok_or_else(|| ComposeError::render_failed("source width is 0"))?;
    let src_height = NonZeroU32::new(src.height())
        .ok_or_else(|| ComposeError::render_failed("source height is 0"))?;
    let dst_width = NonZeroU32::new(target.width)
        .ok_or_else(|| ComposeError::render_failed("target width is 0"))?;
    let dst_height = NonZeroU32::new(target.height)
        .ok_or_else(|| ComposeError::render_failed("target height is 0"))?;

    let src_image = Image::from_vec_u8(
        src_width,
        src_height,
        src.as_raw().clone(),
        PixelType::U8x4,
    )
    .map_err(|e| ComposeError::render_failed(format!("failed to create source image: {:?}", e)))?;

    let mut dst_image = Image::new(dst_width, dst_height, PixelType::U8x4);

    let mut resizer = Resizer::new(ResizeAlg::Convolution(FilterType::Lanczos3));

    resizer
        .resize(&src_image.view(), &mut dst_image.view_mut())
        .map_err(|e| ComposeError::render_failed(format!("resize operation failed: {:?}", e)))?;

    RgbaImage::from_raw(target.width, target.height, dst_image.into_vec())
        .ok_or_else(|| ComposeError::render_failed("failed to create output image buffer"))
}

/// Rotate about the center by an arbitrary angle. The output raster is
/// the expanded bounding box from the planner; pixels outside the source
/// map to full transparency.
pub fn rotate_about_center(src: &RgbaImage, degrees: f32) -> RgbaImage {
    let bounds = rotated_bounds(Dimensions::new(src.width(), src.height()), degrees);
    let radians = (degrees as f64).to_radians();
    let (sin, cos) = radians.sin_cos();

    let dst_cx = bounds.width as f64 / 2.0;
    let dst_cy = bounds.height as f64 / 2.0;
    let src_cx = src.width() as f64 / 2.0;
    let src_cy = src.height() as f64 / 2.0;

    let mut out = RgbaImage::from_pixel(bounds.width, bounds.height, Rgba([0, 0, 0, 0]));

    for dy in 0..bounds.height {
        for dx in 0..bounds.width {
            // Inverse-rotate the destination pixel center into source space
            let rx = dx as f64 + 0.5 - dst_cx;
            let ry = dy as f64 + 0.5 - dst_cy;
            let sx = rx * cos + ry * sin + src_cx - 0.5;
            let sy = -rx * sin + ry * cos + src_cy - 0.5;

            let pixel = bilinear_sample(src, sx, sy);
            if pixel[3] > 0 {
                out.put_pixel(dx, dy, pixel);
            }
        }
    }

    out
}

/// Bilinear sample with transparent contributions outside the raster.
///
/// Accumulates premultiplied by alpha so transparent neighbors do not
/// darken edge pixels; this is what anti-aliases rotated edges.
fn bilinear_sample(src: &RgbaImage, x: f64, y: f64) -> Rgba<u8> {
    let w = src.width() as i64;
    let h = src.height() as i64;

    let x0 = x.floor() as i64;
    let y0 = y.floor() as i64;
    let fx = x - x0 as f64;
    let fy = y - y0 as f64;

    let mut acc = [0.0f64; 4];
    for (ix, iy, weight) in [
        (x0, y0, (1.0 - fx) * (1.0 - fy)),
        (x0 + 1, y0, fx * (1.0 - fy)),
        (x0, y0 + 1, (1.0 - fx) * fy),
        (x0 + 1, y0 + 1, fx * fy),
    ] {
        if ix < 0 || iy < 0 || ix >= w || iy >= h {
            continue;
        }
        let p = src.get_pixel(ix as u32, iy as u32);
        let alpha = p[3] as f64 / 255.0;
        acc[3] += weight * alpha;
        acc[0] += weight * alpha * p[0] as f64;
        acc[1] += weight * alpha * p[1] as f64;
        acc[2] += weight * alpha * p[2] as f64;
    }

    if acc[3] <= f64::EPSILON {
        return Rgba([0, 0, 0, 0]);
    }

    Rgba([
        (acc[0] / acc[3]).round().clamp(0.0, 255.0) as u8,
        (acc[1] / acc[3]).round().clamp(0.0, 255.0) as u8,
        (acc[2] / acc[3]).round().clamp(0.0, 255.0) as u8,
        (acc[3] * 255.0).round().clamp(0.0, 255.0) as u8,
    ])
}
