//! Attention-based crop anchoring for cover fit.
//!
//! Cover fit scales the subject past its target region and crops the
//! excess. Rather than always cropping from the center, the crop window is
//! anchored toward the most visually salient region: a coarse
//! gradient-energy map of the scaled raster is scanned with an
//! integral-image window sum and the window with the highest energy wins.
//! Ties resolve toward the centered window, so featureless images crop
//! exactly like a plain center crop.
//!
//! The scan is deterministic, so identical inputs keep producing
//! byte-identical compositions.

use image::RgbaImage;

/// Longest edge of the downsampled energy grid.
const GRID_EDGE: u32 = 96;

/// Select the top-left crop offset for a `crop_w` x `crop_h` window inside
/// the scaled raster. Returns (0, 0) when there is nothing to crop.
pub fn crop_anchor(scaled: &RgbaImage, crop_w: u32, crop_h: u32) -> (u32, u32) {
    let (w, h) = (scaled.width(), scaled.height());
    let max_x = w.saturating_sub(crop_w);
    let max_y = h.saturating_sub(crop_h);
    if max_x == 0 && max_y == 0 {
        return (0, 0);
    }

    let step = ((w.max(h) + GRID_EDGE - 1) / GRID_EDGE).max(1);
    let grid_w = ((w + step - 1) / step) as usize;
    let grid_h = ((h + step - 1) / step) as usize;

    let luma = sample_luma_grid(scaled, step, grid_w, grid_h);
    let integral = energy_integral(&luma, grid_w, grid_h);

    // Window size in grid cells, clamped into the grid
    let win_w = ((crop_w + step / 2) / step).clamp(1, grid_w as u32) as usize;
    let win_h = ((crop_h + step / 2) / step).clamp(1, grid_h as u32) as usize;

    let window_sum = |gx: usize, gy: usize| -> f64 {
        let (x1, y1) = (gx + win_w, gy + win_h);
        integral[y1 * (grid_w + 1) + x1] + integral[gy * (grid_w + 1) + gx]
            - integral[gy * (grid_w + 1) + x1]
            - integral[y1 * (grid_w + 1) + gx]
    };

    // Start from the centered window; only a strictly better window moves
    // the anchor, which keeps the center-crop behavior for flat images.
    let center_gx = (grid_w - win_w) / 2;
    let center_gy = (grid_h - win_h) / 2;
    let mut best = (center_gx, center_gy);
    let mut best_energy = window_sum(center_gx, center_gy);

    for gy in 0..=(grid_h - win_h) {
        for gx in 0..=(grid_w - win_w) {
            let energy = window_sum(gx, gy);
            if energy > best_energy {
                best_energy = energy;
                best = (gx, gy);
            }
        }
    }

    (
        (best.0 as u32 * step).min(max_x),
        (best.1 as u32 * step).min(max_y),
    )
}

/// Point-sample the raster into a coarse luma grid.
fn sample_luma_grid(image: &RgbaImage, step: u32, grid_w: usize, grid_h: usize) -> Vec<f32> {
    let mut luma = Vec::with_capacity(grid_w * grid_h);
    for gy in 0..grid_h {
        for gx in 0..grid_w {
            let x = (gx as u32 * step).min(image.width() - 1);
            let y = (gy as u32 * step).min(image.height() - 1);
            let p = image.get_pixel(x, y);
            // Rec. 601 luma, alpha-weighted so transparent areas carry no
            // attention
            let l = 0.299 * p[0] as f32 + 0.587 * p[1] as f32 + 0.114 * p[2] as f32;
            luma.push(l * (p[3] as f32 / 255.0));
        }
    }
    luma
}

/// Integral image over forward-difference gradient magnitude.
fn energy_integral(luma: &[f32], grid_w: usize, grid_h: usize) -> Vec<f64> {
    let energy_at = |x: usize, y: usize| -> f64 {
        let here = luma[y * grid_w + x];
        let dx = if x + 1 < grid_w {
            (luma[y * grid_w + x + 1] - here).abs()
        } else {
            0.0
        };
        let dy = if y + 1 < grid_h {
            (luma[(y + 1) * grid_w + x] - here).abs()
        } else {
            0.0
        };
        (dx + dy) as f64
    };

    let stride = grid_w + 1;
    let mut integral = vec![0.0f64; stride * (grid_h + 1)];
    for y in 0..grid_h {
        let mut row = 0.0f64;
        for x in 0..grid_w {
            row += energy_at(x, y);
            integral[(y + 1) * stride + x + 1] = integral[y * stride + x + 1] + row;
        }
    }
    integral
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    fn flat(width: u32, height: u32) -> RgbaImage {
        RgbaImage::from_pixel(width, height, Rgba([120, 120, 120, 255]))
    }

    #[test]
    fn test_no_crop_needed() {
        let img = flat(800, 800);
        assert_eq!(crop_anchor(&img, 800, 800), (0, 0));
    }

    #[test]
    fn test_flat_image_crops_near_center() {
        let img = flat(1600, 800);
        let (x, y) = crop_anchor(&img, 800, 800);
        assert_eq!(y, 0);
        // Centered within grid resolution
        assert!((x as i64 - 400).unsigned_abs() <= 34, "x = {}", x);
    }

    #[test]
    fn test_detail_pulls_anchor_left() {
        let mut img = flat(1600, 800);
        // High-frequency checkerboard in the left quarter
        for y in 0..800 {
            for x in 0..400 {
                let v = if (x / 8 + y / 8) % 2 == 0 { 255 } else { 0 };
                img.put_pixel(x, y, Rgba([v, v, v, 255]));
            }
        }
        let (x, _) = crop_anchor(&img, 800, 800);
        assert!(x < 200, "x = {}", x);
    }

    #[test]
    fn test_detail_pulls_anchor_down() {
        let mut img = flat(800, 1600);
        for y in 1200..1600 {
            for x in 0..800 {
                let v = if (x / 8 + y / 8) % 2 == 0 { 255 } else { 0 };
                img.put_pixel(x, y, Rgba([v, v, v, 255]));
            }
        }
        let (_, y) = crop_anchor(&img, 800, 800);
        assert!(y > 600, "y = {}", y);
    }

    #[test]
    fn test_anchor_is_deterministic() {
        let mut img = flat(1200, 700);
        for y in 0..700 {
            for x in 500..700 {
                img.put_pixel(x, y, Rgba([(x % 256) as u8, 0, 255, 255]));
            }
        }
        assert_eq!(crop_anchor(&img, 700, 700), crop_anchor(&img, 700, 700));
    }

    #[test]
    fn test_anchor_stays_in_bounds() {
        let mut img = flat(900, 810);
        for x in 850..900 {
            for y in 0..810 {
                img.put_pixel(x, y, Rgba([255, 255, 255, 255]));
            }
        }
        let (x, y) = crop_anchor(&img, 800, 800);
        assert!(x <= 100);
        assert!(y <= 10);
    }
}
