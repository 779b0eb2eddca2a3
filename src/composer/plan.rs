//! Geometry planning for the composition pipeline.
//!
//! Given a resolved config and the natural sizes of the subject and
//! watermark images, `plan` computes the canvas size and every layer's
//! target size and placement. Planning is deterministic, performs no I/O,
//! and never sees invalid parameter values (the config resolver clamps
//! everything first).
//!
//! Z-order is fixed: the watermark (with configured opacity) is painted
//! first onto the canvas background, the subject above it at full opacity,
//! and the sheet layout's secondary logo last.

use super::config::{CompositionConfig, Layout, WatermarkMode};
use crate::constants::{
    OVERLAY_CANVAS_SIZE, SHEET_CANVAS_HEIGHT, SHEET_CANVAS_WIDTH, SHEET_LOGO_BAND_HEIGHT,
    SHEET_LOGO_WIDTH, SHEET_SUBJECT_HEIGHT,
};

/// Width/height pair in canvas units (pixels).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Dimensions {
    pub width: u32,
    pub height: u32,
}

impl Dimensions {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

/// Top-left placement of a layer on the canvas.
///
/// Coordinates may be negative when a layer is larger than the canvas;
/// the compositor clips at canvas bounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlacementPosition {
    pub x: i32,
    pub y: i32,
}

impl PlacementPosition {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

/// Planned geometry for the subject layer.
///
/// The subject fills `target` with a cover fit: the source is scaled to
/// `scaled` (the smallest size covering the target at the natural aspect
/// ratio) and then cropped back to `target`. The crop anchor is chosen by
/// the renderer from the scaled raster's saliency map.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubjectPlan {
    pub position: PlacementPosition,
    pub target: Dimensions,
    pub scaled: Dimensions,
}

/// Planned geometry for the watermark layer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WatermarkPlan {
    /// Pre-rotation size: width = round(canvasWidth * scale), capped by an
    /// inside fit against the watermark's own natural width.
    pub resized: Dimensions,
    /// Rotation about the center in degrees (diagonal mode only).
    pub rotation: Option<f32>,
    /// Bounding box after rotation (equals `resized` when not rotated).
    pub bounds: Dimensions,
    /// Placement of the bounding box, centered on the canvas.
    pub position: PlacementPosition,
    /// Composite-time opacity in [0, 1].
    pub opacity: f32,
}

/// Planned geometry for the sheet layout's secondary logo.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LogoPlan {
    pub resized: Dimensions,
    pub position: PlacementPosition,
}

/// Complete per-request geometry. Computed fresh per request; never cached.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CanvasPlan {
    pub canvas: Dimensions,
    pub watermark: WatermarkPlan,
    pub subject: SubjectPlan,
    /// Present only for the sheet layout.
    pub logo: Option<LogoPlan>,
}

/// Compute the full canvas plan for one composition request.
pub fn plan(
    config: &CompositionConfig,
    subject_natural: Dimensions,
    watermark_natural: Dimensions,
) -> CanvasPlan {
    let (canvas, subject_target) = match config.layout {
        Layout::Sheet => (
            Dimensions::new(SHEET_CANVAS_WIDTH, SHEET_CANVAS_HEIGHT),
            Dimensions::new(SHEET_CANVAS_WIDTH, SHEET_SUBJECT_HEIGHT),
        ),
        Layout::Overlay => (
            Dimensions::new(OVERLAY_CANVAS_SIZE, OVERLAY_CANVAS_SIZE),
            Dimensions::new(OVERLAY_CANVAS_SIZE, OVERLAY_CANVAS_SIZE),
        ),
    };

    let subject = SubjectPlan {
        position: PlacementPosition::new(0, 0),
        target: subject_target,
        scaled: cover_scaled_size(subject_natural, subject_target),
    };

    let watermark = plan_watermark(config, canvas, watermark_natural);

    let logo = match config.layout {
        Layout::Sheet => Some(plan_logo(watermark_natural)),
        Layout::Overlay => None,
    };

    CanvasPlan {
        canvas,
        watermark,
        subject,
        logo,
    }
}

fn plan_watermark(
    config: &CompositionConfig,
    canvas: Dimensions,
    natural: Dimensions,
) -> WatermarkPlan {
    let resized = inside_fit_for_width(natural, canvas.width, config.scale);

    let (rotation, bounds) = match config.mode {
        WatermarkMode::Diagonal => (
            Some(config.angle),
            rotated_bounds(resized, config.angle),
        ),
        WatermarkMode::Center => (None, resized),
    };

    let position = PlacementPosition::new(
        (canvas.width as i32 - bounds.width as i32) / 2,
        (canvas.height as i32 - bounds.height as i32) / 2,
    );

    WatermarkPlan {
        resized,
        rotation,
        bounds,
        position,
        opacity: config.opacity,
    }
}

fn plan_logo(natural: Dimensions) -> LogoPlan {
    let resized = scale_to_width(natural, SHEET_LOGO_WIDTH);
    // Centered horizontally, centered vertically within the band below
    // the subject region. A logo taller than the band overflows it and is
    // clipped by the compositor at canvas bounds.
    let x = (SHEET_CANVAS_WIDTH as i32 - resized.width as i32) / 2;
    let y = SHEET_SUBJECT_HEIGHT as i32
        + (SHEET_LOGO_BAND_HEIGHT as i32 - resized.height as i32) / 2;

    LogoPlan {
        resized,
        position: PlacementPosition::new(x, y),
    }
}

/// Smallest size that covers `target` while preserving the natural aspect
/// ratio. Both dimensions are at least the target's, so a crop back to the
/// target never pads.
pub fn cover_scaled_size(natural: Dimensions, target: Dimensions) -> Dimensions {
    let scale_w = target.width as f64 / natural.width.max(1) as f64;
    let scale_h = target.height as f64 / natural.height.max(1) as f64;
    let scale = scale_w.max(scale_h);

    Dimensions::new(
        ((natural.width as f64 * scale).round() as u32).max(target.width),
        ((natural.height as f64 * scale).round() as u32).max(target.height),
    )
}

/// Inside fit for a requested width of `canvas_width * scale`: the result
/// preserves aspect ratio and never exceeds the natural width, so the
/// final width may be smaller than requested.
fn inside_fit_for_width(natural: Dimensions, canvas_width: u32, scale: f32) -> Dimensions {
    let requested = (canvas_width as f64 * scale as f64).round() as u32;
    let width = requested.min(natural.width).max(1);
    scale_to_width(natural, width)
}

/// Scale to an exact width, preserving aspect ratio.
fn scale_to_width(natural: Dimensions, width: u32) -> Dimensions {
    let height = (width as f64 * natural.height.max(1) as f64 / natural.width.max(1) as f64)
        .round() as u32;
    Dimensions::new(width.max(1), height.max(1))
}

/// Axis-aligned bounding box of a `size` rectangle rotated by `degrees`
/// about its center. Shared with the renderer so the planned box and the
/// rendered raster always agree.
pub fn rotated_bounds(size: Dimensions, degrees: f32) -> Dimensions {
    let radians = (degrees as f64).to_radians();
    let (sin, cos) = (radians.sin().abs(), radians.cos().abs());
    let w = size.width as f64;
    let h = size.height as f64;

    Dimensions::new(
        ((w * cos + h * sin).round() as u32).max(1),
        ((w * sin + h * cos).round() as u32).max(1),
    )
}
