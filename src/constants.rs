// Constants module - centralized default values for the gateway
//
// This module defines all default values used throughout the codebase.
// Using constants instead of magic numbers improves maintainability
// and makes it easier to understand and modify defaults.

// =============================================================================
// Sheet layout geometry
// =============================================================================

/// Canvas width for the sheet (product card) layout
pub const SHEET_CANVAS_WIDTH: u32 = 800;

/// Canvas height for the sheet layout
pub const SHEET_CANVAS_HEIGHT: u32 = 1000;

/// Height of the subject region at the top of the sheet canvas
pub const SHEET_SUBJECT_HEIGHT: u32 = 800;

/// Fixed width of the secondary logo on the sheet layout
pub const SHEET_LOGO_WIDTH: u32 = 400;

/// Height of the logo band below the subject region
pub const SHEET_LOGO_BAND_HEIGHT: u32 = 200;

// =============================================================================
// Overlay layout geometry
// =============================================================================

/// Canvas edge length for the overlay (full-bleed) layout
pub const OVERLAY_CANVAS_SIZE: u32 = 1200;

// =============================================================================
// Composition defaults
// =============================================================================

/// Default JPEG quality
pub const DEFAULT_QUALITY: u8 = 90;

/// Default watermark opacity
pub const DEFAULT_WATERMARK_OPACITY: f32 = 0.30;

/// Default watermark scale (multiplier of canvas width)
pub const DEFAULT_WATERMARK_SCALE: f32 = 2.5;

/// Minimum accepted watermark scale
pub const MIN_WATERMARK_SCALE: f32 = 0.1;

/// Default watermark rotation in degrees (diagonal mode)
pub const DEFAULT_WATERMARK_ANGLE: f32 = 45.0;

// =============================================================================
// Serving-layer limits
// =============================================================================

/// Maximum accepted request body size (500 MB); enforced by the serving
/// layer before buffers reach the engine
pub const MAX_UPLOAD_SIZE: usize = 500 * 1024 * 1024;
