//! Composition parameter parsing
//!
//! Resolves the flat string-keyed field map that arrives from multipart
//! form fields into a fully-populated `CompositionConfig`.
//!
//! Every field has its own pure, total parser: bad or missing input never
//! errors, it falls back to the field's documented default. The planner
//! therefore never sees an invalid value.

use std::collections::HashMap;

use crate::constants::{
    DEFAULT_QUALITY, DEFAULT_WATERMARK_ANGLE, DEFAULT_WATERMARK_OPACITY, DEFAULT_WATERMARK_SCALE,
    MIN_WATERMARK_SCALE,
};

/// Output image format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Jpeg,
    Png,
}

impl OutputFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Jpeg => "jpeg",
            Self::Png => "png",
        }
    }

    pub fn content_type(&self) -> &'static str {
        match self {
            Self::Jpeg => "image/jpeg",
            Self::Png => "image/png",
        }
    }

    pub fn extension(&self) -> &'static str {
        match self {
            Self::Jpeg => "jpg",
            Self::Png => "png",
        }
    }
}

/// Canvas layout for the composition
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Layout {
    /// Vertical product card: 800x800 subject region + logo band
    #[default]
    Sheet,
    /// Full-bleed 1200x1200 photo over a large faded watermark
    Overlay,
}

/// How the watermark is placed on the canvas
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WatermarkMode {
    /// Rotated by the configured angle about its center
    #[default]
    Diagonal,
    /// Centered without rotation
    Center,
}

/// Fully-resolved composition parameters
///
/// Invariant: all numeric fields are clamped/defaulted at parse time.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CompositionConfig {
    pub format: OutputFormat,
    /// JPEG quality (1-100); ignored for PNG output
    pub quality: u8,
    pub layout: Layout,
    pub mode: WatermarkMode,
    /// Watermark opacity in [0, 1]
    pub opacity: f32,
    /// Watermark width as a multiplier of canvas width (>= 0.1)
    pub scale: f32,
    /// Watermark rotation in degrees; only applied in diagonal mode
    pub angle: f32,
}

impl Default for CompositionConfig {
    fn default() -> Self {
        Self {
            format: OutputFormat::Jpeg,
            quality: DEFAULT_QUALITY,
            layout: Layout::Sheet,
            mode: WatermarkMode::Diagonal,
            opacity: DEFAULT_WATERMARK_OPACITY,
            scale: DEFAULT_WATERMARK_SCALE,
            angle: DEFAULT_WATERMARK_ANGLE,
        }
    }
}

impl CompositionConfig {
    /// Resolve a raw field map into a valid config.
    ///
    /// Recognized keys: `format`, `quality`, `layout`, `mode`, `opacity`,
    /// `scale`, `angle`. Unknown keys are ignored.
    pub fn resolve(fields: &HashMap<String, String>) -> Self {
        let get = |key: &str| fields.get(key).map(String::as_str);

        Self {
            format: parse_format(get("format")),
            quality: parse_quality(get("quality")),
            layout: parse_layout(get("layout")),
            mode: parse_mode(get("mode")),
            opacity: parse_opacity(get("opacity")),
            scale: parse_scale(get("scale")),
            angle: parse_angle(get("angle")),
        }
    }
}

/// Fallback rule: only `"png"` selects PNG; anything else (including
/// unsupported formats like `webp`) maps to JPEG.
pub fn parse_format(value: Option<&str>) -> OutputFormat {
    match value.map(str::trim) {
        Some(v) if v.eq_ignore_ascii_case("png") => OutputFormat::Png,
        _ => OutputFormat::Jpeg,
    }
}

/// Fallback rule: unparseable or missing → 90. Parsed values saturate
/// into [1, 100].
pub fn parse_quality(value: Option<&str>) -> u8 {
    value
        .and_then(|v| v.trim().parse::<i64>().ok())
        .map(|q| q.clamp(1, 100) as u8)
        .unwrap_or(DEFAULT_QUALITY)
}

/// Fallback rule: only `"overlay"` selects the overlay layout; any other
/// value means "use default" (sheet), not an error.
pub fn parse_layout(value: Option<&str>) -> Layout {
    match value.map(str::trim) {
        Some(v) if v.eq_ignore_ascii_case("overlay") => Layout::Overlay,
        _ => Layout::Sheet,
    }
}

/// Fallback rule: only `"center"` selects center mode; any other value
/// falls back to diagonal.
pub fn parse_mode(value: Option<&str>) -> WatermarkMode {
    match value.map(str::trim) {
        Some(v) if v.eq_ignore_ascii_case("center") => WatermarkMode::Center,
        _ => WatermarkMode::Diagonal,
    }
}

/// Fallback rule: unparseable, missing, or non-finite → 0.30. Parsed
/// values are clamped into [0, 1].
pub fn parse_opacity(value: Option<&str>) -> f32 {
    value
        .and_then(|v| v.trim().parse::<f32>().ok())
        .filter(|o| o.is_finite())
        .map(|o| o.clamp(0.0, 1.0))
        .unwrap_or(DEFAULT_WATERMARK_OPACITY)
}

/// Fallback rule: unparseable, missing, or non-finite → 2.5. Parsed
/// values are floored at 0.1.
pub fn parse_scale(value: Option<&str>) -> f32 {
    value
        .and_then(|v| v.trim().parse::<f32>().ok())
        .filter(|s| s.is_finite())
        .map(|s| s.max(MIN_WATERMARK_SCALE))
        .unwrap_or(DEFAULT_WATERMARK_SCALE)
}

/// Fallback rule: unparseable, missing, or non-finite → 45. No range
/// restriction; any finite angle is accepted.
pub fn parse_angle(value: Option<&str>) -> f32 {
    value
        .and_then(|v| v.trim().parse::<f32>().ok())
        .filter(|a| a.is_finite())
        .unwrap_or(DEFAULT_WATERMARK_ANGLE)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(None, OutputFormat::Jpeg)]
    #[case(Some("png"), OutputFormat::Png)]
    #[case(Some("PNG"), OutputFormat::Png)]
    #[case(Some("jpeg"), OutputFormat::Jpeg)]
    #[case(Some("webp"), OutputFormat::Jpeg)]
    #[case(Some("garbage"), OutputFormat::Jpeg)]
    fn test_parse_format(#[case] input: Option<&str>, #[case] expected: OutputFormat) {
        assert_eq!(parse_format(input), expected);
    }

    #[rstest]
    #[case(None, 90)]
    #[case(Some("75"), 75)]
    #[case(Some("0"), 1)]
    #[case(Some("150"), 100)]
    #[case(Some("-3"), 1)]
    #[case(Some("abc"), 90)]
    #[case(Some("8.5"), 90)]
    fn test_parse_quality(#[case] input: Option<&str>, #[case] expected: u8) {
        assert_eq!(parse_quality(input), expected);
    }

    #[rstest]
    #[case(None, Layout::Sheet)]
    #[case(Some("sheet"), Layout::Sheet)]
    #[case(Some("overlay"), Layout::Overlay)]
    #[case(Some("Overlay"), Layout::Overlay)]
    #[case(Some("poster"), Layout::Sheet)]
    fn test_parse_layout(#[case] input: Option<&str>, #[case] expected: Layout) {
        assert_eq!(parse_layout(input), expected);
    }

    #[rstest]
    #[case(None, WatermarkMode::Diagonal)]
    #[case(Some("center"), WatermarkMode::Center)]
    #[case(Some("diagonal"), WatermarkMode::Diagonal)]
    #[case(Some("tiled"), WatermarkMode::Diagonal)]
    fn test_parse_mode(#[case] input: Option<&str>, #[case] expected: WatermarkMode) {
        assert_eq!(parse_mode(input), expected);
    }

    #[rstest]
    #[case(None, 0.30)]
    #[case(Some("0.5"), 0.5)]
    #[case(Some("1.5"), 1.0)]
    #[case(Some("-0.2"), 0.0)]
    #[case(Some("NaN"), 0.30)]
    #[case(Some("opaque"), 0.30)]
    fn test_parse_opacity(#[case] input: Option<&str>, #[case] expected: f32) {
        assert_eq!(parse_opacity(input), expected);
    }

    #[rstest]
    #[case(None, 2.5)]
    #[case(Some("1.0"), 1.0)]
    #[case(Some("0.05"), 0.1)]
    #[case(Some("-2"), 0.1)]
    #[case(Some("inf"), 2.5)]
    #[case(Some("big"), 2.5)]
    fn test_parse_scale(#[case] input: Option<&str>, #[case] expected: f32) {
        assert_eq!(parse_scale(input), expected);
    }

    #[rstest]
    #[case(None, 45.0)]
    #[case(Some("30"), 30.0)]
    #[case(Some("-45"), -45.0)]
    #[case(Some("720"), 720.0)]
    #[case(Some("NaN"), 45.0)]
    #[case(Some("steep"), 45.0)]
    fn test_parse_angle(#[case] input: Option<&str>, #[case] expected: f32) {
        assert_eq!(parse_angle(input), expected);
    }

    #[test]
    fn test_resolve_defaults_on_empty_map() {
        let config = CompositionConfig::resolve(&HashMap::new());
        assert_eq!(config, CompositionConfig::default());
    }

    #[test]
    fn test_resolve_full_map() {
        let mut fields = HashMap::new();
        fields.insert("format".to_string(), "png".to_string());
        fields.insert("quality".to_string(), "70".to_string());
        fields.insert("layout".to_string(), "overlay".to_string());
        fields.insert("mode".to_string(), "center".to_string());
        fields.insert("opacity".to_string(), "0.8".to_string());
        fields.insert("scale".to_string(), "1.2".to_string());
        fields.insert("angle".to_string(), "30".to_string());

        let config = CompositionConfig::resolve(&fields);
        assert_eq!(config.format, OutputFormat::Png);
        assert_eq!(config.quality, 70);
        assert_eq!(config.layout, Layout::Overlay);
        assert_eq!(config.mode, WatermarkMode::Center);
        assert_eq!(config.opacity, 0.8);
        assert_eq!(config.scale, 1.2);
        assert_eq!(config.angle, 30.0);
    }

    #[test]
    fn test_resolve_ignores_unknown_keys() {
        let mut fields = HashMap::new();
        fields.insert("sharpen".to_string(), "3".to_string());
        let config = CompositionConfig::resolve(&fields);
        assert_eq!(config, CompositionConfig::default());
    }
}
