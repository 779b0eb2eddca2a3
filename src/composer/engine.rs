//! Composition pipeline entry point.
//!
//! Wires the stages together: validate inputs → decode → resolve config →
//! plan geometry → render layers → composite → encode. The whole pipeline
//! is synchronous and CPU-bound; it touches only per-request buffers, so
//! concurrent calls need no locking. Callers on an async runtime should
//! dispatch through a blocking worker so image work does not starve the
//! accept path.

use bytes::Bytes;
use image::io::Reader as ImageReader;
use image::RgbaImage;
use std::collections::HashMap;
use std::io::Cursor;

use super::compositor::{flatten, Layer};
use super::config::CompositionConfig;
use super::encoder::{EncoderFactory, EncoderQuality};
use super::error::ComposeError;
use super::plan::{self, Dimensions};
use super::render;

/// Result of composing a product sheet
#[derive(Debug)]
pub struct ComposedImage {
    /// The encoded image data
    pub data: Bytes,
    /// Content-Type header value
    pub content_type: &'static str,
    /// Output dimensions (always the planned canvas size)
    pub width: u32,
    pub height: u32,
}

/// Compose a product-sheet image from raw upload buffers and the flat
/// form-field map.
///
/// Inputs are the two encoded-image buffers exactly as uploaded; `None`
/// or an empty buffer fails with a validation error naming the field.
/// Unrecognized or malformed field values fall back to their defaults
/// (see the config module) and are never an error.
pub fn compose(
    subject: Option<&[u8]>,
    watermark: Option<&[u8]>,
    fields: &HashMap<String, String>,
) -> Result<ComposedImage, ComposeError> {
    let subject_bytes = require(subject, "subject")?;
    let watermark_bytes = require(watermark, "watermark")?;

    let config = CompositionConfig::resolve(fields);

    let subject_img = decode_image(subject_bytes, "subject")?;
    let watermark_img = decode_image(watermark_bytes, "watermark")?;

    let canvas_plan = plan::plan(&config, dimensions_of(&subject_img), dimensions_of(&watermark_img));

    tracing::debug!(
        layout = ?config.layout,
        mode = ?config.mode,
        canvas_width = canvas_plan.canvas.width,
        canvas_height = canvas_plan.canvas.height,
        "composition planned"
    );

    // Fixed z-order: watermark below, subject above, logo last
    let mut layers = vec![
        Layer::new(
            render::render_watermark(&watermark_img, &canvas_plan.watermark)?,
            canvas_plan.watermark.position,
            canvas_plan.watermark.opacity,
        ),
        Layer::new(
            render::render_subject(&subject_img, &canvas_plan.subject)?,
            canvas_plan.subject.position,
            1.0,
        ),
    ];
    if let Some(logo_plan) = &canvas_plan.logo {
        layers.push(Layer::new(
            render::render_logo(&watermark_img, logo_plan)?,
            logo_plan.position,
            1.0,
        ));
    }

    let canvas = flatten(canvas_plan.canvas, &layers);

    let encoder = EncoderFactory::create(config.format);
    let encoded = encoder.encode(
        canvas.as_raw(),
        canvas_plan.canvas.width,
        canvas_plan.canvas.height,
        EncoderQuality::with_quality(config.quality),
    )?;

    Ok(ComposedImage {
        data: Bytes::from(encoded.data),
        content_type: encoded.content_type,
        width: canvas_plan.canvas.width,
        height: canvas_plan.canvas.height,
    })
}

fn require<'a>(buffer: Option<&'a [u8]>, field: &'static str) -> Result<&'a [u8], ComposeError> {
    match buffer {
        Some(bytes) if !bytes.is_empty() => Ok(bytes),
        _ => Err(ComposeError::missing_input(field)),
    }
}

/// Decode an upload buffer into an RGBA raster
fn decode_image(data: &[u8], field: &'static str) -> Result<RgbaImage, ComposeError> {
    let decoded = ImageReader::new(Cursor::new(data))
        .with_guessed_format()
        .map_err(|e| ComposeError::decode_failed(field, e.to_string()))?
        .decode()
        .map_err(|e| ComposeError::decode_failed(field, e.to_string()))?;

    Ok(decoded.to_rgba8())
}

fn dimensions_of(image: &RgbaImage) -> Dimensions {
    Dimensions::new(image.width(), image.height())
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{DynamicImage, Rgba};

    fn encoded_png(width: u32, height: u32, color: [u8; 4]) -> Vec<u8> {
        let img = RgbaImage::from_pixel(width, height, Rgba(color));
        let mut buffer = Cursor::new(Vec::new());
        DynamicImage::ImageRgba8(img)
            .write_to(&mut buffer, image::ImageFormat::Png)
            .unwrap();
        buffer.into_inner()
    }

    #[test]
    fn test_compose_defaults_to_sheet_jpeg() {
        let subject = encoded_png(100, 100, [200, 50, 50, 255]);
        let watermark = encoded_png(50, 50, [0, 0, 0, 255]);

        let out = compose(Some(&subject), Some(&watermark), &HashMap::new()).unwrap();
        assert_eq!(out.content_type, "image/jpeg");
        assert_eq!((out.width, out.height), (800, 1000));
        assert_eq!(&out.data[0..2], &[0xFF, 0xD8]);
    }

    #[test]
    fn test_compose_overlay_png() {
        let subject = encoded_png(100, 100, [200, 50, 50, 255]);
        let watermark = encoded_png(50, 50, [0, 0, 0, 255]);

        let mut fields = HashMap::new();
        fields.insert("layout".to_string(), "overlay".to_string());
        fields.insert("format".to_string(), "png".to_string());

        let out = compose(Some(&subject), Some(&watermark), &fields).unwrap();
        assert_eq!(out.content_type, "image/png");
        assert_eq!((out.width, out.height), (1200, 1200));
        assert_eq!(&out.data[0..4], &[0x89, 0x50, 0x4E, 0x47]);
    }

    #[test]
    fn test_missing_watermark_names_field() {
        let subject = encoded_png(100, 100, [200, 50, 50, 255]);
        let err = compose(Some(&subject), None, &HashMap::new()).unwrap_err();
        assert!(matches!(
            err,
            ComposeError::MissingInput { field: "watermark" }
        ));
    }

    #[test]
    fn test_empty_subject_names_field() {
        let watermark = encoded_png(50, 50, [0, 0, 0, 255]);
        let err = compose(Some(&[]), Some(&watermark), &HashMap::new()).unwrap_err();
        assert!(matches!(err, ComposeError::MissingInput { field: "subject" }));
    }

    #[test]
    fn test_undecodable_subject_is_decode_error() {
        let watermark = encoded_png(50, 50, [0, 0, 0, 255]);
        let garbage = vec![0u8, 1, 2, 3, 4, 5];
        let err = compose(Some(&garbage), Some(&watermark), &HashMap::new()).unwrap_err();
        assert!(matches!(err, ComposeError::DecodeFailed { field: "subject", .. }));
        assert_eq!(err.to_http_status(), 400);
    }

    #[test]
    fn test_unsupported_format_falls_back_to_jpeg() {
        let subject = encoded_png(100, 100, [200, 50, 50, 255]);
        let watermark = encoded_png(50, 50, [0, 0, 0, 255]);

        let mut fields = HashMap::new();
        fields.insert("format".to_string(), "webp".to_string());

        let out = compose(Some(&subject), Some(&watermark), &fields).unwrap();
        assert_eq!(out.content_type, "image/jpeg");
    }

    #[test]
    fn test_compose_is_idempotent() {
        let subject = encoded_png(120, 90, [10, 120, 200, 255]);
        let watermark = encoded_png(60, 40, [40, 40, 40, 255]);

        let mut fields = HashMap::new();
        fields.insert("opacity".to_string(), "0.5".to_string());

        let first = compose(Some(&subject), Some(&watermark), &fields).unwrap();
        let second = compose(Some(&subject), Some(&watermark), &fields).unwrap();
        assert_eq!(first.data, second.data);
    }
}
