//! Image composition engine
//!
//! Builds the layered "product sheet" image the gateway returns for
//! image uploads: an opaque white canvas, a faded (optionally rotated)
//! watermark, the subject photo cover-fitted over it, and on the sheet
//! layout a secondary logo band.
//!
//! The pipeline is a short chain of pure stages:
//!
//! 1. config: resolve the raw form-field map into a valid
//!    `CompositionConfig` (permissive defaults, clamping)
//! 2. plan: compute canvas size and every layer's size/placement
//! 3. render: resize/rotate each layer into an RGBA raster
//! 4. compositor + encoder: flatten the stack and encode to jpeg/png
//!
//! Everything is per-request and in-memory; nothing here performs network
//! or disk I/O.

pub mod compositor;
pub mod config;
pub mod encoder;
pub mod engine;
pub mod error;
pub mod plan;
pub mod render;
pub mod saliency;

// Re-export commonly used types
pub use compositor::{flatten, Layer};
pub use config::{CompositionConfig, Layout, OutputFormat, WatermarkMode};
pub use encoder::{EncodedImage, EncoderFactory, EncoderQuality, ImageEncoder};
pub use engine::{compose, ComposedImage};
pub use error::ComposeError;
pub use plan::{plan, CanvasPlan, Dimensions, PlacementPosition};
