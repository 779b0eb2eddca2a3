//! Layer compositing for the product-sheet canvas.
//!
//! Stacks rendered layers in plan order onto an opaque white canvas using
//! alpha blending. Opacity is applied at composite time, not baked into
//! the layer raster, and layers are clipped at canvas bounds.

use image::{Rgba, RgbaImage};

use super::plan::{Dimensions, PlacementPosition};

/// Background color of the canvas (opaque white).
pub const CANVAS_BACKGROUND: Rgba<u8> = Rgba([255, 255, 255, 255]);

/// A rendered layer ready for compositing.
#[derive(Clone)]
pub struct Layer {
    /// The rendered raster (RGBA).
    pub image: RgbaImage,
    /// Top-left placement on the canvas.
    pub position: PlacementPosition,
    /// Opacity to apply (0.0 to 1.0), on top of the raster's alpha channel.
    pub opacity: f32,
}

impl std::fmt::Debug for Layer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Layer")
            .field("dimensions", &(self.image.width(), self.image.height()))
            .field("position", &self.position)
            .field("opacity", &self.opacity)
            .finish()
    }
}

impl Layer {
    pub fn new(image: RgbaImage, position: PlacementPosition, opacity: f32) -> Self {
        Self {
            image,
            position,
            opacity,
        }
    }
}

/// Flatten an ordered layer stack onto an opaque white canvas.
///
/// The result always has exactly the requested canvas dimensions and no
/// residual transparency: the background is opaque and blending preserves
/// full alpha.
pub fn flatten(canvas: Dimensions, layers: &[Layer]) -> RgbaImage {
    let mut target = RgbaImage::from_pixel(canvas.width, canvas.height, CANVAS_BACKGROUND);
    for layer in layers {
        blend_layer(&mut target, layer);
    }
    target
}

/// Blend a single layer onto the target image, clipping at target bounds.
fn blend_layer(target: &mut RgbaImage, layer: &Layer) {
    let target_width = target.width() as i32;
    let target_height = target.height() as i32;

    let layer_width = layer.image.width() as i32;
    let layer_height = layer.image.height() as i32;

    // Visible region, clamped to target bounds
    let x_start = layer.position.x.max(0);
    let y_start = layer.position.y.max(0);
    let x_end = (layer.position.x + layer_width).min(target_width);
    let y_end = (layer.position.y + layer_height).min(target_height);

    for ty in y_start..y_end {
        for tx in x_start..x_end {
            let lx = (tx - layer.position.x) as u32;
            let ly = (ty - layer.position.y) as u32;

            let layer_pixel = layer.image.get_pixel(lx, ly);
            let target_pixel = target.get_pixel(tx as u32, ty as u32);

            let blended = blend_pixels(*target_pixel, *layer_pixel, layer.opacity);
            target.put_pixel(tx as u32, ty as u32, blended);
        }
    }
}

/// Blend two pixels using alpha compositing with additional opacity.
///
/// Uses the "over" operator: result = foreground + background * (1 - foreground.alpha)
fn blend_pixels(background: Rgba<u8>, foreground: Rgba<u8>, opacity: f32) -> Rgba<u8> {
    // Apply additional opacity to foreground alpha
    let fg_alpha = (foreground[3] as f32 / 255.0) * opacity.clamp(0.0, 1.0);
    let bg_alpha = background[3] as f32 / 255.0;

    // Porter-Duff "over" operator
    let out_alpha = fg_alpha + bg_alpha * (1.0 - fg_alpha);

    if out_alpha < 0.001 {
        return Rgba([0, 0, 0, 0]);
    }

    let blend_channel = |fg: u8, bg: u8| -> u8 {
        let fg_f = fg as f32 / 255.0;
        let bg_f = bg as f32 / 255.0;
        let result = (fg_f * fg_alpha + bg_f * bg_alpha * (1.0 - fg_alpha)) / out_alpha;
        (result * 255.0).clamp(0.0, 255.0) as u8
    };

    Rgba([
        blend_channel(foreground[0], background[0]),
        blend_channel(foreground[1], background[1]),
        blend_channel(foreground[2], background[2]),
        (out_alpha * 255.0) as u8,
    ])
}
