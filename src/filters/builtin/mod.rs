//! Built-in filter kernels.
//!
//! This module contains the seven kernels the editor exposes. They
//! approximate the behavior of the matching Core Image filters closely enough
//! for previews; geometry always matches the input image.

mod color;
mod blur;
mod distortion;
mod stylize;

use crate::core::error::KernelError;
use crate::core::kernel::BoundParameters;
use crate::filters::registry::FilterRegistry;
use image::RgbaImage;

/// Register all built-in kernels.
pub fn register_all(registry: &mut FilterRegistry) {
    color::register(registry);
    blur::register(registry);
    distortion::register(registry);
    stylize::register(registry);
}

// Re-export for direct access
pub use color::{SepiaTone, Vignette};
pub use blur::{GaussianBlur, UnsharpMask};
pub use distortion::{BumpDistortion, TwirlDistortion};
pub use stylize::Pixellate;

/// Bound input image as RGBA8.
fn input_rgba(params: &BoundParameters) -> Result<RgbaImage, KernelError> {
    Ok(params.image()?.image().to_rgba8())
}

/// Blend factor helper shared by the tone kernels.
fn mix(a: f32, b: f32, t: f32) -> u8 {
    (a + (b - a) * t).round().clamp(0.0, 255.0) as u8
}
