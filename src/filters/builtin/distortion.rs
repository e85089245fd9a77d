//! Distortion filters: BumpDistortion, TwirlDistortion
//!
//! Both warp the image around a center point. Mappings go from output
//! coordinates back to source coordinates; samples falling outside the source
//! are transparent.

use super::input_rgba;
use crate::core::error::KernelError;
use crate::core::kernel::{BoundParameters, Category, FilterKernel, KernelMetadata};
use crate::core::param::{ParameterDefinition, ParameterRole};
use crate::filters::registry::FilterRegistry;
use image::{DynamicImage, Rgba};
use imageproc::geometric_transformations::{warp_with, Interpolation};

/// Radius of the twirled region in pixels.
const TWIRL_RADIUS: f32 = 300.0;
/// Rotation at the twirl center in radians.
const TWIRL_ANGLE: f32 = std::f32::consts::PI;

const OUTSIDE: Rgba<u8> = Rgba([0, 0, 0, 0]);

/// Register distortion filters.
pub fn register(registry: &mut FilterRegistry) {
    registry.register(|| Box::new(BumpDistortion));
    registry.register(|| Box::new(TwirlDistortion));
}

/// Bulges (positive scale) or pinches (negative scale) a circular region.
#[derive(Debug, Clone)]
pub struct BumpDistortion;

impl FilterKernel for BumpDistortion {
    fn metadata(&self) -> KernelMetadata {
        KernelMetadata::builder("CIBumpDistortion", "Bump Distortion")
            .description("Create a bump that originates at a point in the image")
            .category(Category::Distortion)
            .parameter(ParameterDefinition::center(150.0, 150.0))
            .parameter(
                ParameterDefinition::scalar(ParameterRole::Radius, 300.0)
                    .with_description("Radius of the affected region")
                    .with_min(0.0),
            )
            .parameter(
                ParameterDefinition::scalar(ParameterRole::Scale, 0.5)
                    .with_description("Strength of the bump"),
            )
            .build()
    }

    fn apply(&self, params: &BoundParameters) -> Result<DynamicImage, KernelError> {
        let (cx, cy) = params.vector2(ParameterRole::Center)?;
        let radius = params.float(ParameterRole::Radius)? as f32;
        let scale = params.float(ParameterRole::Scale)? as f32;
        let rgba = input_rgba(params)?;
        if radius <= 0.0 || rgba.width() == 0 || rgba.height() == 0 {
            return Ok(DynamicImage::ImageRgba8(rgba));
        }
        let (cx, cy) = (cx as f32, cy as f32);

        let out = warp_with(
            &rgba,
            |x, y| {
                let (dx, dy) = (x - cx, y - cy);
                let dist = (dx * dx + dy * dy).sqrt();
                if dist >= radius {
                    return (x, y);
                }
                let falloff = 1.0 - dist / radius;
                let factor = 1.0 - scale * falloff * falloff;
                (cx + dx * factor, cy + dy * factor)
            },
            Interpolation::Nearest,
            OUTSIDE,
        );

        Ok(DynamicImage::ImageRgba8(out))
    }

    fn clone_box(&self) -> Box<dyn FilterKernel> {
        Box::new(self.clone())
    }
}

/// Rotates pixels around the center, strongest at the center itself.
#[derive(Debug, Clone)]
pub struct TwirlDistortion;

impl FilterKernel for TwirlDistortion {
    fn metadata(&self) -> KernelMetadata {
        KernelMetadata::builder("CITwirlDistortion", "Twirl Distortion")
            .description("Rotate pixels around a point to give a twirling effect")
            .category(Category::Distortion)
            .parameter(ParameterDefinition::center(150.0, 150.0))
            .build()
    }

    fn apply(&self, params: &BoundParameters) -> Result<DynamicImage, KernelError> {
        let (cx, cy) = params.vector2(ParameterRole::Center)?;
        let rgba = input_rgba(params)?;
        if rgba.width() == 0 || rgba.height() == 0 {
            return Ok(DynamicImage::ImageRgba8(rgba));
        }
        let (cx, cy) = (cx as f32, cy as f32);

        let out = warp_with(
            &rgba,
            |x, y| {
                let (dx, dy) = (x - cx, y - cy);
                let dist = (dx * dx + dy * dy).sqrt();
                if dist >= TWIRL_RADIUS {
                    return (x, y);
                }
                let falloff = 1.0 - dist / TWIRL_RADIUS;
                let (sin, cos) = (TWIRL_ANGLE * falloff * falloff).sin_cos();
                (cx + dx * cos - dy * sin, cy + dx * sin + dy * cos)
            },
            Interpolation::Nearest,
            OUTSIDE,
        );

        Ok(DynamicImage::ImageRgba8(out))
    }

    fn clone_box(&self) -> Box<dyn FilterKernel> {
        Box::new(self.clone())
    }
}
