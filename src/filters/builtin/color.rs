//! Tone filters: SepiaTone, Vignette

use super::{input_rgba, mix};
use crate::core::error::KernelError;
use crate::core::kernel::{BoundParameters, Category, FilterKernel, KernelMetadata};
use crate::core::param::{ParameterDefinition, ParameterRole};
use crate::filters::registry::FilterRegistry;
use image::DynamicImage;
use rayon::prelude::*;

/// Register tone filters.
pub fn register(registry: &mut FilterRegistry) {
    registry.register(|| Box::new(SepiaTone));
    registry.register(|| Box::new(Vignette));
}

/// Maps colors to a warm brown tone.
#[derive(Debug, Clone)]
pub struct SepiaTone;

impl FilterKernel for SepiaTone {
    fn metadata(&self) -> KernelMetadata {
        KernelMetadata::builder("CISepiaTone", "Sepia Tone")
            .description("Map the colors of an image to shades of brown")
            .category(Category::ColorEffect)
            .parameter(
                ParameterDefinition::scalar(ParameterRole::Intensity, 1.0)
                    .with_description("Blend between the original and the sepia tone")
                    .with_range(0.0, 1.0),
            )
            .build()
    }

    fn apply(&self, params: &BoundParameters) -> Result<DynamicImage, KernelError> {
        let amount = params.float(ParameterRole::Intensity)? as f32;
        let mut rgba = input_rgba(params)?;

        rgba.par_chunks_mut(4).for_each(|px| {
            let (r, g, b) = (px[0] as f32, px[1] as f32, px[2] as f32);
            let sr = 0.393 * r + 0.769 * g + 0.189 * b;
            let sg = 0.349 * r + 0.686 * g + 0.168 * b;
            let sb = 0.272 * r + 0.534 * g + 0.131 * b;
            px[0] = mix(r, sr, amount);
            px[1] = mix(g, sg, amount);
            px[2] = mix(b, sb, amount);
        });

        Ok(DynamicImage::ImageRgba8(rgba))
    }

    fn clone_box(&self) -> Box<dyn FilterKernel> {
        Box::new(self.clone())
    }
}

/// Darkens the image toward its corners.
///
/// Darkening starts `radius` pixels from the center and reaches `intensity`
/// at the corners. Negative intensities brighten instead.
#[derive(Debug, Clone)]
pub struct Vignette;

impl FilterKernel for Vignette {
    fn metadata(&self) -> KernelMetadata {
        KernelMetadata::builder("CIVignette", "Vignette")
            .description("Darken the edges of an image")
            .category(Category::ColorEffect)
            .parameter(
                ParameterDefinition::scalar(ParameterRole::Intensity, 0.0)
                    .with_description("Strength of the darkening at the corners")
                    .with_range(-1.0, 1.0),
            )
            .parameter(
                ParameterDefinition::scalar(ParameterRole::Radius, 1.0)
                    .with_description("Distance from the center where darkening begins")
                    .with_min(0.0),
            )
            .build()
    }

    fn apply(&self, params: &BoundParameters) -> Result<DynamicImage, KernelError> {
        let intensity = params.float(ParameterRole::Intensity)? as f32;
        let radius = params.float(ParameterRole::Radius)? as f32;
        let mut rgba = input_rgba(params)?;

        let (width, height) = rgba.dimensions();
        let (cx, cy) = (width as f32 / 2.0, height as f32 / 2.0);
        let max_dist = (cx * cx + cy * cy).sqrt();
        if width == 0 || radius >= max_dist {
            return Ok(DynamicImage::ImageRgba8(rgba));
        }
        let span = max_dist - radius;
        let row_len = width as usize * 4;

        rgba.par_chunks_mut(row_len).enumerate().for_each(|(y, row)| {
            let dy = y as f32 + 0.5 - cy;
            for (x, px) in row.chunks_mut(4).enumerate() {
                let dx = x as f32 + 0.5 - cx;
                let dist = (dx * dx + dy * dy).sqrt();
                let t = ((dist - radius) / span).clamp(0.0, 1.0);
                let factor = (1.0 - intensity * t * t).max(0.0);
                for c in px.iter_mut().take(3) {
                    *c = (*c as f32 * factor).round().clamp(0.0, 255.0) as u8;
                }
            }
        });

        Ok(DynamicImage::ImageRgba8(rgba))
    }

    fn clone_box(&self) -> Box<dyn FilterKernel> {
        Box::new(self.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::{ImageValue, Value};
    use crate::filters::builtin::fixtures::{bound, gradient};
    use image::{Rgba, RgbaImage};

    fn gray(width: u32, height: u32, level: u8) -> ImageValue {
        ImageValue::new(DynamicImage::ImageRgba8(RgbaImage::from_pixel(
            width,
            height,
            Rgba([level, level, level, 255]),
        )))
    }

    #[test]
    fn test_sepia_metadata() {
        let metadata = SepiaTone.metadata();
        assert_eq!(metadata.name, "CISepiaTone");
        assert_eq!(
            metadata.declared_roles(),
            vec![ParameterRole::Image, ParameterRole::Intensity]
        );
    }

    #[test]
    fn test_sepia_zero_intensity_is_identity() {
        let image = gradient(8, 8);
        let mut params = bound(&SepiaTone, image.clone());
        params.set(ParameterRole::Intensity, Value::Float(0.0));

        let out = SepiaTone.apply(&params).unwrap();
        assert_eq!(out.to_rgba8(), image.image().to_rgba8());
    }

    #[test]
    fn test_sepia_warms_gray() {
        let params = bound(&SepiaTone, gray(2, 2, 100));
        let out = SepiaTone.apply(&params).unwrap().to_rgba8();
        let px = out.get_pixel(0, 0);
        assert!(px[0] > px[1] && px[1] > px[2]);
        assert_eq!(px[3], 255);
    }

    #[test]
    fn test_vignette_darkens_corners_only() {
        let mut params = bound(&Vignette, gray(41, 41, 200));
        params.set(ParameterRole::Intensity, Value::Float(1.0));
        params.set(ParameterRole::Radius, Value::Float(5.0));

        let out = Vignette.apply(&params).unwrap().to_rgba8();
        assert_eq!(out.get_pixel(20, 20)[0], 200);
        assert!(out.get_pixel(0, 0)[0] < 50);
    }

    #[test]
    fn test_vignette_large_radius_is_identity() {
        let image = gradient(10, 6);
        let mut params = bound(&Vignette, image.clone());
        params.set(ParameterRole::Intensity, Value::Float(1.0));
        params.set(ParameterRole::Radius, Value::Float(200.0));

        let out = Vignette.apply(&params).unwrap();
        assert_eq!(out.to_rgba8(), image.image().to_rgba8());
    }
}
