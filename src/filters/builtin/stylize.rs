//! Stylize filters: Pixellate

use super::input_rgba;
use crate::core::error::KernelError;
use crate::core::kernel::{BoundParameters, Category, FilterKernel, KernelMetadata};
use crate::core::param::{ParameterDefinition, ParameterRole};
use crate::filters::registry::FilterRegistry;
use image::{DynamicImage, RgbaImage};

/// Register stylize filters.
pub fn register(registry: &mut FilterRegistry) {
    registry.register(|| Box::new(Pixellate));
}

/// Replaces square cells with the color at each cell's center.
///
/// Cells are aligned so that one cell corner sits on the center point.
#[derive(Debug, Clone)]
pub struct Pixellate;

impl FilterKernel for Pixellate {
    fn metadata(&self) -> KernelMetadata {
        KernelMetadata::builder("CIPixellate", "Pixellate")
            .description("Enlarge the image into square blocks")
            .category(Category::Stylize)
            .parameter(ParameterDefinition::center(150.0, 150.0))
            .parameter(
                ParameterDefinition::scalar(ParameterRole::Scale, 8.0)
                    .with_description("Cell size in pixels (cells under one pixel are left alone)")
                    .with_min(0.0),
            )
            .build()
    }

    fn apply(&self, params: &BoundParameters) -> Result<DynamicImage, KernelError> {
        let (cx, cy) = params.vector2(ParameterRole::Center)?;
        let cell = params.float(ParameterRole::Scale)?.max(1.0);
        let rgba = input_rgba(params)?;
        let (width, height) = rgba.dimensions();
        if cell <= 1.0 || width == 0 || height == 0 {
            return Ok(DynamicImage::ImageRgba8(rgba));
        }

        let sample = |pos: u32, origin: f64, limit: u32| -> u32 {
            let index = ((pos as f64 + 0.5 - origin) / cell).floor();
            let mid = origin + (index + 0.5) * cell;
            (mid.floor().max(0.0) as u32).min(limit - 1)
        };

        let out = RgbaImage::from_fn(width, height, |x, y| {
            *rgba.get_pixel(sample(x, cx, width), sample(y, cy, height))
        });

        Ok(DynamicImage::ImageRgba8(out))
    }

    fn clone_box(&self) -> Box<dyn FilterKernel> {
        Box::new(self.clone())
    }
}
