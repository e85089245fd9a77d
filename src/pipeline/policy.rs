//! Binding policy from the single intensity value to a filter's parameters.

use crate::core::param::ParameterRole;
use crate::core::types::{ImageValue, Intensity, Value};
use crate::engine::FilterHandle;

/// Radius bound at full intensity.
pub const DEFAULT_RADIUS_FACTOR: f64 = 200.0;
/// Scale bound at full intensity.
pub const DEFAULT_SCALE_FACTOR: f64 = 10.0;

/// Decides which declared parameters the intensity drives, and how.
///
/// | Role      | Bound value                    |
/// |-----------|--------------------------------|
/// | Image     | the source image               |
/// | Intensity | `intensity`                    |
/// | Radius    | `intensity * radius_factor`    |
/// | Scale     | `intensity * scale_factor`     |
/// | Center    | `(width / 2, height / 2)`      |
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParameterPolicy {
    radius_factor: f64,
    scale_factor: f64,
}

impl ParameterPolicy {
    /// Policy with the standard factors.
    pub fn new() -> Self {
        Self::with_factors(DEFAULT_RADIUS_FACTOR, DEFAULT_SCALE_FACTOR)
    }

    /// Policy with custom factors.
    pub fn with_factors(radius_factor: f64, scale_factor: f64) -> Self {
        Self {
            radius_factor,
            scale_factor,
        }
    }

    /// Value bound for `role`.
    pub fn binding(&self, role: ParameterRole, image: &ImageValue, intensity: Intensity) -> Value {
        let t = intensity.value();
        match role {
            ParameterRole::Image => Value::Image(image.clone()),
            ParameterRole::Intensity => Value::Float(t),
            ParameterRole::Radius => Value::Float(t * self.radius_factor),
            ParameterRole::Scale => Value::Float(t * self.scale_factor),
            ParameterRole::Center => {
                let (x, y) = image.center();
                Value::Vector2(x, y)
            }
        }
    }

    /// Bind every role the handle declares. Undeclared roles are left alone.
    pub fn apply(&self, handle: &mut FilterHandle, image: &ImageValue, intensity: Intensity) {
        for role in handle.declared_roles() {
            let value = self.binding(role, image, intensity);
            handle.set_parameter(role, value);
        }
    }
}

impl Default for ParameterPolicy {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::{CpuEngine, ImageEngine};
    use image::{DynamicImage, RgbaImage};
    use proptest::prelude::*;

    fn image(width: u32, height: u32) -> ImageValue {
        ImageValue::new(DynamicImage::ImageRgba8(RgbaImage::new(width, height)))
    }

    fn handle(name: &str) -> FilterHandle {
        CpuEngine::new().instantiate(name).unwrap()
    }

    #[test]
    fn test_twirl_binds_center_only() {
        let policy = ParameterPolicy::new();
        let mut twirl = handle("CITwirlDistortion");
        policy.apply(&mut twirl, &image(300, 200), Intensity::new(0.5));

        assert_eq!(twirl.parameter(ParameterRole::Center), Some(&Value::Vector2(150.0, 100.0)));
        assert!(twirl.parameter(ParameterRole::Radius).is_none());
        assert!(twirl.parameter(ParameterRole::Scale).is_none());
        assert!(twirl.parameter(ParameterRole::Image).is_some());
    }

    #[test]
    fn test_gaussian_radius() {
        let mut blur = handle("CIGaussianBlur");
        ParameterPolicy::new().apply(&mut blur, &image(10, 10), Intensity::new(0.3));

        let radius = blur.parameter(ParameterRole::Radius).and_then(Value::as_float).unwrap();
        assert_eq!(radius, 0.3 * 200.0);
        assert!((radius - 60.0).abs() < 1e-9);
    }

    #[test]
    fn test_custom_factors() {
        let mut bump = handle("CIBumpDistortion");
        ParameterPolicy::with_factors(100.0, 2.0).apply(&mut bump, &image(4, 4), Intensity::MAX);

        assert_eq!(bump.parameter(ParameterRole::Radius), Some(&Value::Float(100.0)));
        assert_eq!(bump.parameter(ParameterRole::Scale), Some(&Value::Float(2.0)));
    }

    #[test]
    fn test_rebinding_overwrites() {
        let policy = ParameterPolicy::new();
        let mut vignette = handle("CIVignette");
        policy.apply(&mut vignette, &image(8, 8), Intensity::new(0.9));
        policy.apply(&mut vignette, &image(8, 8), Intensity::new(0.1));

        assert_eq!(vignette.parameter(ParameterRole::Intensity), Some(&Value::Float(0.1)));
        assert_eq!(
            vignette.parameter(ParameterRole::Radius),
            Some(&Value::Float(0.1 * 200.0))
        );
    }

    proptest! {
        #[test]
        fn prop_radius_is_intensity_times_200(t in 0.0f64..=1.0) {
            let mut blur = handle("CIGaussianBlur");
            ParameterPolicy::new().apply(&mut blur, &image(2, 2), Intensity::new(t));
            prop_assert_eq!(blur.parameter(ParameterRole::Radius), Some(&Value::Float(t * 200.0)));
        }

        #[test]
        fn prop_scale_is_intensity_times_10(t in 0.0f64..=1.0) {
            for name in ["CIPixellate", "CIBumpDistortion"] {
                let mut h = handle(name);
                ParameterPolicy::new().apply(&mut h, &image(2, 2), Intensity::new(t));
                prop_assert_eq!(h.parameter(ParameterRole::Scale), Some(&Value::Float(t * 10.0)));
            }
        }

        #[test]
        fn prop_center_is_image_midpoint(w in 1u32..64, h in 1u32..64) {
            let mut pixellate = handle("CIPixellate");
            ParameterPolicy::new().apply(&mut pixellate, &image(w, h), Intensity::default());
            prop_assert_eq!(
                pixellate.parameter(ParameterRole::Center),
                Some(&Value::Vector2(w as f64 / 2.0, h as f64 / 2.0))
            );
        }
    }
}
