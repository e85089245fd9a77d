//! FilterKernel trait and kernel metadata.
//!
//! A kernel is the pixel-level half of a filter: it declares which parameter
//! roles it reads and computes an output image from the values bound to them.

use crate::core::error::KernelError;
use crate::core::param::{ParameterDefinition, ParameterRole};
use crate::core::types::{ImageValue, Value};
use image::DynamicImage;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Category for grouping filters in the engine registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    /// Tone and color effects (sepia, vignette)
    ColorEffect,
    /// Geometry distortions (bump, twirl)
    Distortion,
    /// Blur effects
    Blur,
    /// Sharpening effects
    Sharpen,
    /// Stylizing effects (pixellate)
    Stylize,
    /// Custom/user-defined
    Custom,
}

impl Category {
    /// Get the display name for this category.
    pub fn display_name(&self) -> &'static str {
        match self {
            Category::ColorEffect => "Color Effect",
            Category::Distortion => "Distortion",
            Category::Blur => "Blur",
            Category::Sharpen => "Sharpen",
            Category::Stylize => "Stylize",
            Category::Custom => "Custom",
        }
    }

    /// Get all categories in display order.
    pub fn all() -> &'static [Category] {
        &[
            Category::ColorEffect,
            Category::Distortion,
            Category::Blur,
            Category::Sharpen,
            Category::Stylize,
            Category::Custom,
        ]
    }
}

impl Default for Category {
    fn default() -> Self {
        Category::Custom
    }
}

/// Metadata describing a filter kernel.
#[derive(Debug, Clone)]
pub struct KernelMetadata {
    /// Engine name (e.g., "CIGaussianBlur")
    pub name: String,
    /// Human-readable name (e.g., "Gaussian Blur")
    pub display_name: String,
    /// Category for registry lookups
    pub category: Category,
    /// Detailed description
    pub description: String,
    /// Declared parameters, image input first
    pub parameters: Vec<ParameterDefinition>,
}

impl KernelMetadata {
    /// Create a new metadata builder.
    pub fn builder(name: impl Into<String>, display_name: impl Into<String>) -> KernelMetadataBuilder {
        KernelMetadataBuilder::new(name, display_name)
    }

    /// Roles this kernel declares, in declaration order.
    pub fn declared_roles(&self) -> Vec<ParameterRole> {
        self.parameters.iter().map(|p| p.role).collect()
    }

    /// Whether this kernel declares the given role.
    pub fn declares(&self, role: ParameterRole) -> bool {
        self.parameters.iter().any(|p| p.role == role)
    }

    /// Find a parameter definition by role.
    pub fn get_parameter(&self, role: ParameterRole) -> Option<&ParameterDefinition> {
        self.parameters.iter().find(|p| p.role == role)
    }
}

/// Builder for KernelMetadata.
pub struct KernelMetadataBuilder {
    name: String,
    display_name: String,
    category: Category,
    description: String,
    parameters: Vec<ParameterDefinition>,
}

impl KernelMetadataBuilder {
    /// Create a new builder. The image input is always declared.
    pub fn new(name: impl Into<String>, display_name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            display_name: display_name.into(),
            category: Category::Custom,
            description: String::new(),
            parameters: vec![ParameterDefinition::image()],
        }
    }

    /// Set the category.
    pub fn category(mut self, category: Category) -> Self {
        self.category = category;
        self
    }

    /// Set the description.
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Add a parameter.
    pub fn parameter(mut self, param: ParameterDefinition) -> Self {
        self.parameters.push(param);
        self
    }

    /// Build the metadata.
    pub fn build(self) -> KernelMetadata {
        KernelMetadata {
            name: self.name,
            display_name: self.display_name,
            category: self.category,
            description: self.description,
            parameters: self.parameters,
        }
    }
}

/// Parameter values currently bound to a filter instance.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BoundParameters {
    values: IndexMap<ParameterRole, Value>,
    kernel: String,
}

impl BoundParameters {
    /// Start from the defaults a kernel declares.
    pub fn from_metadata(metadata: &KernelMetadata) -> Self {
        let values = metadata
            .parameters
            .iter()
            .filter_map(|p| p.default_value.clone().map(|v| (p.role, v)))
            .collect();
        Self {
            values,
            kernel: metadata.name.clone(),
        }
    }

    /// Bind a value, replacing any previous one.
    pub fn set(&mut self, role: ParameterRole, value: Value) {
        self.values.insert(role, value);
    }

    /// Get a bound value.
    pub fn get(&self, role: ParameterRole) -> Option<&Value> {
        self.values.get(&role)
    }

    /// Roles that currently hold a value.
    pub fn roles(&self) -> impl Iterator<Item = ParameterRole> + '_ {
        self.values.keys().copied()
    }

    /// The bound input image.
    pub fn image(&self) -> Result<&ImageValue, KernelError> {
        self.get(ParameterRole::Image)
            .and_then(Value::as_image)
            .ok_or_else(|| KernelError::MissingImage {
                kernel: self.kernel.clone(),
            })
    }

    /// A bound scalar.
    pub fn float(&self, role: ParameterRole) -> Result<f64, KernelError> {
        self.get(role)
            .and_then(Value::as_float)
            .ok_or(KernelError::WrongType { key: role.key() })
    }

    /// A bound point.
    pub fn vector2(&self, role: ParameterRole) -> Result<(f64, f64), KernelError> {
        self.get(role)
            .and_then(Value::as_vector2)
            .ok_or(KernelError::WrongType { key: role.key() })
    }
}

/// Trait implemented by every filter kernel the engine can instantiate.
pub trait FilterKernel: Send + Sync {
    /// Describe the kernel and its declared parameters.
    fn metadata(&self) -> KernelMetadata;

    /// Compute the output image from the bound parameters.
    fn apply(&self, params: &BoundParameters) -> Result<DynamicImage, KernelError>;

    /// Clone into a box.
    fn clone_box(&self) -> Box<dyn FilterKernel>;
}

impl Clone for Box<dyn FilterKernel> {
    fn clone(&self) -> Self {
        self.clone_box()
    }
}

/// A kernel that returns its input unchanged.
#[derive(Debug, Clone)]
pub struct IdentityKernel;

impl FilterKernel for IdentityKernel {
    fn metadata(&self) -> KernelMetadata {
        KernelMetadata::builder("CIIdentity", "Identity")
            .description("Returns the input image unchanged")
            .build()
    }

    fn apply(&self, params: &BoundParameters) -> Result<DynamicImage, KernelError> {
        Ok(params.image()?.image().clone())
    }

    fn clone_box(&self) -> Box<dyn FilterKernel> {
        Box::new(self.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_declares_image_first() {
        let metadata = KernelMetadata::builder("CITest", "Test")
            .parameter(ParameterDefinition::scalar(ParameterRole::Radius, 5.0))
            .build();
        assert_eq!(
            metadata.declared_roles(),
            vec![ParameterRole::Image, ParameterRole::Radius]
        );
        assert!(metadata.declares(ParameterRole::Radius));
        assert!(!metadata.declares(ParameterRole::Scale));
    }

    #[test]
    fn test_bound_parameters_defaults() {
        let metadata = KernelMetadata::builder("CITest", "Test")
            .parameter(ParameterDefinition::scalar(ParameterRole::Scale, 2.0))
            .build();
        let mut params = BoundParameters::from_metadata(&metadata);
        assert_eq!(params.float(ParameterRole::Scale), Ok(2.0));
        assert!(params.image().is_err());

        params.set(ParameterRole::Scale, Value::Float(7.0));
        assert_eq!(params.float(ParameterRole::Scale), Ok(7.0));
        assert_eq!(
            params.vector2(ParameterRole::Scale),
            Err(KernelError::WrongType { key: "inputScale" })
        );
    }
}
