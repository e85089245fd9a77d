//! Handle to an instantiated engine filter.

use crate::core::kernel::{BoundParameters, FilterKernel, KernelMetadata};
use crate::core::param::ParameterRole;
use crate::core::types::{Extent, Value};

/// An engine filter instance together with its bound parameter state.
///
/// Handles are replaced rather than retargeted when the selection changes, so
/// the bindings of one filter never carry over to the next.
#[derive(Clone)]
pub struct FilterHandle {
    kernel: Box<dyn FilterKernel>,
    metadata: KernelMetadata,
    params: BoundParameters,
}

impl FilterHandle {
    /// Instantiate a kernel with its declared defaults bound.
    pub fn new(kernel: Box<dyn FilterKernel>) -> Self {
        let metadata = kernel.metadata();
        let params = BoundParameters::from_metadata(&metadata);
        Self {
            kernel,
            metadata,
            params,
        }
    }

    /// Engine name this handle was instantiated from.
    pub fn name(&self) -> &str {
        &self.metadata.name
    }

    /// Kernel metadata.
    pub fn metadata(&self) -> &KernelMetadata {
        &self.metadata
    }

    /// Roles the filter declares.
    pub fn declared_roles(&self) -> Vec<ParameterRole> {
        self.metadata.declared_roles()
    }

    /// Engine keys the filter declares.
    pub fn declared_keys(&self) -> Vec<&'static str> {
        self.metadata.parameters.iter().map(|p| p.role.key()).collect()
    }

    /// Whether the filter declares a role.
    pub fn declares(&self, role: ParameterRole) -> bool {
        self.metadata.declares(role)
    }

    /// Bind a value to a declared role, overwriting any previous binding.
    ///
    /// Scalars are clamped to the parameter's constraint. Returns `false` and
    /// binds nothing if the role is not declared.
    pub fn set_parameter(&mut self, role: ParameterRole, value: Value) -> bool {
        let Some(definition) = self.metadata.get_parameter(role) else {
            return false;
        };

        let value = match (value, definition.constraint) {
            (Value::Float(v), Some(constraint)) => Value::Float(constraint.clamp(v)),
            (value, _) => value,
        };
        self.params.set(role, value);
        true
    }

    /// Current value bound to a role.
    pub fn parameter(&self, role: ParameterRole) -> Option<&Value> {
        self.params.get(role)
    }

    /// All bound parameters.
    pub fn parameters(&self) -> &BoundParameters {
        &self.params
    }

    /// Full extent of the filter output: the bounds of the bound input image.
    pub fn output_extent(&self) -> Option<Extent> {
        self.params.image().ok().map(|image| image.extent())
    }

    pub(crate) fn kernel(&self) -> &dyn FilterKernel {
        self.kernel.as_ref()
    }
}

impl std::fmt::Debug for FilterHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FilterHandle")
            .field("name", &self.metadata.name)
            .field("params", &self.params)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::kernel::IdentityKernel;
    use crate::core::types::ImageValue;
    use image::{DynamicImage, RgbaImage};

    #[test]
    fn test_undeclared_parameter_is_rejected() {
        let mut handle = FilterHandle::new(Box::new(IdentityKernel));
        assert_eq!(handle.declared_keys(), vec!["inputImage"]);
        assert!(!handle.set_parameter(ParameterRole::Radius, Value::Float(3.0)));
        assert!(handle.parameter(ParameterRole::Radius).is_none());
    }

    #[test]
    fn test_output_extent_follows_image() {
        let mut handle = FilterHandle::new(Box::new(IdentityKernel));
        assert!(handle.output_extent().is_none());

        let image = ImageValue::new(DynamicImage::ImageRgba8(RgbaImage::new(7, 3)));
        assert!(handle.set_parameter(ParameterRole::Image, Value::Image(image)));
        assert_eq!(handle.output_extent(), Some(Extent::new(0, 0, 7, 3)));
    }
}
